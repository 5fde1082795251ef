use crate::app::controller::PageController;
use crate::domain::ports::{PageView, StockCapability};
use crate::utils::error::{Result, StockrError};
use async_trait::async_trait;
use std::rc::Rc;

pub const STAGE_LOAD_CHART: &str = "load chart module";
pub const STAGE_LOAD_CONTROLLER: &str = "load controller";
pub const STAGE_INITIALIZE: &str = "initialize chart module";
pub const STAGE_MAIN: &str = "main";

/// The compiled analytics module: must be initialized before its capability
/// is handed out.
#[async_trait(?Send)]
pub trait ChartModule {
    async fn initialize(&self) -> Result<()>;
    fn capability(&self) -> Rc<dyn StockCapability>;
}

#[async_trait(?Send)]
pub trait ModuleLoader {
    async fn load_chart_module(&self) -> Result<Box<dyn ChartModule>>;
    async fn load_controller(&self) -> Result<PageController>;
}

fn at_stage<T>(stage: &str, result: Result<T>) -> Result<T> {
    result.map_err(|e| match e {
        StockrError::BootstrapError { .. } => e,
        other => StockrError::bootstrap(stage, other),
    })
}

/// Runs the one-time handshake: both loads in parallel, module init, setup,
/// then main. Returns the running controller.
pub async fn init(loader: &dyn ModuleLoader) -> Result<PageController> {
    tracing::debug!("Loading chart module and controller");
    let (module, controller) = futures::try_join!(
        async { at_stage(STAGE_LOAD_CHART, loader.load_chart_module().await) },
        async { at_stage(STAGE_LOAD_CONTROLLER, loader.load_controller().await) },
    )?;

    at_stage(STAGE_INITIALIZE, module.initialize().await)?;
    tracing::debug!("Chart module initialized");

    controller.setup(module.capability());
    at_stage(STAGE_MAIN, controller.main().await)?;
    tracing::info!("Page ready");

    Ok(controller)
}

/// Error boundary around `init`: any failure is logged and `fallback` is put
/// into its load-failure state.
pub async fn boot(loader: &dyn ModuleLoader, fallback: &dyn PageView) -> Option<PageController> {
    match init(loader).await {
        Ok(controller) => Some(controller),
        Err(e) => {
            tracing::error!("❌ Failed to load page: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            fallback.show_load_failure(&e.user_friendly_message());
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::StockAnalysis;
    use crate::frontend::memory::MemoryPage;
    use std::cell::RefCell;

    type EventLog = Rc<RefCell<Vec<String>>>;

    struct LoggingCapability {
        events: EventLog,
    }

    #[async_trait(?Send)]
    impl StockCapability for LoggingCapability {
        async fn fetch_stock_data(&self, symbol: &str) -> Result<StockAnalysis> {
            self.events.borrow_mut().push(format!("fetch_stock_data {}", symbol));
            Err(StockrError::NoQuotes {
                symbol: symbol.to_string(),
            })
        }

        async fn fetch_symbol(&self) -> Result<Option<String>> {
            self.events.borrow_mut().push("fetch_symbol".to_string());
            Ok(None)
        }
    }

    struct FakeModule {
        events: EventLog,
        fail_initialize: bool,
    }

    #[async_trait(?Send)]
    impl ChartModule for FakeModule {
        async fn initialize(&self) -> Result<()> {
            self.events.borrow_mut().push("initialize".to_string());
            if self.fail_initialize {
                return Err(StockrError::ProviderError {
                    message: "wasm instantiate failed".to_string(),
                });
            }
            Ok(())
        }

        fn capability(&self) -> Rc<dyn StockCapability> {
            self.events.borrow_mut().push("capability".to_string());
            Rc::new(LoggingCapability {
                events: self.events.clone(),
            })
        }
    }

    struct FakeLoader {
        events: EventLog,
        page: Rc<MemoryPage>,
        fail_initialize: bool,
        fail_controller: bool,
    }

    impl FakeLoader {
        fn new(page: Rc<MemoryPage>) -> Self {
            Self {
                events: Rc::new(RefCell::new(Vec::new())),
                page,
                fail_initialize: false,
                fail_controller: false,
            }
        }

        fn events(&self) -> Vec<String> {
            self.events.borrow().clone()
        }
    }

    #[async_trait(?Send)]
    impl ModuleLoader for FakeLoader {
        async fn load_chart_module(&self) -> Result<Box<dyn ChartModule>> {
            self.events.borrow_mut().push("load chart".to_string());
            Ok(Box::new(FakeModule {
                events: self.events.clone(),
                fail_initialize: self.fail_initialize,
            }))
        }

        async fn load_controller(&self) -> Result<PageController> {
            self.events.borrow_mut().push("load controller".to_string());
            if self.fail_controller {
                return Err(StockrError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "index module missing",
                )));
            }
            Ok(PageController::new(self.page.clone()))
        }
    }

    #[tokio::test]
    async fn test_init_orders_handshake() {
        let page = Rc::new(MemoryPage::new());
        let loader = FakeLoader::new(page.clone());

        let controller = init(&loader).await.unwrap();

        assert!(controller.is_initialized());
        assert!(page.has_submit_handler());
        assert_eq!(
            loader.events(),
            vec!["load chart", "load controller", "initialize", "capability", "fetch_symbol"]
        );
    }

    #[tokio::test]
    async fn test_init_tags_failing_stage() {
        let page = Rc::new(MemoryPage::new());
        let mut loader = FakeLoader::new(page.clone());
        loader.fail_initialize = true;

        let err = init(&loader).await.err().unwrap();

        match err {
            StockrError::BootstrapError { stage, message } => {
                assert_eq!(stage, STAGE_INITIALIZE);
                assert!(message.contains("wasm instantiate failed"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(!page.has_submit_handler());
    }

    #[tokio::test]
    async fn test_boot_shows_load_failure() {
        let page = Rc::new(MemoryPage::new());
        let mut loader = FakeLoader::new(page.clone());
        loader.fail_controller = true;

        let controller = boot(&loader, page.as_ref()).await;

        assert!(controller.is_none());
        let message = page.load_failure().unwrap();
        assert!(message.contains(STAGE_LOAD_CONTROLLER));
        assert!(!loader.events().contains(&"initialize".to_string()));
    }

    #[tokio::test]
    async fn test_boot_success_leaves_page_usable() {
        let page = Rc::new(MemoryPage::new());
        let loader = FakeLoader::new(page.clone());

        let controller = boot(&loader, page.as_ref()).await;

        assert!(controller.is_some());
        assert!(page.load_failure().is_none());
        page.type_symbol("AMZN");
        assert!(page.submit().await.unwrap().default_prevented());
        assert!(loader.events().contains(&"fetch_stock_data AMZN".to_string()));
    }
}
