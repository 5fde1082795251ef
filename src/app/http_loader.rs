use crate::adapters::http_capability::HttpCapability;
use crate::app::bootstrap::{ChartModule, ModuleLoader};
use crate::app::controller::PageController;
use crate::domain::ports::{PageView, StockCapability};
use crate::utils::error::Result;
use crate::utils::validation::validate_url;
use async_trait::async_trait;
use std::rc::Rc;

/// Chart module backed by a stock service; ready once the service answers
/// its health probe.
pub struct HttpChartModule {
    capability: Rc<HttpCapability>,
}

impl HttpChartModule {
    pub fn new(capability: HttpCapability) -> Self {
        Self {
            capability: Rc::new(capability),
        }
    }
}

#[async_trait(?Send)]
impl ChartModule for HttpChartModule {
    async fn initialize(&self) -> Result<()> {
        tracing::debug!("Probing stock service at {}", self.capability.base_url());
        self.capability.health().await
    }

    fn capability(&self) -> Rc<dyn StockCapability> {
        self.capability.clone()
    }
}

pub struct HttpModuleLoader {
    server_url: String,
    view: Rc<dyn PageView>,
}

impl HttpModuleLoader {
    pub fn new(server_url: impl Into<String>, view: Rc<dyn PageView>) -> Self {
        Self {
            server_url: server_url.into(),
            view,
        }
    }
}

#[async_trait(?Send)]
impl ModuleLoader for HttpModuleLoader {
    async fn load_chart_module(&self) -> Result<Box<dyn ChartModule>> {
        validate_url("server_url", &self.server_url)?;
        Ok(Box::new(HttpChartModule::new(HttpCapability::new(
            self.server_url.as_str(),
        ))))
    }

    async fn load_controller(&self) -> Result<PageController> {
        Ok(PageController::new(self.view.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::bootstrap::{boot, init};
    use crate::frontend::memory::MemoryPage;
    use crate::utils::error::StockrError;
    use httpmock::prelude::*;

    #[tokio::test]
    async fn test_loader_probes_health_before_main() {
        let server = MockServer::start();
        let health = server.mock(|when, then| {
            when.method(GET).path("/health");
            then.status(200).body("OK");
        });
        let symbol = server.mock(|when, then| {
            when.method(GET).path("/stock");
            then.status(400).body("No user input stored");
        });

        let page = Rc::new(MemoryPage::with_input("IBM"));
        let loader = HttpModuleLoader::new(server.base_url(), page.clone());

        let controller = init(&loader).await.ok().unwrap();

        health.assert();
        symbol.assert();
        assert!(controller.is_initialized());
        assert_eq!(page.input_value(), "IBM");
    }

    #[tokio::test]
    async fn test_loader_rejects_invalid_url() {
        let page = Rc::new(MemoryPage::new());
        let loader = HttpModuleLoader::new("not a url", page.clone());

        let err = init(&loader).await.err().unwrap();
        assert!(matches!(err, StockrError::BootstrapError { .. }));
    }

    #[tokio::test]
    async fn test_unhealthy_service_shows_load_failure() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/health");
            then.status(503);
        });

        let page = Rc::new(MemoryPage::new());
        let loader = HttpModuleLoader::new(server.base_url(), page.clone());

        assert!(boot(&loader, page.as_ref()).await.is_none());
        assert!(page.load_failure().unwrap().contains("initialize chart module"));
    }
}
