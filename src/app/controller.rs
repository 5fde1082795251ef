use crate::domain::model::StockAnalysis;
use crate::domain::ports::{ErrorDisplay, PageView, StockCapability, SubmitEvent, SubmitHandler};
use crate::utils::error::{Result, StockrError};
use futures::future::{FutureExt, LocalBoxFuture};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

struct ControllerInner {
    view: Rc<dyn PageView>,
    capability: RefCell<Option<Rc<dyn StockCapability>>>,
    // Sequence number of the most recently issued stock-data request.
    latest_request: Cell<u64>,
}

/// Binds the symbol form to a `StockCapability` and mirrors each fetch's
/// outcome on the page. Clones share the same binding and view.
#[derive(Clone)]
pub struct PageController {
    inner: Rc<ControllerInner>,
}

impl PageController {
    /// A controller with no capability yet; `setup` must run before `main`.
    pub fn new(view: Rc<dyn PageView>) -> Self {
        Self {
            inner: Rc::new(ControllerInner {
                view,
                capability: RefCell::new(None),
                latest_request: Cell::new(0),
            }),
        }
    }

    pub fn with_capability(view: Rc<dyn PageView>, capability: Rc<dyn StockCapability>) -> Self {
        let controller = Self::new(view);
        controller.setup(capability);
        controller
    }

    /// Replaces the capability binding. Later fetches go through `capability` only.
    pub fn setup(&self, capability: Rc<dyn StockCapability>) {
        self.inner.capability.replace(Some(capability));
    }

    pub fn is_initialized(&self) -> bool {
        self.inner.capability.borrow().is_some()
    }

    fn capability(&self) -> Result<Rc<dyn StockCapability>> {
        self.inner
            .capability
            .borrow()
            .clone()
            .ok_or(StockrError::NotInitialized)
    }

    pub async fn fetch_stock_data(&self, symbol: &str) -> Result<StockAnalysis> {
        let capability = self.capability()?;
        capability.fetch_stock_data(symbol).await
    }

    pub async fn fetch_symbol(&self) -> Result<Option<String>> {
        let capability = self.capability()?;
        capability.fetch_symbol().await
    }

    /// Fetches `symbol` and toggles the error banner. Returns `None` on
    /// failure, and also when a newer request was issued while this one was
    /// in flight; superseded responses leave the page alone.
    pub async fn run_fetch_stock_data(&self, symbol: &str) -> Option<StockAnalysis> {
        let request = self.inner.latest_request.get() + 1;
        self.inner.latest_request.set(request);

        let result = self.fetch_stock_data(symbol).await;

        let latest = self.inner.latest_request.get();
        if request != latest {
            tracing::debug!(
                "Discarding response for {} (request {}, latest {})",
                symbol,
                request,
                latest
            );
            return None;
        }

        let view = &self.inner.view;
        match result {
            Ok(analysis) => {
                view.set_error_display(ErrorDisplay::None);
                view.render_analysis(&analysis);
                Some(analysis)
            }
            Err(e) => {
                tracing::error!("Error analyzing stock {}: {}", symbol, e);
                view.set_error_display(ErrorDisplay::Inline);
                None
            }
        }
    }

    /// Fills the input with the service's default symbol and loads it.
    /// A failed lookup leaves the input as it was and shows no banner, and
    /// so does a submit that happened while the lookup was in flight.
    pub async fn initialize_symbol_input(&self) -> Option<StockAnalysis> {
        let issued_before = self.inner.latest_request.get();
        let symbol = match self.fetch_symbol().await {
            Ok(symbol) => symbol,
            Err(e) => {
                tracing::warn!("Error fetching initial symbol: {}", e);
                None
            }
        };

        let symbol = symbol.filter(|symbol| !symbol.is_empty())?;
        if self.inner.latest_request.get() != issued_before {
            tracing::debug!("Keeping user input over default symbol {}", symbol);
            return None;
        }
        self.inner.view.set_input_value(&symbol);
        self.run_fetch_stock_data(&symbol).await
    }

    fn submit_handler(&self) -> SubmitHandler {
        let controller = self.clone();
        Rc::new(move |event: &dyn SubmitEvent| -> LocalBoxFuture<'static, ()> {
            event.prevent_default();
            let controller = controller.clone();
            let symbol = controller.inner.view.input_value();
            async move {
                controller.run_fetch_stock_data(&symbol).await;
            }
            .boxed_local()
        })
    }

    /// Wires the form's submit handler, then populates the page.
    pub async fn main(&self) -> Result<()> {
        self.inner.view.bind_submit(self.submit_handler())?;
        self.initialize_symbol_input().await;
        Ok(())
    }
}
