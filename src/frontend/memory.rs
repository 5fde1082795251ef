use crate::domain::model::StockAnalysis;
use crate::domain::ports::{ErrorDisplay, PageView, SubmitEvent, SubmitHandler};
use crate::utils::error::{Result, StockrError};
use std::cell::{Cell, RefCell};

#[derive(Debug, Default)]
pub struct MemorySubmitEvent {
    default_prevented: Cell<bool>,
}

impl MemorySubmitEvent {
    pub fn default_prevented(&self) -> bool {
        self.default_prevented.get()
    }
}

impl SubmitEvent for MemorySubmitEvent {
    fn prevent_default(&self) {
        self.default_prevented.set(true);
    }
}

/// Headless page: keeps the DOM state the controller touches in memory and
/// records every change so callers can inspect it.
#[derive(Default)]
pub struct MemoryPage {
    input: RefCell<String>,
    error_displays: RefCell<Vec<ErrorDisplay>>,
    rendered: RefCell<Vec<String>>,
    load_failure: RefCell<Option<String>>,
    handler: RefCell<Option<SubmitHandler>>,
}

impl MemoryPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_input(value: &str) -> Self {
        let page = Self::default();
        page.input.replace(value.to_string());
        page
    }

    /// Types into the symbol input.
    pub fn type_symbol(&self, value: &str) {
        self.input.replace(value.to_string());
    }

    /// Current `display` of the error element; `None` until first touched.
    pub fn error_display(&self) -> Option<ErrorDisplay> {
        self.error_displays.borrow().last().copied()
    }

    pub fn error_display_history(&self) -> Vec<ErrorDisplay> {
        self.error_displays.borrow().clone()
    }

    /// Symbols of every analysis rendered so far.
    pub fn rendered_symbols(&self) -> Vec<String> {
        self.rendered.borrow().clone()
    }

    pub fn load_failure(&self) -> Option<String> {
        self.load_failure.borrow().clone()
    }

    pub fn has_submit_handler(&self) -> bool {
        self.handler.borrow().is_some()
    }

    /// Submits the form and waits for the handler to finish. Returns the
    /// dispatched event so callers can check whether the default action was
    /// prevented.
    pub async fn submit(&self) -> Result<MemorySubmitEvent> {
        let handler = self
            .handler
            .borrow()
            .clone()
            .ok_or_else(|| StockrError::ConfigError {
                message: "no submit handler bound to the form".to_string(),
            })?;
        let event = MemorySubmitEvent::default();
        let work = handler(&event);
        work.await;
        Ok(event)
    }
}

impl PageView for MemoryPage {
    fn input_value(&self) -> String {
        self.input.borrow().clone()
    }

    fn set_input_value(&self, value: &str) {
        self.input.replace(value.to_string());
    }

    fn set_error_display(&self, display: ErrorDisplay) {
        self.error_displays.borrow_mut().push(display);
    }

    fn render_analysis(&self, analysis: &StockAnalysis) {
        self.rendered.borrow_mut().push(analysis.symbol.clone());
    }

    fn show_load_failure(&self, message: &str) {
        self.load_failure.replace(Some(message.to_string()));
    }

    fn bind_submit(&self, handler: SubmitHandler) -> Result<()> {
        self.handler.replace(Some(handler));
        Ok(())
    }
}
