//! Browser front-end: the DOM-backed page and the `WasmChart` exports.

use crate::adapters::http_capability::HttpCapability;
use crate::app::bootstrap::boot;
use crate::app::http_loader::HttpModuleLoader;
use crate::core::report::render_summary;
use crate::domain::model::StockAnalysis;
use crate::domain::ports::{dom, ErrorDisplay, PageView, StockCapability, SubmitEvent, SubmitHandler};
use crate::utils::error::{Result, StockrError};
use crate::utils::logger;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Element, Event, HtmlElement, HtmlInputElement};

fn to_js(error: StockrError) -> JsValue {
    JsValue::from_str(&error.to_string())
}

fn js_error(context: &str, value: JsValue) -> StockrError {
    StockrError::ConfigError {
        message: format!("{}: {:?}", context, value),
    }
}

fn element<T: JsCast>(document: &Document, id: &str) -> Result<T> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| StockrError::ConfigError {
            message: format!("missing #{} element", id),
        })?
        .dyn_into::<T>()
        .map_err(|_| StockrError::ConfigError {
            message: format!("#{} has an unexpected element type", id),
        })
}

struct WebSubmitEvent(Event);

impl SubmitEvent for WebSubmitEvent {
    fn prevent_default(&self) {
        self.0.prevent_default();
    }
}

pub struct WebPage {
    form: Element,
    input: HtmlInputElement,
    error_text: HtmlElement,
    summary: Option<Element>,
}

impl WebPage {
    pub fn attach(document: &Document) -> Result<Self> {
        Ok(Self {
            form: element(document, dom::STOCK_FORM)?,
            input: element(document, dom::SYMBOL_INPUT)?,
            error_text: element(document, dom::ERROR_TEXT)?,
            summary: document.get_element_by_id(dom::ANALYSIS_SUMMARY),
        })
    }
}

impl PageView for WebPage {
    fn input_value(&self) -> String {
        self.input.value()
    }

    fn set_input_value(&self, value: &str) {
        self.input.set_value(value);
    }

    fn set_error_display(&self, display: ErrorDisplay) {
        if let Err(e) = self.error_text.style().set_property("display", display.as_css()) {
            tracing::warn!("Could not toggle #{}: {:?}", dom::ERROR_TEXT, e);
        }
    }

    fn render_analysis(&self, analysis: &StockAnalysis) {
        if let Some(summary) = &self.summary {
            summary.set_text_content(Some(&render_summary(analysis)));
        }
    }

    fn show_load_failure(&self, message: &str) {
        web_sys::console::error_1(&JsValue::from_str(message));
        self.error_text.set_text_content(Some(message));
        self.set_error_display(ErrorDisplay::Inline);
    }

    fn bind_submit(&self, handler: SubmitHandler) -> Result<()> {
        let listener = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            let work = handler(&WebSubmitEvent(event));
            spawn_local(work);
        });
        self.form
            .add_event_listener_with_callback("submit", listener.as_ref().unchecked_ref())
            .map_err(|e| js_error("binding submit listener", e))?;
        // The listener lives as long as the page.
        listener.forget();
        Ok(())
    }
}

fn page_capability() -> std::result::Result<HttpCapability, JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    Ok(HttpCapability::new(window.location().origin()?))
}

/// Chart capability exported to JavaScript.
#[wasm_bindgen]
pub struct WasmChart {}

#[wasm_bindgen]
impl WasmChart {
    pub async fn fetch_stock_data(symbol: String) -> std::result::Result<JsValue, JsValue> {
        let analysis = page_capability()?
            .fetch_stock_data(&symbol)
            .await
            .map_err(to_js)?;
        serde_wasm_bindgen::to_value(&analysis).map_err(JsValue::from)
    }

    pub async fn fetch_symbol() -> std::result::Result<JsValue, JsValue> {
        let symbol = page_capability()?.fetch_symbol().await.map_err(to_js)?;
        Ok(symbol.map(JsValue::from).unwrap_or(JsValue::NULL))
    }
}

#[wasm_bindgen(start)]
pub fn start() -> std::result::Result<(), JsValue> {
    logger::init_web_logger();

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let origin = window.location().origin()?;
    let page = Rc::new(WebPage::attach(&document).map_err(to_js)?);

    spawn_local(async move {
        let loader = HttpModuleLoader::new(origin, page.clone());
        // The running controller stays alive through the form's submit listener.
        let _ = boot(&loader, page.as_ref()).await;
    });

    Ok(())
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use futures::future::{FutureExt, LocalBoxFuture};
    use std::cell::Cell;
    use wasm_bindgen_test::*;
    use web_sys::EventInit;

    wasm_bindgen_test_configure!(run_in_browser);

    fn document() -> Document {
        web_sys::window().unwrap().document().unwrap()
    }

    /// Mounts the stock form under a fresh container; remove it when done.
    fn mount_form(document: &Document) -> Element {
        let container = document.create_element("div").unwrap();
        let form = document.create_element("form").unwrap();
        form.set_id(dom::STOCK_FORM);
        let input = document.create_element("input").unwrap();
        input.set_id(dom::SYMBOL_INPUT);
        input.set_attribute("type", "text").unwrap();
        let error_text = document.create_element("span").unwrap();
        error_text.set_id(dom::ERROR_TEXT);
        form.append_child(&input).unwrap();
        form.append_child(&error_text).unwrap();
        container.append_child(&form).unwrap();
        document.body().unwrap().append_child(&container).unwrap();
        container
    }

    fn display_of(page: &WebPage) -> String {
        page.error_text.style().get_property_value("display").unwrap()
    }

    #[wasm_bindgen_test]
    fn test_web_logger_installs_once() {
        logger::init_web_logger();
        logger::init_web_logger();
        tracing::error!("Error analyzing stock ZZZZ: logged to the console");
    }

    #[wasm_bindgen_test]
    fn test_attach_requires_form_elements() {
        let document = document();
        match WebPage::attach(&document) {
            Err(StockrError::ConfigError { message }) => assert!(message.contains(dom::STOCK_FORM)),
            Err(other) => panic!("unexpected error: {other:?}"),
            Ok(_) => panic!("attached without a form"),
        }
    }

    #[wasm_bindgen_test]
    fn test_error_display_toggles_style() {
        let document = document();
        let container = mount_form(&document);
        let page = WebPage::attach(&document).unwrap();

        page.set_error_display(ErrorDisplay::Inline);
        assert_eq!(display_of(&page), "inline");
        page.set_error_display(ErrorDisplay::None);
        assert_eq!(display_of(&page), "none");

        page.set_input_value("AAPL");
        assert_eq!(page.input_value(), "AAPL");
        container.remove();
    }

    #[wasm_bindgen_test]
    fn test_submit_listener_prevents_default() {
        let document = document();
        let container = mount_form(&document);
        let page = WebPage::attach(&document).unwrap();
        let submits = Rc::new(Cell::new(0));
        let counter = submits.clone();
        let handler: SubmitHandler = Rc::new(move |event: &dyn SubmitEvent| -> LocalBoxFuture<'static, ()> {
            event.prevent_default();
            counter.set(counter.get() + 1);
            async {}.boxed_local()
        });
        page.bind_submit(handler).unwrap();

        let init = EventInit::new();
        init.set_cancelable(true);
        let event = Event::new_with_event_init_dict("submit", &init).unwrap();
        let not_cancelled = page.form.dispatch_event(&event).unwrap();

        assert!(!not_cancelled);
        assert!(event.default_prevented());
        assert_eq!(submits.get(), 1);
        container.remove();
    }
}
