use crate::core::report::render_summary;
use crate::domain::model::StockAnalysis;
use crate::domain::ports::{ErrorDisplay, PageView, SubmitEvent, SubmitHandler};
use crate::utils::error::{Result, StockrError};
use std::cell::{Cell, RefCell};
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

pub const ERROR_TEXT: &str = "Error: could not load stock data for that symbol";

struct LineSubmit;

// A terminal has no native submit action to suppress.
impl SubmitEvent for LineSubmit {
    fn prevent_default(&self) {}
}

/// Terminal rendition of the stock page: the prompt is the symbol input and
/// each entered line submits the form.
pub struct ConsolePage {
    input: RefCell<String>,
    error_display: Cell<ErrorDisplay>,
    handler: RefCell<Option<SubmitHandler>>,
    out: RefCell<Box<dyn Write>>,
    err: RefCell<Box<dyn Write>>,
}

impl ConsolePage {
    pub fn new(out: Box<dyn Write>, err: Box<dyn Write>) -> Self {
        Self {
            input: RefCell::new(String::new()),
            error_display: Cell::new(ErrorDisplay::None),
            handler: RefCell::new(None),
            out: RefCell::new(out),
            err: RefCell::new(err),
        }
    }

    pub fn stdio() -> Self {
        Self::new(Box::new(std::io::stdout()), Box::new(std::io::stderr()))
    }

    fn print(&self, text: &str) {
        let mut out = self.out.borrow_mut();
        // Output is best effort; a closed terminal must not stop the loop.
        let _ = writeln!(out, "{}", text);
        let _ = out.flush();
    }

    fn eprint(&self, text: &str) {
        let mut err = self.err.borrow_mut();
        let _ = writeln!(err, "{}", text);
        let _ = err.flush();
    }

    fn prompt(&self) {
        let mut out = self.out.borrow_mut();
        let _ = write!(out, "symbol> ");
        let _ = out.flush();
    }

    /// Reads symbols line by line until `exit` or end of input.
    pub async fn run<R: AsyncBufRead + Unpin>(&self, reader: R) -> Result<()> {
        let handler = self
            .handler
            .borrow()
            .clone()
            .ok_or_else(|| StockrError::ConfigError {
                message: "console page started before the controller was bound".to_string(),
            })?;

        let mut lines = reader.lines();
        self.prompt();
        while let Some(line) = lines.next_line().await? {
            let symbol = line.trim();
            if symbol.eq_ignore_ascii_case("exit") || symbol.eq_ignore_ascii_case("quit") {
                break;
            }
            if !symbol.is_empty() {
                self.input.replace(symbol.to_string());
                handler(&LineSubmit).await;
            }
            self.prompt();
        }
        Ok(())
    }
}

impl PageView for ConsolePage {
    fn input_value(&self) -> String {
        self.input.borrow().clone()
    }

    fn set_input_value(&self, value: &str) {
        self.input.replace(value.to_string());
        self.print(&format!("Loading {}", value));
    }

    fn set_error_display(&self, display: ErrorDisplay) {
        if display == ErrorDisplay::Inline {
            self.eprint(ERROR_TEXT);
        }
        self.error_display.set(display);
    }

    fn render_analysis(&self, analysis: &StockAnalysis) {
        self.print(&render_summary(analysis));
    }

    fn show_load_failure(&self, message: &str) {
        self.eprint(&format!("❌ {}", message));
    }

    fn bind_submit(&self, handler: SubmitHandler) -> Result<()> {
        self.handler.replace(Some(handler));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::controller::PageController;
    use crate::core::analysis::{analyze_quotes, DEFAULT_VOLATILITY_THRESHOLD};
    use crate::domain::model::RawQuote;
    use crate::domain::ports::StockCapability;
    use async_trait::async_trait;
    use std::rc::Rc;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl SharedBuffer {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    struct KnownSymbols;

    #[async_trait(?Send)]
    impl StockCapability for KnownSymbols {
        async fn fetch_stock_data(&self, symbol: &str) -> Result<StockAnalysis> {
            if symbol != "AAPL" {
                return Err(StockrError::NoQuotes {
                    symbol: symbol.to_string(),
                });
            }
            let quotes = [RawQuote {
                timestamp: 1_704_153_600,
                open: 185.0,
                high: 186.0,
                low: 184.0,
                close: 185.5,
                volume: 1_200,
                adjclose: 185.4,
            }];
            analyze_quotes(symbol, &quotes, DEFAULT_VOLATILITY_THRESHOLD)
        }

        async fn fetch_symbol(&self) -> Result<Option<String>> {
            Ok(None)
        }
    }

    #[tokio::test]
    async fn test_console_lines_submit_symbols() {
        let out = SharedBuffer::default();
        let err = SharedBuffer::default();
        let page = Rc::new(ConsolePage::new(Box::new(out.clone()), Box::new(err.clone())));
        let controller = PageController::with_capability(page.clone(), Rc::new(KnownSymbols));
        controller.main().await.unwrap();

        page.run(&b"AAPL\n\nZZZZ\nexit\nMSFT\n"[..]).await.unwrap();

        assert!(out.contents().contains("Analysis Report: AAPL"));
        assert_eq!(err.contents().matches(ERROR_TEXT).count(), 1);
        assert_eq!(page.input_value(), "ZZZZ");
    }

    #[tokio::test]
    async fn test_console_requires_bound_handler() {
        let page = ConsolePage::new(Box::new(SharedBuffer::default()), Box::new(SharedBuffer::default()));
        assert!(page.run(&b"AAPL\n"[..]).await.is_err());
    }
}
