use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn default_filter(verbose: bool) -> EnvFilter {
    let directives = if verbose { "stockr=debug,info" } else { "stockr=info" };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives))
}

pub fn init_cli_logger(verbose: bool) {
    tracing_subscriber::registry()
        .with(default_filter(verbose))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}

/// The service logs JSON lines when `log_json` is set so the output can be
/// shipped to a collector as-is.
pub fn init_server_logger(verbose: bool, log_json: bool) {
    if !log_json {
        return init_cli_logger(verbose);
    }

    tracing_subscriber::registry()
        .with(default_filter(verbose))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .json(),
        )
        .init();
}

/// Routes tracing events to the browser console. Safe to call more than once.
#[cfg(feature = "web")]
pub fn init_web_logger() {
    console_error_panic_hook::set_once();

    let config = tracing_wasm::WASMLayerConfigBuilder::new()
        .set_max_level(tracing::Level::INFO)
        .set_console_config(tracing_wasm::ConsoleConfig::ReportWithConsoleColor)
        .build();
    let installed = tracing_subscriber::registry()
        .with(tracing_wasm::WASMLayer::new(config))
        .try_init();
    if installed.is_err() {
        tracing::debug!("Browser logger already installed");
    }
}
