use anyhow::Context;
use clap::Parser;
use std::io::IsTerminal;
use std::rc::Rc;
use std::sync::Arc;
use stockr::core::report::{render_table, write_csv};
use stockr::frontend::ConsolePage;
use stockr::server::{self, ServiceState, StaticDirs};
use stockr::utils::error::ErrorSeverity;
use stockr::utils::{logger, validation::validate_file_extension, validation::Validate};
use stockr::{boot, CliConfig, Command, HttpModuleLoader, StockMonitor, StockrConfig, StockrError, YahooProvider};

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    if let Err(e) = run(cli).await {
        match e.downcast_ref::<StockrError>() {
            Some(stockr_error) => {
                tracing::error!(
                    "❌ {} (Category: {:?}, Severity: {:?})",
                    e,
                    stockr_error.category(),
                    stockr_error.severity()
                );
                tracing::error!("💡 Recovery suggestion: {}", stockr_error.recovery_suggestion());

                eprintln!("❌ {}", stockr_error.user_friendly_message());
                eprintln!("💡 Suggestion: {}", stockr_error.recovery_suggestion());

                let exit_code = match stockr_error.severity() {
                    ErrorSeverity::Medium => 2,
                    ErrorSeverity::High => 1,
                    ErrorSeverity::Critical => 3,
                };
                std::process::exit(exit_code);
            }
            None => {
                tracing::error!("❌ {:#}", e);
                eprintln!("❌ {:#}", e);
                std::process::exit(1);
            }
        }
    }
}

async fn run(cli: CliConfig) -> anyhow::Result<()> {
    let mut config = StockrConfig::load(cli.config.as_deref())?;

    match cli.command {
        Command::Analyze { symbol, csv } => {
            logger::init_cli_logger(cli.verbose);
            config.validate()?;
            analyze(&config, &symbol, csv.as_deref()).await
        }
        Command::Serve { symbol, port, host } => {
            let (symbol, port) = match (symbol, port) {
                (None, None) if std::io::stdin().is_terminal() => {
                    match stockr::config::cli::prompt_for_server_args(std::io::stdin().lock(), std::io::stdout())? {
                        Some((symbol, port)) => (Some(symbol), Some(port)),
                        None => return Ok(()),
                    }
                }
                other => other,
            };
            config.apply_server_overrides(symbol, port, host);
            logger::init_server_logger(cli.verbose, config.server.log_json);
            config.validate()?;
            serve(config).await
        }
        Command::Watch { server } => {
            logger::init_cli_logger(cli.verbose);
            if server.is_some() {
                config.watch.server_url = server;
            }
            config.validate()?;
            watch(&config).await
        }
    }
}

async fn analyze(config: &StockrConfig, symbol: &str, csv: Option<&str>) -> anyhow::Result<()> {
    let symbol = symbol.trim().to_uppercase();
    let provider = YahooProvider::new(config.provider.base_url.clone(), config.provider_timeout())?;
    let monitor = StockMonitor::new(Arc::new(provider), config.analysis_window());

    tracing::info!(
        "📈 Analyzing {} ({} candles over {})",
        symbol,
        monitor.window().interval,
        monitor.window().range
    );
    let analysis = monitor.analyze_stock(&symbol).await?;
    println!("{}", render_table(&analysis));

    if let Some(path) = csv {
        validate_file_extension("csv", path, &["csv"])?;
        let file = std::fs::File::create(path).with_context(|| format!("creating {}", path))?;
        write_csv(&analysis, file)?;
        tracing::info!("📁 Quotes saved to: {}", path);
        println!("📁 Quotes saved to: {}", path);
    }

    Ok(())
}

async fn serve(config: StockrConfig) -> anyhow::Result<()> {
    let provider = YahooProvider::new(config.provider.base_url.clone(), config.provider_timeout())?;
    let monitor = StockMonitor::new(Arc::new(provider), config.analysis_window());

    if let Some(symbol) = &config.server.default_symbol {
        tracing::info!("Default symbol: {}", symbol);
    }
    let state = ServiceState::new(monitor, config.server.default_symbol.clone());
    let dirs = StaticDirs {
        www_dir: config.server.www_dir.clone(),
        pkg_dir: config.server.pkg_dir.clone(),
    };

    let listener = server::bind(&config.server.host, config.server.port).await?;
    server::serve(listener, state, dirs).await?;
    Ok(())
}

async fn watch(config: &StockrConfig) -> anyhow::Result<()> {
    let server_url = config.watch_server_url();
    tracing::info!("🔗 Connecting to {}", server_url);

    let page = Rc::new(ConsolePage::stdio());
    let loader = HttpModuleLoader::new(server_url, page.clone());
    // boot already reported the failure on the page.
    let Some(_controller) = boot(&loader, page.as_ref()).await else {
        std::process::exit(1);
    };

    page.run(tokio::io::BufReader::new(tokio::io::stdin())).await?;
    Ok(())
}
