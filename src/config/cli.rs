use crate::utils::error::Result;
use clap::{Parser, Subcommand};
use std::io::{BufRead, Write};

#[derive(Debug, Clone, Parser)]
#[command(name = "stockr")]
#[command(about = "Monitor a stock ticker over the past six months")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Analyze a symbol and print its quote table
    Analyze {
        /// The stock symbol to monitor
        #[arg(short, long)]
        symbol: String,

        /// Also write the quotes to this CSV file
        #[arg(long)]
        csv: Option<String>,
    },
    /// Run the stock service and serve the page
    Serve {
        /// The stock symbol suggested to the page on load
        #[arg(short, long)]
        symbol: Option<String>,

        #[arg(short, long)]
        port: Option<u16>,

        #[arg(long)]
        host: Option<String>,
    },
    /// Drive a running service from the terminal
    Watch {
        /// Base URL of the stock service
        #[arg(long)]
        server: Option<String>,
    },
}

pub const SERVE_USAGE: &str = "Required arguments were not provided, please follow the given usage:\n\n    USAGE: stockr serve --symbol <STOCKSYMBOL> --port <PORTNUMBER>\n\n    or use '--help' for extra info";

/// Asks for `<STOCKSYMBOL> <PORTNUMBER>` until a valid pair is entered.
/// Returns `None` on `exit` or end of input.
pub fn prompt_for_server_args<R: BufRead, W: Write>(
    mut input: R,
    mut output: W,
) -> Result<Option<(String, u16)>> {
    writeln!(output, "{}", SERVE_USAGE)?;
    writeln!(
        output,
        "Please Enter '<STOCKSYMBOL> <PORTNUMBER>' or 'exit' to end program: "
    )?;

    let mut line = String::new();
    loop {
        line.clear();
        if input.read_line(&mut line)? == 0 {
            return Ok(None);
        }

        let words: Vec<&str> = line.split_ascii_whitespace().collect();
        match words.as_slice() {
            [word] if word.eq_ignore_ascii_case("exit") => {
                writeln!(output, "Exiting program.")?;
                return Ok(None);
            }
            [symbol, port] => match port.parse::<u16>() {
                Ok(port) if port > 0 => return Ok(Some((symbol.to_uppercase(), port))),
                _ => writeln!(output, "Invalid port number: {}", port)?,
            },
            _ => writeln!(
                output,
                "Invalid input. Please enter a value for each '<STOCKSYMBOL> <PORTNUMBER>' or type 'exit' to quit"
            )?,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve_args() {
        let config = CliConfig::parse_from(["stockr", "serve", "--symbol", "aapl", "--port", "8081", "-v"]);

        assert!(config.verbose);
        match config.command {
            Command::Serve { symbol, port, host } => {
                assert_eq!(symbol.as_deref(), Some("aapl"));
                assert_eq!(port, Some(8081));
                assert_eq!(host, None);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_analyze_requires_symbol() {
        assert!(CliConfig::try_parse_from(["stockr", "analyze"]).is_err());
        let config = CliConfig::parse_from(["stockr", "--config", "stockr.toml", "analyze", "-s", "MSFT"]);
        assert_eq!(config.config.as_deref(), Some("stockr.toml"));
    }

    #[test]
    fn test_prompt_accepts_symbol_and_port() {
        let input = b"\nTSLA\ntsla 8080\n" as &[u8];
        let mut output = Vec::new();

        let answer = prompt_for_server_args(input, &mut output).unwrap();

        assert_eq!(answer, Some(("TSLA".to_string(), 8080)));
        let printed = String::from_utf8(output).unwrap();
        assert_eq!(printed.matches("Invalid input.").count(), 2);
    }

    #[test]
    fn test_prompt_exit_and_eof() {
        let mut output = Vec::new();
        assert_eq!(prompt_for_server_args(b"EXIT\n" as &[u8], &mut output).unwrap(), None);
        assert!(String::from_utf8(output).unwrap().contains("Exiting program."));

        assert_eq!(prompt_for_server_args(b"" as &[u8], Vec::new()).unwrap(), None);
    }

    #[test]
    fn test_prompt_rejects_bad_port() {
        let mut output = Vec::new();
        let answer = prompt_for_server_args(b"AAPL port\nAAPL 0\nAAPL 9000\n" as &[u8], &mut output).unwrap();

        assert_eq!(answer, Some(("AAPL".to_string(), 9000)));
        assert_eq!(String::from_utf8(output).unwrap().matches("Invalid port number").count(), 2);
    }
}
