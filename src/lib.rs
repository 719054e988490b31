//! FORMATR client: smart actions and file tools on top of a FORMATR server.
//!
//! Module map:
//!   - actions    : analyzer report types, action → endpoint registry, field rules
//!   - client     : HTTP calls to the server (analyze, multipart uploads, health)
//!   - session    : selected file, action grid and the request state machine
//!   - dispatcher : analyze → render → resolve → execute
//!   - tools      : generic convert, code formatters, translation
//!   - feedback   : log panel, toasts, server status
//!   - cli        : command-line front end

pub mod actions;
pub mod cli;
pub mod client;
pub mod config;
pub mod context;
pub mod dispatcher;
pub mod download;
pub mod error;
pub mod estimate;
pub mod feedback;
pub mod session;
pub mod tools;

use std::process::ExitCode;

/// Entry point for the `formatr` binary.
pub async fn run() -> ExitCode {
    let dotenv = config::load_dotenv();
    env_logger::init();
    if let Some(path) = dotenv {
        log::info!("[STARTUP] Loaded {}", path.display());
    }

    let args: Vec<String> = std::env::args().skip(1).collect();
    let cli = match cli::parse(&args) {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("{}\n\n{}", e, cli::USAGE);
            return ExitCode::from(2);
        }
    };

    match cli::execute(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if e.is_local() => {
            eprintln!("error: {}", e);
            ExitCode::from(2)
        }
        Err(e) => {
            log::error!("[MAIN] {}", e);
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
