//! ifw - interactive infrastructure assistant
//!
//! Starts the REPL: shell commands run on a persistent PTY-backed session,
//! everything else goes to the assistant backend.

use std::env;
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::process;

use tracing::{debug, error, info};

use ifw::cli::{Controller, OfflineAssistant};
use ifw::error::Result;
use ifw::InteractiveShell;

/// Command line options
#[derive(Debug, Default)]
struct AppArgs {
    /// Configuration file path
    config_path: Option<PathBuf>,
    /// Enable debug logging
    debug: bool,
}

impl AppArgs {
    /// Parse command line arguments
    fn parse() -> Result<Self> {
        let args: Vec<String> = env::args().collect();
        let mut app_args = AppArgs::default();

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--config" | "-c" => {
                    if i + 1 < args.len() {
                        app_args.config_path = Some(PathBuf::from(&args[i + 1]));
                        i += 1;
                    } else {
                        return Err("Missing config file path".into());
                    }
                }
                "--debug" | "-d" => {
                    app_args.debug = true;
                }
                "--help" | "-h" => {
                    print_help();
                    process::exit(0);
                }
                "--version" | "-V" => {
                    println!("{} v{}", ifw::NAME, ifw::VERSION);
                    process::exit(0);
                }
                arg => {
                    return Err(format!("Unknown option: {}", arg).into());
                }
            }
            i += 1;
        }

        Ok(app_args)
    }
}

/// Print help information
fn print_help() {
    println!("{} - {}", ifw::NAME, ifw::DESCRIPTION);
    println!();
    println!("USAGE:");
    println!("    ifw [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    -c, --config <PATH>    Path to configuration file");
    println!("    -d, --debug            Enable debug logging");
    println!("    -h, --help             Print this help message");
    println!("    -V, --version          Print version information");
    println!();
    println!("CONFIGURATION:");
    println!("    ifw looks for configuration files in the following order:");
    println!("    1. Path specified with --config");
    println!("    2. $IFW_CONFIG");
    println!("    3. $XDG_CONFIG_HOME/ifw/config.toml (or config.json)");
    println!("    4. ~/.ifw/config.toml (or config.json)");
    println!("    5. Built-in defaults");
    println!();
    println!("ENVIRONMENT:");
    println!("    IFW_CONFIG     Path to configuration file");
    println!("    IFW_DEBUG      Enable debug logging (1 or true)");
    println!("    RUST_LOG       Set logging level (error, warn, info, debug, trace)");
    println!("    SHELL          Shell used to run commands");
}

#[tokio::main]
async fn main() {
    let args = AppArgs::parse().unwrap_or_else(|e| {
        eprintln!("Failed to parse arguments: {}", e);
        print_help();
        process::exit(2);
    });

    let config = ifw::load_config(args.config_path.as_deref());

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(ifw::log_filter(
            args.debug, &config,
        )))
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .init();

    info!("Starting {} v{}", ifw::NAME, ifw::VERSION);

    let shell = match InteractiveShell::new(&config) {
        Ok(shell) => shell,
        Err(e) => {
            error!("Failed to start shell session: {}", e);
            eprintln!("{}", e.to_display_text());
            process::exit(1);
        }
    };

    let mut controller = Controller::new(shell, Box::new(OfflineAssistant));
    let interrupt = controller.interrupt_handle();

    // Ctrl-C at the caller's terminal goes to the running command's group
    tokio::spawn(async move {
        loop {
            if tokio::signal::ctrl_c().await.is_err() {
                break;
            }
            if !interrupt.interrupt() && io::stdout().is_terminal() {
                println!();
                println!("(type 'exit' or press Ctrl-D to quit)");
            }
        }
    });

    let repl = tokio::task::spawn_blocking(move || {
        // Stdout stays unlocked: the PTY pump mirrors to it from its own thread
        controller.run(io::stdin().lock(), io::stdout())
    });

    match repl.await {
        Ok(Ok(())) => debug!("REPL finished"),
        Ok(Err(e)) => {
            error!("REPL failed: {}", e);
            process::exit(1);
        }
        Err(e) => {
            error!("REPL task failed: {}", e);
            process::exit(1);
        }
    }
}
