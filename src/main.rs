//! # toolbridge - request translation proxy
//!
//! Serves the request translator over HTTP, or runs it once from the command
//! line. OpenAI chat-completion requests, Claude content-block requests and
//! mixtures of both are turned into one canonical backend request.
//!
//! ## Quick Start
//!
//! ```bash
//! # Serve on 127.0.0.1:3000
//! toolbridge
//!
//! # Translate a captured request
//! toolbridge translate request.json --model gemini-2.5-pro
//!
//! # Over HTTP
//! curl -X POST 'http://localhost:3000/v1/translate?model=gemini-2.5-pro' \
//!   -H "Content-Type: application/json" \
//!   -d '{"messages": [{"role": "user", "content": "Hello!"}]}'
//! ```
//!
//! Authors: Jaro <yarenty@gmail.com>
//!
//! Copyright (c) 2026 SkyCorp
//!

/* --- uses ------------------------------------------------------------------------------------ */

use std::env;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

use toolbridge::config::{self, Config, ValidationSeverity};
use toolbridge::translator::{CorrelationPolicy, IncomingRequest, RequestTranslator};
use toolbridge::{BridgeError, create_app};

/* --- constants ------------------------------------------------------------------------------ */

/** the version as defined in cargo.toml */
const VERSION: &str = env!("CARGO_PKG_VERSION");

/* --- types ----------------------------------------------------------------------------------- */

///
/// Parsed command line.
#[derive(Debug, PartialEq)]
struct CliArgs {
    /** explicit config file from `--config` */
    config_path: Option<PathBuf>,
    /** what to run */
    command: Command,
}

#[derive(Debug, PartialEq)]
enum Command {
    Serve,
    Translate(TranslateArgs),
    Validate,
    ConfigExample,
    Help,
    Version,
}

///
/// Options of the one-shot `translate` command.
#[derive(Debug, Default, PartialEq)]
struct TranslateArgs {
    /** input file, `-` for stdin */
    input: String,
    /** target model; falls back to the body, then the configured default */
    model: Option<String>,
    /** add the web search tool */
    grounding: bool,
    /** fail on unresolved tool results */
    strict: bool,
}

/* --- start of code -------------------------------------------------------------------------- */

///
/// Application entry point.
///
/// Parses the command line, loads `.env` and configuration, then dispatches.
#[tokio::main]
async fn main() {
    let args: Vec<String> = env::args().skip(1).collect();

    let cli = match parse_args(&args) {
        Ok(cli) => cli,
        Err(message) => {
            eprintln!("Error: {}", message);
            eprintln!();
            print_help();
            std::process::exit(1);
        }
    };

    let code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error:");
            for line in format!("{:#}", e).lines() {
                eprintln!("{}", line);
            }
            1
        }
    };

    std::process::exit(code);
}

async fn run(cli: CliArgs) -> anyhow::Result<i32> {
    match cli.command {
        Command::Help => {
            print_help();
            Ok(0)
        }
        Command::Version => {
            println!("toolbridge {}", VERSION);
            Ok(0)
        }
        Command::ConfigExample => {
            print!("{}", Config::example_toml());
            Ok(0)
        }
        Command::Validate => Ok(run_validate(cli.config_path.as_deref())),
        Command::Translate(args) => {
            let config = initialize_config(cli.config_path.as_deref())?;
            initialize_logging(&config);
            run_translate(&config, &args)?;
            Ok(0)
        }
        Command::Serve => {
            let config = initialize_config(cli.config_path.as_deref())?;
            initialize_logging(&config);
            config.validate()?;
            start_server(config).await?;
            Ok(0)
        }
    }
}

///
/// Parse command line arguments (without the program name).
///
/// # Arguments
///  * `args` - raw arguments
///
/// # Returns
///  * Parsed command line
///  * A message describing the first unusable argument
fn parse_args(args: &[String]) -> Result<CliArgs, String> {
    let mut config_path = None;
    let mut rest = args.iter();
    let mut positional: Vec<&String> = Vec::new();
    let mut translate = TranslateArgs::default();

    while let Some(arg) = rest.next() {
        match arg.as_str() {
            "--version" | "-V" => {
                return Ok(CliArgs { config_path, command: Command::Version });
            }
            "--help" | "-h" => return Ok(CliArgs { config_path, command: Command::Help }),
            "--config" | "-c" => {
                let path = rest.next().ok_or("--config requires a file path")?;
                config_path = Some(PathBuf::from(path));
            }
            "--model" | "-m" => {
                let model = rest.next().ok_or("--model requires a model id")?;
                translate.model = Some(model.clone());
            }
            "--grounding" => translate.grounding = true,
            "--strict" => translate.strict = true,
            "-" => positional.push(arg),
            other if other.starts_with('-') => return Err(format!("Unknown option: {}", other)),
            _ => positional.push(arg),
        }
    }

    let uses_translate_options = translate.model.is_some() || translate.grounding || translate.strict;

    let command = match positional.as_slice() {
        [] => Command::Serve,
        [cmd] if cmd.as_str() == "validate" => Command::Validate,
        [cmd, sub] if cmd.as_str() == "config" && sub.as_str() == "example" => {
            Command::ConfigExample
        }
        [cmd, input] if cmd.as_str() == "translate" => {
            translate.input = input.to_string();
            return Ok(CliArgs { config_path, command: Command::Translate(translate) });
        }
        [cmd] if cmd.as_str() == "translate" => {
            return Err("translate requires an input file or '-' for stdin".to_string());
        }
        [cmd, ..] => return Err(format!("Unknown command: {}", cmd)),
    };

    if uses_translate_options {
        return Err("--model, --grounding and --strict only apply to 'translate'".to_string());
    }

    Ok(CliArgs { config_path, command })
}

///
/// Print help information for the toolbridge CLI.
fn print_help() {
    println!("toolbridge v{}", VERSION);
    println!("Translates mixed OpenAI / Claude chat requests into canonical backend requests");
    println!();
    println!("USAGE:");
    println!("    toolbridge [OPTIONS] [COMMAND]");
    println!();
    println!("COMMANDS:");
    println!("    (none)                          Start the HTTP server");
    println!("    translate <FILE|-> [OPTIONS]    Translate one request and print it");
    println!("    validate                        Validate configuration and exit");
    println!("    config example                  Print a documented configuration file");
    println!();
    println!("OPTIONS:");
    println!("    -c, --config <FILE>     Load this config file after the user config");
    println!("    -m, --model <ID>        Target model (translate)");
    println!("        --grounding         Add the web search tool (translate)");
    println!("        --strict            Reject unresolved tool results (translate)");
    println!("    -h, --help              Print help information");
    println!("    -V, --version           Print version information");
    println!();
    println!("ENVIRONMENT VARIABLES:");
    println!("    TOOLBRIDGE_SERVER_HOST                     Bind address (default: 127.0.0.1)");
    println!("    TOOLBRIDGE_SERVER_PORT                     Server port (default: 3000)");
    println!(
        "    TOOLBRIDGE_SERVER_LOG_LEVEL                trace, debug, info, warn, error (default: info)"
    );
    println!("    TOOLBRIDGE_TRANSLATOR_CORRELATION_POLICY   lenient or strict (default: lenient)");
    println!("    TOOLBRIDGE_TRANSLATOR_DEFAULT_MODEL        Fallback model id");
    println!("    TOOLBRIDGE_CAPTURE_ENABLED                 Write requests to disk (default: false)");
    println!("    RUST_LOG                                   Overrides the log filter");
    println!();
    println!("Config files are read from:");
    for path in config::paths::config_file_paths().iter().rev() {
        println!("    {}", path.display());
    }
}

///
/// Run the validate command.
///
/// Returns exit code 0 if valid, 1 if invalid.
fn run_validate(config_path: Option<&Path>) -> i32 {
    let config = match initialize_config(config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("[ERROR] Configuration error: {:#}", e);
            return 1;
        }
    };

    let issues = config::validation::ConfigValidator::new(&config).issues();
    let mut errors = 0;

    for issue in &issues {
        let label = match issue.severity {
            ValidationSeverity::Error => {
                errors += 1;
                "[ERROR]"
            }
            ValidationSeverity::Warning => "[WARNING]",
        };
        eprintln!("{} {}: {}", label, issue.field, issue.message);
        if let Some(suggestion) = &issue.suggestion {
            eprintln!("    Suggestion: {}", suggestion);
        }
    }

    if errors == 0 {
        println!("[OK] Configuration is valid");
        0
    } else {
        eprintln!("[ERROR] Configuration validation failed with {} error(s)", errors);
        1
    }
}

///
/// Run the one-shot translate command.
///
/// # Arguments
///  * `config` - loaded configuration
///  * `args` - translate options
///
/// # Returns
///  * `Ok(())` after the translation was printed to stdout
///  * An error if the input cannot be read or translated
fn run_translate(config: &Config, args: &TranslateArgs) -> anyhow::Result<()> {
    let body = read_input(&args.input)?;

    let mut options = config.translate_options();
    if args.strict {
        options.correlation_policy = CorrelationPolicy::Strict;
    }

    let translator = RequestTranslator::new(options);
    let request = IncomingRequest::from_slice(&body)?;
    let grounding = args.grounding || config.translator.grounding;
    let canonical =
        translator.translate_request(args.model.as_deref().unwrap_or_default(), request, grounding)?;

    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &canonical).map_err(BridgeError::from)?;
    writeln!(stdout).context("Failed to write translation")?;
    Ok(())
}

/// Read the request body from a file or stdin (`-`)
fn read_input(input: &str) -> anyhow::Result<Vec<u8>> {
    if input == "-" {
        let mut body = Vec::new();
        std::io::stdin().read_to_end(&mut body).context("Failed to read request from stdin")?;
        return Ok(body);
    }

    let path = config::paths::expand_path(input)?;
    std::fs::read(&path).with_context(|| format!("Failed to read request file '{}'", path.display()))
}

///
/// Load configuration: `.env`, config files, then environment variables.
///
/// # Arguments
///  * `config_path` - optional explicit config file
///
/// # Returns
///  * Loaded configuration
fn initialize_config(config_path: Option<&Path>) -> anyhow::Result<Config> {
    if let Ok(path) = dotenvy::dotenv() {
        tracing::debug!("Loaded environment from {}", path.display());
    }

    if let Some(path) = config_path {
        if !path.exists() {
            bail!("Config file '{}' does not exist", path.display());
        }
    }

    Ok(Config::load(config_path)?)
}

///
/// Initialize logging with the configured log level.
///
/// `RUST_LOG` takes precedence over the configured level. Logs go to stderr so
/// that `translate` output on stdout stays clean.
///
/// # Arguments
///  * `config` - application configuration containing log level settings
fn initialize_logging(config: &Config) {
    let default_level = LevelFilter::from_level(config.server.log_level.to_tracing_level());
    let filter =
        EnvFilter::builder().with_default_directive(default_level.into()).from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

///
/// Start the HTTP server and log startup information.
///
/// # Arguments
///  * `config` - application configuration
///
/// # Returns
///  * `Ok(())` when the server shuts down gracefully
///  * `BridgeError::Http` if binding or serving fails
async fn start_server(config: Config) -> Result<(), BridgeError> {
    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await.map_err(|e| {
        let error_msg = format!("Failed to bind to {}: {}", address, e);

        if e.kind() == std::io::ErrorKind::AddrInUse {
            BridgeError::Http(format!(
                "{}\n\n\
                 Port {} is already in use. Either stop the other process\n\
                 (lsof -i :{}) or pick another port:\n\
                   TOOLBRIDGE_SERVER_PORT=3001 toolbridge",
                error_msg, config.server.port, config.server.port
            ))
        } else {
            BridgeError::Http(format!(
                "{}\n\n\
                 Check that the address is valid and that you may bind to port {}.",
                error_msg, config.server.port
            ))
        }
    })?;

    log_startup_info(&config);
    let app = create_app(config)?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| BridgeError::Http(format!("Server error: {}", e)))?;

    info!("Server stopped");
    Ok(())
}

/// Resolves on Ctrl-C
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}

///
/// Log startup information and configuration details.
///
/// # Arguments
///  * `config` - application configuration
fn log_startup_info(config: &Config) {
    info!("toolbridge v{} listening on {}", VERSION, config.bind_address());
    info!("Translate endpoint: http://{}/v1/translate?model=<id>", config.bind_address());
    info!("Correlation policy: {:?}", config.translator.correlation_policy);

    if config.server.log_level.is_trace_enabled() {
        info!(
            "[TRACE] Trace logging is ENABLED ({:?}) - translation steps will be logged",
            config.server.log_level
        );
    }
}

/* --- tests ----------------------------------------------------------------------------------- */
