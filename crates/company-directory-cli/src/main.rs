// crates/company-directory-cli/src/main.rs
// ============================================================================
// Module: Company Directory CLI Entry Point
// Description: Command dispatcher for serving and config validation.
// Purpose: Provide a localized CLI around the directory HTTP server.
// Dependencies: clap, company-directory-{config, core, server}, thiserror, tokio
// ============================================================================

//! ## Overview
//! The `company-directory` binary starts the HTTP server (`serve`) and checks
//! configuration files (`config validate`). Output is rendered through the
//! directory message catalog in the language chosen by `--lang` or
//! `COMPANY_DIRECTORY_LANG`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::ArgAction;
use clap::Args;
use clap::CommandFactory;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use company_directory_config::DirectoryConfig;
use company_directory_config::StoreType;
use company_directory_core::LanguageCode;
use company_directory_core::t;
use company_directory_server::DirectoryServer;
use company_directory_server::DirectoryServerError;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Environment variable for CLI language selection.
const LANG_ENV: &str = "COMPANY_DIRECTORY_LANG";

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "company-directory", disable_help_subcommand = true, disable_version_flag = true)]
struct Cli {
    /// Print version information and exit.
    #[arg(long = "version", action = ArgAction::SetTrue, global = true)]
    show_version: bool,
    /// Output language (overrides `COMPANY_DIRECTORY_LANG`).
    #[arg(long, value_enum, value_name = "LANG", global = true)]
    lang: Option<LangArg>,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the company directory HTTP server.
    Serve(ServeCommand),
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Configuration for the `serve` command.
#[derive(Args, Debug)]
struct ServeCommand {
    /// Optional config file path (defaults to company-directory.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Validate a company directory configuration file.
    Validate(ConfigValidateCommand),
}

/// Arguments for `config validate`.
#[derive(Args, Debug)]
struct ConfigValidateCommand {
    /// Optional config file path (defaults to company-directory.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Output language selection.
#[derive(ValueEnum, Copy, Clone, Debug)]
enum LangArg {
    /// Korean.
    Ko,
    /// English.
    En,
    /// Japanese.
    Ja,
    /// Traditional Chinese.
    Tw,
}

impl From<LangArg> for LanguageCode {
    fn from(value: LangArg) -> Self {
        match value {
            LangArg::Ko => Self::Ko,
            LangArg::En => Self::En,
            LangArg::Ja => Self::Ja,
            LangArg::Tw => Self::Tw,
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for localized error messages.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`] from a localized message.
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
#[tokio::main(flavor = "multi_thread")]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
async fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    let env_lang = std::env::var(LANG_ENV).ok();
    let language = resolve_language(cli.lang, env_lang.as_deref())?;

    if cli.show_version {
        let version = env!("CARGO_PKG_VERSION");
        write_stdout_line(&t!(language, "cli.version", version = version))
            .map_err(|err| CliError::new(output_error(language, "stdout", &err)))?;
        return Ok(ExitCode::SUCCESS);
    }

    let Some(command) = cli.command else {
        show_help(language)?;
        return Ok(ExitCode::SUCCESS);
    };

    match command {
        Commands::Serve(command) => command_serve(command, language).await,
        Commands::Config {
            command,
        } => command_config(&command, language),
    }
}

/// Resolves the output language from the flag, then the environment.
fn resolve_language(lang: Option<LangArg>, env_lang: Option<&str>) -> CliResult<LanguageCode> {
    if let Some(lang) = lang {
        return Ok(lang.into());
    }
    if let Some(value) = env_lang {
        return LanguageCode::parse(value).ok_or_else(|| {
            CliError::new(t!(LanguageCode::En, "request.language_invalid", value = value))
        });
    }
    Ok(LanguageCode::En)
}

// ============================================================================
// SECTION: Serve Command
// ============================================================================

/// Executes the `serve` command.
async fn command_serve(command: ServeCommand, language: LanguageCode) -> CliResult<ExitCode> {
    let config = DirectoryConfig::load(command.config.as_deref())
        .map_err(|err| CliError::new(t!(language, "cli.config.load_failed", error = err)))?;
    let bind = config.server.bind.clone();
    let store = match config.store.store_type {
        StoreType::Memory => "memory",
        StoreType::Sqlite => "sqlite",
    };

    let server = tokio::task::spawn_blocking(move || DirectoryServer::from_config(config))
        .await
        .map_err(|err| {
            CliError::new(t!(
                language,
                "cli.serve.init_failed",
                error = format!("init join failed: {err}")
            ))
        })?
        .map_err(|err| CliError::new(t!(language, "cli.serve.init_failed", error = err)))?;
    write_stderr_line(&t!(language, "cli.serve.listening", bind = bind, store = store))
        .map_err(|err| CliError::new(output_error(language, "stderr", &err)))?;
    server.serve().await.map_err(|err: DirectoryServerError| {
        CliError::new(t!(language, "cli.serve.failed", error = err))
    })?;

    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Config Commands
// ============================================================================

/// Dispatches config subcommands.
fn command_config(command: &ConfigCommand, language: LanguageCode) -> CliResult<ExitCode> {
    match command {
        ConfigCommand::Validate(command) => command_config_validate(command, language),
    }
}

/// Executes the config validation command.
fn command_config_validate(
    command: &ConfigValidateCommand,
    language: LanguageCode,
) -> CliResult<ExitCode> {
    let _config = DirectoryConfig::load(command.config.as_deref())
        .map_err(|err| CliError::new(t!(language, "cli.config.load_failed", error = err)))?;
    write_stdout_line(&t!(language, "cli.config.valid"))
        .map_err(|err| CliError::new(output_error(language, "stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Emits the top-level help message for the CLI.
fn show_help(language: LanguageCode) -> CliResult<()> {
    let mut command = Cli::command();
    command
        .print_help()
        .map_err(|err| CliError::new(output_error(language, "stdout", &err)))?;
    write_stdout_line("").map_err(|err| CliError::new(output_error(language, "stdout", &err)))
}

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats a localized output error message.
fn output_error(language: LanguageCode, stream: &str, error: &std::io::Error) -> String {
    t!(language, "cli.output.write_failed", stream = stream, error = error)
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}

// ============================================================================
// SECTION: Tests
// ============================================================================
