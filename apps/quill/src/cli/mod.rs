//! CLI command handling for quill

mod setup;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use quill_config::{logging::language_span, AppConfig};
use quill_lsp::{ServerStdio, SetupReport};
use quill_plugin_api::{ExecuteMode, Language, LanguageRegistry, OutputSinks};
use std::path::{Path, PathBuf};
use tracing::{info, warn, Instrument};

/// The main CLI struct.
#[derive(Parser)]
#[command(name = "quill")]
#[command(about = "Language settings, builds and language servers from one front end")]
#[command(version)]
pub struct Cli {
    /// Directory holding quill.toml or .quill/config.toml
    #[arg(long, global = true)]
    pub config_dir: Option<PathBuf>,

    /// The command to run.
    #[command(subcommand)]
    pub command: Commands,
}

/// The available commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List supported languages
    Languages,
    /// Show a language's options and their current values
    Options {
        language: String,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Print one option's value
    Get { language: String, option: String },
    /// Set an option and persist it to the settings file
    ///
    /// Workspace descriptors follow settings only while a workspace is
    /// attached; pass --workspace to update one now, otherwise the next
    /// `workspace` or `lsp` run picks the value up.
    Set {
        language: String,
        option: String,
        value: String,
        /// Re-render this language server workspace with the new value
        #[arg(long)]
        workspace: Option<PathBuf>,
    },
    /// Compile the configured sources, then run them if enabled
    Build {
        language: String,
        /// Run after compiling regardless of the `execute` setting
        #[arg(long, conflicts_with = "no_execute")]
        execute: bool,
        /// Stop after compiling regardless of the `execute` setting
        #[arg(long)]
        no_execute: bool,
    },
    /// Prepare a language server workspace without starting the server
    Workspace { language: String, dir: PathBuf },
    /// Start the language server for a workspace and bridge it to stdio
    Lsp { language: String, dir: PathBuf },
}

pub async fn run(command: Commands, config: &AppConfig) -> anyhow::Result<()> {
    let registry = setup::build_registry(config)?;

    match command {
        Commands::Languages => {
            list_languages(&registry);
            Ok(())
        }
        Commands::Options { language, json } => {
            let language = setup::find(&registry, &language)?;
            show_options(language.as_ref(), json)
        }
        Commands::Get { language, option } => {
            let language = setup::find(&registry, &language)?;
            match language.settings().get_by_name(&option)? {
                Some(value) => println!("{}", value),
                None => println!("<unset>"),
            }
            Ok(())
        }
        Commands::Set {
            language,
            option,
            value,
            workspace,
        } => {
            let language = setup::find(&registry, &language)?;
            let _span = language_span(language.name(), "set").entered();

            // Attach first so the change below renders into the descriptors
            if let Some(dir) = workspace {
                let dir = setup::absolute(dir)?;
                let report = server_of(language.as_ref())?.prepare_workspace(&dir)?;
                print_report(&report, &dir);
            }
            language.settings().set_by_name(&option, &value)?;

            let file = setup::settings_file(config, language.as_ref());
            file.save_from(language.settings())?;
            info!(option = %option, path = %file.path().display(), "Setting saved");
            Ok(())
        }
        Commands::Build {
            language,
            execute,
            no_execute,
        } => {
            let language = setup::find(&registry, &language)?;
            let mode = match (execute, no_execute) {
                (true, _) => ExecuteMode::ForceExecute,
                (_, true) => ExecuteMode::ForceNoExecute,
                _ => ExecuteMode::UseConfigured,
            };
            let _span = language_span(language.name(), "build").entered();
            build(language.as_ref(), mode)
        }
        Commands::Workspace { language, dir } => {
            let language = setup::find(&registry, &language)?;
            let dir = setup::absolute(dir)?;
            let _span = language_span(language.name(), "workspace").entered();

            let server = server_of(language.as_ref())?;
            let report = server.prepare_workspace(&dir)?;
            print_report(&report, &dir);
            if !report.is_clean() {
                bail!(
                    "{} workspace setup had {} failure(s)",
                    language.name(),
                    report.failures.len()
                );
            }
            Ok(())
        }
        Commands::Lsp { language, dir } => {
            let language = setup::find(&registry, &language)?;
            let dir = setup::absolute(dir)?;
            let span = language_span(language.name(), "lsp");
            serve(language.as_ref(), dir).instrument(span).await
        }
    }
}

fn list_languages(registry: &LanguageRegistry) {
    for language in registry.iter() {
        let capabilities = language.capabilities();
        let mut features = Vec::new();
        if capabilities.language_server {
            features.push(if language.server().is_some() {
                "lsp"
            } else {
                "lsp (not installed)"
            });
        }
        if capabilities.interpreted {
            features.push("interpreted");
        }
        println!(
            "{:<8} .{:<6} {}",
            language.name(),
            language.file_extensions().join(" ."),
            features.join(", ")
        );
    }
}

fn show_options(language: &dyn Language, json: bool) -> anyhow::Result<()> {
    let options = language.settings().options();

    if json {
        let entries: Vec<serde_json::Value> = options
            .iter()
            .map(|option| {
                serde_json::json!({
                    "name": option.name,
                    "required": option.required,
                    "kind": option.kind.as_str(),
                    "value": option.value.as_ref().map(|v| v.to_string()),
                })
            })
            .collect();
        let document = serde_json::json!({
            "language": language.name(),
            "options": entries,
        });
        println!("{}", serde_json::to_string_pretty(&document)?);
        return Ok(());
    }

    for option in options {
        let value = option
            .value
            .map(|v| v.to_string())
            .unwrap_or_else(|| "<unset>".to_string());
        let marker = if option.required { "*" } else { " " };
        println!(
            "{}{:<18} {:<6} {}",
            marker,
            option.name,
            option.kind.as_str(),
            value
        );
    }
    Ok(())
}

fn build(language: &dyn Language, mode: ExecuteMode) -> anyhow::Result<()> {
    let program = language.program_output();
    let compiler = language.compiler_output();
    let mut sinks = OutputSinks::to_files(program.as_deref(), compiler.as_deref())?;

    let result = language.compile_and_execute(mode, &mut sinks);
    sinks.flush()?;
    let result = result?;

    for diagnostic in &result.diagnostics {
        eprintln!("{}", diagnostic);
    }
    info!(status = %result.status, "Build finished");

    if !result.status.is_success() {
        if let Some(link) = language.runtime_download_link() {
            warn!(link, "Check that a {} runtime is installed", language.name());
        }
        bail!("{} build ended with {}", language.name(), result.status);
    }
    Ok(())
}

fn server_of(language: &dyn Language) -> anyhow::Result<&quill_lsp::ServerWrapper> {
    if !language.capabilities().language_server {
        bail!("{} has no language server support", language.name());
    }
    language.server().with_context(|| {
        format!(
            "No {} language server found; set languages.{}.serverInstallPath",
            language.name(),
            language.name().to_ascii_lowercase()
        )
    })
}

fn print_report(report: &SetupReport, dir: &Path) {
    if report.copied_template {
        println!("Initialized {}", dir.display());
    }
    for failure in &report.failures {
        eprintln!("{}", failure);
    }
}

async fn serve(language: &dyn Language, dir: PathBuf) -> anyhow::Result<()> {
    let server = server_of(language)?;
    let report = server.launch(&dir).await?;
    for failure in &report.failures {
        warn!(error = %failure, "Continuing with incomplete workspace");
    }

    let ServerStdio {
        mut stdin,
        mut stdout,
    } = server
        .take_stdio()
        .await
        .context("Language server stdio unavailable")?;

    let to_server = tokio::spawn(async move {
        tokio::io::copy(&mut tokio::io::stdin(), &mut stdin).await
    });
    let from_server = tokio::spawn(async move {
        tokio::io::copy(&mut stdout, &mut tokio::io::stdout()).await
    });

    tokio::select! {
        signal = tokio::signal::ctrl_c() => {
            signal.context("Failed to listen for interrupt")?;
            info!("Interrupted");
        }
        copied = from_server => {
            match copied {
                Ok(Ok(bytes)) => info!(bytes, "Language server closed its output"),
                Ok(Err(e)) => warn!(error = %e, "Lost language server output"),
                Err(e) => warn!(error = %e, "Output bridge stopped"),
            }
        }
    }

    to_server.abort();
    server.shutdown().await?;
    Ok(())
}
