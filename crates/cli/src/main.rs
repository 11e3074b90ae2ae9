use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use std::path::{Path, PathBuf};
use tailview_core::logging::{LoggingConfig, init_logging};
use tailview_core::{Config, ConversationId, EditorEmbed, JsonlHistory};
use tailview_ui::{App, AppConfig};

const DEFAULT_CONFIG: &str = "tailview.toml";

/// tailview - follow agent execution logs in the terminal
#[derive(Parser, Debug)]
#[command(name = "tailview")]
#[command(about = "Incremental log viewer with adaptive follow-scroll", long_about = None)]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to tailview.toml (default: ./tailview.toml if present)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Open the viewer on a JSONL patch file
    View {
        /// Patch file to tail
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Conversations to show; cycle with Tab
        #[arg(short = 'n', long = "conversation", value_name = "ID", required = true)]
        conversations: Vec<String>,

        /// Workspace reference opened in the editor panel
        #[arg(short, long, value_name = "REF")]
        workspace: Option<String>,
    },
    /// Write an example configuration file
    InitConfig {
        #[arg(value_name = "PATH", default_value = DEFAULT_CONFIG)]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
    /// Print the editor embed URL for a workspace reference
    EditorUrl {
        #[arg(value_name = "REF")]
        reference: String,
    },
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::InitConfig { path, force } => cmd_init_config(&path, force),
        Commands::EditorUrl { reference } => {
            let config = load_config(cli.config.as_deref(), cli.verbose)?;
            cmd_editor_url(&config, &reference);
            Ok(())
        }
        Commands::View { file, conversations, workspace } => {
            let config = load_config(cli.config.as_deref(), cli.verbose)?;
            cmd_view(config, file, conversations, workspace, cli.verbose)
        }
    }
}

/// Load config from an explicit path, the default file, or built-in defaults
fn load_config(path: Option<&Path>, verbose: bool) -> Result<Config> {
    match path {
        Some(path) => Config::from_file(path).with_context(|| format!("Failed to load config from {}", path.display())),
        None => {
            let default_path = Path::new(DEFAULT_CONFIG);
            if default_path.exists() {
                if verbose {
                    println!("{} Loading config from {}", "Info:".green().bold(), default_path.display());
                }
                Config::from_file(default_path).context("Failed to load config")
            } else {
                if verbose {
                    println!("{} No {} found, using defaults", "Info:".blue().bold(), DEFAULT_CONFIG);
                }
                Ok(Config::default())
            }
        }
    }
}

/// Write `Config::example()` to `path`
fn cmd_init_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!("{} already exists (use --force to overwrite)", path.display());
    }

    std::fs::write(path, Config::example()).context("Failed to write config")?;
    println!("{} Created config at {}", "Success:".green().bold(), path.display());
    Ok(())
}

fn editor_url_line(config: &Config, reference: &str) -> String {
    let embed = EditorEmbed::resolve(&config.editor, Some(reference));
    match embed.url() {
        Some(url) => url.to_string(),
        None => "No editor available".to_string(),
    }
}

fn cmd_editor_url(config: &Config, reference: &str) {
    println!("{}", editor_url_line(config, reference));
}

/// Run the interactive viewer
fn cmd_view(
    config: Config, file: PathBuf, conversations: Vec<String>, workspace: Option<String>, verbose: bool,
) -> Result<()> {
    if !file.exists() {
        anyhow::bail!("Patch file not found: {}", file.display());
    }

    let logging = LoggingConfig::from(config.logging.clone()).without_stderr();
    let logging = if verbose { logging.with_level("debug") } else { logging };
    let _guard = init_logging(Some(logging)).context("Failed to initialize logging")?;

    let conversations: Vec<ConversationId> = conversations.into_iter().map(ConversationId::new).collect();
    tracing::info!(file = %file.display(), conversations = conversations.len(), "starting viewer");

    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    runtime.block_on(async move {
        let source = JsonlHistory::new(file, config.source.clone());
        let app_config =
            AppConfig { viewer: config.viewer, editor: config.editor, workspace, projects: config.projects };
        let mut app = App::new(app_config, Box::new(source), conversations);

        tailview_ui::app::run(&mut app).await.context("Terminal error")
    })
}
