//! mocopro - MCP servers from GitHub, run in containers
//!
//! Usage:
//!   mocopro install owner/repo       # Clone and build a server image
//!   mocopro start <name> --detach    # Run it in the background
//!   mocopro setup claude add <name>  # Register it with the Claude CLI

use std::process::ExitCode;

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mocopro_core::client::{ClientKind, SetupScope};
use mocopro_core::commands::{ServerListEntry, ServerManager};

#[derive(Parser)]
#[command(name = "mocopro")]
#[command(about = "CLI tool to manage MCP servers locally", long_about = None)]
#[command(version)]
struct Cli {
    /// Log what mocopro is doing
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Install an MCP server from a GitHub repository
    Install {
        /// GitHub repository (owner/repo, owner/repo#ref or full URL)
        repository: String,
    },

    /// Uninstall an MCP server
    #[command(alias = "rm")]
    Uninstall {
        /// Name of the server to uninstall
        server: String,
    },

    /// Update an installed MCP server
    Update {
        /// Name of the server to update
        server: String,
    },

    /// List all installed MCP servers
    #[command(alias = "ls")]
    List {
        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Start an MCP server
    Start {
        /// Name of the server to start
        server: String,

        /// Run the server in the background
        #[arg(short, long, conflicts_with = "foreground")]
        detach: bool,

        /// Run attached even when `default_detach` is set
        #[arg(long)]
        foreground: bool,
    },

    /// Stop a running MCP server
    Stop {
        /// Name of the server to stop
        server: String,
    },

    /// Manage environment variables for MCP servers
    Env(EnvArgs),

    /// Configure MCP clients to use installed servers
    Setup(SetupArgs),
}

#[derive(Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    /// Human-readable listing
    #[default]
    Table,
    /// Machine-readable JSON
    Json,
}

#[derive(Args)]
struct EnvArgs {
    #[command(subcommand)]
    command: EnvSubcommand,
}

#[derive(Subcommand)]
enum EnvSubcommand {
    /// List environment variables for a server
    List {
        /// Name of the server
        server: String,
    },

    /// Set environment variables for a server
    Set {
        /// Name of the server
        server: String,
        /// Environment variables in KEY=value format
        #[arg(required = true)]
        pairs: Vec<String>,
    },

    /// Remove environment variables from a server
    Unset {
        /// Name of the server
        server: String,
        /// Variable names to remove
        #[arg(required = true)]
        keys: Vec<String>,
    },
}

#[derive(Args)]
struct SetupArgs {
    #[command(subcommand)]
    client: SetupClient,
}

#[derive(Subcommand)]
enum SetupClient {
    /// Claude CLI (~/.claude.json or ./.mcp.json)
    Claude {
        #[command(subcommand)]
        action: SetupAction,
    },
}

impl SetupClient {
    fn into_parts(self) -> (ClientKind, SetupAction) {
        match self {
            SetupClient::Claude { action } => (ClientKind::ClaudeCode, action),
        }
    }
}

#[derive(Subcommand)]
enum SetupAction {
    /// Add a server to the client configuration
    Add {
        /// Name of the server
        server: String,
        /// Edit the user-wide configuration instead of the project one
        #[arg(short, long)]
        global: bool,
    },

    /// Remove a server from the client configuration
    Remove {
        /// Name of the server
        server: String,
        /// Edit the user-wide configuration instead of the project one
        #[arg(short, long)]
        global: bool,
    },
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            // Help and version go to stdout and are not failures.
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    let default_filter = if cli.verbose {
        "mocopro=debug"
    } else {
        "mocopro=warn"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run_cli(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run_cli(command: Commands) -> Result<()> {
    let manager = ServerManager::with_defaults()?;

    match command {
        Commands::Install { repository } => {
            let report = manager.install(&repository)?;
            println!("Successfully installed \"{}\".", report.name);
            println!("  Repository: {}/{}", report.owner, report.repository);
            println!("  Image: {}", report.image);
            println!("Run \"mocopro start {}\" to start the server.", report.name);
        }
        Commands::Uninstall { server } => {
            let report = manager.uninstall(&server)?;
            for warning in &report.warnings {
                eprintln!("Warning: {warning}");
            }
            println!("Successfully uninstalled \"{}\".", report.name);
        }
        Commands::Update { server } => {
            let report = manager.update(&server)?;
            println!("Successfully updated \"{}\" ({}).", report.name, report.image);
        }
        Commands::List { format } => {
            let entries = manager.list()?;
            match format {
                OutputFormat::Table => print_server_list(&entries),
                OutputFormat::Json => print_server_json(&entries)?,
            }
        }
        Commands::Start {
            server,
            detach,
            foreground,
        } => {
            let detach = detach_flag(detach, foreground);
            let report = manager.start(&server, detach)?;
            if report.detached {
                println!("Server \"{}\" is now running in the background.", report.name);
                println!("Use \"mocopro stop {}\" to stop it.", report.name);
            }
        }
        Commands::Stop { server } => {
            let report = manager.stop(&server)?;
            println!("Server \"{}\" has been stopped.", report.name);
        }
        Commands::Env(args) => run_env(&manager, args.command)?,
        Commands::Setup(args) => run_setup(&manager, args.client)?,
    }
    Ok(())
}

/// `None` lets the `default_detach` setting decide.
fn detach_flag(detach: bool, foreground: bool) -> Option<bool> {
    match (detach, foreground) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

fn run_env(manager: &ServerManager, command: EnvSubcommand) -> Result<()> {
    match command {
        EnvSubcommand::List { server } => {
            let report = manager.env_list(&server)?;
            if report.variables.is_empty() {
                println!("No environment variables set for \"{}\".", report.name);
                println!(
                    "Use \"mocopro env set {} KEY=value\" to add one.",
                    report.name
                );
                return Ok(());
            }
            println!("Environment variables for \"{}\":", report.name);
            for (key, value) in &report.variables {
                println!("  {key}={value}");
            }
        }
        EnvSubcommand::Set { server, pairs } => {
            let report = manager.env_set(&server, pairs.as_slice())?;
            println!(
                "Environment variables updated for \"{}\": {}",
                report.name,
                report.keys.join(", ")
            );
        }
        EnvSubcommand::Unset { server, keys } => {
            let report = manager.env_unset(&server, keys.as_slice())?;
            for key in &report.missing {
                eprintln!("Warning: \"{key}\" is not set for \"{}\".", report.name);
            }
            println!("Environment variables updated for \"{}\".", report.name);
        }
    }
    Ok(())
}

fn run_setup(manager: &ServerManager, client: SetupClient) -> Result<()> {
    let (kind, action) = client.into_parts();
    match action {
        SetupAction::Add { server, global } => {
            let report = manager.setup_add(kind, SetupScope::from_global_flag(global), &server)?;
            println!(
                "Server \"{}\" has been added to {} configuration.",
                report.name, report.client
            );
            println!("Configuration file: {}", report.config_path.display());
        }
        SetupAction::Remove { server, global } => {
            let report =
                manager.setup_remove(kind, SetupScope::from_global_flag(global), &server)?;
            println!(
                "Server \"{}\" has been removed from {} configuration.",
                report.name, report.client
            );
            println!("Configuration file: {}", report.config_path.display());
        }
    }
    Ok(())
}

fn print_server_list(entries: &[ServerListEntry]) {
    if entries.is_empty() {
        println!("No MCP servers installed.");
        println!("Use \"mocopro install <repository>\" to install a server.");
        return;
    }

    println!("Installed MCP servers:\n");
    for entry in entries {
        let record = &entry.record;
        let indicator = if entry.state.is_running() { "●" } else { "○" };
        println!("{} {}", indicator, record.name);
        println!("  Repository: {}/{}", record.owner, record.repository);
        println!("  Branch: {}", record.branch);
        println!("  Image: {}", record.image_reference());
        println!("  Status: {}", entry.state);
        println!(
            "  Installed: {}",
            record.installed_at.format("%Y-%m-%d %H:%M:%S UTC")
        );
        println!(
            "  Updated: {}",
            record.updated_at.format("%Y-%m-%d %H:%M:%S UTC")
        );
        println!();
    }
}

fn print_server_json(entries: &[ServerListEntry]) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(entries)?);
    Ok(())
}
