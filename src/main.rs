//! # Herald CLI
//!
//! Rotating announcements with legacy color codes and centered chat lines.
//!
//! Usage:
//!   herald run                  # Start the rotation and accept console commands
//!   herald announce <name>      # Send one message now
//!   herald preview <name>       # Show how a message renders
//!   herald list                 # List message files
//!   herald init                 # Write default config and example messages
//!   herald config show          # Show configuration

mod app;

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use herald_core::HeraldConfig;
use herald_scheduler::MessageLoader;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use crate::app::{ConsoleCommand, Herald};

#[derive(Parser)]
#[command(
    name = "herald",
    version,
    about = "📣 Herald: rotating announcements with legacy color codes",
    long_about = "Rotates announcement messages on a fixed interval.\nMessages are JSON files; chat lines accept &-codes and <tags> and can be centered."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the rotation and read commands from stdin
    Run,

    /// Send one message immediately
    Announce {
        /// Message name (path under the messages dir, `.json` optional)
        name: String,
    },

    /// Print the rendered lines of a message without sending it
    Preview {
        /// Message name
        name: String,
    },

    /// List message files
    List,

    /// Write default config and example messages
    Init,

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration
    Show,
    /// Print the config file path
    Path,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    // Initialize logging
    let filter = if cli.verbose {
        "herald=debug,herald_core=debug,herald_markup=debug,herald_scheduler=debug,herald_channels=debug"
    } else {
        peek_config(config_path).log_filter()
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_target(false)
        .init();

    match cli.command {
        Commands::Run => run(config_path).await?,

        Commands::Announce { name } => {
            let herald = Herald::open(config_path)?;
            match herald.announce(&name).await {
                Ok(report) => println!("✅ Announcement '{name}' sent: {report}"),
                Err(e) => anyhow::bail!(herald.describe_failure(&name, &e)),
            }
        }

        Commands::Preview { name } => {
            let herald = Herald::open(config_path)?;
            match herald.preview(&name) {
                Ok(lines) => {
                    for line in lines {
                        println!("{line}");
                    }
                }
                Err(e) => anyhow::bail!(herald.describe_failure(&name, &e)),
            }
        }

        Commands::List => {
            let herald = Herald::open(config_path)?;
            let messages = herald.list()?;
            println!("📋 Messages in {}\n", herald.config().messages_path().display());
            if messages.is_empty() {
                println!("  (no message files)");
            }
            for msg in messages {
                if msg.enabled {
                    println!("  ✅ {} (priority {})", msg.name, msg.priority);
                } else {
                    println!("  ⬜ {} (disabled)", msg.name);
                }
            }
        }

        Commands::Init => {
            println!("📣 Herald First-time Setup\n");
            let path = config_path
                .map(Path::to_path_buf)
                .unwrap_or_else(HeraldConfig::default_path);
            let config = if path.exists() {
                println!("✅ Config already exists: {}", path.display());
                HeraldConfig::load_from(&path)?
            } else {
                let config = HeraldConfig::default();
                config.save_to(&path)?;
                println!("✅ Config saved to: {}", path.display());
                config
            };

            let loader = MessageLoader::from_config(&config);
            let written = loader.create_examples()?;
            println!("✅ {written} example message(s) written to {}", loader.dir().join("example").display());

            println!("\n📋 Next steps:");
            println!("  1. Edit or add message files under {}", loader.dir().display());
            println!("  2. Preview one: herald preview example/example");
            println!("  3. Start rotating: herald run");
        }

        Commands::Config { action } => match action {
            ConfigAction::Show => {
                let config = match config_path {
                    Some(path) => HeraldConfig::load_from(path)?,
                    None => HeraldConfig::load()?,
                };
                let content = toml::to_string_pretty(&config)?;
                println!("{content}");
            }
            ConfigAction::Path => {
                let path = config_path
                    .map(Path::to_path_buf)
                    .unwrap_or_else(HeraldConfig::default_path);
                println!("{}", path.display());
            }
        },
    }

    Ok(())
}

/// Config used only to pick the log level; load errors surface later.
fn peek_config(path: Option<&Path>) -> HeraldConfig {
    let loaded = match path {
        Some(path) => HeraldConfig::load_from(path),
        None => HeraldConfig::load(),
    };
    loaded.unwrap_or_default()
}

async fn run(config_path: Option<&Path>) -> Result<()> {
    let mut herald = Herald::open(config_path)?;
    let rotation = herald.config().rotation;

    println!("📣 Herald v{}", env!("CARGO_PKG_VERSION"));
    println!(
        "   {} message(s) | every {}s | {} order",
        herald.scheduler().store().count(),
        rotation.interval_seconds,
        rotation.policy_name()
    );
    println!("   Type 'help' for commands, Ctrl+C to stop\n");

    herald.start().await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            line = lines.next_line(), if stdin_open => match line? {
                Some(line) => {
                    let Some(command) = ConsoleCommand::parse(&line) else {
                        continue;
                    };
                    if !herald.execute(command).await {
                        break;
                    }
                }
                // Detached from a terminal: keep rotating until Ctrl+C.
                None => stdin_open = false,
            },
        }
    }

    if herald.scheduler().is_running() {
        herald.stop().await;
    }
    println!("\n👋 Herald stopped.");
    Ok(())
}
