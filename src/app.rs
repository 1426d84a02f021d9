//! Long-running host: owns the config, the loader and the scheduler, and
//! executes console commands against them.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use herald_channels::{BroadcastDispatcher, ConsoleChannel};
use herald_core::HeraldConfig;
use herald_core::error::HeraldError;
use herald_core::types::{DispatchReport, Message};
use herald_markup::RenderOptions;
use herald_markup::render::render;
use herald_scheduler::{MessageLoader, MessageStore, RotationScheduler};

/// A command typed on the console while `herald run` is active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Reload,
    Announce(String),
    Start,
    Stop,
    Status,
    List,
    Help,
    Quit,
    Unknown(String),
}

impl ConsoleCommand {
    /// Parse one input line. Blank lines yield `None`.
    pub fn parse(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace();
        let head = parts.next()?.to_ascii_lowercase();
        let rest: Vec<&str> = parts.collect();
        let command = match head.as_str() {
            "reload" => Self::Reload,
            "announce" | "send" => match rest.first() {
                Some(name) => Self::Announce(name.to_string()),
                None => Self::Unknown("announce needs a message name".into()),
            },
            "start" => Self::Start,
            "stop" => Self::Stop,
            "status" => Self::Status,
            "list" | "ls" => Self::List,
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            other => Self::Unknown(format!("unknown command: {other}")),
        };
        Some(command)
    }
}

pub const HELP: &str = "\
Commands:
  reload           reload config and messages
  announce <name>  send one message now
  start | stop     control the rotation
  status           show scheduler state
  list             list messages in rotation order
  quit             stop and exit";

/// What `reload` changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReloadSummary {
    pub messages: usize,
    pub config_changed: bool,
    pub restarted: bool,
}

pub struct Herald {
    config_path: Option<PathBuf>,
    config: HeraldConfig,
    loader: MessageLoader,
    scheduler: Arc<RotationScheduler>,
}

impl Herald {
    /// Load config and messages and build the scheduler. Nothing is started.
    pub fn open(config_path: Option<&Path>) -> Result<Self> {
        let config = load_config(config_path)?;
        let loader = MessageLoader::from_config(&config);
        prepare_messages(&config, &loader);

        let store = Arc::new(MessageStore::new());
        let count = store.replace_all(loader.load_all()?);
        tracing::info!("{count} message(s) in rotation");

        let dispatcher = BroadcastDispatcher::from_config(&config)?;
        let scheduler = RotationScheduler::new(store, Arc::new(dispatcher))
            .with_render_options(RenderOptions::from_config(&config))
            .with_stop_grace(Duration::from_secs(config.scheduler.stop_grace_seconds));

        Ok(Self {
            config_path: config_path.map(Path::to_path_buf),
            config,
            loader,
            scheduler: Arc::new(scheduler),
        })
    }

    pub fn config(&self) -> &HeraldConfig {
        &self.config
    }

    pub fn scheduler(&self) -> &Arc<RotationScheduler> {
        &self.scheduler
    }

    pub async fn start(&self) -> bool {
        self.scheduler.start(self.config.rotation).await
    }

    pub async fn stop(&self) -> bool {
        self.scheduler.stop().await
    }

    /// Re-read config and messages. The scheduler is restarted when the
    /// rotation settings changed or it was running.
    pub async fn reload(&mut self) -> Result<ReloadSummary> {
        let config = load_config(self.config_path.as_deref())?;
        let config_changed = config.rotation != self.config.rotation;
        if config.channels != self.config.channels {
            tracing::warn!("Channel settings changed; restart herald to apply them");
        }

        let loader = MessageLoader::from_config(&config);
        prepare_messages(&config, &loader);
        let messages = self.scheduler.store().replace_all(loader.load_all()?);
        self.scheduler.set_render_options(RenderOptions::from_config(&config));

        self.config = config;
        self.loader = loader;

        let restarted = if config_changed || self.scheduler.is_running() {
            self.scheduler.restart(self.config.rotation).await
        } else {
            false
        };

        tracing::info!("Reloaded {messages} message(s)");
        Ok(ReloadSummary {
            messages,
            config_changed,
            restarted,
        })
    }

    /// Read `name` from disk and dispatch it now.
    pub async fn announce(&self, name: &str) -> Result<DispatchReport> {
        let message = self.find(name)?;
        if !message.enabled {
            return Err(HeraldError::MessageDisabled(message.name).into());
        }
        let report = self.scheduler.announce(Arc::new(message)).await?;
        Ok(report)
    }

    /// Rendered console lines for `name`, without dispatching.
    pub fn preview(&self, name: &str) -> Result<Vec<String>> {
        let message = self.find(name)?;
        let announcement = render(
            Arc::new(message),
            &RenderOptions::from_config(&self.config),
        );
        let console = ConsoleChannel::from_config(&self.config.channels.console);
        Ok(console.format(&announcement))
    }

    /// All message files, with enabled and priority, in rotation order
    /// followed by disabled ones.
    pub fn list(&self) -> Result<Vec<Message>> {
        let mut messages = self.loader.load_all()?;
        messages.sort_by(|a, b| {
            b.enabled
                .cmp(&a.enabled)
                .then_with(|| b.priority.cmp(&a.priority))
        });
        Ok(messages)
    }

    pub async fn status(&self) -> String {
        let store = self.scheduler.store();
        match self.scheduler.active_config().await {
            Some(rotation) => format!(
                "running: every {}s, {} order, {} message(s), {} sent in sequence",
                rotation.interval_seconds,
                rotation.policy_name(),
                store.count(),
                self.scheduler.cursor()
            ),
            None => format!("stopped, {} message(s) loaded", store.count()),
        }
    }

    /// Execute a console command. Returns `false` when the host should exit.
    pub async fn execute(&mut self, command: ConsoleCommand) -> bool {
        match command {
            ConsoleCommand::Reload => match self.reload().await {
                Ok(summary) if summary.config_changed => {
                    println!("Configuration and messages reloaded with new values ({} message(s)).", summary.messages)
                }
                Ok(summary) => println!("Configuration and messages reloaded ({} message(s)).", summary.messages),
                Err(e) => println!("Reload failed: {e:#}"),
            },
            ConsoleCommand::Announce(name) => match self.announce(&name).await {
                Ok(report) => println!("Announcement '{name}' sent: {report}"),
                Err(e) => println!("{}", self.describe_failure(&name, &e)),
            },
            ConsoleCommand::Start => {
                if self.start().await {
                    println!("Scheduler started.");
                } else {
                    println!("Scheduler is already running.");
                }
            }
            ConsoleCommand::Stop => {
                if self.stop().await {
                    println!("Scheduler stopped.");
                } else {
                    println!("Scheduler is not running.");
                }
            }
            ConsoleCommand::Status => println!("{}", self.status().await),
            ConsoleCommand::List => {
                let names = self.scheduler.store().names();
                if names.is_empty() {
                    println!("No messages in rotation.");
                }
                for (i, name) in names.iter().enumerate() {
                    println!("  {:>2}. {name}", i + 1);
                }
            }
            ConsoleCommand::Help => println!("{HELP}"),
            ConsoleCommand::Quit => return false,
            ConsoleCommand::Unknown(reason) => println!("{reason}. Type 'help' for commands."),
        }
        true
    }

    /// Error text for a failed announce, listing names when it was not found.
    pub fn describe_failure(&self, name: &str, err: &anyhow::Error) -> String {
        match err.downcast_ref::<HeraldError>() {
            Some(HeraldError::MessageNotFound(_)) => format!(
                "Message '{name}' not found! Available messages: {}",
                self.loader.message_names().join(", ")
            ),
            Some(HeraldError::MessageDisabled(_)) => format!("Message '{name}' is disabled!"),
            _ => format!("Error sending announcement: {err:#}"),
        }
    }

    fn find(&self, name: &str) -> Result<Message> {
        Ok(self.loader.load_one(name)?)
    }
}

fn load_config(path: Option<&Path>) -> Result<HeraldConfig> {
    let config = match path {
        Some(path) => HeraldConfig::load_from(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => HeraldConfig::load()?,
    };
    Ok(config)
}

fn prepare_messages(config: &HeraldConfig, loader: &MessageLoader) {
    if !config.create_example_messages {
        return;
    }
    if let Err(e) = loader.create_examples() {
        tracing::warn!("Failed to create example messages: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup(interval: u64) -> (TempDir, PathBuf) {
        let tmp = TempDir::new().unwrap();
        let messages = tmp.path().join("messages");
        std::fs::create_dir_all(&messages).unwrap();
        std::fs::write(
            messages.join("hello.json"),
            r#"{"ChatMessages": ["&aHello {server}"], "Center": false, "Priority": 1}"#,
        )
        .unwrap();
        std::fs::write(
            messages.join("off.json"),
            r#"{"ChatMessages": ["hidden"], "Enabled": false}"#,
        )
        .unwrap();

        let path = tmp.path().join("config.toml");
        write_config(&path, &messages, interval);
        (tmp, path)
    }

    fn write_config(path: &Path, messages: &Path, interval: u64) {
        let mut config = HeraldConfig {
            messages_dir: messages.display().to_string(),
            create_example_messages: false,
            ..HeraldConfig::default()
        };
        config.rotation.interval_seconds = interval;
        config.channels.console.enabled = false;
        config.channels.console.ansi = false;
        config.placeholders.insert("server".into(), "Lobby".into());
        config.save_to(path).unwrap();
    }

    #[test]
    fn test_parse_console_commands() {
        assert_eq!(ConsoleCommand::parse("  "), None);
        assert_eq!(ConsoleCommand::parse("RELOAD"), Some(ConsoleCommand::Reload));
        assert_eq!(
            ConsoleCommand::parse("announce promo/sale"),
            Some(ConsoleCommand::Announce("promo/sale".into()))
        );
        assert!(matches!(
            ConsoleCommand::parse("announce"),
            Some(ConsoleCommand::Unknown(_))
        ));
        assert_eq!(ConsoleCommand::parse("exit"), Some(ConsoleCommand::Quit));
        assert!(matches!(ConsoleCommand::parse("dance"), Some(ConsoleCommand::Unknown(_))));
    }

    #[tokio::test]
    async fn test_open_loads_enabled_messages() {
        let (_tmp, path) = setup(60);
        let herald = Herald::open(Some(&path)).unwrap();
        assert_eq!(herald.scheduler().store().names(), vec!["hello"]);
        assert!(!herald.scheduler().is_running());

        let listed: Vec<String> = herald.list().unwrap().into_iter().map(|m| m.name).collect();
        assert_eq!(listed, vec!["hello", "off"]);
    }

    #[tokio::test]
    async fn test_preview_applies_placeholders() {
        let (_tmp, path) = setup(60);
        let herald = Herald::open(Some(&path)).unwrap();
        assert_eq!(herald.preview("hello").unwrap(), vec!["Hello Lobby"]);
        assert_eq!(herald.preview("hello.json").unwrap(), vec!["Hello Lobby"]);
    }

    #[tokio::test]
    async fn test_announce_errors() {
        let (_tmp, path) = setup(60);
        let herald = Herald::open(Some(&path)).unwrap();

        let err = herald.announce("missing").await.unwrap_err();
        let text = herald.describe_failure("missing", &err);
        assert!(text.contains("not found"));
        assert!(text.contains("hello"));

        let err = herald.announce("off").await.unwrap_err();
        assert!(herald.describe_failure("off", &err).contains("disabled"));

        let report = herald.announce("hello").await.unwrap();
        assert_eq!(report, DispatchReport::default());
    }

    #[tokio::test]
    async fn test_reload_restarts_on_rotation_change() {
        let (tmp, path) = setup(60);
        let mut herald = Herald::open(Some(&path)).unwrap();

        let summary = herald.reload().await.unwrap();
        assert!(!summary.config_changed);
        assert!(!summary.restarted);
        assert!(!herald.scheduler().is_running());

        write_config(&path, &tmp.path().join("messages"), 30);
        let summary = herald.reload().await.unwrap();
        assert!(summary.config_changed);
        assert!(summary.restarted);
        assert_eq!(
            herald.scheduler().active_config().await.map(|r| r.interval_seconds),
            Some(30)
        );

        let summary = herald.reload().await.unwrap();
        assert!(!summary.config_changed);
        assert!(summary.restarted);
        herald.stop().await;
    }

    #[tokio::test]
    async fn test_reload_picks_up_new_files() {
        let (tmp, path) = setup(60);
        let mut herald = Herald::open(Some(&path)).unwrap();
        std::fs::write(
            tmp.path().join("messages/extra.json"),
            r#"{"ChatMessages": ["new"], "Priority": 9}"#,
        )
        .unwrap();

        let summary = herald.reload().await.unwrap();
        assert_eq!(summary.messages, 2);
        assert_eq!(herald.scheduler().store().names(), vec!["extra", "hello"]);
    }

    #[tokio::test]
    async fn test_status_text() {
        let (_tmp, path) = setup(60);
        let herald = Herald::open(Some(&path)).unwrap();
        assert!(herald.status().await.starts_with("stopped"));
        herald.start().await;
        assert!(herald.status().await.contains("every 60s"));
        herald.stop().await;
    }
}
