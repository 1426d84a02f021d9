//! Fan-out dispatcher: sends each announcement to every channel at once.

use async_trait::async_trait;
use futures::future::join_all;
use herald_core::config::HeraldConfig;
use herald_core::error::Result;
use herald_core::traits::{Channel, Dispatcher};
use herald_core::types::{Announcement, DispatchReport};

use crate::console::ConsoleChannel;
use crate::webhook::WebhookChannel;

/// Delivers to all registered channels concurrently. One channel failing
/// never stops delivery to the others.
#[derive(Default)]
pub struct BroadcastDispatcher {
    channels: Vec<Box<dyn Channel>>,
}

impl BroadcastDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the channel set described by `[channels]`.
    pub fn from_config(config: &HeraldConfig) -> Result<Self> {
        let mut dispatcher = Self::new();
        if config.channels.console.enabled {
            dispatcher.add(ConsoleChannel::from_config(&config.channels.console));
        }
        if let Some(webhook) = &config.channels.webhook
            && webhook.enabled
        {
            dispatcher.add(WebhookChannel::new(webhook)?);
        }
        if dispatcher.is_empty() {
            tracing::warn!("No channels enabled, announcements will not be delivered anywhere");
        }
        Ok(dispatcher)
    }

    pub fn add(&mut self, channel: impl Channel + 'static) {
        tracing::debug!("Registered channel: {}", channel.name());
        self.channels.push(Box::new(channel));
    }

    pub fn with_channel(mut self, channel: impl Channel + 'static) -> Self {
        self.add(channel);
        self
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    pub fn channel_names(&self) -> Vec<&str> {
        self.channels.iter().map(|c| c.name()).collect()
    }
}

#[async_trait]
impl Dispatcher for BroadcastDispatcher {
    async fn dispatch(&self, announcement: &Announcement) -> Result<DispatchReport> {
        let sends = self.channels.iter().map(|channel| async move {
            (channel.name(), channel.send(announcement).await)
        });

        let mut report = DispatchReport::default();
        for (name, result) in join_all(sends).await {
            match result {
                Ok(()) => report.record_success(),
                Err(e) => {
                    tracing::warn!(
                        "Failed to deliver '{}' via {name}: {e}",
                        announcement.name()
                    );
                    report.record_failure(name);
                }
            }
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use herald_core::config::WebhookConfig;
    use herald_core::error::HeraldError;
    use herald_core::types::Message;
    use herald_markup::render::{RenderOptions, render};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct Counting {
        name: &'static str,
        sent: Arc<AtomicUsize>,
        fail: bool,
    }

    #[async_trait]
    impl Channel for Counting {
        fn name(&self) -> &str {
            self.name
        }

        async fn send(&self, _announcement: &Announcement) -> Result<()> {
            if self.fail {
                return Err(HeraldError::channel("offline"));
            }
            self.sent.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn announcement() -> Announcement {
        render(Arc::new(Message::chat("m", ["hi"])), &RenderOptions::default())
    }

    #[tokio::test]
    async fn test_fan_out_counts_failures() {
        let sent = Arc::new(AtomicUsize::new(0));
        let dispatcher = BroadcastDispatcher::new()
            .with_channel(Counting { name: "a", sent: sent.clone(), fail: false })
            .with_channel(Counting { name: "b", sent: sent.clone(), fail: true })
            .with_channel(Counting { name: "c", sent: sent.clone(), fail: false });

        let report = dispatcher.dispatch(&announcement()).await.unwrap();
        assert_eq!(report.delivered, 2);
        assert_eq!(report.failed, vec!["b"]);
        assert_eq!(sent.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_no_channels_is_not_an_error() {
        let dispatcher = BroadcastDispatcher::new();
        let report = dispatcher.dispatch(&announcement()).await.unwrap();
        assert_eq!(report, DispatchReport::default());
    }

    #[test]
    fn test_from_config() {
        let mut config = HeraldConfig::default();
        let dispatcher = BroadcastDispatcher::from_config(&config).unwrap();
        assert_eq!(dispatcher.channel_names(), vec!["console"]);

        config.channels.console.enabled = false;
        config.channels.webhook = Some(WebhookConfig {
            url: "http://127.0.0.1:1/hook".into(),
            enabled: true,
            timeout_seconds: 3,
        });
        let dispatcher = BroadcastDispatcher::from_config(&config).unwrap();
        assert_eq!(dispatcher.channel_names(), vec!["webhook"]);

        if let Some(webhook) = config.channels.webhook.as_mut() {
            webhook.enabled = false;
        }
        assert!(BroadcastDispatcher::from_config(&config).unwrap().is_empty());
    }
}
