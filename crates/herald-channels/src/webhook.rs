//! Webhook channel: POSTs each announcement as JSON.
//!
//! Useful for relaying announcements to chat bridges or custom services.

use std::time::Duration;

use async_trait::async_trait;
use herald_core::config::WebhookConfig;
use herald_core::error::{HeraldError, Result};
use herald_core::traits::Channel;
use herald_core::types::Announcement;
use herald_markup::width::strip_all_markup;

pub struct WebhookChannel {
    url: String,
    client: reqwest::Client,
}

impl WebhookChannel {
    pub fn new(config: &WebhookConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.max(1)))
            .build()
            .map_err(|e| HeraldError::Http(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            url: config.url.clone(),
            client,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// JSON body sent for `announcement`.
    pub fn payload(announcement: &Announcement) -> serde_json::Value {
        let plain: Vec<String> = announcement
            .chat_lines
            .iter()
            .map(|line| strip_all_markup(line))
            .collect();
        serde_json::json!({
            "name": announcement.name(),
            "priority": announcement.message.priority,
            "chat_lines": announcement.chat_lines,
            "plain_lines": plain,
            "notification": announcement.notification,
            "title": announcement.title,
            "sound": announcement.sound,
            "fired_at": announcement.fired_at.to_rfc3339(),
        })
    }
}

#[async_trait]
impl Channel for WebhookChannel {
    fn name(&self) -> &str {
        "webhook"
    }

    async fn send(&self, announcement: &Announcement) -> Result<()> {
        let body = Self::payload(announcement);
        let resp = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| HeraldError::Channel(format!("Webhook send failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(HeraldError::Channel(format!(
                "Webhook returned HTTP {status}"
            )));
        }
        tracing::debug!("Webhook accepted '{}' ({status})", announcement.name());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use herald_core::types::{Message, Sound};
    use herald_markup::render::{RenderOptions, render};
    use std::sync::Arc;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn config(url: String) -> WebhookConfig {
        WebhookConfig {
            url,
            enabled: true,
            timeout_seconds: 5,
        }
    }

    fn announcement() -> Announcement {
        let mut msg = Message::chat("promo/sale", ["&6Sale!"]).with_center(false);
        msg.sound = Some(Sound::new("ding"));
        render(Arc::new(msg), &RenderOptions::default())
    }

    /// One-shot HTTP server: answers with `status` and hands back the body.
    async fn serve_once(status: u16) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/hook", listener.local_addr().unwrap());
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0u8; 1024];
            let body = loop {
                let n = socket.read(&mut chunk).await.unwrap();
                buf.extend_from_slice(&chunk[..n]);
                let text = String::from_utf8_lossy(&buf).to_string();
                if let Some(split) = text.find("\r\n\r\n") {
                    let length = text[..split]
                        .lines()
                        .find_map(|l| {
                            let (k, v) = l.split_once(':')?;
                            k.eq_ignore_ascii_case("content-length")
                                .then(|| v.trim().parse::<usize>().ok())
                                .flatten()
                        })
                        .unwrap_or(0);
                    let body = &text[split + 4..];
                    if body.len() >= length || n == 0 {
                        break body.to_string();
                    }
                }
                if n == 0 {
                    break String::new();
                }
            };
            let response = format!("HTTP/1.1 {status} X\r\nContent-Length: 0\r\nConnection: close\r\n\r\n");
            socket.write_all(response.as_bytes()).await.unwrap();
            body
        });
        (url, handle)
    }

    #[test]
    fn test_payload_shape() {
        let body = WebhookChannel::payload(&announcement());
        assert_eq!(body["name"], "promo/sale");
        assert_eq!(body["chat_lines"][0], "<color:gold>Sale!");
        assert_eq!(body["plain_lines"][0], "Sale!");
        assert_eq!(body["sound"]["name"], "ding");
        assert!(body["notification"].is_null());
        assert!(body["fired_at"].as_str().is_some());
    }

    #[tokio::test]
    async fn test_send_posts_json() {
        let (url, server) = serve_once(200).await;
        let channel = WebhookChannel::new(&config(url)).unwrap();
        channel.send(&announcement()).await.unwrap();

        let body: serde_json::Value = serde_json::from_str(&server.await.unwrap()).unwrap();
        assert_eq!(body["name"], "promo/sale");
    }

    #[tokio::test]
    async fn test_http_error_status_fails() {
        let (url, server) = serve_once(500).await;
        let channel = WebhookChannel::new(&config(url)).unwrap();
        let err = channel.send(&announcement()).await.unwrap_err();
        assert!(matches!(err, HeraldError::Channel(_)));
        server.await.unwrap();
    }
}
