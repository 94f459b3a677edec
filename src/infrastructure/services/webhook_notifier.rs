// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::notification::Notification;
use crate::domain::services::notification_service::Notifier;
use anyhow::Result;
use async_trait::async_trait;
use hmac::{Hmac, Mac};
use metrics::counter;
use rand::Rng;
use reqwest::{header, Client};
use sha2::Sha256;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::sleep;
use tracing::{error, info, warn};

/// 单条通知的最大投递尝试次数
const MAX_ATTEMPTS: u32 = 3;

/// Webhook通知器
///
/// 将状态变更通知投递到外部通知网关。`notify` 只做入队，
/// 真正的HTTP投递在后台任务中进行，带签名与指数退避重试，
/// 投递失败只记录日志与指标。
pub struct WebhookNotifier {
    tx: mpsc::UnboundedSender<Notification>,
}

impl WebhookNotifier {
    /// 创建新的Webhook通知器并启动后台投递任务
    ///
    /// # 参数
    ///
    /// * `endpoint` - 通知网关地址
    /// * `secret` - 签名密钥
    pub fn new(endpoint: String, secret: String) -> Self {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_static("Dispatchrs-Notifier/0.1.0"),
        );
        let delivery = DeliveryTask {
            endpoint,
            secret,
            client: Client::builder().default_headers(headers).build().unwrap(),
        };
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(async move {
            delivery.run(rx).await;
        });
        Self { tx }
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(&self, notification: Notification) -> Result<()> {
        self.tx
            .send(notification)
            .map_err(|e| anyhow::anyhow!("notification queue closed: {}", e))
    }
}

struct DeliveryTask {
    endpoint: String,
    secret: String,
    client: Client,
}

impl DeliveryTask {
    async fn run(self, mut rx: mpsc::UnboundedReceiver<Notification>) {
        info!("Notification delivery task started");
        while let Some(notification) = rx.recv().await {
            if let Err(e) = self.deliver(&notification).await {
                error!(
                    "Failed to deliver notification {} for ticket {}: {}",
                    notification.id, notification.ticket_id, e
                );
                counter!("notification_delivery_failed_total").increment(1);
            }
        }
        info!("Notification delivery task stopped");
    }

    async fn deliver(&self, notification: &Notification) -> Result<()> {
        let payload = serde_json::to_value(notification)?;

        type HmacSha256 = Hmac<Sha256>;
        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
            .expect("HMAC can take key of any size");
        mac.update(payload.to_string().as_bytes());
        let signature_hex = hex::encode(mac.finalize().into_bytes());

        let mut attempt = 0u32;
        loop {
            counter!("notification_delivery_attempts_total").increment(1);
            let response = self
                .client
                .post(&self.endpoint)
                .header("X-Dispatchrs-Signature", signature_hex.clone())
                .header("X-Dispatchrs-Kind", notification.kind.to_string())
                .json(&payload)
                .timeout(Duration::from_secs(10))
                .send()
                .await;

            match response {
                Ok(resp) if resp.status().is_success() => {
                    counter!("notification_delivery_success_total").increment(1);
                    return Ok(());
                }
                Ok(resp) => {
                    warn!(
                        "Notification {} delivery got status {}",
                        notification.id,
                        resp.status()
                    );
                }
                Err(e) => {
                    warn!("Notification {} delivery error: {}", notification.id, e);
                }
            }

            attempt += 1;
            if attempt >= MAX_ATTEMPTS {
                anyhow::bail!("gave up after {} attempts", attempt);
            }

            // Exponential backoff with jitter
            let base_backoff = 2u64.pow(attempt);
            let jitter = rand::rng().random_range(0..=base_backoff / 2);
            sleep(Duration::from_secs(base_backoff + jitter)).await;
        }
    }
}

#[cfg(test)]
#[path = "webhook_notifier_test.rs"]
mod tests;
