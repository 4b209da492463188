//! Discord delivery sink for fired notifications

use async_trait::async_trait;
use serenity::http::Http;
use serenity::model::id::ChannelId;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

use super::scheduler::{DeliveryError, DeliverySink};

/// Upper bound on a single channel send
pub const DELIVERY_TIMEOUT: Duration = Duration::from_secs(10);

pub struct SerenityDelivery {
    http: Arc<Http>,
    timeout: Duration,
}

impl SerenityDelivery {
    pub fn new(http: Arc<Http>) -> Self {
        Self {
            http,
            timeout: DELIVERY_TIMEOUT,
        }
    }
}

#[async_trait]
impl DeliverySink for SerenityDelivery {
    async fn deliver(&self, channel_id: u64, text: &str) -> Result<(), DeliveryError> {
        match timeout(self.timeout, ChannelId(channel_id).say(&self.http, text)).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(DeliveryError::new(channel_id, e.to_string())),
            Err(_) => Err(DeliveryError::new(
                channel_id,
                format!("send timed out after {}s", self.timeout.as_secs()),
            )),
        }
    }
}
