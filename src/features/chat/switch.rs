//! Per-channel /chat on|off state
//!
//! In-memory only; a restart returns every channel to the configured default.

use dashmap::DashMap;
use std::sync::Arc;

#[derive(Clone)]
pub struct ChatSwitch {
    channels: Arc<DashMap<u64, bool>>,
    default_on: bool,
}

impl ChatSwitch {
    pub fn new(default_on: bool) -> Self {
        ChatSwitch {
            channels: Arc::new(DashMap::new()),
            default_on,
        }
    }

    pub fn set(&self, channel_id: u64, on: bool) {
        self.channels.insert(channel_id, on);
    }

    pub fn is_on(&self, channel_id: u64) -> bool {
        self.channels
            .get(&channel_id)
            .map(|entry| *entry)
            .unwrap_or(self.default_on)
    }
}
