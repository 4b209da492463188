//! Shared state handed to every slash command handler
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

use chrono_tz::Tz;

use crate::features::chat::ChatSwitch;
use crate::features::preferences::PreferenceRepository;
use crate::features::timers::NotificationScheduler;

/// Services used by the command handlers
///
/// Every field is a cheap handle onto shared state, so cloning the context
/// never duplicates preferences, pending timers or switch state.
#[derive(Clone)]
pub struct CommandContext {
    pub preferences: PreferenceRepository,
    pub scheduler: NotificationScheduler,
    pub chat_switch: ChatSwitch,
    /// Local time zone for /alarm
    pub time_zone: Tz,
}

impl CommandContext {
    pub fn new(
        preferences: PreferenceRepository,
        scheduler: NotificationScheduler,
        chat_switch: ChatSwitch,
        time_zone: Tz,
    ) -> Self {
        Self {
            preferences,
            scheduler,
            chat_switch,
            time_zone,
        }
    }
}
