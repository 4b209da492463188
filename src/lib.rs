// Core layer - configuration and shared helpers
pub mod core;

// Storage layer - durable JSON document
pub mod storage;

// Features layer - all feature modules
pub mod features;

// Application layer
pub mod command_handler;
pub mod commands;

pub use core::Config;

pub use features::{
    // Chat
    ChatResponder, ChatSwitch, GeminiClient,
    // Preferences
    PreferenceRepository, PreferenceSnapshot,
    // Reply
    compose_for_user,
    // Timers
    NotificationScheduler, SerenityDelivery, SystemClock,
};
