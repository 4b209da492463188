//! # Features
//!
//! Each feature is a self-contained module with its own version header.
//!
//! | Feature | Purpose |
//! |---------|---------|
//! | preferences | Per-user settings and memos on the durable document |
//! | timers | /timer and /alarm scheduling and delivery |
//! | reply | Greeting and silent modifiers on outgoing replies |
//! | chat | Channel conversation: keywords, fillers, Gemini |

pub mod chat;
pub mod preferences;
pub mod reply;
pub mod timers;

pub use chat::{ChatResponder, ChatSwitch, GeminiClient};
pub use preferences::{PreferenceRepository, PreferenceSnapshot};
pub use reply::compose_for_user;
pub use timers::{NotificationScheduler, SerenityDelivery, SystemClock};
