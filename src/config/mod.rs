//! Configuration module for spend-goals
//!
//! - Path resolution (env override, platform config dir)
//! - User settings persistence

pub mod paths;
pub mod settings;

pub use paths::GoalPaths;
pub use settings::Settings;
