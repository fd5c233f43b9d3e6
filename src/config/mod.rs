//! Configuration module for micrec.
//!
//! Provides `RecorderConfig` (output directory, input device), `AppPaths`
//! for cross-platform config directories, and TOML persistence via
//! `RecorderConfig::load` / `RecorderConfig::save`.

pub mod paths;
pub mod settings;

pub use paths::AppPaths;
pub use settings::RecorderConfig;
