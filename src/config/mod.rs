//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks, all errors reported)
//!     → MonitorConfig (validated, immutable)
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs loads & validates
//!     → new config sent over channel
//!     → monitor swaps its member list between cycles
//! ```
//!
//! # Design Decisions
//! - Every section has defaults so a minimal config only lists members
//! - Validation is a pure function returning all errors, not just the first
//! - An empty member list is the one fatal, construction-time condition

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, ConfigError};
pub use schema::{ApiConfig, EvaluationConfig, LatencyConfig, MemberConfig, MonitorConfig, ObservabilityConfig, ProbeConfig};
pub use validation::{validate_config, ValidationError};
pub use watcher::ConfigWatcher;
