//! Top-level error definitions.

use thiserror::Error;

use crate::config::loader::ConfigError;

/// Errors surfaced by monitor construction and the daemon wiring.
///
/// Probe failures are not errors at this level: they are classified into
/// [`crate::probe::ProbeError`] per member and folded into the evaluation.
#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Construction with no members is the one fatal misconfiguration.
    #[error("no members configured")]
    EmptyMemberList,

    #[error("invalid member url: {0}")]
    InvalidMemberUrl(#[from] url::ParseError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
