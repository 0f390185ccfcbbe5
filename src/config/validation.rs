//! Configuration validation.
//!
//! Semantic checks on top of what serde already guarantees. Returns every
//! violation, not just the first, so an operator fixes a config in one pass.

use std::collections::HashSet;
use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::MonitorConfig;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("no members configured")]
    NoMembers,

    #[error("member '{name}': invalid url '{url}': {reason}")]
    InvalidMemberUrl {
        name: String,
        url: String,
        reason: String,
    },

    #[error("duplicate member name '{0}'")]
    DuplicateMember(String),

    #[error("probe timeout must be greater than zero")]
    ZeroProbeTimeout,

    #[error("probe status path must start with '/'")]
    BadStatusPath,

    #[error("evaluation interval must be greater than zero")]
    ZeroEvaluationInterval,

    #[error("latency window must be greater than zero")]
    ZeroLatencyWindow,

    #[error("latency capacity must be greater than zero")]
    ZeroLatencyCapacity,

    #[error("invalid bind address '{0}'")]
    InvalidBindAddress(String),
}

/// Validate a configuration, collecting all violations.
pub fn validate_config(config: &MonitorConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.members.is_empty() {
        errors.push(ValidationError::NoMembers);
    }

    let mut seen = HashSet::new();
    for member in &config.members {
        if !seen.insert(member.name.as_str()) {
            errors.push(ValidationError::DuplicateMember(member.name.clone()));
        }
        if let Err(e) = Url::parse(&member.url) {
            errors.push(ValidationError::InvalidMemberUrl {
                name: member.name.clone(),
                url: member.url.clone(),
                reason: e.to_string(),
            });
        }
    }

    if config.probe.timeout_ms == 0 {
        errors.push(ValidationError::ZeroProbeTimeout);
    }
    if !config.probe.status_path.starts_with('/') {
        errors.push(ValidationError::BadStatusPath);
    }
    if config.evaluation.interval_secs == 0 {
        errors.push(ValidationError::ZeroEvaluationInterval);
    }
    if config.latency.window_secs == 0 {
        errors.push(ValidationError::ZeroLatencyWindow);
    }
    if config.latency.capacity == 0 {
        errors.push(ValidationError::ZeroLatencyCapacity);
    }

    if config.api.enabled && config.api.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(config.api.bind_address.clone()));
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidBindAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::MemberConfig;

    fn valid_config() -> MonitorConfig {
        MonitorConfig {
            members: vec![
                MemberConfig {
                    name: "m1".to_string(),
                    url: "http://10.0.0.1:2379".to_string(),
                },
                MemberConfig {
                    name: "m2".to_string(),
                    url: "http://10.0.0.2:2379".to_string(),
                },
            ],
            ..MonitorConfig::default()
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(validate_config(&valid_config()).is_ok());
    }

    #[test]
    fn test_empty_member_list_rejected() {
        let config = MonitorConfig::default();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.contains(&ValidationError::NoMembers));
    }

    #[test]
    fn test_all_errors_collected() {
        let mut config = valid_config();
        config.members[1].name = "m1".to_string();
        config.members[1].url = "not a url".to_string();
        config.probe.timeout_ms = 0;
        config.evaluation.interval_secs = 0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors.contains(&ValidationError::DuplicateMember("m1".to_string())));
        assert!(errors.contains(&ValidationError::ZeroProbeTimeout));
        assert!(errors.contains(&ValidationError::ZeroEvaluationInterval));
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::InvalidMemberUrl { name, .. } if name == "m1")));
    }

    #[test]
    fn test_bind_address_checked_only_when_enabled() {
        let mut config = valid_config();
        config.api.enabled = false;
        config.api.bind_address = "nonsense".to_string();
        assert!(validate_config(&config).is_ok());

        config.api.enabled = true;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::InvalidBindAddress("nonsense".to_string())]
        );
    }
}
