//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges the schema cannot express
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Pure function: RouterConfig → Result<(), Vec<ValidationError>>
//! - A zero default timeout is *not* an error; the router falls back to a
//!   fixed default by contract

use thiserror::Error;

use crate::config::schema::RouterConfig;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("sweep_interval_ms must be greater than zero")]
    ZeroSweepInterval,

    #[error("sweep_interval_ms ({interval_ms}) exceeds default_timeout_ms ({timeout_ms}); expired calls would linger for whole sweep periods")]
    SweepSlowerThanTimeout { interval_ms: u64, timeout_ms: u64 },
}

/// Validate a parsed configuration, collecting every violation.
pub fn validate_config(config: &RouterConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.sweep_interval_ms == 0 {
        errors.push(ValidationError::ZeroSweepInterval);
    }

    if config.default_timeout_ms > 0 && config.sweep_interval_ms > config.default_timeout_ms {
        errors.push(ValidationError::SweepSlowerThanTimeout {
            interval_ms: config.sweep_interval_ms,
            timeout_ms: config.default_timeout_ms,
        });
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

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&RouterConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let config = RouterConfig {
            default_timeout_ms: 10,
            sweep_interval_ms: 0,
        };
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors, vec![ValidationError::ZeroSweepInterval]);

        let config = RouterConfig {
            default_timeout_ms: 10,
            sweep_interval_ms: 50,
        };
        let errors = validate_config(&config).unwrap_err();
        assert!(matches!(
            errors[0],
            ValidationError::SweepSlowerThanTimeout { .. }
        ));
    }
}
