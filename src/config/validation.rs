//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges and addresses before startup
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Bind addresses must parse as socket addresses; the relay connect
//!   address may be a hostname and is only checked for shape

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::AppConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {reason}")]
pub struct ValidationError {
    pub field: &'static str,
    pub reason: String,
}

/// Validate a configuration, collecting every error.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_bind_addr(&mut errors, "http.bind_address", &config.http.bind_address);
    check_bind_addr(&mut errors, "relay.bind_address", &config.relay.bind_address);
    if config.observability.metrics_enabled {
        check_bind_addr(
            &mut errors,
            "observability.metrics_address",
            &config.observability.metrics_address,
        );
    }

    if !config.relay.connect_address.contains(':') {
        errors.push(ValidationError {
            field: "relay.connect_address",
            reason: format!(
                "{:?} must be a host:port endpoint",
                config.relay.connect_address
            ),
        });
    }
    if config.relay.max_connections == 0 {
        errors.push(ValidationError {
            field: "relay.max_connections",
            reason: "must be at least 1".to_string(),
        });
    }
    if config.relay.chunk_size == 0 {
        errors.push(ValidationError {
            field: "relay.chunk_size",
            reason: "must be at least 1".to_string(),
        });
    }
    if config.http.static_root.is_empty() {
        errors.push(ValidationError {
            field: "http.static_root",
            reason: "must not be empty".to_string(),
        });
    }
    if config.storage.db_path.is_empty() {
        errors.push(ValidationError {
            field: "storage.db_path",
            reason: "must not be empty".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_bind_addr(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError {
            field,
            reason: format!("{value:?} is not a valid socket address"),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&AppConfig::default()).is_ok());
    }

    #[test]
    fn rejects_unparseable_bind_address() {
        let mut config = AppConfig::default();
        config.http.bind_address = "not-an-address".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "http.bind_address");
    }

    #[test]
    fn hostname_connect_address_is_accepted() {
        let mut config = AppConfig::default();
        config.relay.connect_address = "relay.internal:5000".to_string();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn collects_every_error() {
        let mut config = AppConfig::default();
        config.relay.max_connections = 0;
        config.relay.chunk_size = 0;
        config.storage.db_path = String::new();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }
}
