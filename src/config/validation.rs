//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, ports valid, limits > 0)
//! - Check addresses parse before any socket is opened
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RelayConfig → Result<(), Vec<ValidationError>>

use std::net::SocketAddr;
use std::path::{Component, Path};

use crate::config::schema::RelayConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &RelayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_socket_addr(&mut errors, "listener.bind_address", &config.listener.bind_address);
    check_socket_addr(&mut errors, "converter.bind_address", &config.converter.bind_address);
    if config.observability.metrics_enabled {
        check_socket_addr(
            &mut errors,
            "observability.metrics_address",
            &config.observability.metrics_address,
        );
    }

    if config.downstream.host.trim().is_empty() {
        errors.push(ValidationError::new("downstream.host", "must not be empty"));
    }
    if config.downstream.port == 0 {
        errors.push(ValidationError::new("downstream.port", "must not be 0"));
    }

    let timeouts = &config.timeouts;
    for (field, value) in [
        ("timeouts.connect_secs", timeouts.connect_secs),
        ("timeouts.exchange_secs", timeouts.exchange_secs),
        ("timeouts.request_secs", timeouts.request_secs),
        ("converter.read_timeout_secs", config.converter.read_timeout_secs),
    ] {
        if value == 0 {
            errors.push(ValidationError::new(field, "must be greater than 0"));
        }
    }
    // The request timeout runs from before the body is read, so it must
    // outlast the exchange or a slow downstream surfaces as 408 instead of 504.
    if timeouts.exchange_secs >= timeouts.request_secs {
        errors.push(ValidationError::new(
            "timeouts.exchange_secs",
            format!(
                "must be less than timeouts.request_secs ({} >= {})",
                timeouts.exchange_secs, timeouts.request_secs
            ),
        ));
    }
    if timeouts.connect_secs > timeouts.exchange_secs {
        errors.push(ValidationError::new(
            "timeouts.connect_secs",
            format!(
                "must not exceed timeouts.exchange_secs ({} > {})",
                timeouts.connect_secs, timeouts.exchange_secs
            ),
        ));
    }

    for (field, value) in [
        ("bridge.max_response_bytes", config.bridge.max_response_bytes),
        ("security.max_body_size", config.security.max_body_size),
        ("converter.max_connections", config.converter.max_connections),
        ("converter.max_request_bytes", config.converter.max_request_bytes),
    ] {
        if value == 0 {
            errors.push(ValidationError::new(field, "must be greater than 0"));
        }
    }

    if !is_plain_file_name(&config.static_files.index) {
        errors.push(ValidationError::new(
            "static_files.index",
            format!("'{}' must be a plain file name", config.static_files.index),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_socket_addr(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if let Err(e) = value.parse::<SocketAddr>() {
        errors.push(ValidationError::new(field, format!("'{}' is not a socket address: {}", value, e)));
    }
}

fn is_plain_file_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}
