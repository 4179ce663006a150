//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate upstream addresses and bind addresses
//! - Validate value ranges (timeouts > 0)
//! - Reject static link lists that would fail normalization at request time
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: EdgeConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::{EdgeConfig, LinkSource};

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field}: invalid socket address '{value}'")]
    InvalidAddress { field: &'static str, value: String },

    #[error("{field}: '{value}' is not an absolute http(s) URL")]
    InvalidUrl { field: &'static str, value: String },

    #[error("{0} must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error("{0} must not be empty")]
    Empty(String),
}

pub fn validate_config(config: &EdgeConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_address(&mut errors, "listener.bind_address", &config.listener.bind_address);
    if config.observability.metrics_enabled {
        check_address(
            &mut errors,
            "observability.metrics_address",
            &config.observability.metrics_address,
        );
    }

    check_url(&mut errors, "upstream.shell_url", &config.upstream.shell_url);
    if config.links == LinkSource::Upstream {
        check_url(&mut errors, "upstream.links_url", &config.upstream.links_url);
    }

    if let LinkSource::Static { links } = &config.links {
        for (i, link) in links.iter().enumerate() {
            if link.name.trim().is_empty() {
                errors.push(ValidationError::Empty(format!("links.links[{}].name", i)));
            }
            if link.url.trim().is_empty() {
                errors.push(ValidationError::Empty(format!("links.links[{}].url", i)));
            }
        }
    }

    let timeouts = &config.timeouts;
    for (field, value) in [
        ("timeouts.connect_secs", timeouts.connect_secs),
        ("timeouts.upstream_secs", timeouts.upstream_secs),
        ("timeouts.request_secs", timeouts.request_secs),
    ] {
        if value == 0 {
            errors.push(ValidationError::ZeroTimeout(field));
        }
    }

    let profile = &config.profile;
    for (field, value) in [
        ("profile.display_name", &profile.display_name),
        ("profile.page_title", &profile.page_title),
        ("profile.avatar_url", &profile.avatar_url),
    ] {
        if value.trim().is_empty() {
            errors.push(ValidationError::Empty(field.to_string()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_address(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field,
            value: value.to_string(),
        });
    }
}

fn check_url(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    let valid = url::Url::parse(value)
        .map(|u| matches!(u.scheme(), "http" | "https") && u.has_host())
        .unwrap_or(false);
    if !valid {
        errors.push(ValidationError::InvalidUrl {
            field,
            value: value.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::links::Link;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&EdgeConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_every_error() {
        let mut config = EdgeConfig::default();
        config.listener.bind_address = "localhost".into();
        config.upstream.shell_url = "/relative".into();
        config.timeouts.upstream_secs = 0;
        config.profile.display_name = "  ".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors.contains(&ValidationError::ZeroTimeout("timeouts.upstream_secs")));
        assert!(errors.contains(&ValidationError::Empty("profile.display_name".into())));
    }

    #[test]
    fn test_static_source_skips_links_url() {
        let mut config = EdgeConfig::default();
        config.upstream.links_url = String::new();
        config.links = LinkSource::Static {
            links: vec![Link::new("A", "https://a")],
        };
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_static_source_rejects_blank_fields() {
        let mut config = EdgeConfig::default();
        config.links = LinkSource::Static {
            links: vec![Link::new("A", "https://a"), Link::new("B", " ")],
        };
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors, vec![ValidationError::Empty("links.links[1].url".into())]);
    }

    #[test]
    fn test_metrics_address_checked_only_when_enabled() {
        let mut config = EdgeConfig::default();
        config.observability.metrics_address = "nope".into();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        assert!(validate_config(&config).is_err());
    }
}
