//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the edge.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::links::Link;

/// Root configuration for the edge handler.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct EdgeConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Upstream document and link data sources.
    pub upstream: UpstreamConfig,

    /// Where link data comes from.
    pub links: LinkSource,

    /// Fixed display values injected into the page.
    pub profile: ProfileConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8787").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8787".to_string(),
        }
    }
}

/// Upstream collaborators consumed by the page and link handlers.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// HTML shell that every page request rewrites.
    pub shell_url: String,

    /// JSON source of the link list.
    pub links_url: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            shell_url: "https://static-links-page.signalnerve.workers.dev".to_string(),
            links_url: "https://json-api.alex-whan.workers.dev".to_string(),
        }
    }
}

/// Origin of the link list.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum LinkSource {
    /// Fetch `upstream.links_url` on every request.
    #[default]
    Upstream,
    /// Serve a fixed list without touching the network.
    Static { links: Vec<Link> },
}

/// Values the page visitors write into the document.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProfileConfig {
    /// Text of the `h1#name` heading.
    pub display_name: String,

    /// Text of the document `<title>`.
    pub page_title: String,

    /// `src` of `img#avatar`.
    pub avatar_url: String,

    /// `class` attribute set on `<body>`.
    pub body_class: String,

    /// Icon links appended to `div#social`, in order.
    pub social: Vec<SocialLink>,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            display_name: "alex-whan".to_string(),
            page_title: "Alexander Whan".to_string(),
            avatar_url: "https://images.unsplash.com/photo-1537815749002-de6a533c64db?ixlib=rb-1.2.1&auto=format&fit=crop&w=845&q=80".to_string(),
            body_class: "bg-indigo-800".to_string(),
            social: vec![
                SocialLink::new("github", "https://github.com", "GitHub"),
                SocialLink::new("linkedin", "https://www.linkedin.com", "LinkedIn"),
                SocialLink::new("cloudflare", "https://www.cloudflare.com", "Cloudflare"),
            ],
        }
    }
}

/// A single social icon anchor.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct SocialLink {
    /// Service identifier, used for logging only.
    pub service: String,

    /// Anchor target.
    pub url: String,

    /// Inline SVG markup placed inside the anchor.
    pub icon_svg: String,
}

impl SocialLink {
    fn new(service: &str, url: &str, title: &str) -> Self {
        Self {
            service: service.to_string(),
            url: url.to_string(),
            icon_svg: format!(
                r#"<svg role="img" viewBox="0 0 24 24" xmlns="http://www.w3.org/2000/svg"><title>{}</title></svg>"#,
                title
            ),
        }
    }
}

/// Timeout configuration for various operations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Upstream connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Total time allowed for one upstream fetch, body included, in seconds.
    pub upstream_secs: u64,

    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            upstream_secs: 10,
            request_secs: 30,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log line format.
    pub log_format: LogFormat,

    /// Default `EnvFilter` directive when `RUST_LOG` is unset.
    pub log_filter: String,

    /// Enable the Prometheus scrape endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_format: LogFormat::Pretty,
            log_filter: "linkpage_edge=debug,tower_http=debug".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
