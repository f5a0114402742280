//! Pingdom API client library.
//!
//! Provides a typed client for the Pingdom REST API: uptime checks, contacts,
//! teams, probes, maintenance windows, and integrations. A client authenticates
//! either with a static API token or with a session token obtained by logging
//! in with username, password and organization id.

pub mod check_types;
pub mod checks;
pub mod client;
pub mod config;
pub mod contacts;
pub mod credential;
pub mod error;
mod handshake;
pub mod helpers;
pub mod integrations;
pub mod maintenance;
pub mod occurrences;
pub mod probes;
pub mod response;
pub mod teams;

pub use check_types::{Check, DnsCheck, HttpCheck, PingCheck, SummaryPerformanceRequest, TcpCheck};
pub use checks::{CheckResponse, MessageResponse};
pub use client::{Client, MultiParams, Params};
pub use config::ClientConfig;
pub use credential::Credential;
pub use error::{ApiError, Error, HandshakeStep, Result};
pub use helpers::format_timestamp_display;
pub use response::{classify, decode, RawResponse};

/// Library version for User-Agent and diagnostics.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
