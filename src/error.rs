//! Error types for fetching, storage and delivery.
//!
//! Fetch errors never leave an agent: they are logged per source and the
//! source yields nothing. Storage and delivery errors are the only failures
//! allowed to surface at run level.

use std::path::PathBuf;
use thiserror::Error;

/// A single source could not be fetched or parsed.
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP request failed (connect, timeout, body read).
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server answered with a non-success status.
    #[error("HTTP {status} for {url}")]
    Status { status: u16, url: String },

    /// Response body was not a readable RSS/Atom feed.
    #[error("feed parse error: {0}")]
    Feed(#[from] feed_rs::parser::ParseFeedError),
}

/// The daily store could not be read or written.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A daily file's record list could not be decoded or encoded.
    #[error("corrupt daily file {path}: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// The digest could not be delivered.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("email credentials not configured (need sender address, app password and recipient)")]
    MissingCredentials,

    #[error("invalid email address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("failed to build message: {0}")]
    Message(#[from] lettre::error::Error),

    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}

/// Agent name that matches no category.
#[derive(Debug, Error)]
#[error("unknown agent: {0}. Available: news, papers, grants, funding, github")]
pub struct UnknownCategory(pub String);
