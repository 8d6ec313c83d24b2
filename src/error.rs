// Error types shared across the crate. The variants mirror the failure
// classes the tool can actually hit: bad local configuration, a manifest
// file we cannot make sense of, and a remote page that does not look the
// way the administration site normally renders it.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Local configuration problems: unreadable password source, missing
    /// environment variable, and the like.
    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// The expected form was not present on the page. This is usually a
    /// failed login (the site serves the login page again) or a page
    /// layout change on the remote side.
    #[error("form {id:?} not found on {url}")]
    FormNotFound { id: String, url: String },

    /// A field we expected to fill in does not exist on the selected form.
    #[error("form has no field named {0:?}")]
    UnknownField(String),

    /// A counter field did not hold an integer.
    #[error("cannot parse field {field:?} value {value:?} as an integer")]
    InvalidCounter { field: String, value: String },

    /// A counter field parsed, but its value makes no sense for a formset
    /// that always carries a blank trailing record.
    #[error("field {field:?} must be at least 1 (got {value:?})")]
    CounterOutOfRange { field: String, value: String },

    #[error("no page is open")]
    NoPageOpen,

    #[error("no form is selected")]
    NoFormSelected,

    #[error("invalid url: {0}")]
    BadUrl(String),

    #[error("too many redirects while fetching {0}")]
    TooManyRedirects(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Problems reading or traversing the local manifest file.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("unable to read manifest file {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("manifest file {path:?} is not valid JSON: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// Dotted-path traversal ran into a string where a mapping was needed.
    #[error("unexpected string at {partial:?} (full path: {full:?})")]
    UnexpectedString { partial: String, full: String },

    /// Dotted-path traversal ran into a list where a mapping was needed.
    #[error("unexpected list at {partial:?} (full path: {full:?})")]
    UnexpectedList { partial: String, full: String },
}
