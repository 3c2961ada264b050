use thiserror::Error;

/// Errors crossing the handler chain.
///
/// `Clone` is required: a single upstream failure is handed to every waiter
/// of a coalesced fetch.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid domain name: {0}")]
    InvalidDomainName(String),

    #[error("Invalid DNS response: {0}")]
    InvalidDnsResponse(String),

    #[error("Malformed DNS query: {0}")]
    MalformedQuery(String),

    #[error("Failed to encode DNS message: {0}")]
    Encode(String),

    #[error("Query timeout")]
    QueryTimeout,

    #[error("Upstream error from {server}: {reason}")]
    Upstream { server: String, reason: String },

    #[error("Transport connection refused by {server}")]
    TransportConnectionRefused { server: String },

    #[error("No next handler in chain for zone {0}")]
    NoNextHandler(String),

    #[error("In-flight fetch aborted before producing a result")]
    FetchAborted,

    #[error("Configuration error: {0}")]
    ConfigError(String),
}
