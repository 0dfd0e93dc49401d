use thiserror::Error;

/// Shared error type used across all marketplace crates.
///
/// Every variant carries a stable wire code so handlers can encode logical
/// failures in the JSON body without leaking internals.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("auth error: {0}")]
    Auth(String),

    #[error("ownership error: {0}")]
    Ownership(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("rate limited: {0}")]
    RateLimited(String),

    #[error("signature timestamp outside freshness window")]
    ExpiredSignature,

    #[error("signature verification failed")]
    InvalidSignature,

    #[error("not enough items available in the collection")]
    InsufficientSupply,

    #[error("collection does not exist or is not open for minting")]
    CollectionUnavailable,

    #[error("not found: {0}")]
    NotFound(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Stable machine-readable code for the JSON error envelope.
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "validation_error",
            ApiError::Auth(_) => "auth_error",
            ApiError::Ownership(_) => "ownership_error",
            ApiError::Conflict(_) => "conflict",
            ApiError::RateLimited(_) => "rate_limited",
            ApiError::ExpiredSignature => "expired_signature",
            ApiError::InvalidSignature => "invalid_signature",
            ApiError::InsufficientSupply => "insufficient_supply",
            ApiError::CollectionUnavailable => "collection_unavailable",
            ApiError::NotFound(_) => "not_found",
            ApiError::Internal(_) => "internal_error",
        }
    }

    /// Wrap an unexpected store failure.
    pub fn internal(err: impl std::fmt::Display) -> Self {
        ApiError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable() {
        assert_eq!(ApiError::ExpiredSignature.code(), "expired_signature");
        assert_eq!(ApiError::InsufficientSupply.code(), "insufficient_supply");
        assert_eq!(
            ApiError::Validation("nickname too short".into()).code(),
            "validation_error"
        );
    }
}
