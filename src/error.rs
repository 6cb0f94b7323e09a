use thiserror::Error;

/// Errors that can occur when building, verifying or decoding macaroons
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MacaroonError {
    /// A sealed third-party caveat failed authenticated decryption
    #[error("Third-party caveat failed integrity check")]
    IntegrityFailure,

    /// No registered checker approved a first-party caveat
    #[error("Predicate not satisfied: {0}")]
    PredicateNotSatisfied(String),

    /// No discharge macaroon was supplied for a third-party caveat
    #[error("Missing discharge macaroon for caveat: {0}")]
    MissingDischarge(String),

    /// A discharge macaroon is required again further down its own chain
    #[error("Discharge cycle detected at caveat: {0}")]
    CaveatCycle(String),

    /// Discharge macaroons are nested deeper than the verifier allows
    #[error("Discharge depth exceeds maximum of {max_depth}")]
    DepthExceeded { max_depth: usize },

    /// The recomputed signature does not match the stored one
    #[error("Signature mismatch")]
    SignatureMismatch,

    /// Key material has the wrong length
    #[error("Invalid key length: expected {expected} bytes, got {actual}")]
    InvalidKeyLength { expected: usize, actual: usize },

    /// Signature bytes have the wrong length
    #[error("Invalid signature length: expected {expected} bytes, got {actual}")]
    InvalidTagLength { expected: usize, actual: usize },

    /// Failed to encode or decode a macaroon
    #[error("Deserialization error: {0}")]
    DeserializationError(String),

    /// Verifier configuration could not be loaded
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl MacaroonError {
    /// Returns true if this error is a verification rejection rather than a
    /// contract or decoding failure
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            MacaroonError::IntegrityFailure
                | MacaroonError::PredicateNotSatisfied(_)
                | MacaroonError::MissingDischarge(_)
                | MacaroonError::CaveatCycle(_)
                | MacaroonError::DepthExceeded { .. }
                | MacaroonError::SignatureMismatch
        )
    }
}
