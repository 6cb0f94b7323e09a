pub mod caveat;
pub mod checker;
pub mod config;
pub mod crypto;
pub mod error;
pub mod key;
pub mod macaroon;
pub mod predicate;
pub mod seal;
pub mod serialization;
pub mod verifier;

pub use caveat::Caveat;
pub use config::VerifierConfig;
pub use error::MacaroonError;
pub use key::{RootKey, Tag};
pub use macaroon::Macaroon;
pub use verifier::{DischargeSet, Verifier};

/// Result type for macaroon operations
pub type Result<T> = std::result::Result<T, MacaroonError>;
