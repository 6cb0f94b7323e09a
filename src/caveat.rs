use serde::{Deserialize, Serialize};

/// A caveat represents a restriction on the authorization granted by a macaroon.
/// Caveats can be either first-party (checked by the verifying service) or
/// third-party (discharged by an external authority).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Caveat {
    /// A predicate checked locally by the verifier's checkers
    FirstParty {
        /// The opaque predicate bytes (e.g. `account = alice`)
        predicate: Vec<u8>,
    },

    /// A condition that a discharge macaroon must prove
    ThirdParty {
        /// Location hint for the discharging authority
        location: String,
        /// The sealed discharge root key
        verification_id: Vec<u8>,
        /// Identifier a discharge macaroon must carry to satisfy this caveat
        identifier: Vec<u8>,
    },
}

impl Caveat {
    /// Creates a new first-party caveat
    pub fn first_party(predicate: impl Into<Vec<u8>>) -> Self {
        Caveat::FirstParty {
            predicate: predicate.into(),
        }
    }

    /// Creates a new third-party caveat from an already sealed verification-id
    pub fn third_party(
        location: impl Into<String>,
        verification_id: impl Into<Vec<u8>>,
        identifier: impl Into<Vec<u8>>,
    ) -> Self {
        Caveat::ThirdParty {
            location: location.into(),
            verification_id: verification_id.into(),
            identifier: identifier.into(),
        }
    }

    pub fn is_first_party(&self) -> bool {
        matches!(self, Caveat::FirstParty { .. })
    }

    pub fn is_third_party(&self) -> bool {
        matches!(self, Caveat::ThirdParty { .. })
    }

    /// The caveat's `cid`: the predicate for first-party caveats, the
    /// discharge identifier for third-party ones
    pub fn caveat_id(&self) -> &[u8] {
        match self {
            Caveat::FirstParty { predicate } => predicate,
            Caveat::ThirdParty { identifier, .. } => identifier,
        }
    }
}
