use crate::caveat::Caveat;
use crate::checker::{Checker, ExactChecker, FnChecker};
use crate::config::VerifierConfig;
use crate::crypto::{bind, extend, extend_third_party, seed};
use crate::key::{RootKey, TAG_SIZE, Tag};
use crate::macaroon::Macaroon;
use crate::seal::unseal;
use crate::{MacaroonError, Result};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use subtle::ConstantTimeEq;
use tracing::{debug, trace};

/// Candidate discharge macaroons, keyed by identifier
///
/// When two candidates share an identifier the first one inserted is kept.
#[derive(Debug, Clone, Default)]
pub struct DischargeSet {
    by_identifier: HashMap<Vec<u8>, Macaroon>,
}

impl DischargeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a candidate; returns false if one with the same identifier is
    /// already present
    pub fn insert(&mut self, discharge: Macaroon) -> bool {
        match self.by_identifier.entry(discharge.identifier().to_vec()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(discharge);
                true
            }
        }
    }

    pub fn get(&self, identifier: &[u8]) -> Option<&Macaroon> {
        self.by_identifier.get(identifier)
    }

    pub fn len(&self) -> usize {
        self.by_identifier.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_identifier.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Macaroon> {
        self.by_identifier.values()
    }
}

impl FromIterator<Macaroon> for DischargeSet {
    fn from_iter<I: IntoIterator<Item = Macaroon>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl Extend<Macaroon> for DischargeSet {
    fn extend<I: IntoIterator<Item = Macaroon>>(&mut self, iter: I) {
        for discharge in iter {
            self.insert(discharge);
        }
    }
}

/// State of one verification call, threaded through the discharge recursion
struct VerificationContext<'a> {
    discharges: &'a DischargeSet,
    /// Signature of the top-level macaroon every discharge is bound to
    authorizing: &'a Tag,
    depth: usize,
    /// Discharge identifiers on the current recursion path
    path: Vec<&'a [u8]>,
    /// Discharges already accepted in this call, keyed by identifier and the
    /// seed tag of the recovered key, with the deepest level they passed at
    verified: HashMap<(&'a [u8], [u8; TAG_SIZE]), usize>,
    /// Number of chains recomputed so far
    chains: usize,
}

impl<'a> VerificationContext<'a> {
    fn new(discharges: &'a DischargeSet, authorizing: &'a Tag) -> Self {
        Self {
            discharges,
            authorizing,
            depth: 0,
            path: Vec::new(),
            verified: HashMap::new(),
            chains: 0,
        }
    }
}

/// Verifies macaroons and their discharges
///
/// Checkers are consulted in registration order for every first-party
/// caveat; the first approval satisfies it. With no checkers registered,
/// every first-party caveat is rejected.
///
/// # Example
/// ```
/// use macaroons::{DischargeSet, Macaroon, Verifier};
///
/// let macaroon = Macaroon::create(b"key", b"id", None::<String>)
///     .add_first_party_caveat(b"account = 3735928559");
///
/// let verifier = Verifier::new().satisfy_exact("account = 3735928559");
/// assert!(verifier.verify(&macaroon, b"key", &DischargeSet::new()).is_ok());
/// ```
#[derive(Default)]
pub struct Verifier {
    checkers: Vec<Box<dyn Checker>>,
    config: VerifierConfig,
}

impl Verifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: VerifierConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_max_discharge_depth(mut self, max_depth: usize) -> Self {
        self.config.max_discharge_depth = max_depth;
        self
    }

    /// Registers a checker after the existing ones
    pub fn with_checker<C: Checker + 'static>(mut self, checker: C) -> Self {
        self.checkers.push(Box::new(checker));
        self
    }

    /// Approves first-party caveats equal to `predicate`
    pub fn satisfy_exact(self, predicate: impl Into<Vec<u8>>) -> Self {
        self.with_checker(ExactChecker::new(predicate))
    }

    /// Approves first-party caveats for which `func` returns true
    pub fn satisfy_general<F>(self, func: F) -> Self
    where
        F: Fn(&[u8]) -> bool + Send + Sync + 'static,
    {
        self.with_checker(FnChecker::new(func))
    }

    pub fn config(&self) -> &VerifierConfig {
        &self.config
    }

    /// Verifies a macaroon minted from `secret`, with the discharges that
    /// satisfy its third-party caveats
    ///
    /// # Returns
    /// * `Ok(())` if every signature in the chain is valid and every caveat
    ///   is satisfied
    /// * `Err(MacaroonError)` with the first reason for rejection otherwise
    pub fn verify(
        &self,
        macaroon: &Macaroon,
        secret: &[u8],
        discharges: &DischargeSet,
    ) -> Result<()> {
        self.verify_with_root_key(macaroon, &RootKey::derive(secret), discharges)
    }

    /// Like [`Verifier::verify`], for issuers that keep the derived root key
    pub fn verify_with_root_key(
        &self,
        macaroon: &Macaroon,
        root_key: &RootKey,
        discharges: &DischargeSet,
    ) -> Result<()> {
        let mut context = VerificationContext::new(discharges, macaroon.signature());

        let outcome = self.verify_chain(macaroon, root_key, &mut context);
        match &outcome {
            Ok(()) => debug!(
                caveats = macaroon.caveat_count(),
                discharges = discharges.len(),
                chains = context.chains,
                "macaroon verified"
            ),
            Err(reason) => debug!(%reason, "macaroon rejected"),
        }
        outcome
    }

    /// Returns true if [`Verifier::verify`] accepts the macaroon
    pub fn is_valid(&self, macaroon: &Macaroon, secret: &[u8], discharges: &DischargeSet) -> bool {
        self.verify(macaroon, secret, discharges).is_ok()
    }

    fn satisfies(&self, predicate: &[u8]) -> bool {
        self.checkers.iter().any(|checker| checker.check(predicate))
    }

    /// Recomputes `macaroon`'s chain from `root_key`, recursing into the
    /// discharge of every third-party caveat
    fn verify_chain<'a>(
        &self,
        macaroon: &Macaroon,
        root_key: &RootKey,
        context: &mut VerificationContext<'a>,
    ) -> Result<()> {
        context.chains += 1;
        let mut tag = seed(root_key, macaroon.identifier());

        for (index, caveat) in macaroon.caveats().iter().enumerate() {
            match caveat {
                Caveat::FirstParty { predicate } => {
                    trace!(depth = context.depth, index, "checking first-party caveat");
                    if !self.satisfies(predicate) {
                        return Err(MacaroonError::PredicateNotSatisfied(
                            String::from_utf8_lossy(predicate).into_owned(),
                        ));
                    }
                    tag = extend(&tag, predicate);
                }
                Caveat::ThirdParty {
                    verification_id,
                    identifier,
                    ..
                } => {
                    trace!(depth = context.depth, index, "checking third-party caveat");
                    self.verify_discharge(&tag, verification_id, identifier, context)?;
                    tag = extend_third_party(&tag, verification_id, identifier);
                }
            }
        }

        let expected = if context.depth == 0 {
            tag
        } else {
            bind(context.authorizing, &tag)
        };

        if bool::from(expected.ct_eq(macaroon.signature())) {
            Ok(())
        } else {
            Err(MacaroonError::SignatureMismatch)
        }
    }

    fn verify_discharge<'a>(
        &self,
        tag: &Tag,
        verification_id: &[u8],
        identifier: &[u8],
        context: &mut VerificationContext<'a>,
    ) -> Result<()> {
        let discharges = context.discharges;
        let discharge = discharges
            .get(identifier)
            .ok_or_else(|| MacaroonError::MissingDischarge(lossy(identifier)))?;

        let discharge_key = unseal(tag, verification_id)?;

        if context.path.contains(&discharge.identifier()) {
            return Err(MacaroonError::CaveatCycle(lossy(identifier)));
        }
        if context.depth >= self.config.max_discharge_depth {
            return Err(MacaroonError::DepthExceeded {
                max_depth: self.config.max_discharge_depth,
            });
        }

        // A discharge that passed at this depth or deeper passes here too
        let depth = context.depth + 1;
        let fingerprint = *seed(&discharge_key, discharge.identifier()).as_bytes();
        let memo = (discharge.identifier(), fingerprint);
        if context.verified.get(&memo).is_some_and(|&passed| passed >= depth) {
            trace!(depth, "discharge already verified");
            return Ok(());
        }

        context.depth = depth;
        context.path.push(discharge.identifier());
        let outcome = self.verify_chain(discharge, &discharge_key, context);
        context.path.pop();
        context.depth -= 1;

        if outcome.is_ok() {
            context.verified.insert(memo, depth);
        }
        outcome
    }
}

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}
