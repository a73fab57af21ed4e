//! Append-only ballot ledger
//!
//! Every accepted ballot lands here exactly once and is never updated or
//! deleted. The ledger also owns the at-most-one-ballot-per-(voter, office)
//! invariant: [`BallotLedger::append`] is a conditional insert that checks
//! the contest key and stores the ballot inside one write-lock critical
//! section, so two racing submissions for the same contest cannot both land.

use crate::types::Ballot;
use crate::{Result, storage_error};
use std::collections::HashMap;
use std::sync::RwLock;
use uuid::Uuid;

/// Outcome of an append attempt
#[derive(Debug, Clone, PartialEq)]
pub enum AppendResult {
    /// The ballot was recorded
    Appended(Ballot),

    /// A ballot for this (voter, office) pair already exists; nothing was
    /// written. Carries the previously accepted ballot.
    Duplicate(Ballot),
}

/// Storage behind one lock so check-then-insert is atomic
struct LedgerInner {
    ballots: HashMap<Uuid, Ballot>,
    by_contest: HashMap<String, Uuid>,
}

/// In-memory append-only store of cast ballots
pub struct BallotLedger {
    inner: RwLock<LedgerInner>,
}

impl BallotLedger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(LedgerInner {
                ballots: HashMap::new(),
                by_contest: HashMap::new(),
            }),
        }
    }

    /// Conditionally append a ballot
    ///
    /// The contest key `(national_id, office-or-null)` is checked and the
    /// ballot inserted under a single write lock. Under concurrent or
    /// repeated submission for the same contest, exactly one ballot wins and
    /// the rest see [`AppendResult::Duplicate`].
    pub fn append(&self, ballot: Ballot) -> Result<AppendResult> {
        let key = ballot.contest_key();

        let mut inner = self
            .inner
            .write()
            .map_err(|_| storage_error!("ballot ledger write lock poisoned"))?;

        if let Some(existing_id) = inner.by_contest.get(&key)
            && let Some(existing) = inner.ballots.get(existing_id)
        {
            return Ok(AppendResult::Duplicate(existing.clone()));
        }

        inner.by_contest.insert(key, ballot.id);
        inner.ballots.insert(ballot.id, ballot.clone());
        Ok(AppendResult::Appended(ballot))
    }

    /// Look up a ballot by identity
    pub fn ballot(&self, id: Uuid) -> Result<Option<Ballot>> {
        let inner = self
            .inner
            .read()
            .map_err(|_| storage_error!("ballot ledger read lock poisoned"))?;
        Ok(inner.ballots.get(&id).cloned())
    }

    /// All ballots cast by one voter, oldest first
    pub fn ballots_for_voter(&self, national_id: &str) -> Result<Vec<Ballot>> {
        let inner = self
            .inner
            .read()
            .map_err(|_| storage_error!("ballot ledger read lock poisoned"))?;

        let mut ballots: Vec<Ballot> = inner
            .ballots
            .values()
            .filter(|b| b.national_id == national_id)
            .cloned()
            .collect();
        ballots.sort_by_key(|b| b.created_at);
        Ok(ballots)
    }

    /// The full ledger, oldest first (auditing)
    pub fn all(&self) -> Result<Vec<Ballot>> {
        let inner = self
            .inner
            .read()
            .map_err(|_| storage_error!("ballot ledger read lock poisoned"))?;

        let mut ballots: Vec<Ballot> = inner.ballots.values().cloned().collect();
        ballots.sort_by_key(|b| b.created_at);
        Ok(ballots)
    }

    /// Number of recorded ballots
    pub fn len(&self) -> Result<usize> {
        let inner = self
            .inner
            .read()
            .map_err(|_| storage_error!("ballot ledger read lock poisoned"))?;
        Ok(inner.ballots.len())
    }

    /// Whether the ledger is empty
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

impl Default for BallotLedger {
    fn default() -> Self {
        Self::new()
    }
}
