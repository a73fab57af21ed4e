//! Voter registry: national-ID lookup, location updates and the one-shot
//! voting-status transition
//!
//! The status flag is a two-state machine: `HasNotVoted -> HasVoted`, fired
//! exactly once by [`VoterRegistry::complete_voting`]. A repeat call is not
//! an error — it reports [`CompletionResult::AlreadyCompleted`] so callers
//! can tell "done just now" from "was already done" without string matching.

use crate::config::ElectionConfig;
use crate::types::{NewVoter, Voter, VotingStatus};
use crate::{Error, Result, storage_error};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicI32, Ordering};

/// Outcome of a voting-completion attempt
#[derive(Debug, Clone, PartialEq)]
pub enum CompletionResult {
    /// The transition fired: the voter is now `HasVoted` with a stamped
    /// completion timestamp
    Completed(Voter),

    /// The voter had already completed voting; nothing changed
    AlreadyCompleted(Voter),
}

impl CompletionResult {
    /// The voter record after the attempt, whichever way it went
    pub fn voter(&self) -> &Voter {
        match self {
            CompletionResult::Completed(v) | CompletionResult::AlreadyCompleted(v) => v,
        }
    }
}

/// In-memory voter registry keyed by national ID
pub struct VoterRegistry {
    voters: RwLock<HashMap<String, Voter>>,
    next_id: AtomicI32,
    config: ElectionConfig,
}

impl VoterRegistry {
    /// Create an empty registry
    pub fn new(config: ElectionConfig) -> Self {
        Self {
            voters: RwLock::new(HashMap::new()),
            next_id: AtomicI32::new(1),
            config,
        }
    }

    /// Create for testing with default configuration
    pub fn for_testing() -> Self {
        Self::new(ElectionConfig::for_testing())
    }

    /// Enroll a voter
    ///
    /// Validates the national-ID format, its uniqueness, and the location
    /// dependency (province requires department, district requires province).
    /// Status starts at `HasNotVoted`.
    pub fn register(&self, new_voter: NewVoter) -> Result<Voter> {
        if !self.config.is_valid_national_id(&new_voter.national_id) {
            return Err(Error::validation("national_id"));
        }
        if new_voter.department.trim().is_empty() {
            return Err(Error::validation("department"));
        }
        if new_voter.district.is_some() && new_voter.province.is_none() {
            return Err(Error::validation("district requires province"));
        }

        let mut voters = self
            .voters
            .write()
            .map_err(|_| storage_error!("voter registry write lock poisoned"))?;

        if voters.contains_key(&new_voter.national_id) {
            return Err(Error::validation("national_id already enrolled"));
        }

        let voter = Voter {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            national_id: new_voter.national_id.clone(),
            given_names: new_voter.given_names,
            family_names: new_voter.family_names,
            birth_date: new_voter.birth_date,
            sex: new_voter.sex,
            department: new_voter.department,
            province: new_voter.province,
            district: new_voter.district,
            status: VotingStatus::HasNotVoted,
            last_access: None,
        };
        voters.insert(voter.national_id.clone(), voter.clone());
        Ok(voter)
    }

    /// Look up a voter by national ID
    pub fn find_by_national_id(&self, national_id: &str) -> Result<Option<Voter>> {
        let voters = self
            .voters
            .read()
            .map_err(|_| storage_error!("voter registry read lock poisoned"))?;
        Ok(voters.get(national_id).cloned())
    }

    /// Overwrite the voter's three location fields, leaving all else untouched
    pub fn update_location(
        &self,
        national_id: &str,
        department: String,
        province: Option<String>,
        district: Option<String>,
    ) -> Result<Voter> {
        if district.is_some() && province.is_none() {
            return Err(Error::validation("district requires province"));
        }

        let mut voters = self
            .voters
            .write()
            .map_err(|_| storage_error!("voter registry write lock poisoned"))?;

        let voter = voters
            .get_mut(national_id)
            .ok_or_else(|| Error::VoterNotFound {
                national_id: national_id.to_string(),
            })?;

        voter.department = department;
        voter.province = province;
        voter.district = district;
        Ok(voter.clone())
    }

    /// Fire the `HasNotVoted -> HasVoted` transition
    ///
    /// Stamps the completion timestamp on the first call; subsequent calls
    /// are no-ops reported as [`CompletionResult::AlreadyCompleted`].
    pub fn complete_voting(&self, national_id: &str) -> Result<CompletionResult> {
        let mut voters = self
            .voters
            .write()
            .map_err(|_| storage_error!("voter registry write lock poisoned"))?;

        let voter = voters
            .get_mut(national_id)
            .ok_or_else(|| Error::VoterNotFound {
                national_id: national_id.to_string(),
            })?;

        if voter.status == VotingStatus::HasVoted {
            tracing::debug!(
                national_id,
                "completion requested for voter already in HasVoted"
            );
            return Ok(CompletionResult::AlreadyCompleted(voter.clone()));
        }

        voter.status = VotingStatus::HasVoted;
        voter.last_access = Some(Utc::now());

        tracing::info!(national_id, "✅ voter completed final submission");
        Ok(CompletionResult::Completed(voter.clone()))
    }

    /// List all enrolled voters, ordered by surrogate id
    pub fn list_all(&self) -> Result<Vec<Voter>> {
        let voters = self
            .voters
            .read()
            .map_err(|_| storage_error!("voter registry read lock poisoned"))?;
        let mut all: Vec<Voter> = voters.values().cloned().collect();
        all.sort_by_key(|v| v.id);
        Ok(all)
    }
}
