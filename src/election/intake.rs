//! Vote intake engine
//!
//! The orchestrator of a ballot submission: validate, classify (valid vs.
//! null), snapshot denormalized context, append to the ledger, and expose the
//! voter's final-submission transition. Stateless between invocations; all
//! state lives in the three stores it holds.
//!
//! Classification happens before persistence so exactly one canonical
//! representation of a null vote exists in the ledger: no candidate, no
//! party, no office. Candidate name, party name and the voter's location are
//! copied onto the ballot at cast time, keeping the ledger a self-contained
//! audit trail immune to later catalog or registry edits.

use crate::election::catalog::CatalogStore;
use crate::election::ledger::{AppendResult, BallotLedger};
use crate::election::registry::{CompletionResult, VoterRegistry};
use crate::types::{Ballot, BallotOutcome, CandidateSnapshot, Office, Voter};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// A ballot submission as received from the transport layer
///
/// `candidate_reference` uses the wire convention of the enrollment system:
/// absent or `0` means an explicit null vote, a positive id references a
/// catalog candidate, anything else is malformed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BallotSubmission {
    pub voter_national_id: String,
    pub candidate_reference: Option<i32>,
    pub office: Option<Office>,
}

/// How a submission was classified
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VoteClassification {
    /// A vote for a resolved candidate
    Valid,
    /// An explicit null vote
    Null,
}

/// Returned to the caller once a ballot has been durably recorded
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BallotReceipt {
    pub ballot_id: Uuid,
    pub voter_national_id: String,
    pub classification: VoteClassification,
    /// Office the ballot counts for; absent on null votes
    pub office: Option<Office>,
    /// Resolved candidate name; absent on null votes
    pub candidate_name: Option<String>,
}

/// Orchestrates ballot submissions against the catalog, registry and ledger
pub struct VoteIntakeEngine {
    catalog: Arc<CatalogStore>,
    registry: Arc<VoterRegistry>,
    ledger: Arc<BallotLedger>,
}

impl VoteIntakeEngine {
    /// Create an engine over the three backing stores
    pub fn new(
        catalog: Arc<CatalogStore>,
        registry: Arc<VoterRegistry>,
        ledger: Arc<BallotLedger>,
    ) -> Self {
        Self {
            catalog,
            registry,
            ledger,
        }
    }

    /// Create for testing with fresh empty stores
    pub fn for_testing() -> Self {
        Self::new(
            Arc::new(CatalogStore::new()),
            Arc::new(VoterRegistry::for_testing()),
            Arc::new(BallotLedger::new()),
        )
    }

    /// Process one ballot submission
    ///
    /// Validation sequence (fail-fast, nothing persisted on failure):
    /// 1. voter national ID present and non-blank
    /// 2. office present unless the submission is a null vote, in which case
    ///    the office is discarded and stored absent
    /// 3. voter resolved against the registry
    /// 4. candidate reference classified: absent/zero → null vote; positive →
    ///    candidate resolved (a dangling party reference is tolerated and
    ///    recorded as "no party"); negative → malformed
    /// 5. ballot built with the voter's current location snapshot
    /// 6. ballot appended to the ledger — the point of no return; a duplicate
    ///    (voter, office) pair is rejected with nothing written
    pub fn submit_ballot(&self, submission: BallotSubmission) -> Result<BallotReceipt> {
        let national_id = submission.voter_national_id.trim();
        if national_id.is_empty() {
            return Err(Error::missing_field("voter_national_id"));
        }

        let is_null_vote = matches!(submission.candidate_reference, None | Some(0));
        if !is_null_vote && submission.office.is_none() {
            return Err(Error::missing_field("office"));
        }

        let voter = self
            .registry
            .find_by_national_id(national_id)?
            .ok_or_else(|| Error::VoterNotFound {
                national_id: national_id.to_string(),
            })?;

        let outcome = match submission.candidate_reference {
            // Explicit null vote: no candidate resolution, office discarded
            None | Some(0) => BallotOutcome::Null,
            Some(candidate_id) if candidate_id > 0 => {
                // Office presence was checked above
                let office = submission.office.ok_or_else(|| Error::missing_field("office"))?;
                let candidate = self
                    .catalog
                    .candidate(candidate_id)?
                    .ok_or(Error::CandidateNotFound { candidate_id })?;

                // A dangling or absent party reference is "no party"
                let party_name = match candidate.party_id {
                    Some(party_id) => self.catalog.party(party_id)?.map(|p| p.name),
                    None => None,
                };

                BallotOutcome::Valid {
                    office,
                    candidate: CandidateSnapshot {
                        candidate_id: candidate.id,
                        candidate_name: candidate.full_name,
                        party_name,
                    },
                }
            }
            Some(reference) => {
                return Err(Error::MalformedCandidateReference { reference });
            }
        };

        let ballot = Ballot::new(
            national_id.to_string(),
            outcome,
            voter.location_snapshot(),
        );

        let ballot = match self.ledger.append(ballot) {
            Ok(AppendResult::Appended(ballot)) => ballot,
            Ok(AppendResult::Duplicate(existing)) => {
                return Err(Error::DuplicateBallot {
                    national_id: national_id.to_string(),
                    office: existing.outcome.office(),
                });
            }
            Err(err) => {
                // Infrastructure fault: record it and surface as-is, no retry
                tracing::error!(national_id, error = %err, "ballot append failed");
                return Err(err);
            }
        };

        let classification = if ballot.outcome.is_null() {
            VoteClassification::Null
        } else {
            VoteClassification::Valid
        };
        let candidate_name = ballot
            .outcome
            .candidate()
            .map(|c| c.candidate_name.clone());

        match classification {
            VoteClassification::Null => {
                tracing::info!(national_id, ballot_id = %ballot.id, "✓ null vote recorded");
            }
            VoteClassification::Valid => {
                tracing::info!(
                    national_id,
                    ballot_id = %ballot.id,
                    candidate = candidate_name.as_deref(),
                    office = ?ballot.outcome.office(),
                    "✓ valid vote recorded"
                );
            }
        }

        Ok(BallotReceipt {
            ballot_id: ballot.id,
            voter_national_id: national_id.to_string(),
            classification,
            office: ballot.outcome.office(),
            candidate_name,
        })
    }

    /// Fire the voter's final-submission transition
    ///
    /// Terminal step of the voting flow, after all per-office ballots have
    /// been submitted. A repeat call reports
    /// [`CompletionResult::AlreadyCompleted`] rather than erroring.
    pub fn finalize_voting(&self, national_id: &str) -> Result<CompletionResult> {
        self.registry.complete_voting(national_id)
    }

    /// Overwrite the voter's administrative location before casting
    pub fn update_voter_location(
        &self,
        national_id: &str,
        department: String,
        province: Option<String>,
        district: Option<String>,
    ) -> Result<Voter> {
        self.registry
            .update_location(national_id, department, province, district)
    }

    /// The catalog backing this engine
    pub fn catalog(&self) -> &Arc<CatalogStore> {
        &self.catalog
    }

    /// The voter registry backing this engine
    pub fn registry(&self) -> &Arc<VoterRegistry> {
        &self.registry
    }

    /// The ballot ledger backing this engine
    pub fn ledger(&self) -> &Arc<BallotLedger> {
        &self.ledger
    }
}
