//! # Core Types for the Vote Intake System
//!
//! Domain entities shared by the catalog, registry, ledger and intake engine.
//!
//! Two modelling rules shape this module:
//!
//! - **Closed enumerations over strings**: the contested office and the
//!   voter's status are enums, never free-form text, so a typo can not
//!   corrupt the state machine or the tally keys.
//! - **Snapshots over references**: a [`Ballot`] carries value-copies of the
//!   candidate name, party name and voter location taken at cast time
//!   ([`CandidateSnapshot`], [`LocationSnapshot`]). The ledger stays a
//!   self-contained audit trail even if catalog or registry records are
//!   edited later.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// A contested position a ballot is cast for
///
/// The set is closed: a candidate or ballot can only ever reference one of
/// these four offices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Office {
    President,
    VicePresident,
    Congressperson,
    AndeanParliamentarian,
}

impl Office {
    /// All offices, in ballot order
    pub const ALL: [Office; 4] = [
        Office::President,
        Office::VicePresident,
        Office::Congressperson,
        Office::AndeanParliamentarian,
    ];

    /// Whether this office is contested per electoral district
    ///
    /// Only district-scoped offices carry a meaningful `district` on their
    /// candidates; the catalog rejects a district anywhere else.
    pub fn is_district_scoped(&self) -> bool {
        matches!(self, Office::Congressperson)
    }
}

impl fmt::Display for Office {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Office::President => "President",
            Office::VicePresident => "Vice-President",
            Office::Congressperson => "Congressperson",
            Office::AndeanParliamentarian => "Andean Parliamentarian",
        };
        write!(f, "{label}")
    }
}

impl FromStr for Office {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim() {
            "President" => Ok(Office::President),
            "Vice-President" => Ok(Office::VicePresident),
            "Congressperson" => Ok(Office::Congressperson),
            "Andean Parliamentarian" => Ok(Office::AndeanParliamentarian),
            other => Err(format!("unknown office: {other}")),
        }
    }
}

/// A registered political party
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Party {
    /// Unique party identifier, assigned by the catalog
    pub id: i32,

    /// Display name, unique across the catalog
    pub name: String,

    /// Opaque symbol reference (URL or asset path)
    pub symbol: Option<String>,
}

/// Administrative status of a candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CandidateStatus {
    Active,
    Withdrawn,
}

/// A candidate standing for one office
///
/// The party reference is optional and may dangle after a party is removed;
/// the intake engine treats a dangling reference as "no party" rather than
/// failing the submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Unique candidate identifier, assigned by the catalog
    pub id: i32,

    /// Optional reference to the candidate's party
    pub party_id: Option<i32>,

    /// Official full name as it appears on the ballot
    pub full_name: String,

    /// Candidate biography, empty when not provided
    pub biography: String,

    /// Ordered list of campaign proposals
    pub proposals: Vec<String>,

    /// The office this candidate stands for
    pub office: Office,

    /// Electoral district, only meaningful for district-scoped offices
    pub district: Option<String>,

    /// Optional photo reference (URL or asset path)
    pub photo: Option<String>,

    /// Administrative status
    pub status: CandidateStatus,
}

/// Whether a voter has completed their final ballot submission
///
/// The transition `HasNotVoted -> HasVoted` fires exactly once, through
/// [`crate::election::VoterRegistry::complete_voting`]. There is no reverse
/// transition and no other state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum VotingStatus {
    #[default]
    HasNotVoted,
    HasVoted,
}

/// An enrolled voter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Voter {
    /// Surrogate identifier, assigned by the registry
    pub id: i32,

    /// National ID: unique, fixed-length numeric string
    pub national_id: String,

    /// Given names
    pub given_names: String,

    /// Family names
    pub family_names: String,

    /// Date of birth
    pub birth_date: NaiveDate,

    /// Sex as recorded on the national register
    pub sex: String,

    /// Administrative department (required, coarsest level)
    pub department: String,

    /// Administrative province; requires `department`
    pub province: Option<String>,

    /// Administrative district; requires `province`
    pub district: Option<String>,

    /// Voting status, `HasNotVoted` on enrollment
    pub status: VotingStatus,

    /// Timestamp of final-submission completion
    pub last_access: Option<DateTime<Utc>>,
}

impl Voter {
    /// Copy the voter's current administrative location
    pub fn location_snapshot(&self) -> LocationSnapshot {
        LocationSnapshot {
            department: self.department.clone(),
            province: self.province.clone(),
            district: self.district.clone(),
        }
    }

    /// Whether this voter has completed their final submission
    pub fn has_voted(&self) -> bool {
        self.status == VotingStatus::HasVoted
    }
}

/// Enrollment data for a new voter
///
/// The registry assigns the surrogate id and defaults the status; everything
/// else comes from the enrollment source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewVoter {
    pub national_id: String,
    pub given_names: String,
    pub family_names: String,
    pub birth_date: NaiveDate,
    pub sex: String,
    pub department: String,
    pub province: Option<String>,
    pub district: Option<String>,
}

/// Voter location copied onto a ballot at cast time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationSnapshot {
    pub department: String,
    pub province: Option<String>,
    pub district: Option<String>,
}

/// Candidate and party identity copied onto a ballot at cast time
///
/// Denormalized on purpose: later edits to catalog records must not change
/// what a historical ballot says was voted for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateSnapshot {
    /// Catalog id of the candidate at cast time
    pub candidate_id: i32,

    /// Candidate's full name at cast time
    pub candidate_name: String,

    /// Party name at cast time; `None` for independents or when the party
    /// reference dangled
    pub party_name: Option<String>,
}

/// The outcome recorded on a ballot
///
/// A null vote carries no candidate and no office, so exactly one encoding of
/// "null" exists in the ledger and tally logic never has to special-case
/// alternative representations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BallotOutcome {
    /// A vote for a resolved candidate in a specific contest
    Valid {
        office: Office,
        candidate: CandidateSnapshot,
    },

    /// An explicit null vote: no candidate, no office attribution
    Null,
}

impl BallotOutcome {
    /// The office this outcome is attributed to, absent for null votes
    pub fn office(&self) -> Option<Office> {
        match self {
            BallotOutcome::Valid { office, .. } => Some(*office),
            BallotOutcome::Null => None,
        }
    }

    /// The candidate snapshot, absent for null votes
    pub fn candidate(&self) -> Option<&CandidateSnapshot> {
        match self {
            BallotOutcome::Valid { candidate, .. } => Some(candidate),
            BallotOutcome::Null => None,
        }
    }

    /// Whether this outcome is a null vote
    pub fn is_null(&self) -> bool {
        matches!(self, BallotOutcome::Null)
    }
}

/// A cast ballot, the ledger's immutable unit of record
///
/// Ballots are append-only: the ledger exposes no update or delete surface,
/// and every field is a value captured at cast time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ballot {
    /// Unique ballot identifier
    pub id: Uuid,

    /// National ID of the voter who cast this ballot
    pub national_id: String,

    /// What was voted: a candidate in a contest, or a null vote
    pub outcome: BallotOutcome,

    /// The voter's administrative location at cast time
    pub location: LocationSnapshot,

    /// When the ballot was recorded
    pub created_at: DateTime<Utc>,
}

impl Ballot {
    /// Create a ballot record with a fresh identity and timestamp
    pub fn new(national_id: String, outcome: BallotOutcome, location: LocationSnapshot) -> Self {
        Self {
            id: Uuid::new_v4(),
            national_id,
            outcome,
            location,
            created_at: Utc::now(),
        }
    }

    /// Ledger uniqueness key: one accepted ballot per (voter, office)
    ///
    /// Null votes share the absent-office key, so a voter gets at most one
    /// null ballot.
    pub fn contest_key(&self) -> String {
        contest_key(&self.national_id, self.outcome.office())
    }
}

/// Build the (voter, office) uniqueness key used by the ledger
pub fn contest_key(national_id: &str, office: Option<Office>) -> String {
    match office {
        Some(office) => format!("ballot:{national_id}:{office}"),
        None => format!("ballot:{national_id}:null"),
    }
}
