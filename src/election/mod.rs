//! Election services: catalog, voter registry, ballot ledger and vote intake
//!
//! The intake engine orchestrates the three stores; each store follows the
//! same shape — interior-mutability maps behind a service struct, with
//! absence surfaced as `Option` and expected conflicts as outcome enums.

pub mod catalog;
pub mod intake;
pub mod ledger;
pub mod registry;

// Re-export catalog types
pub use catalog::CatalogStore;

// Re-export registry types
pub use registry::{CompletionResult, VoterRegistry};

// Re-export ledger types
pub use ledger::{AppendResult, BallotLedger};

// Re-export intake engine types
pub use intake::{BallotReceipt, BallotSubmission, VoteClassification, VoteIntakeEngine};
