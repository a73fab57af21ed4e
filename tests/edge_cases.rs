//! Edge-case and validation tests for the intake engine and stores

use chrono::NaiveDate;
use votacion::{
    Error, Result,
    election::{BallotSubmission, VoteClassification, VoteIntakeEngine},
    types::{NewVoter, Office},
};

fn enroll(engine: &VoteIntakeEngine, national_id: &str) {
    engine
        .registry()
        .register(NewVoter {
            national_id: national_id.to_string(),
            given_names: "Jorge".to_string(),
            family_names: "Salas".to_string(),
            birth_date: NaiveDate::from_ymd_opt(1985, 11, 3).unwrap(),
            sex: "M".to_string(),
            department: "Puno".to_string(),
            province: None,
            district: None,
        })
        .unwrap();
}

#[tokio::test]
async fn test_missing_fields_rejected_first() -> Result<()> {
    let engine = VoteIntakeEngine::for_testing();
    enroll(&engine, "12345678");

    // Blank voter id beats everything else, even an unknown voter check
    let blank = engine.submit_ballot(BallotSubmission {
        voter_national_id: "  ".to_string(),
        candidate_reference: Some(-1),
        office: None,
    });
    match blank {
        Err(Error::MissingField { field }) => assert_eq!(field, "voter_national_id"),
        other => panic!("expected MissingField, got {other:?}"),
    }

    // Missing office on a would-be valid vote is caught before voter lookup
    let no_office = engine.submit_ballot(BallotSubmission {
        voter_national_id: "00000000".to_string(),
        candidate_reference: Some(5),
        office: None,
    });
    match no_office {
        Err(Error::MissingField { field }) => assert_eq!(field, "office"),
        other => panic!("expected MissingField, got {other:?}"),
    }

    assert!(engine.ledger().is_empty()?);
    Ok(())
}

#[tokio::test]
async fn test_malformed_reference_variants() -> Result<()> {
    let engine = VoteIntakeEngine::for_testing();
    enroll(&engine, "12345678");

    for bad in [-1, -42, i32::MIN] {
        let result = engine.submit_ballot(BallotSubmission {
            voter_national_id: "12345678".to_string(),
            candidate_reference: Some(bad),
            office: Some(Office::President),
        });
        match result {
            Err(Error::MalformedCandidateReference { reference }) => {
                assert_eq!(reference, bad);
            }
            other => panic!("expected MalformedCandidateReference for {bad}, got {other:?}"),
        }
    }

    assert!(engine.ledger().is_empty()?);
    Ok(())
}

#[tokio::test]
async fn test_null_vote_ignores_submitted_office() -> Result<()> {
    let engine = VoteIntakeEngine::for_testing();

    // Each voter null-votes with a different submitted office; every stored
    // ballot ends up in the same canonical shape
    let voters = ["11111111", "22222222", "33333333"];
    let offices = [
        Some(Office::President),
        Some(Office::Congressperson),
        None,
    ];

    for (national_id, office) in voters.iter().zip(offices) {
        enroll(&engine, national_id);
        let receipt = engine.submit_ballot(BallotSubmission {
            voter_national_id: national_id.to_string(),
            candidate_reference: Some(0),
            office,
        })?;
        assert_eq!(receipt.classification, VoteClassification::Null);
        assert_eq!(receipt.office, None);

        let ballot = engine.ledger().ballot(receipt.ballot_id)?.unwrap();
        assert!(ballot.outcome.is_null());
        assert_eq!(ballot.contest_key(), format!("ballot:{national_id}:null"));
    }

    Ok(())
}

#[tokio::test]
async fn test_withdrawn_candidate_still_resolvable() -> Result<()> {
    // Withdrawal is an administrative flag; the engine does not gate on it.
    // The snapshot records who was voted for either way.
    let engine = VoteIntakeEngine::for_testing();
    enroll(&engine, "12345678");

    let candidate = engine.catalog().add_candidate(
        None,
        "Rosa Paredes",
        None,
        vec![],
        Office::AndeanParliamentarian,
        None,
        None,
    )?;
    engine.catalog().withdraw_candidate(candidate.id)?;

    let receipt = engine.submit_ballot(BallotSubmission {
        voter_national_id: "12345678".to_string(),
        candidate_reference: Some(candidate.id),
        office: Some(Office::AndeanParliamentarian),
    })?;
    assert_eq!(receipt.candidate_name.as_deref(), Some("Rosa Paredes"));

    Ok(())
}

#[tokio::test]
async fn test_snapshot_immune_to_catalog_edits() -> Result<()> {
    let engine = VoteIntakeEngine::for_testing();
    enroll(&engine, "12345678");

    let party = engine.catalog().add_party("Partido X", None)?;
    let candidate = engine.catalog().add_candidate(
        Some(party.id),
        "Ana Torres",
        None,
        vec![],
        Office::President,
        None,
        None,
    )?;

    let receipt = engine.submit_ballot(BallotSubmission {
        voter_national_id: "12345678".to_string(),
        candidate_reference: Some(candidate.id),
        office: Some(Office::President),
    })?;

    // Rename the party and delete the candidate after the fact
    engine
        .catalog()
        .update_party(party.id, "Partido Renovado".to_string(), None)?;
    engine.catalog().remove_candidate(candidate.id)?;

    let ballot = engine.ledger().ballot(receipt.ballot_id)?.unwrap();
    let snapshot = ballot.outcome.candidate().unwrap();
    assert_eq!(snapshot.candidate_name, "Ana Torres");
    assert_eq!(snapshot.party_name.as_deref(), Some("Partido X"));

    Ok(())
}

#[tokio::test]
async fn test_concurrent_submissions_different_voters() -> Result<()> {
    use std::sync::Arc;

    let engine = Arc::new(VoteIntakeEngine::for_testing());
    let candidate = engine.catalog().add_candidate(
        None,
        "Ana Torres",
        None,
        vec![],
        Office::President,
        None,
        None,
    )?;

    let ids: Vec<String> = (0..10).map(|i| format!("{:08}", 10000000 + i)).collect();
    for id in &ids {
        enroll(&engine, id);
    }

    let mut handles = Vec::new();
    for id in ids {
        let engine = Arc::clone(&engine);
        handles.push(tokio::task::spawn_blocking(move || {
            engine.submit_ballot(BallotSubmission {
                voter_national_id: id,
                candidate_reference: Some(candidate.id),
                office: Some(Office::President),
            })
        }));
    }

    for handle in handles {
        handle.await.expect("task panicked")?;
    }
    assert_eq!(engine.ledger().len()?, 10);

    Ok(())
}

#[tokio::test]
async fn test_same_voter_race_single_winner() -> Result<()> {
    use std::sync::Arc;

    let engine = Arc::new(VoteIntakeEngine::for_testing());
    enroll(&engine, "12345678");
    let candidate = engine.catalog().add_candidate(
        None,
        "Ana Torres",
        None,
        vec![],
        Office::President,
        None,
        None,
    )?;

    let mut handles = Vec::new();
    for _ in 0..8 {
        let engine = Arc::clone(&engine);
        handles.push(tokio::task::spawn_blocking(move || {
            engine.submit_ballot(BallotSubmission {
                voter_national_id: "12345678".to_string(),
                candidate_reference: Some(candidate.id),
                office: Some(Office::President),
            })
        }));
    }

    let mut accepted = 0;
    let mut duplicates = 0;
    for handle in handles {
        match handle.await.expect("task panicked") {
            Ok(_) => accepted += 1,
            Err(Error::DuplicateBallot { .. }) => duplicates += 1,
            Err(other) => panic!("unexpected error: {other:?}"),
        }
    }

    assert_eq!(accepted, 1);
    assert_eq!(duplicates, 7);
    assert_eq!(engine.ledger().len()?, 1);

    Ok(())
}
