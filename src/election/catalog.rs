//! Catalog store for parties and candidates
//!
//! Pure keyed lookup plus thin CRUD. Absence is a normal `Option` outcome;
//! the only invariants enforced here are party-name uniqueness and the
//! office/district scoping rule. Cross-entity validation (does a candidate's
//! party still exist?) is deliberately left to readers, who must tolerate
//! dangling party references.

use crate::types::{Candidate, CandidateStatus, Office, Party};
use crate::{Result, storage_error};
use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicI32, Ordering};

/// In-memory catalog of parties and candidates
pub struct CatalogStore {
    parties: RwLock<HashMap<i32, Party>>,
    candidates: RwLock<HashMap<i32, Candidate>>,
    next_party_id: AtomicI32,
    next_candidate_id: AtomicI32,
}

impl CatalogStore {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self {
            parties: RwLock::new(HashMap::new()),
            candidates: RwLock::new(HashMap::new()),
            next_party_id: AtomicI32::new(1),
            next_candidate_id: AtomicI32::new(1),
        }
    }

    // ------------------------------------------------------------------
    // Lookup contract consumed by the intake engine
    // ------------------------------------------------------------------

    /// Look up a party by id
    pub fn party(&self, id: i32) -> Result<Option<Party>> {
        let parties = self
            .parties
            .read()
            .map_err(|_| storage_error!("party store read lock poisoned"))?;
        Ok(parties.get(&id).cloned())
    }

    /// Look up a candidate by id
    pub fn candidate(&self, id: i32) -> Result<Option<Candidate>> {
        let candidates = self
            .candidates
            .read()
            .map_err(|_| storage_error!("candidate store read lock poisoned"))?;
        Ok(candidates.get(&id).cloned())
    }

    /// List candidates standing for any of the given offices
    pub fn candidates_by_office(&self, offices: &[Office]) -> Result<Vec<Candidate>> {
        let candidates = self
            .candidates
            .read()
            .map_err(|_| storage_error!("candidate store read lock poisoned"))?;

        let mut matching: Vec<Candidate> = candidates
            .values()
            .filter(|c| offices.contains(&c.office))
            .cloned()
            .collect();
        matching.sort_by_key(|c| c.id);
        Ok(matching)
    }

    // ------------------------------------------------------------------
    // Thin CRUD (no invariants beyond uniqueness and district scoping)
    // ------------------------------------------------------------------

    /// Register a party with a catalog-unique display name
    pub fn add_party(&self, name: impl Into<String>, symbol: Option<String>) -> Result<Party> {
        let name = name.into();
        let mut parties = self
            .parties
            .write()
            .map_err(|_| storage_error!("party store write lock poisoned"))?;

        if parties.values().any(|p| p.name == name) {
            return Err(crate::Error::validation("party name must be unique"));
        }

        let party = Party {
            id: self.next_party_id.fetch_add(1, Ordering::SeqCst),
            name,
            symbol,
        };
        parties.insert(party.id, party.clone());
        Ok(party)
    }

    /// Update a party's display fields
    pub fn update_party(&self, id: i32, name: String, symbol: Option<String>) -> Result<Party> {
        let mut parties = self
            .parties
            .write()
            .map_err(|_| storage_error!("party store write lock poisoned"))?;

        if parties.values().any(|p| p.id != id && p.name == name) {
            return Err(crate::Error::validation("party name must be unique"));
        }

        let party = parties
            .get_mut(&id)
            .ok_or_else(|| crate::Error::validation("no such party"))?;
        party.name = name;
        party.symbol = symbol;
        Ok(party.clone())
    }

    /// Register a candidate for an office
    ///
    /// A district is accepted only for district-scoped offices.
    #[allow(clippy::too_many_arguments)]
    pub fn add_candidate(
        &self,
        party_id: Option<i32>,
        full_name: impl Into<String>,
        biography: Option<String>,
        proposals: Vec<String>,
        office: Office,
        district: Option<String>,
        photo: Option<String>,
    ) -> Result<Candidate> {
        if district.is_some() && !office.is_district_scoped() {
            return Err(crate::Error::validation(
                "district is only valid for district-scoped offices",
            ));
        }

        let mut candidates = self
            .candidates
            .write()
            .map_err(|_| storage_error!("candidate store write lock poisoned"))?;

        let candidate = Candidate {
            id: self.next_candidate_id.fetch_add(1, Ordering::SeqCst),
            party_id,
            full_name: full_name.into(),
            biography: biography.unwrap_or_default(),
            proposals,
            office,
            district,
            photo,
            status: CandidateStatus::Active,
        };
        candidates.insert(candidate.id, candidate.clone());
        Ok(candidate)
    }

    /// Mark a candidate as withdrawn without deleting the record
    pub fn withdraw_candidate(&self, id: i32) -> Result<Option<Candidate>> {
        let mut candidates = self
            .candidates
            .write()
            .map_err(|_| storage_error!("candidate store write lock poisoned"))?;

        Ok(candidates.get_mut(&id).map(|c| {
            c.status = CandidateStatus::Withdrawn;
            c.clone()
        }))
    }

    /// Remove a candidate entirely
    pub fn remove_candidate(&self, id: i32) -> Result<Option<Candidate>> {
        let mut candidates = self
            .candidates
            .write()
            .map_err(|_| storage_error!("candidate store write lock poisoned"))?;
        Ok(candidates.remove(&id))
    }

    /// List all parties, ordered by id
    pub fn list_parties(&self) -> Result<Vec<Party>> {
        let parties = self
            .parties
            .read()
            .map_err(|_| storage_error!("party store read lock poisoned"))?;
        let mut all: Vec<Party> = parties.values().cloned().collect();
        all.sort_by_key(|p| p.id);
        Ok(all)
    }

    /// List all candidates, ordered by id
    pub fn list_candidates(&self) -> Result<Vec<Candidate>> {
        self.candidates_by_office(&Office::ALL)
    }
}

impl Default for CatalogStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_absence_is_none() {
        let catalog = CatalogStore::new();
        assert!(catalog.party(99).unwrap().is_none());
        assert!(catalog.candidate(99).unwrap().is_none());
    }

    #[test]
    fn test_party_name_uniqueness() {
        let catalog = CatalogStore::new();
        catalog.add_party("Partido X", None).unwrap();

        let duplicate = catalog.add_party("Partido X", None);
        assert!(matches!(duplicate, Err(crate::Error::Validation { .. })));
    }

    #[test]
    fn test_candidate_district_scoping() {
        let catalog = CatalogStore::new();

        // District on a nationally contested office is rejected
        let result = catalog.add_candidate(
            None,
            "Ana Torres",
            None,
            vec![],
            Office::President,
            Some("Lima".to_string()),
            None,
        );
        assert!(matches!(result, Err(crate::Error::Validation { .. })));

        // District on a congressional candidacy is fine
        let candidate = catalog
            .add_candidate(
                None,
                "Luis Quispe",
                None,
                vec!["More schools".to_string()],
                Office::Congressperson,
                Some("Cusco".to_string()),
                None,
            )
            .unwrap();
        assert_eq!(candidate.district.as_deref(), Some("Cusco"));
        assert_eq!(candidate.status, CandidateStatus::Active);
        assert_eq!(candidate.biography, "");
    }

    #[test]
    fn test_candidates_by_office() {
        let catalog = CatalogStore::new();
        let party = catalog.add_party("Partido X", None).unwrap();

        catalog
            .add_candidate(
                Some(party.id),
                "Ana Torres",
                None,
                vec![],
                Office::President,
                None,
                None,
            )
            .unwrap();
        catalog
            .add_candidate(
                Some(party.id),
                "Luis Quispe",
                None,
                vec![],
                Office::Congressperson,
                None,
                None,
            )
            .unwrap();

        let presidential = catalog.candidates_by_office(&[Office::President]).unwrap();
        assert_eq!(presidential.len(), 1);
        assert_eq!(presidential[0].full_name, "Ana Torres");

        let both = catalog
            .candidates_by_office(&[Office::President, Office::Congressperson])
            .unwrap();
        assert_eq!(both.len(), 2);

        let none = catalog
            .candidates_by_office(&[Office::AndeanParliamentarian])
            .unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn test_withdraw_keeps_record() {
        let catalog = CatalogStore::new();
        let candidate = catalog
            .add_candidate(None, "Ana Torres", None, vec![], Office::President, None, None)
            .unwrap();

        let withdrawn = catalog.withdraw_candidate(candidate.id).unwrap().unwrap();
        assert_eq!(withdrawn.status, CandidateStatus::Withdrawn);
        assert!(catalog.candidate(candidate.id).unwrap().is_some());
    }
}
