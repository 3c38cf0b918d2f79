//! Thread-safe in-memory implementation of the Waymark store traits.

use std::collections::HashMap;
use std::sync::Mutex;

use waymark_store::contributor::{ContributorProfile, ContributorStore};
use waymark_store::submission::{Submission, SubmissionStore};
use waymark_store::StoreError;
use waymark_types::{ContributorId, SubmissionId};

/// An in-memory contributor + submission store.
///
/// `put_submission` implements compare-and-swap on the record version while
/// holding the map lock, so it is the serialization point for concurrent
/// cast-vote calls.
pub struct MemoryStore {
    profiles: Mutex<HashMap<String, ContributorProfile>>,
    submissions: Mutex<HashMap<String, Submission>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            profiles: Mutex::new(HashMap::new()),
            submissions: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ContributorStore for MemoryStore {
    fn get_profile(&self, id: &ContributorId) -> Result<ContributorProfile, StoreError> {
        self.profiles
            .lock()
            .unwrap()
            .get(id.as_str())
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn put_profile(&self, profile: &ContributorProfile) -> Result<(), StoreError> {
        self.profiles
            .lock()
            .unwrap()
            .insert(profile.id.to_string(), profile.clone());
        Ok(())
    }

    fn insert_profile(&self, profile: &ContributorProfile) -> Result<(), StoreError> {
        let mut profiles = self.profiles.lock().unwrap();
        if profiles.contains_key(profile.id.as_str()) {
            return Err(StoreError::Duplicate(profile.id.to_string()));
        }
        profiles.insert(profile.id.to_string(), profile.clone());
        Ok(())
    }

    fn exists(&self, id: &ContributorId) -> Result<bool, StoreError> {
        Ok(self.profiles.lock().unwrap().contains_key(id.as_str()))
    }

    fn profile_count(&self) -> Result<u64, StoreError> {
        Ok(self.profiles.lock().unwrap().len() as u64)
    }
}

impl SubmissionStore for MemoryStore {
    fn get_submission(&self, id: &SubmissionId) -> Result<Submission, StoreError> {
        self.submissions
            .lock()
            .unwrap()
            .get(id.as_str())
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn insert_submission(&self, submission: &Submission) -> Result<(), StoreError> {
        let mut submissions = self.submissions.lock().unwrap();
        if submissions.contains_key(submission.id.as_str()) {
            return Err(StoreError::Duplicate(submission.id.to_string()));
        }
        submissions.insert(submission.id.to_string(), submission.clone());
        Ok(())
    }

    fn put_submission(
        &self,
        submission: &Submission,
        expected_version: u64,
    ) -> Result<(), StoreError> {
        let mut submissions = self.submissions.lock().unwrap();
        let stored = submissions
            .get(submission.id.as_str())
            .ok_or_else(|| StoreError::NotFound(submission.id.to_string()))?;
        if stored.version != expected_version {
            return Err(StoreError::VersionConflict {
                key: submission.id.to_string(),
                expected: expected_version,
                actual: stored.version,
            });
        }
        let mut updated = submission.clone();
        updated.version = expected_version + 1;
        submissions.insert(updated.id.to_string(), updated);
        Ok(())
    }

    fn exists(&self, id: &SubmissionId) -> Result<bool, StoreError> {
        Ok(self.submissions.lock().unwrap().contains_key(id.as_str()))
    }

    fn submission_count(&self) -> Result<u64, StoreError> {
        Ok(self.submissions.lock().unwrap().len() as u64)
    }

    fn iter_submissions(&self) -> Result<Vec<Submission>, StoreError> {
        Ok(self
            .submissions
            .lock()
            .unwrap()
            .values()
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use waymark_types::{GeoPoint, Timestamp};

    fn test_profile(id: &str) -> ContributorProfile {
        ContributorProfile::new(ContributorId::new(id), Timestamp::new(1000))
    }

    fn test_submission(id: &str) -> Submission {
        Submission::landmark(
            SubmissionId::new(id),
            ContributorId::new("ctr_alice"),
            GeoPoint::new(6.5, 3.3),
            Timestamp::new(1000),
        )
        .unwrap()
    }

    #[test]
    fn put_get_profile() {
        let store = MemoryStore::new();
        let profile = test_profile("ctr_alice");
        store.put_profile(&profile).unwrap();
        let retrieved = store.get_profile(&profile.id).unwrap();
        assert_eq!(retrieved.id, profile.id);
    }

    #[test]
    fn insert_profile_rejects_duplicate() {
        let store = MemoryStore::new();
        let profile = test_profile("ctr_alice");
        store.insert_profile(&profile).unwrap();
        assert!(matches!(
            store.insert_profile(&profile),
            Err(StoreError::Duplicate(_))
        ));
    }

    #[test]
    fn missing_profile_is_not_found() {
        let store = MemoryStore::new();
        let id = ContributorId::new("ctr_ghost");
        assert!(matches!(
            store.get_profile(&id),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn put_submission_bumps_version() {
        let store = MemoryStore::new();
        let sub = test_submission("sub_well");
        store.insert_submission(&sub).unwrap();

        store.put_submission(&sub, 0).unwrap();
        let stored = store.get_submission(&sub.id).unwrap();
        assert_eq!(stored.version, 1);
    }

    #[test]
    fn put_submission_detects_stale_version() {
        let store = MemoryStore::new();
        let sub = test_submission("sub_well");
        store.insert_submission(&sub).unwrap();

        store.put_submission(&sub, 0).unwrap();
        // A writer still holding version 0 must fail.
        let err = store.put_submission(&sub, 0).unwrap_err();
        assert!(matches!(
            err,
            StoreError::VersionConflict {
                expected: 0,
                actual: 1,
                ..
            }
        ));
    }

    #[test]
    fn iter_verified_filters_by_mirror() {
        let store = MemoryStore::new();
        let pending = test_submission("sub_pending");
        let mut verified = test_submission("sub_verified");
        verified.set_status(waymark_types::SubmissionStatus::Verified);
        store.insert_submission(&pending).unwrap();
        store.insert_submission(&verified).unwrap();

        let all = store.iter_submissions().unwrap();
        let only_verified = store.iter_verified_submissions().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(only_verified.len(), 1);
        assert_eq!(only_verified[0].id.as_str(), "sub_verified");
    }
}
