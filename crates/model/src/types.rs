//! Core domain types for the sparse preference model.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// =============================================================================
// Type Aliases
// =============================================================================
// These make the domain clearer and prevent mixing up user IDs with item IDs

/// Unique identifier for a user
pub type UserId = u64;

/// Unique identifier for a rated item
pub type ItemId = u64;

// =============================================================================
// Rating Types
// =============================================================================

/// A single rating, as decoded from one flat store record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingRecord {
    pub user_id: UserId,
    pub item_id: ItemId,
    pub value: f64,
}

/// One `(item, value)` pair inside a user's profile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PreferenceEntry {
    pub item_id: ItemId,
    pub value: f64,
}

// =============================================================================
// User Preference Profile
// =============================================================================

/// All ratings known for one user, newest record first.
///
/// Records are appended in amortized constant time; the newest-first order
/// the store scan historically produced is preserved by iterating the
/// backing vector in reverse. Duplicate item ids are allowed: the source
/// data may legitimately contain them and nothing here deduplicates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserPreferenceProfile {
    entries: Vec<PreferenceEntry>,
}

impl UserPreferenceProfile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record another rating for this user.
    pub fn add(&mut self, item_id: ItemId, value: f64) {
        self.entries.push(PreferenceEntry { item_id, value });
    }

    /// Iterate entries, most recently merged first.
    pub fn entries(&self) -> impl DoubleEndedIterator<Item = &PreferenceEntry> {
        self.entries.iter().rev()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// =============================================================================
// Preference Model
// =============================================================================

/// Sparse user-item preference model: one profile per known user.
///
/// The model is rebuilt from the store on every pipeline run and is never
/// mutated once evaluation starts, so read access needs no locking. Every
/// user present in the map has at least one preference entry.
#[derive(Debug, Clone, Default)]
pub struct PreferenceModel {
    profiles: HashMap<UserId, UserPreferenceProfile>,
}

impl PreferenceModel {
    /// Creates a new, empty model
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a user's profile, if the user is known
    pub fn profile(&self, user_id: UserId) -> Option<&UserPreferenceProfile> {
        self.profiles.get(&user_id)
    }

    /// Iterate over all `(user, profile)` pairs in arbitrary order
    pub fn iter(&self) -> impl Iterator<Item = (UserId, &UserPreferenceProfile)> {
        self.profiles.iter().map(|(id, profile)| (*id, profile))
    }

    /// All known user ids in ascending order, for stable downstream output
    pub fn sorted_user_ids(&self) -> Vec<UserId> {
        let mut ids: Vec<UserId> = self.profiles.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn user_count(&self) -> usize {
        self.profiles.len()
    }

    /// Total number of preference entries across all users
    pub fn rating_count(&self) -> usize {
        self.profiles.values().map(|p| p.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    pub(crate) fn profiles_mut(&mut self) -> &mut HashMap<UserId, UserPreferenceProfile> {
        &mut self.profiles
    }
}
