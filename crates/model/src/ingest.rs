//! Building a [`PreferenceModel`] from raw store records.
//!
//! Ingestion is a one-shot, read-only pass: the caller hands over the
//! `(key, value)` pairs it scanned out of the store, malformed records are
//! skipped and counted, and the populated model comes back. No matching
//! records at all simply yields an empty model.

use crate::parser;
use crate::types::{PreferenceModel, RatingRecord};
use tracing::debug;

impl PreferenceModel {
    /// Merge a single decoded rating into the model.
    ///
    /// The user's profile is created on first sight; later records for the
    /// same user land in front of the earlier ones (see
    /// [`UserPreferenceProfile::entries`](crate::UserPreferenceProfile::entries)).
    pub fn merge(&mut self, record: RatingRecord) {
        self.profiles_mut()
            .entry(record.user_id)
            .or_default()
            .add(record.item_id, record.value);
    }

    /// Build a model from raw `(key, value)` pairs.
    ///
    /// Returns the model together with the number of records that failed to
    /// parse and were skipped. Parse failures never abort the pass.
    pub fn ingest<I, K, V>(pairs: I) -> (Self, usize)
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut model = Self::new();
        let mut skipped = 0usize;

        for (key, value) in pairs {
            match parser::parse_rating(key.as_ref(), value.as_ref()) {
                Ok(record) => model.merge(record),
                Err(err) => {
                    skipped += 1;
                    debug!("skipping rating record: {err}");
                }
            }
        }

        (model, skipped)
    }
}
