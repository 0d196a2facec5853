//! Parser for flat rating records.
//!
//! A rating lives in the store as a single key-value pair:
//!
//! - key: `rating.<namespace>.<userID>,<itemID>`, where the final
//!   `.`-separated path segment carries both ids, comma-joined
//! - value: the numeric rating magnitude
//!
//! The user id is the text before the *first* comma of the suffix and the
//! item id the text after the *last* comma, so extra comma-separated
//! segments in between are tolerated (`7,x,101` decodes as user 7,
//! item 101).

use crate::error::{ModelError, Result};
use crate::types::RatingRecord;

/// Decode one store record into a [`RatingRecord`].
///
/// Any failure is scoped to this record only; callers are expected to skip
/// it and continue the scan.
pub fn parse_rating(key: &str, value: &str) -> Result<RatingRecord> {
    // Ids are encoded in the last path segment of the key
    let suffix = key.rsplit('.').next().unwrap_or(key);

    let first_comma = suffix.find(',').ok_or_else(|| ModelError::MalformedKey {
        key: key.to_string(),
        reason: "missing ',' separator in id suffix".to_string(),
    })?;
    let last_comma = suffix.rfind(',').unwrap_or(first_comma);

    let user_id = suffix[..first_comma]
        .parse()
        .map_err(|_| ModelError::MalformedKey {
            key: key.to_string(),
            reason: format!("invalid user id '{}'", &suffix[..first_comma]),
        })?;

    let item_id = suffix[last_comma + 1..]
        .parse()
        .map_err(|_| ModelError::MalformedKey {
            key: key.to_string(),
            reason: format!("invalid item id '{}'", &suffix[last_comma + 1..]),
        })?;

    let rating: f64 = value.trim().parse().map_err(|_| ModelError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })?;
    if !rating.is_finite() {
        return Err(ModelError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        });
    }

    Ok(RatingRecord {
        user_id,
        item_id,
        value: rating,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_well_formed_record() {
        let record = parse_rating("rating.vod.bulsat.7,101", "5").unwrap();
        assert_eq!(record.user_id, 7);
        assert_eq!(record.item_id, 101);
        assert_eq!(record.value, 5.0);
    }

    #[test]
    fn ignores_middle_comma_segments() {
        // First comma bounds the user id, last comma bounds the item id
        let record = parse_rating("rating.vod.bulsat.7,x,101", "3.5").unwrap();
        assert_eq!(record.user_id, 7);
        assert_eq!(record.item_id, 101);
        assert_eq!(record.value, 3.5);
    }

    #[test]
    fn rejects_missing_separator() {
        let err = parse_rating("rating.vod.bulsat.7101", "5").unwrap_err();
        assert!(matches!(err, ModelError::MalformedKey { .. }));
    }

    #[test]
    fn rejects_non_numeric_ids() {
        assert!(parse_rating("rating.vod.bulsat.abc,101", "5").is_err());
        assert!(parse_rating("rating.vod.bulsat.7,abc", "5").is_err());
        assert!(parse_rating("rating.vod.bulsat.,101", "5").is_err());
        assert!(parse_rating("rating.vod.bulsat.7,", "5").is_err());
    }

    #[test]
    fn rejects_non_numeric_value() {
        let err = parse_rating("rating.vod.bulsat.7,101", "five").unwrap_err();
        assert!(matches!(err, ModelError::InvalidValue { .. }));
    }

    #[test]
    fn rejects_non_finite_value() {
        assert!(parse_rating("rating.vod.bulsat.7,101", "NaN").is_err());
        assert!(parse_rating("rating.vod.bulsat.7,101", "inf").is_err());
    }

    #[test]
    fn key_without_dots_still_parses_suffix() {
        // Shouldn't occur for pattern-matched keys, but the suffix rule
        // degrades to the whole key rather than panicking
        let record = parse_rating("7,101", "4").unwrap();
        assert_eq!(record.user_id, 7);
        assert_eq!(record.item_id, 101);
    }
}
