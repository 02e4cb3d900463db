// SPDX-License-Identifier: GPL-3.0-only

//! Hit-testing of keys and word candidates.
//!
//! Both functions are pure and linear over the candidates. The first candidate
//! that matches wins, so any tie-breaking between overlapping keys is decided
//! by the order in which the layout lists them.
//!
//! Candidate rectangles are local to their region: the region origin is
//! subtracted from the point before candidates are tested, and a point outside
//! the region never hits anything.

use crate::geometry::{Point, Rect};
use crate::layout::{Key, WordCandidate};

/// How the optional filter passed to [`hit_key`] is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AcceptPolicy {
    /// Skip keys that are present in the filter.
    #[default]
    RejectIfInFilter,
    /// Only accept keys that are present in the filter.
    ///
    /// Used on release so that only keys which were actually pressed can be
    /// released.
    AcceptIfInFilter,
}

/// Returns the first key in `keys` that contains `point`.
///
/// `region` is the geometry of the key area the keys belong to. When `filter`
/// is given, `policy` decides whether keys found in it are skipped or are the
/// only ones accepted. Invalid keys are never hit.
///
/// Returns `None` when nothing matches.
pub fn hit_key<'a>(
    keys: &'a [Key],
    region: Rect,
    point: Point,
    filter: Option<&[Key]>,
    policy: AcceptPolicy,
) -> Option<&'a Key> {
    if !region.contains(point) {
        return None;
    }

    let local = point - region.origin();

    keys.iter().find(|key| {
        if !key.is_valid() {
            return false;
        }

        let accepted = match (filter, policy) {
            (None, AcceptPolicy::RejectIfInFilter) => true,
            (None, AcceptPolicy::AcceptIfInFilter) => false,
            (Some(filter), AcceptPolicy::RejectIfInFilter) => !filter.contains(key),
            (Some(filter), AcceptPolicy::AcceptIfInFilter) => filter.contains(key),
        };

        accepted && key.rect().contains(local)
    })
}

/// Returns the first word candidate in `candidates` that contains `point`.
///
/// `region` is the geometry of the word ribbon. Returns `None` when nothing
/// matches.
pub fn hit_word_candidate(
    candidates: &[WordCandidate],
    region: Rect,
    point: Point,
) -> Option<&WordCandidate> {
    if !region.contains(point) {
        return None;
    }

    let local = point - region.origin();

    candidates
        .iter()
        .find(|candidate| candidate.is_valid() && candidate.rect.contains(local))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Size;
    use crate::layout::KeyAction;

    fn key(label: &str, x: f32, y: f32, w: f32, h: f32) -> Key {
        Key::new(
            Point::new(x, y),
            Size::new(w, h),
            KeyAction::Insert(label.to_lowercase()),
            label,
        )
    }

    fn row() -> Vec<Key> {
        vec![
            key("A", 0.0, 0.0, 20.0, 20.0),
            key("B", 20.0, 0.0, 20.0, 20.0),
            key("C", 40.0, 0.0, 20.0, 20.0),
        ]
    }

    const REGION: Rect = Rect::new(0.0, 0.0, 60.0, 20.0);

    // ========================================================================
    // Key hit-testing
    // ========================================================================

    /// Disjoint keys: a point inside exactly one rectangle returns that key.
    #[test]
    fn test_hit_key_disjoint_rects() {
        let keys = row();

        for (index, x) in [10.0, 30.0, 50.0].into_iter().enumerate() {
            let hit = hit_key(&keys, REGION, Point::new(x, 10.0), None, AcceptPolicy::default());
            assert_eq!(hit, Some(&keys[index]), "Point at x={} should hit key {}", x, index);
        }
    }

    /// A point inside no rectangle yields no hit.
    #[test]
    fn test_hit_key_miss() {
        let keys = vec![key("A", 0.0, 0.0, 20.0, 20.0)];
        let region = Rect::new(0.0, 0.0, 100.0, 100.0);

        let hit = hit_key(&keys, region, Point::new(50.0, 50.0), None, AcceptPolicy::default());
        assert!(hit.is_none(), "Point outside all keys should not hit");
    }

    /// The region is a pre-check: keys are never hit outside it.
    #[test]
    fn test_hit_key_outside_region() {
        let keys = row();
        let region = Rect::new(0.0, 0.0, 30.0, 20.0);

        let hit = hit_key(&keys, region, Point::new(50.0, 10.0), None, AcceptPolicy::default());
        assert!(hit.is_none(), "Point outside the region must not hit key C");
    }

    /// Key rectangles are local to the region origin.
    #[test]
    fn test_hit_key_region_local_coordinates() {
        let keys = row();
        let region = Rect::new(100.0, 200.0, 60.0, 20.0);

        let hit = hit_key(&keys, region, Point::new(125.0, 205.0), None, AcceptPolicy::default());
        assert_eq!(hit.map(|k| k.label.text.as_str()), Some("B"));
    }

    /// Overlapping keys: the first in layout order wins.
    #[test]
    fn test_hit_key_first_match_wins() {
        let keys = vec![key("A", 0.0, 0.0, 30.0, 20.0), key("B", 20.0, 0.0, 30.0, 20.0)];
        let region = Rect::new(0.0, 0.0, 50.0, 20.0);

        let hit = hit_key(&keys, region, Point::new(25.0, 10.0), None, AcceptPolicy::default());
        assert_eq!(hit, Some(&keys[0]));
    }

    #[test]
    fn test_hit_key_reject_if_in_filter() {
        let keys = row();
        let filter = vec![keys[0].clone()];

        let hit = hit_key(
            &keys,
            REGION,
            Point::new(10.0, 10.0),
            Some(&filter),
            AcceptPolicy::RejectIfInFilter,
        );
        assert!(hit.is_none(), "Filtered key should be rejected");

        let hit = hit_key(
            &keys,
            REGION,
            Point::new(30.0, 10.0),
            Some(&filter),
            AcceptPolicy::RejectIfInFilter,
        );
        assert_eq!(hit, Some(&keys[1]));
    }

    #[test]
    fn test_hit_key_accept_if_in_filter() {
        let keys = row();
        let filter = vec![keys[1].clone()];

        let hit = hit_key(
            &keys,
            REGION,
            Point::new(10.0, 10.0),
            Some(&filter),
            AcceptPolicy::AcceptIfInFilter,
        );
        assert!(hit.is_none(), "Key not in filter should not be accepted");

        let hit = hit_key(
            &keys,
            REGION,
            Point::new(30.0, 10.0),
            Some(&filter),
            AcceptPolicy::AcceptIfInFilter,
        );
        assert_eq!(hit, Some(&keys[1]));

        let hit = hit_key(&keys, REGION, Point::new(30.0, 10.0), None, AcceptPolicy::AcceptIfInFilter);
        assert!(hit.is_none(), "Accept policy without a filter accepts nothing");
    }

    #[test]
    fn test_invalid_keys_never_hit() {
        let keys = vec![Key::default(), key("A", 0.0, 0.0, 20.0, 20.0)];

        let hit = hit_key(&keys, REGION, Point::new(0.0, 0.0), None, AcceptPolicy::default());
        assert_eq!(hit.map(|k| k.label.text.as_str()), Some("A"));
    }

    // ========================================================================
    // Word candidate hit-testing
    // ========================================================================

    #[test]
    fn test_hit_word_candidate() {
        let candidates = vec![
            WordCandidate::new(Rect::new(0.0, 0.0, 50.0, 30.0), "hello"),
            WordCandidate::new(Rect::new(50.0, 0.0, 50.0, 30.0), "help"),
        ];
        let ribbon = Rect::new(0.0, 100.0, 100.0, 30.0);

        let hit = hit_word_candidate(&candidates, ribbon, Point::new(75.0, 110.0));
        assert_eq!(hit, Some(&candidates[1]));

        let miss = hit_word_candidate(&candidates, ribbon, Point::new(75.0, 10.0));
        assert!(miss.is_none(), "Point above the ribbon should not hit");
    }
}
