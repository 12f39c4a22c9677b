//! Race-free folding of partial item updates into a cached collection.
//!
//! A collection is cached in one of two shapes depending on whether a
//! grouping dimension is active. `apply_update` transforms either shape in
//! place, relocating the item between buckets when the update changes the
//! active grouping field. It performs no I/O; callers issue the real
//! persistence call and refetch on failure.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::model::{GroupBy, ItemUpdate, WorkItem};

/// A cached collection: a flat ordered sequence when no grouping is active,
/// or a group-key → sequence mapping otherwise. The two shapes are never
/// mixed under the same cache key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CachedItems {
    Flat(Vec<WorkItem>),
    Grouped(IndexMap<String, Vec<WorkItem>>),
}

impl CachedItems {
    /// Total number of items across all buckets
    pub fn len(&self) -> usize {
        match self {
            CachedItems::Flat(items) => items.len(),
            CachedItems::Grouped(buckets) => buckets.values().map(Vec::len).sum(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Fold a partial update for one item into a cached collection.
///
/// * `source_group_key` — the bucket the item is currently displayed in
///   (ignored for flat collections).
/// * `group_by` — the active grouping dimension from the view config.
/// * `index` — the item's position within its bucket (or the flat sequence).
///
/// Flat: the element at `index` is replaced with its merged form; length and
/// every other index are untouched. An out-of-range index leaves the
/// sequence unchanged.
///
/// Grouped: the element is removed from the source bucket and appended to
/// the destination bucket — `update.priority` when grouping by priority,
/// `update.state` when grouping by state, otherwise back onto the source
/// bucket. An unknown source key is treated as an empty bucket; a missing
/// element merges the update over a blank item. Note that an update which
/// does not change the grouping field still re-appends the item at the end
/// of its own bucket.
///
/// A `None` collection (cache miss) is returned unchanged.
pub fn apply_update(
    update: &ItemUpdate,
    source_group_key: &str,
    group_by: Option<GroupBy>,
    index: usize,
    prior: Option<CachedItems>,
) -> Option<CachedItems> {
    match prior? {
        CachedItems::Flat(mut items) => {
            if let Some(slot) = items.get_mut(index) {
                *slot = slot.merged(update);
            }
            Some(CachedItems::Flat(items))
        }
        CachedItems::Grouped(mut buckets) => {
            let source = buckets.entry(source_group_key.to_string()).or_default();
            let merged = source
                .get(index)
                .cloned()
                .unwrap_or_default()
                .merged(update);
            if index < source.len() {
                source.remove(index);
            }

            let destination_key = match group_by {
                Some(GroupBy::Priority) => update.priority.clone().unwrap_or_default(),
                Some(GroupBy::State) => update.state.clone().unwrap_or_default(),
                // Non-relocatable grouping: the item stays in its bucket
                _ => source_group_key.to_string(),
            };
            buckets.entry(destination_key).or_default().push(merged);
            Some(CachedItems::Grouped(buckets))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn item(id: &str, priority: &str) -> WorkItem {
        WorkItem {
            id: id.into(),
            name: format!("item {id}"),
            priority: Some(priority.into()),
            state: Some("todo".into()),
            ..Default::default()
        }
    }

    fn grouped(buckets: Vec<(&str, Vec<WorkItem>)>) -> CachedItems {
        CachedItems::Grouped(
            buckets
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        )
    }

    #[test]
    fn cache_miss_is_a_no_op() {
        let update = ItemUpdate::default();
        assert_eq!(apply_update(&update, "low", None, 0, None), None);
    }

    #[test]
    fn flat_replaces_target_index_only() {
        let prior = CachedItems::Flat(vec![item("A", "low"), item("B", "low"), item("C", "low")]);
        let update = ItemUpdate {
            priority: Some("urgent".into()),
            ..Default::default()
        };
        let next = apply_update(&update, "", None, 1, Some(prior)).unwrap();
        let CachedItems::Flat(items) = next else {
            panic!("shape changed");
        };
        assert_eq!(items.len(), 3);
        assert_eq!(items[0], item("A", "low"));
        assert_eq!(items[1].id, "B");
        assert_eq!(items[1].priority, Some("urgent".to_string()));
        assert_eq!(items[2], item("C", "low"));
    }

    #[test]
    fn flat_out_of_range_index_leaves_sequence_unchanged() {
        let prior = CachedItems::Flat(vec![item("A", "low")]);
        let update = ItemUpdate {
            priority: Some("urgent".into()),
            ..Default::default()
        };
        let next = apply_update(&update, "", None, 5, Some(prior.clone())).unwrap();
        assert_eq!(next, prior);
    }

    #[test]
    fn grouped_moves_item_between_buckets() {
        let prior = grouped(vec![("low", vec![item("A", "low")]), ("high", vec![])]);
        let update = ItemUpdate {
            priority: Some("high".into()),
            ..Default::default()
        };
        let next = apply_update(&update, "low", Some(GroupBy::Priority), 0, Some(prior)).unwrap();
        let CachedItems::Grouped(buckets) = next else {
            panic!("shape changed");
        };
        assert_eq!(buckets["low"].len(), 0);
        assert_eq!(buckets["high"].len(), 1);
        assert_eq!(buckets["high"][0].id, "A");
        assert_eq!(buckets["high"][0].priority, Some("high".to_string()));
        assert_eq!(buckets["high"][0].name, "item A");
    }

    #[test]
    fn grouped_preserves_total_count() {
        let prior = grouped(vec![
            ("low", vec![item("A", "low"), item("B", "low")]),
            ("high", vec![item("C", "high")]),
        ]);
        let update = ItemUpdate {
            priority: Some("high".into()),
            ..Default::default()
        };
        let next =
            apply_update(&update, "low", Some(GroupBy::Priority), 1, Some(prior)).unwrap();
        assert_eq!(next.len(), 3);
    }

    #[test]
    fn grouped_by_state_relocates_on_state_change() {
        let prior = grouped(vec![
            ("todo", vec![item("A", "low")]),
            ("done", vec![item("B", "low")]),
        ]);
        let update = ItemUpdate {
            state: Some("done".into()),
            ..Default::default()
        };
        let next = apply_update(&update, "todo", Some(GroupBy::State), 0, Some(prior)).unwrap();
        let CachedItems::Grouped(buckets) = next else {
            panic!("shape changed");
        };
        assert!(buckets["todo"].is_empty());
        assert_eq!(buckets["done"].len(), 2);
        assert_eq!(buckets["done"][1].id, "A");
    }

    #[test]
    fn same_bucket_update_reappends_at_end() {
        let prior = grouped(vec![(
            "low",
            vec![item("A", "low"), item("B", "low"), item("C", "low")],
        )]);
        let update = ItemUpdate {
            name: Some("renamed".into()),
            ..Default::default()
        };
        let next =
            apply_update(&update, "low", Some(GroupBy::Priority), 0, Some(prior)).unwrap();
        let CachedItems::Grouped(buckets) = next else {
            panic!("shape changed");
        };
        // update.priority is absent, so the destination is the "" bucket
        assert_eq!(buckets["low"].len(), 2);
        assert_eq!(buckets[""].len(), 1);
        assert_eq!(buckets[""][0].name, "renamed");
    }

    #[test]
    fn same_bucket_update_with_grouping_field_present_sinks_to_end() {
        let prior = grouped(vec![(
            "low",
            vec![item("A", "low"), item("B", "low"), item("C", "low")],
        )]);
        let update = ItemUpdate {
            priority: Some("low".into()),
            name: Some("renamed".into()),
            ..Default::default()
        };
        let next =
            apply_update(&update, "low", Some(GroupBy::Priority), 0, Some(prior)).unwrap();
        let CachedItems::Grouped(buckets) = next else {
            panic!("shape changed");
        };
        let ids: Vec<&str> = buckets["low"].iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["B", "C", "A"]);
        assert_eq!(buckets["low"][2].name, "renamed");
    }

    #[test]
    fn non_relocatable_grouping_reappends_to_source() {
        let prior = grouped(vec![
            ("bug", vec![item("A", "low"), item("B", "low")]),
            ("chore", vec![item("C", "low")]),
        ]);
        let update = ItemUpdate {
            name: Some("renamed".into()),
            ..Default::default()
        };
        let next = apply_update(&update, "bug", Some(GroupBy::Labels), 0, Some(prior)).unwrap();
        let CachedItems::Grouped(buckets) = next else {
            panic!("shape changed");
        };
        let ids: Vec<&str> = buckets["bug"].iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["B", "A"]);
        assert_eq!(buckets["chore"], vec![item("C", "low")]);
    }

    #[test]
    fn unknown_source_key_behaves_as_empty_bucket() {
        let prior = grouped(vec![("high", vec![item("C", "high")])]);
        let update = ItemUpdate {
            priority: Some("high".into()),
            name: Some("ghost".into()),
            ..Default::default()
        };
        let next =
            apply_update(&update, "missing", Some(GroupBy::Priority), 0, Some(prior)).unwrap();
        let CachedItems::Grouped(buckets) = next else {
            panic!("shape changed");
        };
        assert!(buckets["missing"].is_empty());
        assert_eq!(buckets["high"].len(), 2);
        assert_eq!(buckets["high"][1].name, "ghost");
    }

    #[test]
    fn untouched_buckets_are_preserved_verbatim() {
        let parked = vec![item("P1", "low"), item("P2", "low")];
        let prior = grouped(vec![
            ("low", vec![item("A", "low")]),
            ("parked", parked.clone()),
            ("high", vec![]),
        ]);
        let update = ItemUpdate {
            priority: Some("high".into()),
            ..Default::default()
        };
        let next =
            apply_update(&update, "low", Some(GroupBy::Priority), 0, Some(prior)).unwrap();
        let CachedItems::Grouped(buckets) = next else {
            panic!("shape changed");
        };
        assert_eq!(buckets["parked"], parked);
    }

    #[test]
    fn grouped_serde_shape_is_a_plain_map() {
        let json = serde_json::to_string(&grouped(vec![("low", vec![])])).unwrap();
        assert_eq!(json, r#"{"low":[]}"#);
        let back: CachedItems = serde_json::from_str(&json).unwrap();
        assert!(matches!(back, CachedItems::Grouped(_)));
    }
}
