#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::collections::BTreeMap;

use feedstore_core::model::{Entity, Feed, Link, Record};
use proptest::prelude::*;

fn column_map() -> impl Strategy<Value = BTreeMap<String, String>> {
    prop::collection::btree_map("[a-z_]{1,12}", "[ -~]{0,16}", 0..8)
}

proptest! {
    #[test]
    fn prop_loaded_record_is_clean(data in column_map()) {
        let record = Record::from_existing(data.clone());
        prop_assert!(!record.is_dirty());
        prop_assert_eq!(record.data(), &data);
    }

    #[test]
    fn prop_setting_persisted_value_is_not_dirty(data in column_map()) {
        let mut record = Record::from_existing(data.clone());
        for (column, value) in &data {
            record.set(column.as_str(), value.as_str());
        }
        prop_assert!(record.dirty_columns().is_empty());
    }

    #[test]
    fn prop_dirty_set_is_net_difference(
        data in column_map(),
        column in "[a-z_]{1,12}",
        value in "[ -~]{0,16}",
    ) {
        let mut record = Record::from_existing(data.clone());
        record.set(column.as_str(), value.as_str());

        let changed = data.get(&column) != Some(&value);
        prop_assert_eq!(record.is_column_dirty(&column), changed);
        prop_assert_eq!(record.data_changed().len(), usize::from(changed));

        record.mark_clean();
        prop_assert!(!record.is_dirty());
        prop_assert_eq!(record.persisted_value(&column), Some(value.as_str()));
    }
}

#[test]
fn test_new_entities_are_fully_dirty_until_marked_clean() {
    let mut feed = Feed::new();
    assert_eq!(feed.record().dirty_columns().len(), Feed::columns().len());
    feed.mark_clean();
    assert!(!feed.record().is_dirty());

    let mut link = Link::new();
    assert_eq!(link.record().dirty_columns().len(), Link::columns().len());
    link.mark_clean();
    assert!(link.data_changed().is_empty());
}

#[test]
fn test_new_ids_are_unique() {
    let a = Feed::new();
    let b = Feed::new();
    assert_ne!(a.id(), b.id());
    assert_eq!(a.id().len(), 36);
}
