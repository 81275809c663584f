#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{create_test_store, same_ids, setup_test_db};
use feedstore_core::datetime::{MAX_DATETIME, NULL_DATETIME};
use feedstore_core::errors::ExErrorKind;
use feedstore_core::model::{Entity, Link, LINK_STATUS_ACTIVE, LINK_STATUS_INACTIVE, LINK_STATUS_REPORTED};
use feedstore_core::query::LinkQuery;
use feedstore_store::Store;

fn make_link(store: &Store<'_>, title: &str, status: &str, feed_id: &str, url: &str) -> Link {
    let mut link = Link::new();
    link.set_title(title)
        .set_status(status)
        .set_feed_id(feed_id)
        .set_url(url);
    store.link_create(&mut link).unwrap();
    link
}

fn ids(links: &[Link]) -> Vec<String> {
    links.iter().map(|l| l.id().to_string()).collect()
}

#[test]
fn test_create_and_find_round_trip() {
    let conn = setup_test_db();
    let store = create_test_store(&conn, "feeds", "links");

    let mut link = Link::new();
    link.set_feed_id("feedA")
        .set_title("Hello")
        .set_url("http://a1")
        .set_votes_up(7)
        .set_views(120);
    store.link_create(&mut link).unwrap();

    let found = store.link_find_by_id(link.id()).unwrap().unwrap();
    assert_eq!(found.feed_id(), "feedA");
    assert_eq!(found.title(), "Hello");
    assert_eq!(found.votes_up_count(), Some(7));
    assert_eq!(found.votes_down_count(), Some(0));
    assert_eq!(found.views(), "120");
    assert_eq!(found.time(), NULL_DATETIME);
    assert_eq!(found.reported_at(), NULL_DATETIME);
    assert_eq!(found.soft_deleted_at(), MAX_DATETIME);
    assert!(found.data_changed().is_empty());
}

#[test]
fn test_counters_reload_as_written() {
    let conn = setup_test_db();
    let store = create_test_store(&conn, "feed_counters", "link_counters");

    let mut link = Link::new();
    link.set_feed_id("feedA")
        .set_votes_up(7)
        .set_votes_down(-2)
        .set_views(1);
    store.link_create(&mut link).unwrap();

    let mut found = store.link_find_by_id(link.id()).unwrap().unwrap();
    assert_eq!(found.votes_up(), link.votes_up());
    assert_eq!(found.votes_down(), "-2");
    assert_eq!(found.views(), "1");

    found.set_views(1).set_votes_up(7);
    assert!(!found.record().is_dirty());
}

#[test]
fn test_count() {
    let conn = setup_test_db();
    let store = create_test_store(&conn, "feed_link_count", "link_link_count");

    assert_eq!(
        store
            .link_count(Some(LinkQuery::new().set_status(LINK_STATUS_ACTIVE)))
            .unwrap(),
        0
    );
    assert_eq!(store.link_count(None).unwrap(), 0);

    let a1 = make_link(&store, "A1", LINK_STATUS_ACTIVE, "feedA", "http://a1");
    make_link(&store, "A2", LINK_STATUS_ACTIVE, "feedA", "http://a2");
    make_link(&store, "A3", LINK_STATUS_ACTIVE, "feedB", "http://a3");
    make_link(&store, "A4", LINK_STATUS_ACTIVE, "feedB", "http://a4");
    make_link(&store, "A5", LINK_STATUS_ACTIVE, "feedB", "http://a5");
    make_link(&store, "I1", LINK_STATUS_INACTIVE, "feedA", "http://i1");
    make_link(&store, "I2", LINK_STATUS_INACTIVE, "feedB", "http://i2");

    let active = || LinkQuery::new().set_status(LINK_STATUS_ACTIVE);

    assert_eq!(store.link_count(Some(active())).unwrap(), 5);
    assert_eq!(
        store
            .link_count(Some(LinkQuery::new().set_status(LINK_STATUS_INACTIVE)))
            .unwrap(),
        2
    );

    store.link_soft_delete_by_id(a1.id()).unwrap();
    assert_eq!(store.link_count(Some(active())).unwrap(), 4);
    assert_eq!(
        store
            .link_count(Some(active().set_with_soft_deleted(true)))
            .unwrap(),
        5
    );
    assert_eq!(
        store
            .link_count(Some(active().set_feed_id("feedA")))
            .unwrap(),
        1
    );
}

#[test]
fn test_list() {
    let conn = setup_test_db();
    let store = create_test_store(&conn, "feed_link_list", "link_link_list");

    let l1 = make_link(&store, "L1", LINK_STATUS_ACTIVE, "feedA", "http://l1");
    let l2 = make_link(&store, "L2", LINK_STATUS_INACTIVE, "feedA", "http://l2");
    let l3 = make_link(&store, "L3", LINK_STATUS_ACTIVE, "feedB", "http://l3");
    let mut l4 = make_link(&store, "L4", LINK_STATUS_ACTIVE, "feedB", "http://l4");
    store.link_soft_delete(&mut l4).unwrap();

    let id = |l: &Link| l.id().to_string();

    let cases: Vec<(&str, LinkQuery, Vec<String>)> = vec![
        ("all visible", LinkQuery::new(), vec![id(&l1), id(&l2), id(&l3)]),
        ("by feed", LinkQuery::new().set_feed_id("feedA"), vec![id(&l1), id(&l2)]),
        ("by url", LinkQuery::new().set_url("http://l3"), vec![id(&l3)]),
        (
            "feed and status",
            LinkQuery::new()
                .set_feed_id("feedB")
                .set_status(LINK_STATUS_ACTIVE),
            vec![id(&l3)],
        ),
        (
            "status in",
            LinkQuery::new().set_status_in([LINK_STATUS_INACTIVE, LINK_STATUS_REPORTED]),
            vec![id(&l2)],
        ),
        (
            "only soft deleted",
            LinkQuery::new().set_only_soft_deleted(true),
            vec![id(&l4)],
        ),
        (
            "with soft deleted",
            LinkQuery::new()
                .set_with_soft_deleted(true)
                .set_feed_id("feedB"),
            vec![id(&l3), id(&l4)],
        ),
    ];

    for (name, query, expected) in cases {
        let links = store.link_list(&query).unwrap();
        assert!(
            same_ids(expected.clone(), ids(&links)),
            "{}: expected {:?}, got {:?}",
            name,
            expected,
            ids(&links)
        );
    }

    assert_eq!(store.link_list(&LinkQuery::new().set_limit(2)).unwrap().len(), 2);

    let err = store
        .link_list(&LinkQuery::new().set_offset(-1))
        .unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::Validation);
}

#[test]
fn test_update() {
    let conn = setup_test_db();
    let store = create_test_store(&conn, "feed_link_update", "link_link_update");

    let mut link = make_link(&store, "Original Title", LINK_STATUS_INACTIVE, "feedX", "http://original.url");
    link.set_title("Updated Title")
        .set_status(LINK_STATUS_ACTIVE)
        .set_url("http://updated.url");
    store.link_update(&mut link).unwrap();
    assert!(link.data_changed().is_empty());

    let updated = store.link_find_by_id(link.id()).unwrap().unwrap();
    assert_eq!(updated.title(), "Updated Title");
    assert_eq!(updated.status(), LINK_STATUS_ACTIVE);
    assert_eq!(updated.url(), "http://updated.url");
    assert_eq!(updated.updated_at(), link.updated_at());
}

#[test]
fn test_update_without_changes_keeps_updated_at() {
    let conn = setup_test_db();
    let store = create_test_store(&conn, "feeds", "links");

    let link = make_link(&store, "T", LINK_STATUS_ACTIVE, "feedA", "http://t");
    conn.execute(
        "UPDATE links SET updated_at = '2020-01-01 00:00:00' WHERE id = ?1",
        [link.id()],
    )
    .unwrap();

    let mut loaded = store.link_find_by_id(link.id()).unwrap().unwrap();
    store.link_update(&mut loaded).unwrap();
    assert_eq!(loaded.updated_at(), "2020-01-01 00:00:00");

    let reloaded = store.link_find_by_id(link.id()).unwrap().unwrap();
    assert_eq!(reloaded.updated_at(), "2020-01-01 00:00:00");
}

#[test]
fn test_report_persists() {
    let conn = setup_test_db();
    let store = create_test_store(&conn, "feeds", "links");

    let mut link = make_link(&store, "Spam", LINK_STATUS_ACTIVE, "feedA", "http://spam");
    link.report_with("spam");
    store.link_update(&mut link).unwrap();

    let reported = store
        .link_list(&LinkQuery::new().set_status(LINK_STATUS_REPORTED))
        .unwrap();
    assert_eq!(ids(&reported), vec![link.id().to_string()]);
    assert_eq!(reported[0].report(), "spam");
    assert_ne!(reported[0].reported_at(), NULL_DATETIME);
}

#[test]
fn test_delete_and_delete_by_id() {
    let conn = setup_test_db();
    let store = create_test_store(&conn, "feed_link_delete", "link_link_delete");

    let link = make_link(&store, "D", LINK_STATUS_ACTIVE, "feedA", "http://d");
    store.link_delete(&link).unwrap();
    assert!(store.link_find_by_id(link.id()).unwrap().is_none());

    let link = make_link(&store, "E", LINK_STATUS_ACTIVE, "feedA", "http://e");
    store.link_delete_by_id(link.id()).unwrap();
    assert_eq!(
        store
            .link_count(Some(LinkQuery::new().set_with_soft_deleted(true)))
            .unwrap(),
        0
    );

    store.link_delete_by_id("non-existent").unwrap();
    assert_eq!(
        store.link_delete_by_id("").unwrap_err().kind(),
        ExErrorKind::InvalidInput
    );
}

#[test]
fn test_soft_delete_and_soft_delete_by_id() {
    let conn = setup_test_db();
    let store = create_test_store(&conn, "feed_link_soft", "link_link_soft");

    let mut first = make_link(&store, "S1", LINK_STATUS_ACTIVE, "feedA", "http://s1");
    store.link_soft_delete(&mut first).unwrap();
    assert!(first.is_soft_deleted());
    assert!(store.link_find_by_id(first.id()).unwrap().is_none());

    let second = make_link(&store, "S2", LINK_STATUS_ACTIVE, "feedA", "http://s2");
    store.link_soft_delete_by_id(second.id()).unwrap();

    let deleted = store
        .link_list(&LinkQuery::new().set_only_soft_deleted(true))
        .unwrap();
    assert!(same_ids(
        vec![first.id().to_string(), second.id().to_string()],
        ids(&deleted)
    ));

    let err = store.link_soft_delete_by_id("non-existent").unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::NotFound);
}
