//! Integration Tests for BoundedList
//!
//! Exercises the public list API: eviction order, scan direction, bulk
//! removal, search limits and concurrent use.

use std::sync::Arc;
use std::thread;

use bounded_store::BoundedList;

// == Helper Functions ==

fn list_of(capacity: usize, items: &[&'static str]) -> BoundedList<&'static str> {
    let list = BoundedList::new(capacity);
    for item in items {
        list.push_back(*item);
    }
    list
}

fn same(key: &&str, item: &&str) -> bool {
    key == item
}

// == Capacity and Eviction ==

#[test]
fn test_size_never_exceeds_capacity() {
    let list = BoundedList::new(4);

    for i in 0..20 {
        if i % 3 == 0 {
            list.push_front(i);
        } else {
            list.push_back(i);
        }
        assert!(list.len() <= 4);
    }
    assert_eq!(list.len(), 4);
    assert_eq!(list.stats().evictions, 16);
}

#[test]
fn test_push_front_at_capacity_evicts_back() {
    let list = list_of(3, &["A", "B", "C"]);
    assert_eq!(list.len(), 3);

    list.push_front("D");

    assert_eq!(list.to_vec(), vec!["D", "A", "B"]);
}

#[test]
fn test_push_back_at_capacity_evicts_front() {
    let list = list_of(3, &["A", "B", "C"]);

    list.push_back("D");

    assert_eq!(list.to_vec(), vec!["B", "C", "D"]);
}

#[test]
fn test_zero_capacity_defaults_to_1000() {
    let list = BoundedList::new(0);
    for i in 0..1500 {
        list.push_back(i);
    }

    assert_eq!(list.len(), 1000);
    assert_eq!(list.peek_front(), Some(500));
    assert_eq!(list.peek_back(), Some(1499));
}

// == Removal ==

#[test]
fn test_remove_from_empty_list() {
    let list: BoundedList<String> = BoundedList::new(3);

    assert_eq!(list.remove_front(), None);
    assert_eq!(list.remove_back(), None);
    assert_eq!(list.remove_item_from_front(&(), |_, _| true), None);
    assert_eq!(list.remove_item_from_back(&(), |_, _| true), None);
    assert!(list.remove_all_items(&(), |_, _| true).is_empty());
}

#[test]
fn test_predicate_scan_direction() {
    let from_front = list_of(3, &["A", "B", "A"]);
    let from_back = list_of(3, &["A", "B", "A"]);

    assert_eq!(from_front.remove_item_from_front(&"A", same), Some("A"));
    assert_eq!(from_back.remove_item_from_back(&"A", same), Some("A"));

    assert_eq!(from_front.to_vec(), vec!["B", "A"]);
    assert_eq!(from_back.to_vec(), vec!["A", "B"]);
}

#[test]
fn test_remove_all_items() {
    let list = list_of(10, &["A", "B", "A", "C", "A"]);
    let before = list.len();

    let removed = list.remove_all_items(&"A", same);

    assert_eq!(list.to_vec(), vec!["B", "C"]);
    assert_eq!(before - list.len(), removed.len());
    assert_eq!(removed.len(), 3);
}

#[test]
fn test_remove_by_key_field() {
    #[derive(Debug, Clone, PartialEq)]
    struct Slot {
        request_id: u32,
        payload: &'static str,
    }

    let list = BoundedList::new(10);
    list.push_back(Slot {
        request_id: 1,
        payload: "a",
    });
    list.push_back(Slot {
        request_id: 2,
        payload: "b",
    });
    list.push_back(Slot {
        request_id: 1,
        payload: "c",
    });

    let by_request = |id: &u32, slot: &Slot| slot.request_id == *id;

    let removed = list.remove_item_from_back(&1, by_request);
    assert_eq!(removed.map(|slot| slot.payload), Some("c"));
    assert_eq!(list.search_front(&1, 0, by_request).len(), 1);
}

// == Search ==

#[test]
fn test_search_front_limit() {
    let list = list_of(5, &["A", "B", "C", "D", "E"]);

    let found = list.search_front(&(), 2, |_, _| true);

    assert_eq!(found, vec!["A", "B"]);
    assert_eq!(list.len(), 5);
}

#[test]
fn test_search_back_reverses_order() {
    let list = list_of(5, &["A", "B", "C", "D", "E"]);

    assert_eq!(list.search_back(&(), 2, |_, _| true), vec!["E", "D"]);
    assert_eq!(
        list.search_back(&(), 0, |_, _| true),
        vec!["E", "D", "C", "B", "A"]
    );
}

#[test]
fn test_search_limit_above_match_count() {
    let list = list_of(5, &["A", "B", "A"]);

    assert_eq!(list.search_front(&"A", 10, same), vec!["A", "A"]);
    assert!(list.search_front(&"Z", 10, same).is_empty());
}

// == Concurrency ==

#[test]
fn test_concurrent_producers_and_consumers() {
    let list = Arc::new(BoundedList::new(100));

    let producers: Vec<_> = (0..4)
        .map(|t| {
            let list = Arc::clone(&list);
            thread::spawn(move || {
                for i in 0..1000 {
                    list.push_back(t * 10_000 + i);
                }
            })
        })
        .collect();

    let consumers: Vec<_> = (0..2)
        .map(|_| {
            let list = Arc::clone(&list);
            thread::spawn(move || {
                let mut taken = 0;
                for _ in 0..1000 {
                    if list.remove_front().is_some() {
                        taken += 1;
                    }
                    list.remove_item_from_back(&7, |m, v| v % 10 == *m);
                }
                taken
            })
        })
        .collect();

    for producer in producers {
        producer.join().unwrap();
    }
    for consumer in consumers {
        consumer.join().unwrap();
    }

    let stats = list.stats();
    assert!(stats.len <= 100);
    assert_eq!(stats.pushes, 4000);
    assert_eq!(
        stats.pushes,
        stats.evictions + stats.removals + stats.len as u64
    );
}
