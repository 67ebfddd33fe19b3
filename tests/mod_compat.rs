// Dictionary-compatibility surface: thin forwarding over the same ordered
// storage, insertion order throughout.

use timedpool::{PoolConfig, PoolError, TimedPool};

fn quiet_config() -> PoolConfig {
    PoolConfig::default().with_sweep_interval_secs(3600)
}

fn abc_pool() -> TimedPool<String, String> {
    TimedPool::with_initial(
        quiet_config(),
        vec![
            ("a".to_string(), "1".to_string()),
            ("b".to_string(), "2".to_string()),
            ("c".to_string(), "3".to_string()),
        ],
    )
}

#[test]
fn get_or_returns_default_for_missing_key() {
    let pool = abc_pool();
    assert_eq!(pool.get_or(&"a".into(), "fallback".into()), "1");
    assert_eq!(pool.get_or(&"missing".into(), "fallback".into()), "fallback");
    pool.stop();
}

#[test]
fn pop_removes_and_returns_value() {
    let pool = abc_pool();
    assert_eq!(pool.pop(&"b".into()).unwrap(), "2");
    assert!(!pool.contains_key(&"b".into()));
    assert_eq!(pool.pop(&"b".into()), Err(PoolError::NotFound));
    pool.stop();
}

#[test]
fn pop_or_returns_default_for_missing_key() {
    let pool = abc_pool();
    assert_eq!(pool.pop_or(&"c".into(), "fallback".into()), "3");
    assert_eq!(pool.pop_or(&"c".into(), "fallback".into()), "fallback");
    pool.stop();
}

#[test]
fn pop_last_removes_most_recent_insert_first() {
    let pool = abc_pool();
    assert_eq!(pool.pop_last().unwrap(), ("c".into(), "3".into()));
    assert_eq!(pool.pop_last().unwrap(), ("b".into(), "2".into()));
    assert_eq!(pool.pop_last().unwrap(), ("a".into(), "1".into()));
    assert_eq!(pool.pop_last(), None);
    pool.stop();
}

#[test]
fn from_keys_maps_every_key_to_the_shared_value() {
    let pool = TimedPool::from_keys(
        quiet_config(),
        vec!["x".to_string(), "y".to_string(), "z".to_string()],
        "shared".to_string(),
    )
    .unwrap();

    assert_eq!(pool.keys(), vec!["x", "y", "z"]);
    for key in ["x", "y", "z"] {
        assert_eq!(pool.get(&key.to_string()).unwrap(), "shared");
    }
    pool.stop();
}

#[test]
fn from_keys_propagates_capacity_overflow() {
    let result = TimedPool::from_keys(
        quiet_config().with_max_size(2),
        vec!["x".to_string(), "y".to_string(), "z".to_string()],
        "shared".to_string(),
    );
    assert!(matches!(result, Err(PoolError::Full { max_size: 2 })));
}

#[test]
fn keys_iterate_in_insertion_order_both_ways() {
    let pool = abc_pool();
    let keys = pool.keys();
    assert_eq!(keys, vec!["a", "b", "c"]);

    let reversed: Vec<String> = keys.into_iter().rev().collect();
    assert_eq!(reversed, vec!["c", "b", "a"]);
    pool.stop();
}

#[test]
fn reinsertion_keeps_original_position() {
    let pool = abc_pool();
    pool.set("b".into(), "updated".into()).unwrap();

    assert_eq!(pool.keys(), vec!["a", "b", "c"]);
    assert_eq!(pool.get(&"b".into()).unwrap(), "updated");
    pool.stop();
}

#[test]
fn remove_preserves_order_of_remaining_keys() {
    let pool = abc_pool();
    pool.remove(&"b".into()).unwrap();
    assert_eq!(pool.keys(), vec!["a", "c"]);

    // A fresh insert of a removed key goes to the back.
    pool.set("b".into(), "again".into()).unwrap();
    assert_eq!(pool.keys(), vec!["a", "c", "b"]);
    pool.stop();
}

#[test]
fn entries_snapshot_pairs_in_insertion_order() {
    let pool = abc_pool();
    assert_eq!(
        pool.entries(),
        vec![
            ("a".to_string(), "1".to_string()),
            ("b".to_string(), "2".to_string()),
            ("c".to_string(), "3".to_string()),
        ]
    );
    pool.stop();
}
