//! Tests for the aging policy

use aging_scheduler::core::{effective_priority, AgingPolicy, HIGHEST_PRIORITY};

const T0: u128 = 1_760_000_000_000;

fn secs(s: u128) -> u128 {
    T0 + s * 1_000
}

#[test]
fn test_aging_with_thirty_second_interval() {
    assert_eq!(effective_priority(5, T0, secs(10), 30), 5);
    assert_eq!(effective_priority(5, T0, secs(35), 30), 4);
    assert_eq!(effective_priority(5, T0, secs(65), 30), 3);
}

#[test]
fn test_effective_priority_never_below_one() {
    for wait in [0, 30, 60, 600, 86_400] {
        for base in 1..=10 {
            assert!(effective_priority(base, T0, secs(wait), 30) >= HIGHEST_PRIORITY);
        }
    }
    assert_eq!(effective_priority(2, T0, secs(86_400), 30), 1);
}

#[test]
fn test_effective_priority_non_increasing() {
    let policy = AgingPolicy::new(17);
    for base in [1_u32, 3, 8, 100] {
        let mut previous = policy.effective(base, T0, T0);
        for s in 1..2_000 {
            let current = policy.effective(base, T0, secs(s));
            assert!(current <= previous, "base {base} rose at {s}s");
            previous = current;
        }
    }
}

#[test]
fn test_policy_default_matches_published_constant() {
    let policy = AgingPolicy::default();
    assert_eq!(policy.interval_secs, 30);
    assert_eq!(policy.interval(), std::time::Duration::from_secs(30));
}
