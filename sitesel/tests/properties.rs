//! Property-based tests for site selection.
//!
//! ## Test Categories
//! 1. **Range**: a returned site always lies within the buffer
//! 2. **Determinism**: same (S, T), same answer, from any thread
//! 3. **Width independence**: narrow and wide words agree
//! 4. **Capacity**: steady ignores T, stretched honours its horizon
//! 5. **Lookup**: every looked-up item belongs to the site it is found at

use proptest::prelude::*;
use rand::{rngs::StdRng, Rng, SeedableRng};
use rayon::prelude::*;
use sitesel::{is_valid_buffer_size, steady, stretched, Policy, SiteError};

// ─────────────────────────────────────────────────────────────────────────────
// Proptest Strategies
// ─────────────────────────────────────────────────────────────────────────────

/// Valid buffer sizes for 64-bit words.
fn buffer_size() -> impl Strategy<Value = u64> {
    (1u32..64).prop_map(|s| 1u64 << s)
}

fn policy() -> impl Strategy<Value = Policy> {
    prop_oneof![Just(Policy::Steady), Just(Policy::Stretched)]
}

/// A (S, T) pair the given policy accepts.
fn ingestible(policy: Policy) -> impl Strategy<Value = (u64, u64)> {
    buffer_size().prop_flat_map(move |size| {
        let horizon = policy.get_ingest_capacity(size).unwrap_or(u64::MAX);
        (Just(size), 0..horizon)
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(2048))]

    #[test]
    fn sites_stay_in_range((size, time) in ingestible(Policy::Steady)) {
        if let Some(site) = steady::assign_storage_site(size, time) {
            prop_assert!(site < size);
        }
    }

    #[test]
    fn stretched_sites_stay_in_range((size, time) in ingestible(Policy::Stretched)) {
        if let Some(site) = stretched::assign_storage_site(size, time) {
            prop_assert!(site < size);
        }
    }

    #[test]
    fn checked_and_unchecked_agree(policy in policy(), size in buffer_size(), time in any::<u64>()) {
        match policy.try_assign_storage_site(size, time) {
            Ok(site)    => prop_assert_eq!(site, policy.assign_storage_site(size, time)),
            Err(e)      => {
                prop_assert_eq!(policy, Policy::Stretched);
                prop_assert!(
                    matches!(e, SiteError::BeyondHorizon { .. }),
                    "expected BeyondHorizon, got {:?}",
                    e
                );
                prop_assert!(!policy.has_ingest_capacity(size, time));
            },
        }
    }

    #[test]
    fn u32_words_agree_with_u64_words(policy in policy(), s in 1u32..32, time in any::<u32>()) {
        let size = 1u32 << s;
        prop_assume!(policy.has_ingest_capacity(size, time));
        let narrow = policy.assign_storage_site(size, time).map(u64::from);
        let wide = policy.assign_storage_site(u64::from(size), u64::from(time));
        prop_assert_eq!(narrow, wide);
    }

    #[test]
    fn steady_capacity_ignores_time(size in any::<u64>(), t1 in any::<u64>(), t2 in any::<u64>()) {
        prop_assert_eq!(steady::has_ingest_capacity(size, t1), steady::has_ingest_capacity(size, t2));
        prop_assert_eq!(steady::has_ingest_capacity(size, t1), is_valid_buffer_size(size));
    }

    #[test]
    fn stretched_horizon_is_exact(s in 1u32..6, time in 0u64..(1 << 20)) {
        let size = 1u64 << s;
        prop_assert_eq!(stretched::has_ingest_capacity(size, time), time < (1 << size) - 1);
    }

    #[test]
    fn looked_up_items_belong_where_they_are(policy in policy(), s in 1u32..10, time in any::<u64>()) {
        let size = 1u64 << s;
        let time = match policy.get_ingest_capacity(size) {
            Some(capacity)  => time % capacity.saturating_add(1),
            None            => time,
        };
        prop_assume!(time >= size);
        let held: Vec<u64> = policy.lookup_ingest_times(size, time).unwrap().collect();
        prop_assert_eq!(held.len() as u64, size);
        for (site, ingested) in held.into_iter().enumerate() {
            prop_assert!(ingested < time);
            prop_assert_eq!(policy.assign_storage_site(size, ingested), Some(site as u64));
        }
    }
}

#[test]
fn answers_are_the_same_from_every_thread() {
    let mut rng = StdRng::seed_from_u64(42);
    let queries: Vec<(Policy, u64, u64)> = (0..4096)
        .map(|_| {
            let policy = if rng.gen_bool(0.5) { Policy::Steady } else { Policy::Stretched };
            let size = 1u64 << rng.gen_range(1u32..64);
            let horizon = policy.get_ingest_capacity(size).unwrap_or(u64::MAX);
            (policy, size, rng.gen_range(0..horizon))
        })
        .collect();
    let sequential: Vec<Option<u64>> = queries
        .iter()
        .map(|(p, size, time)| p.assign_storage_site(*size, *time))
        .collect();
    for _ in 0..4 {
        let parallel: Vec<Option<u64>> = queries
            .par_iter()
            .map(|(p, size, time)| p.assign_storage_site(*size, *time))
            .collect();
        assert_eq!(parallel, sequential);
    }
}
