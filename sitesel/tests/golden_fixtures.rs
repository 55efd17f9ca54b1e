//! Golden fixtures for both curation policies.
//!
//! The small-buffer tables pin the first sixteen ingestions (or up to the
//! stretched horizon, whichever comes first); the wide-buffer rows pin
//! placements deep into the 64-bit range, `T = u64::MAX` included.

use sitesel::{steady, stretched, Policy};

const N: Option<u64> = None;

fn s(site: u64) -> Option<u64> {
    Some(site)
}

fn first_placements(policy: Policy, size: u64, count: u64) -> Vec<Option<u64>> {
    (0..count)
        .map(|time| {
            assert!(policy.has_ingest_capacity(size, time), "{policy} S = {size} T = {time}");
            policy.assign_storage_site(size, time)
        })
        .collect()
}

#[test]
fn steady_two_sites() {
    assert_eq!(
        first_placements(Policy::Steady, 2, 16),
        vec![s(0), s(1), N, s(0), N, N, N, s(1), N, N, N, N, N, N, N, s(0)]
    );
}

#[test]
fn steady_four_sites() {
    assert_eq!(
        first_placements(Policy::Steady, 4, 16),
        vec![s(0), s(1), s(3), s(2), N, s(3), N, s(0), N, N, N, s(3), N, N, N, s(1)]
    );
}

#[test]
fn steady_eight_sites() {
    assert_eq!(
        first_placements(Policy::Steady, 8, 16),
        vec![s(0), s(1), s(4), s(2), s(6), s(5), s(7), s(3), N, s(6), N, s(4), N, s(7), N, s(0)]
    );
    let next: Vec<_> = (16..32).map(|t| steady::assign_storage_site(8u64, t)).collect();
    assert_eq!(
        next,
        vec![N, N, N, s(6), N, N, N, s(5), N, N, N, s(7), N, N, N, s(1)]
    );
}

#[test]
fn steady_sixteen_sites() {
    assert_eq!(
        first_placements(Policy::Steady, 16, 16),
        vec![
            s(0), s(1), s(5), s(2), s(8), s(6), s(10), s(3),
            s(12), s(9), s(13), s(7), s(14), s(11), s(15), s(4),
        ]
    );
}

#[test]
fn stretched_two_sites() {
    assert_eq!(first_placements(Policy::Stretched, 2, 3), vec![s(0), s(1), N]);
    assert!(!stretched::has_ingest_capacity(2u64, 3));
}

#[test]
fn stretched_four_sites() {
    assert_eq!(
        first_placements(Policy::Stretched, 4, 15),
        vec![s(0), s(1), s(3), s(2), N, N, N, s(3), N, N, N, N, N, N, N]
    );
    assert!(!stretched::has_ingest_capacity(4u64, 15));
}

#[test]
fn stretched_eight_sites() {
    assert_eq!(
        first_placements(Policy::Stretched, 8, 16),
        vec![s(0), s(1), s(5), s(2), s(4), s(6), s(7), s(3), N, N, N, s(7), N, N, N, s(4)]
    );
}

#[test]
fn stretched_sixteen_sites() {
    assert_eq!(
        first_placements(Policy::Stretched, 16, 16),
        vec![
            s(0), s(1), s(9), s(2), s(6), s(10), s(13), s(3),
            s(5), s(7), s(8), s(11), s(12), s(14), s(15), s(4),
        ]
    );
}

#[test]
fn steady_wide_buffers() {
    let rows: [(u64, u64, Option<u64>); 16] = [
        (1 << 10, 12345,            N),
        (1 << 10, u64::MAX,         s(9)),
        (1 << 10, u64::MAX - 1,     N),
        (1 << 20, 12345,            s(28785)),
        (1 << 20, 987654321,        N),
        (1 << 20, u64::MAX,         s(1)),
        (1 << 32, 12345,            s(65817)),
        (1 << 32, 987654321,        s(1256089777)),
        (1 << 32, (1 << 40) + 17,   N),
        (1 << 32, u64::MAX,         s(31)),
        (1 << 63, 12345,            s(161483)),
        (1 << 63, 987654321,        s(8910410757)),
        (1 << 63, (1 << 40) + 17,   s(7146825580641)),
        (1 << 63, u64::MAX,         s(0)),
        (1 << 63, u64::MAX - 1,     N),
        (1 << 63, 1 << 63,          N),
    ];
    for (size, time, expected) in rows {
        assert_eq!(steady::assign_storage_site(size, time), expected, "S = {size} T = {time}");
    }
}

#[test]
fn stretched_wide_buffers() {
    let rows: [(u64, u64, Option<u64>); 12] = [
        (1 << 6,  12345,                N),
        (1 << 6,  (1 << 62) - 1,        s(62)),
        (1 << 10, (1 << 40) + 17,       N),
        (1 << 10, (1 << 62) - 1,        s(62)),
        (1 << 20, 12345,                s(531721)),
        (1 << 20, 987654321,            N),
        (1 << 20, u64::MAX - 1,         N),
        (1 << 63, 12345,                s(4676988213024260105)),
        (1 << 63, 987654321,            s(7744400014117437454)),
        (1 << 63, (1 << 40) + 17,       s(150994983)),
        (1 << 63, (1 << 62) - 1,        s(62)),
        (1 << 63, u64::MAX - 1,         N),
    ];
    for (size, time, expected) in rows {
        assert!(stretched::has_ingest_capacity(size, time));
        assert_eq!(stretched::assign_storage_site(size, time), expected, "S = {size} T = {time}");
    }
}

#[test]
fn narrow_words_agree_with_wide_ones() {
    for policy in Policy::ALL {
        for size in [2u8, 4, 8, 16, 32, 64, 128] {
            for time in 0..=u8::MAX {
                if !policy.has_ingest_capacity(size, time) {
                    continue;
                }
                let narrow = policy.assign_storage_site(size, time).map(u64::from);
                let wide = policy.assign_storage_site(u64::from(size), u64::from(time));
                let widest = policy.assign_storage_site(u128::from(size), u128::from(time))
                    .map(|k| k as u64);
                assert_eq!(narrow, wide, "{policy} S = {size} T = {time}");
                assert_eq!(wide, widest, "{policy} S = {size} T = {time}");
            }
        }
    }
}

#[test]
fn lookups_at_pinned_times() {
    let held = |policy: Policy, size: u64, time: u64| -> Vec<u64> {
        policy.lookup_ingest_times(size, time).unwrap().collect()
    };
    assert_eq!(
        held(Policy::Steady, 16, 100),
        [31, 63, 3, 7, 15, 23, 47, 95, 79, 39, 27, 55, 71, 87, 51, 59]
    );
    assert_eq!(
        held(Policy::Stretched, 16, 100),
        [0, 1, 3, 7, 15, 31, 63, 9, 19, 2, 5, 11, 23, 47, 95, 27]
    );
    assert_eq!(
        held(Policy::Steady, 8, 1 << 63),
        [
            1152921504606846975, 2305843009213693951, 4611686018427387903, 9223372036854775807,
            3458764513820540927, 6917529027641081855, 5764607523034234879, 8070450532247928831,
        ]
    );
    assert_eq!(
        held(Policy::Steady, 8, 12345678901234567),
        [
            4503599627370495, 9007199254740991, 1125899906842623, 2251799813685247,
            3377699720527871, 6755399441055743, 11258999068426239, 7881299347898367,
        ]
    );
}
