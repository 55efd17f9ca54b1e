use sitesel::{steady, stretched, DefaultUint};
use ffi::SiteChoice;

#[cxx::bridge(namespace = "sitesel")]
mod ffi {
    /// Where (if anywhere) an ingested item should be written.
    /// `site` is meaningless unless `present` is set.
    struct SiteChoice {
        pub present:    bool,
        pub site:       u64,
    }

    extern "Rust" {
        fn steady_has_ingest_capacity(size: u64, time: u64) -> bool;
        fn steady_assign_storage_site(size: u64, time: u64) -> SiteChoice;
        fn stretched_has_ingest_capacity(size: u64, time: u64) -> bool;
        fn stretched_assign_storage_site(size: u64, time: u64) -> SiteChoice;
        fn steady_lookup_ingest_times(size: u64, time: u64) -> Vec<u64>;
        fn stretched_lookup_ingest_times(size: u64, time: u64) -> Vec<u64>;
    }
}

impl From<Option<DefaultUint>> for SiteChoice {
    fn from(site: Option<DefaultUint>) -> Self {
        match site {
            Some(site)  => SiteChoice { present: true, site },
            None        => SiteChoice { present: false, site: 0 },
        }
    }
}

fn steady_has_ingest_capacity(size: u64, time: u64) -> bool {
    steady::has_ingest_capacity(size, time)
}

/// C++ callers get no debug assertions, so the capacity
/// check happens here on every call.
fn steady_assign_storage_site(size: u64, time: u64) -> SiteChoice {
    steady::try_assign_storage_site(size, time)
        .ok()
        .flatten()
        .into()
}

fn stretched_has_ingest_capacity(size: u64, time: u64) -> bool {
    stretched::has_ingest_capacity(size, time)
}

fn stretched_assign_storage_site(size: u64, time: u64) -> SiteChoice {
    stretched::try_assign_storage_site(size, time)
        .ok()
        .flatten()
        .into()
}

/// Empty when the lookup is refused (invalid size, or a buffer that
/// has not filled up yet).
fn steady_lookup_ingest_times(size: u64, time: u64) -> Vec<u64> {
    steady::lookup_ingest_times(size, time)
        .map(|held| held.collect())
        .unwrap_or_default()
}

fn stretched_lookup_ingest_times(size: u64, time: u64) -> Vec<u64> {
    stretched::lookup_ingest_times(size, time)
        .map(|held| held.collect())
        .unwrap_or_default()
}
