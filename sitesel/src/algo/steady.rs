//! Steady curation: a buffer that never runs out of capacity, retaining
//! an evenly spaced sample of the whole stream by progressively compacting
//! the sites devoted to older hanoi strata.

use crate::helpe::*;

/// Can the buffer ingest the item that arrives at `_time`?
///
/// Steady curation is unbounded in time: the answer depends only on
/// whether `size` is a usable buffer size. Items may still be *discarded*
/// by [assign_storage_site], but only for the current epoch.
#[inline(always)]
pub fn has_ingest_capacity<U: Uint>(size: U, _time: U) -> bool {
    is_valid_buffer_size(size)
}

/// `None` means "unbounded", i.e., any logical time is ingestible.
/// Invalid buffer sizes have zero capacity.
#[inline(always)]
pub fn get_ingest_capacity<U: Uint>(size: U) -> Option<U> {
    if is_valid_buffer_size(size) { None }
    else { Some(U::ZERO) }
}

/// Picks the site that should receive the item ingested at logical time
/// `time`, or returns `None` if the item is to be discarded.
///
/// The caller is responsible for `size` being valid (see
/// [has_ingest_capacity]). This is only checked in debug builds; use
/// [try_assign_storage_site] for untrusted input.
#[inline]
pub fn assign_storage_site<U: Uint>(size: U, time: U) -> Option<U> {
    debug_assert!(has_ingest_capacity(size, time), "Invalid buffer size {size}");
    let s = size.bit_width() - 1;
    let bl_t = time.bit_width();
    // Current epoch.
    let t = bl_t - s.min(bl_t);
    let h = hanoi_value(time);
    if h < t {
        // Not among the top hanoi values of this epoch.
        return None;
    }
    let i = hanoi_incidence(time, h);

    // Bunch position, within-bunch offset, segment width.
    let (k_b, o, w) = if i == U::ZERO {
        // The zeroth bunch is special.
        (U::ZERO, U::ZERO, s + 1)
    } else {
        // Full-bunch segments, and full bunches.
        let j = i.bit_floor() - U::ONE;
        let b = j.bit_width();
        let k_b = (U::ONE << b) * U::from_u32(s - b + 1);
        // h >= t guarantees h + s >= bl_t.
        let w = h + s + 1 - bl_t;
        let o = U::from_u32(w) * (i - j - U::ONE);

        (k_b, o, w)
    };
    debug_assert!(w > 0, "Zero-width segment at T = {time}");
    let p = h % w;

    Some(k_b + o + U::from_u32(p))
}

/// Same as [assign_storage_site], for input nobody vouched for.
pub fn try_assign_storage_site<U: Uint>(size: U, time: U) -> Result<Option<U>, SiteError> {
    if !has_ingest_capacity(size, time) {
        return Err(SiteError::invalid_size(size));
    }

    Ok(assign_storage_site(size, time))
}

/// Ingestion times of the items held at sites `0, 1, ..., size - 1` once
/// the items of logical times `0..time` have been curated.
///
/// Every site is occupied from `time == size` onwards; earlier than that
/// the lookup is refused. Each site is resolved in closed form, lazily:
/// nothing is replayed and nothing is allocated.
pub fn lookup_ingest_times<U: Uint>(size: U, time: U) -> Result<impl Iterator<Item = U>, SiteError> {
    if !is_valid_buffer_size(size) {
        return Err(SiteError::invalid_size(size));
    } else if time < size {
        return Err(SiteError::before_first_fill(size, time));
    }
    let s = size.bit_width() - 1;
    let sites = std::iter::successors(Some(U::ZERO), move |&k| {
        Some(k + U::ONE).filter(|&next| next < size)
    });

    Ok(sites.map(move |site| ingest_time_at(s, site, time)))
}

/// Latest item written to `site` before logical time `time`.
///
/// Sites `0..=s` hold the first incidence of every hanoi value, round
/// robin. Past them, bunch `b` spans `2^b` segments of `s - b - 1` sites
/// each: segment `q` takes incidence `2^b + q`, and its `p`'th site takes
/// hanoi values congruent to `p` modulo the segment width.
fn ingest_time_at<U: Uint>(s: u32, site: U, time: U) -> U {
    let (i, w, p) = if site <= U::from_u32(s) {
        (U::ZERO, s + 1, site.as_u32())
    } else {
        // Bunch `b + 1` starts at site `2^(b+1) (s - b)`.
        let mut b = 0;
        while (U::ONE << (b + 1)) * U::from_u32(s - b) <= site {
            b += 1;
        }
        let k_b = (U::ONE << b) * U::from_u32(s - b + 1);
        let w = s - b - 1;
        let (q, p) = ((site - k_b) / U::from_u32(w), (site - k_b) % U::from_u32(w));

        ((U::ONE << b) + q, w, p.as_u32())
    };

    // Item (h, i) was ingested at 2^h (2i + 1) - 1. Take the deepest
    // stratum of the right residue that has already arrived.
    let odd = (i << 1) + U::ONE;
    let h_max = (time / odd).bit_width() - 1;
    debug_assert!(h_max >= p, "Site {site} still empty at T = {time}");
    let h = h_max - (h_max - p) % w;

    (odd << h) - U::ONE
}
