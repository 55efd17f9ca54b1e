//! Stretched curation: broad coverage of the whole horizon up front, then
//! recursive subdivision of the bunches reserved to each hanoi stratum
//! until the buffer saturates for good.

use crate::helpe::*;

/// Can the buffer ingest the item that arrives at `time`?
///
/// On top of a valid `size`, stretched curation demands `time < 2^size - 1`.
/// That horizon is evaluated exactly, without ever computing `2^size`
/// when it would not fit in `U`.
#[inline(always)]
pub fn has_ingest_capacity<U: Uint>(size: U, time: U) -> bool {
    if !is_valid_buffer_size(size) {
        false
    } else if size > U::from_u32(U::BITS) {
        // The horizon lies past every representable time.
        true
    } else {
        time < (U::MAX >> (U::BITS - size.as_u32()))
    }
}

/// Number of items that can be ingested: `2^size - 1`, saturating at
/// `U::MAX` for buffers whose horizon does not fit in `U`. Invalid sizes
/// have zero capacity.
///
/// Unlike steady curation the capacity is always finite, so this never
/// returns `None`.
#[inline(always)]
pub fn get_ingest_capacity<U: Uint>(size: U) -> Option<U> {
    if !is_valid_buffer_size(size) {
        Some(U::ZERO)
    } else if size >= U::from_u32(U::BITS) {
        Some(U::MAX)
    } else {
        Some((U::ONE << size.as_u32()) - U::ONE)
    }
}

/// Picks the site that should receive the item ingested at logical time
/// `time`, or returns `None` if the item is to be discarded. Unlike steady
/// curation, a discard here is final: all later items of the same hanoi
/// stratum are discarded too.
///
/// The caller is responsible for `(size, time)` being within capacity
/// (see [has_ingest_capacity]). This is only checked in debug builds; use
/// [try_assign_storage_site] for untrusted input.
#[inline]
pub fn assign_storage_site<U: Uint>(size: U, time: U) -> Option<U> {
    debug_assert!(has_ingest_capacity(size, time), "No capacity for T = {time} in {size} sites");
    let s = size.bit_width() - 1;
    // Current epoch.
    let t = time.bit_width().saturating_sub(s);
    let h = hanoi_value(time);
    let i = hanoi_incidence(time, h);

    // Current meta-epoch, with its correction for epochs right
    // past a power of two.
    let bl_t = bit_width_u32(t);
    let t_floor = if t == 0 { 0 } else { 1 << (bl_t - 1) };
    let epsilon_tau = (t_floor << 1) > t + bl_t;
    let tau = bl_t - epsilon_tau as u32;

    // Bunches available to this hanoi value.
    let b = match size.checked_shr(tau + 1) {
        Some(b) if b != U::ZERO => b,
        _                       => U::ONE,
    };
    if i >= b {
        // Seen more times than there are bunches reserved to it.
        return None;
    }

    // `i` is the logical bunch index, i.e., the order in which bunches are
    // filled. Translate it into the physical, left-to-right bunch index.
    // Nestedness depth first...
    let v = i.bit_width();
    // ...then the spacing between bunches at that depth...
    let w = if v == 0 { U::ZERO }
            else { size.checked_shr(v).unwrap_or(U::ZERO) };
    // ...the offset of that depth in physical order...
    let o = w >> 1;
    // ...and the position within the depth.
    let p = i - i.bit_floor();
    let b_p = o + w * p;

    // Site of the b_p'th bunch. popcount(2S - b_p) is taken modulo the
    // word size, except for b_p = 0 where 2S itself may not fit.
    let pop = if b_p == U::ZERO { 1 }
              else { size.wrapping_shl(1).wrapping_sub(b_p).count_ones() };
    // The zeroth bunch sits alone at site 0.
    let epsilon_k_b = (i != U::ZERO) as u32;
    let k_b = (b_p << 1) + U::from_u32(pop) - U::from_u32(1 + epsilon_k_b);

    // Within its bunch, the hanoi value is the offset.
    Some(k_b + U::from_u32(h))
}

/// Same as [assign_storage_site], for input nobody vouched for.
pub fn try_assign_storage_site<U: Uint>(size: U, time: U) -> Result<Option<U>, SiteError> {
    if !is_valid_buffer_size(size) {
        return Err(SiteError::invalid_size(size));
    } else if !has_ingest_capacity(size, time) {
        return Err(SiteError::beyond_horizon(size, time));
    }

    Ok(assign_storage_site(size, time))
}

/// Ingestion times of the items held at sites `0, 1, ..., size - 1` once
/// the items of logical times `0..time` have been curated.
///
/// Every site is occupied from `time == size` onwards; earlier than that
/// the lookup is refused, as is a `time` past the ingest horizon.
///
/// Only the first `size / 2` incidences of any hanoi value are ever
/// placed, so the candidates for each site are enumerated per stratum
/// and the latest one wins. Takes `O(size * log(time))` placements and
/// one allocation of `size` words.
pub fn lookup_ingest_times<U: Uint>(size: U, time: U) -> Result<impl Iterator<Item = U>, SiteError> {
    if !is_valid_buffer_size(size) {
        return Err(SiteError::invalid_size(size));
    } else if time < size {
        return Err(SiteError::before_first_fill(size, time));
    } else if get_ingest_capacity(size).is_some_and(|capacity| time > capacity) {
        // Curating `0..time` needs `time - 1` ingestible.
        return Err(SiteError::beyond_horizon(size, time));
    }

    let bunches = size >> 1;
    let mut held = vec![U::ZERO; size.as_usize()];
    let mut h = 0;
    while U::ONE.checked_shl(h).is_some_and(|first| first <= time) {
        // Incidences `i` of stratum `h` with 2^h (2i + 1) - 1 < time.
        let arrived = ((time >> h) - U::ONE) >> 1;
        let mut i = U::ZERO;
        while i < bunches && i <= arrived {
            let ingested = (((i << 1) + U::ONE) << h) - U::ONE;
            if let Some(site) = assign_storage_site(size, ingested) {
                let slot = &mut held[site.as_usize()];
                *slot = (*slot).max(ingested);
            }
            i = i + U::ONE;
        }
        h += 1;
    }

    Ok(held.into_iter())
}
