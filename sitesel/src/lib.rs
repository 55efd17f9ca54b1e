//! Welcome to `sitesel`!
//!
//! Given a buffer of `S` sites (`S` a power of two, bigger than one) and a
//! stream of items arriving at logical times `T = 0, 1, 2, ...`, `sitesel`
//! answers two questions per item:
//!
//! 1. can the buffer ingest it at all? (`has_ingest_capacity`)
//! 2. if so, which site should it overwrite, if any? (`assign_storage_site`)
//!
//! Two curation policies are on offer, [steady] and [stretched]. Both keep
//! a logarithmically sparse, well-spread sample of an unbounded stream in
//! `S` sites, via closed-form bit manipulation: no state, no allocation,
//! O(1) word operations per call. The caller owns the actual buffer and
//! performs the write.
//!
//! > ***ATTENTION:*** the fast-path functions trust their input. Passing
//! > an invalid buffer size (or, for [stretched], a logical time beyond the
//! > horizon) is a programming error caught only by debug assertions. Use
//! > the `try_` variants for anything that did not come from your own code.
//!
//! ```
//! use sitesel::steady;
//!
//! let sites: Vec<Option<u32>> = (0..8).map(|t| steady::assign_storage_site(4, t)).collect();
//! assert_eq!(sites, [Some(0), Some(1), Some(3), Some(2), None, Some(3), None, Some(0)]);
//! ```

mod analyze;

pub mod algo;
pub mod helpe;

pub use crate::helpe::*;
pub use crate::analyze::{audit, AuditError, AuditReport, Replay, MAX_REPLAY_SIZE};
