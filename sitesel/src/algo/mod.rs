pub mod steady;
pub mod stretched;

use crate::helpe::*;

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, ValueEnum, Debug)]
/// The curation policies on offer. Both answer the same questions about
/// a buffer of `S` sites at logical time `T`, following opposite schedules.
pub enum Policy {
    /// Never runs out of capacity; older strata get progressively compacted
    Steady,
    /// Covers the full horizon early, subdivides later, eventually saturates
    Stretched,
}

impl Policy {
    pub const ALL: [Policy; 2] = [Policy::Steady, Policy::Stretched];

    #[inline(always)]
    pub fn has_ingest_capacity<U: Uint>(self, size: U, time: U) -> bool {
        match self {
            Policy::Steady      => steady::has_ingest_capacity(size, time),
            Policy::Stretched   => stretched::has_ingest_capacity(size, time),
        }
    }

    #[inline(always)]
    pub fn get_ingest_capacity<U: Uint>(self, size: U) -> Option<U> {
        match self {
            Policy::Steady      => steady::get_ingest_capacity(size),
            Policy::Stretched   => stretched::get_ingest_capacity(size),
        }
    }

    #[inline(always)]
    pub fn assign_storage_site<U: Uint>(self, size: U, time: U) -> Option<U> {
        match self {
            Policy::Steady      => steady::assign_storage_site(size, time),
            Policy::Stretched   => stretched::assign_storage_site(size, time),
        }
    }

    pub fn try_assign_storage_site<U: Uint>(self, size: U, time: U) -> Result<Option<U>, SiteError> {
        match self {
            Policy::Steady      => steady::try_assign_storage_site(size, time),
            Policy::Stretched   => stretched::try_assign_storage_site(size, time),
        }
    }

    /// Ingestion times held at every site once `0..time` has been curated,
    /// in site order. Refused until the buffer has filled up.
    pub fn lookup_ingest_times<U: Uint>(self, size: U, time: U) -> Result<impl Iterator<Item = U>, SiteError> {
        Ok(match self {
            Policy::Steady      => Either::Left(steady::lookup_ingest_times(size, time)?),
            Policy::Stretched   => Either::Right(stretched::lookup_ingest_times(size, time)?),
        })
    }

    /// The name under which the reference tooling knows this policy.
    pub fn algo_name(self) -> &'static str {
        match self {
            Policy::Steady      => "steady_algo",
            Policy::Stretched   => "stretched_algo",
        }
    }
}

impl Display for Policy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.algo_name())
    }
}
