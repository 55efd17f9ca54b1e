use crate::helpe::*;
use tracing::{debug, info};

/// Replays are meant for buffers that comfortably fit in memory.
pub const MAX_REPLAY_SIZE: usize = 1 << 24;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
/// A replay either could not run, or caught a policy misbehaving.
pub enum AuditError {
    #[error(transparent)]
    Site(#[from] SiteError),
    #[error("{size} sites are too many to replay")]
    TooLarge {
        size:   String,
    },
    #[error("{policy}: T = {time} was assigned site {site}, outside of {size} sites")]
    SiteOutOfRange {
        policy: Policy,
        size:   String,
        time:   String,
        site:   String,
    },
    #[error("{policy}: the first {size} items did not fill every site exactly once")]
    FirstFillNotPermutation {
        policy: Policy,
        size:   String,
    },
    #[error("{policy}: after T = {time} no item of hanoi value {hanoi} is retained")]
    DeepestLost {
        policy: Policy,
        time:   String,
        hanoi:  u32,
    },
    #[error("steady_algo: T = {time} (hanoi value {hanoi}, epoch {epoch}) was {verdict}")]
    EpochMismatch {
        time:       String,
        hanoi:      u32,
        epoch:      u32,
        verdict:    &'static str,
    },
    #[error("steady_algo: after T = {time} retained items are {gap} apart in a {size}-site buffer")]
    GapTooWide {
        size:   String,
        time:   String,
        gap:    String,
    },
    #[error("stretched_algo: the first item was evicted at T = {time}")]
    FirstItemLost {
        time:   String,
    },
    #[error("logical time ran out at T = {time}")]
    OutOfTime {
        time:   String,
    },
    #[error("{policy}: lookup at T = {time} disagrees with the replay at site {site}")]
    LookupMismatch {
        policy: Policy,
        time:   String,
        site:   String,
    },
    #[error("stretched_algo: T = {time} was placed past saturation of a {size}-site buffer")]
    PlacedPastSaturation {
        size:   String,
        time:   String,
    },
}

/// Replays a [Policy] over logical times 0, 1, 2, ... for a fixed buffer
/// size, tracking which ingestion time every site currently holds.
///
/// No payloads are involved: the ingestion time *is* the item.
pub struct Replay<U: Uint> {
    policy:     Policy,
    size:       U,
    // The logical time of the next ingestion.
    now:        U,
    held:       Vec<Option<U>>,
    // Retained items per hanoi value.
    strata:     Vec<usize>,
    deepest:    u32,
    placed:     u64,
    discarded:  u64,
}

impl<U: Uint> Replay<U> {
    pub fn new(policy: Policy, size: U) -> Result<Self, AuditError> {
        if !is_valid_buffer_size(size) {
            return Err(SiteError::invalid_size(size).into());
        } else if size.bit_width() > MAX_REPLAY_SIZE.trailing_zeros() + 1 {
            return Err(AuditError::TooLarge { size: size.to_string() });
        }

        Ok(Self {
            policy,
            size,
            now:        U::ZERO,
            held:       vec![None; size.as_usize()],
            strata:     vec![0; U::BITS as usize + 1],
            deepest:    0,
            placed:     0,
            discarded:  0,
        })
    }

    /// Ingests the item of the next logical time, returning the
    /// site it landed on (if any). The item of time `U::MAX` is refused:
    /// `now` would wrap around after it.
    pub fn step(&mut self) -> Result<Option<U>, AuditError> {
        let time = self.now;
        if time == U::MAX {
            return Err(AuditError::OutOfTime { time: time.to_string() });
        }
        let site = self.policy.try_assign_storage_site(self.size, time)?;
        let h = hanoi_value(time);
        if let Some(k) = site {
            if k >= self.size {
                return Err(AuditError::SiteOutOfRange {
                    policy: self.policy,
                    size:   self.size.to_string(),
                    time:   time.to_string(),
                    site:   k.to_string(),
                });
            }
            if let Some(evicted) = self.held[k.as_usize()].replace(time) {
                self.strata[hanoi_value(evicted) as usize] -= 1;
            }
            self.strata[h as usize] += 1;
            self.placed += 1;
        } else {
            self.discarded += 1;
        }
        self.deepest = self.deepest.max(h);
        self.now = time + U::ONE;

        Ok(site)
    }

    pub fn now(&self) -> U {
        self.now
    }

    pub fn size(&self) -> U {
        self.size
    }

    /// Ingestion times currently held, ascending.
    pub fn retained(&self) -> impl Iterator<Item = U> + '_ {
        self.held
            .iter()
            .flatten()
            .copied()
            .sorted_unstable()
    }

    /// The ingestion time held at `site`, if any.
    pub fn held_at(&self, site: U) -> Option<U> {
        self.held.get(site.as_usize()).copied().flatten()
    }

    /// Is the item ingested at `time` still somewhere in the buffer?
    pub fn holds(&self, time: U) -> bool {
        self.held.contains(&Some(time))
    }

    pub fn is_full(&self) -> bool {
        self.held.iter().all(Option::is_some)
    }

    /// Largest distance between consecutive retained ingestion times,
    /// counting the upcoming logical time as the last one.
    pub fn max_gap(&self) -> Option<U> {
        self.retained()
            .chain(std::iter::once(self.now))
            .tuple_windows()
            .map(|(a, b)| b - a)
            .max()
    }

    /// Is some item carrying the deepest hanoi value seen so far retained?
    pub fn holds_deepest(&self) -> bool {
        self.now == U::ZERO || self.strata[self.deepest as usize] > 0
    }

    pub fn deepest(&self) -> u32 {
        self.deepest
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// What a clean [audit] went through.
pub struct AuditReport {
    pub policy:     Policy,
    pub size:       String,
    pub steps:      u64,
    pub placed:     u64,
    pub discarded:  u64,
    pub retained:   usize,
}

/// Replays `policy` on a `size`-site buffer for `steps` logical times (or
/// up to the policy's horizon, whichever comes first), checking after
/// every ingestion that:
///
/// 1. the first `size` items occupy every site exactly once,
/// 2. an item of the deepest hanoi value seen so far is still retained,
///    and at every power of two from `size` on, [Policy::lookup_ingest_times]
///    agrees with the replayed buffer,
/// 3. *steady*: exactly the items whose hanoi value reaches the current
///    epoch get placed, and retained items stay at most `2(T+1)/S` apart,
/// 4. *stretched*: the very first item is never evicted, and nothing is
///    placed once half the horizon (`2^(S-1)`) is reached.
pub fn audit<U: Uint>(policy: Policy, size: U, steps: u64) -> Result<AuditReport, AuditError> {
    let start = Instant::now();
    let mut replay = Replay::new(policy, size)?;
    let s = size.bit_width() - 1;
    // Past this point stretched curation must have saturated.
    let saturation = if size <= U::from_u32(U::BITS) {
        U::ONE.checked_shl(size.as_u32() - 1)
    } else { None };
    let steps = match policy.get_ingest_capacity(size) {
        Some(capacity)  => steps.min(u64::try_from(capacity.as_u128()).unwrap_or(u64::MAX)),
        None            => steps,
    };
    // Logical time must not wrap around either.
    let steps = steps.min(u64::try_from(U::MAX.as_u128()).unwrap_or(u64::MAX));

    for _ in 0..steps {
        let time = replay.now();
        let site = replay.step()?;
        let h = hanoi_value(time);

        if time.wrapping_add(U::ONE) == size && !replay.is_full() {
            debug!(%policy, %size, "first fill left sites empty");
            return Err(AuditError::FirstFillNotPermutation {
                policy,
                size: size.to_string(),
            });
        }
        let now = replay.now();
        if now >= size && now.is_power_of_two() {
            let mismatch = policy.lookup_ingest_times(size, now)?
                .zip(&replay.held)
                .position(|(looked_up, held)| *held != Some(looked_up));
            if let Some(site) = mismatch {
                return Err(AuditError::LookupMismatch {
                    policy,
                    time:   now.to_string(),
                    site:   site.to_string(),
                });
            }
        }
        if !replay.holds_deepest() {
            return Err(AuditError::DeepestLost {
                policy,
                time:   time.to_string(),
                hanoi:  replay.deepest(),
            });
        }

        match policy {
            Policy::Steady      => {
                let epoch = time.bit_width().saturating_sub(s);
                if site.is_some() != (h >= epoch) {
                    return Err(AuditError::EpochMismatch {
                        time:       time.to_string(),
                        hanoi:      h,
                        epoch,
                        verdict:    if site.is_some() { "placed" } else { "discarded" },
                    });
                }
                if time >= size {
                    // gap * S <= 2(T+1), without the overflow.
                    let limit = replay.now() / (size >> 1);
                    if let Some(gap) = replay.max_gap().filter(|g| *g > limit) {
                        return Err(AuditError::GapTooWide {
                            size:   size.to_string(),
                            time:   time.to_string(),
                            gap:    gap.to_string(),
                        });
                    }
                }
            },
            Policy::Stretched   => {
                if !replay.holds(U::ZERO) {
                    return Err(AuditError::FirstItemLost { time: time.to_string() });
                }
                if site.is_some() && saturation.is_some_and(|sat| time >= sat) {
                    return Err(AuditError::PlacedPastSaturation {
                        size: size.to_string(),
                        time: time.to_string(),
                    });
                }
            },
        }
    }

    let report = AuditReport {
        policy,
        size:       size.to_string(),
        steps,
        placed:     replay.placed,
        discarded:  replay.discarded,
        retained:   replay.retained().count(),
    };
    info!(
        %policy,
        %size,
        steps,
        placed = report.placed,
        elapsed_us = start.elapsed().as_micros() as u64,
        "audit passed"
    );

    Ok(report)
}
