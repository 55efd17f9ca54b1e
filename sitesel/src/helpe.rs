pub use std::{
    fmt::{Debug, Display},
    hash::Hash,
    io::{BufRead, Write},
    ops::{Add, Sub, Mul, Div, Rem, Shl, Shr, BitAnd},
    str::FromStr,
    time::Instant,
};
pub use thiserror::Error;
pub use itertools::{Either, Itertools};
pub use rayon::prelude::*;
pub use indexmap::IndexMap;
pub use clap::{Parser, ValueEnum};

pub use crate::algo::{Policy, steady, stretched};

/// The width used by the drivers and the C++ shim unless told otherwise.
///
/// Nothing in the algorithms themselves depends on it: every operation is
/// generic over [Uint].
pub type DefaultUint = u64;

/// Fixed-width unsigned integers, seen through the handful of bit-level
/// primitives site selection is built upon.
///
/// Bit counts (widths, trailing zeros, shift amounts) are always `u32`,
/// exactly like the inherent methods of the primitive types. Only buffer
/// sizes, logical times and sites live in `Self`.
pub trait Uint:
    Copy + Ord + Eq + Hash + Debug + Display + FromStr + Send + Sync + 'static
    + Add<Output = Self> + Sub<Output = Self> + Mul<Output = Self>
    + Div<Output = Self> + Rem<Output = Self> + BitAnd<Output = Self>
    + Shl<u32, Output = Self> + Shr<u32, Output = Self>
{
    const ZERO: Self;
    const ONE:  Self;
    const MAX:  Self;
    const BITS: u32;

    /// Number of bits needed to represent the value; zero for zero.
    fn bit_width(self) -> u32;
    fn trailing_zeros(self) -> u32;
    fn count_ones(self) -> u32;
    fn is_power_of_two(self) -> bool;
    fn checked_shl(self, n: u32) -> Option<Self>;
    fn checked_shr(self, n: u32) -> Option<Self>;
    fn wrapping_add(self, rhs: Self) -> Self;
    fn wrapping_sub(self, rhs: Self) -> Self;
    fn wrapping_shl(self, n: u32) -> Self;
    /// Truncating, like `as`. Only fed bit counts and other values no
    /// larger than 128, which every supported width holds exactly.
    fn from_u32(v: u32) -> Self;
    /// Truncating. Only meant for values already known to be small
    /// (sites of a buffer that fits in memory, shift amounts).
    fn as_usize(self) -> usize;
    fn as_u32(self) -> u32;
    fn as_u128(self) -> u128;

    /// Largest power of two not greater than `self`, or zero for zero.
    #[inline(always)]
    fn bit_floor(self) -> Self {
        if self == Self::ZERO { Self::ZERO }
        else { Self::ONE << (self.bit_width() - 1) }
    }
}

macro_rules! impl_uint {
    ($($t:ty),*) => {$(
        impl Uint for $t {
            const ZERO: Self = 0;
            const ONE:  Self = 1;
            const MAX:  Self = <$t>::MAX;
            const BITS: u32  = <$t>::BITS;

            #[inline(always)]
            fn bit_width(self) -> u32 { <$t>::BITS - self.leading_zeros() }
            #[inline(always)]
            fn trailing_zeros(self) -> u32 { <$t>::trailing_zeros(self) }
            #[inline(always)]
            fn count_ones(self) -> u32 { <$t>::count_ones(self) }
            #[inline(always)]
            fn is_power_of_two(self) -> bool { <$t>::is_power_of_two(self) }
            #[inline(always)]
            fn checked_shl(self, n: u32) -> Option<Self> { <$t>::checked_shl(self, n) }
            #[inline(always)]
            fn checked_shr(self, n: u32) -> Option<Self> { <$t>::checked_shr(self, n) }
            #[inline(always)]
            fn wrapping_add(self, rhs: Self) -> Self { <$t>::wrapping_add(self, rhs) }
            #[inline(always)]
            fn wrapping_sub(self, rhs: Self) -> Self { <$t>::wrapping_sub(self, rhs) }
            #[inline(always)]
            fn wrapping_shl(self, n: u32) -> Self { <$t>::wrapping_shl(self, n) }
            #[inline(always)]
            fn from_u32(v: u32) -> Self { v as $t }
            #[inline(always)]
            fn as_usize(self) -> usize { self as usize }
            #[inline(always)]
            fn as_u32(self) -> u32 { self as u32 }
            #[inline(always)]
            fn as_u128(self) -> u128 { self as u128 }
        }
    )*};
}

impl_uint!(u8, u16, u32, u64, u128, usize);

/// The "hanoi value" of logical time `t`: the number of trailing zeros
/// of `t + 1`. For t = 0, 1, 2, ... it runs 0, 1, 0, 2, 0, 1, 0, 3, ...
///
/// `U::MAX` wraps to zero and thus gets the full bit count.
#[inline(always)]
pub fn hanoi_value<U: Uint>(t: U) -> u32 {
    t.wrapping_add(U::ONE).trailing_zeros()
}

/// Number of earlier occurrences of the hanoi value `h` before time `t`.
/// A shift by the full bit count or more means none.
#[inline(always)]
pub fn hanoi_incidence<U: Uint>(t: U, h: u32) -> U {
    t.checked_shr(h + 1).unwrap_or(U::ZERO)
}

/// Power of two, and bigger than one.
#[inline(always)]
pub fn is_valid_buffer_size<U: Uint>(size: U) -> bool {
    size.is_power_of_two() && size > U::ONE
}

/// Bit width of a small bit count (epochs and such).
#[inline(always)]
pub fn bit_width_u32(v: u32) -> u32 {
    u32::BITS - v.leading_zeros()
}

/// Sets up `tracing` for the binaries. Logs go to stderr so that stdout
/// stays machine-readable; `RUST_LOG` overrides `default_filter`.
pub fn init_logging(default_filter: &str) {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));
    // A second call finds a subscriber in place; nothing to do then.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .compact(),
        )
        .try_init();
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
/// Appears when a checked entry point is handed input that the
/// unchecked fast path would silently misbehave on.
pub enum SiteError {
    #[error("buffer size {size} is not a power of two greater than one")]
    InvalidBufferSize {
        size:   String,
    },
    #[error("logical time {time} lies beyond the ingest horizon of a {size}-site stretched buffer")]
    BeyondHorizon {
        size:   String,
        time:   String,
    },
    #[error("ingest times at T = {time} are only known once all {size} sites have been filled")]
    BeforeFirstFill {
        size:   String,
        time:   String,
    },
}

impl SiteError {
    pub fn invalid_size<U: Uint>(size: U) -> Self {
        Self::InvalidBufferSize { size: size.to_string() }
    }

    pub fn beyond_horizon<U: Uint>(size: U, time: U) -> Self {
        Self::BeyondHorizon {
            size: size.to_string(),
            time: time.to_string(),
        }
    }

    pub fn before_first_fill<U: Uint>(size: U, time: U) -> Self {
        Self::BeforeFirstFill {
            size: size.to_string(),
            time: time.to_string(),
        }
    }
}
