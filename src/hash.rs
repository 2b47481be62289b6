//! Key mixing for table indexing.
//!
//! Grid position keys are raw occupancy bits, so their low bits are highly
//! correlated between neighbouring positions. Direct-mapped tables index by a
//! `SplitMix64` finalisation of the key instead.

/// `SplitMix64` finaliser.
#[inline]
pub fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = x;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Fold a 128-bit position key into a well-mixed 64-bit index seed.
#[inline]
#[allow(clippy::cast_possible_truncation)]
pub fn spread_key(key: u128) -> u64 {
    let lo = key as u64;
    let hi = (key >> 64) as u64;
    splitmix64(lo ^ splitmix64(hi ^ 0xC0FF_EE00_D15E_CAFE))
}
