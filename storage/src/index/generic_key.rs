use std::{cmp::Ordering, fmt::Display};

use common::FixedWidth;
use serde::Serialize;

use super::KeyComparator;

/// Fixed width index key. Integer keys are stored big-endian with the sign
/// bit flipped, so byte order equals numeric order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GenericKey<const N: usize> {
    data: [u8; N],
}

impl<const N: usize> GenericKey<N> {
    const WIDTH_CHECK: () = assert!(N >= 4, "GenericKey needs at least 4 bytes");

    /// Keys narrower than 8 bytes hold an `i32`; wider values are truncated.
    /// Use [`GenericKey::try_from_integer`] when the value may not fit.
    pub fn from_integer(value: i64) -> Self {
        let () = Self::WIDTH_CHECK;
        debug_assert!(
            N >= 8 || i32::try_from(value).is_ok(),
            "{value} does not fit a {N} byte key"
        );
        let mut data = [0u8; N];
        if N >= 8 {
            data[..8].copy_from_slice(&((value as u64) ^ (1 << 63)).to_be_bytes());
        } else {
            data[..4].copy_from_slice(&((value as i32 as u32) ^ (1 << 31)).to_be_bytes());
        }
        Self { data }
    }

    /// Like [`GenericKey::from_integer`], but `None` when `value` does not fit.
    pub fn try_from_integer(value: i64) -> Option<Self> {
        if N < 8 && i32::try_from(value).is_err() {
            return None;
        }
        Some(Self::from_integer(value))
    }

    pub fn to_integer(&self) -> i64 {
        let () = Self::WIDTH_CHECK;
        if N >= 8 {
            let mut raw = [0u8; 8];
            raw.copy_from_slice(&self.data[..8]);
            (u64::from_be_bytes(raw) ^ (1 << 63)) as i64
        } else {
            let mut raw = [0u8; 4];
            raw.copy_from_slice(&self.data[..4]);
            (u32::from_be_bytes(raw) ^ (1 << 31)) as i32 as i64
        }
    }

    /// Copies up to `N` bytes of an already encoded key, zero padding the rest.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut data = [0u8; N];
        let n = bytes.len().min(N);
        data[..n].copy_from_slice(&bytes[..n]);
        Self { data }
    }

    pub fn as_bytes(&self) -> &[u8; N] {
        &self.data
    }
}

impl<const N: usize> Default for GenericKey<N> {
    fn default() -> Self {
        Self { data: [0u8; N] }
    }
}

impl<const N: usize> From<i64> for GenericKey<N> {
    fn from(value: i64) -> Self {
        Self::from_integer(value)
    }
}

impl<const N: usize> Display for GenericKey<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_integer())
    }
}

impl<const N: usize> Serialize for GenericKey<N> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_i64(self.to_integer())
    }
}

impl<const N: usize> FixedWidth for GenericKey<N> {
    const WIDTH: usize = N;

    fn encode(&self, buf: &mut [u8]) {
        buf[..N].copy_from_slice(&self.data);
    }

    fn decode(buf: &[u8]) -> Self {
        Self::from_bytes(&buf[..N])
    }
}

/// Byte-wise comparator for `GenericKey<N>`.
#[derive(Debug, Default, Clone, Copy)]
pub struct GenericComparator<const N: usize>;

impl<const N: usize> KeyComparator<GenericKey<N>> for GenericComparator<N> {
    fn compare(&self, lhs: &GenericKey<N>, rhs: &GenericKey<N>) -> Ordering {
        lhs.data.cmp(&rhs.data)
    }
}
