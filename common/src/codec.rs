/// A value with a fixed on-page byte width.
///
/// Keys and record ids both implement this so a page can lay its slots out as
/// a flat array of `WIDTH`-byte cells.
pub trait FixedWidth: Sized {
    const WIDTH: usize;

    /// Writes exactly `WIDTH` bytes into the front of `buf`.
    fn encode(&self, buf: &mut [u8]);

    /// Reads a value back from the first `WIDTH` bytes of `buf`.
    fn decode(buf: &[u8]) -> Self;
}

pub fn read_u64_le(buf: &[u8]) -> u64 {
    let mut raw = [0u8; 8];
    raw.copy_from_slice(&buf[..8]);
    u64::from_le_bytes(raw)
}

pub fn read_u32_le(buf: &[u8]) -> u32 {
    let mut raw = [0u8; 4];
    raw.copy_from_slice(&buf[..4]);
    u32::from_le_bytes(raw)
}
