/// GSO (lockup) state.
pub mod gso;

/// Staking options state.
pub mod staking_options;

pub use self::{gso::GsoState, staking_options::SoState};

/// Decode error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// The buffer does not have the expected size.
    #[error("invalid length: expected {expected} bytes, got {actual}")]
    InvalidLength {
        /// Expected length.
        expected: usize,
        /// Actual length.
        actual: usize,
    },
    /// A read runs past the end of the buffer.
    #[error("out of bounds: reading {len} bytes at offset {offset} of a {buf_len}-byte buffer")]
    OutOfBounds {
        /// Offset of the read.
        offset: usize,
        /// Length of the read.
        len: usize,
        /// Length of the buffer.
        buf_len: usize,
    },
    /// The account discriminator does not match.
    #[error("invalid discriminator")]
    InvalidDiscriminator,
    /// Borsh error.
    #[error("borsh: {0}")]
    Borsh(String),
}

/// Read `len` bytes at `offset`.
pub fn read_bytes(buf: &[u8], offset: usize, len: usize) -> Result<&[u8], DecodeError> {
    let out_of_bounds = || DecodeError::OutOfBounds {
        offset,
        len,
        buf_len: buf.len(),
    };
    let end = offset.checked_add(len).ok_or_else(out_of_bounds)?;
    buf.get(offset..end).ok_or_else(out_of_bounds)
}

/// Read a fixed-size array at `offset`.
pub fn read_array<const N: usize>(buf: &[u8], offset: usize) -> Result<[u8; N], DecodeError> {
    let bytes = read_bytes(buf, offset, N)?;
    bytes.try_into().map_err(|_| DecodeError::OutOfBounds {
        offset,
        len: N,
        buf_len: buf.len(),
    })
}

/// Read a `u8` at `offset`.
pub fn read_u8(buf: &[u8], offset: usize) -> Result<u8, DecodeError> {
    let [byte] = read_array::<1>(buf, offset)?;
    Ok(byte)
}

/// Read a little-endian `u64` at `offset`.
///
/// The value is assembled from two little-endian 32-bit words as
/// `low + (high << 32)`.
pub fn read_u64_le(buf: &[u8], offset: usize) -> Result<u64, DecodeError> {
    let low = u64::from(u32::from_le_bytes(read_array(buf, offset)?));
    let high_offset = offset.checked_add(4).ok_or(DecodeError::OutOfBounds {
        offset,
        len: 8,
        buf_len: buf.len(),
    })?;
    let high = u64::from(u32::from_le_bytes(read_array(buf, high_offset)?));
    Ok(low + (high << 32))
}
