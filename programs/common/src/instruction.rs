//! Instruction data deserialization helpers
//!
//! All reads are bounds-checked and little-endian. Out-of-range reads return
//! `InvalidInstruction` and never panic.

use crate::error::AmmError;
use crate::types::SwapDirection;

/// Read a u8 from instruction data
#[inline]
pub fn read_u8(data: &[u8], offset: usize) -> Result<u8, AmmError> {
    data.get(offset).copied().ok_or(AmmError::InvalidInstruction)
}

/// Read a fixed-size byte array from instruction data
#[inline]
pub fn read_bytes<const N: usize>(data: &[u8], offset: usize) -> Result<[u8; N], AmmError> {
    let end = offset.checked_add(N).ok_or(AmmError::InvalidInstruction)?;
    let slice = data.get(offset..end).ok_or(AmmError::InvalidInstruction)?;
    let mut bytes = [0u8; N];
    bytes.copy_from_slice(slice);
    Ok(bytes)
}

/// Read a u16 (little-endian) from instruction data
#[inline]
pub fn read_u16(data: &[u8], offset: usize) -> Result<u16, AmmError> {
    read_bytes::<2>(data, offset).map(u16::from_le_bytes)
}

/// Read a u64 (little-endian) from instruction data
#[inline]
pub fn read_u64(data: &[u8], offset: usize) -> Result<u64, AmmError> {
    read_bytes::<8>(data, offset).map(u64::from_le_bytes)
}

/// Read a boolean flag (0 or 1)
#[inline]
pub fn read_bool(data: &[u8], offset: usize) -> Result<bool, AmmError> {
    match read_u8(data, offset)? {
        0 => Ok(false),
        1 => Ok(true),
        _ => Err(AmmError::InvalidInstruction),
    }
}

/// Read a SwapDirection from instruction data
#[inline]
pub fn read_direction(data: &[u8], offset: usize) -> Result<SwapDirection, AmmError> {
    match read_u8(data, offset)? {
        0 => Ok(SwapDirection::XToY),
        1 => Ok(SwapDirection::YToX),
        _ => Err(AmmError::InvalidInstruction),
    }
}

/// Instruction data reader with tracked offset
pub struct InstructionReader<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> InstructionReader<'a> {
    #[inline]
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.offset)
    }

    #[inline]
    pub fn read_u8(&mut self) -> Result<u8, AmmError> {
        let val = read_u8(self.data, self.offset)?;
        self.offset += 1;
        Ok(val)
    }

    #[inline]
    pub fn read_u16(&mut self) -> Result<u16, AmmError> {
        let val = read_u16(self.data, self.offset)?;
        self.offset += 2;
        Ok(val)
    }

    #[inline]
    pub fn read_u64(&mut self) -> Result<u64, AmmError> {
        let val = read_u64(self.data, self.offset)?;
        self.offset += 8;
        Ok(val)
    }

    #[inline]
    pub fn read_bool(&mut self) -> Result<bool, AmmError> {
        let val = read_bool(self.data, self.offset)?;
        self.offset += 1;
        Ok(val)
    }

    #[inline]
    pub fn read_bytes<const N: usize>(&mut self) -> Result<[u8; N], AmmError> {
        let val = read_bytes(self.data, self.offset)?;
        self.offset += N;
        Ok(val)
    }

    #[inline]
    pub fn read_direction(&mut self) -> Result<SwapDirection, AmmError> {
        let val = read_direction(self.data, self.offset)?;
        self.offset += 1;
        Ok(val)
    }

    /// Reject trailing bytes after the last expected field
    #[inline]
    pub fn finish(&self) -> Result<(), AmmError> {
        if self.remaining() != 0 {
            return Err(AmmError::InvalidInstruction);
        }
        Ok(())
    }
}
