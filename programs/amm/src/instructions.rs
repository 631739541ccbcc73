//! Instruction wire format
//!
//! Every instruction is a one-byte tag followed by little-endian fields.
//! Trailing bytes are rejected.
//!
//! | tag | instruction | payload |
//! |-----|-------------|---------|
//! | 0 | Initialize | seed u64, fee_bps u16, has_authority u8, authority [32], bump u8, lp_bump u8 |
//! | 1 | Deposit | lp_amount u64, max_x u64, max_y u64 |
//! | 2 | Withdraw | lp_amount u64, min_x u64, min_y u64 |
//! | 3 | Swap | amount_in u64, direction u8, min_out u64 |
//! | 4 | Lock | - |
//! | 5 | Unlock | - |

use cpamm_common::{AmmError, InstructionReader, SwapDirection};
use pinocchio::pubkey::Pubkey;

/// Instruction discriminator
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmmTag {
    Initialize = 0,
    Deposit = 1,
    Withdraw = 2,
    Swap = 3,
    Lock = 4,
    Unlock = 5,
}

impl TryFrom<u8> for AmmTag {
    type Error = AmmError;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        match tag {
            0 => Ok(AmmTag::Initialize),
            1 => Ok(AmmTag::Deposit),
            2 => Ok(AmmTag::Withdraw),
            3 => Ok(AmmTag::Swap),
            4 => Ok(AmmTag::Lock),
            5 => Ok(AmmTag::Unlock),
            _ => Err(AmmError::InvalidInstruction),
        }
    }
}

/// Decoded instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmmInstruction {
    Initialize {
        seed: u64,
        fee_bps: u16,
        authority: Option<Pubkey>,
        bump: u8,
        lp_bump: u8,
    },
    Deposit {
        lp_amount: u64,
        max_x: u64,
        max_y: u64,
    },
    Withdraw {
        lp_amount: u64,
        min_x: u64,
        min_y: u64,
    },
    Swap {
        amount_in: u64,
        direction: SwapDirection,
        min_out: u64,
    },
    Lock,
    Unlock,
}

impl AmmInstruction {
    pub fn tag(&self) -> AmmTag {
        match self {
            AmmInstruction::Initialize { .. } => AmmTag::Initialize,
            AmmInstruction::Deposit { .. } => AmmTag::Deposit,
            AmmInstruction::Withdraw { .. } => AmmTag::Withdraw,
            AmmInstruction::Swap { .. } => AmmTag::Swap,
            AmmInstruction::Lock => AmmTag::Lock,
            AmmInstruction::Unlock => AmmTag::Unlock,
        }
    }

    pub fn unpack(data: &[u8]) -> Result<Self, AmmError> {
        let mut reader = InstructionReader::new(data);
        let ix = match AmmTag::try_from(reader.read_u8()?)? {
            AmmTag::Initialize => {
                let seed = reader.read_u64()?;
                let fee_bps = reader.read_u16()?;
                let has_authority = reader.read_bool()?;
                let authority = reader.read_bytes::<32>()?;
                let bump = reader.read_u8()?;
                let lp_bump = reader.read_u8()?;
                AmmInstruction::Initialize {
                    seed,
                    fee_bps,
                    authority: has_authority.then_some(authority),
                    bump,
                    lp_bump,
                }
            }
            AmmTag::Deposit => AmmInstruction::Deposit {
                lp_amount: reader.read_u64()?,
                max_x: reader.read_u64()?,
                max_y: reader.read_u64()?,
            },
            AmmTag::Withdraw => AmmInstruction::Withdraw {
                lp_amount: reader.read_u64()?,
                min_x: reader.read_u64()?,
                min_y: reader.read_u64()?,
            },
            AmmTag::Swap => AmmInstruction::Swap {
                amount_in: reader.read_u64()?,
                direction: reader.read_direction()?,
                min_out: reader.read_u64()?,
            },
            AmmTag::Lock => AmmInstruction::Lock,
            AmmTag::Unlock => AmmInstruction::Unlock,
        };
        reader.finish()?;
        Ok(ix)
    }

    /// Encoded length of this instruction
    pub fn packed_len(&self) -> usize {
        1 + match self {
            AmmInstruction::Initialize { .. } => 8 + 2 + 1 + 32 + 1 + 1,
            AmmInstruction::Deposit { .. } | AmmInstruction::Withdraw { .. } => 24,
            AmmInstruction::Swap { .. } => 17,
            AmmInstruction::Lock | AmmInstruction::Unlock => 0,
        }
    }

    /// Encode into `buf`, returning the number of bytes written
    pub fn pack_into(&self, buf: &mut [u8]) -> Result<usize, AmmError> {
        let len = self.packed_len();
        if buf.len() < len {
            return Err(AmmError::InvalidInstruction);
        }
        buf[0] = self.tag() as u8;
        let body = &mut buf[1..len];
        match *self {
            AmmInstruction::Initialize {
                seed,
                fee_bps,
                authority,
                bump,
                lp_bump,
            } => {
                body[0..8].copy_from_slice(&seed.to_le_bytes());
                body[8..10].copy_from_slice(&fee_bps.to_le_bytes());
                body[10] = authority.is_some() as u8;
                body[11..43].copy_from_slice(&authority.unwrap_or_default());
                body[43] = bump;
                body[44] = lp_bump;
            }
            AmmInstruction::Deposit {
                lp_amount,
                max_x: a,
                max_y: b,
            }
            | AmmInstruction::Withdraw {
                lp_amount,
                min_x: a,
                min_y: b,
            } => {
                body[0..8].copy_from_slice(&lp_amount.to_le_bytes());
                body[8..16].copy_from_slice(&a.to_le_bytes());
                body[16..24].copy_from_slice(&b.to_le_bytes());
            }
            AmmInstruction::Swap {
                amount_in,
                direction,
                min_out,
            } => {
                body[0..8].copy_from_slice(&amount_in.to_le_bytes());
                body[8] = direction as u8;
                body[9..17].copy_from_slice(&min_out.to_le_bytes());
            }
            AmmInstruction::Lock | AmmInstruction::Unlock => {}
        }
        Ok(len)
    }
}
