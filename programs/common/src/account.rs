//! Account validation and zero-copy access helpers

use crate::error::AmmError;
use pinocchio::{account_info::AccountInfo, pubkey::Pubkey};

/// Account must be owned by `program_id`
#[inline]
pub fn validate_owner(account: &AccountInfo, program_id: &Pubkey) -> Result<(), AmmError> {
    if !account.is_owned_by(program_id) {
        return Err(AmmError::InvalidAccount);
    }
    Ok(())
}

#[inline]
pub fn validate_writable(account: &AccountInfo) -> Result<(), AmmError> {
    if !account.is_writable() {
        return Err(AmmError::InvalidAccount);
    }
    Ok(())
}

/// Every byte of the account data is zero (a fresh, never-written account)
pub fn is_zeroed(account: &AccountInfo) -> Result<bool, AmmError> {
    let data = account
        .try_borrow_data()
        .map_err(|_| AmmError::InvalidAccount)?;
    Ok(data.iter().all(|b| *b == 0))
}

/// Account data must be large enough and aligned for `T`
#[inline]
fn check_layout<T>(data: &[u8]) -> Result<(), AmmError> {
    if data.len() < core::mem::size_of::<T>() {
        return Err(AmmError::InvalidAccount);
    }
    if (data.as_ptr() as usize) % core::mem::align_of::<T>() != 0 {
        return Err(AmmError::InvalidAccount);
    }
    Ok(())
}

/// Reinterpret account data as `&mut T`
///
/// # Safety
///
/// `T` must be `#[repr(C)]`, valid for any bit pattern, and the caller must
/// not hold another borrow of the same account data.
#[inline]
pub unsafe fn borrow_account_data_mut<T>(account: &AccountInfo) -> Result<&mut T, AmmError> {
    let data = account.borrow_mut_data_unchecked();
    check_layout::<T>(data)?;
    Ok(&mut *(data.as_mut_ptr() as *mut T))
}
