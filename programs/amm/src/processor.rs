//! Instruction processing with account validation
//!
//! Accounts are loaded and checked here; all pool math goes through
//! [`crate::engine`]. A handler only writes account data after the engine
//! has returned a transition, so a failed call leaves every account as it was.

use crate::engine::{self, InitializeParams};
use crate::guard::VerifiedCaller;
use crate::instructions::AmmInstruction;
use crate::state::{LpPosition, PoolState};
use cpamm_common::{
    borrow_account_data_mut, is_zeroed, validate_owner, validate_writable, AmmError,
    SwapDirection,
};
use pinocchio::{account_info::AccountInfo, msg, pubkey::Pubkey, ProgramResult};
use pinocchio_log::log;

pub fn process_instruction(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    instruction_data: &[u8],
) -> ProgramResult {
    let instruction = match AmmInstruction::unpack(instruction_data) {
        Ok(ix) => ix,
        Err(e) => {
            msg!("Error: Invalid instruction data");
            return Err(e.into());
        }
    };

    match instruction {
        AmmInstruction::Initialize {
            seed,
            fee_bps,
            authority,
            bump,
            lp_bump,
        } => {
            msg!("Instruction: Initialize");
            process_initialize(program_id, accounts, seed, fee_bps, authority, bump, lp_bump)
        }
        AmmInstruction::Deposit {
            lp_amount,
            max_x,
            max_y,
        } => {
            msg!("Instruction: Deposit");
            process_deposit(program_id, accounts, lp_amount, max_x, max_y)
        }
        AmmInstruction::Withdraw {
            lp_amount,
            min_x,
            min_y,
        } => {
            msg!("Instruction: Withdraw");
            process_withdraw(program_id, accounts, lp_amount, min_x, min_y)
        }
        AmmInstruction::Swap {
            amount_in,
            direction,
            min_out,
        } => {
            msg!("Instruction: Swap");
            process_swap(program_id, accounts, amount_in, direction, min_out)
        }
        AmmInstruction::Lock => {
            msg!("Instruction: Lock");
            process_set_lock(program_id, accounts, true)
        }
        AmmInstruction::Unlock => {
            msg!("Instruction: Unlock");
            process_set_lock(program_id, accounts, false)
        }
    }
}

/// Pool account: owned by this program, writable, carrying a valid PoolState
fn load_pool<'a>(program_id: &Pubkey, account: &'a AccountInfo) -> Result<&'a mut PoolState, AmmError> {
    validate_owner(account, program_id)?;
    validate_writable(account)?;
    // SAFETY: PoolState is repr(C) plain data; no other borrow of this account is live
    let pool = unsafe { borrow_account_data_mut::<PoolState>(account)? };
    if !pool.validate() {
        msg!("Error: Pool account is not initialized");
        return Err(AmmError::InvalidAccount);
    }
    Ok(pool)
}

/// LP position account for (`pool`, `owner`)
///
/// The flag is true for an all-zero account of exactly `LpPosition::LEN`
/// bytes, which a deposit may turn into a new position. Any other account
/// must already be this owner's position in this pool.
fn load_position<'a>(
    program_id: &Pubkey,
    account: &'a AccountInfo,
    pool: &Pubkey,
    owner: &Pubkey,
) -> Result<(&'a mut LpPosition, bool), AmmError> {
    if account.key() == pool {
        return Err(AmmError::InvalidAccount);
    }
    validate_owner(account, program_id)?;
    validate_writable(account)?;
    if account.data_len() != LpPosition::LEN {
        msg!("Error: Account is not an LP position");
        return Err(AmmError::InvalidAccount);
    }

    let fresh = is_zeroed(account)?;
    // SAFETY: LpPosition is repr(C) plain data and distinct from the pool account
    let position = unsafe { borrow_account_data_mut::<LpPosition>(account)? };
    if fresh {
        return Ok((position, true));
    }

    if !position.is_initialized() {
        msg!("Error: Account is not an LP position");
        return Err(AmmError::InvalidAccount);
    }
    if &position.pool != pool || &position.owner != owner {
        msg!("Error: LP position belongs to another pool or owner");
        return Err(AmmError::InvalidAccount);
    }
    Ok((position, false))
}

/// Create a pool
///
/// Expected accounts:
/// 0. `[writable]` Pool account (program owned, zeroed, >= PoolState::LEN)
/// 1. `[signer]` Payer
/// 2. `[]` Mint X
/// 3. `[]` Mint Y
fn process_initialize(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    seed: u64,
    fee_bps: u16,
    authority: Option<Pubkey>,
    bump: u8,
    lp_bump: u8,
) -> ProgramResult {
    let [pool_account, payer, mint_x, mint_y, ..] = accounts else {
        msg!("Error: Initialize requires 4 accounts");
        return Err(AmmError::InvalidAccount.into());
    };

    VerifiedCaller::from_signer(payer)?;
    validate_owner(pool_account, program_id)?;
    validate_writable(pool_account)?;

    let fresh = is_zeroed(pool_account)?;
    // SAFETY: PoolState is repr(C) plain data; no other borrow of this account is live
    let pool = unsafe { borrow_account_data_mut::<PoolState>(pool_account)? };
    if !fresh {
        if pool.validate() {
            msg!("Error: Pool account already initialized");
            return Err(AmmError::PoolAlreadyExists.into());
        }
        msg!("Error: Pool account is not empty");
        return Err(AmmError::InvalidAccount.into());
    }

    *pool = engine::initialize(&InitializeParams {
        seed,
        fee_bps,
        authority,
        mint_x: *mint_x.key(),
        mint_y: *mint_y.key(),
        bump,
        lp_bump,
    })?;

    log!("Pool initialized: seed {} fee_bps {}", seed, fee_bps);
    Ok(())
}

/// Add liquidity
///
/// Expected accounts:
/// 0. `[writable]` Pool account
/// 1. `[signer]` Depositor
/// 2. `[writable]` Depositor's LP position (created if all zero, `LpPosition::LEN` bytes)
fn process_deposit(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    lp_amount: u64,
    max_x: u64,
    max_y: u64,
) -> ProgramResult {
    let [pool_account, depositor, position_account, ..] = accounts else {
        msg!("Error: Deposit requires 3 accounts");
        return Err(AmmError::InvalidAccount.into());
    };

    let caller = VerifiedCaller::from_signer(depositor)?;
    let pool = load_pool(program_id, pool_account)?;
    let (position, fresh) =
        load_position(program_id, position_account, pool_account.key(), caller.key())?;

    let transition = engine::deposit(pool, lp_amount, max_x, max_y)?;
    let mut updated = if fresh {
        LpPosition::new(*pool_account.key(), *caller.key())
    } else {
        *position
    };
    updated.credit(transition.delta.lp_minted)?;

    *position = updated;
    *pool = transition.next;

    log!(
        "Deposit: x {} y {} lp {}",
        transition.delta.x_in,
        transition.delta.y_in,
        transition.delta.lp_minted
    );
    Ok(())
}

/// Remove liquidity
///
/// Expected accounts:
/// 0. `[writable]` Pool account
/// 1. `[signer]` LP holder
/// 2. `[writable]` Holder's LP position
fn process_withdraw(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    lp_amount: u64,
    min_x: u64,
    min_y: u64,
) -> ProgramResult {
    let [pool_account, holder, position_account, ..] = accounts else {
        msg!("Error: Withdraw requires 3 accounts");
        return Err(AmmError::InvalidAccount.into());
    };

    let caller = VerifiedCaller::from_signer(holder)?;
    let pool = load_pool(program_id, pool_account)?;
    let (position, fresh) =
        load_position(program_id, position_account, pool_account.key(), caller.key())?;
    if fresh {
        msg!("Error: LP position does not exist");
        return Err(AmmError::InvalidAccount.into());
    }

    let transition = engine::withdraw(pool, lp_amount, min_x, min_y, position.balance)?;
    let mut updated = *position;
    updated.debit(transition.delta.lp_burned)?;

    *position = updated;
    *pool = transition.next;

    log!(
        "Withdraw: x {} y {} lp {}",
        transition.delta.x_out,
        transition.delta.y_out,
        transition.delta.lp_burned
    );
    Ok(())
}

/// Swap one asset for the other
///
/// Expected accounts:
/// 0. `[writable]` Pool account
/// 1. `[signer]` Trader
fn process_swap(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    amount_in: u64,
    direction: SwapDirection,
    min_out: u64,
) -> ProgramResult {
    let [pool_account, trader, ..] = accounts else {
        msg!("Error: Swap requires 2 accounts");
        return Err(AmmError::InvalidAccount.into());
    };

    VerifiedCaller::from_signer(trader)?;
    let pool = load_pool(program_id, pool_account)?;

    let transition = engine::swap(pool, amount_in, direction, min_out)?;
    *pool = transition.next;

    let (paid, received) = if direction.is_x_in() {
        (transition.delta.x_in, transition.delta.y_out)
    } else {
        (transition.delta.y_in, transition.delta.x_out)
    };
    log!(
        "Swap: direction {} in {} out {}",
        direction as u8,
        paid,
        received
    );
    Ok(())
}

/// Lock or unlock the pool
///
/// Expected accounts:
/// 0. `[writable]` Pool account
/// 1. `[signer]` Pool authority
fn process_set_lock(program_id: &Pubkey, accounts: &[AccountInfo], locked: bool) -> ProgramResult {
    let [pool_account, authority, ..] = accounts else {
        msg!("Error: Lock/Unlock requires 2 accounts");
        return Err(AmmError::InvalidAccount.into());
    };

    let caller = VerifiedCaller::from_signer(authority)?;
    let pool = load_pool(program_id, pool_account)?;

    let transition = if locked {
        engine::lock(pool, &caller)?
    } else {
        engine::unlock(pool, &caller)?
    };
    *pool = transition.next;

    log!("Pool lock state: {}", locked as u8);
    Ok(())
}
