//! Voting power bookkeeping.
//!
//! Balances only count as voting power once their holder has delegated
//! (possibly to themself). Every balance change moves voting power between
//! the delegatees of the accounts involved, and mints and burns move the
//! total supply, all checkpointed at the current block height.

use cosmwasm_std::{Addr, Event, StdResult, Storage, Uint256};
use cw_checkpoints::MAX_CHECKPOINT_VALUE;

use crate::state::{BALANCES, DELEGATES, TOTAL_SUPPLY, TOTAL_SUPPLY_KEY, VOTES};
use crate::ContractError;

/// Returns `total + amount`, failing if the result would not fit in a
/// checkpoint.
pub fn checked_supply_increase(total: Uint256, amount: Uint256) -> Result<Uint256, ContractError> {
    total
        .checked_add(amount)
        .ok()
        .filter(|new_total| *new_total <= MAX_CHECKPOINT_VALUE)
        .ok_or(ContractError::SupplyOverflow { amount })
}

/// Records that `amount` tokens moved from `from` to `to`. `None` as the
/// source is a mint, `None` as the destination is a burn.
pub fn transfer_voting_units(
    storage: &mut dyn Storage,
    height: u64,
    from: Option<&Addr>,
    to: Option<&Addr>,
    amount: Uint256,
) -> Result<Vec<Event>, ContractError> {
    if from.is_none() {
        TOTAL_SUPPLY.update(storage, TOTAL_SUPPLY_KEY, height, |total| -> StdResult<_> {
            Ok(total.checked_add(amount)?)
        })?;
    }
    if to.is_none() {
        TOTAL_SUPPLY.update(storage, TOTAL_SUPPLY_KEY, height, |total| -> StdResult<_> {
            Ok(total.checked_sub(amount)?)
        })?;
    }

    let src = match from {
        Some(addr) => DELEGATES.may_load(storage, addr)?,
        None => None,
    };
    let dst = match to {
        Some(addr) => DELEGATES.may_load(storage, addr)?,
        None => None,
    };

    move_voting_power(storage, height, src.as_ref(), dst.as_ref(), amount)
}

/// Changes the delegatee of `delegator` and moves its whole balance's worth
/// of voting power along. Returns the previous delegatee.
pub fn delegate(
    storage: &mut dyn Storage,
    height: u64,
    delegator: &Addr,
    delegatee: Option<Addr>,
) -> Result<(Option<Addr>, Vec<Event>), ContractError> {
    let previous = DELEGATES.may_load(storage, delegator)?;
    match &delegatee {
        Some(delegatee) => DELEGATES.save(storage, delegator, delegatee)?,
        None => DELEGATES.remove(storage, delegator),
    }

    let balance = BALANCES.may_load(storage, delegator)?.unwrap_or_default();
    let events = move_voting_power(
        storage,
        height,
        previous.as_ref(),
        delegatee.as_ref(),
        balance,
    )?;

    Ok((previous, events))
}

fn move_voting_power(
    storage: &mut dyn Storage,
    height: u64,
    src: Option<&Addr>,
    dst: Option<&Addr>,
    amount: Uint256,
) -> Result<Vec<Event>, ContractError> {
    if src == dst || amount.is_zero() {
        return Ok(vec![]);
    }

    let mut events = Vec::with_capacity(2);
    if let Some(src) = src {
        let (previous, new) = VOTES.update(storage, src, height, |votes| -> StdResult<_> {
            Ok(votes.checked_sub(amount)?)
        })?;
        events.push(votes_changed(src, previous, new));
    }
    if let Some(dst) = dst {
        let (previous, new) = VOTES.update(storage, dst, height, |votes| -> StdResult<_> {
            Ok(votes.checked_add(amount)?)
        })?;
        events.push(votes_changed(dst, previous, new));
    }
    Ok(events)
}

fn votes_changed(delegate: &Addr, previous: Uint256, new: Uint256) -> Event {
    Event::new("delegate_votes_changed")
        .add_attribute("delegate", delegate)
        .add_attribute("previous_votes", previous)
        .add_attribute("new_votes", new)
}
