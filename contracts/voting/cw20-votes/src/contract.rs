#[cfg(not(feature = "library"))]
use cosmwasm_std::entry_point;
use cosmwasm_std::{
    to_json_binary, Addr, Binary, Deps, DepsMut, Empty, Env, Event, MessageInfo, Response,
    StdError, StdResult, Storage, Uint256,
};
use cw2::{get_contract_version, set_contract_version, ContractVersion};
use cw_utils::nonpayable;

use crate::allowances::{
    execute_approve, execute_burn_from, execute_decrease_allowance, execute_increase_allowance,
    execute_transfer_from, query_allowance,
};
use crate::enumerable::{query_all_accounts, query_all_allowances, query_minters};
use crate::msg::{
    BalanceResponse, DelegatesResponse, ExecuteMsg, InfoResponse, InstantiateMsg, MigrateMsg,
    PastTotalSupplyResponse, PastVotesResponse, QueryMsg, TokenInfoResponse, VotesResponse,
};
use crate::state::{
    TokenInfo, BALANCES, DELEGATES, MINTERS, TOKEN_INFO, TOTAL_SUPPLY, TOTAL_SUPPLY_KEY, VOTES,
};
use crate::votes::{checked_supply_increase, delegate, transfer_voting_units};
use crate::ContractError;

pub(crate) const CONTRACT_NAME: &str = "crates.io:cw20-votes";
pub(crate) const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

fn is_valid_name(name: &str) -> bool {
    let bytes = name.as_bytes();
    (3..=50).contains(&bytes.len())
}

fn is_valid_symbol(symbol: &str) -> bool {
    let bytes = symbol.as_bytes();
    (3..=12).contains(&bytes.len())
        && bytes
            .iter()
            .all(|byte| byte.is_ascii_alphabetic() || *byte == b'-')
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    if !is_valid_name(&msg.name) {
        return Err(ContractError::InvalidName {});
    }
    if !is_valid_symbol(&msg.symbol) {
        return Err(ContractError::InvalidSymbol {});
    }
    if msg.decimals > 18 {
        return Err(ContractError::InvalidDecimals {});
    }

    cw_ownable::initialize_owner(deps.storage, deps.api, Some(info.sender.as_str()))?;

    let minters = msg
        .minters
        .unwrap_or_else(|| vec![info.sender.to_string()]);
    for minter in minters {
        let minter = deps.api.addr_validate(&minter)?;
        MINTERS.save(deps.storage, &minter, &Empty {})?;
    }

    let mut addresses: Vec<&str> = msg
        .initial_balances
        .iter()
        .map(|balance| balance.address.as_str())
        .collect();
    addresses.sort_unstable();
    addresses.dedup();
    if addresses.len() != msg.initial_balances.len() {
        return Err(ContractError::DuplicateInitialBalanceAddresses {});
    }

    // Initial holders have not delegated yet, so these balances only enter
    // the total supply history.
    let mut total_supply = Uint256::zero();
    for balance in msg.initial_balances.iter() {
        let address = deps.api.addr_validate(&balance.address)?;
        BALANCES.save(deps.storage, &address, &balance.amount)?;
        total_supply = checked_supply_increase(total_supply, balance.amount)?;
    }
    if !total_supply.is_zero() {
        TOTAL_SUPPLY.push(deps.storage, TOTAL_SUPPLY_KEY, env.block.height, total_supply)?;
    }

    TOKEN_INFO.save(
        deps.storage,
        &TokenInfo {
            name: msg.name,
            symbol: msg.symbol,
            decimals: msg.decimals,
            total_supply,
        },
    )?;

    Ok(Response::new()
        .add_attribute("action", "instantiate")
        .add_attribute("owner", info.sender)
        .add_attribute("total_supply", total_supply))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    nonpayable(&info)?;

    match msg {
        ExecuteMsg::Transfer { recipient, amount } => {
            execute_transfer(deps, env, info, recipient, amount)
        }
        ExecuteMsg::Burn { amount } => execute_burn(deps, env, info, amount),
        ExecuteMsg::Mint { recipient, amount } => execute_mint(deps, env, info, recipient, amount),
        ExecuteMsg::Approve {
            spender,
            amount,
            expires,
        } => execute_approve(deps, env, info, spender, amount, expires),
        ExecuteMsg::IncreaseAllowance {
            spender,
            amount,
            expires,
        } => execute_increase_allowance(deps, env, info, spender, amount, expires),
        ExecuteMsg::DecreaseAllowance {
            spender,
            amount,
            expires,
        } => execute_decrease_allowance(deps, env, info, spender, amount, expires),
        ExecuteMsg::TransferFrom {
            owner,
            recipient,
            amount,
        } => execute_transfer_from(deps, env, info, owner, recipient, amount),
        ExecuteMsg::BurnFrom { owner, amount } => execute_burn_from(deps, env, info, owner, amount),
        ExecuteMsg::Delegate { delegatee } => execute_delegate(deps, env, info, Some(delegatee)),
        ExecuteMsg::Undelegate {} => execute_delegate(deps, env, info, None),
        ExecuteMsg::GrantMinter { address } => execute_grant_minter(deps, info, address),
        ExecuteMsg::RevokeMinter { address } => execute_revoke_minter(deps, info, address),
        ExecuteMsg::RenounceMinter {} => execute_renounce_minter(deps, info),
        ExecuteMsg::UpdateOwnership(action) => execute_update_owner(deps, env, info, action),
    }
}

/// Moves `amount` from `from` to `to`, carrying the voting power along.
pub(crate) fn transfer_balance(
    storage: &mut dyn Storage,
    height: u64,
    from: &Addr,
    to: &Addr,
    amount: Uint256,
) -> Result<Vec<Event>, ContractError> {
    BALANCES.update(storage, from, |balance| -> StdResult<_> {
        Ok(balance.unwrap_or_default().checked_sub(amount)?)
    })?;
    BALANCES.update(storage, to, |balance| -> StdResult<_> {
        Ok(balance.unwrap_or_default().checked_add(amount)?)
    })?;
    transfer_voting_units(storage, height, Some(from), Some(to), amount)
}

/// Destroys `amount` of `owner`'s tokens, lowering total supply and the
/// voting power of `owner`'s delegatee.
pub(crate) fn burn_balance(
    storage: &mut dyn Storage,
    height: u64,
    owner: &Addr,
    amount: Uint256,
) -> Result<Vec<Event>, ContractError> {
    BALANCES.update(storage, owner, |balance| -> StdResult<_> {
        Ok(balance.unwrap_or_default().checked_sub(amount)?)
    })?;
    TOKEN_INFO.update(storage, |mut info| -> StdResult<_> {
        info.total_supply = info.total_supply.checked_sub(amount)?;
        Ok(info)
    })?;
    transfer_voting_units(storage, height, Some(owner), None, amount)
}

pub fn execute_transfer(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    recipient: String,
    amount: Uint256,
) -> Result<Response, ContractError> {
    if amount.is_zero() {
        return Err(ContractError::InvalidZeroAmount {});
    }
    let rcpt_addr = deps.api.addr_validate(&recipient)?;

    let events = transfer_balance(
        deps.storage,
        env.block.height,
        &info.sender,
        &rcpt_addr,
        amount,
    )?;

    Ok(Response::new()
        .add_attribute("action", "transfer")
        .add_attribute("from", info.sender)
        .add_attribute("to", rcpt_addr)
        .add_attribute("amount", amount)
        .add_events(events))
}

pub fn execute_burn(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    amount: Uint256,
) -> Result<Response, ContractError> {
    if amount.is_zero() {
        return Err(ContractError::InvalidZeroAmount {});
    }

    let events = burn_balance(deps.storage, env.block.height, &info.sender, amount)?;

    Ok(Response::new()
        .add_attribute("action", "burn")
        .add_attribute("from", info.sender)
        .add_attribute("amount", amount)
        .add_events(events))
}

pub fn execute_mint(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    recipient: String,
    amount: Uint256,
) -> Result<Response, ContractError> {
    if amount.is_zero() {
        return Err(ContractError::InvalidZeroAmount {});
    }
    if !MINTERS.has(deps.storage, &info.sender) {
        return Err(ContractError::Unauthorized {});
    }

    let mut token_info = TOKEN_INFO.load(deps.storage)?;
    token_info.total_supply = checked_supply_increase(token_info.total_supply, amount)?;
    TOKEN_INFO.save(deps.storage, &token_info)?;

    let rcpt_addr = deps.api.addr_validate(&recipient)?;
    BALANCES.update(deps.storage, &rcpt_addr, |balance| -> StdResult<_> {
        Ok(balance.unwrap_or_default().checked_add(amount)?)
    })?;
    let events = transfer_voting_units(
        deps.storage,
        env.block.height,
        None,
        Some(&rcpt_addr),
        amount,
    )?;

    Ok(Response::new()
        .add_attribute("action", "mint")
        .add_attribute("to", rcpt_addr)
        .add_attribute("amount", amount)
        .add_events(events))
}

pub fn execute_delegate(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    delegatee: Option<String>,
) -> Result<Response, ContractError> {
    let delegatee = delegatee
        .map(|delegatee| deps.api.addr_validate(&delegatee))
        .transpose()?;

    let (previous, events) = delegate(
        deps.storage,
        env.block.height,
        &info.sender,
        delegatee.clone(),
    )?;

    Ok(Response::new()
        .add_attribute("action", "delegate")
        .add_attribute("delegator", info.sender)
        .add_attribute("from_delegate", display_delegate(previous))
        .add_attribute("to_delegate", display_delegate(delegatee))
        .add_events(events))
}

fn display_delegate(delegate: Option<Addr>) -> String {
    delegate.map(String::from).unwrap_or_else(|| "none".to_string())
}

pub fn execute_grant_minter(
    deps: DepsMut,
    info: MessageInfo,
    address: String,
) -> Result<Response, ContractError> {
    cw_ownable::assert_owner(deps.storage, &info.sender)?;

    let minter = deps.api.addr_validate(&address)?;
    MINTERS.save(deps.storage, &minter, &Empty {})?;

    Ok(Response::new()
        .add_attribute("action", "grant_minter")
        .add_attribute("minter", minter))
}

pub fn execute_revoke_minter(
    deps: DepsMut,
    info: MessageInfo,
    address: String,
) -> Result<Response, ContractError> {
    cw_ownable::assert_owner(deps.storage, &info.sender)?;

    let minter = deps.api.addr_validate(&address)?;
    MINTERS.remove(deps.storage, &minter);

    Ok(Response::new()
        .add_attribute("action", "revoke_minter")
        .add_attribute("minter", minter))
}

pub fn execute_renounce_minter(
    deps: DepsMut,
    info: MessageInfo,
) -> Result<Response, ContractError> {
    if !MINTERS.has(deps.storage, &info.sender) {
        return Err(ContractError::Unauthorized {});
    }
    MINTERS.remove(deps.storage, &info.sender);

    Ok(Response::new()
        .add_attribute("action", "renounce_minter")
        .add_attribute("minter", info.sender))
}

pub fn execute_update_owner(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    action: cw_ownable::Action,
) -> Result<Response, ContractError> {
    let ownership = cw_ownable::update_ownership(deps, &env.block, &info.sender, action)?;
    Ok(Response::new().add_attributes(ownership.into_attributes()))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::Balance { address } => to_json_binary(&query_balance(deps, address)?),
        QueryMsg::TokenInfo {} => to_json_binary(&query_token_info(deps)?),
        QueryMsg::Allowance { owner, spender } => {
            to_json_binary(&query_allowance(deps, owner, spender)?)
        }
        QueryMsg::AllAllowances {
            owner,
            start_after,
            limit,
        } => to_json_binary(&query_all_allowances(deps, owner, start_after, limit)?),
        QueryMsg::AllAccounts { start_after, limit } => {
            to_json_binary(&query_all_accounts(deps, start_after, limit)?)
        }
        QueryMsg::Delegates { address } => to_json_binary(&query_delegates(deps, address)?),
        QueryMsg::Votes { address } => to_json_binary(&query_votes(deps, address)?),
        QueryMsg::PastVotes { address, height } => {
            to_json_binary(&query_past_votes(deps, env, address, height)?)
        }
        QueryMsg::PastTotalSupply { height } => {
            to_json_binary(&query_past_total_supply(deps, env, height)?)
        }
        QueryMsg::NumCheckpoints { address } => {
            to_json_binary(&query_num_checkpoints(deps, address)?)
        }
        QueryMsg::Checkpoint { address, pos } => {
            to_json_binary(&query_checkpoint(deps, address, pos)?)
        }
        QueryMsg::Minters { start_after, limit } => {
            to_json_binary(&query_minters(deps, start_after, limit)?)
        }
        QueryMsg::Info {} => to_json_binary(&query_info(deps)?),
        QueryMsg::Ownership {} => to_json_binary(&cw_ownable::get_ownership(deps.storage)?),
    }
}

pub fn query_balance(deps: Deps, address: String) -> StdResult<BalanceResponse> {
    let address = deps.api.addr_validate(&address)?;
    let balance = BALANCES
        .may_load(deps.storage, &address)?
        .unwrap_or_default();
    Ok(BalanceResponse { balance })
}

pub fn query_token_info(deps: Deps) -> StdResult<TokenInfoResponse> {
    let info = TOKEN_INFO.load(deps.storage)?;
    Ok(TokenInfoResponse {
        name: info.name,
        symbol: info.symbol,
        decimals: info.decimals,
        total_supply: info.total_supply,
    })
}

pub fn query_delegates(deps: Deps, address: String) -> StdResult<DelegatesResponse> {
    let address = deps.api.addr_validate(&address)?;
    let delegatee = DELEGATES.may_load(deps.storage, &address)?;
    Ok(DelegatesResponse { delegatee })
}

pub fn query_votes(deps: Deps, address: String) -> StdResult<VotesResponse> {
    let address = deps.api.addr_validate(&address)?;
    let power = VOTES.latest(deps.storage, &address)?;
    Ok(VotesResponse { power })
}

pub fn query_past_votes(
    deps: Deps,
    env: Env,
    address: String,
    height: u64,
) -> StdResult<PastVotesResponse> {
    let address = deps.api.addr_validate(&address)?;
    let power = VOTES.past(deps.storage, &address, height, env.block.height)?;
    Ok(PastVotesResponse { power, height })
}

pub fn query_past_total_supply(
    deps: Deps,
    env: Env,
    height: u64,
) -> StdResult<PastTotalSupplyResponse> {
    let total = TOTAL_SUPPLY.past(deps.storage, TOTAL_SUPPLY_KEY, height, env.block.height)?;
    Ok(PastTotalSupplyResponse { total, height })
}

pub fn query_num_checkpoints(deps: Deps, address: String) -> StdResult<u32> {
    let address = deps.api.addr_validate(&address)?;
    VOTES.len(deps.storage, &address)
}

pub fn query_checkpoint(
    deps: Deps,
    address: String,
    pos: u32,
) -> StdResult<cw_checkpoints::Checkpoint> {
    let address = deps.api.addr_validate(&address)?;
    VOTES
        .at(deps.storage, &address, pos)?
        .ok_or_else(|| StdError::not_found("cw_checkpoints::Checkpoint"))
}

pub fn query_info(deps: Deps) -> StdResult<InfoResponse> {
    let info = get_contract_version(deps.storage)?;
    Ok(InfoResponse { info })
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn migrate(deps: DepsMut, _env: Env, _msg: MigrateMsg) -> Result<Response, ContractError> {
    let storage_version: ContractVersion = get_contract_version(deps.storage)?;

    // Only migrate if newer
    if storage_version.version.as_str() < CONTRACT_VERSION {
        set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;
    }

    Ok(Response::new().add_attribute("action", "migrate"))
}
