#[cfg(not(feature = "library"))]
use cosmwasm_std::entry_point;
use cosmwasm_std::{
    to_json_binary, Addr, Binary, Deps, DepsMut, Env, MessageInfo, Order, Response, StdError,
    StdResult, Uint256,
};
use cw2::{get_contract_version, set_contract_version, ContractVersion};
use cw20_votes::msg::{PastVotesResponse, QueryMsg as TokenQueryMsg, TokenInfoResponse};
use cw_storage_plus::Bound;
use cw_utils::nonpayable;

use crate::msg::{
    ExecuteMsg, InfoResponse, InstantiateMsg, MigrateMsg, ProposalListResponse, ProposalResponse,
    QueryMsg, VotingPowerResponse, VotingPowerSpentResponse, WinnerNameResponse,
    WinningProposalResponse,
};
use crate::state::{Config, Proposal, CONFIG, MAX_PROPOSAL_NAME_LENGTH, PROPOSALS, SPENT};
use crate::ContractError;

pub(crate) const CONTRACT_NAME: &str = "crates.io:cw-tokenized-ballot";
pub(crate) const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

// settings for pagination
const MAX_LIMIT: u32 = 30;
const DEFAULT_LIMIT: u32 = 10;

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    nonpayable(&info)?;
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    // The snapshot must already be final.
    if msg.target_height >= env.block.height {
        return Err(ContractError::InvalidTargetPoint {
            target_height: msg.target_height,
            current: env.block.height,
        });
    }
    if msg.proposals.is_empty() {
        return Err(ContractError::NoProposals {});
    }

    let token = deps.api.addr_validate(&msg.token)?;
    let _: TokenInfoResponse = deps
        .querier
        .query_wasm_smart(&token, &TokenQueryMsg::TokenInfo {})?;

    let proposal_count = u32::try_from(msg.proposals.len())
        .map_err(|_| StdError::generic_err("too many proposals"))?;
    for (index, name) in (0..proposal_count).zip(msg.proposals) {
        if name.is_empty() || name.len() > MAX_PROPOSAL_NAME_LENGTH {
            return Err(ContractError::InvalidProposalName { name });
        }
        PROPOSALS.save(
            deps.storage,
            index,
            &Proposal {
                name,
                vote_count: Uint256::zero(),
            },
        )?;
    }

    CONFIG.save(
        deps.storage,
        &Config {
            token: token.clone(),
            target_height: msg.target_height,
            proposal_count,
        },
    )?;

    Ok(Response::new()
        .add_attribute("action", "instantiate")
        .add_attribute("token", token)
        .add_attribute("target_height", msg.target_height.to_string())
        .add_attribute("proposal_count", proposal_count.to_string()))
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
        ExecuteMsg::Vote { proposal, amount } => execute_vote(deps, env, info, proposal, amount),
    }
}

pub fn execute_vote(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    proposal: u32,
    amount: Uint256,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    if proposal >= config.proposal_count {
        return Err(ContractError::InvalidProposal {
            index: proposal,
            count: config.proposal_count,
        });
    }

    let (remaining, spent) = remaining_power(deps.as_ref(), &config, &info.sender)?;
    if amount > remaining {
        return Err(ContractError::InsufficientVotingPower {
            requested: amount,
            remaining,
        });
    }
    if amount.is_zero() {
        return Err(ContractError::ZeroAmount {});
    }

    SPENT.save(
        deps.storage,
        &info.sender,
        &spent.checked_add(amount).map_err(StdError::overflow)?,
    )?;
    let prop = PROPOSALS.update(deps.storage, proposal, |prop| -> StdResult<_> {
        let mut prop = prop.ok_or_else(|| StdError::not_found("proposal"))?;
        prop.vote_count = prop.vote_count.checked_add(amount)?;
        Ok(prop)
    })?;

    Ok(Response::new()
        .add_attribute("action", "vote")
        .add_attribute("voter", info.sender)
        .add_attribute("proposal", proposal.to_string())
        .add_attribute("name", prop.name)
        .add_attribute("amount", amount)
        .add_attribute("vote_count", prop.vote_count))
}

/// Returns the voting power `voter` can still spend and how much of its
/// snapshot power has been spent already.
fn remaining_power(deps: Deps, config: &Config, voter: &Addr) -> StdResult<(Uint256, Uint256)> {
    let snapshot: PastVotesResponse = deps.querier.query_wasm_smart(
        &config.token,
        &TokenQueryMsg::PastVotes {
            address: voter.to_string(),
            height: config.target_height,
        },
    )?;
    let spent = SPENT.may_load(deps.storage, voter)?.unwrap_or_default();
    // Votes never spend more than the snapshot.
    let remaining = snapshot.power.checked_sub(spent)?;
    Ok((remaining, spent))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::VotingPower { address } => to_json_binary(&query_voting_power(deps, address)?),
        QueryMsg::VotingPowerSpent { address } => {
            to_json_binary(&query_voting_power_spent(deps, address)?)
        }
        QueryMsg::WinningProposal {} => to_json_binary(&query_winning_proposal(deps)?),
        QueryMsg::WinnerName {} => to_json_binary(&query_winner_name(deps)?),
        QueryMsg::Proposal { index } => to_json_binary(&query_proposal(deps, index)?),
        QueryMsg::ListProposals { start_after, limit } => {
            to_json_binary(&query_list_proposals(deps, start_after, limit)?)
        }
        QueryMsg::Config {} => to_json_binary(&CONFIG.load(deps.storage)?),
        QueryMsg::Info {} => to_json_binary(&query_info(deps)?),
    }
}

pub fn query_voting_power(deps: Deps, address: String) -> StdResult<VotingPowerResponse> {
    let config = CONFIG.load(deps.storage)?;
    let voter = deps.api.addr_validate(&address)?;
    let (power, _) = remaining_power(deps, &config, &voter)?;
    Ok(VotingPowerResponse { power })
}

pub fn query_voting_power_spent(
    deps: Deps,
    address: String,
) -> StdResult<VotingPowerSpentResponse> {
    let voter = deps.api.addr_validate(&address)?;
    let spent = SPENT.may_load(deps.storage, &voter)?.unwrap_or_default();
    Ok(VotingPowerSpentResponse { spent })
}

/// Index of the first proposal holding the highest vote count.
fn winning_proposal(deps: Deps) -> StdResult<(u32, Proposal)> {
    let mut winner: Option<(u32, Proposal)> = None;
    for item in PROPOSALS.range(deps.storage, None, None, Order::Ascending) {
        let (index, prop) = item?;
        match &winner {
            Some((_, best)) if prop.vote_count <= best.vote_count => {}
            _ => winner = Some((index, prop)),
        }
    }
    winner.ok_or_else(|| StdError::not_found("proposal"))
}

pub fn query_winning_proposal(deps: Deps) -> StdResult<WinningProposalResponse> {
    let (index, _) = winning_proposal(deps)?;
    Ok(WinningProposalResponse { index })
}

pub fn query_winner_name(deps: Deps) -> StdResult<WinnerNameResponse> {
    let (_, prop) = winning_proposal(deps)?;
    Ok(WinnerNameResponse { name: prop.name })
}

pub fn query_proposal(deps: Deps, index: u32) -> StdResult<ProposalResponse> {
    let prop = PROPOSALS.load(deps.storage, index)?;
    Ok(ProposalResponse {
        index,
        name: prop.name,
        vote_count: prop.vote_count,
    })
}

pub fn query_list_proposals(
    deps: Deps,
    start_after: Option<u32>,
    limit: Option<u32>,
) -> StdResult<ProposalListResponse> {
    let min = start_after.map(Bound::exclusive);
    let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT) as usize;
    let proposals = PROPOSALS
        .range(deps.storage, min, None, Order::Ascending)
        .take(limit)
        .map(|item| {
            item.map(|(index, prop)| ProposalResponse {
                index,
                name: prop.name,
                vote_count: prop.vote_count,
            })
        })
        .collect::<StdResult<_>>()?;

    Ok(ProposalListResponse { proposals })
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
