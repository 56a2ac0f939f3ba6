use cosmwasm_std::{Addr, Deps, Order, StdResult};
use cw_storage_plus::Bound;

use crate::msg::{AllAccountsResponse, AllAllowancesResponse, AllowanceInfo, MintersResponse};
use crate::state::{ALLOWANCES, BALANCES, MINTERS};

// settings for pagination
const MAX_LIMIT: u32 = 30;
const DEFAULT_LIMIT: u32 = 10;

fn start_bound<'a>(start_after: Option<String>) -> Option<Bound<'a, &'a Addr>> {
    start_after.map(|s| Bound::ExclusiveRaw(s.into_bytes()))
}

pub fn query_all_allowances(
    deps: Deps,
    owner: String,
    start_after: Option<String>,
    limit: Option<u32>,
) -> StdResult<AllAllowancesResponse> {
    let owner_addr = deps.api.addr_validate(&owner)?;
    let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT) as usize;

    let allowances = ALLOWANCES
        .prefix(&owner_addr)
        .range(deps.storage, start_bound(start_after), None, Order::Ascending)
        .take(limit)
        .map(|item| {
            item.map(|(spender, allow)| AllowanceInfo {
                spender: spender.into(),
                allowance: allow.allowance,
                expires: allow.expires,
            })
        })
        .collect::<StdResult<_>>()?;

    Ok(AllAllowancesResponse { allowances })
}

pub fn query_all_accounts(
    deps: Deps,
    start_after: Option<String>,
    limit: Option<u32>,
) -> StdResult<AllAccountsResponse> {
    let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT) as usize;

    let accounts = BALANCES
        .keys(deps.storage, start_bound(start_after), None, Order::Ascending)
        .take(limit)
        .map(|item| item.map(Into::into))
        .collect::<StdResult<_>>()?;

    Ok(AllAccountsResponse { accounts })
}

pub fn query_minters(
    deps: Deps,
    start_after: Option<String>,
    limit: Option<u32>,
) -> StdResult<MintersResponse> {
    let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT) as usize;

    let minters = MINTERS
        .keys(deps.storage, start_bound(start_after), None, Order::Ascending)
        .take(limit)
        .collect::<StdResult<_>>()?;

    Ok(MintersResponse { minters })
}
