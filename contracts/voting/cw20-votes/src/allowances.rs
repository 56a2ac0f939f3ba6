use cosmwasm_std::{
    Addr, BlockInfo, Deps, DepsMut, Env, MessageInfo, Response, StdError, StdResult, Storage,
    Uint256,
};
use cw_utils::Expiration;

use crate::contract::{burn_balance, transfer_balance};
use crate::msg::AllowanceResponse;
use crate::state::{Allowance, ALLOWANCES};
use crate::ContractError;

fn validated_spender(
    deps: &DepsMut,
    info: &MessageInfo,
    spender: &str,
) -> Result<Addr, ContractError> {
    let spender_addr = deps.api.addr_validate(spender)?;
    if spender_addr == info.sender {
        return Err(ContractError::CannotSetOwnAccount {});
    }
    Ok(spender_addr)
}

fn validated_expiration(
    block: &BlockInfo,
    expires: Option<Expiration>,
) -> Result<Option<Expiration>, ContractError> {
    match expires {
        Some(exp) if exp.is_expired(block) => Err(ContractError::InvalidExpiration {}),
        expires => Ok(expires),
    }
}

pub fn execute_approve(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    spender: String,
    amount: Uint256,
    expires: Option<Expiration>,
) -> Result<Response, ContractError> {
    let spender_addr = validated_spender(&deps, &info, &spender)?;
    let expires = validated_expiration(&env.block, expires)?;

    let key = (&info.sender, &spender_addr);
    if amount.is_zero() {
        ALLOWANCES.remove(deps.storage, key);
    } else {
        ALLOWANCES.save(
            deps.storage,
            key,
            &Allowance {
                allowance: amount,
                expires: expires.unwrap_or_default(),
            },
        )?;
    }

    Ok(Response::new()
        .add_attribute("action", "approve")
        .add_attribute("owner", info.sender)
        .add_attribute("spender", spender)
        .add_attribute("amount", amount))
}

pub fn execute_increase_allowance(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    spender: String,
    amount: Uint256,
    expires: Option<Expiration>,
) -> Result<Response, ContractError> {
    let spender_addr = validated_spender(&deps, &info, &spender)?;
    let expires = validated_expiration(&env.block, expires)?;

    let update_fn = |allow: Option<Allowance>| -> Result<_, ContractError> {
        let mut val = allow.unwrap_or_default();
        if let Some(exp) = expires {
            val.expires = exp;
        }
        val.allowance = val.allowance.checked_add(amount).map_err(StdError::from)?;
        Ok(val)
    };
    ALLOWANCES.update(deps.storage, (&info.sender, &spender_addr), update_fn)?;

    Ok(Response::new()
        .add_attribute("action", "increase_allowance")
        .add_attribute("owner", info.sender)
        .add_attribute("spender", spender)
        .add_attribute("amount", amount))
}

pub fn execute_decrease_allowance(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    spender: String,
    amount: Uint256,
    expires: Option<Expiration>,
) -> Result<Response, ContractError> {
    let spender_addr = validated_spender(&deps, &info, &spender)?;
    let expires = validated_expiration(&env.block, expires)?;

    let key = (&info.sender, &spender_addr);
    // load value and delete if it hits 0, or update otherwise
    let mut allowance = ALLOWANCES.load(deps.storage, key)?;
    if amount < allowance.allowance {
        allowance.allowance = allowance
            .allowance
            .checked_sub(amount)
            .map_err(StdError::overflow)?;
        if let Some(exp) = expires {
            allowance.expires = exp;
        }
        ALLOWANCES.save(deps.storage, key, &allowance)?;
    } else {
        ALLOWANCES.remove(deps.storage, key);
    }

    Ok(Response::new()
        .add_attribute("action", "decrease_allowance")
        .add_attribute("owner", info.sender)
        .add_attribute("spender", spender)
        .add_attribute("amount", amount))
}

/// Spends `amount` of the allowance `owner` gave `spender`.
pub fn deduct_allowance(
    storage: &mut dyn Storage,
    owner: &Addr,
    spender: &Addr,
    block: &BlockInfo,
    amount: Uint256,
) -> Result<Allowance, ContractError> {
    let update_fn = |current: Option<Allowance>| -> Result<_, ContractError> {
        match current {
            Some(mut a) => {
                if a.expires.is_expired(block) {
                    Err(ContractError::Expired {})
                } else {
                    a.allowance = a
                        .allowance
                        .checked_sub(amount)
                        .map_err(StdError::overflow)?;
                    Ok(a)
                }
            }
            None => Err(ContractError::NoAllowance {}),
        }
    };
    ALLOWANCES.update(storage, (owner, spender), update_fn)
}

pub fn execute_transfer_from(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    owner: String,
    recipient: String,
    amount: Uint256,
) -> Result<Response, ContractError> {
    if amount.is_zero() {
        return Err(ContractError::InvalidZeroAmount {});
    }
    let rcpt_addr = deps.api.addr_validate(&recipient)?;
    let owner_addr = deps.api.addr_validate(&owner)?;

    deduct_allowance(deps.storage, &owner_addr, &info.sender, &env.block, amount)?;
    let events = transfer_balance(
        deps.storage,
        env.block.height,
        &owner_addr,
        &rcpt_addr,
        amount,
    )?;

    Ok(Response::new()
        .add_attribute("action", "transfer_from")
        .add_attribute("from", owner)
        .add_attribute("to", recipient)
        .add_attribute("by", info.sender)
        .add_attribute("amount", amount)
        .add_events(events))
}

pub fn execute_burn_from(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    owner: String,
    amount: Uint256,
) -> Result<Response, ContractError> {
    if amount.is_zero() {
        return Err(ContractError::InvalidZeroAmount {});
    }
    let owner_addr = deps.api.addr_validate(&owner)?;

    deduct_allowance(deps.storage, &owner_addr, &info.sender, &env.block, amount)?;
    let events = burn_balance(deps.storage, env.block.height, &owner_addr, amount)?;

    Ok(Response::new()
        .add_attribute("action", "burn_from")
        .add_attribute("from", owner)
        .add_attribute("by", info.sender)
        .add_attribute("amount", amount)
        .add_events(events))
}

pub fn query_allowance(deps: Deps, owner: String, spender: String) -> StdResult<AllowanceResponse> {
    let owner_addr = deps.api.addr_validate(&owner)?;
    let spender_addr = deps.api.addr_validate(&spender)?;
    let allowance = ALLOWANCES
        .may_load(deps.storage, (&owner_addr, &spender_addr))?
        .unwrap_or_default();
    Ok(AllowanceResponse {
        allowance: allowance.allowance,
        expires: allowance.expires,
    })
}

#[cfg(test)]
mod tests {
    use cosmwasm_std::testing::{mock_dependencies, mock_env, mock_info};
    use cosmwasm_std::{attr, coins, StdError};
    use cw_utils::PaymentError;

    use crate::contract::{execute, instantiate, query_balance, query_token_info, query_votes};
    use crate::msg::{ExecuteMsg, InitialBalance, InstantiateMsg, TokenInfoResponse};

    use super::*;

    fn get_balance<T: Into<String>>(deps: Deps, address: T) -> Uint256 {
        query_balance(deps, address.into()).unwrap().balance
    }

    fn get_votes<T: Into<String>>(deps: Deps, address: T) -> Uint256 {
        query_votes(deps, address.into()).unwrap().power
    }

    // this will set up the instantiation for other tests
    fn do_instantiate<T: Into<String>>(
        mut deps: DepsMut,
        addr: T,
        amount: Uint256,
    ) -> TokenInfoResponse {
        let instantiate_msg = InstantiateMsg {
            name: "Auto Gen".to_string(),
            symbol: "AUTO".to_string(),
            decimals: 3,
            initial_balances: vec![InitialBalance {
                address: addr.into(),
                amount,
            }],
            minters: None,
        };
        let info = mock_info("creator", &[]);
        let env = mock_env();
        instantiate(deps.branch(), env, info, instantiate_msg).unwrap();
        query_token_info(deps.as_ref()).unwrap()
    }

    #[test]
    fn increase_decrease_allowances() {
        let mut deps = mock_dependencies();
        let owner = String::from("addr0001");
        let spender = String::from("addr0002");
        let info = mock_info(owner.as_ref(), &[]);
        let env = mock_env();
        do_instantiate(deps.as_mut(), owner.clone(), Uint256::from(12340000u128));

        // no allowance to start
        let allowance = query_allowance(deps.as_ref(), owner.clone(), spender.clone()).unwrap();
        assert_eq!(allowance, AllowanceResponse::default());

        // set allowance with height expiration
        let allow1 = Uint256::from(7777u128);
        let expires = Expiration::AtHeight(123_456);
        let msg = ExecuteMsg::IncreaseAllowance {
            spender: spender.clone(),
            amount: allow1,
            expires: Some(expires),
        };
        execute(deps.as_mut(), env.clone(), info.clone(), msg).unwrap();

        let allowance = query_allowance(deps.as_ref(), owner.clone(), spender.clone()).unwrap();
        assert_eq!(
            allowance,
            AllowanceResponse {
                allowance: allow1,
                expires
            }
        );

        // decrease it a bit with no expire set - stays the same
        let lower = Uint256::from(4444u128);
        let allow2 = allow1.checked_sub(lower).unwrap();
        let msg = ExecuteMsg::DecreaseAllowance {
            spender: spender.clone(),
            amount: lower,
            expires: None,
        };
        execute(deps.as_mut(), env.clone(), info.clone(), msg).unwrap();
        let allowance = query_allowance(deps.as_ref(), owner.clone(), spender.clone()).unwrap();
        assert_eq!(
            allowance,
            AllowanceResponse {
                allowance: allow2,
                expires
            }
        );

        // increase it some more and override the expires
        let raise = Uint256::from(87654u128);
        let allow3 = allow2 + raise;
        let new_expire = Expiration::AtTime(env.block.time.plus_seconds(8888));
        let msg = ExecuteMsg::IncreaseAllowance {
            spender: spender.clone(),
            amount: raise,
            expires: Some(new_expire),
        };
        execute(deps.as_mut(), env.clone(), info.clone(), msg).unwrap();
        let allowance = query_allowance(deps.as_ref(), owner.clone(), spender.clone()).unwrap();
        assert_eq!(
            allowance,
            AllowanceResponse {
                allowance: allow3,
                expires: new_expire
            }
        );

        // decrease it below 0
        let msg = ExecuteMsg::DecreaseAllowance {
            spender: spender.clone(),
            amount: Uint256::from(99988647623876347u128),
            expires: None,
        };
        execute(deps.as_mut(), env, info, msg).unwrap();
        let allowance = query_allowance(deps.as_ref(), owner, spender).unwrap();
        assert_eq!(allowance, AllowanceResponse::default());
    }

    #[test]
    fn approve_replaces_and_clears_allowance() {
        let mut deps = mock_dependencies();
        let owner = String::from("addr0001");
        let spender = String::from("addr0002");
        let info = mock_info(owner.as_ref(), &[]);
        let env = mock_env();
        do_instantiate(deps.as_mut(), owner.clone(), Uint256::from(1000u128));

        let msg = ExecuteMsg::IncreaseAllowance {
            spender: spender.clone(),
            amount: Uint256::from(300u128),
            expires: None,
        };
        execute(deps.as_mut(), env.clone(), info.clone(), msg).unwrap();

        // approve sets the amount rather than adding to it
        let msg = ExecuteMsg::Approve {
            spender: spender.clone(),
            amount: Uint256::from(50u128),
            expires: None,
        };
        let res = execute(deps.as_mut(), env.clone(), info.clone(), msg).unwrap();
        assert_eq!(res.attributes[0], attr("action", "approve"));
        let allowance = query_allowance(deps.as_ref(), owner.clone(), spender.clone()).unwrap();
        assert_eq!(allowance.allowance, Uint256::from(50u128));
        assert_eq!(allowance.expires, Expiration::Never {});

        let msg = ExecuteMsg::Approve {
            spender: spender.clone(),
            amount: Uint256::zero(),
            expires: None,
        };
        execute(deps.as_mut(), env, info, msg).unwrap();
        let allowance = query_allowance(deps.as_ref(), owner, spender).unwrap();
        assert_eq!(allowance, AllowanceResponse::default());
    }

    #[test]
    fn no_self_allowance_or_stale_expiration() {
        let mut deps = mock_dependencies();
        let owner = String::from("addr0001");
        let info = mock_info(owner.as_ref(), &[]);
        let env = mock_env();
        do_instantiate(deps.as_mut(), &owner, Uint256::from(12340000u128));

        // self-allowance
        let msg = ExecuteMsg::IncreaseAllowance {
            spender: owner.clone(),
            amount: Uint256::from(7777u128),
            expires: None,
        };
        let err = execute(deps.as_mut(), env.clone(), info.clone(), msg).unwrap_err();
        assert_eq!(err, ContractError::CannotSetOwnAccount {});

        // decrease self-allowance
        let msg = ExecuteMsg::DecreaseAllowance {
            spender: owner,
            amount: Uint256::from(7777u128),
            expires: None,
        };
        let err = execute(deps.as_mut(), env.clone(), info.clone(), msg).unwrap_err();
        assert_eq!(err, ContractError::CannotSetOwnAccount {});

        // expiration already in the past
        let msg = ExecuteMsg::Approve {
            spender: String::from("addr0002"),
            amount: Uint256::from(7777u128),
            expires: Some(Expiration::AtHeight(env.block.height)),
        };
        let err = execute(deps.as_mut(), env, info, msg).unwrap_err();
        assert_eq!(err, ContractError::InvalidExpiration {});
    }

    #[test]
    fn transfer_from_respects_limits() {
        let mut deps = mock_dependencies();
        let owner = String::from("addr0001");
        let spender = String::from("addr0002");
        let rcpt = String::from("addr0003");

        let start = Uint256::from(999999u128);
        do_instantiate(deps.as_mut(), &owner, start);

        // provide an allowance
        let allow1 = Uint256::from(77777u128);
        let msg = ExecuteMsg::IncreaseAllowance {
            spender: spender.clone(),
            amount: allow1,
            expires: Some(Expiration::AtHeight(mock_env().block.height + 10)),
        };
        let info = mock_info(owner.as_ref(), &[]);
        let env = mock_env();
        execute(deps.as_mut(), env, info, msg).unwrap();

        // valid transfer of part of the allowance
        let transfer = Uint256::from(44444u128);
        let msg = ExecuteMsg::TransferFrom {
            owner: owner.clone(),
            recipient: rcpt.clone(),
            amount: transfer,
        };
        let info = mock_info(spender.as_ref(), &[]);
        let env = mock_env();
        let res = execute(deps.as_mut(), env, info, msg).unwrap();
        assert_eq!(res.attributes[0], attr("action", "transfer_from"));

        // make sure money arrived
        assert_eq!(
            get_balance(deps.as_ref(), owner.clone()),
            start.checked_sub(transfer).unwrap()
        );
        assert_eq!(get_balance(deps.as_ref(), rcpt.clone()), transfer);

        // cannot send more than the allowance
        let msg = ExecuteMsg::TransferFrom {
            owner: owner.clone(),
            recipient: rcpt.clone(),
            amount: Uint256::from(33443u128),
        };
        let info = mock_info(spender.as_ref(), &[]);
        let env = mock_env();
        let err = execute(deps.as_mut(), env, info, msg).unwrap_err();
        assert!(matches!(err, ContractError::Std(StdError::Overflow { .. })));

        // the allowance expires once the chain moves past it
        let msg = ExecuteMsg::TransferFrom {
            owner: owner.clone(),
            recipient: rcpt.clone(),
            amount: Uint256::from(1u128),
        };
        let info = mock_info(spender.as_ref(), &[]);
        let mut env = mock_env();
        env.block.height += 10;
        let err = execute(deps.as_mut(), env, info, msg).unwrap_err();
        assert_eq!(err, ContractError::Expired {});

        // someone without an allowance
        let msg = ExecuteMsg::TransferFrom {
            owner,
            recipient: rcpt.clone(),
            amount: Uint256::from(1u128),
        };
        let info = mock_info(rcpt.as_ref(), &[]);
        let err = execute(deps.as_mut(), mock_env(), info, msg).unwrap_err();
        assert_eq!(err, ContractError::NoAllowance {});
    }

    #[test]
    fn transfer_from_moves_delegated_votes() {
        let mut deps = mock_dependencies();
        let owner = String::from("addr0001");
        let spender = String::from("addr0002");
        let rcpt = String::from("addr0003");
        let env = mock_env();
        do_instantiate(deps.as_mut(), &owner, Uint256::from(1000u128));

        for addr in [&owner, &rcpt] {
            let msg = ExecuteMsg::Delegate {
                delegatee: addr.clone(),
            };
            execute(deps.as_mut(), env.clone(), mock_info(addr, &[]), msg).unwrap();
        }
        let msg = ExecuteMsg::Approve {
            spender: spender.clone(),
            amount: Uint256::from(400u128),
            expires: None,
        };
        execute(deps.as_mut(), env.clone(), mock_info(&owner, &[]), msg).unwrap();

        let msg = ExecuteMsg::TransferFrom {
            owner: owner.clone(),
            recipient: rcpt.clone(),
            amount: Uint256::from(400u128),
        };
        let res = execute(deps.as_mut(), env, mock_info(&spender, &[]), msg).unwrap();
        assert_eq!(res.events.len(), 2);

        assert_eq!(get_votes(deps.as_ref(), &owner), Uint256::from(600u128));
        assert_eq!(get_votes(deps.as_ref(), &rcpt), Uint256::from(400u128));
        assert_eq!(get_votes(deps.as_ref(), &spender), Uint256::zero());
    }

    #[test]
    fn burn_from_respects_limits() {
        let mut deps = mock_dependencies();
        let owner = String::from("addr0001");
        let spender = String::from("addr0002");

        let start = Uint256::from(999999u128);
        do_instantiate(deps.as_mut(), &owner, start);

        // provide an allowance
        let allow1 = Uint256::from(77777u128);
        let msg = ExecuteMsg::IncreaseAllowance {
            spender: spender.clone(),
            amount: allow1,
            expires: None,
        };
        let info = mock_info(owner.as_ref(), &[]);
        let env = mock_env();
        execute(deps.as_mut(), env, info, msg).unwrap();

        // valid burn of part of the allowance
        let transfer = Uint256::from(44444u128);
        let msg = ExecuteMsg::BurnFrom {
            owner: owner.clone(),
            amount: transfer,
        };
        let info = mock_info(spender.as_ref(), &[]);
        let env = mock_env();
        let res = execute(deps.as_mut(), env, info, msg).unwrap();
        assert_eq!(res.attributes[0], attr("action", "burn_from"));

        // make sure money burnt
        assert_eq!(
            get_balance(deps.as_ref(), owner.clone()),
            start.checked_sub(transfer).unwrap()
        );
        assert_eq!(
            query_token_info(deps.as_ref()).unwrap().total_supply,
            start.checked_sub(transfer).unwrap()
        );

        // cannot burn more than the allowance
        let msg = ExecuteMsg::BurnFrom {
            owner,
            amount: Uint256::from(33443u128),
        };
        let info = mock_info(spender.as_ref(), &[]);
        let env = mock_env();
        let err = execute(deps.as_mut(), env, info, msg).unwrap_err();
        assert!(matches!(err, ContractError::Std(StdError::Overflow { .. })));
    }

    #[test]
    fn rejects_funds() {
        let mut deps = mock_dependencies();
        let owner = String::from("addr0001");
        do_instantiate(deps.as_mut(), &owner, Uint256::from(10u128));

        let msg = ExecuteMsg::Approve {
            spender: String::from("addr0002"),
            amount: Uint256::from(5u128),
            expires: None,
        };
        let info = mock_info(owner.as_ref(), &coins(1, "ujuno"));
        let err = execute(deps.as_mut(), mock_env(), info, msg).unwrap_err();
        assert_eq!(err, ContractError::Payment(PaymentError::NonPayable {}));
    }
}
