use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Empty, Uint256};
use cw_checkpoints::Checkpoints;
use cw_storage_plus::{Item, Map};
use cw_utils::Expiration;

#[cw_serde]
pub struct TokenInfo {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    pub total_supply: Uint256,
}

#[cw_serde]
#[derive(Default)]
pub struct Allowance {
    pub allowance: Uint256,
    pub expires: Expiration,
}

pub const TOKEN_INFO: Item<TokenInfo> = Item::new("token_info");

pub const BALANCES: Map<&Addr, Uint256> = Map::new("balance");

/// (owner, spender) -> allowance
pub const ALLOWANCES: Map<(&Addr, &Addr), Allowance> = Map::new("allowance");

/// Accounts that may mint new tokens.
pub const MINTERS: Map<&Addr, Empty> = Map::new("minters");

/// account -> the account its voting power is delegated to. Accounts
/// without an entry have not delegated and their balance counts towards
/// nobody's voting power.
pub const DELEGATES: Map<&Addr, Addr> = Map::new("delegates");

/// Voting power of each delegatee over time.
pub const VOTES: Checkpoints<&Addr> = Checkpoints::new("votes", "votes__len");

/// Total supply over time, a single history stored under
/// [`TOTAL_SUPPLY_KEY`].
pub const TOTAL_SUPPLY: Checkpoints<u8> = Checkpoints::new("total_supply", "total_supply__len");
pub const TOTAL_SUPPLY_KEY: u8 = 0;
