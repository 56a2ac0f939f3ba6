use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Uint256};
use cw_storage_plus::{Item, Map};

/// Longest proposal name, in bytes.
pub const MAX_PROPOSAL_NAME_LENGTH: usize = 32;

#[cw_serde]
pub struct Config {
    /// The cw20-votes token voting power is read from.
    pub token: Addr,
    /// Voting power is the delegated balance at the end of this block.
    pub target_height: u64,
    pub proposal_count: u32,
}

#[cw_serde]
pub struct Proposal {
    pub name: String,
    pub vote_count: Uint256,
}

pub const CONFIG: Item<Config> = Item::new("config");

/// Proposals by index. The set is fixed at instantiation.
pub const PROPOSALS: Map<u32, Proposal> = Map::new("proposals");

/// Voting power each voter has already cast.
pub const SPENT: Map<&Addr, Uint256> = Map::new("spent");
