use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Addr, Uint256};
use cw_ownable::{cw_ownable_execute, cw_ownable_query};
use cw_utils::Expiration;

#[cw_serde]
pub struct InitialBalance {
    pub address: String,
    pub amount: Uint256,
}

#[cw_serde]
pub struct InstantiateMsg {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    /// Minted to their holders at instantiation. Holders still need to
    /// delegate before these balances count as voting power.
    pub initial_balances: Vec<InitialBalance>,
    /// Accounts allowed to mint. Defaults to the instantiator.
    pub minters: Option<Vec<String>>,
}

#[cw_ownable_execute]
#[cw_serde]
pub enum ExecuteMsg {
    /// Transfer is a base message to move tokens to another account
    /// without triggering actions.
    Transfer { recipient: String, amount: Uint256 },
    /// Burn is a base message to destroy tokens forever.
    Burn { amount: Uint256 },
    /// Creates new tokens. Only minters may call this, and total supply
    /// may never exceed 2^224 - 1.
    Mint { recipient: String, amount: Uint256 },
    /// Sets the allowance of `spender` over the sender's tokens,
    /// replacing any existing allowance.
    Approve {
        spender: String,
        amount: Uint256,
        expires: Option<Expiration>,
    },
    /// Allows spender to access an additional amount tokens from the
    /// owner's (env.sender) account. If expires is Some(), overwrites
    /// current allowance expiration with this one.
    IncreaseAllowance {
        spender: String,
        amount: Uint256,
        expires: Option<Expiration>,
    },
    /// Lowers the spender's access of tokens from the owner's (env.sender)
    /// account by amount. If expires is Some(), overwrites current
    /// allowance expiration with this one.
    DecreaseAllowance {
        spender: String,
        amount: Uint256,
        expires: Option<Expiration>,
    },
    /// Transfers amount tokens from owner -> recipient if `env.sender` has
    /// sufficient pre-approval.
    TransferFrom {
        owner: String,
        recipient: String,
        amount: Uint256,
    },
    /// Destroys tokens forever if `env.sender` has sufficient
    /// pre-approval.
    BurnFrom { owner: String, amount: Uint256 },
    /// Delegates the sender's voting power to `delegatee`. Delegate to
    /// yourself to activate your own voting power.
    Delegate { delegatee: String },
    /// Removes the sender's delegation. The sender's balance stops
    /// counting as anyone's voting power.
    Undelegate {},
    /// Gives `address` the right to mint. Only the owner may call this.
    GrantMinter { address: String },
    /// Takes the right to mint away from `address`. Only the owner may
    /// call this.
    RevokeMinter { address: String },
    /// Gives up the sender's own right to mint.
    RenounceMinter {},
}

#[cw_ownable_query]
#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    /// Returns the current balance of the given address, 0 if unset.
    #[returns(BalanceResponse)]
    Balance { address: String },
    /// Returns metadata on the contract - name, decimals, supply, etc.
    #[returns(TokenInfoResponse)]
    TokenInfo {},
    /// Returns how much spender can use from owner account, 0 if unset.
    #[returns(AllowanceResponse)]
    Allowance { owner: String, spender: String },
    /// Returns all allowances this owner has approved. Supports
    /// pagination.
    #[returns(AllAllowancesResponse)]
    AllAllowances {
        owner: String,
        start_after: Option<String>,
        limit: Option<u32>,
    },
    /// Returns all accounts that have balances. Supports pagination.
    #[returns(AllAccountsResponse)]
    AllAccounts {
        start_after: Option<String>,
        limit: Option<u32>,
    },
    /// Returns who the address has delegated its voting power to.
    #[returns(DelegatesResponse)]
    Delegates { address: String },
    /// Returns the current voting power of the address.
    #[returns(VotesResponse)]
    Votes { address: String },
    /// Returns the voting power the address had at the end of block
    /// `height`. `height` must be before the current block.
    #[returns(PastVotesResponse)]
    PastVotes { address: String, height: u64 },
    /// Returns the total supply at the end of block `height`. `height`
    /// must be before the current block.
    #[returns(PastTotalSupplyResponse)]
    PastTotalSupply { height: u64 },
    /// Returns the number of voting power checkpoints of the address.
    #[returns(u32)]
    NumCheckpoints { address: String },
    /// Returns the voting power checkpoint of the address at position
    /// `pos`.
    #[returns(cw_checkpoints::Checkpoint)]
    Checkpoint { address: String, pos: u32 },
    /// Returns the accounts allowed to mint.
    #[returns(MintersResponse)]
    Minters {
        start_after: Option<String>,
        limit: Option<u32>,
    },
    /// Returns contract version info.
    #[returns(InfoResponse)]
    Info {},
}

#[cw_serde]
pub struct MigrateMsg {}

#[cw_serde]
pub struct BalanceResponse {
    pub balance: Uint256,
}

#[cw_serde]
pub struct TokenInfoResponse {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    pub total_supply: Uint256,
}

#[cw_serde]
#[derive(Default)]
pub struct AllowanceResponse {
    pub allowance: Uint256,
    pub expires: Expiration,
}

#[cw_serde]
pub struct AllowanceInfo {
    pub spender: String,
    pub allowance: Uint256,
    pub expires: Expiration,
}

#[cw_serde]
#[derive(Default)]
pub struct AllAllowancesResponse {
    pub allowances: Vec<AllowanceInfo>,
}

#[cw_serde]
#[derive(Default)]
pub struct AllAccountsResponse {
    pub accounts: Vec<String>,
}

#[cw_serde]
pub struct DelegatesResponse {
    pub delegatee: Option<Addr>,
}

#[cw_serde]
pub struct VotesResponse {
    pub power: Uint256,
}

#[cw_serde]
pub struct PastVotesResponse {
    pub power: Uint256,
    pub height: u64,
}

#[cw_serde]
pub struct PastTotalSupplyResponse {
    pub total: Uint256,
    pub height: u64,
}

#[cw_serde]
pub struct MintersResponse {
    pub minters: Vec<Addr>,
}

#[cw_serde]
pub struct InfoResponse {
    pub info: cw2::ContractVersion,
}
