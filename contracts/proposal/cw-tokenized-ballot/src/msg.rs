use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::Uint256;

#[cw_serde]
pub struct InstantiateMsg {
    /// Names of the proposals, in index order.
    pub proposals: Vec<String>,
    /// Address of the cw20-votes token to read voting power from.
    pub token: String,
    /// Height at which voting power is snapshotted. Must be before the
    /// current block.
    pub target_height: u64,
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Spends `amount` of the sender's remaining voting power on the
    /// proposal at index `proposal`. May be called repeatedly to split
    /// power across proposals.
    Vote { proposal: u32, amount: Uint256 },
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    /// Voting power the address can still spend.
    #[returns(VotingPowerResponse)]
    VotingPower { address: String },
    /// Voting power the address has already spent.
    #[returns(VotingPowerSpentResponse)]
    VotingPowerSpent { address: String },
    /// The proposal with the most votes. Ties go to the lowest index.
    #[returns(WinningProposalResponse)]
    WinningProposal {},
    /// Name of the proposal with the most votes.
    #[returns(WinnerNameResponse)]
    WinnerName {},
    #[returns(ProposalResponse)]
    Proposal { index: u32 },
    #[returns(ProposalListResponse)]
    ListProposals {
        start_after: Option<u32>,
        limit: Option<u32>,
    },
    #[returns(crate::state::Config)]
    Config {},
    #[returns(InfoResponse)]
    Info {},
}

#[cw_serde]
pub struct MigrateMsg {}

#[cw_serde]
pub struct VotingPowerResponse {
    pub power: Uint256,
}

#[cw_serde]
pub struct VotingPowerSpentResponse {
    pub spent: Uint256,
}

#[cw_serde]
pub struct WinningProposalResponse {
    pub index: u32,
}

#[cw_serde]
pub struct WinnerNameResponse {
    pub name: String,
}

#[cw_serde]
pub struct ProposalResponse {
    pub index: u32,
    pub name: String,
    pub vote_count: Uint256,
}

#[cw_serde]
pub struct ProposalListResponse {
    pub proposals: Vec<ProposalResponse>,
}

#[cw_serde]
pub struct InfoResponse {
    pub info: cw2::ContractVersion,
}
