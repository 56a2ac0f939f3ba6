use cosmwasm_std::{StdError, Uint256};
use cw_utils::PaymentError;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error(transparent)]
    Std(#[from] StdError),

    #[error(transparent)]
    Payment(#[from] PaymentError),

    #[error("Target height ({target_height}) must be before the current height ({current})")]
    InvalidTargetPoint { target_height: u64, current: u64 },

    #[error("A ballot needs at least one proposal")]
    NoProposals {},

    #[error("Proposal names must be between 1 and 32 bytes long, got ({name})")]
    InvalidProposalName { name: String },

    #[error("No proposal with index ({index}), there are {count} proposals")]
    InvalidProposal { index: u32, count: u32 },

    #[error("Can not vote with zero voting power")]
    ZeroAmount {},

    #[error("Requested {requested} voting power, only {remaining} left")]
    InsufficientVotingPower {
        requested: Uint256,
        remaining: Uint256,
    },
}
