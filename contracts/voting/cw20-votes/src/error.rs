use cosmwasm_std::{StdError, Uint256};
use cw_checkpoints::CheckpointError;
use cw_utils::PaymentError;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error(transparent)]
    Std(#[from] StdError),

    #[error(transparent)]
    Checkpoint(#[from] CheckpointError),

    #[error(transparent)]
    Ownership(#[from] cw_ownable::OwnershipError),

    #[error(transparent)]
    Payment(#[from] PaymentError),

    #[error("Unauthorized")]
    Unauthorized {},

    #[error("Cannot set to own account")]
    CannotSetOwnAccount {},

    #[error("Invalid zero amount")]
    InvalidZeroAmount {},

    #[error("Allowance is expired")]
    Expired {},

    #[error("No allowance for this account")]
    NoAllowance {},

    #[error("Invalid expiration value")]
    InvalidExpiration {},

    #[error("Minting {amount} would push total supply past the maximum voting power of 2^224 - 1")]
    SupplyOverflow { amount: Uint256 },

    #[error("Duplicate initial balance addresses")]
    DuplicateInitialBalanceAddresses {},

    #[error("Name is not in the expected format (3-50 UTF-8 bytes)")]
    InvalidName {},

    #[error("Ticker symbol is not in expected format [a-zA-Z\\-]{{3,12}}")]
    InvalidSymbol {},

    #[error("Decimals must not exceed 18")]
    InvalidDecimals {},
}
