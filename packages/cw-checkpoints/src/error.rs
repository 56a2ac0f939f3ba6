use cosmwasm_std::{StdError, Uint256};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum CheckpointError {
    #[error(transparent)]
    Std(#[from] StdError),

    #[error("Can not write a checkpoint at height {height}, the latest checkpoint is at height {last}")]
    OutOfOrderWrite { last: u64, height: u64 },

    #[error("Height {height} can not be looked up yet, current height is {current}")]
    FutureLookup { height: u64, current: u64 },

    #[error("Checkpoint value {value} does not fit in 224 bits")]
    ValueOverflow { value: Uint256 },
}

impl From<CheckpointError> for StdError {
    fn from(err: CheckpointError) -> Self {
        match err {
            CheckpointError::Std(err) => err,
            err => StdError::generic_err(err.to_string()),
        }
    }
}
