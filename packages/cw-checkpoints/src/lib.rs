#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/README.md"))]

use cosmwasm_schema::cw_serde;
use cosmwasm_std::{StdResult, Storage, Uint256};
use cw_storage_plus::{KeyDeserialize, Map, Prefixer, PrimaryKey};

mod error;


pub use crate::error::CheckpointError;

/// The largest value a checkpoint may hold, 2^224 - 1.
pub const MAX_CHECKPOINT_VALUE: Uint256 = Uint256::from_be_bytes([
    0, 0, 0, 0, 255, 255, 255, 255, 255, 255, 255, 255, 255, 255, 255, 255, 255, 255, 255, 255,
    255, 255, 255, 255, 255, 255, 255, 255, 255, 255, 255, 255,
]);

/// A value as of a block height.
#[cw_serde]
pub struct Checkpoint {
    pub height: u64,
    pub value: Uint256,
}

/// Map from a key to the append-only history of its value.
///
/// Checkpoints for a key are stored by position, `(key, pos) ->
/// Checkpoint`, with positions `0..len` sorted ascending by height. The
/// length of each history is stored separately so the latest value can be
/// read without ranging over storage.
///
/// A single history, e.g. a total supply, is stored under a constant key.
/// The key must have at least one component, so the unit key `()` can't be
/// used:
///
/// ```rust
/// # use cosmwasm_std::{testing::mock_dependencies, Uint256};
/// # use cw_checkpoints::Checkpoints;
/// const TOTAL: Checkpoints<u8> = Checkpoints::new("total", "total__len");
///
/// let storage = &mut mock_dependencies().storage;
/// TOTAL.push(storage, 0, 3, Uint256::from(7u128)).unwrap();
/// assert_eq!(TOTAL.latest(storage, 0).unwrap(), Uint256::from(7u128));
/// ```
pub struct Checkpoints<'a, K> {
    entries: Map<'a, (K, u32), Checkpoint>,
    lengths: Map<'a, K, u32>,
}

impl<'a, K> Checkpoints<'a, K> {
    pub const fn new(entries_key: &'a str, lengths_key: &'a str) -> Self {
        Checkpoints {
            entries: Map::new(entries_key),
            lengths: Map::new(lengths_key),
        }
    }
}

impl<'a, K> Checkpoints<'a, K>
where
    K: PrimaryKey<'a> + Prefixer<'a> + KeyDeserialize + Clone,
{
    /// Number of checkpoints recorded for `k`.
    pub fn len(&self, store: &dyn Storage, k: K) -> StdResult<u32> {
        Ok(self.lengths.may_load(store, k)?.unwrap_or_default())
    }

    /// The checkpoint at position `pos` in the history of `k`, if any.
    pub fn at(&self, store: &dyn Storage, k: K, pos: u32) -> StdResult<Option<Checkpoint>> {
        self.entries.may_load(store, (k, pos))
    }

    /// The most recent checkpoint for `k`, if any.
    pub fn last(&self, store: &dyn Storage, k: K) -> StdResult<Option<Checkpoint>> {
        match self.len(store, k.clone())? {
            0 => Ok(None),
            len => self.at(store, k, len - 1),
        }
    }

    /// The current value for `k`, zero if nothing has been recorded.
    pub fn latest(&self, store: &dyn Storage, k: K) -> StdResult<Uint256> {
        Ok(self
            .last(store, k)?
            .map(|checkpoint| checkpoint.value)
            .unwrap_or_default())
    }

    /// Records `value` for `k` at `height` and returns the previous and new
    /// values.
    ///
    /// If the latest checkpoint is at `height` it is overwritten, otherwise
    /// a new checkpoint is appended. `height` may never be lower than the
    /// height of the latest checkpoint.
    pub fn push(
        &self,
        store: &mut dyn Storage,
        k: K,
        height: u64,
        value: Uint256,
    ) -> Result<(Uint256, Uint256), CheckpointError> {
        if value > MAX_CHECKPOINT_VALUE {
            return Err(CheckpointError::ValueOverflow { value });
        }

        let len = self.len(store, k.clone())?;
        let last = match len {
            0 => None,
            len => self.at(store, k.clone(), len - 1)?,
        };
        let checkpoint = Checkpoint { height, value };

        match last {
            Some(last) if height < last.height => Err(CheckpointError::OutOfOrderWrite {
                last: last.height,
                height,
            }),
            Some(last) if height == last.height => {
                self.entries.save(store, (k, len - 1), &checkpoint)?;
                Ok((last.value, value))
            }
            last => {
                self.entries.save(store, (k.clone(), len), &checkpoint)?;
                self.lengths.save(store, k, &(len + 1))?;
                Ok((last.map(|c| c.value).unwrap_or_default(), value))
            }
        }
    }

    /// Applies `action` to the current value of `k` and records the result
    /// at `height`. Returns the previous and new values.
    pub fn update<A>(
        &self,
        store: &mut dyn Storage,
        k: K,
        height: u64,
        action: A,
    ) -> Result<(Uint256, Uint256), CheckpointError>
    where
        A: FnOnce(Uint256) -> StdResult<Uint256>,
    {
        let old = self.latest(store, k.clone())?;
        let new = action(old)?;
        self.push(store, k, height, new)
    }

    /// The value of `k` as of `height`: the value of the last checkpoint
    /// at or before `height`, or zero if there is none.
    ///
    /// Binary search over the history, O(log n) storage reads.
    pub fn upper_lookup(&self, store: &dyn Storage, k: K, height: u64) -> StdResult<Uint256> {
        let len = self.len(store, k.clone())?;
        if len == 0 {
            return Ok(Uint256::zero());
        }

        // Recent heights are the common case.
        let last = self.load_at(store, k.clone(), len - 1)?;
        if last.height <= height {
            return Ok(last.value);
        }

        // Find the first position whose checkpoint is after `height`.
        let (mut low, mut high) = (0u32, len - 1);
        while low < high {
            let mid = low + (high - low) / 2;
            if self.load_at(store, k.clone(), mid)?.height > height {
                high = mid;
            } else {
                low = mid + 1;
            }
        }

        match high {
            0 => Ok(Uint256::zero()),
            pos => Ok(self.load_at(store, k, pos - 1)?.value),
        }
    }

    /// Like [`Self::upper_lookup`] but only for heights strictly before
    /// `current_height`. Values at the current height may still change
    /// within the block and are refused.
    pub fn past(
        &self,
        store: &dyn Storage,
        k: K,
        height: u64,
        current_height: u64,
    ) -> Result<Uint256, CheckpointError> {
        if height >= current_height {
            return Err(CheckpointError::FutureLookup {
                height,
                current: current_height,
            });
        }
        Ok(self.upper_lookup(store, k, height)?)
    }

    fn load_at(&self, store: &dyn Storage, k: K, pos: u32) -> StdResult<Checkpoint> {
        self.entries.load(store, (k, pos))
    }
}
