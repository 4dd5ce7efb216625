use std::ops::RangeInclusive;

use super::error::LifecycleError;

/// A contiguous, inclusive run of plate numbers that a movement acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberBatch {
    start: u32,
    end: u32,
}

impl NumberBatch {
    /// Largest batch a single movement may touch.
    pub const MAX_LEN: u32 = 100_000;

    /// `end` defaults to `start`. Rejects `end < start`, plate number zero,
    /// and batches larger than [`Self::MAX_LEN`].
    pub fn new(start: u32, end: Option<u32>) -> Result<Self, LifecycleError> {
        let end = end.unwrap_or(start);
        if start == 0 || end < start {
            return Err(LifecycleError::InvalidBatch { start, end });
        }
        let len = u64::from(end - start) + 1;
        if len > u64::from(Self::MAX_LEN) {
            return Err(LifecycleError::BatchTooLarge { len, max: Self::MAX_LEN });
        }
        Ok(Self { start, end })
    }

    pub fn single(number: u32) -> Result<Self, LifecycleError> {
        Self::new(number, None)
    }

    pub fn start(&self) -> u32 {
        self.start
    }

    pub fn end(&self) -> u32 {
        self.end
    }

    /// Number of plates in the batch (at least one).
    pub fn count(&self) -> u32 {
        self.end - self.start + 1
    }

    pub fn numbers(&self) -> RangeInclusive<u32> {
        self.start..=self.end
    }

    pub fn contains(&self, number: u32) -> bool {
        self.numbers().contains(&number)
    }
}
