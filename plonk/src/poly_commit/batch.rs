use crate::errors::{PlonkError, Result};

/// Pending inputs of a batch of deferred commitments.
///
/// The sequence is `enable(count)`, then one `store` per slot, then `take`,
/// which hands the inputs back in slot order and disables batch mode.
#[derive(Clone, Debug)]
pub struct BatchCommitState<T> {
    enabled: bool,
    pending: Vec<Option<T>>,
}

impl<T> Default for BatchCommitState<T> {
    fn default() -> Self {
        Self {
            enabled: false,
            pending: Vec::new(),
        }
    }
}

impl<T> BatchCommitState<T> {
    /// Enter batch mode with `count` empty slots.
    pub fn enable(&mut self, count: usize) {
        self.enabled = true;
        self.pending = (0..count).map(|_| None).collect();
    }

    /// Whether batch mode is active.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// The number of slots of the current batch.
    pub fn batch_count(&self) -> usize {
        self.pending.len()
    }

    /// Store the inputs of slot `slot`.
    pub fn store(&mut self, slot: usize, item: T) -> Result<()> {
        if !self.enabled {
            return Err(PlonkError::BatchModeError);
        }
        let entry = self
            .pending
            .get_mut(slot)
            .ok_or(PlonkError::BatchModeError)?;
        *entry = Some(item);
        Ok(())
    }

    /// Return the stored inputs in slot order and leave batch mode.
    /// Every slot must have been filled.
    pub fn take(&mut self) -> Result<Vec<T>> {
        if !self.enabled {
            return Err(PlonkError::BatchModeError);
        }
        self.enabled = false;
        let pending = ark_std::mem::take(&mut self.pending);
        pending
            .into_iter()
            .map(|item| item.ok_or(PlonkError::BatchModeError))
            .collect()
    }
}
