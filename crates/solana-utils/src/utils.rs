/// A value tagged with the slot of the context it was read at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(serde, derive(serde::Serialize, serde::Deserialize))]
pub struct WithSlot<T> {
    slot: u64,
    value: T,
}

impl<T> WithSlot<T> {
    /// Create a new [`WithSlot`].
    pub fn new(slot: u64, value: T) -> Self {
        Self { slot, value }
    }

    /// Get the context slot.
    pub fn slot(&self) -> u64 {
        self.slot
    }

    /// Get a reference to the value.
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Consume and return the value.
    pub fn into_value(self) -> T {
        self.value
    }

    /// Map the value, keeping the slot.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> WithSlot<U> {
        WithSlot {
            slot: self.slot,
            value: f(self.value),
        }
    }
}

impl<T, E> WithSlot<Result<T, E>> {
    /// Transpose a `WithSlot<Result<T, E>>` into a `Result<WithSlot<T>, E>`.
    pub fn transpose(self) -> Result<WithSlot<T>, E> {
        let slot = self.slot;
        self.value.map(|value| WithSlot { slot, value })
    }
}
