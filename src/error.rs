use thiserror::Error;

/// The error returned by [`HashTable::try_reserve`].
///
/// [`HashTable::try_reserve`]: crate::HashTable::try_reserve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TryReserveError {
    /// The requested number of slots does not fit in `usize`.
    #[error("capacity overflow")]
    CapacityOverflow,
    /// The allocator could not provide the slot array.
    #[error("memory allocation of {slots} slots failed")]
    AllocError {
        /// Number of slots that were requested.
        slots: usize,
    },
}
