/// Errors returned when a container refuses an insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum InsertError {
    /// The insertion needed the table to grow, but it already holds the
    /// configured maximum number of buckets. Nothing was inserted.
    #[error("exceeding maximum capacity of {capacity} buckets")]
    CapacityExceeded {
        /// The table capacity at the time of the refused insertion.
        capacity: usize,
    },
}
