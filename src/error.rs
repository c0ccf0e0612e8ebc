use std::collections::TryReserveError;

use thiserror::Error;

/// An error from a fallible dictionary operation.
///
/// Key absence is not an error: `get` and `remove` report it as `None`, the
/// normal outcome callers are expected to check for. `Error` covers the hard
/// failures: misconstruction and resource exhaustion.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// A dictionary was constructed with zero buckets.
    ///
    /// The bucket table is fixed for the life of the instance, so an empty
    /// one could never hold an entry.
    #[error("dictionary bucket count must be non-zero")]
    ZeroBuckets,

    /// Reserving storage for the dense arrays or the entry arena failed.
    ///
    /// The failed operation left the dictionary in its prior state; no
    /// partial mutation persists.
    #[error("failed to reserve dictionary storage")]
    Alloc(#[from] TryReserveError),
}
