//! Repository factory abstraction
//!
//! Callers ask a factory for a repository instead of naming the SQL type, so
//! the backend wiring stays the same when another implementation is added.

/// A trait for database repository factories
///
/// Generic over the repository type and the configuration it is built from.
pub trait RepositoryFactory<R, C> {
    /// Create a new repository instance
    fn create_repository(&self, config: C) -> R;
}
