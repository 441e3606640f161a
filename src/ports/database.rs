use crate::domain::{CapabilityDatabase, DomainError};

/// Where the capability database comes from.
///
/// Called once per validation run; implementations must not cache across calls.
pub trait DatabaseSource: Send + Sync {
    fn load(&self) -> Result<CapabilityDatabase, DomainError>;

    /// Human-readable origin, for logs.
    fn describe(&self) -> String;
}
