use std::time::Instant;

/// Source of monotonic time for expiry decisions.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}
