//! Engine-owned shared state: provider quotas and the result cache.
//!
//! Both structures are created per engine instance and shared by handle with
//! every concurrent resolution task.

pub mod cache;
pub mod quota;

pub use cache::{ResultCache, DEFAULT_CACHE_TTL};
pub use quota::{QuotaReservation, QuotaSnapshot, QuotaTracker};
