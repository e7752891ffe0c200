pub mod cache;
pub mod clock;
pub mod error;
pub mod response;
pub mod types;

// Re-export commonly used items
pub use cache::{
    cache_keys, cache_ttl, create_redis_pool, get_cached, invalidate_cache,
    invalidate_cache_pattern, set_cached, RedisPool,
};
pub use clock::{from_utc, to_utc, Clock, FixedClock, SystemClock, UTC_OFFSET_HOURS};
pub use error::{DomainError, DomainResult};
pub use response::ApiResponse;
pub use types::{
    Degree, NotificationKind, RequestStatus, ScheduleKind, TimeEntryStatus, UserKind,
};
