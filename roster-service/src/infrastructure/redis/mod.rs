pub use shared::cache::{create_redis_pool, RedisPool};
