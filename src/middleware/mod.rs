pub mod observability;
pub mod rate_limit;

pub use observability::RequestId;
pub use rate_limit::RateLimiter;
