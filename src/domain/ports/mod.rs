mod clock_port;
mod property_cache_port;

pub use clock_port::Clock;
pub use property_cache_port::PropertyCachePort;

#[cfg(test)]
pub mod mocks {
    pub use super::clock_port::mock::ManualClock;
    pub use super::property_cache_port::MockPropertyCachePort;
}
