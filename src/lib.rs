// Library exports for rank-wheel
// This allows integration tests to access internal modules

pub mod config;
pub mod draw;
pub mod error;
pub mod metrics;
pub mod ranks;
pub mod server;
pub mod weights;
