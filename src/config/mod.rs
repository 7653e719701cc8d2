use crate::ranks::RankConfig;
use std::net::SocketAddr;

/// Default listen address for the HTTP server
pub const DEFAULT_BIND: &str = "127.0.0.1:5000";

/// Configuration for the rank wheel service
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the HTTP server listens on
    pub bind_addr: SocketAddr,
    /// Ranks offered by the wheel, in display order
    pub ranks: RankConfig,
    /// Largest draw latency tracked by the histogram, in nanoseconds
    pub histogram_max_nanos: u64,
    /// Histogram precision (3 = 0.1%)
    pub histogram_sigfigs: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 5000)),
            ranks: RankConfig::builtin(),
            histogram_max_nanos: 10_000_000,
            histogram_sigfigs: 3,
        }
    }
}
