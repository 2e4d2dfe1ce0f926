//! Console configuration
//!
//! One immutable value constructed at startup and handed to each component.
//! Nothing in the core reads global state after construction.

use std::path::PathBuf;
use std::time::Duration;

/// Default inventory TTL. Shared by every cache key; entries are either
/// entirely fresh or entirely stale.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);

/// How long to wait after a batch start before re-describing instances for
/// their freshly assigned external IPs.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_secs(15);

/// Role token that marks edge/dispatcher hosts in instance names.
pub const DISPATCHER_TOKEN: &str = "dispatcher";

#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    /// Root directory for persisted cache files
    pub cache_dir: PathBuf,

    pub cache_ttl: Duration,

    pub settle_delay: Duration,

    /// Substring that excludes a host from author-tier endpoints
    pub dispatcher_token: String,
}

impl ConsoleConfig {
    /// Build the runtime configuration.
    ///
    /// Cache directory precedence: `FLEETOPS_CACHE_DIR`, then the platform
    /// cache dir, then `/tmp/fleetops` as a last resort.
    pub fn load() -> Self {
        let cache_dir = std::env::var("FLEETOPS_CACHE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                dirs::cache_dir()
                    .unwrap_or_else(|| PathBuf::from("/tmp"))
                    .join("fleetops")
            });

        Self {
            cache_dir,
            ..Self::default()
        }
    }
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            cache_dir: PathBuf::from("/tmp/fleetops"),
            cache_ttl: DEFAULT_CACHE_TTL,
            settle_delay: DEFAULT_SETTLE_DELAY,
            dispatcher_token: DISPATCHER_TOKEN.to_string(),
        }
    }
}
