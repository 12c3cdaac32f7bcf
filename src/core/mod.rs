pub mod entry;
pub mod error;
pub mod memory;
pub mod provider;
pub mod stats;

pub use entry::{CacheEntry, epoch_millis};
pub use error::{CacheError, Result};
pub use memory::MemoryProvider;
pub use provider::CacheProvider;
pub use stats::{CacheStatistics, StatsSnapshot};
