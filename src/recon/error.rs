// Fri Jan 17 2026 - Alex

use crate::profile::ProfileError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReconError {
    #[error("Required symbol not found: {0}")]
    MissingSymbol(String),
    #[error("No ShimCache data found")]
    NoShimCacheData,
    #[error("ShimCache declares {count} records but the blob holds only {len} bytes")]
    RecordsOutOfBounds { count: i64, len: usize },
    #[error("Neither cpu_online_bits nor cpu_present_map could be read")]
    CpuMaskUnavailable,
    #[error("Boot time sources unreadable")]
    BootTimeUnavailable,
    #[error(transparent)]
    Profile(#[from] ProfileError),
}
