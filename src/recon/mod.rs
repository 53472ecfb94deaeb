// Fri Jan 17 2026 - Alex

//! Reconstruction of higher-level facts from kernel structures.

pub mod boottime;
pub mod cpus;
pub mod error;
pub mod known_addrs;
pub mod path;
pub mod route_cache;
pub mod shimcache;
pub mod tasks;

pub use boottime::{boot_time, task_start_time, TimeSource, Timespec};
pub use cpus::{online_cpus, per_cpu_var};
pub use error::ReconError;
pub use known_addrs::{KnownAddressChecker, ModuleRange};
pub use path::{file_path, partial_path, path_of};
pub use route_cache::{RouteCache, RouteCacheVariant, RouteEntry};
pub use shimcache::{sanitize, ShimCacheRecord, ShimCacheRecords, WinTimestamp};
pub use tasks::{task_infos, TaskInfo, TaskList};
