// Thu Jan 16 2026 - Alex

//! Lazy traversals over linked kernel structures.

pub mod buckets;
pub mod chain;
pub mod climb;
pub mod percpu;

pub use buckets::BucketWalk;
pub use chain::{ChainEnd, ChainWalk};
pub use climb::{ClimbEnd, ClimbFields, ClimbStep, ParentClimb};
pub use percpu::{CpuBitmap, PerCpuSlot, PerCpuWalk};
