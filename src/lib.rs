// Tue Jan 15 2026 - Alex

//! Typed, lazily evaluated views over raw memory images, driven by
//! conditional structure-layout profiles, plus the walkers and
//! reconstruction routines built on them.

pub mod config;
pub mod memory;
pub mod profile;
pub mod recon;
pub mod utils;
pub mod view;
pub mod walk;

#[cfg(test)]
mod testing;

pub use config::AnalysisConfig;
pub use memory::{Address, BufferSource, ByteSource, MmapSource, TranslatedSource};
pub use profile::{Profile, ProfileError, ProfileMetadata, ProfileRegistry, SymbolTable};
pub use recon::ReconError;
pub use view::{FieldValue, LazyArray, Pointer, TypedView};
pub use walk::{BucketWalk, ChainWalk, CpuBitmap, ParentClimb, PerCpuWalk};
