// Tue Jan 15 2026 - Alex

pub mod builder;
pub mod builtin;
pub mod error;
pub mod layout;
pub mod metadata;
pub mod patch;
pub mod profile;
pub mod registry;
pub mod symbols;
pub mod types;
pub mod version;

pub use builder::StructBuilder;
pub use error::ProfileError;
pub use layout::{FieldDef, LayoutTable, StructLayout};
pub use metadata::{Architecture, OsFamily, ProfileMetadata};
pub use patch::{ConditionSet, LayoutPatch};
pub use profile::Profile;
pub use registry::ProfileRegistry;
pub use symbols::{SymbolTable, KERNEL_MODULE};
pub use types::{ArrayCount, FieldType, ScalarKind};
pub use version::Version;
