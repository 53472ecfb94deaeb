// Tue Jan 13 2026 - Alex

use crate::memory::Endianness;
use crate::profile::{FieldDef, LayoutTable, OsFamily, ProfileError, ProfileMetadata, StructLayout, SymbolTable};

/// A resolved, immutable profile: metadata, symbols and the merged layout
/// table. Built once per analysis session by
/// [`ProfileRegistry::build`](crate::profile::ProfileRegistry::build).
#[derive(Debug, Clone)]
pub struct Profile {
    metadata: ProfileMetadata,
    symbols: SymbolTable,
    layouts: LayoutTable,
    applied: Vec<String>,
}

impl Profile {
    pub fn new(
        metadata: ProfileMetadata,
        symbols: SymbolTable,
        layouts: LayoutTable,
        applied: Vec<String>,
    ) -> Self {
        Self {
            metadata,
            symbols,
            layouts,
            applied,
        }
    }

    pub fn metadata(&self) -> &ProfileMetadata {
        &self.metadata
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn layouts(&self) -> &LayoutTable {
        &self.layouts
    }

    pub fn applied_patches(&self) -> &[String] {
        &self.applied
    }

    pub fn pointer_size(&self) -> u64 {
        self.metadata.pointer_size()
    }

    pub fn endianness(&self) -> Endianness {
        self.metadata.endianness
    }

    pub fn is_os(&self, os: OsFamily) -> bool {
        self.metadata.os == os
    }

    /// Gate checked by every OS-specific analysis before it touches a layout.
    pub fn require_os(&self, os: OsFamily) -> Result<(), ProfileError> {
        if self.is_os(os) {
            Ok(())
        } else {
            Err(ProfileError::WrongOs {
                expected: os,
                found: self.metadata.os,
            })
        }
    }

    pub fn layout(&self, type_name: &str) -> Option<&StructLayout> {
        self.layouts.get(type_name)
    }

    pub fn require_layout(&self, type_name: &str) -> Result<&StructLayout, ProfileError> {
        self.layout(type_name)
            .ok_or_else(|| ProfileError::MissingType(type_name.to_string()))
    }

    pub fn has_member(&self, type_name: &str, path: &str) -> bool {
        self.layouts.resolve_path(type_name, path).is_some()
    }

    pub fn member(&self, type_name: &str, path: &str) -> Option<(u64, &FieldDef)> {
        self.layouts.resolve_path(type_name, path)
    }
}
