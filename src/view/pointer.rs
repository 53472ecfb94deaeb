// Wed Jan 15 2026 - Alex

use crate::memory::{Address, ByteSource};
use crate::profile::{FieldType, Profile};
use crate::view::{value_at, FieldValue, TypedView};
use std::fmt;

/// A pointer value that has been read but not followed. Nothing at the
/// target address is touched until one of the deref methods is called.
#[derive(Clone)]
pub struct Pointer<'a> {
    profile: &'a Profile,
    source: &'a dyn ByteSource,
    address: Address,
    target: FieldType,
}

impl<'a> Pointer<'a> {
    pub fn new(profile: &'a Profile, source: &'a dyn ByteSource, address: Address, target: FieldType) -> Self {
        Self {
            profile,
            source,
            address,
            target,
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn target(&self) -> &FieldType {
        &self.target
    }

    pub fn is_null(&self) -> bool {
        self.address.is_null()
    }

    /// Non-null and pointing at readable memory.
    pub fn is_valid(&self) -> bool {
        !self.is_null() && self.source.is_valid(self.address, 1)
    }

    /// The pointed-to structure, in the same byte source.
    pub fn deref(&self) -> TypedView<'a> {
        self.deref_in(self.source)
    }

    /// The pointed-to structure, read from another byte source. Used when a
    /// pointer stored in one address space refers into another.
    pub fn deref_in(&self, source: &'a dyn ByteSource) -> TypedView<'a> {
        match &self.target {
            FieldType::Struct(name) => TypedView::new(self.profile, name, self.address, source),
            _ => TypedView::invalid(self.profile, source, self.address),
        }
    }

    /// Follows the pointer as the given structure type regardless of the
    /// declared target.
    pub fn deref_as(&self, type_name: &str) -> TypedView<'a> {
        TypedView::new(self.profile, type_name, self.address, self.source)
    }

    /// The pointed-to value decoded with the declared target type.
    pub fn value(&self) -> FieldValue<'a> {
        if self.is_null() {
            return FieldValue::Unavailable;
        }
        value_at(self.profile, self.source, self.address, &self.target, None)
    }

    /// Treats the target as a NUL-terminated string.
    pub fn read_string(&self, max_len: usize) -> Option<String> {
        if self.is_null() {
            return None;
        }
        self.source.read_c_string(self.address, max_len).ok()
    }
}

impl fmt::Debug for Pointer<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pointer({} -> {})", self.address, self.target)
    }
}
