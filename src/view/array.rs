// Wed Jan 15 2026 - Alex

use crate::memory::{Address, ByteSource};
use crate::profile::{FieldType, Profile, ScalarKind};
use crate::view::{value_at, FieldValue, TypedView};
use std::fmt;

/// Upper bound on a single bulk read of a byte array.
pub const MAX_BULK_READ: u64 = 16 << 20;

/// An array whose element count was fixed when it was constructed. Elements
/// are decoded one at a time as they are indexed.
#[derive(Clone)]
pub struct LazyArray<'a> {
    profile: &'a Profile,
    source: &'a dyn ByteSource,
    element: FieldType,
    base: Address,
    stride: u64,
    count: u64,
}

impl<'a> LazyArray<'a> {
    /// Returns `None` when the element type has no static size.
    pub fn new(
        profile: &'a Profile,
        source: &'a dyn ByteSource,
        element: FieldType,
        base: Address,
        count: u64,
    ) -> Option<Self> {
        let stride = element.size(profile.layouts(), profile.pointer_size())?;
        if stride == 0 {
            return None;
        }
        Some(Self {
            profile,
            source,
            element,
            base,
            stride,
            count,
        })
    }

    pub fn len(&self) -> u64 {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn base(&self) -> Address {
        self.base
    }

    pub fn stride(&self) -> u64 {
        self.stride
    }

    pub fn element_type(&self) -> &FieldType {
        &self.element
    }

    /// Byte span covered by all elements, `None` on overflow.
    pub fn byte_len(&self) -> Option<u64> {
        self.stride.checked_mul(self.count)
    }

    pub fn element_address(&self, index: u64) -> Option<Address> {
        if index >= self.count {
            return None;
        }
        self.base.checked_add(index.checked_mul(self.stride)?)
    }

    pub fn get(&self, index: u64) -> FieldValue<'a> {
        match self.element_address(index) {
            Some(addr) => value_at(self.profile, self.source, addr, &self.element, None),
            None => FieldValue::Unavailable,
        }
    }

    pub fn view_at(&self, index: u64) -> Option<TypedView<'a>> {
        self.get(index).into_struct()
    }

    pub fn uint_at(&self, index: u64) -> Option<u64> {
        self.get(index).as_uint()
    }

    pub fn iter(&self) -> impl Iterator<Item = FieldValue<'a>> + '_ {
        (0..self.count).map(move |i| self.get(i))
    }

    /// The raw bytes of a byte-element array in one read. Spans beyond
    /// `MAX_BULK_READ` are refused.
    pub fn read_bytes(&self) -> Option<Vec<u8>> {
        if !matches!(self.element, FieldType::Scalar(ScalarKind::U8 | ScalarKind::I8)) {
            return None;
        }
        let len = self.byte_len().filter(|&len| len <= MAX_BULK_READ)?;
        let len = usize::try_from(len).ok()?;
        self.source.read_bytes(self.base, len).ok()
    }
}

impl fmt::Debug for LazyArray<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LazyArray([{}; {}] @ {})", self.element, self.count, self.base)
    }
}
