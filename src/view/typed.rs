// Wed Jan 15 2026 - Alex

use crate::memory::{Address, ByteSource};
use crate::profile::{FieldDef, FieldType, Profile, StructLayout};
use crate::view::{value_at, FieldValue, LazyArray, Pointer};
use std::fmt;

/// A structure of a named profile type located at `base` in a byte source.
///
/// Construction reads nothing. Each accessor resolves its field against the
/// profile layout and decodes it on the spot, so a view over garbage memory
/// is cheap to make and only fails where it is actually read. Field paths
/// may be dotted (`tasks.next`) to reach through embedded structures.
#[derive(Clone, Copy)]
pub struct TypedView<'a> {
    profile: &'a Profile,
    source: &'a dyn ByteSource,
    layout: Option<&'a StructLayout>,
    base: Address,
}

impl<'a> TypedView<'a> {
    pub fn new(profile: &'a Profile, type_name: &str, base: Address, source: &'a dyn ByteSource) -> Self {
        let layout = profile.layout(type_name);
        if layout.is_none() {
            log::debug!("no layout for type {} in profile {}", type_name, profile.metadata());
        }
        Self {
            profile,
            source,
            layout,
            base,
        }
    }

    /// A view that fails every validity check. Stands in for "no object".
    pub fn invalid(profile: &'a Profile, source: &'a dyn ByteSource, base: Address) -> Self {
        Self {
            profile,
            source,
            layout: None,
            base,
        }
    }

    pub fn profile(&self) -> &'a Profile {
        self.profile
    }

    pub fn source(&self) -> &'a dyn ByteSource {
        self.source
    }

    pub fn layout(&self) -> Option<&'a StructLayout> {
        self.layout
    }

    pub fn type_name(&self) -> &'a str {
        self.layout.map(StructLayout::name).unwrap_or("<unknown>")
    }

    pub fn offset(&self) -> Address {
        self.base
    }

    pub fn size(&self) -> Option<u64> {
        self.layout.and_then(StructLayout::size)
    }

    /// Physical location of this structure when the source translates.
    pub fn physical_offset(&self) -> Option<Address> {
        self.source.translate(self.base)
    }

    /// Known type, non-null base, and the base is readable.
    pub fn is_valid(&self) -> bool {
        self.layout.is_some() && !self.base.is_null() && self.source.is_valid(self.base, 1)
    }

    pub fn has_field(&self, path: &str) -> bool {
        self.resolve(path).is_some()
    }

    fn resolve(&self, path: &str) -> Option<(Address, &'a FieldDef)> {
        let layout = self.layout?;
        let (offset, field) = self.profile.layouts().resolve_path(layout.name(), path)?;
        Some((self.base.checked_add(offset)?, field))
    }

    pub fn field_address(&self, path: &str) -> Option<Address> {
        self.resolve(path).map(|(addr, _)| addr)
    }

    /// Structure that directly contains the last component of `path`.
    fn owner_of(&self, path: &str) -> TypedView<'a> {
        match path.rsplit_once('.') {
            Some((parent, _)) => self.member(parent),
            None => *self,
        }
    }

    pub fn get(&self, path: &str) -> FieldValue<'a> {
        match self.resolve(path) {
            Some((addr, field)) => {
                let owner = self.owner_of(path);
                value_at(self.profile, self.source, addr, &field.ty, Some(&owner))
            }
            None => {
                log::trace!("{} has no member {}", self.type_name(), path);
                FieldValue::Unavailable
            }
        }
    }

    /// Reinterprets the bytes of a field as another type without moving them.
    pub fn cast(&self, path: &str, ty: &FieldType) -> FieldValue<'a> {
        match self.field_address(path) {
            Some(addr) => {
                let owner = self.owner_of(path);
                value_at(self.profile, self.source, addr, ty, Some(&owner))
            }
            None => FieldValue::Unavailable,
        }
    }

    pub fn read_uint(&self, path: &str) -> Option<u64> {
        self.get(path).as_uint()
    }

    pub fn read_int(&self, path: &str) -> Option<i64> {
        self.get(path).as_int()
    }

    pub fn pointer(&self, path: &str) -> Option<Pointer<'a>> {
        self.get(path).into_pointer()
    }

    /// Follows a pointer field. An unreadable or non-pointer field yields an
    /// invalid view; a null pointer yields a view at address zero, which is
    /// also invalid.
    pub fn deref(&self, path: &str) -> TypedView<'a> {
        match self.pointer(path) {
            Some(ptr) => ptr.deref(),
            None => TypedView::invalid(self.profile, self.source, Address::zero()),
        }
    }

    /// An embedded structure member.
    pub fn member(&self, path: &str) -> TypedView<'a> {
        match self.get(path) {
            FieldValue::Struct(view) => view,
            _ => TypedView::invalid(self.profile, self.source, self.base),
        }
    }

    pub fn array(&self, path: &str) -> Option<LazyArray<'a>> {
        self.get(path).into_array()
    }

    /// Reads a string from either an inline character array or a `char *`,
    /// cut at the first NUL and at `max_len` bytes.
    pub fn read_string(&self, path: &str, max_len: usize) -> Option<String> {
        match self.get(path) {
            FieldValue::Array(array) => {
                let mut bytes = array.read_bytes()?;
                bytes.truncate(max_len);
                if let Some(nul) = bytes.iter().position(|&b| b == 0) {
                    bytes.truncate(nul);
                }
                Some(String::from_utf8_lossy(&bytes).into_owned())
            }
            FieldValue::Pointer(ptr) => ptr.read_string(max_len),
            _ => None,
        }
    }

    /// Same structure type at a different base. Used by walkers stepping
    /// along links.
    pub fn at(&self, base: Address) -> TypedView<'a> {
        Self { base, ..*self }
    }
}

impl PartialEq for TypedView<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.base == other.base && self.type_name() == other.type_name()
    }
}

impl fmt::Debug for TypedView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ {}", self.type_name(), self.base)
    }
}

impl Profile {
    /// `view(type_name, base_offset, byte_source)`.
    pub fn view<'a>(&'a self, type_name: &str, base: Address, source: &'a dyn ByteSource) -> TypedView<'a> {
        TypedView::new(self, type_name, base, source)
    }

    /// A view of the global variable named by a kernel symbol.
    pub fn symbol_view<'a>(&'a self, symbol: &str, type_name: &str, source: &'a dyn ByteSource) -> Option<TypedView<'a>> {
        self.symbols().kernel(symbol).map(|addr| self.view(type_name, addr, source))
    }

    /// A scalar global read through its kernel symbol.
    pub fn symbol_value<'a>(&'a self, symbol: &str, ty: &FieldType, source: &'a dyn ByteSource) -> FieldValue<'a> {
        match self.symbols().kernel(symbol) {
            Some(addr) => value_at(self, source, addr, ty, None),
            None => FieldValue::Unavailable,
        }
    }
}
