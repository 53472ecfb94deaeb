// Wed Jan 15 2026 - Alex

use crate::memory::{Address, ByteSource};
use crate::profile::{ArrayCount, FieldType, Profile};
use crate::view::{LazyArray, Pointer, TypedView};

/// The decoded content of a field. Reads that fail come back as
/// `Unavailable` rather than an error; callers check before use.
#[derive(Debug, Clone)]
pub enum FieldValue<'a> {
    Uint(u64),
    Int(i64),
    Pointer(Pointer<'a>),
    Struct(TypedView<'a>),
    Array(LazyArray<'a>),
    Unavailable,
}

impl<'a> FieldValue<'a> {
    pub fn is_available(&self) -> bool {
        !matches!(self, Self::Unavailable)
    }

    /// Integer content of a scalar, or the raw value of a pointer.
    pub fn as_uint(&self) -> Option<u64> {
        match self {
            Self::Uint(v) => Some(*v),
            Self::Int(v) => Some(*v as u64),
            Self::Pointer(p) => Some(p.address().as_u64()),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            Self::Uint(v) => Some(*v as i64),
            Self::Pointer(p) => Some(p.address().as_u64() as i64),
            _ => None,
        }
    }

    pub fn into_pointer(self) -> Option<Pointer<'a>> {
        match self {
            Self::Pointer(p) => Some(p),
            _ => None,
        }
    }

    pub fn into_struct(self) -> Option<TypedView<'a>> {
        match self {
            Self::Struct(v) => Some(v),
            _ => None,
        }
    }

    pub fn into_array(self) -> Option<LazyArray<'a>> {
        match self {
            Self::Array(a) => Some(a),
            _ => None,
        }
    }
}

/// Decodes a value of type `ty` at `addr`. `owner` is the structure the
/// field sits in; it supplies the count for arrays sized by a sibling field.
pub fn value_at<'a>(
    profile: &'a Profile,
    source: &'a dyn ByteSource,
    addr: Address,
    ty: &FieldType,
    owner: Option<&TypedView<'a>>,
) -> FieldValue<'a> {
    let endian = profile.endianness();
    match ty {
        FieldType::Scalar(kind) => {
            let width = kind.size(profile.pointer_size()) as usize;
            if kind.is_signed() {
                source
                    .read_int(addr, width, endian)
                    .map(FieldValue::Int)
                    .unwrap_or(FieldValue::Unavailable)
            } else {
                source
                    .read_uint(addr, width, endian)
                    .map(FieldValue::Uint)
                    .unwrap_or(FieldValue::Unavailable)
            }
        }
        FieldType::Pointer(target) => {
            match source.read_uint(addr, profile.pointer_size() as usize, endian) {
                Ok(raw) => FieldValue::Pointer(Pointer::new(
                    profile,
                    source,
                    Address::new(raw),
                    (**target).clone(),
                )),
                Err(e) => {
                    log::trace!("pointer at {} unavailable: {}", addr, e);
                    FieldValue::Unavailable
                }
            }
        }
        FieldType::Struct(name) => FieldValue::Struct(TypedView::new(profile, name, addr, source)),
        FieldType::Array { element, count } => {
            let count = match count {
                ArrayCount::Fixed(n) => Some(*n),
                ArrayCount::Field(field) => owner
                    .and_then(|o| o.read_int(field))
                    .and_then(|n| u64::try_from(n).ok()),
            };
            count
                .and_then(|n| LazyArray::new(profile, source, (**element).clone(), addr, n))
                .map(FieldValue::Array)
                .unwrap_or(FieldValue::Unavailable)
        }
        FieldType::Void => FieldValue::Unavailable,
    }
}
