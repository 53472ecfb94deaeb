// Tue Jan 13 2026 - Alex

use crate::profile::LayoutTable;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fixed-width scalars. `ULong`/`Long` follow the profile's native word size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalarKind {
    U8,
    U16,
    U32,
    U64,
    I8,
    I16,
    I32,
    I64,
    ULong,
    Long,
}

impl ScalarKind {
    pub fn size(self, pointer_size: u64) -> u64 {
        match self {
            Self::U8 | Self::I8 => 1,
            Self::U16 | Self::I16 => 2,
            Self::U32 | Self::I32 => 4,
            Self::U64 | Self::I64 => 8,
            Self::ULong | Self::Long => pointer_size,
        }
    }

    pub fn is_signed(self) -> bool {
        matches!(self, Self::I8 | Self::I16 | Self::I32 | Self::I64 | Self::Long)
    }
}

/// Element count of an array field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArrayCount {
    Fixed(u64),
    /// Read from a sibling scalar field when the array is constructed.
    Field(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Scalar(ScalarKind),
    Pointer(Box<FieldType>),
    Struct(String),
    Array {
        element: Box<FieldType>,
        count: ArrayCount,
    },
    Void,
}

impl FieldType {
    pub fn scalar(kind: ScalarKind) -> Self {
        Self::Scalar(kind)
    }

    pub fn pointer_to(target: FieldType) -> Self {
        Self::Pointer(Box::new(target))
    }

    pub fn pointer_to_struct(name: &str) -> Self {
        Self::Pointer(Box::new(Self::Struct(name.to_string())))
    }

    pub fn struct_named(name: &str) -> Self {
        Self::Struct(name.to_string())
    }

    pub fn array(element: FieldType, count: u64) -> Self {
        Self::Array {
            element: Box::new(element),
            count: ArrayCount::Fixed(count),
        }
    }

    pub fn counted_array(element: FieldType, count_field: &str) -> Self {
        Self::Array {
            element: Box::new(element),
            count: ArrayCount::Field(count_field.to_string()),
        }
    }

    pub fn char_array(len: u64) -> Self {
        Self::array(Self::Scalar(ScalarKind::U8), len)
    }

    /// Static size in bytes. `None` for unsized shapes: `void`, structs with
    /// no declared size and arrays whose count lives in memory.
    pub fn size(&self, table: &LayoutTable, pointer_size: u64) -> Option<u64> {
        match self {
            Self::Scalar(kind) => Some(kind.size(pointer_size)),
            Self::Pointer(_) => Some(pointer_size),
            Self::Struct(name) => table.get(name)?.size(),
            Self::Array { element, count: ArrayCount::Fixed(count) } => {
                element.size(table, pointer_size)?.checked_mul(*count)
            }
            Self::Array { .. } | Self::Void => None,
        }
    }

    pub fn is_pointer(&self) -> bool {
        matches!(self, Self::Pointer(_))
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self, Self::Scalar(_))
    }

    pub fn struct_name(&self) -> Option<&str> {
        match self {
            Self::Struct(name) => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(kind) => write!(f, "{:?}", kind),
            Self::Pointer(inner) => write!(f, "*{}", inner),
            Self::Struct(name) => write!(f, "struct {}", name),
            Self::Array { element, count: ArrayCount::Fixed(n) } => write!(f, "[{}; {}]", element, n),
            Self::Array { element, count: ArrayCount::Field(field) } => {
                write!(f, "[{}; .{}]", element, field)
            }
            Self::Void => write!(f, "void"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::StructBuilder;

    #[test]
    fn test_sizes_follow_pointer_width() {
        let table = LayoutTable::new();
        assert_eq!(FieldType::scalar(ScalarKind::ULong).size(&table, 4), Some(4));
        assert_eq!(FieldType::scalar(ScalarKind::ULong).size(&table, 8), Some(8));
        assert_eq!(FieldType::pointer_to(FieldType::Void).size(&table, 4), Some(4));
        assert_eq!(FieldType::char_array(16).size(&table, 8), Some(16));
        assert_eq!(
            FieldType::counted_array(FieldType::scalar(ScalarKind::U32), "n").size(&table, 8),
            None
        );
    }

    #[test]
    fn test_struct_size_comes_from_table() {
        let mut table = LayoutTable::new();
        table.insert(StructBuilder::new("pair").size(0x10).build());
        assert_eq!(FieldType::array(FieldType::struct_named("pair"), 3).size(&table, 8), Some(0x30));
        assert_eq!(FieldType::struct_named("missing").size(&table, 8), None);
    }

    #[test]
    fn test_json_shape() {
        let ty: FieldType =
            serde_json::from_str(r#"{"pointer": {"struct": "task_struct"}}"#).unwrap();
        assert_eq!(ty, FieldType::pointer_to_struct("task_struct"));
        let ty: FieldType = serde_json::from_str(
            r#"{"array": {"element": {"scalar": "u8"}, "count": {"field": "Length"}}}"#,
        )
        .unwrap();
        assert_eq!(ty, FieldType::counted_array(FieldType::scalar(ScalarKind::U8), "Length"));
    }
}
