// Tue Jan 13 2026 - Alex

use crate::profile::FieldType;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    pub offset: u64,
    #[serde(rename = "type")]
    pub ty: FieldType,
}

impl FieldDef {
    pub fn new(name: &str, offset: u64, ty: FieldType) -> Self {
        Self {
            name: name.to_string(),
            offset,
            ty,
        }
    }
}

impl fmt::Display for FieldDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ 0x{:x}: {}", self.name, self.offset, self.ty)
    }
}

/// One structure's binary layout: declared size plus fields in declaration
/// order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructLayout {
    name: String,
    #[serde(default)]
    size: Option<u64>,
    #[serde(with = "field_list")]
    fields: IndexMap<String, FieldDef>,
}

impl StructLayout {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            size: None,
            fields: IndexMap::new(),
        }
    }

    pub fn add_field(&mut self, field: FieldDef) {
        self.fields.insert(field.name.clone(), field);
    }

    pub fn set_size(&mut self, size: u64) {
        self.size = Some(size);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> Option<u64> {
        self.size
    }

    pub fn fields(&self) -> impl Iterator<Item = &FieldDef> {
        self.fields.values()
    }

    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.get(name)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }
}

/// Structure-name to layout map for one resolved profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayoutTable {
    types: IndexMap<String, StructLayout>,
}

impl LayoutTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a layout, replacing any earlier one of the same name wholesale.
    pub fn insert(&mut self, layout: StructLayout) {
        self.types.insert(layout.name.clone(), layout);
    }

    /// Applies another table on top of this one.
    pub fn merge(&mut self, other: &LayoutTable) {
        for layout in other.types.values() {
            self.insert(layout.clone());
        }
    }

    pub fn get(&self, name: &str) -> Option<&StructLayout> {
        self.types.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Resolves a dotted member path such as `tasks.next` through embedded
    /// structures. Returns the cumulative offset and the final field.
    pub fn resolve_path(&self, type_name: &str, path: &str) -> Option<(u64, &FieldDef)> {
        let mut layout = self.get(type_name)?;
        let mut offset = 0u64;
        let mut parts = path.split('.').peekable();

        while let Some(part) = parts.next() {
            let field = layout.field(part)?;
            offset = offset.checked_add(field.offset)?;
            if parts.peek().is_none() {
                return Some((offset, field));
            }
            layout = self.get(field.ty.struct_name()?)?;
        }
        None
    }
}

mod field_list {
    use super::FieldDef;
    use indexmap::IndexMap;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(
        fields: &IndexMap<String, FieldDef>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let list: Vec<&FieldDef> = fields.values().collect();
        list.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<IndexMap<String, FieldDef>, D::Error> {
        let list = Vec::<FieldDef>::deserialize(deserializer)?;
        Ok(list.into_iter().map(|f| (f.name.clone(), f)).collect())
    }
}
