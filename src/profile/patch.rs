// Tue Jan 15 2026 - Alex

use crate::profile::{Architecture, LayoutTable, OsFamily, ProfileError, ProfileMetadata, StructLayout, Version};
use serde::{Deserialize, Serialize};

/// Predicate over profile metadata. Every present constraint must hold.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConditionSet {
    pub os: Option<OsFamily>,
    pub major: Option<u32>,
    pub minor: Option<u32>,
    pub architecture: Option<Architecture>,
    /// Inclusive lower bound on the full version.
    pub min_version: Option<Version>,
    /// Exclusive upper bound on the full version.
    pub max_version: Option<Version>,
}

impl ConditionSet {
    pub fn any() -> Self {
        Self::default()
    }

    pub fn os(mut self, os: OsFamily) -> Self {
        self.os = Some(os);
        self
    }

    pub fn version(mut self, major: u32, minor: u32) -> Self {
        self.major = Some(major);
        self.minor = Some(minor);
        self
    }

    pub fn architecture(mut self, architecture: Architecture) -> Self {
        self.architecture = Some(architecture);
        self
    }

    pub fn since(mut self, version: Version) -> Self {
        self.min_version = Some(version);
        self
    }

    pub fn until(mut self, version: Version) -> Self {
        self.max_version = Some(version);
        self
    }

    pub fn matches(&self, meta: &ProfileMetadata) -> bool {
        self.os.map_or(true, |os| os == meta.os)
            && self.major.map_or(true, |major| major == meta.major)
            && self.minor.map_or(true, |minor| minor == meta.minor)
            && self.architecture.map_or(true, |arch| arch == meta.architecture)
            && self.min_version.map_or(true, |min| meta.version() >= min)
            && self.max_version.map_or(true, |max| meta.version() < max)
    }
}

/// A conditional contribution of structure layouts to a profile.
///
/// `before`/`after` name other patches this one must be applied ahead of or
/// behind when both apply. Later patches replace same-named types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutPatch {
    pub name: String,
    #[serde(default)]
    pub conditions: ConditionSet,
    #[serde(default)]
    pub before: Vec<String>,
    #[serde(default)]
    pub after: Vec<String>,
    #[serde(default)]
    pub types: LayoutTable,
}

impl LayoutPatch {
    pub fn new(name: &str, conditions: ConditionSet) -> Self {
        Self {
            name: name.to_string(),
            conditions,
            before: Vec::new(),
            after: Vec::new(),
            types: LayoutTable::new(),
        }
    }

    pub fn before(mut self, name: &str) -> Self {
        self.before.push(name.to_string());
        self
    }

    pub fn after(mut self, name: &str) -> Self {
        self.after.push(name.to_string());
        self
    }

    pub fn with_type(mut self, layout: StructLayout) -> Self {
        self.types.insert(layout);
        self
    }

    pub fn applies_to(&self, meta: &ProfileMetadata) -> bool {
        self.conditions.matches(meta)
    }

    pub fn from_json(json: &str) -> Result<Self, ProfileError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parses a document holding either one patch or an array of them.
    pub fn load_document(json: &str) -> Result<Vec<Self>, ProfileError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        if value.is_array() {
            Ok(serde_json::from_value(value)?)
        } else {
            Ok(vec![serde_json::from_value(value)?])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conditions_require_all_constraints() {
        let cond = ConditionSet::any()
            .os(OsFamily::Windows)
            .version(6, 1)
            .architecture(Architecture::X64);
        assert!(cond.matches(&ProfileMetadata::windows(6, 1, Architecture::X64)));
        assert!(!cond.matches(&ProfileMetadata::windows(6, 1, Architecture::X86)));
        assert!(!cond.matches(&ProfileMetadata::windows(6, 0, Architecture::X64)));
        assert!(!cond.matches(&ProfileMetadata::linux(6, 1, 0, Architecture::X64)));
    }

    #[test]
    fn test_version_window_is_half_open() {
        let cond = ConditionSet::any()
            .os(OsFamily::Linux)
            .since(Version::new(2, 6, 0))
            .until(Version::new(2, 6, 36));
        assert!(cond.matches(&ProfileMetadata::linux(2, 6, 0, Architecture::X86)));
        assert!(cond.matches(&ProfileMetadata::linux(2, 6, 35, Architecture::X86)));
        assert!(!cond.matches(&ProfileMetadata::linux(2, 6, 36, Architecture::X86)));
    }

    #[test]
    fn test_load_document_accepts_single_and_list() {
        let single = r#"{
            "name": "rtable-direct",
            "conditions": {"os": "linux", "min_version": {"major": 2, "minor": 6, "patch": 36}},
            "after": ["LinuxBase64"],
            "types": {
                "rtable": {
                    "name": "rtable",
                    "size": 256,
                    "fields": [
                        {"name": "dst", "offset": 0, "type": {"struct": "dst_entry"}},
                        {"name": "rt_dst", "offset": 160, "type": {"scalar": "u32"}}
                    ]
                }
            }
        }"#;
        let patches = LayoutPatch::load_document(single).unwrap();
        assert_eq!(patches.len(), 1);
        assert_eq!(patches[0].after, vec!["LinuxBase64".to_string()]);
        let rtable = patches[0].types.get("rtable").unwrap();
        assert_eq!(rtable.field("rt_dst").unwrap().offset, 160);

        let list = format!("[{}, {}]", single, single.replace("rtable-direct", "second"));
        assert_eq!(LayoutPatch::load_document(&list).unwrap().len(), 2);
        assert!(LayoutPatch::load_document("{").is_err());
    }
}
