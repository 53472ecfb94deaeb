// Wed Jan 15 2026 - Alex

use crate::profile::{Architecture, ConditionSet, FieldType, LayoutPatch, OsFamily, ScalarKind, StructBuilder};

pub const BASE_32: &str = "LinuxBase32";
pub const BASE_64: &str = "LinuxBase64";

/// Word-size dependent generic kernel types that never change between
/// kernel builds.
pub fn patches() -> Vec<LayoutPatch> {
    vec![
        base(BASE_32, Architecture::X86),
        base(BASE_64, Architecture::X64),
    ]
}

fn base(name: &str, architecture: Architecture) -> LayoutPatch {
    let word = architecture.pointer_size();
    let conditions = ConditionSet::any()
        .os(OsFamily::Linux)
        .architecture(architecture);

    LayoutPatch::new(name, conditions)
        .with_type(
            StructBuilder::new("list_head")
                .size(word * 2)
                .field("next", 0, FieldType::pointer_to_struct("list_head"))
                .field("prev", word, FieldType::pointer_to_struct("list_head"))
                .build(),
        )
        .with_type(
            StructBuilder::new("hlist_node")
                .size(word * 2)
                .field("next", 0, FieldType::pointer_to_struct("hlist_node"))
                .field("pprev", word, FieldType::pointer_to(FieldType::pointer_to_struct("hlist_node")))
                .build(),
        )
        .with_type(
            StructBuilder::new("timespec")
                .size(word * 2)
                .field("tv_sec", 0, FieldType::scalar(ScalarKind::Long))
                .field("tv_nsec", word, FieldType::scalar(ScalarKind::Long))
                .build(),
        )
}
