// Fri Jan 17 2026 - Alex

use crate::memory::{Address, MemoryRange};
use crate::profile::Profile;
use crate::recon::ReconError;
use crate::view::TypedView;
use std::collections::HashMap;

/// A loaded module's name and code span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleRange {
    pub name: String,
    pub range: MemoryRange,
}

impl ModuleRange {
    pub fn new(name: &str, start: Address, end: Address) -> Option<Self> {
        Some(Self {
            name: name.to_string(),
            range: MemoryRange::new(start, end)?,
        })
    }
}

/// Decides whether code addresses belong to the kernel image or a loaded
/// module. Answers are memoised for the life of the checker, so create one
/// per analysis.
pub struct KnownAddressChecker {
    text: MemoryRange,
    modules: Vec<ModuleRange>,
    memo: HashMap<u64, bool>,
}

impl KnownAddressChecker {
    pub fn new(profile: &Profile, modules: Vec<ModuleRange>) -> Result<Self, ReconError> {
        let symbol = |name: &str| {
            profile
                .symbols()
                .kernel(name)
                .ok_or_else(|| ReconError::MissingSymbol(name.to_string()))
        };
        let (text, etext) = (symbol("_text")?, symbol("_etext")?);
        let text = MemoryRange::new(text, etext).ok_or_else(|| ReconError::MissingSymbol("_etext".to_string()))?;
        log::debug!("kernel text {}, {} modules", text, modules.len());
        Ok(Self {
            text,
            modules,
            memo: HashMap::new(),
        })
    }

    pub fn is_known(&mut self, addr: Address) -> bool {
        if let Some(&known) = self.memo.get(&addr.as_u64()) {
            return known;
        }
        let known = self.text.contains(addr) || self.modules.iter().any(|m| m.range.contains(addr));
        self.memo.insert(addr.as_u64(), known);
        known
    }

    /// Module owning `addr`, if any.
    pub fn module_of(&self, addr: Address) -> Option<&ModuleRange> {
        self.modules.iter().find(|m| m.range.contains(addr))
    }

    pub fn memoized(&self) -> usize {
        self.memo.len()
    }

    /// Members of an operations table that point outside known code.
    /// Null and unreadable members are skipped.
    pub fn verify_ops<'s>(
        &'s mut self,
        ops: TypedView<'s>,
        members: &'s [&'s str],
    ) -> impl Iterator<Item = (String, Address)> + 's {
        members.iter().filter_map(move |&member| {
            let addr = ops.read_uint(member).filter(|&a| a != 0).map(Address::new)?;
            if self.is_known(addr) {
                None
            } else {
                log::debug!("{}.{} -> {} outside known code", ops.type_name(), member, addr);
                Some((member.to_string(), addr))
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::SymbolTable;
    use crate::testing::{linux_profile, ImageBuilder};

    const TEXT: u64 = 0xffff_ffff_8100_0000;
    const ETEXT: u64 = 0xffff_ffff_8160_0000;

    fn symbols() -> SymbolTable {
        SymbolTable::new()
            .with_kernel_symbol("_text", TEXT)
            .with_kernel_symbol("_etext", ETEXT)
    }

    fn modules() -> Vec<ModuleRange> {
        vec![ModuleRange::new("ext4", Address::new(0xffff_ffff_a000_0000), Address::new(0xffff_ffff_a001_0000)).unwrap()]
    }

    #[test]
    fn test_known_ranges_and_memo() {
        let profile = linux_profile(symbols());
        let mut checker = KnownAddressChecker::new(&profile, modules()).unwrap();

        assert!(checker.is_known(Address::new(TEXT)));
        assert!(!checker.is_known(Address::new(ETEXT)));
        assert!(checker.is_known(Address::new(0xffff_ffff_a000_8000)));
        assert!(!checker.is_known(Address::new(0xdead_0000)));
        assert!(checker.is_known(Address::new(TEXT)));
        assert_eq!(checker.memoized(), 4);
        assert_eq!(checker.module_of(Address::new(0xffff_ffff_a000_8000)).map(|m| m.name.as_str()), Some("ext4"));
    }

    #[test]
    fn test_verify_ops_reports_foreign_pointers() {
        let profile = linux_profile(symbols());
        let mut image = ImageBuilder::new();
        let ops = image.alloc(0x18);
        image.write_u64(ops, TEXT + 0x100);
        image.write_u64(ops + 0x10, 0x4141_0000);
        let source = image.source();

        let mut checker = KnownAddressChecker::new(&profile, modules()).unwrap();
        let view = profile.view("file_operations", ops, &source);
        let members = ["open", "read", "write", "llseek"];
        let hooked: Vec<(String, Address)> = checker.verify_ops(view, &members).collect();
        assert_eq!(hooked, vec![("write".to_string(), Address::new(0x4141_0000))]);
    }

    #[test]
    fn test_requires_text_symbols() {
        let profile = linux_profile(SymbolTable::new());
        assert!(matches!(
            KnownAddressChecker::new(&profile, Vec::new()),
            Err(ReconError::MissingSymbol(_))
        ));
    }
}
