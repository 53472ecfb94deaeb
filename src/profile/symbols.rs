// Wed Jan 15 2026 - Alex

use crate::memory::Address;
use crate::profile::ProfileError;
use std::collections::HashMap;
use std::io::BufRead;

pub const KERNEL_MODULE: &str = "kernel";

/// Symbol addresses grouped by owning module (`kernel` or a module name).
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    modules: HashMap<String, HashMap<String, u64>>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, module: &str, name: &str, address: u64) {
        self.modules
            .entry(module.to_string())
            .or_default()
            .insert(name.to_string(), address);
    }

    pub fn with_kernel_symbol(mut self, name: &str, address: u64) -> Self {
        self.insert(KERNEL_MODULE, name, address);
        self
    }

    pub fn lookup(&self, name: &str, module: &str) -> Option<Address> {
        self.modules
            .get(module)?
            .get(name)
            .copied()
            .filter(|&addr| addr != 0)
            .map(Address::new)
    }

    pub fn kernel(&self, name: &str) -> Option<Address> {
        self.lookup(name, KERNEL_MODULE)
    }

    /// Per-CPU variables were renamed from `per_cpu__<name>` to `<name>` in
    /// 2.6.3x; both spellings are accepted.
    pub fn per_cpu(&self, name: &str, module: &str) -> Option<Address> {
        self.lookup(name, module)
            .or_else(|| self.lookup(&format!("per_cpu__{}", name), module))
    }

    pub fn len(&self) -> usize {
        self.modules.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Loads `System.map`/kallsyms lines (`<hex addr> <type> <name> [module]`).
    /// Zero addresses and malformed lines are skipped. Returns the number of
    /// symbols added.
    pub fn load_system_map<R: BufRead>(&mut self, reader: R) -> Result<usize, ProfileError> {
        let mut added = 0;
        for line in reader.lines() {
            let line = line?;
            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.len() < 3 || parts[1].len() != 1 {
                continue;
            }
            let Ok(address) = u64::from_str_radix(parts[0].trim_start_matches("0x"), 16) else {
                continue;
            };
            if address == 0 {
                continue;
            }
            let module = parts
                .get(3)
                .map(|m| m.trim_start_matches('[').trim_end_matches(']'))
                .unwrap_or(KERNEL_MODULE);
            self.insert(module, parts[2], address);
            added += 1;
        }
        log::debug!("loaded {} symbols", added);
        Ok(added)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_map_parsing() {
        let map = "\
ffffffff81000000 T _text
ffffffff81600000 T _etext
0000000000000000 A VDSO32_PRELINK
ffffffff81a0d020 D init_task
garbage line
ffffffffa0001000 t ext4_fill_super [ext4]
";
        let mut table = SymbolTable::new();
        let added = table.load_system_map(map.as_bytes()).unwrap();
        assert_eq!(added, 4);
        assert_eq!(table.kernel("init_task"), Some(Address::new(0xffffffff81a0d020)));
        assert_eq!(table.kernel("VDSO32_PRELINK"), None);
        assert_eq!(
            table.lookup("ext4_fill_super", "ext4"),
            Some(Address::new(0xffffffffa0001000))
        );
    }

    #[test]
    fn test_per_cpu_fallback() {
        let table = SymbolTable::new().with_kernel_symbol("per_cpu__runqueues", 0x1000);
        assert_eq!(table.per_cpu("runqueues", KERNEL_MODULE), Some(Address::new(0x1000)));

        let table = table.with_kernel_symbol("runqueues", 0x2000);
        assert_eq!(table.per_cpu("runqueues", KERNEL_MODULE), Some(Address::new(0x2000)));
    }
}
