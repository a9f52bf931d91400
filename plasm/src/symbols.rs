use std::collections::HashMap;

/// Operand slot a forward reference has to be patched into.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PatchSlot {
    Dst,
    Src,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct UnresolvedRef {
    pub name: String,
    pub instr_index: usize,
    pub slot: PatchSlot,
}

/// Compilation-scoped mapping from label name to address, plus the queue of
/// references that could not be resolved during the first pass.
///
/// Owned by one parser instance; label names are case-sensitive and a
/// duplicate definition overwrites the previous one.
#[derive(Default)]
pub struct SymbolTable {
    resolved: HashMap<String, u64>,
    unresolved: Vec<UnresolvedRef>,
}

impl SymbolTable {
    pub fn new() -> SymbolTable {
        Default::default()
    }

    pub fn put(&mut self, name: &str, offset: u64) {
        self.resolved.insert(name.to_string(), offset);
    }

    pub fn get(&self, name: &str) -> Option<u64> {
        self.resolved.get(name).copied()
    }

    pub fn add_unresolved(&mut self, name: &str, instr_index: usize, slot: PatchSlot) {
        self.unresolved.push(UnresolvedRef {
            name: name.to_string(),
            instr_index,
            slot,
        });
    }

    pub fn take_unresolved(&mut self) -> Vec<UnresolvedRef> {
        std::mem::replace(&mut self.unresolved, Vec::new())
    }
}
