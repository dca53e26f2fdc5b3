//! The label classifier (component F).
//!
//! Pre-populates three boolean maps — code/data/bss — from a module's
//! reference list, so the emitter knows which addresses need a label
//! before it ever looks at an instruction. Each map lives in its own
//! address space: `code[]` over the object-code bytes, `data[]` over the
//! initialized-data bytes, `bss[]` over the (unstored) uninitialized-data
//! range.

use alloc::vec;
use alloc::vec::Vec;

use crate::read::rof::{Reference, ReferenceType, RofFile};

/// The three boolean "this address is referenced" maps, plus the code map
/// the emitter extends at emission time (spec.md §4.F, final paragraph).
#[derive(Debug, Clone)]
pub struct ClassifyMaps {
    code: Vec<bool>,
    data: Vec<bool>,
    bss: Vec<bool>,
}

impl ClassifyMaps {
    pub fn new(rof: &RofFile) -> Self {
        let mut maps = ClassifyMaps {
            code: vec![false; rof.size_object_code as usize],
            data: vec![false; rof.size_init_data as usize],
            bss: vec![false; rof.size_uninit_data as usize],
        };
        maps.stamp(rof);
        maps
    }

    pub fn is_code(&self, addr: u16) -> bool {
        self.code.get(addr as usize).copied().unwrap_or(false)
    }

    pub fn is_data(&self, addr: u16) -> bool {
        self.data.get(addr as usize).copied().unwrap_or(false)
    }

    pub fn is_bss(&self, addr: u16) -> bool {
        self.bss.get(addr as usize).copied().unwrap_or(false)
    }

    /// Mark `addr` as code-labeled. Exposed so the emitter can stamp
    /// targets reached only through an operand (spec.md §4.F, last line).
    pub fn mark_code(&mut self, addr: u16) {
        if let Some(b) = self.code.get_mut(addr as usize) {
            *b = true;
        }
    }

    fn mark_data(&mut self, addr: u16) {
        if let Some(b) = self.data.get_mut(addr as usize) {
            *b = true;
        }
    }

    fn mark_bss(&mut self, addr: u16) {
        if let Some(b) = self.bss.get_mut(addr as usize) {
            *b = true;
        }
    }

    /// Stamp the maps by walking every reference in the module once.
    fn stamp(&mut self, rof: &RofFile) {
        for r in rof.references.iter() {
            match r.kind {
                ReferenceType::Global => self.stamp_entity(r.flag, r.offset),
                ReferenceType::Local if r.is_code_location() => {
                    if let Some(target) = rof.code_word(r.offset) {
                        self.stamp_entity(r.flag, target);
                    }
                }
                ReferenceType::Local => {
                    if let Some(target) = rof.data_word(r.offset) {
                        self.stamp_entity(r.flag, target);
                    }
                }
                ReferenceType::External => {}
            }
        }
    }

    /// Stamp one address per a reference's CODENT/INIENT bits, shared by
    /// the GLOBAL and LOCAL stamping paths.
    fn stamp_entity(&mut self, flag: u8, addr: u16) {
        use crate::read::rof::{CODENT, INIENT};
        if flag & CODENT != 0 {
            self.mark_code(addr);
        } else if flag & INIENT != 0 {
            self.mark_data(addr);
        } else {
            self.mark_bss(addr);
        }
    }
}

/// Find the earliest LOCAL, data-location reference at `addr` in the
/// initialized-data section (spec.md §4.H embedded-data dumper: used to
/// tell an `fdb` label run apart from raw bytes).
pub fn find_local_data_ref(rof: &RofFile, addr: u16) -> Option<&Reference> {
    rof.references
        .iter()
        .find(|r| r.kind == ReferenceType::Local && r.offset == addr && !r.is_code_location())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::read::rof::{ReferenceStore, CODENT, INIENT};
    use alloc::vec::Vec;

    fn rof_with(refs: ReferenceStore, code: Vec<u8>, init_data: Vec<u8>) -> RofFile {
        RofFile {
            name: "m".into(),
            filename: "m.r".into(),
            size_object_code: code.len() as u16,
            size_init_data: init_data.len() as u16,
            size_uninit_data: 4,
            size_init_dp_data: 0,
            size_uninit_dp_data: 0,
            size_stack: 0,
            exec_entry: 0,
            type_language: 0,
            asm_valid: 0,
            creation_date: [0; 5],
            edition: 0,
            object_code: code,
            init_data,
            init_dp_data: Vec::new(),
            references: refs,
        }
    }

    #[test]
    fn global_code_export_marks_code_map() {
        let mut refs = ReferenceStore::new();
        refs.push(ReferenceType::Global, Some("m".into()), CODENT, 0).unwrap();
        let rof = rof_with(refs, vec![0x39], Vec::new());
        let maps = ClassifyMaps::new(&rof);
        assert!(maps.is_code(0));
    }

    #[test]
    fn global_bss_export_marks_bss_map() {
        let mut refs = ReferenceStore::new();
        refs.push(ReferenceType::Global, Some("v".into()), 0, 2).unwrap();
        let rof = rof_with(refs, vec![0x39], Vec::new());
        let maps = ClassifyMaps::new(&rof);
        assert!(maps.is_bss(2));
    }

    #[test]
    fn local_code_location_resolves_through_code_word() {
        use crate::read::rof::CODLOC;
        let mut refs = ReferenceStore::new();
        // word at code[2..4] = 0x1234, pointing at data (no CODENT, INIENT set)
        refs.push(ReferenceType::Local, None, CODLOC | INIENT, 2).unwrap();
        let rof = rof_with(refs, vec![0x39, 0x39, 0x12, 0x34], Vec::new());
        let maps = ClassifyMaps::new(&rof);
        assert!(maps.is_data(0x1234));
    }

    #[test]
    fn local_data_location_resolves_through_data_word() {
        let mut refs = ReferenceStore::new();
        refs.push(ReferenceType::Local, None, CODENT, 0).unwrap();
        let rof = rof_with(refs, Vec::new(), vec![0x00, 0x10]);
        let maps = ClassifyMaps::new(&rof);
        assert!(maps.is_code(0x0010));
    }

    #[test]
    fn external_reference_does_not_stamp() {
        let mut refs = ReferenceStore::new();
        refs.push(ReferenceType::External, Some("x".into()), 0x80, 5).unwrap();
        let rof = rof_with(refs, vec![0; 8], Vec::new());
        let maps = ClassifyMaps::new(&rof);
        assert!(!maps.is_code(5) && !maps.is_data(5) && !maps.is_bss(5));
    }
}
