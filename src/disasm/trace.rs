//! The control-flow tracer (component E).
//!
//! Walks the code section from every code-typed GLOBAL entry point,
//! marking every byte belonging to a reached instruction as CODE. Bytes
//! never reached by this walk are left as DATA and dumped verbatim by the
//! driver's embedded-data dumper.

use alloc::vec::Vec;

use crate::disasm::opcodes::{self, OpEntry, Page, TargetKind, TraceEffect, SREG_PC};
use crate::read::rof::{ReferenceType, RofFile};

/// Dense per-address classification of the code section: `true` once any
/// byte of a reached instruction covers that address.
#[derive(Debug, Clone)]
pub struct TraceMap {
    bits: Vec<bool>,
}

impl TraceMap {
    fn new(len: usize) -> Self {
        TraceMap {
            bits: alloc::vec![false; len],
        }
    }

    #[inline]
    pub fn is_code(&self, addr: u16) -> bool {
        self.bits.get(addr as usize).copied().unwrap_or(false)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    fn mark(&mut self, addr: u16) {
        if let Some(b) = self.bits.get_mut(addr as usize) {
            *b = true;
        }
    }

    fn mark_run(&mut self, start: u16, count: u16) {
        for i in 0..count {
            self.mark(start.wrapping_add(i));
        }
    }
}

#[derive(Clone, Copy)]
enum Table {
    Base,
    Ten,
    Eleven,
}

struct Tables {
    base: [OpEntry; 256],
    p10: [OpEntry; 256],
    p11: [OpEntry; 256],
}

impl Tables {
    fn entry(&self, table: Table, opcode: u8) -> OpEntry {
        match table {
            Table::Base => self.base[opcode as usize],
            Table::Ten => self.p10[opcode as usize],
            Table::Eleven => self.p11[opcode as usize],
        }
    }
}

/// Sign-extend an 8-bit relative offset and add it to the address
/// following the operand, preserving the source's `offset < 127`
/// threshold rather than the correct `< 128` (spec.md §9, open question 1:
/// offset 127 is misclassified as negative).
pub fn relative_short_target(next_pc: u16, offset: u8) -> u16 {
    if offset < 127 {
        next_pc.wrapping_add(offset as u16)
    } else {
        next_pc.wrapping_sub(256 - offset as u16)
    }
}

/// Sign-extend a 16-bit relative offset, mirroring the same off-by-one
/// class of bug at the top of the positive range (`< 32767` instead of
/// `< 32768`) that the source applies to the 8-bit case.
pub fn relative_long_target(next_pc: u16, offset: u16) -> u16 {
    if offset < 32767 {
        next_pc.wrapping_add(offset)
    } else {
        next_pc.wrapping_sub(65536 - offset as u32 as u16)
    }
}

fn target_of(rof: &RofFile, pc: u16, entry: &OpEntry, kind: TargetKind) -> Option<u16> {
    match kind {
        TargetKind::Relative8 => {
            let offset = *rof.object_code.get(pc as usize + 1)?;
            let next_pc = pc.wrapping_add(entry.byte_count as u16);
            Some(relative_short_target(next_pc, offset))
        }
        TargetKind::Relative16 => {
            let hi = *rof.object_code.get(pc as usize + 1)? as u16;
            let lo = *rof.object_code.get(pc as usize + 2)? as u16;
            let next_pc = pc.wrapping_add(entry.byte_count as u16);
            Some(relative_long_target(next_pc, (hi << 8) | lo))
        }
        TargetKind::Absolute16 => {
            let hi = *rof.object_code.get(pc as usize + 1)? as u16;
            let lo = *rof.object_code.get(pc as usize + 2)? as u16;
            Some((hi << 8) | lo)
        }
    }
}

fn indexed_extra_bytes(rof: &RofFile, pc: u16) -> u16 {
    match rof.object_code.get(pc as usize + 1) {
        Some(postbyte) if postbyte & 0x80 != 0 => {
            opcodes::POST_OP_EXTRA_BYTES[(postbyte & 0x1f) as usize] as u16
        }
        _ => 0,
    }
}

enum Step {
    Continue(u16),
    Stop,
    Redirect(u16),
}

fn step(rof: &RofFile, tables: &Tables, map: &mut TraceMap, pc: u16, table: Table) -> Step {
    let opcode = match rof.object_code.get(pc as usize) {
        Some(b) => *b,
        None => return Step::Stop,
    };
    let entry = tables.entry(table, opcode);

    if let TraceEffect::Page(sel) = entry.trace {
        map.mark(pc);
        let inner_pc = pc.wrapping_add(1);
        if inner_pc as usize >= rof.size_object_code as usize {
            return Step::Stop;
        }
        let inner_table = match sel {
            Page::Ten => Table::Ten,
            Page::Eleven => Table::Eleven,
        };
        return step(rof, tables, map, inner_pc, inner_table);
    }

    let total_len = entry.byte_count as u16 + indexed_extra_bytes(rof, pc) * matches!(entry.trace, TraceEffect::Indexed) as u16;
    map.mark_run(pc, total_len);

    match entry.trace {
        TraceEffect::Generic | TraceEffect::Indexed => Step::Continue(pc.wrapping_add(total_len)),
        TraceEffect::Return => Step::Stop,
        TraceEffect::PullStack => {
            let postbyte = rof.object_code.get(pc as usize + 1).copied().unwrap_or(0);
            if postbyte & SREG_PC != 0 {
                Step::Stop
            } else {
                Step::Continue(pc.wrapping_add(total_len))
            }
        }
        TraceEffect::Branch(kind) => {
            if let Some(target) = target_of(rof, pc, &entry, kind) {
                if (target as usize) < rof.size_object_code as usize {
                    trace_from(rof, tables, map, target);
                }
            }
            Step::Continue(pc.wrapping_add(total_len))
        }
        TraceEffect::Jump(kind) => match target_of(rof, pc, &entry, kind) {
            Some(target) if (target as usize) < rof.size_object_code as usize => {
                if map.is_code(target) {
                    Step::Continue(pc.wrapping_add(total_len))
                } else {
                    Step::Redirect(target)
                }
            }
            _ => Step::Stop,
        },
        TraceEffect::Page(_) => unreachable!("page dispatch handled above"),
    }
}

/// Re-entry guard: if `start` is already marked CODE, this linear scan has
/// already run (or overlaps one that has); stop immediately so recursion
/// terminates at merge points and loops.
fn trace_from(rof: &RofFile, tables: &Tables, map: &mut TraceMap, start: u16) {
    if start as usize >= rof.size_object_code as usize {
        return;
    }
    if map.is_code(start) {
        return;
    }

    let mut pc = start;
    loop {
        if pc as usize >= rof.size_object_code as usize {
            return;
        }
        match step(rof, tables, map, pc, Table::Base) {
            Step::Continue(next) => pc = next,
            Step::Redirect(next) => pc = next,
            Step::Stop => return,
        }
    }
}

/// Run the tracer over a module's object code, returning the populated
/// `trace[]` map.
///
/// Entry points are every GLOBAL reference whose target is code
/// (`CODENT` set); if none exist, address 0 is used (spec.md §4.E).
pub fn trace(rof: &RofFile) -> TraceMap {
    let mut map = TraceMap::new(rof.size_object_code as usize);
    let tables = Tables {
        base: opcodes::base_table(),
        p10: opcodes::page10_table(),
        p11: opcodes::page11_table(),
    };

    let mut entries: Vec<u16> = rof
        .references
        .iter()
        .filter(|r| r.kind == ReferenceType::Global && r.is_code_target())
        .map(|r| r.offset)
        .collect();
    if entries.is_empty() {
        entries.push(0);
    }

    for pc in entries {
        trace_from(&rof, &tables, &mut map, pc);
    }

    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    fn module(code: &[u8], entries: &[u16]) -> RofFile {
        use crate::read::rof::{ReferenceStore, ReferenceType, CODENT};

        let mut refs = ReferenceStore::new();
        for (i, &offset) in entries.iter().enumerate() {
            refs.push(ReferenceType::Global, Some(alloc::format!("e{}", i)), CODENT, offset)
                .unwrap();
        }
        RofFile {
            name: "m".into(),
            filename: "m.r".into(),
            size_object_code: code.len() as u16,
            size_init_data: 0,
            size_uninit_data: 0,
            size_init_dp_data: 0,
            size_uninit_dp_data: 0,
            size_stack: 0,
            exec_entry: 0,
            type_language: 0,
            asm_valid: 0,
            creation_date: [0; 5],
            edition: 0,
            object_code: code.to_vec(),
            init_data: Vec::new(),
            init_dp_data: Vec::new(),
            references: refs,
        }
    }

    #[test]
    fn single_rts_is_code() {
        let rof = module(&[0x39], &[0]);
        let t = trace(&rof);
        assert!(t.is_code(0));
    }

    #[test]
    fn branch_over_data_skips_embedded_bytes() {
        // bra +2; fcb 0,0; rts
        let rof = module(&[0x20, 0x02, 0x00, 0x00, 0x39], &[0]);
        let t = trace(&rof);
        assert!(t.is_code(0) && t.is_code(1));
        assert!(!t.is_code(2) && !t.is_code(3));
        assert!(t.is_code(4));
    }

    #[test]
    fn page10_prefixed_instruction_then_rts() {
        // ldy #$aabb ; rts
        let rof = module(&[0x10, 0x8E, 0xAA, 0xBB, 0x39], &[0]);
        let t = trace(&rof);
        for a in 0..4 {
            assert!(t.is_code(a), "byte {} should be code", a);
        }
        assert!(t.is_code(4));
    }

    #[test]
    fn self_targeting_bra_terminates() {
        // bra $-2 (infinite loop back to itself)
        let rof = module(&[0x20, 0xFE], &[0]);
        let t = trace(&rof);
        assert!(t.is_code(0) && t.is_code(1));
    }

    #[test]
    fn no_globals_starts_at_zero() {
        let rof = module(&[0x39], &[]);
        let t = trace(&rof);
        assert!(t.is_code(0));
    }

    #[test]
    fn out_of_range_branch_target_is_ignored() {
        // lbra way past the end of a 4-byte code section
        let rof = module(&[0x16, 0x7F, 0xFF, 0x39], &[0]);
        let t = trace(&rof);
        assert!(t.is_code(0) && t.is_code(1) && t.is_code(2));
    }
}
