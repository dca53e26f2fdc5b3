//! The disassembler engine: opcode tables, tracer, label classifier,
//! emitter, and the driver that ties them together (spec.md components
//! D-H).
//!
//! [`disassemble`] is the entry point: given a loaded [`RofFile`], it
//! runs the tracer once, then the two-pass emitter (`Pass::Dry` to
//! discover forward code labels from PC-relative/extended operands,
//! `Pass::Real` to commit the final text), and returns one module's
//! complete assembly listing including its `psect`/`vsect` framing.

pub mod classify;
pub mod emit;
pub mod opcodes;
pub mod os9calls;
pub mod trace;

use alloc::format;
use alloc::string::String;

use crate::disasm::classify::ClassifyMaps;
use crate::disasm::emit::{DataKind, Emitter, Pass};
use crate::disasm::opcodes::{base_table, page10_table, page11_table, OpEntry, Page, TraceEffect};
use crate::disasm::trace::{trace as run_trace, TraceMap};
use crate::read::rof::RofFile;

struct Tables {
    base: [OpEntry; 256],
    p10: [OpEntry; 256],
    p11: [OpEntry; 256],
}

impl Tables {
    fn new() -> Self {
        Tables {
            base: base_table(),
            p10: page10_table(),
            p11: page11_table(),
        }
    }
}

/// Disassemble one loaded module, returning its full assembly listing
/// (spec.md §4.H: the disassembler driver).
pub fn disassemble(rof: &RofFile) -> String {
    let trace_map = run_trace(rof);
    let mut maps = ClassifyMaps::new(rof);
    let tables = Tables::new();

    // Pass 1 (dry run): decode the whole code section without emitting
    // any text, purely so extended/relative operands stamp `code[]` with
    // targets reached only through an operand (spec.md §4.F, last line;
    // §4.G, "Pass-gated emitter").
    walk_code(rof, &trace_map, &mut maps, &tables, Pass::Dry);

    #[cfg(feature = "std")]
    log::info!("disassembling module '{}'", rof.name);

    let mut out = format!("\n*\n*\t{}\n*\n*\n", rof.name);
    out.push_str("*\n");
    out.push_str(&format!("\tpsect {}\n", rof.name));
    out.push_str("*\n*\n\tvsect\n");

    out.push_str(&dump_uninit_data(rof, &mut maps));
    out.push_str(&dump_init_data(rof, &trace_map, &mut maps));

    out.push_str(&walk_code(rof, &trace_map, &mut maps, &tables, Pass::Real));

    out.push_str("*\n\tendsect\n");
    out
}

/// Walks every byte of the code section once, alternating between
/// decoded-instruction lines and runs of embedded data (spec.md §4.H
/// step 2-3; mirrors the original's `DisasmDecode` loop). Returns the
/// rendered text; empty on a dry pass.
fn walk_code(
    rof: &RofFile,
    trace_map: &TraceMap,
    maps: &mut ClassifyMaps,
    tables: &Tables,
    pass: Pass,
) -> String {
    let mut emitter = Emitter::new(rof, trace_map, maps, pass);
    let max = rof.size_object_code;
    let mut pc: u16 = 0;

    while pc < max {
        if trace_map.is_code(pc) {
            let opcode = rof.object_code[pc as usize];
            let base_entry = tables.base[opcode as usize];

            let consumed = if let TraceEffect::Page(page) = base_entry.trace {
                let inner_pc = pc.wrapping_add(1);
                if (inner_pc as usize) < rof.object_code.len() {
                    let inner_opcode = rof.object_code[inner_pc as usize];
                    let inner_entry = match page {
                        Page::Ten => tables.p10[inner_opcode as usize],
                        Page::Eleven => tables.p11[inner_opcode as usize],
                    };
                    emitter.instruction_prefixed(pc, inner_pc, &inner_entry)
                } else {
                    1
                }
            } else {
                emitter.instruction(pc, &base_entry)
            };

            emitter.text("\n");
            pc = pc.wrapping_add(consumed.max(1));
        } else {
            let start = pc;
            let mut count: u16 = 0;
            while pc < max && !trace_map.is_code(pc) {
                count += 1;
                pc = pc.wrapping_add(1);
            }
            emitter.text("*\n");
            emitter.data_run(start, count, DataKind::Code);
            emitter.text("*\n");
        }
    }

    emitter.into_text()
}

/// Dumps the uninitialized-data (bss) section as `rmb` runs, one run per
/// labeled starting address (spec.md §4.H, "BSS dumper"; mirrors
/// `DisasmDumpData`'s first half).
///
/// Every bss address always gets a `U%04X` label regardless of whether a
/// GLOBAL export names it — the original's `GenBaseLabel(..., LABBSS,
/// ...)` never consults a reference's symbol for this label kind.
fn dump_uninit_data(rof: &RofFile, maps: &mut ClassifyMaps) -> String {
    if rof.size_uninit_data == 0 {
        return String::new();
    }

    let mut out = format!("*\n* Uninitialized data (${:04X})\n*\n", rof.size_uninit_data);
    out.push_str("\tvsect\n");

    let max = rof.size_uninit_data;
    let mut loc: u16 = 0;
    while loc < max {
        if maps.is_bss(loc) {
            let label = loc;
            let mut size: u16 = 0;
            loop {
                size += 1;
                loc = loc.wrapping_add(1);
                if !(loc < max && !maps.is_bss(loc)) {
                    break;
                }
            }
            out.push_str(&format!("{:04X}:\tU{:04X}\trmb\t${:x}\n", label, label, size));
        } else {
            loc = loc.wrapping_add(1);
        }
    }

    out.push_str("\tendsect\n*\n");
    out
}

/// Dumps the initialized-data section as `fcb`/`fcc`/`fdb` lines (spec.md
/// §4.H, "Embedded-data dumper"; mirrors `DisasmDumpData`'s second half,
/// which is just the shared `DumpData` routine over the whole section).
fn dump_init_data(rof: &RofFile, trace_map: &TraceMap, maps: &mut ClassifyMaps) -> String {
    if rof.size_init_data == 0 {
        return String::new();
    }

    let mut out = format!("*\n* Initialized data (${:04x})\n*\n", rof.size_init_data);
    out.push_str("\tvsect\n");

    let mut emitter = Emitter::new(rof, trace_map, maps, Pass::Real);
    emitter.data_run(0, rof.size_init_data, DataKind::InitData);
    out.push_str(&emitter.into_text());

    out.push_str("\tendsect\n");
    out.push_str("*\n*\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::read::rof::{ReferenceStore, ReferenceType, CODENT, CODLOC, INIENT};
    use alloc::vec::Vec;

    fn module(
        name: &str,
        code: &[u8],
        init_data: &[u8],
        uninit_data: u16,
        refs: ReferenceStore,
    ) -> RofFile {
        RofFile {
            name: name.into(),
            filename: "m.r".into(),
            size_object_code: code.len() as u16,
            size_init_data: init_data.len() as u16,
            size_uninit_data: uninit_data,
            size_init_dp_data: 0,
            size_uninit_dp_data: 0,
            size_stack: 0,
            exec_entry: 0,
            type_language: 0,
            asm_valid: 0,
            creation_date: [0; 5],
            edition: 0,
            object_code: code.to_vec(),
            init_data: init_data.to_vec(),
            init_dp_data: Vec::new(),
            references: refs,
        }
    }

    #[test]
    fn single_rts_scenario() {
        // spec.md §8 scenario 1: one RTS, one GLOBAL code export "m".
        let mut refs = ReferenceStore::new();
        refs.push(ReferenceType::Global, Some("m".into()), CODENT, 0).unwrap();
        let rof = module("m", &[0x39], &[], 0, refs);
        let out = disassemble(&rof);
        assert!(out.contains("m:"));
        assert!(out.contains("rts"));
        assert!(out.contains("psect m"));
        assert!(out.contains("endsect"));
    }

    #[test]
    fn branch_over_data_scenario() {
        // spec.md §8 scenario 2: bra +2; fcb 0,0; rts.
        let mut refs = ReferenceStore::new();
        refs.push(ReferenceType::Global, Some("m".into()), CODENT, 0).unwrap();
        let rof = module("m", &[0x20, 0x02, 0x00, 0x00, 0x39], &[], 0, refs);
        let out = disassemble(&rof);
        assert!(out.contains("bra"));
        assert!(out.contains("fcb\t$00,$00"));
        assert!(out.contains("rts"));
    }

    #[test]
    fn indexed_word_offset_to_label_scenario() {
        // spec.md §8 scenario 3: lda >I1234,x; rts, with a DATA label at
        // 0x1234 named by a LOCAL reference pointing into the code word.
        let mut refs = ReferenceStore::new();
        refs.push(ReferenceType::Global, Some("m".into()), CODENT, 0).unwrap();
        // The two-byte word operand at code[2..4] is 0x1234; the LOCAL
        // reference at that code offset marks it a data-pointing fixup.
        refs.push(ReferenceType::Local, None, CODLOC | INIENT, 2).unwrap();
        let rof = module("m", &[0xA6, 0x89, 0x12, 0x34, 0x39], &[], 0, refs);
        let out = disassemble(&rof);
        assert!(out.contains("lda"));
        assert!(out.contains("I1234"));
    }

    #[test]
    fn page10_prefix_scenario() {
        // spec.md §8 scenario 4: ldy #$aabb ; rts.
        let mut refs = ReferenceStore::new();
        refs.push(ReferenceType::Global, Some("m".into()), CODENT, 0).unwrap();
        let rof = module("m", &[0x10, 0x8E, 0xAA, 0xBB, 0x39], &[], 0, refs);
        let out = disassemble(&rof);
        assert!(out.contains("0000:"));
        assert!(out.contains("ldy"));
        assert!(out.contains("#$aabb"));
        assert!(out.contains("rts"));
    }

    #[test]
    fn os9_syscall_scenario() {
        // spec.md §8 scenario 5: swi2 ; F$Link (service 0).
        let mut refs = ReferenceStore::new();
        refs.push(ReferenceType::Global, Some("m".into()), CODENT, 0).unwrap();
        let rof = module("m", &[0x10, 0x3F, 0x00, 0x39], &[], 0, refs);
        let out = disassemble(&rof);
        assert!(out.contains("F$Link"));
        assert!(out.contains("Link to Module"));
    }

    #[test]
    fn unconditional_jump_to_self_terminates() {
        // spec.md §8 scenario 6: bra $-2, must not loop forever and
        // produces exactly one disassembled bra line targeting L0000.
        let mut refs = ReferenceStore::new();
        refs.push(ReferenceType::Global, Some("m".into()), CODENT, 0).unwrap();
        let rof = module("m", &[0x20, 0xFE], &[], 0, refs);
        let out = disassemble(&rof);
        assert_eq!(out.matches("bra").count(), 1);
        assert!(out.contains("L0000"));
    }

    #[test]
    fn uninitialized_data_emits_rmb_run() {
        let mut refs = ReferenceStore::new();
        refs.push(ReferenceType::Global, Some("m".into()), CODENT, 0).unwrap();
        refs.push(ReferenceType::Global, Some("v".into()), 0, 0).unwrap();
        let rof = module("m", &[0x39], &[], 4, refs);
        let out = disassemble(&rof);
        assert!(out.contains("U0000"));
        assert!(out.contains("rmb\t$4"));
    }

    #[test]
    fn initialized_data_dump_is_included() {
        let mut refs = ReferenceStore::new();
        refs.push(ReferenceType::Global, Some("m".into()), CODENT, 0).unwrap();
        let rof = module("m", &[0x39], &[0x00, 0x01, 0x02], 0, refs);
        let out = disassemble(&rof);
        assert!(out.contains("Initialized data"));
        assert!(out.contains("fcb"));
    }
}
