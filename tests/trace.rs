//! Integration tests for the control-flow tracer and full disassembly
//! pipeline, built directly from [`RofFile`] values (spec.md §8 scenarios).

use rof::{ReferenceStore, ReferenceType, RofFile, CODENT};

fn module(name: &str, code: &[u8], entries: &[(&str, u16)]) -> RofFile {
    let mut refs = ReferenceStore::new();
    for (sym, offset) in entries {
        refs.push(ReferenceType::Global, Some((*sym).into()), CODENT, *offset).unwrap();
    }
    RofFile {
        name: name.into(),
        filename: "t.r".into(),
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
fn entry_point_walk_skips_a_data_gap() {
    // bra +2 ; fcb 0,0 ; rts
    let rof = module("m", &[0x20, 0x02, 0x00, 0x00, 0x39], &[("m", 0)]);
    let listing = rof::disassemble(&rof);
    assert!(listing.contains("bra"));
    assert!(listing.contains("rts"));
    assert!(listing.contains("fcb\t$00,$00"));
}

#[test]
fn multiple_entry_points_are_all_traced() {
    // e0: rts ; e1: rts
    let rof = module("m", &[0x39, 0x39], &[("e0", 0), ("e1", 1)]);
    let listing = rof::disassemble(&rof);
    assert_eq!(listing.matches("rts").count(), 2);
}

#[test]
fn missing_entry_point_falls_back_to_address_zero() {
    let rof = module("m", &[0x39], &[]);
    let listing = rof::disassemble(&rof);
    assert!(listing.contains("rts"));
}

#[test]
fn long_relative_branch_into_bounds_is_traced() {
    // lbra +4 ; fcb 0,0,0,0 ; rts
    let rof = module("m", &[0x16, 0x00, 0x04, 0x00, 0x00, 0x00, 0x00, 0x39], &[("m", 0)]);
    let listing = rof::disassemble(&rof);
    assert!(listing.contains("lbra"));
    assert!(listing.contains("rts"));
}

#[test]
fn jump_over_embedded_data_redirects_to_the_right_address() {
    // jmp $0005 ; fcb 0,0 (skipped, never traced) ; rts
    let rof = module("m", &[0x7E, 0x00, 0x05, 0x00, 0x00, 0x39], &[("m", 0)]);
    let listing = rof::disassemble(&rof);
    assert_eq!(listing.matches("rts").count(), 1);
    assert!(listing.contains("jmp"));
    assert!(listing.contains("fcb\t$00,$00"));
}
