//! The 6809 opcode tables (component D).
//!
//! Three parallel 256-entry tables — base, `$10` page, `$11` page — each
//! mapping an opcode byte to a mnemonic, an instruction length (excluding
//! indexed-mode extra bytes), an addressing-mode decoder, and a
//! control-flow trace effect. This replaces the original C table's pair
//! of function pointers with plain enums matched once in `trace.rs` and
//! `emit.rs`, per spec.md §9's REDESIGN FLAGS.

/// One of the eleven addressing-mode families the decoder understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Illegal,
    Inherent,
    ImmediateByte,
    ImmediateWord,
    Direct,
    Extended,
    Indexed,
    RelativeShort,
    RelativeLong,
    RegisterToRegister,
    StackSystem,
    StackUser,
    Os9Syscall,
}

/// How an operand's bytes should be turned into a target address for the
/// tracer's branch/jump handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    /// 8-bit signed, PC-relative to the byte after the operand.
    Relative8,
    /// 16-bit signed, PC-relative to the byte after the operand.
    Relative16,
    /// 16-bit absolute address, taken verbatim (extended addressing).
    Absolute16,
}

/// Which prefix page an instruction's trace continues into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Ten,
    Eleven,
}

/// One of the seven control-flow effect families (component E).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceEffect {
    /// Straight-line fall-through.
    Generic,
    /// Ends the current linear scan (RTS, RTI).
    Return,
    /// Dispatches to the `$10`/`$11` page table for the next byte.
    Page(Page),
    /// Adds the indexed postbyte's extra-byte count; otherwise generic.
    Indexed,
    /// Recurses into the target and still continues the linear scan
    /// (conditional branches, BSR/LBSR, JSR-extended).
    Branch(TargetKind),
    /// Unconditional transfer: continues normally if the target is
    /// already traced, otherwise redirects the scan there (BRA/LBRA,
    /// JMP-extended).
    Jump(TargetKind),
    /// Inspects the postbyte for the PC bit; sets `Return` if set.
    PullStack,
}

/// One opcode table entry.
#[derive(Debug, Clone, Copy)]
pub struct OpEntry {
    pub mnemonic: &'static str,
    /// Instruction length in bytes, excluding indexed-mode extra bytes
    /// and excluding any page-prefix byte.
    pub byte_count: u8,
    pub mode: Mode,
    pub trace: TraceEffect,
}

const ILLEGAL: OpEntry = OpEntry {
    mnemonic: "",
    byte_count: 1,
    mode: Mode::Illegal,
    trace: TraceEffect::Generic,
};

const fn op(mnemonic: &'static str, byte_count: u8, mode: Mode, trace: TraceEffect) -> OpEntry {
    OpEntry {
        mnemonic,
        byte_count,
        mode,
        trace,
    }
}

/// Extra bytes consumed by an indexed postbyte sub-mode, indexed by
/// `postbyte & 0x1f` (spec.md §4.D).
pub const POST_OP_EXTRA_BYTES: [u8; 32] = [
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // 0x00-0x07
    0x01, 0x02, 0x00, 0x00, 0x01, 0x02, 0x00, 0x00, // 0x08-0x0f
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // 0x10-0x17
    0x01, 0x02, 0x00, 0x00, 0x01, 0x02, 0x00, 0x02, // 0x18-0x1f
];

// Indexed postbyte sub-mode codes (low nibble when bit 7 is set).
pub const IDX_INCREG: u8 = 0x00;
pub const IDX_INCREG2: u8 = 0x01;
pub const IDX_DECREG: u8 = 0x02;
pub const IDX_DECREG2: u8 = 0x03;
pub const IDX_OFFSET_0: u8 = 0x04;
pub const IDX_OFFSET_B: u8 = 0x05;
pub const IDX_OFFSET_A: u8 = 0x06;
pub const IDX_ILLEGAL1: u8 = 0x07;
pub const IDX_OFFSET_BYTE: u8 = 0x08;
pub const IDX_OFFSET_WORD: u8 = 0x09;
pub const IDX_ILLEGAL2: u8 = 0x0a;
pub const IDX_OFFSET_D: u8 = 0x0b;
pub const IDX_OFFSET_PCR1: u8 = 0x0c;
pub const IDX_OFFSET_PCR2: u8 = 0x0d;
pub const IDX_ILLEGAL3: u8 = 0x0e;
pub const IDX_INDIRECT: u8 = 0x0f;

/// Postbyte bit marking indirect addressing.
pub const PB_INDIRECT: u8 = 0x10;

/// Stack-operand register bits (shared by PSHS/PULS/PSHU/PULU postbytes).
pub const SREG_PC: u8 = 0x80;
pub const SREG_U_S: u8 = 0x40;
pub const SREG_Y: u8 = 0x20;
pub const SREG_X: u8 = 0x10;
pub const SREG_DP: u8 = 0x08;
pub const SREG_B: u8 = 0x04;
pub const SREG_A: u8 = 0x02;
pub const SREG_CC: u8 = 0x01;

pub const STACK_REG_BITS: [u8; 8] = [
    SREG_PC, SREG_U_S, SREG_Y, SREG_X, SREG_DP, SREG_B, SREG_A, SREG_CC,
];
pub const STACK_S_NAMES: [&str; 8] = ["pc", "u", "y", "x", "dp", "b", "a", "cc"];
pub const STACK_U_NAMES: [&str; 8] = ["pc", "s", "y", "x", "dp", "b", "a", "cc"];

/// Register names for EXG/TFR's postbyte nibbles.
pub const INTER_REGISTER: [&str; 16] = [
    "d", "x", "y", "u", "s", "pc", "??", "??", "a", "b", "cc", "dp", "??", "??", "??", "??",
];

/// Indexed-mode register selector (postbyte bits 6-5).
pub const INDEXED_REGISTER: [&str; 4] = ["x", "y", "u", "s"];

use Mode::*;
use TargetKind::*;
use TraceEffect as TE;

/// Build the base (unprefixed) opcode table.
pub fn base_table() -> [OpEntry; 256] {
    let mut t = [ILLEGAL; 256];

    t[0x00] = op("neg", 2, Direct, TE::Generic);
    t[0x03] = op("com", 2, Direct, TE::Generic);
    t[0x04] = op("lsr", 2, Direct, TE::Generic);
    t[0x06] = op("ror", 2, Direct, TE::Generic);
    t[0x07] = op("asr", 2, Direct, TE::Generic);
    t[0x08] = op("asl", 2, Direct, TE::Generic);
    t[0x09] = op("rol", 2, Direct, TE::Generic);
    t[0x0A] = op("dec", 2, Direct, TE::Generic);
    t[0x0C] = op("inc", 2, Direct, TE::Generic);
    t[0x0D] = op("tst", 2, Direct, TE::Generic);
    t[0x0E] = op("jmp", 2, Direct, TE::Generic);
    t[0x0F] = op("clr", 2, Direct, TE::Generic);

    t[0x10] = op("", 1, Illegal, TE::Page(Page::Ten));
    t[0x11] = op("", 1, Illegal, TE::Page(Page::Eleven));
    t[0x12] = op("nop", 1, Inherent, TE::Generic);
    t[0x13] = op("sync", 1, Inherent, TE::Generic);
    t[0x16] = op("lbra", 3, RelativeLong, TE::Jump(Relative16));
    t[0x17] = op("lbsr", 3, RelativeLong, TE::Branch(Relative16));
    t[0x19] = op("daa", 1, Inherent, TE::Generic);
    t[0x1A] = op("orcc", 2, ImmediateByte, TE::Generic);
    t[0x1C] = op("andcc", 2, ImmediateByte, TE::Generic);
    t[0x1D] = op("sex", 1, Inherent, TE::Generic);
    t[0x1E] = op("exg", 2, RegisterToRegister, TE::Generic);
    t[0x1F] = op("tfr", 2, RegisterToRegister, TE::Generic);

    t[0x20] = op("bra", 2, RelativeShort, TE::Jump(Relative8));
    t[0x21] = op("brn", 2, RelativeShort, TE::Branch(Relative8));
    t[0x22] = op("bhi", 2, RelativeShort, TE::Branch(Relative8));
    t[0x23] = op("bls", 2, RelativeShort, TE::Branch(Relative8));
    t[0x24] = op("bcc", 2, RelativeShort, TE::Branch(Relative8));
    t[0x25] = op("bcs", 2, RelativeShort, TE::Branch(Relative8));
    t[0x26] = op("bne", 2, RelativeShort, TE::Branch(Relative8));
    t[0x27] = op("beq", 2, RelativeShort, TE::Branch(Relative8));
    t[0x28] = op("bvc", 2, RelativeShort, TE::Branch(Relative8));
    t[0x29] = op("bvs", 2, RelativeShort, TE::Branch(Relative8));
    t[0x2A] = op("bpl", 2, RelativeShort, TE::Branch(Relative8));
    t[0x2B] = op("bmi", 2, RelativeShort, TE::Branch(Relative8));
    t[0x2C] = op("bge", 2, RelativeShort, TE::Branch(Relative8));
    t[0x2D] = op("blt", 2, RelativeShort, TE::Branch(Relative8));
    t[0x2E] = op("bgt", 2, RelativeShort, TE::Branch(Relative8));
    t[0x2F] = op("ble", 2, RelativeShort, TE::Branch(Relative8));

    t[0x30] = op("leax", 2, Indexed, TE::Indexed);
    t[0x31] = op("leay", 2, Indexed, TE::Indexed);
    t[0x32] = op("leas", 2, Indexed, TE::Indexed);
    t[0x33] = op("leau", 2, Indexed, TE::Indexed);
    t[0x34] = op("pshs", 2, StackSystem, TE::Generic);
    t[0x35] = op("puls", 2, StackSystem, TE::PullStack);
    t[0x36] = op("pshu", 2, StackUser, TE::Generic);
    t[0x37] = op("pulu", 2, StackUser, TE::PullStack);
    t[0x39] = op("rts", 1, Inherent, TE::Return);
    t[0x3A] = op("abx", 1, Inherent, TE::Generic);
    t[0x3B] = op("rti", 1, Inherent, TE::Return);
    t[0x3C] = op("cwai", 2, ImmediateByte, TE::Generic);
    t[0x3D] = op("mul", 1, Inherent, TE::Generic);
    t[0x3F] = op("swi", 1, Inherent, TE::Generic);

    t[0x40] = op("nega", 1, Inherent, TE::Generic);
    t[0x43] = op("coma", 1, Inherent, TE::Generic);
    t[0x44] = op("lsra", 1, Inherent, TE::Generic);
    t[0x46] = op("rora", 1, Inherent, TE::Generic);
    t[0x47] = op("asra", 1, Inherent, TE::Generic);
    t[0x48] = op("asla", 1, Inherent, TE::Generic);
    t[0x49] = op("rola", 1, Inherent, TE::Generic);
    t[0x4A] = op("deca", 1, Inherent, TE::Generic);
    t[0x4C] = op("inca", 1, Inherent, TE::Generic);
    t[0x4D] = op("tsta", 1, Inherent, TE::Generic);
    t[0x4F] = op("clra", 1, Inherent, TE::Generic);

    t[0x50] = op("negb", 1, Inherent, TE::Generic);
    t[0x53] = op("comb", 1, Inherent, TE::Generic);
    t[0x54] = op("lsrb", 1, Inherent, TE::Generic);
    t[0x56] = op("rorb", 1, Inherent, TE::Generic);
    t[0x57] = op("asrb", 1, Inherent, TE::Generic);
    t[0x58] = op("aslb", 1, Inherent, TE::Generic);
    t[0x59] = op("rolb", 1, Inherent, TE::Generic);
    t[0x5A] = op("decb", 1, Inherent, TE::Generic);
    t[0x5C] = op("incb", 1, Inherent, TE::Generic);
    t[0x5D] = op("tstb", 1, Inherent, TE::Generic);
    t[0x5F] = op("clrb", 1, Inherent, TE::Generic);

    t[0x60] = op("neg", 2, Indexed, TE::Indexed);
    t[0x63] = op("com", 2, Indexed, TE::Indexed);
    t[0x64] = op("lsr", 2, Indexed, TE::Indexed);
    t[0x66] = op("ror", 2, Indexed, TE::Indexed);
    t[0x67] = op("asr", 2, Indexed, TE::Indexed);
    t[0x68] = op("asl", 2, Indexed, TE::Indexed);
    t[0x69] = op("rol", 2, Indexed, TE::Indexed);
    t[0x6A] = op("dec", 2, Indexed, TE::Indexed);
    t[0x6C] = op("inc", 2, Indexed, TE::Indexed);
    t[0x6D] = op("tst", 2, Indexed, TE::Indexed);
    t[0x6E] = op("jmp", 2, Indexed, TE::Indexed);
    t[0x6F] = op("clr", 2, Indexed, TE::Indexed);

    t[0x70] = op("neg", 3, Extended, TE::Generic);
    t[0x73] = op("com", 3, Extended, TE::Generic);
    t[0x74] = op("lsr", 3, Extended, TE::Generic);
    t[0x76] = op("ror", 3, Extended, TE::Generic);
    t[0x77] = op("asr", 3, Extended, TE::Generic);
    t[0x78] = op("asl", 3, Extended, TE::Generic);
    t[0x79] = op("rol", 3, Extended, TE::Generic);
    t[0x7A] = op("dec", 3, Extended, TE::Generic);
    t[0x7C] = op("inc", 3, Extended, TE::Generic);
    t[0x7D] = op("tst", 3, Extended, TE::Generic);
    t[0x7E] = op("jmp", 3, Extended, TE::Jump(Absolute16));
    t[0x7F] = op("clr", 3, Extended, TE::Generic);

    t[0x80] = op("suba", 2, ImmediateByte, TE::Generic);
    t[0x81] = op("cmpa", 2, ImmediateByte, TE::Generic);
    t[0x82] = op("sbca", 2, ImmediateByte, TE::Generic);
    t[0x83] = op("subd", 3, ImmediateWord, TE::Generic);
    t[0x84] = op("anda", 2, ImmediateByte, TE::Generic);
    t[0x85] = op("bita", 2, ImmediateByte, TE::Generic);
    t[0x86] = op("lda", 2, ImmediateByte, TE::Generic);
    t[0x88] = op("eora", 2, ImmediateByte, TE::Generic);
    t[0x89] = op("adca", 2, ImmediateByte, TE::Generic);
    t[0x8A] = op("ora", 2, ImmediateByte, TE::Generic);
    t[0x8B] = op("adda", 2, ImmediateByte, TE::Generic);
    t[0x8C] = op("cmpx", 3, ImmediateWord, TE::Generic);
    t[0x8D] = op("bsr", 2, RelativeShort, TE::Branch(Relative8));
    t[0x8E] = op("ldx", 3, ImmediateWord, TE::Generic);

    t[0x90] = op("suba", 2, Direct, TE::Generic);
    t[0x91] = op("cmpa", 2, Direct, TE::Generic);
    t[0x92] = op("sbca", 2, Direct, TE::Generic);
    t[0x93] = op("subd", 2, Direct, TE::Generic);
    t[0x94] = op("anda", 2, Direct, TE::Generic);
    t[0x95] = op("bita", 2, Direct, TE::Generic);
    t[0x96] = op("lda", 2, Direct, TE::Generic);
    t[0x97] = op("sta", 2, Direct, TE::Generic);
    t[0x98] = op("eora", 2, Direct, TE::Generic);
    t[0x99] = op("adca", 2, Direct, TE::Generic);
    t[0x9A] = op("ora", 2, Direct, TE::Generic);
    t[0x9B] = op("adda", 2, Direct, TE::Generic);
    t[0x9C] = op("cmpx", 2, Direct, TE::Generic);
    t[0x9D] = op("jsr", 2, Direct, TE::Generic);
    t[0x9E] = op("ldx", 2, Direct, TE::Generic);
    t[0x9F] = op("stx", 2, Direct, TE::Generic);

    t[0xA0] = op("suba", 2, Indexed, TE::Indexed);
    t[0xA1] = op("cmpa", 2, Indexed, TE::Indexed);
    t[0xA2] = op("sbca", 2, Indexed, TE::Indexed);
    t[0xA3] = op("subd", 2, Indexed, TE::Indexed);
    t[0xA4] = op("anda", 2, Indexed, TE::Indexed);
    t[0xA5] = op("bita", 2, Indexed, TE::Indexed);
    t[0xA6] = op("lda", 2, Indexed, TE::Indexed);
    t[0xA7] = op("sta", 2, Indexed, TE::Indexed);
    t[0xA8] = op("eora", 2, Indexed, TE::Indexed);
    t[0xA9] = op("adca", 2, Indexed, TE::Indexed);
    t[0xAA] = op("ora", 2, Indexed, TE::Indexed);
    t[0xAB] = op("adda", 2, Indexed, TE::Indexed);
    t[0xAC] = op("cmpx", 2, Indexed, TE::Indexed);
    t[0xAD] = op("jsr", 2, Indexed, TE::Indexed);
    t[0xAE] = op("ldx", 2, Indexed, TE::Indexed);
    t[0xAF] = op("stx", 2, Indexed, TE::Indexed);

    t[0xB0] = op("suba", 3, Extended, TE::Generic);
    t[0xB1] = op("cmpa", 3, Extended, TE::Generic);
    t[0xB2] = op("sbca", 3, Extended, TE::Generic);
    t[0xB3] = op("subd", 3, Extended, TE::Generic);
    t[0xB4] = op("anda", 3, Extended, TE::Generic);
    t[0xB5] = op("bita", 3, Extended, TE::Generic);
    t[0xB6] = op("lda", 3, Extended, TE::Generic);
    t[0xB7] = op("sta", 3, Extended, TE::Generic);
    t[0xB8] = op("eora", 3, Extended, TE::Generic);
    t[0xB9] = op("adca", 3, Extended, TE::Generic);
    t[0xBA] = op("ora", 3, Extended, TE::Generic);
    t[0xBB] = op("adda", 3, Extended, TE::Generic);
    t[0xBC] = op("cmpx", 3, Extended, TE::Generic);
    t[0xBD] = op("jsr", 3, Extended, TE::Branch(Absolute16));
    t[0xBE] = op("ldx", 3, Extended, TE::Generic);
    t[0xBF] = op("stx", 3, Extended, TE::Generic);

    t[0xC0] = op("subb", 2, ImmediateByte, TE::Generic);
    t[0xC1] = op("cmpb", 2, ImmediateByte, TE::Generic);
    t[0xC2] = op("sbcb", 2, ImmediateByte, TE::Generic);
    t[0xC3] = op("addd", 3, ImmediateWord, TE::Generic);
    t[0xC4] = op("andb", 2, ImmediateByte, TE::Generic);
    t[0xC5] = op("bitb", 2, ImmediateByte, TE::Generic);
    t[0xC6] = op("ldb", 2, ImmediateByte, TE::Generic);
    t[0xC8] = op("eorb", 2, ImmediateByte, TE::Generic);
    t[0xC9] = op("adcb", 2, ImmediateByte, TE::Generic);
    t[0xCA] = op("orb", 2, ImmediateByte, TE::Generic);
    t[0xCB] = op("addb", 2, ImmediateByte, TE::Generic);
    t[0xCC] = op("ldd", 3, ImmediateWord, TE::Generic);
    t[0xCE] = op("ldu", 3, ImmediateWord, TE::Generic);

    t[0xD0] = op("subb", 2, Direct, TE::Generic);
    t[0xD1] = op("cmpb", 2, Direct, TE::Generic);
    t[0xD2] = op("sbcb", 2, Direct, TE::Generic);
    t[0xD3] = op("addd", 2, Direct, TE::Generic);
    t[0xD4] = op("andb", 2, Direct, TE::Generic);
    t[0xD5] = op("bitb", 2, Direct, TE::Generic);
    t[0xD6] = op("ldb", 2, Direct, TE::Generic);
    t[0xD7] = op("stb", 2, Direct, TE::Generic);
    t[0xD8] = op("eorb", 2, Direct, TE::Generic);
    t[0xD9] = op("adcb", 2, Direct, TE::Generic);
    t[0xDA] = op("orb", 2, Direct, TE::Generic);
    t[0xDB] = op("addb", 2, Direct, TE::Generic);
    t[0xDC] = op("ldd", 2, Direct, TE::Generic);
    t[0xDD] = op("std", 2, Direct, TE::Generic);
    t[0xDE] = op("ldu", 2, Direct, TE::Generic);
    t[0xDF] = op("stu", 2, Direct, TE::Generic);

    t[0xE0] = op("subb", 2, Indexed, TE::Indexed);
    t[0xE1] = op("cmpb", 2, Indexed, TE::Indexed);
    t[0xE2] = op("sbcb", 2, Indexed, TE::Indexed);
    t[0xE3] = op("addd", 2, Indexed, TE::Indexed);
    t[0xE4] = op("andb", 2, Indexed, TE::Indexed);
    t[0xE5] = op("bitb", 2, Indexed, TE::Indexed);
    t[0xE6] = op("ldb", 2, Indexed, TE::Indexed);
    t[0xE7] = op("stb", 2, Indexed, TE::Indexed);
    t[0xE8] = op("eorb", 2, Indexed, TE::Indexed);
    t[0xE9] = op("adcb", 2, Indexed, TE::Indexed);
    t[0xEA] = op("orb", 2, Indexed, TE::Indexed);
    t[0xEB] = op("addb", 2, Indexed, TE::Indexed);
    t[0xEC] = op("ldd", 2, Indexed, TE::Indexed);
    t[0xED] = op("std", 2, Indexed, TE::Indexed);
    t[0xEE] = op("ldu", 2, Indexed, TE::Indexed);
    t[0xEF] = op("stu", 2, Indexed, TE::Indexed);

    t[0xF0] = op("subb", 3, Extended, TE::Generic);
    t[0xF1] = op("cmpb", 3, Extended, TE::Generic);
    t[0xF2] = op("sbcb", 3, Extended, TE::Generic);
    t[0xF3] = op("addd", 3, Extended, TE::Generic);
    t[0xF4] = op("andb", 3, Extended, TE::Generic);
    t[0xF5] = op("bitb", 3, Extended, TE::Generic);
    t[0xF6] = op("ldb", 3, Extended, TE::Generic);
    t[0xF7] = op("stb", 3, Extended, TE::Generic);
    t[0xF8] = op("eorb", 3, Extended, TE::Generic);
    t[0xF9] = op("adcb", 3, Extended, TE::Generic);
    t[0xFA] = op("orb", 3, Extended, TE::Generic);
    t[0xFB] = op("addb", 3, Extended, TE::Generic);
    t[0xFC] = op("ldd", 3, Extended, TE::Generic);
    t[0xFD] = op("std", 3, Extended, TE::Generic);
    t[0xFE] = op("ldu", 3, Extended, TE::Generic);
    t[0xFF] = op("stu", 3, Extended, TE::Generic);

    t
}

/// Build the `$10`-prefixed opcode table.
pub fn page10_table() -> [OpEntry; 256] {
    let mut t = [ILLEGAL; 256];

    t[0x21] = op("lbrn", 3, RelativeLong, TE::Branch(Relative16));
    t[0x22] = op("lbhi", 3, RelativeLong, TE::Branch(Relative16));
    t[0x23] = op("lbls", 3, RelativeLong, TE::Branch(Relative16));
    t[0x24] = op("lbcc", 3, RelativeLong, TE::Branch(Relative16));
    t[0x25] = op("lbcs", 3, RelativeLong, TE::Branch(Relative16));
    t[0x26] = op("lbne", 3, RelativeLong, TE::Branch(Relative16));
    t[0x27] = op("lbeq", 3, RelativeLong, TE::Branch(Relative16));
    t[0x28] = op("lbvc", 3, RelativeLong, TE::Branch(Relative16));
    t[0x29] = op("lbvs", 3, RelativeLong, TE::Branch(Relative16));
    t[0x2A] = op("lbpl", 3, RelativeLong, TE::Branch(Relative16));
    t[0x2B] = op("lbmi", 3, RelativeLong, TE::Branch(Relative16));
    t[0x2C] = op("lbge", 3, RelativeLong, TE::Branch(Relative16));
    t[0x2D] = op("lblt", 3, RelativeLong, TE::Branch(Relative16));
    t[0x2E] = op("lbgt", 3, RelativeLong, TE::Branch(Relative16));
    t[0x2F] = op("lble", 3, RelativeLong, TE::Branch(Relative16));

    t[0x3F] = op("swi2", 2, Os9Syscall, TE::Generic);

    t[0x83] = op("cmpd", 3, ImmediateWord, TE::Generic);
    t[0x8C] = op("cmpy", 3, ImmediateWord, TE::Generic);
    t[0x8E] = op("ldy", 3, ImmediateWord, TE::Generic);

    t[0x93] = op("cmpd", 2, Direct, TE::Generic);
    t[0x9C] = op("cmpy", 2, Direct, TE::Generic);
    t[0x9E] = op("ldy", 2, Direct, TE::Generic);
    t[0x9F] = op("sty", 2, Direct, TE::Generic);

    t[0xA3] = op("cmpd", 2, Indexed, TE::Indexed);
    t[0xAC] = op("cmpy", 2, Indexed, TE::Indexed);
    t[0xAE] = op("ldy", 2, Indexed, TE::Indexed);
    t[0xAF] = op("sty", 2, Indexed, TE::Indexed);

    t[0xB3] = op("cmpd", 3, Extended, TE::Generic);
    t[0xBC] = op("cmpy", 3, Extended, TE::Generic);
    t[0xBE] = op("ldy", 3, Extended, TE::Generic);
    t[0xBF] = op("sty", 3, Extended, TE::Generic);

    t[0xCE] = op("lds", 3, ImmediateWord, TE::Generic);
    t[0xDE] = op("lds", 2, Direct, TE::Generic);
    t[0xDF] = op("sts", 2, Direct, TE::Generic);
    t[0xEE] = op("lds", 2, Indexed, TE::Indexed);
    t[0xEF] = op("sts", 2, Indexed, TE::Indexed);
    t[0xFE] = op("lds", 3, Extended, TE::Generic);
    t[0xFF] = op("sts", 3, Extended, TE::Generic);

    t
}

/// Build the `$11`-prefixed opcode table.
pub fn page11_table() -> [OpEntry; 256] {
    let mut t = [ILLEGAL; 256];

    t[0x3F] = op("swi3", 1, Inherent, TE::Generic);

    t[0x83] = op("cmpu", 3, ImmediateWord, TE::Generic);
    t[0x8C] = op("cmps", 3, ImmediateWord, TE::Generic);

    t[0x93] = op("cmpu", 2, Direct, TE::Generic);
    t[0x9C] = op("cmps", 2, Direct, TE::Generic);

    t[0xA3] = op("cmpu", 2, Indexed, TE::Indexed);
    t[0xAC] = op("cmps", 2, Indexed, TE::Indexed);

    t[0xB3] = op("cmpu", 3, Extended, TE::Generic);
    t[0xBC] = op("cmps", 3, Extended, TE::Generic);

    t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rts_is_a_return() {
        let t = base_table();
        assert_eq!(t[0x39].mnemonic, "rts");
        assert_eq!(t[0x39].trace, TE::Return);
    }

    #[test]
    fn bra_is_an_unconditional_jump() {
        let t = base_table();
        assert_eq!(t[0x20].mnemonic, "bra");
        assert_eq!(t[0x20].trace, TE::Jump(Relative8));
    }

    #[test]
    fn page_prefixes_dispatch() {
        let t = base_table();
        assert_eq!(t[0x10].trace, TE::Page(Page::Ten));
        assert_eq!(t[0x11].trace, TE::Page(Page::Eleven));
    }

    #[test]
    fn swi2_is_os9_syscall_mode() {
        let t = page10_table();
        assert_eq!(t[0x3F].mode, Os9Syscall);
        assert_eq!(t[0x3F].byte_count, 2);
    }

    #[test]
    fn illegal_slots_default() {
        let t = base_table();
        assert_eq!(t[0x01].mode, Illegal);
        assert_eq!(t[0x87].mode, Illegal);
    }
}
