//! Header and relocation-table pretty-printer for the `-r` flag.
//!
//! Mirrors `util.c`'s `DumpROFInfo`/`DumpReferences`/`ftext`: a fixed
//! banner block of header fields, followed by one `* Global/External/Local
//! references:` section per reference kind that has any entries at all.

use std::fmt::Write as _;

use rof::{Reference, ReferenceType, RofFile, CODENT, CODLOC, DIRENT, DIRLOC, F_BYTE, F_NEGATE, F_RELATIVE, INIENT};

const BANNER: &str = "************************************************************\n";

pub fn dump_rof_info(rof: &RofFile) -> String {
    let mut out = String::new();
    out.push_str(BANNER);
    let _ = write!(out, "* Module name: {}\t", rof.name);
    let _ = write!(
        out,
        "*   TyLa/RvAt: {:02x}/{:02x}\n",
        rof.type_language >> 8,
        rof.type_language & 0xff
    );
    let _ = write!(out, "*   Asm valid: {}\n", if rof.asm_valid != 0 { "No" } else { "Yes" });
    let [year, month, day, hour, minute] = rof.creation_date;
    let _ = write!(
        out,
        "* Create date: {:02}/{:02}/{:04} {:02}:{:02}\n",
        month,
        day,
        year as u16 + 1900,
        hour,
        minute
    );
    let _ = write!(out, "*     Edition: {:2}\n", rof.edition);
    out.push_str("*     Section: Init Uninit\n");
    let _ = write!(out, "*        Code: {:04x}\n", rof.size_object_code);
    let _ = write!(out, "*          DP: {:04x} {:04x}\n", rof.size_init_dp_data, rof.size_uninit_dp_data);
    let _ = write!(out, "*        Data: {:04x} {:04x}\n", rof.size_init_data, rof.size_uninit_data);
    let _ = write!(out, "*       Stack: {:04x}\n", rof.size_stack);
    let _ = write!(out, "* Entry point: {:04x}\n", rof.exec_entry);
    out.push_str(BANNER);
    out.push_str("*\n");

    dump_references(&mut out, rof, ReferenceType::Global);
    dump_references(&mut out, rof, ReferenceType::External);
    dump_references(&mut out, rof, ReferenceType::Local);

    out.push_str(BANNER);
    out
}

fn dump_references(out: &mut String, rof: &RofFile, kind: ReferenceType) {
    let matching: Vec<&Reference> = rof.references.iter().filter(|r| r.kind == kind).collect();
    if matching.is_empty() {
        return;
    }

    let label = match kind {
        ReferenceType::Global => "Global",
        ReferenceType::External => "External",
        ReferenceType::Local => "Local",
    };
    let _ = write!(out, "* {} references:\n", label);

    for r in matching {
        out.push_str("*  ");
        match &r.symbol {
            Some(sym) => {
                let _ = write!(out, "{:>9}:", sym);
            }
            None => out.push_str("          "),
        }
        out.push_str("  ");
        ftext(out, r, kind);
        out.push('\n');
    }
    out.push_str("*\n");
}

/// Render one reference's flag byte and offset as prose, mirroring
/// `ftext` in the original dumper.
fn ftext(out: &mut String, r: &Reference, kind: ReferenceType) {
    let _ = write!(out, "[{:02x} : {:04X}] ", r.flag, r.offset);

    if kind != ReferenceType::Global {
        out.push_str(if r.flag & F_BYTE != 0 { "byte" } else { "word" });
        out.push(' ');

        if r.flag & CODLOC != 0 {
            out.push_str("in code");
        } else {
            out.push_str("in ");
            if r.flag & DIRLOC != 0 {
                out.push_str("direct page ");
            }
            out.push_str("data");
        }
        out.push(' ');

        if r.flag & (F_NEGATE | F_RELATIVE) != 0 {
            out.push('(');
            match r.flag & (F_NEGATE | F_RELATIVE) {
                F_NEGATE => out.push_str("negative"),
                F_RELATIVE => out.push_str("offset pcr"),
                _ => out.push_str("negate offset to pcr"),
            }
            out.push_str(") ");
        }
    }

    if r.flag & CODENT != 0 {
        out.push_str("references code");
    }

    if kind == ReferenceType::Local {
        out.push_str("referencing ");
        if r.flag & DIRENT != 0 {
            out.push_str("direct page ");
        }
        if r.flag & CODENT != 0 {
            out.push_str("code ");
        } else if r.flag & INIENT != 0 {
            out.push_str("data ");
        } else {
            out.push_str("bss ");
        }
    }
}
