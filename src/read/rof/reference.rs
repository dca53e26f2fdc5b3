//! Relocation records (component B: the reference store).

use alloc::string::String;
use alloc::vec::Vec;

use crate::read::{Error, Result};

/// `F_RELATIVE` — value is PC-relative.
pub const F_RELATIVE: u8 = 0x80;
/// `F_NEGATE` — value is negated at resolution.
pub const F_NEGATE: u8 = 0x40;
/// `CODLOC` — location is in code (else in data).
pub const CODLOC: u8 = 0x20;
/// `DIRLOC` — location is in direct page.
pub const DIRLOC: u8 = 0x10;
/// `F_BYTE` — location is one byte (else two).
pub const F_BYTE: u8 = 0x08;
/// `CODENT` — target is code.
pub const CODENT: u8 = 0x04;
/// `DIRENT` — target is direct page.
pub const DIRENT: u8 = 0x02;
/// `INIENT` — target is initialized data.
pub const INIENT: u8 = 0x01;

const MASK_GLOBAL: u8 = F_RELATIVE | F_NEGATE | CODENT | DIRENT | INIENT;
const MASK_EXTERNAL: u8 = F_RELATIVE | CODLOC;
const MASK_LOCAL: u8 = CODLOC | F_BYTE | CODENT | DIRENT | INIENT;

/// The kind of relocation record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceType {
    /// An exported symbol (global).
    Global,
    /// An imported symbol (external).
    External,
    /// An in-module fixup with no symbol (local).
    Local,
}

impl ReferenceType {
    fn mask(self) -> u8 {
        match self {
            ReferenceType::Global => MASK_GLOBAL,
            ReferenceType::External => MASK_EXTERNAL,
            ReferenceType::Local => MASK_LOCAL,
        }
    }
}

/// One relocation record (spec.md §3, "Reference").
#[derive(Debug, Clone)]
pub struct Reference {
    pub kind: ReferenceType,
    /// Present for Global and External, absent for Local.
    pub symbol: Option<String>,
    pub flag: u8,
    pub offset: u16,
}

impl Reference {
    #[inline]
    pub fn is_code_target(&self) -> bool {
        self.flag & CODENT != 0
    }

    #[inline]
    pub fn is_code_location(&self) -> bool {
        self.flag & CODLOC != 0
    }

    #[inline]
    pub fn is_init_target(&self) -> bool {
        self.flag & INIENT != 0
    }

    /// True if `flag` has bits outside the mask allowed for this reference's type.
    #[inline]
    pub fn flag_out_of_mask(&self) -> bool {
        self.flag & !self.kind.mask() != 0
    }
}

/// Append-only, insertion-ordered collection of relocation records
/// (component B). Emission determinism depends on preserving insertion
/// order and on "first matching" lookup semantics (spec.md §4.B).
#[derive(Debug, Clone, Default)]
pub struct ReferenceStore {
    refs: Vec<Reference>,
}

impl ReferenceStore {
    pub fn new() -> Self {
        ReferenceStore { refs: Vec::new() }
    }

    /// Append a reference, validating its flag bits against its type's mask.
    ///
    /// A reference with bits outside the mask is still stored (spec.md
    /// §3 invariants: "logged but still stored") — the caller is
    /// responsible for emitting the `FlagOutOfMask` warning.
    pub fn push(&mut self, kind: ReferenceType, symbol: Option<String>, flag: u8, offset: u16) -> Result<()> {
        if symbol.is_none() && !matches!(kind, ReferenceType::Local) {
            return Err(Error("GLOBAL and EXTERNAL references require a symbol"));
        }
        self.refs.push(Reference {
            kind,
            symbol,
            flag,
            offset,
        });
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Reference> {
        self.refs.iter()
    }

    pub fn len(&self) -> usize {
        self.refs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.refs.is_empty()
    }

    /// The earliest reference matching `kind`/`offset` whose flags agree
    /// with the `want_code` axis (CODLOC or CODENT set iff `want_code`)
    /// and, when `want_code` is false, with the `want_init` axis (INIENT
    /// set iff `want_init`). Mirrors `GetReference` in the original C
    /// loader.
    pub fn first_matching(
        &self,
        kind: ReferenceType,
        offset: u16,
        want_code: bool,
        want_init: bool,
    ) -> Option<&Reference> {
        self.refs.iter().find(|r| {
            if r.kind != kind || r.offset != offset {
                return false;
            }

            let is_code = r.flag & (CODLOC | CODENT) != 0;
            if want_code {
                is_code
            } else if is_code {
                false
            } else {
                let is_init = r.flag & INIENT != 0;
                is_init == want_init
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_mask_rejects_dirloc() {
        // DIRLOC (0x10) is not in MASK_GLOBAL.
        let r = Reference {
            kind: ReferenceType::Global,
            symbol: Some("foo".into()),
            flag: CODENT | DIRLOC,
            offset: 0,
        };
        assert!(r.flag_out_of_mask());
    }

    #[test]
    fn first_matching_prefers_earliest_insertion() {
        let mut store = ReferenceStore::new();
        store
            .push(ReferenceType::Local, None, CODLOC | CODENT, 0x10)
            .unwrap();
        store
            .push(ReferenceType::Local, None, CODLOC | CODENT, 0x10)
            .unwrap();
        let found = store
            .first_matching(ReferenceType::Local, 0x10, true, false)
            .unwrap();
        assert!(core::ptr::eq(found, &store.refs[0]));
    }

    #[test]
    fn first_matching_respects_init_axis() {
        let mut store = ReferenceStore::new();
        store.push(ReferenceType::Local, None, 0, 0x20).unwrap();
        store
            .push(ReferenceType::Local, None, INIENT, 0x20)
            .unwrap();
        let bss = store
            .first_matching(ReferenceType::Local, 0x20, false, false)
            .unwrap();
        assert_eq!(bss.flag, 0);
        let data = store
            .first_matching(ReferenceType::Local, 0x20, false, true)
            .unwrap();
        assert_eq!(data.flag, INIENT);
    }

    #[test]
    fn global_without_symbol_rejected() {
        let mut store = ReferenceStore::new();
        assert!(store.push(ReferenceType::Global, None, 0, 0).is_err());
    }
}
