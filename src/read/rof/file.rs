//! ROF file implementation (component C: the loader).

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::read::rof::reference::{Reference, ReferenceType};
use crate::read::{Error, Reader, Result};

use super::ReferenceStore;

/// Signature at the start of every ROF unit.
pub const ROF_SYNC: u32 = 0x62CD_2387;
/// Maximum length of a symbol name, including its null terminator.
pub const SYMLEN: usize = 64;
/// Maximum length of a module name, including its null terminator.
pub const MAXNAME: usize = 256;

/// The outcome of attempting to load one ROF unit from a stream.
///
/// `NoMore` is distinct from a corrupt-unit failure so that a caller
/// walking a stream of concatenated ROF units (spec.md §4.C) knows to
/// stop cleanly rather than report an error for the final "no more data"
/// read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadError {
    /// The stream had no more ROF units (clean end-of-stream, detected on
    /// the very first header read of this call).
    NoMore,
    /// A ROF unit was present but failed to parse.
    Failed(Error),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::NoMore => f.write_str("no more ROF units in stream"),
            LoadError::Failed(e) => fmt::Display::fmt(e, f),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for LoadError {}

impl From<Error> for LoadError {
    fn from(e: Error) -> Self {
        LoadError::Failed(e)
    }
}

type LoadResult<T> = core::result::Result<T, LoadError>;

/// One parsed ROF unit (spec.md §3, "Module").
#[derive(Debug, Clone)]
pub struct RofFile {
    /// Module name, from the null-terminated header field (≤255 bytes).
    pub name: String,
    /// Name of the file this unit was read from, for diagnostics.
    pub filename: String,

    pub size_object_code: u16,
    pub size_init_data: u16,
    pub size_uninit_data: u16,
    pub size_init_dp_data: u16,
    pub size_uninit_dp_data: u16,
    pub size_stack: u16,

    pub exec_entry: u16,
    pub type_language: u16,
    pub asm_valid: u8,
    /// {year-1900, month, day, hour, minute}
    pub creation_date: [u8; 5],
    pub edition: u8,

    pub object_code: Vec<u8>,
    pub init_data: Vec<u8>,
    pub init_dp_data: Vec<u8>,

    pub references: ReferenceStore,
}

impl RofFile {
    /// Parse exactly one ROF unit starting at the reader's current
    /// position. The reader may be re-invoked afterwards to load
    /// additional concatenated units (spec.md §4.C).
    pub fn load(r: &mut Reader<'_>, filename: &str) -> LoadResult<Self> {
        let start = r.tell();
        let sync = match r.u32_be() {
            Ok(v) => v,
            Err(_) => return Err(LoadError::NoMore),
        };
        if sync != ROF_SYNC {
            // A magic mismatch on the first read of a unit means the
            // stream has no more ROF data (it may be trailing padding).
            let _ = start;
            return Err(LoadError::NoMore);
        }

        let type_language = r.u16_be()?;
        let asm_valid = r.u8()?;
        let creation_bytes = r.bytes(5)?;
        let mut creation_date = [0u8; 5];
        creation_date.copy_from_slice(creation_bytes);
        let edition = r.u8()?;
        let _reserved = r.u8()?;

        let size_uninit_data = r.u16_be()?;
        let size_uninit_dp_data = r.u16_be()?;
        let size_init_data = r.u16_be()?;
        let size_init_dp_data = r.u16_be()?;
        let size_object_code = r.u16_be()?;
        let size_stack = r.u16_be()?;
        let exec_entry = r.u16_be()?;

        let name_bytes = r.cstr(MAXNAME).map_err(|_| LoadError::Failed(Error("module name exceeds maximum length")))?;
        let name = String::from_utf8_lossy(name_bytes).into_owned();

        let mut references = ReferenceStore::new();
        load_globals(r, &mut references)?;

        let object_code = r.bytes(size_object_code as usize)?.to_vec();

        let init_dp_data = if size_init_dp_data != 0 {
            r.bytes(size_init_dp_data as usize)?.to_vec()
        } else {
            Vec::new()
        };

        let init_data = if size_init_data != 0 {
            r.bytes(size_init_data as usize)?.to_vec()
        } else {
            Vec::new()
        };

        load_externals(r, &mut references)?;
        load_locals(r, &mut references)?;

        #[cfg(feature = "std")]
        log::debug!(
            "loaded ROF unit '{}' from '{}' (code {:#06x}, data {:#06x}, bss {:#06x})",
            name,
            filename,
            size_object_code,
            size_init_data,
            size_uninit_data,
        );

        Ok(RofFile {
            name,
            filename: filename.into(),
            size_object_code,
            size_init_data,
            size_uninit_data,
            size_init_dp_data,
            size_uninit_dp_data,
            size_stack,
            exec_entry,
            type_language,
            asm_valid,
            creation_date,
            edition,
            object_code,
            init_data,
            init_dp_data,
            references,
        })
    }

    /// Read a big-endian 16-bit word from the object code section.
    pub fn code_word(&self, offset: u16) -> Option<u16> {
        let i = offset as usize;
        let hi = *self.object_code.get(i)? as u16;
        let lo = *self.object_code.get(i + 1)? as u16;
        Some((hi << 8) | lo)
    }

    /// Read a big-endian 16-bit word from the initialized-data section.
    pub fn data_word(&self, offset: u16) -> Option<u16> {
        let i = offset as usize;
        let hi = *self.init_data.get(i)? as u16;
        let lo = *self.init_data.get(i + 1)? as u16;
        Some((hi << 8) | lo)
    }
}

fn load_globals(r: &mut Reader<'_>, refs: &mut ReferenceStore) -> Result<()> {
    let count = r.u16_be()?;
    for _ in 0..count {
        let symbol = r.cstr(SYMLEN)?;
        let flag = r.u8()?;
        let offset = r.u16_be()?;
        let symbol = String::from_utf8_lossy(symbol).into_owned();
        push_checked(refs, ReferenceType::Global, Some(symbol), flag, offset);
    }
    Ok(())
}

fn load_externals(r: &mut Reader<'_>, refs: &mut ReferenceStore) -> Result<()> {
    let symbol_count = r.u16_be()?;
    for _ in 0..symbol_count {
        let symbol = r.cstr(SYMLEN)?;
        let symbol = String::from_utf8_lossy(symbol).into_owned();
        let occurrences = r.u16_be()?;
        for _ in 0..occurrences {
            let flag = r.u8()?;
            let offset = r.u16_be()?;
            push_checked(refs, ReferenceType::External, Some(symbol.clone()), flag, offset);
        }
    }
    Ok(())
}

fn load_locals(r: &mut Reader<'_>, refs: &mut ReferenceStore) -> Result<()> {
    let count = r.u16_be()?;
    for _ in 0..count {
        let flag = r.u8()?;
        let offset = r.u16_be()?;
        push_checked(refs, ReferenceType::Local, None, flag, offset);
    }
    Ok(())
}

fn push_checked(refs: &mut ReferenceStore, kind: ReferenceType, symbol: Option<String>, flag: u8, offset: u16) {
    // Flag-mask violations are non-fatal (spec.md §7, `FlagOutOfMask`):
    // the loader still stores the reference and lets the caller log it.
    #[cfg(feature = "std")]
    {
        let tmp = Reference {
            kind,
            symbol: symbol.clone(),
            flag,
            offset,
        };
        if tmp.flag_out_of_mask() {
            log::warn!(
                "reference flag {:#04x} at offset {:#06x} has bits outside the {:?} mask",
                flag,
                offset,
                kind
            );
        }
    }
    let _ = refs.push(kind, symbol, flag, offset);
}
