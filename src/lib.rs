//! Reader and disassembler for OS-9/6809 Relocatable Object Format (ROF)
//! files.
//!
//! This crate separates into two halves, mirroring the two hard parts of
//! the problem:
//!
//! - [`read`]: parses a ROF byte stream into a [`read::rof::RofFile`].
//! - [`disasm`]: traces control flow from a module's entry points to tell
//!   code from data, then emits 6809 assembly text.
#![no_std]

extern crate alloc;
#[cfg(any(feature = "std", test))]
extern crate std;

pub mod disasm;
pub mod read;

pub use disasm::disassemble;
pub use read::rof::{
    LoadError, Reference, ReferenceStore, ReferenceType, RofFile, CODENT, CODLOC, DIRENT, DIRLOC,
    F_BYTE, F_NEGATE, F_RELATIVE, INIENT,
};
pub use read::{Error, Reader, Result};
