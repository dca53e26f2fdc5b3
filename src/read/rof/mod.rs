//! ROF (OS-9/6809 Relocatable Object Format) file reading support.

mod file;
pub use file::*;

mod reference;
pub use reference::*;
