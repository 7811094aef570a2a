//! The frontend handles everything related to reading the ELF file: validating it,
//! mapping its sections onto the cartridge address space and checking its symbols

mod elf;
mod error;
mod section;
mod symbol;
mod window;

pub(crate) use elf::{
    mmap_file,
    ElfParser,
};
pub(crate) use section::SectionMapper;
pub(crate) use symbol::SymbolValidator;

pub use error::{
    ElfField,
    RangeViolation,
    RomError,
};
pub use section::MappedSection;
pub use symbol::{
    SYM_ENTRY,
    SYM_HEADER_END,
};
pub use window::AddressWindow;
