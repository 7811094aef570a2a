use std::fmt;

use thiserror::Error;

/// The ELF header field that failed validation
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ElfField {
    Class,
    ByteOrder,
    Type,
    Machine,
}

impl fmt::Display for ElfField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ElfField::Class => "ELF class",
            ElfField::ByteOrder => "byte order",
            ElfField::Type => "ELF type",
            ElfField::Machine => "machine",
        };
        f.write_str(name)
    }
}

/// Why the program data does not fit into the cartridge address space
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum RangeViolation {
    #[error("program contains data at address {start:#x}, but the minimum address is {base:#x}")]
    BelowBase { start: u32, base: u32 },

    #[error("program data is too large: size={size:#x}, maximum={max:#x}")]
    TooLarge { size: u32, max: u32 },
}

/// Everything that can stop the conversion. Each stage reports the first violation it finds.
#[derive(Error, Debug)]
pub enum RomError {
    /// The file is not an ELF file at all. Together with [`RomError::Format`] this
    /// covers malformed containers: `Parse` when the header can't be read, `Format`
    /// when it can be read but describes the wrong kind of executable.
    #[error("Cannot parse ELF file: {0}")]
    Parse(#[from] goblin::error::Error),

    /// Class, byte order, type or machine don't match a 32-bit little-endian ARM executable
    #[error("Program {field} is {actual:#x}, expected {expected:#x}")]
    Format { field: ElfField, actual: u32, expected: u32 },

    #[error("Section '{name}': could not map file offset {offset:#010x} to a load address")]
    SectionMap { name: String, offset: u64 },

    #[error("Section '{name}': file range {offset:#x}+{size:#x} lies outside of the file")]
    SectionData { name: String, offset: u64, size: u64 },

    #[error("No program data")]
    NoData,

    #[error("{0}")]
    AddressRange(#[from] RangeViolation),

    #[error("Required symbols do not exist: {}", .names.join(", "))]
    MissingSymbols { names: Vec<String> },

    #[error("Symbol {name} has address {actual:#x}, should be {expected:#x}")]
    SymbolAddress { name: String, actual: u32, expected: u32 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
