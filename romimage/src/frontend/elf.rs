use std::path::Path;

use goblin::elf::header::{
    EI_CLASS,
    EI_DATA,
    ELFCLASS32,
    ELFDATA2LSB,
    EM_ARM,
    ET_EXEC,
};
use memmap2::{
    Mmap,
    MmapOptions,
};

use crate::{
    frontend::error::{
        ElfField,
        RomError,
    },
    logger::Logger,
};

pub(crate) fn mmap_file(path: &Path) -> std::io::Result<Mmap> {
    let file = std::fs::File::open(path)?;
    let map = unsafe { MmapOptions::new().map(&file) }?;
    Ok(map)
}

fn expect_field(field: ElfField, actual: u32, expected: u32) -> Result<(), RomError> {
    if actual == expected {
        Ok(())
    } else {
        Err(RomError::Format {
            field,
            actual,
            expected,
        })
    }
}

/// Only 32-bit little-endian ARM executables can be turned into a cartridge image.
/// The order of the checks decides which error gets reported.
fn verify_header(header: &goblin::elf::Header) -> Result<(), RomError> {
    expect_field(ElfField::Class, header.e_ident[EI_CLASS] as u32, ELFCLASS32 as u32)?;
    expect_field(ElfField::ByteOrder, header.e_ident[EI_DATA] as u32, ELFDATA2LSB as u32)?;
    expect_field(ElfField::Type, header.e_type as u32, ET_EXEC as u32)?;
    expect_field(ElfField::Machine, header.e_machine as u32, EM_ARM as u32)?;
    Ok(())
}

pub(crate) struct ElfParser;

impl ElfParser {
    pub(crate) fn parse<'a>(content: &'a [u8], logger: &Logger) -> Result<goblin::elf::Elf<'a>, RomError> {
        let elf = goblin::elf::Elf::parse(content)?;
        verify_header(&elf.header)?;

        logger.debug(format!(
            "  -> {} sections, {} segments, {} symbols",
            elf.section_headers.len(),
            elf.program_headers.len(),
            elf.syms.len()
        ));

        Ok(elf)
    }
}
