use goblin::elf::{
    program_header::ProgramHeader,
    section_header::SHT_NOBITS,
};

use crate::{
    frontend::error::RomError,
    logger::Logger,
};

/// A section of the ELF file that contributes bytes to the ROM image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MappedSection<'a> {
    name: &'a str,
    load_address: u32,
    size: u32,
    data: &'a [u8],
}

impl<'a> MappedSection<'a> {
    pub(crate) fn new(name: &'a str, load_address: u32, data: &'a [u8]) -> Self {
        Self {
            name,
            load_address,
            size: data.len() as u32,
            data,
        }
    }

    /// The name of the section in the section header string table
    pub fn name(&self) -> &'a str {
        self.name
    }

    /// The physical address (LMA) of the first byte of this section
    pub fn load_address(&self) -> u32 {
        self.load_address
    }

    /// The number of bytes this section occupies in the file and in memory
    pub fn size(&self) -> u32 {
        self.size
    }

    /// The address one past the last byte, computed without overflowing
    pub fn end_address(&self) -> u64 {
        self.load_address as u64 + self.size as u64
    }

    /// The raw content of this section
    pub fn data(&self) -> &'a [u8] {
        self.data
    }
}

/// Translate a file offset into a load address with the first segment whose
/// file range contains it.
fn file_offset_to_lma(program_headers: &[ProgramHeader], offset: u64) -> Option<u64> {
    for ph in program_headers {
        if ph.p_offset <= offset && offset - ph.p_offset < ph.p_filesz {
            return Some(offset - ph.p_offset + ph.p_paddr);
        }
    }

    None
}

pub(crate) struct SectionMapper;

impl SectionMapper {
    /// Collect all allocated sections that have file content, in section header order
    pub(crate) fn map<'a>(elf: &goblin::elf::Elf<'a>, content: &'a [u8], logger: &Logger) -> Result<Vec<MappedSection<'a>>, RomError> {
        let mut sections = Vec::new();

        for sh in &elf.section_headers {
            if !sh.is_alloc() || sh.sh_type == SHT_NOBITS || sh.sh_size == 0 {
                continue;
            }

            let name = elf.shdr_strtab.get_at(sh.sh_name).unwrap_or("<unnamed>");

            let lma = file_offset_to_lma(&elf.program_headers, sh.sh_offset).ok_or_else(|| RomError::SectionMap {
                name: name.to_string(),
                offset: sh.sh_offset,
            })?;

            let data = sh
                .file_range()
                .and_then(|range| content.get(range))
                .ok_or_else(|| RomError::SectionData {
                    name: name.to_string(),
                    offset: sh.sh_offset,
                    size: sh.sh_size,
                })?;

            let section = MappedSection::new(name, lma as u32, data);
            logger.debug(format!("  -> {} at {:#010x} ({:#x} bytes)", name, section.load_address(), section.size()));
            sections.push(section);
        }

        Ok(sections)
    }
}
