//! A small ELF writer that produces just enough of an executable
//! for the ROM builder: sections, PT_LOAD segments and a symbol table.

use std::path::PathBuf;

use goblin::{
    elf::{
        header::{
            EI_CLASS,
            EI_DATA,
            EI_VERSION,
            ELFCLASS32,
            ELFCLASS64,
            ELFDATA2LSB,
            ELFDATA2MSB,
            ELFMAG,
            EM_ARM,
            ET_EXEC,
            EV_CURRENT,
            SIZEOF_IDENT,
        },
        program_header::{
            PF_R,
            PF_X,
            PT_LOAD,
        },
        section_header::{
            SHF_ALLOC,
            SHF_EXECINSTR,
            SHF_WRITE,
            SHN_ABS,
            SHT_NOBITS,
            SHT_PROGBITS,
            SHT_STRTAB,
            SHT_SYMTAB,
        },
        sym::{
            STB_GLOBAL,
            STT_NOTYPE,
        },
    },
    elf32::{
        header::{
            Header,
            SIZEOF_EHDR,
        },
        program_header::{
            ProgramHeader,
            SIZEOF_PHDR,
        },
        section_header::{
            SectionHeader,
            SIZEOF_SHDR,
        },
        sym::{
            Sym,
            SIZEOF_SYM,
        },
    },
    elf64,
};
pub use goblin::elf::header::{
    EM_386,
    ET_DYN,
};
use scroll::{
    Endian,
    Pwrite,
};

pub const BASE: u32 = 0x0800_0000;

/// The ARM instruction `b 0x080000c0`, little-endian
pub const BRANCH: [u8; 4] = [0x2e, 0x00, 0x00, 0xea];

struct Section {
    name: String,
    sh_type: u32,
    flags: u32,
    data: Vec<u8>,
    nobits_size: usize,
}

struct Segment {
    first: usize,
    last: usize,
    paddr: u32,
}

fn align(value: usize, alignment: usize) -> usize {
    (value + alignment - 1) / alignment * alignment
}

fn ident(class: u8, data: u8) -> [u8; SIZEOF_IDENT] {
    let mut ident = [0u8; SIZEOF_IDENT];
    ident[..ELFMAG.len()].copy_from_slice(ELFMAG);
    ident[EI_CLASS] = class;
    ident[EI_DATA] = data;
    ident[EI_VERSION] = EV_CURRENT;
    ident
}

fn string_table<'a, I: IntoIterator<Item = &'a str>>(names: I) -> (Vec<u8>, Vec<u32>) {
    let mut table = vec![0u8];
    let mut indices = Vec::new();

    for name in names {
        indices.push(table.len() as u32);
        table.extend_from_slice(name.as_bytes());
        table.push(0);
    }

    (table, indices)
}

/// Builder for a 32-bit ELF executable
pub struct ElfFile {
    little_endian: bool,
    e_type: u16,
    machine: u16,
    sections: Vec<Section>,
    segments: Vec<Segment>,
    symbols: Vec<(String, u32)>,
}

impl ElfFile {
    /// An empty little-endian ARM executable
    pub fn new() -> Self {
        Self {
            little_endian: true,
            e_type: ET_EXEC,
            machine: EM_ARM,
            sections: Vec::new(),
            segments: Vec::new(),
            symbols: Vec::new(),
        }
    }

    /// A well-formed program: a 0xc0 byte header section starting with a branch,
    /// followed by `text`, both loaded at the cartridge base address.
    pub fn program(text: &[u8]) -> Self {
        let mut header = vec![0xff; 0xc0];
        header[..4].copy_from_slice(&BRANCH);

        Self::new()
            .section(".header", &header)
            .code(".text", text)
            .bss(".bss", 0x400)
            .segment(0, 1, BASE)
            .required_symbols()
    }

    pub fn big_endian(mut self) -> Self {
        self.little_endian = false;
        self
    }

    pub fn e_type(mut self, e_type: u16) -> Self {
        self.e_type = e_type;
        self
    }

    pub fn machine(mut self, machine: u16) -> Self {
        self.machine = machine;
        self
    }

    fn push(mut self, name: &str, sh_type: u32, flags: u32, data: &[u8], nobits_size: usize) -> Self {
        self.sections.push(Section {
            name: name.to_string(),
            sh_type,
            flags,
            data: data.to_vec(),
            nobits_size,
        });
        self
    }

    /// Allocated read-only data
    pub fn section(self, name: &str, data: &[u8]) -> Self {
        self.push(name, SHT_PROGBITS, SHF_ALLOC, data, 0)
    }

    /// Allocated executable code
    pub fn code(self, name: &str, data: &[u8]) -> Self {
        self.push(name, SHT_PROGBITS, SHF_ALLOC | SHF_EXECINSTR, data, 0)
    }

    /// Zero-initialized data that takes no space in the file
    pub fn bss(self, name: &str, size: usize) -> Self {
        self.push(name, SHT_NOBITS, SHF_ALLOC | SHF_WRITE, &[], size)
    }

    /// A section that is not loaded at runtime, like `.comment`
    pub fn unallocated(self, name: &str, data: &[u8]) -> Self {
        self.push(name, SHT_PROGBITS, 0, data, 0)
    }

    /// A PT_LOAD segment covering the file contents of sections `first..=last`
    /// (indices in the order they were added)
    pub fn segment(mut self, first: usize, last: usize, paddr: u32) -> Self {
        self.segments.push(Segment {
            first,
            last,
            paddr,
        });
        self
    }

    pub fn symbol(mut self, name: &str, value: u32) -> Self {
        self.symbols.push((name.to_string(), value));
        self
    }

    /// `_start` and `rom_header_end` at their expected addresses
    pub fn required_symbols(self) -> Self {
        self.symbol("_start", BASE).symbol("rom_header_end", BASE + 0xc0)
    }

    /// Lay out the file as: header, program headers, section contents, symbol table,
    /// string tables, section headers. The section header table starts with the null
    /// entry and ends with `.symtab`, `.strtab` and `.shstrtab`.
    pub fn write(&self) -> Vec<u8> {
        let endian = if self.little_endian { Endian::Little } else { Endian::Big };
        let nsections = self.sections.len();
        let strtab_idx = nsections + 2;
        let shstrtab_idx = nsections + 3;
        let shnum = nsections + 4;

        let phoff = if self.segments.is_empty() { 0 } else { SIZEOF_EHDR };
        let mut cursor = align(SIZEOF_EHDR + SIZEOF_PHDR * self.segments.len(), 16);
        let mut offsets = Vec::new();

        for section in &self.sections {
            cursor = align(cursor, 4);
            offsets.push(cursor);
            cursor += section.data.len();
        }

        let (strtab, sym_names) = string_table(self.symbols.iter().map(|(name, _)| name.as_str()));
        let (shstrtab, sh_names) = string_table(self.sections.iter().map(|s| s.name.as_str()).chain([".symtab", ".strtab", ".shstrtab"]));

        let symtab_off = align(cursor, 4);
        let symtab_size = SIZEOF_SYM * (self.symbols.len() + 1);
        let strtab_off = symtab_off + symtab_size;
        let shstrtab_off = strtab_off + strtab.len();
        let shoff = align(shstrtab_off + shstrtab.len(), 4);

        let mut data = vec![0u8; shoff + SIZEOF_SHDR * shnum];

        let header = Header {
            e_ident: ident(ELFCLASS32, if self.little_endian { ELFDATA2LSB } else { ELFDATA2MSB }),
            e_type: self.e_type,
            e_machine: self.machine,
            e_version: EV_CURRENT as u32,
            e_entry: BASE,
            e_phoff: phoff as u32,
            e_shoff: shoff as u32,
            e_flags: 0x0500_0000,
            e_ehsize: SIZEOF_EHDR as u16,
            e_phentsize: SIZEOF_PHDR as u16,
            e_phnum: self.segments.len() as u16,
            e_shentsize: SIZEOF_SHDR as u16,
            e_shnum: shnum as u16,
            e_shstrndx: shstrtab_idx as u16,
        };
        data.pwrite_with(header, 0, endian).unwrap();

        for (i, segment) in self.segments.iter().enumerate() {
            let start = offsets[segment.first];
            let end = offsets[segment.last] + self.sections[segment.last].data.len();
            let phdr = ProgramHeader {
                p_type: PT_LOAD,
                p_offset: start as u32,
                p_vaddr: segment.paddr,
                p_paddr: segment.paddr,
                p_filesz: (end - start) as u32,
                p_memsz: (end - start) as u32,
                p_flags: PF_R | PF_X,
                p_align: 4,
            };
            data.pwrite_with(phdr, phoff + i * SIZEOF_PHDR, endian).unwrap();
        }

        for (section, &offset) in self.sections.iter().zip(&offsets) {
            data[offset..offset + section.data.len()].copy_from_slice(&section.data);
        }

        /* Entry 0 stays the null symbol */
        for (i, ((_, value), &name)) in self.symbols.iter().zip(&sym_names).enumerate() {
            let sym = Sym {
                st_name: name,
                st_value: *value,
                st_size: 0,
                st_info: (STB_GLOBAL << 4) | STT_NOTYPE,
                st_other: 0,
                st_shndx: SHN_ABS as u16,
            };
            data.pwrite_with(sym, symtab_off + (i + 1) * SIZEOF_SYM, endian).unwrap();
        }

        data[strtab_off..strtab_off + strtab.len()].copy_from_slice(&strtab);
        data[shstrtab_off..shstrtab_off + shstrtab.len()].copy_from_slice(&shstrtab);

        let mut headers = vec![SectionHeader::default()];

        for (i, section) in self.sections.iter().enumerate() {
            let size = if section.sh_type == SHT_NOBITS { section.nobits_size } else { section.data.len() };
            headers.push(SectionHeader {
                sh_name: sh_names[i],
                sh_type: section.sh_type,
                sh_flags: section.flags,
                sh_offset: offsets[i] as u32,
                sh_size: size as u32,
                sh_addralign: 4,
                ..Default::default()
            });
        }

        headers.push(SectionHeader {
            sh_name: sh_names[nsections],
            sh_type: SHT_SYMTAB,
            sh_offset: symtab_off as u32,
            sh_size: symtab_size as u32,
            sh_link: strtab_idx as u32,
            sh_addralign: 4,
            sh_entsize: SIZEOF_SYM as u32,
            ..Default::default()
        });

        for (name, offset, size) in [(sh_names[nsections + 1], strtab_off, strtab.len()), (sh_names[nsections + 2], shstrtab_off, shstrtab.len())] {
            headers.push(SectionHeader {
                sh_name: name,
                sh_type: SHT_STRTAB,
                sh_offset: offset as u32,
                sh_size: size as u32,
                sh_addralign: 1,
                ..Default::default()
            });
        }

        for (i, shdr) in headers.into_iter().enumerate() {
            data.pwrite_with(shdr, shoff + i * SIZEOF_SHDR, endian).unwrap();
        }

        data
    }

    /// Write the file into the temp directory and return its path
    pub fn write_temp(&self, name: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("romimage-{}-{}.elf", std::process::id(), name));
        std::fs::write(&path, self.write()).unwrap();
        path
    }
}

/// The bare header of a 64-bit ELF file without any sections or segments
pub fn elf64_header_only() -> Vec<u8> {
    let header = elf64::header::Header {
        e_ident: ident(ELFCLASS64, ELFDATA2LSB),
        e_type: ET_EXEC,
        e_machine: EM_ARM,
        e_version: EV_CURRENT as u32,
        e_ehsize: elf64::header::SIZEOF_EHDR as u16,
        e_phentsize: elf64::program_header::SIZEOF_PHDR as u16,
        e_shentsize: elf64::section_header::SIZEOF_SHDR as u16,
        ..Default::default()
    };

    let mut data = vec![0u8; elf64::header::SIZEOF_EHDR];
    data.pwrite_with(header, 0, Endian::Little).unwrap();
    data
}
