use std::path::Path;

use crate::{
    frontend::{
        mmap_file,
        AddressWindow,
        ElfParser,
        RomError,
        SectionMapper,
        SymbolValidator,
    },
    logger::Logger,
    rom::{
        assemble,
        header,
        RomImage,
    },
};

/// Metadata that goes into the cartridge header
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RomInfo {
    title: Vec<u8>,
}

impl RomInfo {
    /// The game title, at most [`TITLE_LENGTH`](crate::rom::TITLE_LENGTH) bytes
    pub fn title(&self) -> &[u8] {
        &self.title
    }

    /// Create a [`RomInfoBuilder`]
    pub fn builder() -> RomInfoBuilder {
        RomInfoBuilder {
            title: None,
        }
    }
}

/// The RomInfoBuilder is used to assemble the header metadata of a [`RomImage`]
pub struct RomInfoBuilder {
    title: Option<Vec<u8>>,
}

impl RomInfoBuilder {
    /// Set the game title.
    /// Shortening it to [`TITLE_LENGTH`](crate::rom::TITLE_LENGTH) bytes is up to the caller.
    pub fn title<T: AsRef<[u8]>>(mut self, title: T) -> Self {
        self.title = Some(title.as_ref().to_vec());
        self
    }

    /// Finally, create the [`RomInfo`]
    pub fn build(self) -> Result<RomInfo, &'static str> {
        let title = self.title.ok_or("ROM title was not set")?;
        Ok(RomInfo {
            title,
        })
    }
}

/// Turns a statically linked ARM ELF executable into a cartridge image.
///
/// The stages run in order and the first failing stage aborts the build:
/// 1. parse and validate the ELF header
/// 2. map all allocated sections with file content onto their load addresses
/// 3. reduce them to a single address window starting at [`BASE_ADDRESS`](crate::rom::BASE_ADDRESS)
/// 4. check the `_start` and `rom_header_end` symbols
/// 5. copy the sections into a flat buffer
/// 6. stamp the header
///
/// Everything happens on the calling thread. Progress goes to the `logger` passed in,
/// use [`Logger::quiet`] to build silently.
pub struct RomBuilder;

impl RomBuilder {
    /// Build a ROM image from the ELF file at `path`
    pub fn build<P: AsRef<Path>>(path: P, info: &RomInfo, logger: &mut Logger) -> Result<RomImage, RomError> {
        let path = path.as_ref();
        logger.info(format!("Loading {}", path.display()));

        let file = mmap_file(path)?;
        Self::build_from_bytes(&file[..], info, logger)
    }

    /// Build a ROM image from an ELF file that is already in memory
    pub fn build_from_bytes(content: &[u8], info: &RomInfo, logger: &mut Logger) -> Result<RomImage, RomError> {
        let ret = Self::run(content, info, logger);
        logger.clear_prefix();
        ret
    }

    fn run(content: &[u8], info: &RomInfo, logger: &mut Logger) -> Result<RomImage, RomError> {
        logger.set_prefix("elf");
        let elf = ElfParser::parse(content, logger)?;

        logger.set_prefix("sections");
        let sections = SectionMapper::map(&elf, content, logger)?;
        let window = AddressWindow::compute(&sections)?;
        logger.info(format!("Program data spans {:#010x}..{:#010x} ({:#x} bytes)", window.start(), window.end(), window.size()));

        logger.set_prefix("symbols");
        SymbolValidator::check_elf(&elf)?;
        logger.debug("  -> required symbols are in place");

        logger.set_prefix("rom");
        let mut data = assemble(&window, &sections);
        header::stamp(&mut data, info.title());

        logger.info(format!("ROM image built: {:#x} bytes, checksum {:#04x}", data.len(), data[header::CHECKSUM_OFFSET]));
        Ok(RomImage::new(data))
    }
}
