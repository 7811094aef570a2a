use crate::{
    frontend::{
        AddressWindow,
        MappedSection,
    },
    rom::header::{
        checksum,
        BASE_ADDRESS,
        CHECKSUM_OFFSET,
        CHECKSUM_RANGE,
        GAME_CODE_OFFSET,
        HEADER_LENGTH,
        TITLE_OFFSET,
    },
};

/// A finished cartridge image, ready to be written to disk or flashed
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RomImage {
    data: Vec<u8>,
}

impl RomImage {
    pub(crate) fn new(data: Vec<u8>) -> Self {
        debug_assert!(data.len() >= HEADER_LENGTH);
        Self {
            data,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The title field without its zero padding
    pub fn title(&self) -> &[u8] {
        let field = &self.data[TITLE_OFFSET..GAME_CODE_OFFSET];
        let len = field.iter().position(|&b| b == 0).unwrap_or(field.len());
        &field[..len]
    }

    /// The header checksum as stored in the image
    pub fn checksum(&self) -> u8 {
        self.data[CHECKSUM_OFFSET]
    }

    /// Recompute the header checksum and compare it with the stored one
    pub fn verify_checksum(&self) -> bool {
        checksum(&self.data[CHECKSUM_RANGE]) == self.checksum()
    }
}

impl AsRef<[u8]> for RomImage {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

impl From<RomImage> for Vec<u8> {
    fn from(rom: RomImage) -> Self {
        rom.data
    }
}

/// Copy all sections into a zeroed buffer at their offset from [`BASE_ADDRESS`].
/// The buffer is at least [`HEADER_LENGTH`] bytes long. Overlapping sections are
/// not detected, the later section wins.
pub(crate) fn assemble(window: &AddressWindow, sections: &[MappedSection]) -> Vec<u8> {
    let len = (window.extent() as usize).max(HEADER_LENGTH);
    let mut data = vec![0u8; len];

    for section in sections {
        let start = (section.load_address() - BASE_ADDRESS) as usize;
        let end = start + section.size() as usize;
        data[start..end].copy_from_slice(section.data());
    }

    data
}
