//! Layout of the cartridge header and the routines that stamp it

use std::ops::Range;

/// Address at which the cartridge ROM is mapped
pub const BASE_ADDRESS: u32 = 0x0800_0000;

/// Maximum size of a ROM image. Larger cartridges exist but need bank switching.
pub const MAX_SIZE: u32 = 32 * 1024 * 1024;

/// Length of the cartridge header
pub const HEADER_LENGTH: usize = 0xc0;

/// Length of the title field
pub const TITLE_LENGTH: usize = 12;

/// Bytes at the start of the header that belong to the program (the entrypoint branch)
pub const ENTRY_LENGTH: usize = 4;

pub const LOGO_OFFSET: usize = ENTRY_LENGTH;
pub const TITLE_OFFSET: usize = 0xa0;
pub const GAME_CODE_OFFSET: usize = 0xac;
pub const MAKER_CODE_OFFSET: usize = 0xb0;
pub const FIXED_VALUE_OFFSET: usize = 0xb2;
pub const CHECKSUM_OFFSET: usize = 0xbd;

/// "01" is Nintendo
pub const MAKER_CODE: [u8; 2] = *b"01";

pub const FIXED_VALUE: u8 = 0x96;

/// The bytes covered by the header checksum
pub const CHECKSUM_RANGE: Range<usize> = TITLE_OFFSET..CHECKSUM_OFFSET;

const CHECKSUM_SEED: u32 = !0x18;

/// Compressed logo bitmap that the BIOS compares on boot
pub static LOGO: [u8; 156] = [
    0x24, 0xFF, 0xAE, 0x51, 0x69, 0x9A, 0xA2, 0x21, 0x3D, 0x84, 0x82, 0x0A, 0x84, 0xE4, 0x09, 0xAD,
    0x11, 0x24, 0x8B, 0x98, 0xC0, 0x81, 0x7F, 0x21, 0xA3, 0x52, 0xBE, 0x19, 0x93, 0x09, 0xCE, 0x20,
    0x10, 0x46, 0x4A, 0x4A, 0xF8, 0x27, 0x31, 0xEC, 0x58, 0xC7, 0xE8, 0x33, 0x82, 0xE3, 0xCE, 0xBF,
    0x85, 0xF4, 0xDF, 0x94, 0xCE, 0x4B, 0x09, 0xC1, 0x94, 0x56, 0x8A, 0xC0, 0x13, 0x72, 0xA7, 0xFC,
    0x9F, 0x84, 0x4D, 0x73, 0xA3, 0xCA, 0x9A, 0x61, 0x58, 0x97, 0xA3, 0x27, 0xFC, 0x03, 0x98, 0x76,
    0x23, 0x1D, 0xC7, 0x61, 0x03, 0x04, 0xAE, 0x56, 0xBF, 0x38, 0x84, 0x00, 0x40, 0xA7, 0x0E, 0xFD,
    0xFF, 0x52, 0xFE, 0x03, 0x6F, 0x95, 0x30, 0xF1, 0x97, 0xFB, 0xC0, 0x85, 0x60, 0xD6, 0x80, 0x25,
    0xA9, 0x63, 0xBE, 0x03, 0x01, 0x4E, 0x38, 0xE2, 0xF9, 0xA2, 0x34, 0xFF, 0xBB, 0x3E, 0x03, 0x44,
    0x78, 0x00, 0x90, 0xCB, 0x88, 0x11, 0x3A, 0x94, 0x65, 0xC0, 0x7C, 0x63, 0x87, 0xF0, 0x3C, 0xAF,
    0xD6, 0x25, 0xE4, 0x8B, 0x38, 0x0A, 0xAC, 0x72, 0x21, 0xD4, 0xF8, 0x07,
];

/// The header complement check: subtract every byte from a fixed seed
/// with 32-bit wraparound and keep the low byte.
pub fn checksum(data: &[u8]) -> u8 {
    let mut val = CHECKSUM_SEED;

    for &b in data {
        val = val.wrapping_sub(b as u32);
    }

    val as u8
}

/// Overwrite the header of an assembled image.
///
/// Everything from the end of the entrypoint branch up to [`HEADER_LENGTH`] is cleared
/// first, so the first [`ENTRY_LENGTH`] bytes must already hold the program's code.
/// Titles longer than [`TITLE_LENGTH`] are clipped. The game code field stays zero.
pub(crate) fn stamp(rom: &mut [u8], title: &[u8]) {
    let header = &mut rom[..HEADER_LENGTH];

    header[ENTRY_LENGTH..].fill(0);
    header[LOGO_OFFSET..LOGO_OFFSET + LOGO.len()].copy_from_slice(&LOGO);

    let title = &title[..title.len().min(TITLE_LENGTH)];
    header[TITLE_OFFSET..TITLE_OFFSET + title.len()].copy_from_slice(title);

    header[MAKER_CODE_OFFSET..MAKER_CODE_OFFSET + MAKER_CODE.len()].copy_from_slice(&MAKER_CODE);
    header[FIXED_VALUE_OFFSET] = FIXED_VALUE;
    header[CHECKSUM_OFFSET] = checksum(&header[CHECKSUM_RANGE]);
}
