//! The backend side: assembling the flat image and stamping the cartridge header

pub mod header;
mod image;

pub(crate) use image::assemble;

pub use header::{
    checksum,
    BASE_ADDRESS,
    HEADER_LENGTH,
    MAX_SIZE,
    TITLE_LENGTH,
};
pub use image::RomImage;
