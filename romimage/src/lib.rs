//! Builds GBA cartridge ROM images from statically linked ARM ELF executables.
//!
//! ```no_run
//! use romimage::{Logger, RomBuilder, RomInfo};
//!
//! let info = RomInfo::builder().title("DEMO").build().unwrap();
//! let rom = RomBuilder::build("demo.elf", &info, &mut Logger::plain()).unwrap();
//! std::fs::write("demo.gba", rom.as_bytes()).unwrap();
//! ```

mod builder;
mod logger;

/* The interface: */
pub mod frontend;
pub mod rom;

pub use builder::{
    RomBuilder,
    RomInfo,
    RomInfoBuilder,
};
pub use frontend::RomError;
pub use logger::Logger;
