use crate::{
    frontend::{
        error::{
            RangeViolation,
            RomError,
        },
        section::MappedSection,
    },
    rom::{
        BASE_ADDRESS,
        MAX_SIZE,
    },
};

/// The contiguous span of cartridge address space covered by the program data
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AddressWindow {
    start: u32,
    end: u32,
}

impl AddressWindow {
    /// Reduce the mapped sections to a single window and check that it starts
    /// at the cartridge base address and does not exceed the maximum ROM size.
    pub(crate) fn compute(sections: &[MappedSection]) -> Result<Self, RomError> {
        let start = sections.iter().map(|s| s.load_address() as u64).min().ok_or(RomError::NoData)?;
        let end = sections.iter().map(|s| s.end_address()).max().ok_or(RomError::NoData)?;

        if start >= end {
            return Err(RomError::NoData);
        }

        if start < BASE_ADDRESS as u64 {
            return Err(RangeViolation::BelowBase {
                start: start as u32,
                base: BASE_ADDRESS,
            }
            .into());
        }

        let size = end - start;

        /* Data running past the end of the 32-bit address space is also too large */
        let end = match u32::try_from(end) {
            Ok(end) if size <= MAX_SIZE as u64 => end,
            _ => {
                return Err(RangeViolation::TooLarge {
                    size: u32::try_from(size).unwrap_or(u32::MAX),
                    max: MAX_SIZE,
                }
                .into())
            },
        };

        Ok(Self {
            start: start as u32,
            end,
        })
    }

    /// Lowest load address of any mapped section
    pub fn start(&self) -> u32 {
        self.start
    }

    /// One past the highest address occupied by any mapped section
    pub fn end(&self) -> u32 {
        self.end
    }

    /// Size of the program data in bytes
    pub fn size(&self) -> u32 {
        self.end - self.start
    }

    /// Number of bytes from the base address to the end of the window.
    /// Sections are always placed relative to [`BASE_ADDRESS`], so this is the
    /// amount of space the assembled image needs.
    pub fn extent(&self) -> u32 {
        self.end - BASE_ADDRESS
    }
}
