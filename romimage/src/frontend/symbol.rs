use std::collections::BTreeMap;

use crate::{
    frontend::error::RomError,
    rom::{
        BASE_ADDRESS,
        HEADER_LENGTH,
    },
};

/// Name of the entrypoint symbol. It must sit at the very start of the ROM.
pub const SYM_ENTRY: &str = "_start";

/// Name of the symbol that marks the end of the ROM header
pub const SYM_HEADER_END: &str = "rom_header_end";

/// The symbols that the linker script must define, with their expected addresses
const REQUIRED_SYMBOLS: [(&str, u32); 2] = [(SYM_ENTRY, BASE_ADDRESS), (SYM_HEADER_END, BASE_ADDRESS + HEADER_LENGTH as u32)];

pub(crate) struct SymbolValidator;

impl SymbolValidator {
    /// Check the symbol table of an ELF file
    pub(crate) fn check_elf(elf: &goblin::elf::Elf) -> Result<(), RomError> {
        let symbols = elf.syms.iter().filter_map(|sym| elf.strtab.get_at(sym.st_name).map(|name| (name, sym.st_value)));
        Self::check(symbols)
    }

    /// Check a sequence of `(name, value)` pairs.
    /// The first occurence of a name is the one that counts.
    pub(crate) fn check<'a, I>(symbols: I) -> Result<(), RomError>
    where
        I: IntoIterator<Item = (&'a str, u64)>,
    {
        let mut pending: BTreeMap<&str, u32> = REQUIRED_SYMBOLS.into_iter().collect();
        let mut found = BTreeMap::new();

        for (name, value) in symbols {
            if let Some(expected) = pending.remove(name) {
                found.insert(name, (value as u32, expected));

                if pending.is_empty() {
                    break;
                }
            }
        }

        if !pending.is_empty() {
            return Err(RomError::MissingSymbols {
                names: pending.into_keys().map(str::to_string).collect(),
            });
        }

        for (name, _) in REQUIRED_SYMBOLS {
            if let Some(&(actual, expected)) = found.get(name) {
                if actual != expected {
                    return Err(RomError::SymbolAddress {
                        name: name.to_string(),
                        actual,
                        expected,
                    });
                }
            }
        }

        Ok(())
    }
}
