use std::{
    error::Error,
    path::{
        Path,
        PathBuf,
    },
    process::exit,
};

use clap::Parser;
use romimage::{
    rom::TITLE_LENGTH,
    Logger,
    RomBuilder,
    RomInfo,
};

#[derive(clap::Parser)]
#[command(author, version, about = "Create a GBA ROM image from an ARM ELF executable", long_about = None)]
struct Args {
    /// Game title. Defaults to the input filename, without extension.
    #[arg(long)]
    title: Option<String>,

    /// The ELF executable to convert
    program: PathBuf,

    /// Where to write the ROM image. Without it the image is only built and checked.
    output: Option<PathBuf>,
}

/// Upper-cased file name with its last extension removed
fn default_title(program: &Path) -> String {
    let name = program.file_name().map(|x| x.to_string_lossy()).unwrap_or_default();
    let stem = match name.rfind('.') {
        Some(idx) => &name[..idx],
        None => &name[..],
    };
    stem.to_uppercase()
}

/// Cut the title to the length of the header field, never in the middle of a character
fn truncate_title(title: &str) -> &str {
    if title.len() <= TITLE_LENGTH {
        return title;
    }

    let mut end = TITLE_LENGTH;

    while !title.is_char_boundary(end) {
        end -= 1;
    }

    &title[..end]
}

fn make_rom(args: &Args, logger: &mut Logger) -> Result<(), Box<dyn Error>> {
    let title = args.title.clone().unwrap_or_else(|| default_title(&args.program));
    let truncated = truncate_title(&title);

    if truncated.len() != title.len() {
        logger.warning(format!("Title is too long, truncating {:?} to {:?} ({} bytes)", title, truncated, TITLE_LENGTH));
    }

    let info = RomInfo::builder().title(truncated).build()?;
    let rom = RomBuilder::build(&args.program, &info, logger)?;

    if let Some(output) = &args.output {
        std::fs::write(output, rom.as_bytes())?;
        logger.info(format!("Wrote {}", output.display()));
    }

    Ok(())
}

fn main() -> ! {
    let args = Args::parse();
    let mut logger = Logger::spinner();
    logger.set_title("Building ROM image");

    let ret = make_rom(&args, &mut logger);

    if let Err(err) = &ret {
        logger.error(format!("Error: {}", err));
    }

    /* exit() skips destructors, so stop the spinner first */
    drop(logger);
    exit(if ret.is_ok() { 0 } else { 1 });
}
