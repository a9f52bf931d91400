//! Glue between the assembler, the image format and the processor: load or
//! assemble a program, run it, and hand back the machine for inspection.

use pluto::{ExitCode, Processor};
use std::fmt;
use std::fs::File;
use std::io::prelude::*;
use std::io::BufReader;
use std::path::Path;


#[derive(Debug)]
pub enum Error {
    Asm(plasm::Error),
    Io(std::io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Asm(err) => write!(f, "{}", err),
            Error::Io(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for Error {}

impl From<plasm::Error> for Error {
    fn from(err: plasm::Error) -> Error {
        Error::Asm(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}

fn run(executable: &plexfile::Executable, memory_size: usize) -> (Processor, ExitCode) {
    let mut processor = Processor::new(memory_size);
    let exit_code = processor.run(
        executable.code(),
        executable.data(),
        executable.entry_point() as usize,
    );
    (processor, exit_code)
}

/// Assembles a source buffer and runs it.
pub fn run_source(source: &str, memory_size: usize) -> Result<(Processor, ExitCode), Error> {
    let executable = plasm::assemble(source)?;
    Ok(run(&executable, memory_size))
}

/// Reads, assembles and runs a source file.
pub fn run_file<P: AsRef<Path>>(
    path: P,
    memory_size: usize,
) -> Result<(Processor, ExitCode), Error> {
    let mut source = String::new();
    BufReader::new(File::open(path)?).read_to_string(&mut source)?;
    run_source(&source, memory_size)
}

/// Loads a `.plx` image and runs it.
pub fn run_image<P: AsRef<Path>>(
    path: P,
    memory_size: usize,
) -> Result<(Processor, ExitCode), Error> {
    let executable = plexfile::read_file(path)?;
    Ok(run(&executable, memory_size))
}
