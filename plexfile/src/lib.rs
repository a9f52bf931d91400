//! The `.plx` program image: the assembled code segment, the data image and
//! the two addresses the processor needs to start running.
//!
//! On disk an image is a fixed header (code length in words, data length in
//! bytes, data base address, entry point) followed by the code as big-endian
//! 64-bit words and the raw data bytes.

use byteorder::{ReadBytesExt, WriteBytesExt};
use std::fs::File;
use std::io::prelude::*;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use util::Endian;

#[derive(Debug, PartialEq)]
pub struct Executable {
    code: Vec<u64>,
    data: Vec<u8>,
    data_addr: u64,
    entry_point: u32,
}

impl Executable {
    pub fn from(code: Vec<u64>, data: Vec<u8>, data_addr: u64, entry_point: u32) -> Executable {
        Executable {
            code,
            data,
            data_addr,
            entry_point,
        }
    }

    pub fn copy_from(code: &[u64], data: &[u8], data_addr: u64, entry_point: u32) -> Executable {
        Executable {
            code: Vec::from(code),
            data: Vec::from(data),
            data_addr,
            entry_point,
        }
    }

    pub fn code(&self) -> &[u64] {
        &self.code[..]
    }

    pub fn data(&self) -> &[u8] {
        &self.data[..]
    }

    /// Base address data labels were resolved against.
    pub fn data_addr(&self) -> u64 {
        self.data_addr
    }

    /// Instruction index where execution begins.
    pub fn entry_point(&self) -> u32 {
        self.entry_point
    }
}

pub fn read<R: Read>(reader: &mut R) -> std::io::Result<Executable> {
    let code_len = reader.read_u32::<Endian>()?;
    let data_len = reader.read_u32::<Endian>()?;
    let data_addr = reader.read_u64::<Endian>()?;
    let entry_point = reader.read_u32::<Endian>()?;

    let mut code = Vec::with_capacity(code_len as usize);
    for _ in 0..code_len {
        code.push(reader.read_u64::<Endian>()?);
    }

    let mut data = vec![0; data_len as usize];
    reader.read_exact(&mut data)?;

    Ok(Executable::from(code, data, data_addr, entry_point))
}

pub fn write<W: Write>(writer: &mut W, executable: &Executable) -> std::io::Result<()> {
    writer.write_u32::<Endian>(executable.code.len() as u32)?;
    writer.write_u32::<Endian>(executable.data.len() as u32)?;
    writer.write_u64::<Endian>(executable.data_addr)?;
    writer.write_u32::<Endian>(executable.entry_point)?;

    for word in &executable.code {
        writer.write_u64::<Endian>(*word)?;
    }
    writer.write_all(&executable.data[..])?;

    Ok(())
}

pub trait ReadPlxExt: Read + Sized {
    fn read_plx(&mut self) -> std::io::Result<Executable> {
        read(self)
    }
}

impl<R: Read + Sized> ReadPlxExt for R {}

pub trait WritePlxExt: Write + Sized {
    fn write_plx(&mut self, executable: &Executable) -> std::io::Result<()> {
        write(self, executable)
    }
}

impl<W: Write + Sized> WritePlxExt for W {}

pub fn read_file<P: AsRef<Path>>(path: P) -> std::io::Result<Executable> {
    BufReader::new(File::open(path)?).read_plx()
}

pub fn write_file<P: AsRef<Path>>(path: P, executable: &Executable) -> std::io::Result<()> {
    BufWriter::new(File::create(path)?).write_plx(executable)
}
