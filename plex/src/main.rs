#[macro_use]
extern crate clap;

use clap::{Arg, ArgGroup};
use std::fs::File;
use std::io::prelude::*;
use std::io::BufReader;

fn main() {
    let matches = app_from_crate!()
        .arg(
            Arg::with_name("SOURCE")
                .help("Sets the assembly source file to run")
                .index(1),
        )
        .arg(
            Arg::with_name("program")
                .short("p")
                .long("program")
                .takes_value(true)
                .value_name("PROGRAM")
                .help("Sets a prebuilt .plx image to run"),
        )
        .arg(
            Arg::with_name("memory")
                .short("m")
                .long("memory")
                .takes_value(true)
                .value_name("MEMORY")
                .default_value("32768")
                .help("Sets the size of the memory in cells"),
        )
        .arg(
            Arg::with_name("debug")
                .short("d")
                .long("debug")
                .help("Prints the token stream and disassembly before running"),
        )
        .group(
            ArgGroup::with_name("input")
                .args(&["SOURCE", "program"])
                .required(true),
        )
        .get_matches();

    let memory_size = value_t!(matches.value_of("memory"), usize).unwrap_or_else(|e| e.exit());
    let debug = matches.is_present("debug");

    let result = match matches.value_of("SOURCE") {
        Some(source_path) => run_source_path(source_path, memory_size, debug),
        None => {
            let program = matches.value_of("program").unwrap();
            plex::run_image(program, memory_size)
        }
    };

    match result {
        Ok((_, exit_code)) => {
            println!("Exit code: {:?}", exit_code);
            if exit_code != pluto::ExitCode::Halted {
                std::process::exit(2);
            }
        }
        Err(err) => {
            eprintln!("{}", err);
            std::process::exit(1);
        }
    }
}

fn run_source_path(
    path: &str,
    memory_size: usize,
    debug: bool,
) -> Result<(pluto::Processor, pluto::ExitCode), plex::Error> {
    let mut source = String::new();
    BufReader::new(File::open(path)?).read_to_string(&mut source)?;

    if debug {
        println!("* tokens");
        for token in plasm::tokenize(&source) {
            println!("{:?} {:?}", token.kind, token.value);
        }

        let executable = plasm::assemble(&source)?;
        println!("\n* disassembly");
        print!("{}", pluto::disassemble(executable.code()));
        println!("\n* execution");
    }

    plex::run_source(&source, memory_size)
}
