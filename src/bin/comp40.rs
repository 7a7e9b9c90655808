//! Compress a PPM image to the COMP40 format or decompress it back, writing to stdout

use comp40::pnm::{read_ppm, write_ppm};
use comp40::{ChromaTable, CodecError, compress_to_writer, decompress_from_reader};
use std::env;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::process;

#[derive(Clone, Copy)]
enum Mode {
    Compress,
    Decompress,
}

fn usage(program: &str) -> ! {
    eprintln!("Usage: {program} -c [FILE]");
    eprintln!("       {program} -d [FILE]");
    eprintln!("Reads from stdin when FILE is absent or -");
    process::exit(1);
}

fn open(path: Option<&str>) -> io::Result<Box<dyn BufRead>> {
    match path {
        None | Some("-") => Ok(Box::new(io::stdin().lock())),
        Some(path) => Ok(Box::new(BufReader::new(File::open(path)?))),
    }
}

fn run(mode: Mode, input: Box<dyn BufRead>) -> Result<Vec<u8>, CodecError> {
    let table = ChromaTable::DEFAULT;
    let mut out = Vec::new();

    match mode {
        Mode::Compress => {
            let image = read_ppm(input)?;
            compress_to_writer(&image, &table, &mut out)?;
        }
        Mode::Decompress => {
            let image = decompress_from_reader(input, &table)?;
            write_ppm(&image, &mut out)?;
        }
    }

    Ok(out)
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("comp40");

    let mode = match args.get(1).map(String::as_str) {
        Some("-c") => Mode::Compress,
        Some("-d") => Mode::Decompress,
        _ => usage(program),
    };

    if args.len() > 3 {
        usage(program);
    }

    let path = args.get(2).map(String::as_str);

    let input = match open(path) {
        Ok(input) => input,
        Err(e) => {
            eprintln!("{program}: {}: {e}", path.unwrap_or("-"));
            process::exit(1);
        }
    };

    // Output is buffered so that a failure leaves stdout empty
    let out = match run(mode, input) {
        Ok(out) => out,
        Err(e) => {
            eprintln!("{program}: {e}");
            process::exit(1);
        }
    };

    let mut stdout = io::stdout().lock();

    if let Err(e) = stdout.write_all(&out).and_then(|()| stdout.flush()) {
        eprintln!("{program}: {e}");
        process::exit(1);
    }
}
