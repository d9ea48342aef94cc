//Enable more cargo lint tests
#![warn(rust_2018_idioms)]

use huff::tools::cli::{init_huff_opts, Mode};
use huff::{compress_file, decompress_file, test_file};

use log::{error, info, LevelFilter};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

fn main() {
    // Log to stderr so compressed data on stdout stays clean. The level is narrowed by -v.
    if let Err(e) = TermLogger::init(
        LevelFilter::Trace,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    ) {
        eprintln!("huff: could not start logging: {}", e);
    }

    let options = init_huff_opts();

    //----- Figure out what we need to do and go do it
    let result = match options.op_mode {
        Mode::Zip => compress_file(&options),
        Mode::Unzip => decompress_file(&options),
        Mode::Test => test_file(&options),
    };

    match result {
        Ok(report) => info!("Done. {}", report),
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    }
}
