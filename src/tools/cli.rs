use std::{fmt::Display, fmt::Formatter};

use clap::Parser;
use log::{info, warn};

use crate::huffman_coding::header::HeaderFormat;

/// Zip, Unzip, Test
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Zip,
    Unzip,
    Test,
}
impl Display for Mode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Define the two output channels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    File,
    Stdout,
}
impl Display for Output {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Define all user settable options to control program behavior
#[derive(Debug, Clone)]
pub struct HuffOpts {
    /// Optional name of file to read for input. stdin when None.
    pub file: Option<String>,
    /// Optional name of the output file, overriding the default name.
    pub out_file: Option<String>,
    /// Compress/Decompress/Test
    pub op_mode: Mode,
    /// Location where output is sent
    pub output: Output,
    /// Header written when compressing
    pub header: HeaderFormat,
    /// Don't remove input files after processing
    pub keep_input_files: bool,
    /// Silently overwrite existing files with the same name
    pub force_overwrite: bool,
}

impl HuffOpts {
    pub fn new() -> Self {
        Self {
            file: None,
            out_file: None,
            op_mode: Mode::Zip,
            output: Output::File,
            header: HeaderFormat::Tree,
            keep_input_files: false,
            force_overwrite: false,
        }
    }
}

impl Default for HuffOpts {
    fn default() -> Self {
        Self::new()
    }
}

/// Command Line Interpretation - uses external CLAP crate.
#[derive(Parser, Debug)]
#[clap(
    version,
    about = "A Huffman file compressor",
    long_about = "
    Compresses any file with a single Huffman code built from the byte counts of the whole
    file. The tree is stored in front of the data, so the result decompresses on its own.

    Without a file name, huff reads stdin and writes stdout."
)]
pub struct Args {
    /// Filename of file to process
    #[clap()]
    filename: Option<String>,

    /// Perform compression on the input file (the default)
    #[clap(short = 'z', long = "compress")]
    compress: bool,

    /// Perform decompression on the input file
    #[clap(short = 'd', long = "decompress", conflicts_with = "compress")]
    decompress: bool,

    /// Test compressed file integrity
    #[clap(short = 't', long = "test", conflicts_with_all = &["compress", "decompress"])]
    test: bool,

    /// Write to this file instead of the default name
    #[clap(short = 'o', long = "output")]
    output: Option<String>,

    /// Force overwriting output file
    #[clap(short = 'f', long = "force")]
    force: bool,

    /// Keep input file
    #[clap(short = 'k', long = "keep")]
    keep: bool,

    /// Send output to the terminal
    #[clap(short = 'c', long = "stdout", conflicts_with = "output")]
    stdout: bool,

    /// Store byte counts instead of the tree in the header
    #[clap(long = "counts")]
    counts: bool,

    /// Sets verbosity. -v0 is silent, -v5 is chatty
    #[clap(short = 'v', default_value_t = 2)]
    v: u8,
}

impl Args {
    /// Put command line information from CLAP into our internal structure.
    pub fn into_opts(self) -> HuffOpts {
        let mut opts = HuffOpts::new();
        opts.file = self.filename;
        opts.out_file = self.output;
        if self.decompress {
            opts.op_mode = Mode::Unzip
        };
        if self.test {
            opts.op_mode = Mode::Test
        };
        if self.stdout {
            opts.output = Output::Stdout
        };
        if self.counts {
            opts.header = HeaderFormat::Counts
        };
        opts.keep_input_files = self.keep;
        opts.force_overwrite = self.force;
        opts
    }

    /// The log level selected with -v.
    pub fn level(&self) -> log::LevelFilter {
        match self.v {
            0 => log::LevelFilter::Off,
            1 => log::LevelFilter::Error,
            2 => log::LevelFilter::Warn,
            3 => log::LevelFilter::Info,
            4 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }
}

/// Parse the command line, set the log level and report the resulting configuration.
pub fn init_huff_opts() -> HuffOpts {
    let args = Args::parse();
    log::set_max_level(args.level());
    let opts = args.into_opts();

    // Below we report initialization status to the user
    info!("---- huff Initialization Start ----");
    info!("Verbosity set to {}", log::max_level());
    info!("Operational mode set to {}", opts.op_mode);
    match &opts.file {
        Some(s) => info!("Getting input from the file {}", s),
        None => info!("Getting input from stdin"),
    }
    if opts.file.is_none() && opts.out_file.is_none() {
        warn!("Sending output to stdout")
    }
    if opts.op_mode == Mode::Zip {
        info!("Header set to {}", opts.header);
    }
    if opts.force_overwrite {
        info!("Forcing file overwriting")
    };
    if opts.keep_input_files {
        info!("Keeping input files")
    };
    info!("---- huff Initialization End ----");
    opts
}
