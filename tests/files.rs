use std::fs;
use std::path::PathBuf;

use huff::tools::cli::{HuffOpts, Mode, Output};
use huff::{compress_file, decompress_file, test_file, Error, HeaderFormat};

/// A fresh scratch directory for one test.
fn scratch(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("huff-{}-{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn opts_for(path: &PathBuf, op_mode: Mode) -> HuffOpts {
    HuffOpts {
        file: Some(path.to_string_lossy().into_owned()),
        op_mode,
        ..HuffOpts::new()
    }
}

#[test]
fn compress_then_decompress_file() {
    let dir = scratch("roundtrip");
    let original = dir.join("notes.txt");
    let data = "line one\nline two\nline three\n".repeat(50);
    fs::write(&original, &data).unwrap();

    let report = compress_file(&opts_for(&original, Mode::Zip)).unwrap();
    assert_eq!(report.uncompressed_bytes, data.len() as u64);
    let packed = dir.join("notes.txt.hf");
    assert!(packed.exists());
    assert!(!original.exists(), "input is removed unless --keep");

    assert!(test_file(&opts_for(&packed, Mode::Test)).is_ok());

    decompress_file(&opts_for(&packed, Mode::Unzip)).unwrap();
    assert_eq!(fs::read_to_string(&original).unwrap(), data);
    assert!(!packed.exists());
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn keep_and_counts_header() {
    let dir = scratch("keep");
    let original = dir.join("data.bin");
    let data: Vec<u8> = (0..3000_u32).map(|i| (i % 7) as u8).collect();
    fs::write(&original, &data).unwrap();

    let mut opts = opts_for(&original, Mode::Zip);
    opts.keep_input_files = true;
    opts.header = HeaderFormat::Counts;
    compress_file(&opts).unwrap();
    assert!(original.exists());

    let packed = dir.join("data.bin.hf");
    let mut opts = opts_for(&packed, Mode::Unzip);
    opts.out_file = Some(dir.join("restored.bin").to_string_lossy().into_owned());
    decompress_file(&opts).unwrap();
    assert_eq!(fs::read(dir.join("restored.bin")).unwrap(), data);
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn existing_output_needs_force() {
    let dir = scratch("force");
    let original = dir.join("a.txt");
    fs::write(&original, b"aaaa").unwrap();
    fs::write(dir.join("a.txt.hf"), b"already here").unwrap();

    let mut opts = opts_for(&original, Mode::Zip);
    opts.keep_input_files = true;
    assert!(matches!(compress_file(&opts), Err(Error::OutputExists(_))));
    assert_eq!(fs::read(dir.join("a.txt.hf")).unwrap(), b"already here");

    opts.force_overwrite = true;
    compress_file(&opts).unwrap();
    assert_ne!(fs::read(dir.join("a.txt.hf")).unwrap(), b"already here");
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn bad_file_leaves_no_output() {
    let dir = scratch("bad");
    let bogus = dir.join("bogus.hf");
    fs::write(&bogus, b"definitely not compressed").unwrap();

    assert!(matches!(
        test_file(&opts_for(&bogus, Mode::Test)),
        Err(Error::BadMagic { .. })
    ));
    let opts = HuffOpts {
        output: Output::File,
        ..opts_for(&bogus, Mode::Unzip)
    };
    assert!(decompress_file(&opts).is_err());
    assert!(!dir.join("bogus").exists());
    assert!(bogus.exists());
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn missing_input_leaves_output_alone() {
    let dir = scratch("missing");
    let gone = dir.join("gone.txt");

    // No output is created for an input that cannot be opened
    assert!(matches!(
        compress_file(&opts_for(&gone, Mode::Zip)),
        Err(Error::Io(_))
    ));
    assert!(!dir.join("gone.txt.hf").exists());

    // Even with force, an existing output is not truncated
    fs::write(dir.join("gone.txt.hf"), b"keep me").unwrap();
    let mut opts = opts_for(&gone, Mode::Zip);
    opts.force_overwrite = true;
    assert!(compress_file(&opts).is_err());
    assert_eq!(fs::read(dir.join("gone.txt.hf")).unwrap(), b"keep me");

    let packed = dir.join("gone.txt.hf");
    fs::remove_file(&packed).unwrap();
    assert!(decompress_file(&opts_for(&packed, Mode::Unzip)).is_err());
    assert!(!dir.join("gone.txt").exists());

    fs::write(&gone, b"keep me too").unwrap();
    let mut opts = opts_for(&packed, Mode::Unzip);
    opts.force_overwrite = true;
    assert!(decompress_file(&opts).is_err());
    assert_eq!(fs::read(&gone).unwrap(), b"keep me too");
    let _ = fs::remove_dir_all(&dir);
}
