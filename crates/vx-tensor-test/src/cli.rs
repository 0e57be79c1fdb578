//! Command-line interface.

use std::path::PathBuf;

use clap::Parser;
use vx_verify::DType;

/// Matrix-multiply regression test for the device runtime.
#[derive(Parser, Debug)]
#[command(name = "vx-tensor-test", version, about)]
pub struct Options {
    /// Square matrix dimension.
    #[arg(
        short = 's',
        long,
        default_value_t = 16,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub size: u32,

    /// Compiled kernel binary to upload.
    #[arg(short = 'k', long, default_value = "kernel.bin")]
    pub kernel: PathBuf,

    /// Element type the kernel computes over (i32 or f32).
    #[arg(short = 't', long = "type", value_parser = parse_dtype, default_value = "i32")]
    pub dtype: DType,

    /// Seed for input generation.
    #[arg(long, default_value_t = 50)]
    pub seed: u64,

    /// Alias kept for getopt-style invocations.
    #[arg(short = '?', action = clap::ArgAction::Help, hide = true)]
    pub help_alias: Option<bool>,
}

fn parse_dtype(s: &str) -> Result<DType, String> {
    match s.to_ascii_lowercase().as_str() {
        "i32" | "int" | "integer" => Ok(DType::I32),
        "f32" | "float" => Ok(DType::F32),
        other => Err(format!("unknown element type '{other}', expected i32 or f32")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn test_defaults() {
        let opts = Options::try_parse_from(["vx-tensor-test"]).unwrap();
        assert_eq!(opts.size, 16);
        assert_eq!(opts.kernel, PathBuf::from("kernel.bin"));
        assert_eq!(opts.dtype, DType::I32);
        assert_eq!(opts.seed, 50);
    }

    #[test]
    fn test_parse_short_flags() {
        let opts =
            Options::try_parse_from(["t", "-s", "4", "-k", "mm.bin", "-t", "f32"]).unwrap();
        assert_eq!(opts.size, 4);
        assert_eq!(opts.kernel, PathBuf::from("mm.bin"));
        assert_eq!(opts.dtype, DType::F32);
    }

    #[test]
    fn test_parse_long_flags() {
        let opts = Options::try_parse_from([
            "t", "--size", "8", "--kernel", "k.bin", "--type", "integer", "--seed", "7",
        ])
        .unwrap();
        assert_eq!(opts.size, 8);
        assert_eq!(opts.kernel, PathBuf::from("k.bin"));
        assert_eq!(opts.dtype, DType::I32);
        assert_eq!(opts.seed, 7);
    }

    #[test]
    fn test_size_must_be_positive() {
        assert!(Options::try_parse_from(["t", "-s", "0"]).is_err());
    }

    #[test]
    fn test_help_flags() {
        for flag in ["-h", "--help", "-?"] {
            let err = Options::try_parse_from(["t", flag]).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::DisplayHelp, "flag {flag}");
        }
    }

    #[test]
    fn test_unknown_flag_is_rejected() {
        let err = Options::try_parse_from(["t", "-z"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);
    }

    #[test]
    fn test_dtype_spellings() {
        let cases = [
            ("i32", DType::I32),
            ("int", DType::I32),
            ("INTEGER", DType::I32),
            ("f32", DType::F32),
            ("float", DType::F32),
        ];
        for (s, want) in cases {
            assert_eq!(parse_dtype(s).unwrap(), want, "spelling {s}");
        }
        assert!(parse_dtype("u8").is_err());
    }
}
