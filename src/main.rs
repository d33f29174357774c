//! Command-line entry point for the batch feature extractor.

use std::path::PathBuf;

use featpack::batch;
use featpack::config::BatchOptions;
use featpack::logging;

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let Some(options) = parse_args(std::env::args().skip(1).collect())? else {
        return Ok(());
    };
    if let Err(err) = logging::init() {
        eprintln!("Logging disabled: {err}");
    }
    let summary = batch::run(&options).map_err(|err| err.to_string())?;
    println!(
        "Extracted {} frames from {} files into {}",
        summary.total_frames,
        summary.total_files,
        summary.output_path.display()
    );
    Ok(())
}

fn parse_args(args: Vec<String>) -> Result<Option<BatchOptions>, String> {
    let mut options = BatchOptions::default();

    let mut idx = 0usize;
    while idx < args.len() {
        match args[idx].as_str() {
            "-h" | "--help" => {
                println!("{}", help_text());
                return Ok(None);
            }
            "--input" => {
                idx += 1;
                let value = args
                    .get(idx)
                    .ok_or_else(|| "--input requires a value".to_string())?;
                options.input_dir = PathBuf::from(value);
            }
            "--out" => {
                idx += 1;
                let value = args
                    .get(idx)
                    .ok_or_else(|| "--out requires a value".to_string())?;
                options.output_path = PathBuf::from(value);
            }
            "--frame-rate" => {
                idx += 1;
                let value = args
                    .get(idx)
                    .ok_or_else(|| "--frame-rate requires a value".to_string())?;
                options.frame_rate = value
                    .parse::<f64>()
                    .map_err(|_| format!("Invalid --frame-rate value: {value}"))?;
            }
            unknown => {
                return Err(format!("Unknown argument: {unknown}\n\n{}", help_text()));
            }
        }
        idx += 1;
    }

    Ok(Some(options))
}

fn help_text() -> String {
    [
        "featpack",
        "",
        "Extracts spectral features (MFCC, mel spectrogram, centroid, and",
        "their deltas) for every file in a directory and writes one archive.",
        "",
        "Usage:",
        "  featpack [--input <dir>] [--out <path>] [--frame-rate <seconds>]",
        "",
        "Options:",
        "  --input <dir>          Input directory (default: ./Audios).",
        "  --out <path>           Archive path (default: librosa_audio_features.pt).",
        "  --frame-rate <f64>     Seconds per analysis frame (default: 0.01).",
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_args_keeps_the_defaults() {
        let options = parse_args(vec![]).unwrap().unwrap();
        assert_eq!(options.input_dir, PathBuf::from("./Audios"));
        assert_eq!(options.frame_rate, 0.01);
    }

    #[test]
    fn flags_override_each_default() {
        let options = parse_args(
            ["--input", "clips", "--out", "feats.pt", "--frame-rate", "0.02"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        )
        .unwrap()
        .unwrap();
        assert_eq!(options.input_dir, PathBuf::from("clips"));
        assert_eq!(options.output_path, PathBuf::from("feats.pt"));
        assert_eq!(options.frame_rate, 0.02);
    }

    #[test]
    fn help_short_circuits_without_options() {
        assert!(parse_args(vec!["--help".to_string()]).unwrap().is_none());
    }

    #[test]
    fn unknown_flags_are_rejected() {
        assert!(parse_args(vec!["--bogus".to_string()]).is_err());
    }
}
