//! End-to-end batch runs over generated WAV fixtures.

use std::f32::consts::PI;
use std::path::{Path, PathBuf};

use featpack::analysis::FEATURE_CHANNELS;
use featpack::archive::read_archive;
use featpack::batch::{self, BatchError};
use featpack::config::BatchOptions;
use hound::{SampleFormat, WavSpec, WavWriter};
use tempfile::TempDir;

const SAMPLE_RATE: u32 = 22_050;

fn write_sine_wav(path: &Path, seconds: f32, freq: f32) {
    let spec = WavSpec {
        channels: 1,
        sample_rate: SAMPLE_RATE,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut writer = WavWriter::create(path, spec).unwrap();
    let len = (seconds * SAMPLE_RATE as f32).round() as usize;
    for i in 0..len {
        let phase = 2.0 * PI * freq * i as f32 / SAMPLE_RATE as f32;
        writer
            .write_sample((phase.sin() * 0.7 * i16::MAX as f32) as i16)
            .unwrap();
    }
    writer.finalize().unwrap();
}

struct Fixture {
    _root: TempDir,
    audios: PathBuf,
    output: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let root = TempDir::new().unwrap();
        let audios = root.path().join("audios");
        std::fs::create_dir(&audios).unwrap();
        let output = root.path().join("features.pt");
        Self {
            _root: root,
            audios,
            output,
        }
    }

    fn options(&self) -> BatchOptions {
        BatchOptions {
            input_dir: self.audios.clone(),
            output_path: self.output.clone(),
            frame_rate: 0.01,
        }
    }
}

#[test]
fn one_second_tone_round_trips_through_the_archive() {
    let fixture = Fixture::new();
    write_sine_wav(&fixture.audios.join("tone.wav"), 1.0, 440.0);

    let summary = batch::run(&fixture.options()).unwrap();
    assert_eq!(summary.total_files, 1);

    let archive = read_archive(&fixture.output).unwrap();
    assert_eq!(archive.len(), 1);
    let record = archive.get("tone").expect("key should be the bare stem");
    assert_eq!(record.fps, 100);
    assert_eq!(record.features.ncols(), FEATURE_CHANNELS);
    assert_eq!(record.features.ncols(), 298);
    assert!(
        record.features.nrows().abs_diff(100) <= 1,
        "frames {}",
        record.features.nrows()
    );
}

#[test]
fn multi_dot_names_are_truncated_at_the_first_dot() {
    let fixture = Fixture::new();
    write_sine_wav(&fixture.audios.join("a.b.wav"), 0.2, 880.0);

    batch::run(&fixture.options()).unwrap();
    let archive = read_archive(&fixture.output).unwrap();
    assert!(archive.contains_key("a"));
    assert!(!archive.contains_key("a.b"));
}

#[test]
fn colliding_truncated_names_keep_a_single_record() {
    let fixture = Fixture::new();
    write_sine_wav(&fixture.audios.join("x.wav"), 0.2, 440.0);
    write_sine_wav(&fixture.audios.join("x.alt.wav"), 0.3, 660.0);

    let summary = batch::run(&fixture.options()).unwrap();
    assert_eq!(summary.total_files, 2);

    let archive = read_archive(&fixture.output).unwrap();
    assert_eq!(archive.len(), 1);
    assert!(archive.contains_key("x"));
}

#[test]
fn repeated_runs_produce_identical_archives() {
    let fixture = Fixture::new();
    write_sine_wav(&fixture.audios.join("tone.wav"), 0.5, 330.0);

    batch::run(&fixture.options()).unwrap();
    let first = read_archive(&fixture.output).unwrap();
    batch::run(&fixture.options()).unwrap();
    let second = read_archive(&fixture.output).unwrap();
    assert_eq!(first, second);
}

#[test]
fn custom_frame_rate_changes_fps_and_frame_count() {
    let fixture = Fixture::new();
    write_sine_wav(&fixture.audios.join("tone.wav"), 1.0, 440.0);
    let options = BatchOptions {
        frame_rate: 0.02,
        ..fixture.options()
    };

    batch::run(&options).unwrap();
    let archive = read_archive(&fixture.output).unwrap();
    let record = archive.get("tone").unwrap();
    assert_eq!(record.fps, 50);
    assert!(record.features.nrows().abs_diff(50) <= 1);
}

#[test]
fn non_audio_entry_aborts_the_batch_without_writing_output() {
    let fixture = Fixture::new();
    std::fs::write(fixture.audios.join("notes.txt"), b"plain text, not audio").unwrap();

    let err = batch::run(&fixture.options()).unwrap_err();
    assert!(matches!(err, BatchError::Extract { .. }));
    assert!(!fixture.output.exists());
}

#[test]
fn failure_leaves_a_previous_archive_untouched() {
    let fixture = Fixture::new();
    write_sine_wav(&fixture.audios.join("tone.wav"), 0.2, 440.0);
    batch::run(&fixture.options()).unwrap();
    let before = std::fs::read(&fixture.output).unwrap();

    std::fs::write(fixture.audios.join("notes.txt"), b"plain text, not audio").unwrap();
    assert!(batch::run(&fixture.options()).is_err());
    assert_eq!(std::fs::read(&fixture.output).unwrap(), before);
}
