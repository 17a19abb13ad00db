#![doc = include_str!("../README.md")]

mod config;
mod telemetry;

use anyhow::Context;
use clap::Parser;
use config::{CliArgs, DrawConfig, Origin};
use rollsource::RandomSource;
use std::io::{BufWriter, Write};
use telemetry::init_telemetry;

fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    let config = DrawConfig::try_from(args)?;

    init_telemetry()?;

    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    run(&config, &mut out)?;
    out.flush().context("failed to flush stdout")?;
    Ok(())
}

/// Builds the source described by `config`, writes `count` values to `out`,
/// and optionally persists the final state.
fn run(config: &DrawConfig, out: &mut impl Write) -> anyhow::Result<()> {
    let mut source = open_source(config)?;

    for _ in 0..config.count {
        let value = source.try_next_u64()?;
        writeln!(out, "{value}")?;
    }

    if let Some(path) = &config.save {
        std::fs::write(path, source.save_state())
            .with_context(|| format!("failed to write state to {}", path.display()))?;
        tracing::info!(path = %path.display(), "saved source state");
    }

    tracing::debug!(count = config.count, "finished drawing");
    Ok(())
}

fn open_source(config: &DrawConfig) -> anyhow::Result<RandomSource> {
    match &config.origin {
        Origin::Seed(seed) => {
            if *seed == 0 {
                tracing::info!("seeding from OS entropy; output is not reproducible");
            }
            Ok(RandomSource::with_config(*seed, config.source)?)
        }
        Origin::Resume(path) => {
            let bytes = std::fs::read(path)
                .with_context(|| format!("failed to read state from {}", path.display()))?;
            let source = RandomSource::from_state(&bytes, config.source)
                .with_context(|| format!("corrupt state file {}", path.display()))?;
            tracing::info!(path = %path.display(), "resumed source state");
            Ok(source)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rollsource::{STATE_LEN, SourceConfig};

    fn config(origin: Origin, count: usize, save: Option<std::path::PathBuf>) -> DrawConfig {
        DrawConfig {
            origin,
            count,
            source: SourceConfig::default(),
            save,
        }
    }

    fn draw_lines(config: &DrawConfig) -> Vec<u64> {
        let mut out = Vec::new();
        run(config, &mut out).unwrap();
        String::from_utf8(out)
            .unwrap()
            .lines()
            .map(|line| line.parse().unwrap())
            .collect()
    }

    #[test]
    fn prints_seeded_sequence() {
        let values = draw_lines(&config(Origin::Seed(42), 5, None));
        let mut source = RandomSource::from_seed(42);
        let expected: Vec<u64> = (0..5).map(|_| source.next_u64()).collect();
        assert_eq!(values, expected);
    }

    #[test]
    fn saves_and_resumes_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.bin");

        draw_lines(&config(Origin::Seed(9), 3, Some(path.clone())));
        let saved = std::fs::read(&path).unwrap();
        assert_eq!(saved.len(), STATE_LEN);
        assert_eq!(saved, RandomSource::from_seed(9).save_state());

        let resumed = draw_lines(&config(Origin::Resume(path), 4, None));
        let mut fresh = RandomSource::from_seed(9);
        let expected: Vec<u64> = (0..4).map(|_| fresh.next_u64()).collect();
        assert_eq!(resumed, expected);
    }

    #[test]
    fn rejects_truncated_state_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("short.bin");
        std::fs::write(&path, [0u8; STATE_LEN - 1]).unwrap();

        let err = run(&config(Origin::Resume(path), 1, None), &mut Vec::<u8>::new()).unwrap_err();
        assert!(format!("{err:#}").contains("invalid state length"));
    }

    #[test]
    fn missing_state_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.bin");
        assert!(run(&config(Origin::Resume(path), 1, None), &mut Vec::<u8>::new()).is_err());
    }
}
