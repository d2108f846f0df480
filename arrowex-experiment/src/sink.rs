//! Result persistence

use anyhow::{Context, Result};
use arrowex_core::TrialRecord;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Receives one finalized record per round
pub trait TrialSink {
    fn record(&mut self, record: &TrialRecord) -> Result<()>;

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

/// One JSON object per line, flushed after every round
pub struct JsonLinesSink {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl JsonLinesSink {
    /// Creates (or truncates) the output file
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::create(&path)
            .with_context(|| format!("Cannot create result file {}", path.display()))?;
        tracing::info!(path = %path.display(), "recording trials");
        Ok(Self {
            path,
            writer: BufWriter::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TrialSink for JsonLinesSink {
    fn record(&mut self, record: &TrialRecord) -> Result<()> {
        serde_json::to_writer(&mut self.writer, record).context("Failed to encode trial")?;
        self.writer.write_all(b"\n")?;
        self.flush()
    }

    fn flush(&mut self) -> Result<()> {
        self.writer
            .flush()
            .with_context(|| format!("Failed to flush {}", self.path.display()))
    }
}

/// Keeps records in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    pub records: Vec<TrialRecord>,
}

impl TrialSink for MemorySink {
    fn record(&mut self, record: &TrialRecord) -> Result<()> {
        self.records.push(record.clone());
        Ok(())
    }
}

/// Writes every record of the session as one pretty-printed JSON array.
pub fn write_summary(path: impl AsRef<Path>, records: &[TrialRecord]) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)
        .with_context(|| format!("Cannot create summary file {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), records)
        .context("Failed to write results")?;
    tracing::info!(path = %path.display(), trials = records.len(), "results saved");
    Ok(())
}
