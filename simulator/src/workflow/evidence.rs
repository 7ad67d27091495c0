use anyhow::Context;
use guardcore::interface::{EvidenceRecord, EvidenceSink};
use log::warn;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Appends every detector event to a file as one JSON object per line.
pub struct JsonLinesSink {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl JsonLinesSink {
    pub fn open<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating evidence directory {}", parent.display()))?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("opening evidence log {}", path.display()))?;
        Ok(Self {
            path,
            writer: BufWriter::new(file),
        })
    }

    fn append(&mut self, record: &EvidenceRecord) -> anyhow::Result<()> {
        serde_json::to_writer(&mut self.writer, record).context("encoding evidence record")?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}

impl EvidenceSink for JsonLinesSink {
    fn record(&mut self, record: &EvidenceRecord) {
        if let Err(err) = self.append(record) {
            warn!(
                "[evidence] {}: record at {} ms lost: {:#}",
                self.path.display(),
                record.timestamp_ms(),
                err
            );
        }
    }
}
