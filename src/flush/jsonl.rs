use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Serialize;
use tracing::info;

use crate::error::Result;
use crate::model::EventRow;
use crate::sink::EventSink;

/// Write an iterator of serializable items to a JSONL file (one JSON object per line).
pub fn write_jsonl<T: Serialize>(path: &Path, items: impl Iterator<Item = T>) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    for item in items {
        serde_json::to_writer(&mut writer, &item)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    writer.get_ref().sync_all()
}

/// Stores each partition as `events_<date>.jsonl` in one directory.
///
/// A partition is written to a hidden temp file first and renamed over the
/// old one, so readers never observe a half-written day.
#[derive(Debug, Clone)]
pub struct JsonlSink {
    dir: PathBuf,
}

impl JsonlSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn partition_path(&self, date: NaiveDate) -> PathBuf {
        self.dir.join(format!("events_{date}.jsonl"))
    }
}

impl EventSink for JsonlSink {
    async fn replace_partition(&mut self, date: NaiveDate, rows: &[EventRow]) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let target = self.partition_path(date);
        let tmp = self.dir.join(format!(".events_{date}.jsonl.tmp"));

        if let Err(err) = write_jsonl(&tmp, rows.iter()) {
            let _ = fs::remove_file(&tmp);
            return Err(err.into());
        }
        fs::rename(&tmp, &target)?;

        info!(%date, rows = rows.len(), path = %target.display(), "partition replaced");
        Ok(())
    }
}
