#![allow(dead_code)]

use std::collections::BTreeMap;

use chrono::NaiveDate;
use telemetry_gen::{EventRow, EventSink, GeneratorConfig, Result};

/// Keeps every replaced partition in memory, keyed by date.
#[derive(Default)]
pub struct MemorySink {
    pub partitions: BTreeMap<NaiveDate, Vec<EventRow>>,
    pub writes: usize,
}

impl EventSink for MemorySink {
    async fn replace_partition(&mut self, date: NaiveDate, rows: &[EventRow]) -> Result<()> {
        self.partitions.insert(date, rows.to_vec());
        self.writes += 1;
        Ok(())
    }
}

impl MemorySink {
    pub fn rows(&self) -> impl Iterator<Item = &EventRow> {
        self.partitions.values().flatten()
    }
}

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn small_config(seed: u64, users: u32, days: u32) -> GeneratorConfig {
    GeneratorConfig {
        seed,
        total_users: users,
        days_back: days,
        ..Default::default()
    }
}

pub fn read_lines(path: &std::path::Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect()
}
