mod common;

use common::{MemorySink, read_lines};
use telemetry_gen::flush::JsonlSink;
use telemetry_gen::model::EVENT_COLUMNS;
use telemetry_gen::{EventSink, RunOutcome, run_backfill};

#[tokio::test]
async fn backfill_writes_one_file_per_day() {
    let dir = tempfile::tempdir().unwrap();
    let mut sink = JsonlSink::new(dir.path());
    let start = common::day(2025, 4, 1);

    let outcome = run_backfill(&common::small_config(31, 40, 4), start, &mut sink)
        .await
        .unwrap();
    let RunOutcome::Written { partitions, events } = outcome else {
        panic!("expected events, got {outcome:?}");
    };

    let mut files: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    files.sort();
    assert_eq!(partitions, 5);
    assert_eq!(files.len(), partitions);
    assert!(files.iter().all(|f| f.starts_with("events_2025-04-0") && f.ends_with(".jsonl")));

    let lines: usize = files
        .iter()
        .map(|f| read_lines(&dir.path().join(f)).len())
        .sum();
    assert_eq!(lines, events);
}

#[tokio::test]
async fn every_line_carries_all_columns() {
    let dir = tempfile::tempdir().unwrap();
    let mut sink = JsonlSink::new(dir.path());
    let start = common::day(2025, 4, 1);
    run_backfill(&common::small_config(32, 30, 2), start, &mut sink)
        .await
        .unwrap();

    let path = sink.partition_path(start);
    let lines = read_lines(&path);
    assert!(!lines.is_empty());
    for line in &lines {
        let obj: serde_json::Value = serde_json::from_str(line).unwrap();
        let map = obj.as_object().unwrap();
        assert_eq!(map.len(), EVENT_COLUMNS.len());
        for column in EVENT_COLUMNS {
            assert!(map.contains_key(column), "missing {column}");
        }
        if map["event_name"] == "spin_action" {
            assert!(map["spin_cost"].is_u64());
            assert!(map["product_id"].is_null());
            assert!(map["price_usd"].is_null());
        }
    }
}

#[tokio::test]
async fn replacing_a_partition_discards_old_rows() {
    let dir = tempfile::tempdir().unwrap();
    let mut sink = JsonlSink::new(dir.path());
    let date = common::day(2025, 4, 3);

    let mut memory = MemorySink::default();
    run_backfill(&common::small_config(33, 60, 3), date, &mut memory)
        .await
        .unwrap();
    let rows = memory.partitions.values().next().unwrap().clone();
    assert!(rows.len() > 3);

    sink.replace_partition(date, &rows).await.unwrap();
    sink.replace_partition(date, &rows[..3]).await.unwrap();

    assert_eq!(read_lines(&sink.partition_path(date)).len(), 3);
    let leftovers = std::fs::read_dir(dir.path())
        .unwrap()
        .filter(|e| e.as_ref().unwrap().file_name().to_string_lossy().ends_with(".tmp"))
        .count();
    assert_eq!(leftovers, 0);
}

#[tokio::test]
async fn quiet_rerun_empties_stale_files() {
    let dir = tempfile::tempdir().unwrap();
    let mut sink = JsonlSink::new(dir.path());
    let start = common::day(2025, 4, 1);
    run_backfill(&common::small_config(34, 50, 2), start, &mut sink)
        .await
        .unwrap();
    assert!(!read_lines(&sink.partition_path(start)).is_empty());

    let outcome = run_backfill(&common::small_config(34, 0, 2), start, &mut sink)
        .await
        .unwrap();
    assert_eq!(outcome, RunOutcome::NoEvents);
    for offset in 0..=2 {
        let path = sink.partition_path(start + chrono::Duration::days(offset));
        assert!(read_lines(&path).is_empty(), "{} kept old rows", path.display());
    }
}
