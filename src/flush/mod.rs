mod jsonl;

pub use jsonl::{JsonlSink, write_jsonl};
