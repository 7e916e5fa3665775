// src/logging.rs
//
// Telemetry sinks for episode rollouts.
// - EventSink: trait used by the research harness
// - NoopSink:  discards all events
// - FileSink:  writes one JSON record per line for offline analysis

use std::fs::File;
use std::io::{self, BufWriter, Write};

use serde::Serialize;

use crate::env::StepResult;

/// Abstract sink for per-step rollout telemetry.
pub trait EventSink {
    fn log_reset(&mut self, episode: u64, initial_state: i64);

    fn log_step(&mut self, episode: u64, step: u64, action: i64, result: &StepResult);
}

/// Sink that discards all events.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl EventSink for NoopSink {
    fn log_reset(&mut self, _episode: u64, _initial_state: i64) {
        // intentionally no-op
    }

    fn log_step(&mut self, _episode: u64, _step: u64, _action: i64, _result: &StepResult) {
        // intentionally no-op
    }
}

#[derive(Serialize)]
struct ResetRecord {
    event: &'static str,
    episode: u64,
    state: i64,
}

#[derive(Serialize)]
struct StepRecord {
    event: &'static str,
    episode: u64,
    step: u64,
    action: i64,
    state: i64,
    reward: [f64; 2],
    done: bool,
}

/// JSONL file sink.
///
/// Each event is written as a single JSON object on its own line.
pub struct FileSink {
    writer: BufWriter<File>,
}

impl FileSink {
    /// Create a new sink writing to `path`.
    pub fn create(path: &str) -> io::Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            writer: BufWriter::new(file),
        })
    }

    fn write_record<T: Serialize>(&mut self, record: &T) {
        let line = match serde_json::to_string(record) {
            Ok(line) => line,
            Err(_) => return,
        };

        // If logging fails we don't want to crash the rollout,
        // so we deliberately ignore I/O errors.
        let _ = writeln!(self.writer, "{}", line);
        let _ = self.writer.flush();
    }
}

impl EventSink for FileSink {
    fn log_reset(&mut self, episode: u64, initial_state: i64) {
        self.write_record(&ResetRecord {
            event: "reset",
            episode,
            state: initial_state,
        });
    }

    fn log_step(&mut self, episode: u64, step: u64, action: i64, result: &StepResult) {
        self.write_record(&StepRecord {
            event: "step",
            episode,
            step,
            action,
            state: result.state,
            reward: result.reward.to_array(),
            done: result.done,
        });
    }
}
