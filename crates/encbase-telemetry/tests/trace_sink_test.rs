// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

#![cfg(feature = "trace")]

use anyhow::Result;
use encbase_core::{spawn, DiagnosticsConfig};
use encbase_telemetry::{enc_trace, TraceSink, TraceState};
use std::sync::Arc;
use tempfile::tempdir;

#[test]
fn reinit_truncates_previous_output() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("session.trace");
    let sink = TraceSink::new();

    sink.init(&path)?;
    assert_eq!(enc_trace!(sink, "A"), 1);
    sink.shutdown();

    sink.init(&path)?;
    assert_eq!(enc_trace!(sink, "B"), 1);
    sink.shutdown();

    assert_eq!(std::fs::read_to_string(&path)?, "B");
    Ok(())
}

#[test]
fn config_without_trace_file_keeps_sink_silent() -> Result<()> {
    let config = DiagnosticsConfig::default();
    let sink = TraceSink::new();
    sink.init_from_config(&config)?;
    assert_eq!(sink.state(), TraceState::Disabled);
    assert_eq!(enc_trace!(sink, "symbol {} = {}\n", "cbp", 3), 0);
    sink.shutdown();
    assert_eq!(enc_trace!(sink, "after shutdown\n"), 0);
    Ok(())
}

#[test]
fn config_with_trace_file_opens_it() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("enc.trace");
    let config = DiagnosticsConfig {
        trace_file: path.to_string_lossy().into_owned(),
        ..Default::default()
    };

    let sink = TraceSink::new();
    sink.init_from_config(&config)?;
    assert!(sink.is_active());
    enc_trace!(sink, "@{} {:>8} ({:2}) {}\n", 0, "mb_type", 1, "1");
    sink.shutdown();

    assert_eq!(std::fs::read_to_string(&path)?, "@0  mb_type ( 1) 1\n");
    Ok(())
}

#[test]
fn concurrent_workers_produce_whole_lines() -> Result<()> {
    const WORKERS: usize = 6;
    const LINES: usize = 200;

    let dir = tempdir()?;
    let path = dir.path().join("workers.trace");
    let sink = Arc::new(TraceSink::new());
    sink.init(&path)?;

    let handles = (0..WORKERS)
        .map(|worker| {
            let sink = Arc::clone(&sink);
            spawn(
                move |worker: usize| {
                    let mut written = 0;
                    for line in 0..LINES {
                        written += enc_trace!(sink, "worker={worker} line={line}\n");
                        sink.record_symbol(1);
                    }
                    written as i32
                },
                worker,
            )
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut total = 0;
    for handle in handles {
        total += handle.join()? as usize;
    }
    sink.shutdown();

    let contents = std::fs::read_to_string(&path)?;
    assert_eq!(contents.len(), total);
    let lines: Vec<_> = contents.lines().collect();
    assert_eq!(lines.len(), WORKERS * LINES);
    assert!(lines
        .iter()
        .all(|l| l.starts_with("worker=") && l.contains(" line=")));
    assert_eq!(sink.symbol_count(), (WORKERS * LINES) as u64);
    Ok(())
}
