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

// Sandbox encoder session: a few worker threads pretend to encode frames while
// reporting progress on the console and into the trace file.
// Run with: cargo run -p sandbox -- [diagnostics.json]

use anyhow::{Context, Result};
use encbase_core::{DiagnosticsConfig, Stopwatch, ThreadSpawner, VerbositySource};
use encbase_telemetry::{
    enc_debug, enc_info, enc_print, enc_trace, enc_warn, ConsoleLogger, TraceSink,
};
use std::sync::Arc;
use std::time::Duration;

const WORKERS: usize = 4;
const FRAMES_PER_WORKER: usize = 25;
const FRAME_BUDGET: Duration = Duration::from_millis(4);

struct WorkerJob {
    worker: usize,
    config: Arc<DiagnosticsConfig>,
    logger: Arc<ConsoleLogger>,
    trace: Arc<TraceSink>,
}

fn encode_frames(job: WorkerJob) -> i32 {
    let ctx: Option<&dyn VerbositySource> = Some(&*job.config);
    for frame in 0..FRAMES_PER_WORKER {
        let poc = job.worker * FRAMES_PER_WORKER + frame;
        let watch = Stopwatch::new();
        std::thread::sleep(Duration::from_millis(2 + (poc % 3) as u64));

        let bits = 1_000 + (poc as u32 * 37) % 500;
        job.trace.record_symbol(bits);
        enc_trace!(job.trace, "POC {poc:4} worker {} bits {bits}\n", job.worker);

        let elapsed = watch.elapsed();
        if elapsed > FRAME_BUDGET {
            enc_warn!(job.logger, ctx, "POC {poc} took {} us\n", elapsed.as_micros());
        } else {
            enc_debug!(job.logger, ctx, "POC {poc} encoded in {} us\n", elapsed.as_micros());
        }
    }
    0
}

fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = match std::env::args().nth(1) {
        Some(path) => DiagnosticsConfig::from_json_file(&path)?,
        None => DiagnosticsConfig::default(),
    };
    let config = Arc::new(config);
    let logger = Arc::new(ConsoleLogger::from_config(&config));
    let trace = Arc::new(TraceSink::new());
    trace
        .init_from_config(&config)
        .context("cannot start the encoding session")?;

    let ctx: Option<&dyn VerbositySource> = Some(&*config);
    enc_print!(logger, ctx, "encbase sandbox: {WORKERS} workers x {FRAMES_PER_WORKER} frames\n");

    let spawner = ThreadSpawner::new(&config.threads);
    let watch = Stopwatch::new();
    let handles = (0..WORKERS)
        .map(|worker| {
            let job = WorkerJob {
                worker,
                config: Arc::clone(&config),
                logger: Arc::clone(&logger),
                trace: Arc::clone(&trace),
            };
            spawner.spawn(encode_frames, job)
        })
        .collect::<Result<Vec<_>, _>>()
        .context("failed to start worker threads")?;

    for handle in handles {
        let name = handle.name().to_string();
        let status = handle.join()?;
        if status != 0 {
            log::warn!("{name} exited with status {status}");
        }
    }

    let seconds = watch.elapsed_secs_f64();
    let frames = WORKERS * FRAMES_PER_WORKER;
    enc_info!(
        logger,
        ctx,
        "encoded {frames} frames in {seconds:.3}s ({:.2} fps)\n",
        frames as f64 / seconds.max(f64::EPSILON)
    );
    if trace.is_active() {
        enc_info!(
            logger,
            ctx,
            "trace: {} symbols, {} bits\n",
            trace.symbol_count(),
            trace.bit_count()
        );
    }

    trace.shutdown();
    Ok(())
}
