//! The sync engine — incremental block scanning and event emission.
//!
//! # One cycle
//! Read the chain head and the checkpoint, then walk every block in
//! `[checkpoint, head]` in ascending order. For each transaction addressed
//! to the target contract, fetch its receipt and decode its logs against
//! the descriptor table, emitting each decoded event to the sink before
//! touching the next log. Only after the whole range succeeds is the
//! checkpoint advanced to `head + 1`.
//!
//! A failed cycle leaves the checkpoint untouched, so the next cycle
//! re-scans the same range: delivery is at-least-once, and sink consumers
//! must tolerate duplicates across a crash/restart boundary.
//!
//! Block fetches are issued concurrently in a bounded window, but results
//! are applied strictly in ascending (block, tx-index, log-index) order.

use futures::stream::{self, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use magazine_abi::LogDecoder;
use magazine_core::{ChainReader, CheckpointStore, EventSink, MagazineError};

use crate::config::DecodePolicy;

/// Outcome of one sync cycle, for observability and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    /// The `(from, to)` block range scanned; `None` if the cycle was a
    /// no-op because the checkpoint was already past the head.
    pub scanned: Option<(u64, u64)>,
    /// Events emitted to the sink.
    pub emitted: u64,
    /// Logs skipped because they could not be decoded.
    pub decode_failures: u64,
}

impl CycleReport {
    fn noop() -> Self {
        Self {
            scanned: None,
            emitted: 0,
            decode_failures: 0,
        }
    }
}

struct EngineInner {
    target_address: String,
    decoder: LogDecoder,
    reader: Arc<dyn ChainReader>,
    checkpoint: Arc<dyn CheckpointStore>,
    sink: Arc<dyn EventSink>,
    decode_policy: DecodePolicy,
    fetch_concurrency: usize,
    // Serializes cycles, including across a stop()/start() race.
    cycle_gate: tokio::sync::Mutex<()>,
}

struct ScheduleHandle {
    shutdown: watch::Sender<bool>,
    _task: JoinHandle<()>,
}

/// Periodically scans the chain and republishes decoded events.
///
/// One logical thread of control per instance: cycles never overlap, and
/// `start` fully replaces any prior schedule before installing a new one.
pub struct SyncEngine {
    inner: Arc<EngineInner>,
    schedule: Option<ScheduleHandle>,
}

impl SyncEngine {
    /// Pure setup — no I/O happens until `run_cycle` or `start`.
    pub fn new(
        decoder: LogDecoder,
        target_address: impl Into<String>,
        reader: Arc<dyn ChainReader>,
        checkpoint: Arc<dyn CheckpointStore>,
        sink: Arc<dyn EventSink>,
        decode_policy: DecodePolicy,
        fetch_concurrency: usize,
    ) -> Self {
        Self {
            inner: Arc::new(EngineInner {
                target_address: target_address.into(),
                decoder,
                reader,
                checkpoint,
                sink,
                decode_policy,
                fetch_concurrency: fetch_concurrency.max(1),
                cycle_gate: tokio::sync::Mutex::new(()),
            }),
            schedule: None,
        }
    }

    /// Run one sync cycle now.
    pub async fn run_cycle(&self) -> Result<CycleReport, MagazineError> {
        self.inner.run_cycle().await
    }

    /// Begin the recurring schedule: one cycle immediately, then one every
    /// `poll_interval`. Any prior schedule is cancelled first, so calling
    /// `start` twice leaves exactly one active schedule.
    pub fn start(&mut self, poll_interval: Duration) {
        self.stop();

        let inner = Arc::clone(&self.inner);
        let (shutdown, mut rx) = watch::channel(false);
        let task = tokio::spawn(async move {
            loop {
                match inner.run_cycle().await {
                    Ok(report) => {
                        if let Some((from, to)) = report.scanned {
                            tracing::debug!(
                                from,
                                to,
                                emitted = report.emitted,
                                decode_failures = report.decode_failures,
                                "sync cycle complete"
                            );
                        }
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "sync cycle failed, retrying next tick");
                    }
                }
                tokio::select! {
                    _ = rx.changed() => break,
                    _ = tokio::time::sleep(poll_interval) => {}
                }
            }
        });
        self.schedule = Some(ScheduleHandle {
            shutdown,
            _task: task,
        });
    }

    /// Cancel the pending schedule. An in-flight cycle finishes; no new
    /// cycle is scheduled afterward. No-op if never started.
    pub fn stop(&mut self) {
        if let Some(handle) = self.schedule.take() {
            let _ = handle.shutdown.send(true);
        }
    }

    /// Returns `true` if a schedule is installed.
    pub fn is_running(&self) -> bool {
        self.schedule.is_some()
    }
}

impl Drop for SyncEngine {
    fn drop(&mut self) {
        self.stop();
    }
}

impl EngineInner {
    async fn run_cycle(&self) -> Result<CycleReport, MagazineError> {
        let _gate = self.cycle_gate.lock().await;

        let latest = self.reader.latest_block_height().await?;
        let start = self.checkpoint.load().await?.unwrap_or(0);
        if start > latest {
            // A reorg or store rollback produced an inverted range.
            tracing::debug!(checkpoint = start, latest, "nothing to scan");
            return Ok(CycleReport::noop());
        }

        let mut report = CycleReport {
            scanned: Some((start, latest)),
            emitted: 0,
            decode_failures: 0,
        };

        // Concurrency in fetch, sequential order in effect: `buffered`
        // yields blocks in request order regardless of completion order.
        let mut blocks = stream::iter(start..=latest)
            .map(|number| {
                let reader = Arc::clone(&self.reader);
                async move { reader.get_block(number).await }
            })
            .buffered(self.fetch_concurrency);

        while let Some(block) = blocks.next().await {
            let block = block?;
            for tx in block
                .transactions
                .iter()
                .filter(|tx| tx.is_to(&self.target_address))
            {
                let receipt = self.reader.get_transaction_receipt(&tx.hash).await?;
                let mut logs = receipt.logs;
                logs.sort_by_key(|log| log.log_index);
                for log in &logs {
                    match self.decoder.decode(log) {
                        Ok(event) => {
                            // Awaited per log: a slow sink throttles the scan.
                            self.sink.emit(&event).await?;
                            report.emitted += 1;
                        }
                        Err(e) if e.is_decode() => {
                            report.decode_failures += 1;
                            if self.decode_policy == DecodePolicy::AbortCycle {
                                tracing::warn!(
                                    block = block.number,
                                    tx = %tx.hash,
                                    log_index = log.log_index,
                                    error = %e,
                                    "undecodable log, aborting cycle"
                                );
                                return Err(e);
                            }
                            tracing::warn!(
                                block = block.number,
                                tx = %tx.hash,
                                log_index = log.log_index,
                                error = %e,
                                "skipping undecodable log"
                            );
                        }
                        Err(e) => return Err(e),
                    }
                }
            }
        }

        self.checkpoint.save(latest + 1).await?;
        Ok(report)
    }
}
