//! Polling tailer for a growing log file.
//!
//! One task owns the file handle and the read cursor. It reads complete
//! lines, classifies them and publishes events on a bounded channel. When
//! there is nothing new it sleeps for the poll interval; after a noise line
//! it sleeps for the shorter noise backoff. Every sleep, and every blocked
//! send, also watches the shutdown signal and the receiver side so a stop
//! request is seen right away.

use std::mem;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Serialize;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncSeekExt, BufReader, SeekFrom};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::event::{parse_line, LogEvent, Parsed};
use crate::error::Error;

/// One in-game tick.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(6);
pub const DEFAULT_NOISE_BACKOFF: Duration = Duration::from_secs(3);
pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// Longest line kept. Anything longer is dropped up to its newline.
pub const MAX_LINE_BYTES: usize = 64 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TailOptions {
    /// Read the existing contents instead of starting at end of file.
    pub from_start: bool,
    /// Wait before re-checking when no new data is available.
    pub poll_interval: Duration,
    /// Wait after a line that did not match the log grammar.
    pub noise_backoff: Duration,
}

impl Default for TailOptions {
    fn default() -> Self {
        Self {
            from_start: false,
            poll_interval: DEFAULT_POLL_INTERVAL,
            noise_backoff: DEFAULT_NOISE_BACKOFF,
        }
    }
}

/// Counters kept by the tailer while it runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TailStats {
    pub lines_read: u64,
    pub events_emitted: u64,
    pub noise_lines: u64,
    pub timestamp_fallbacks: u64,
    pub oversized_lines: u64,
}

/// What one read produced.
#[derive(Debug, PartialEq, Eq)]
enum Chunk {
    Line(String),
    /// Part of an overlong line was consumed and thrown away.
    Dropped,
    /// No complete line yet.
    Pending,
}

/// Open log plus its read cursor.
#[derive(Debug)]
pub struct Tailer {
    path: PathBuf,
    reader: BufReader<File>,
    /// Byte offset just past the last complete line consumed.
    offset: u64,
    /// Bytes of a line whose `\n` has not been written yet.
    partial: Vec<u8>,
    /// Inside an overlong line; skip until its `\n`.
    discarding: bool,
    options: TailOptions,
    stats: TailStats,
}

impl Tailer {
    /// Open the log. Unless `from_start` is set, the cursor is moved to the
    /// current end of file so only lines appended from now on are seen.
    pub async fn open(path: impl AsRef<Path>, options: TailOptions) -> Result<Self, Error> {
        let path = path.as_ref().to_path_buf();
        let open_err = |source| Error::Open {
            path: path.clone(),
            source,
        };

        let mut file = File::open(&path).await.map_err(open_err)?;
        let offset = if options.from_start {
            0
        } else {
            file.seek(SeekFrom::End(0)).await.map_err(open_err)?
        };

        info!(
            path = %path.display(),
            offset,
            from_start = options.from_start,
            "Opened log"
        );

        Ok(Self {
            path,
            reader: BufReader::new(file),
            offset,
            partial: Vec::new(),
            discarding: false,
            options,
            stats: TailStats::default(),
        })
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Read towards the next complete line.
    ///
    /// An unterminated tail is kept in `partial` and completed by a later
    /// call; the cursor only moves past whole lines, or past bytes of a line
    /// longer than `MAX_LINE_BYTES`, which is dropped.
    async fn next_line(&mut self) -> Result<Chunk, Error> {
        let room = (MAX_LINE_BYTES - self.partial.len()) as u64;
        (&mut self.reader)
            .take(room)
            .read_until(b'\n', &mut self.partial)
            .await
            .map_err(|source| Error::Read {
                path: self.path.clone(),
                offset: self.offset,
                source,
            })?;

        let complete = self.partial.last() == Some(&b'\n');
        if !complete && self.partial.len() < MAX_LINE_BYTES {
            return Ok(Chunk::Pending);
        }

        let bytes = mem::take(&mut self.partial);
        self.offset += bytes.len() as u64;

        if self.discarding || !complete {
            if !self.discarding {
                self.stats.oversized_lines += 1;
                warn!(offset = self.offset, max = MAX_LINE_BYTES, "Dropping overlong line");
            }
            self.discarding = !complete;
            return Ok(Chunk::Dropped);
        }

        Ok(Chunk::Line(decode_line(bytes, self.offset)))
    }

    /// Follow the log until shutdown is signalled or `events` is closed.
    ///
    /// Returns the run counters on a clean stop. A read failure ends the run
    /// with `Error::Read`.
    pub async fn run(
        &mut self,
        events: mpsc::Sender<LogEvent>,
        mut shutdown: watch::Receiver<bool>,
    ) -> Result<TailStats, Error> {
        debug!(path = %self.path.display(), offset = self.offset, "Polling log");

        loop {
            if *shutdown.borrow() {
                break;
            }

            let line = match self.next_line().await? {
                Chunk::Line(line) => line,
                Chunk::Dropped => continue,
                Chunk::Pending => {
                    if !pause(self.options.poll_interval, &events, &mut shutdown).await {
                        break;
                    }
                    continue;
                }
            };
            self.stats.lines_read += 1;

            match parse_line(&line) {
                Parsed::Noise => {
                    self.stats.noise_lines += 1;
                    debug!(offset = self.offset, "Skipping unmatched line");
                    if !pause(self.options.noise_backoff, &events, &mut shutdown).await {
                        break;
                    }
                }
                Parsed::Event {
                    event,
                    timestamp_fallback,
                } => {
                    if timestamp_fallback {
                        self.stats.timestamp_fallbacks += 1;
                    }
                    tokio::select! {
                        sent = events.send(event) => {
                            if sent.is_err() {
                                debug!("Event receiver dropped");
                                break;
                            }
                            self.stats.events_emitted += 1;
                        }
                        _ = shutdown_requested(&mut shutdown) => break,
                    }
                }
            }
        }

        info!(
            path = %self.path.display(),
            offset = self.offset,
            lines_read = self.stats.lines_read,
            events = self.stats.events_emitted,
            noise = self.stats.noise_lines,
            timestamp_fallbacks = self.stats.timestamp_fallbacks,
            oversized = self.stats.oversized_lines,
            "Stopped tailing"
        );
        Ok(self.stats)
    }

    /// Run on a new task with a bounded event channel of `capacity`.
    pub fn spawn(mut self, capacity: usize) -> TailHandle {
        let (events_tx, events_rx) = mpsc::channel(capacity.max(1));
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let task = tokio::spawn(async move {
            let result = self.run(events_tx, shutdown_rx).await;
            if let Err(e) = &result {
                warn!(error = %e, "Tailer stopped with error");
            }
            result
        });

        TailHandle {
            events: events_rx,
            shutdown: shutdown_tx,
            task,
        }
    }
}

/// UTF-8 if valid, otherwise Latin-1 (names with accented characters).
fn decode_line(bytes: Vec<u8>, offset: u64) -> String {
    match String::from_utf8(bytes) {
        Ok(line) => line,
        Err(e) => {
            debug!(offset, "Line is not UTF-8, decoding as Latin-1");
            e.into_bytes().into_iter().map(char::from).collect()
        }
    }
}

/// Sleep for `duration`. Returns false if shutdown was requested or the
/// receiver went away in the meantime.
async fn pause(
    duration: Duration,
    events: &mpsc::Sender<LogEvent>,
    shutdown: &mut watch::Receiver<bool>,
) -> bool {
    tokio::select! {
        _ = tokio::time::sleep(duration) => true,
        _ = shutdown_requested(shutdown) => false,
        _ = events.closed() => {
            debug!("Event receiver dropped");
            false
        }
    }
}

/// Resolves once the shutdown flag is true. If the sender is dropped the
/// flag can no longer change, so this never resolves.
async fn shutdown_requested(shutdown: &mut watch::Receiver<bool>) {
    if shutdown.wait_for(|stop| *stop).await.is_err() {
        std::future::pending::<()>().await;
    }
}

/// A spawned tailer: its event stream, stop switch and task.
#[derive(Debug)]
pub struct TailHandle {
    pub events: mpsc::Receiver<LogEvent>,
    shutdown: watch::Sender<bool>,
    task: JoinHandle<Result<TailStats, Error>>,
}

impl TailHandle {
    /// Ask the tailer to stop. Wakes it from any sleep or blocked send.
    pub fn stop(&self) {
        let _ = self.shutdown.send(true);
    }

    /// Wait for the tailer task to finish.
    pub async fn join(self) -> Result<TailStats, Error> {
        match self.task.await {
            Ok(result) => result,
            Err(e) => Err(Error::Task(e.to_string())),
        }
    }

    /// Stop the tailer and wait for it.
    pub async fn shutdown(self) -> Result<TailStats, Error> {
        self.stop();
        self.join().await
    }
}
