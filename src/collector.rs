//! Typed event records and the data-collection boundary.
//!
//! The core produces [`CollectionEvent`]s; a single consumer thread drains
//! an in-process channel and dispatches each event to the registered
//! [`RecordSink`]s whose kind matches. The core never formats or persists
//! records itself; the shipped [`JsonlSink`] writes one JSON line per
//! event, tagged by kind.
//!
//! Producers submit per-state records in any order within a trial, followed
//! by exactly one trial-end record; the single channel and single consumer
//! preserve that submission order end to end.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::mpsc::{self, SendError, Sender};
use std::thread::{self, JoinHandle};

use serde::Serialize;

/// Per-state relaxation outcome, one record per test state per trial.
#[derive(Debug, Clone, Serialize)]
pub struct RelaxationResultRecord {
    pub trial_index: usize,
    pub state_index: usize,
    pub stable: bool,
    pub num_steps: usize,
    pub distances_to_learned: Vec<f64>,
    pub energy_profile: Vec<f64>,
}

/// Trial summary, exactly one per trial, after all per-state records.
#[derive(Debug, Clone, Serialize)]
pub struct TrialEndRecord {
    pub trial_index: usize,
    pub num_test_states: usize,
    pub num_target_states: usize,
    pub num_stable_states: usize,
    /// Mean steps over stable states only; NaN when no state was stable
    /// (serialized as null by the JSON sink).
    pub stable_states_mean_steps_taken: f64,
}

/// Discriminant for routing events to sinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    RelaxationResult,
    TrialEnd,
}

/// Discriminated union of record kinds crossing the collector boundary.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CollectionEvent {
    RelaxationResult(RelaxationResultRecord),
    TrialEnd(TrialEndRecord),
}

impl CollectionEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            CollectionEvent::RelaxationResult(_) => EventKind::RelaxationResult,
            CollectionEvent::TrialEnd(_) => EventKind::TrialEnd,
        }
    }
}

/// Destination for one kind of collection event.
///
/// Implementations run on the collector's consumer thread, so they may block
/// on I/O without stalling producers beyond channel pressure.
pub trait RecordSink: Send {
    /// The event kind this sink accepts.
    fn kind(&self) -> EventKind;

    /// Persist one event. Only called with events of the matching kind.
    fn submit(&mut self, event: &CollectionEvent) -> io::Result<()>;

    /// Flush any buffered output; called once when the channel closes.
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Sink writing each event as one JSON line to a file.
pub struct JsonlSink {
    kind: EventKind,
    writer: BufWriter<File>,
}

impl JsonlSink {
    /// Create (truncating) the output file, including parent directories.
    pub fn create<P: AsRef<Path>>(kind: EventKind, path: P) -> io::Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        Ok(Self {
            kind,
            writer: BufWriter::new(File::create(path)?),
        })
    }
}

impl RecordSink for JsonlSink {
    fn kind(&self) -> EventKind {
        self.kind
    }

    fn submit(&mut self, event: &CollectionEvent) -> io::Result<()> {
        serde_json::to_writer(&mut self.writer, event)?;
        self.writer.write_all(b"\n")
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

/// Registry of sinks, consumed by [`start`](DataCollector::start) to spawn
/// the consumer thread.
#[derive(Default)]
pub struct DataCollector {
    sinks: Vec<Box<dyn RecordSink>>,
}

impl DataCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a sink for its declared event kind.
    pub fn add_sink(mut self, sink: Box<dyn RecordSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    /// Spawn the consumer thread and return the producer handle.
    pub fn start(self) -> CollectorHandle {
        let (sender, receiver) = mpsc::channel::<CollectionEvent>();
        let mut sinks = self.sinks;

        let thread = thread::spawn(move || -> io::Result<()> {
            for event in receiver {
                let kind = event.kind();
                for sink in sinks.iter_mut().filter(|sink| sink.kind() == kind) {
                    sink.submit(&event)?;
                }
            }
            for sink in &mut sinks {
                sink.flush()?;
            }
            Ok(())
        });

        CollectorHandle { sender, thread }
    }
}

/// Producer side of a running collector.
pub struct CollectorHandle {
    sender: Sender<CollectionEvent>,
    thread: JoinHandle<io::Result<()>>,
}

impl CollectorHandle {
    /// Queue one event for the consumer thread.
    ///
    /// # Errors
    /// Fails only if the consumer thread has already shut down.
    pub fn submit(&self, event: CollectionEvent) -> Result<(), SendError<CollectionEvent>> {
        self.sender.send(event)
    }

    /// An additional producer handle for another thread.
    pub fn sender(&self) -> Sender<CollectionEvent> {
        self.sender.clone()
    }

    /// Close the channel, wait for the consumer to drain and flush, and
    /// surface the final I/O status of the run.
    pub fn finish(self) -> io::Result<()> {
        drop(self.sender);
        match self.thread.join() {
            Ok(result) => result,
            Err(_) => Err(io::Error::new(
                io::ErrorKind::Other,
                "collector thread panicked",
            )),
        }
    }
}
