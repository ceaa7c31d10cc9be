//! The event sink interface between the engine and its output.

use crate::error::SimResult;
use crate::sims::record::{EventRecord, RunSummary};

/// Receiver of triggered events and of the end-of-run summary.
///
/// The engine hands over each record as soon as it is produced and keeps no
/// reference to it. `summary` is called once, only for runs that complete
/// with a valid trigger rate.
pub trait EventSink {
    fn record(&mut self, event: &EventRecord) -> SimResult<()>;

    fn summary(&mut self, _summary: &RunSummary) -> SimResult<()> {
        Ok(())
    }
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    fn record(&mut self, event: &EventRecord) -> SimResult<()> {
        (**self).record(event)
    }

    fn summary(&mut self, summary: &RunSummary) -> SimResult<()> {
        (**self).summary(summary)
    }
}

/// Keeps every record and the summary in memory.
#[derive(Debug, Default, Clone)]
pub struct VecSink {
    pub events: Vec<EventRecord>,
    pub summary: Option<RunSummary>,
}

impl VecSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EventSink for VecSink {
    fn record(&mut self, event: &EventRecord) -> SimResult<()> {
        self.events.push(event.clone());
        Ok(())
    }

    fn summary(&mut self, summary: &RunSummary) -> SimResult<()> {
        self.summary = Some(summary.clone());
        Ok(())
    }
}

/// Discards everything; used for rate estimates and benchmarks.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn record(&mut self, _event: &EventRecord) -> SimResult<()> {
        Ok(())
    }
}
