//! Trace Events
//!
//! Events published by the simulation in strict simulated-time order. The
//! scheduler and allocators only produce these values; turning them into text
//! is the job of whatever [`TraceSink`] the caller plugs in.

use std::io;

/// Memory details attached to a RUNNING event, by strategy
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemoryView {
    /// Infinite memory: nothing to report
    Unlimited,
    /// First-fit: usage percent and start address of the process block
    Contiguous { usage_percent: u32, address: u32 },
    /// Paged or virtual: usage percent and the process frames in its own order
    Framed { usage_percent: u32, frames: Vec<usize> },
}

/// One observable scheduling event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceEvent {
    /// A process was dispatched
    Running {
        time: u32,
        name: String,
        remaining_time: u32,
        memory: MemoryView,
    },
    /// Frames were taken away (eviction, or release on completion)
    Evicted { time: u32, frames: Vec<usize> },
    /// A process consumed all of its service time
    Finished {
        time: u32,
        name: String,
        proc_remaining: usize,
    },
}

impl TraceEvent {
    pub fn time(&self) -> u32 {
        match self {
            TraceEvent::Running { time, .. }
            | TraceEvent::Evicted { time, .. }
            | TraceEvent::Finished { time, .. } => *time,
        }
    }
}

/// Destination for trace events
pub trait TraceSink {
    /// Publish one event
    ///
    /// # Errors
    /// Returns the I/O error of the underlying writer, if any.
    fn emit(&mut self, event: &TraceEvent) -> io::Result<()>;
}

/// Collects events in memory
impl TraceSink for Vec<TraceEvent> {
    fn emit(&mut self, event: &TraceEvent) -> io::Result<()> {
        self.push(event.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec_sink_collects_in_order() {
        let mut sink: Vec<TraceEvent> = Vec::new();
        sink.emit(&TraceEvent::Evicted { time: 2, frames: vec![1] }).unwrap();
        sink.emit(&TraceEvent::Finished { time: 3, name: "P".into(), proc_remaining: 0 }).unwrap();
        assert_eq!(sink.len(), 2);
        assert_eq!(sink[0].time(), 2);
        assert_eq!(sink[1].time(), 3);
    }
}
