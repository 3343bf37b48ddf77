//! Trace Line Formatting
//!
//! Renders trace events as the comma-separated lines the simulator prints:
//!
//! ```text
//! 0,RUNNING,process-name=P1,remaining-time=30
//! 0,RUNNING,process-name=P1,remaining-time=30,mem-usage=1%,allocated-at=0
//! 0,RUNNING,process-name=P1,remaining-time=30,mem-usage=1%,mem-frames=[0,1,2,3]
//! 30,EVICTED,evicted-frames=[0,1,2,3]
//! 30,FINISHED,process-name=P1,proc-remaining=0
//! ```

use std::io::{self, Write};

use entities_process::{MemoryView, TraceEvent, TraceSink};

/// Frame list as `[i,j,k]`, or `[ZEROFRAMES]` when empty
pub fn format_frames(frames: &[usize]) -> String {
    if frames.is_empty() {
        return "[ZEROFRAMES]".to_string();
    }
    let joined: Vec<String> = frames.iter().map(usize::to_string).collect();
    format!("[{}]", joined.join(","))
}

/// One trace line, without the trailing newline
pub fn format_event(event: &TraceEvent) -> String {
    match event {
        TraceEvent::Running {
            time,
            name,
            remaining_time,
            memory,
        } => {
            let line = format!("{},RUNNING,process-name={},remaining-time={}", time, name, remaining_time);
            match memory {
                MemoryView::Unlimited => line,
                MemoryView::Contiguous { usage_percent, address } => {
                    format!("{},mem-usage={}%,allocated-at={}", line, usage_percent, address)
                }
                MemoryView::Framed { usage_percent, frames } => {
                    format!("{},mem-usage={}%,mem-frames={}", line, usage_percent, format_frames(frames))
                }
            }
        }
        TraceEvent::Evicted { time, frames } => format!("{},EVICTED,evicted-frames={}", time, format_frames(frames)),
        TraceEvent::Finished {
            time,
            name,
            proc_remaining,
        } => format!("{},FINISHED,process-name={},proc-remaining={}", time, name, proc_remaining),
    }
}

/// Trace sink writing one formatted line per event
pub struct TraceWriter<W: Write> {
    writer: W,
    lines: usize,
}

impl<W: Write> TraceWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, lines: 0 }
    }

    /// Number of lines written so far
    pub fn lines(&self) -> usize {
        self.lines
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> TraceSink for TraceWriter<W> {
    fn emit(&mut self, event: &TraceEvent) -> io::Result<()> {
        writeln!(self.writer, "{}", format_event(event))?;
        self.lines += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running(memory: MemoryView) -> TraceEvent {
        TraceEvent::Running {
            time: 6,
            name: "P4".to_string(),
            remaining_time: 12,
            memory,
        }
    }

    #[test]
    fn test_format_frames() {
        assert_eq!(format_frames(&[]), "[ZEROFRAMES]");
        assert_eq!(format_frames(&[7]), "[7]");
        assert_eq!(format_frames(&[0, 1, 10]), "[0,1,10]");
    }

    #[test]
    fn test_running_lines_per_strategy() {
        assert_eq!(
            format_event(&running(MemoryView::Unlimited)),
            "6,RUNNING,process-name=P4,remaining-time=12"
        );
        assert_eq!(
            format_event(&running(MemoryView::Contiguous {
                usage_percent: 37,
                address: 512
            })),
            "6,RUNNING,process-name=P4,remaining-time=12,mem-usage=37%,allocated-at=512"
        );
        assert_eq!(
            format_event(&running(MemoryView::Framed {
                usage_percent: 1,
                frames: vec![3, 4]
            })),
            "6,RUNNING,process-name=P4,remaining-time=12,mem-usage=1%,mem-frames=[3,4]"
        );
    }

    #[test]
    fn test_evicted_and_finished_lines() {
        assert_eq!(
            format_event(&TraceEvent::Evicted {
                time: 9,
                frames: vec![]
            }),
            "9,EVICTED,evicted-frames=[ZEROFRAMES]"
        );
        assert_eq!(
            format_event(&TraceEvent::Finished {
                time: 9,
                name: "P4".to_string(),
                proc_remaining: 3
            }),
            "9,FINISHED,process-name=P4,proc-remaining=3"
        );
    }

    #[test]
    fn test_writer_appends_newlines() {
        let mut writer = TraceWriter::new(Vec::new());
        writer
            .emit(&TraceEvent::Evicted {
                time: 1,
                frames: vec![2],
            })
            .unwrap();
        writer.emit(&running(MemoryView::Unlimited)).unwrap();
        assert_eq!(writer.lines(), 2);
        let text = String::from_utf8(writer.into_inner()).unwrap();
        assert_eq!(
            text,
            "1,EVICTED,evicted-frames=[2]\n6,RUNNING,process-name=P4,remaining-time=12\n"
        );
    }
}
