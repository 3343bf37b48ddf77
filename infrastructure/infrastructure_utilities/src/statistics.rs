//! Performance Statistics
//!
//! Summary printed after the trace:
//!
//! ```text
//! Turnaround time 62
//! Time overhead 2.93 1.90
//! Makespan 120
//! ```
//!
//! Turnaround is `completion - arrival`, overhead is `turnaround / service`.
//! The average turnaround is rounded up to an integer and the average overhead
//! up to two decimals; the maximum overhead is printed rounded to two decimals.

use std::fmt;

use entities_process::CompletionRecord;

/// Summary statistics of a finished simulation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerformanceStats {
    /// Average turnaround time, rounded up
    pub average_turnaround: u32,
    /// Largest turnaround / service ratio
    pub max_overhead: f64,
    /// Average turnaround / service ratio, rounded up to two decimals
    pub average_overhead: f64,
    /// Time at which the last process finished
    pub makespan: u32,
}

impl PerformanceStats {
    /// Compute statistics from the completion records of a run
    ///
    /// An empty run yields zeros rather than dividing by zero.
    pub fn compute(records: &[CompletionRecord], makespan: u32) -> Self {
        if records.is_empty() {
            return Self {
                average_turnaround: 0,
                max_overhead: 0.0,
                average_overhead: 0.0,
                makespan,
            };
        }

        let count = records.len() as f64;
        let total_turnaround: u64 = records.iter().map(|r| u64::from(r.turnaround_time())).sum();
        let total_overhead: f64 = records.iter().map(CompletionRecord::overhead).sum();
        let max_overhead = records.iter().map(CompletionRecord::overhead).fold(0.0, f64::max);

        Self {
            average_turnaround: (total_turnaround as f64 / count).ceil() as u32,
            max_overhead,
            average_overhead: (total_overhead / count * 100.0).ceil() / 100.0,
            makespan,
        }
    }
}

impl fmt::Display for PerformanceStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Turnaround time {}", self.average_turnaround)?;
        writeln!(f, "Time overhead {:.2} {:.2}", self.max_overhead, self.average_overhead)?;
        write!(f, "Makespan {}", self.makespan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(arrival_time: u32, service_time: u32, completion_time: u32) -> CompletionRecord {
        CompletionRecord {
            name: "P".to_string(),
            arrival_time,
            service_time,
            completion_time,
        }
    }

    #[test]
    fn test_rounding() {
        // turnarounds 8, 3, 8; overheads 8/3, 3/2, 8/4
        let records = vec![record(0, 3, 8), record(1, 2, 4), record(2, 4, 10)];
        let stats = PerformanceStats::compute(&records, 10);
        assert_eq!(stats.average_turnaround, 7);
        assert!((stats.max_overhead - 8.0 / 3.0).abs() < 1e-9);
        // (2.6667 + 1.5 + 2.0) / 3 = 2.0556 -> 2.06
        assert!((stats.average_overhead - 2.06).abs() < 1e-9);
        assert_eq!(
            format!("{}", stats),
            "Turnaround time 7\nTime overhead 2.67 2.06\nMakespan 10"
        );
    }

    #[test]
    fn test_empty_run() {
        let stats = PerformanceStats::compute(&[], 0);
        assert_eq!(format!("{}", stats), "Turnaround time 0\nTime overhead 0.00 0.00\nMakespan 0");
    }
}
