//! Integration tests for infrastructure_utilities crate
//!
//! These tests read process files from disk, write traces through
//! `TraceWriter` and check the summary statistics end to end.

use std::fs;
use std::io::Write;

use entities_process::{CompletionRecord, MemoryView, TraceEvent, TraceSink};
use infrastructure_utilities::*;

#[test]
fn test_load_processes_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "0 P1 30 16").unwrap();
    writeln!(file, "29 P2 40 64").unwrap();
    writeln!(file, "10 P3 20 1024").unwrap();

    let processes = load_processes(file.path()).unwrap();
    let names: Vec<&str> = processes.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["P1", "P2", "P3"]);
    assert_eq!(processes[2].arrival_time, 10);
    assert_eq!(processes[2].memory_requirement, 1024);
}

#[test]
fn test_missing_file_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.txt");
    let err = load_processes(&path).unwrap_err();
    assert!(matches!(err, ParseError::Io { .. }));
    assert!(format!("{}", err).contains("absent.txt"));
    assert!(std::error::Error::source(&err).is_some());
}

#[test]
fn test_file_errors_carry_line_numbers() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "0 P1 30 16\n1 P2 x 16\n").unwrap();
    let err = load_processes(file.path()).unwrap_err();
    assert!(matches!(err, ParseError::MalformedLine { line: 2, .. }));
}

#[test]
fn test_trace_writer_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("trace.txt");
    {
        let file = fs::File::create(&path).unwrap();
        let mut writer = TraceWriter::new(file);
        writer
            .emit(&TraceEvent::Running {
                time: 0,
                name: "P1".to_string(),
                remaining_time: 30,
                memory: MemoryView::Framed {
                    usage_percent: 1,
                    frames: vec![0, 1, 2, 3],
                },
            })
            .unwrap();
        writer
            .emit(&TraceEvent::Evicted {
                time: 30,
                frames: vec![0, 1, 2, 3],
            })
            .unwrap();
        writer
            .emit(&TraceEvent::Finished {
                time: 30,
                name: "P1".to_string(),
                proc_remaining: 0,
            })
            .unwrap();
        writer.flush().unwrap();
    }
    let text = fs::read_to_string(&path).unwrap();
    assert_eq!(
        text,
        "0,RUNNING,process-name=P1,remaining-time=30,mem-usage=1%,mem-frames=[0,1,2,3]\n\
         30,EVICTED,evicted-frames=[0,1,2,3]\n\
         30,FINISHED,process-name=P1,proc-remaining=0\n"
    );
}

#[test]
fn test_statistics_summary() {
    let records = vec![
        CompletionRecord {
            name: "A".to_string(),
            arrival_time: 0,
            service_time: 4,
            completion_time: 6,
        },
        CompletionRecord {
            name: "B".to_string(),
            arrival_time: 1,
            service_time: 2,
            completion_time: 4,
        },
    ];
    // overheads 1.5 and 1.5
    let stats = PerformanceStats::compute(&records, 6);
    assert_eq!(
        format!("{}", stats),
        "Turnaround time 5\nTime overhead 1.50 1.50\nMakespan 6"
    );
}
