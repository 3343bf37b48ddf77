//! Integration tests for usecases_scheduling
//!
//! Runs whole simulations through the public `Scheduler` API and checks the
//! published trace events, completion records and makespan.

use entities_process::{MemoryView, ProcessDescriptor, TraceEvent};
use usecases_memory_management::MemoryStrategy;
use usecases_scheduling::{ConfigError, Scheduler, SimulationConfig};

fn run(strategy: MemoryStrategy, quantum: u32, descriptors: Vec<ProcessDescriptor>) -> (Vec<TraceEvent>, u32) {
    let config = SimulationConfig::new(strategy, quantum).unwrap();
    let mut scheduler = Scheduler::new(config, descriptors).unwrap();
    let mut events: Vec<TraceEvent> = Vec::new();
    let report = scheduler.run(&mut events).unwrap();
    (events, report.makespan)
}

fn running(time: u32, name: &str, remaining_time: u32, memory: MemoryView) -> TraceEvent {
    TraceEvent::Running {
        time,
        name: name.to_string(),
        remaining_time,
        memory,
    }
}

fn finished(time: u32, name: &str, proc_remaining: usize) -> TraceEvent {
    TraceEvent::Finished {
        time,
        name: name.to_string(),
        proc_remaining,
    }
}

fn framed(usage_percent: u32, frames: impl IntoIterator<Item = usize>) -> MemoryView {
    MemoryView::Framed {
        usage_percent,
        frames: frames.into_iter().collect(),
    }
}

fn evicted(time: u32, frames: impl IntoIterator<Item = usize>) -> TraceEvent {
    TraceEvent::Evicted {
        time,
        frames: frames.into_iter().collect(),
    }
}

#[test]
fn test_paged_three_processes_without_pressure() {
    let (events, makespan) = run(
        MemoryStrategy::Paged,
        2,
        vec![
            ProcessDescriptor::new(0, "P1", 3, 64),
            ProcessDescriptor::new(1, "P2", 2, 32),
            ProcessDescriptor::new(2, "P3", 4, 40),
        ],
    );
    assert_eq!(
        events,
        vec![
            running(0, "P1", 3, framed(4, 0..16)),
            running(2, "P2", 2, framed(5, 16..24)),
            evicted(4, 16..24),
            finished(4, "P2", 2),
            running(4, "P3", 4, framed(6, 16..26)),
            running(6, "P1", 1, framed(6, 0..16)),
            evicted(8, 0..16),
            finished(8, "P1", 1),
            running(8, "P3", 2, framed(2, 16..26)),
            evicted(10, 16..26),
            finished(10, "P3", 0),
        ]
    );
    assert_eq!(makespan, 10);

    // every notice belongs to a completion, none to memory pressure
    for (i, event) in events.iter().enumerate() {
        if let TraceEvent::Evicted { time, .. } = event {
            assert!(matches!(&events[i + 1], TraceEvent::Finished { time: t, .. } if t == time));
        }
    }
}

#[test]
fn test_paged_evicts_least_recently_dispatched() {
    let (events, makespan) = run(
        MemoryStrategy::Paged,
        2,
        vec![
            ProcessDescriptor::new(0, "P1", 4, 1024),
            ProcessDescriptor::new(0, "P2", 4, 1024),
            ProcessDescriptor::new(1, "P3", 2, 16),
        ],
    );
    assert_eq!(
        events,
        vec![
            running(0, "P1", 4, framed(50, 0..256)),
            running(2, "P2", 4, framed(100, 256..512)),
            evicted(4, 0..256),
            running(4, "P3", 2, framed(51, 0..4)),
            evicted(6, 0..4),
            finished(6, "P3", 2),
            running(6, "P1", 2, framed(100, 0..256)),
            evicted(8, 0..256),
            finished(8, "P1", 1),
            running(8, "P2", 2, framed(50, 256..512)),
            evicted(10, 256..512),
            finished(10, "P2", 0),
        ]
    );
    assert_eq!(makespan, 10);
}

#[test]
fn test_virtual_partial_eviction_keeps_victim_running() {
    let (events, makespan) = run(
        MemoryStrategy::Virtual,
        1,
        vec![
            ProcessDescriptor::new(0, "P1", 4, 2040),
            ProcessDescriptor::new(0, "P2", 2, 40),
        ],
    );
    assert_eq!(
        events,
        vec![
            running(0, "P1", 4, framed(100, 0..510)),
            evicted(1, [0, 1]),
            running(1, "P2", 2, framed(100, [0, 1, 510, 511])),
            running(2, "P1", 3, framed(100, 2..510)),
            running(3, "P2", 1, framed(100, [0, 1, 510, 511])),
            evicted(4, [0, 1, 510, 511]),
            finished(4, "P2", 1),
            running(4, "P1", 2, framed(100, 2..510)),
            evicted(6, 2..510),
            finished(6, "P1", 0),
        ]
    );
    assert_eq!(makespan, 6);
}

#[test]
fn test_first_fit_waits_for_space() {
    let (events, makespan) = run(
        MemoryStrategy::FirstFit,
        3,
        vec![
            ProcessDescriptor::new(0, "big", 3, 2000),
            ProcessDescriptor::new(0, "small", 3, 100),
        ],
    );
    assert_eq!(
        events,
        vec![
            running(
                0,
                "big",
                3,
                MemoryView::Contiguous {
                    usage_percent: 98,
                    address: 0
                }
            ),
            finished(3, "big", 1),
            running(
                3,
                "small",
                3,
                MemoryView::Contiguous {
                    usage_percent: 5,
                    address: 0
                }
            ),
            finished(6, "small", 0),
        ]
    );
    assert_eq!(makespan, 6);
}

#[test]
fn test_uninterrupted_process_prints_once() {
    let (events, makespan) = run(MemoryStrategy::Infinite, 1, vec![ProcessDescriptor::new(0, "solo", 5, 10)]);
    assert_eq!(
        events,
        vec![running(0, "solo", 5, MemoryView::Unlimited), finished(5, "solo", 0)]
    );
    assert_eq!(makespan, 5);
}

#[test]
fn test_arrival_during_completion_counts_in_queue() {
    let (events, _) = run(
        MemoryStrategy::Infinite,
        3,
        vec![
            ProcessDescriptor::new(0, "A", 3, 10),
            ProcessDescriptor::new(3, "B", 1, 10),
        ],
    );
    assert_eq!(events[1], finished(3, "A", 1));
}

#[test]
fn test_completion_records() {
    let config = SimulationConfig::new(MemoryStrategy::Infinite, 2).unwrap();
    let mut scheduler = Scheduler::new(
        config,
        vec![
            ProcessDescriptor::new(0, "A", 4, 10),
            ProcessDescriptor::new(1, "B", 2, 10),
        ],
    )
    .unwrap();
    let report = scheduler.run(&mut Vec::<TraceEvent>::new()).unwrap();
    // A 0-2, B 2-4, A 4-6
    let turnaround: Vec<(String, u32)> = report
        .completions
        .iter()
        .map(|record| (record.name.clone(), record.turnaround_time()))
        .collect();
    assert_eq!(turnaround, vec![("A".to_string(), 6), ("B".to_string(), 3)]);
    assert!(scheduler.is_complete());
}

#[test]
fn test_oversized_paged_process_rejected() {
    let config = SimulationConfig::new(MemoryStrategy::Paged, 1).unwrap();
    let err = Scheduler::new(config, vec![ProcessDescriptor::new(0, "huge", 1, 2052)]).err();
    assert_eq!(
        err,
        Some(ConfigError::RequirementTooLarge {
            name: "huge".to_string(),
            requirement_kb: 2052,
            strategy: MemoryStrategy::Paged,
        })
    );
}
