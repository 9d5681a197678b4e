//! Scheduler behaviour with real child processes.

#![cfg(unix)]

use cookiecutter::job::JobState;
use cookiecutter::queue::{JobQueue, QueueOrder};
use cookiecutter::scheduler::Scheduler;
use std::path::Path;
use std::time::{Duration, Instant};
use tempfile::TempDir;

/// A job that marks itself running, records how many jobs are marked, and
/// clears its mark before exiting.
fn occupancy_probe(dir: &Path, id: usize) -> String {
    let dir = dir.display();
    format!(
        "touch {dir}/running.{id}; ls {dir} | grep -c '^running' >> {dir}/observed; \
         sleep 0.1; rm {dir}/running.{id}"
    )
}

fn observed_maximum(dir: &Path) -> usize {
    std::fs::read_to_string(dir.join("observed"))
        .unwrap()
        .lines()
        .map(|line| line.trim().parse::<usize>().unwrap())
        .max()
        .unwrap()
}

#[test]
fn never_exceeds_the_limit() {
    let dir = TempDir::new().unwrap();
    let commands: Vec<String> = (0..10).map(|i| occupancy_probe(dir.path(), i)).collect();

    let report = Scheduler::new(3)
        .unwrap()
        .run(JobQueue::from_commands(commands, QueueOrder::Fifo))
        .unwrap();

    assert_eq!(report.launched, 10);
    assert_eq!(report.succeeded, 10);
    assert_eq!(report.peak_in_flight, 3);
    assert!(observed_maximum(dir.path()) <= 3);
}

#[test]
fn limit_one_runs_jobs_one_at_a_time() {
    let dir = TempDir::new().unwrap();
    let commands: Vec<String> = (0..4).map(|i| occupancy_probe(dir.path(), i)).collect();

    let report = Scheduler::new(1)
        .unwrap()
        .run(JobQueue::from_commands(commands, QueueOrder::Fifo))
        .unwrap();

    assert_eq!(report.peak_in_flight, 1);
    assert_eq!(observed_maximum(dir.path()), 1);
}

#[test]
fn jobs_overlap_up_to_the_limit() {
    let queue = JobQueue::from_commands(vec!["sleep 0.5"; 4], QueueOrder::Fifo);

    let started = Instant::now();
    let report = Scheduler::new(4).unwrap().run(queue).unwrap();

    assert_eq!(report.succeeded, 4);
    assert!(started.elapsed() < Duration::from_millis(1900));
}

#[test]
fn limit_larger_than_queue_launches_everything() {
    let queue = JobQueue::from_commands(["true", "true"], QueueOrder::Fifo);
    let report = Scheduler::new(8).unwrap().run(queue).unwrap();
    assert_eq!(report.launched, 2);
    assert_eq!(report.peak_in_flight, 2);
}

#[test]
fn failures_do_not_stop_the_batch() {
    let commands = ["false", "exit 2", "true", "false", "true"];
    let report = Scheduler::new(2)
        .unwrap()
        .run(JobQueue::from_commands(commands, QueueOrder::Fifo))
        .unwrap();

    assert_eq!(report.launched, 5);
    assert_eq!(report.succeeded + report.failed, 5);
    assert_eq!(report.failed, 3);
    assert!(report
        .outcomes
        .iter()
        .all(|o| matches!(o.state, JobState::Succeeded | JobState::Failed)));
}

#[test]
fn run_waits_for_the_last_job() {
    let dir = TempDir::new().unwrap();
    let marker = dir.path().join("done");
    let command = format!("sleep 0.3; touch {}", marker.display());

    Scheduler::new(2)
        .unwrap()
        .run(JobQueue::from_commands(["true".to_string(), command], QueueOrder::Fifo))
        .unwrap();

    assert!(marker.exists());
}

#[test]
fn fifo_launches_in_insertion_order() {
    let dir = TempDir::new().unwrap();
    let log = dir.path().join("log");
    let commands: Vec<String> = ["a", "b", "c"]
        .iter()
        .map(|name| format!("echo {name} >> {}", log.display()))
        .collect();

    Scheduler::new(1)
        .unwrap()
        .run(JobQueue::from_commands(commands, QueueOrder::Fifo))
        .unwrap();

    assert_eq!(std::fs::read_to_string(&log).unwrap(), "a\nb\nc\n");
}
