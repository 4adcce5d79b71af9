use std::collections::{HashSet, VecDeque};

use itertools::Itertools;

use crate::{InputError, Ticks};

/// One process as described by the caller. `priority` follows the
/// usual textbook convention: lower value means higher priority.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProcessSpec {
    pub id:         String,
    pub arrival:    Ticks,
    pub burst:      Ticks,
    pub priority:   u32,
}

/// One stretch of CPU given to a single process. Consecutive segments
/// are contiguous unless the CPU sat idle in between, in which case
/// the gap between `end` and the next `start` is the idle window.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Segment {
    pub id:     String,
    pub start:  Ticks,
    pub end:    Ticks,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CpuPolicy {
    /// First come, first served. Stable on equal arrivals.
    Fcfs,
    /// Shortest job first, non-preemptive.
    Sjf,
    /// Fixed-quantum time slicing with a FIFO ready queue.
    RoundRobin { quantum: Ticks },
    /// Non-preemptive priority, lower value wins.
    Priority,
}

/// Derived times for one completed process. The identities
/// `turnaround = completion - arrival` and
/// `waiting = turnaround - burst` hold by construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProcessReport {
    pub id:         String,
    pub arrival:    Ticks,
    pub burst:      Ticks,
    pub priority:   u32,
    pub completion: Ticks,
    pub turnaround: Ticks,
    pub waiting:    Ticks,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CpuStats {
    pub avg_waiting:        f64,
    pub avg_turnaround:     f64,
    pub total_completion:   Ticks,
    /// Total burst over total completion, as a percentage.
    pub cpu_utilization:    f64,
}

/// The full outcome of one scheduling run. `processes` comes back in
/// input order no matter which policy ran, so callers never have to
/// re-sort before displaying per-process rows.
#[derive(Clone, Debug, PartialEq)]
pub struct ScheduleResult {
    pub gantt:      Vec<Segment>,
    pub processes:  Vec<ProcessReport>,
    pub stats:      CpuStats,
}

/// Runs `policy` over `specs` and returns the Gantt trace plus
/// per-process and aggregate statistics.
///
/// An empty process set is a legitimate workload: it yields an empty
/// trace and all-zero statistics rather than an error.
pub fn schedule(specs: &[ProcessSpec], policy: CpuPolicy) -> Result<ScheduleResult, InputError> {
    validate(specs, policy)?;
    if specs.is_empty() {
        return Ok(ScheduleResult {
            gantt:      vec![],
            processes:  vec![],
            stats:      CpuStats {
                avg_waiting:        0.0,
                avg_turnaround:     0.0,
                total_completion:   0,
                cpu_utilization:    0.0,
            },
        });
    }

    let (gantt, completion) = match policy {
        CpuPolicy::Fcfs                     => run_fcfs(specs),
        CpuPolicy::Sjf                      => run_nonpreemptive(specs, |p| p.burst),
        CpuPolicy::Priority                 => run_nonpreemptive(specs, |p| p.priority as usize),
        CpuPolicy::RoundRobin { quantum }   => run_round_robin(specs, quantum),
    };

    Ok(build_result(specs, gantt, completion))
}

fn validate(specs: &[ProcessSpec], policy: CpuPolicy) -> Result<(), InputError> {
    if let CpuPolicy::RoundRobin { quantum } = policy {
        if quantum == 0 {
            return Err(InputError::NonPositiveQuantum);
        }
    }
    let mut seen = HashSet::new();
    for p in specs {
        if p.burst == 0 {
            return Err(InputError::NonPositiveBurst { id: p.id.clone() });
        }
        if !seen.insert(p.id.as_str()) {
            return Err(InputError::DuplicateProcessId { id: p.id.clone() });
        }
    }
    Ok(())
}

fn run_fcfs(specs: &[ProcessSpec]) -> (Vec<Segment>, Vec<Ticks>) {
    let mut gantt = Vec::with_capacity(specs.len());
    let mut completion = vec![0; specs.len()];
    let mut clock = 0;
    // Stable sort, so equal arrivals keep their input order.
    for i in (0..specs.len()).sorted_by_key(|&i| specs[i].arrival) {
        let p = &specs[i];
        if clock < p.arrival {
            clock = p.arrival;
        }
        gantt.push(Segment {
            id:     p.id.clone(),
            start:  clock,
            end:    clock + p.burst,
        });
        clock += p.burst;
        completion[i] = clock;
    }

    (gantt, completion)
}

/// Shared runner for SJF and Priority. Both repeatedly pick, among
/// the arrived and unfinished processes, the one minimizing `key`;
/// ties fall to the earlier arrival, then to the earlier input
/// position. If nothing has arrived yet, the clock jumps straight to
/// the earliest remaining arrival.
fn run_nonpreemptive(
    specs:  &[ProcessSpec],
    key:    impl Fn(&ProcessSpec) -> usize,
) -> (Vec<Segment>, Vec<Ticks>) {
    let mut done = vec![false; specs.len()];
    let mut completion = vec![0; specs.len()];
    let mut gantt = Vec::with_capacity(specs.len());
    let mut clock = 0;
    let mut finished = 0;
    while finished < specs.len() {
        let picked = (0..specs.len())
            .filter(|&i| !done[i] && specs[i].arrival <= clock)
            .min_by_key(|&i| (key(&specs[i]), specs[i].arrival, i));
        let Some(i) = picked else {
            clock = (0..specs.len())
                .filter(|&i| !done[i])
                .map(|i| specs[i].arrival)
                .min()
                .unwrap();
            continue;
        };
        let p = &specs[i];
        gantt.push(Segment {
            id:     p.id.clone(),
            start:  clock,
            end:    clock + p.burst,
        });
        clock += p.burst;
        completion[i] = clock;
        done[i] = true;
        finished += 1;
    }

    (gantt, completion)
}

fn run_round_robin(specs: &[ProcessSpec], quantum: Ticks) -> (Vec<Segment>, Vec<Ticks>) {
    let mut pending: VecDeque<usize> = (0..specs.len())
        .sorted_by_key(|&i| specs[i].arrival)
        .collect();
    let mut remaining: Vec<Ticks> = specs.iter().map(|p| p.burst).collect();
    let mut completion = vec![0; specs.len()];
    let mut queue: VecDeque<usize> = VecDeque::new();
    let mut gantt = Vec::new();
    let mut clock = 0;

    while !pending.is_empty() || !queue.is_empty() {
        while pending.front().is_some_and(|&i| specs[i].arrival <= clock) {
            queue.push_back(pending.pop_front().unwrap());
        }
        let Some(i) = queue.pop_front() else {
            // Ready queue drained. The front of `pending` is the
            // earliest arrival left, thanks to the sort above.
            clock = specs[*pending.front().unwrap()].arrival;
            continue;
        };
        let slice = quantum.min(remaining[i]);
        gantt.push(Segment {
            id:     specs[i].id.clone(),
            start:  clock,
            end:    clock + slice,
        });
        clock += slice;
        remaining[i] -= slice;
        // Fairness rule: whatever arrived during the slice enters the
        // queue BEFORE the preempted process gets back in line.
        while pending.front().is_some_and(|&j| specs[j].arrival <= clock) {
            queue.push_back(pending.pop_front().unwrap());
        }
        if remaining[i] > 0 {
            queue.push_back(i);
        } else {
            completion[i] = clock;
        }
    }

    (gantt, completion)
}

fn build_result(
    specs:      &[ProcessSpec],
    gantt:      Vec<Segment>,
    completion: Vec<Ticks>,
) -> ScheduleResult {
    let processes: Vec<ProcessReport> = specs
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let turnaround = completion[i] - p.arrival;
            ProcessReport {
                id:         p.id.clone(),
                arrival:    p.arrival,
                burst:      p.burst,
                priority:   p.priority,
                completion: completion[i],
                turnaround,
                waiting:    turnaround - p.burst,
            }
        })
        .collect();

    let n = specs.len() as f64;
    // Nonempty input and positive bursts guarantee a nonzero span.
    let total_completion = gantt.last().map_or(0, |s| s.end);
    let total_burst: Ticks = specs.iter().map(|p| p.burst).sum();
    let stats = CpuStats {
        avg_waiting:        processes.iter().map(|p| p.waiting as f64).sum::<f64>() / n,
        avg_turnaround:     processes.iter().map(|p| p.turnaround as f64).sum::<f64>() / n,
        total_completion,
        cpu_utilization:    total_burst as f64 / total_completion as f64 * 100.0,
    };

    ScheduleResult { gantt, processes, stats }
}
