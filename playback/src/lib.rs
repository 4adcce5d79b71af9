//! The boundary between the engine and whatever animates its output.
//!
//! `simcore` owns plain in-memory data and knows nothing about JSON;
//! this crate defines the serialized workload and trace schemas and
//! the one-shot driver that turns the former into the latter. A
//! player consumes the exported trace at its own pace. Nothing here
//! feeds back into the engine.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use simcore::cpu::{self, CpuPolicy, ProcessSpec};
use simcore::deadlock::{self, ResourceState};
use simcore::disk::{self, Direction, DiskPolicy};
use simcore::memory::{self, FitPolicy};
use simcore::paging::{self, PagePolicy};

/// A workload description as it arrives from the outside world,
/// pre-parsed and numeric. One file, one simulation request.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "family", rename_all = "snake_case")]
pub enum Workload {
    Cpu {
        policy:     CpuPolicyTag,
        /// Required for round robin, ignored otherwise.
        #[serde(default)]
        quantum:    Option<usize>,
        processes:  Vec<ProcessEntry>,
    },
    Safety {
        available:  Vec<u32>,
        allocation: Vec<Vec<u32>>,
        maximum:    Vec<Vec<u32>>,
    },
    Paging {
        policy: PagePolicyTag,
        frames: usize,
        refs:   Vec<u32>,
    },
    Disk {
        policy:     DiskPolicyTag,
        #[serde(default)]
        direction:  DirectionTag,
        head:       usize,
        disk_size:  usize,
        requests:   Vec<usize>,
    },
    Memory {
        policy:     FitPolicyTag,
        blocks:     Vec<usize>,
        requests:   Vec<usize>,
    },
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ProcessEntry {
    pub id:         String,
    pub arrival:    usize,
    pub burst:      usize,
    #[serde(default)]
    pub priority:   u32,
}

#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CpuPolicyTag {
    Fcfs,
    Sjf,
    RoundRobin,
    Priority,
}

#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PagePolicyTag {
    Fifo,
    Lru,
    Optimal,
}

#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DiskPolicyTag {
    Fcfs,
    Sstf,
    Scan,
    CScan,
    Look,
    CLook,
}

#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum DirectionTag {
    Down,
    #[default]
    Up,
}

#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FitPolicyTag {
    FirstFit,
    BestFit,
}

/// A fully-materialized trace, ready for external playback. Field
/// names are the wire contract; players index steps by position.
#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(tag = "family", rename_all = "snake_case")]
pub enum Trace {
    Cpu(CpuTrace),
    Safety(SafetyTrace),
    Paging(PagingTrace),
    Disk(DiskTrace),
    Memory(MemoryTrace),
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct CpuTrace {
    pub gantt:      Vec<GanttRow>,
    pub processes:  Vec<ProcessRow>,
    pub stats:      CpuStatsRow,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct GanttRow {
    pub id:     String,
    pub start:  usize,
    pub end:    usize,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct ProcessRow {
    pub id:         String,
    pub arrival:    usize,
    pub burst:      usize,
    pub priority:   u32,
    pub completion: usize,
    pub turnaround: usize,
    pub waiting:    usize,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct CpuStatsRow {
    pub avg_waiting:        f64,
    pub avg_turnaround:     f64,
    pub total_completion:   usize,
    pub cpu_utilization:    f64,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct SafetyTrace {
    pub safe:       bool,
    pub sequence:   Vec<usize>,
    pub steps:      Vec<SafetyRow>,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct SafetyRow {
    pub process:    usize,
    pub work:       Vec<u32>,
    pub sequence:   Vec<usize>,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct PagingTrace {
    pub faults:     usize,
    pub history:    Vec<PagingRow>,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct PagingRow {
    pub step:   usize,
    pub page:   u32,
    pub fault:  bool,
    pub frames: Vec<Option<u32>>,
    pub loaded: Option<usize>,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct DiskTrace {
    pub head:       usize,
    pub sequence:   Vec<usize>,
    pub total_seek: usize,
    pub avg_seek:   f64,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct MemoryTrace {
    pub steps:          Vec<MemoryRow>,
    pub fragmentation:  usize,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct MemoryRow {
    pub blocks:     Vec<BlockRow>,
    pub processes:  Vec<PlacementRow>,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct BlockRow {
    pub id:             usize,
    pub size:           usize,
    pub process:        Option<usize>,
    pub process_size:   Option<usize>,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct PlacementRow {
    pub id:     usize,
    pub size:   usize,
    pub block:  Option<usize>,
}

/// Runs the engine once over `workload`. The returned trace is
/// complete; the caller never re-enters the engine to step it.
pub fn run(workload: &Workload) -> Result<Trace> {
    match workload {
        Workload::Cpu {
            policy,
            quantum,
            processes,
        } => {
            let specs: Vec<ProcessSpec> = processes
                .iter()
                .map(|p| ProcessSpec {
                    id:         p.id.clone(),
                    arrival:    p.arrival,
                    burst:      p.burst,
                    priority:   p.priority,
                })
                .collect();
            let policy = match policy {
                CpuPolicyTag::Fcfs      => CpuPolicy::Fcfs,
                CpuPolicyTag::Sjf       => CpuPolicy::Sjf,
                CpuPolicyTag::Priority  => CpuPolicy::Priority,
                CpuPolicyTag::RoundRobin => match quantum {
                    Some(q) => CpuPolicy::RoundRobin { quantum: *q },
                    None    => bail!("round robin workload is missing its quantum"),
                },
            };
            let result = cpu::schedule(&specs, policy)?;
            Ok(Trace::Cpu(CpuTrace {
                gantt: result
                    .gantt
                    .iter()
                    .map(|s| GanttRow {
                        id:     s.id.clone(),
                        start:  s.start,
                        end:    s.end,
                    })
                    .collect(),
                processes: result
                    .processes
                    .iter()
                    .map(|p| ProcessRow {
                        id:         p.id.clone(),
                        arrival:    p.arrival,
                        burst:      p.burst,
                        priority:   p.priority,
                        completion: p.completion,
                        turnaround: p.turnaround,
                        waiting:    p.waiting,
                    })
                    .collect(),
                stats: CpuStatsRow {
                    avg_waiting:        result.stats.avg_waiting,
                    avg_turnaround:     result.stats.avg_turnaround,
                    total_completion:   result.stats.total_completion,
                    cpu_utilization:    result.stats.cpu_utilization,
                },
            }))
        }
        Workload::Safety {
            available,
            allocation,
            maximum,
        } => {
            let state = ResourceState {
                available:  available.clone(),
                allocation: allocation.clone(),
                maximum:    maximum.clone(),
            };
            let report = deadlock::check_safety(&state)?;
            Ok(Trace::Safety(SafetyTrace {
                safe:       report.safe,
                sequence:   report.sequence,
                steps: report
                    .steps
                    .into_iter()
                    .map(|s| SafetyRow {
                        process:    s.process,
                        work:       s.work,
                        sequence:   s.sequence,
                    })
                    .collect(),
            }))
        }
        Workload::Paging {
            policy,
            frames,
            refs,
        } => {
            let policy = match policy {
                PagePolicyTag::Fifo     => PagePolicy::Fifo,
                PagePolicyTag::Lru      => PagePolicy::Lru,
                PagePolicyTag::Optimal  => PagePolicy::Optimal,
            };
            let result = paging::replace(refs, *frames, policy)?;
            Ok(Trace::Paging(PagingTrace {
                faults: result.faults,
                history: result
                    .history
                    .into_iter()
                    .map(|s| PagingRow {
                        step:   s.step,
                        page:   s.page,
                        fault:  s.fault,
                        frames: s.frames,
                        loaded: s.loaded,
                    })
                    .collect(),
            }))
        }
        Workload::Disk {
            policy,
            direction,
            head,
            disk_size,
            requests,
        } => {
            let dir = match direction {
                DirectionTag::Down  => Direction::Down,
                DirectionTag::Up    => Direction::Up,
            };
            let policy = match policy {
                DiskPolicyTag::Fcfs     => DiskPolicy::Fcfs,
                DiskPolicyTag::Sstf     => DiskPolicy::Sstf,
                DiskPolicyTag::Scan     => DiskPolicy::Scan(dir),
                DiskPolicyTag::CScan    => DiskPolicy::CScan(dir),
                DiskPolicyTag::Look     => DiskPolicy::Look(dir),
                DiskPolicyTag::CLook    => DiskPolicy::CLook(dir),
            };
            let report = disk::seek(requests, *head, *disk_size, policy)?;
            Ok(Trace::Disk(DiskTrace {
                head:       *head,
                sequence:   report.sequence,
                total_seek: report.total_seek,
                avg_seek:   report.avg_seek,
            }))
        }
        Workload::Memory {
            policy,
            blocks,
            requests,
        } => {
            let policy = match policy {
                FitPolicyTag::FirstFit  => FitPolicy::FirstFit,
                FitPolicyTag::BestFit   => FitPolicy::BestFit,
            };
            let report = memory::allocate(blocks, requests, policy)?;
            Ok(Trace::Memory(MemoryTrace {
                fragmentation: report.fragmentation,
                steps: report
                    .steps
                    .into_iter()
                    .map(|s| MemoryRow {
                        blocks: s.blocks.iter().map(block_row).collect(),
                        processes: s
                            .processes
                            .iter()
                            .map(|p| PlacementRow {
                                id:     p.id,
                                size:   p.size,
                                block:  p.block,
                            })
                            .collect(),
                    })
                    .collect(),
            }))
        }
    }
}

fn block_row(b: &memory::Block) -> BlockRow {
    BlockRow {
        id:             b.id,
        size:           b.size,
        process:        b.tenant.map(|t| t.process),
        process_size:   b.tenant.map(|t| t.size),
    }
}
