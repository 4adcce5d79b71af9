use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};

use simcore::cpu::{self, CpuPolicy, ProcessSpec};
use simcore::deadlock::{self, ResourceState};
use simcore::disk::{self, Direction, DiskPolicy};
use simcore::memory::{self, FitPolicy};
use simcore::paging::{self, PagePolicy};
use simcore::{Cylinder, Ticks};

/// Deterministic OS resource-management policy simulator
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    family: Family,
}

#[derive(Subcommand, Debug)]
enum Family {
    /// CPU process scheduling
    Cpu(CpuArgs),
    /// Banker's algorithm safety check
    Safety(SafetyArgs),
    /// Page replacement
    Page(PageArgs),
    /// Disk-head scheduling
    Disk(DiskArgs),
    /// Contiguous memory allocation
    Memory(MemoryArgs),
}

#[derive(Args, Debug)]
struct CpuArgs {
    #[arg(value_enum)]
    policy: CpuPolicyArg,

    /// Arrival times, comma-separated
    #[arg(short, long)]
    arrivals:   String,

    /// Burst times, comma-separated, same length as arrivals
    #[arg(short, long)]
    bursts:     String,

    /// Priorities (lower wins), comma-separated; defaults to zeros
    #[arg(short, long)]
    priorities: Option<String>,

    /// Round robin quantum
    #[arg(short, long, default_value_t = 1)]
    quantum:    Ticks,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug)]
enum CpuPolicyArg {
    /// First come, first served
    Fcfs,
    /// Shortest job first, non-preemptive
    Sjf,
    /// Round robin
    Rr,
    /// Non-preemptive priority
    Priority,
}

#[derive(Args, Debug)]
struct SafetyArgs {
    /// Available vector, comma-separated
    #[arg(long)]
    available:  String,

    /// Allocation matrix, ';' between rows, ',' within
    #[arg(long)]
    allocation: String,

    /// Maximum-demand matrix, ';' between rows, ',' within
    #[arg(long)]
    maximum:    String,
}

#[derive(Args, Debug)]
struct PageArgs {
    #[arg(value_enum)]
    policy: PagePolicyArg,

    /// Reference string, comma-separated page numbers
    #[arg(short, long)]
    refs:   String,

    /// Frame capacity
    #[arg(short, long)]
    frames: usize,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug)]
enum PagePolicyArg {
    Fifo,
    Lru,
    Optimal,
}

#[derive(Args, Debug)]
struct DiskArgs {
    #[arg(value_enum)]
    policy: DiskPolicyArg,

    /// Pending cylinder requests, comma-separated
    #[arg(short, long)]
    requests:   String,

    /// Initial head position
    #[arg(long)]
    head:       Cylinder,

    /// Cylinder count
    #[arg(short, long)]
    disk_size:  usize,

    /// Initial sweep direction for SCAN/C-SCAN/LOOK/C-LOOK
    #[arg(value_enum, long, default_value_t = DirectionArg::Up)]
    direction:  DirectionArg,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug)]
enum DiskPolicyArg {
    Fcfs,
    Sstf,
    Scan,
    CScan,
    Look,
    CLook,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug)]
enum DirectionArg {
    /// Toward cylinder 0
    Down,
    /// Toward the last cylinder
    Up,
}

#[derive(Args, Debug)]
struct MemoryArgs {
    #[arg(value_enum)]
    policy: FitPolicyArg,

    /// Free block sizes, comma-separated, in block-list order
    #[arg(short, long)]
    blocks:     String,

    /// Requested sizes, comma-separated, in process order
    #[arg(short, long)]
    requests:   String,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug)]
enum FitPolicyArg {
    FirstFit,
    BestFit,
}

// The engine takes pre-parsed numbers; turning the textual lists into
// vectors is this binary's job, not the library's.
fn parse_list(s: &str) -> Result<Vec<usize>> {
    s.split(',')
        .map(str::trim)
        .filter(|x| !x.is_empty())
        .map(|x| x.parse::<usize>().with_context(|| format!("bad number {x:?}")))
        .collect()
}

fn parse_matrix(s: &str) -> Result<Vec<Vec<u32>>> {
    s.split(';')
        .map(|row| {
            row.split(',')
                .map(str::trim)
                .filter(|x| !x.is_empty())
                .map(|x| x.parse::<u32>().with_context(|| format!("bad number {x:?}")))
                .collect()
        })
        .collect()
}

fn main() -> Result<()> {
    match Cli::parse().family {
        Family::Cpu(args)       => run_cpu(args),
        Family::Safety(args)    => run_safety(args),
        Family::Page(args)      => run_page(args),
        Family::Disk(args)      => run_disk(args),
        Family::Memory(args)    => run_memory(args),
    }
}

fn run_cpu(args: CpuArgs) -> Result<()> {
    let arrivals = parse_list(&args.arrivals)?;
    let bursts = parse_list(&args.bursts)?;
    anyhow::ensure!(
        arrivals.len() == bursts.len(),
        "got {} arrivals but {} bursts",
        arrivals.len(),
        bursts.len()
    );
    let priorities = match &args.priorities {
        Some(p) => parse_list(p)?,
        None => vec![0; arrivals.len()],
    };
    anyhow::ensure!(
        priorities.len() == arrivals.len(),
        "got {} arrivals but {} priorities",
        arrivals.len(),
        priorities.len()
    );
    let specs: Vec<ProcessSpec> = arrivals
        .iter()
        .zip(&bursts)
        .zip(&priorities)
        .enumerate()
        .map(|(i, ((&arrival, &burst), &priority))| ProcessSpec {
            id: format!("P{}", i + 1),
            arrival,
            burst,
            priority: priority as u32,
        })
        .collect();
    let policy = match args.policy {
        CpuPolicyArg::Fcfs      => CpuPolicy::Fcfs,
        CpuPolicyArg::Sjf       => CpuPolicy::Sjf,
        CpuPolicyArg::Rr        => CpuPolicy::RoundRobin { quantum: args.quantum },
        CpuPolicyArg::Priority  => CpuPolicy::Priority,
    };

    let result = cpu::schedule(&specs, policy)?;
    println!("GANTT");
    for seg in &result.gantt {
        println!("{:>6} [{:>4} .. {:>4}]", seg.id, seg.start, seg.end);
    }
    println!("\n{:>6} {:>7} {:>5} {:>10} {:>10} {:>7}", "id", "arrival", "burst", "completion", "turnaround", "waiting");
    for p in &result.processes {
        println!(
            "{:>6} {:>7} {:>5} {:>10} {:>10} {:>7}",
            p.id, p.arrival, p.burst, p.completion, p.turnaround, p.waiting
        );
    }
    println!(
        "\nSUM: avg_wait={:.2} avg_turnaround={:.2} completion={} utilization={:.2}%",
        result.stats.avg_waiting,
        result.stats.avg_turnaround,
        result.stats.total_completion,
        result.stats.cpu_utilization
    );

    Ok(())
}

fn run_safety(args: SafetyArgs) -> Result<()> {
    let state = ResourceState {
        available: parse_list(&args.available)?
            .into_iter()
            .map(|x| x as u32)
            .collect(),
        allocation: parse_matrix(&args.allocation)?,
        maximum:    parse_matrix(&args.maximum)?,
    };

    let report = deadlock::check_safety(&state)?;
    for step in &report.steps {
        println!(
            "admit P{:<3} work={:?} sequence={:?}",
            step.process, step.work, step.sequence
        );
    }
    if report.safe {
        let named: Vec<String> = report.sequence.iter().map(|i| format!("P{i}")).collect();
        println!("SAFE: {}", named.join(" -> "));
    } else {
        println!("UNSAFE: no process can proceed");
    }

    Ok(())
}

fn run_page(args: PageArgs) -> Result<()> {
    let refs: Vec<u32> = parse_list(&args.refs)?.into_iter().map(|x| x as u32).collect();
    let policy = match args.policy {
        PagePolicyArg::Fifo     => PagePolicy::Fifo,
        PagePolicyArg::Lru      => PagePolicy::Lru,
        PagePolicyArg::Optimal  => PagePolicy::Optimal,
    };

    let result = paging::replace(&refs, args.frames, policy)?;
    for snap in &result.history {
        let cells: Vec<String> = snap
            .frames
            .iter()
            .map(|f| f.map_or("-".into(), |p| p.to_string()))
            .collect();
        println!(
            "{:>3}: page {:>3} [{}] {}",
            snap.step,
            snap.page,
            cells.join(" "),
            if snap.fault { "FAULT" } else { "hit" }
        );
    }
    println!("\nSUM: {} faults / {} references", result.faults, refs.len());

    Ok(())
}

fn run_disk(args: DiskArgs) -> Result<()> {
    let requests = parse_list(&args.requests)?;
    let dir = match args.direction {
        DirectionArg::Down  => Direction::Down,
        DirectionArg::Up    => Direction::Up,
    };
    let policy = match args.policy {
        DiskPolicyArg::Fcfs     => DiskPolicy::Fcfs,
        DiskPolicyArg::Sstf     => DiskPolicy::Sstf,
        DiskPolicyArg::Scan     => DiskPolicy::Scan(dir),
        DiskPolicyArg::CScan    => DiskPolicy::CScan(dir),
        DiskPolicyArg::Look     => DiskPolicy::Look(dir),
        DiskPolicyArg::CLook    => DiskPolicy::CLook(dir),
    };

    let report = disk::seek(&requests, args.head, args.disk_size, policy)?;
    let walk: Vec<String> = std::iter::once(args.head)
        .chain(report.sequence.iter().copied())
        .map(|c| c.to_string())
        .collect();
    println!("{}", walk.join(" -> "));
    println!(
        "\nSUM: total_seek={} avg_seek={:.2}",
        report.total_seek, report.avg_seek
    );

    Ok(())
}

fn run_memory(args: MemoryArgs) -> Result<()> {
    let blocks = parse_list(&args.blocks)?;
    let requests = parse_list(&args.requests)?;
    let policy = match args.policy {
        FitPolicyArg::FirstFit  => FitPolicy::FirstFit,
        FitPolicyArg::BestFit   => FitPolicy::BestFit,
    };

    let report = memory::allocate(&blocks, &requests, policy)?;
    for (i, step) in report.steps.iter().enumerate() {
        let p = &step.processes[i];
        match p.block {
            Some(b) => println!("P{} ({}) -> block {} ({})", p.id, p.size, b, step.blocks[b].size),
            None    => println!("P{} ({}) -> unallocated", p.id, p.size),
        }
    }
    println!(
        "\nSUM: {}/{} placed, internal fragmentation {}",
        report.processes.iter().filter(|p| p.block.is_some()).count(),
        report.processes.len(),
        report.fragmentation
    );

    Ok(())
}
