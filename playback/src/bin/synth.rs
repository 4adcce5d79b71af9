use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use playback::{
    CpuPolicyTag, DirectionTag, DiskPolicyTag, FitPolicyTag, PagePolicyTag, ProcessEntry,
    Workload,
};

/// Generates a random workload file for any policy family. Seeded,
/// so the same invocation always produces the same workload
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[arg(value_enum)]
    family: FamilyArg,

    /// Number of processes/references/requests to generate
    #[arg(short, long, default_value_t = 8)]
    count: usize,

    /// RNG seed
    #[arg(short, long, default_value_t = 0)]
    seed: u64,

    /// Where to write the workload; stdout when omitted
    #[arg(short, long, value_parser = clap::value_parser!(PathBuf))]
    output: Option<PathBuf>,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug)]
enum FamilyArg {
    Cpu,
    Safety,
    Paging,
    Disk,
    Memory,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut rng = StdRng::seed_from_u64(args.seed);
    let n = args.count.max(1);

    let workload = match args.family {
        FamilyArg::Cpu => Workload::Cpu {
            policy:     CpuPolicyTag::RoundRobin,
            quantum:    Some(rng.gen_range(1..=4)),
            processes:  (0..n)
                .map(|i| ProcessEntry {
                    id:         format!("P{}", i + 1),
                    arrival:    rng.gen_range(0..n * 2),
                    burst:      rng.gen_range(1..=10),
                    priority:   rng.gen_range(0..5),
                })
                .collect(),
        },
        FamilyArg::Safety => {
            let resources = 3;
            // Build maximum on top of allocation so need never goes
            // negative.
            let allocation: Vec<Vec<u32>> = (0..n)
                .map(|_| (0..resources).map(|_| rng.gen_range(0..3)).collect())
                .collect();
            let maximum = allocation
                .iter()
                .map(|row| row.iter().map(|a| a + rng.gen_range(0..5)).collect())
                .collect();
            Workload::Safety {
                available: (0..resources).map(|_| rng.gen_range(0..6)).collect(),
                allocation,
                maximum,
            }
        }
        FamilyArg::Paging => Workload::Paging {
            policy: PagePolicyTag::Lru,
            frames: rng.gen_range(2..=4),
            refs:   (0..n).map(|_| rng.gen_range(0..8)).collect(),
        },
        FamilyArg::Disk => {
            let disk_size = 200;
            Workload::Disk {
                policy:     DiskPolicyTag::Scan,
                direction:  DirectionTag::Up,
                head:       rng.gen_range(0..disk_size),
                disk_size,
                requests:   (0..n).map(|_| rng.gen_range(0..disk_size)).collect(),
            }
        }
        FamilyArg::Memory => Workload::Memory {
            policy:     FitPolicyTag::BestFit,
            blocks:     (0..n).map(|_| rng.gen_range(50..=600)).collect(),
            requests:   (0..n).map(|_| rng.gen_range(50..=500)).collect(),
        },
    };

    match args.output {
        Some(path) => {
            let fd = File::create(&path)
                .with_context(|| format!("cannot create {}", path.display()))?;
            serde_json::to_writer_pretty(BufWriter::new(fd), &workload)?;
        }
        None => println!("{}", serde_json::to_string_pretty(&workload)?),
    }

    Ok(())
}
