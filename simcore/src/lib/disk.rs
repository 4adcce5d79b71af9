use itertools::Itertools;

use crate::{Cylinder, InputError};

/// Initial sweep direction for the direction-sensitive policies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Toward cylinder 0.
    Down,
    /// Toward cylinder `disk_size - 1`.
    Up,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DiskPolicy {
    /// Serve requests in arrival order.
    Fcfs,
    /// Greedily serve the nearest pending request.
    Sstf,
    /// Sweep to the disk edge, reverse, sweep back.
    Scan(Direction),
    /// Sweep to the edge, wrap to the opposite edge, keep sweeping
    /// the same way.
    CScan(Direction),
    /// SCAN that reverses at the last request instead of the edge.
    Look(Direction),
    /// C-SCAN that wraps to the farthest pending request instead of
    /// the edge.
    CLook(Direction),
}

/// The head's walk. `sequence` lists every cylinder visited in order,
/// including the edge cylinders SCAN and C-SCAN travel through, so
/// summing absolute steps over it (starting from the initial head)
/// reproduces `total_seek` exactly.
#[derive(Clone, Debug, PartialEq)]
pub struct SeekReport {
    pub sequence:   Vec<Cylinder>,
    pub total_seek: usize,
    /// Mean distance per request (not per visited position).
    pub avg_seek:   f64,
}

/// Schedules `requests` from `head` on a disk of `disk_size`
/// cylinders. An empty request list yields an empty walk and zero
/// seek distance.
pub fn seek(
    requests:   &[Cylinder],
    head:       Cylinder,
    disk_size:  usize,
    policy:     DiskPolicy,
) -> Result<SeekReport, InputError> {
    validate(requests, head, disk_size)?;
    if requests.is_empty() {
        return Ok(SeekReport {
            sequence:   vec![],
            total_seek: 0,
            avg_seek:   0.0,
        });
    }

    let edge = disk_size - 1;
    let sequence = match policy {
        DiskPolicy::Fcfs            => requests.to_vec(),
        DiskPolicy::Sstf            => sstf(requests, head),
        DiskPolicy::Scan(dir)       => scan(requests, head, edge, dir),
        DiskPolicy::CScan(dir)      => cscan(requests, head, edge, dir),
        DiskPolicy::Look(dir)       => look(requests, head, dir),
        DiskPolicy::CLook(dir)      => clook(requests, head, dir),
    };

    let total_seek = walk_distance(head, &sequence);
    Ok(SeekReport {
        total_seek,
        avg_seek: total_seek as f64 / requests.len() as f64,
        sequence,
    })
}

fn validate(requests: &[Cylinder], head: Cylinder, disk_size: usize) -> Result<(), InputError> {
    if disk_size == 0 {
        return Err(InputError::ZeroDiskSize);
    }
    if head >= disk_size {
        return Err(InputError::HeadOffDisk { head, disk_size });
    }
    for (index, &cylinder) in requests.iter().enumerate() {
        if cylinder >= disk_size {
            return Err(InputError::RequestOffDisk {
                index,
                cylinder,
                disk_size,
            });
        }
    }
    Ok(())
}

fn walk_distance(head: Cylinder, sequence: &[Cylinder]) -> usize {
    let mut at = head;
    let mut total = 0;
    for &next in sequence {
        total += at.abs_diff(next);
        at = next;
    }
    total
}

fn sstf(requests: &[Cylinder], head: Cylinder) -> Vec<Cylinder> {
    let mut remaining = requests.to_vec();
    let mut sequence = Vec::with_capacity(requests.len());
    let mut at = head;
    while !remaining.is_empty() {
        // Strict < keeps the earliest-submitted request on ties.
        let nearest = remaining
            .iter()
            .enumerate()
            .min_by_key(|(_, &c)| at.abs_diff(c))
            .map(|(i, _)| i)
            .unwrap();
        at = remaining.remove(nearest);
        sequence.push(at);
    }
    sequence
}

/// Splits pending requests around the head: below the head descending,
/// at-or-above the head ascending. Every sweep policy is some stitching
/// of these two runs.
fn split(requests: &[Cylinder], head: Cylinder) -> (Vec<Cylinder>, Vec<Cylinder>) {
    let below: Vec<Cylinder> = requests
        .iter()
        .copied()
        .filter(|&c| c < head)
        .sorted_by(|a, b| b.cmp(a))
        .collect();
    let above: Vec<Cylinder> = requests
        .iter()
        .copied()
        .filter(|&c| c >= head)
        .sorted()
        .collect();
    (below, above)
}

fn scan(requests: &[Cylinder], head: Cylinder, edge: Cylinder, dir: Direction) -> Vec<Cylinder> {
    let (below, above) = split(requests, head);
    let mut sequence = Vec::with_capacity(requests.len() + 1);
    match dir {
        Direction::Up => {
            sequence.extend(&above);
            if !below.is_empty() {
                // Travel through the far edge even with no request on
                // it; the reversal charge is part of SCAN.
                sequence.push(edge);
                sequence.extend(&below);
            }
        }
        Direction::Down => {
            sequence.extend(&below);
            if !above.is_empty() {
                sequence.push(0);
                sequence.extend(&above);
            }
        }
    }
    sequence
}

fn cscan(requests: &[Cylinder], head: Cylinder, edge: Cylinder, dir: Direction) -> Vec<Cylinder> {
    let (below, above) = split(requests, head);
    let mut sequence = Vec::with_capacity(requests.len() + 2);
    match dir {
        Direction::Up => {
            sequence.extend(&above);
            if !below.is_empty() {
                sequence.push(edge);
                sequence.push(0);
                // Continue upward after the wrap, so ascending.
                sequence.extend(below.iter().rev());
            }
        }
        Direction::Down => {
            // Mirror image of the upward sweep.
            sequence.extend(&below);
            if !above.is_empty() {
                sequence.push(0);
                sequence.push(edge);
                sequence.extend(above.iter().rev());
            }
        }
    }
    sequence
}

fn look(requests: &[Cylinder], head: Cylinder, dir: Direction) -> Vec<Cylinder> {
    let (below, above) = split(requests, head);
    let mut sequence = Vec::with_capacity(requests.len());
    match dir {
        Direction::Up => {
            sequence.extend(&above);
            sequence.extend(&below);
        }
        Direction::Down => {
            sequence.extend(&below);
            sequence.extend(&above);
        }
    }
    sequence
}

fn clook(requests: &[Cylinder], head: Cylinder, dir: Direction) -> Vec<Cylinder> {
    let (below, above) = split(requests, head);
    let mut sequence = Vec::with_capacity(requests.len());
    match dir {
        Direction::Up => {
            sequence.extend(&above);
            // Jump to the lowest pending request, then resume upward.
            sequence.extend(below.iter().rev());
        }
        Direction::Down => {
            sequence.extend(&below);
            sequence.extend(above.iter().rev());
        }
    }
    sequence
}
