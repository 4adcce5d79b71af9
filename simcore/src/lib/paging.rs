use std::hash::BuildHasherDefault;

use ahash::AHasher;
use indexmap::IndexMap;

use crate::InputError;

/// Last-reference bookkeeping for LRU, keyed by page number.
type RecencyMap = IndexMap<u32, usize, BuildHasherDefault<AHasher>>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PagePolicy {
    /// Evict the page resident longest, via a circular insertion
    /// pointer over the frames.
    Fifo,
    /// Evict the page with the oldest last reference.
    Lru,
    /// Evict the page whose next reference lies farthest ahead;
    /// pages never referenced again always win the eviction.
    Optimal,
}

/// Snapshot of the frame table right after one reference was served.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameSnapshot {
    pub frames: Vec<Option<u32>>,
    /// The page just referenced.
    pub page:   u32,
    /// Position within the reference string.
    pub step:   usize,
    pub fault:  bool,
    /// Index of the frame filled or evicted on a fault. `None` on hits.
    pub loaded: Option<usize>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PagingResult {
    pub history:    Vec<FrameSnapshot>,
    pub faults:     usize,
}

/// Replays `refs` against a frame table of `frames` slots under the
/// chosen policy, returning one snapshot per reference and the total
/// fault count. A resident reference is a hit and mutates nothing,
/// apart from LRU's recency bookkeeping.
pub fn replace(refs: &[u32], frames: usize, policy: PagePolicy) -> Result<PagingResult, InputError> {
    if frames == 0 {
        return Err(InputError::ZeroFrames);
    }

    let mut table: Vec<Option<u32>> = vec![None; frames];
    let mut history = Vec::with_capacity(refs.len());
    let mut faults = 0;
    // FIFO's circular insertion pointer.
    let mut oldest = 0;
    let mut recency = RecencyMap::default();

    for (step, &page) in refs.iter().enumerate() {
        let resident = table.iter().position(|slot| *slot == Some(page));
        let mut loaded = None;
        if resident.is_none() {
            faults += 1;
            let target = match table.iter().position(Option::is_none) {
                Some(empty) => empty,
                None => match policy {
                    PagePolicy::Fifo => {
                        let victim = oldest;
                        oldest = (oldest + 1) % frames;
                        victim
                    }
                    PagePolicy::Lru => lru_victim(&table, &recency),
                    PagePolicy::Optimal => optimal_victim(&table, refs, step),
                },
            };
            table[target] = Some(page);
            loaded = Some(target);
        }
        if let PagePolicy::Lru = policy {
            recency.insert(page, step);
        }
        history.push(FrameSnapshot {
            frames: table.clone(),
            page,
            step,
            fault: resident.is_none(),
            loaded,
        });
    }

    Ok(PagingResult { history, faults })
}

fn lru_victim(table: &[Option<u32>], recency: &RecencyMap) -> usize {
    let mut victim = 0;
    let mut min_stamp = usize::MAX;
    for (slot, page) in table.iter().enumerate() {
        // Full table, so every slot holds a page, and every resident
        // page has been stamped at least once.
        let stamp = recency[&page.unwrap()];
        if stamp < min_stamp {
            min_stamp = stamp;
            victim = slot;
        }
    }
    victim
}

fn optimal_victim(table: &[Option<u32>], refs: &[u32], step: usize) -> usize {
    let mut victim = 0;
    let mut farthest = step;
    for (slot, page) in table.iter().enumerate() {
        let next_use = refs[step + 1..]
            .iter()
            .position(|r| Some(*r) == *page)
            .map_or(refs.len(), |d| step + 1 + d);
        if next_use > farthest {
            farthest = next_use;
            victim = slot;
        }
    }
    victim
}
