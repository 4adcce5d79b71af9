use crate::InputError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FitPolicy {
    /// First free block, in block-list order, that fits.
    FirstFit,
    /// Fitting free block with the least leftover; earliest block
    /// wins ties.
    BestFit,
}

/// A fixed-size region of memory. Ids are list positions. An occupied
/// block remembers who sits in it and how much was actually asked for,
/// which is what the fragmentation accounting reads back.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Block {
    pub id:     usize,
    pub size:   usize,
    pub tenant: Option<Tenant>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tenant {
    pub process:    usize,
    pub size:       usize,
}

impl Block {
    pub fn is_free(&self) -> bool {
        self.tenant.is_none()
    }

    /// Unused space inside an occupied block.
    pub fn internal_fragmentation(&self) -> usize {
        self.tenant.map_or(0, |t| self.size - t.size)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Placement {
    pub id:     usize,
    pub size:   usize,
    /// Block the process landed in, if any block could take it.
    pub block:  Option<usize>,
}

/// Full snapshot of every block and every process after one request
/// was considered, placed or not.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AllocationStep {
    pub blocks:     Vec<Block>,
    pub processes:  Vec<Placement>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AllocationReport {
    pub steps:          Vec<AllocationStep>,
    pub blocks:         Vec<Block>,
    pub processes:      Vec<Placement>,
    /// Sum of unused space across all occupied blocks.
    pub fragmentation:  usize,
}

/// Places each request, in request order, into the free block the
/// policy selects. A request no block can take stays unplaced and
/// later requests proceed regardless.
pub fn allocate(
    block_sizes:    &[usize],
    request_sizes:  &[usize],
    policy:         FitPolicy,
) -> Result<AllocationReport, InputError> {
    validate(block_sizes, request_sizes)?;

    let mut blocks: Vec<Block> = block_sizes
        .iter()
        .enumerate()
        .map(|(id, &size)| Block {
            id,
            size,
            tenant: None,
        })
        .collect();
    let mut processes: Vec<Placement> = request_sizes
        .iter()
        .enumerate()
        .map(|(id, &size)| Placement {
            id,
            size,
            block: None,
        })
        .collect();
    let mut steps = Vec::with_capacity(request_sizes.len());

    for p in 0..processes.len() {
        let want = processes[p].size;
        let chosen = match policy {
            FitPolicy::FirstFit => blocks
                .iter()
                .position(|b| b.is_free() && b.size >= want),
            FitPolicy::BestFit => blocks
                .iter()
                .enumerate()
                .filter(|(_, b)| b.is_free() && b.size >= want)
                // Strictly-smaller leftover to move, so the earliest
                // block keeps ties.
                .min_by_key(|(_, b)| b.size - want)
                .map(|(i, _)| i),
        };
        if let Some(b) = chosen {
            blocks[b].tenant = Some(Tenant {
                process:    p,
                size:       want,
            });
            processes[p].block = Some(b);
        }
        steps.push(AllocationStep {
            blocks:     blocks.clone(),
            processes:  processes.clone(),
        });
    }

    let fragmentation = blocks.iter().map(Block::internal_fragmentation).sum();
    Ok(AllocationReport {
        steps,
        blocks,
        processes,
        fragmentation,
    })
}

fn validate(block_sizes: &[usize], request_sizes: &[usize]) -> Result<(), InputError> {
    if let Some(index) = block_sizes.iter().position(|&s| s == 0) {
        return Err(InputError::ZeroBlockSize { index });
    }
    if let Some(index) = request_sizes.iter().position(|&s| s == 0) {
        return Err(InputError::ZeroRequestSize { index });
    }
    Ok(())
}
