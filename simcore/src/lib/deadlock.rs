use crate::InputError;

/// Resource claim of a process set, in the matrix form the Banker's
/// algorithm works on. `need` is always derived, never supplied: it
/// is `maximum - allocation` elementwise, and validation rejects any
/// state where that would go negative.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceState {
    pub available:  Vec<u32>,
    pub allocation: Vec<Vec<u32>>,
    pub maximum:    Vec<Vec<u32>>,
}

impl ResourceState {
    pub fn process_count(&self) -> usize {
        self.allocation.len()
    }

    pub fn resource_count(&self) -> usize {
        self.available.len()
    }

    pub fn need(&self) -> Vec<Vec<u32>> {
        self.allocation
            .iter()
            .zip(&self.maximum)
            .map(|(alloc, max)| alloc.iter().zip(max).map(|(a, m)| m - a).collect())
            .collect()
    }

    fn validate(&self) -> Result<(), InputError> {
        let r = self.resource_count();
        if self.maximum.len() != self.allocation.len() {
            return Err(InputError::BadMaximumRow {
                process:    self.maximum.len().min(self.allocation.len()),
                got:        0,
                expected:   r,
            });
        }
        for (i, row) in self.allocation.iter().enumerate() {
            if row.len() != r {
                return Err(InputError::BadAllocationRow {
                    process:    i,
                    got:        row.len(),
                    expected:   r,
                });
            }
        }
        for (i, row) in self.maximum.iter().enumerate() {
            if row.len() != r {
                return Err(InputError::BadMaximumRow {
                    process:    i,
                    got:        row.len(),
                    expected:   r,
                });
            }
        }
        for (i, (alloc, max)) in self.allocation.iter().zip(&self.maximum).enumerate() {
            for (j, (a, m)) in alloc.iter().zip(max).enumerate() {
                if a > m {
                    return Err(InputError::AllocationExceedsMaximum {
                        process:    i,
                        resource:   j,
                    });
                }
            }
        }
        Ok(())
    }
}

/// One admission during the safety scan: which process got in, the
/// work vector right after its allocation was reclaimed, and the safe
/// sequence accumulated so far.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SafetyStep {
    pub process:    usize,
    pub work:       Vec<u32>,
    pub sequence:   Vec<usize>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SafetyReport {
    pub safe:       bool,
    /// Empty when unsafe.
    pub sequence:   Vec<usize>,
    pub steps:      Vec<SafetyStep>,
}

/// Banker's safety check. Sweeps process indices in increasing order,
/// admitting every process whose need fits the current work vector at
/// the moment it is inspected, and repeats until everyone is admitted
/// or a full sweep admits nobody (unsafe). At most P sweeps happen,
/// since a productive sweep admits at least one process.
///
/// The within-sweep admissions matter for the step trace: admitting a
/// process mid-sweep can unlock later indices in the same sweep, and
/// the recorded sequence reflects that.
pub fn check_safety(state: &ResourceState) -> Result<SafetyReport, InputError> {
    state.validate()?;
    let p = state.process_count();
    let need = state.need();
    let mut work = state.available.clone();
    let mut finished = vec![false; p];
    let mut sequence = Vec::with_capacity(p);
    let mut steps = Vec::with_capacity(p);

    while sequence.len() < p {
        let mut admitted_any = false;
        for i in 0..p {
            if finished[i] {
                continue;
            }
            if need[i].iter().zip(&work).any(|(n, w)| n > w) {
                continue;
            }
            for (w, a) in work.iter_mut().zip(&state.allocation[i]) {
                *w += a;
            }
            finished[i] = true;
            sequence.push(i);
            admitted_any = true;
            steps.push(SafetyStep {
                process:    i,
                work:       work.clone(),
                sequence:   sequence.clone(),
            });
        }
        if !admitted_any {
            // Deadlock is possible. The partial trace stays around so
            // the caller can show how far the scan got.
            return Ok(SafetyReport {
                safe:       false,
                sequence:   vec![],
                steps,
            });
        }
    }

    Ok(SafetyReport {
        safe: true,
        sequence,
        steps,
    })
}
