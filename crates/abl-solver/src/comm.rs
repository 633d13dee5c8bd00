//! Collective reductions across mesh partitions.
//!
//! Every partition runs the same sequence of collectives. Sums are always
//! formed in rank order, so every partition gets a bit-identical result.

use std::sync::{Arc, Barrier, Mutex, MutexGuard};

use abl_core::{Real, Vec3};

pub trait Communicator: Send + Sync {
    fn rank(&self) -> usize;

    fn size(&self) -> usize;

    /// Element-wise sum of `values` over all partitions, written back in place.
    ///
    /// Blocks until every partition has called it with a slice of the same length.
    fn sum_in_place(&self, values: &mut [Real]);

    fn sum(&self, value: Real) -> Real {
        let mut buf = [value];
        self.sum_in_place(&mut buf);
        buf[0]
    }

    fn sum_vec3(&self, value: Vec3) -> Vec3 {
        let mut buf = [value.x, value.y, value.z];
        self.sum_in_place(&mut buf);
        Vec3::from(buf)
    }

    /// True on every partition if it is true on any.
    fn any(&self, value: bool) -> bool {
        self.sum(if value { 1.0 } else { 0.0 }) > 0.0
    }

    fn is_master(&self) -> bool {
        self.rank() == 0
    }
}

/// Single partition.
#[derive(Debug, Clone, Copy, Default)]
pub struct SerialComm;

impl Communicator for SerialComm {
    fn rank(&self) -> usize {
        0
    }

    fn size(&self) -> usize {
        1
    }

    fn sum_in_place(&self, _values: &mut [Real]) {}
}

#[derive(Debug)]
struct Shared {
    slots: Mutex<Vec<Vec<Real>>>,
    barrier: Barrier,
}

impl Shared {
    fn slots(&self) -> MutexGuard<'_, Vec<Vec<Real>>> {
        // A panicking partition already fails the run; keep the data usable.
        self.slots.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// In-process partitions, one OS thread each.
#[derive(Debug, Clone)]
pub struct ThreadComm {
    rank: usize,
    size: usize,
    shared: Arc<Shared>,
}

impl ThreadComm {
    /// One communicator per rank, all connected to each other.
    pub fn group(size: usize) -> Vec<ThreadComm> {
        let size = size.max(1);
        let shared = Arc::new(Shared {
            slots: Mutex::new(vec![Vec::new(); size]),
            barrier: Barrier::new(size),
        });
        (0..size)
            .map(|rank| ThreadComm {
                rank,
                size,
                shared: Arc::clone(&shared),
            })
            .collect()
    }
}

impl Communicator for ThreadComm {
    fn rank(&self) -> usize {
        self.rank
    }

    fn size(&self) -> usize {
        self.size
    }

    fn sum_in_place(&self, values: &mut [Real]) {
        self.shared.slots()[self.rank] = values.to_vec();
        self.shared.barrier.wait();
        {
            let slots = self.shared.slots();
            for (i, v) in values.iter_mut().enumerate() {
                *v = slots.iter().map(|s| s.get(i).copied().unwrap_or(0.0)).sum();
            }
        }
        // Nobody may overwrite a slot before every rank has read it.
        self.shared.barrier.wait();
    }
}

/// Run `f` once per partition on its own thread and collect the results in
/// rank order.
///
/// Collectives block until every rank arrives, so each partition must reach
/// every collective the same number of times. A partition that panics or
/// returns early while the others wait in a reduction deadlocks the group and
/// this call never returns. Report local errors only after the collectives
/// that depend on them, or decide them from data every partition shares.
pub fn run_partitioned<R, F>(n_parts: usize, f: F) -> Vec<R>
where
    R: Send,
    F: Fn(&ThreadComm) -> R + Sync,
{
    let comms = ThreadComm::group(n_parts);
    std::thread::scope(|scope| {
        let handles: Vec<_> = comms
            .iter()
            .map(|comm| {
                let f = &f;
                scope.spawn(move || f(comm))
            })
            .collect();
        handles
            .into_iter()
            .map(|h| match h.join() {
                Ok(r) => r,
                Err(payload) => std::panic::resume_unwind(payload),
            })
            .collect()
    })
}
