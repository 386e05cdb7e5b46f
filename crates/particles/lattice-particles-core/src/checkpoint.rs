//! Bounded store of simulation checkpoints keyed by frame.

use std::collections::BTreeMap;
use std::ops::Bound::{Excluded, Unbounded};
use std::sync::Arc;

use log::trace;

use crate::particle::Particle;
use crate::physics::SimState;

/// Full simulation state at one frame plus its frozen particle buffer.
#[derive(Clone, Debug)]
pub(crate) struct Checkpoint {
    pub state: SimState,
    /// Shared with every snapshot produced from this checkpoint.
    pub frozen: Arc<[Particle]>,
}

impl Checkpoint {
    pub fn new(state: SimState) -> Self {
        let frozen: Arc<[Particle]> = state.particles.as_slice().into();
        Self { state, frozen }
    }
}

#[derive(Debug, Default)]
pub(crate) struct CheckpointStore {
    entries: BTreeMap<u32, Checkpoint>,
    /// Largest `len()` seen since the last `clear`.
    high_water: usize,
}

impl CheckpointStore {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.high_water = 0;
    }

    pub fn high_water(&self) -> usize {
        self.high_water
    }

    pub fn get(&self, frame: u32) -> Option<&Checkpoint> {
        self.entries.get(&frame)
    }

    /// Checkpoint with the greatest frame `<= frame`.
    pub fn nearest_at_or_before(&self, frame: u32) -> Option<(u32, &Checkpoint)> {
        self.entries
            .range(..=frame)
            .next_back()
            .map(|(f, c)| (*f, c))
    }

    pub fn insert(&mut self, frame: u32, checkpoint: Checkpoint) {
        self.entries.insert(frame, checkpoint);
        self.high_water = self.high_water.max(self.entries.len());
    }

    pub fn frames(&self) -> impl Iterator<Item = u32> + '_ {
        self.entries.keys().copied()
    }

    /// Evict down to `capacity`, farthest from `target` first. Frame 0 and
    /// `target` are never evicted. Ties drop the later frame.
    pub fn evict(&mut self, capacity: usize, target: u32) {
        let capacity = capacity.max(2);
        while self.entries.len() > capacity {
            match self.farthest_from(target) {
                Some(f) => {
                    trace!("evicting particle checkpoint at frame {f}");
                    self.entries.remove(&f);
                }
                None => break,
            }
        }
    }

    /// The farthest evictable frame is always one of the two ends of the map.
    fn farthest_from(&self, target: u32) -> Option<u32> {
        let below = if target > 1 {
            self.entries.range(1..target).next().map(|(f, _)| *f)
        } else {
            None
        };
        let above = self
            .entries
            .range((Excluded(target), Unbounded))
            .next_back()
            .map(|(f, _)| *f);
        match (below, above) {
            (Some(lo), Some(hi)) => {
                if target - lo > hi - target {
                    Some(lo)
                } else {
                    Some(hi)
                }
            }
            (lo, hi) => lo.or(hi),
        }
    }
}
