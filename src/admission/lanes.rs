//! Fixed-capacity lane pool.
//!
//! Lanes are identified by `0..capacity`. `acquire` always hands out the
//! lowest free lane so admission order is deterministic; `release` is
//! idempotent.

use std::collections::BTreeSet;
use std::fmt;

/// Identifier of one display lane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LaneId(pub usize);

impl LaneId {
    /// Index of this lane within the pool.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for LaneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Tracks which of the N lanes are free.
#[derive(Debug, Clone)]
pub struct LanePool {
    capacity: usize,
    free: BTreeSet<LaneId>,
}

impl LanePool {
    /// Create a pool with every lane in `0..capacity` free.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            free: (0..capacity).map(LaneId).collect(),
        }
    }

    /// Total number of lanes.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of lanes currently free.
    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    /// Number of lanes currently occupied.
    pub fn occupied_count(&self) -> usize {
        self.capacity - self.free.len()
    }

    /// Returns true if the lane exists and is free.
    pub fn is_free(&self, lane: LaneId) -> bool {
        self.free.contains(&lane)
    }

    /// Take the lowest-numbered free lane, or `None` if every lane is occupied.
    pub fn acquire(&mut self) -> Option<LaneId> {
        self.free.pop_first()
    }

    /// Return a lane to the pool. Releasing a free lane is a no-op.
    pub fn release(&mut self, lane: LaneId) {
        if lane.index() >= self.capacity {
            log::warn!("Ignoring release of lane {} outside pool of {}", lane, self.capacity);
            return;
        }
        self.free.insert(lane);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_pool_is_all_free() {
        let pool = LanePool::new(5);
        assert_eq!(pool.capacity(), 5);
        assert_eq!(pool.free_count(), 5);
        assert_eq!(pool.occupied_count(), 0);
        for i in 0..5 {
            assert!(pool.is_free(LaneId(i)));
        }
    }

    #[test]
    fn test_acquire_lowest_first() {
        let mut pool = LanePool::new(3);
        assert_eq!(pool.acquire(), Some(LaneId(0)));
        assert_eq!(pool.acquire(), Some(LaneId(1)));
        assert_eq!(pool.acquire(), Some(LaneId(2)));
        assert_eq!(pool.acquire(), None);
        assert_eq!(pool.occupied_count(), 3);
    }

    #[test]
    fn test_release_makes_lane_reusable() {
        let mut pool = LanePool::new(3);
        pool.acquire();
        pool.acquire();
        pool.acquire();

        pool.release(LaneId(1));
        assert!(pool.is_free(LaneId(1)));
        assert_eq!(pool.acquire(), Some(LaneId(1)));
    }

    #[test]
    fn test_release_prefers_lowest_on_next_acquire() {
        let mut pool = LanePool::new(4);
        for _ in 0..4 {
            pool.acquire();
        }
        pool.release(LaneId(3));
        pool.release(LaneId(0));
        assert_eq!(pool.acquire(), Some(LaneId(0)));
        assert_eq!(pool.acquire(), Some(LaneId(3)));
    }

    #[test]
    fn test_double_release_is_noop() {
        let mut pool = LanePool::new(2);
        let lane = pool.acquire().unwrap();
        pool.release(lane);
        pool.release(lane);
        assert_eq!(pool.free_count(), 2);
        assert_eq!(pool.occupied_count(), 0);

        // Partition still intact: exactly two distinct lanes come back out
        assert_eq!(pool.acquire(), Some(LaneId(0)));
        assert_eq!(pool.acquire(), Some(LaneId(1)));
        assert_eq!(pool.acquire(), None);
    }

    #[test]
    fn test_release_of_never_acquired_lane_is_noop() {
        let mut pool = LanePool::new(2);
        pool.release(LaneId(1));
        assert_eq!(pool.free_count(), 2);
    }

    #[test]
    fn test_release_out_of_range_ignored() {
        let mut pool = LanePool::new(2);
        pool.release(LaneId(7));
        assert_eq!(pool.free_count(), 2);
        assert!(!pool.is_free(LaneId(7)));
    }

    #[test]
    fn test_zero_capacity_pool() {
        let mut pool = LanePool::new(0);
        assert_eq!(pool.acquire(), None);
        assert_eq!(pool.occupied_count(), 0);
    }

    #[test]
    fn test_lane_id_display() {
        assert_eq!(LaneId(3).to_string(), "3");
        assert_eq!(LaneId(3).index(), 3);
    }
}
