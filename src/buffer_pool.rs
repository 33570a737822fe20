//! Free lists of scratch vectors for the recursive traversal.
//!
//! Each traversal level takes the buffers it needs and gives them back before
//! returning, so after warm-up the recursion performs no heap allocation.

use crate::game_state::{AbstractAction, Action};

/// Typical upper bound on actions per node; buffers are created with this capacity.
const BUFFER_CAPACITY: usize = 6;

#[derive(Debug)]
pub struct FreeList<T> {
    free: Vec<Vec<T>>,
    created: usize,
}

impl<T> Default for FreeList<T> {
    fn default() -> Self {
        FreeList { free: Vec::new(), created: 0 }
    }
}

impl<T> FreeList<T> {
    fn with_buffers(count: usize) -> Self {
        FreeList {
            free: (0..count).map(|_| Vec::with_capacity(BUFFER_CAPACITY)).collect(),
            created: count,
        }
    }

    /// An empty buffer, reused when one is available.
    pub fn take(&mut self) -> Vec<T> {
        match self.free.pop() {
            Some(mut buf) => {
                buf.clear();
                buf
            }
            None => {
                self.created += 1;
                Vec::with_capacity(BUFFER_CAPACITY)
            }
        }
    }

    pub fn give(&mut self, buf: Vec<T>) {
        self.free.push(buf);
    }

    /// Buffers currently parked in the list.
    pub fn available(&self) -> usize {
        self.free.len()
    }

    /// Buffers ever allocated by this list.
    pub fn created(&self) -> usize {
        self.created
    }
}

#[derive(Debug, Default)]
pub struct BufferPool {
    pub actions: FreeList<(AbstractAction, Action)>,
    pub probs: FreeList<f64>,
    pub deltas: FreeList<f64>,
}

impl BufferPool {
    /// A pool with `depth` buffers of each kind ready, enough for a traversal
    /// that nests `depth` decision nodes deep.
    pub fn preallocated(depth: usize) -> Self {
        BufferPool {
            actions: FreeList::with_buffers(depth),
            probs: FreeList::with_buffers(depth),
            deltas: FreeList::with_buffers(depth),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_takes_get_distinct_buffers() {
        let mut pool = BufferPool::preallocated(2);
        let mut outer = pool.probs.take();
        outer.push(0.5);
        {
            let mut inner = pool.probs.take();
            inner.extend([0.3, 0.2]);
            assert_eq!(outer, vec![0.5]);
            pool.probs.give(inner);
        }
        assert_eq!(outer, vec![0.5]);
        pool.probs.give(outer);
        assert_eq!(pool.probs.available(), 2);
    }

    #[test]
    fn reused_buffers_come_back_empty() {
        let mut pool = BufferPool::default();
        let mut buf = pool.deltas.take();
        buf.extend([1.0, 2.0, 3.0]);
        pool.deltas.give(buf);
        let again = pool.deltas.take();
        assert!(again.is_empty());
        assert!(again.capacity() >= 3);
        assert_eq!(pool.deltas.created(), 1);
    }

    #[test]
    fn grows_past_preallocation() {
        let mut pool = BufferPool::preallocated(1);
        let a = pool.actions.take();
        let b = pool.actions.take();
        assert_eq!(pool.actions.created(), 2);
        pool.actions.give(a);
        pool.actions.give(b);
        assert_eq!(pool.actions.available(), 2);
    }
}
