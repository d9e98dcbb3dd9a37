//! Reusable buffers for query results.
//!
//! Buffers handed out by [`QueryResultPool::acquire`] should come back through
//! [`QueryResultPool::release`]. Forgetting to release one only costs a fresh
//! allocation later.

use crate::constants::DEFAULT_POOL_RETENTION;

/// Reuse counters for a [`QueryResultPool`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Acquisitions served from a released buffer.
    pub reused: u64,
    /// Acquisitions that allocated a new buffer.
    pub allocated: u64,
    /// Buffers returned and retained.
    pub released: u64,
    /// Buffers returned while the pool was full and dropped.
    pub discarded: u64,
}

/// Single-threaded pool of `Vec<T>` buffers.
#[derive(Debug)]
pub struct QueryResultPool<T> {
    free: Vec<Vec<T>>,
    retention: usize,
    stats: PoolStats,
}

impl<T> Default for QueryResultPool<T> {
    fn default() -> Self {
        Self::new(DEFAULT_POOL_RETENTION)
    }
}

impl<T> QueryResultPool<T> {
    /// Creates a pool that keeps at most `retention` idle buffers.
    #[must_use]
    pub const fn new(retention: usize) -> Self {
        Self {
            free: Vec::new(),
            retention,
            stats: PoolStats {
                reused: 0,
                allocated: 0,
                released: 0,
                discarded: 0,
            },
        }
    }

    /// Hands out an empty buffer, reusing a released one when possible.
    ///
    /// # Examples
    /// ```
    /// use warden::QueryResultPool;
    /// let mut pool: QueryResultPool<u32> = QueryResultPool::default();
    /// let mut buffer = pool.acquire();
    /// buffer.extend([1, 2, 3]);
    /// pool.release(buffer);
    /// let again = pool.acquire();
    /// assert!(again.is_empty());
    /// assert!(again.capacity() >= 3);
    /// assert_eq!(pool.stats().reused, 1);
    /// ```
    pub fn acquire(&mut self) -> Vec<T> {
        if let Some(buffer) = self.free.pop() {
            self.stats.reused += 1;
            buffer
        } else {
            self.stats.allocated += 1;
            Vec::new()
        }
    }

    /// Clears `buffer` and keeps it for the next [`QueryResultPool::acquire`].
    pub fn release(&mut self, mut buffer: Vec<T>) {
        if self.free.len() >= self.retention {
            self.stats.discarded += 1;
            return;
        }
        buffer.clear();
        self.free.push(buffer);
        self.stats.released += 1;
    }

    /// Number of buffers waiting to be reused.
    #[must_use]
    pub fn idle(&self) -> usize {
        self.free.len()
    }

    /// Reuse counters.
    #[must_use]
    pub const fn stats(&self) -> PoolStats {
        self.stats
    }
}
