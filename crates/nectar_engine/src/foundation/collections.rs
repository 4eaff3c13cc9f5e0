//! Specialized collection types

/// Recycle pool for reusable buffers
///
/// Released objects are handed back out by [`Pool::acquire`] in LIFO order
/// instead of being dropped, so per-frame buffers keep their allocations.
#[derive(Debug)]
pub struct Pool<T> {
    free: Vec<T>,
}

impl<T> Pool<T> {
    /// Create an empty pool
    pub const fn new() -> Self {
        Self { free: Vec::new() }
    }

    /// Take a pooled object, or build a fresh one with `make` when the pool is empty
    pub fn acquire(&mut self, make: impl FnOnce() -> T) -> T {
        self.free.pop().unwrap_or_else(make)
    }

    /// Return an object to the pool for reuse
    pub fn release(&mut self, item: T) {
        self.free.push(item);
    }

    /// Number of objects waiting for reuse
    pub fn len(&self) -> usize {
        self.free.len()
    }

    /// Whether the pool holds no objects
    pub fn is_empty(&self) -> bool {
        self.free.is_empty()
    }
}

impl<T> Default for Pool<T> {
    fn default() -> Self {
        Self::new()
    }
}
