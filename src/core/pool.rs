//! Reuse pools for field maps and output buffers
//!
//! Both pools are bounded channels used as free lists: releasing into a
//! full pool drops the value, acquiring from an empty pool allocates.

use super::fields::Fields;
use crossbeam_channel::{bounded, Receiver, Sender};
use once_cell::sync::Lazy;
use std::ops::{Deref, DerefMut};

/// Default number of field maps kept per logger
pub const DEFAULT_ENTRY_POOL_CAPACITY: usize = 64;

const BUFFER_POOL_CAPACITY: usize = 64;
const INITIAL_BUFFER_CAPACITY: usize = 256;

/// Buffers that grew past this are not returned to the pool
const MAX_POOLED_BUFFER_CAPACITY: usize = 64 * 1024;

const INITIAL_FIELD_CAPACITY: usize = 6;

static BUFFER_POOL: Lazy<BufferPool> = Lazy::new(|| BufferPool::new(BUFFER_POOL_CAPACITY));

/// Per-logger pool of cleared field maps backing fresh entries
pub(crate) struct EntryPool {
    sender: Sender<Fields>,
    receiver: Receiver<Fields>,
}

impl EntryPool {
    pub(crate) fn new(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity.max(1));
        Self { sender, receiver }
    }

    pub(crate) fn acquire(&self) -> Fields {
        self.receiver
            .try_recv()
            .unwrap_or_else(|_| Fields::with_capacity(INITIAL_FIELD_CAPACITY))
    }

    pub(crate) fn release(&self, mut fields: Fields) {
        fields.clear();
        let _ = self.sender.try_send(fields);
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.receiver.len()
    }
}

/// Process-wide pool of serialization buffers
pub struct BufferPool {
    sender: Sender<Vec<u8>>,
    receiver: Receiver<Vec<u8>>,
}

impl BufferPool {
    fn new(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity);
        Self { sender, receiver }
    }

    /// Take a cleared buffer; it goes back to the pool when dropped
    pub fn acquire(&'static self) -> PooledBuffer {
        let mut buffer = self
            .receiver
            .try_recv()
            .unwrap_or_else(|_| Vec::with_capacity(INITIAL_BUFFER_CAPACITY));
        buffer.clear();
        PooledBuffer { buffer, pool: self }
    }

    fn release(&self, buffer: Vec<u8>) {
        if buffer.capacity() <= MAX_POOLED_BUFFER_CAPACITY {
            let _ = self.sender.try_send(buffer);
        }
    }
}

/// The shared buffer pool
pub fn buffer_pool() -> &'static BufferPool {
    &BUFFER_POOL
}

/// A byte buffer on loan from the [`BufferPool`]
pub struct PooledBuffer {
    buffer: Vec<u8>,
    pool: &'static BufferPool,
}

impl Deref for PooledBuffer {
    type Target = Vec<u8>;

    fn deref(&self) -> &Vec<u8> {
        &self.buffer
    }
}

impl DerefMut for PooledBuffer {
    fn deref_mut(&mut self) -> &mut Vec<u8> {
        &mut self.buffer
    }
}

impl Drop for PooledBuffer {
    fn drop(&mut self) {
        self.pool.release(std::mem::take(&mut self.buffer));
    }
}
