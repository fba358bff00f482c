// src/crawl/frontier.rs
// =============================================================================
// Bookkeeping for the breadth-first traversal.
//
// - AddressDepth: one unit of pending work (an address + its hop distance)
// - Frontier: FIFO queue of pending records, with a lookup index so that
//   "is this address already queued?" is O(1) instead of a linear scan
// - VisitedSet: addresses whose crawl step has concluded
//
// Rust concepts:
// - VecDeque: push_back()/pop_front() give us FIFO order for BFS
// - HashSet: constant-time membership checks for deduplication
// =============================================================================

use std::collections::{HashSet, VecDeque};

/// A pending unit of work: an address and its distance in link-hops from the
/// nearest seed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressDepth {
    pub address: String,
    pub depth: u32,
}

impl AddressDepth {
    /// A seed record, always at depth 0.
    pub fn seed(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            depth: 0,
        }
    }

    /// A record discovered while expanding `self`, one hop further out.
    pub fn child(&self, address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            depth: self.depth.saturating_add(1),
        }
    }
}

/// Addresses that have finished a crawl step, successfully or not.
///
/// Only ever grows during a run.
#[derive(Debug, Default)]
pub struct VisitedSet {
    addresses: HashSet<String>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the address was not already marked.
    pub fn mark(&mut self, address: impl Into<String>) -> bool {
        self.addresses.insert(address.into())
    }

    pub fn contains(&self, address: &str) -> bool {
        self.addresses.contains(address)
    }

    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.addresses.iter().map(String::as_str)
    }
}

/// FIFO queue of records awaiting a crawl step.
///
/// `index` holds every address that is queued *or* currently being stepped.
/// A popped address stays in the index until [`Frontier::release`] is called,
/// which happens when its crawl step concludes and it is marked visited. A
/// page linking to itself therefore cannot re-admit its own address.
#[derive(Debug, Default)]
pub struct Frontier {
    queue: VecDeque<AddressDepth>,
    index: HashSet<String>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `record` at the tail unless its address is already visited,
    /// queued or in flight. Returns whether the record was admitted.
    pub fn offer(&mut self, record: AddressDepth, visited: &VisitedSet) -> bool {
        if visited.contains(&record.address) || self.index.contains(&record.address) {
            return false;
        }

        self.index.insert(record.address.clone());
        self.queue.push_back(record);
        true
    }

    /// Removes the head record. Its address remains reserved until released.
    pub fn pop(&mut self) -> Option<AddressDepth> {
        self.queue.pop_front()
    }

    /// Reserves an address that is about to be crawled without being queued.
    pub fn reserve(&mut self, address: &str) {
        self.index.insert(address.to_string());
    }

    /// Drops the reservation held by a popped address.
    pub fn release(&mut self, address: &str) {
        self.index.remove(address);
    }

    /// Whether `address` is queued or in flight.
    pub fn contains(&self, address: &str) -> bool {
        self.index.contains(address)
    }

    /// Number of queued records (in-flight records are not counted).
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
