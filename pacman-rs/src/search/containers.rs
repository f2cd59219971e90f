//! Frontier containers for graph search.

use std::{
    cmp::Ordering,
    collections::{BinaryHeap, VecDeque},
};

use decorum::N64;

/// Something a graph search can keep its open nodes in.
///
/// `priority` is only honored by priority ordered frontiers, lower comes out first.
pub trait Frontier<T> {
    fn push(&mut self, item: T, priority: f64);

    fn pop(&mut self) -> Option<T>;

    fn is_empty(&self) -> bool;

    fn len(&self) -> usize;
}

/// Last in, first out
#[derive(Debug, Clone)]
pub struct Stack<T> {
    items: Vec<T>,
}

impl<T> Default for Stack<T> {
    fn default() -> Self {
        Self { items: vec![] }
    }
}

impl<T> Frontier<T> for Stack<T> {
    fn push(&mut self, item: T, _priority: f64) {
        self.items.push(item);
    }

    fn pop(&mut self) -> Option<T> {
        self.items.pop()
    }

    fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn len(&self) -> usize {
        self.items.len()
    }
}

/// First in, first out
#[derive(Debug, Clone)]
pub struct Queue<T> {
    items: VecDeque<T>,
}

impl<T> Default for Queue<T> {
    fn default() -> Self {
        Self {
            items: VecDeque::new(),
        }
    }
}

impl<T> Frontier<T> for Queue<T> {
    fn push(&mut self, item: T, _priority: f64) {
        self.items.push_back(item);
    }

    fn pop(&mut self) -> Option<T> {
        self.items.pop_front()
    }

    fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn len(&self) -> usize {
        self.items.len()
    }
}

#[derive(Debug, Clone)]
struct Entry<T> {
    priority: N64,
    sequence: u64,
    item: T,
}

// The priority queue depends on `Ord`.
// Flip the ordering on priority so the heap pops the smallest first, and on sequence so
// equal priorities come out in the order they went in.
impl<T> Ord for Entry<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// Sequence numbers are unique, so this agrees with `Ord`
impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.sequence == other.sequence
    }
}

impl<T> Eq for Entry<T> {}

/// Lowest priority first, ties broken first in first out
#[derive(Debug, Clone)]
pub struct PriorityQueue<T> {
    heap: BinaryHeap<Entry<T>>,
    next_sequence: u64,
}

impl<T> Default for PriorityQueue<T> {
    fn default() -> Self {
        Self {
            heap: BinaryHeap::new(),
            next_sequence: 0,
        }
    }
}

impl<T> Frontier<T> for PriorityQueue<T> {
    fn push(&mut self, item: T, priority: f64) {
        self.heap.push(Entry {
            priority: N64::from(priority),
            sequence: self.next_sequence,
            item,
        });
        self.next_sequence += 1;
    }

    fn pop(&mut self) -> Option<T> {
        self.heap.pop().map(|entry| entry.item)
    }

    fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    fn len(&self) -> usize {
        self.heap.len()
    }
}
