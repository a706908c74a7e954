//! Node Chain Module
//!
//! Arena-backed doubly-linked chain of items. Nodes live in a `Vec` and link
//! to their neighbours by slot index; freed slots are recycled through a free
//! list. The chain is not synchronized, `BoundedList` wraps it in a mutex.

// == Node ==
/// One item plus the indices of its neighbours.
#[derive(Debug)]
struct Node<T> {
    item: T,
    prev: Option<usize>,
    next: Option<usize>,
}

// == Chain ==
/// Unbounded doubly-linked sequence with O(1) insertion and removal at
/// either end and O(1) unlinking of any node by slot index.
#[derive(Debug)]
pub(crate) struct Chain<T> {
    /// Node arena, `None` for vacant slots
    slots: Vec<Option<Node<T>>>,
    /// Vacant slot indices available for reuse
    free: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    len: usize,
}

impl<T> Chain<T> {
    // == Constructor ==
    pub(crate) fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            head: None,
            tail: None,
            len: 0,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn front(&self) -> Option<usize> {
        self.head
    }

    pub(crate) fn back(&self) -> Option<usize> {
        self.tail
    }

    /// Returns the slot following `idx` toward the back.
    pub(crate) fn next(&self, idx: usize) -> Option<usize> {
        self.node(idx).and_then(|node| node.next)
    }

    /// Returns the slot preceding `idx` toward the front.
    pub(crate) fn prev(&self, idx: usize) -> Option<usize> {
        self.node(idx).and_then(|node| node.prev)
    }

    /// Borrows the item stored in an occupied slot.
    pub(crate) fn get(&self, idx: usize) -> Option<&T> {
        self.node(idx).map(|node| &node.item)
    }

    // == Push Front ==
    pub(crate) fn push_front(&mut self, item: T) {
        let idx = self.alloc(Node {
            item,
            prev: None,
            next: self.head,
        });

        match self.head {
            Some(old_head) => self.link_mut(old_head).prev = Some(idx),
            None => self.tail = Some(idx),
        }
        self.head = Some(idx);
        self.len += 1;
    }

    // == Push Back ==
    pub(crate) fn push_back(&mut self, item: T) {
        let idx = self.alloc(Node {
            item,
            prev: self.tail,
            next: None,
        });

        match self.tail {
            Some(old_tail) => self.link_mut(old_tail).next = Some(idx),
            None => self.head = Some(idx),
        }
        self.tail = Some(idx);
        self.len += 1;
    }

    pub(crate) fn pop_front(&mut self) -> Option<T> {
        self.head.and_then(|idx| self.unlink(idx))
    }

    pub(crate) fn pop_back(&mut self) -> Option<T> {
        self.tail.and_then(|idx| self.unlink(idx))
    }

    // == Unlink ==
    /// Detaches the node in slot `idx` and hands its item back.
    ///
    /// Returns `None` if the slot is vacant.
    pub(crate) fn unlink(&mut self, idx: usize) -> Option<T> {
        let node = self.slots.get_mut(idx)?.take()?;

        match node.prev {
            Some(prev) => self.link_mut(prev).next = node.next,
            None => self.head = node.next,
        }
        match node.next {
            Some(next) => self.link_mut(next).prev = node.prev,
            None => self.tail = node.prev,
        }

        self.free.push(idx);
        self.len -= 1;
        Some(node.item)
    }

    /// Drops every node and releases the arena.
    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.head = None;
        self.tail = None;
        self.len = 0;
    }

    // == Internal Helpers ==
    fn alloc(&mut self, node: Node<T>) -> usize {
        match self.free.pop() {
            Some(idx) => {
                self.slots[idx] = Some(node);
                idx
            }
            None => {
                self.slots.push(Some(node));
                self.slots.len() - 1
            }
        }
    }

    fn node(&self, idx: usize) -> Option<&Node<T>> {
        self.slots.get(idx).and_then(Option::as_ref)
    }

    /// Neighbour indices always point at occupied slots.
    fn link_mut(&mut self, idx: usize) -> &mut Node<T> {
        match self.slots[idx].as_mut() {
            Some(node) => node,
            None => unreachable!("chain link points at vacant slot {idx}"),
        }
    }
}
