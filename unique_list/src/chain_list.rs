//! [ChainList] is a duplicate-free list that threads its elements onto a
//! doubly-linked chain of position nodes instead of shifting a dense array.
use crate::{
    util::{check_range, impl_iterator},
    Error,
};
use core::hash::Hash;
use hashbrown::hash_table::{Entry, HashTable};
use std::{
    borrow::Borrow,
    hash::{BuildHasher, BuildHasherDefault},
};
use zwohash::ZwoHasher;

const NIL: usize = usize::MAX;

/// One chain node. `prev`/`next` are arena ids, `NIL`-terminated at the ends
/// of the chain.
#[derive(Debug, Clone)]
struct Node<T> {
    item: T,
    position: usize,
    prev: usize,
    next: usize,
}

/// A list that rejects duplicate elements, backed by a linked position chain.
///
/// `ChainList<T>` stores one chain node per element in a dense arena and keeps
/// two hash indices over the arena ids: one keyed by the element's hash and
/// one keyed by the position's hash. Lookup in either direction is a single
/// probe; structural mutation renumbers the chain tail by walking `next`
/// links instead of moving elements, re-keying each visited node's position
/// entry.
///
/// The arena is kept gap-free: freeing a node moves the last arena slot into
/// the gap and patches that node's two index entries and neighbor links.
///
/// Same contract as [HashList](crate::HashList), different trade-off:
/// insert/remove-heavy workloads renumber a chain rather than shifting array
/// memory, contiguous scans lose the dense layout.
#[derive(Clone)]
pub struct ChainList<T> {
    nodes: Vec<Node<T>>,
    item_index: HashTable<usize>,
    position_index: HashTable<usize>,
    head: usize,
    tail: usize,
    build_hasher: BuildHasherDefault<ZwoHasher>,
}

impl<T: std::fmt::Debug> std::fmt::Debug for ChainList<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self).finish()
    }
}

impl<T> Default for ChainList<T> {
    fn default() -> Self {
        ChainList {
            nodes: Vec::new(),
            item_index: HashTable::new(),
            position_index: HashTable::new(),
            head: NIL,
            tail: NIL,
            build_hasher: BuildHasherDefault::default(),
        }
    }
}

impl<T> ChainList<T> {
    /// Returns an empty list.
    pub fn new() -> Self {
        Self::default()
    }
    /// Returns an empty list with the specified capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        ChainList {
            nodes: Vec::with_capacity(capacity),
            item_index: HashTable::with_capacity(capacity),
            position_index: HashTable::with_capacity(capacity),
            head: NIL,
            tail: NIL,
            build_hasher: BuildHasherDefault::default(),
        }
    }
    /// Removes all items, but keeps the allocated memory.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.item_index.clear();
        self.position_index.clear();
        self.head = NIL;
        self.tail = NIL;
    }
    /// Returns the number of items in the list.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }
    /// Returns `true` if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
    /// Returns the first item in the list, if it exists.
    pub fn first(&self) -> Option<&T> {
        self.nodes.get(self.head).map(|node| &node.item)
    }
    /// Returns the last item in the list, if it exists.
    pub fn last(&self) -> Option<&T> {
        self.nodes.get(self.tail).map(|node| &node.item)
    }
    /// Converts the list into a `Vec` in position order. The chain and both
    /// hash indices are dropped.
    pub fn into_vec(self) -> Vec<T> {
        let mut nodes = self.nodes;
        nodes.sort_unstable_by_key(|node| node.position);
        nodes.into_iter().map(|node| node.item).collect()
    }
    fn node_id(&self, position: usize) -> Option<usize> {
        let hash = self.build_hasher.hash_one(position);
        self.position_index
            .find(hash, |&id| self.nodes[id].position == position)
            .copied()
    }
    /// Returns the item at the given position, if it exists.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.node_id(index).map(|id| &self.nodes[id].item)
    }
    /// Renumbers the chain from the node `id` to the tail, re-keying every
    /// visited node's position entry.
    fn renumber(&mut self, mut id: usize, shift: impl Fn(usize) -> usize) {
        while id != NIL {
            let old = self.nodes[id].position;
            let new = shift(old);
            let old_hash = self.build_hasher.hash_one(old);
            self.position_index
                .find_entry(old_hash, |&i| i == id)
                .unwrap()
                .remove();
            self.nodes[id].position = new;
            let new_hash = self.build_hasher.hash_one(new);
            self.position_index.insert_unique(new_hash, id, |&i| {
                self.build_hasher.hash_one(self.nodes[i].position)
            });
            id = self.nodes[id].next;
        }
    }
}

impl<T: Hash> ChainList<T> {
    /// Moves the last arena slot into the gap left by the unlinked node `id`
    /// and returns that node's item. The moved node's index entries and
    /// neighbor links are patched to its new id.
    fn free_node(&mut self, id: usize) -> T {
        let last = self.nodes.len() - 1;
        if id != last {
            let item_hash = self.build_hasher.hash_one(&self.nodes[last].item);
            *self.item_index.find_mut(item_hash, |&i| i == last).unwrap() = id;
            let pos_hash = self.build_hasher.hash_one(self.nodes[last].position);
            *self
                .position_index
                .find_mut(pos_hash, |&i| i == last)
                .unwrap() = id;
            let prev = self.nodes[last].prev;
            let next = self.nodes[last].next;
            if prev != NIL {
                self.nodes[prev].next = id;
            } else {
                self.head = id;
            }
            if next != NIL {
                self.nodes[next].prev = id;
            } else {
                self.tail = id;
            }
        }
        self.nodes.swap_remove(id).item
    }
    /// Removes the node `id` from the chain and both indices, renumbers the
    /// tail and frees the arena slot.
    fn detach(&mut self, id: usize) -> T {
        let position = self.nodes[id].position;
        let prev = self.nodes[id].prev;
        let next = self.nodes[id].next;
        let item_hash = self.build_hasher.hash_one(&self.nodes[id].item);
        self.item_index
            .find_entry(item_hash, |&i| i == id)
            .unwrap()
            .remove();
        let pos_hash = self.build_hasher.hash_one(position);
        self.position_index
            .find_entry(pos_hash, |&i| i == id)
            .unwrap()
            .remove();
        if prev != NIL {
            self.nodes[prev].next = next;
        } else {
            self.head = next;
        }
        if next != NIL {
            self.nodes[next].prev = prev;
        } else {
            self.tail = prev;
        }
        if next != NIL {
            self.renumber(next, |position| position - 1);
        }
        self.free_node(id)
    }
}

impl<T: Hash + Eq> ChainList<T> {
    /// Returns the position of the item equivalent to `value`, if it exists.
    pub fn index_of<Q>(&self, value: &Q) -> Option<usize>
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let hash = self.build_hasher.hash_one(value);
        self.item_index
            .find(hash, |&id| self.nodes[id].item.borrow() == value)
            .map(|&id| self.nodes[id].position)
    }
    /// Returns `true` if the list contains an item equivalent to `value`.
    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index_of(value).is_some()
    }
    /// Appends `item` to the end of the list and returns its position.
    ///
    /// Fails with [Error::Duplicate] if an equal item is already present,
    /// returning `item` inside the error.
    pub fn push(&mut self, item: T) -> Result<usize, Error<T>> {
        let index = self.nodes.len();
        self.insert(index, item)?;
        Ok(index)
    }
    /// Inserts `item` at position `index`, renumbering every node at
    /// `>= index` one position towards the end.
    ///
    /// `index` may be anywhere in `0..=len`. Fails with [Error::OutOfBounds]
    /// or [Error::Duplicate] without modifying the list.
    pub fn insert(&mut self, index: usize, item: T) -> Result<(), Error<T>> {
        if index > self.nodes.len() {
            return Err(Error::OutOfBounds {
                index,
                len: self.nodes.len(),
            });
        }
        let item_hash = self.build_hasher.hash_one(&item);
        if let Some(&existing) = self
            .item_index
            .find(item_hash, |&id| self.nodes[id].item == item)
        {
            return Err(Error::Duplicate {
                item,
                existing: self.nodes[existing].position,
            });
        }
        let next = if index == self.nodes.len() {
            NIL
        } else {
            self.node_id(index).unwrap()
        };
        let prev = if next != NIL {
            self.nodes[next].prev
        } else {
            self.tail
        };
        if next != NIL {
            self.renumber(next, |position| position + 1);
        }
        let id = self.nodes.len();
        self.nodes.push(Node {
            item,
            position: index,
            prev,
            next,
        });
        if prev != NIL {
            self.nodes[prev].next = id;
        } else {
            self.head = id;
        }
        if next != NIL {
            self.nodes[next].prev = id;
        } else {
            self.tail = id;
        }
        self.item_index.insert_unique(item_hash, id, |&i| {
            self.build_hasher.hash_one(&self.nodes[i].item)
        });
        let pos_hash = self.build_hasher.hash_one(index);
        self.position_index.insert_unique(pos_hash, id, |&i| {
            self.build_hasher.hash_one(self.nodes[i].position)
        });
        Ok(())
    }
    /// Inserts every item of `items` contiguously starting at `index`,
    /// preserving their order.
    ///
    /// The whole batch is validated against the bounds, the current members
    /// and itself before the chain is touched: on any `Err` the list is
    /// exactly as it was, with the offending item inside the error. The tail
    /// is renumbered once, by the batch size.
    pub fn insert_range<I>(&mut self, index: usize, items: I) -> Result<(), Error<T>>
    where
        I: IntoIterator<Item = T>,
    {
        if index > self.nodes.len() {
            return Err(Error::OutOfBounds {
                index,
                len: self.nodes.len(),
            });
        }
        let mut batch: Vec<T> = items.into_iter().collect();
        if batch.is_empty() {
            return Ok(());
        }
        let mut hashes: Vec<u64> = Vec::with_capacity(batch.len());
        let mut seen: HashTable<usize> = HashTable::with_capacity(batch.len());
        for offset in 0..batch.len() {
            let hash = self.build_hasher.hash_one(&batch[offset]);
            if let Some(&existing) = self
                .item_index
                .find(hash, |&id| self.nodes[id].item == batch[offset])
            {
                return Err(Error::Duplicate {
                    item: batch.swap_remove(offset),
                    existing: self.nodes[existing].position,
                });
            }
            match seen.entry(hash, |&other| batch[other] == batch[offset], |&other| {
                hashes[other]
            }) {
                Entry::Occupied(_) => {
                    return Err(Error::DuplicateInBatch {
                        item: batch.swap_remove(offset),
                    });
                }
                Entry::Vacant(entry) => {
                    entry.insert(offset);
                }
            }
            hashes.push(hash);
        }
        let count = batch.len();
        let next = if index == self.nodes.len() {
            NIL
        } else {
            self.node_id(index).unwrap()
        };
        let mut prev = if next != NIL {
            self.nodes[next].prev
        } else {
            self.tail
        };
        if next != NIL {
            self.renumber(next, |position| position + count);
        }
        for (offset, (item, &hash)) in batch.into_iter().zip(&hashes).enumerate() {
            let id = self.nodes.len();
            self.nodes.push(Node {
                item,
                position: index + offset,
                prev,
                next,
            });
            if prev != NIL {
                self.nodes[prev].next = id;
            } else {
                self.head = id;
            }
            self.item_index.insert_unique(hash, id, |&i| {
                self.build_hasher.hash_one(&self.nodes[i].item)
            });
            let pos_hash = self.build_hasher.hash_one(index + offset);
            self.position_index.insert_unique(pos_hash, id, |&i| {
                self.build_hasher.hash_one(self.nodes[i].position)
            });
            prev = id;
        }
        if next != NIL {
            self.nodes[next].prev = prev;
        } else {
            self.tail = prev;
        }
        Ok(())
    }
    /// Appends every item of `items` to the end of the list.
    ///
    /// All-or-nothing like [insert_range](ChainList::insert_range).
    pub fn push_range<I>(&mut self, items: I) -> Result<(), Error<T>>
    where
        I: IntoIterator<Item = T>,
    {
        self.insert_range(self.nodes.len(), items)
    }
    /// Removes the item equivalent to `value` and returns it, if it exists.
    ///
    /// All items after it move one position towards the front. Absence is
    /// not an error.
    pub fn remove<Q>(&mut self, value: &Q) -> Option<T>
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let hash = self.build_hasher.hash_one(value);
        let id = self
            .item_index
            .find(hash, |&i| self.nodes[i].item.borrow() == value)
            .copied()?;
        Some(self.detach(id))
    }
    /// Removes the item at position `index` and returns it.
    ///
    /// All items after it move one position towards the front.
    pub fn remove_at(&mut self, index: usize) -> Result<T, Error<T>> {
        let Some(id) = self.node_id(index) else {
            return Err(Error::OutOfBounds {
                index,
                len: self.nodes.len(),
            });
        };
        Ok(self.detach(id))
    }
    /// Removes the `count` items starting at position `start`, moving the
    /// tail towards the front.
    ///
    /// The window is validated before anything is unlinked, the tail is
    /// renumbered once by `count`, and the freed arena slots are released in
    /// descending id order so the pending ids stay valid.
    pub fn remove_range(&mut self, start: usize, count: usize) -> Result<(), Error<T>> {
        check_range(start, count, self.nodes.len())?;
        if count == 0 {
            return Ok(());
        }
        let first = self.node_id(start).unwrap();
        let mut removed = Vec::with_capacity(count);
        let mut id = first;
        for _ in 0..count {
            removed.push(id);
            id = self.nodes[id].next;
        }
        let after = id;
        let prev = self.nodes[first].prev;
        if prev != NIL {
            self.nodes[prev].next = after;
        } else {
            self.head = after;
        }
        if after != NIL {
            self.nodes[after].prev = prev;
        } else {
            self.tail = prev;
        }
        for &id in &removed {
            let item_hash = self.build_hasher.hash_one(&self.nodes[id].item);
            self.item_index
                .find_entry(item_hash, |&i| i == id)
                .unwrap()
                .remove();
            let pos_hash = self.build_hasher.hash_one(self.nodes[id].position);
            self.position_index
                .find_entry(pos_hash, |&i| i == id)
                .unwrap()
                .remove();
        }
        if after != NIL {
            self.renumber(after, |position| position - count);
        }
        removed.sort_unstable();
        for &id in removed.iter().rev() {
            self.free_node(id);
        }
        Ok(())
    }
    /// Replaces the item at position `index` with `item` and returns the old
    /// item. No positions change.
    ///
    /// Fails with [Error::Duplicate] if an item equal to `item` lives at a
    /// different position, and with [Error::OutOfBounds] for `index >= len`.
    pub fn replace(&mut self, index: usize, item: T) -> Result<T, Error<T>> {
        let Some(id) = self.node_id(index) else {
            return Err(Error::OutOfBounds {
                index,
                len: self.nodes.len(),
            });
        };
        let item_hash = self.build_hasher.hash_one(&item);
        match self
            .item_index
            .find(item_hash, |&i| self.nodes[i].item == item)
            .copied()
        {
            Some(existing) if existing != id => Err(Error::Duplicate {
                item,
                existing: self.nodes[existing].position,
            }),
            Some(_) => {
                // Equal items hash equally, the index entry stays valid.
                Ok(std::mem::replace(&mut self.nodes[id].item, item))
            }
            None => {
                let old_hash = self.build_hasher.hash_one(&self.nodes[id].item);
                self.item_index
                    .find_entry(old_hash, |&i| i == id)
                    .unwrap()
                    .remove();
                self.item_index.insert_unique(item_hash, id, |&i| {
                    self.build_hasher.hash_one(&self.nodes[i].item)
                });
                Ok(std::mem::replace(&mut self.nodes[id].item, item))
            }
        }
    }
    /// Builds a list from `items`, validated exactly like
    /// [insert_range](ChainList::insert_range) at position 0.
    ///
    /// Any duplicate anywhere in the input fails the whole construction.
    pub fn try_from_iter<I>(items: I) -> Result<Self, Error<T>>
    where
        I: IntoIterator<Item = T>,
    {
        let iter = items.into_iter();
        let (lower_bound, _) = iter.size_hint();
        let mut list = Self::with_capacity(lower_bound);
        list.insert_range(0, iter)?;
        Ok(list)
    }
}

impl<T> std::ops::Index<usize> for ChainList<T> {
    type Output = T;
    /// Returns the item at position `index`.
    ///
    /// Panics if `index >= len`; [get](ChainList::get) is the non-panicking
    /// form.
    fn index(&self, index: usize) -> &T {
        match self.get(index) {
            Some(item) => item,
            None => panic!("index {index} out of bounds for length {}", self.len()),
        }
    }
}

impl<T: PartialEq> PartialEq for ChainList<T> {
    fn eq(&self, other: &ChainList<T>) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for ChainList<T> {}

/// An iterator that moves out of a list.
///
/// This struct is created by the `into_iter` method on [`ChainList`].
pub struct IntoIter<T> {
    inner: std::vec::IntoIter<T>,
}
impl<T> Iterator for IntoIter<T> {
    type Item = T;
    impl_iterator!();
}
impl<T> IntoIterator for ChainList<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;
    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            inner: self.into_vec().into_iter(),
        }
    }
}

impl<'a, T> IntoIterator for &'a ChainList<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An iterator that returns references into a list, following the chain in
/// ascending position order.
///
/// This struct is created by the [`iter`](ChainList::iter) method on
/// [`ChainList`].
pub struct Iter<'a, T> {
    nodes: &'a [Node<T>],
    id: usize,
    remaining: usize,
}
impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;
    fn next(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        let node = &self.nodes[self.id];
        self.id = node.next;
        self.remaining -= 1;
        Some(&node.item)
    }
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}
impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> ChainList<T> {
    /// Returns an iterator over the list.
    ///
    /// The iterator yields all items in ascending position order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            nodes: &self.nodes,
            id: self.head,
            remaining: self.nodes.len(),
        }
    }
}

impl<T: Hash + Eq> ChainList<T> {
    #[cfg(test)]
    pub(crate) fn check(&self) {
        assert_eq!(self.item_index.len(), self.nodes.len());
        assert_eq!(self.position_index.len(), self.nodes.len());
        let mut id = self.head;
        let mut prev = NIL;
        let mut position = 0;
        while id != NIL {
            let node = &self.nodes[id];
            assert_eq!(node.position, position);
            assert_eq!(node.prev, prev);
            let item_hash = self.build_hasher.hash_one(&node.item);
            assert_eq!(self.item_index.find(item_hash, |&i| i == id), Some(&id));
            let pos_hash = self.build_hasher.hash_one(position);
            assert_eq!(self.position_index.find(pos_hash, |&i| i == id), Some(&id));
            prev = id;
            id = node.next;
            position += 1;
        }
        assert_eq!(position, self.nodes.len());
        assert_eq!(self.tail, prev);
    }
}
