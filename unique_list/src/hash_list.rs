//! [HashList] is a duplicate-free list backed by a dense array and a custom
//! open-chained hash table of positions.
use crate::{
    bucket_table::BucketTable,
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

/// A list that rejects duplicate elements, backed by a dense array.
///
/// In `HashList<T, S>`,
/// `T: Hash + Eq` is the type of elements of the list and
/// `S: BuildHasher` is used for hashing elements (`S` should usually be
/// omitted, it then defaults to a [ZwoHasher] build hasher).
///
/// Elements keep stable positions `0..len`: inserting or removing at a
/// position shifts the tail of the array, and an element equal to a current
/// member can never be inserted a second time. Membership and reverse lookup
/// go through a hash table of positions kept in sync with the array on every
/// mutation.
#[derive(Clone)]
pub struct HashList<T, S = BuildHasherDefault<ZwoHasher>> {
    table: BucketTable,
    items: Vec<T>,
    build_hasher: S,
}

impl<T: std::fmt::Debug, S> std::fmt::Debug for HashList<T, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self).finish()
    }
}

impl<T, S: Default> Default for HashList<T, S> {
    fn default() -> Self {
        HashList {
            table: BucketTable::default(),
            items: Vec::new(),
            build_hasher: S::default(),
        }
    }
}

impl<T, S: Default> HashList<T, S> {
    /// Returns an empty list.
    pub fn new() -> Self {
        Self::default()
    }
    /// Returns an empty list with the specified capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        HashList {
            table: BucketTable::with_capacity(capacity),
            items: Vec::with_capacity(capacity),
            build_hasher: S::default(),
        }
    }
}

impl<T, S> HashList<T, S> {
    /// Returns an empty list with the provided BuildHasher.
    pub fn with_hasher(build_hasher: S) -> Self {
        HashList {
            table: BucketTable::default(),
            items: Vec::new(),
            build_hasher,
        }
    }
    /// Returns an empty list with the specified capacity and provided
    /// BuildHasher.
    pub fn with_capacity_and_hasher(capacity: usize, build_hasher: S) -> Self {
        HashList {
            table: BucketTable::with_capacity(capacity),
            items: Vec::with_capacity(capacity),
            build_hasher,
        }
    }
    /// Removes all items, but keeps the allocated memory.
    pub fn clear(&mut self) {
        self.table.clear();
        self.items.clear();
    }
    /// Returns the number of items in the list.
    pub fn len(&self) -> usize {
        self.items.len()
    }
    /// Returns `true` if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
    /// Returns the number of items the list can hold before the next resize
    /// of its position table.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }
    /// Returns the first item in the list, if it exists.
    pub fn first(&self) -> Option<&T> {
        self.items.first()
    }
    /// Returns the last item in the list, if it exists.
    pub fn last(&self) -> Option<&T> {
        self.items.last()
    }
    /// Returns the item at the given position, if it exists.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }
    /// Returns a reference to a slice containing all items in order.
    pub fn as_slice(&self) -> &[T] {
        &self.items[..]
    }
    /// Converts the list into a `Vec`. The hash table containing the
    /// positions is dropped.
    pub fn into_vec(self) -> Vec<T> {
        self.items
    }
}

impl<T: Hash + Eq, S: BuildHasher> HashList<T, S> {
    /// Returns the position of the item equivalent to `value`, if it exists.
    pub fn index_of<Q>(&self, value: &Q) -> Option<usize>
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let hash = self.build_hasher.hash_one(value);
        self.table
            .find(hash, |index| self.items[index].borrow() == value)
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
        let index = self.items.len();
        self.insert(index, item)?;
        Ok(index)
    }
    /// Inserts `item` at position `index`, shifting all items at `>= index`
    /// one position towards the end.
    ///
    /// `index` may be anywhere in `0..=len`. Fails with [Error::OutOfBounds]
    /// or [Error::Duplicate] without modifying the list.
    pub fn insert(&mut self, index: usize, item: T) -> Result<(), Error<T>> {
        if index > self.items.len() {
            return Err(Error::OutOfBounds {
                index,
                len: self.items.len(),
            });
        }
        let hash = self.build_hasher.hash_one(&item);
        if let Some(existing) = self.table.find(hash, |i| self.items[i] == item) {
            return Err(Error::Duplicate { item, existing });
        }
        if self.items.len() == self.table.capacity() {
            self.table.grow(self.items.len() + 1, index, 1);
        } else if index < self.items.len() {
            self.table.shift_up(index, 1);
        }
        self.table.insert(hash, index);
        self.items.insert(index, item);
        Ok(())
    }
    /// Inserts every item of `items` contiguously starting at `index`,
    /// preserving their order.
    ///
    /// The whole batch is validated against the bounds, the current members
    /// and itself before the list is touched: on any `Err` the list is
    /// exactly as it was, with the offending item inside the error.
    pub fn insert_range<I>(&mut self, index: usize, items: I) -> Result<(), Error<T>>
    where
        I: IntoIterator<Item = T>,
    {
        if index > self.items.len() {
            return Err(Error::OutOfBounds {
                index,
                len: self.items.len(),
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
            if let Some(existing) = self.table.find(hash, |i| self.items[i] == batch[offset]) {
                return Err(Error::Duplicate {
                    item: batch.swap_remove(offset),
                    existing,
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
        if self.items.len() + count > self.table.capacity() {
            self.table.grow(self.items.len() + count, index, count);
        } else if index < self.items.len() {
            self.table.shift_up(index, count);
        }
        for (offset, &hash) in hashes.iter().enumerate() {
            self.table.insert(hash, index + offset);
        }
        self.items.splice(index..index, batch);
        Ok(())
    }
    /// Appends every item of `items` to the end of the list.
    ///
    /// All-or-nothing like [insert_range](HashList::insert_range).
    pub fn push_range<I>(&mut self, items: I) -> Result<(), Error<T>>
    where
        I: IntoIterator<Item = T>,
    {
        self.insert_range(self.items.len(), items)
    }
    /// Removes the item equivalent to `value` and returns it, if it exists.
    ///
    /// All items after it shift one position towards the front. Absence is
    /// not an error.
    pub fn remove<Q>(&mut self, value: &Q) -> Option<T>
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let hash = self.build_hasher.hash_one(value);
        let index = self
            .table
            .remove(hash, |i| self.items[i].borrow() == value)?;
        let item = self.items.remove(index);
        if index < self.items.len() {
            self.table.shift_down(index + 1, 1);
        }
        Some(item)
    }
    /// Removes the item at position `index` and returns it.
    ///
    /// All items after it shift one position towards the front.
    pub fn remove_at(&mut self, index: usize) -> Result<T, Error<T>> {
        if index >= self.items.len() {
            return Err(Error::OutOfBounds {
                index,
                len: self.items.len(),
            });
        }
        let hash = self.build_hasher.hash_one(&self.items[index]);
        self.table.remove(hash, |i| i == index).unwrap();
        let item = self.items.remove(index);
        if index < self.items.len() {
            self.table.shift_down(index + 1, 1);
        }
        Ok(item)
    }
    /// Removes the `count` items starting at position `start`, shifting the
    /// tail towards the front.
    ///
    /// The window is validated before anything is unlinked.
    pub fn remove_range(&mut self, start: usize, count: usize) -> Result<(), Error<T>> {
        check_range(start, count, self.items.len())?;
        if count == 0 {
            return Ok(());
        }
        for index in start..start + count {
            let hash = self.build_hasher.hash_one(&self.items[index]);
            self.table.remove(hash, |i| i == index).unwrap();
        }
        self.items.drain(start..start + count);
        if start < self.items.len() {
            self.table.shift_down(start + count, count);
        }
        Ok(())
    }
    /// Replaces the item at position `index` with `item` and returns the old
    /// item. No positions change.
    ///
    /// Fails with [Error::Duplicate] if an item equal to `item` lives at a
    /// different position, and with [Error::OutOfBounds] for `index >= len`.
    pub fn replace(&mut self, index: usize, item: T) -> Result<T, Error<T>> {
        if index >= self.items.len() {
            return Err(Error::OutOfBounds {
                index,
                len: self.items.len(),
            });
        }
        let hash = self.build_hasher.hash_one(&item);
        match self.table.find(hash, |i| self.items[i] == item) {
            Some(existing) if existing != index => Err(Error::Duplicate { item, existing }),
            Some(_) => {
                // Equal items hash equally, the table entry stays valid.
                Ok(std::mem::replace(&mut self.items[index], item))
            }
            None => {
                let old_hash = self.build_hasher.hash_one(&self.items[index]);
                self.table.remove(old_hash, |i| i == index).unwrap();
                self.table.insert(hash, index);
                Ok(std::mem::replace(&mut self.items[index], item))
            }
        }
    }
}

impl<T: Hash + Eq, S: BuildHasher + Default> HashList<T, S> {
    /// Builds a list from `items`, validated exactly like
    /// [insert_range](HashList::insert_range) at position 0.
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

impl<T, S> std::ops::Index<usize> for HashList<T, S> {
    type Output = T;
    /// Returns the item at position `index`.
    ///
    /// Panics if `index >= len`; [get](HashList::get) is the non-panicking
    /// form.
    fn index(&self, index: usize) -> &T {
        &self.items[index]
    }
}

impl<T: PartialEq, S1, S2> PartialEq<HashList<T, S2>> for HashList<T, S1> {
    fn eq(&self, other: &HashList<T, S2>) -> bool {
        self.items == other.items
    }
}

impl<T: Eq, S> Eq for HashList<T, S> {}

/// An iterator that moves out of a list.
///
/// This struct is created by the `into_iter` method on [`HashList`].
pub struct IntoIter<T> {
    inner: std::vec::IntoIter<T>,
}
impl<T> Iterator for IntoIter<T> {
    type Item = T;
    impl_iterator!();
}
impl<T, S> IntoIterator for HashList<T, S> {
    type Item = T;
    type IntoIter = IntoIter<T>;
    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            inner: self.items.into_iter(),
        }
    }
}

impl<'a, T, S> IntoIterator for &'a HashList<T, S> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An iterator that returns references into a list.
///
/// This struct is created by the [`iter`](HashList::iter) method on
/// [`HashList`].
pub struct Iter<'a, T> {
    inner: std::slice::Iter<'a, T>,
}
impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;
    impl_iterator!();
}

impl<T, S> HashList<T, S> {
    /// Returns an iterator over the list.
    ///
    /// The iterator yields all items in ascending position order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            inner: self.items.iter(),
        }
    }
}

impl<T: Hash + Eq, S: BuildHasher> HashList<T, S> {
    #[cfg(test)]
    pub(crate) fn check(&self) {
        self.table.check(self.items.len(), |index| {
            self.build_hasher.hash_one(&self.items[index])
        });
        for (index, item) in self.items.iter().enumerate() {
            let hash = self.build_hasher.hash_one(item);
            assert_eq!(
                self.table.find(hash, |i| &self.items[i] == item),
                Some(index)
            );
        }
    }
    #[cfg(test)]
    pub(crate) fn arena_len(&self) -> usize {
        self.table.arena_len()
    }
}
