#![cfg(test)]
#![allow(missing_docs)]
use crate::{ChainList, Error};
use rand::prelude::*;

struct CheckedList<T> {
    dut: ChainList<T>,
    ref_list: Vec<T>,
}

impl<T: std::hash::Hash + Eq + Clone + std::fmt::Debug> CheckedList<T> {
    fn new() -> Self {
        CheckedList {
            dut: ChainList::new(),
            ref_list: Vec::new(),
        }
    }
    fn push(&mut self, item: T) {
        let expected = match self.ref_list.iter().position(|x| x == &item) {
            Some(existing) => Err(Error::Duplicate {
                item: item.clone(),
                existing,
            }),
            None => Ok(self.ref_list.len()),
        };
        let result = self.dut.push(item.clone());
        assert_eq!(result, expected);
        if result.is_ok() {
            self.ref_list.push(item);
        }
    }
    fn insert(&mut self, index: usize, item: T) {
        let expected = if index > self.ref_list.len() {
            Err(Error::OutOfBounds {
                index,
                len: self.ref_list.len(),
            })
        } else if let Some(existing) = self.ref_list.iter().position(|x| x == &item) {
            Err(Error::Duplicate {
                item: item.clone(),
                existing,
            })
        } else {
            Ok(())
        };
        let result = self.dut.insert(index, item.clone());
        assert_eq!(result, expected);
        if result.is_ok() {
            self.ref_list.insert(index, item);
        }
    }
    fn insert_range(&mut self, index: usize, batch: Vec<T>) {
        let expected = self.expected_insert_range(index, &batch);
        let result = self.dut.insert_range(index, batch.clone());
        assert_eq!(result, expected);
        if result.is_ok() {
            self.ref_list.splice(index..index, batch);
        } else {
            // a failed batch must leave the list untouched
            self.check();
        }
    }
    fn expected_insert_range(&self, index: usize, batch: &[T]) -> Result<(), Error<T>> {
        if index > self.ref_list.len() {
            return Err(Error::OutOfBounds {
                index,
                len: self.ref_list.len(),
            });
        }
        for (offset, item) in batch.iter().enumerate() {
            if let Some(existing) = self.ref_list.iter().position(|x| x == item) {
                return Err(Error::Duplicate {
                    item: item.clone(),
                    existing,
                });
            }
            if batch[..offset].contains(item) {
                return Err(Error::DuplicateInBatch { item: item.clone() });
            }
        }
        Ok(())
    }
    fn remove(&mut self, value: &T) {
        let expected = self
            .ref_list
            .iter()
            .position(|x| x == value)
            .map(|index| self.ref_list.remove(index));
        let result = self.dut.remove(value);
        assert_eq!(result, expected);
    }
    fn remove_at(&mut self, index: usize) {
        let expected = if index < self.ref_list.len() {
            Ok(self.ref_list.remove(index))
        } else {
            Err(Error::OutOfBounds {
                index,
                len: self.ref_list.len(),
            })
        };
        let result = self.dut.remove_at(index);
        assert_eq!(result, expected);
    }
    fn remove_range(&mut self, start: usize, count: usize) {
        let len = self.ref_list.len();
        let expected = if start > len {
            Err(Error::OutOfBounds { index: start, len })
        } else if count > len - start {
            Err(Error::InvalidRange { start, count, len })
        } else {
            self.ref_list.drain(start..start + count);
            Ok(())
        };
        let result = self.dut.remove_range(start, count);
        assert_eq!(result, expected);
    }
    fn replace(&mut self, index: usize, item: T) {
        let expected = if index >= self.ref_list.len() {
            Err(Error::OutOfBounds {
                index,
                len: self.ref_list.len(),
            })
        } else {
            match self.ref_list.iter().position(|x| x == &item) {
                Some(existing) if existing != index => Err(Error::Duplicate {
                    item: item.clone(),
                    existing,
                }),
                _ => Ok(std::mem::replace(&mut self.ref_list[index], item.clone())),
            }
        };
        let result = self.dut.replace(index, item);
        assert_eq!(result, expected);
    }
    fn index_of(&self, value: &T) {
        assert_eq!(
            self.dut.index_of(value),
            self.ref_list.iter().position(|x| x == value)
        );
        assert_eq!(self.dut.contains(value), self.ref_list.contains(value));
    }
    fn get(&self, index: usize) {
        assert_eq!(self.dut.get(index), self.ref_list.get(index));
    }
    fn check(&self) {
        self.dut.check();
        assert_eq!(self.dut.len(), self.ref_list.len());
        assert!(self.ref_list.iter().eq(&self.dut));
    }
}

macro_rules! weighted_choose {
    ($rng:expr, $($name:ident: $weight:expr => $body:expr),+) => {
        {
            enum Branches { $( $name,  )* }
            let weights = [$((Branches::$name, $weight)),+];
            match weights.choose_weighted($rng, |x| x.1).unwrap().0 {
                $(Branches::$name => $body),*
            }
        }
    }
}

fn test_suite<T: std::hash::Hash + Eq + Clone + std::fmt::Debug, R: Rng + SeedableRng>(
    mut rand_t: impl FnMut(&mut R) -> T,
) {
    let mut list: CheckedList<T> = CheckedList::new();
    let mut rng = R::seed_from_u64(31);
    let mut max_size = 0;
    for _ in 0..5000 {
        let len = list.ref_list.len();
        // indices beyond the valid window are generated on purpose
        let index = rng.gen_range(0..=(len + len.div_ceil(10) + 1));
        weighted_choose! {&mut rng,
            Push: 0.8 => {
                list.push(rand_t(&mut rng));
            },
            PushPresent: 0.2 => {
                if let Some(item) = list.ref_list.iter().choose(&mut rng).cloned() {
                    list.push(item);
                }
            },
            Insert: 1.0 => {
                list.insert(index, rand_t(&mut rng));
            },
            InsertRange: 0.4 => {
                let count = rng.gen_range(0..8);
                let mut batch: Vec<T> = Vec::with_capacity(count);
                for _ in 0..count {
                    if rng.gen_bool(0.1) {
                        if let Some(item) = list.ref_list.iter().choose(&mut rng).cloned() {
                            batch.push(item);
                            continue;
                        }
                    }
                    if rng.gen_bool(0.1) {
                        if let Some(item) = batch.iter().choose(&mut rng).cloned() {
                            batch.push(item);
                            continue;
                        }
                    }
                    batch.push(rand_t(&mut rng));
                }
                list.insert_range(index, batch);
            },
            RemovePresent: 0.4 => {
                if let Some(item) = list.ref_list.iter().choose(&mut rng).cloned() {
                    list.remove(&item);
                }
            },
            RemoveRandom: 0.3 => {
                let item = rand_t(&mut rng);
                list.remove(&item);
            },
            RemoveAt: 0.3 => {
                list.remove_at(index);
            },
            RemoveRange: 0.2 => {
                let count = rng.gen_range(0..=(len / 2 + 2));
                list.remove_range(index, count);
            },
            Replace: 0.3 => {
                if rng.gen_bool(0.3) {
                    if let Some(item) = list.ref_list.iter().choose(&mut rng).cloned() {
                        list.replace(index, item);
                        continue;
                    }
                }
                list.replace(index, rand_t(&mut rng));
            },
            GetPresent: 0.3 => {
                if let Some(item) = list.ref_list.iter().choose(&mut rng).cloned() {
                    list.index_of(&item);
                }
            },
            GetRandom: 0.3 => {
                let item = rand_t(&mut rng);
                list.index_of(&item);
                list.get(index);
            },
            Check: 0.15 => {
                list.check();
            }
        };
        max_size = std::cmp::max(max_size, list.ref_list.len());
    }
    list.check();
    println!("max size: {max_size}");
}

#[test]
fn test_suite_usize() {
    test_suite::<usize, rand_pcg::Pcg64>(|rng| rng.gen::<usize>() >> rng.gen_range(0..usize::BITS));
}

#[test]
fn test_suite_boxed_usize() {
    test_suite::<Box<usize>, rand_pcg::Pcg64>(|rng| {
        Box::new(rng.gen::<usize>() >> rng.gen_range(0..usize::BITS))
    });
}

#[test]
fn test_suite_string() {
    test_suite::<String, rand_pcg::Pcg64>(|rng| {
        let len = rng.gen_range(4..32);
        String::from_iter((0..len).map(|_| rng.gen_range('!'..'~')))
    });
}

#[test]
fn test_append_order() {
    let mut list: ChainList<&str> = ChainList::new();
    assert_eq!(list.push("apple"), Ok(0));
    assert_eq!(list.push("pear"), Ok(1));
    assert_eq!(list.len(), 2);
    assert_eq!(list[0], "apple");
    assert_eq!(list[1], "pear");
    assert_eq!(list.first(), Some(&"apple"));
    assert_eq!(list.last(), Some(&"pear"));
    list.check();
}

#[test]
fn test_duplicate_push_rejected() {
    let mut list: ChainList<&str> = ChainList::try_from_iter(["apple", "pear"]).unwrap();
    let err = list.push("apple").unwrap_err();
    assert_eq!(
        err,
        Error::Duplicate {
            item: "apple",
            existing: 0
        }
    );
    assert!(err.is_duplicate());
    assert_eq!(err.into_item(), Some("apple"));
    assert!(list.iter().eq(&["apple", "pear"]));
    list.check();
}

#[test]
fn test_insert_range_middle() {
    let mut list: ChainList<&str> = ChainList::try_from_iter(["a", "b", "c"]).unwrap();
    list.insert_range(1, ["x", "y"]).unwrap();
    assert!(list.iter().eq(&["a", "x", "y", "b", "c"]));
    assert_eq!(list.len(), 5);
    assert_eq!(list.index_of(&"y"), Some(2));
    assert_eq!(list.index_of(&"b"), Some(3));
    list.check();
}

#[test]
fn test_insert_range_atomic() {
    let mut list: ChainList<&str> = ChainList::try_from_iter(["a", "b", "c"]).unwrap();
    let err = list.insert_range(1, ["x", "a"]).unwrap_err();
    assert_eq!(
        err,
        Error::Duplicate {
            item: "a",
            existing: 0
        }
    );
    assert!(list.iter().eq(&["a", "b", "c"]));
    assert_eq!(list.len(), 3);
    for (index, item) in ["a", "b", "c"].iter().enumerate() {
        assert_eq!(list.index_of(item), Some(index));
    }
    list.check();
}

#[test]
fn test_insert_range_duplicate_within_batch() {
    let mut list: ChainList<&str> = ChainList::try_from_iter(["a", "b"]).unwrap();
    let err = list.insert_range(1, ["x", "y", "x"]).unwrap_err();
    assert_eq!(err, Error::DuplicateInBatch { item: "x" });
    assert!(list.iter().eq(&["a", "b"]));
    list.check();
}

#[test]
fn test_remove_range_middle() {
    let mut list: ChainList<&str> = ChainList::try_from_iter(["a", "b", "c", "d"]).unwrap();
    list.remove_range(1, 2).unwrap();
    assert!(list.iter().eq(&["a", "d"]));
    assert_eq!(list.len(), 2);
    assert_eq!(list.index_of(&"d"), Some(1));
    assert_eq!(list.index_of(&"b"), None);
    list.check();
}

#[test]
fn test_remove_range_bad_window() {
    let mut list: ChainList<&str> = ChainList::try_from_iter(["a", "b", "c"]).unwrap();
    assert_eq!(
        list.remove_range(1, 3),
        Err(Error::InvalidRange {
            start: 1,
            count: 3,
            len: 3
        })
    );
    assert_eq!(
        list.remove_range(4, 0),
        Err(Error::OutOfBounds { index: 4, len: 3 })
    );
    assert!(list.iter().eq(&["a", "b", "c"]));
    list.check();
}

#[test]
fn test_get_out_of_bounds() {
    let list: ChainList<usize> = ChainList::new();
    assert_eq!(list.get(5), None);
}

#[test]
#[should_panic(expected = "out of bounds")]
fn test_index_out_of_bounds_panics() {
    let list: ChainList<usize> = ChainList::new();
    let _ = list[5];
}

#[test]
fn test_insert_remove_round_trip() {
    let mut list: ChainList<usize> = ChainList::try_from_iter(0..10).unwrap();
    let before: Vec<usize> = list.iter().copied().collect();
    list.insert(4, 100).unwrap();
    assert_eq!(list.index_of(&100), Some(4));
    assert_eq!(list.index_of(&4), Some(5));
    assert_eq!(list.remove_at(4), Ok(100));
    assert!(list.iter().eq(before.iter()));
    list.check();
}

#[test]
fn test_remove_absent() {
    let mut list: ChainList<&str> = ChainList::try_from_iter(["a", "b"]).unwrap();
    assert_eq!(list.remove(&"z"), None);
    assert_eq!(list.remove(&"a"), Some("a"));
    assert!(list.iter().eq(&["b"]));
    list.check();
}

#[test]
fn test_replace() {
    let mut list: ChainList<&str> = ChainList::try_from_iter(["a", "b", "c"]).unwrap();
    assert_eq!(list.replace(1, "x"), Ok("b"));
    assert!(list.iter().eq(&["a", "x", "c"]));
    assert_eq!(list.index_of(&"x"), Some(1));
    assert_eq!(list.index_of(&"b"), None);
    // replacing with the resident itself is a no-op swap
    assert_eq!(list.replace(2, "c"), Ok("c"));
    // a value living elsewhere is rejected
    assert_eq!(
        list.replace(0, "x"),
        Err(Error::Duplicate {
            item: "x",
            existing: 1
        })
    );
    assert_eq!(
        list.replace(3, "y"),
        Err(Error::OutOfBounds { index: 3, len: 3 })
    );
    assert!(list.iter().eq(&["a", "x", "c"]));
    list.check();
}

#[test]
fn test_try_from_iter_duplicate() {
    let err = ChainList::<&str>::try_from_iter(["a", "b", "a"]).unwrap_err();
    assert_eq!(err, Error::DuplicateInBatch { item: "a" });
}

#[test]
fn test_clear() {
    let mut list: ChainList<usize> = ChainList::try_from_iter(0..20).unwrap();
    list.clear();
    assert!(list.is_empty());
    assert_eq!(list.first(), None);
    assert_eq!(list.last(), None);
    list.push_range(0..20).unwrap();
    assert!(list.iter().copied().eq(0..20));
    list.check();
}

#[test]
fn test_front_inserts_renumber_chain() {
    let mut list: ChainList<usize> = ChainList::new();
    // repeated front inserts leave the arena in reverse position order
    for i in 0..20 {
        list.insert(0, i).unwrap();
        list.check();
    }
    assert!(list.iter().copied().eq((0..20).rev()));
    assert_eq!(list.index_of(&19), Some(0));
    assert_eq!(list.index_of(&0), Some(19));
    assert!(list.into_vec().into_iter().eq((0..20).rev()));
}

#[test]
fn test_arena_compaction_on_middle_removal() {
    let mut list: ChainList<usize> = ChainList::try_from_iter(0..10).unwrap();
    assert_eq!(list.remove_at(3), Ok(3));
    list.check();
    assert_eq!(list.remove_at(3), Ok(4));
    list.check();
    assert_eq!(list.remove(&9), Some(9));
    list.check();
    assert!(list.iter().copied().eq([0, 1, 2, 5, 6, 7, 8]));
    for (index, value) in [0, 1, 2, 5, 6, 7, 8].into_iter().enumerate() {
        assert_eq!(list.index_of(&value), Some(index));
        assert_eq!(list.get(index), Some(&value));
    }
}

#[test]
fn test_into_vec_and_iter() {
    let mut list: ChainList<&str> = ChainList::try_from_iter(["b", "c"]).unwrap();
    list.insert(0, "a").unwrap();
    let copied: Vec<&str> = list.iter().copied().collect();
    assert_eq!(copied, ["a", "b", "c"]);
    assert_eq!(list.clone().into_vec(), ["a", "b", "c"]);
    assert!(list.into_iter().eq(["a", "b", "c"]));
}
