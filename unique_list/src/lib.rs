//! [HashList] and [ChainList] are list-like collections that reject duplicates
//! while keeping stable integer positions, i.e. every element occupies exactly one
//! index in `0..len` and an equal element can never be inserted twice.
//!
//! Both types implement the same operation set (positional insert/remove, range
//! insert/remove with all-or-nothing semantics, O(1)-ish membership and reverse
//! lookup) and differ only in their internal strategy:
//!
//! 1. [HashList] stores its elements in a dense `Vec` and maintains a custom
//!    open-chained hash table of positions next to it. Lookups walk a short bucket
//!    chain; positional mutation shifts the tail of the `Vec`.
//! 2. [ChainList] threads its elements onto a doubly-linked chain of position
//!    nodes and keeps two hash indices (element to node, position to node).
//!    Positional mutation renumbers the chain instead of moving elements.
//!
//! Contiguous-scan-heavy workloads favor [HashList]; insert/remove-heavy
//! workloads favor [ChainList]. Both are worst-case linear per structural
//! mutation.
//!
//! Batch operations ([HashList::insert_range], [ChainList::insert_range] and the
//! `try_from_iter` constructors) validate their whole input before touching the
//! collection: a rejected batch leaves the collection exactly as it was.

mod bucket_table;
mod util;

mod test_chain_list;
mod test_hash_list;

pub use chain_list::ChainList;
pub use error::Error;
pub use hash_list::HashList;

pub mod chain_list;
pub mod error;
pub mod hash_list;
