use std::cmp::Ordering;

mod generic_key;

pub use generic_key::{GenericComparator, GenericKey};

/// Strict total order over index keys.
///
/// Pages never compare keys on their own; every ordered operation takes a
/// comparator so the same page layout serves any key encoding.
pub trait KeyComparator<K> {
    fn compare(&self, lhs: &K, rhs: &K) -> Ordering;
}

impl<K, F> KeyComparator<K> for F
where
    F: Fn(&K, &K) -> Ordering,
{
    fn compare(&self, lhs: &K, rhs: &K) -> Ordering {
        self(lhs, rhs)
    }
}
