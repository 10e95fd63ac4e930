//! Orderings used by the trees.
//!
//! A [`Comparator`] is a strict weak order over the element type. The trees only ever ask
//! whether one element is less than another; two elements are considered the same entry
//! when neither is less than the other.

use std::cmp::Ordering;

/// A strict weak order over `T`.
///
/// Any closure `Fn(&T, &T) -> bool` is a comparator:
///```
/// use trike_trees::splay::SplayTree;
///
/// let mut tree = SplayTree::with_comparator(|a: &i32, b: &i32| a > b);
/// for x in [3, 1, 2].iter() {
///     tree.insert(*x).unwrap();
/// }
/// assert_eq!(tree.iter().cloned().collect::<Vec<_>>(), vec![3, 2, 1]);
///```
pub trait Comparator<T: ?Sized> {
    /// Returns true if `a` is strictly before `b`.
    fn less(&self, a: &T, b: &T) -> bool;

    /// Two elements are equal if neither is less than the other.
    fn equal(&self, a: &T, b: &T) -> bool {
        !self.less(a, b) && !self.less(b, a)
    }

    fn compare(&self, a: &T, b: &T) -> Ordering {
        if self.less(a, b) {
            Ordering::Less
        } else if self.less(b, a) {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    }
}

/// The order given by the [`Ord`] instance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NaturalOrder;

impl<T: Ord + ?Sized> Comparator<T> for NaturalOrder {
    fn less(&self, a: &T, b: &T) -> bool {
        a < b
    }

    fn compare(&self, a: &T, b: &T) -> Ordering {
        a.cmp(b)
    }
}

impl<T: ?Sized, F> Comparator<T> for F
where
    F: Fn(&T, &T) -> bool,
{
    fn less(&self, a: &T, b: &T) -> bool {
        self(a, b)
    }
}

/// Orders `u64` keys by their bits above `SHIFT`.
/// The low `SHIFT` bits are a payload and take no part in the ordering,
/// so inserting a key with a different payload overwrites the stored one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HighBits<const SHIFT: u32>;

impl<const SHIFT: u32> HighBits<SHIFT> {
    pub fn key(x: u64) -> u64 {
        x >> SHIFT
    }
}

impl<const SHIFT: u32> Comparator<u64> for HighBits<SHIFT> {
    fn less(&self, a: &u64, b: &u64) -> bool {
        Self::key(*a) < Self::key(*b)
    }
}

/// Ordering of encoded board positions: the low byte holds the position's value.
pub type PositionOrder = HighBits<8>;

/// The value byte of an encoded position.
pub fn payload(x: u64) -> u8 {
    (x & 0xff) as u8
}
