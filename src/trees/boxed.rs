//! Fallible boxing of tree nodes.
//!
//! `Box::new` aborts the process when the allocator fails. Tree insertions instead ask the
//! global allocator directly, so that a failed allocation becomes an [`AllocError`] and the
//! tree can be left untouched.

use crate::error::{AllocError, Result};
use std::alloc::{self, Layout};

#[cfg(test)]
thread_local! {
    static FAIL_NEXT: std::cell::Cell<bool> = std::cell::Cell::new(false);
}

/// Makes the next [`try_box`] call on this thread fail.
#[cfg(test)]
pub(crate) fn fail_next_allocation() {
    FAIL_NEXT.with(|flag| flag.set(true));
}

#[cfg(test)]
fn injected_failure() -> bool {
    FAIL_NEXT.with(|flag| flag.replace(false))
}

#[cfg(not(test))]
fn injected_failure() -> bool {
    false
}

/// Moves `value` into a new heap allocation.
/// On failure `value` is dropped and nothing is leaked.
pub fn try_box<N>(value: N) -> Result<Box<N>> {
    let layout = Layout::new::<N>();
    if layout.size() == 0 {
        return Ok(Box::new(value));
    }
    if injected_failure() {
        return Err(AllocError);
    }
    // SAFETY: `layout` has a nonzero size. A non-null result is a fresh allocation from the
    // global allocator with the layout of `N`, which is exactly what `Box<N>` owns, and it is
    // initialized by the `write` before the box is created.
    unsafe {
        let ptr = alloc::alloc(layout) as *mut N;
        if ptr.is_null() {
            return Err(AllocError);
        }
        ptr.write(value);
        Ok(Box::from_raw(ptr))
    }
}

#[test]
fn try_box_holds_the_value() {
    let boxed = try_box((17u64, String::from("node"))).unwrap();
    assert_eq!(*boxed, (17, String::from("node")));
}

#[test]
fn injected_failure_is_one_shot() {
    fail_next_allocation();
    assert_eq!(try_box(5u32), Err(AllocError));
    assert_eq!(try_box(5u32).map(|b| *b), Ok(5));
}
