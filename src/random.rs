//! Unbiased random indices.
//!
//! The random source is owned by the caller and passed in explicitly,
//! so seeding it makes every draw reproducible.

use rand::RngCore;

/// Number of distinct values produced by one draw of the source.
const SOURCE_RANGE: u64 = 1 << 32;

/// Returns a uniformly distributed index in `0..n`.
///
/// Draws from the full 32-bit range of the source and rejects the draws that land in
/// the tail `range - range % n ..`, so that the final `draw % n` has no modulo bias.
///
/// Panics if `n == 0` or if `n` exceeds the range of the source.
///```
/// use rand::{rngs::StdRng, SeedableRng};
/// use trike_trees::random::rand_size_t;
///
/// let mut rng = StdRng::seed_from_u64(7);
/// for _ in 0..100 {
///     assert!(rand_size_t(&mut rng, 6) < 6);
/// }
///```
pub fn rand_size_t<R: RngCore + ?Sized>(rng: &mut R, n: usize) -> usize {
    assert!(n > 0, "rand_size_t: empty range");
    let n = n as u64;
    assert!(n <= SOURCE_RANGE, "rand_size_t: range larger than the random source");

    let limit = SOURCE_RANGE - SOURCE_RANGE % n;
    loop {
        let draw = rng.next_u32() as u64;
        if draw < limit {
            return (draw % n) as usize;
        }
    }
}

/// Picks one element of `items` uniformly, or `None` if there is nothing to pick.
pub fn choose<'a, T, R: RngCore + ?Sized>(rng: &mut R, items: &'a [T]) -> Option<&'a T> {
    if items.is_empty() {
        None
    } else {
        Some(&items[rand_size_t(rng, items.len())])
    }
}

/// A source that replays a fixed list of draws. Used to observe the rejection step.
#[cfg(test)]
struct Replay {
    draws: Vec<u32>,
    next: usize,
}

#[cfg(test)]
impl RngCore for Replay {
    fn next_u32(&mut self) -> u32 {
        let draw = self.draws[self.next];
        self.next += 1;
        draw
    }

    fn next_u64(&mut self) -> u64 {
        self.next_u32() as u64
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.next_u32().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

#[test]
fn rand_size_t_rejects_the_biased_tail() {
    // 2^32 % 3 == 1, so the single largest draw falls in the rejected tail.
    let mut rng = Replay {
        draws: vec![u32::MAX, u32::MAX, 7],
        next: 0,
    };
    assert_eq!(rand_size_t(&mut rng, 3), 1);
    assert_eq!(rng.next, 3);
}

#[test]
fn rand_size_t_accepts_below_the_tail() {
    let mut rng = Replay {
        draws: vec![u32::MAX - 1],
        next: 0,
    };
    assert_eq!(rand_size_t(&mut rng, 3), ((u32::MAX - 1) % 3) as usize);
    assert_eq!(rng.next, 1);
}

#[test]
fn rand_size_t_is_roughly_uniform() {
    use rand::{rngs::StdRng, SeedableRng};
    let mut rng = StdRng::seed_from_u64(0x7a1c);
    let mut counts = [0usize; 5];
    for _ in 0..50_000 {
        counts[rand_size_t(&mut rng, 5)] += 1;
    }
    for &count in counts.iter() {
        assert!((9_000..11_000).contains(&count), "{:?}", counts);
    }
}

#[test]
#[should_panic]
fn rand_size_t_rejects_zero() {
    use rand::{rngs::StdRng, SeedableRng};
    rand_size_t(&mut StdRng::seed_from_u64(1), 0);
}

#[test]
#[should_panic]
#[cfg(target_pointer_width = "64")]
fn rand_size_t_rejects_ranges_wider_than_the_source() {
    use rand::{rngs::StdRng, SeedableRng};
    rand_size_t(&mut StdRng::seed_from_u64(1), (1usize << 32) + 1);
}

#[test]
fn choose_from_empty_and_singleton() {
    use rand::{rngs::StdRng, SeedableRng};
    let mut rng = StdRng::seed_from_u64(3);
    let empty: [u8; 0] = [];
    assert_eq!(choose(&mut rng, &empty[..]), None);
    assert_eq!(choose(&mut rng, &[42][..]), Some(&42));
}
