//! # Chain
//!
//! A pointer chain is a buffer of slots where every slot on the traversal holds the index of
//! its successor, forming one circular list that starts and ends at slot 0. Indices stand in
//! for raw addresses: the next load still depends on the value of the previous one, which is
//! what makes the walk a latency probe, but every access stays bounds checked.
//!
//! Slots are laid out on the stride lattice `0, S, 2S, ..` below the buffer length. The
//! traversal order of those slots is kept alongside the buffer so the chain can be relinked
//! in a shuffled order.
use crate::error::{ProbeError, ProbeResult};
use crate::shuffle::fisher_yates;
use rand::Rng;

/// Index of the slot every traversal starts from
pub const HEAD: usize = 0;

/// Circular singly-linked chain of slot indices
pub struct Chain {
    /// `slots[i]` is the index of the slot visited after slot `i`
    slots: Vec<usize>,
    /// Slots on the cycle, in the order they are visited starting from `HEAD`
    order: Vec<usize>,
}

impl Chain {
    /// Build a chain over `len` slots visiting every `stride`-th slot in increasing order.
    ///
    /// Each lattice slot `j` links to `(j + stride) % len`, then the last lattice slot is forced
    /// back to `HEAD`, which closes the cycle even when `stride` does not divide `len`.
    ///
    /// # Panics
    /// If `len` or `stride` is zero.
    pub fn sequential(len: usize, stride: usize) -> ProbeResult<Self> {
        assert!(len > 0, "chain needs at least one slot");
        assert!(stride > 0, "stride must be non-zero");

        let mut slots = alloc_zeroed(len, len)?;
        let mut order = alloc_zeroed(len.div_ceil(stride), len)?;
        order.clear();

        for j in (0..len).step_by(stride) {
            slots[j] = (j + stride) % len;
            order.push(j);
        }

        let mut chain = Chain { slots, order };
        chain.close();
        Ok(chain)
    }

    /// Build a chain over `len` slots and randomize its traversal order with `rng`
    pub fn shuffled<R>(len: usize, stride: usize, rng: &mut R) -> ProbeResult<Self>
    where
        R: Rng,
    {
        let mut chain = Chain::sequential(len, stride)?;
        chain.shuffle(rng);
        Ok(chain)
    }

    /// Permute the traversal order and relink the slots to follow it.
    ///
    /// The slot at position `k` of the new order links to the slot at position `k + 1`,
    /// wrapping at the end, so the chain stays a single cycle over the same slots.
    pub fn shuffle<R>(&mut self, rng: &mut R)
    where
        R: Rng,
    {
        fisher_yates(&mut self.order, rng);

        let n = self.order.len();
        for k in 0..n {
            self.slots[self.order[k]] = self.order[(k + 1) % n];
        }
        self.close();
    }

    /// Force the final slot of the traversal order to link back to its first slot
    fn close(&mut self) {
        if let (Some(&first), Some(&last)) = (self.order.first(), self.order.last()) {
            if self.slots[last] != first {
                self.slots[last] = first;
            }
        }
    }

    /// Raw successor table
    pub fn slots(&self) -> &[usize] {
        &self.slots
    }

    /// Slots on the cycle in traversal order
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    /// Number of slots in the buffer
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Always false, chains hold at least one slot
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of slots visited in one lap of the cycle
    pub fn lap_len(&self) -> usize {
        self.order.len()
    }

    /// Size of the buffer in bytes
    pub fn bytes(&self) -> usize {
        self.slots.len() * std::mem::size_of::<usize>()
    }
}

/// Zero-filled buffer of `len` slots, reporting exhaustion against the chain of `chain_slots`
fn alloc_zeroed(len: usize, chain_slots: usize) -> ProbeResult<Vec<usize>> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)
        .map_err(|_| ProbeError::Alloc {
            slots: chain_slots,
            bytes: chain_slots.saturating_mul(std::mem::size_of::<usize>()),
        })?;
    buf.resize(len, 0);
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    use std::collections::HashSet;

    /// Follow links from `HEAD` until it comes back, returning the visited slots
    fn walk(chain: &Chain) -> Vec<usize> {
        let mut visited = vec![HEAD];
        let mut cursor = chain.slots()[HEAD];
        while cursor != HEAD {
            visited.push(cursor);
            assert!(visited.len() <= chain.len(), "walk never returned to head");
            cursor = chain.slots()[cursor];
        }
        visited
    }

    fn assert_single_cycle(chain: &Chain) {
        let visited = walk(chain);
        let distinct: HashSet<_> = visited.iter().copied().collect();
        assert_eq!(distinct.len(), visited.len(), "slot visited twice in one lap");
        assert_eq!(visited.len(), chain.lap_len());
        let expected: HashSet<_> = chain.order().iter().copied().collect();
        assert_eq!(distinct, expected);
    }

    #[test]
    fn unit_stride_visits_every_slot() {
        for n in [1usize, 2, 3, 7, 64, 1000, 1024] {
            let chain = Chain::sequential(n, 1).unwrap();
            assert_single_cycle(&chain);
            assert_eq!(walk(&chain).len(), n);
            assert_eq!(walk(&chain), (0..n).collect::<Vec<_>>());
        }
    }

    #[test]
    fn strided_chain_is_one_cycle_over_the_lattice() {
        for n in [1usize, 5, 10, 16, 33, 1000] {
            for stride in [1usize, 2, 3, 4, 7, 8, 64] {
                let chain = Chain::sequential(n, stride).unwrap();
                assert_single_cycle(&chain);
                assert_eq!(chain.lap_len(), n.div_ceil(stride), "n={n} stride={stride}");
                assert!(walk(&chain).iter().all(|slot| slot % stride == 0));
            }
        }
    }

    #[test]
    fn uneven_stride_wrap_is_forced_to_head() {
        // 0 -> 3 -> 6 -> 9, and 9 would wrap to 2 without the forced link
        let chain = Chain::sequential(10, 3).unwrap();
        assert_eq!(chain.order(), &[0, 3, 6, 9]);
        assert_eq!(chain.slots()[9], HEAD);
        assert_eq!(walk(&chain), vec![0, 3, 6, 9]);
    }

    #[test]
    fn stride_beyond_length_leaves_head_alone() {
        let chain = Chain::sequential(4, 16).unwrap();
        assert_eq!(chain.lap_len(), 1);
        assert_eq!(chain.slots()[HEAD], HEAD);
    }

    #[test]
    fn shuffled_chain_is_still_one_cycle() {
        let mut rng = SmallRng::seed_from_u64(0xC0FFEE);
        for n in [1usize, 2, 3, 100, 4096] {
            for stride in [1usize, 3, 8] {
                let chain = Chain::shuffled(n, stride, &mut rng).unwrap();
                assert_single_cycle(&chain);
            }
        }
    }

    #[test]
    fn shuffle_changes_the_traversal_order() {
        let mut rng = SmallRng::seed_from_u64(99);
        let chain = Chain::shuffled(4096, 1, &mut rng).unwrap();
        assert_ne!(walk(&chain), (0..4096).collect::<Vec<_>>());
        let mut order = chain.order().to_vec();
        order.sort_unstable();
        assert_eq!(order, (0..4096).collect::<Vec<_>>());
    }

    #[test]
    fn byte_size_uses_pointer_width() {
        let chain = Chain::sequential(1024, 1).unwrap();
        assert_eq!(chain.bytes(), 1024 * std::mem::size_of::<*const u8>());
    }

    #[test]
    fn impossible_allocation_names_the_size() {
        let slots = usize::MAX / 2;
        match Chain::sequential(slots, 1) {
            Err(ProbeError::Alloc { slots: s, .. }) => assert_eq!(s, slots),
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("allocation of {slots} slots succeeded"),
        }
    }
}
