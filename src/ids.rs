use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;

const ID_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
const ID_LENGTH: usize = 20;

/// Issues block identifiers for one translation run. Ids are random draws
/// from a fixed alphabet, re-drawn on collision so the map never aliases two
/// blocks.
#[derive(Debug)]
pub struct IdAllocator {
    rng: StdRng,
    issued: HashSet<String>,
}

impl IdAllocator {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            rng,
            issued: HashSet::new(),
        }
    }

    pub fn next_id(&mut self) -> String {
        loop {
            let candidate = (0..ID_LENGTH)
                .map(|_| ID_ALPHABET[self.rng.gen_range(0..ID_ALPHABET.len())] as char)
                .collect::<String>();
            if self.issued.insert(candidate.clone()) {
                return candidate;
            }
            log::warn!("Block id collision on '{}', drawing again", candidate);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_have_expected_shape() {
        let mut ids = IdAllocator::new(Some(7));
        let id = ids.next_id();
        assert_eq!(id.len(), ID_LENGTH);
        assert!(id.bytes().all(|b| ID_ALPHABET.contains(&b)));
    }

    #[test]
    fn ids_are_unique_within_a_run() {
        let mut ids = IdAllocator::new(Some(1));
        let drawn = (0..2000).map(|_| ids.next_id()).collect::<HashSet<_>>();
        assert_eq!(drawn.len(), 2000);
    }

    #[test]
    fn same_seed_same_sequence() {
        let mut a = IdAllocator::new(Some(42));
        let mut b = IdAllocator::new(Some(42));
        assert_eq!(a.next_id(), b.next_id());
    }
}
