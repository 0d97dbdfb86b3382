//! Random words used to hash a position for opening-book lookups.
//!
//! Laid out the way the Polyglot format expects: 768 piece-on-square words,
//! 4 castling-right words, 8 en-passant-file words, and one side-to-move
//! word (indices 0..768, 768..772, 772..780, 780).

use once_cell::sync::Lazy;
use rand::{RngCore, SeedableRng, rngs::StdRng};

const BOOK_HASH_SEED: u64 = 0x626F_6F6B_5F68_6173;

pub static POLYGLOT_RANDOMS: Lazy<[u64; 781]> = Lazy::new(|| {
    let mut rng = StdRng::seed_from_u64(BOOK_HASH_SEED);
    let mut words = [0u64; 781];
    for w in words.iter_mut() {
        *w = rng.next_u64();
    }
    words
});
