//! Short code generation.
//!
//! Codes are 6 symbols drawn independently and uniformly from a 62-symbol
//! alphabet, giving 62^6 (about 5.68e10) possible codes. Codes are not secrets,
//! so a fast thread-local RNG is used rather than the OS entropy source.

use rand::Rng;

/// Symbols a short code may contain.
pub const ALPHABET: &[u8; 62] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Number of symbols in every short code.
pub const CODE_LENGTH: usize = 6;

/// Produces candidate short codes.
///
/// Implementations are pure and never touch storage; uniqueness is settled
/// by the allocation service against the durable store.
pub trait CodeGenerator: Send + Sync {
    /// Returns a well-formed candidate code. Must not fail.
    fn generate(&self) -> String;
}

/// Uniform random generator backed by the thread-local RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomCodeGenerator;

impl CodeGenerator for RandomCodeGenerator {
    fn generate(&self) -> String {
        let mut rng = rand::rng();

        (0..CODE_LENGTH)
            .map(|_| {
                let idx = rng.random_range(0..ALPHABET.len());
                ALPHABET[idx] as char
            })
            .collect()
    }
}

/// Codes that collide with fixed routes and must never be allocated.
pub const RESERVED_CODES: &[&str] = &["health"];

/// Returns true if `code` is shadowed by a fixed route.
pub fn is_reserved(code: &str) -> bool {
    RESERVED_CODES.contains(&code)
}

/// Returns true if `code` has the exact shape of a generated code.
///
/// Anything else can never have been allocated, so lookups may reject it
/// without consulting the cache or the store.
pub fn is_well_formed(code: &str) -> bool {
    code.len() == CODE_LENGTH && code.bytes().all(|b| ALPHABET.contains(&b))
}
