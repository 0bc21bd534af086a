//! Client-side identifier generation.
//!
//! Document IDs are minted before the write so a new document's ID is
//! known immediately, without waiting for a store round trip. The
//! generator is pluggable so tests can use deterministic sequences.

use std::fmt;

use uuid::Uuid;

/// Mints identifiers for new documents.
pub struct IdGenerator(Box<dyn Fn() -> String + Send + Sync>);

impl IdGenerator {
    /// A generator producing random UUIDv4 identifiers.
    pub fn random() -> Self {
        Self(Box::new(|| Uuid::new_v4().to_string()))
    }

    /// A generator backed by an arbitrary function.
    pub fn from_fn(generate: impl Fn() -> String + Send + Sync + 'static) -> Self {
        Self(Box::new(generate))
    }

    /// Mint a fresh identifier.
    pub fn generate(&self) -> String {
        (self.0)()
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::random()
    }
}

impl fmt::Debug for IdGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("IdGenerator")
    }
}
