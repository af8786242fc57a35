//! Object identifier generation.
//!
//! Every object in a project file is keyed by a 24 digit upper-case hex
//! identifier. Fresh identifiers come from a 128-bit random value, rendered as
//! hex and truncated, and are never handed out twice: the generator starts
//! from the identifiers already present in the project file and remembers
//! everything it issues.

use rand::Rng;
use rand::rngs::ThreadRng;
use std::collections::HashSet;
use std::fmt;
use tracing::debug;

/// Number of hex digits in an object identifier
pub const ID_LEN: usize = 24;

/// A project file object identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectId(String);

impl ObjectId {
    /// Build an identifier from a 128-bit value: lower hex, first 24 digits, upper-cased
    #[must_use]
    pub fn from_random(value: u128) -> Self {
        let hex = format!("{value:032x}");
        Self(hex[..ID_LEN].to_uppercase())
    }

    /// The identifier text
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The two identifiers a new source file needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingIds {
    /// Identifier of the file reference object
    pub file_ref: ObjectId,
    /// Identifier of the build file object (membership in the Sources phase)
    pub build_ref: ObjectId,
}

/// Issues identifiers that collide neither with the project file nor with each other
pub struct IdGenerator<R: Rng = ThreadRng> {
    rng: R,
    taken: HashSet<String>,
}

impl IdGenerator<ThreadRng> {
    /// Create a generator backed by the thread-local CSPRNG
    #[must_use]
    pub fn new(existing: &HashSet<String>) -> Self {
        Self::with_rng(rand::rng(), existing)
    }
}

impl<R: Rng> IdGenerator<R> {
    /// Create a generator with an explicit random source
    pub fn with_rng(rng: R, existing: &HashSet<String>) -> Self {
        Self {
            rng,
            taken: existing.clone(),
        }
    }

    /// Draw a fresh identifier, redrawing on collision
    pub fn next_id(&mut self) -> ObjectId {
        loop {
            let id = ObjectId::from_random(self.rng.random::<u128>());
            if self.taken.insert(id.0.clone()) {
                return id;
            }
            debug!(id = %id, "Object identifier already taken, drawing again");
        }
    }

    /// Draw the file reference and build file identifiers for one file
    pub fn pair(&mut self) -> PendingIds {
        let file_ref = self.next_id();
        let build_ref = self.next_id();
        PendingIds {
            file_ref,
            build_ref,
        }
    }

    /// Number of identifiers known to the generator (existing plus issued)
    #[must_use]
    pub fn taken_count(&self) -> usize {
        self.taken.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_from_random_truncates_and_uppercases() {
        let id = ObjectId::from_random(0x0123_4567_89ab_cdef_0123_4567_89ab_cdef);
        assert_eq!(id.as_str(), "0123456789ABCDEF01234567");
    }

    #[test]
    fn test_from_random_keeps_leading_zeros() {
        let id = ObjectId::from_random(1);
        assert_eq!(id.as_str(), "000000000000000000000000");
        assert_eq!(id.as_str().len(), ID_LEN);
    }

    #[test]
    fn test_generated_ids_are_upper_hex() {
        let mut generator = IdGenerator::new(&HashSet::new());
        for _ in 0..64 {
            let id = generator.next_id();
            assert_eq!(id.as_str().len(), ID_LEN);
            assert!(
                id.as_str()
                    .chars()
                    .all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c))
            );
        }
    }

    #[test]
    fn test_pair_ids_differ() {
        let mut generator = IdGenerator::new(&HashSet::new());
        let ids = generator.pair();
        assert_ne!(ids.file_ref, ids.build_ref);
        assert_eq!(generator.taken_count(), 2);
    }

    #[test]
    fn test_existing_id_is_never_reissued() {
        // Same seed, so the first draw of the second generator would repeat the first id.
        let mut probe = IdGenerator::with_rng(StdRng::seed_from_u64(7), &HashSet::new());
        let first = probe.next_id();

        let existing: HashSet<String> = [first.as_str().to_string()].into_iter().collect();
        let mut generator = IdGenerator::with_rng(StdRng::seed_from_u64(7), &existing);
        let issued = generator.next_id();

        assert_ne!(issued, first);
        assert_eq!(generator.taken_count(), 2);
    }
}
