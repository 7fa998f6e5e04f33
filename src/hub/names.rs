//! Human-readable display names for connected clients.

use std::sync::{Mutex, PoisonError};

use rand::seq::SliceRandom;

const FIRST_NAMES: &[&str] = &[
    "Alice", "Bruno", "Carmen", "Dmytro", "Elena", "Felix", "Greta", "Hugo", "Iryna", "Jonas",
    "Karen", "Leon", "Marta", "Nikolai", "Olga", "Pavel", "Quinn", "Rosa", "Stefan", "Tamara",
    "Ulrich", "Vera", "Walter", "Xenia", "Yusuf", "Zoe",
];

const LAST_NAMES: &[&str] = &[
    "Anderson", "Bondarenko", "Carter", "Dubois", "Evans", "Fischer", "Garcia", "Hoffmann",
    "Ivanenko", "Jensen", "Kowalski", "Lopez", "Martin", "Novak", "Olsen", "Petrenko", "Quinlan",
    "Rossi", "Schmidt", "Tkachenko", "Urban", "Varga", "Weber", "Young", "Zielinski",
];

/// Generates "First Last" names. Two consecutive calls never return the
/// same name; names may still repeat across the lifetime of the hub.
#[derive(Debug, Default)]
pub struct NameGenerator {
    last: Mutex<Option<String>>,
}

impl NameGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn generate(&self) -> String {
        let mut rng = rand::thread_rng();
        let mut last = self.last.lock().unwrap_or_else(PoisonError::into_inner);

        let name = loop {
            let first = FIRST_NAMES.choose(&mut rng).copied().unwrap_or("Anonymous");
            let family = LAST_NAMES.choose(&mut rng).copied().unwrap_or("Client");
            let candidate = format!("{first} {family}");
            if last.as_deref() != Some(candidate.as_str()) {
                break candidate;
            }
        };

        *last = Some(name.clone());
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_has_first_and_last() {
        let name = NameGenerator::new().generate();
        let parts: Vec<&str> = name.split(' ').collect();
        assert_eq!(parts.len(), 2);
        assert!(FIRST_NAMES.contains(&parts[0]));
        assert!(LAST_NAMES.contains(&parts[1]));
    }

    #[test]
    fn test_consecutive_names_differ() {
        let generator = NameGenerator::new();
        let mut previous = generator.generate();
        for _ in 0..200 {
            let next = generator.generate();
            assert_ne!(next, previous);
            previous = next;
        }
    }
}
