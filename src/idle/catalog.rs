//! Ordered set of ambient animations the idle controller may pick from.
use rand::{seq::SliceRandom, RngCore};

use crate::host::AnimationId;

pub const DEFAULT_ANIMATIONS: [&str; 5] = [
    "idle_stretch",
    "idle_look_around",
    "idle_check_phone",
    "idle_dance",
    "idle_wave",
];

/// Immutable for the lifetime of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimationCatalog {
    animations: Vec<AnimationId>,
}

impl AnimationCatalog {
    /// Builds a catalog, trimming names and dropping blanks and repeats.
    /// Falls back to the defaults when nothing usable remains.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut animations: Vec<AnimationId> = Vec::new();
        for name in names {
            let name = name.as_ref().trim();
            if name.is_empty() || animations.iter().any(|known| known.as_str() == name) {
                continue;
            }
            animations.push(AnimationId::new(name));
        }

        if animations.is_empty() {
            return Self::default();
        }
        Self { animations }
    }

    /// Uniformly random pick.
    pub fn choose(&self, rng: &mut dyn RngCore) -> Option<&AnimationId> {
        self.animations.choose(rng)
    }

    pub fn contains(&self, id: &AnimationId) -> bool {
        self.animations.contains(id)
    }

    pub fn len(&self) -> usize {
        self.animations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.animations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AnimationId> {
        self.animations.iter()
    }
}

impl Default for AnimationCatalog {
    fn default() -> Self {
        Self {
            animations: DEFAULT_ANIMATIONS.iter().map(|name| AnimationId::new(*name)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    #[test]
    fn normalises_names_and_keeps_order() {
        let catalog = AnimationCatalog::new([" wave ", "", "dance", "wave"]);
        let names: Vec<&str> = catalog.iter().map(AnimationId::as_str).collect();
        assert_eq!(names, vec!["wave", "dance"]);
    }

    #[test]
    fn empty_list_falls_back_to_defaults() {
        let catalog = AnimationCatalog::new(Vec::<String>::new());
        assert_eq!(catalog, AnimationCatalog::default());
        assert_eq!(catalog.len(), DEFAULT_ANIMATIONS.len());
    }

    #[test]
    fn selection_covers_every_animation() {
        let catalog = AnimationCatalog::default();
        let mut rng = StdRng::seed_from_u64(7);
        let mut counts: HashMap<String, usize> = HashMap::new();

        for _ in 0..5_000 {
            let picked = catalog.choose(&mut rng).expect("catalog is never empty");
            *counts.entry(picked.as_str().to_string()).or_default() += 1;
        }

        assert_eq!(counts.len(), catalog.len());
        for count in counts.values() {
            // 1000 expected per bucket; allow generous slack.
            assert!((800..1200).contains(count), "skewed bucket: {}", count);
        }
    }

    #[test]
    fn same_seed_same_sequence() {
        let catalog = AnimationCatalog::default();
        let mut first = StdRng::seed_from_u64(99);
        let mut second = StdRng::seed_from_u64(99);

        for _ in 0..20 {
            assert_eq!(catalog.choose(&mut first), catalog.choose(&mut second));
        }
    }
}
