use std::collections::VecDeque;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::catalog::{Catalog, TargetId};

/// Options shown per multiple-choice question: the target plus distractors.
pub const OPTION_COUNT: usize = 4;

/// Every catalog identifier exactly once, in uniformly random order.
pub fn shuffled_queue<R: Rng + ?Sized>(catalog: &Catalog, rng: &mut R) -> VecDeque<TargetId> {
    let mut ids = catalog.ids();
    ids.shuffle(rng);
    ids.into()
}

/// The target and `OPTION_COUNT - 1` distinct distractors, shuffled.
///
/// Distractors are sampled without replacement from the whole catalog minus
/// the target. Repeats across turns are fine.
pub fn choice_options<R: Rng + ?Sized>(
    catalog: &Catalog,
    target: TargetId,
    rng: &mut R,
) -> Vec<TargetId> {
    let pool: Vec<TargetId> = catalog.ids().into_iter().filter(|id| *id != target).collect();

    let mut options: Vec<TargetId> = Vec::with_capacity(OPTION_COUNT);
    options.push(target);
    options.extend(pool.choose_multiple(rng, OPTION_COUNT - 1).copied());
    options.shuffle(rng);
    options
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Section;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    use std::collections::HashSet;

    #[test]
    fn queue_is_a_permutation_of_the_catalog() {
        let catalog = Catalog::load(Section::Alphabet).unwrap();
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..20 {
            let queue = shuffled_queue(&catalog, &mut rng);
            assert_eq!(queue.len(), catalog.len());
            let mut sorted: Vec<TargetId> = queue.into_iter().collect();
            sorted.sort();
            assert_eq!(sorted, catalog.ids());
        }
    }

    #[test]
    fn shuffles_differ_between_draws() {
        let catalog = Catalog::load(Section::Alphabet).unwrap();
        let mut rng = SmallRng::seed_from_u64(42);
        let first = shuffled_queue(&catalog, &mut rng);
        let second = shuffled_queue(&catalog, &mut rng);
        assert_ne!(first, second);
    }

    #[test]
    fn every_position_gets_every_letter_eventually() {
        // Cheap uniformity check: over many shuffles each id reaches the head.
        let catalog = Catalog::load(Section::Numbers).unwrap();
        let mut rng = SmallRng::seed_from_u64(3);
        let mut heads = HashSet::new();
        for _ in 0..2000 {
            if let Some(head) = shuffled_queue(&catalog, &mut rng).front().copied() {
                heads.insert(head);
            }
        }
        assert_eq!(heads.len(), catalog.len());
    }

    #[test]
    fn options_are_four_distinct_ids_including_target() {
        let catalog = Catalog::load(Section::Alphabet).unwrap();
        let mut rng = SmallRng::seed_from_u64(11);
        for target in catalog.ids() {
            let options = choice_options(&catalog, target, &mut rng);
            assert_eq!(options.len(), OPTION_COUNT);
            assert!(options.contains(&target));
            let unique: HashSet<_> = options.iter().collect();
            assert_eq!(unique.len(), OPTION_COUNT);
            assert!(options.iter().all(|id| catalog.get(*id).is_some()));
        }
    }

    #[test]
    fn target_position_varies() {
        let catalog = Catalog::load(Section::Numbers).unwrap();
        let mut rng = SmallRng::seed_from_u64(5);
        let target = TargetId::Number(4);
        let positions: HashSet<usize> = (0..200)
            .filter_map(|_| {
                choice_options(&catalog, target, &mut rng)
                    .iter()
                    .position(|id| *id == target)
            })
            .collect();
        assert_eq!(positions.len(), OPTION_COUNT);
    }
}
