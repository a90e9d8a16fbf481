use proptest::prelude::*;
use stampkit_camtools::group;
use stampkit_core::{Placement, ReinkPolicy};

fn placements(symbols: &[u8]) -> Vec<Placement> {
    symbols
        .iter()
        .enumerate()
        .map(|(i, s)| Placement::new(((b'A' + s) as char).to_string(), i as f64, 0.0))
        .collect()
}

proptest! {
    #[test]
    fn prop_groups_partition_placements(symbols in prop::collection::vec(0u8..5, 0..60)) {
        let input = placements(&symbols);
        let groups = group(&input, ReinkPolicy::Always);

        prop_assert_eq!(groups.placement_count(), input.len());
        for (symbol, members) in groups.iter() {
            prop_assert!(members.iter().all(|p| p.symbol == symbol));
            // order inside a group follows the input
            prop_assert!(members.windows(2).all(|w| w[0].x < w[1].x));
        }

        let mut flattened: Vec<f64> = groups.flatten().iter().map(|p| p.x).collect();
        flattened.sort_by(|a, b| a.partial_cmp(b).unwrap());
        let expected: Vec<f64> = input.iter().map(|p| p.x).collect();
        prop_assert_eq!(flattened, expected);
    }

    #[test]
    fn prop_alternate_reinks_every_other_press(symbols in prop::collection::vec(0u8..3, 1..40)) {
        let groups = group(&placements(&symbols), ReinkPolicy::Alternate);
        for (_, members) in groups.iter() {
            for (i, p) in members.iter().enumerate() {
                prop_assert_eq!(p.reink, i % 2 == 0);
            }
        }
    }
}
