//! Per-glyph placement groups
//!
//! The machine holds one physical stamp at a time, so every copy of a glyph
//! is pressed before the next tool change. Grouping keeps the first-seen
//! order of symbols and the input order within each group.

use stampkit_core::{Placement, ReinkPolicy};
use std::collections::HashMap;
use tracing::debug;

/// Placements partitioned by symbol
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GlyphGroups {
    groups: Vec<(String, Vec<Placement>)>,
    index: HashMap<String, usize>,
}

impl GlyphGroups {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&mut self, symbol: &str) -> usize {
        if let Some(&slot) = self.index.get(symbol) {
            return slot;
        }
        let slot = self.groups.len();
        self.groups.push((symbol.to_string(), Vec::new()));
        self.index.insert(symbol.to_string(), slot);
        slot
    }

    /// Declare a group without placements
    pub fn declare(&mut self, symbol: &str) {
        self.slot(symbol);
    }

    /// Append a placement to its symbol's group
    pub fn push(&mut self, placement: Placement) {
        let slot = self.slot(&placement.symbol);
        self.groups[slot].1.push(placement);
    }

    pub fn get(&self, symbol: &str) -> Option<&[Placement]> {
        self.index
            .get(symbol)
            .map(|&slot| self.groups[slot].1.as_slice())
    }

    /// Symbol and placements of one group
    pub fn entry(&self, symbol: &str) -> Option<(&str, &[Placement])> {
        self.index.get(symbol).map(|&slot| {
            let (symbol, placements) = &self.groups[slot];
            (symbol.as_str(), placements.as_slice())
        })
    }

    /// Groups in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Placement])> {
        self.groups
            .iter()
            .map(|(symbol, placements)| (symbol.as_str(), placements.as_slice()))
    }

    /// Number of groups, empty ones included
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn placement_count(&self) -> usize {
        self.groups.iter().map(|(_, p)| p.len()).sum()
    }

    /// Distinct symbols in first-seen order
    pub fn symbols(&self) -> Vec<&str> {
        self.groups.iter().map(|(s, _)| s.as_str()).collect()
    }

    /// Concatenate the groups back into one list
    pub fn flatten(&self) -> Vec<Placement> {
        self.groups
            .iter()
            .flat_map(|(_, placements)| placements.iter().cloned())
            .collect()
    }
}

/// Group placements by symbol and assign re-ink flags
///
/// Pinned placements keep their flag and do not advance the alternation.
pub fn group(placements: &[Placement], policy: ReinkPolicy) -> GlyphGroups {
    let mut groups = GlyphGroups::new();
    let mut occurrences: HashMap<String, usize> = HashMap::new();

    for placement in placements {
        let mut placement = placement.clone();
        if !placement.pinned {
            placement.reink = match policy {
                ReinkPolicy::Always => true,
                ReinkPolicy::Never => false,
                ReinkPolicy::Alternate => {
                    let seen = occurrences.entry(placement.symbol.clone()).or_insert(0);
                    let reink = *seen % 2 == 0;
                    *seen += 1;
                    reink
                }
            };
        }
        groups.push(placement);
    }

    debug!(
        "Grouped {} placements into {} tools ({} re-ink)",
        groups.placement_count(),
        groups.len(),
        policy
    );
    groups
}
