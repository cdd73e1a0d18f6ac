//! Seasonal palette lookup.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::classify::{Classification, ToneCategory, Undertone};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
}

impl Season {
    pub const ALL: [Season; 4] = [Self::Spring, Self::Summer, Self::Autumn, Self::Winter];

    pub fn label(self) -> &'static str {
        match self {
            Self::Spring => "Spring",
            Self::Summer => "Summer",
            Self::Autumn => "Autumn",
            Self::Winter => "Winter",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Rows follow `ToneCategory`, columns follow `Undertone` (Cool, Warm, Neutral).
///
/// Light skin reads as Summer (cool) or Spring (warm), deeper skin as Winter
/// (cool) or Autumn (warm). Neutral undertones borrow the softer, muted
/// season of their depth: Summer when light, Autumn when deep.
pub const SEASON_TABLE: [[Season; 3]; 4] = {
    use Season::*;
    [
        [Summer, Spring, Summer], // VeryLight
        [Summer, Spring, Summer], // Light
        [Winter, Autumn, Autumn], // Medium
        [Winter, Autumn, Autumn], // Dark
    ]
};

pub fn season_for(tone: ToneCategory, undertone: Undertone) -> Season {
    let row = match tone {
        ToneCategory::VeryLight => 0,
        ToneCategory::Light => 1,
        ToneCategory::Medium => 2,
        ToneCategory::Dark => 3,
    };
    let col = match undertone {
        Undertone::Cool => 0,
        Undertone::Warm => 1,
        Undertone::Neutral => 2,
    };
    SEASON_TABLE[row][col]
}

pub fn map(classification: &Classification) -> Season {
    season_for(classification.tone_category, classification.undertone)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::ColorTemperature;
    use std::collections::{BTreeMap, BTreeSet};

    #[test]
    fn test_table_covers_every_pair_once() {
        let mut seen = BTreeMap::new();
        for tone in ToneCategory::ALL {
            for undertone in Undertone::ALL {
                assert!(seen.insert((tone, undertone), season_for(tone, undertone)).is_none());
            }
        }
        assert_eq!(seen.len(), 12);

        let reached: BTreeSet<Season> = seen.values().copied().collect();
        assert_eq!(reached.len(), Season::ALL.len());
    }

    #[test]
    fn test_known_pairs() {
        assert_eq!(season_for(ToneCategory::VeryLight, Undertone::Warm), Season::Spring);
        assert_eq!(season_for(ToneCategory::Light, Undertone::Cool), Season::Summer);
        assert_eq!(season_for(ToneCategory::Dark, Undertone::Warm), Season::Autumn);
        assert_eq!(season_for(ToneCategory::Medium, Undertone::Cool), Season::Winter);
        assert_eq!(season_for(ToneCategory::Dark, Undertone::Neutral), Season::Autumn);
    }

    #[test]
    fn test_map_uses_classification_labels_only() {
        let c = Classification {
            tone_category: ToneCategory::Light,
            undertone: Undertone::Warm,
            temperature: ColorTemperature::NeutralCool,
            confidence: 0.1,
        };
        assert_eq!(map(&c), Season::Spring);
        assert_eq!(map(&Classification { confidence: 0.9, ..c.clone() }), Season::Spring);
        assert_eq!(map(&Classification { temperature: ColorTemperature::Warm, ..c }), Season::Spring);
    }
}
