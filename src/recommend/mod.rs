//! Recommendation engine: season to colors, outfits, makeup and hair.
//!
//! Everything here is a pure function of the season. The tables live in
//! [`catalog`]; this module turns them into owned, serializable values and
//! pairs outfits from the best colors.

mod catalog;

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::season::Season;
use catalog::{PaletteEntry, Shade};

/// Outfits generated per occasion
pub const OUTFITS_PER_OCCASION: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NamedColor {
    pub name: String,
    /// `#RRGGBB`
    pub hex: String,
}

impl From<&Shade> for NamedColor {
    fn from(shade: &Shade) -> Self {
        Self {
            name: shade.name.to_string(),
            hex: shade.rgb.to_hex(),
        }
    }
}

/// Part a best color plays when outfits are put together
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Role {
    Neutral,
    Accent,
    Statement,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Occasion {
    Professional,
    Casual,
    Formal,
}

impl Occasion {
    pub const ALL: [Occasion; 3] = [Self::Professional, Self::Casual, Self::Formal];
}

impl fmt::Display for Occasion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Professional => "professional",
            Self::Casual => "casual",
            Self::Formal => "formal",
        })
    }
}

/// One anchor neutral worn with one accent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outfit {
    pub occasion: Occasion,
    pub anchor: NamedColor,
    pub accent: NamedColor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MakeupCategory {
    Lip,
    Eye,
    Blush,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub season: Season,
    pub best_colors: Vec<NamedColor>,
    pub avoid_colors: Vec<NamedColor>,
    pub outfits: Vec<Outfit>,
    pub makeup: BTreeMap<MakeupCategory, Vec<NamedColor>>,
    pub hair: Vec<NamedColor>,
    pub color_theory: String,
    pub styling_tips: Vec<String>,
}

/// Build the full recommendation set for a season.
pub fn recommend(season: Season) -> Recommendation {
    let cat = catalog::catalog(season);
    let named = |shades: &[Shade]| shades.iter().map(NamedColor::from).collect::<Vec<_>>();

    let makeup = BTreeMap::from([
        (MakeupCategory::Lip, named(cat.lip)),
        (MakeupCategory::Eye, named(cat.eye)),
        (MakeupCategory::Blush, named(cat.blush)),
    ]);

    let styling_tips = catalog::GENERAL_TIPS
        .iter()
        .chain(cat.tips)
        .map(|t| t.to_string())
        .collect();

    Recommendation {
        season,
        best_colors: cat.best.iter().map(|e| NamedColor::from(&e.shade)).collect(),
        avoid_colors: named(cat.avoid),
        outfits: pair_outfits(cat.best),
        makeup,
        hair: named(cat.hair),
        color_theory: cat.color_theory.to_string(),
        styling_tips,
    }
}

/// Pair anchors with accents per occasion.
///
/// Anchor `i` in round `r` takes accent `(i + r + offset) % len`; casual
/// outfits start one accent further along than professional ones. A pair
/// already used by an earlier occasion is skipped, as is a color paired
/// with itself. Formal outfits put the darkest neutral under the statement
/// colors.
fn pair_outfits(best: &[PaletteEntry]) -> Vec<Outfit> {
    let by_role = |role: Role| best.iter().filter(move |e| e.role == role);
    let lightness = |e: &PaletteEntry| e.shade.rgb.to_hsl().2;

    let mut neutrals: Vec<&PaletteEntry> = by_role(Role::Neutral).collect();
    neutrals.sort_by(|a, b| lightness(*a).total_cmp(&lightness(*b)));
    let accents: Vec<&PaletteEntry> = by_role(Role::Accent).collect();
    let statements: Vec<&PaletteEntry> = by_role(Role::Statement).collect();

    let mut seen: BTreeSet<(&str, &str)> = BTreeSet::new();
    let mut outfits = Vec::new();

    for occasion in Occasion::ALL {
        let (anchors, pool, offset): (Vec<&PaletteEntry>, Vec<&PaletteEntry>, usize) = match occasion {
            // darkest first
            Occasion::Professional => (neutrals.clone(), accents.clone(), 0),
            // lightest first
            Occasion::Casual => (
                neutrals.iter().rev().copied().collect(),
                accents.iter().chain(&statements).copied().collect(),
                1,
            ),
            Occasion::Formal => (
                neutrals.first().copied().into_iter().collect(),
                statements.iter().chain(&accents).copied().collect(),
                0,
            ),
        };
        if anchors.is_empty() || pool.is_empty() {
            continue;
        }

        let mut made = 0;
        'rounds: for round in 0..pool.len() {
            for (i, anchor) in anchors.iter().enumerate() {
                let accent = pool[(i + round + offset) % pool.len()];
                if anchor.shade.rgb == accent.shade.rgb {
                    continue;
                }
                if !seen.insert((anchor.shade.name, accent.shade.name)) {
                    continue;
                }
                outfits.push(Outfit {
                    occasion,
                    anchor: NamedColor::from(&anchor.shade),
                    accent: NamedColor::from(&accent.shade),
                });
                made += 1;
                if made == OUTFITS_PER_OCCASION {
                    break 'rounds;
                }
            }
        }
    }

    outfits
}
