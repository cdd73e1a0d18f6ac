//! Curated per-season color tables.

use crate::color::Rgb;
use crate::season::Season;

use super::Role;

#[derive(Debug, Clone, Copy)]
pub(crate) struct Shade {
    pub name: &'static str,
    pub rgb: Rgb,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct PaletteEntry {
    pub shade: Shade,
    pub role: Role,
}

pub(crate) struct SeasonCatalog {
    pub best: &'static [PaletteEntry],
    pub avoid: &'static [Shade],
    pub lip: &'static [Shade],
    pub eye: &'static [Shade],
    pub blush: &'static [Shade],
    pub hair: &'static [Shade],
    pub color_theory: &'static str,
    pub tips: &'static [&'static str],
}

const fn s(name: &'static str, r: u8, g: u8, b: u8) -> Shade {
    Shade {
        name,
        rgb: Rgb::new(r, g, b),
    }
}

const fn neutral(name: &'static str, r: u8, g: u8, b: u8) -> PaletteEntry {
    PaletteEntry {
        shade: s(name, r, g, b),
        role: Role::Neutral,
    }
}

const fn accent(name: &'static str, r: u8, g: u8, b: u8) -> PaletteEntry {
    PaletteEntry {
        shade: s(name, r, g, b),
        role: Role::Accent,
    }
}

const fn statement(name: &'static str, r: u8, g: u8, b: u8) -> PaletteEntry {
    PaletteEntry {
        shade: s(name, r, g, b),
        role: Role::Statement,
    }
}

/// Tips that apply to every season, emitted before the seasonal ones
pub(crate) const GENERAL_TIPS: &[&str] = &[
    "Choose colors for your undertone first and your skin depth second.",
    "Test colors near your face in natural daylight before buying.",
    "Professional settings usually call for your neutrals with a single accent.",
    "Experiment with different shades inside your recommended families.",
];

pub(crate) fn catalog(season: Season) -> &'static SeasonCatalog {
    match season {
        Season::Spring => &SPRING,
        Season::Summer => &SUMMER,
        Season::Autumn => &AUTUMN,
        Season::Winter => &WINTER,
    }
}

static SPRING: SeasonCatalog = SeasonCatalog {
    best: &[
        neutral("Ivory", 0xFF, 0xFF, 0xF0),
        neutral("Warm Beige", 0xE8, 0xD3, 0xB0),
        neutral("Camel", 0xC1, 0x9A, 0x6B),
        neutral("Golden Brown", 0x99, 0x65, 0x15),
        accent("Coral", 0xFF, 0x7F, 0x50),
        accent("Peach", 0xFF, 0xCB, 0xA4),
        accent("Warm Turquoise", 0x30, 0xD5, 0xC8),
        accent("Golden Yellow", 0xFF, 0xDF, 0x00),
        accent("Apple Green", 0x8D, 0xB6, 0x00),
        statement("Poppy Red", 0xE3, 0x53, 0x35),
        statement("Tomato Red", 0xFF, 0x63, 0x47),
    ],
    avoid: &[
        s("Black", 0x00, 0x00, 0x00),
        s("Charcoal", 0x36, 0x45, 0x4F),
        s("Burgundy", 0x80, 0x00, 0x20),
        s("Icy Grey", 0xD9, 0xDE, 0xE2),
        s("Dusty Mauve", 0xB4, 0x84, 0x8C),
    ],
    lip: &[
        s("Coral", 0xFF, 0x63, 0x47),
        s("Warm Pink", 0xF0, 0x80, 0x80),
        s("Peach Nude", 0xE5, 0xA1, 0x86),
    ],
    eye: &[
        s("Sandy Brown", 0xF4, 0xA4, 0x60),
        s("Peru", 0xCD, 0x85, 0x3F),
        s("Soft Gold", 0xD4, 0xAF, 0x37),
    ],
    blush: &[
        s("Light Salmon", 0xFF, 0xA0, 0x7A),
        s("Peach", 0xFF, 0xCB, 0xA4),
    ],
    hair: &[
        s("Golden Blonde", 0xDA, 0xA5, 0x20),
        s("Honey Blonde", 0xCD, 0x85, 0x3F),
        s("Strawberry Blonde", 0xD2, 0xA6, 0x79),
        s("Light Golden Brown", 0xA6, 0x7B, 0x5B),
    ],
    color_theory: "Spring coloring is warm and light: golden, peachy skin that glows in clear, \
                   warm colors with a yellow base. Heavy, dark or greyed shades drain it.",
    tips: &[
        "Gold jewelry flatters warm undertones more than silver.",
        "Look for shades described as golden, honey or peach.",
        "Orange-based reds and corals are especially flattering.",
        "Swap black for camel or golden brown as your darkest neutral.",
    ],
};

static SUMMER: SeasonCatalog = SeasonCatalog {
    best: &[
        neutral("Soft White", 0xF5, 0xF5, 0xF0),
        neutral("Taupe Grey", 0x8B, 0x85, 0x89),
        neutral("Cool Grey", 0x8C, 0x92, 0xAC),
        neutral("Greyed Navy", 0x4A, 0x5A, 0x75),
        accent("Powder Blue", 0xB0, 0xE0, 0xE6),
        accent("Lavender", 0xB5, 0x7E, 0xDC),
        accent("Rose Pink", 0xF4, 0xA6, 0xC1),
        accent("Periwinkle", 0xCC, 0xCC, 0xFF),
        accent("Seafoam", 0x93, 0xE9, 0xBE),
        statement("Raspberry", 0xE3, 0x0B, 0x5C),
        statement("Plum", 0x8E, 0x45, 0x85),
    ],
    avoid: &[
        s("Orange", 0xFF, 0x8C, 0x00),
        s("Mustard", 0xFF, 0xDB, 0x58),
        s("Rust", 0xB7, 0x41, 0x0E),
        s("Camel", 0xC1, 0x9A, 0x6B),
        s("Black", 0x00, 0x00, 0x00),
    ],
    lip: &[
        s("Dusty Rose", 0xC0, 0x80, 0x81),
        s("Raspberry", 0xB3, 0x44, 0x6C),
        s("Soft Berry", 0xA0, 0x52, 0x6D),
    ],
    eye: &[
        s("Slate Gray", 0x70, 0x80, 0x90),
        s("Lavender Grey", 0xC4, 0xC3, 0xD0),
        s("Slate Blue", 0x6A, 0x5A, 0xCD),
    ],
    blush: &[
        s("Light Pink", 0xFF, 0xB6, 0xC1),
        s("Soft Rose", 0xE8, 0xA0, 0xB4),
    ],
    hair: &[
        s("Platinum", 0xE5, 0xE4, 0xE2),
        s("Ash Blonde", 0xB2, 0xA2, 0x8A),
        s("Ash Light Brown", 0x8B, 0x73, 0x55),
        s("Cool Brown", 0x5B, 0x4A, 0x42),
    ],
    color_theory: "Summer coloring is cool and soft: pink or rosy skin with blue undertones \
                   that suits muted, powdery colors with a blue base. Bright oranges and \
                   yellows overpower it.",
    tips: &[
        "Silver, white gold and pearls flatter cool undertones.",
        "Look for shades described as dusty, powder or ash.",
        "Blue-based pinks and soft berries are especially flattering.",
        "Tonal outfits in blended shades read more polished than high contrast.",
    ],
};

static AUTUMN: SeasonCatalog = SeasonCatalog {
    best: &[
        neutral("Cream", 0xFF, 0xFD, 0xD0),
        neutral("Khaki", 0xC3, 0xB0, 0x91),
        neutral("Camel", 0xC1, 0x9A, 0x6B),
        neutral("Chocolate Brown", 0x5C, 0x33, 0x17),
        accent("Terracotta", 0xE2, 0x72, 0x5B),
        accent("Mustard", 0xE1, 0xAD, 0x01),
        accent("Moss Green", 0x8A, 0x9A, 0x5B),
        accent("Burnt Orange", 0xCC, 0x55, 0x00),
        accent("Teal", 0x00, 0x80, 0x80),
        statement("Rust", 0xB7, 0x41, 0x0E),
        statement("Brick Red", 0xCB, 0x41, 0x54),
    ],
    avoid: &[
        s("Icy Pink", 0xF8, 0xC8, 0xDC),
        s("Fuchsia", 0xFF, 0x00, 0xFF),
        s("Silver Grey", 0xC0, 0xC0, 0xC0),
        s("Royal Blue", 0x41, 0x69, 0xE1),
        s("Pure White", 0xFF, 0xFF, 0xFF),
    ],
    lip: &[
        s("Brick", 0xCB, 0x41, 0x54),
        s("Terracotta", 0xE2, 0x72, 0x5B),
        s("Nude Brown", 0xCD, 0x85, 0x3F),
    ],
    eye: &[
        s("Chocolate", 0xD2, 0x69, 0x1E),
        s("Bronze", 0xCD, 0x7F, 0x32),
        s("Olive", 0x70, 0x82, 0x38),
    ],
    blush: &[
        s("Salmon", 0xFA, 0x80, 0x72),
        s("Apricot", 0xFB, 0xCE, 0xB1),
    ],
    hair: &[
        s("Auburn", 0xA0, 0x52, 0x2D),
        s("Copper", 0xB8, 0x73, 0x33),
        s("Chestnut Brown", 0x8B, 0x45, 0x13),
        s("Dark Golden Brown", 0x5C, 0x40, 0x33),
    ],
    color_theory: "Autumn coloring is warm and deep: golden, olive or bronze skin that suits \
                   rich, earthy colors with a yellow base. Icy pastels and stark white wash it out.",
    tips: &[
        "Gold, brass and copper jewelry flatter warm undertones.",
        "Look for shades described as spiced, earthy or caramel.",
        "Layer textures in the same earthy family for depth.",
        "Use cream instead of pure white near the face.",
    ],
};

static WINTER: SeasonCatalog = SeasonCatalog {
    best: &[
        neutral("Pure White", 0xFF, 0xFF, 0xFF),
        neutral("Charcoal", 0x36, 0x45, 0x4F),
        neutral("Navy", 0x00, 0x00, 0x80),
        neutral("Black", 0x00, 0x00, 0x00),
        accent("Royal Blue", 0x41, 0x69, 0xE1),
        accent("Emerald", 0x00, 0x9B, 0x77),
        accent("Icy Pink", 0xF8, 0xC8, 0xDC),
        accent("Icy Blue", 0xD0, 0xE6, 0xF5),
        accent("Amethyst", 0x99, 0x66, 0xCC),
        statement("True Red", 0xCC, 0x00, 0x00),
        statement("Fuchsia", 0xFF, 0x00, 0xFF),
    ],
    avoid: &[
        s("Orange", 0xFF, 0x8C, 0x00),
        s("Gold", 0xD4, 0xAF, 0x37),
        s("Camel", 0xC1, 0x9A, 0x6B),
        s("Peach", 0xFF, 0xCB, 0xA4),
        s("Olive", 0x80, 0x80, 0x00),
    ],
    lip: &[
        s("Cherry Red", 0xDC, 0x14, 0x3C),
        s("Deep Pink", 0xC7, 0x15, 0x85),
        s("Berry", 0x8B, 0x00, 0x8B),
    ],
    eye: &[
        s("Indigo", 0x4B, 0x00, 0x82),
        s("Charcoal", 0x36, 0x45, 0x4F),
        s("Silver", 0xC0, 0xC0, 0xC0),
    ],
    blush: &[
        s("Hot Pink", 0xFF, 0x69, 0xB4),
        s("Cool Pink", 0xE7, 0x54, 0x80),
    ],
    hair: &[
        s("Jet Black", 0x0A, 0x0A, 0x0A),
        s("Espresso", 0x3C, 0x22, 0x18),
        s("Ash Brown", 0x2F, 0x1B, 0x14),
        s("Burgundy Black", 0x3B, 0x0A, 0x1E),
    ],
    color_theory: "Winter coloring is cool and deep: skin with blue or pink undertones and \
                   strong contrast that suits clear, saturated colors with a blue base. Muted \
                   earth tones look flat against it.",
    tips: &[
        "Silver and platinum jewelry flatter cool undertones.",
        "Look for shades described as icy, jewel or true.",
        "High contrast pairings like black with white suit you.",
        "Blue-based reds are especially flattering.",
    ],
};
