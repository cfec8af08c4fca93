//! Extraction configuration
//!
//! Screen regions, denylists and marker phrases are data handed to the
//! extractor, not behavior: swapping a phrase or widening a region never
//! touches rule code. Defaults match the target game's 160x40 layout.

use crate::state::MarkerKind;

/// A rectangular slice of the screen; rows `top..bottom`, columns
/// `left..right` (half-open). Clamped against the actual grid when
/// applied, so a smaller test grid is fine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub top: u16,
    pub bottom: u16,
    pub left: u16,
    pub right: u16,
}

impl Region {
    pub fn new(top: u16, bottom: u16, left: u16, right: u16) -> Self {
        Self {
            top,
            bottom,
            left,
            right,
        }
    }
}

/// One context phrase and the marker it identifies.
#[derive(Debug, Clone)]
pub struct MarkerPhrase {
    pub kind: MarkerKind,
    pub phrase: &'static str,
}

const fn marker(kind: MarkerKind, phrase: &'static str) -> MarkerPhrase {
    MarkerPhrase { kind, phrase }
}

#[derive(Debug, Clone)]
pub struct ExtractConfig {
    /// Where the visible-monster panel lives.
    pub monster_panel: Region,

    /// Where the dungeon map (and the `@` glyph) lives.
    pub map_region: Region,

    /// Status labels that look like `Branch:depth` but are not locations.
    pub stat_labels: Vec<&'static str>,

    /// Panel entries whose "name" is one of these are message fragments
    /// or HUD labels, never monsters.
    pub name_denylist: Vec<&'static str>,

    /// Leading words that mark a grouped-entry match as a message
    /// fragment ("Found 19 stones") rather than a monster group.
    pub word_denylist: Vec<&'static str>,

    /// Context phrases, matched case-insensitively as substrings. All
    /// hits are reported; precedence is the menu machine's concern.
    pub markers: Vec<MarkerPhrase>,

    /// Death and victory phrases, matched verbatim.
    pub game_over_phrases: Vec<&'static str>,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            monster_panel: Region::new(10, 32, 80, 160),
            map_region: Region::new(0, 28, 0, 80),
            stat_labels: vec![
                "health", "hp", "magic", "mp", "ac", "ev", "sh", "xl", "str", "int", "dex",
                "next", "time", "gold", "place", "noise", "wp", "qv", "exp",
            ],
            name_denylist: vec![
                "place", "noise", "time", "ac", "ev", "sh", "xl", "next", "magic", "health",
                "str", "int", "dex", "gold", "a", "an", "the", "o", "b",
            ],
            word_denylist: vec![
                "found", "you", "the", "this", "that", "your", "there", "and", "are", "but",
                "can", "for", "have", "here", "will", "with", "what", "when",
            ],
            markers: vec![
                marker(MarkerKind::NameEntry, "enter your name"),
                marker(MarkerKind::Startup, "choose game seed"),
                marker(MarkerKind::Startup, "hints mode"),
                marker(MarkerKind::Startup, "dungeon sprint"),
                marker(MarkerKind::Startup, "tutorial"),
                marker(MarkerKind::Species, "please select your species"),
                marker(MarkerKind::Species, "select your species"),
                marker(MarkerKind::Species, "select your ancestry"),
                marker(MarkerKind::Species, "which species"),
                marker(MarkerKind::Class, "please select your class"),
                marker(MarkerKind::Class, "select your class"),
                marker(MarkerKind::Class, "choose a job"),
                marker(MarkerKind::Class, "choose your job"),
                marker(MarkerKind::Class, "which class"),
                marker(MarkerKind::Background, "please select your background"),
                marker(MarkerKind::Background, "select your background"),
                marker(MarkerKind::Background, "religious choice"),
                marker(MarkerKind::Skills, "you have a choice of weapons"),
                marker(MarkerKind::Skills, "choice of weapons"),
                marker(MarkerKind::Skills, "skill aptitudes"),
                marker(MarkerKind::Skills, "select your skills"),
                marker(MarkerKind::MorePrompt, "--more--"),
                marker(MarkerKind::AttributeIncrease, "increase (s)trength"),
                marker(MarkerKind::LevelUp, "you have reached level"),
                marker(MarkerKind::LevelUp, "you reach level"),
            ],
            game_over_phrases: vec![
                "You die",
                "You are dead",
                "You have escaped",
                "Well done!",
                "Congratulations",
                "Goodbye,",
            ],
        }
    }
}
