//! The extracted snapshot value

use std::collections::BTreeSet;

/// A current/maximum pair, as shown for health and magic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Meter {
    pub current: i32,
    pub max: i32,
}

impl Meter {
    /// Fraction of the maximum, `1.0` when the maximum is unusable.
    pub fn ratio(&self) -> f32 {
        if self.max <= 0 {
            return 1.0;
        }
        self.current as f32 / self.max as f32
    }
}

/// Where the character currently is: branch name plus depth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub branch: String,
    pub depth: i32,
}

/// One entry from the visible-monster panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Monster {
    /// The glyph the monster is drawn with on the map.
    pub symbol: char,

    pub name: String,

    /// How many are grouped under this entry (1 for singular entries).
    pub count: u32,

    /// First occurrence of the glyph in the map region, if any, as
    /// (row, col).
    pub position: Option<(u16, u16)>,
}

/// What a context phrase identifies when it appears on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MarkerKind {
    /// Startup banner / game-mode menu.
    Startup,
    NameEntry,
    Species,
    Class,
    Background,
    Skills,
    /// `--more--`: the message buffer wants an acknowledgement.
    MorePrompt,
    /// The optional stat-pick prompt shown on some level-ups.
    AttributeIncrease,
    /// "You have reached level N" message.
    LevelUp,
}

/// A matched context phrase. The exact phrase is kept because the menu
/// machine breaks ties by phrase length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerHit {
    pub kind: MarkerKind,
    pub phrase: String,
}

/// Everything the extractor learned from one snapshot.
///
/// Built fresh every cycle and never mutated; decisions are always made
/// from the latest complete reconstruction.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExtractedState {
    pub health: Option<Meter>,
    pub mana: Option<Meter>,

    /// Experience level.
    pub level: Option<i32>,

    pub location: Option<Location>,

    /// The `@` glyph inside the map region, as (row, col).
    pub player: Option<(u16, u16)>,

    /// Visible monsters in the order the panel lists them. That order is
    /// the tie-break when more than one is present.
    pub monsters: Vec<Monster>,

    pub markers: Vec<MarkerHit>,

    /// A death or victory phrase is on screen.
    pub game_over: bool,
}

impl ExtractedState {
    pub fn has_marker(&self, kind: MarkerKind) -> bool {
        self.markers.iter().any(|hit| hit.kind == kind)
    }

    /// The set of marker kinds present, used for stuck detection.
    pub fn marker_kinds(&self) -> BTreeSet<MarkerKind> {
        self.markers.iter().map(|hit| hit.kind).collect()
    }
}
