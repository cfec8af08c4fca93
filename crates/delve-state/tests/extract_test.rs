//! Extractor integration: a realistic full-screen fixture, idempotence,
//! and the denylist guarantees.

use delve_state::{ExtractConfig, Extractor, MarkerKind, Region};
use pretty_assertions::assert_eq;

const COLS: usize = 160;
const ROWS: usize = 40;

/// Build a full-size screen: (row, col, text) placements on a blank grid,
/// the way the reconstruction layer renders it — every row exactly
/// `COLS` wide, trailing blanks preserved.
fn screen(placements: &[(usize, usize, &str)]) -> Vec<String> {
    let mut rows = vec![vec![' '; COLS]; ROWS];
    for &(row, col, text) in placements {
        for (i, ch) in text.chars().enumerate() {
            rows[row][col + i] = ch;
        }
    }
    rows.into_iter().map(|r| r.into_iter().collect()).collect()
}

fn extractor() -> Extractor {
    let cfg = ExtractConfig {
        map_region: Region::new(0, 28, 0, 80),
        monster_panel: Region::new(10, 32, 80, 160),
        ..ExtractConfig::default()
    };
    Extractor::new(cfg).unwrap()
}

/// A mid-game screen: map on the left, stats panel on the right, monster
/// list under the stats, message log at the bottom.
fn gameplay_screen() -> Vec<String> {
    screen(&[
        (2, 10, "########"),
        (3, 10, "#......#"),
        (4, 10, "#.g.@..#"),
        (5, 10, "########"),
        (1, 85, "Wenzel the Chopper"),
        (2, 85, "Health: 14/23"),
        (3, 85, "Magic:  0/2"),
        (4, 85, "AC:  3     Str: 17"),
        (5, 85, "EV: 11     Int:  6"),
        (6, 85, "XL:   4 Next: 22%"),
        (7, 85, "Noise:     D:3"),
        (12, 85, "g   goblin"),
        (13, 85, "kk  2 kobolds"),
        (35, 2, "Found 31 gold pieces."),
        (36, 2, "You see here a hunting sling."),
    ])
}

#[test]
fn gameplay_screen_extracts_every_field() {
    let state = extractor().extract(&gameplay_screen());

    let health = state.health.unwrap();
    assert_eq!((health.current, health.max), (14, 23));
    let mana = state.mana.unwrap();
    assert_eq!((mana.current, mana.max), (0, 2));
    assert_eq!(state.level, Some(4));

    let location = state.location.unwrap();
    assert_eq!(location.branch, "D");
    assert_eq!(location.depth, 3);

    assert_eq!(state.player, Some((4, 14)));

    let names: Vec<&str> = state.monsters.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["goblin", "kobolds"]);
    assert_eq!(state.monsters[0].symbol, 'g');
    assert_eq!(state.monsters[0].position, Some((4, 12)));
    assert_eq!(state.monsters[1].count, 2);

    assert!(!state.game_over);
    assert!(state.markers.is_empty());
}

#[test]
fn extraction_is_idempotent() {
    let ex = extractor();
    let rows = gameplay_screen();
    assert_eq!(ex.extract(&rows), ex.extract(&rows));
}

#[test]
fn message_fragments_in_the_panel_are_not_monsters() {
    // The message log shape can leak into the panel region when the game
    // draws prompts over it; the denylist keeps them out.
    let rows = screen(&[
        (12, 85, "Found a dagger"),
        (14, 85, "You   have escaped the webs"),
    ]);
    let state = extractor().extract(&rows);
    assert!(state.monsters.is_empty());
}

#[test]
fn panel_monster_is_detected_among_fragments() {
    let rows = screen(&[
        (11, 85, "Found a dagger"),
        (12, 85, "g   goblin"),
    ]);
    let state = extractor().extract(&rows);
    let names: Vec<&str> = state.monsters.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["goblin"]);
}

#[test]
fn creation_screen_reports_markers_not_monsters() {
    let rows = screen(&[
        (5, 30, "Please select your species."),
        (20, 30, "a - Armataur            j - Human"),
    ]);
    let state = extractor().extract(&rows);
    assert!(state.has_marker(MarkerKind::Species));
    assert_eq!(state.health, None);
}

#[test]
fn more_prompt_is_reported_during_gameplay() {
    let mut placements = vec![(2usize, 85usize, "Health: 9/23")];
    placements.push((35, 2, "The goblin hits you! --more--"));
    let rows = screen(&placements);
    let state = extractor().extract(&rows);
    assert!(state.has_marker(MarkerKind::MorePrompt));
    assert_eq!(state.health.map(|m| m.current), Some(9));
}
