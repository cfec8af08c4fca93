//! End-to-end scenarios across the reconstruction, extraction, and
//! decision layers — the same path a live session takes, minus the PTY.

use delve::SessionConfig;
use delve_engine::{Engine, Outcome};
use delve_state::Extractor;
use delve_terminal::{Parser, TermOp, Terminal};
use pretty_assertions::assert_eq;

fn harness() -> (Terminal, Extractor, Engine) {
    let cfg = SessionConfig {
        rows: 40,
        cols: 160,
        rest_threshold: 0.5,
        ..SessionConfig::default()
    };
    (
        Terminal::new(cfg.rows, cfg.cols).unwrap(),
        Extractor::new(cfg.extract_config()).unwrap(),
        Engine::new(cfg.engine_config()),
    )
}

fn command(outcome: Outcome) -> delve_engine::Action {
    match outcome {
        Outcome::Command(action) => action,
        other => panic!("expected a command, got {other:?}"),
    }
}

#[test]
fn positioned_vitals_print_extracts_the_meter() {
    let (mut terminal, extractor, _) = harness();

    // One delta chunk: park the cursor at row 5, column 4 and write the
    // HUD line, exactly as the game updates its status area.
    terminal.process(b"\x1b[6;5HHealth: 12/20");

    let state = extractor.extract(&terminal.render_text());
    let health = state.health.expect("health should be extracted");
    assert_eq!((health.current, health.max), (12, 20));
}

#[test]
fn low_health_and_no_threat_rests() {
    let (mut terminal, extractor, mut engine) = harness();

    terminal.process(b"\x1b[2J\x1b[1;1HHealth: 6/20  Magic: 2/2");
    let state = extractor.extract(&terminal.render_text());

    // Health ratio 0.3 against a 0.5 threshold, nothing hostile listed.
    let action = command(engine.next(&state).unwrap());
    assert_eq!(action.input, "5");
    assert!(action.reason.contains("resting"), "reason: {}", action.reason);
}

#[test]
fn species_screen_yields_the_species_selection() {
    let (mut terminal, extractor, mut engine) = harness();

    terminal.process(b"\x1b[2J\x1b[3;10HPlease select your species.");
    let state = extractor.extract(&terminal.render_text());

    let action = command(engine.next(&state).unwrap());
    assert_eq!(action.input, "j");
    assert!(action.reason.contains("species"), "reason: {}", action.reason);
}

#[test]
fn escape_sequence_split_across_chunks_still_moves_the_cursor() {
    let mut parser = Parser::new();

    // The transport may hand over a chunk that ends mid-sequence; the
    // next chunk completes it and exactly one move comes out.
    let mut ops = parser.advance(b"\x1b[12;");
    ops.extend(parser.advance(b"34H"));

    assert_eq!(ops, vec![TermOp::MoveCursor { row: 11, col: 33 }]);
}

#[test]
fn monster_panel_entry_triggers_evasion_end_to_end() {
    let (mut terminal, extractor, mut engine) = harness();

    // HUD plus a monster panel entry in the right half of the screen.
    terminal.process(b"\x1b[2J\x1b[1;90HHealth: 20/20");
    terminal.process(b"\x1b[12;90Hg   goblin");
    let state = extractor.extract(&terminal.render_text());
    assert_eq!(state.monsters.len(), 1);

    let action = command(engine.next(&state).unwrap());
    assert_eq!(action.input, "h");
    assert!(action.reason.contains("goblin"), "reason: {}", action.reason);
}
