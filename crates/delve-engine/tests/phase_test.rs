use delve_engine::{Engine, EngineConfig, Outcome, Phase};
use delve_state::{ExtractedState, MarkerHit, MarkerKind, Meter};

fn hit(kind: MarkerKind, phrase: &str) -> MarkerHit {
    MarkerHit {
        kind,
        phrase: phrase.to_string(),
    }
}

#[test]
fn creation_markers_move_startup_to_creation() {
    let mut engine = Engine::new(EngineConfig::default());
    assert_eq!(engine.phase(), Phase::AwaitingStartup);

    let mut state = ExtractedState::default();
    state
        .markers
        .push(hit(MarkerKind::Species, "select your species"));
    engine.next(&state).unwrap();
    assert_eq!(engine.phase(), Phase::InCreationFlow);
}

#[test]
fn vitals_on_screen_enter_gameplay() {
    let mut engine = Engine::new(EngineConfig::default());
    let mut state = ExtractedState::default();
    state.health = Some(Meter {
        current: 15,
        max: 15,
    });
    engine.next(&state).unwrap();
    assert_eq!(engine.phase(), Phase::InGameplay);
}

#[test]
fn gameplay_never_regresses_to_creation() {
    let mut engine = Engine::new(EngineConfig::default());
    let mut hud = ExtractedState::default();
    hud.health = Some(Meter {
        current: 15,
        max: 15,
    });
    engine.next(&hud).unwrap();
    assert_eq!(engine.phase(), Phase::InGameplay);

    // A later screen that resembles a creation menu (a shop, a scroll of
    // amnesia prompt, whatever) must not drag the session backward.
    let mut menu_lookalike = ExtractedState::default();
    menu_lookalike
        .markers
        .push(hit(MarkerKind::Species, "select your species"));

    match engine.next(&menu_lookalike).unwrap() {
        Outcome::Command(_) => {}
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert_eq!(engine.phase(), Phase::InGameplay);
}

#[test]
fn startup_screen_advances_with_return() {
    let mut engine = Engine::new(EngineConfig::default());
    let mut state = ExtractedState::default();
    state.markers.push(hit(MarkerKind::Startup, "hints mode"));

    match engine.next(&state).unwrap() {
        Outcome::Command(action) => assert_eq!(action.input, "\r"),
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert_eq!(engine.phase(), Phase::AwaitingStartup);
}
