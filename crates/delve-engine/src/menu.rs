//! Character-creation navigation
//!
//! Active only before gameplay. Classifies each snapshot into a creation
//! state from the extractor's marker hits and exposes the literal input
//! that advances the flow. `Done` is terminal: the machine is never
//! consulted again for the rest of the session.

use crate::EngineError;
use delve_state::{MarkerHit, MarkerKind};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuState {
    /// Splash / game-mode screen, before the name prompt.
    Start,
    NameEntry,
    Species,
    Class,
    Background,
    Skills,
    /// Creation finished; gameplay owns the session from here on.
    Done,
    /// The flow stopped progressing; escalated, never retried internally.
    Error,
}

/// The literal inputs sent at each step. Data, not behavior: picking a
/// different species is a config edit.
#[derive(Debug, Clone)]
pub struct MenuInputs {
    /// Character name typed at the name prompt.
    pub name: String,
    pub species: char,
    pub class: char,
    pub background: char,
    pub skills: char,
}

impl Default for MenuInputs {
    fn default() -> Self {
        Self {
            name: "delver".to_string(),
            species: 'j',
            class: 'a',
            background: 'a',
            skills: 'c',
        }
    }
}

#[derive(Debug, Clone)]
pub struct MenuMachine {
    state: MenuState,
    inputs: MenuInputs,
}

impl MenuMachine {
    pub fn new(inputs: MenuInputs) -> Self {
        Self {
            state: MenuState::Start,
            inputs,
        }
    }

    pub fn state(&self) -> MenuState {
        self.state
    }

    /// Classify the snapshot's markers and move to the matching state.
    ///
    /// When several creation markers are present at once, the hit with
    /// the longest matched phrase wins — the longer a phrase, the more
    /// specific the screen it identifies. Without any creation marker the
    /// machine holds its current state.
    pub fn observe(&mut self, markers: &[MarkerHit]) -> Result<MenuState, EngineError> {
        if self.state == MenuState::Done {
            return Err(EngineError::CreationFlowComplete);
        }

        let best = markers
            .iter()
            .filter_map(|hit| Some((creation_state(hit.kind)?, hit.phrase.len())))
            .max_by_key(|(_, len)| *len);

        if let Some((state, _)) = best {
            if state != self.state {
                debug!(from = ?self.state, to = ?state, "creation flow transition");
            }
            self.state = state;
        }
        Ok(self.state)
    }

    /// The input that advances the current state, or `None` for the
    /// terminal states.
    pub fn input(&self) -> Option<(String, String)> {
        let (input, reason) = match self.state {
            MenuState::Start => ("\r".to_string(), "startup screen: continue".to_string()),
            MenuState::NameEntry => (
                format!("{}\r", self.inputs.name),
                format!("name prompt: entering \"{}\"", self.inputs.name),
            ),
            MenuState::Species => (
                self.inputs.species.to_string(),
                format!("species menu: selecting '{}'", self.inputs.species),
            ),
            MenuState::Class => (
                self.inputs.class.to_string(),
                format!("class menu: selecting '{}'", self.inputs.class),
            ),
            MenuState::Background => (
                self.inputs.background.to_string(),
                format!("background menu: selecting '{}'", self.inputs.background),
            ),
            MenuState::Skills => (
                self.inputs.skills.to_string(),
                format!("weapon/skill menu: selecting '{}'", self.inputs.skills),
            ),
            MenuState::Done | MenuState::Error => return None,
        };
        Some((input, reason))
    }

    /// Gameplay has been detected; the flow is complete and terminal.
    pub fn complete(&mut self) {
        self.state = MenuState::Done;
    }

    /// The flow stopped progressing.
    pub fn fail(&mut self) {
        if self.state != MenuState::Done {
            self.state = MenuState::Error;
        }
    }
}

/// Which menu state a marker kind identifies, if any.
fn creation_state(kind: MarkerKind) -> Option<MenuState> {
    match kind {
        MarkerKind::Startup => Some(MenuState::Start),
        MarkerKind::NameEntry => Some(MenuState::NameEntry),
        MarkerKind::Species => Some(MenuState::Species),
        MarkerKind::Class => Some(MenuState::Class),
        MarkerKind::Background => Some(MenuState::Background),
        MarkerKind::Skills => Some(MenuState::Skills),
        MarkerKind::MorePrompt | MarkerKind::AttributeIncrease | MarkerKind::LevelUp => None,
    }
}
