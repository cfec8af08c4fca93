//! The gameplay decision engine
//!
//! One invocation per cycle: the latest snapshot goes in, at most one
//! command comes out. Gameplay rules are evaluated in strict priority
//! order and the first match wins; every command carries the rule and
//! evidence that produced it as a justification string.

use crate::context::{Phase, SessionContext};
use crate::menu::{MenuInputs, MenuMachine, MenuState};
use crate::EngineError;
use delve_state::{ExtractedState, MarkerKind};
use tracing::{debug, info};

/// A command for the transport to send, with the reason it was chosen.
/// The reason is a required output of every decision, not logging sugar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    pub input: String,
    pub reason: String,
}

impl Action {
    fn new(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            reason: reason.into(),
        }
    }
}

/// What one decision cycle produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Send this input.
    Command(Action),

    /// The same menu context recurred too many consecutive cycles. The
    /// engine escalates and stops; recovery is the orchestrator's call.
    Stuck { repeats: u32 },

    /// A death or victory screen: nothing left to send.
    GameOver,
}

/// Thresholds and command literals. All data; no behavior is injected.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Rest when health falls below this fraction of maximum.
    pub rest_threshold: f32,

    /// Escalate after this many consecutive identical menu contexts.
    pub stuck_threshold: u32,

    /// Acknowledge a message prompt.
    pub acknowledge: String,

    /// Pick at the attribute-increase prompt.
    pub attribute_pick: String,

    /// Step away from a visible threat.
    pub evade: String,

    /// Rest until recovered.
    pub rest: String,

    /// Auto-explore.
    pub explore: String,

    pub menu: MenuInputs,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            rest_threshold: 0.6,
            stuck_threshold: 5,
            acknowledge: " ".to_string(),
            attribute_pick: "S".to_string(),
            evade: "h".to_string(),
            rest: "5".to_string(),
            explore: "o".to_string(),
            menu: MenuInputs::default(),
        }
    }
}

pub struct Engine {
    cfg: EngineConfig,
    ctx: SessionContext,
    menu: MenuMachine,
}

impl Engine {
    pub fn new(cfg: EngineConfig) -> Self {
        let menu = MenuMachine::new(cfg.menu.clone());
        Self {
            cfg,
            ctx: SessionContext::new(),
            menu,
        }
    }

    pub fn phase(&self) -> Phase {
        self.ctx.phase()
    }

    /// Justification of the most recent command, for display.
    pub fn last_reason(&self) -> &str {
        self.ctx.last_reason()
    }

    /// Decide the next command from the latest snapshot.
    ///
    /// Calling this after the engine reported `GameOver` or `Stuck` is a
    /// lifecycle violation and fails loudly rather than replaying input
    /// into a dead session.
    pub fn next(&mut self, state: &ExtractedState) -> Result<Outcome, EngineError> {
        if self.ctx.finished() {
            return Err(EngineError::SessionOver);
        }

        if state.game_over {
            info!("game over screen detected");
            self.ctx.finish();
            return Ok(Outcome::GameOver);
        }

        let repeats = self.ctx.observe_markers(state.marker_kinds());
        if repeats >= self.cfg.stuck_threshold {
            self.ctx.finish();
            self.menu.fail();
            return Ok(Outcome::Stuck { repeats });
        }

        let action = match self.ctx.phase() {
            Phase::AwaitingStartup | Phase::InCreationFlow => self.creation_step(state)?,
            Phase::InGameplay => self.gameplay_step(state),
        };

        self.ctx.record(&action.input, &action.reason);
        debug!(input = %printable(&action.input), reason = %action.reason, "decision");
        Ok(Outcome::Command(action))
    }

    /// Pre-gameplay: the menu machine steers. Vitals on screen mean the
    /// HUD is up and creation is over, whichever menu state we thought we
    /// were in.
    fn creation_step(&mut self, state: &ExtractedState) -> Result<Action, EngineError> {
        if state.health.is_some() {
            info!("vitals visible; creation flow complete");
            self.menu.complete();
            self.ctx.advance(Phase::InGameplay);
            return Ok(self.gameplay_step(state));
        }

        let menu_state = self.menu.observe(&state.markers)?;
        if menu_state != MenuState::Start {
            self.ctx.advance(Phase::InCreationFlow);
        }

        match self.menu.input() {
            Some((input, reason)) => Ok(Action::new(input, reason)),
            // Done or Error without vitals: hold position with a wait.
            None => Ok(Action::new(
                self.cfg.explore.clone(),
                "creation flow settled; exploring until the HUD appears",
            )),
        }
    }

    /// Gameplay rules, strict priority order, first match wins.
    fn gameplay_step(&self, state: &ExtractedState) -> Action {
        // 1. Prompts that block everything else until acknowledged.
        if state.has_marker(MarkerKind::AttributeIncrease) {
            return Action::new(
                self.cfg.attribute_pick.clone(),
                "attribute prompt: picking strength",
            );
        }
        if state.has_marker(MarkerKind::MorePrompt) || state.has_marker(MarkerKind::LevelUp) {
            return Action::new(
                self.cfg.acknowledge.clone(),
                "message prompt: acknowledging",
            );
        }

        // 2. Visible threat: evade. First-listed monster names the threat;
        //    panel order is the tie-break.
        if let Some(threat) = state.monsters.first() {
            return Action::new(
                self.cfg.evade.clone(),
                format!("threat visible: evading {}", threat.name),
            );
        }

        // 3. Hurt and unthreatened: rest. An unreadable health display
        //    falls through — absent is not low.
        if let Some(health) = state.health {
            if health.ratio() < self.cfg.rest_threshold {
                return Action::new(
                    self.cfg.rest.clone(),
                    format!(
                        "health {}/{} below {:.0}%: resting",
                        health.current,
                        health.max,
                        self.cfg.rest_threshold * 100.0
                    ),
                );
            }
        }

        // 4. Default: keep exploring.
        Action::new(self.cfg.explore.clone(), "exploring")
    }
}

/// Control characters spelled out for log lines.
fn printable(input: &str) -> String {
    input
        .chars()
        .map(|ch| match ch {
            '\r' => "<CR>".to_string(),
            '\n' => "<LF>".to_string(),
            '\t' => "<TAB>".to_string(),
            ' ' => "<SP>".to_string(),
            c if c.is_control() => format!("<{:#04x}>", c as u32),
            c => c.to_string(),
        })
        .collect()
}
