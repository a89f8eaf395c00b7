//! The application shell around sessions: menu, play, end screen.
//! Each play-through gets a brand new session; nothing survives a restart.

use crate::config::Tuning;
use crate::error::EngineError;
use crate::factory::{PieceSource, RandomSource};
use crate::session::{Command, GameSession, Phase, StepSummary};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SessionOutcome {
    Won,
    Lost,
    Aborted,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum AppState {
    Menu,
    Playing,
    SessionEnded(SessionOutcome),
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum AppCommand {
    /// Leave the menu or end screen and start a fresh session.
    Start,
    /// Return from the end screen to the menu.
    Back,
    Game(Command),
}

type SourceFactory = Box<dyn FnMut() -> Box<dyn PieceSource>>;

pub struct App {
    state: AppState,
    session: Option<GameSession>,
    tuning: Tuning,
    new_source: SourceFactory,
}

impl App {
    pub fn new(tuning: Tuning) -> Self {
        Self::with_source(tuning, Box::new(|| Box::new(RandomSource::from_entropy())))
    }

    /// Inject the piece source used for each new session. Deterministic
    /// sources make whole play-throughs reproducible.
    pub fn with_source(tuning: Tuning, new_source: SourceFactory) -> Self {
        Self {
            state: AppState::Menu,
            session: None,
            tuning,
            new_source,
        }
    }

    pub fn state(&self) -> AppState {
        self.state
    }

    pub fn session(&self) -> Option<&GameSession> {
        self.session.as_ref()
    }

    /// Drive the shell. Returns the step summary when a session actually
    /// stepped, so the caller can decide whether anything needs redrawing.
    pub fn handle(&mut self, command: AppCommand) -> Result<Option<StepSummary>, EngineError> {
        match (self.state, command) {
            (AppState::Menu | AppState::SessionEnded(_), AppCommand::Start) => {
                self.session = Some(GameSession::new(
                    self.tuning.clone(),
                    (self.new_source)(),
                ));
                self.state = AppState::Playing;
                Ok(None)
            }
            (AppState::SessionEnded(_), AppCommand::Back) => {
                self.session = None;
                self.state = AppState::Menu;
                Ok(None)
            }
            (AppState::Playing, AppCommand::Game(cmd)) => {
                let Some(session) = self.session.as_mut() else {
                    return Ok(None);
                };
                let summary = session.step(cmd)?;
                if summary.quit {
                    self.state = AppState::SessionEnded(SessionOutcome::Aborted);
                } else {
                    match summary.phase {
                        Phase::Won => self.state = AppState::SessionEnded(SessionOutcome::Won),
                        Phase::Lost => self.state = AppState::SessionEnded(SessionOutcome::Lost),
                        Phase::Running => {}
                    }
                }
                Ok(Some(summary))
            }
            // Commands that make no sense in the current state are ignored,
            // like keypresses on a screen that has no binding for them.
            _ => Ok(None),
        }
    }
}
