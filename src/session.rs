//! Session State Machine
//!
//! Holds the current practice item and the correctness gate, and decides
//! which transitions a mode allows:
//!
//! - **Spelling**: a correct answer opens the gate; Next is refused until then.
//! - **Phonics**: a correct answer draws the next picture at once; a wrong one
//!   raises an acknowledgment screen that must be dismissed; Next is always
//!   allowed.

use crate::catalog::PracticeItem;
use crate::core::evaluator;
use crate::error::{ImageLoadError, PracticeError};
use crate::picture::{Picture, PictureLoader};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Practice mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Phonics,
    Spelling,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Phonics => write!(f, "Phonics"),
            Mode::Spelling => write!(f, "Spelling"),
        }
    }
}

impl FromStr for Mode {
    type Err = PracticeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "phonics" => Ok(Mode::Phonics),
            "spelling" => Ok(Mode::Spelling),
            other => Err(PracticeError::Config(format!("unknown mode '{}'", other))),
        }
    }
}

/// Where the current prompt stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum State {
    /// Prompt shown, not answered yet
    #[default]
    AwaitingInput,
    /// Answered correctly, gate open
    Correct,
    /// Answered wrongly, gate closed
    Incorrect,
}

/// What happened to forward navigation after a correct answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    /// Spelling: Next is now allowed
    Unlocked,
    /// Phonics: the next picture was drawn
    Drew(PracticeItem),
    /// Phonics: drawing the next picture failed, the answered one stays up
    Failed(ImageLoadError),
}

/// Result of a session action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Correct { answer: String, advance: Advance },
    Incorrect { answer: String },
    Advanced(PracticeItem),
    /// Next refused because the gate is closed
    Blocked,
    /// Wrong-answer screen closed
    Dismissed,
    /// Action not applicable in the current state
    Ignored,
}

#[derive(Debug, Clone)]
struct Shown {
    item: PracticeItem,
    picture: Picture,
}

/// One practice session over the pictures of a category
pub struct Session<R: Rng = StdRng> {
    mode: Mode,
    items: Vec<PracticeItem>,
    loader: Arc<dyn PictureLoader>,
    rng: R,
    shown: Option<Shown>,
    state: State,
    wrong_answer_pending: bool,
    draws: u64,
}

impl<R: Rng> fmt::Debug for Session<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("mode", &self.mode)
            .field("items", &self.items.len())
            .field("current", &self.current().map(|i| &i.label))
            .field("state", &self.state)
            .field("wrong_answer_pending", &self.wrong_answer_pending)
            .finish()
    }
}

impl<R: Rng> Session<R> {
    /// Create a session with nothing shown yet; call [`Session::start`] next
    pub fn new(
        items: Vec<PracticeItem>,
        mode: Mode,
        loader: Arc<dyn PictureLoader>,
        rng: R,
    ) -> Self {
        Self {
            mode,
            items,
            loader,
            rng,
            shown: None,
            state: State::AwaitingInput,
            wrong_answer_pending: false,
            draws: 0,
        }
    }

    /// Draw the first picture
    pub fn start(&mut self) -> Result<PracticeItem, ImageLoadError> {
        info!("▶️ {} session started over {} pictures", self.mode, self.items.len());
        self.redraw()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn items(&self) -> &[PracticeItem] {
        &self.items
    }

    /// Number of successful draws; a repeat of the same picture still counts
    pub fn draws(&self) -> u64 {
        self.draws
    }

    pub fn current(&self) -> Option<&PracticeItem> {
        self.shown.as_ref().map(|s| &s.item)
    }

    pub fn picture(&self) -> Option<&Picture> {
        self.shown.as_ref().map(|s| &s.picture)
    }

    /// Caption under the picture; only Phonics shows the word
    pub fn caption(&self) -> Option<String> {
        match self.mode {
            Mode::Phonics => self.current().map(PracticeItem::display_name),
            Mode::Spelling => None,
        }
    }

    pub fn is_gate_open(&self) -> bool {
        self.state == State::Correct
    }

    pub fn wrong_answer_pending(&self) -> bool {
        self.wrong_answer_pending
    }

    /// Whether Next would move on right now
    pub fn can_advance(&self) -> bool {
        self.shown.is_none() || self.mode == Mode::Phonics || self.is_gate_open()
    }

    /// Check an answer, typed or transcribed, against the current picture
    pub fn submit(&mut self, answer: &str) -> Outcome {
        let Some(expected) = self.current().map(|item| item.label.clone()) else {
            return Outcome::Ignored;
        };
        if self.wrong_answer_pending {
            debug!("Answer ignored while the wrong-answer screen is up");
            return Outcome::Ignored;
        }

        let answer = answer.trim().to_lowercase();
        let correct = evaluator::evaluate(&answer, &expected);
        debug!("Answer '{}' vs '{}': {}", answer, expected, correct);

        if !correct {
            self.state = State::Incorrect;
            if self.mode == Mode::Phonics {
                self.wrong_answer_pending = true;
            }
            return Outcome::Incorrect { answer };
        }

        // Phonics never rests in Correct: either the next picture is up or,
        // when it fails to load, the answered one stays up untouched
        let advance = match self.mode {
            Mode::Spelling => {
                self.state = State::Correct;
                Advance::Unlocked
            }
            Mode::Phonics => match self.redraw() {
                Ok(item) => Advance::Drew(item),
                Err(e) => Advance::Failed(e),
            },
        };
        Outcome::Correct { answer, advance }
    }

    /// Move to a new random picture if the mode allows it
    ///
    /// A refused move is `Ok(Outcome::Blocked)` and changes nothing. A picture
    /// that fails to load leaves the session exactly as it was.
    pub fn advance(&mut self) -> Result<Outcome, ImageLoadError> {
        if !self.can_advance() {
            debug!("Next blocked: {:?}", self.state);
            return Ok(Outcome::Blocked);
        }
        self.redraw().map(Outcome::Advanced)
    }

    /// Close the Phonics wrong-answer screen and retry the same picture
    pub fn dismiss(&mut self) -> Outcome {
        if !self.wrong_answer_pending {
            return Outcome::Ignored;
        }
        self.wrong_answer_pending = false;
        self.state = State::AwaitingInput;
        Outcome::Dismissed
    }

    /// Uniform draw with replacement; commits only after the picture loads
    fn redraw(&mut self) -> Result<PracticeItem, ImageLoadError> {
        let item = self
            .items
            .choose(&mut self.rng)
            .cloned()
            .ok_or_else(|| ImageLoadError {
                file: String::new(),
                reason: "category has no pictures".to_string(),
            })?;

        let picture = self.loader.load(&item.path).map_err(|e| {
            warn!("⚠️ {}", e);
            e
        })?;

        info!("🖼️ Showing '{}' ({})", item.label, item.file_name);
        self.shown = Some(Shown {
            item: item.clone(),
            picture,
        });
        self.state = State::AwaitingInput;
        self.wrong_answer_pending = false;
        self.draws += 1;
        Ok(item)
    }
}
