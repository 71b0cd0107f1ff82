//! Practice Session
//!
//! The action surface a front end drives: start, answer (typed or spoken),
//! next, dismiss. Each action returns the [`Feedback`] to show; speech output
//! happens here on a best-effort basis.

use crate::asr::{self, SpeechRecognizer};
use crate::catalog::Catalog;
use crate::config::Config;
use crate::core::label;
use crate::error::{Alert, PracticeError, PracticeResult};
use crate::picture::{ImageLoader, PictureLoader};
use crate::session::{Advance, Mode, Outcome, Session};
use crate::tts::{self, TtsEngine};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use tracing::{debug, info};

pub const PHONICS_PROMPT: &str = "Say the name of the picture";
pub const SPELLING_PROMPT: &str = "Type the name of the picture";
pub const GATE_CLOSED: &str = "give correct answer before moving forward";
pub const LISTEN_CUE: &str = "Please say the word now";
pub const PRAISE: &str = "Great job! That's correct.";
pub const WRONG: &str = "Incorrect answer.";

/// How a message should be presented
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Prompt,
    Success,
    Failure,
    Notice,
    Error,
}

/// What the user should see after an action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    pub tone: Tone,
    pub title: String,
    pub message: String,
    /// A modal the user must close with `dismiss_feedback`
    pub needs_dismissal: bool,
    /// Error to show after this message
    pub followed_by: Option<Alert>,
}

impl Feedback {
    fn new(tone: Tone, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            tone,
            title: title.into(),
            message: message.into(),
            needs_dismissal: false,
            followed_by: None,
        }
    }

    pub fn from_error(err: &PracticeError) -> Self {
        let alert = err.alert();
        Self::new(Tone::Error, alert.title, alert.message)
    }
}

/// External services a session talks to
#[derive(Clone)]
pub struct Collaborators {
    pub loader: Arc<dyn PictureLoader>,
    pub tts: Arc<dyn TtsEngine>,
    pub recognizer: Arc<dyn SpeechRecognizer>,
}

impl Collaborators {
    pub fn from_config(config: &Config) -> Self {
        Self {
            loader: Arc::new(ImageLoader::from_config(config)),
            tts: tts::create_engine(config),
            recognizer: asr::create_recognizer(config),
        }
    }
}

/// A running drill over one category
pub struct PracticeSession<R: Rng = StdRng> {
    category: String,
    session: Session<R>,
    tts: Arc<dyn TtsEngine>,
    recognizer: Arc<dyn SpeechRecognizer>,
}

impl PracticeSession<StdRng> {
    /// Open a category and show the first picture
    ///
    /// Unknown categories, missing folders and empty folders are errors. A
    /// first picture that fails to load still yields a session (Next retries)
    /// together with the error feedback.
    pub fn start_session(
        catalog: &Catalog,
        category: &str,
        mode: Mode,
        collaborators: Collaborators,
    ) -> PracticeResult<(Self, Feedback)> {
        Self::start_with_rng(
            catalog,
            category,
            mode,
            collaborators,
            StdRng::from_entropy(),
        )
    }
}

impl<R: Rng> PracticeSession<R> {
    pub fn start_with_rng(
        catalog: &Catalog,
        category: &str,
        mode: Mode,
        collaborators: Collaborators,
        rng: R,
    ) -> PracticeResult<(Self, Feedback)> {
        let items = catalog.load(category)?;
        let category = catalog
            .canonical_name(category)
            .unwrap_or(category)
            .to_string();
        info!("📚 Starting {} practice for {}", mode, category);

        let mut practice = Self {
            category,
            session: Session::new(items, mode, collaborators.loader, rng),
            tts: collaborators.tts,
            recognizer: collaborators.recognizer,
        };
        let feedback = match practice.session.start() {
            Ok(_) => practice.prompt(),
            Err(e) => Feedback::from_error(&PracticeError::from(e)),
        };
        Ok((practice, feedback))
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn session(&self) -> &Session<R> {
        &self.session
    }

    /// Window title, e.g. "Planets • Spelling"
    pub fn title(&self) -> String {
        format!("{} • {}", self.category, self.session.mode())
    }

    pub async fn submit_typed_answer(&mut self, text: &str) -> Feedback {
        let outcome = self.session.submit(text);
        self.respond(outcome).await
    }

    /// Listen for one spoken answer and check it
    ///
    /// Recognition problems are reported and leave the session untouched.
    pub async fn submit_spoken_answer(&mut self) -> Feedback {
        if self.session.current().is_none() || self.session.wrong_answer_pending() {
            return self.respond(Outcome::Ignored).await;
        }

        tts::speak_best_effort(self.tts.as_ref(), LISTEN_CUE).await;
        match self.recognizer.listen_once().await {
            Ok(heard) => {
                debug!("Heard '{}' via {}", heard, self.recognizer.name());
                let outcome = self.session.submit(&heard);
                self.respond(outcome).await
            }
            Err(e) => Feedback::from_error(&PracticeError::from(e)),
        }
    }

    /// Next button
    pub async fn advance(&mut self) -> Feedback {
        match self.session.advance() {
            Ok(outcome) => self.respond(outcome).await,
            Err(e) => Feedback::from_error(&PracticeError::from(e)),
        }
    }

    /// OK button of the wrong-answer screen
    pub async fn dismiss_feedback(&mut self) -> Feedback {
        let outcome = self.session.dismiss();
        self.respond(outcome).await
    }

    /// Speak the current word
    pub async fn hear_name(&self) {
        if let Some(item) = self.session.current() {
            tts::speak_best_effort(self.tts.as_ref(), &item.label).await;
        }
    }

    /// Speak the current word letter by letter, then whole
    pub async fn spell_current(&self) {
        if let Some(item) = self.session.current() {
            tts::speak_sequence(self.tts.as_ref(), &label::spell_out(&item.label)).await;
        }
    }

    fn prompt(&self) -> Feedback {
        let message = match self.session.mode() {
            Mode::Phonics => PHONICS_PROMPT,
            Mode::Spelling => SPELLING_PROMPT,
        };
        Feedback::new(Tone::Prompt, self.title(), message)
    }

    async fn respond(&self, outcome: Outcome) -> Feedback {
        let mode = self.session.mode();
        match outcome {
            Outcome::Correct { answer, advance } => {
                if mode == Mode::Phonics {
                    tts::speak_best_effort(self.tts.as_ref(), PRAISE).await;
                }
                match advance {
                    Advance::Failed(e) => Feedback {
                        followed_by: Some(PracticeError::from(e).alert()),
                        ..Feedback::new(
                            Tone::Success,
                            "Correct",
                            format!("You said '{}'. Correct!", answer),
                        )
                    },
                    Advance::Drew(_) => Feedback::new(
                        Tone::Success,
                        "Correct",
                        format!("You said '{}'. Correct!", answer),
                    ),
                    Advance::Unlocked => Feedback::new(
                        Tone::Success,
                        "Correct",
                        format!("Correct! It is '{}'", label::display_name(&answer)),
                    ),
                }
            }
            Outcome::Incorrect { .. } => match mode {
                Mode::Phonics => {
                    tts::speak_best_effort(self.tts.as_ref(), WRONG).await;
                    Feedback {
                        needs_dismissal: true,
                        ..Feedback::new(Tone::Failure, "Incorrect", "Incorrect Answer")
                    }
                }
                Mode::Spelling => Feedback::new(Tone::Failure, "Try Again", GATE_CLOSED),
            },
            Outcome::Blocked => Feedback::new(Tone::Failure, "Try Again", GATE_CLOSED),
            Outcome::Advanced(_) | Outcome::Dismissed => self.prompt(),
            Outcome::Ignored => {
                if self.session.wrong_answer_pending() {
                    Feedback {
                        needs_dismissal: true,
                        ..Feedback::new(Tone::Notice, "Incorrect", "Press OK to try again")
                    }
                } else if self.session.current().is_none() {
                    Feedback::new(Tone::Notice, self.title(), "No picture yet, press Next")
                } else {
                    self.prompt()
                }
            }
        }
    }
}
