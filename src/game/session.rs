//! Session State
//!
//! Everything one quiz run owns: the level store, the monotonic
//! progression, the current deal, scheduled timers, and the event buffer
//! the host drains each tick. All mutation happens on the single
//! host-driven update context; nothing here is shared across threads.

use serde::{Serialize, Deserialize};

use crate::core::rng::DeterministicRng;
use crate::core::timer::{TimerId, TimerQueue, TimerScope};
use crate::core::hash::{StateHash, compute_state_hash};
use crate::game::level::{ImageRef, LevelStore, Level};
use crate::game::progress::{LevelProgression, Progress};
use crate::game::token::SelectionTracker;
use crate::game::events::{QuizEvent, Warning};

// =============================================================================
// PHASE
// =============================================================================

/// Current phase of the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QuizPhase {
    /// No usable level data; every command is ignored.
    Inert,
    /// Waiting for the host to start the run.
    #[default]
    Ready,
    /// Player is assembling an answer.
    Answering,
    /// Wrong-answer imagery is up; gameplay commands are locked.
    Feedback,
    /// Every level solved; the run is over.
    Complete,
}

/// Scheduled work the session owes itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerTask {
    /// Clear the transient warning message.
    ClearWarning,
    /// End the wrong-answer feedback window.
    EndFeedback,
}

// =============================================================================
// SESSION STATE
// =============================================================================

/// Complete state of a quiz run.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QuizSession {
    /// Session identifier (UUID bytes).
    pub session_id: [u8; 16],

    /// Current tick.
    pub tick: u32,

    /// RNG seed (recorded for replay).
    pub rng_seed: u64,

    /// Current phase.
    pub(crate) phase: QuizPhase,

    /// Deterministic RNG driving every shuffle.
    #[serde(skip)]
    pub(crate) rng: DeterministicRng,

    /// The levels being played. Immutable for the session's lifetime.
    pub(crate) store: LevelStore,

    /// Monotonic level cursor.
    pub(crate) progression: LevelProgression,

    /// Tokens and selection for the current deal.
    pub(crate) tracker: SelectionTracker,

    /// Scheduled feedback/warning work.
    pub(crate) timers: TimerQueue<TimerTask>,

    /// Pending clear for the visible warning, replaced on re-show.
    pub(crate) warning_timer: Option<TimerId>,

    /// Mirror of the image the host was last told to display.
    pub(crate) displayed_image: Option<ImageRef>,

    /// Currently visible transient message, if any.
    pub(crate) active_warning: Option<Warning>,

    /// Monotonic token ID counter; IDs never repeat within a session.
    pub(crate) next_token_id: u32,

    /// Events generated this tick (drained by the host).
    #[serde(skip)]
    pub(crate) pending_events: Vec<QuizEvent>,
}

impl QuizSession {
    /// Create a session over `store`.
    ///
    /// An empty store yields an `Inert` session: it accepts ticks but
    /// ignores every command and never deals. Callers that loaded a pack
    /// through the pack layer never see this; direct constructors should
    /// check `is_inert` and report it.
    pub fn new(session_id: [u8; 16], store: LevelStore, rng_seed: u64) -> Self {
        let phase = if store.is_empty() {
            QuizPhase::Inert
        } else {
            QuizPhase::Ready
        };

        Self {
            session_id,
            tick: 0,
            rng_seed,
            phase,
            rng: DeterministicRng::new(rng_seed),
            progression: LevelProgression::new(store.len()),
            store,
            tracker: SelectionTracker::default(),
            timers: TimerQueue::new(),
            warning_timer: None,
            displayed_image: None,
            active_warning: None,
            next_token_id: 0,
            pending_events: Vec::new(),
        }
    }

    /// Begin the run: load and deal the first level.
    ///
    /// Only valid from `Ready`; returns false (and does nothing) from any
    /// other phase, including `Inert`.
    pub fn start(&mut self) -> bool {
        if self.phase != QuizPhase::Ready {
            return false;
        }
        self.phase = QuizPhase::Answering;
        self.load_current_level();
        true
    }

    /// Make the progression's current level the live one.
    ///
    /// Bumps the timer epoch (retiring any level-scoped task aimed at the
    /// outgoing level), displays the question image, and deals.
    pub(crate) fn load_current_level(&mut self) {
        self.timers.bump_epoch();

        let index = self.progression.current_index();
        let image = match self.store.get(index) {
            Some(level) => level.question_image().clone(),
            None => return,
        };

        self.displayed_image = Some(image.clone());
        let event = QuizEvent::level_loaded(self.tick, index, image);
        self.push_event(event);
        self.deal_current_level();
    }

    /// Deal a fresh shuffle of the current level's words.
    ///
    /// Shuffles a copy; the store's word order is never touched. The old
    /// tokens and selection are dropped wholesale.
    pub(crate) fn deal_current_level(&mut self) {
        let Some(level) = self.store.get(self.progression.current_index()) else {
            return;
        };

        let mut words = level.words().to_vec();
        self.rng.shuffle(&mut words);
        self.tracker = SelectionTracker::deal(words, &mut self.next_token_id);

        let event = QuizEvent::tokens_dealt(self.tick, &self.tracker);
        self.push_event(event);
    }

    /// Show a transient message, replacing any visible one.
    ///
    /// The previous clear timer is cancelled so an older message's
    /// deadline can never wipe a newer message early.
    pub(crate) fn show_warning(&mut self, warning: Warning, clear_delay_ticks: u32) {
        if let Some(previous) = self.warning_timer.take() {
            self.timers.cancel(previous);
        }

        self.active_warning = Some(warning);
        let event = QuizEvent::warning_shown(self.tick, warning);
        self.push_event(event);

        self.warning_timer = Some(self.timers.schedule(
            self.tick,
            clear_delay_ticks,
            TimerScope::Session,
            TimerTask::ClearWarning,
        ));
    }

    /// Clear the visible message (the `ClearWarning` task body).
    pub(crate) fn clear_warning(&mut self) {
        if self.active_warning.take().is_some() {
            self.warning_timer = None;
            let event = QuizEvent::warning_cleared(self.tick);
            self.push_event(event);
        }
    }

    /// The level currently in play.
    pub fn current_level(&self) -> Option<&Level> {
        self.store.get(self.progression.current_index())
    }

    /// Current phase.
    pub fn phase(&self) -> QuizPhase {
        self.phase
    }

    /// True when the session was built over an empty store.
    pub fn is_inert(&self) -> bool {
        self.phase == QuizPhase::Inert
    }

    /// True once every level is solved.
    pub fn is_complete(&self) -> bool {
        self.phase == QuizPhase::Complete
    }

    /// Image the host should currently display.
    pub fn displayed_image(&self) -> Option<&ImageRef> {
        self.displayed_image.as_ref()
    }

    /// Currently visible transient message.
    pub fn active_warning(&self) -> Option<Warning> {
        self.active_warning
    }

    /// Tokens and selection for the current deal.
    pub fn tracker(&self) -> &SelectionTracker {
        &self.tracker
    }

    /// Solved/total progress counts.
    pub fn progress(&self) -> Progress {
        self.progression.progress()
    }

    /// Earliest tick at which a scheduled task becomes due.
    ///
    /// Hosts keep ticking until this is None even without player input,
    /// otherwise feedback reverts and warning clears would stall.
    pub fn next_timer_due(&self) -> Option<u32> {
        self.timers.next_due()
    }

    /// Compute hash of current state for verification.
    pub fn compute_hash(&self) -> StateHash {
        compute_state_hash(self.tick, self.rng_seed, |hasher| {
            hasher.update_uuid(&self.session_id);
            hasher.update_u8(match self.phase {
                QuizPhase::Inert => 0,
                QuizPhase::Ready => 1,
                QuizPhase::Answering => 2,
                QuizPhase::Feedback => 3,
                QuizPhase::Complete => 4,
            });

            self.store.hash_into(hasher);

            hasher.update_u32(self.progression.current_index() as u32);
            hasher.update_bool(self.progression.is_complete());

            self.tracker.hash_into(hasher);

            match &self.displayed_image {
                Some(image) => {
                    hasher.update_bool(true);
                    hasher.update_str(image.as_str());
                }
                None => hasher.update_bool(false),
            }

            hasher.update_u8(match self.active_warning {
                None => 0,
                Some(Warning::SelectAllWords) => 1,
                Some(Warning::QuizWon) => 2,
            });

            hasher.update_u32(self.next_token_id);
        })
    }

    /// Take pending events (consumes them).
    pub fn take_events(&mut self) -> Vec<QuizEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Push a quiz event.
    pub fn push_event(&mut self, event: QuizEvent) {
        self.pending_events.push(event);
    }
}

// =============================================================================
// TESTS
// =============================================================================
