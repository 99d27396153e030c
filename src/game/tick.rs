//! Host-Driven Update Tick
//!
//! The per-frame pipeline that must be 100% deterministic: commands in,
//! scheduled tasks fired, events out. The host calls [`tick`] once per
//! frame; nothing inside the core ever sleeps or reads a clock.

use serde::{Serialize, Deserialize};

use crate::core::timer::TimerScope;
use crate::game::command::{Command, CommandLog};
use crate::game::evaluate::{evaluate, Verdict};
use crate::game::events::{QuizEvent, Warning};
use crate::game::level::LevelStore;
use crate::game::progress::AdvanceOutcome;
use crate::game::session::{QuizPhase, QuizSession, TimerTask};

/// Result of a tick.
#[derive(Debug, Default)]
pub struct TickResult {
    /// Events generated this tick
    pub events: Vec<QuizEvent>,
    /// Whether the quiz is complete as of this tick
    pub quiz_completed: bool,
}

/// Configuration for quiz pacing.
///
/// Durations are tick counts at the nominal 60 Hz rate.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QuizConfig {
    /// How long the wrong-answer image stays up (5 seconds)
    pub feedback_ticks: u32,
    /// How long a transient message stays visible (3 seconds)
    pub warning_clear_ticks: u32,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            feedback_ticks: 300,
            warning_clear_ticks: 180,
        }
    }
}

/// Run one update tick.
///
/// # Arguments
///
/// * `session` - The quiz session (will be mutated)
/// * `commands` - Player commands delivered this tick, in order
/// * `config` - Pacing configuration
///
/// # Determinism
///
/// This function is 100% deterministic:
/// - Commands apply in slice order
/// - All randomness comes from the session's seeded RNG
/// - Delays are due-tick entries in the timer queue, never clocks
pub fn tick(session: &mut QuizSession, commands: &[Command], config: &QuizConfig) -> TickResult {
    let mut result = TickResult::default();

    // Phase-specific logic
    match session.phase {
        QuizPhase::Inert | QuizPhase::Ready => {
            // Nothing runs before start(), or ever without level data
            return result;
        }
        QuizPhase::Complete => {
            // Terminal for gameplay, but the success-message clear can
            // still be pending, so ticks keep flowing until timers drain.
        }
        QuizPhase::Answering | QuizPhase::Feedback => {}
    }

    // 0. Advance tick counter
    session.tick += 1;

    // 1. Apply this tick's commands
    apply_commands(session, commands, config);

    // 2. Fire scheduled tasks that came due
    process_timers(session);

    // 3. Report completion
    result.quiz_completed = session.phase == QuizPhase::Complete;

    // Collect events
    result.events = session.take_events();

    result
}

/// Apply player commands in delivery order.
///
/// Gameplay is locked outside `Answering`: a command that arrives during
/// the feedback window or after completion is dropped, so the outgoing
/// board cannot mutate while the wrong-answer image is up. The phase is
/// re-checked per command because a submit can lock mid-batch.
fn apply_commands(session: &mut QuizSession, commands: &[Command], config: &QuizConfig) {
    for command in commands {
        if session.phase != QuizPhase::Answering {
            continue;
        }

        match command {
            Command::Activate(id) => {
                // Unknown IDs (stale clicks from a replaced deal) are dropped.
                if session.tracker.activate(*id) {
                    let event = QuizEvent::selection_changed(session.tick, &session.tracker);
                    session.push_event(event);
                }
            }
            Command::Submit => submit_answer(session, config),
            Command::Reset => session.deal_current_level(),
        }
    }
}

/// Grade the assembled answer, or warn when it is not finished.
///
/// The completeness gate comes first: an unfinished answer raises the
/// select-all-words warning and is never graded.
fn submit_answer(session: &mut QuizSession, config: &QuizConfig) {
    if !session.tracker.is_complete() {
        session.show_warning(Warning::SelectAllWords, config.warning_clear_ticks);
        return;
    }

    let Some(level) = session.current_level() else {
        return;
    };
    let target = level.words().to_vec();

    match evaluate(&session.tracker, &target) {
        Verdict::Correct => answer_correct(session, config),
        Verdict::Wrong => run_feedback(session, config),
        // The gate above means a graded selection is always complete.
        Verdict::Incomplete => {}
    }
}

/// Advance off a solved level.
///
/// Either loads the next level (fresh image and deal) or, when the
/// solved level was the last, latches completion and shows the success
/// message. Completion is reported exactly once.
fn answer_correct(session: &mut QuizSession, config: &QuizConfig) {
    let solved = session.progression.current_index();
    session.push_event(QuizEvent::answer_correct(session.tick, solved));

    let outcome = session.progression.advance();
    let progress = session.progression.progress();
    session.push_event(QuizEvent::progress_changed(session.tick, progress));

    match outcome {
        AdvanceOutcome::NextLevel(_) => session.load_current_level(),
        AdvanceOutcome::Completed => {
            session.phase = QuizPhase::Complete;
            session.show_warning(Warning::QuizWon, config.warning_clear_ticks);
            let event =
                QuizEvent::quiz_completed(session.tick, session.progression.total_levels());
            session.push_event(event);
        }
    }
}

/// Start the wrong-answer feedback window.
///
/// Locks gameplay, swaps in the wrong-answer image, and schedules the
/// end of the window as a level-scoped task: a level change retires it
/// instead of letting a stale revert clobber newer state.
fn run_feedback(session: &mut QuizSession, config: &QuizConfig) {
    let level_index = session.progression.current_index();
    session.push_event(QuizEvent::answer_wrong(session.tick, level_index));

    let Some(level) = session.current_level() else {
        return;
    };
    let image = level.wrong_answer_image().clone();

    session.phase = QuizPhase::Feedback;
    session.displayed_image = Some(image.clone());
    session.push_event(QuizEvent::feedback_started(session.tick, image));

    session.timers.schedule(
        session.tick,
        config.feedback_ticks,
        TimerScope::Level,
        TimerTask::EndFeedback,
    );
}

/// Fire every scheduled task that came due this tick.
fn process_timers(session: &mut QuizSession) {
    for task in session.timers.fire_due(session.tick) {
        match task {
            TimerTask::ClearWarning => session.clear_warning(),
            TimerTask::EndFeedback => finish_feedback(session),
        }
    }
}

/// End the feedback window: revert the image, unlock, and auto-reset.
fn finish_feedback(session: &mut QuizSession) {
    if session.phase != QuizPhase::Feedback {
        return;
    }
    let Some(level) = session.current_level() else {
        return;
    };
    let image = level.question_image().clone();

    session.displayed_image = Some(image.clone());
    session.push_event(QuizEvent::feedback_ended(session.tick, image));
    session.phase = QuizPhase::Answering;
    session.deal_current_level();
}

/// Replay a session from a recorded command log.
///
/// Builds a fresh session from the recording's identity and seed, then
/// re-delivers every command on its original tick. Returns the final
/// session and the full event stream; both must match the live run.
pub fn replay_session(
    store: LevelStore,
    log: &CommandLog,
    config: &QuizConfig,
) -> (QuizSession, Vec<QuizEvent>) {
    let mut session = QuizSession::new(log.session_id, store, log.rng_seed);
    if !session.start() {
        // An inert session never advances its tick; bail out rather
        // than spin against end_tick.
        return (session, Vec::new());
    }
    let mut all_events = session.take_events();

    let mut commands: Vec<Command> = Vec::new();
    while session.tick < log.end_tick {
        commands.clear();
        commands.extend(
            log.commands_at(session.tick + 1)
                .iter()
                .map(|entry| entry.command),
        );

        let result = tick(&mut session, &commands, config);
        all_events.extend(result.events);
    }

    (session, all_events)
}

// =============================================================================
// TESTS
// =============================================================================
