//! Word Weave Terminal Host
//!
//! Thin shell over the deterministic quiz core. The binary pumps ticks,
//! feeds typed commands in, prints events out, and records every
//! command so the session can be replay-verified on exit.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::{bail, Context, Result};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;
use uuid::Uuid;

use word_weave::{
    core::rng::derive_session_seed,
    game::{
        command::{Command, CommandLog},
        events::{QuizEvent, QuizEventData, Warning},
        level::LevelStore,
        session::{QuizPhase, QuizSession},
        tick::{replay_session, tick, QuizConfig},
        token::TokenId,
    },
    pack::file::{load_pack, LevelPack, PackLevel},
    TICK_RATE, VERSION,
};

/// Pack loaded when no `--pack` argument is given.
const DEFAULT_PACK_PATH: &str = "assets/levels.json";

/// Parsed command-line options.
struct HostArgs {
    pack_path: Option<PathBuf>,
    seed: Option<u64>,
    demo: bool,
}

fn parse_args() -> Result<HostArgs> {
    let mut args = HostArgs {
        pack_path: None,
        seed: None,
        demo: false,
    };

    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--demo" => args.demo = true,
            "--pack" => {
                let value = iter.next().context("--pack requires a file path")?;
                args.pack_path = Some(PathBuf::from(value));
            }
            "--seed" => {
                let value = iter.next().context("--seed requires a number")?;
                args.seed = Some(value.parse().context("--seed must be a u64")?);
            }
            other => bail!(
                "unknown argument: {} (expected --demo, --pack <file>, --seed <n>)",
                other
            ),
        }
    }

    Ok(args)
}

fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    info!("Word Weave v{}", VERSION);
    info!("Tick Rate: {} Hz", TICK_RATE);

    let args = parse_args()?;

    let pack = match &args.pack_path {
        Some(path) => {
            load_pack(path).with_context(|| format!("loading pack {}", path.display()))?
        }
        None => {
            let default = Path::new(DEFAULT_PACK_PATH);
            if default.exists() {
                load_pack(default).context("loading default pack")?
            } else {
                info!("No pack at {}; using built-in levels", DEFAULT_PACK_PATH);
                builtin_pack()
            }
        }
    };
    let store = pack.validate().context("validating level pack")?;

    let session_id = *Uuid::new_v4().as_bytes();
    let seed = args
        .seed
        .unwrap_or_else(|| derive_session_seed(&pack.digest(), &session_id));

    info!("Pack: {} ({} levels)", pack.title, store.len());
    info!("Session ID: {}", hex::encode(session_id));
    info!("RNG Seed: {}", seed);

    if args.demo {
        run_demo(store, session_id, seed)
    } else {
        run_interactive(store, session_id, seed)
    }
}

/// Three-level pack compiled into the binary, for first runs.
fn builtin_pack() -> LevelPack {
    let mut pack = LevelPack::new("Built-in Starter");
    pack.levels.push(PackLevel {
        question_image: "img/cats_question.png".into(),
        wrong_answer_image: "img/cats_wrong.png".into(),
        words: vec!["I".into(), "like".into(), "cats".into()],
    });
    pack.levels.push(PackLevel {
        question_image: "img/park_question.png".into(),
        wrong_answer_image: "img/park_wrong.png".into(),
        words: vec![
            "we".into(),
            "walk".into(),
            "to".into(),
            "the".into(),
            "park".into(),
        ],
    });
    pack.levels.push(PackLevel {
        question_image: "img/night_question.png".into(),
        wrong_answer_image: "img/night_wrong.png".into(),
        words: vec![
            "the".into(),
            "stars".into(),
            "come".into(),
            "out".into(),
            "at".into(),
            "night".into(),
        ],
    });
    pack
}

/// Seconds since the Unix epoch, for recording headers.
fn unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// First unselected token currently displaying `word`.
fn unselected_token_for(session: &QuizSession, word: &str) -> Option<TokenId> {
    session
        .tracker()
        .tokens()
        .iter()
        .find(|t| t.word == word && !t.is_selected())
        .map(|t| t.id)
}

/// Record a command, deliver it on the next tick, and log the fallout.
fn send_logged(
    session: &mut QuizSession,
    log: &mut CommandLog,
    command: Command,
    config: &QuizConfig,
) -> usize {
    log.record(session.tick + 1, command);
    let events = tick(session, &[command], config).events;
    log_events(&events);
    events.len()
}

/// Log noteworthy events at INFO for the demo run.
fn log_events(events: &[QuizEvent]) {
    for event in events {
        match &event.data {
            QuizEventData::LevelLoaded { index, image } => {
                info!("Level {} loaded (image: {})", index + 1, image);
            }
            QuizEventData::AnswerCorrect { level_index } => {
                info!("Level {} solved", level_index + 1);
            }
            QuizEventData::AnswerWrong { level_index } => {
                info!("Wrong answer on level {}", level_index + 1);
            }
            QuizEventData::ProgressChanged { progress } => {
                info!(
                    "Progress: {}/{} ({:.0}%)",
                    progress.solved,
                    progress.total,
                    progress.fraction() * 100.0
                );
            }
            QuizEventData::QuizCompleted { total_levels } => {
                info!("Quiz completed: all {} levels solved", total_levels);
            }
            _ => {}
        }
    }
}

/// Scripted end-to-end run: one wrong attempt, then solve everything,
/// then verify the recording replays to the same hash.
fn run_demo(store: LevelStore, session_id: [u8; 16], seed: u64) -> Result<()> {
    info!("=== Starting Demo Session ===");

    let config = QuizConfig::default();
    let mut session = QuizSession::new(session_id, store.clone(), seed);
    let mut log = CommandLog::new(session_id, seed, unix_timestamp());

    if !session.start() {
        bail!("session has no levels to play");
    }
    let mut total_events = session.take_events().len();

    // One deliberately wrong attempt on the first level, when reversing
    // the sentence actually changes it.
    let target: Vec<String> = session
        .current_level()
        .context("no current level")?
        .words()
        .to_vec();
    let mut reversed = target.clone();
    reversed.reverse();
    if reversed != target {
        for word in &reversed {
            let id = unselected_token_for(&session, word)
                .with_context(|| format!("no token for {:?}", word))?;
            total_events += send_logged(&mut session, &mut log, Command::Activate(id), &config);
        }
        total_events += send_logged(&mut session, &mut log, Command::Submit, &config);

        // Ride out the feedback window on quiet ticks.
        while session.phase() == QuizPhase::Feedback {
            let events = tick(&mut session, &[], &config).events;
            log_events(&events);
            total_events += events.len();
        }
    }

    // Solve every remaining level by reading the target sentence.
    while !session.is_complete() {
        let target: Vec<String> = session
            .current_level()
            .context("no current level")?
            .words()
            .to_vec();
        for word in &target {
            let id = unselected_token_for(&session, word)
                .with_context(|| format!("no token for {:?}", word))?;
            total_events += send_logged(&mut session, &mut log, Command::Activate(id), &config);
        }
        total_events += send_logged(&mut session, &mut log, Command::Submit, &config);
    }

    // Let the success message clear so the timeline fully drains.
    while session.next_timer_due().is_some() {
        let events = tick(&mut session, &[], &config).events;
        log_events(&events);
        total_events += events.len();
    }
    log.finalize(session.tick);

    info!("=== Session Results ===");
    let hash = session.compute_hash();
    info!(
        "Ticks: {} ({:.1} seconds of play)",
        session.tick,
        session.tick as f32 / TICK_RATE as f32
    );
    info!("Commands recorded: {}", log.len());
    info!("Total events: {}", total_events);
    info!("Final State Hash: {}", hex::encode(hash));

    verify_replay(store, &log, &config, hash);
    Ok(())
}

/// Replay the recording and compare final hashes.
fn verify_replay(store: LevelStore, log: &CommandLog, config: &QuizConfig, live_hash: [u8; 32]) {
    info!("=== Verifying Determinism ===");

    let (replayed, _) = replay_session(store, log, config);
    let replay_hash = replayed.compute_hash();
    info!("Replay State Hash: {}", hex::encode(replay_hash));

    if live_hash == replay_hash {
        info!("DETERMINISM VERIFIED: Hashes match!");
    } else {
        info!("DETERMINISM FAILURE: Hashes differ!");
    }
}

/// Interactive terminal loop.
///
/// Typed commands land on the next tick. Between reads the clock
/// catches up, so the warning and feedback timers run on real time
/// even though the core itself never sleeps.
fn run_interactive(store: LevelStore, session_id: [u8; 16], seed: u64) -> Result<()> {
    let config = QuizConfig::default();
    let tick_duration = Duration::from_secs(1) / TICK_RATE;

    let mut session = QuizSession::new(session_id, store.clone(), seed);
    let mut log = CommandLog::new(session_id, seed, unix_timestamp());

    if !session.start() {
        bail!("session has no levels to play");
    }
    render_events(&session.take_events(), &session);

    println!();
    println!("Pick words by number (again to unpick), then 'submit'. 'reset' redeals, 'quit' exits.");

    let stdin = io::stdin();
    let mut clock = Instant::now();
    let mut quit = false;

    loop {
        if session.is_complete() {
            break;
        }

        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            quit = true;
            break;
        }

        // Time spent at the prompt elapses before the command lands.
        let caught_up = catch_up(&mut session, &mut clock, tick_duration, &config);
        render_events(&caught_up, &session);

        let input = line.trim();
        let command = match input {
            "" => None,
            "quit" | "exit" | "q" => {
                quit = true;
                break;
            }
            "submit" | "s" => Some(Command::Submit),
            "reset" | "r" => Some(Command::Reset),
            _ => match input.parse::<usize>() {
                Ok(n) if n >= 1 && n <= session.tracker().token_count() => {
                    Some(Command::Activate(session.tracker().tokens()[n - 1].id))
                }
                Ok(n) => {
                    println!("No token #{}", n);
                    None
                }
                Err(_) => {
                    println!("Commands: <number>, submit, reset, quit");
                    None
                }
            },
        };

        if let Some(command) = command {
            log.record(session.tick + 1, command);
            let result = tick(&mut session, &[command], &config);
            render_events(&result.events, &session);
        }

        // The wrong-answer window plays out in real time.
        while session.phase() == QuizPhase::Feedback {
            thread::sleep(tick_duration);
            let result = tick(&mut session, &[], &config);
            render_events(&result.events, &session);
        }
        clock = Instant::now();
    }

    if !quit {
        // Let the success message clear so the recording fully drains.
        while session.next_timer_due().is_some() {
            let result = tick(&mut session, &[], &config);
            render_events(&result.events, &session);
        }
    }
    log.finalize(session.tick);

    println!();
    verify_replay(store, &log, &config, session.compute_hash());
    Ok(())
}

/// Advance the session by however many ticks the prompt consumed.
///
/// Long pauses are capped; there is nothing scheduled further out than
/// the feedback window, so replaying an hour of idle ticks would only
/// burn time.
fn catch_up(
    session: &mut QuizSession,
    clock: &mut Instant,
    tick_duration: Duration,
    config: &QuizConfig,
) -> Vec<QuizEvent> {
    let mut events = Vec::new();

    let mut elapsed = clock.elapsed();
    let cap = tick_duration * (TICK_RATE * 30);
    if elapsed > cap {
        elapsed = cap;
    }

    while elapsed >= tick_duration {
        elapsed -= tick_duration;
        events.extend(tick(session, &[], config).events);
        if session.next_timer_due().is_none() {
            break;
        }
    }

    *clock = Instant::now();
    events
}

/// Print events the way the on-screen game would show them.
fn render_events(events: &[QuizEvent], session: &QuizSession) {
    for event in events {
        match &event.data {
            QuizEventData::LevelLoaded { index, image } => {
                println!();
                println!("--- Level {} ---", index + 1);
                println!("[image] {}", image);
            }
            QuizEventData::TokensDealt { tokens } => {
                println!("Arrange the words:");
                for (i, token) in tokens.iter().enumerate() {
                    println!("  {}. {}", i + 1, token.word);
                }
            }
            QuizEventData::SelectionChanged { .. } => {
                println!("Current order: {}", session.tracker().selected_words().join(" "));
            }
            QuizEventData::WarningShown { warning } => match warning {
                Warning::SelectAllWords => println!("Please select all words before Submitting"),
                Warning::QuizWon => println!("Congratulations You Won!!!"),
            },
            QuizEventData::WarningCleared => {}
            QuizEventData::AnswerCorrect { .. } => println!("Correct!"),
            QuizEventData::AnswerWrong { .. } => {}
            QuizEventData::FeedbackStarted { image } => {
                println!("Wrong! [image] {}", image);
            }
            QuizEventData::FeedbackEnded { image } => {
                println!("[image] {}", image);
                println!("Try again.");
            }
            QuizEventData::ProgressChanged { progress } => {
                println!("Progress: {}/{}", progress.solved, progress.total);
            }
            QuizEventData::QuizCompleted { .. } => {}
        }
    }
}
