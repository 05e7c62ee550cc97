use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use console::{Key, Term};
use z_tetris::profile::username_from_answer;
use z_tetris::{
    AnsiTermStyle, GameScreen, Input, LeaderboardUpdate, Profile, RandomPieces, ScoreReporter,
    Session, TermRender,
};
use zenoh::key_expr::KeyExpr;
use zenoh_leaderboard::{
    FallbackScoreSink, LocalScoreStore, ScoreId, ScoreRecord, ScoreSink, SessionExt, Username,
};

/// z_tetris - falling blocks with a shared leaderboard
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Key expression prefix of the score server
    #[arg(short, long)]
    prefix: Option<KeyExpr<'static>>,

    /// Path to Zenoh config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Player name (saved to the profile)
    #[arg(short, long)]
    username: Option<String>,

    /// Local score cache file
    #[arg(long)]
    cache: Option<PathBuf>,

    /// Seed for the piece generator
    #[arg(long)]
    seed: Option<u64>,

    /// Do not connect to a score server; keep scores locally
    #[arg(long)]
    offline: bool,

    /// Frames per second
    #[arg(long, default_value_t = 60)]
    fps: u32,
}

/// Keyboard commands for the frame loop
enum Command {
    Game(Input),
    /// Hard drop, or restart after game over
    Space,
    TogglePause,
    Quit,
}

#[tokio::main(flavor = "multi_thread", worker_threads = 1)]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Logs go to stderr, the screen belongs to the game
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let profile_path = Profile::default_path();
    let mut username = resolve_username(args.username.as_deref(), profile_path.as_ref())?;

    let cache_path = args.cache.clone().or_else(|| {
        profile_path
            .as_ref()
            .and_then(|p| p.parent().map(|dir| dir.join("scores.json")))
    });
    let local = Arc::new(match cache_path {
        Some(path) => LocalScoreStore::open(path),
        None => LocalScoreStore::in_memory(),
    });

    // Keep the zenoh session alive for the whole game
    let mut _zenoh_session = None;
    let sink: Arc<dyn ScoreSink> = if args.offline {
        local.clone()
    } else {
        let zenoh_config = match &args.config {
            Some(path) => zenoh::Config::from_file(path)
                .map_err(|e| anyhow::anyhow!("Failed to load config file: {}", e))?,
            None => zenoh::Config::default(),
        };
        let session = zenoh::open(zenoh_config)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to open zenoh session: {}", e))?;
        let mut builder = session.score_store();
        if let Some(prefix) = args.prefix.clone() {
            builder = builder.prefix(prefix);
        }
        let remote = builder.build();
        _zenoh_session = Some(session);
        Arc::new(FallbackScoreSink::new(Arc::new(remote), local.clone()))
    };

    let (mut reporter, updates) = ScoreReporter::new(sink);
    reporter.refresh();

    let generator = match args.seed {
        Some(seed) => RandomPieces::seeded(seed),
        None => RandomPieces::from_os_rng(),
    };
    let started = Instant::now();
    let now_ms = move || started.elapsed().as_millis() as u64;
    let mut game = Session::new(Box::new(generator), now_ms());

    // First run: ask for a name while the game is paused
    if username.is_none() {
        game.pause(now_ms());
        let name = tokio::task::spawn_blocking(prompt_username).await??;
        if let Some(path) = &profile_path
            && let Err(e) = Profile::new(name.clone()).save(path)
        {
            tracing::warn!("Failed to save profile: {}", e);
        }
        username = Some(name);
        game.resume(now_ms());
    }
    let username = username.unwrap_or_default();

    // Spawn keyboard input task with separate term
    let (commands, command_receiver) = flume::unbounded();
    let keyboard_task = tokio::task::spawn_blocking(move || {
        let input_term = Term::stdout();
        loop {
            let key = match input_term.read_key() {
                Ok(key) => key,
                Err(e) => {
                    tracing::error!("Keyboard input stopped: {}", e);
                    let _ = commands.send(Command::Quit);
                    break;
                }
            };
            let command = match key {
                Key::ArrowLeft => Some(Command::Game(Input::MoveLeft)),
                Key::ArrowRight => Some(Command::Game(Input::MoveRight)),
                Key::ArrowDown => Some(Command::Game(Input::MoveDown)),
                Key::ArrowUp => Some(Command::Game(Input::Rotate)),
                Key::Char(' ') => Some(Command::Space),
                Key::Char('c') | Key::Char('C') => Some(Command::Game(Input::Hold)),
                Key::Char('p') | Key::Char('P') => Some(Command::TogglePause),
                Key::Char('q') | Key::Char('Q') => {
                    let _ = commands.send(Command::Quit);
                    break;
                }
                _ => None,
            };
            if let Some(command) = command
                && commands.send(command).is_err()
            {
                break;
            }
        }
    });

    let render_term = Term::stdout();
    render_term.clear_screen()?;
    render_term.hide_cursor()?;

    let mut leaderboard: Vec<ScoreRecord> = Vec::new();
    let mut highlight: Option<ScoreId> = None;
    let mut status_line = if args.offline {
        "Offline: scores are kept locally".to_string()
    } else {
        String::new()
    };

    let fps = args.fps.max(1);
    let mut frames = tokio::time::interval(Duration::from_secs_f64(1.0 / f64::from(fps)));
    frames.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    'frames: loop {
        frames.tick().await;
        let now = now_ms();

        while let Ok(command) = command_receiver.try_recv() {
            match command {
                Command::Game(input) => {
                    game.handle_input(input, now);
                }
                Command::Space => {
                    if game.is_game_over() {
                        game.restart(now);
                        highlight = None;
                    } else {
                        game.handle_input(Input::HardDrop, now);
                    }
                }
                Command::TogglePause => game.toggle_pause(now),
                Command::Quit => break 'frames,
            }
            // Report before a later command in the queue restarts the game
            if let Some(line) = report_finished(&mut game, &mut reporter, &username) {
                status_line = line;
            }
        }

        game.tick(now);

        if let Some(line) = report_finished(&mut game, &mut reporter, &username) {
            status_line = line;
        }

        while let Ok(update) = updates.try_recv() {
            match update {
                LeaderboardUpdate::Loaded(top_scores) => leaderboard = top_scores,
                LeaderboardUpdate::Submitted {
                    saved, top_scores, ..
                } => {
                    status_line = format!("Saved score {} for {}", saved.score, saved.username);
                    highlight = Some(saved.id);
                    leaderboard = top_scores;
                }
            }
        }

        let snapshot = game.snapshot(now);
        let screen = GameScreen {
            snapshot: &snapshot,
            username: username.as_str(),
            leaderboard: &leaderboard,
            highlight: highlight.as_ref(),
            message: vec![
                "←/→/↓ move  ↑ rotate  Space drop  c hold  p pause  q quit".to_string(),
                status_line.clone(),
            ],
        };
        render_screen(&render_term, &screen)?;
    }

    keyboard_task.abort();
    render_term.show_cursor()?;
    println!("Bye, {}!", username);
    Ok(())
}

/// Hand a finished game to the reporter; returns the status line to show
fn report_finished(
    game: &mut Session,
    reporter: &mut ScoreReporter,
    username: &Username,
) -> Option<String> {
    let result = game.take_result()?;
    reporter.report(result, username);
    Some(format!("Game over, score {}. Space to play again", result.score))
}

/// Username from the command line or the saved profile; `None` on first run
fn resolve_username(
    from_args: Option<&str>,
    profile_path: Option<&PathBuf>,
) -> anyhow::Result<Option<Username>> {
    if let Some(name) = from_args {
        let username = Username::new(name)?;
        if let Some(path) = profile_path {
            Profile::new(username.clone())
                .save(path)
                .context("Failed to save profile")?;
        }
        return Ok(Some(username));
    }
    let Some(path) = profile_path else {
        return Ok(Some(Username::default()));
    };
    match Profile::load(path) {
        Ok(profile) => Ok(profile.map(|p| p.username)),
        Err(e) => {
            tracing::warn!("Ignoring unreadable profile: {:#}", e);
            Ok(None)
        }
    }
}

fn prompt_username() -> anyhow::Result<Username> {
    let term = Term::stdout();
    term.write_str("Enter your name [Player]: ")?;
    let answer = term.read_line()?;
    match username_from_answer(&answer) {
        Ok(username) => Ok(username),
        Err(e) => {
            term.write_line(&format!("{}; playing as {}", e, Username::default()))?;
            Ok(Username::default())
        }
    }
}

fn render_screen(term: &Term, screen: &GameScreen<'_>) -> anyhow::Result<()> {
    term.move_cursor_to(0, 0)?;
    for line in screen.render(&AnsiTermStyle) {
        term.write_line(&format!("{}\x1b[0m\x1b[K", line))?;
    }
    term.flush()?;
    Ok(())
}
