//! Terminal puyo runner (default binary).
//!
//! Drives the frame-stepped core at 60 Hz, feeds it key intents through
//! crossterm and draws with the framebuffer renderer.

use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event, KeyEventKind};

use puyo_tui::core::{Config, GameEvent, GameState, Scene};
use puyo_tui::input::{is_pause, should_quit, IntentTracker};
use puyo_tui::term::{FrameBuffer, GameView, HudStatus, TerminalRenderer, Viewport};
use puyo_tui::types::{GameMode, TICKS_PER_SECOND, TICK_MS};

#[derive(Debug, Parser)]
#[command(
    name = "puyo-tui",
    version,
    about = "Falling colour pairs: link four or more to clear them"
)]
struct Args {
    /// Colour sequence seed (random when omitted)
    #[arg(long)]
    seed: Option<u32>,

    /// Number of colours dealt, 1 to 5
    #[arg(long, default_value_t = 4, value_name = "N")]
    colors: u8,

    /// Connected cells needed to clear a group
    #[arg(long, default_value_t = 4, value_name = "N")]
    erase_threshold: usize,

    /// Frames a grounded pair may slide before it locks
    #[arg(long, default_value_t = 20, value_name = "FRAMES")]
    ground_frames: u32,

    /// Natural fall speed in pixels per frame
    #[arg(long, default_value_t = 0.9, value_name = "PX")]
    fall_speed: f32,

    /// Fast-drop speed in pixels per frame
    #[arg(long, default_value_t = 15.0, value_name = "PX")]
    drop_speed: f32,

    /// Release a key this long after its last press or repeat
    #[arg(long, default_value_t = 150, value_name = "MS")]
    key_release_ms: u32,
}

impl Args {
    fn to_config(&self) -> Config {
        Config {
            color_count: self.colors,
            erase_threshold: self.erase_threshold,
            ground_frames: self.ground_frames,
            player_fall_speed: self.fall_speed,
            player_down_speed: self.drop_speed,
            ..Config::default()
        }
    }

    fn seed(&self) -> u32 {
        self.seed.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.subsec_nanos() ^ d.as_secs() as u32)
                .unwrap_or(1)
        })
    }
}

/// Totals across every game played in one session.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct Session {
    games: u32,
    best_score: u32,
    best_chain: u32,
    cleared_cells: usize,
    full_clears: u32,
}

impl Session {
    fn record(&mut self, event: GameEvent) {
        match event {
            GameEvent::Cleared { chain, cells, .. } => {
                self.best_chain = self.best_chain.max(chain);
                self.cleared_cells += cells;
            }
            GameEvent::FullClear { .. } => self.full_clears += 1,
            GameEvent::GameOver { score, .. } => {
                self.games += 1;
                self.best_score = self.best_score.max(score);
            }
            GameEvent::Locked { .. } => {}
        }
    }
}

/// Ignore restart presses right after the pile tops out.
const RESTART_GRACE_FRAMES: u32 = TICKS_PER_SECOND / 2;

fn main() -> Result<()> {
    let args = Args::parse();
    let game = GameState::try_new(args.to_config(), args.seed()).context("invalid settings")?;
    let tracker = IntentTracker::new().with_key_release_timeout_ms(args.key_release_ms);

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, game, tracker);

    // Always try to restore terminal state.
    let _ = term.exit();

    let (session, final_score) = result?;
    println!(
        "score {}  best score {}  best chain {}  cells cleared {}  all clears {}  games {}",
        final_score,
        session.best_score.max(final_score),
        session.best_chain,
        session.cleared_cells,
        session.full_clears,
        session.games,
    );
    Ok(())
}

fn run(
    term: &mut TerminalRenderer,
    mut game: GameState,
    mut tracker: IntentTracker,
) -> Result<(Session, u32)> {
    let view = GameView::default();
    let mut scene = Scene::default();
    let mut fb = FrameBuffer::new(0, 0);
    let mut session = Session::default();
    let mut paused = false;
    let mut game_over_at: Option<u32> = None;

    let mut last_tick = Instant::now();
    let tick_duration = Duration::from_millis(TICK_MS as u64);

    loop {
        // Render.
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        game.scene_into(&mut scene);
        let hud = HudStatus {
            paused,
            max_chain: game.max_chain(),
        };
        view.render_into(&scene, hud, Viewport::new(w, h), &mut fb);
        term.draw_swap(&mut fb)?;

        // Input with timeout until next tick.
        let timeout = tick_duration
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => {
                    if key.kind == KeyEventKind::Press && should_quit(key) {
                        return Ok((session, game.score()));
                    }
                    if key.kind == KeyEventKind::Press && is_pause(key) {
                        paused = !paused;
                        tracker.reset();
                    } else if !paused {
                        tracker.handle_key_event(key);
                    }
                }
                Event::Resize(..) => term.invalidate(),
                _ => {}
            }
        }

        if last_tick.elapsed() < tick_duration {
            continue;
        }
        last_tick = Instant::now();
        if paused {
            continue;
        }

        tracker.update(TICK_MS);
        let intents = tracker.snapshot();

        if game.mode() == GameMode::Batankyu {
            let settled = game_over_at
                .map_or(true, |at| game.frame().saturating_sub(at) >= RESTART_GRACE_FRAMES);
            if intents.rotate && settled {
                game.restart();
                game_over_at = None;
                tracker.reset();
                continue;
            }
        }

        game.tick(intents);
        for ev in game.take_events() {
            if let GameEvent::GameOver { frame, .. } = ev {
                game_over_at = Some(frame);
            }
            session.record(ev);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_config() {
        let args = Args::try_parse_from(["puyo-tui"]).expect("parse");
        let config = args.to_config();
        assert_eq!(config, Config::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn flags_map_onto_config() {
        let args = Args::try_parse_from([
            "puyo-tui",
            "--seed",
            "42",
            "--colors",
            "3",
            "--erase-threshold",
            "3",
            "--ground-frames",
            "5",
        ])
        .expect("parse");
        assert_eq!(args.seed(), 42);

        let config = args.to_config();
        assert_eq!(config.color_count, 3);
        assert_eq!(config.erase_threshold, 3);
        assert_eq!(config.ground_frames, 5);
    }

    #[test]
    fn bad_threshold_is_rejected_before_the_terminal_opens() {
        let args =
            Args::try_parse_from(["puyo-tui", "--erase-threshold", "1"]).expect("parse");
        assert!(GameState::try_new(args.to_config(), 1).is_err());
    }

    #[test]
    fn session_tracks_best_values() {
        let mut session = Session::default();
        session.record(GameEvent::Cleared {
            chain: 2,
            cells: 4,
            colors: 1,
            points: 400,
        });
        session.record(GameEvent::Cleared {
            chain: 1,
            cells: 5,
            colors: 1,
            points: 500,
        });
        session.record(GameEvent::FullClear { points: 3600 });
        session.record(GameEvent::GameOver {
            frame: 90,
            score: 4500,
        });

        assert_eq!(session.best_chain, 2);
        assert_eq!(session.cleared_cells, 9);
        assert_eq!(session.full_clears, 1);
        assert_eq!(session.games, 1);
        assert_eq!(session.best_score, 4500);
    }
}
