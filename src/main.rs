mod display;

use std::collections::HashMap;
use std::io::{stdout, BufWriter, Write};
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, KeyboardEnhancementFlags, MouseButton, MouseEvent, MouseEventKind,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

use display::TerminalSink;
use stillpoint::config::GameConfig;
use stillpoint::game::Game;
use stillpoint::input::{Edge, InputState};
use stillpoint::score::FileScoreStore;

const FRAME: Duration = Duration::from_millis(33); // ≈30 FPS

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames. Covers terminals that don't emit key-release events:
/// OS key-repeat refreshes the key well before the window expires.
const HOLD_WINDOW: u64 = 4;

const CONFIG_ENV: &str = "STILLPOINT_CONFIG";

fn is_held(key_frame: &HashMap<KeyCode, u64>, keys: &[KeyCode], frame: u64) -> bool {
    keys.iter().any(|key| {
        key_frame
            .get(key)
            .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
            .unwrap_or(false)
    })
}

// ── Ambient setup ─────────────────────────────────────────────────────────────

fn home_dir() -> PathBuf {
    PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".to_string()))
}

/// The terminal is the render surface, so log records go to a file.
fn init_logging() {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    match std::fs::File::create(home_dir().join(".stillpoint.log")) {
        Ok(file) => {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
        Err(_) => {
            builder.filter_level(log::LevelFilter::Off);
        }
    }
    let _ = builder.try_init();
}

fn load_config() -> GameConfig {
    let Some(path) = std::env::var_os(CONFIG_ENV) else {
        return GameConfig::default();
    };
    match GameConfig::from_json_file(PathBuf::from(path).as_path()) {
        Ok(cfg) => {
            log::info!("loaded config overrides from ${CONFIG_ENV}");
            cfg
        }
        Err(err) => {
            log::warn!("ignoring ${CONFIG_ENV}: {err:#}");
            GameConfig::default()
        }
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Runs until the player quits.
///
/// Held keys are tracked through `key_frame`, which records the frame of the
/// last press/repeat event per key; key-release capable terminals remove the
/// entry on release, classic ones let it expire after `HOLD_WINDOW` frames.
/// Mouse capture supplies aim, fire (button held) and clicks.
fn game_loop<W: Write>(
    out: &mut W,
    game: &mut Game,
    rx: &mpsc::Receiver<Event>,
) -> anyhow::Result<()> {
    let (cols, rows) = terminal::size().context("querying terminal size")?;
    let mut sink = TerminalSink::new(cols, rows, game.config().arena.size());
    let mut input = InputState::new();

    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut mouse_down = false;
    let mut frame: u64 = 0;
    let mut last = Instant::now();

    loop {
        let frame_start = Instant::now();
        frame += 1;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            match ev {
                Event::Key(KeyEvent { code, kind, modifiers, .. }) => match kind {
                    KeyEventKind::Press => {
                        key_frame.insert(code, frame);
                        match code {
                            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                                return Ok(());
                            }
                            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                                return Ok(());
                            }
                            KeyCode::Enter => input.press(Edge::Enter),
                            KeyCode::Char(' ') => input.press(Edge::Dash),
                            KeyCode::Char('r') | KeyCode::Char('R') => input.press(Edge::Restart),
                            KeyCode::Char(c @ '1'..='9') => {
                                input.press(Edge::Digit(c as u8 - b'0'));
                            }
                            _ => {}
                        }
                    }
                    KeyEventKind::Repeat => {
                        key_frame.insert(code, frame);
                    }
                    KeyEventKind::Release => {
                        key_frame.remove(&code);
                    }
                },
                Event::Mouse(MouseEvent { kind, column, row, .. }) => {
                    input.mouse = sink.to_logical(column, row);
                    match kind {
                        MouseEventKind::Down(MouseButton::Left) => {
                            mouse_down = true;
                            input.press(Edge::Click);
                        }
                        MouseEventKind::Up(MouseButton::Left) => mouse_down = false,
                        _ => {}
                    }
                }
                Event::Resize(cols, rows) => sink.resize(cols, rows),
                _ => {}
            }
        }

        // ── Held-key state for this frame ─────────────────────────────────────
        input.up = is_held(&key_frame, &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')], frame);
        input.down =
            is_held(&key_frame, &[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')], frame);
        input.left =
            is_held(&key_frame, &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')], frame);
        input.right =
            is_held(&key_frame, &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')], frame);
        input.fire_held =
            mouse_down || is_held(&key_frame, &[KeyCode::Char('f'), KeyCode::Char('F')], frame);

        let now = Instant::now();
        let real_dt = now.duration_since(last).as_secs_f32();
        last = now;

        game.advance(real_dt, &mut input);
        game.render(&mut sink);
        sink.present(out).context("drawing frame")?;
        input.end_frame();

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            std::thread::sleep(FRAME - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    init_logging();
    let cfg = load_config();
    let store = FileScoreStore::default_location();
    log::info!("high score file: {}", store.path().display());
    let mut game = Game::new(cfg, Box::new(store), StdRng::from_entropy());

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;
    out.execute(EnableMouseCapture)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Kitty-protocol terminals support this; others fall back gracefully.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // receiver dropped → program exiting
                }
            }
            Err(_) => break,
        }
    });

    let result = game_loop(&mut out, &mut game, &rx);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(DisableMouseCapture);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    if let Err(err) = &result {
        log::error!("exiting: {err:#}");
    }
    log::info!("final score {}, best {}", game.score().round() as u64, game.high_score());
    result
}
