use std::fs::File;
use std::io::{self, stdout, BufWriter, Write};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    terminal, ExecutableCommand,
};
use log::{error, info};
use rand::thread_rng;

use flappy_bird::assets::Assets;
use flappy_bird::config::Config;
use flappy_bird::controller::{Control, GameController, GameInput};
use flappy_bird::display::{Renderer, Viewport};

/// Longest the loop sleeps while no timer is armed (before the first start).
const IDLE_WAIT: Duration = Duration::from_millis(50);

// ── Logging ───────────────────────────────────────────────────────────────────

/// The terminal is in raw alternate-screen mode, so logs go to a file in the
/// temp directory. Verbosity comes from `RUST_LOG` (default `warn`).
fn init_logging() {
    let env = env_logger::Env::default().default_filter_or("warn");
    let mut builder = env_logger::Builder::from_env(env);
    let path = std::env::temp_dir().join("flappy_bird.log");
    match File::create(&path) {
        Ok(file) => {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
        Err(_) => {
            builder.filter_level(log::LevelFilter::Off);
        }
    }
    let _ = builder.try_init();
}

// ── Input mapping ─────────────────────────────────────────────────────────────

fn map_event(event: &Event, viewport: &Viewport) -> Option<GameInput> {
    match event {
        Event::Key(KeyEvent {
            code,
            kind: KeyEventKind::Press,
            modifiers,
            ..
        }) => match code {
            KeyCode::Char(' ') | KeyCode::Up => Some(GameInput::Flap),
            KeyCode::Enter => Some(GameInput::Start),
            KeyCode::Char('r') | KeyCode::Char('R') => Some(GameInput::Restart),
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                Some(GameInput::Quit)
            }
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(GameInput::Quit),
            _ => None,
        },
        Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            ..
        }) => {
            let (x, y) = viewport.cell_to_logical(*column, *row);
            Some(GameInput::Click { x, y })
        }
        _ => None,
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Runs until the player quits or presses Exit.
///
/// Both timers live in the controller; this loop only feeds it the clock and
/// input, redraws when something changed, and sleeps on the input channel
/// until the next timer is due.
fn game_loop<W: Write>(
    out: &mut W,
    controller: &mut GameController<impl rand::Rng>,
    renderer: &mut Renderer,
    assets: &Assets,
    rx: &mpsc::Receiver<Event>,
) -> io::Result<()> {
    let mut dirty = true;
    let mut carried: Option<Event> = None;

    loop {
        let now = Instant::now();

        // ── Drain all pending input events (non-blocking) ─────────────────────
        let pending = carried.take();
        for ev in pending.into_iter().chain(std::iter::from_fn(|| rx.try_recv().ok())) {
            if let Event::Resize(cols, rows) = ev {
                renderer.resize(cols, rows, controller.config());
                dirty = true;
                continue;
            }
            if let Some(input) = map_event(&ev, renderer.viewport()) {
                if controller.handle_input(input, now) == Control::Exit {
                    return Ok(());
                }
                dirty = true;
            }
        }

        if controller.update(now) {
            dirty = true;
        }

        if dirty {
            renderer.render(out, controller.state(), assets, controller.config())?;
            dirty = false;
        }

        // ── Sleep until the next timer or the next key, whichever is first ───
        let wait = controller
            .time_until_next_event(Instant::now())
            .map_or(IDLE_WAIT, |d| d.min(IDLE_WAIT));
        match rx.recv_timeout(wait) {
            Ok(ev) => carried = Some(ev),
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => {
                return Err(io::Error::new(
                    io::ErrorKind::BrokenPipe,
                    "terminal input stream closed",
                ));
            }
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> io::Result<()> {
    init_logging();

    // Decode before touching the terminal so a broken asset reports plainly
    let assets = Assets::load().map_err(|e| {
        error!("{e}");
        io::Error::from(e)
    })?;

    let mut out = BufWriter::new(stdout());

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(terminal::SetTitle("Flappy Bird"))?;
    out.execute(terminal::DisableLineWrap)?;
    out.execute(cursor::Hide)?;
    out.execute(EnableMouseCapture)?;

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

    let result = run(&mut out, &assets, &rx);

    // Always restore the terminal
    let _ = out.execute(DisableMouseCapture);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::EnableLineWrap);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    if let Err(e) = &result {
        error!("terminated with error: {e}");
    }
    result
}

fn run<W: Write>(out: &mut W, assets: &Assets, rx: &mpsc::Receiver<Event>) -> io::Result<()> {
    let config = Config::default();
    let (cols, rows) = terminal::size()?;
    info!("terminal {cols}x{rows}, playfield {}x{}", config.frame_width, config.frame_height);

    let mut renderer = Renderer::new(cols, rows, &config);
    let mut controller = GameController::new(config, thread_rng());
    game_loop(out, &mut controller, &mut renderer, assets, rx)
}
