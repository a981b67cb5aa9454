//! The game controller: owns the state, the RNG and both timers, and turns
//! input events and elapsed time into state transitions.
//!
//! Everything runs on the caller's thread. The frame loop feeds it input
//! and the current `Instant`, then redraws from [`GameController::state`].

use std::time::{Duration, Instant};

use log::{debug, info, warn};
use rand::Rng;

use crate::compute::{flap, init_state, place_pipes, restart, start_game, tick};
use crate::config::Config;
use crate::entities::{GameState, GameStatus, Rect};
use crate::timer::RepeatingTimer;

/// Upper bound on physics ticks replayed by a single [`GameController::update`].
/// A stalled terminal drops the excess instead of fast-forwarding the bird.
pub const MAX_CATCH_UP_TICKS: u32 = 5;

// ── Input ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameInput {
    Flap,
    Start,
    Restart,
    /// Pointer press at a playfield position (logical units).
    Click { x: i32, y: i32 },
    /// Close the game from anywhere (window close, Q, Esc).
    Quit,
}

/// What the frame loop should do after handling an input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Control {
    Continue,
    Exit,
}

// ── Buttons ───────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Button {
    Start,
    Exit,
}

impl Button {
    pub fn label(&self) -> &'static str {
        match self {
            Button::Start => "Start",
            Button::Exit => "Exit",
        }
    }

    /// Bounds in playfield units.
    pub fn rect(&self, config: &Config) -> Rect {
        match self {
            Button::Start => {
                let (w, h) = (100, 50);
                Rect::new(
                    (config.frame_width - w) / 2,
                    (config.frame_height - h) / 2,
                    w,
                    h,
                )
            }
            Button::Exit => {
                let (w, h) = (100, 40);
                Rect::new(
                    (config.frame_width - w) / 2,
                    config.frame_height / 2 + 80,
                    w,
                    h,
                )
            }
        }
    }

    /// Start shows until the first start; Exit only after a game over.
    pub fn visible_for(status: GameStatus) -> &'static [Button] {
        match status {
            GameStatus::NotStarted => &[Button::Start],
            GameStatus::Running => &[],
            GameStatus::GameOver => &[Button::Exit],
        }
    }
}

// ── Controller ────────────────────────────────────────────────────────────────

pub struct GameController<R: Rng> {
    config: Config,
    state: GameState,
    rng: R,
    game_loop: RepeatingTimer,
    pipes_cooldown: RepeatingTimer,
}

impl<R: Rng> GameController<R> {
    pub fn new(config: Config, rng: R) -> Self {
        let state = init_state(&config);
        let game_loop = RepeatingTimer::new(config.tick_interval);
        let pipes_cooldown = RepeatingTimer::new(config.spawn_interval);
        GameController {
            config,
            state,
            rng,
            game_loop,
            pipes_cooldown,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn timers_running(&self) -> bool {
        self.game_loop.is_running() && self.pipes_cooldown.is_running()
    }

    fn start_timers(&mut self, now: Instant) {
        self.game_loop.start(now);
        self.pipes_cooldown.start(now);
    }

    pub fn handle_input(&mut self, input: GameInput, now: Instant) -> Control {
        match input {
            GameInput::Flap => {
                self.state = flap(&self.state, &self.config);
            }
            GameInput::Start => {
                if self.state.status == GameStatus::NotStarted {
                    self.state = start_game(&self.state);
                    self.start_timers(now);
                }
            }
            GameInput::Restart => {
                if self.state.is_over() {
                    self.state = restart(&self.state, &self.config);
                    self.start_timers(now);
                }
            }
            GameInput::Click { x, y } => {
                let pressed = Button::visible_for(self.state.status)
                    .iter()
                    .copied()
                    .find(|b| b.rect(&self.config).contains(x, y));
                match pressed {
                    Some(Button::Start) => return self.handle_input(GameInput::Start, now),
                    Some(Button::Exit) => {
                        info!("exit button pressed");
                        return Control::Exit;
                    }
                    None => debug!("click at ({x}, {y}) missed every button"),
                }
            }
            GameInput::Quit => return Control::Exit,
        }
        Control::Continue
    }

    /// Fire whatever timers are due at `now`. Returns true when at least one
    /// physics tick ran, meaning the frame needs a redraw.
    pub fn update(&mut self, now: Instant) -> bool {
        // Spawn fires only count while running; otherwise they are consumed
        for _ in 0..self.pipes_cooldown.poll(now) {
            self.state = place_pipes(&self.state, &self.config, &mut self.rng);
        }

        let due = self.game_loop.poll(now);
        if due > MAX_CATCH_UP_TICKS {
            warn!("frame loop fell behind: dropping {} ticks", due - MAX_CATCH_UP_TICKS);
        }
        let ticks = due.min(MAX_CATCH_UP_TICKS);
        for _ in 0..ticks {
            self.state = tick(&self.state, &self.config);
        }
        ticks > 0
    }

    /// How long the frame loop may wait before the next timer is due.
    pub fn time_until_next_event(&self, now: Instant) -> Option<Duration> {
        match (
            self.game_loop.remaining(now),
            self.pipes_cooldown.remaining(now),
        ) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }
}
