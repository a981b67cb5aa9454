use std::time::{Duration, Instant};

use flappy_bird::config::Config;
use flappy_bird::controller::*;
use flappy_bird::entities::GameStatus;
use flappy_bird::timer::RepeatingTimer;

use rand::rngs::StdRng;
use rand::SeedableRng;

fn controller(config: Config) -> GameController<StdRng> {
    GameController::new(config, StdRng::seed_from_u64(7))
}

/// Physics effectively paused so only the spawn timer fires.
fn spawn_only_config() -> Config {
    Config {
        tick_interval: Duration::from_secs(3600),
        ..Config::default()
    }
}

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

// ── RepeatingTimer ────────────────────────────────────────────────────────────

#[test]
fn timer_fires_once_per_interval() {
    let t0 = Instant::now();
    let mut timer = RepeatingTimer::new(ms(100));
    timer.start(t0);
    assert_eq!(timer.poll(t0 + ms(99)), 0);
    assert_eq!(timer.poll(t0 + ms(100)), 1);
    assert_eq!(timer.poll(t0 + ms(150)), 0);
    assert_eq!(timer.poll(t0 + ms(200)), 1);
}

#[test]
fn late_poll_reports_every_missed_fire() {
    let t0 = Instant::now();
    let mut timer = RepeatingTimer::new(ms(100));
    timer.start(t0);
    assert_eq!(timer.poll(t0 + ms(350)), 3);
    assert_eq!(timer.remaining(t0 + ms(350)), Some(ms(50)));
}

#[test]
fn start_while_running_keeps_phase() {
    let t0 = Instant::now();
    let mut timer = RepeatingTimer::new(ms(100));
    timer.start(t0);
    timer.start(t0 + ms(60));
    assert_eq!(timer.poll(t0 + ms(100)), 1);
}

// ── Start ─────────────────────────────────────────────────────────────────────

#[test]
fn nothing_happens_before_start() {
    let t0 = Instant::now();
    let mut c = controller(Config::default());
    assert!(!c.update(t0 + Duration::from_secs(10)));
    assert_eq!(c.state().status, GameStatus::NotStarted);
    assert!(c.state().pipe_pairs.is_empty());
    assert_eq!(c.time_until_next_event(t0), None);
}

#[test]
fn start_key_starts_both_timers() {
    let t0 = Instant::now();
    let mut c = controller(Config::default());
    assert_eq!(c.handle_input(GameInput::Start, t0), Control::Continue);
    assert_eq!(c.state().status, GameStatus::Running);
    assert!(c.timers_running());
    assert_eq!(c.time_until_next_event(t0), Some(ms(16)));
}

#[test]
fn clicking_start_button_starts_game() {
    let t0 = Instant::now();
    let config = Config::default();
    let button = Button::Start.rect(&config);
    let mut c = controller(config);
    c.handle_input(
        GameInput::Click {
            x: button.x + 5,
            y: button.y + 5,
        },
        t0,
    );
    assert_eq!(c.state().status, GameStatus::Running);
}

#[test]
fn click_outside_buttons_is_ignored() {
    let t0 = Instant::now();
    let mut c = controller(Config::default());
    assert_eq!(
        c.handle_input(GameInput::Click { x: 1, y: 1 }, t0),
        Control::Continue
    );
    assert_eq!(c.state().status, GameStatus::NotStarted);
}

// ── Ticks and spawns ──────────────────────────────────────────────────────────

#[test]
fn one_pair_at_right_edge_after_spawn_interval() {
    let t0 = Instant::now();
    let mut c = controller(spawn_only_config());
    c.handle_input(GameInput::Start, t0);

    c.update(t0 + ms(3499));
    assert!(c.state().pipe_pairs.is_empty());

    c.update(t0 + ms(3500));
    assert_eq!(c.state().pipe_pairs.len(), 1);
    assert_eq!(c.state().pipe_pairs[0].upper.x, 360);
    assert_eq!(c.state().pipe_pairs[0].lower.x, 360);
}

#[test]
fn ticks_follow_the_game_loop_timer() {
    let t0 = Instant::now();
    let mut c = controller(Config::default());
    c.handle_input(GameInput::Start, t0);
    // Ticks at 16 ms: drive them one at a time so catch-up never drops any
    for n in 1..=10u32 {
        assert!(c.update(t0 + ms(16) * n));
    }
    assert_eq!(c.state().frame, 10);
    assert_eq!(c.state().player.velocity_y, 10);
    assert_eq!(c.state().player.y, 320 + 55);
}

#[test]
fn stalled_loop_replays_at_most_the_catch_up_budget() {
    let t0 = Instant::now();
    let mut c = controller(Config::default());
    c.handle_input(GameInput::Start, t0);
    assert!(c.update(t0 + Duration::from_secs(1)));
    assert_eq!(c.state().frame, MAX_CATCH_UP_TICKS as u64);
}

#[test]
fn flap_through_controller() {
    let t0 = Instant::now();
    let mut c = controller(Config::default());
    c.handle_input(GameInput::Start, t0);
    c.handle_input(GameInput::Flap, t0);
    assert_eq!(c.state().player.velocity_y, -10);
    c.update(t0 + ms(16));
    assert_eq!(c.state().player.velocity_y, -9);
    assert_eq!(c.state().player.y, 311);
}

// ── Game over, exit and restart ──────────────────────────────────────────────

fn crash(c: &mut GameController<StdRng>, t0: Instant) -> Instant {
    c.handle_input(GameInput::Start, t0);
    let mut now = t0;
    while c.state().status == GameStatus::Running {
        now += ms(16);
        c.update(now);
    }
    now
}

#[test]
fn falling_bird_ends_game_and_freezes_physics() {
    let t0 = Instant::now();
    let mut c = controller(Config::default());
    let now = crash(&mut c, t0);
    let frozen = c.state().clone();
    assert_eq!(frozen.status, GameStatus::GameOver);

    // Timers keep firing but nothing moves, and no pipes spawn
    c.update(now + Duration::from_secs(4));
    assert_eq!(c.state(), &frozen);
    assert!(c.timers_running());
}

#[test]
fn flap_ignored_after_game_over() {
    let t0 = Instant::now();
    let mut c = controller(Config::default());
    let now = crash(&mut c, t0);
    let vy = c.state().player.velocity_y;
    c.handle_input(GameInput::Flap, now);
    assert_eq!(c.state().player.velocity_y, vy);
}

#[test]
fn exit_button_only_after_game_over() {
    let t0 = Instant::now();
    let config = Config::default();
    let exit = Button::Exit.rect(&config);
    let click = GameInput::Click {
        x: exit.x + 1,
        y: exit.y + 1,
    };

    let mut c = controller(config);
    c.handle_input(GameInput::Start, t0);
    assert_eq!(c.handle_input(click, t0), Control::Continue);

    let now = crash(&mut c, t0);
    assert_eq!(Button::visible_for(c.state().status), &[Button::Exit]);
    assert_eq!(c.handle_input(click, now), Control::Exit);
}

#[test]
fn restart_key_resets_and_resumes() {
    let t0 = Instant::now();
    let mut c = controller(Config::default());
    let now = crash(&mut c, t0);

    c.handle_input(GameInput::Restart, now);
    let s = c.state();
    assert_eq!(s.status, GameStatus::Running);
    assert_eq!(s.score, 0);
    assert_eq!(s.player.y, 320);
    assert_eq!(s.player.velocity_y, 0);
    assert!(s.pipe_pairs.is_empty());
    assert!(Button::visible_for(s.status).is_empty());

    c.update(now + ms(16));
    assert_eq!(c.state().player.y, 321);
}

#[test]
fn restart_ignored_while_running() {
    let t0 = Instant::now();
    let mut c = controller(Config::default());
    c.handle_input(GameInput::Start, t0);
    c.update(t0 + ms(16));
    c.handle_input(GameInput::Restart, t0 + ms(16));
    assert_eq!(c.state().player.y, 321);
}

#[test]
fn quit_works_in_every_state() {
    let t0 = Instant::now();
    let mut c = controller(Config::default());
    assert_eq!(c.handle_input(GameInput::Quit, t0), Control::Exit);
    c.handle_input(GameInput::Start, t0);
    assert_eq!(c.handle_input(GameInput::Quit, t0), Control::Exit);
}

// ── Buttons ───────────────────────────────────────────────────────────────────

#[test]
fn button_layout_matches_playfield() {
    let config = Config::default();
    let start = Button::Start.rect(&config);
    assert_eq!((start.x, start.y, start.width, start.height), (130, 295, 100, 50));
    let exit = Button::Exit.rect(&config);
    assert_eq!((exit.x, exit.y, exit.width, exit.height), (130, 400, 100, 40));
    assert_eq!(Button::Start.label(), "Start");
    assert_eq!(Button::Exit.label(), "Exit");
}
