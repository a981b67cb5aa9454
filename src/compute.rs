//! Pure game-logic functions.
//!
//! Every public function takes an immutable reference to the current
//! `GameState` (plus the `Config`, and an RNG handle where needed) and
//! returns a brand-new `GameState`. Side effects are limited to the
//! injected RNG and log output.

use log::{debug, info, trace};
use rand::Rng;

use crate::config::Config;
use crate::entities::{GameState, GameStatus, Pipe, PipePair, Player, SpriteKind};

// ── Constructors ─────────────────────────────────────────────────────────────

fn spawn_player(config: &Config) -> Player {
    Player {
        x: config.player_start_x(),
        y: config.player_start_y(),
        width: config.player_width,
        height: config.player_height,
        velocity_y: 0,
        sprite: SpriteKind::Bird,
    }
}

/// Build the initial state: player parked in the centre, waiting for Start.
pub fn init_state(config: &Config) -> GameState {
    GameState {
        player: spawn_player(config),
        pipe_pairs: Vec::new(),
        score: 0,
        status: GameStatus::NotStarted,
        frame: 0,
        width: config.frame_width,
        height: config.frame_height,
    }
}

// ── Status transitions (pure) ────────────────────────────────────────────────

/// NotStarted → Running. Any other status is returned unchanged.
pub fn start_game(state: &GameState) -> GameState {
    if state.status != GameStatus::NotStarted {
        return state.clone();
    }
    info!("game started");
    GameState {
        status: GameStatus::Running,
        ..state.clone()
    }
}

/// GameOver → Running with a fresh round: score zeroed, pipes cleared,
/// player re-centred vertically with zero velocity.
pub fn restart(state: &GameState, config: &Config) -> GameState {
    if state.status != GameStatus::GameOver {
        return state.clone();
    }
    info!("restart after scoring {}", state.score);
    GameState {
        player: Player {
            y: config.player_start_y(),
            velocity_y: 0,
            ..state.player.clone()
        },
        pipe_pairs: Vec::new(),
        score: 0,
        status: GameStatus::Running,
        ..state.clone()
    }
}

// ── Input-driven state transitions (pure) ───────────────────────────────────

/// Set the upward impulse. Ignored unless the round is running.
pub fn flap(state: &GameState, config: &Config) -> GameState {
    if !state.is_running() {
        return state.clone();
    }
    GameState {
        player: Player {
            velocity_y: config.flap_velocity,
            ..state.player.clone()
        },
        ..state.clone()
    }
}

// ── Spawning (RNG is injected) ───────────────────────────────────────────────

/// Append one upper/lower pipe pair just beyond the right edge.
///
/// The upper pipe's top sits somewhere in
/// `(start_y - h/4 - h/2, start_y - h/4]` for pipe height `h`, so most of
/// it hangs above the playfield; the lower pipe follows after a gap of a
/// quarter of the playfield height.
pub fn place_pipes(state: &GameState, config: &Config, rng: &mut impl Rng) -> GameState {
    if !state.is_running() {
        return state.clone();
    }

    let spread = rng.gen::<f64>() * (config.pipe_height / 2) as f64;
    // `as` truncates toward zero, matching an integer cast of the sum
    let random_y = ((config.pipe_start_y - config.pipe_height / 4) as f64 - spread) as i32;
    let gap = config.gap_height();

    let upper = Pipe {
        x: state.width,
        y: random_y,
        width: config.pipe_width,
        height: config.pipe_height,
        velocity_x: config.pipe_velocity_x,
        passed: false,
        sprite: SpriteKind::UpperPipe,
    };
    let lower = Pipe {
        y: random_y + gap + config.pipe_height,
        sprite: SpriteKind::LowerPipe,
        ..upper.clone()
    };
    debug!("pipe pair spawned: upper y={} lower y={}", upper.y, lower.y);

    let mut pipe_pairs = state.pipe_pairs.clone();
    pipe_pairs.push(PipePair { upper, lower });
    GameState {
        pipe_pairs,
        ..state.clone()
    }
}

// ── Collision ────────────────────────────────────────────────────────────────

pub fn check_collision(player: &Player, pipe: &Pipe) -> bool {
    player.rect().intersects(&pipe.rect())
}

// ── Per-frame tick ───────────────────────────────────────────────────────────

/// Advance the simulation by one tick. A no-op outside `Running`.
pub fn tick(state: &GameState, config: &Config) -> GameState {
    if !state.is_running() {
        return state.clone();
    }
    let frame = state.frame + 1;

    // ── 1. Gravity; the ceiling stops the bird but keeps its velocity ───────
    let velocity_y = state.player.velocity_y + config.gravity;
    let player = Player {
        y: (state.player.y + velocity_y).max(0),
        velocity_y,
        ..state.player.clone()
    };

    // ── 2. Scroll pipes and test every one against the player ───────────────
    let mut hit = false;
    let mut pipe_pairs: Vec<PipePair> = state
        .pipe_pairs
        .iter()
        .map(|pair| {
            let mut pair = pair.clone();
            for pipe in [&mut pair.upper, &mut pair.lower] {
                pipe.x += pipe.velocity_x;
                if check_collision(&player, pipe) {
                    hit = true;
                }
            }
            pair
        })
        .collect();

    // ── 3. One point per pair once it is fully behind the player ────────────
    let mut score = state.score;
    for pair in pipe_pairs.iter_mut() {
        if !pair.upper.passed && pair.upper.x + pair.upper.width < player.x {
            pair.upper.passed = true;
            pair.lower.passed = true;
            score += 1;
        }
    }

    // Pairs that have scrolled off the left edge can never score or collide
    pipe_pairs.retain(|pair| pair.upper.x + pair.upper.width >= 0);

    // ── 4. Falling out of the bottom ────────────────────────────────────────
    let out_of_bounds = player.y + player.height >= state.height;

    let status = if hit || out_of_bounds {
        info!(
            "game over at frame {frame}: score={score} ({})",
            if hit { "hit a pipe" } else { "fell out" }
        );
        GameStatus::GameOver
    } else {
        GameStatus::Running
    };
    trace!("tick {frame}: y={} vy={}", player.y, player.velocity_y);

    GameState {
        player,
        pipe_pairs,
        score,
        status,
        frame,
        ..state.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_player_uses_config_geometry() {
        let config = Config::default();
        let p = spawn_player(&config);
        assert_eq!((p.x, p.y), (45, 320));
        assert_eq!((p.width, p.height), (34, 24));
        assert_eq!(p.velocity_y, 0);
    }
}
