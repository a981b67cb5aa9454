//! All game entity types. Pure data, no logic beyond geometry.

// ── Sprites ───────────────────────────────────────────────────────────────────

/// Which bundled image an entity is drawn with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpriteKind {
    Background,
    Bird,
    UpperPipe,
    LowerPipe,
}

// ── Status ────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    /// Waiting for the Start button. Nothing moves.
    NotStarted,
    Running,
    /// Physics frozen until restart.
    GameOver,
}

// ── Geometry ──────────────────────────────────────────────────────────────────

/// Axis-aligned rectangle in playfield units. `(x, y)` is the top-left corner.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Rect { x, y, width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Strict overlap test: rectangles that only share an edge do not
    /// intersect, and an empty rectangle intersects nothing.
    pub fn intersects(&self, other: &Rect) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        // i64 so that far off-screen pipes cannot overflow the sums
        let (ax, ay) = (self.x as i64, self.y as i64);
        let (bx, by) = (other.x as i64, other.y as i64);
        ax < bx + other.width as i64
            && bx < ax + self.width as i64
            && ay < by + other.height as i64
            && by < ay + self.height as i64
    }

    /// Half-open containment, used for pointer hit-testing.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }
}

// ── Player ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    /// Positive = falling.
    pub velocity_y: i32,
    pub sprite: SpriteKind,
}

impl Player {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

// ── Pipes ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Pipe {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    /// Constant leftward scroll per tick (negative).
    pub velocity_x: i32,
    pub passed: bool,
    pub sprite: SpriteKind,
}

impl Pipe {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

/// An upper and a lower pipe spawned together around one gap.
/// Scored once, through the upper pipe's `passed` flag.
#[derive(Clone, Debug, PartialEq)]
pub struct PipePair {
    pub upper: Pipe,
    pub lower: Pipe,
}

impl PipePair {
    /// Vertical opening between the two pipes.
    pub fn gap(&self) -> i32 {
        self.lower.y - (self.upper.y + self.upper.height)
    }

    pub fn passed(&self) -> bool {
        self.upper.passed
    }
}

// ── Master game state ─────────────────────────────────────────────────────────

/// The entire game state. Cloneable so pure update functions can
/// return a new copy without mutating the original.
#[derive(Clone, Debug, PartialEq)]
pub struct GameState {
    pub player: Player,
    /// Pairs in spawn order.
    pub pipe_pairs: Vec<PipePair>,
    pub score: u32,
    pub status: GameStatus,
    pub frame: u64,
    pub width: i32,
    pub height: i32,
}

impl GameState {
    /// Every pipe in insertion order: upper then lower for each pair.
    pub fn pipes(&self) -> impl Iterator<Item = &Pipe> {
        self.pipe_pairs
            .iter()
            .flat_map(|pair| [&pair.upper, &pair.lower])
    }

    pub fn is_running(&self) -> bool {
        self.status == GameStatus::Running
    }

    pub fn is_over(&self) -> bool {
        self.status == GameStatus::GameOver
    }
}
