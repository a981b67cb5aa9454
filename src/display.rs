//! Rendering layer: all terminal I/O lives here.
//!
//! Sprites are composited into a pixel buffer in playfield space, then the
//! buffer is flushed as half-block cells (`▀`: foreground = top pixel,
//! background = bottom pixel). Text and button labels are printed on top
//! afterwards. No game logic is performed here.

use std::io::{self, Write};

use crossterm::{
    cursor,
    style::{self, Attribute, Color, Print},
    QueueableCommand,
};

use crate::assets::{Assets, Image};
use crate::config::Config;
use crate::controller::Button;
use crate::entities::{GameState, GameStatus, Rect, SpriteKind};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_LETTERBOX: Rgb = Rgb(12, 12, 16);
const C_BUTTON_START: Rgb = Rgb(255, 255, 255);
const C_BUTTON_EXIT: Rgb = Rgb(220, 40, 40);
const C_BUTTON_EDGE: Rgb = Rgb(40, 40, 40);
const C_TEXT: Color = Color::White;
const C_BUTTON_TEXT: Color = Color::Black;
const C_HINT: Color = Color::DarkGrey;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl From<Rgb> for Color {
    fn from(c: Rgb) -> Color {
        Color::Rgb {
            r: c.0,
            g: c.1,
            b: c.2,
        }
    }
}

// ── Pixel buffer ──────────────────────────────────────────────────────────────

/// Terminal-sized pixel grid: `w` columns by `h = rows * 2` pixels.
pub struct PixelBuf {
    w: usize,
    h: usize,
    px: Vec<Rgb>,
}

impl PixelBuf {
    pub fn new(w: usize, h: usize) -> Self {
        PixelBuf {
            w,
            h,
            px: vec![C_LETTERBOX; w * h],
        }
    }

    pub fn resize(&mut self, w: usize, h: usize) {
        self.w = w;
        self.h = h;
        self.px.resize(w * h, C_LETTERBOX);
    }

    pub fn clear(&mut self, c: Rgb) {
        self.px.fill(c);
    }

    pub fn set(&mut self, x: i32, y: i32, c: Rgb) {
        if x >= 0 && y >= 0 && (x as usize) < self.w && (y as usize) < self.h {
            self.px[y as usize * self.w + x as usize] = c;
        }
    }

    pub fn get(&self, x: usize, y: usize) -> Rgb {
        self.px[y * self.w + x]
    }

    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, c: Rgb) {
        for dy in 0..h {
            for dx in 0..w {
                self.set(x + dx, y + dy, c);
            }
        }
    }

    /// Emit every cell, only switching colours when they change.
    fn flush<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let rows = self.h / 2;
        for row in 0..rows {
            out.queue(cursor::MoveTo(0, row as u16))?;
            let mut prev: Option<(Rgb, Rgb)> = None;
            for col in 0..self.w {
                let top = self.get(col, row * 2);
                let bot = self.get(col, row * 2 + 1);
                if prev != Some((top, bot)) {
                    out.queue(style::SetForegroundColor(top.into()))?;
                    out.queue(style::SetBackgroundColor(bot.into()))?;
                    prev = Some((top, bot));
                }
                out.queue(Print('\u{2580}'))?; // ▀
            }
        }
        out.queue(style::ResetColor)?;
        Ok(())
    }
}

// ── Viewport ──────────────────────────────────────────────────────────────────

/// Uniform mapping from playfield units to terminal pixels, letterboxed and
/// centred so the playfield keeps its aspect ratio.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    cols: u16,
    rows: u16,
    /// Playfield units per pixel.
    scale: f32,
    left: i32,
    top: i32,
    width: i32,
    height: i32,
}

impl Viewport {
    pub fn fit(cols: u16, rows: u16, config: &Config) -> Viewport {
        let cols = cols.max(1);
        let rows = rows.max(1);
        let px_w = cols as f32;
        let px_h = rows as f32 * 2.0;
        let scale = (config.frame_width as f32 / px_w).max(config.frame_height as f32 / px_h);
        let width = ((config.frame_width as f32 / scale).floor() as i32).max(1);
        let height = ((config.frame_height as f32 / scale).floor() as i32).max(1);
        Viewport {
            cols,
            rows,
            scale,
            left: (px_w as i32 - width) / 2,
            top: (px_h as i32 - height) / 2,
            width,
            height,
        }
    }

    pub fn cols(&self) -> u16 {
        self.cols
    }

    pub fn rows(&self) -> u16 {
        self.rows
    }

    /// Playfield bounds in pixels.
    pub fn pixel_bounds(&self) -> Rect {
        Rect::new(self.left, self.top, self.width, self.height)
    }

    pub fn to_pixel(&self, x: i32, y: i32) -> (i32, i32) {
        (
            self.left + (x as f32 / self.scale).floor() as i32,
            self.top + (y as f32 / self.scale).floor() as i32,
        )
    }

    pub fn to_cell(&self, x: i32, y: i32) -> (u16, u16) {
        let (px, py) = self.to_pixel(x, y);
        (
            px.clamp(0, self.cols as i32 - 1) as u16,
            (py.max(0) / 2).min(self.rows as i32 - 1) as u16,
        )
    }

    /// Playfield position under the centre of a terminal cell.
    pub fn cell_to_logical(&self, col: u16, row: u16) -> (i32, i32) {
        let px = col as f32 + 0.5 - self.left as f32;
        let py = row as f32 * 2.0 + 1.0 - self.top as f32;
        (
            (px * self.scale).floor() as i32,
            (py * self.scale).floor() as i32,
        )
    }
}

// ── Renderer ──────────────────────────────────────────────────────────────────

pub struct Renderer {
    buf: PixelBuf,
    viewport: Viewport,
}

impl Renderer {
    pub fn new(cols: u16, rows: u16, config: &Config) -> Self {
        let viewport = Viewport::fit(cols, rows, config);
        Renderer {
            buf: PixelBuf::new(viewport.cols as usize, viewport.rows as usize * 2),
            viewport,
        }
    }

    pub fn resize(&mut self, cols: u16, rows: u16, config: &Config) {
        self.viewport = Viewport::fit(cols, rows, config);
        self.buf
            .resize(self.viewport.cols as usize, self.viewport.rows as usize * 2);
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Render one complete frame.
    pub fn render<W: Write>(
        &mut self,
        out: &mut W,
        state: &GameState,
        assets: &Assets,
        config: &Config,
    ) -> io::Result<()> {
        let vp = self.viewport;
        self.buf.clear(C_LETTERBOX);

        let field = Rect::new(0, 0, state.width, state.height);
        blit(&mut self.buf, &vp, assets.get(SpriteKind::Background), field);

        if state.status != GameStatus::NotStarted {
            let player = &state.player;
            blit(&mut self.buf, &vp, assets.get(player.sprite), player.rect());
            for pipe in state.pipes() {
                blit(&mut self.buf, &vp, assets.get(pipe.sprite), pipe.rect());
            }
        }

        let buttons = Button::visible_for(state.status);
        for button in buttons {
            draw_button_face(&mut self.buf, &vp, *button, config);
        }

        self.buf.flush(out)?;

        match state.status {
            GameStatus::NotStarted => {
                draw_centered(out, &self.buf, &vp, state.height / 2 - 120, "Press Start to Begin", true)?;
            }
            GameStatus::Running | GameStatus::GameOver => {
                draw_score(out, &self.buf, &vp, state)?;
            }
        }
        if state.status == GameStatus::GameOver {
            draw_game_over(out, &self.buf, &vp, state)?;
        }
        for button in buttons {
            draw_button_label(out, &self.buf, &vp, *button, config)?;
        }
        draw_controls_hint(out, &vp, state)?;

        out.queue(style::ResetColor)?;
        out.queue(cursor::MoveTo(0, vp.rows.saturating_sub(1)))?;
        out.flush()?;
        Ok(())
    }
}

// ── Sprites ───────────────────────────────────────────────────────────────────

/// Stretch `image` over `dest` (playfield units), clipped to the playfield.
/// Pixels with alpha below one half are transparent.
fn blit(buf: &mut PixelBuf, vp: &Viewport, image: &Image, dest: Rect) {
    if dest.is_empty() {
        return;
    }
    let (x0, y0) = vp.to_pixel(dest.x, dest.y);
    let (x1, y1) = vp.to_pixel(dest.x + dest.width, dest.y + dest.height);
    let (w, h) = (x1 - x0, y1 - y0);
    if w <= 0 || h <= 0 {
        return;
    }

    let clip = vp.pixel_bounds();
    for py in y0.max(clip.y)..y1.min(clip.y + clip.height) {
        let v = ((py - y0) as f32 + 0.5) / h as f32;
        for px in x0.max(clip.x)..x1.min(clip.x + clip.width) {
            let u = ((px - x0) as f32 + 0.5) / w as f32;
            let [r, g, b, a] = image.sample(u, v);
            if a >= 128 {
                buf.set(px, py, Rgb(r, g, b));
            }
        }
    }
}

fn draw_button_face(buf: &mut PixelBuf, vp: &Viewport, button: Button, config: &Config) {
    let rect = button.rect(config);
    let (x0, y0) = vp.to_pixel(rect.x, rect.y);
    let (x1, y1) = vp.to_pixel(rect.x + rect.width, rect.y + rect.height);
    let fill = match button {
        Button::Start => C_BUTTON_START,
        Button::Exit => C_BUTTON_EXIT,
    };
    buf.fill_rect(x0, y0, x1 - x0, y1 - y0, C_BUTTON_EDGE);
    buf.fill_rect(x0 + 1, y0 + 1, x1 - x0 - 2, y1 - y0 - 2, fill);
}

// ── Text overlays ─────────────────────────────────────────────────────────────

/// Print `text` at a cell, on the colour already painted underneath it.
fn draw_text<W: Write>(
    out: &mut W,
    buf: &PixelBuf,
    vp: &Viewport,
    (col, row): (u16, u16),
    text: &str,
    fg: Color,
    bold: bool,
) -> io::Result<()> {
    let under = buf.get(col as usize, row as usize * 2 + 1);
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(style::SetForegroundColor(fg))?;
    out.queue(style::SetBackgroundColor(under.into()))?;
    if bold {
        out.queue(style::SetAttribute(Attribute::Bold))?;
    }
    // Never run past the right edge of the terminal
    let room = (vp.cols - col) as usize;
    out.queue(Print(text.chars().take(room).collect::<String>()))?;
    if bold {
        out.queue(style::SetAttribute(Attribute::NormalIntensity))?;
    }
    Ok(())
}

fn draw_centered<W: Write>(
    out: &mut W,
    buf: &PixelBuf,
    vp: &Viewport,
    y: i32,
    text: &str,
    bold: bool,
) -> io::Result<()> {
    let field = vp.pixel_bounds();
    let len = text.chars().count() as i32;
    let col = (field.x + (field.width - len) / 2).max(0) as u16;
    let (_, row) = vp.to_cell(0, y);
    draw_text(out, buf, vp, (col, row), text, C_TEXT, bold)
}

fn draw_score<W: Write>(
    out: &mut W,
    buf: &PixelBuf,
    vp: &Viewport,
    state: &GameState,
) -> io::Result<()> {
    let cell = vp.to_cell(10, 20);
    draw_text(out, buf, vp, cell, &format!("Score: {}", state.score), C_TEXT, true)
}

fn draw_game_over<W: Write>(
    out: &mut W,
    buf: &PixelBuf,
    vp: &Viewport,
    state: &GameState,
) -> io::Result<()> {
    let centre_y = state.height / 2;
    draw_centered(out, buf, vp, centre_y, "Game Over", true)?;
    draw_centered(out, buf, vp, centre_y + 50, "Press 'R' to Restart", false)
}

fn draw_button_label<W: Write>(
    out: &mut W,
    buf: &PixelBuf,
    vp: &Viewport,
    button: Button,
    config: &Config,
) -> io::Result<()> {
    let rect = button.rect(config);
    let label = button.label();
    let (left, row) = vp.to_cell(rect.x, rect.y + rect.height / 2);
    let (right, _) = vp.to_cell(rect.x + rect.width, rect.y);
    let span = right.saturating_sub(left);
    let col = left + span.saturating_sub(label.len() as u16) / 2;
    draw_text(out, buf, vp, (col, row), label, C_BUTTON_TEXT, true)
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, vp: &Viewport, state: &GameState) -> io::Result<()> {
    let hint = match state.status {
        GameStatus::NotStarted => "ENTER / click : Start   Q : Quit",
        GameStatus::Running => "SPACE : Flap   Q : Quit",
        GameStatus::GameOver => "R : Restart   Q : Quit",
    };
    out.queue(cursor::MoveTo(0, vp.rows.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(style::SetBackgroundColor(C_LETTERBOX.into()))?;
    out.queue(Print(hint.chars().take(vp.cols as usize).collect::<String>()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_buf_ignores_out_of_range_writes() {
        let mut buf = PixelBuf::new(4, 4);
        buf.set(-1, 0, Rgb(1, 2, 3));
        buf.set(4, 0, Rgb(1, 2, 3));
        buf.set(0, 4, Rgb(1, 2, 3));
        assert!(buf.px.iter().all(|&c| c == C_LETTERBOX));
    }

    #[test]
    fn fill_rect_clips_to_buffer() {
        let mut buf = PixelBuf::new(4, 4);
        buf.fill_rect(2, 2, 10, 10, Rgb(9, 9, 9));
        assert_eq!(buf.get(3, 3), Rgb(9, 9, 9));
        assert_eq!(buf.get(1, 1), C_LETTERBOX);
    }
}
