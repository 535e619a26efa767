//! GameView: maps a `core::Scene` into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.
//!
//! Pixel positions from the scene are scaled to character cells (`cell_w`
//! columns per grid cell), so moves and rotations show intermediate steps and
//! falling cells slide row by row.

use crate::core::{RenderPuyo, Scene, ZenkeshiView};
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::{BOARD_COLS, BOARD_ROWS};

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Runner-side state shown next to the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HudStatus {
    pub paused: bool,
    pub max_chain: u32,
}

const PLAY_BG: Rgb = Rgb::new(24, 24, 36);
const BLACK: Rgb = Rgb::new(0, 0, 0);

/// Screen rectangle of the board frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Frame {
    x: u16,
    y: u16,
    w: u16,
    h: u16,
}

impl Frame {
    fn inner_x(&self) -> u16 {
        self.x + 1
    }

    fn inner_y(&self) -> u16 {
        self.y + 1
    }
}

pub struct GameView {
    /// Board cell width in terminal columns.
    cell_w: u16,
}

impl Default for GameView {
    fn default() -> Self {
        // 2 columns per cell roughly squares the glyph aspect ratio.
        Self { cell_w: 2 }
    }
}

impl GameView {
    pub fn new(cell_w: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
        }
    }

    fn frame(&self, viewport: Viewport) -> Frame {
        let w = BOARD_COLS as u16 * self.cell_w + 2;
        let h = BOARD_ROWS as u16 + 2;
        Frame {
            x: viewport.width.saturating_sub(w) / 2,
            y: viewport.height.saturating_sub(h) / 2,
            w,
            h,
        }
    }

    /// Render into an existing framebuffer, resizing it to the viewport.
    pub fn render_into(
        &self,
        scene: &Scene,
        hud: HudStatus,
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::default().cell(' '));

        let frame = self.frame(viewport);
        let empty = CellStyle::fg_on(Rgb::new(70, 70, 90), PLAY_BG).dim();
        fb.fill_rect(
            frame.inner_x(),
            frame.inner_y(),
            frame.w - 2,
            frame.h - 2,
            ' ',
            empty,
        );
        for row in 0..BOARD_ROWS as u16 {
            for col in 0..BOARD_COLS as u16 {
                fb.put_char(frame.inner_x() + col * self.cell_w, frame.inner_y() + row, '·', empty);
            }
        }
        draw_border(fb, frame, CellStyle::fg_on(Rgb::new(200, 200, 200), BLACK));

        for puyo in scene.puyos.iter().filter(|p| p.visible) {
            self.draw_puyo(fb, frame, scene.cell_size, puyo);
        }

        if let Some(view) = scene.zenkeshi {
            draw_zenkeshi(fb, frame, view);
        }
        if let Some(ratio) = scene.batankyu_ratio {
            draw_batankyu(fb, frame, ratio);
        } else if hud.paused {
            draw_centered(fb, frame, frame.y + frame.h / 2, "PAUSED", banner_style());
        }

        self.draw_side_panel(fb, scene, hud, viewport, frame);
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, scene: &Scene, hud: HudStatus, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(scene, hud, viewport, &mut fb);
        fb
    }

    /// Screen position of a pixel-space puyo, `None` when outside the board.
    fn screen_pos(&self, frame: Frame, cell_size: f32, left: f32, top: f32) -> Option<(u16, u16)> {
        if cell_size <= 0.0 {
            return None;
        }
        let x = (left / cell_size * self.cell_w as f32).round() as i32;
        let y = (top / cell_size).round() as i32;
        let max_x = ((BOARD_COLS as u16 - 1) * self.cell_w) as i32;
        if !(0..=max_x).contains(&x) || !(0..BOARD_ROWS as i32).contains(&y) {
            return None;
        }
        Some((frame.inner_x() + x as u16, frame.inner_y() + y as u16))
    }

    fn draw_puyo(&self, fb: &mut FrameBuffer, frame: Frame, cell_size: f32, puyo: &RenderPuyo) {
        let Some((x, y)) = self.screen_pos(frame, cell_size, puyo.left, puyo.top) else {
            return;
        };
        let style = CellStyle::fg_on(Rgb::of_puyo(puyo.color), PLAY_BG).bold();
        fb.fill_rect(x, y, self.cell_w, 1, '█', style);
    }

    fn draw_side_panel(
        &self,
        fb: &mut FrameBuffer,
        scene: &Scene,
        hud: HudStatus,
        viewport: Viewport,
        frame: Frame,
    ) {
        let x = frame.x.saturating_add(frame.w).saturating_add(2);
        if x.saturating_add(10) > viewport.width {
            return;
        }
        let label = CellStyle::default().bold();
        let value = CellStyle::fg_on(Rgb::new(200, 200, 200), BLACK);
        let hint = value.dim();

        let mut y = frame.y;
        for (name, number) in [
            ("SCORE", scene.score),
            ("CHAIN", scene.chain),
            ("BEST CHAIN", hud.max_chain),
            ("GAME", scene.episode + 1),
        ] {
            fb.put_str(x, y, name, label);
            fb.put_u32(x, y + 1, number, value);
            y = y.saturating_add(3);
        }
        fb.put_str(x, y, scene.mode.as_str(), hint);
        y = y.saturating_add(2);

        let help: &[&str] = if scene.batankyu_ratio.is_some() {
            &["↑ new game", "q quit"]
        } else {
            &["←→ move", "↑ rotate", "↓ drop", "p pause", "q quit"]
        };
        for line in help {
            if y >= viewport.height {
                break;
            }
            fb.put_str(x, y, line, hint);
            y = y.saturating_add(1);
        }
    }
}

fn banner_style() -> CellStyle {
    CellStyle::fg_on(Rgb::new(255, 255, 255), BLACK).bold()
}

fn draw_border(fb: &mut FrameBuffer, frame: Frame, style: CellStyle) {
    let Frame { x, y, w, h } = frame;
    if w < 2 || h < 2 {
        return;
    }
    for dx in 1..w - 1 {
        fb.put_char(x + dx, y, '─', style);
        fb.put_char(x + dx, y + h - 1, '─', style);
    }
    for dy in 1..h - 1 {
        fb.put_char(x, y + dy, '│', style);
        fb.put_char(x + w - 1, y + dy, '│', style);
    }
    fb.put_char(x, y, '┌', style);
    fb.put_char(x + w - 1, y, '┐', style);
    fb.put_char(x, y + h - 1, '└', style);
    fb.put_char(x + w - 1, y + h - 1, '┘', style);
}

fn draw_centered(fb: &mut FrameBuffer, frame: Frame, y: u16, text: &str, style: CellStyle) {
    let text_w = text.chars().count() as u16;
    let x = frame.x.saturating_add(frame.w.saturating_sub(text_w) / 2);
    fb.put_str(x, y, text, style);
}

/// Slides up from the floor to a third of the board while showing, dims while hiding.
fn draw_zenkeshi(fb: &mut FrameBuffer, frame: Frame, view: ZenkeshiView) {
    let rows = BOARD_ROWS as f32;
    let from = rows - 1.0;
    let to = rows / 3.0;
    let row = (from + (to - from) * view.show_ratio).round() as u16;
    let style = CellStyle::fg_on(Rgb::new(255, 220, 120), BLACK).bold();
    let style = if view.hide_ratio > 0.0 { style.dim() } else { style };
    draw_centered(fb, frame, frame.inner_y() + row, "ALL CLEAR", style);
}

/// Bounces between the middle of the board and a few rows above it.
fn draw_batankyu(fb: &mut FrameBuffer, frame: Frame, ratio: f32) {
    let phase = (ratio * 8.0).fract();
    let height = if phase < 0.5 { phase * 2.0 } else { (1.0 - phase) * 2.0 };
    let mid = frame.y + frame.h / 2;
    let y = mid.saturating_sub((height * 3.0).round() as u16);
    draw_centered(fb, frame, y, "BATANKYU", banner_style());
}
