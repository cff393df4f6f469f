//! Canvas2D renderer and DOM HUD (browser only)
//!
//! Reads the world, never mutates it. Uses the same [`Camera`] as the player
//! controller so what is drawn is exactly what the pointer aims at.

use std::f64::consts::TAU;

use glam::Vec2;
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement};

use crate::camera::Camera;
use crate::commentary::{MessageKind, MessageLog};
use crate::consts::*;
use crate::settings::Settings;
use crate::sim::state::GEM_COLOR;
use crate::sim::{Character, GameMode, World};

const BACKGROUND: &str = "#1a1a2e";
const GRID_COLOR: &str = "#2a2a4e";
const GRID_SPACING: f32 = 100.0;

pub struct Renderer {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    dpr: f64,
}

impl Renderer {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self {
            canvas,
            ctx,
            dpr: 1.0,
        })
    }

    /// Match the backing store to the element size. Returns the display size
    /// in CSS pixels.
    pub fn resize(&mut self) -> Vec2 {
        self.dpr = web_sys::window().map_or(1.0, |w| w.device_pixel_ratio());
        let css_w = self.canvas.client_width().max(1);
        let css_h = self.canvas.client_height().max(1);
        let w = (css_w as f64 * self.dpr) as u32;
        let h = (css_h as f64 * self.dpr) as u32;
        if self.canvas.width() != w || self.canvas.height() != h {
            self.canvas.set_width(w);
            self.canvas.set_height(h);
            log::debug!("Canvas resized to {}x{} (dpr {})", w, h, self.dpr);
        }
        Vec2::new(css_w as f32, css_h as f32)
    }

    pub fn draw(&self, world: &World, settings: &Settings, display: Vec2) {
        let ctx = &self.ctx;
        let _ = ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);
        ctx.set_fill_style_str(BACKGROUND);
        ctx.fill_rect(0.0, 0.0, self.canvas.width() as f64, self.canvas.height() as f64);

        let camera = Camera::follow(world.player.pos, display);
        let s = camera.scale as f64 * self.dpr;
        let _ = ctx.set_transform(
            s,
            0.0,
            0.0,
            s,
            -camera.offset.x as f64 * s,
            -camera.offset.y as f64 * s,
        );

        if settings.quality.grid_enabled() {
            self.draw_grid();
        }
        self.draw_objective(world);

        for gem in world.gems.iter().filter(|g| !g.dead) {
            self.draw_gem(gem.pos, gem.radius);
        }
        for p in world.projectiles.iter().filter(|p| !p.dead) {
            self.circle(p.pos, p.radius, p.color);
        }
        for c in world.characters().filter(|c| c.is_alive()) {
            self.draw_character(c, world.mode, c.id == world.player.id);
        }

        if settings.particles {
            for p in &world.particles {
                ctx.set_global_alpha(p.life.clamp(0.0, 1.0) as f64);
                self.circle(p.pos, p.size, p.color);
            }
            ctx.set_global_alpha(1.0);
        }
    }

    fn draw_grid(&self) {
        let ctx = &self.ctx;
        ctx.set_stroke_style_str(GRID_COLOR);
        ctx.set_line_width(2.0);
        let mut x = 0.0;
        while x <= WORLD_WIDTH {
            ctx.begin_path();
            ctx.move_to(x as f64, 0.0);
            ctx.line_to(x as f64, WORLD_HEIGHT as f64);
            ctx.stroke();
            x += GRID_SPACING;
        }
        let mut y = 0.0;
        while y <= WORLD_HEIGHT {
            ctx.begin_path();
            ctx.move_to(0.0, y as f64);
            ctx.line_to(WORLD_WIDTH as f64, y as f64);
            ctx.stroke();
            y += GRID_SPACING;
        }
    }

    /// Mode-specific floor markings
    fn draw_objective(&self, world: &World) {
        let ctx = &self.ctx;
        let center = Vec2::new(WORLD_WIDTH / 2.0, WORLD_HEIGHT / 2.0);
        match world.mode {
            GameMode::GemRush => {
                ctx.set_stroke_style_str(GEM_COLOR);
                ctx.set_line_width(4.0);
                ctx.begin_path();
                let _ = ctx.arc(center.x as f64, center.y as f64, 80.0, 0.0, TAU);
                ctx.stroke();
            }
            GameMode::Deathmatch | GameMode::BossHunt => {
                ctx.set_stroke_style_str("#374151");
                ctx.set_line_width(4.0);
                ctx.stroke_rect(0.0, 0.0, WORLD_WIDTH as f64, WORLD_HEIGHT as f64);
            }
        }
    }

    fn draw_gem(&self, pos: Vec2, radius: f32) {
        let ctx = &self.ctx;
        let (x, y, r) = (pos.x as f64, pos.y as f64, radius as f64);
        ctx.set_fill_style_str(GEM_COLOR);
        ctx.begin_path();
        ctx.move_to(x, y - r);
        ctx.line_to(x + r, y);
        ctx.line_to(x, y + r);
        ctx.line_to(x - r, y);
        ctx.close_path();
        ctx.fill();
    }

    fn draw_character(&self, c: &Character, mode: GameMode, is_player: bool) {
        let ctx = &self.ctx;
        let (x, y, r) = (c.pos.x as f64, c.pos.y as f64, c.radius as f64);

        self.circle(c.pos, c.radius, c.color);
        if is_player {
            ctx.set_stroke_style_str("#ffffff");
            ctx.set_line_width(3.0);
            ctx.begin_path();
            let _ = ctx.arc(x, y, r + 4.0, 0.0, TAU);
            ctx.stroke();
        }

        // Facing
        let tip = c.pos + Vec2::new(c.angle.cos(), c.angle.sin()) * (c.radius + 10.0);
        ctx.set_stroke_style_str("#e5e7eb");
        ctx.set_line_width(6.0);
        ctx.begin_path();
        ctx.move_to(x, y);
        ctx.line_to(tip.x as f64, tip.y as f64);
        ctx.stroke();

        // Health bar
        let frac = (c.health.max(0) as f64 / c.max_health.max(1) as f64).clamp(0.0, 1.0);
        let bar_w = r * 2.0;
        let bar_y = y - r - 14.0;
        ctx.set_fill_style_str("#111827");
        ctx.fill_rect(x - r, bar_y, bar_w, 6.0);
        ctx.set_fill_style_str(if c.team == crate::sim::Team::Blue { "#22c55e" } else { "#ef4444" });
        ctx.fill_rect(x - r, bar_y, bar_w * frac, 6.0);

        // Ammo pips
        for i in 0..c.weapon.max_ammo {
            let filled = i < c.weapon.ammo;
            ctx.set_fill_style_str(if filled { "#f59e0b" } else { "#4b5563" });
            ctx.fill_rect(x - r + i as f64 * 10.0, bar_y + 8.0, 8.0, 3.0);
        }

        if mode == GameMode::GemRush && c.gems > 0 {
            ctx.set_fill_style_str(GEM_COLOR);
            ctx.set_font("bold 16px sans-serif");
            ctx.set_text_align("center");
            let _ = ctx.fill_text(&c.gems.to_string(), x, bar_y - 6.0);
        }
    }

    fn circle(&self, pos: Vec2, radius: f32, color: &str) {
        let ctx = &self.ctx;
        ctx.set_fill_style_str(color);
        ctx.begin_path();
        let _ = ctx.arc(pos.x as f64, pos.y as f64, radius as f64, 0.0, TAU);
        ctx.fill();
    }
}

fn set_text(document: &Document, selector: &str, text: &str) {
    if let Some(el) = document.query_selector(selector).ok().flatten() {
        if el.text_content().as_deref() != Some(text) {
            el.set_text_content(Some(text));
        }
    }
}

fn set_visible(document: &Document, id: &str, visible: bool) {
    if let Some(el) = document.get_element_by_id(id) {
        let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
    }
}

/// HUD values shown next to the canvas
pub struct HudSnapshot<'a> {
    pub world: &'a World,
    pub messages: &'a MessageLog,
    pub coins: u32,
    pub fps: u32,
    pub settings: &'a Settings,
}

/// Push the current score, ammo, messages and end screen into the DOM
pub fn update_hud(hud: &HudSnapshot<'_>) {
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };
    let world = hud.world;

    set_text(&document, "#hud-blue .hud-value", &world.score.blue.to_string());
    set_text(&document, "#hud-red .hud-value", &world.score.red.to_string());
    let label = match world.mode {
        GameMode::GemRush => "Gems",
        GameMode::Deathmatch => "Kills",
        GameMode::BossHunt => "Boss HP %",
    };
    set_text(&document, "#hud-mode", label);
    set_text(&document, "#hud-coins .hud-value", &hud.coins.to_string());
    set_text(
        &document,
        "#hud-ammo .hud-value",
        &format!("{}/{}", world.player.weapon.ammo, world.player.weapon.max_ammo),
    );

    set_visible(&document, "hud-fps", hud.settings.show_fps);
    if hud.settings.show_fps {
        set_text(&document, "#hud-fps .hud-value", &hud.fps.to_string());
    }
    set_visible(&document, "joysticks", hud.settings.touch_controls);

    if let Some(el) = document.get_element_by_id("messages") {
        let html: String = hud
            .messages
            .iter()
            .map(|m| {
                let class = match m.kind {
                    MessageKind::Announcer => "msg announcer",
                    MessageKind::System => "msg system",
                };
                format!("<div class=\"{}\">{}</div>", class, escape_html(&m.text))
            })
            .collect();
        if el.inner_html() != html {
            el.set_inner_html(&html);
        }
    }

    match world.winner() {
        Some(winner) => {
            set_visible(&document, "game-over", true);
            let text = if winner == crate::sim::Team::Blue {
                "VICTORY"
            } else {
                "DEFEAT"
            };
            set_text(&document, "#winner-text", text);
        }
        None => set_visible(&document, "game-over", false),
    }
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
