//! Camera/viewport transform
//!
//! One pure function of (focus position, display size, world size). The
//! renderer uses it world→screen and the player controller uses the same
//! values screen→world for pointer aiming, so the two can never drift.

use glam::Vec2;

use crate::consts::{MIN_ZOOM, TARGET_VISIBLE_WIDTH, WORLD_HEIGHT, WORLD_WIDTH};

/// Zoom scale plus top-left world offset of the visible region
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// Screen pixels per world unit
    pub scale: f32,
    /// World coordinate shown at the screen's top-left corner
    pub offset: Vec2,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            scale: 1.0,
            offset: Vec2::ZERO,
        }
    }
}

impl Camera {
    /// Center `focus` on a display of `display` CSS pixels, clamped so the
    /// view never extends past the world edges.
    pub fn compute(focus: Vec2, display: Vec2, world: Vec2) -> Self {
        let scale = zoom_for_width(display.x);
        let visible = display / scale;

        let mut offset = focus - visible / 2.0;
        // max(0, min(limit, v)): a display larger than the world pins to 0
        offset.x = offset.x.min(world.x - visible.x).max(0.0);
        offset.y = offset.y.min(world.y - visible.y).max(0.0);

        Self { scale, offset }
    }

    /// Camera for the standard arena
    pub fn follow(focus: Vec2, display: Vec2) -> Self {
        Self::compute(focus, display, Vec2::new(WORLD_WIDTH, WORLD_HEIGHT))
    }

    #[inline]
    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        (world - self.offset) * self.scale
    }

    #[inline]
    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        screen / self.scale + self.offset
    }
}

/// Zoom so roughly [`TARGET_VISIBLE_WIDTH`] world units fit horizontally
pub fn zoom_for_width(display_width: f32) -> f32 {
    (display_width / TARGET_VISIBLE_WIDTH).max(MIN_ZOOM)
}
