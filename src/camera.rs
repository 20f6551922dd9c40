//! Pan/zoom viewport transform
//!
//! `screen = viewport_center + offset + world * scale`. Dragging translates
//! the offset 1:1 with pointer movement; wheel zoom keeps the world point
//! under the pointer visually fixed. Knows nothing about entities or
//! particles.

use glam::Vec2;

use crate::consts::{MAX_SCALE, MIN_SCALE};

#[derive(Debug, Clone)]
pub struct Camera {
    pub offset: Vec2,
    pub scale: f32,
    viewport_center: Vec2,
    viewport_size: Vec2,
    drag_anchor: Option<Vec2>,
}

impl Camera {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            offset: Vec2::ZERO,
            scale: 1.0,
            viewport_center: Vec2::new(width / 2.0, height / 2.0),
            viewport_size: Vec2::new(width, height),
            drag_anchor: None,
        }
    }

    #[inline]
    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        self.viewport_center + self.offset + world * self.scale
    }

    #[inline]
    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        (screen - self.viewport_center - self.offset) / self.scale
    }

    /// Viewport size in pixels.
    pub fn viewport(&self) -> Vec2 {
        self.viewport_size
    }

    /// Whether a screen point is inside the viewport plus `margin` pixels.
    pub fn on_screen(&self, screen: Vec2, margin: f32) -> bool {
        screen.x >= -margin
            && screen.y >= -margin
            && screen.x <= self.viewport_size.x + margin
            && screen.y <= self.viewport_size.y + margin
    }

    /// Resize moves the viewport center only; offset/scale are untouched.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport_center = Vec2::new(width / 2.0, height / 2.0);
        self.viewport_size = Vec2::new(width, height);
    }

    pub fn begin_drag(&mut self, pointer: Vec2) {
        self.drag_anchor = Some(pointer);
    }

    /// Pointer moved while dragging: offset follows 1:1. No inertia.
    pub fn drag_to(&mut self, pointer: Vec2) {
        if let Some(anchor) = self.drag_anchor {
            self.offset += pointer - anchor;
            self.drag_anchor = Some(pointer);
        }
    }

    pub fn end_drag(&mut self) {
        self.drag_anchor = None;
    }

    pub fn dragging(&self) -> bool {
        self.drag_anchor.is_some()
    }

    /// Zoom by `factor` keeping the world point under `pointer` fixed on
    /// screen. Scale is clamped to `[MIN_SCALE, MAX_SCALE]`.
    pub fn zoom_at(&mut self, pointer: Vec2, factor: f32) {
        // World point under the pointer before the scale changes
        let anchor = (pointer - self.viewport_center - self.offset) / self.scale;
        self.scale = (self.scale * factor).clamp(MIN_SCALE, MAX_SCALE);
        // Solve for the offset that re-projects the anchor to the pointer
        self.offset = pointer - self.viewport_center - anchor * self.scale;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_round_trip() {
        let mut cam = Camera::new(800.0, 600.0);
        cam.offset = Vec2::new(37.0, -12.0);
        cam.scale = 1.4;
        let world = Vec2::new(123.0, -456.0);
        let back = cam.screen_to_world(cam.world_to_screen(world));
        assert!(world.distance(back) < 1e-3);
    }

    #[test]
    fn test_drag_translates_one_to_one() {
        let mut cam = Camera::new(800.0, 600.0);
        cam.begin_drag(Vec2::new(100.0, 100.0));
        cam.drag_to(Vec2::new(140.0, 75.0));
        cam.end_drag();
        assert_eq!(cam.offset, Vec2::new(40.0, -25.0));
        // Moves after release must not pan
        cam.drag_to(Vec2::new(0.0, 0.0));
        assert_eq!(cam.offset, Vec2::new(40.0, -25.0));
    }

    #[test]
    fn test_zoom_keeps_pointer_world_point_fixed() {
        // 800x600 viewport, cursor at (400,300), offset (0,0), scale 1, x1.1
        let mut cam = Camera::new(800.0, 600.0);
        let pointer = Vec2::new(400.0, 300.0);
        let world_before = cam.screen_to_world(pointer);
        cam.zoom_at(pointer, 1.1);
        let screen_after = cam.world_to_screen(world_before);
        assert!(screen_after.distance(pointer) < 1e-3);
    }

    #[test]
    fn test_zoom_invariant_off_center() {
        let mut cam = Camera::new(800.0, 600.0);
        cam.offset = Vec2::new(-55.0, 20.0);
        cam.scale = 0.8;
        let pointer = Vec2::new(650.0, 120.0);
        let world_before = cam.screen_to_world(pointer);
        cam.zoom_at(pointer, 0.92);
        assert!(cam.world_to_screen(world_before).distance(pointer) < 1e-3);
    }

    #[test]
    fn test_resize_preserves_offset_and_scale() {
        let mut cam = Camera::new(800.0, 600.0);
        cam.offset = Vec2::new(10.0, 10.0);
        cam.scale = 2.0;
        cam.resize(1024.0, 768.0);
        assert_eq!(cam.offset, Vec2::new(10.0, 10.0));
        assert_eq!(cam.scale, 2.0);
        assert_eq!(cam.viewport(), Vec2::new(1024.0, 768.0));
    }

    proptest! {
        #[test]
        fn prop_scale_always_clamped(
            factors in proptest::collection::vec(0.5f32..2.0, 1..64),
            px in 0.0f32..800.0,
            py in 0.0f32..600.0,
        ) {
            let mut cam = Camera::new(800.0, 600.0);
            for f in factors {
                cam.zoom_at(Vec2::new(px, py), f);
                prop_assert!(cam.scale >= MIN_SCALE);
                prop_assert!(cam.scale <= MAX_SCALE);
            }
        }

        #[test]
        fn prop_zoom_pointer_invariant(
            factor in 0.5f32..2.0,
            px in 0.0f32..800.0,
            py in 0.0f32..600.0,
            ox in -500.0f32..500.0,
            oy in -500.0f32..500.0,
        ) {
            let mut cam = Camera::new(800.0, 600.0);
            cam.offset = Vec2::new(ox, oy);
            let pointer = Vec2::new(px, py);
            let world = cam.screen_to_world(pointer);
            cam.zoom_at(pointer, factor);
            let after = cam.world_to_screen(world);
            prop_assert!(after.distance(pointer) < 1e-2);
        }
    }
}
