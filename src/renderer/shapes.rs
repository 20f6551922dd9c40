//! Shape tessellation for 2D primitives
//!
//! All emitters append triangles to the frame's shared vertex list; the
//! engine calls them thousands of times per frame, so nothing here allocates.

use glam::Vec2;
use std::f32::consts::TAU;

use super::vertex::Vertex;

#[inline]
fn rgba(color: [f32; 3], alpha: f32) -> [f32; 4] {
    [color[0], color[1], color[2], alpha.clamp(0.0, 1.0)]
}

/// Axis-aligned square "pixel" centered at `pos`.
pub fn pixel_rect(out: &mut Vec<Vertex>, pos: Vec2, size: f32, color: [f32; 3], alpha: f32) {
    let h = size / 2.0;
    let c = rgba(color, alpha);
    let (x0, y0, x1, y1) = (pos.x - h, pos.y - h, pos.x + h, pos.y + h);

    out.push(Vertex::new(x0, y0, c));
    out.push(Vertex::new(x1, y0, c));
    out.push(Vertex::new(x0, y1, c));

    out.push(Vertex::new(x1, y0, c));
    out.push(Vertex::new(x1, y1, c));
    out.push(Vertex::new(x0, y1, c));
}

/// Horizontal glitch streak centered at `pos`.
pub fn streak(out: &mut Vec<Vertex>, pos: Vec2, length: f32, thickness: f32, color: [f32; 3], alpha: f32) {
    let c = rgba(color, alpha);
    let (x0, y0) = (pos.x - length / 2.0, pos.y - thickness / 2.0);
    let (x1, y1) = (pos.x + length / 2.0, pos.y + thickness / 2.0);

    out.push(Vertex::new(x0, y0, c));
    out.push(Vertex::new(x1, y0, c));
    out.push(Vertex::new(x0, y1, c));

    out.push(Vertex::new(x1, y0, c));
    out.push(Vertex::new(x1, y1, c));
    out.push(Vertex::new(x0, y1, c));
}

/// Soft radial glow: concentric annuli with per-vertex alpha falloff
/// approximating a radial gradient. `peak_alpha` is the alpha at the center.
pub fn soft_disc(
    out: &mut Vec<Vertex>,
    center: Vec2,
    radius: f32,
    color: [f32; 3],
    peak_alpha: f32,
    layers: u32,
) {
    if radius <= 0.0 || layers == 0 {
        return;
    }
    const SEGMENTS: u32 = 24;

    let alpha_at = |t: f32| peak_alpha * (1.0 - t) * (1.0 - t);

    for layer in 0..layers {
        let t0 = layer as f32 / layers as f32;
        let t1 = (layer + 1) as f32 / layers as f32;
        let r0 = radius * t0;
        let r1 = radius * t1;
        let c0 = rgba(color, alpha_at(t0));
        let c1 = rgba(color, alpha_at(t1));

        for i in 0..SEGMENTS {
            let a0 = i as f32 / SEGMENTS as f32 * TAU;
            let a1 = (i + 1) as f32 / SEGMENTS as f32 * TAU;

            let inner0 = center + Vec2::new(a0.cos(), a0.sin()) * r0;
            let inner1 = center + Vec2::new(a1.cos(), a1.sin()) * r0;
            let outer0 = center + Vec2::new(a0.cos(), a0.sin()) * r1;
            let outer1 = center + Vec2::new(a1.cos(), a1.sin()) * r1;

            out.push(Vertex::new(inner0.x, inner0.y, c0));
            out.push(Vertex::new(outer0.x, outer0.y, c1));
            out.push(Vertex::new(inner1.x, inner1.y, c0));

            out.push(Vertex::new(inner1.x, inner1.y, c0));
            out.push(Vertex::new(outer0.x, outer0.y, c1));
            out.push(Vertex::new(outer1.x, outer1.y, c1));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_rect_emits_two_triangles() {
        let mut out = Vec::new();
        pixel_rect(&mut out, Vec2::new(10.0, 10.0), 2.0, [1.0; 3], 0.5);
        assert_eq!(out.len(), 6);
        assert!(out.iter().all(|v| v.color[3] == 0.5));
    }

    #[test]
    fn test_soft_disc_degenerate_radius_emits_nothing() {
        let mut out = Vec::new();
        soft_disc(&mut out, Vec2::ZERO, 0.0, [1.0; 3], 1.0, 8);
        assert!(out.is_empty());
    }

    #[test]
    fn test_soft_disc_alpha_falls_off() {
        let mut out = Vec::new();
        soft_disc(&mut out, Vec2::ZERO, 100.0, [1.0; 3], 0.8, 4);
        let first = out.first().unwrap().color[3];
        let last = out.last().unwrap().color[3];
        assert!(first > last);
        assert_eq!(last, 0.0);
    }
}
