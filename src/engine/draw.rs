//! Frame vertex emission
//!
//! Pure read of engine state into screen-space triangles, in fixed
//! back-to-front order: noise blobs, nebula clusters (clouds + glow + label
//! dust), connector beams, sigils, star field. Degenerate geometry (zero
//! length segments, missing endpoints) skips the draw, never the simulation.

use glam::Vec2;

use super::state::{BeamStyle, Engine, ViewMode};
use crate::consts::SIGIL_GRID_PITCH;
use crate::grid_snap;
use crate::renderer::shapes::{pixel_rect, soft_disc, streak};
use crate::renderer::vertex::{Vertex, colors};

/// Emit one frame of geometry.
pub fn draw(engine: &Engine, out: &mut Vec<Vertex>) {
    if engine.settings.quality.noise_blobs_enabled() {
        draw_noise_blobs(engine, out);
    }

    match engine.mode {
        ViewMode::Flat => {
            draw_cluster_fields(engine, out);
            if engine.settings.beams {
                draw_beams(engine, out);
            }
            if engine.settings.sigils {
                draw_sigils(engine, out);
            }
        }
        ViewMode::Orbit => {
            draw_sphere(engine, out);
            if engine.settings.beams {
                draw_beams(engine, out);
            }
            if engine.settings.sigils {
                draw_sigils(engine, out);
            }
        }
    }

    draw_stars(engine, out);
}

/// Cheap deterministic flicker in [0, 1); replaces per-frame RNG draws on
/// the immutable render path.
#[inline]
fn flicker(seed: f32, time: f32) -> f32 {
    ((seed * 12.9898 + time * 7.31).sin() * 43758.547).fract().abs()
}

/// Snap a screen position to the sigil pixel grid.
#[inline]
fn snap(pos: Vec2) -> Vec2 {
    Vec2::new(
        grid_snap(pos.x, SIGIL_GRID_PITCH),
        grid_snap(pos.y, SIGIL_GRID_PITCH),
    )
}

fn draw_noise_blobs(engine: &Engine, out: &mut Vec<Vertex>) {
    for blob in &engine.blobs {
        let screen = engine.camera.world_to_screen(blob.pos);
        let radius = blob.radius * engine.camera.scale;
        if !engine.camera.on_screen(screen, radius) {
            continue;
        }
        soft_disc(out, screen, radius, colors::NOISE_BLOB, blob.alpha, 4);
    }
}

fn draw_cluster_fields(engine: &Engine, out: &mut Vec<Vertex>) {
    let scale = engine.camera.scale;
    let glow_layers = engine.settings.quality.glow_layers();

    for field in &engine.clusters {
        let center = engine.camera.world_to_screen(field.cluster.center);
        let radius = field.cluster.radius * scale;

        // Two concentric radial glows: tight core, wide soft halo
        if engine.camera.on_screen(center, radius * 1.2) {
            soft_disc(out, center, radius * 1.05, field.cluster.color, 0.08, glow_layers);
            soft_disc(out, center, radius * 0.35, field.cluster.color, 0.20, glow_layers);
        }

        // Cloud particles: simulated always, drawn only on screen
        for p in &field.nebula {
            let screen = engine.camera.world_to_screen(p.pos);
            if !engine.camera.on_screen(screen, 60.0) {
                continue;
            }
            let breathe = (engine.time * field.pulse_speed + p.phase).sin() * 0.3 + 0.7;
            let alpha = p.base_alpha * breathe;
            let pos = snap(screen);
            pixel_rect(out, pos, p.size * scale, field.cluster.color, alpha);

            // Glitch-heavy domains occasionally streak with chromatic ghosts
            if field.glitch_chance > 0.08
                && flicker(p.phase, engine.time) < field.glitch_chance * 0.02
            {
                streak(out, pos, 14.0 * scale, 1.5, field.cluster.color, alpha);
                pixel_rect(out, pos - Vec2::new(3.0, 0.0), p.size * scale, colors::GHOST_LEFT, alpha * 0.5);
                pixel_rect(out, pos + Vec2::new(3.0, 0.0), p.size * scale, colors::GHOST_RIGHT, alpha * 0.5);
            }
        }

        // Label dust below the cluster center, breathing like the nebula
        if engine.settings.quality.label_dust_enabled() {
            let anchor = engine
                .camera
                .world_to_screen(field.cluster.center + Vec2::new(0.0, field.cluster.radius * 0.45));
            for mote in &field.dust {
                let screen = anchor + mote.offset * scale;
                if !engine.camera.on_screen(screen, 30.0) {
                    continue;
                }
                let breathe = (engine.time * field.pulse_speed + mote.phase).sin() * 0.3 + 0.7;
                pixel_rect(out, snap(screen), 2.0 * scale, field.cluster.color, 0.16 * breathe);
            }
        }
    }
}

fn draw_beams(engine: &Engine, out: &mut Vec<Vertex>) {
    for batch in &engine.beams {
        // Missing endpoint (filtered/unmounted entity): skip this frame
        let (Some(a), Some(b)) = (
            engine.screen_position_of(batch.from),
            engine.screen_position_of(batch.to),
        ) else {
            continue;
        };

        let segment = b - a;
        let len = segment.length();
        if len < 1e-3 {
            continue;
        }
        let dir = segment / len;
        let perp = Vec2::new(-dir.y, dir.x);

        // Shared pulse for the pulse style
        let global_pulse = (engine.time * 1.8).sin() * 0.35 + 0.65;

        for p in &batch.particles {
            let pos = a + segment * p.t + perp * p.jitter;
            if !engine.camera.on_screen(pos, 40.0) {
                continue;
            }
            // Alpha tapers to zero at both endpoints
            let taper = (p.t.min(1.0 - p.t) * 4.0).min(1.0);
            let style_term = match engine.beam_style {
                BeamStyle::Pulse => {
                    global_pulse * ((engine.time * 2.2 + p.phase).sin() * 0.5 + 0.5)
                }
                BeamStyle::Stream => (engine.time * 3.0 + p.phase).sin() * 0.2 + 0.8,
            };
            let alpha = 0.7 * batch.intensity * taper * style_term;
            pixel_rect(out, pos, 2.0, batch.color, alpha);
        }
    }
}

fn draw_sigils(engine: &Engine, out: &mut Vec<Vertex>) {
    let scale = engine.camera.scale.max(0.5);
    let spin = if engine.settings.reduced_motion {
        0.0
    } else {
        engine.time * 0.15
    };
    let (sin_s, cos_s) = spin.sin_cos();

    for (idx, points) in engine.sigils.iter().enumerate() {
        let Some(center) = engine.screen_position_of(idx) else {
            continue;
        };
        if !engine.camera.on_screen(center, 120.0) {
            continue;
        }
        let depth_fade = match engine.mode {
            ViewMode::Flat => 1.0,
            ViewMode::Orbit => engine
                .sphere
                .card_pose(idx, &engine.camera)
                .map(|p| p.depth_alpha)
                .unwrap_or(1.0),
        };
        let color = crate::layout::domain_color(engine.entities[idx].domain_key());
        for p in points {
            let rotated = Vec2::new(
                p.pos.x * cos_s - p.pos.y * sin_s,
                p.pos.x * sin_s + p.pos.y * cos_s,
            );
            let pos = snap(center + rotated * scale);
            pixel_rect(out, pos, p.size * scale, color, p.alpha * depth_fade);
        }
    }
}

fn draw_sphere(engine: &Engine, out: &mut Vec<Vertex>) {
    for p in engine.sphere.project(&engine.camera) {
        if !engine.camera.on_screen(p.screen, 40.0) {
            continue;
        }
        pixel_rect(out, snap(p.screen), p.size, p.color, p.alpha);
    }
}

fn draw_stars(engine: &Engine, out: &mut Vec<Vertex>) {
    for star in &engine.stars {
        let alpha = star.alpha();
        if star.glitch {
            streak(out, star.pos, 12.0, 1.5, colors::STAR, alpha);
            // Occasional chromatic-aberration ghosts in contrasting hues
            if flicker(star.max_life as f32, engine.time) < 0.1 {
                streak(out, star.pos - Vec2::new(3.0, 0.0), 12.0, 1.5, colors::GHOST_LEFT, alpha * 0.5);
                streak(out, star.pos + Vec2::new(3.0, 0.0), 12.0, 1.5, colors::GHOST_RIGHT, alpha * 0.5);
            }
        } else {
            pixel_rect(out, star.pos, star.size, colors::STAR, alpha);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::tick::tick;
    use crate::layout::{Connection, ConnectionKind, Entity};
    use crate::settings::{QualityPreset, Settings};

    fn demo_engine() -> Engine {
        let entities = vec![
            Entity {
                id: "a".to_string(),
                pos: Vec2::new(-100.0, 0.0),
                domain: Some("umbra".to_string()),
                name: "A".to_string(),
            },
            Entity {
                id: "b".to_string(),
                pos: Vec2::new(100.0, 0.0),
                domain: Some("umbra".to_string()),
                name: "B".to_string(),
            },
            Entity {
                id: "c".to_string(),
                pos: Vec2::new(0.0, 150.0),
                domain: Some("forge".to_string()),
                name: "C".to_string(),
            },
        ];
        let explicit = vec![Connection {
            from: "a".to_string(),
            to: "c".to_string(),
            strength: 0.9,
            kind: ConnectionKind::Explicit,
        }];
        let mut engine = Engine::new(800.0, 600.0, Settings::default(), 5);
        engine.set_catalog(&entities, &explicit);
        engine
    }

    #[test]
    fn test_frame_emits_triangles() {
        let mut engine = demo_engine();
        for _ in 0..30 {
            tick(&mut engine, 1.0 / 60.0);
        }
        let mut out = Vec::new();
        draw(&engine, &mut out);
        assert!(!out.is_empty());
        assert_eq!(out.len() % 3, 0, "triangle list must be a multiple of 3");
        for v in &out {
            assert!(v.position[0].is_finite() && v.position[1].is_finite());
            assert!((0.0..=1.0).contains(&v.color[3]));
        }
    }

    #[test]
    fn test_orbit_mode_frame_is_finite() {
        let mut engine = demo_engine();
        engine.set_mode(ViewMode::Orbit);
        for _ in 0..30 {
            tick(&mut engine, 1.0 / 60.0);
        }
        let mut out = Vec::new();
        draw(&engine, &mut out);
        assert!(!out.is_empty());
        assert!(out.iter().all(|v| v.position[0].is_finite()));
    }

    #[test]
    fn test_zero_length_beam_skipped() {
        // Two entities forced onto the same point: singleton domains keep
        // their author positions, so overlap them deliberately.
        let entities = vec![
            Entity {
                id: "x".to_string(),
                pos: Vec2::ZERO,
                domain: Some("one".to_string()),
                name: "X".to_string(),
            },
            Entity {
                id: "y".to_string(),
                pos: Vec2::ZERO,
                domain: Some("two".to_string()),
                name: "Y".to_string(),
            },
        ];
        let mut engine = Engine::new(800.0, 600.0, Settings::default(), 5);
        engine.set_catalog(&entities, &[]);
        let mut out = Vec::new();
        draw(&engine, &mut out);
        // No NaN leaked from the degenerate segment
        assert!(out.iter().all(|v| v.position[0].is_finite() && v.position[1].is_finite()));
    }

    #[test]
    fn test_empty_catalog_keeps_running() {
        let mut engine = Engine::new(800.0, 600.0, Settings::default(), 5);
        engine.set_catalog(&[], &[]);
        for _ in 0..120 {
            tick(&mut engine, 1.0 / 60.0);
        }
        let mut out = Vec::new();
        draw(&engine, &mut out);
        // Ambient stars only; no panic, no clusters
        assert!(engine.clusters.is_empty());
    }

    #[test]
    fn test_low_quality_skips_label_dust() {
        let mut engine = Engine::new(800.0, 600.0, Settings::from_preset(QualityPreset::Low), 5);
        let entities = vec![
            Entity {
                id: "a".to_string(),
                pos: Vec2::ZERO,
                domain: Some("umbra".to_string()),
                name: "A".to_string(),
            },
            Entity {
                id: "b".to_string(),
                pos: Vec2::new(10.0, 0.0),
                domain: Some("umbra".to_string()),
                name: "B".to_string(),
            },
        ];
        engine.set_catalog(&entities, &[]);
        let mut low = Vec::new();
        draw(&engine, &mut low);

        engine.settings = Settings::from_preset(QualityPreset::High);
        engine.set_catalog(&entities, &[]);
        let mut high = Vec::new();
        draw(&engine, &mut high);
        assert!(high.len() > low.len());
    }

    #[test]
    fn test_screen_position_query_matches_camera() {
        let engine = demo_engine();
        let idx = engine.index["c"];
        let expected = engine.camera.world_to_screen(engine.entities[idx].pos);
        assert_eq!(engine.screen_position("c"), Some(expected));
        assert_eq!(engine.screen_position("missing"), None);
    }
}
