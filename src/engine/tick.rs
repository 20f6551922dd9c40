//! Per-frame simulation step
//!
//! One call per animation frame. Everything that moves, moves here; drawing
//! reads the result without mutating it. Off-screen particles keep
//! simulating so panning back looks continuous.

use glam::Vec2;
use rand::Rng;

use super::state::{BeamStyle, Engine, Star};
use crate::consts::*;

/// Advance all transient particle state by one frame.
pub fn tick(engine: &mut Engine, dt: f32) {
    engine.time += dt;

    tick_stars(engine);
    tick_nebula(engine);
    tick_beams(engine);

    let spin = dt * SPHERE_ROTATION_RATE * engine.settings.rotation_multiplier();
    engine.sphere.advance(spin);
}

/// Star field: probabilistic spawn under a hard cap, age by one tick per
/// frame, remove at end of life.
fn tick_stars(engine: &mut Engine) {
    let cap = engine.settings.quality.star_cap();
    if engine.stars.len() < cap && engine.rng.random::<f32>() < STAR_SPAWN_CHANCE {
        let viewport = engine.camera.viewport();
        let pos = Vec2::new(
            engine.rng.random::<f32>() * viewport.x,
            engine.rng.random::<f32>() * viewport.y,
        );
        engine.stars.push(Star {
            pos,
            size: 1.0 + engine.rng.random::<f32>() * 1.5,
            life: 0,
            max_life: 60 + (engine.rng.random::<f32>() * 180.0) as u32,
            glitch: engine.rng.random::<f32>() < STAR_GLITCH_CHANCE,
        });
    }

    for star in engine.stars.iter_mut() {
        star.life += 1;
    }
    engine.stars.retain(|s| s.life < s.max_life);
}

/// Nebula particles: integrate velocity, spring back toward home outside the
/// dead zone, damp every frame.
fn tick_nebula(engine: &mut Engine) {
    for field in engine.clusters.iter_mut() {
        for p in field.nebula.iter_mut() {
            p.pos += p.vel;
            let displacement = p.home - p.pos;
            if displacement.length() > NEBULA_DEADZONE {
                p.vel += displacement * NEBULA_SPRING;
            }
            p.vel *= NEBULA_DAMPING;
        }
    }
}

/// Stream-style beams advance each particle and wrap past 1; pulse-style
/// particles hold position (the pulse lives in the draw-time alpha).
fn tick_beams(engine: &mut Engine) {
    if engine.beam_style != BeamStyle::Stream {
        return;
    }
    for batch in engine.beams.iter_mut() {
        for p in batch.particles.iter_mut() {
            p.t = (p.t + p.speed) % 1.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Entity;
    use crate::settings::Settings;

    fn demo_entities(n: usize, domain: &str) -> Vec<Entity> {
        (0..n)
            .map(|i| Entity {
                id: format!("{domain}-{i}"),
                pos: Vec2::new(i as f32 * 40.0, 0.0),
                domain: Some(domain.to_string()),
                name: format!("{domain} {i}"),
            })
            .collect()
    }

    fn demo_engine() -> Engine {
        let mut engine = Engine::new(800.0, 600.0, Settings::default(), 99);
        let mut entities = demo_entities(4, "umbra");
        entities.extend(demo_entities(3, "forge"));
        engine.set_catalog(&entities, &[]);
        engine
    }

    #[test]
    fn test_star_population_never_exceeds_cap() {
        let mut engine = demo_engine();
        let cap = engine.settings.quality.star_cap();
        for _ in 0..10_000 {
            tick(&mut engine, 1.0 / 60.0);
            assert!(engine.star_count() <= cap);
        }
        // After that many frames the field should actually be populated
        assert!(engine.star_count() > 0);
    }

    #[test]
    fn test_stars_die_at_max_life() {
        let mut engine = demo_engine();
        for _ in 0..600 {
            tick(&mut engine, 1.0 / 60.0);
        }
        for s in &engine.stars {
            assert!(s.life < s.max_life);
        }
    }

    #[test]
    fn test_nebula_springs_back_toward_home() {
        let mut engine = demo_engine();
        assert!(!engine.clusters.is_empty());
        assert!(!engine.clusters[0].nebula.is_empty());

        // Shove a particle far from home and let the spring act
        engine.clusters[0].nebula[0].pos += Vec2::new(400.0, 0.0);
        engine.clusters[0].nebula[0].vel = Vec2::ZERO;
        let start = {
            let p = &engine.clusters[0].nebula[0];
            p.home.distance(p.pos)
        };
        for _ in 0..240 {
            tick(&mut engine, 1.0 / 60.0);
        }
        let p = &engine.clusters[0].nebula[0];
        assert!(p.home.distance(p.pos) < start);
    }

    #[test]
    fn test_stream_beams_wrap_in_unit_range() {
        let mut engine = demo_engine();
        engine.beam_style = BeamStyle::Stream;
        for _ in 0..2_000 {
            tick(&mut engine, 1.0 / 60.0);
        }
        for batch in &engine.beams {
            for p in &batch.particles {
                assert!((0.0..1.0).contains(&p.t));
            }
        }
    }

    #[test]
    fn test_pulse_beams_hold_position() {
        let mut engine = demo_engine();
        engine.beam_style = BeamStyle::Pulse;
        let before: Vec<f32> = engine.beams[0].particles.iter().map(|p| p.t).collect();
        for _ in 0..100 {
            tick(&mut engine, 1.0 / 60.0);
        }
        let after: Vec<f32> = engine.beams[0].particles.iter().map(|p| p.t).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_reduced_motion_freezes_sphere() {
        let mut engine = demo_engine();
        engine.settings.reduced_motion = true;
        for _ in 0..100 {
            tick(&mut engine, 1.0 / 60.0);
        }
        assert_eq!(engine.sphere.rotation, 0.0);
    }
}
