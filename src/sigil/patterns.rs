//! Archetype point placement and pixel-grid rasterization

use std::collections::HashMap;
use std::f32::consts::TAU;

use glam::Vec2;

use super::dna::{PatternKind, SigilDna};
use super::rng::SigilRng;
use crate::consts::{GOLDEN_ANGLE, SIGIL_GRID_PITCH};
use crate::{grid_snap, polar_to_cartesian};

/// One rendered sigil pixel in local icon space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SigilPoint {
    pub pos: Vec2,
    pub size: f32,
    pub alpha: f32,
}

/// Place raw (unsnapped) points for the given DNA.
pub fn place_points(dna: &SigilDna, rng: &mut SigilRng) -> Vec<SigilPoint> {
    let mut points = Vec::with_capacity(dna.base_count * 2);
    match dna.kind {
        PatternKind::Constellation => constellation(dna, rng, &mut points),
        PatternKind::Cross => cross(dna, rng, &mut points),
        PatternKind::Scatter => scatter(dna, rng, &mut points),
        PatternKind::Grid => grid(dna, rng, &mut points),
        PatternKind::Spiral => spiral(dna, rng, &mut points),
    }
    apply_glitch(dna, rng, &mut points);
    points
}

/// Snap points to the pixel grid, deduplicating cells and keeping the higher
/// alpha. Output order is sorted by cell so repeated calls are byte-identical.
pub fn snap_to_grid(points: &[SigilPoint]) -> Vec<SigilPoint> {
    let pitch = SIGIL_GRID_PITCH;
    let mut cells: HashMap<(i32, i32), SigilPoint> = HashMap::with_capacity(points.len());
    for p in points {
        let x = grid_snap(p.pos.x, pitch);
        let y = grid_snap(p.pos.y, pitch);
        let key = ((x / pitch) as i32, (y / pitch) as i32);
        let snapped = SigilPoint {
            pos: Vec2::new(x, y),
            size: p.size,
            alpha: p.alpha,
        };
        cells
            .entry(key)
            .and_modify(|existing| {
                if snapped.alpha > existing.alpha {
                    *existing = snapped;
                }
            })
            .or_insert(snapped);
    }
    let mut out: Vec<(i32, i32, SigilPoint)> =
        cells.into_iter().map(|((cx, cy), p)| (cy, cx, p)).collect();
    out.sort_by_key(|&(cy, cx, _)| (cy, cx));
    out.into_iter().map(|(_, _, p)| p).collect()
}

fn push(points: &mut Vec<SigilPoint>, pos: Vec2, size: f32, alpha: f32) {
    points.push(SigilPoint {
        pos,
        size,
        alpha: alpha.clamp(0.0, 1.0),
    });
}

/// Core + golden-angle inner ring + outward arms with decaying size/alpha
/// + scattered satellites.
fn constellation(dna: &SigilDna, rng: &mut SigilRng, points: &mut Vec<SigilPoint>) {
    if dna.core {
        push(points, Vec2::ZERO, 3.0, 1.0);
    }

    let ring_count = 6;
    let ring_radius = dna.spread * 0.3;
    for i in 0..ring_count {
        let theta = dna.rotation + i as f32 * GOLDEN_ANGLE;
        push(points, polar_to_cartesian(ring_radius, theta), 2.0, 0.85);
    }

    let per_arm = (dna.base_count / dna.arms.max(1) as usize).max(2);
    for arm in 0..dna.arms {
        let theta = dna.rotation + arm as f32 * TAU / dna.arms.max(1) as f32 + rng.range(-0.1, 0.1);
        for step in 1..=per_arm {
            let t = step as f32 / per_arm as f32;
            let r = ring_radius + t * (dna.spread - ring_radius);
            let wobble = rng.range(-1.5, 1.5);
            let pos = polar_to_cartesian(r, theta) + Vec2::new(wobble, -wobble);
            push(points, pos, 2.0 - t, 0.9 - t * 0.5);
        }
    }

    let satellites = dna.base_count / 4;
    for _ in 0..satellites {
        let theta = rng.range(0.0, TAU);
        let r = dna.spread * rng.range(0.6, 1.1);
        push(points, polar_to_cartesian(r, theta), 1.0, rng.range(0.3, 0.6));
    }
}

/// Four rotated arms with incidental side-thickening points.
fn cross(dna: &SigilDna, rng: &mut SigilRng, points: &mut Vec<SigilPoint>) {
    if dna.core {
        push(points, Vec2::ZERO, 3.0, 1.0);
    }
    let per_arm = (dna.base_count / 4).max(3);
    for arm in 0..4u32 {
        let theta = dna.rotation + arm as f32 * TAU / 4.0;
        let dir = Vec2::new(theta.cos(), theta.sin());
        let side = Vec2::new(-dir.y, dir.x);
        for step in 1..=per_arm {
            let t = step as f32 / per_arm as f32;
            let pos = dir * (t * dna.spread);
            push(points, pos, 2.2 - t, 1.0 - t * dna.falloff * 0.3);
            // Occasional thickening beside the arm
            if rng.chance(0.35) {
                let off = side * rng.range(1.5, 3.5) * if rng.chance(0.5) { 1.0 } else { -1.0 };
                push(points, pos + off, 1.0, 0.5 - t * 0.3);
            }
        }
    }
}

/// Golden-angle-modulo scatter with a power-law bias toward the center, plus
/// a few random sub-clusters.
fn scatter(dna: &SigilDna, rng: &mut SigilRng, points: &mut Vec<SigilPoint>) {
    if dna.core {
        push(points, Vec2::ZERO, 2.5, 1.0);
    }
    for i in 0..dna.base_count {
        let theta = dna.rotation + i as f32 * GOLDEN_ANGLE;
        let r = rng.unit().powf(dna.falloff) * dna.spread;
        let alpha = 0.9 - (r / dna.spread) * 0.5;
        push(points, polar_to_cartesian(r, theta), rng.range(1.0, 2.2), alpha);
    }

    let sub_clusters = 2 + rng.index(2);
    for _ in 0..sub_clusters {
        let center = polar_to_cartesian(dna.spread * rng.range(0.4, 0.9), rng.range(0.0, TAU));
        let members = 3 + rng.index(3);
        for _ in 0..members {
            let jitter = Vec2::new(rng.range(-3.0, 3.0), rng.range(-3.0, 3.0));
            push(points, center + jitter, 1.2, rng.range(0.4, 0.7));
        }
    }
}

/// Square lattice with random cell omission (simulated data corruption).
fn grid(dna: &SigilDna, rng: &mut SigilRng, points: &mut Vec<SigilPoint>) {
    let side = ((dna.base_count as f32).sqrt().ceil() as i32).max(3);
    let cell = dna.spread * 2.0 / side as f32;
    let origin = -dna.spread + cell / 2.0;
    for row in 0..side {
        for col in 0..side {
            // Random omission
            if rng.chance(0.25) {
                continue;
            }
            let pos = Vec2::new(origin + col as f32 * cell, origin + row as f32 * cell);
            push(points, pos, 1.8, rng.range(0.5, 0.95));
        }
    }
}

/// Arms of points along radius ~ progress^(1/phi): a tightening spiral.
fn spiral(dna: &SigilDna, rng: &mut SigilRng, points: &mut Vec<SigilPoint>) {
    const INV_PHI: f32 = 1.0 / 1.618_034;
    if dna.core {
        push(points, Vec2::ZERO, 2.5, 1.0);
    }
    let per_arm = (dna.base_count / dna.arms.max(1) as usize).max(4);
    let turns = 1.6;
    for arm in 0..dna.arms {
        let base = dna.rotation + arm as f32 * TAU / dna.arms.max(1) as f32;
        for step in 1..=per_arm {
            let t = step as f32 / per_arm as f32;
            let r = dna.spread * t.powf(INV_PHI);
            let theta = base + t * turns * TAU;
            let pos = polar_to_cartesian(r, theta);
            push(points, pos, 2.0 - t * 0.8, 1.0 - t * 0.55 + rng.range(-0.05, 0.05));
        }
    }
}

/// One-time positional glitch: with probability `dna.glitch` a point is
/// shoved sideways by whole grid cells. Grid patterns glitch heavier.
fn apply_glitch(dna: &SigilDna, rng: &mut SigilRng, points: &mut [SigilPoint]) {
    let magnitude = if dna.kind == PatternKind::Grid { 2.0 } else { 1.0 };
    for p in points.iter_mut() {
        if rng.chance(dna.glitch) {
            let cells = rng.range(1.0, 2.0) * magnitude;
            let sign = if rng.chance(0.5) { 1.0 } else { -1.0 };
            p.pos.x += sign * cells * SIGIL_GRID_PITCH;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sigil::dna::domain_dna;

    fn generate(domain: &str, id: Option<&str>) -> Vec<SigilPoint> {
        let mut rng = SigilRng::from_keys(domain, id);
        let dna = match id {
            Some(_) => domain_dna(domain).mutate(&mut rng),
            None => domain_dna(domain),
        };
        snap_to_grid(&place_points(&dna, &mut rng))
    }

    #[test]
    fn test_snap_alignment() {
        let points = generate("aether", Some("denizen-1"));
        assert!(!points.is_empty());
        for p in &points {
            assert_eq!(p.pos.x, grid_snap(p.pos.x, SIGIL_GRID_PITCH));
            assert_eq!(p.pos.y, grid_snap(p.pos.y, SIGIL_GRID_PITCH));
        }
    }

    #[test]
    fn test_snap_dedup_keeps_higher_alpha() {
        let raw = vec![
            SigilPoint { pos: Vec2::new(0.5, 0.5), size: 1.0, alpha: 0.3 },
            SigilPoint { pos: Vec2::new(1.0, 1.0), size: 2.0, alpha: 0.9 },
        ];
        let snapped = snap_to_grid(&raw);
        assert_eq!(snapped.len(), 1);
        assert_eq!(snapped[0].alpha, 0.9);
    }

    #[test]
    fn test_all_archetypes_produce_points() {
        for domain in ["aether", "umbra", "verdant", "forge", "abyss", "???"] {
            let points = generate(domain, None);
            assert!(points.len() >= 4, "{domain} produced too few points");
            for p in &points {
                assert!((0.0..=1.0).contains(&p.alpha));
            }
        }
    }
}
