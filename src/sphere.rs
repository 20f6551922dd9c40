//! Pseudo-3D sphere projection (orbit mode)
//!
//! Each domain becomes a sphere at its cluster center: ambient particles fill
//! the volume (core-biased and shell-biased families), entities sit on the
//! surface, and the whole arrangement spins slowly. Projection is
//! orthographic; depth only modulates alpha and draw order, there is no
//! occlusion.

use std::collections::HashMap;
use std::f32::consts::TAU;

use glam::{Vec2, Vec3};
use rand::Rng;
use rand_pcg::Pcg32;

use crate::camera::Camera;
use crate::consts::{GOLDEN_ANGLE, SPHERE_DEPTH_EFFECT};
use crate::layout::DomainCluster;

/// Ambient particle in sphere-local 3D coordinates
#[derive(Debug, Clone)]
pub struct SphereParticle {
    pub local: Vec3,
    pub size: f32,
    pub base_alpha: f32,
}

#[derive(Debug, Clone)]
struct SphereCluster {
    center: Vec2,
    radius: f32,
    color: [f32; 3],
    particles: Vec<SphereParticle>,
}

/// Entity placement on its domain sphere: fixed spherical angles.
#[derive(Debug, Clone, Copy)]
struct Anchor {
    cluster: usize,
    azimuth: f32,
    inclination: f32,
}

/// A particle projected to screen space, carrying depth for sorting
#[derive(Debug, Clone)]
pub struct ProjectedPoint {
    pub screen: Vec2,
    /// Normalized depth in [-1, 1]; larger is nearer
    pub z: f32,
    pub size: f32,
    pub alpha: f32,
    pub color: [f32; 3],
}

/// Screen pose for a UI card orbiting on a sphere
#[derive(Debug, Clone, Copy)]
pub struct CardPose {
    pub screen: Vec2,
    /// Facing rotation derived from the card's orbital position
    pub facing: f32,
    /// Secondary tilt from normalized vertical position
    pub tilt: f32,
    /// Depth alpha factor in [0.3, 1.0]
    pub depth_alpha: f32,
}

/// All per-domain spheres plus the shared rotation angle
#[derive(Debug, Clone, Default)]
pub struct SphereScene {
    clusters: Vec<SphereCluster>,
    anchors: HashMap<usize, Anchor>,
    pub rotation: f32,
}

/// Depth-modulated alpha factor: near points brighter, far points dimmer.
#[inline]
fn depth_alpha(normalized_z: f32) -> f32 {
    0.3 + (normalized_z + 1.0) * 0.35 * SPHERE_DEPTH_EFFECT
}

impl SphereScene {
    /// Build spheres from the derived domain clusters. Regenerated wholesale
    /// on catalog change; rotation restarts at zero.
    pub fn build<'a>(clusters: impl Iterator<Item = &'a DomainCluster>, rng: &mut Pcg32) -> Self {
        let mut scene = SphereScene::default();

        for cluster in clusters {
            let radius = cluster.radius * 0.8;
            let ci = scene.clusters.len();

            let core_count = (radius / 10.0) as usize + 12;
            let shell_count = core_count * 2;
            let mut particles = Vec::with_capacity(core_count + shell_count);

            // Core family: biased toward the center
            for _ in 0..core_count {
                let r = rng.random::<f32>() * radius * 0.3;
                particles.push(SphereParticle {
                    local: spherical(r, rng),
                    size: 2.0 + rng.random::<f32>() * 2.0,
                    base_alpha: 0.4 + rng.random::<f32>() * 0.4,
                });
            }
            // Shell family: biased toward the surface
            for _ in 0..shell_count {
                let r = rng.random::<f32>().powf(0.4) * radius;
                particles.push(SphereParticle {
                    local: spherical(r, rng),
                    size: 1.5 + rng.random::<f32>() * 2.0,
                    base_alpha: 0.25 + rng.random::<f32>() * 0.35,
                });
            }

            // Entities on (just outside) the surface at fixed angles
            let n = cluster.members.len();
            for (k, &entity) in cluster.members.iter().enumerate() {
                let inclination = (1.0 - 2.0 * (k as f32 + 0.5) / n as f32).acos();
                let azimuth = k as f32 * GOLDEN_ANGLE;
                scene.anchors.insert(
                    entity,
                    Anchor {
                        cluster: ci,
                        azimuth,
                        inclination,
                    },
                );
            }

            scene.clusters.push(SphereCluster {
                center: cluster.center,
                radius,
                color: cluster.color,
                particles,
            });
        }

        scene
    }

    /// Accumulate the global rotation angle.
    pub fn advance(&mut self, delta: f32) {
        self.rotation = (self.rotation + delta) % TAU;
    }

    /// Project every ambient particle to screen space, sorted back-to-front
    /// by depth for correct translucent layering.
    pub fn project(&self, camera: &Camera) -> Vec<ProjectedPoint> {
        let mut points = Vec::new();
        let (sin_r, cos_r) = self.rotation.sin_cos();

        for cluster in &self.clusters {
            if cluster.radius <= 0.0 {
                continue;
            }
            let center_screen = camera.world_to_screen(cluster.center);
            for p in &cluster.particles {
                // Rotate around the vertical axis
                let x = p.local.x * cos_r - p.local.z * sin_r;
                let z = p.local.x * sin_r + p.local.z * cos_r;
                let nz = z / cluster.radius;
                points.push(ProjectedPoint {
                    screen: center_screen + Vec2::new(x, p.local.y) * camera.scale,
                    z: nz,
                    size: p.size * camera.scale,
                    alpha: p.base_alpha * depth_alpha(nz),
                    color: cluster.color,
                });
            }
        }

        points.sort_by(|a, b| a.z.partial_cmp(&b.z).unwrap_or(std::cmp::Ordering::Equal));
        points
    }

    /// Screen pose for one entity's card, if it belongs to a sphere.
    pub fn card_pose(&self, entity: usize, camera: &Camera) -> Option<CardPose> {
        let anchor = self.anchors.get(&entity)?;
        let cluster = &self.clusters[anchor.cluster];
        if cluster.radius <= 0.0 {
            return None;
        }

        let r = cluster.radius * 1.05;
        let azimuth = anchor.azimuth + self.rotation;
        let x = r * anchor.inclination.sin() * azimuth.cos();
        let z = r * anchor.inclination.sin() * azimuth.sin();
        let y = r * anchor.inclination.cos();

        let screen = camera.world_to_screen(cluster.center) + Vec2::new(x, y) * camera.scale;
        Some(CardPose {
            screen,
            facing: z.atan2(x),
            tilt: (y / cluster.radius) * 0.25,
            depth_alpha: depth_alpha(z / cluster.radius),
        })
    }

}

/// Uniform direction at radius `r`: inclination via acos(2u - 1), uniform
/// azimuth.
fn spherical(r: f32, rng: &mut Pcg32) -> Vec3 {
    let inclination = (2.0 * rng.random::<f32>() - 1.0).acos();
    let azimuth = rng.random::<f32>() * TAU;
    Vec3::new(
        r * inclination.sin() * azimuth.cos(),
        r * inclination.cos(),
        r * inclination.sin() * azimuth.sin(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn demo_cluster(members: Vec<usize>) -> DomainCluster {
        DomainCluster {
            domain: "umbra".to_string(),
            color: [0.5, 0.5, 1.0],
            center: Vec2::new(100.0, -50.0),
            radius: 300.0,
            members,
        }
    }

    fn demo_scene() -> SphereScene {
        let cluster = demo_cluster(vec![0, 1, 2, 3]);
        let mut rng = Pcg32::seed_from_u64(7);
        SphereScene::build([cluster].iter(), &mut rng)
    }

    #[test]
    fn test_projection_sorted_back_to_front() {
        let scene = demo_scene();
        let camera = Camera::new(800.0, 600.0);
        let points = scene.project(&camera);
        assert!(!points.is_empty());
        for pair in points.windows(2) {
            assert!(pair[0].z <= pair[1].z);
        }
    }

    #[test]
    fn test_depth_alpha_bounds() {
        let scene = demo_scene();
        let camera = Camera::new(800.0, 600.0);
        for p in scene.project(&camera) {
            assert!(p.z >= -1.001 && p.z <= 1.001);
            assert!(p.alpha >= 0.0 && p.alpha <= 1.0);
        }
    }

    #[test]
    fn test_rotation_accumulates_and_wraps() {
        let mut scene = demo_scene();
        scene.advance(1.0);
        assert!((scene.rotation - 1.0).abs() < 1e-6);
        scene.advance(TAU);
        assert!(scene.rotation < TAU);
    }

    #[test]
    fn test_rotation_moves_card() {
        let mut scene = demo_scene();
        let camera = Camera::new(800.0, 600.0);
        let before = scene.card_pose(1, &camera).unwrap();
        scene.advance(0.8);
        let after = scene.card_pose(1, &camera).unwrap();
        assert!(before.screen.distance(after.screen) > 1.0);
    }

    #[test]
    fn test_unknown_entity_has_no_pose() {
        let scene = demo_scene();
        let camera = Camera::new(800.0, 600.0);
        assert!(scene.card_pose(99, &camera).is_none());
    }

    #[test]
    fn test_card_facing_tracks_orbit() {
        let scene = demo_scene();
        let camera = Camera::new(800.0, 600.0);
        let pose = scene.card_pose(0, &camera).unwrap();
        assert!(pose.facing.is_finite());
        assert!(pose.tilt.abs() <= 0.25 * 1.05 + 1e-3);
    }
}
