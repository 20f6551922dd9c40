//! Engine state and particle types
//!
//! Particle batches are arena-style: each batch is owned by its cluster,
//! connection or entity and regenerated wholesale when the catalog changes.
//! Nothing here tracks per-particle identity.

use std::collections::HashMap;
use std::f32::consts::TAU;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::camera::Camera;
use crate::consts::*;
use crate::layout::{
    Connection, DomainCluster, Entity, NEUTRAL_COLOR, cluster_layout, derive_clusters,
    synthesize_connections,
};
use crate::settings::Settings;
use crate::sigil::{self, SigilPoint, hash_key};
use crate::sphere::SphereScene;

use super::labels::rasterize_label;

/// Which projection drives the frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Flat,
    /// Pseudo-3D per-domain spheres with slow rotation
    Orbit,
}

/// Connector beam animation style. One code path, parameterized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BeamStyle {
    /// Particles hold their position; a shared sine pulse modulates alpha
    Pulse,
    /// Each particle advances along the beam and wraps, with a soft shimmer
    #[default]
    Stream,
}

/// Ambient background star (screen space, short-lived)
#[derive(Debug, Clone)]
pub struct Star {
    pub pos: Vec2,
    pub size: f32,
    pub life: u32,
    pub max_life: u32,
    /// Horizontal glitch-streak subtype
    pub glitch: bool,
}

impl Star {
    /// Single sine hump over the lifetime: fade in, fade out.
    pub fn alpha(&self) -> f32 {
        let progress = self.life as f32 / self.max_life as f32;
        (progress * std::f32::consts::PI).sin()
    }
}

/// Cloud particle inside a domain nebula (world space, persistent)
#[derive(Debug, Clone)]
pub struct NebulaParticle {
    pub pos: Vec2,
    pub home: Vec2,
    pub vel: Vec2,
    pub phase: f32,
    pub base_alpha: f32,
    pub size: f32,
}

/// One particle of a connector beam, parametric along the segment
#[derive(Debug, Clone)]
pub struct BeamParticle {
    /// Position along the from->to segment, wraps past 1
    pub t: f32,
    /// Perpendicular offset in pixels
    pub jitter: f32,
    pub phase: f32,
    /// Per-frame advance (stream style only)
    pub speed: f32,
}

/// Particle batch for one connection
#[derive(Debug, Clone)]
pub struct ConnectorBatch {
    pub from: usize,
    pub to: usize,
    pub color: [f32; 3],
    pub intensity: f32,
    pub strength: f32,
    pub particles: Vec<BeamParticle>,
}

/// One mote of rasterized label dust (cluster-local offset)
#[derive(Debug, Clone)]
pub struct DustMote {
    pub offset: Vec2,
    pub phase: f32,
}

/// Everything the engine owns for one domain cluster
#[derive(Debug, Clone)]
pub struct ClusterField {
    pub cluster: DomainCluster,
    pub pulse_speed: f32,
    /// Elevated for glitch-heavy domains; drives streak/ghost flicker
    pub glitch_chance: f32,
    pub nebula: Vec<NebulaParticle>,
    pub dust: Vec<DustMote>,
}

/// Dim static background blob (world space)
#[derive(Debug, Clone)]
pub struct NoiseBlob {
    pub pos: Vec2,
    pub radius: f32,
    pub alpha: f32,
}

/// The visualization engine: owns the camera, all transient particle state
/// and the derived layout. Single-threaded; all mutation happens in the
/// per-frame tick or in the synchronous catalog rebuild.
pub struct Engine {
    pub camera: Camera,
    pub settings: Settings,
    pub mode: ViewMode,
    pub beam_style: BeamStyle,
    /// Seconds since engine start, advanced by tick
    pub time: f32,

    pub(crate) entities: Vec<Entity>,
    pub(crate) index: HashMap<String, usize>,
    pub(crate) clusters: Vec<ClusterField>,
    pub(crate) beams: Vec<ConnectorBatch>,
    /// Parallel to `entities`
    pub(crate) sigils: Vec<Vec<SigilPoint>>,
    pub(crate) stars: Vec<Star>,
    pub(crate) blobs: Vec<NoiseBlob>,
    pub(crate) sphere: SphereScene,
    pub(crate) rng: Pcg32,
}

impl Engine {
    pub fn new(width: f32, height: f32, settings: Settings, seed: u64) -> Self {
        Self {
            camera: Camera::new(width, height),
            settings,
            mode: ViewMode::Flat,
            beam_style: BeamStyle::default(),
            time: 0.0,
            entities: Vec::new(),
            index: HashMap::new(),
            clusters: Vec::new(),
            beams: Vec::new(),
            sigils: Vec::new(),
            stars: Vec::new(),
            blobs: Vec::new(),
            sphere: SphereScene::default(),
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Rebuild everything derived from the catalog: adjusted positions,
    /// clusters, connection graph, particle batches, sigils, sphere scene.
    /// Synchronous; runs on structural change, not per frame.
    pub fn set_catalog(&mut self, entities: &[Entity], explicit: &[Connection]) {
        self.entities = cluster_layout(entities);
        self.index = self
            .entities
            .iter()
            .enumerate()
            .map(|(i, e)| (e.id.clone(), i))
            .collect();

        let clusters = derive_clusters(&self.entities);
        self.clusters = clusters
            .into_iter()
            .map(|c| self.build_cluster_field(c))
            .collect();

        let mut all: Vec<Connection> = explicit.to_vec();
        all.extend(synthesize_connections(&self.entities, explicit));
        self.beams = all
            .iter()
            .filter_map(|c| self.build_beam(c))
            .collect();

        self.sigils = self
            .entities
            .iter()
            .map(|e| sigil::generate_sigil(e.domain_key(), Some(&e.id)))
            .collect();

        self.blobs = Self::build_noise_blobs(&mut self.rng, &self.clusters);
        self.sphere = SphereScene::build(
            self.clusters.iter().map(|f| &f.cluster),
            &mut self.rng,
        );

        log::info!(
            "catalog rebuilt: {} entities, {} clusters, {} beams",
            self.entities.len(),
            self.clusters.len(),
            self.beams.len()
        );
    }

    fn build_cluster_field(&mut self, cluster: DomainCluster) -> ClusterField {
        let h = hash_key(&cluster.domain);
        let pulse_speed = 0.8 + (h % 100) as f32 / 100.0 * 1.2;
        let density_mul = 0.7 + (h % 50) as f32 / 100.0;
        let glitch_chance = sigil::domain_dna(&cluster.domain).glitch;

        let area = std::f32::consts::PI * cluster.radius * cluster.radius;
        let count = ((area / NEBULA_DENSITY * density_mul) as usize)
            .min(self.settings.quality.nebula_cap());

        let nebula = (0..count)
            .map(|_| {
                let theta = self.rng.random::<f32>() * TAU;
                // Edge-biased radial distribution
                let dist = self.rng.random::<f32>().sqrt() * cluster.radius * 1.2;
                let home = cluster.center + crate::polar_to_cartesian(dist, theta);
                NebulaParticle {
                    pos: home,
                    home,
                    vel: Vec2::new(
                        (self.rng.random::<f32>() - 0.5) * 0.4,
                        (self.rng.random::<f32>() - 0.5) * 0.4,
                    ),
                    phase: self.rng.random::<f32>() * TAU,
                    base_alpha: 0.25 + self.rng.random::<f32>() * 0.35,
                    size: 2.0 + self.rng.random::<f32>() * 3.0,
                }
            })
            .collect();

        // Label dust: rasterized once per domain, cached here
        let dust = rasterize_label(&cluster.domain)
            .into_iter()
            .map(|offset| DustMote {
                offset,
                phase: self.rng.random::<f32>() * TAU,
            })
            .collect();

        ClusterField {
            cluster,
            pulse_speed,
            glitch_chance,
            nebula,
            dust,
        }
    }

    fn build_beam(&mut self, c: &Connection) -> Option<ConnectorBatch> {
        let from = *self.index.get(&c.from)?;
        let to = *self.index.get(&c.to)?;
        let same_domain = self.entities[from].domain_key() == self.entities[to].domain_key();
        let (color, intensity) = if same_domain {
            (self.clusters_color_of(self.entities[from].domain_key()), 1.0)
        } else {
            (NEUTRAL_COLOR, 0.55)
        };

        let count = 6 + (c.strength.clamp(0.0, 1.0) * 14.0) as usize;
        let particles = (0..count)
            .map(|i| BeamParticle {
                t: i as f32 / count as f32,
                jitter: (self.rng.random::<f32>() - 0.5) * 8.0,
                phase: self.rng.random::<f32>() * TAU,
                speed: 0.002 + self.rng.random::<f32>() * 0.004,
            })
            .collect();

        Some(ConnectorBatch {
            from,
            to,
            color,
            intensity,
            strength: c.strength,
            particles,
        })
    }

    fn clusters_color_of(&self, domain: &str) -> [f32; 3] {
        crate::layout::domain_color(domain)
    }

    fn build_noise_blobs(rng: &mut Pcg32, clusters: &[ClusterField]) -> Vec<NoiseBlob> {
        let extent = clusters
            .iter()
            .map(|f| f.cluster.center.length() + f.cluster.radius)
            .fold(1500.0f32, f32::max);
        (0..12)
            .map(|_| {
                let theta = rng.random::<f32>() * TAU;
                let dist = rng.random::<f32>() * extent * 1.4;
                NoiseBlob {
                    pos: crate::polar_to_cartesian(dist, theta),
                    radius: 160.0 + rng.random::<f32>() * 260.0,
                    alpha: 0.03 + rng.random::<f32>() * 0.04,
                }
            })
            .collect()
    }

    /// Where entity `id` sits on screen right now, if it is part of the
    /// catalog. The sole authority for card/UI placement.
    pub fn screen_position(&self, id: &str) -> Option<Vec2> {
        let idx = *self.index.get(id)?;
        self.screen_position_of(idx)
    }

    pub(crate) fn screen_position_of(&self, idx: usize) -> Option<Vec2> {
        match self.mode {
            ViewMode::Flat => Some(self.camera.world_to_screen(self.entities[idx].pos)),
            ViewMode::Orbit => self.sphere.card_pose(idx, &self.camera).map(|p| p.screen),
        }
    }

    pub fn set_mode(&mut self, mode: ViewMode) {
        if self.mode != mode {
            self.mode = mode;
            log::info!("view mode: {:?}", mode);
        }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.camera.resize(width, height);
    }

    // Pointer/wheel input, forwarded to the camera

    pub fn pointer_down(&mut self, pos: Vec2) {
        self.camera.begin_drag(pos);
    }

    pub fn pointer_move(&mut self, pos: Vec2) {
        self.camera.drag_to(pos);
    }

    pub fn pointer_up(&mut self) {
        self.camera.end_drag();
    }

    /// Wheel input: negative delta zooms in.
    pub fn wheel(&mut self, delta: f32, pos: Vec2) {
        let factor = if delta < 0.0 {
            ZOOM_IN_FACTOR
        } else {
            ZOOM_OUT_FACTOR
        };
        self.camera.zoom_at(pos, factor);
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn star_count(&self) -> usize {
        self.stars.len()
    }
}
