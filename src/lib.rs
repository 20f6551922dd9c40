//! Denizen Atlas - an animated star-field visualization of a denizen catalog
//!
//! Core modules:
//! - `sigil`: Deterministic procedural sigil generation (seeded, pure)
//! - `layout`: Spatial clustering by domain + connection synthesis
//! - `camera`: Pan/zoom viewport transform (world <-> screen)
//! - `engine`: Per-frame particle simulation and draw-call emission
//! - `sphere`: Pseudo-3D orbit mode (per-domain sphere projection)
//! - `renderer`: WebGPU rendering pipeline

pub mod camera;
pub mod engine;
pub mod layout;
pub mod renderer;
pub mod settings;
pub mod sigil;
pub mod sphere;

pub use camera::Camera;
pub use engine::{BeamStyle, Engine, ViewMode};
pub use layout::{Connection, DomainCluster, Entity};
pub use settings::{QualityPreset, Settings};

use glam::Vec2;

/// Visualization tuning constants
pub mod consts {
    /// Golden angle in radians, pi * (3 - sqrt(5)); even non-repeating angular spacing
    pub const GOLDEN_ANGLE: f32 = 2.399_963_2;

    /// Camera zoom bounds
    pub const MIN_SCALE: f32 = 0.2;
    pub const MAX_SCALE: f32 = 3.0;
    /// Per-notch wheel zoom factors
    pub const ZOOM_IN_FACTOR: f32 = 1.08;
    pub const ZOOM_OUT_FACTOR: f32 = 0.92;

    /// Clustering layout. The spiral radius grows with the square root of
    /// the placement index (Vogel disc), so CARD_MIN_SPACING doubles as the
    /// radial coefficient. MAX_CLUSTER_RADIUS holds for clusters of up to
    /// 26 members; beyond that, spacing wins over extent.
    pub const CARD_MIN_SPACING: f32 = 180.0;
    pub const MAX_CLUSTER_RADIUS: f32 = 900.0;
    /// Bucket for entities with no domain
    pub const DEFAULT_DOMAIN: &str = "unaligned";

    /// Connection synthesis
    pub const SMALL_CONSTELLATION_MAX: usize = 10;
    pub const SAME_DOMAIN_STRENGTH: f32 = 0.8;
    pub const CROSS_DOMAIN_STRENGTH: f32 = 0.35;

    /// Cluster radius padding: base + per-member growth
    pub const CLUSTER_PAD_BASE: f32 = 120.0;
    pub const CLUSTER_PAD_PER_MEMBER: f32 = 18.0;
    pub const CLUSTER_MIN_RADIUS: f32 = 220.0;

    /// Star field
    pub const STAR_CAP: usize = 60;
    pub const STAR_SPAWN_CHANCE: f32 = 0.06;
    pub const STAR_GLITCH_CHANCE: f32 = 0.15;

    /// Nebula simulation
    pub const NEBULA_DENSITY: f32 = 2600.0;
    pub const NEBULA_CAP_PER_CLUSTER: usize = 220;
    pub const NEBULA_SPRING: f32 = 0.002;
    pub const NEBULA_DAMPING: f32 = 0.92;
    pub const NEBULA_DEADZONE: f32 = 2.0;

    /// Sigil rasterization grid pitch (pixel-art snap)
    pub const SIGIL_GRID_PITCH: f32 = 3.0;

    /// Sphere mode
    pub const SPHERE_ROTATION_RATE: f32 = 0.12;
    pub const SPHERE_DEPTH_EFFECT: f32 = 1.0;
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Snap a coordinate down to the nearest multiple of `pitch`
#[inline]
pub fn grid_snap(v: f32, pitch: f32) -> f32 {
    (v / pitch).floor() * pitch
}
