//! Particle render engine
//!
//! Owns the camera and all transient particle state (stars, nebula clouds,
//! connector beams, sigil pixels) and turns them into screen-space triangles
//! once per animation frame. Single-threaded and frame-driven: the host's
//! animation scheduler calls `tick` then `draw`; catalog rebuilds are
//! synchronous and happen on structural change only.

pub mod draw;
pub mod labels;
pub mod state;
pub mod tick;

pub use draw::draw;
pub use state::{
    BeamParticle, BeamStyle, ClusterField, ConnectorBatch, DustMote, Engine, NebulaParticle,
    NoiseBlob, Star, ViewMode,
};
pub use tick::tick;
