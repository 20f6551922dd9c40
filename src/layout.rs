//! Spatial clustering layout
//!
//! Pure functions: the caller hands in the entity catalog and explicit
//! connections, and gets back adjusted positions grouped by domain, a
//! synthesized connection graph and the derived per-domain clusters.
//! Recomputed wholesale whenever the catalog changes, never patched
//! incrementally; callers cache the previous result.

use std::collections::{BTreeMap, HashSet};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::polar_to_cartesian;
use crate::sigil::hash_key;

/// A cataloged denizen. Owned and mutated by the external data layer; the
/// engine reads it once per layout pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: String,
    /// Author-assigned world position
    pub pos: Vec2,
    /// Categorical grouping key; `None` folds into the default bucket
    #[serde(default)]
    pub domain: Option<String>,
    /// Display name (drives label dust in the demo catalog)
    #[serde(default)]
    pub name: String,
}

impl Entity {
    /// Domain key with the missing-domain fold applied.
    pub fn domain_key(&self) -> &str {
        self.domain.as_deref().unwrap_or(DEFAULT_DOMAIN)
    }
}

/// Visual link kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectionKind {
    /// Supplied by the caller
    Explicit,
    /// Synthesized by the layout for visual cohesion; never persisted
    Derived,
}

/// A visual link between two entities
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Connection {
    pub from: String,
    pub to: String,
    /// 0..1, scales beam particle count and intensity
    pub strength: f32,
    pub kind: ConnectionKind,
}

/// Derived aggregate for one domain; no identity beyond its key.
#[derive(Debug, Clone)]
pub struct DomainCluster {
    pub domain: String,
    pub color: [f32; 3],
    pub center: Vec2,
    pub radius: f32,
    /// Indices into the adjusted entity list
    pub members: Vec<usize>,
}

/// Fixed palette cycled by domain hash; corrupt keys still land on a color.
const DOMAIN_PALETTE: [[f32; 3]; 8] = [
    [0.55, 0.75, 1.00], // ice blue
    [0.80, 0.55, 1.00], // violet
    [0.45, 0.95, 0.70], // spring green
    [1.00, 0.70, 0.40], // ember
    [1.00, 0.50, 0.65], // rose
    [0.60, 0.95, 0.95], // cyan
    [0.95, 0.90, 0.50], // gold
    [0.70, 0.70, 0.85], // dusk gray
];

/// Neutral color for cross-domain links
pub const NEUTRAL_COLOR: [f32; 3] = [0.62, 0.64, 0.72];

/// Deterministic color for a domain key.
pub fn domain_color(domain: &str) -> [f32; 3] {
    DOMAIN_PALETTE[hash_key(domain) as usize % DOMAIN_PALETTE.len()]
}

/// Re-place entities so same-domain members group on a golden-angle spiral
/// around their original centroid. Singleton groups keep their author
/// position untouched. Returns a new list in the input order.
pub fn cluster_layout(entities: &[Entity]) -> Vec<Entity> {
    let mut adjusted: Vec<Entity> = entities.to_vec();

    // BTreeMap keeps group iteration order stable across calls
    let mut groups: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for (i, e) in entities.iter().enumerate() {
        groups.entry(e.domain_key()).or_default().push(i);
    }

    for members in groups.values() {
        // Singleton short-circuit happens before any spiral math
        if members.len() <= 1 {
            continue;
        }

        // Centroid of original positions, not adjusted ones
        let centroid = members
            .iter()
            .fold(Vec2::ZERO, |acc, &i| acc + entities[i].pos)
            / members.len() as f32;

        // Walk members in bearing order so each roughly keeps its original
        // direction from the group
        let mut ordered = members.clone();
        ordered.sort_by(|&a, &b| {
            let ta = (entities[a].pos - centroid).to_angle();
            let tb = (entities[b].pos - centroid).to_angle();
            ta.partial_cmp(&tb).unwrap_or(std::cmp::Ordering::Equal)
        });

        for (order, &i) in ordered.iter().enumerate() {
            let theta = order as f32 * GOLDEN_ANGLE;
            // Vogel disc: sqrt radius growth keeps golden-angle nearest
            // neighbors at CARD_MIN_SPACING. MAX_CLUSTER_RADIUS is a soft
            // bound; a cluster with more members than fit inside it keeps
            // the spacing and spills outward rather than collapsing onto
            // the rim.
            let dist = CARD_MIN_SPACING * (order as f32).sqrt();
            adjusted[i].pos = centroid + polar_to_cartesian(dist, theta);
        }
    }

    adjusted
}

/// Synthesize derived connections for visual cohesion.
///
/// Below [`SMALL_CONSTELLATION_MAX`] entities, every unordered pair gets a
/// link (same-domain pairs stronger); at or above the threshold only
/// same-domain pairs do. Explicit links are never duplicated in either
/// ordering, and self-pairs are never emitted.
pub fn synthesize_connections(entities: &[Entity], explicit: &[Connection]) -> Vec<Connection> {
    let mut seen: HashSet<(String, String)> = HashSet::with_capacity(explicit.len());
    for c in explicit {
        seen.insert(pair_key(&c.from, &c.to));
    }

    let small = entities.len() < SMALL_CONSTELLATION_MAX;
    let mut derived = Vec::new();

    for i in 0..entities.len() {
        for j in (i + 1)..entities.len() {
            let a = &entities[i];
            let b = &entities[j];
            if a.id == b.id {
                continue;
            }
            let same_domain = a.domain_key() == b.domain_key();
            if !small && !same_domain {
                continue;
            }
            let key = pair_key(&a.id, &b.id);
            if seen.contains(&key) {
                continue;
            }
            seen.insert(key);
            derived.push(Connection {
                from: a.id.clone(),
                to: b.id.clone(),
                strength: if same_domain {
                    SAME_DOMAIN_STRENGTH
                } else {
                    CROSS_DOMAIN_STRENGTH
                },
                kind: ConnectionKind::Derived,
            });
        }
    }

    derived
}

fn pair_key(a: &str, b: &str) -> (String, String) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

/// Derive per-domain clusters from the adjusted entity list.
pub fn derive_clusters(entities: &[Entity]) -> Vec<DomainCluster> {
    let mut groups: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for (i, e) in entities.iter().enumerate() {
        groups.entry(e.domain_key()).or_default().push(i);
    }

    groups
        .into_iter()
        .map(|(domain, members)| {
            let center = members
                .iter()
                .fold(Vec2::ZERO, |acc, &i| acc + entities[i].pos)
                / members.len() as f32;
            let max_dist = members
                .iter()
                .map(|&i| entities[i].pos.distance(center))
                .fold(0.0f32, f32::max);
            let padding = CLUSTER_PAD_BASE + members.len() as f32 * CLUSTER_PAD_PER_MEMBER;
            DomainCluster {
                domain: domain.to_string(),
                color: domain_color(domain),
                center,
                radius: (max_dist + padding).max(CLUSTER_MIN_RADIUS),
                members,
            }
        })
        .collect()
}
