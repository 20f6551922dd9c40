//! Per-domain pattern parameters ("DNA")
//!
//! Each domain owns one DNA record; an entity's sigil is a seeded mutation of
//! its domain's record, so sigils within a domain share a family resemblance.

use super::rng::SigilRng;

/// Pattern archetype for a domain's sigils
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternKind {
    /// Core + golden-angle inner ring + outward arms + satellites
    Constellation,
    /// Four rotated arms with incidental side-thickening
    Cross,
    /// Golden-angle scatter, density biased toward the center
    Scatter,
    /// Square lattice with random cell omission
    Grid,
    /// Fibonacci-like tightening spiral arms
    Spiral,
}

/// Parameter record controlling one domain's procedural pattern
#[derive(Debug, Clone, Copy)]
pub struct SigilDna {
    pub kind: PatternKind,
    /// Base particle count before archetype-specific scaling
    pub base_count: usize,
    /// Overall radius of the pattern in local icon units
    pub spread: f32,
    /// Chance of a one-time positional glitch per point
    pub glitch: f32,
    /// Base rotation of the whole pattern
    pub rotation: f32,
    /// Whether a bright central core point exists
    pub core: bool,
    /// Density falloff exponent (power-law radius transform)
    pub falloff: f32,
    /// Arm/branch count for arm-based archetypes
    pub arms: u32,
}

/// Fallback DNA for unknown domains; never an error path.
pub const DEFAULT_DNA: SigilDna = SigilDna {
    kind: PatternKind::Scatter,
    base_count: 26,
    spread: 22.0,
    glitch: 0.06,
    rotation: 0.0,
    core: true,
    falloff: 1.8,
    arms: 3,
};

/// Look up the DNA for a domain key. Unknown keys fall back to
/// [`DEFAULT_DNA`].
pub fn domain_dna(domain: &str) -> SigilDna {
    match domain {
        "aether" => SigilDna {
            kind: PatternKind::Constellation,
            base_count: 24,
            spread: 24.0,
            glitch: 0.04,
            rotation: 0.3,
            core: true,
            falloff: 1.6,
            arms: 5,
        },
        "umbra" => SigilDna {
            kind: PatternKind::Spiral,
            base_count: 30,
            spread: 22.0,
            glitch: 0.10,
            rotation: 1.1,
            core: false,
            falloff: 2.0,
            arms: 2,
        },
        "verdant" => SigilDna {
            kind: PatternKind::Scatter,
            base_count: 34,
            spread: 20.0,
            glitch: 0.03,
            rotation: 0.0,
            core: true,
            falloff: 2.2,
            arms: 4,
        },
        "forge" => SigilDna {
            kind: PatternKind::Grid,
            base_count: 28,
            spread: 20.0,
            glitch: 0.18,
            rotation: 0.0,
            core: false,
            falloff: 1.0,
            arms: 4,
        },
        "abyss" => SigilDna {
            kind: PatternKind::Cross,
            base_count: 22,
            spread: 24.0,
            glitch: 0.12,
            rotation: 0.78,
            core: true,
            falloff: 1.4,
            arms: 4,
        },
        _ => DEFAULT_DNA,
    }
}

impl SigilDna {
    /// Perturb this DNA with the seeded stream so an entity's sigil is a
    /// mutation of its domain's archetype, not a copy. Archetype and counts
    /// stay fixed; only rotation, spread and glitch drift.
    pub fn mutate(&self, rng: &mut SigilRng) -> SigilDna {
        let mut dna = *self;
        dna.rotation += rng.range(-0.35, 0.35);
        dna.spread *= rng.range(0.85, 1.15);
        dna.glitch = (dna.glitch + rng.range(-0.04, 0.04)).clamp(0.0, 1.0);
        dna
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_domain_falls_back() {
        let dna = domain_dna("definitely-not-a-domain");
        assert_eq!(dna.kind, DEFAULT_DNA.kind);
        assert_eq!(dna.base_count, DEFAULT_DNA.base_count);
    }

    #[test]
    fn test_mutation_bounded() {
        let base = domain_dna("forge");
        let mut rng = SigilRng::from_keys("forge", Some("denizen-3"));
        let dna = base.mutate(&mut rng);
        assert_eq!(dna.kind, base.kind);
        assert!((dna.rotation - base.rotation).abs() <= 0.35 + f32::EPSILON);
        assert!(dna.spread >= base.spread * 0.85 - f32::EPSILON);
        assert!(dna.spread <= base.spread * 1.15 + f32::EPSILON);
        assert!((0.0..=1.0).contains(&dna.glitch));
    }
}
