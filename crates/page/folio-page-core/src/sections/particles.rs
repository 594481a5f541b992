//! Floating particle fields (loading splash and footer).
//!
//! Placement and timing are drawn from a seeded `StdRng`, so the same seed
//! always yields the same field.

use folio_motion::{
    AnimationStep, EaseDir, Easing, MotionContext, Prop, PropSet, Repeat, ScopeId, Timeline,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::ParticleConfig;
use crate::events::ParticlePlacement;

#[derive(Clone, Debug)]
pub struct ParticleField {
    field: String,
    config: ParticleConfig,
    seed: u64,
}

impl ParticleField {
    pub fn new(field: impl Into<String>, config: ParticleConfig, seed: u64) -> Self {
        Self {
            field: field.into(),
            config,
            seed,
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    /// Draw the placements without touching any context.
    pub fn placements(&self) -> Vec<ParticlePlacement> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let c = &self.config;
        (0..c.count)
            .map(|i| ParticlePlacement {
                key: format!("{}.{i}", self.field),
                left_pct: rng.gen::<f32>() * 100.0,
                top_pct: rng.gen::<f32>() * 100.0,
                duration_ms: c.base_ms + rng.gen::<f64>() * c.spread_ms,
                delay_ms: rng.gen::<f64>() * c.max_delay_ms,
            })
            .collect()
    }

    /// Claim every particle under `scope` and start its endless drift.
    pub fn spawn(&self, ctx: &mut MotionContext, scope: ScopeId) -> Vec<ParticlePlacement> {
        let placements = self.placements();
        let c = &self.config;
        for p in &placements {
            let Some(el) = ctx.claim(scope, &p.key) else {
                continue;
            };
            let drift = AnimationStep::from_to(
                [el],
                PropSet::new()
                    .with(Prop::Y, 0.0)
                    .with(Prop::Opacity, c.from_opacity),
                PropSet::new()
                    .with(Prop::Y, -c.rise_px)
                    .with(Prop::Opacity, c.to_opacity),
                p.duration_ms,
            )
            .ease(Easing::Power(1, EaseDir::InOut));
            let tl = Timeline::builder()
                .delay(p.delay_ms)
                .step(drift)
                .repeat(Repeat::Infinite)
                .yoyo(true)
                .build();
            ctx.play(scope, tl);
        }
        placements
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_field() {
        let a = ParticleField::new("footer.particles", ParticleConfig::default(), 7);
        let b = ParticleField::new("footer.particles", ParticleConfig::default(), 7);
        assert_eq!(a.placements(), b.placements());
        let c = ParticleField::new("footer.particles", ParticleConfig::default(), 8);
        assert_ne!(a.placements(), c.placements());
    }

    #[test]
    fn placements_stay_in_range() {
        let cfg = ParticleConfig::default();
        let field = ParticleField::new("loading.particles", cfg.clone(), 42);
        let all = field.placements();
        assert_eq!(all.len(), cfg.count);
        assert_eq!(all[3].key, "loading.particles.3");
        for p in all {
            assert!((0.0..100.0).contains(&p.left_pct));
            assert!((0.0..100.0).contains(&p.top_pct));
            assert!(p.duration_ms >= cfg.base_ms && p.duration_ms < cfg.base_ms + cfg.spread_ms);
            assert!(p.delay_ms < cfg.max_delay_ms);
        }
    }

    #[test]
    fn spawn_plays_one_run_per_particle() {
        let mut ctx = MotionContext::default();
        let scope = ctx.open_scope("footer");
        let field = ParticleField::new("footer.particles", ParticleConfig::default(), 1);
        let placed = field.spawn(&mut ctx, scope);
        assert_eq!(ctx.run_count(), placed.len());
        assert!(ctx.element("footer.particles.0").is_some());
    }
}
