//! Page configuration.
//!
//! Every timing constant of the page lives here with the site's values as
//! defaults. Partial JSON works: missing fields keep their defaults.

use folio_motion::MotionConfig;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::PageError;
use crate::sequencer::GreetingCycle;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct PageConfig {
    pub motion: MotionConfig,
    pub loading: LoadingConfig,
    pub composer: ComposerConfig,
    pub nav: NavConfig,
    pub projects: ProjectsConfig,
    pub contact: ContactConfig,
    pub particles: ParticlesConfig,
    /// Seed for particle placement.
    pub seed: u64,
}

impl PageConfig {
    pub fn from_json(json: &str) -> Result<Self, PageError> {
        let cfg: Self = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn to_json(&self) -> Result<String, PageError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), PageError> {
        self.motion.validate()?;
        self.loading.validate()?;
        if self.nav.scrolled_threshold_px < 0.0 {
            return Err(PageError::config("nav.scrolled_threshold_px must be >= 0"));
        }
        if self.contact.submit_delay_ms < 0.0 {
            return Err(PageError::config("contact.submit_delay_ms must be >= 0"));
        }
        if self.projects.mobile_breakpoint_px <= 0.0 {
            return Err(PageError::config("projects.mobile_breakpoint_px must be > 0"));
        }
        let fields = [
            ("loading", &self.particles.loading),
            ("footer", &self.particles.footer),
        ];
        for (name, p) in fields {
            if p.base_ms <= 0.0 || p.spread_ms < 0.0 || p.max_delay_ms < 0.0 {
                return Err(PageError::config(format!(
                    "particles.{name}: durations must be positive"
                )));
            }
        }
        if let FallbackPolicy::MaxWait { after_ms } = self.composer.fallback {
            if after_ms < 0.0 {
                return Err(PageError::config("composer.fallback.after_ms must be >= 0"));
            }
            let natural = self.loading.cycle.completion_ms();
            if after_ms < natural {
                warn!(
                    after_ms,
                    natural, "fallback undercuts the loader; completion will be skipped"
                );
            }
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoadingConfig {
    pub cycle: GreetingCycle,
    /// Text entrance when the loader mounts.
    pub entrance_ms: f64,
    /// Each half of a greeting swap (fade out, then fade in).
    pub swap_ms: f64,
    pub text_exit_ms: f64,
    pub container_exit_ms: f64,
    pub container_exit_delay_ms: f64,
}

impl Default for LoadingConfig {
    fn default() -> Self {
        Self {
            cycle: GreetingCycle::default(),
            entrance_ms: 800.0,
            swap_ms: 300.0,
            text_exit_ms: 800.0,
            container_exit_ms: 1000.0,
            container_exit_delay_ms: 400.0,
        }
    }
}

impl LoadingConfig {
    /// Length of the exit animation as laid out by the loading view.
    pub fn exit_animation_ms(&self) -> f64 {
        self.text_exit_ms
            .max(self.container_exit_delay_ms + self.container_exit_ms)
    }

    pub fn validate(&self) -> Result<(), PageError> {
        self.cycle.validate()?;
        if self.swap_ms < 0.0 || self.entrance_ms < 0.0 {
            return Err(PageError::config("loading animation durations must be >= 0"));
        }
        if self.cycle.exit_ms < self.exit_animation_ms() {
            warn!(
                exit_ms = self.cycle.exit_ms,
                animation_ms = self.exit_animation_ms(),
                "loader completes before its exit animation ends"
            );
        }
        Ok(())
    }
}

/// How the composer's fallback timer competes with the loader.
#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum FallbackPolicy {
    /// Force `Ready` after `after_ms` if the loader has not completed.
    MaxWait { after_ms: f64 },
    /// Only the loader's completion makes the page ready.
    Disabled,
}

impl Default for FallbackPolicy {
    fn default() -> Self {
        FallbackPolicy::MaxWait { after_ms: 10_000.0 }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct ComposerConfig {
    pub fallback: FallbackPolicy,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NavConfig {
    /// The bar switches to its scrolled style past this offset.
    pub scrolled_threshold_px: f64,
    pub entrance_delay_ms: f64,
    pub stagger_ms: f64,
    pub item_duration_ms: f64,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            scrolled_threshold_px: 50.0,
            entrance_delay_ms: 500.0,
            stagger_ms: 100.0,
            item_duration_ms: 600.0,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProjectsConfig {
    /// Viewports narrower than this scrub the card strip horizontally.
    pub mobile_breakpoint_px: f32,
    pub scrub_lag_ms: f64,
    pub card_stagger_ms: f64,
}

impl Default for ProjectsConfig {
    fn default() -> Self {
        Self {
            mobile_breakpoint_px: 768.0,
            scrub_lag_ms: 1000.0,
            card_stagger_ms: 150.0,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ContactConfig {
    /// Simulated round-trip before the form clears.
    pub submit_delay_ms: f64,
    pub info_delay_ms: f64,
    pub social_stagger_ms: f64,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            submit_delay_ms: 2000.0,
            info_delay_ms: 200.0,
            social_stagger_ms: 100.0,
        }
    }
}

/// Floating particle field.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ParticleConfig {
    pub count: usize,
    pub rise_px: f32,
    pub from_opacity: f32,
    pub to_opacity: f32,
    /// Each particle's half-cycle lasts `base_ms + rand * spread_ms`.
    pub base_ms: f64,
    pub spread_ms: f64,
    pub max_delay_ms: f64,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            count: 20,
            rise_px: 20.0,
            from_opacity: 0.3,
            to_opacity: 0.8,
            base_ms: 3000.0,
            spread_ms: 2000.0,
            max_delay_ms: 2000.0,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ParticlesConfig {
    pub loading: ParticleConfig,
    pub footer: ParticleConfig,
}

impl Default for ParticlesConfig {
    fn default() -> Self {
        Self {
            loading: ParticleConfig::default(),
            footer: ParticleConfig {
                count: 15,
                rise_px: 30.0,
                from_opacity: 0.2,
                to_opacity: 0.8,
                base_ms: 4000.0,
                spread_ms: 4000.0,
                max_delay_ms: 2000.0,
            },
        }
    }
}
