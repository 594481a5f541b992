//! Page sections.
//!
//! Each section owns one scope in the shared `MotionContext`. `mount` claims
//! its elements and registers timelines, triggers and hovers under that scope;
//! `unmount` releases the scope, which tears all of it down at once.

pub mod about;
pub mod contact;
pub mod footer;
pub mod hero;
pub mod loading;
pub mod nav;
pub mod particles;
pub mod projects;

use folio_motion::{
    EaseDir, Easing, Inputs, MotionContext, MotionError, ReplayPolicy, ScopeId, TriggerSpec,
};

use crate::events::{PageCommand, PageEvent};

pub use about::About;
pub use contact::Contact;
pub use footer::Footer;
pub use hero::Hero;
pub use loading::LoadingView;
pub use nav::NavBar;
pub use particles::ParticleField;
pub use projects::Projects;

pub(crate) const POWER2_OUT: Easing = Easing::Power(2, EaseDir::Out);
pub(crate) const POWER2_IN_OUT: Easing = Easing::Power(2, EaseDir::InOut);
pub(crate) const POWER3_OUT: Easing = Easing::Power(3, EaseDir::Out);
pub(crate) const POWER3_IN_OUT: Easing = Easing::Power(3, EaseDir::InOut);

pub trait Section {
    fn name(&self) -> &'static str;

    /// Scope opened by the last `mount`, until `unmount`.
    fn scope(&self) -> Option<ScopeId>;

    fn mount(&mut self, ctx: &mut MotionContext, out: &mut Vec<PageEvent>);

    /// Per-frame logic; runs before the context steps.
    fn frame(
        &mut self,
        _ctx: &mut MotionContext,
        _dt_ms: f64,
        _inputs: &Inputs,
        _out: &mut Vec<PageEvent>,
    ) {
    }

    /// Returns true if the command was meant for this section.
    fn command(
        &mut self,
        _ctx: &mut MotionContext,
        _command: &PageCommand,
        _out: &mut Vec<PageEvent>,
    ) -> bool {
        false
    }

    fn unmount(&mut self, ctx: &mut MotionContext);
}

/// `prefix.0`, `prefix.1`, … for list items.
pub(crate) fn indexed_keys(prefix: &str, count: usize) -> Vec<String> {
    (0..count).map(|i| format!("{prefix}.{i}")).collect()
}

/// Play on entry, reverse when scrolled back above the start.
pub(crate) fn reveal(start: &str, end: &str) -> Result<TriggerSpec, MotionError> {
    TriggerSpec::new(start, end, ReplayPolicy::Reverse)
}

/// Release `scope` if one is held. Shared by every `unmount`.
pub(crate) fn release(ctx: &mut MotionContext, scope: &mut Option<ScopeId>) {
    if let Some(scope) = scope.take() {
        ctx.release_scope(scope);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_zero_based() {
        assert_eq!(
            indexed_keys("about.skill", 3),
            ["about.skill.0", "about.skill.1", "about.skill.2"]
        );
        assert!(indexed_keys("x", 0).is_empty());
    }
}
