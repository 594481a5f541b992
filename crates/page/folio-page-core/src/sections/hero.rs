use folio_motion::{
    AnimationStep, EaseDir, Easing, MotionContext, Position, Prop, PropSet, ScopeId, Timeline,
};

use crate::anchor::SectionAnchor;
use crate::events::{PageCommand, PageEvent};
use crate::sections::{release, Section, POWER2_OUT};

const ENTRANCE_DELAY_MS: f64 = 300.0;

/// Headline, subtitle, call to action and scroll indicator.
#[derive(Debug, Default)]
pub struct Hero {
    scope: Option<ScopeId>,
}

impl Hero {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entrance timeline; steps whose element is absent are skipped and the
    /// following overlaps are measured against what remains.
    fn entrance(ctx: &mut MotionContext, scope: ScopeId) -> Timeline {
        let headline = ctx.claim(scope, "hero.headline");
        let subtitle = ctx.claim(scope, "hero.subtitle");
        let cta = ctx.claim(scope, "hero.cta");
        let indicator = ctx.claim(scope, "hero.scroll");

        let hidden = |dy: f32| PropSet::new().with(Prop::Opacity, 0.0).with(Prop::Y, dy);
        let shown = || PropSet::new().with(Prop::Opacity, 1.0).with(Prop::Y, 0.0);

        Timeline::builder()
            .delay(ENTRANCE_DELAY_MS)
            .step(AnimationStep::from_to(headline, hidden(30.0), shown(), 800.0).ease(POWER2_OUT))
            .step(
                AnimationStep::from_to(subtitle, hidden(20.0), shown(), 600.0)
                    .ease(POWER2_OUT)
                    .at(Position::Offset(-500.0)),
            )
            .step(
                AnimationStep::from_to(
                    cta,
                    PropSet::new().with(Prop::Opacity, 0.0).with(Prop::Scale, 0.95),
                    PropSet::new().with(Prop::Opacity, 1.0).with(Prop::Scale, 1.0),
                    500.0,
                )
                .ease(Easing::Back(1.3, EaseDir::Out))
                .at(Position::Offset(-400.0)),
            )
            .step(
                AnimationStep::from_to(indicator, hidden(10.0), shown(), 400.0)
                    .at(Position::Offset(-300.0)),
            )
            .build()
    }
}

impl Section for Hero {
    fn name(&self) -> &'static str {
        "hero"
    }

    fn scope(&self) -> Option<ScopeId> {
        self.scope
    }

    fn mount(&mut self, ctx: &mut MotionContext, _out: &mut Vec<PageEvent>) {
        let scope = ctx.open_scope(self.name());
        let tl = Self::entrance(ctx, scope);
        ctx.play(scope, tl);
        self.scope = Some(scope);
    }

    fn command(
        &mut self,
        _ctx: &mut MotionContext,
        command: &PageCommand,
        out: &mut Vec<PageEvent>,
    ) -> bool {
        let anchor = match command {
            PageCommand::HeroCta => SectionAnchor::Contact,
            PageCommand::HeroExplore => SectionAnchor::About,
            _ => return false,
        };
        out.push(PageEvent::ScrollTo { anchor });
        true
    }

    fn unmount(&mut self, ctx: &mut MotionContext) {
        release(ctx, &mut self.scope);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_motion::{Inputs, MapResolver, MotionConfig, Value};

    #[test]
    fn everything_hidden_until_delay() {
        let mut ctx = MotionContext::default();
        let mut hero = Hero::new();
        hero.mount(&mut ctx, &mut Vec::new());
        ctx.update(16.0, &Inputs::default());
        let cta = ctx.element("hero.cta").unwrap();
        assert_eq!(ctx.rendered(cta, Prop::Scale), Some(&Value::Float(0.95)));
        let headline = ctx.element("hero.headline").unwrap();
        assert_eq!(ctx.rendered(headline, Prop::Opacity), Some(&Value::Float(0.0)));
    }

    #[test]
    fn entrance_ends_fully_shown() {
        let mut ctx = MotionContext::default();
        let mut hero = Hero::new();
        hero.mount(&mut ctx, &mut Vec::new());
        for _ in 0..150 {
            ctx.update(16.0, &Inputs::default());
        }
        for key in ["hero.headline", "hero.subtitle", "hero.cta", "hero.scroll"] {
            let el = ctx.element(key).unwrap();
            assert_eq!(ctx.rendered(el, Prop::Opacity), Some(&Value::Float(1.0)), "{key}");
        }
    }

    #[test]
    fn missing_subtitle_is_skipped() {
        let resolver = MapResolver::identity(["hero.headline", "hero.cta"]);
        let mut ctx = MotionContext::with_resolver(MotionConfig::default(), Box::new(resolver));
        let scope = ctx.open_scope("hero");
        let tl = Hero::entrance(&mut ctx, scope);
        // headline 300..1100, cta overlaps the headline's end by 400 ms
        assert_eq!(tl.step_starts(2), vec![700.0]);
        assert_eq!(tl.targets().len(), 2);
    }

    #[test]
    fn buttons_request_scrolls() {
        let mut ctx = MotionContext::default();
        let mut hero = Hero::new();
        let mut out = Vec::new();
        assert!(hero.command(&mut ctx, &PageCommand::HeroCta, &mut out));
        assert!(hero.command(&mut ctx, &PageCommand::HeroExplore, &mut out));
        assert!(!hero.command(&mut ctx, &PageCommand::FormSubmit, &mut out));
        assert_eq!(
            out,
            vec![
                PageEvent::ScrollTo { anchor: SectionAnchor::Contact },
                PageEvent::ScrollTo { anchor: SectionAnchor::About },
            ]
        );
    }
}
