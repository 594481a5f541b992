use folio_motion::{
    AnimationStep, EaseDir, Easing, HoverSpec, MotionContext, MotionError, Prop, PropSet, ScopeId,
    Timeline, TriggerSpec, Value,
};

use crate::config::ParticleConfig;
use crate::events::{PageCommand, PageEvent};
use crate::sections::{release, reveal, ParticleField, Section, POWER2_OUT, POWER3_OUT};

const HEART_COLOR: &str = "#ff006e";

#[derive(Debug)]
pub struct Footer {
    trigger: TriggerSpec,
    heart: HoverSpec,
    particles: ParticleField,
    scope: Option<ScopeId>,
}

impl Footer {
    pub fn new(particles: ParticleConfig, seed: u64) -> Result<Self, MotionError> {
        let heart = HoverSpec::new(
            PropSet::new()
                .with(Prop::Scale, 1.2)
                .with(Prop::Color, Value::hex_color(HEART_COLOR)?),
            PropSet::new()
                .with(Prop::Scale, 1.0)
                .with(Prop::Color, Value::Keyword("currentColor".into())),
            300.0,
        )
        .eases(Easing::Back(1.7, EaseDir::Out), POWER2_OUT);
        Ok(Self {
            trigger: reveal("top 90%", "bottom 10%")?,
            heart,
            particles: ParticleField::new("footer.particles", particles, seed),
            scope: None,
        })
    }
}

impl Section for Footer {
    fn name(&self) -> &'static str {
        "footer"
    }

    fn scope(&self) -> Option<ScopeId> {
        self.scope
    }

    fn mount(&mut self, ctx: &mut MotionContext, out: &mut Vec<PageEvent>) {
        let scope = ctx.open_scope(self.name());
        let footer = ctx.claim(scope, "footer");
        let content = ctx.claim(scope, "footer.content");
        let heart = ctx.claim(scope, "footer.heart");

        let content_in = Timeline::from_steps([AnimationStep::from_to(
            content,
            PropSet::new()
                .with(Prop::Opacity, 0.0)
                .with(Prop::Y, 60.0)
                .with(Prop::Blur, 5.0),
            PropSet::new()
                .with(Prop::Opacity, 1.0)
                .with(Prop::Y, 0.0)
                .with(Prop::Blur, 0.0),
            1000.0,
        )
        .ease(POWER3_OUT)]);
        ctx.bind_trigger(scope, footer, self.trigger.clone(), content_in);
        ctx.bind_hover(scope, heart, self.heart.clone());

        let particles = self.particles.spawn(ctx, scope);
        out.push(PageEvent::ParticlesPlaced {
            field: self.particles.field().to_string(),
            particles,
        });
        self.scope = Some(scope);
    }

    fn command(
        &mut self,
        _ctx: &mut MotionContext,
        command: &PageCommand,
        out: &mut Vec<PageEvent>,
    ) -> bool {
        let PageCommand::FooterLink { anchor } = command else {
            return false;
        };
        out.push(PageEvent::ScrollTo { anchor: *anchor });
        true
    }

    fn unmount(&mut self, ctx: &mut MotionContext) {
        release(ctx, &mut self.scope);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ParticlesConfig;
    use folio_motion::{Inputs, PointerKind};

    #[test]
    fn heart_turns_pink_then_back() {
        let mut ctx = MotionContext::default();
        let mut footer = Footer::new(ParticlesConfig::default().footer, 0).unwrap();
        let mut out = Vec::new();
        footer.mount(&mut ctx, &mut out);
        assert!(matches!(
            out.as_slice(),
            [PageEvent::ParticlesPlaced { particles, .. }] if particles.len() == 15
        ));

        let heart = ctx.element("footer.heart").unwrap();
        ctx.update(16.0, &Inputs::default().with_pointer("footer.heart", PointerKind::Enter));
        for _ in 0..25 {
            ctx.update(16.0, &Inputs::default());
        }
        let pink = Value::hex_color(HEART_COLOR).unwrap();
        assert_eq!(ctx.rendered(heart, Prop::Color), Some(&pink));

        ctx.update(16.0, &Inputs::default().with_pointer("footer.heart", PointerKind::Leave));
        for _ in 0..25 {
            ctx.update(16.0, &Inputs::default());
        }
        assert_eq!(
            ctx.rendered(heart, Prop::Color),
            Some(&Value::Keyword("currentColor".into()))
        );
        assert_eq!(ctx.rendered(heart, Prop::Scale), Some(&Value::Float(1.0)));
    }
}
