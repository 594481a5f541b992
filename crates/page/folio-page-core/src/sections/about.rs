use folio_motion::{
    AnimationStep, EaseDir, Easing, HoverSpec, MotionContext, MotionError, Position, Prop,
    PropSet, ScopeId, Subscription, Timeline, TriggerSpec,
};

use crate::content::SKILLS;
use crate::events::PageEvent;
use crate::sections::{indexed_keys, release, reveal, Section, POWER2_OUT};

/// Portrait and bio sliding in from opposite sides, then the skills grid.
#[derive(Debug)]
pub struct About {
    section_trigger: TriggerSpec,
    skills_trigger: TriggerSpec,
    scope: Option<ScopeId>,
    subscriptions: Vec<Subscription>,
}

impl About {
    pub fn new() -> Result<Self, MotionError> {
        Ok(Self {
            section_trigger: reveal("top 70%", "bottom 30%")?,
            skills_trigger: reveal("top 80%", "bottom top")?,
            scope: None,
            subscriptions: Vec::new(),
        })
    }

    pub fn subscriptions(&self) -> &[Subscription] {
        &self.subscriptions
    }
}

impl Section for About {
    fn name(&self) -> &'static str {
        "about"
    }

    fn scope(&self) -> Option<ScopeId> {
        self.scope
    }

    fn mount(&mut self, ctx: &mut MotionContext, _out: &mut Vec<PageEvent>) {
        let scope = ctx.open_scope(self.name());
        let section = ctx.claim(scope, "about");
        let image = ctx.claim(scope, "about.image");
        let content = ctx.claim(scope, "about.content");
        let grid = ctx.claim(scope, "about.skills");
        let skills = ctx.claim_all(scope, indexed_keys("about.skill", SKILLS.len()));

        let intro = Timeline::builder()
            .step(
                AnimationStep::from_to(
                    image,
                    PropSet::new()
                        .with(Prop::Opacity, 0.0)
                        .with(Prop::X, -60.0)
                        .with(Prop::Scale, 0.95),
                    PropSet::new()
                        .with(Prop::Opacity, 1.0)
                        .with(Prop::X, 0.0)
                        .with(Prop::Scale, 1.0),
                    1000.0,
                )
                .ease(POWER2_OUT),
            )
            .step(
                AnimationStep::from_to(
                    content,
                    PropSet::new().with(Prop::Opacity, 0.0).with(Prop::X, 60.0),
                    PropSet::new().with(Prop::Opacity, 1.0).with(Prop::X, 0.0),
                    800.0,
                )
                .ease(POWER2_OUT)
                .at(Position::Offset(-700.0)),
            )
            .build();

        let grid_in = Timeline::from_steps([AnimationStep::from_to(
            skills,
            PropSet::new()
                .with(Prop::Opacity, 0.0)
                .with(Prop::Y, 40.0)
                .with(Prop::Scale, 0.95),
            PropSet::new()
                .with(Prop::Opacity, 1.0)
                .with(Prop::Y, 0.0)
                .with(Prop::Scale, 1.0),
            500.0,
        )
        .ease(Easing::Back(1.4, EaseDir::Out))
        .stagger(100.0)]);

        let tilt = HoverSpec::new(
            PropSet::new().with(Prop::Scale, 1.03).with(Prop::Rotation, 1.0),
            PropSet::new().with(Prop::Scale, 1.0).with(Prop::Rotation, 0.0),
            300.0,
        )
        .eases(POWER2_OUT, POWER2_OUT);

        self.subscriptions = vec![
            ctx.bind_trigger(scope, section, self.section_trigger.clone(), intro),
            ctx.bind_trigger(scope, grid, self.skills_trigger.clone(), grid_in),
            ctx.bind_hover(scope, image, tilt),
        ];
        self.scope = Some(scope);
    }

    fn unmount(&mut self, ctx: &mut MotionContext) {
        self.subscriptions.clear();
        release(ctx, &mut self.scope);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_motion::{Inputs, PointerKind, Rect, Value};

    fn mounted() -> (MotionContext, About) {
        let mut ctx = MotionContext::default();
        let mut about = About::new().unwrap();
        about.mount(&mut ctx, &mut Vec::new());
        (ctx, about)
    }

    #[test]
    fn three_live_bindings() {
        let (_, about) = mounted();
        assert_eq!(about.subscriptions().len(), 3);
        assert!(about.subscriptions().iter().all(|s| !s.is_inert()));
    }

    #[test]
    fn portrait_hidden_until_section_enters() {
        let (mut ctx, _) = mounted();
        let layout = Inputs::scroll_to(0.0, 1000.0, 1440.0)
            .with_layout("about", Rect::new(1500.0, 900.0, 1440.0))
            .with_layout("about.skills", Rect::new(2000.0, 300.0, 1440.0));
        ctx.update(16.0, &layout);
        let image = ctx.element("about.image").unwrap();
        assert_eq!(ctx.rendered(image, Prop::X), Some(&Value::Float(-60.0)));

        // section top reaches 70% of the viewport at scroll 800
        ctx.update(16.0, &Inputs::scroll_to(900.0, 1000.0, 1440.0));
        for _ in 0..120 {
            ctx.update(16.0, &Inputs::default());
        }
        assert_eq!(ctx.rendered(image, Prop::X), Some(&Value::Float(0.0)));
    }

    #[test]
    fn hover_tilts_and_restores() {
        let (mut ctx, _) = mounted();
        let image = ctx.element("about.image").unwrap();
        ctx.update(16.0, &Inputs::default().with_pointer("about.image", PointerKind::Enter));
        for _ in 0..30 {
            ctx.update(16.0, &Inputs::default());
        }
        assert_eq!(ctx.rendered(image, Prop::Rotation), Some(&Value::Float(1.0)));
        ctx.update(16.0, &Inputs::default().with_pointer("about.image", PointerKind::Leave));
        for _ in 0..30 {
            ctx.update(16.0, &Inputs::default());
        }
        assert_eq!(ctx.rendered(image, Prop::Rotation), Some(&Value::Float(0.0)));
    }

    #[test]
    fn unmount_releases_everything() {
        let (mut ctx, mut about) = mounted();
        about.unmount(&mut ctx);
        assert_eq!(ctx.trigger_count(), 0);
        assert_eq!(ctx.run_count(), 0);
        assert!(ctx.element("about.image").is_none());
        about.unmount(&mut ctx);
    }
}
