//! Loading splash: renders what the sequencer decides.
//!
//! The view never schedules anything on its own. The composer forwards each
//! `SequencerEvent` and the view turns it into a timeline on the splash text
//! or container.

use folio_motion::{
    AnimationStep, ElementId, MotionContext, Position, Prop, PropSet, ScopeId, Timeline, Value,
};

use crate::config::{LoadingConfig, ParticleConfig};
use crate::events::PageEvent;
use crate::sections::{
    release, ParticleField, Section, POWER2_IN_OUT, POWER2_OUT, POWER3_IN_OUT, POWER3_OUT,
};
use crate::sequencer::SequencerEvent;

#[derive(Debug)]
pub struct LoadingView {
    config: LoadingConfig,
    particles: ParticleField,
    scope: Option<ScopeId>,
    container: Option<ElementId>,
    text: Option<ElementId>,
    greetings_shown: usize,
}

impl LoadingView {
    pub fn new(config: LoadingConfig, particles: ParticleConfig, seed: u64) -> Self {
        Self {
            config,
            particles: ParticleField::new("loading.particles", particles, seed),
            scope: None,
            container: None,
            text: None,
            greetings_shown: 0,
        }
    }

    /// Greeting text swap: fade out, replace, fade in.
    fn swap(&self, text: &str) -> Timeline {
        let half = self.config.swap_ms;
        Timeline::builder()
            .step(
                AnimationStep::to(
                    self.text,
                    PropSet::new()
                        .with(Prop::Opacity, 0.0)
                        .with(Prop::Y, -20.0)
                        .with(Prop::Blur, 5.0),
                    half,
                )
                .ease(POWER2_IN_OUT),
            )
            .step(AnimationStep::set(self.text, Prop::Text, Value::Text(text.to_string())))
            .step(
                AnimationStep::to(
                    self.text,
                    PropSet::new()
                        .with(Prop::Opacity, 1.0)
                        .with(Prop::Y, 0.0)
                        .with(Prop::Blur, 0.0),
                    half,
                )
                .ease(POWER2_OUT),
            )
            .build()
    }

    fn exit(&self) -> Timeline {
        let c = &self.config;
        Timeline::builder()
            .step(
                AnimationStep::to(
                    self.text,
                    PropSet::new()
                        .with(Prop::Scale, 1.2)
                        .with(Prop::Opacity, 0.0)
                        .with(Prop::Blur, 10.0),
                    c.text_exit_ms,
                )
                .ease(POWER3_IN_OUT),
            )
            .step(
                AnimationStep::to(
                    self.container,
                    PropSet::new().with(Prop::Scale, 0.9).with(Prop::Opacity, 0.0),
                    c.container_exit_ms,
                )
                .ease(POWER3_IN_OUT)
                .at(Position::At(c.container_exit_delay_ms)),
            )
            .build()
    }

    /// Render one sequencer transition.
    pub fn on_sequencer_event(&mut self, ctx: &mut MotionContext, event: &SequencerEvent) {
        let Some(scope) = self.scope else {
            return;
        };
        match event {
            SequencerEvent::GreetingShown { text, .. } => {
                let tl = if self.greetings_shown == 0 {
                    Timeline::from_steps([AnimationStep::set(
                        self.text,
                        Prop::Text,
                        Value::Text(text.clone()),
                    )])
                } else {
                    self.swap(text)
                };
                self.greetings_shown += 1;
                ctx.fire(scope, tl);
            }
            SequencerEvent::Finalizing { .. } => ctx.fire(scope, self.exit()),
            SequencerEvent::Completed { .. } => {}
        }
    }
}

impl Section for LoadingView {
    fn name(&self) -> &'static str {
        "loading"
    }

    fn scope(&self) -> Option<ScopeId> {
        self.scope
    }

    fn mount(&mut self, ctx: &mut MotionContext, out: &mut Vec<PageEvent>) {
        let scope = ctx.open_scope(self.name());
        self.container = ctx.claim(scope, "loading.container");
        self.text = ctx.claim(scope, "loading.text");
        self.greetings_shown = 0;

        let c = &self.config;
        let intro = Timeline::from_steps([
            AnimationStep::to(
                self.container,
                PropSet::new().with(Prop::Opacity, 1.0).with(Prop::Scale, 1.0),
                0.0,
            ),
            AnimationStep::from_to(
                self.text,
                PropSet::new()
                    .with(Prop::Opacity, 0.0)
                    .with(Prop::Y, 30.0)
                    .with(Prop::Blur, 10.0),
                PropSet::new()
                    .with(Prop::Opacity, 1.0)
                    .with(Prop::Y, 0.0)
                    .with(Prop::Blur, 0.0),
                c.entrance_ms,
            )
            .ease(POWER3_OUT)
            .at(Position::WithPrevious),
        ]);
        ctx.fire(scope, intro);

        let particles = self.particles.spawn(ctx, scope);
        out.push(PageEvent::ParticlesPlaced {
            field: self.particles.field().to_string(),
            particles,
        });
        self.scope = Some(scope);
    }

    fn unmount(&mut self, ctx: &mut MotionContext) {
        self.container = None;
        self.text = None;
        release(ctx, &mut self.scope);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ParticlesConfig;
    use folio_motion::Inputs;

    fn mounted() -> (MotionContext, LoadingView) {
        let mut ctx = MotionContext::default();
        let mut view =
            LoadingView::new(LoadingConfig::default(), ParticlesConfig::default().loading, 0);
        view.mount(&mut ctx, &mut Vec::new());
        (ctx, view)
    }

    fn shown(index: usize, text: &str) -> SequencerEvent {
        SequencerEvent::GreetingShown {
            index,
            text: text.into(),
            at_ms: 0.0,
        }
    }

    #[test]
    fn first_greeting_is_set_then_swapped() {
        let (mut ctx, mut view) = mounted();
        let text = ctx.element("loading.text").unwrap();
        view.on_sequencer_event(&mut ctx, &shown(0, "Hello"));
        ctx.update(16.0, &Inputs::default());
        assert_eq!(ctx.rendered(text, Prop::Text), Some(&Value::Text("Hello".into())));

        for _ in 0..60 {
            ctx.update(16.0, &Inputs::default());
        }
        view.on_sequencer_event(&mut ctx, &shown(1, "Hola"));
        ctx.update(150.0, &Inputs::default());
        // still fading out the old word
        assert_eq!(ctx.rendered(text, Prop::Text), Some(&Value::Text("Hello".into())));
        ctx.update(200.0, &Inputs::default());
        assert_eq!(ctx.rendered(text, Prop::Text), Some(&Value::Text("Hola".into())));
        ctx.update(300.0, &Inputs::default());
        assert_eq!(ctx.rendered(text, Prop::Opacity), Some(&Value::Float(1.0)));
    }

    #[test]
    fn exit_fades_container_after_delay() {
        let (mut ctx, mut view) = mounted();
        let container = ctx.element("loading.container").unwrap();
        ctx.update(1000.0, &Inputs::default());
        view.on_sequencer_event(&mut ctx, &SequencerEvent::Finalizing { at_ms: 0.0 });
        ctx.update(300.0, &Inputs::default());
        assert_eq!(ctx.rendered(container, Prop::Opacity), Some(&Value::Float(1.0)));
        ctx.update(1200.0, &Inputs::default());
        assert_eq!(ctx.rendered(container, Prop::Opacity), Some(&Value::Float(0.0)));
    }

    #[test]
    fn events_after_unmount_are_ignored() {
        let (mut ctx, mut view) = mounted();
        view.unmount(&mut ctx);
        view.on_sequencer_event(&mut ctx, &shown(0, "Hello"));
        assert_eq!(ctx.run_count(), 0);
    }
}
