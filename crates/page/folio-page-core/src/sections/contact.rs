//! Contact section: reveal choreography plus the form's submission cycle.
//!
//! Submitting starts a timer owned by the section's scope. When it fires the
//! form clears, the submit button pulses and `FormSubmitted` hands the data
//! to the host. Unmounting cancels a pending submission.

use folio_motion::{
    AnimationStep, EaseDir, Easing, ElementId, Inputs, MotionContext, MotionError, Prop, PropSet,
    Repeat, ScopeId, Timeline, Timers, TriggerSpec,
};
use tracing::debug;

use crate::config::ContactConfig;
use crate::contact_form::ContactForm;
use crate::content::SOCIAL_LINKS;
use crate::events::{PageCommand, PageEvent};
use crate::sections::{indexed_keys, release, reveal, Section, POWER2_IN_OUT, POWER3_OUT};

#[derive(Debug)]
pub struct Contact {
    config: ContactConfig,
    title_trigger: TriggerSpec,
    panel_trigger: TriggerSpec,
    social_trigger: TriggerSpec,
    form: ContactForm,
    timers: Timers<()>,
    scope: Option<ScopeId>,
    submit_button: Option<ElementId>,
}

fn blurred_in(
    element: Option<ElementId>,
    axis: Prop,
    offset: f32,
    blur: f32,
    duration_ms: f64,
) -> AnimationStep {
    AnimationStep::from_to(
        element,
        PropSet::new()
            .with(Prop::Opacity, 0.0)
            .with(axis, offset)
            .with(Prop::Blur, blur),
        PropSet::new()
            .with(Prop::Opacity, 1.0)
            .with(axis, 0.0)
            .with(Prop::Blur, 0.0),
        duration_ms,
    )
    .ease(POWER3_OUT)
}

impl Contact {
    pub fn new(config: ContactConfig) -> Result<Self, MotionError> {
        Ok(Self {
            config,
            title_trigger: reveal("top 80%", "bottom 20%")?,
            panel_trigger: reveal("top 70%", "bottom 20%")?,
            social_trigger: reveal("top 80%", "bottom 20%")?,
            form: ContactForm::new(),
            timers: Timers::new(),
            scope: None,
            submit_button: None,
        })
    }

    pub fn form(&self) -> &ContactForm {
        &self.form
    }

    /// Short scale pulse on the submit button after a successful send.
    fn pulse(&self) -> Timeline {
        Timeline::builder()
            .step(
                AnimationStep::to(self.submit_button, PropSet::new().with(Prop::Scale, 1.1), 200.0)
                    .ease(POWER2_IN_OUT),
            )
            .repeat(Repeat::Count(1))
            .yoyo(true)
            .build()
    }

    fn submit(&mut self, out: &mut Vec<PageEvent>) {
        match self.form.begin_submit() {
            Ok(_) => {
                self.timers.after(self.config.submit_delay_ms, self.scope, ());
                out.push(PageEvent::FormSubmitting);
            }
            Err(err) => {
                debug!(%err, "contact form rejected");
                out.push(PageEvent::FormRejected {
                    reason: err.to_string(),
                });
            }
        }
    }
}

impl Section for Contact {
    fn name(&self) -> &'static str {
        "contact"
    }

    fn scope(&self) -> Option<ScopeId> {
        self.scope
    }

    fn mount(&mut self, ctx: &mut MotionContext, _out: &mut Vec<PageEvent>) {
        let scope = ctx.open_scope(self.name());
        let section = ctx.claim(scope, "contact");
        let title = ctx.claim(scope, "contact.title");
        let form = ctx.claim(scope, "contact.form");
        let info = ctx.claim(scope, "contact.info");
        let social = ctx.claim(scope, "contact.social");
        let icons = ctx.claim_all(scope, indexed_keys("contact.social", SOCIAL_LINKS.len()));
        self.submit_button = ctx.claim(scope, "contact.submit");

        let title_in = Timeline::from_steps([blurred_in(title, Prop::Y, 50.0, 10.0, 1000.0)]);
        let form_in = Timeline::from_steps([blurred_in(form, Prop::X, -50.0, 5.0, 800.0)]);
        let info_in = Timeline::from_steps([
            blurred_in(info, Prop::X, 50.0, 5.0, 800.0).delay(self.config.info_delay_ms)
        ]);
        let icons_in = Timeline::from_steps([AnimationStep::from_to(
            icons,
            PropSet::new()
                .with(Prop::Opacity, 0.0)
                .with(Prop::Y, 30.0)
                .with(Prop::Scale, 0.8),
            PropSet::new()
                .with(Prop::Opacity, 1.0)
                .with(Prop::Y, 0.0)
                .with(Prop::Scale, 1.0),
            600.0,
        )
        .ease(Easing::Back(1.7, EaseDir::Out))
        .stagger(self.config.social_stagger_ms)]);

        ctx.bind_trigger(scope, section, self.title_trigger.clone(), title_in);
        ctx.bind_trigger(scope, section, self.panel_trigger.clone(), form_in);
        ctx.bind_trigger(scope, section, self.panel_trigger.clone(), info_in);
        ctx.bind_trigger(scope, social, self.social_trigger.clone(), icons_in);
        self.scope = Some(scope);
    }

    fn frame(
        &mut self,
        ctx: &mut MotionContext,
        dt_ms: f64,
        _inputs: &Inputs,
        out: &mut Vec<PageEvent>,
    ) {
        for _ in self.timers.advance(dt_ms) {
            let Some(data) = self.form.finish_submit() else {
                continue;
            };
            if let Some(scope) = self.scope {
                ctx.fire(scope, self.pulse());
            }
            out.push(PageEvent::FormSubmitted { data });
        }
    }

    fn command(
        &mut self,
        _ctx: &mut MotionContext,
        command: &PageCommand,
        out: &mut Vec<PageEvent>,
    ) -> bool {
        match command {
            PageCommand::FormInput { field, value } => {
                self.form.set(*field, value.clone());
                true
            }
            PageCommand::FormSubmit => {
                self.submit(out);
                true
            }
            _ => false,
        }
    }

    fn unmount(&mut self, ctx: &mut MotionContext) {
        if let Some(scope) = self.scope {
            self.timers.cancel_owner(scope);
        }
        self.form.reset();
        self.submit_button = None;
        release(ctx, &mut self.scope);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contact_form::FormField;
    use folio_motion::Value;

    fn mounted() -> (MotionContext, Contact) {
        let mut ctx = MotionContext::default();
        let mut contact = Contact::new(ContactConfig::default()).unwrap();
        contact.mount(&mut ctx, &mut Vec::new());
        (ctx, contact)
    }

    fn fill(ctx: &mut MotionContext, contact: &mut Contact) {
        let mut out = Vec::new();
        for (field, value) in [
            (FormField::Name, "Grace"),
            (FormField::Email, "grace@example.org"),
            (FormField::Message, "Hello there"),
        ] {
            contact.command(
                ctx,
                &PageCommand::FormInput {
                    field,
                    value: value.into(),
                },
                &mut out,
            );
        }
        assert!(out.is_empty());
    }

    #[test]
    fn submission_completes_after_delay() {
        let (mut ctx, mut contact) = mounted();
        fill(&mut ctx, &mut contact);
        let mut out = Vec::new();
        contact.command(&mut ctx, &PageCommand::FormSubmit, &mut out);
        assert_eq!(out, vec![PageEvent::FormSubmitting]);

        out.clear();
        contact.frame(&mut ctx, 1999.0, &Inputs::default(), &mut out);
        assert!(out.is_empty());
        contact.frame(&mut ctx, 1.0, &Inputs::default(), &mut out);
        let [PageEvent::FormSubmitted { data }] = out.as_slice() else {
            panic!("expected one submission, got {out:?}");
        };
        assert_eq!(data.name, "Grace");
        assert_eq!(contact.form().data().name, "");
    }

    #[test]
    fn pulse_returns_to_rest() {
        let (mut ctx, mut contact) = mounted();
        fill(&mut ctx, &mut contact);
        contact.command(&mut ctx, &PageCommand::FormSubmit, &mut Vec::new());
        contact.frame(&mut ctx, 2000.0, &Inputs::default(), &mut Vec::new());
        let button = ctx.element("contact.submit").unwrap();
        ctx.update(100.0, &Inputs::default());
        let mid = ctx.rendered(button, Prop::Scale).and_then(Value::as_float).unwrap();
        assert!(mid > 1.0);
        for _ in 0..10 {
            ctx.update(50.0, &Inputs::default());
        }
        assert_eq!(ctx.rendered(button, Prop::Scale), Some(&Value::Float(1.0)));
    }

    #[test]
    fn invalid_submission_is_rejected() {
        let (mut ctx, mut contact) = mounted();
        let mut out = Vec::new();
        contact.command(&mut ctx, &PageCommand::FormSubmit, &mut out);
        assert!(matches!(out.as_slice(), [PageEvent::FormRejected { .. }]));
        assert!(!contact.form().is_submitting());
    }

    #[test]
    fn unmount_cancels_pending_submission() {
        let (mut ctx, mut contact) = mounted();
        fill(&mut ctx, &mut contact);
        contact.command(&mut ctx, &PageCommand::FormSubmit, &mut Vec::new());
        contact.unmount(&mut ctx);
        let mut out = Vec::new();
        contact.frame(&mut ctx, 5000.0, &Inputs::default(), &mut out);
        assert!(out.is_empty());
    }
}
