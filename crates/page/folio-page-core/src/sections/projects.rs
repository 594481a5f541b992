use folio_motion::{
    AnimationStep, Easing, ElementId, Inputs, MotionContext, MotionError, Prop, PropSet, Rect,
    ScopeId, Subscription, Threshold, Timeline, ToggleActions, TriggerSpec,
};
use tracing::debug;

use crate::config::ProjectsConfig;
use crate::content::{project, PROJECTS};
use crate::events::{PageCommand, PageEvent};
use crate::sections::{indexed_keys, release, reveal, Section, POWER3_OUT};

/// Length of the scrubbed strip timeline; only progress through it matters.
const STRIP_TIMELINE_MS: f64 = 1000.0;

/// Narrow-viewport horizontal strip, decided once the grid has been measured.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Strip {
    /// Grid not measured yet.
    Pending,
    /// Wide viewport, or nothing to scroll.
    Static,
    Scrubbing { travel_px: f32, subscription: Subscription },
}

#[derive(Debug)]
pub struct Projects {
    config: ProjectsConfig,
    title_trigger: TriggerSpec,
    cards_trigger: TriggerSpec,
    strip_start: Threshold,
    scope: Option<ScopeId>,
    grid: Option<ElementId>,
    strip: Strip,
}

impl Projects {
    pub fn new(config: ProjectsConfig) -> Result<Self, MotionError> {
        Ok(Self {
            config,
            title_trigger: reveal("top 80%", "bottom 20%")?,
            cards_trigger: reveal("top 80%", "bottom 20%")?,
            strip_start: "top bottom".parse()?,
            scope: None,
            grid: None,
            strip: Strip::Pending,
        })
    }

    pub fn strip(&self) -> Strip {
        self.strip
    }

    fn decide_strip(
        &mut self,
        ctx: &mut MotionContext,
        scope: ScopeId,
        rect: Rect,
        viewport_width: f32,
    ) {
        if viewport_width >= self.config.mobile_breakpoint_px {
            self.strip = Strip::Static;
            return;
        }
        let travel_px = (rect.width - viewport_width).max(0.0);
        if travel_px <= 0.0 {
            self.strip = Strip::Static;
            return;
        }
        let slide = Timeline::from_steps([AnimationStep::from_to(
            self.grid,
            PropSet::new().with(Prop::X, 0.0),
            PropSet::new().with(Prop::X, -travel_px),
            STRIP_TIMELINE_MS,
        )
        .ease(Easing::Linear)]);
        let spec = TriggerSpec {
            start: self.strip_start,
            end: Threshold::AfterStart(rect.width),
            actions: ToggleActions::default(),
            once: false,
        };
        let subscription = ctx.bind_scrub(scope, self.grid, spec, slide, self.config.scrub_lag_ms);
        debug!(travel_px, viewport_width, "projects strip scrubbing");
        self.strip = Strip::Scrubbing {
            travel_px,
            subscription,
        };
    }
}

impl Section for Projects {
    fn name(&self) -> &'static str {
        "projects"
    }

    fn scope(&self) -> Option<ScopeId> {
        self.scope
    }

    fn mount(&mut self, ctx: &mut MotionContext, _out: &mut Vec<PageEvent>) {
        let scope = ctx.open_scope(self.name());
        let section = ctx.claim(scope, "projects");
        let title = ctx.claim(scope, "projects.title");
        let grid = ctx.claim(scope, "projects.grid");
        let cards = ctx.claim_all(scope, indexed_keys("projects.card", PROJECTS.len()));

        let title_in = Timeline::from_steps([AnimationStep::from_to(
            title,
            PropSet::new()
                .with(Prop::Opacity, 0.0)
                .with(Prop::Y, 50.0)
                .with(Prop::Blur, 10.0),
            PropSet::new()
                .with(Prop::Opacity, 1.0)
                .with(Prop::Y, 0.0)
                .with(Prop::Blur, 0.0),
            1000.0,
        )
        .ease(POWER3_OUT)]);

        let cards_in = Timeline::from_steps([AnimationStep::from_to(
            cards,
            PropSet::new()
                .with(Prop::Opacity, 0.0)
                .with(Prop::Y, 80.0)
                .with(Prop::Scale, 0.9)
                .with(Prop::Blur, 5.0),
            PropSet::new()
                .with(Prop::Opacity, 1.0)
                .with(Prop::Y, 0.0)
                .with(Prop::Scale, 1.0)
                .with(Prop::Blur, 0.0),
            800.0,
        )
        .ease(POWER3_OUT)
        .stagger(self.config.card_stagger_ms)]);

        ctx.bind_trigger(scope, section, self.title_trigger.clone(), title_in);
        ctx.bind_trigger(scope, grid, self.cards_trigger.clone(), cards_in);

        self.scope = Some(scope);
        self.grid = grid;
        self.strip = if grid.is_some() {
            Strip::Pending
        } else {
            Strip::Static
        };
    }

    fn frame(
        &mut self,
        ctx: &mut MotionContext,
        _dt_ms: f64,
        inputs: &Inputs,
        _out: &mut Vec<PageEvent>,
    ) {
        let (Strip::Pending, Some(scope), Some(grid)) = (self.strip, self.scope, self.grid) else {
            return;
        };
        // this frame's layout has not reached the context yet
        let rect = inputs
            .layout
            .iter()
            .rev()
            .find(|l| l.key == "projects.grid")
            .map(|l| l.rect)
            .or_else(|| ctx.rect(grid).copied());
        let Some(rect) = rect else {
            return;
        };
        let viewport_width = inputs
            .scroll
            .map_or(ctx.scroll().viewport_width, |s| s.viewport_width);
        self.decide_strip(ctx, scope, rect, viewport_width);
    }

    fn command(
        &mut self,
        _ctx: &mut MotionContext,
        command: &PageCommand,
        out: &mut Vec<PageEvent>,
    ) -> bool {
        let PageCommand::ProjectClicked { id } = command else {
            return false;
        };
        match project(*id) {
            Some(p) => out.push(PageEvent::ProjectSelected {
                id: p.id,
                title: p.title.to_string(),
            }),
            None => debug!(id, "click on unknown project ignored"),
        }
        true
    }

    fn unmount(&mut self, ctx: &mut MotionContext) {
        self.grid = None;
        self.strip = Strip::Pending;
        release(ctx, &mut self.scope);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_motion::Value;

    fn mounted() -> (MotionContext, Projects) {
        let mut ctx = MotionContext::default();
        let mut projects = Projects::new(ProjectsConfig::default()).unwrap();
        projects.mount(&mut ctx, &mut Vec::new());
        (ctx, projects)
    }

    #[test]
    fn wide_viewport_keeps_grid_static() {
        let (mut ctx, mut projects) = mounted();
        let inputs = Inputs::scroll_to(0.0, 900.0, 1440.0)
            .with_layout("projects.grid", Rect::new(3000.0, 800.0, 1400.0));
        projects.frame(&mut ctx, 16.0, &inputs, &mut Vec::new());
        assert_eq!(projects.strip(), Strip::Static);
    }

    #[test]
    fn narrow_viewport_scrubs_the_strip() {
        let (mut ctx, mut projects) = mounted();
        // band starts at 2000 - 800 = 1200 and is 2400 long; halfway is 2400
        let inputs = Inputs::scroll_to(2400.0, 800.0, 400.0)
            .with_layout("projects.grid", Rect::new(2000.0, 600.0, 2400.0));
        projects.frame(&mut ctx, 16.0, &inputs, &mut Vec::new());
        let Strip::Scrubbing { travel_px, .. } = projects.strip() else {
            panic!("expected scrubbing, got {:?}", projects.strip());
        };
        assert_eq!(travel_px, 2000.0);

        // the first evaluation jumps straight to the scroll position
        ctx.update(16.0, &inputs);
        let grid = ctx.element("projects.grid").unwrap();
        let x = ctx.rendered(grid, Prop::X).and_then(Value::as_float).unwrap();
        approx::assert_abs_diff_eq!(x, -1000.0, epsilon = 0.5);
    }

    #[test]
    fn clicks_select_known_projects() {
        let (mut ctx, mut projects) = mounted();
        let mut out = Vec::new();
        assert!(projects.command(&mut ctx, &PageCommand::ProjectClicked { id: 2 }, &mut out));
        assert!(projects.command(&mut ctx, &PageCommand::ProjectClicked { id: 99 }, &mut out));
        assert_eq!(
            out,
            vec![PageEvent::ProjectSelected {
                id: 2,
                title: "Email for Developers".into()
            }]
        );
    }
}
