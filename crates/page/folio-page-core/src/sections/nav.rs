use folio_motion::{AnimationStep, Inputs, MotionContext, Prop, PropSet, ScopeId, Timeline};

use crate::config::NavConfig;
use crate::content::NAV_ITEMS;
use crate::events::{PageCommand, PageEvent};
use crate::navigation::NavState;
use crate::sections::{indexed_keys, release, Section};

/// Fixed navigation bar.
#[derive(Debug)]
pub struct NavBar {
    config: NavConfig,
    state: NavState,
    scope: Option<ScopeId>,
}

impl NavBar {
    pub fn new(config: NavConfig) -> Self {
        let state = NavState::new(config.scrolled_threshold_px);
        Self {
            config,
            state,
            scope: None,
        }
    }

    pub fn state(&self) -> &NavState {
        &self.state
    }

    fn observe_scroll(&mut self, scroll_y: f64, out: &mut Vec<PageEvent>) {
        if let Some(scrolled) = self.state.on_scroll(scroll_y) {
            out.push(PageEvent::NavScrolled { scrolled });
        }
    }
}

impl Section for NavBar {
    fn name(&self) -> &'static str {
        "navigation"
    }

    fn scope(&self) -> Option<ScopeId> {
        self.scope
    }

    fn mount(&mut self, ctx: &mut MotionContext, out: &mut Vec<PageEvent>) {
        let scope = ctx.open_scope(self.name());
        let items = ctx.claim_all(scope, indexed_keys("nav.item", NAV_ITEMS.len()));
        let c = &self.config;
        let tl = Timeline::builder()
            .delay(c.entrance_delay_ms)
            .step(
                AnimationStep::from_to(
                    items,
                    PropSet::new().with(Prop::Opacity, 0.0).with(Prop::Y, -20.0),
                    PropSet::new().with(Prop::Opacity, 1.0).with(Prop::Y, 0.0),
                    c.item_duration_ms,
                )
                .stagger(c.stagger_ms),
            )
            .build();
        ctx.play(scope, tl);
        self.scope = Some(scope);
        // the page may mount already scrolled
        self.observe_scroll(ctx.scroll().scroll_y, out);
    }

    fn frame(
        &mut self,
        _ctx: &mut MotionContext,
        _dt_ms: f64,
        inputs: &Inputs,
        out: &mut Vec<PageEvent>,
    ) {
        if let Some(scroll) = inputs.scroll {
            self.observe_scroll(scroll.scroll_y, out);
        }
    }

    fn command(
        &mut self,
        _ctx: &mut MotionContext,
        command: &PageCommand,
        out: &mut Vec<PageEvent>,
    ) -> bool {
        match command {
            PageCommand::NavToggleMenu => {
                let open = self.state.toggle_menu();
                out.push(PageEvent::MenuToggled { open });
            }
            PageCommand::NavSelect { anchor } => {
                let was_open = self.state.is_menu_open();
                let anchor = self.state.select(*anchor);
                out.push(PageEvent::ScrollTo { anchor });
                if was_open {
                    out.push(PageEvent::MenuToggled { open: false });
                }
            }
            _ => return false,
        }
        true
    }

    fn unmount(&mut self, ctx: &mut MotionContext) {
        release(ctx, &mut self.scope);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anchor::SectionAnchor;

    #[test]
    fn items_stagger_in_after_delay() {
        let mut ctx = MotionContext::default();
        let mut nav = NavBar::new(NavConfig::default());
        nav.mount(&mut ctx, &mut Vec::new());
        let run = folio_motion::RunId(0);
        assert_eq!(ctx.run_count(), 1);
        ctx.update(0.0, &Inputs::default());
        // 500 delay + 3 * 100 stagger + 600 duration
        ctx.update(1399.0, &Inputs::default());
        assert!(ctx.run_time(run).is_some());
        let out = ctx.update(2.0, &Inputs::default());
        assert!(out
            .events
            .iter()
            .any(|e| matches!(e, folio_motion::MotionEvent::TimelineCompleted { .. })));
    }

    #[test]
    fn scroll_flag_and_menu() {
        let mut ctx = MotionContext::default();
        let mut nav = NavBar::new(NavConfig::default());
        let mut out = Vec::new();
        nav.mount(&mut ctx, &mut out);
        assert!(out.is_empty());

        nav.frame(&mut ctx, 16.0, &Inputs::scroll_to(120.0, 900.0, 1440.0), &mut out);
        nav.command(&mut ctx, &PageCommand::NavToggleMenu, &mut out);
        nav.command(
            &mut ctx,
            &PageCommand::NavSelect {
                anchor: SectionAnchor::Projects,
            },
            &mut out,
        );
        assert_eq!(
            out,
            vec![
                PageEvent::NavScrolled { scrolled: true },
                PageEvent::MenuToggled { open: true },
                PageEvent::ScrollTo {
                    anchor: SectionAnchor::Projects
                },
                PageEvent::MenuToggled { open: false },
            ]
        );
        assert!(!nav.state().is_menu_open());
    }
}
