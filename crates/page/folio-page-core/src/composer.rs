//! Page composer: the top-level runtime a host drives once per frame.
//!
//! Phases are `Loading → Ready`, one-way. While loading, the greeting
//! sequencer and the loading view run; a fallback timer may cut the wait
//! short (see [`FallbackPolicy`]). On `Ready` the loading scope is released
//! and the sections mount in page order.
//!
//! Per `update(dt, inputs)`:
//!   1) loading: advance the sequencer (up to the fallback instant, if it
//!      falls inside this frame), render its events, decide readiness
//!   2) ready: route commands to sections, then run per-section frame logic
//!   3) step the motion context and collect its changes

use std::cell::Cell;
use std::rc::Rc;

use folio_motion::{
    Change, IdentityResolver, Inputs, MotionContext, MotionEvent, TargetResolver, TimerId, Timers,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{FallbackPolicy, PageConfig};
use crate::contact_form::ContactForm;
use crate::error::PageError;
use crate::events::{PageCommand, PageEvent, ReadyCause};
use crate::navigation::NavState;
use crate::sections::{About, Contact, Footer, Hero, LoadingView, NavBar, Projects, Section};
use crate::sequencer::{LoadingSequencer, SequencerEvent, SequencerState};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PagePhase {
    Loading,
    Ready,
}

/// One frame of host input: motion inputs plus user commands.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PageInputs {
    #[serde(flatten)]
    pub motion: Inputs,
    #[serde(default)]
    pub commands: Vec<PageCommand>,
}

impl PageInputs {
    pub fn command(mut self, command: PageCommand) -> Self {
        self.commands.push(command);
        self
    }
}

impl From<Inputs> for PageInputs {
    fn from(motion: Inputs) -> Self {
        Self {
            motion,
            commands: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PageFrame {
    pub epoch: u64,
    pub phase: PagePhase,
    pub changes: Vec<Change>,
    pub events: Vec<PageEvent>,
    pub motion_events: Vec<MotionEvent>,
}

impl PageFrame {
    fn new() -> Self {
        Self {
            epoch: 0,
            phase: PagePhase::Loading,
            changes: Vec::new(),
            events: Vec::new(),
            motion_events: Vec::new(),
        }
    }
}

/// Serializable snapshot for hosts and debugging.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PageState {
    pub phase: PagePhase,
    pub ready_cause: Option<ReadyCause>,
    pub now_ms: f64,
    pub loader: SequencerState,
    pub greeting: Option<String>,
    pub nav: NavState,
    pub form: crate::contact_form::FormData,
    pub submitting: bool,
}

struct Sections {
    nav: NavBar,
    hero: Hero,
    about: About,
    projects: Projects,
    contact: Contact,
    footer: Footer,
}

impl Sections {
    fn new(config: &PageConfig) -> Result<Self, PageError> {
        Ok(Self {
            nav: NavBar::new(config.nav.clone()),
            hero: Hero::new(),
            about: About::new()?,
            projects: Projects::new(config.projects.clone())?,
            contact: Contact::new(config.contact.clone())?,
            footer: Footer::new(config.particles.footer.clone(), config.seed.wrapping_add(1))?,
        })
    }

    /// Page order.
    fn all_mut(&mut self) -> [&mut dyn Section; 6] {
        [
            &mut self.nav,
            &mut self.hero,
            &mut self.about,
            &mut self.projects,
            &mut self.contact,
            &mut self.footer,
        ]
    }
}

pub struct PageComposer {
    config: PageConfig,
    ctx: MotionContext,
    phase: PagePhase,
    ready_cause: Option<ReadyCause>,
    started: bool,
    closed: bool,
    sequencer: LoadingSequencer,
    loader_done: Rc<Cell<bool>>,
    loading: LoadingView,
    fallback: Timers<()>,
    fallback_id: Option<TimerId>,
    sections: Sections,
    frame: PageFrame,
}

impl std::fmt::Debug for PageComposer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageComposer")
            .field("phase", &self.phase)
            .field("ready_cause", &self.ready_cause)
            .field("epoch", &self.frame.epoch)
            .field("sequencer", &self.sequencer)
            .field("ctx", &self.ctx)
            .finish()
    }
}

impl PageComposer {
    /// Composer resolving every element key to itself.
    pub fn new(config: PageConfig) -> Result<Self, PageError> {
        Self::with_resolver(config, Box::new(IdentityResolver))
    }

    pub fn with_resolver(
        config: PageConfig,
        resolver: Box<dyn TargetResolver>,
    ) -> Result<Self, PageError> {
        config.validate()?;
        let mut sequencer = LoadingSequencer::new(config.loading.cycle.clone())?;
        let loader_done = Rc::new(Cell::new(false));
        let flag = Rc::clone(&loader_done);
        sequencer.on_complete(move || flag.set(true));

        Ok(Self {
            ctx: MotionContext::with_resolver(config.motion.clone(), resolver),
            phase: PagePhase::Loading,
            ready_cause: None,
            started: false,
            closed: false,
            sequencer,
            loader_done,
            loading: LoadingView::new(
                config.loading.clone(),
                config.particles.loading.clone(),
                config.seed,
            ),
            fallback: Timers::new(),
            fallback_id: None,
            sections: Sections::new(&config)?,
            frame: PageFrame::new(),
            config,
        })
    }

    /// Replace the element resolver. Only elements claimed afterwards use it.
    pub fn set_resolver(&mut self, resolver: Box<dyn TargetResolver>) {
        self.ctx.set_resolver(resolver);
    }

    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    pub fn phase(&self) -> PagePhase {
        self.phase
    }

    pub fn ready_cause(&self) -> Option<ReadyCause> {
        self.ready_cause
    }

    pub fn context(&self) -> &MotionContext {
        &self.ctx
    }

    pub fn sequencer(&self) -> &LoadingSequencer {
        &self.sequencer
    }

    pub fn nav(&self) -> &NavState {
        self.sections.nav.state()
    }

    pub fn contact_form(&self) -> &ContactForm {
        self.sections.contact.form()
    }

    pub fn projects(&self) -> &Projects {
        &self.sections.projects
    }

    pub fn state(&self) -> PageState {
        PageState {
            phase: self.phase,
            ready_cause: self.ready_cause,
            now_ms: self.ctx.now_ms(),
            loader: self.sequencer.state(),
            greeting: self.sequencer.current_text().map(str::to_string),
            nav: self.nav().clone(),
            form: self.contact_form().data().clone(),
            submitting: self.contact_form().is_submitting(),
        }
    }

    fn start(&mut self) {
        self.started = true;
        self.loading.mount(&mut self.ctx, &mut self.frame.events);
        self.sequencer.start();
        if let FallbackPolicy::MaxWait { after_ms } = self.config.composer.fallback {
            self.fallback_id = Some(self.fallback.after(after_ms, None, ()));
        }
        debug!(fallback = ?self.config.composer.fallback, "page loading");
    }

    fn step_loading(&mut self, dt_ms: f64) {
        let fallback_in = self
            .fallback_id
            .and_then(|id| self.fallback.next_due(id))
            .map(|due| (due - self.fallback.now()).max(0.0));
        let fallback_due = fallback_in.is_some_and(|t| t <= dt_ms);
        // never let the loader run past the fallback instant
        let loader_dt = match fallback_in {
            Some(t) if fallback_due => t,
            _ => dt_ms,
        };

        for event in self.sequencer.advance(loader_dt) {
            self.loading.on_sequencer_event(&mut self.ctx, &event);
            self.frame.events.push(match event {
                SequencerEvent::GreetingShown { index, text, .. } => {
                    PageEvent::GreetingShown { index, text }
                }
                SequencerEvent::Finalizing { .. } => PageEvent::LoadingFinalizing,
                SequencerEvent::Completed { .. } => continue,
            });
        }
        self.fallback.advance(dt_ms);

        if self.loader_done.get() {
            self.become_ready(ReadyCause::Sequencer);
        } else if fallback_due {
            self.sequencer.teardown();
            self.become_ready(ReadyCause::Fallback);
        }
    }

    fn become_ready(&mut self, cause: ReadyCause) {
        self.phase = PagePhase::Ready;
        self.ready_cause = Some(cause);
        self.fallback.cancel_all();
        self.fallback_id = None;
        self.loading.unmount(&mut self.ctx);
        debug!(?cause, at_ms = self.ctx.now_ms(), "page ready");

        self.frame.events.push(PageEvent::Ready { cause });
        for section in self.sections.all_mut() {
            section.mount(&mut self.ctx, &mut self.frame.events);
            self.frame.events.push(PageEvent::SectionMounted {
                section: section.name().to_string(),
            });
        }
    }

    fn route(&mut self, command: &PageCommand) {
        let handled = self
            .sections
            .all_mut()
            .into_iter()
            .any(|s| s.command(&mut self.ctx, command, &mut self.frame.events));
        if !handled {
            debug!(?command, "command ignored");
        }
    }

    /// Step the page by `dt_ms` and return this frame.
    pub fn update(&mut self, dt_ms: f64, inputs: &PageInputs) -> &PageFrame {
        self.frame.epoch = self.frame.epoch.wrapping_add(1);
        self.frame.changes.clear();
        self.frame.events.clear();
        self.frame.motion_events.clear();
        if self.closed {
            return &self.frame;
        }
        let dt_ms = dt_ms.max(0.0);
        if !self.started {
            self.start();
        }

        if self.phase == PagePhase::Loading {
            self.step_loading(dt_ms);
            if !inputs.commands.is_empty() {
                debug!(count = inputs.commands.len(), "commands ignored while loading");
            }
        } else {
            for command in &inputs.commands {
                self.route(command);
            }
        }
        if self.phase == PagePhase::Ready {
            for section in self.sections.all_mut() {
                section.frame(&mut self.ctx, dt_ms, &inputs.motion, &mut self.frame.events);
            }
        }

        let out = self.ctx.update(dt_ms, &inputs.motion);
        self.frame.changes.extend(out.changes.iter().cloned());
        self.frame.motion_events.extend(out.events.iter().cloned());
        self.frame.phase = self.phase;
        &self.frame
    }

    /// Stop everything: loader, fallback and every mounted section.
    /// Later updates return empty frames. Calling it again does nothing.
    pub fn teardown(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.sequencer.teardown();
        self.fallback.cancel_all();
        self.fallback_id = None;
        self.loading.unmount(&mut self.ctx);
        for section in self.sections.all_mut() {
            section.unmount(&mut self.ctx);
        }
        debug!("page torn down");
    }
}
