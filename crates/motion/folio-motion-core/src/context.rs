//! The explicit motion context.
//!
//! One `MotionContext` owns every running timeline, scroll trigger and hover
//! binding of a page. Components receive it by `&mut` and register work under
//! a [`ScopeId`]; releasing the scope tears all of it down at once.
//!
//! Per `update(dt, inputs)`:
//!   1) apply layout rects and the scroll state
//!   2) evaluate scroll triggers (toggle actions) and scrub bindings
//!   3) dispatch pointer events to hover bindings
//!   4) advance playheads
//!   5) sample active timelines; writes merge last-writer-wins in run
//!      registration order
//!   6) emit only values that differ from what was last rendered

use hashbrown::HashMap;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::binding::{ElementRegistry, ElementRow, IdentityResolver, TargetResolver};
use crate::config::MotionConfig;
use crate::ease::Easing;
use crate::ids::{ElementId, HoverId, IdAllocator, RunId, ScopeId, TriggerId};
use crate::inputs::{Inputs, PointerKind, Rect, ScrollState};
use crate::outputs::{Change, MotionEvent, Outputs};
use crate::step::AnimationStep;
use crate::timeline::{Direction, PlayState, Playhead, PlayheadEvent, Timeline};
use crate::trigger::{
    ScrollTrigger, ToggleAction, TriggerEvent, TriggerEventKind, TriggerSpec, Zone,
};
use crate::value::{Prop, PropSet, Value};

/// Handle returned by every binding call; pass it to [`MotionContext::release`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Subscription {
    Run(RunId),
    Trigger(TriggerId),
    Hover(HoverId),
    /// The binding had nothing to attach to.
    Inert,
}

impl Subscription {
    pub fn is_inert(&self) -> bool {
        matches!(self, Subscription::Inert)
    }
}

/// Pointer enter/leave transitions for one element.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HoverSpec {
    pub enter: PropSet,
    pub leave: PropSet,
    pub duration_ms: f64,
    #[serde(default)]
    pub enter_ease: Easing,
    #[serde(default)]
    pub leave_ease: Easing,
}

impl HoverSpec {
    pub fn new(enter: PropSet, leave: PropSet, duration_ms: f64) -> Self {
        Self {
            enter,
            leave,
            duration_ms,
            enter_ease: Easing::default(),
            leave_ease: Easing::default(),
        }
    }

    pub fn eases(mut self, enter: Easing, leave: Easing) -> Self {
        self.enter_ease = enter;
        self.leave_ease = leave;
        self
    }
}

#[derive(Debug)]
struct Run {
    scope: ScopeId,
    timeline: Timeline,
    playhead: Playhead,
    /// Needs sampling this frame even if not playing.
    dirty: bool,
    /// Dropped once it completes.
    transient: bool,
}

#[derive(Debug)]
enum TriggerMode {
    Toggle(ScrollTrigger),
    Scrub {
        trigger: ScrollTrigger,
        lag_ms: f64,
        /// Smoothed playhead time; None until the first evaluation.
        current_ms: Option<f64>,
    },
}

#[derive(Debug)]
struct TriggerBinding {
    scope: ScopeId,
    element: ElementId,
    run: RunId,
    mode: TriggerMode,
}

#[derive(Debug)]
struct HoverBinding {
    scope: ScopeId,
    element: ElementId,
    spec: HoverSpec,
    active: Option<RunId>,
}

pub struct MotionContext {
    config: MotionConfig,
    resolver: Box<dyn TargetResolver>,
    ids: IdAllocator,
    registry: ElementRegistry,
    scopes: HashMap<ScopeId, String>,
    runs: IndexMap<RunId, Run>,
    triggers: IndexMap<TriggerId, TriggerBinding>,
    hovers: IndexMap<HoverId, HoverBinding>,
    rendered: HashMap<(ElementId, Prop), Value>,
    scroll: ScrollState,
    now_ms: f64,
    pending_events: Vec<MotionEvent>,
    outputs: Outputs,
}

impl Default for MotionContext {
    fn default() -> Self {
        Self::new(MotionConfig::default())
    }
}

impl std::fmt::Debug for MotionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MotionContext")
            .field("now_ms", &self.now_ms)
            .field("scopes", &self.scopes.len())
            .field("runs", &self.runs.len())
            .field("triggers", &self.triggers.len())
            .field("hovers", &self.hovers.len())
            .finish()
    }
}

fn same_value(a: &Value, b: &Value, eps: f32) -> bool {
    match (a, b) {
        (Value::Float(x), Value::Float(y)) => (x - y).abs() <= eps,
        (Value::Color(x), Value::Color(y)) => x.iter().zip(y).all(|(p, q)| (p - q).abs() <= eps),
        _ => a == b,
    }
}

impl MotionContext {
    /// Context resolving every key to itself.
    pub fn new(config: MotionConfig) -> Self {
        Self::with_resolver(config, Box::new(IdentityResolver))
    }

    pub fn with_resolver(config: MotionConfig, resolver: Box<dyn TargetResolver>) -> Self {
        Self {
            config,
            resolver,
            ids: IdAllocator::new(),
            registry: ElementRegistry::new(),
            scopes: HashMap::new(),
            runs: IndexMap::new(),
            triggers: IndexMap::new(),
            hovers: IndexMap::new(),
            rendered: HashMap::new(),
            scroll: ScrollState::default(),
            now_ms: 0.0,
            pending_events: Vec::new(),
            outputs: Outputs::default(),
        }
    }

    /// Replace the resolver; already claimed elements keep their handles.
    pub fn set_resolver(&mut self, resolver: Box<dyn TargetResolver>) {
        self.resolver = resolver;
    }

    pub fn config(&self) -> &MotionConfig {
        &self.config
    }

    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    pub fn scroll(&self) -> &ScrollState {
        &self.scroll
    }

    pub fn outputs(&self) -> &Outputs {
        &self.outputs
    }

    // ---- scopes and elements ----

    pub fn open_scope(&mut self, label: impl Into<String>) -> ScopeId {
        let id = self.ids.alloc_scope();
        let label = label.into();
        debug!(scope = id.0, %label, "scope opened");
        self.scopes.insert(id, label);
        id
    }

    pub fn is_scope_open(&self, scope: ScopeId) -> bool {
        self.scopes.contains_key(&scope)
    }

    /// Resolve `key` and record it as owned by `scope`.
    ///
    /// Returns `None` when the host has no such element. A key already
    /// claimed elsewhere returns the existing id without changing its owner.
    pub fn claim(&mut self, scope: ScopeId, key: &str) -> Option<ElementId> {
        if !self.is_scope_open(scope) {
            debug!(scope = scope.0, key, "claim on closed scope ignored");
            return None;
        }
        if let Some(row) = self.registry.find_key(key) {
            if row.owner != scope {
                debug!(key, owner = row.owner.0, scope = scope.0, "element owned by another scope");
            }
            return Some(row.id);
        }
        let Some(handle) = self.resolver.resolve(key) else {
            debug!(key, "element absent");
            return None;
        };
        let id = self.ids.alloc_element();
        self.registry.insert(ElementRow {
            id,
            key: key.to_string(),
            handle,
            owner: scope,
        });
        Some(id)
    }

    /// Claim several keys, skipping the absent ones.
    pub fn claim_all<S: AsRef<str>>(
        &mut self,
        scope: ScopeId,
        keys: impl IntoIterator<Item = S>,
    ) -> Vec<ElementId> {
        keys.into_iter()
            .filter_map(|k| self.claim(scope, k.as_ref()))
            .collect()
    }

    pub fn element(&self, key: &str) -> Option<ElementId> {
        self.registry.find_key(key).map(|r| r.id)
    }

    pub fn handle(&self, element: ElementId) -> Option<&str> {
        self.registry.get(element).map(|r| r.handle.as_str())
    }

    /// Last layout rect reported for the element's key.
    pub fn rect(&self, element: ElementId) -> Option<&Rect> {
        self.registry.rect(element)
    }

    pub fn rendered(&self, element: ElementId, prop: Prop) -> Option<&Value> {
        self.rendered.get(&(element, prop))
    }

    // ---- timelines ----

    fn register_run(
        &mut self,
        scope: ScopeId,
        mut timeline: Timeline,
        transient: bool,
    ) -> Option<RunId> {
        if !self.is_scope_open(scope) {
            debug!(scope = scope.0, "timeline on closed scope ignored");
            return None;
        }
        let registry = &self.registry;
        let foreign: Vec<ElementId> = timeline
            .targets()
            .into_iter()
            .filter(|el| registry.owner(*el) != Some(scope))
            .collect();
        if !foreign.is_empty() {
            warn!(scope = scope.0, ?foreign, "dropping targets not claimed by this scope");
            timeline.retain_targets(|el| !foreign.contains(&el));
        }
        let id = self.ids.alloc_run();
        self.runs.insert(
            id,
            Run {
                scope,
                timeline,
                playhead: Playhead::new(),
                dirty: true,
                transient,
            },
        );
        Some(id)
    }

    /// Register and start playing immediately.
    pub fn play(&mut self, scope: ScopeId, timeline: Timeline) -> Subscription {
        match self.register_run(scope, timeline, false) {
            Some(id) => {
                if let Some(run) = self.runs.get_mut(&id) {
                    run.playhead.play();
                }
                Subscription::Run(id)
            }
            None => Subscription::Inert,
        }
    }

    /// Play a timeline nobody will control again; it is dropped once complete.
    pub fn fire(&mut self, scope: ScopeId, timeline: Timeline) {
        if let Some(id) = self.register_run(scope, timeline, true) {
            if let Some(run) = self.runs.get_mut(&id) {
                run.playhead.play();
            }
        }
    }

    /// Register without playing; `from` values render on the next update.
    pub fn add_paused(&mut self, scope: ScopeId, timeline: Timeline) -> Subscription {
        self.register_run(scope, timeline, false)
            .map_or(Subscription::Inert, Subscription::Run)
    }

    /// Apply a toggle action to a run. Returns false for unknown runs.
    pub fn apply(&mut self, run: RunId, action: ToggleAction) -> bool {
        if !self.runs.contains_key(&run) {
            return false;
        }
        self.apply_action(run, action);
        true
    }

    fn apply_action(&mut self, id: RunId, action: ToggleAction) {
        if action == ToggleAction::None {
            return;
        }
        let Some(run) = self.runs.get_mut(&id) else {
            return;
        };
        match action {
            ToggleAction::Play => run.playhead.play(),
            ToggleAction::Pause => run.playhead.pause(),
            ToggleAction::Resume => run.playhead.resume(),
            ToggleAction::Reverse => run.playhead.reverse(),
            ToggleAction::Restart => run.playhead.restart(),
            ToggleAction::Reset => run.playhead.reset(),
            ToggleAction::Complete => run.playhead.complete(&run.timeline),
            ToggleAction::None => {}
        }
        run.dirty = true;
        self.pending_events
            .push(MotionEvent::ActionApplied { run: id, action });
    }

    pub fn run_state(&self, run: RunId) -> Option<PlayState> {
        self.runs.get(&run).map(|r| r.playhead.state())
    }

    pub fn run_time(&self, run: RunId) -> Option<f64> {
        self.runs.get(&run).map(|r| r.playhead.time())
    }

    /// Timeline run behind a subscription, if any.
    pub fn run_of(&self, sub: Subscription) -> Option<RunId> {
        match sub {
            Subscription::Run(id) => self.runs.contains_key(&id).then_some(id),
            Subscription::Trigger(id) => self.triggers.get(&id).map(|t| t.run),
            Subscription::Hover(id) => self.hovers.get(&id).and_then(|h| h.active),
            Subscription::Inert => None,
        }
    }

    pub fn run_count(&self) -> usize {
        self.runs.len()
    }

    // ---- bindings ----

    fn bindable(
        &self,
        scope: ScopeId,
        element: Option<ElementId>,
        what: &str,
    ) -> Option<ElementId> {
        let Some(element) = element else {
            debug!(scope = scope.0, what, "element absent; binding inert");
            return None;
        };
        if self.registry.owner(element) != Some(scope) {
            warn!(
                scope = scope.0,
                element = element.0,
                what,
                "element not claimed by scope; binding inert"
            );
            return None;
        }
        Some(element)
    }

    /// Bind `timeline` to scroll intersection of `element`.
    ///
    /// The timeline is registered paused, so its `from` values render at once.
    pub fn bind_trigger(
        &mut self,
        scope: ScopeId,
        element: Option<ElementId>,
        spec: TriggerSpec,
        timeline: Timeline,
    ) -> Subscription {
        let Some(element) = self.bindable(scope, element, "trigger") else {
            return Subscription::Inert;
        };
        let Some(run) = self.register_run(scope, timeline, false) else {
            return Subscription::Inert;
        };
        let id = self.ids.alloc_trigger();
        self.triggers.insert(
            id,
            TriggerBinding {
                scope,
                element,
                run,
                mode: TriggerMode::Toggle(ScrollTrigger::new(spec)),
            },
        );
        Subscription::Trigger(id)
    }

    /// Drive `timeline` directly from scroll progress through the trigger
    /// band. `lag_ms` smooths the playhead towards the scroll position.
    pub fn bind_scrub(
        &mut self,
        scope: ScopeId,
        element: Option<ElementId>,
        spec: TriggerSpec,
        timeline: Timeline,
        lag_ms: f64,
    ) -> Subscription {
        let Some(element) = self.bindable(scope, element, "scrub") else {
            return Subscription::Inert;
        };
        let Some(run) = self.register_run(scope, timeline, false) else {
            return Subscription::Inert;
        };
        let id = self.ids.alloc_trigger();
        self.triggers.insert(
            id,
            TriggerBinding {
                scope,
                element,
                run,
                mode: TriggerMode::Scrub {
                    trigger: ScrollTrigger::new(spec),
                    lag_ms: lag_ms.max(0.0),
                    current_ms: None,
                },
            },
        );
        Subscription::Trigger(id)
    }

    pub fn bind_hover(
        &mut self,
        scope: ScopeId,
        element: Option<ElementId>,
        spec: HoverSpec,
    ) -> Subscription {
        let Some(element) = self.bindable(scope, element, "hover") else {
            return Subscription::Inert;
        };
        let id = self.ids.alloc_hover();
        self.hovers.insert(
            id,
            HoverBinding {
                scope,
                element,
                spec,
                active: None,
            },
        );
        Subscription::Hover(id)
    }

    pub fn trigger_zone(&self, trigger: TriggerId) -> Option<Zone> {
        self.triggers.get(&trigger).and_then(|t| match &t.mode {
            TriggerMode::Toggle(trig) | TriggerMode::Scrub { trigger: trig, .. } => trig.zone(),
        })
    }

    pub fn trigger_count(&self) -> usize {
        self.triggers.len()
    }

    // ---- teardown ----

    /// Release one subscription. Returns false if it was already gone.
    pub fn release(&mut self, sub: Subscription) -> bool {
        match sub {
            Subscription::Run(id) => self.runs.shift_remove(&id).is_some(),
            Subscription::Trigger(id) => match self.triggers.shift_remove(&id) {
                Some(binding) => {
                    self.runs.shift_remove(&binding.run);
                    true
                }
                None => false,
            },
            Subscription::Hover(id) => match self.hovers.shift_remove(&id) {
                Some(hover) => {
                    if let Some(run) = hover.active {
                        self.runs.shift_remove(&run);
                    }
                    true
                }
                None => false,
            },
            Subscription::Inert => false,
        }
    }

    /// Release everything `scope` owns: runs, triggers, hovers and claimed
    /// elements. Returns false if the scope was already released.
    pub fn release_scope(&mut self, scope: ScopeId) -> bool {
        let Some(label) = self.scopes.remove(&scope) else {
            return false;
        };
        self.runs.retain(|_, r| r.scope != scope);
        self.triggers.retain(|_, t| t.scope != scope);
        self.hovers.retain(|_, h| h.scope != scope);
        let released = self.registry.release_owner(scope);
        self.rendered.retain(|(el, _), _| !released.contains(el));
        debug!(scope = scope.0, %label, elements = released.len(), "scope released");
        self.pending_events.push(MotionEvent::ScopeReleased { scope });
        true
    }

    // ---- stepping ----

    fn evaluate_triggers(&mut self, dt_ms: f64) {
        let scroll = self.scroll;
        let snap = self.config.scrub_snap_ms;
        let mut actions: Vec<(RunId, ToggleAction)> = Vec::new();

        for (id, binding) in self.triggers.iter_mut() {
            let Some(rect) = self.registry.rect(binding.element).copied() else {
                continue;
            };
            match &mut binding.mode {
                TriggerMode::Toggle(trigger) => {
                    for event in trigger.update(&rect, &scroll) {
                        self.pending_events.push(MotionEvent::TriggerFired {
                            trigger: *id,
                            event,
                        });
                        if trigger.is_retired() {
                            continue;
                        }
                        actions.push((binding.run, trigger.spec().actions.for_event(event)));
                        if trigger.spec().once && is_forward_enter(event) {
                            debug!(trigger = id.0, "once trigger retired");
                            trigger.retire();
                        }
                    }
                }
                TriggerMode::Scrub {
                    trigger,
                    lag_ms,
                    current_ms,
                } => {
                    let Some(run) = self.runs.get_mut(&binding.run) else {
                        continue;
                    };
                    trigger.update(&rect, &scroll);
                    let progress = trigger.progress(&rect, &scroll) as f64;
                    let target = progress * run.timeline.duration_ms();
                    let next = match *current_ms {
                        Some(cur) if *lag_ms > 0.0 => {
                            let alpha = 1.0 - (-dt_ms.max(0.0) / *lag_ms).exp();
                            let stepped = cur + (target - cur) * alpha;
                            if (target - stepped).abs() < snap {
                                target
                            } else {
                                stepped
                            }
                        }
                        _ => target,
                    };
                    if *current_ms != Some(next) {
                        run.playhead.seek(&run.timeline, next);
                        run.dirty = true;
                        *current_ms = Some(next);
                    }
                }
            }
        }

        for (run, action) in actions {
            self.apply_action(run, action);
        }
    }

    fn dispatch_pointer(&mut self, inputs: &Inputs) {
        for ev in &inputs.pointer {
            let Some(element) = self.registry.find_key(&ev.key).map(|r| r.id) else {
                continue;
            };
            let matches: Vec<HoverId> = self
                .hovers
                .iter()
                .filter(|(_, h)| h.element == element)
                .map(|(id, _)| *id)
                .collect();
            for hid in matches {
                let Some(hover) = self.hovers.get_mut(&hid) else {
                    continue;
                };
                let (props, ease) = match ev.kind {
                    PointerKind::Enter => (hover.spec.enter.clone(), hover.spec.enter_ease),
                    PointerKind::Leave => (hover.spec.leave.clone(), hover.spec.leave_ease),
                };
                let step = AnimationStep::to([element], props, hover.spec.duration_ms).ease(ease);
                let scope = hover.scope;
                let previous = hover.active.take();
                if let Some(old) = previous {
                    self.runs.shift_remove(&old);
                }
                if let Some(run) = self.register_run(scope, Timeline::from_steps([step]), true) {
                    if let Some(r) = self.runs.get_mut(&run) {
                        r.playhead.play();
                    }
                    if let Some(hover) = self.hovers.get_mut(&hid) {
                        hover.active = Some(run);
                    }
                }
            }
        }
    }

    /// Step the context by `dt_ms` and return this frame's outputs.
    pub fn update(&mut self, dt_ms: f64, inputs: &Inputs) -> &Outputs {
        self.outputs.clear();
        let dt_ms = dt_ms.max(0.0);
        self.now_ms += dt_ms;

        for lu in &inputs.layout {
            self.registry.set_rect(&lu.key, lu.rect);
        }
        if let Some(scroll) = inputs.scroll {
            self.scroll = scroll;
        }

        self.evaluate_triggers(dt_ms);
        self.dispatch_pointer(inputs);

        let mut writes: IndexMap<(ElementId, Prop), Value> = IndexMap::new();
        let mut finished: Vec<RunId> = Vec::new();
        let rendered = &self.rendered;
        for (id, run) in self.runs.iter_mut() {
            let active = run.playhead.is_playing() || run.dirty;
            for ev in run.playhead.advance(&run.timeline, dt_ms) {
                self.pending_events.push(match ev {
                    PlayheadEvent::Completed => MotionEvent::TimelineCompleted { run: *id },
                    PlayheadEvent::Rewound => MotionEvent::TimelineRewound { run: *id },
                    PlayheadEvent::Repeated { iteration } => MotionEvent::TimelineRepeated {
                        run: *id,
                        iteration,
                    },
                });
            }
            if !active {
                continue;
            }
            run.dirty = false;
            let values = if run.playhead.state() == PlayState::Idle {
                run.timeline.initial_values()
            } else {
                run.playhead.sample(&run.timeline, |el, prop| {
                    rendered
                        .get(&(el, prop))
                        .cloned()
                        .unwrap_or_else(|| prop.default_value())
                })
            };
            for (el, prop, value) in values {
                writes.insert((el, prop), value);
            }
            if run.transient && run.playhead.state() == PlayState::Completed {
                finished.push(*id);
            }
        }
        for id in finished {
            self.runs.shift_remove(&id);
        }

        let eps = self.config.change_epsilon;
        for ((element, prop), value) in writes {
            let Some(row) = self.registry.get(element) else {
                continue;
            };
            let changed = self
                .rendered
                .get(&(element, prop))
                .map_or(true, |prev| !same_value(prev, &value, eps));
            if changed {
                self.rendered.insert((element, prop), value.clone());
                self.outputs.push_change(Change {
                    element,
                    key: row.handle.clone(),
                    prop,
                    value,
                });
            }
        }

        let mut events = std::mem::take(&mut self.pending_events);
        if events.len() > self.config.max_events_per_tick {
            warn!(
                dropped = events.len() - self.config.max_events_per_tick,
                "event cap reached for this tick"
            );
            events.truncate(self.config.max_events_per_tick);
        }
        self.outputs.events = events;
        &self.outputs
    }
}

fn is_forward_enter(event: TriggerEvent) -> bool {
    event.kind == TriggerEventKind::Enter && event.direction == Direction::Forward
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_value_respects_epsilon() {
        assert!(same_value(&Value::Float(1.0), &Value::Float(1.00001), 1e-4));
        assert!(!same_value(&Value::Float(1.0), &Value::Float(1.1), 1e-4));
        assert!(!same_value(
            &Value::Float(0.0),
            &Value::Keyword("currentColor".into()),
            1e-4
        ));
    }

    #[test]
    fn claim_without_resolution_is_none() {
        let mut resolver = crate::binding::MapResolver::default();
        resolver.0.insert("hero.title".into(), "#title".into());
        let mut ctx = MotionContext::with_resolver(MotionConfig::default(), Box::new(resolver));
        let scope = ctx.open_scope("hero");
        assert!(ctx.claim(scope, "hero.title").is_some());
        assert!(ctx.claim(scope, "hero.missing").is_none());
        assert_eq!(ctx.handle(ElementId(0)), Some("#title"));
    }

    #[test]
    fn trigger_waits_for_layout() {
        let mut ctx = MotionContext::default();
        let scope = ctx.open_scope("about");
        let el = ctx.claim(scope, "about");
        let spec = TriggerSpec::new("top 70%", "bottom 30%", crate::trigger::ReplayPolicy::Reverse)
            .unwrap();
        let sub = ctx.bind_trigger(scope, el, spec, Timeline::default());
        let Subscription::Trigger(tid) = sub else {
            panic!("expected trigger");
        };
        ctx.update(16.0, &Inputs::scroll_to(5000.0, 1000.0, 1280.0));
        assert_eq!(ctx.trigger_zone(tid), None);
        ctx.update(
            16.0,
            &Inputs::default().with_layout("about", Rect::new(2000.0, 800.0, 1280.0)),
        );
        assert_eq!(ctx.trigger_zone(tid), Some(Zone::After));
    }
}
