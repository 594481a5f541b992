//! Timelines: compiled step schedules and the playheads that run them.
//!
//! A [`Timeline`] is immutable once built. All runtime state (time,
//! direction, repeat iteration, start values captured by "to" steps) lives in
//! a [`Playhead`], so two playheads over clones of one timeline never share
//! mutable state.

use hashbrown::HashMap;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::ease::Easing;
use crate::ids::ElementId;
use crate::step::{AnimationStep, Position};
use crate::value::{Prop, Value};

/// One property channel of a track.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PropTrack {
    pub prop: Prop,
    pub from: Option<Value>,
    pub to: Value,
}

/// One step applied to one target, with its absolute start time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub element: ElementId,
    /// Index of the originating step.
    pub step: usize,
    pub start_ms: f64,
    pub duration_ms: f64,
    pub ease: Easing,
    pub props: Vec<PropTrack>,
}

impl Track {
    #[inline]
    pub fn end_ms(&self) -> f64 {
        self.start_ms + self.duration_ms
    }

    #[inline]
    fn has_started(&self, t: f64) -> bool {
        t >= self.start_ms
    }

    #[inline]
    fn progress(&self, t: f64) -> f32 {
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        ((t - self.start_ms) / self.duration_ms).clamp(0.0, 1.0) as f32
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Repeat {
    #[default]
    Never,
    /// Play `n` extra times after the first pass.
    Count(u32),
    Infinite,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    tracks: Vec<Track>,
    /// Played once, before the first iteration.
    delay_ms: f64,
    duration_ms: f64,
    repeat: Repeat,
    yoyo: bool,
}

impl Timeline {
    pub fn builder() -> TimelineBuilder {
        TimelineBuilder::default()
    }

    /// Compile steps with no leading delay and no repeat.
    pub fn from_steps(steps: impl IntoIterator<Item = AnimationStep>) -> Self {
        let mut b = TimelineBuilder::default();
        for s in steps {
            b = b.step(s);
        }
        b.build()
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Length of the first pass, including the leading delay.
    pub fn duration_ms(&self) -> f64 {
        self.duration_ms
    }

    pub fn delay_ms(&self) -> f64 {
        self.delay_ms
    }

    /// Length of one repeated iteration; the leading delay is not replayed.
    pub fn cycle_ms(&self) -> f64 {
        self.duration_ms - self.delay_ms
    }

    pub fn repeat(&self) -> Repeat {
        self.repeat
    }

    pub fn yoyo(&self) -> bool {
        self.yoyo
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Every element written by this timeline.
    pub fn targets(&self) -> Vec<ElementId> {
        let mut out: Vec<ElementId> = self.tracks.iter().map(|t| t.element).collect();
        out.sort();
        out.dedup();
        out
    }

    /// Start times of each target of one step, in target order.
    pub fn step_starts(&self, step: usize) -> Vec<f64> {
        self.tracks
            .iter()
            .filter(|t| t.step == step)
            .map(|t| t.start_ms)
            .collect()
    }

    /// Keep only tracks whose element passes `keep`.
    pub(crate) fn retain_targets(&mut self, mut keep: impl FnMut(ElementId) -> bool) {
        self.tracks.retain(|t| keep(t.element));
    }

    /// Values each (element, prop) shows before any track has started:
    /// the `from` of the first track for that channel, when it has one.
    pub fn initial_values(&self) -> Vec<(ElementId, Prop, Value)> {
        let mut firsts: IndexMap<(ElementId, Prop), Option<&Value>> = IndexMap::new();
        for track in &self.tracks {
            for pt in &track.props {
                firsts
                    .entry((track.element, pt.prop))
                    .or_insert(pt.from.as_ref());
            }
        }
        firsts
            .into_iter()
            .filter_map(|((el, prop), v)| v.map(|v| (el, prop, v.clone())))
            .collect()
    }
}

#[derive(Clone, Debug, Default)]
pub struct TimelineBuilder {
    steps: Vec<AnimationStep>,
    delay_ms: f64,
    repeat: Repeat,
    yoyo: bool,
}

impl TimelineBuilder {
    pub fn delay(mut self, delay_ms: f64) -> Self {
        self.delay_ms = delay_ms.max(0.0);
        self
    }

    pub fn step(mut self, step: AnimationStep) -> Self {
        self.steps.push(step);
        self
    }

    pub fn repeat(mut self, repeat: Repeat) -> Self {
        self.repeat = repeat;
        self
    }

    pub fn yoyo(mut self, yoyo: bool) -> Self {
        self.yoyo = yoyo;
        self
    }

    /// Lay steps out on the time axis.
    ///
    /// Steps without targets are skipped entirely, so later relative offsets
    /// are measured against the steps that actually exist.
    pub fn build(self) -> Timeline {
        let mut tracks = Vec::new();
        let mut end = self.delay_ms;
        let mut prev_start = self.delay_ms;

        for (idx, step) in self.steps.iter().enumerate() {
            if step.targets.is_empty() {
                continue;
            }
            let base = match step.position {
                Position::After => end,
                Position::Offset(o) => (end + o).max(self.delay_ms),
                Position::WithPrevious => prev_start,
                Position::At(t) => self.delay_ms + t.max(0.0),
            };
            let start = base + step.delay_ms;

            let mut props: Vec<PropTrack> = step
                .to
                .iter()
                .map(|(prop, to)| PropTrack {
                    prop: *prop,
                    from: step.from.as_ref().and_then(|f| f.get(*prop)).cloned(),
                    to: to.clone(),
                })
                .collect();
            // from-only props hold their from value for the whole step
            if let Some(from) = &step.from {
                for (prop, v) in from.iter() {
                    if step.to.get(*prop).is_none() {
                        props.push(PropTrack {
                            prop: *prop,
                            from: Some(v.clone()),
                            to: v.clone(),
                        });
                    }
                }
            }

            for (k, element) in step.targets.iter().enumerate() {
                tracks.push(Track {
                    element: *element,
                    step: idx,
                    start_ms: start + k as f64 * step.stagger_ms,
                    duration_ms: step.duration_ms,
                    ease: step.ease,
                    props: props.clone(),
                });
            }

            prev_start = start;
            end = end.max(start + step.total_duration());
        }

        Timeline {
            tracks,
            delay_ms: self.delay_ms,
            duration_ms: end,
            repeat: self.repeat,
            yoyo: self.yoyo,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Forward,
    Reverse,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayState {
    /// Registered, never played.
    Idle,
    Playing,
    Paused,
    /// Reached the end playing forward.
    Completed,
    /// Returned to the start playing in reverse.
    Rewound,
}

/// Discrete signals produced while advancing a playhead.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayheadEvent {
    Completed,
    Rewound,
    Repeated { iteration: u32 },
}

/// Runtime cursor over a timeline.
#[derive(Clone, Debug)]
pub struct Playhead {
    /// Time within the current iteration, in [0, duration].
    time: f64,
    iteration: u32,
    direction: Direction,
    state: PlayState,
    /// Start values captured by "to" tracks, keyed by (track index, prop).
    captured: HashMap<(usize, Prop), Value>,
}

impl Default for Playhead {
    fn default() -> Self {
        Self {
            time: 0.0,
            iteration: 0,
            direction: Direction::Forward,
            state: PlayState::Idle,
            captured: HashMap::new(),
        }
    }
}

impl Playhead {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> PlayState {
        self.state
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn iteration(&self) -> u32 {
        self.iteration
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlayState::Playing
    }

    /// Play forward from the current position. A completed playhead stays put.
    pub fn play(&mut self) {
        self.direction = Direction::Forward;
        if self.state != PlayState::Completed {
            self.state = PlayState::Playing;
        }
    }

    /// Play backwards from the current position towards the start.
    pub fn reverse(&mut self) {
        self.direction = Direction::Reverse;
        if self.time <= 0.0 && self.iteration == 0 {
            if self.state != PlayState::Idle {
                self.state = PlayState::Rewound;
            }
        } else {
            self.state = PlayState::Playing;
        }
    }

    pub fn pause(&mut self) {
        if self.state == PlayState::Playing {
            self.state = PlayState::Paused;
        }
    }

    pub fn resume(&mut self) {
        if self.state == PlayState::Paused {
            self.state = PlayState::Playing;
        }
    }

    pub fn restart(&mut self) {
        self.time = 0.0;
        self.iteration = 0;
        self.direction = Direction::Forward;
        self.state = PlayState::Playing;
    }

    /// Back to the start, paused.
    pub fn reset(&mut self) {
        self.time = 0.0;
        self.iteration = 0;
        self.direction = Direction::Forward;
        self.state = PlayState::Paused;
    }

    /// Jump to the end of the final iteration.
    pub fn complete(&mut self, timeline: &Timeline) {
        self.time = timeline.duration_ms;
        if let Repeat::Count(n) = timeline.repeat {
            self.iteration = n;
        }
        self.direction = Direction::Forward;
        self.state = PlayState::Completed;
    }

    /// Place the playhead at an absolute time in the first iteration; used by scrubbing.
    pub fn seek(&mut self, timeline: &Timeline, time: f64) {
        self.time = time.clamp(0.0, timeline.duration_ms);
        self.iteration = 0;
        if self.state == PlayState::Playing || self.state == PlayState::Idle {
            self.state = PlayState::Paused;
        }
    }

    /// Time used for sampling; odd iterations of a yoyo timeline run mirrored
    /// inside the window after the leading delay.
    pub fn local_time(&self, timeline: &Timeline) -> f64 {
        if timeline.yoyo && self.iteration % 2 == 1 {
            timeline.duration_ms + timeline.delay_ms - self.time
        } else {
            self.time
        }
    }

    fn repeats_left(&self, timeline: &Timeline) -> bool {
        if timeline.cycle_ms() <= 0.0 {
            return false;
        }
        match timeline.repeat {
            Repeat::Never => false,
            Repeat::Count(n) => self.iteration < n,
            Repeat::Infinite => true,
        }
    }

    /// Advance by `dt_ms` in the current direction.
    ///
    /// Iteration 0 spans `[0, duration]`; later iterations span
    /// `[delay, duration]`, so the leading delay plays once.
    pub fn advance(&mut self, timeline: &Timeline, dt_ms: f64) -> Vec<PlayheadEvent> {
        let mut events = Vec::new();
        if self.state != PlayState::Playing {
            return events;
        }
        let duration = timeline.duration_ms;
        if duration <= 0.0 {
            self.time = 0.0;
            match self.direction {
                Direction::Forward => {
                    self.state = PlayState::Completed;
                    events.push(PlayheadEvent::Completed);
                }
                Direction::Reverse => {
                    self.state = PlayState::Rewound;
                    events.push(PlayheadEvent::Rewound);
                }
            }
            return events;
        }

        match self.direction {
            Direction::Forward => {
                self.time += dt_ms.max(0.0);
                while self.time >= duration {
                    if self.repeats_left(timeline) {
                        self.time -= timeline.cycle_ms();
                        self.iteration += 1;
                        events.push(PlayheadEvent::Repeated {
                            iteration: self.iteration,
                        });
                    } else {
                        self.time = duration;
                        self.state = PlayState::Completed;
                        events.push(PlayheadEvent::Completed);
                        break;
                    }
                }
            }
            Direction::Reverse => {
                self.time -= dt_ms.max(0.0);
                loop {
                    if self.iteration > 0 && self.time <= timeline.delay_ms {
                        self.iteration -= 1;
                        self.time += timeline.cycle_ms();
                    } else if self.iteration == 0 && self.time <= 0.0 {
                        self.time = 0.0;
                        self.state = PlayState::Rewound;
                        events.push(PlayheadEvent::Rewound);
                        break;
                    } else {
                        break;
                    }
                }
            }
        }
        events
    }

    /// Resolve every channel of the timeline at the current local time.
    ///
    /// For each (element, prop) the last track that has started wins. If none
    /// has started, the first track's `from` (or a captured start value) is
    /// shown. "To" tracks capture their start value from `current` the first
    /// time they are sampled past their start.
    pub fn sample(
        &mut self,
        timeline: &Timeline,
        current: impl Fn(ElementId, Prop) -> Value,
    ) -> Vec<(ElementId, Prop, Value)> {
        let t = self.local_time(timeline);

        // (element, prop) -> (track index, started)
        let mut chosen: IndexMap<(ElementId, Prop), (usize, bool)> = IndexMap::new();
        for (idx, track) in timeline.tracks.iter().enumerate() {
            let started = track.has_started(t);
            for pt in &track.props {
                let key = (track.element, pt.prop);
                match chosen.get_mut(&key) {
                    None => {
                        chosen.insert(key, (idx, started));
                    }
                    Some(slot) => {
                        if started {
                            *slot = (idx, true);
                        }
                    }
                }
            }
        }

        let mut out = Vec::with_capacity(chosen.len());
        for ((element, prop), (idx, started)) in chosen {
            let track = &timeline.tracks[idx];
            let Some(pt) = track.props.iter().find(|p| p.prop == prop) else {
                continue;
            };
            let start_value = match &pt.from {
                Some(v) => Some(v.clone()),
                None => {
                    if started && !self.captured.contains_key(&(idx, prop)) {
                        let start = chained_start(timeline, idx, prop)
                            .unwrap_or_else(|| current(element, prop));
                        self.captured.insert((idx, prop), start);
                    }
                    self.captured.get(&(idx, prop)).cloned()
                }
            };
            let Some(start_value) = start_value else {
                continue;
            };
            let value = if started {
                let eased = track.ease.apply(track.progress(t));
                start_value.lerp(&pt.to, eased)
            } else {
                start_value
            };
            out.push((element, prop, value));
        }
        out
    }
}

/// End value of the latest earlier track on the same channel that finished
/// before track `idx` starts. A chained "to" starts from it even when no
/// frame ever rendered that end value.
fn chained_start(timeline: &Timeline, idx: usize, prop: Prop) -> Option<Value> {
    let track = &timeline.tracks[idx];
    timeline.tracks[..idx]
        .iter()
        .rev()
        .filter(|prev| prev.element == track.element)
        .find_map(|prev| {
            prev.props
                .iter()
                .find(|p| p.prop == prop)
                .map(|p| (prev.end_ms(), p))
        })
        .filter(|(end, _)| *end <= track.start_ms)
        .map(|(_, p)| p.to.clone())
}
