//! Loading sequencer: a timed state machine cycling through greetings.
//!
//! `Init → ShowingGreeting(i) → … → Finalizing → Done`, or `Cancelled` after
//! teardown. All timers are scheduled up front when the cycle starts, so the
//! outcome does not depend on how the host slices time into frames.
//!
//! A greeting tick due at the same instant as the deadline is shown before
//! finalizing. The number of index advances before completion is therefore
//! `floor((deadline - initial_delay) / interval)`.

use folio_motion::{Fired, TimerId, Timers, MIN_INTERVAL_MS};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::PageError;

/// Greetings in the languages the site cycles through.
pub const DEFAULT_GREETINGS: [&str; 9] = [
    "Hello",
    "Hola",
    "Bonjour",
    "こんにちは",
    "नमस्ते",
    "안녕하세요",
    "Olá",
    "Ciao",
    "Привет",
];

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GreetingCycle {
    pub greetings: Vec<String>,
    pub initial_delay_ms: f64,
    pub interval_ms: f64,
    /// Measured from start; forces `Finalizing`.
    pub deadline_ms: f64,
    /// Time spent in `Finalizing` before completion.
    pub exit_ms: f64,
}

impl Default for GreetingCycle {
    fn default() -> Self {
        Self {
            greetings: DEFAULT_GREETINGS.iter().map(|g| g.to_string()).collect(),
            initial_delay_ms: 500.0,
            interval_ms: 600.0,
            deadline_ms: 6000.0,
            exit_ms: 1400.0,
        }
    }
}

impl GreetingCycle {
    pub fn validate(&self) -> Result<(), PageError> {
        if self.greetings.is_empty() {
            return Err(PageError::config("greeting list must not be empty"));
        }
        if !(self.interval_ms >= MIN_INTERVAL_MS) {
            return Err(PageError::config(format!(
                "interval_ms must be >= {MIN_INTERVAL_MS}"
            )));
        }
        if !(self.initial_delay_ms >= 0.0) || !(self.exit_ms >= 0.0) {
            return Err(PageError::config("delays must be >= 0"));
        }
        if !(self.deadline_ms >= self.initial_delay_ms) {
            return Err(PageError::config("deadline_ms must be >= initial_delay_ms"));
        }
        Ok(())
    }

    /// Index advances after the first greeting, before completion.
    pub fn expected_transitions(&self) -> u64 {
        ((self.deadline_ms - self.initial_delay_ms) / self.interval_ms).floor() as u64
    }

    /// Time from start until the completion callback runs.
    pub fn completion_ms(&self) -> f64 {
        self.deadline_ms + self.exit_ms
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SequencerState {
    Init,
    ShowingGreeting(usize),
    Finalizing,
    Done,
    Cancelled,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum SequencerEvent {
    GreetingShown {
        index: usize,
        text: String,
        at_ms: f64,
    },
    Finalizing {
        at_ms: f64,
    },
    Completed {
        at_ms: f64,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Tick {
    First,
    Next,
    Deadline,
    ExitDone,
}

impl Tick {
    /// Order among timers due at the same instant.
    fn rank(self) -> u8 {
        match self {
            Tick::First | Tick::Next => 0,
            Tick::Deadline => 1,
            Tick::ExitDone => 2,
        }
    }
}

pub struct LoadingSequencer {
    cycle: GreetingCycle,
    state: SequencerState,
    timers: Timers<Tick>,
    interval: Option<TimerId>,
    index: usize,
    transitions: u64,
    on_complete: Option<Box<dyn FnOnce()>>,
}

impl std::fmt::Debug for LoadingSequencer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadingSequencer")
            .field("state", &self.state)
            .field("index", &self.index)
            .field("transitions", &self.transitions)
            .field("now_ms", &self.timers.now())
            .finish()
    }
}

impl LoadingSequencer {
    pub fn new(cycle: GreetingCycle) -> Result<Self, PageError> {
        cycle.validate()?;
        Ok(Self {
            cycle,
            state: SequencerState::Init,
            timers: Timers::new(),
            interval: None,
            index: 0,
            transitions: 0,
            on_complete: None,
        })
    }

    /// Install the completion callback; it runs at most once.
    pub fn on_complete(&mut self, callback: impl FnOnce() + 'static) {
        self.on_complete = Some(Box::new(callback));
    }

    pub fn cycle(&self) -> &GreetingCycle {
        &self.cycle
    }

    pub fn state(&self) -> SequencerState {
        self.state
    }

    /// Milliseconds since `start`.
    pub fn elapsed_ms(&self) -> f64 {
        self.timers.now()
    }

    pub fn current_index(&self) -> usize {
        self.index
    }

    pub fn current_text(&self) -> Option<&str> {
        match self.state {
            SequencerState::Init | SequencerState::Cancelled => None,
            _ => self.cycle.greetings.get(self.index).map(String::as_str),
        }
    }

    /// Index advances observed so far.
    pub fn transitions(&self) -> u64 {
        self.transitions
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.state, SequencerState::Done | SequencerState::Cancelled)
    }

    /// Schedule the whole cycle. Only valid from `Init`.
    pub fn start(&mut self) {
        if self.state != SequencerState::Init || !self.timers.is_empty() {
            return;
        }
        let c = &self.cycle;
        self.timers.after(c.initial_delay_ms, None, Tick::First);
        self.interval = Some(self.timers.every(
            c.initial_delay_ms + c.interval_ms,
            c.interval_ms,
            None,
            Tick::Next,
        ));
        self.timers.after(c.deadline_ms, None, Tick::Deadline);
        self.timers.after(c.deadline_ms + c.exit_ms, None, Tick::ExitDone);
        debug!(
            greetings = c.greetings.len(),
            deadline_ms = c.deadline_ms,
            "loading sequence started"
        );
    }

    fn show(&mut self, index: usize, at_ms: f64, out: &mut Vec<SequencerEvent>) {
        self.index = index;
        self.state = SequencerState::ShowingGreeting(index);
        out.push(SequencerEvent::GreetingShown {
            index,
            text: self.cycle.greetings[index].clone(),
            at_ms,
        });
    }

    /// Move time forward and return what happened, in order.
    pub fn advance(&mut self, dt_ms: f64) -> Vec<SequencerEvent> {
        let mut out = Vec::new();
        if self.is_finished() {
            return out;
        }
        let mut fired: Vec<Fired<Tick>> = self.timers.advance(dt_ms);
        fired.sort_by(|a, b| {
            a.due_ms
                .total_cmp(&b.due_ms)
                .then_with(|| a.payload.rank().cmp(&b.payload.rank()))
        });

        for f in fired {
            match f.payload {
                Tick::First => self.show(0, f.due_ms, &mut out),
                Tick::Next => {
                    if matches!(self.state, SequencerState::ShowingGreeting(_)) {
                        let next = (self.index + 1) % self.cycle.greetings.len();
                        self.transitions += 1;
                        self.show(next, f.due_ms, &mut out);
                    }
                }
                Tick::Deadline => {
                    if let Some(id) = self.interval.take() {
                        self.timers.cancel(id);
                    }
                    self.state = SequencerState::Finalizing;
                    debug!(at_ms = f.due_ms, index = self.index, "loading sequence finalizing");
                    out.push(SequencerEvent::Finalizing { at_ms: f.due_ms });
                }
                Tick::ExitDone => {
                    self.state = SequencerState::Done;
                    out.push(SequencerEvent::Completed { at_ms: f.due_ms });
                    if let Some(callback) = self.on_complete.take() {
                        callback();
                    }
                    break;
                }
            }
        }
        out
    }

    /// Cancel everything. The completion callback never runs afterwards.
    /// Calling it again, or after completion, does nothing.
    pub fn teardown(&mut self) {
        if self.is_finished() {
            return;
        }
        self.timers.cancel_all();
        self.interval = None;
        self.on_complete = None;
        self.state = SequencerState::Cancelled;
        debug!("loading sequence cancelled");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn cycle(
        greetings: &[&str],
        delay: f64,
        interval: f64,
        deadline: f64,
        exit: f64,
    ) -> GreetingCycle {
        GreetingCycle {
            greetings: greetings.iter().map(|s| s.to_string()).collect(),
            initial_delay_ms: delay,
            interval_ms: interval,
            deadline_ms: deadline,
            exit_ms: exit,
        }
    }

    #[test]
    fn init_until_started() {
        let mut seq = LoadingSequencer::new(GreetingCycle::default()).unwrap();
        assert!(seq.advance(10_000.0).is_empty());
        assert_eq!(seq.state(), SequencerState::Init);
    }

    #[test]
    fn first_greeting_after_initial_delay() {
        let mut seq = LoadingSequencer::new(GreetingCycle::default()).unwrap();
        seq.start();
        assert!(seq.advance(499.0).is_empty());
        let ev = seq.advance(1.0);
        assert_eq!(
            ev,
            vec![SequencerEvent::GreetingShown {
                index: 0,
                text: "Hello".into(),
                at_ms: 500.0
            }]
        );
        assert_eq!(seq.current_text(), Some("Hello"));
    }

    #[test]
    fn one_big_step_matches_small_steps() {
        let c = cycle(&["a", "b"], 100.0, 70.0, 1000.0, 50.0);
        let mut big = LoadingSequencer::new(c.clone()).unwrap();
        big.start();
        let all = big.advance(5000.0);

        let mut small = LoadingSequencer::new(c).unwrap();
        small.start();
        let mut stepped = Vec::new();
        for _ in 0..500 {
            stepped.extend(small.advance(10.0));
        }
        assert_eq!(all, stepped);
        assert_eq!(big.transitions(), 12);
        assert_eq!(big.state(), SequencerState::Done);
    }

    #[test]
    fn completion_runs_once() {
        let calls = Rc::new(Cell::new(0));
        let mut seq = LoadingSequencer::new(cycle(&["x"], 0.0, 10.0, 25.0, 5.0)).unwrap();
        let counter = calls.clone();
        seq.on_complete(move || counter.set(counter.get() + 1));
        seq.start();
        seq.advance(100.0);
        seq.advance(100.0);
        seq.teardown();
        assert_eq!(calls.get(), 1);
        assert_eq!(seq.state(), SequencerState::Done);
    }

    #[test]
    fn teardown_before_deadline_skips_completion() {
        let calls = Rc::new(Cell::new(0));
        let mut seq = LoadingSequencer::new(GreetingCycle::default()).unwrap();
        let counter = calls.clone();
        seq.on_complete(move || counter.set(counter.get() + 1));
        seq.start();
        seq.advance(2000.0);
        seq.teardown();
        seq.teardown();
        assert_eq!(seq.state(), SequencerState::Cancelled);
        assert!(seq.advance(20_000.0).is_empty());
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn rejects_degenerate_cycles() {
        assert!(LoadingSequencer::new(cycle(&[], 0.0, 10.0, 20.0, 0.0)).is_err());
        assert!(LoadingSequencer::new(cycle(&["a"], 0.0, 0.0, 20.0, 0.0)).is_err());
        assert!(LoadingSequencer::new(cycle(&["a"], 30.0, 10.0, 20.0, 0.0)).is_err());
    }

    #[test]
    fn sub_millisecond_interval_is_rejected() {
        let err = LoadingSequencer::new(cycle(&["a", "b"], 0.0, 0.5, 10.0, 0.0))
            .err()
            .expect("rejected");
        assert_eq!(err.category(), "config");
        let ok = cycle(&["a", "b"], 0.0, 1.0, 10.0, 0.0);
        let mut seq = LoadingSequencer::new(ok.clone()).unwrap();
        seq.start();
        seq.advance(100.0);
        assert_eq!(seq.transitions(), ok.expected_transitions());
        assert_eq!(seq.transitions(), 10);
    }

    #[test]
    fn nan_exit_is_rejected() {
        assert!(LoadingSequencer::new(cycle(&["a"], 0.0, 10.0, 20.0, f64::NAN)).is_err());
        assert!(LoadingSequencer::new(cycle(&["a"], f64::NAN, 10.0, 20.0, 0.0)).is_err());
    }
}
