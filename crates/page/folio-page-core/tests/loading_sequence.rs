use std::cell::Cell;
use std::rc::Rc;

use folio_page::{GreetingCycle, LoadingSequencer, SequencerEvent, SequencerState};
use serde::Deserialize;

fn init_tracing() {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "folio_page=debug".to_string());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

#[derive(Deserialize)]
struct Expected {
    shown: Vec<(f64, String)>,
    transitions: u64,
    final_index: usize,
    completed_at_ms: f64,
}

#[derive(Deserialize)]
struct Scenario {
    cycle: GreetingCycle,
    expected: Expected,
}

fn scenario(name: &str) -> Scenario {
    folio_test_fixtures::loading_scenarios::load(name).expect("scenario fixture")
}

type Run = (LoadingSequencer, Vec<SequencerEvent>, Rc<Cell<u32>>);

/// Drive a sequencer in fixed steps, collecting every event.
fn run(cycle: GreetingCycle, step_ms: f64, total_ms: f64) -> Run {
    let completions = Rc::new(Cell::new(0));
    let mut seq = LoadingSequencer::new(cycle).expect("valid cycle");
    let counter = Rc::clone(&completions);
    seq.on_complete(move || counter.set(counter.get() + 1));
    seq.start();
    let mut events = Vec::new();
    let mut t = 0.0;
    while t < total_ms {
        events.extend(seq.advance(step_ms));
        t += step_ms;
    }
    (seq, events, completions)
}

fn shown(events: &[SequencerEvent]) -> Vec<(f64, String)> {
    events
        .iter()
        .filter_map(|e| match e {
            SequencerEvent::GreetingShown { text, at_ms, .. } => Some((*at_ms, text.clone())),
            _ => None,
        })
        .collect()
}

#[test]
fn fixture_scenarios_match_expectations() {
    init_tracing();
    for name in folio_test_fixtures::loading_scenarios::keys() {
        let sc = scenario(&name);
        assert_eq!(sc.cycle.expected_transitions(), sc.expected.transitions, "{name}");
        for step in [1.0, 16.0, 250.0, 100_000.0] {
            let (seq, events, completions) = run(sc.cycle.clone(), step, 20_000.0);
            assert_eq!(shown(&events), sc.expected.shown, "{name} @ {step}ms");
            assert_eq!(seq.transitions(), sc.expected.transitions, "{name} @ {step}ms");
            assert_eq!(seq.current_index(), sc.expected.final_index, "{name} @ {step}ms");
            assert_eq!(seq.state(), SequencerState::Done);
            assert_eq!(completions.get(), 1, "{name} @ {step}ms");
            assert_eq!(
                events.last(),
                Some(&SequencerEvent::Completed {
                    at_ms: sc.expected.completed_at_ms
                })
            );
        }
    }
}

#[test]
fn three_greetings_wrap_in_order() {
    let sc = scenario("three-greetings");
    let (_, events, _) = run(sc.cycle, 16.0, 6000.0);
    let texts: Vec<String> = shown(&events).into_iter().map(|(_, t)| t).take(4).collect();
    assert_eq!(texts, ["Hello", "Hola", "Bonjour", "Hello"]);
}

#[test]
fn finalizing_precedes_completion_by_exit() {
    let sc = scenario("single-greeting");
    let (_, events, _) = run(sc.cycle.clone(), 10.0, 10_000.0);
    let finalizing = events.iter().find_map(|e| match e {
        SequencerEvent::Finalizing { at_ms } => Some(*at_ms),
        _ => None,
    });
    assert_eq!(finalizing, Some(sc.cycle.deadline_ms));
    assert_eq!(sc.cycle.completion_ms(), sc.expected.completed_at_ms);
}

#[test]
fn teardown_midway_never_completes() {
    let sc = scenario("three-greetings");
    let completions = Rc::new(Cell::new(0));
    let mut seq = LoadingSequencer::new(sc.cycle).unwrap();
    let counter = Rc::clone(&completions);
    seq.on_complete(move || counter.set(counter.get() + 1));
    seq.start();
    seq.advance(2_200.0);
    assert_eq!(seq.current_text(), Some("Bonjour"));
    seq.teardown();
    seq.teardown();
    assert!(seq.advance(60_000.0).is_empty());
    assert_eq!(completions.get(), 0);
}
