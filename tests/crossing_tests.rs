mod common;

use common::{Harness, RawEdge};
use crossing::{ButtonId, DisplayCommand, Phase, Rag, Shared, Stage};

// ============================================================================
// Normal cycle
// ============================================================================

#[test]
fn test_cycle_without_requests() {
    let shared = Shared::new();
    let mut harness = Harness::new(&shared);
    harness.run_until(46_000, &[]);

    assert_eq!(
        harness.stages,
        [
            (0, Stage::cycle(Phase::Red)),
            (10_000, Stage::cycle(Phase::Green)),
            (20_000, Stage::cycle(Phase::Yellow)),
            (23_000, Stage::cycle(Phase::Red)),
            (33_000, Stage::cycle(Phase::Green)),
            (43_000, Stage::cycle(Phase::Yellow)),
            (46_000, Stage::cycle(Phase::Red)),
        ]
    );
    assert!(harness.tone_on_times().is_empty());
}

#[test]
fn test_countdown_decreases_by_one_within_a_phase() {
    let shared = Shared::new();
    let mut harness = Harness::new(&shared);
    harness.run_until(23_000, &[]);

    let countdown: Vec<u32> = harness
        .display
        .iter()
        .filter_map(|(_, command)| match command {
            DisplayCommand::Countdown(seconds) => Some(*seconds),
            _ => None,
        })
        .collect();

    let mut expected: Vec<u32> = (0..10).rev().collect();
    expected.extend((0..10).rev());
    expected.extend((0..3).rev());
    assert_eq!(countdown, expected);
    // Red again: the counter was reset to the new phase's duration.
    assert_eq!(shared.remaining.get(), 10);
}

#[test]
fn test_lamps_follow_the_phase() {
    let shared = Shared::new();
    let mut harness = Harness::new(&shared);
    harness.run_until(20_000, &[]);

    assert_eq!(
        harness.lamps,
        [
            (0, Rag::new(true, false, false)),
            (10_000, Rag::new(false, false, true)),
            (20_000, Rag::new(false, true, false)),
        ]
    );
}

// ============================================================================
// Pedestrian requests
// ============================================================================

#[test]
fn test_press_during_red_starts_crossing_on_next_tick() {
    let shared = Shared::new();
    let mut harness = Harness::new(&shared);
    let edges = [RawEdge::press(3_000, ButtonId::A)];
    harness.run_until(27_000, &edges);

    // Feedback is immediate.
    assert!(harness
        .display
        .contains(&(3_000, DisplayCommand::Message("Pedido recebido"))));

    // Alert tone at the press, one bip half a second later, then silence once
    // the crossing begins.
    assert_eq!(harness.tone_on_times(), [3_000, 3_500]);
    assert!(!harness.tone.is_sounding());
    assert!(!harness.tone.bip_scheduled());

    assert_eq!(
        harness.stages_between(1, 27_000),
        [
            (4_000, Stage::crossing(Phase::Yellow)),
            (7_000, Stage::crossing(Phase::Red)),
            (17_000, Stage::cycle(Phase::Green)),
            (27_000, Stage::cycle(Phase::Yellow)),
        ]
    );
    assert!(!shared.crossing.is_raised());
}

#[test]
fn test_preemption_ignores_remaining_time() {
    let shared = Shared::new();
    let mut harness = Harness::new(&shared);
    harness.run_until(12_000, &[]);
    assert_eq!(harness.controller.stage(), Stage::cycle(Phase::Green));
    assert_eq!(shared.remaining.get(), 8);

    let edges = [RawEdge::press(12_400, ButtonId::B)];
    harness.run_until(13_000, &edges);

    assert_eq!(harness.controller.stage(), Stage::crossing(Phase::Yellow));
    assert_eq!(harness.stages.last(), Some(&(13_000, Stage::crossing(Phase::Yellow))));
    assert_eq!(shared.remaining.get(), 3);
}

#[test]
fn test_bouncing_contact_gives_one_press() {
    let shared = Shared::new();
    let mut harness = Harness::new(&shared);
    let edges = [
        RawEdge::press(3_000, ButtonId::A),
        RawEdge::press(3_010, ButtonId::A),
        RawEdge::press(3_020, ButtonId::A),
        RawEdge::press(3_040, ButtonId::A),
    ];
    harness.run_until(3_900, &edges);

    assert_eq!(harness.accepted_presses, [(3_000, ButtonId::A)]);
    assert_eq!(harness.tone_on_times(), [3_000, 3_500]);
}

#[test]
fn test_repeated_requests_give_a_single_crossing() {
    let shared = Shared::new();
    let mut harness = Harness::new(&shared);
    let edges = [
        RawEdge::press(3_000, ButtonId::A),
        RawEdge::press(3_300, ButtonId::B),
        RawEdge::press(3_600, ButtonId::A),
    ];
    harness.run_until(30_000, &edges);

    assert_eq!(harness.accepted_presses.len(), 3);
    let crossings = harness
        .stages
        .iter()
        .filter(|(_, stage)| *stage == Stage::crossing(Phase::Yellow))
        .count();
    assert_eq!(crossings, 1);
    assert_eq!(
        harness.stages_between(17_000, 30_000),
        [
            (17_000, Stage::cycle(Phase::Green)),
            (27_000, Stage::cycle(Phase::Yellow)),
            (30_000, Stage::cycle(Phase::Red)),
        ]
    );
}

#[test]
fn test_press_during_crossing_is_absorbed() {
    let shared = Shared::new();
    let mut harness = Harness::new(&shared);
    let edges = [
        RawEdge::press(3_000, ButtonId::A),
        RawEdge::release(3_200, ButtonId::A),
        RawEdge::press(9_000, ButtonId::A),
    ];
    harness.run_until(28_000, &edges);

    // The second press is accepted by the debouncer but brings no feedback and
    // no second crossing.
    assert_eq!(harness.accepted_presses.len(), 2);
    assert_eq!(harness.tone_on_times(), [3_000, 3_500]);
    assert_eq!(
        harness.stages_between(4_000, 28_000),
        [
            (4_000, Stage::crossing(Phase::Yellow)),
            (7_000, Stage::crossing(Phase::Red)),
            (17_000, Stage::cycle(Phase::Green)),
            (27_000, Stage::cycle(Phase::Yellow)),
        ]
    );
}

#[test]
fn test_press_on_the_tick_ending_a_crossing_is_absorbed() {
    let shared = Shared::new();
    let mut harness = Harness::new(&shared);
    harness.press_before_tick = true;
    let edges = [
        RawEdge::press(3_500, ButtonId::A),
        RawEdge::release(3_700, ButtonId::A),
        RawEdge::press(17_000, ButtonId::B),
    ];
    harness.run_until(40_000, &edges);

    // Both presses pass the debouncer, but the second one is read from the
    // mailbox only after the tick that ended the crossing and cleared it.
    assert_eq!(harness.accepted_presses, [(3_500, ButtonId::A), (17_000, ButtonId::B)]);
    let messages: Vec<u64> = harness
        .display
        .iter()
        .filter(|(_, command)| matches!(command, DisplayCommand::Message(_)))
        .map(|(at, _)| *at)
        .collect();
    assert_eq!(messages, [3_500]);

    // The bip due at 4 s loses against the crossing starting on that tick.
    assert_eq!(harness.tone_on_times(), [3_500]);
    assert!(!shared.bip_gate.is_open());
    assert!(!shared.crossing.is_raised());

    assert_eq!(
        harness.stages_between(4_000, 40_000),
        [
            (4_000, Stage::crossing(Phase::Yellow)),
            (7_000, Stage::crossing(Phase::Red)),
            (17_000, Stage::cycle(Phase::Green)),
            (27_000, Stage::cycle(Phase::Yellow)),
            (30_000, Stage::cycle(Phase::Red)),
            (40_000, Stage::cycle(Phase::Green)),
        ]
    );
}

#[test]
fn test_no_bip_after_cancellation() {
    let shared = Shared::new();
    let mut harness = Harness::new(&shared);
    let edges = [RawEdge::press(3_200, ButtonId::A)];
    harness.run_until(10_000, &edges);

    // Bips are due at 3.7 s and 4.2 s; the crossing starts at 4 s.
    let tones = harness.tone_on_times();
    assert_eq!(tones, [3_200, 3_700]);
    assert!(tones.iter().all(|at| *at < 4_000));
    assert!(!shared.bip_gate.is_open());
}
