//! Integration tests for Reaction TestKit
//!
//! These tests drive the public API end to end: full assessment runs on a
//! manual clock, the refresh rate monitor, handler fault recovery and the
//! App pipeline that ties both to terminal input.

use reaction_testkit::assessment::{AssessmentError, AssessmentState, ReactionAssessment};
use reaction_testkit::config::{AssessmentConfig, Config};
use reaction_testkit::display::{HexColor, ScreenSurface};
use reaction_testkit::host::{InputSignal, Key, ManualClock, PointerButton, TimerQueue};
use reaction_testkit::testing::{self, FlakySurface, ManualAssessment};
use reaction_testkit::ui::{App, AppView};
use rand::rngs::StdRng;
use rand::SeedableRng;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn config_with(total_stages: u32, strikes_limit: u32) -> AssessmentConfig {
    AssessmentConfig {
        total_stages,
        strikes_limit,
        ..AssessmentConfig::default()
    }
}

fn region<'a>(assessment: &'a ManualAssessment, id: &str) -> &'a str {
    assessment.display().region_text(id).unwrap_or_default()
}

/// Start or continue, then respond before the stimulus fires
fn jump_the_gun(assessment: &mut ManualAssessment) {
    if assessment.state() != AssessmentState::AwaitingStimulus {
        assessment.handle_activation();
    }
    assessment.handle_activation();
}

fn click() -> InputSignal {
    InputSignal::PointerDown(PointerButton::Primary)
}

// ---------------------------------------------------------------------------
// Full runs
// ---------------------------------------------------------------------------

#[test]
fn two_stage_run_averages_stage_times() {
    let (mut assessment, clock) = testing::manual_assessment(config_with(2, 3), 11);

    testing::complete_run(&mut assessment, &clock, &[100.0, 200.0]);

    assert_eq!(assessment.state(), AssessmentState::DisplayingResults);
    assert_eq!(assessment.session().last_average_ms, Some(150));
    assert_eq!(assessment.session().best_average_ms, Some(150));
    assert_eq!(region(&assessment, "assessment-last-average"), "LAST ─ 150 ms");
}

#[test]
fn average_is_rounded_to_nearest_millisecond() {
    let (mut assessment, clock) = testing::manual_assessment(config_with(2, 3), 5);

    testing::complete_run(&mut assessment, &clock, &[100.0, 101.0]);

    // 100.5 rounds half away from zero
    assert_eq!(assessment.session().last_average_ms, Some(101));
}

#[test]
fn best_average_is_minimum_across_runs() {
    let (mut assessment, clock) = testing::manual_assessment(config_with(2, 3), 42);
    let runs: [[f64; 2]; 3] = [[300.0, 300.0], [180.0, 220.0], [250.0, 250.0]];

    for (i, run) in runs.iter().enumerate() {
        if i > 0 {
            // Acknowledge results, then start again
            assessment.handle_activation();
            assert_eq!(assessment.state(), AssessmentState::AwaitingStart);
        }
        testing::complete_run(&mut assessment, &clock, run);
    }

    assert_eq!(assessment.session().last_average_ms, Some(250));
    assert_eq!(assessment.session().best_average_ms, Some(200));
    assert_eq!(region(&assessment, "assessment-best-average"), "BEST ─ 200 ms");
}

#[test]
fn restart_keeps_averages_but_resets_run() {
    let (mut assessment, clock) = testing::manual_assessment(config_with(1, 3), 9);
    testing::complete_run(&mut assessment, &clock, &[240.0]);

    assessment.handle_activation();

    let session = assessment.session();
    assert_eq!(assessment.state(), AssessmentState::AwaitingStart);
    assert_eq!(session.stage, 1);
    assert_eq!(session.strikes, 0);
    assert!(session.stage_times_ms.is_empty());
    assert_eq!(session.last_average_ms, Some(240));
    assert_eq!(assessment.display().body(), "Click to Start");
    assert_eq!(region(&assessment, "assessment-last-average"), "LAST ─ 240 ms");
}

#[test]
fn stage_counter_never_exceeds_total() {
    let (mut assessment, clock) = testing::manual_assessment(config_with(3, 3), 2);

    for reaction in [150.0, 160.0, 170.0] {
        testing::complete_stage(&mut assessment, &clock, reaction);
        assert!(assessment.session().stage <= assessment.total_stages());
    }
    assert_eq!(assessment.session().stage_times_ms.len(), 3);
}

// ---------------------------------------------------------------------------
// Strikes
// ---------------------------------------------------------------------------

#[test]
fn single_strike_limit_fails_immediately() {
    let (mut assessment, _) = testing::manual_assessment(config_with(5, 1), 3);

    jump_the_gun(&mut assessment);

    assert_eq!(assessment.state(), AssessmentState::DisplayingFailure);
    assert_eq!(assessment.session().strikes, 0);
    assert_eq!(assessment.display().body(), "Strike 1 / 1\n\nClick to Restart");
    assert_eq!(region(&assessment, "assessment-strikes"), "STRIKES ─ 1 / 1");
    assert_eq!(assessment.display().background(), HexColor::rgb(0xBF, 0x1F, 0x1F));
}

#[test]
fn strike_preserves_stage_and_times() {
    let (mut assessment, clock) = testing::manual_assessment(config_with(5, 3), 8);
    testing::complete_run(&mut assessment, &clock, &[210.0, 190.0]);

    jump_the_gun(&mut assessment);

    assert_eq!(assessment.state(), AssessmentState::DisplayingStrike);
    assert_eq!(assessment.session().stage, 3);
    assert_eq!(assessment.session().stage_times_ms, vec![210.0, 190.0]);

    // Continuing resumes the same stage
    testing::complete_stage(&mut assessment, &clock, 205.0);
    assert_eq!(assessment.session().stage_times_ms.len(), 3);
    assert_eq!(assessment.session().strikes, 1);
}

#[test]
fn no_stimulus_fires_after_strike() {
    let (mut assessment, clock) = testing::manual_assessment(config_with(5, 3), 13);

    jump_the_gun(&mut assessment);
    clock.advance(60_000.0);

    assert_eq!(testing::fire_due(&mut assessment), 0);
    assert_eq!(assessment.state(), AssessmentState::DisplayingStrike);
    assert_eq!(assessment.scheduler().pending_count(), 0);
}

#[test]
fn at_most_one_stimulus_pending() {
    let (mut assessment, _) = testing::manual_assessment(config_with(5, 10), 21);

    for _ in 0..5 {
        jump_the_gun(&mut assessment);
        assessment.handle_activation();
        assert!(assessment.scheduler().pending_count() <= 1);
    }
}

// ---------------------------------------------------------------------------
// Construction and faults
// ---------------------------------------------------------------------------

#[test]
fn missing_region_is_reported_before_painting() {
    let clock = ManualClock::new(0.0);
    let surface = ScreenSurface::with_regions(["assessment-stage"]);

    let result = ReactionAssessment::new(
        AssessmentConfig::default(),
        clock.clone(),
        TimerQueue::new(clock),
        surface,
        StdRng::seed_from_u64(0),
    );

    match result {
        Err(AssessmentError::MissingRegion(id)) => assert_eq!(id, "assessment-strikes"),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("construction should fail"),
    }
}

#[test]
fn display_fault_resets_to_start() {
    let config = config_with(3, 3);
    let clock = ManualClock::new(0.0);
    let mut assessment = ReactionAssessment::new(
        config.clone(),
        clock.clone(),
        TimerQueue::new(clock.clone()),
        FlakySurface::new(testing::surface_for(&config)),
        StdRng::seed_from_u64(4),
    )
    .unwrap();

    testing::complete_run(&mut assessment, &clock, &[120.0, 130.0]);
    assessment.handle_activation();
    assert_eq!(assessment.scheduler().pending_count(), 1);

    assessment.display_mut().set_failing(true);
    assessment.handle_activation(); // strike while the surface is down

    assert_eq!(assessment.state(), AssessmentState::AwaitingStart);
    assert_eq!(assessment.session().stage, 1);
    assert_eq!(assessment.scheduler().pending_count(), 0);

    // Once the surface recovers a new run starts normally
    assessment.display_mut().set_failing(false);
    testing::complete_run(&mut assessment, &clock, &[100.0, 100.0, 100.0]);
    assert_eq!(assessment.session().last_average_ms, Some(100));
}

// ---------------------------------------------------------------------------
// Refresh rate monitor
// ---------------------------------------------------------------------------

#[test]
fn monitor_reports_frames_per_second() {
    let (mut monitor, clock) = testing::manual_monitor();
    monitor.start();

    for k in 1..=60 {
        clock.set(k as f64 * 1000.0 / 60.0);
        for handle in monitor.frames_mut().take_pending() {
            monitor.on_frame(handle);
        }
    }

    assert_eq!(monitor.current_rate_hz(), 60);
    assert_eq!(
        monitor.display().region_text("assessment-refresh-rate"),
        Some("60 Hz")
    );
}

#[test]
fn monitor_without_frames_reports_nothing() {
    let (mut monitor, clock) = testing::manual_monitor();
    monitor.start();
    clock.advance(5000.0);

    assert_eq!(monitor.current_rate_hz(), 0);
    assert_eq!(
        monitor.display().region_text("assessment-refresh-rate"),
        Some("")
    );
}

// ---------------------------------------------------------------------------
// App pipeline
// ---------------------------------------------------------------------------

fn app() -> (App<ManualClock>, ManualClock) {
    let clock = ManualClock::new(0.0);
    let app = App::with_clock(Config::default(), clock.clone()).unwrap();
    (app, clock)
}

#[test]
fn app_runs_full_assessment_from_input() {
    let (mut app, clock) = app();
    let stages = app.config.assessment.total_stages;

    for _ in 0..stages {
        app.process_input(&click());
        clock.advance(app.config.assessment.max_delay_ms);
        assert_eq!(app.tick(), 1);
        clock.advance(250.0);
        app.process_input(&InputSignal::KeyDown(Key::Char(' ')));
    }

    assert_eq!(app.assessment.state(), AssessmentState::DisplayingResults);
    assert_eq!(app.assessment.session().last_average_ms, Some(250));
    assert_eq!(app.total_activations, u64::from(stages) * 2);
    assert_eq!(app.get_status(), Some("Run complete: 250 ms average"));
    assert_eq!(app.region_text("assessment-best-average"), "BEST ─ 250 ms");
}

#[test]
fn app_ignores_non_activation_keys() {
    let (mut app, _) = app();

    for key in [Key::Char('W'), Key::Char('x'), Key::Enter, Key::Other] {
        app.process_input(&InputSignal::KeyDown(key));
    }
    app.process_input(&InputSignal::PointerDown(PointerButton::Auxiliary));

    assert_eq!(app.total_activations, 0);
    assert_eq!(app.assessment.state(), AssessmentState::AwaitingStart);
}

#[test]
fn app_help_view_blocks_input_but_not_timers() {
    let (mut app, clock) = app();
    app.process_input(&click());

    app.toggle_help();
    assert_eq!(app.view, AppView::Help);
    clock.advance(app.config.assessment.max_delay_ms);
    assert_eq!(app.tick(), 1);
    assert_eq!(app.assessment.state(), AssessmentState::AwaitingResponse);

    // Activations are swallowed while help is open
    app.process_input(&click());
    assert_eq!(app.assessment.state(), AssessmentState::AwaitingResponse);
}

#[test]
fn app_monitor_shares_nothing_with_assessment() {
    let (mut app, clock) = app();
    for _ in 0..20 {
        clock.advance(50.0);
        app.frame_rendered();
    }

    assert_eq!(app.region_text("assessment-refresh-rate"), "20 Hz");
    assert_eq!(app.assessment.display().region_text("assessment-refresh-rate"), None);
    assert_eq!(app.assessment.display().body(), "Click to Start");
}
