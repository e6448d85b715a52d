use super::*;

#[test]
fn elapsed_tracks_wall_clock_while_playing() {
    let c = PlaybackClock::started_at(1000.0);
    assert!(c.is_playing());
    assert_eq!(c.elapsed(1000.0), 0.0);
    assert_eq!(c.elapsed(1250.0), 250.0);
}

#[test]
fn pause_freezes_elapsed() {
    let mut c = PlaybackClock::started_at(0.0);
    c.pause(400.0);
    assert!(!c.is_playing());
    assert_eq!(c.elapsed(10_000.0), 400.0);
    c.pause(900.0);
    assert_eq!(c.elapsed(10_000.0), 400.0);
}

#[test]
fn resume_preserves_wrapped_position() {
    let mut c = PlaybackClock::started_at(0.0);
    c.pause(7_250.0);
    c.resume(20_000.0, 3000.0);
    assert!(c.is_playing());
    assert_eq!(c.elapsed(20_000.0), 1_250.0);
    assert_eq!(c.elapsed(20_100.0), 1_350.0);
}

#[test]
fn toggle_without_time_passing_is_idempotent() {
    let mut c = PlaybackClock::started_at(100.0);
    let before = c.elapsed(1_600.0) % 3000.0;
    c.toggle(1_600.0, 3000.0);
    c.toggle(1_600.0, 3000.0);
    assert!(c.is_playing());
    assert_eq!(c.elapsed(1_600.0) % 3000.0, before);
}

#[test]
fn restart_and_shift_move_origin() {
    let mut c = PlaybackClock::started_at(0.0);
    c.shift_origin(100.0);
    assert_eq!(c.elapsed(500.0), 400.0);
    c.pause(600.0);
    c.restart(2_000.0);
    assert!(c.is_playing());
    assert_eq!(c.origin_ms(), 2_000.0);
    assert_eq!(c.elapsed(2_000.0), 0.0);
}
