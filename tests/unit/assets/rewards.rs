use super::*;

const CSV: &str = "frame,r1,r2,r3\n0,0.1,0.2,0.3\n2,0.9,0.8,0.7\n\n1, 0.5 ,0.4,0.6\n";

#[test]
fn parses_rows_skipping_header_and_blank_lines() {
    let t = RewardTable::parse(CSV, 3).unwrap();
    assert_eq!(t.frame_count(), 3);
    assert_eq!(t.rewards(0), &[0.1, 0.2, 0.3]);
    assert_eq!(t.rewards(1), &[0.5, 0.4, 0.6]);
    assert_eq!(t.rewards(2), &[0.9, 0.8, 0.7]);
}

#[test]
fn missing_frames_are_neutral() {
    let t = RewardTable::parse("frame,a,b\n3,0.2,0.4\n", 2).unwrap();
    assert_eq!(t.frame_count(), 1);
    assert_eq!(t.rewards(0), &[0.5; 2]);
    assert_eq!(t.rewards(99), &[0.5; 2]);
    assert_eq!(t.rewards(3), &[0.2, 0.4]);
    assert_eq!(RewardTable::neutral(2).rewards(0), &[0.5, 0.5]);
}

#[test]
fn malformed_rows_are_asset_errors() {
    assert!(matches!(
        RewardTable::parse("frame,a\nx,0.1\n", 1),
        Err(ChoreoError::Asset(_))
    ));
    assert!(RewardTable::parse("frame,a\n0,abc\n", 1).is_err());
}

#[test]
fn huge_frame_indices_do_not_allocate() {
    let t = RewardTable::parse("frame,a\n18446744073709551615,0.3\n1000000000,0.7\n", 1).unwrap();
    assert_eq!(t.frame_count(), 2);
    assert_eq!(t.rewards(usize::MAX), &[0.3]);
    assert_eq!(t.rewards(1_000_000_000), &[0.7]);
    assert_eq!(t.rewards(5), &[0.5]);
    assert!(RewardTable::parse("frame,a\n18446744073709551616,0.3\n", 1).is_err());
}

#[test]
fn rows_must_match_the_reward_count() {
    assert!(matches!(
        RewardTable::parse("frame,r1\n2,0.3,0.9,0.1\n", 1),
        Err(ChoreoError::Asset(_))
    ));
    assert!(RewardTable::parse("frame,r1,r2,r3\n2,0.3\n", 3).is_err());
    assert!(RewardTable::parse("frame\n2\n", 1).is_err());
}

#[test]
fn frame_window_clips_to_sequence() {
    assert_eq!(frame_window(0, 5, 200), Some(0..=5));
    assert_eq!(frame_window(100, 5, 200), Some(95..=105));
    assert_eq!(frame_window(198, 5, 200), Some(193..=199));
    assert_eq!(frame_window(500, 5, 200), Some(194..=199));
    assert_eq!(frame_window(0, 5, 0), None);
}

#[test]
fn frame_names_are_zero_padded() {
    assert_eq!(frame_file_name(7), "frame_0007.jpg");
    assert_eq!(frame_file_name(199), "frame_0199.jpg");
}
