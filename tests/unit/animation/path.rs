use super::*;

#[test]
fn measures_polyline_length() {
    let p = MotionPath::from_svg("M0,0 L30,0 L30,40").unwrap();
    assert!((p.length() - 70.0).abs() < 1e-6);
    assert!((p.dash_length() - 70.0).abs() < 1e-6);
}

#[test]
fn point_at_walks_segments_by_arc_length() {
    let p = MotionPath::from_svg("M0,0 L30,0 L30,40").unwrap();
    let start = p.point_at(0.0).unwrap();
    assert!((start.x - 0.0).abs() < 1e-6 && (start.y - 0.0).abs() < 1e-6);

    // 35 units in: past the first 30-unit segment, 5 units down the second.
    let mid = p.point_at(0.5).unwrap();
    assert!((mid.x - 30.0).abs() < 1e-3);
    assert!((mid.y - 5.0).abs() < 1e-3);

    let end = p.point_at(1.0).unwrap();
    assert!((end.y - 40.0).abs() < 1e-3);
}

#[test]
fn degenerate_paths_fall_back() {
    let p = MotionPath::from_svg("M10,10").unwrap();
    assert_eq!(p.length(), 0.0);
    assert_eq!(p.dash_length(), FALLBACK_PATH_LENGTH);
    assert!(p.point_at(0.5).is_none());
}

#[test]
fn invalid_path_data_is_a_parse_error() {
    assert!(matches!(
        MotionPath::from_svg("M0,0 K10,10"),
        Err(PixoraError::Parse(_))
    ));
}
