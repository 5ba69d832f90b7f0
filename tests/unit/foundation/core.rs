use super::*;

#[test]
fn frame_range_contains_boundaries() {
    let r = FrameRange::new(FrameIndex(2), FrameIndex(5)).unwrap();
    assert!(!r.contains(FrameIndex(1)));
    assert!(r.contains(FrameIndex(2)));
    assert!(r.contains(FrameIndex(4)));
    assert!(!r.contains(FrameIndex(5)));
    assert_eq!(r.len_frames(), 3);
}

#[test]
fn frame_range_rejects_inverted_bounds() {
    assert!(FrameRange::new(FrameIndex(5), FrameIndex(2)).is_err());
    assert!(
        FrameRange::new(FrameIndex(3), FrameIndex(3))
            .unwrap()
            .is_empty()
    );
}

#[test]
fn fps_converts_frames_to_secs() {
    let fps = Fps::new(30000, 1001).unwrap();
    assert!((fps.frames_to_secs(30) - 1.001).abs() < 1e-12);
    assert_eq!(fps.frames_to_secs(0), 0.0);
    assert!(Fps::new(0, 1).is_err());
    assert!(Fps::new(30, 0).is_err());
}

#[test]
fn canvas_center_tracks_dimensions() {
    let c = Canvas::new(800, 600).unwrap();
    assert_eq!(c.center(), Point::new(400.0, 300.0));
    let resized = Canvas::new(1024, 768).unwrap();
    assert_eq!(resized.center(), Point::new(512.0, 384.0));
    assert!(Canvas::new(0, 10).is_err());
}

#[test]
fn rgb_lerp_hits_endpoints() {
    let a = Rgb8::new(180, 180, 180);
    let b = Rgb8::new(100, 100, 100);
    assert_eq!(a.lerp(b, 0.0), a);
    assert_eq!(a.lerp(b, 1.0), b);
    assert_eq!(a.lerp(b, 0.5), Rgb8::new(140, 140, 140));
}

#[test]
fn rgba_lerp_interpolates_alpha() {
    let a = Rgba8::new(255, 255, 255, 80);
    let b = Rgba8::new(255, 255, 255, 10);
    assert_eq!(a.lerp(b, 0.5).a, 45);
}

#[test]
fn premul_scales_color_channels() {
    assert_eq!(Rgba8::WHITE.to_premul(), [255, 255, 255, 255]);
    assert_eq!(Rgba8::new(255, 0, 0, 0).to_premul(), [0, 0, 0, 0]);
    assert_eq!(Rgba8::new(255, 255, 255, 30).to_premul(), [30, 30, 30, 30]);
}
