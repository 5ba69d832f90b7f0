use super::*;

#[test]
fn display_order_is_fixed() {
    let names: Vec<&str> = BODIES.iter().map(|b| b.name).collect();
    assert_eq!(
        names,
        [
            "Mercury", "Venus", "Earth", "Mars", "Jupiter", "Saturn", "Uranus", "Neptune"
        ]
    );
}

#[test]
fn orbit_radius_is_strictly_increasing() {
    for i in 0..BODIES.len() {
        assert_eq!(orbit_radius(i), 70.0 * (i as f64 + 1.0));
        if i > 0 {
            assert!(orbit_radius(i) > orbit_radius(i - 1));
        }
    }
}

#[test]
fn size_maps_volume_linearly() {
    for b in &BODIES {
        assert_eq!(b.size_for_volume(0.0), b.base_size);
        assert_eq!(b.size_for_volume(100.0), b.base_size + 50.0);
        for v in [10.0, 25.0, 50.0, 75.0] {
            assert!((b.size_for_volume(v) - (b.base_size + v / 2.0)).abs() < 1e-9);
        }
    }
}

#[test]
fn out_of_range_volume_passes_through() {
    let mercury = body("Mercury").unwrap();
    assert_eq!(mercury.size_for_volume(300.0), 160.0);
    assert_eq!(mercury.size_for_volume(-100.0), -40.0);
}

#[test]
fn orbit_angle_wraps_at_360() {
    assert_eq!(orbit_angle_deg(0, 0), 0.0);
    assert_eq!(orbit_angle_deg(0, 1), 45.0);
    assert_eq!(orbit_angle_deg(90, 0), 90.0);
    assert_eq!(orbit_angle_deg(350, 1), 35.0);
    assert_eq!(orbit_angle_deg(720, 7), 315.0);
    for f in [0u64, 1, 359, 360, 1000, u64::MAX] {
        for i in 0..BODIES.len() {
            let expected = ((f % 360) as f64 + 45.0 * i as f64) % 360.0;
            assert_eq!(orbit_angle_deg(f, i), expected);
        }
    }
}

#[test]
fn lookup_by_name() {
    assert_eq!(body("saturn").map(|b| b.base_size), Some(50.0));
    assert_eq!(orbit_index("Neptune"), Some(7));
    assert!(body("Pluto").is_none());
}

#[test]
fn only_gas_giants_have_rings() {
    let ringed: Vec<(&str, f64)> = BODIES
        .iter()
        .filter_map(|b| b.rings.map(|r| (b.name, r.tilt_deg)))
        .collect();
    assert_eq!(
        ringed,
        [
            ("Jupiter", 15.0),
            ("Saturn", 25.0),
            ("Uranus", 45.0),
            ("Neptune", 60.0)
        ]
    );
    assert!(!SUN.has_rings());
}
