//! Behaviour of loaded geometries as seen by a transport loop.

use approx::assert_relative_eq;
use gemca::{load_from_str, GeoError, Point3, Ray, Vec3, Workspace, ZoneId};

fn ray(x: f64, y: f64, z: f64, dir: Vec3) -> Ray {
    Ray::new(Point3::new(x, y, z), dir)
}

/// One body inside a large world box, with an "in" and an "out" zone.
fn single(keyword: &str, params: &str) -> Workspace {
    let text = format!(
        "RPP world -1000 1000 -1000 1000 -1000 1000\n\
         {keyword} b {params}\n\
         END\n\
         in  +b\n\
         out +world -b\n\
         END\n\
         1 0\n\
         END\n"
    );
    load_from_str(&text).unwrap_or_else(|e| panic!("{keyword}: {e}"))
}

#[test]
fn test_every_body_contains_its_center() {
    let cases: &[(&str, &str, [f64; 3])] = &[
        ("SPH", "0 0 0 5", [0.0, 0.0, 0.0]),
        ("WED", "0 0 0  0 0 10  10 0 0  0 10 0", [2.5, 2.5, 5.0]),
        (
            "ARB",
            "0 0 0  10 0 0  10 10 0  0 10 0  0 0 10  10 0 10  10 10 10  0 10 10",
            [5.0, 5.0, 5.0],
        ),
        (
            "ARB",
            "0 0 0  10 0 0  10 10 0  0 10 0  0 0 10  10 0 10  10 10 10  0 10 10  \
             4321 5678 1265 2376 1485 3487",
            [5.0, 5.0, 5.0],
        ),
        (
            "ARB",
            "0 0 0  10 0 0  10 10 0  0 10 0  0 0 10  10 0 10  10 10 10  0 10 10  1234",
            [5.0, 5.0, 5.0],
        ),
        ("BOX", "0 0 0  10 0 0  0 10 0  0 0 10", [5.0, 5.0, 5.0]),
        ("RPP", "0 10 0 10 0 10", [5.0, 5.0, 5.0]),
        ("RCC", "0 0 0  0 0 10  3", [0.0, 0.0, 5.0]),
        ("REC", "0 0 0  0 0 10  2 0 0  0 4 0", [0.0, 0.0, 5.0]),
        ("TRC", "0 0 0  0 0 10  5 2", [0.0, 0.0, 5.0]),
        ("ELL", "0 0 0  0 0 2  5 0 0  0 3 0", [0.0, 0.0, 0.0]),
        ("YZP", "5", [0.0, 0.0, 0.0]),
        ("XZP", "5", [0.0, 0.0, 0.0]),
        ("XYP", "5", [0.0, 0.0, 0.0]),
        ("PLA", "1 1 0  5 5 0", [0.0, 0.0, 0.0]),
    ];
    for (keyword, params, [x, y, z]) in cases {
        let ws = single(keyword, params);
        assert_eq!(
            ws.zone_of(&ray(*x, *y, *z, Vec3::z())),
            Some(ZoneId(1)),
            "{keyword} center"
        );
        assert_eq!(
            ws.zone_of(&ray(500.0, 500.0, 500.0, Vec3::z())),
            Some(ZoneId(2)),
            "{keyword} far point"
        );
    }
}

#[test]
fn test_sphere_distance_from_outside() {
    let ws = single("SPH", "10 0 0 4");
    for range in [20.0, 55.5, 300.0] {
        let r = ray(10.0 - range, 0.0, 0.0, Vec3::x());
        assert_eq!(ws.zone_of(&r), Some(ZoneId(2)));
        assert_relative_eq!(ws.distance_to_boundary(ZoneId(2), &r), range - 4.0, epsilon = 1e-9);
    }
}

#[test]
fn test_rpp_inside_outside_and_distance() {
    let ws = single("RPP", "0 10 0 10 0 10");
    assert_eq!(ws.zone_of(&ray(5.0, 5.0, 5.0, Vec3::x())), Some(ZoneId(1)));
    assert_eq!(ws.zone_of(&ray(15.0, 5.0, 5.0, Vec3::x())), Some(ZoneId(2)));

    let r = ray(-5.0, 5.0, 5.0, Vec3::x());
    assert_relative_eq!(ws.distance_to_boundary(ZoneId(2), &r), 5.0, epsilon = 1e-9);
    let body = &ws.bodies()[1];
    assert_relative_eq!(body.distance(&r, &ws.config().tolerance), 5.0, epsilon = 1e-9);
}

#[test]
fn test_csg_truth_table() {
    let ws = load_from_str(
        "SPH A -10 0 0 3\n\
         SPH B 10 0 0 3\n\
         END\n\
         union +A | +B\n\
         both  +A +B\n\
         a_b   +A -B\n\
         b_a   +B -A\n\
         END\n\
         END\n",
    )
    .unwrap();
    let only_a = ray(-10.0, 0.0, 0.0, Vec3::x());
    let inside: Vec<bool> = ws
        .zones()
        .iter()
        .map(|z| ws.is_inside(z.id, &only_a))
        .collect();
    assert_eq!(inside, vec![true, false, true, false]);
}

#[test]
fn test_numbered_bodies_mixed_expression() {
    let ws = load_from_str(
        "SPH 1 0 0 0 5\n\
         SPH 2 3 0 0 1\n\
         SPH 3 20 0 0 2\n\
         END\n\
         z +1-2|+3\n\
         END\n\
         END\n",
    )
    .unwrap();
    let z = ZoneId(1);
    assert!(ws.is_inside(z, &ray(-2.0, 0.0, 0.0, Vec3::x())));
    assert!(!ws.is_inside(z, &ray(3.0, 0.0, 0.0, Vec3::x())));
    assert!(ws.is_inside(z, &ray(20.0, 0.0, 0.0, Vec3::x())));
    assert!(!ws.is_inside(z, &ray(10.0, 0.0, 0.0, Vec3::x())));
}

#[test]
fn test_malformed_zones_rejected_at_load() {
    let bodies = "SPH a 0 0 0 1\nSPH b 0 0 0 2\nEND\n";
    let unbalanced = load_from_str(&format!("{bodies}z +b -(+a\nEND\nEND\n"));
    assert!(matches!(unbalanced, Err(GeoError::Zone { line: 4, .. })));
    let undefined = load_from_str(&format!("{bodies}z +b -c\nEND\nEND\n"));
    assert!(matches!(undefined, Err(GeoError::Zone { ref token, .. }) if token == "c"));
}

const LAYERS: &str = "\
* three slabs and a sphere along X
RPP world -100 100 -100 100 -100 100
RPP s1   0 10 -50 50 -50 50
RPP s2  10 20 -50 50 -50 50
RPP s3  30 40 -50 50 -50 50
SPH ball 60 0 0 5
END
slab1  +s1
slab2  +s2
slab3  +s3
ball   +ball
air    +world -s1 -s2 -s3 -ball
END
ASSIGNMAT 1 slab1 slab3
ASSIGNMAT 2 ball
END
";

#[test]
fn test_exit_point_lies_in_another_zone() {
    let ws = load_from_str(LAYERS).unwrap();
    let mut r = ray(-50.0, 1.0, 2.0, Vec3::new(1.0, 0.1, 0.0));
    for _ in 0..6 {
        let zone = ws.zone_of(&r).unwrap();
        let d = ws.distance_to_boundary(zone, &r);
        assert!(d.is_finite() && d > 0.0);
        r = r.advanced(d);
        assert_ne!(ws.zone_of(&r), Some(zone));
        if ws.zone_of(&r).is_none() {
            break;
        }
    }
}

#[test]
fn test_track_lengths_sum_to_path_length() {
    let ws = load_from_str(LAYERS).unwrap();
    let start = Point3::new(-50.0, 0.0, 0.0);
    let segments = ws.trace(&Ray::new(start, Vec3::x()), 32);

    let zones: Vec<usize> = segments.iter().map(|s| s.zone.0).collect();
    assert_eq!(zones, vec![5, 1, 2, 5, 3, 5, 4, 5]);

    let total: f64 = segments.iter().map(|s| s.length).sum();
    // The ray leaves the world box at x = 100.
    assert_relative_eq!(total, 150.0, epsilon = 1e-6);
    assert_relative_eq!(segments[6].length, 10.0, epsilon = 1e-6);
}

/// Slabs and a sphere of radius 1234.567 a million units from the origin,
/// where rounding in the surface values is well above the tolerance.
const DISTANT: &str = "\
RPP world  998000 1010000 -5000 5000 -5000 5000
RPP s1    1000000 1000100.25 -4000 4000 -4000 4000
RPP s2    1000100.25 1000200.5 -4000 4000 -4000 4000
SPH ball  1003000.3 0.1 -0.2 1234.567
END
slab1  +s1
slab2  +s2
ball   +ball
air    +world -s1 -s2 -ball
END
END
";

/// Offsets spread over a disc of radius 1100 around the sphere axis.
fn disc_offsets(n: usize) -> impl Iterator<Item = (f64, f64)> {
    (0..n).map(move |i| {
        let rho = 1100.0 * ((i as f64 + 0.5) / n as f64).sqrt();
        let phi = 2.399_963 * i as f64;
        (rho * phi.cos(), rho * phi.sin())
    })
}

#[test]
fn test_large_sphere_crossings_have_finite_lengths() {
    let ws = load_from_str(
        "RPP world -5000 5000 -5000 5000 -5000 5000\n\
         SPH ball 0.3 0.1 -0.2 1234.567\n\
         END\n\
         ball +ball\n\
         out  +world -ball\n\
         END\n\
         END\n",
    )
    .unwrap();
    let r2 = 1234.567_f64 * 1234.567;
    for (dy, dz) in disc_offsets(200) {
        let start = Point3::new(-3000.0, 0.1 + dy, -0.2 + dz);
        let segments = ws.trace(&Ray::new(start, Vec3::x()), 8);

        let zones: Vec<usize> = segments.iter().map(|s| s.zone.0).collect();
        assert_eq!(zones, vec![2, 1, 2], "offset ({dy}, {dz})");
        assert!(segments.iter().all(|s| s.length.is_finite()), "{segments:?}");

        let chord = 2.0 * (r2 - dy * dy - dz * dz).sqrt();
        assert_relative_eq!(segments[1].length, chord, epsilon = 1e-6);
        let total: f64 = segments.iter().map(|s| s.length).sum();
        assert_relative_eq!(total, 8000.0, epsilon = 1e-6);
    }
}

#[test]
fn test_track_lengths_sum_to_path_length_far_from_origin() {
    let ws = load_from_str(DISTANT).unwrap();
    let r2 = 1234.567_f64 * 1234.567;
    for (dy, dz) in disc_offsets(50) {
        let start = Point3::new(998500.0, 0.1 + dy, -0.2 + dz);
        let segments = ws.trace(&Ray::new(start, Vec3::x()), 16);

        let zones: Vec<usize> = segments.iter().map(|s| s.zone.0).collect();
        assert_eq!(zones, vec![4, 1, 2, 4, 3, 4], "offset ({dy}, {dz})");

        assert_relative_eq!(segments[1].length, 100.25, epsilon = 1e-6);
        assert_relative_eq!(segments[2].length, 100.25, epsilon = 1e-6);
        let chord = 2.0 * (r2 - dy * dy - dz * dz).sqrt();
        assert_relative_eq!(segments[4].length, chord, epsilon = 1e-6);

        let total: f64 = segments.iter().map(|s| s.length).sum();
        // The ray leaves the world box at x = 1010000.
        assert_relative_eq!(total, 11500.0, epsilon = 1e-5);
    }
}

#[test]
fn test_exit_point_lies_in_another_zone_far_from_origin() {
    let ws = load_from_str(DISTANT).unwrap();
    let dir = Vec3::new(1.0, 0.01, -0.02);
    for (dy, dz) in disc_offsets(20).map(|(y, z)| (0.5 * y, 0.5 * z)) {
        let mut r = ray(998500.0, dy, dz, dir);
        let mut visited = Vec::new();
        while let Some(zone) = ws.zone_of(&r) {
            visited.push(zone.0);
            assert!(visited.len() <= 6, "{visited:?}");
            let d = ws.distance_to_boundary(zone, &r);
            assert!(d.is_finite() && d > 0.0, "{visited:?} at {:?}", r.origin);
            r = r.advanced(d);
            assert_ne!(ws.zone_of(&r), Some(zone));
        }
        assert_eq!(visited, vec![4, 1, 2, 4, 3, 4]);
    }
}

#[test]
fn test_media_from_directives() {
    let ws = load_from_str(LAYERS).unwrap();
    let media: Vec<u32> = ws.zones().iter().map(|z| z.medium).collect();
    assert_eq!(media, vec![1, 1, 1, 2, 0]);
}

#[test]
fn test_facade_functions() {
    let ws = load_from_str(LAYERS).unwrap();
    let r = ray(15.0, 0.0, 0.0, Vec3::x());
    assert_eq!(gemca::zone_of(&ws, &r), Some(ZoneId(2)));
    assert_eq!(gemca::zone_index(&ws, &r), Some(1));
    assert_relative_eq!(gemca::distance_to_boundary(&ws, ZoneId(2), &r), 5.0, epsilon = 1e-9);
    assert_eq!(gemca::distance_to_boundary(&ws, ZoneId(1), &r), 0.0);
}

#[test]
fn test_workspace_shared_across_threads() {
    let ws = load_from_str(LAYERS).unwrap();
    std::thread::scope(|s| {
        for i in 0..4 {
            let ws = &ws;
            s.spawn(move || {
                let r = ray(-50.0 + i as f64, 0.0, 0.0, Vec3::x());
                let total: f64 = ws.trace(&r, 32).iter().map(|seg| seg.length).sum();
                assert_relative_eq!(total, 150.0 - i as f64, epsilon = 1e-6);
            });
        }
    });
}
