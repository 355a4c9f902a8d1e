use inkpad::{
    DrawingSurface, NormalizeOptions, Point, RasterImage, Rgba8, SurfaceConfig, normalize,
};

fn mix64(mut z: u64) -> u64 {
    // SplitMix64 mixing function.
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

fn digest_u64(bytes: &[u8]) -> u64 {
    let mut state = 0x9E37_79B9_7F4A_7C15u64;
    for chunk in bytes.chunks(8) {
        let mut v = 0u64;
        for (i, &b) in chunk.iter().enumerate() {
            v |= (b as u64) << (i * 8);
        }
        state = mix64(state ^ v);
    }
    state
}

fn blank_surface() -> DrawingSurface {
    DrawingSurface::new(SurfaceConfig::default()).unwrap()
}

fn background() -> RasterImage {
    RasterImage::filled(200, 200, Rgba8::WHITE.to_array())
}

fn diagonal(surface: &mut DrawingSurface) {
    surface.pointer_down(Point::new(10.0, 10.0));
    surface.pointer_move(Point::new(190.0, 190.0));
    surface.pointer_up();
}

#[test]
fn snapshot_dimensions_never_change() {
    let configs = [
        SurfaceConfig::default(),
        SurfaceConfig::with_size(37, 91),
        SurfaceConfig::with_size(1, 1),
    ];
    for config in configs {
        let (w, h) = (config.width, config.height);
        let mut s = DrawingSurface::new(config).unwrap();
        s.pointer_down(Point::new(-50.0, 3.0));
        s.pointer_move(Point::new(500.0, 500.0));
        s.pointer_move(Point::new(0.5, 0.5));
        s.pointer_up();

        let snap = s.snapshot().unwrap();
        assert_eq!((snap.width, snap.height), (w, h));
        assert_eq!(snap.data.len(), w as usize * h as usize * 4);
    }
}

#[test]
fn clear_is_complete_and_idempotent() {
    let mut s = blank_surface();
    diagonal(&mut s);
    assert_ne!(s.snapshot().unwrap(), background());

    s.clear();
    let once = s.snapshot().unwrap();
    assert_eq!(once, background());

    s.clear();
    assert_eq!(s.snapshot().unwrap(), once);
}

#[test]
fn blank_surface_normalizes_to_zeros() {
    let s = blank_surface();
    let t = normalize(&s.snapshot().unwrap(), 28, 28, &NormalizeOptions::default()).unwrap();
    assert_eq!(t.shape(), &[1, 28, 28, 1]);
    assert!(t.data().iter().all(|&v| v.abs() < 1e-6));
}

#[test]
fn cleared_diagonal_normalizes_like_blank() {
    let opts = NormalizeOptions::default();

    let mut s = blank_surface();
    diagonal(&mut s);
    let inked = normalize(&s.snapshot().unwrap(), 28, 28, &opts).unwrap();
    assert!(inked.data().iter().any(|&v| v > 0.9));

    s.set_revision(s.revision() + 1);
    let cleared = normalize(&s.snapshot().unwrap(), 28, 28, &opts).unwrap();
    let blank = normalize(&background(), 28, 28, &opts).unwrap();
    assert_eq!(cleared, blank);
}

#[test]
fn tap_without_move_leaves_background() {
    let mut s = blank_surface();
    s.pointer_down(Point::new(5.0, 5.0));
    s.pointer_up();
    assert_eq!(s.snapshot().unwrap(), background());
}

#[test]
fn normalize_is_deterministic_and_shape_stable() {
    let mut s = blank_surface();
    diagonal(&mut s);
    let snap = s.snapshot().unwrap();
    let opts = NormalizeOptions::default();

    for (w, h) in [(28, 28), (64, 32), (1, 1), (300, 250)] {
        let a = normalize(&snap, w, h, &opts).unwrap();
        let b = normalize(&snap, w, h, &opts).unwrap();
        assert_eq!(a.shape(), &[1, h as usize, w as usize, 1]);
        assert_eq!(a, b);
    }
}

#[test]
fn stroke_rendering_is_deterministic() {
    let render = || {
        let mut s = blank_surface();
        s.pointer_down(Point::new(30.0, 40.0));
        for i in 0..20 {
            let t = f64::from(i) * 0.3;
            s.pointer_move(Point::new(100.0 + 60.0 * t.cos(), 100.0 + 60.0 * t.sin()));
        }
        s.pointer_leave();
        s.snapshot().unwrap()
    };
    let a = render();
    let b = render();
    assert_eq!(digest_u64(&a.data), digest_u64(&b.data));
}

#[test]
fn line_style_follows_config() {
    let mut s = DrawingSurface::new(SurfaceConfig {
        line_color: Rgba8::opaque(255, 0, 0),
        line_width: 2.0,
        background_color: Rgba8::BLACK,
        ..SurfaceConfig::default()
    })
    .unwrap();
    s.pointer_down(Point::new(0.0, 100.5));
    s.pointer_move(Point::new(200.0, 100.5));
    s.pointer_up();

    let snap = s.snapshot().unwrap();
    assert_eq!(snap.pixel(100, 100), Some([255, 0, 0, 255]));
    // Thin line: a few rows away stays untouched.
    assert_eq!(snap.pixel(100, 96), Some([0, 0, 0, 255]));
}
