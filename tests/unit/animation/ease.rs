use super::*;

#[test]
fn endpoints_are_stable() {
    for ease in EaseMode::ALL {
        assert_eq!(ease.apply(0.0), 0.0);
        assert_eq!(ease.apply(1.0), 1.0);
    }
}

#[test]
fn monotonic_spot_check() {
    for ease in EaseMode::ALL {
        let a = ease.apply(0.25);
        let b = ease.apply(0.5);
        let c = ease.apply(0.75);
        assert!(a < b, "{ease:?}");
        assert!(b < c, "{ease:?}");
    }
}

#[test]
fn quadratic_shapes() {
    assert_eq!(EaseMode::In.apply(0.5), 0.25);
    assert_eq!(EaseMode::Out.apply(0.5), 0.75);
    assert_eq!(EaseMode::InOut.apply(0.5), 0.5);
    assert_eq!(EaseMode::InOut.apply(0.25), 0.125);
    assert_eq!(EaseMode::OutIn.apply(0.5), 0.5);
}

#[test]
fn invert_swaps_in_and_out_only() {
    assert_eq!(EaseMode::In.invert(), EaseMode::Out);
    assert_eq!(EaseMode::Out.invert(), EaseMode::In);
    assert_eq!(EaseMode::Linear.invert(), EaseMode::Linear);
    assert_eq!(EaseMode::InOut.invert(), EaseMode::InOut);
    assert_eq!(EaseMode::OutIn.invert(), EaseMode::OutIn);
}

#[test]
fn parse_accepts_aliases() {
    assert_eq!("ease-in".parse::<EaseMode>().unwrap(), EaseMode::In);
    assert_eq!("Ease Out".parse::<EaseMode>().unwrap(), EaseMode::Out);
    assert_eq!("in_out".parse::<EaseMode>().unwrap(), EaseMode::InOut);
    assert!("bounce".parse::<EaseMode>().is_err());
    assert!("".parse::<EaseMode>().is_err());
}

#[test]
fn zero_strength_is_linear() {
    let d = EasingDescriptor {
        mode: EaseMode::In,
        path: EasingPath::Full,
        strength: 0.0,
    };
    assert_eq!(d.apply(0.3), 0.3);
}

#[test]
fn half_strength_blends() {
    let d = EasingDescriptor {
        mode: EaseMode::In,
        path: EasingPath::Full,
        strength: 0.5,
    };
    assert!((d.apply(0.5) - 0.375).abs() < 1e-12);
}

#[test]
fn partial_window_is_linear_outside_and_continuous() {
    let d = EasingDescriptor {
        mode: EaseMode::In,
        path: EasingPath::Partial {
            start: 0.5,
            end: 1.0,
        },
        strength: 1.0,
    };
    assert_eq!(d.apply(0.25), 0.25);
    assert_eq!(d.apply(0.5), 0.5);
    assert!((d.apply(0.75) - 0.625).abs() < 1e-12);
    assert_eq!(d.apply(1.0), 1.0);
}

#[test]
fn descriptor_deserializes_with_defaults() {
    let d: EasingDescriptor = serde_json::from_str(r#"{ "mode": "in_out" }"#).unwrap();
    assert_eq!(d.mode, EaseMode::InOut);
    assert_eq!(d.path, EasingPath::Full);
    assert_eq!(d.strength, 1.0);

    let d: EasingDescriptor =
        serde_json::from_str(r#"{ "mode": "out", "path": { "partial": { "start": 0.2, "end": 0.4 } } }"#)
            .unwrap();
    assert_eq!(
        d.path,
        EasingPath::Partial {
            start: 0.2,
            end: 0.4
        }
    );
}
