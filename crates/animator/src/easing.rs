use sceneconfig::EasingName;

/// Maps normalised progress `t` in `[0, 1]` to eased progress with
/// `f(0) = 0` and `f(1) = 1`.
#[derive(Debug, Clone, Copy, Default)]
pub enum Easing {
    #[default]
    Linear,
    Smoothstep,
    EaseInOut,
    Custom(fn(f64) -> f64),
}

impl Easing {
    pub fn sample(self, t: f64) -> f64 {
        let clamped = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => clamped,
            Easing::Smoothstep => clamped * clamped * (3.0 - 2.0 * clamped),
            Easing::EaseInOut => {
                if clamped < 0.5 {
                    2.0 * clamped * clamped
                } else {
                    -1.0 + (4.0 - 2.0 * clamped) * clamped
                }
            }
            Easing::Custom(curve) => curve(clamped),
        }
    }
}

impl From<EasingName> for Easing {
    fn from(name: EasingName) -> Self {
        match name {
            EasingName::Linear => Easing::Linear,
            EasingName::Smoothstep => Easing::Smoothstep,
            EasingName::EaseInOut => Easing::EaseInOut,
        }
    }
}

pub fn lerp(start: f64, end: f64, t: f64) -> f64 {
    start + (end - start) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_curve_is_identity_on_unit_interval() {
        for step in 0..=10 {
            let t = step as f64 / 10.0;
            assert_eq!(Easing::Linear.sample(t), t);
        }
        assert_eq!(Easing::Linear.sample(-0.5), 0.0);
        assert_eq!(Easing::Linear.sample(1.5), 1.0);
    }

    #[test]
    fn smoothstep_matches_expected_values() {
        let curve = Easing::Smoothstep;
        assert!((curve.sample(0.0) - 0.0).abs() < 1e-12);
        assert!((curve.sample(0.5) - 0.5).abs() < 1e-12);
        assert!((curve.sample(1.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn ease_in_out_accelerates_then_decelerates() {
        let curve = Easing::EaseInOut;
        let first = curve.sample(0.25);
        let mid = curve.sample(0.5);
        let last = curve.sample(0.75);
        assert!(first < mid);
        assert!(last > mid);
        assert!((curve.sample(0.0) - 0.0).abs() < 1e-12);
        assert!((curve.sample(1.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn custom_curves_receive_clamped_progress() {
        fn square(t: f64) -> f64 {
            t * t
        }
        let curve = Easing::Custom(square);
        assert_eq!(curve.sample(0.5), 0.25);
        assert_eq!(curve.sample(2.0), 1.0);
    }

    #[test]
    fn lerp_hits_both_endpoints() {
        assert_eq!(lerp(2.0, 6.0, 0.0), 2.0);
        assert_eq!(lerp(2.0, 6.0, 0.25), 3.0);
        assert_eq!(lerp(2.0, 6.0, 1.0), 6.0);
    }
}
