use crate::{ParameterSnapshot, Point3};

/// Parametric surface `f(u, v, params) -> (x, y, z)`.
///
/// Implementations must be pure: the same inputs always produce the same point.
/// Plain functions and closures with the matching signature implement this trait.
pub trait Surface {
    fn evaluate(&self, u: f64, v: f64, params: &ParameterSnapshot) -> Point3;

    /// Parameter names this surface reads. Sessions refuse to start when one
    /// of these is not registered.
    fn parameters(&self) -> &[&'static str] {
        &[]
    }
}

impl<F> Surface for F
where
    F: Fn(f64, f64, &ParameterSnapshot) -> Point3,
{
    fn evaluate(&self, u: f64, v: f64, params: &ParameterSnapshot) -> Point3 {
        self(u, v, params)
    }
}

/// Twisted ribbon looping around the y axis, driven by five parameters.
#[derive(Debug, Clone, Copy, Default)]
pub struct TwistedRibbon;

impl TwistedRibbon {
    pub const TWIST_AMPLITUDE: &'static str = "twist_amplitude";
    pub const WAVE_FREQUENCY: &'static str = "wave_frequency";
    pub const RIBBON_WIDTH: &'static str = "ribbon_width";
    pub const CURVATURE_INTENSITY: &'static str = "curvature_intensity";
    pub const TIME: &'static str = "time_param";

    const PARAMETERS: [&'static str; 5] = [
        Self::TWIST_AMPLITUDE,
        Self::WAVE_FREQUENCY,
        Self::RIBBON_WIDTH,
        Self::CURVATURE_INTENSITY,
        Self::TIME,
    ];

    /// Resting values for each parameter, in declaration order.
    pub fn defaults() -> [(&'static str, f64); 5] {
        [
            (Self::TWIST_AMPLITUDE, 1.5),
            (Self::WAVE_FREQUENCY, 2.0),
            (Self::RIBBON_WIDTH, 0.8),
            (Self::CURVATURE_INTENSITY, 1.2),
            (Self::TIME, 0.0),
        ]
    }
}

impl Surface for TwistedRibbon {
    fn evaluate(&self, u: f64, v: f64, params: &ParameterSnapshot) -> Point3 {
        let twist_amp = params.value_or(Self::TWIST_AMPLITUDE, 1.5);
        let wave_freq = params.value_or(Self::WAVE_FREQUENCY, 2.0);
        let width = params.value_or(Self::RIBBON_WIDTH, 0.8);
        let curvature = params.value_or(Self::CURVATURE_INTENSITY, 1.2);
        let time = params.value_or(Self::TIME, 0.0);

        let twist = twist_amp * (wave_freq * u + time).sin();
        let width_mod = width * (1.0 + 0.3 * (u * 3.0).sin());
        let height_mod = curvature * (u * 1.5).cos() * (1.0 + 0.2 * v * v);
        let radial = 2.0 + v * (u * 0.5 + twist).cos();

        Point3 {
            x: radial * u.cos() + 0.5 * (u * wave_freq + time * 0.5).sin() * width_mod,
            y: height_mod
                + v * (u * 0.5 + twist).sin() * 0.5
                + 0.3 * (time + u * 2.0).sin() * 0.5,
            z: radial * u.sin() + 0.3 * (u * wave_freq + time * 0.3).cos() * width_mod,
        }
    }

    fn parameters(&self) -> &[&'static str] {
        &Self::PARAMETERS
    }
}
