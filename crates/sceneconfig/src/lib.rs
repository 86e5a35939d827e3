use std::collections::BTreeMap;
use std::f64::consts::{PI, TAU};
use std::fmt;
use std::time::Duration;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};

/// Scene that ships with the crate; reproduces the twisted ribbon showcase.
pub const BUILTIN_SCENE: &str = include_str!("../scenes/twisted_ribbon.toml");

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SceneConfig {
    pub version: u32,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default = "default_fps")]
    pub fps: f64,
    #[serde(default)]
    pub mesh: MeshSettings,
    #[serde(default)]
    pub camera: CameraSettings,
    #[serde(default)]
    pub parameters: BTreeMap<String, Scalar>,
    #[serde(default)]
    pub timeline: Vec<TimelineStep>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MeshSettings {
    #[serde(default = "default_resolution")]
    pub resolution: [usize; 2],
    #[serde(default = "default_u_range")]
    pub u_range: [Scalar; 2],
    #[serde(default = "default_v_range")]
    pub v_range: [Scalar; 2],
}

impl Default for MeshSettings {
    fn default() -> Self {
        Self {
            resolution: default_resolution(),
            u_range: default_u_range(),
            v_range: default_v_range(),
        }
    }
}

/// Initial view. Angles are in degrees.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CameraSettings {
    #[serde(default = "default_phi")]
    pub phi: f64,
    #[serde(default = "default_theta")]
    pub theta: f64,
    #[serde(default = "default_distance")]
    pub distance: f64,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            phi: default_phi(),
            theta: default_theta(),
            distance: default_distance(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TimelineStep {
    #[serde(default)]
    pub label: Option<String>,
    #[serde(deserialize_with = "deserialize_duration")]
    pub run_time: Duration,
    #[serde(default)]
    pub easing: EasingName,
    #[serde(default)]
    pub targets: BTreeMap<String, Scalar>,
    #[serde(default)]
    pub camera: Vec<CameraCueConfig>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum EasingName {
    #[default]
    Linear,
    Smoothstep,
    EaseInOut,
}

/// Camera command fired when its timeline step starts. Angles in degrees.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum CameraCueConfig {
    BeginOrbit {
        /// Radians per second.
        rate: f64,
    },
    StopOrbit,
    MoveTo {
        #[serde(default)]
        phi: Option<f64>,
        #[serde(default)]
        theta: Option<f64>,
        #[serde(default)]
        distance: Option<f64>,
        #[serde(default, deserialize_with = "deserialize_duration_opt")]
        duration: Option<Duration>,
    },
}

/// Float that also accepts angle expressions such as `"pi"`, `"-2tau"` or `"0.5*pi"`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Scalar(pub f64);

impl Scalar {
    pub fn value(self) -> f64 {
        self.0
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar(value)
    }
}

impl Serialize for Scalar {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.0)
    }
}

impl<'de> Deserialize<'de> for Scalar {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct Visitor;
        impl<'de> de::Visitor<'de> for Visitor {
            type Value = Scalar;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a number or an expression like 'pi', '-tau' or '2*pi'")
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                parse_scalar(v).map(Scalar).map_err(E::custom)
            }

            fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(Scalar(v as f64))
            }

            fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(Scalar(v as f64))
            }

            fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(Scalar(v))
            }
        }

        deserializer.deserialize_any(Visitor)
    }
}

pub fn parse_scalar(raw: &str) -> Result<f64, String> {
    let normalized: String = raw
        .trim()
        .to_ascii_lowercase()
        .chars()
        .filter(|ch| !ch.is_whitespace())
        .collect();
    if normalized.is_empty() {
        return Err("value must not be empty".to_string());
    }
    if let Ok(value) = normalized.parse::<f64>() {
        return Ok(value);
    }

    let (sign, body) = match normalized.strip_prefix('-') {
        Some(rest) => (-1.0, rest),
        None => (1.0, normalized.strip_prefix('+').unwrap_or(&normalized)),
    };
    let (body, divisor) = match body.split_once('/') {
        Some((lhs, rhs)) => {
            let divisor = rhs
                .parse::<f64>()
                .map_err(|_| format!("invalid divisor in '{raw}'"))?;
            if divisor == 0.0 {
                return Err(format!("division by zero in '{raw}'"));
            }
            (lhs, divisor)
        }
        None => (body, 1.0),
    };

    for (name, constant) in [("tau", TAU), ("pi", PI)] {
        if let Some(coefficient) = body.strip_suffix(name) {
            let coefficient = coefficient.strip_suffix('*').unwrap_or(coefficient);
            let factor = if coefficient.is_empty() {
                1.0
            } else {
                coefficient
                    .parse::<f64>()
                    .map_err(|_| format!("invalid coefficient in '{raw}'"))?
            };
            return Ok(sign * factor * constant / divisor);
        }
    }

    Err(format!(
        "invalid value '{raw}'; expected a number or an expression like 'pi', '-tau' or '2*pi'"
    ))
}

fn default_fps() -> f64 {
    30.0
}

fn default_resolution() -> [usize; 2] {
    [60, 45]
}

fn default_u_range() -> [Scalar; 2] {
    [Scalar(-PI), Scalar(PI)]
}

fn default_v_range() -> [Scalar; 2] {
    [Scalar(-2.0), Scalar(2.0)]
}

fn default_phi() -> f64 {
    60.0
}

fn default_theta() -> f64 {
    45.0
}

fn default_distance() -> f64 {
    12.0
}

fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    deserialize_duration_opt(deserializer)?
        .ok_or_else(|| de::Error::custom("run_time is required"))
}

fn deserialize_duration_opt<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
where
    D: Deserializer<'de>,
{
    struct Visitor;
    impl<'de> de::Visitor<'de> for Visitor {
        type Value = Option<Duration>;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            formatter.write_str("a duration as number of seconds or human-readable string")
        }

        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            humantime::parse_duration(v)
                .map(Some)
                .map_err(|err| E::custom(format!("invalid duration '{v}': {err}")))
        }

        fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(Duration::from_secs(v)))
        }

        fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            if v < 0 {
                return Err(E::custom("duration must be non-negative"));
            }
            Ok(Some(Duration::from_secs(v as u64)))
        }

        fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            if !v.is_finite() || v.is_sign_negative() {
                return Err(E::custom("duration must be a non-negative number of seconds"));
            }
            Duration::try_from_secs_f64(v)
                .map(Some)
                .map_err(|err| E::custom(format!("invalid duration {v}: {err}")))
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }
    }

    deserializer.deserialize_any(Visitor)
}

impl SceneConfig {
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let raw: SceneConfig = toml::from_str(input)?;
        raw.validate()?;
        Ok(raw)
    }

    pub fn builtin() -> Result<Self, ConfigError> {
        Self::from_toml_str(BUILTIN_SCENE)
    }

    pub fn parameter_defaults(&self) -> impl Iterator<Item = (&str, f64)> {
        self.parameters
            .iter()
            .map(|(name, value)| (name.as_str(), value.value()))
    }

    /// Sum of every step's `run_time`.
    pub fn total_run_time(&self) -> Duration {
        self.timeline
            .iter()
            .fold(Duration::ZERO, |total, step| total.saturating_add(step.run_time))
    }

    /// Structural checks. Resolution, domain, durations and parameter names are
    /// checked again by the engine when a session is built.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version != 1 {
            return Err(ConfigError::Invalid(format!(
                "unsupported scene version {}; expected 1",
                self.version
            )));
        }

        if !self.fps.is_finite() || self.fps <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "fps must be a positive number, got {}",
                self.fps
            )));
        }

        if self.timeline.is_empty() {
            return Err(ConfigError::Invalid(
                "scene must define at least one timeline step".into(),
            ));
        }

        for (name, value) in &self.parameters {
            if name.trim().is_empty() {
                return Err(ConfigError::Invalid(
                    "parameter names must not be empty".into(),
                ));
            }
            if !value.0.is_finite() {
                return Err(ConfigError::Invalid(format!(
                    "parameter '{name}' default must be finite"
                )));
            }
        }

        for bound in self.mesh.u_range.iter().chain(&self.mesh.v_range) {
            if !bound.0.is_finite() {
                return Err(ConfigError::Invalid(
                    "mesh ranges must be finite numbers".into(),
                ));
            }
        }

        if !self.camera.phi.is_finite() || !self.camera.theta.is_finite() {
            return Err(ConfigError::Invalid(
                "camera.phi and camera.theta must be finite".into(),
            ));
        }

        if !self.camera.distance.is_finite() || self.camera.distance <= 0.0 {
            return Err(ConfigError::Invalid(
                "camera.distance must be greater than zero".into(),
            ));
        }

        for (index, step) in self.timeline.iter().enumerate() {
            let step_name = step
                .label
                .clone()
                .unwrap_or_else(|| format!("#{index}"));

            for (name, value) in &step.targets {
                if !value.0.is_finite() {
                    return Err(ConfigError::Invalid(format!(
                        "timeline step '{step_name}' target '{name}' must be finite"
                    )));
                }
            }

            for cue in &step.camera {
                match cue {
                    CameraCueConfig::BeginOrbit { rate } if !rate.is_finite() => {
                        return Err(ConfigError::Invalid(format!(
                            "timeline step '{step_name}' orbit rate must be finite"
                        )));
                    }
                    CameraCueConfig::MoveTo { phi, theta, .. }
                        if phi.is_some_and(|angle| !angle.is_finite())
                            || theta.is_some_and(|angle| !angle.is_finite()) =>
                    {
                        return Err(ConfigError::Invalid(format!(
                            "timeline step '{step_name}' camera angles must be finite"
                        )));
                    }
                    CameraCueConfig::MoveTo { distance: Some(distance), .. }
                        if !distance.is_finite() || *distance <= 0.0 =>
                    {
                        return Err(ConfigError::Invalid(format!(
                            "timeline step '{step_name}' camera distance must be greater than zero"
                        )));
                    }
                    _ => {}
                }
            }
        }

        Ok(())
    }
}
