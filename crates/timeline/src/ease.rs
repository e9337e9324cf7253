use serde::{Deserialize, Serialize};
use std::f32::consts::PI;
use std::fmt;
use std::str::FromStr;

/// Easing curves, named after the power-family eases of tweening libraries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ease {
    /// No easing.
    #[default]
    Linear,
    /// Quadratic ease-in.
    Power1In,
    /// Quadratic ease-out.
    Power1Out,
    /// Quadratic ease-in-out.
    Power1InOut,
    /// Cubic ease-out.
    Power2Out,
    /// Half-cosine ease-in-out.
    SineInOut,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown ease '{0}' (expected one of: linear, power1_in, power1_out, power1_in_out, power2_out, sine_in_out)")]
pub struct ParseEaseError(pub String);

impl Ease {
    pub const ALL: [Ease; 6] = [
        Ease::Linear,
        Ease::Power1In,
        Ease::Power1Out,
        Ease::Power1InOut,
        Ease::Power2Out,
        Ease::SineInOut,
    ];

    /// Config name, as written in YAML/JSON.
    pub fn name(self) -> &'static str {
        match self {
            Ease::Linear => "linear",
            Ease::Power1In => "power1_in",
            Ease::Power1Out => "power1_out",
            Ease::Power1InOut => "power1_in_out",
            Ease::Power2Out => "power2_out",
            Ease::SineInOut => "sine_in_out",
        }
    }

    /// Evaluate at `t`. Input is clamped to `[0, 1]`; output is 0 at 0 and 1 at 1.
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Linear => t,
            Ease::Power1In => t * t,
            Ease::Power1Out => {
                let omt = 1.0 - t;
                1.0 - omt * omt
            }
            Ease::Power1InOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    let omt = 1.0 - t;
                    1.0 - 2.0 * omt * omt
                }
            }
            Ease::Power2Out => {
                let omt = 1.0 - t;
                1.0 - omt * omt * omt
            }
            Ease::SineInOut => 0.5 - 0.5 * (PI * t).cos(),
        }
    }
}

impl fmt::Display for Ease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Accepts the config names, case-insensitively, with `-` or `_`.
impl FromStr for Ease {
    type Err = ParseEaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('-', "_");
        Ease::ALL
            .into_iter()
            .find(|ease| ease.name() == wanted)
            .ok_or_else(|| ParseEaseError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Ease; 6] = Ease::ALL;

    #[test]
    fn endpoints_are_fixed() {
        for ease in ALL {
            assert!(ease.apply(0.0).abs() < 1e-6, "{ease:?} at 0");
            assert!((ease.apply(1.0) - 1.0).abs() < 1e-6, "{ease:?} at 1");
        }
    }

    #[test]
    fn input_is_clamped() {
        for ease in ALL {
            assert_eq!(ease.apply(-2.0), ease.apply(0.0));
            assert_eq!(ease.apply(3.0), ease.apply(1.0));
        }
    }

    #[test]
    fn ease_out_leads_linear() {
        assert_eq!(Ease::Power1Out.apply(0.5), 0.75);
        assert!(Ease::Power2Out.apply(0.25) > 0.25);
        assert_eq!(Ease::Power1In.apply(0.5), 0.25);
    }

    #[test]
    fn in_out_is_symmetric() {
        assert!((Ease::Power1InOut.apply(0.5) - 0.5).abs() < 1e-6);
        assert!((Ease::SineInOut.apply(0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn parses_config_names() {
        for ease in ALL {
            assert_eq!(ease.name().parse::<Ease>(), Ok(ease));
        }
        assert_eq!("Power1-Out".parse::<Ease>(), Ok(Ease::Power1Out));
        assert!("bounce".parse::<Ease>().is_err());
    }

    #[test]
    fn names_match_serde() {
        for ease in ALL {
            let json = serde_json::to_string(&ease).unwrap();
            assert_eq!(json, format!("\"{}\"", ease.name()));
        }
    }
}
