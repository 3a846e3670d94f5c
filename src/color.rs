use palette::Srgb;
use serde::Serialize;

use crate::error::DashError;

// ---------------------------------------------------------------------------
// Colour names → hex
// ---------------------------------------------------------------------------

/// Resolve a CSS colour name (`"MediumPurple"`) or a `#rrggbb` string to
/// lowercase `#rrggbb`.
pub fn resolve(color: &str) -> Result<String, DashError> {
    let rgb: Srgb<u8> = if color.starts_with('#') {
        color
            .parse()
            .map_err(|_| DashError::InvalidColor(color.to_string()))?
    } else {
        palette::named::from_str(&color.to_ascii_lowercase())
            .ok_or_else(|| DashError::InvalidColor(color.to_string()))?
    };
    Ok(to_hex(rgb))
}

fn to_hex(rgb: Srgb<u8>) -> String {
    format!("#{:02x}{:02x}{:02x}", rgb.red, rgb.green, rgb.blue)
}

// ---------------------------------------------------------------------------
// Continuous colour scales
// ---------------------------------------------------------------------------

/// Colour stops over `0..=1`, serialized the way plotly.js expects a
/// `colorscale`: `[[0.0, "#0d0887"], ..., [1.0, "#f0f921"]]`.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct ColorScale {
    stops: Vec<(f64, String)>,
}

impl ColorScale {
    /// The sequential "Plasma" scale.
    pub fn plasma() -> Self {
        const PLASMA: [(f64, &str); 10] = [
            (0.0, "#0d0887"),
            (1.0 / 9.0, "#46039f"),
            (2.0 / 9.0, "#7201a8"),
            (3.0 / 9.0, "#9c179e"),
            (4.0 / 9.0, "#bd3786"),
            (5.0 / 9.0, "#d8576b"),
            (6.0 / 9.0, "#ed7953"),
            (7.0 / 9.0, "#fb9f3a"),
            (8.0 / 9.0, "#fdca26"),
            (1.0, "#f0f921"),
        ];
        Self {
            stops: PLASMA.iter().map(|&(t, c)| (t, c.to_string())).collect(),
        }
    }
}
