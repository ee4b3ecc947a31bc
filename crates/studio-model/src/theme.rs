//! Theme settings: colors, gradient, device finish, template, and device.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use vantage_common::error::{VantageError, VantageResult};

use crate::color::Color;
use crate::device::{self, DeviceId, DeviceProfile};

/// Material palette applied to a device chassis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviceFinish {
    Titanium,
    #[serde(rename = "Space Black")]
    SpaceBlack,
    Silver,
}

impl DeviceFinish {
    pub const ALL: [DeviceFinish; 3] = [
        DeviceFinish::Titanium,
        DeviceFinish::SpaceBlack,
        DeviceFinish::Silver,
    ];

    pub fn name(self) -> &'static str {
        match self {
            DeviceFinish::Titanium => "Titanium",
            DeviceFinish::SpaceBlack => "Space Black",
            DeviceFinish::Silver => "Silver",
        }
    }
}

impl fmt::Display for DeviceFinish {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DeviceFinish {
    type Err = VantageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DeviceFinish::ALL
            .into_iter()
            .find(|f| f.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| VantageError::UnknownFinish { id: s.to_string() })
    }
}

/// Closed set of compositional layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateStyle {
    Classic,
    Bento,
    FloatingDuo,
    Isometric,
    Editorial,
    MinimalLuxe,
    DynamicBreak,
}

impl TemplateStyle {
    pub const ALL: [TemplateStyle; 7] = [
        TemplateStyle::Classic,
        TemplateStyle::Bento,
        TemplateStyle::FloatingDuo,
        TemplateStyle::Isometric,
        TemplateStyle::Editorial,
        TemplateStyle::MinimalLuxe,
        TemplateStyle::DynamicBreak,
    ];

    /// Stable identifier used in configuration.
    pub fn slug(self) -> &'static str {
        match self {
            TemplateStyle::Classic => "classic",
            TemplateStyle::Bento => "bento",
            TemplateStyle::FloatingDuo => "floating_duo",
            TemplateStyle::Isometric => "isometric",
            TemplateStyle::Editorial => "editorial",
            TemplateStyle::MinimalLuxe => "minimal_luxe",
            TemplateStyle::DynamicBreak => "dynamic_break",
        }
    }

    /// Name shown in the layout picker.
    pub fn display_name(self) -> &'static str {
        match self {
            TemplateStyle::Classic => "Classic Pro",
            TemplateStyle::Bento => "Glass Bento",
            TemplateStyle::FloatingDuo => "Floating Duo",
            TemplateStyle::Isometric => "Isometric 3D",
            TemplateStyle::Editorial => "Editorial Bold",
            TemplateStyle::MinimalLuxe => "Minimal Luxe",
            TemplateStyle::DynamicBreak => "Dynamic Breakout",
        }
    }
}

impl fmt::Display for TemplateStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for TemplateStyle {
    type Err = VantageError;

    /// Accepts the slug or the picker name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        TemplateStyle::ALL
            .into_iter()
            .find(|t| t.slug() == needle || t.display_name() == needle)
            .ok_or_else(|| VantageError::UnknownTemplate { id: s.to_string() })
    }
}

/// Gradient direction in CSS degrees, always within `[0, 360)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "f32", into = "f32")]
pub struct GradientAngle(f32);

impl GradientAngle {
    /// Wraps any finite angle into `[0, 360)`.
    pub fn new(degrees: f32) -> Self {
        if !degrees.is_finite() {
            return Self(0.0);
        }
        let wrapped = degrees.rem_euclid(360.0);
        // rem_euclid can round up to exactly 360.0 for tiny negative inputs
        Self(if wrapped >= 360.0 { 0.0 } else { wrapped })
    }

    pub fn degrees(self) -> f32 {
        self.0
    }
}

impl From<f32> for GradientAngle {
    fn from(value: f32) -> Self {
        Self::new(value)
    }
}

impl From<GradientAngle> for f32 {
    fn from(value: GradientAngle) -> Self {
        value.0
    }
}

/// Which typography colors a session accepts.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum TextColorPolicy {
    /// Any color.
    #[default]
    FreeForm,
    /// Only the listed swatches.
    Swatches(Vec<Color>),
}

impl TextColorPolicy {
    /// The swatch set offered by the compact editor layout.
    pub fn standard_swatches() -> Self {
        Self::Swatches(vec![
            Color::WHITE,
            Color::rgb(0x0f, 0x17, 0x2a),
            Color::rgb(0xfa, 0xcc, 0x15),
        ])
    }

    pub fn check(&self, color: Color) -> VantageResult<()> {
        match self {
            TextColorPolicy::FreeForm => Ok(()),
            TextColorPolicy::Swatches(allowed) if allowed.contains(&color) => Ok(()),
            TextColorPolicy::Swatches(_) => Err(VantageError::config(format!(
                "text color {color} is not one of the allowed swatches"
            ))),
        }
    }
}

/// A named gradient preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorPreset {
    pub name: &'static str,
    pub primary: Color,
    pub secondary: Color,
}

pub static COLOR_PRESETS: [ColorPreset; 6] = [
    ColorPreset {
        name: "Indigo Dream",
        primary: Color::rgb(0x4f, 0x46, 0xe5),
        secondary: Color::rgb(0x93, 0x33, 0xea),
    },
    ColorPreset {
        name: "Ocean Breeze",
        primary: Color::rgb(0x0e, 0xa5, 0xe9),
        secondary: Color::rgb(0x2d, 0xd4, 0xbf),
    },
    ColorPreset {
        name: "Sunset Glow",
        primary: Color::rgb(0xf4, 0x3f, 0x5e),
        secondary: Color::rgb(0xfb, 0x92, 0x3c),
    },
    ColorPreset {
        name: "Fresh Mint",
        primary: Color::rgb(0x10, 0xb9, 0x81),
        secondary: Color::rgb(0x3b, 0x82, 0xf6),
    },
    ColorPreset {
        name: "Classic Dark",
        primary: Color::rgb(0x1f, 0x29, 0x37),
        secondary: Color::rgb(0x4b, 0x55, 0x63),
    },
    ColorPreset {
        name: "Berry Mix",
        primary: Color::rgb(0xec, 0x48, 0x99),
        secondary: Color::rgb(0x8b, 0x5c, 0xf6),
    },
];

/// Find a preset by name (case-insensitive).
pub fn find_preset(name: &str) -> Option<&'static ColorPreset> {
    COLOR_PRESETS
        .iter()
        .find(|p| p.name.eq_ignore_ascii_case(name.trim()))
}

/// Visual settings shared by every screenshot of a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeSettings {
    /// First background gradient stop.
    pub primary_color: Color,

    /// Second background gradient stop.
    pub secondary_color: Color,

    /// Color of all overlay typography.
    pub text_color: Color,

    /// Background gradient direction.
    pub gradient_angle: GradientAngle,

    /// Chassis material.
    pub device_finish: DeviceFinish,

    /// Active layout.
    pub template: TemplateStyle,

    /// Active device.
    pub device: DeviceId,

    /// Whether frames carry a synthetic status bar.
    #[serde(default)]
    pub show_status_bar: bool,
}

impl Default for ThemeSettings {
    fn default() -> Self {
        Self {
            primary_color: Color::rgb(0x0c, 0x0c, 0x0e),
            secondary_color: Color::rgb(0x2d, 0x2d, 0x3a),
            text_color: Color::WHITE,
            gradient_angle: GradientAngle::new(145.0),
            device_finish: DeviceFinish::Titanium,
            template: TemplateStyle::Classic,
            device: DeviceId::Iphone16ProMax,
            show_status_bar: false,
        }
    }
}

impl ThemeSettings {
    /// Profile of the active device.
    pub fn device_profile(&self) -> VantageResult<&'static DeviceProfile> {
        device::lookup(self.device)
    }
}
