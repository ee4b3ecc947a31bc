//! Device geometry provider.
//!
//! A static table of every supported device. Profiles are defined once and
//! never mutated; family traits (`is_tablet`, `has_notch`) are data on the
//! profile so no consumer ever inspects display names.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use vantage_common::error::{VantageError, VantageResult};

/// Closed set of supported devices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviceId {
    #[serde(rename = "iphone-16-pro-max")]
    Iphone16ProMax,
    #[serde(rename = "iphone-15-pro-max")]
    Iphone15ProMax,
    #[serde(rename = "iphone-8-plus")]
    Iphone8Plus,
    #[serde(rename = "ipad-pro-12-9")]
    IpadPro129,
    #[serde(rename = "pixel-9-pro")]
    Pixel9Pro,
}

/// A screen aspect ratio expressed as a reduced integer fraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AspectRatio {
    pub width: u32,
    pub height: u32,
}

/// Immutable physical description of one device.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceProfile {
    pub id: DeviceId,

    /// Human-readable model name.
    pub display_name: &'static str,

    /// Device-native screenshot resolution.
    pub pixel_width: u32,
    pub pixel_height: u32,

    /// Corner radius of the display itself, in native pixels. The bezel and
    /// chassis radii are larger and derived from this one.
    pub corner_radius: u32,

    /// Bezel thickness around the screen, in native pixels.
    pub bezel_width: u32,

    /// Documented real-world screen aspect ratio.
    pub aspect: AspectRatio,

    /// Tablets carry no side buttons or antenna bands.
    pub is_tablet: bool,

    /// Whether a sensor island is drawn at the top of the screen.
    pub has_notch: bool,
}

static DEVICE_PROFILES: [DeviceProfile; 5] = [
    DeviceProfile {
        id: DeviceId::Iphone16ProMax,
        display_name: "iPhone 16 Pro Max (6.9\")",
        pixel_width: 1320,
        pixel_height: 2868,
        corner_radius: 120,
        bezel_width: 20,
        aspect: AspectRatio {
            width: 110,
            height: 239,
        },
        is_tablet: false,
        has_notch: true,
    },
    DeviceProfile {
        id: DeviceId::Iphone15ProMax,
        display_name: "iPhone 15 Pro Max (6.7\")",
        pixel_width: 1290,
        pixel_height: 2796,
        corner_radius: 110,
        bezel_width: 24,
        aspect: AspectRatio {
            width: 215,
            height: 466,
        },
        is_tablet: false,
        has_notch: true,
    },
    DeviceProfile {
        id: DeviceId::Iphone8Plus,
        display_name: "iPhone 8 Plus (5.5\")",
        pixel_width: 1242,
        pixel_height: 2208,
        corner_radius: 0,
        bezel_width: 80,
        aspect: AspectRatio {
            width: 9,
            height: 16,
        },
        is_tablet: false,
        has_notch: false,
    },
    DeviceProfile {
        id: DeviceId::IpadPro129,
        display_name: "iPad Pro (12.9\")",
        pixel_width: 2048,
        pixel_height: 2732,
        corner_radius: 60,
        bezel_width: 40,
        aspect: AspectRatio {
            width: 512,
            height: 683,
        },
        is_tablet: true,
        has_notch: false,
    },
    DeviceProfile {
        id: DeviceId::Pixel9Pro,
        display_name: "Google Pixel 9 Pro",
        pixel_width: 1344,
        pixel_height: 2992,
        corner_radius: 100,
        bezel_width: 18,
        aspect: AspectRatio {
            width: 84,
            height: 187,
        },
        is_tablet: false,
        has_notch: false,
    },
];

impl DeviceId {
    pub const ALL: [DeviceId; 5] = [
        DeviceId::Iphone16ProMax,
        DeviceId::Iphone15ProMax,
        DeviceId::Iphone8Plus,
        DeviceId::IpadPro129,
        DeviceId::Pixel9Pro,
    ];

    /// Stable identifier used in configuration.
    pub fn slug(self) -> &'static str {
        match self {
            DeviceId::Iphone16ProMax => "iphone-16-pro-max",
            DeviceId::Iphone15ProMax => "iphone-15-pro-max",
            DeviceId::Iphone8Plus => "iphone-8-plus",
            DeviceId::IpadPro129 => "ipad-pro-12-9",
            DeviceId::Pixel9Pro => "pixel-9-pro",
        }
    }

    /// Profile for this device.
    pub fn profile(self) -> VantageResult<&'static DeviceProfile> {
        lookup(self)
    }

    /// Tablet-class devices are rendered without phone hardware chrome.
    pub fn is_tablet(self) -> bool {
        lookup(self).map(|p| p.is_tablet).unwrap_or(false)
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for DeviceId {
    type Err = VantageError;

    /// Accepts either the slug or the exact display name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        DEVICE_PROFILES
            .iter()
            .find(|p| p.id.slug() == needle || p.display_name == needle)
            .map(|p| p.id)
            .ok_or_else(|| VantageError::UnknownDevice { id: s.to_string() })
    }
}

/// Look up the profile of a device.
///
/// Fails only if the table and the enumeration drift apart.
pub fn lookup(id: DeviceId) -> VantageResult<&'static DeviceProfile> {
    DEVICE_PROFILES
        .iter()
        .find(|p| p.id == id)
        .ok_or_else(|| VantageError::UnknownDevice { id: id.to_string() })
}

/// Look up a device profile from a configuration string.
pub fn lookup_by_name(name: &str) -> VantageResult<&'static DeviceProfile> {
    lookup(name.parse()?)
}

/// All supported profiles in presentation order.
pub fn all_profiles() -> &'static [DeviceProfile] {
    &DEVICE_PROFILES
}

impl DeviceProfile {
    /// Width over height as a float.
    pub fn aspect_ratio(&self) -> f64 {
        self.pixel_width as f64 / self.pixel_height as f64
    }

    /// Whether the pixel dimensions match the documented aspect exactly.
    pub fn matches_documented_aspect(&self) -> bool {
        self.pixel_width as u64 * self.aspect.height as u64
            == self.pixel_height as u64 * self.aspect.width as u64
    }

    /// Height for a given width that keeps the native aspect.
    pub fn height_for_width(&self, width: f64) -> f64 {
        width * self.pixel_height as f64 / self.pixel_width as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gcd(a: u32, b: u32) -> u32 {
        if b == 0 {
            a
        } else {
            gcd(b, a % b)
        }
    }

    #[test]
    fn test_every_id_has_a_profile() {
        for id in DeviceId::ALL {
            let profile = lookup(id).unwrap();
            assert_eq!(profile.id, id);
        }
        assert_eq!(all_profiles().len(), DeviceId::ALL.len());
    }

    #[test]
    fn test_pixel_ratio_matches_documented_aspect() {
        for profile in all_profiles() {
            assert!(
                profile.matches_documented_aspect(),
                "{} does not match its documented aspect",
                profile.display_name
            );
            assert_eq!(
                gcd(profile.aspect.width, profile.aspect.height),
                1,
                "{} aspect is not reduced",
                profile.display_name
            );
        }
    }

    #[test]
    fn test_family_flags_are_data() {
        assert!(DeviceId::IpadPro129.is_tablet());
        assert!(!DeviceId::Pixel9Pro.is_tablet());
        assert!(lookup(DeviceId::Iphone16ProMax).unwrap().has_notch);
        assert!(lookup(DeviceId::Iphone15ProMax).unwrap().has_notch);
        assert!(!lookup(DeviceId::Iphone8Plus).unwrap().has_notch);
        assert!(!lookup(DeviceId::Pixel9Pro).unwrap().has_notch);
    }

    #[test]
    fn test_parse_slug_and_display_name() {
        assert_eq!(
            "iphone-8-plus".parse::<DeviceId>().unwrap(),
            DeviceId::Iphone8Plus
        );
        assert_eq!(
            "Google Pixel 9 Pro".parse::<DeviceId>().unwrap(),
            DeviceId::Pixel9Pro
        );
        assert_eq!(
            lookup_by_name("ipad-pro-12-9").unwrap().pixel_width,
            2048
        );
    }

    #[test]
    fn test_unknown_device_is_configuration_error() {
        let err = "Galaxy Fold".parse::<DeviceId>().unwrap_err();
        assert!(matches!(err, VantageError::UnknownDevice { ref id } if id == "Galaxy Fold"));
    }

    #[test]
    fn test_height_for_width_preserves_aspect() {
        let profile = lookup(DeviceId::Iphone8Plus).unwrap();
        assert!((profile.height_for_width(9.0) - 16.0).abs() < 1e-9);
    }
}
