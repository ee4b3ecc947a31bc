//! The editor session: one owned aggregate holding settings and records.
//!
//! Every change goes through a method here. Renderers and the export engine
//! only ever see an immutable [`SessionSnapshot`].

use std::sync::Arc;

use vantage_common::error::{VantageError, VantageResult};

use crate::color::Color;
use crate::copywriting::GeneratedCopy;
use crate::device::DeviceId;
use crate::image_source::{ImageSource, LoadedImage};
use crate::screenshot::{default_record, ScreenshotPatch, ScreenshotRecord, DEFAULT_POOL_SIZE};
use crate::theme::{
    find_preset, DeviceFinish, GradientAngle, TemplateStyle, TextColorPolicy, ThemeSettings,
};

/// Bounds for the number of screens in a session.
pub const MIN_SCREENS: usize = 1;
pub const MAX_SCREENS: usize = DEFAULT_POOL_SIZE;
pub const DEFAULT_SCREENS: usize = 5;

/// A single settings edit.
#[derive(Debug, Clone, PartialEq)]
pub enum SettingsUpdate {
    SetTemplate(TemplateStyle),
    SetDevice(DeviceId),
    SetFinish(DeviceFinish),
    SetPrimaryColor(Color),
    SetSecondaryColor(Color),
    SetTextColor(Color),
    SetGradientAngle(f32),
    /// Apply a named preset to both gradient stops.
    ApplyPreset(String),
    SetStatusBar(bool),
}

/// Immutable view handed to rendering and export.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub settings: ThemeSettings,
    pub records: Vec<ScreenshotRecord>,
}

/// Mutable editing state.
#[derive(Debug, Clone)]
pub struct EditorSession {
    settings: ThemeSettings,
    records: Vec<ScreenshotRecord>,
    text_color_policy: TextColorPolicy,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorSession {
    /// Fresh session: default settings and five default records.
    pub fn new() -> Self {
        Self {
            settings: ThemeSettings::default(),
            records: resize_records(&[], DEFAULT_SCREENS),
            text_color_policy: TextColorPolicy::default(),
        }
    }

    pub fn with_text_color_policy(mut self, policy: TextColorPolicy) -> Self {
        self.text_color_policy = policy;
        self
    }

    pub fn settings(&self) -> &ThemeSettings {
        &self.settings
    }

    pub fn records(&self) -> &[ScreenshotRecord] {
        &self.records
    }

    pub fn screen_count(&self) -> usize {
        self.records.len()
    }

    /// Apply one settings edit. On error the settings are unchanged.
    pub fn apply(&mut self, update: SettingsUpdate) -> VantageResult<()> {
        let s = &mut self.settings;
        match update {
            SettingsUpdate::SetTemplate(template) => s.template = template,
            SettingsUpdate::SetDevice(device) => {
                device.profile()?;
                s.device = device;
            }
            SettingsUpdate::SetFinish(finish) => s.device_finish = finish,
            SettingsUpdate::SetPrimaryColor(color) => s.primary_color = color,
            SettingsUpdate::SetSecondaryColor(color) => s.secondary_color = color,
            SettingsUpdate::SetTextColor(color) => {
                self.text_color_policy.check(color)?;
                s.text_color = color;
            }
            SettingsUpdate::SetGradientAngle(degrees) => {
                s.gradient_angle = GradientAngle::new(degrees)
            }
            SettingsUpdate::ApplyPreset(name) => {
                let preset = find_preset(&name)
                    .ok_or_else(|| VantageError::config(format!("unknown color preset: {name}")))?;
                s.primary_color = preset.primary;
                s.secondary_color = preset.secondary;
            }
            SettingsUpdate::SetStatusBar(show) => s.show_status_bar = show,
        }
        tracing::debug!(template = %s.template, device = %s.device, "Settings updated");
        Ok(())
    }

    /// Change the number of screens, clamped to `[1, 10]`.
    ///
    /// Returns the count actually applied. Records are repopulated by slot
    /// index: existing slots keep their content, new slots get defaults.
    pub fn set_screen_count(&mut self, count: usize) -> usize {
        let clamped = count.clamp(MIN_SCREENS, MAX_SCREENS);
        if clamped != count {
            tracing::debug!(requested = count, applied = clamped, "Screen count clamped");
        }
        self.records = resize_records(&self.records, clamped);
        clamped
    }

    /// Apply a partial edit to the record at `index`.
    pub fn update_screenshot(&mut self, index: usize, patch: ScreenshotPatch) -> VantageResult<()> {
        let len = self.records.len();
        let record = self
            .records
            .get_mut(index)
            .ok_or(VantageError::ScreenIndexOutOfRange { index, len })?;
        record.apply(patch);
        Ok(())
    }

    /// Attach a decoded image to the record at `index`.
    pub fn attach_image(&mut self, index: usize, image: LoadedImage) -> VantageResult<()> {
        self.update_screenshot(index, ScreenshotPatch::image(ImageSource::Loaded(image)))
    }

    /// Overwrite copy from generated entries, in order.
    ///
    /// Entry `i` targets record `i`. Empty fields keep the existing text;
    /// extra entries are ignored. Returns the number of records touched.
    pub fn apply_generated_copy(&mut self, copy: &[GeneratedCopy]) -> usize {
        let mut touched = 0;
        for (record, entry) in self.records.iter_mut().zip(copy) {
            let mut changed = false;
            if !entry.title.trim().is_empty() {
                record.title = entry.title.clone();
                changed = true;
            }
            if !entry.subtitle.trim().is_empty() {
                record.subtitle = entry.subtitle.clone();
                changed = true;
            }
            if changed {
                touched += 1;
            }
        }
        touched
    }

    /// Immutable copy of the current state.
    pub fn snapshot(&self) -> Arc<SessionSnapshot> {
        Arc::new(SessionSnapshot {
            settings: self.settings.clone(),
            records: self.records.clone(),
        })
    }
}

/// Records for `count` screens, keyed by slot index.
///
/// Slot `i` keeps `existing[i]` when present, otherwise the default record
/// for `i`. Shrinking discards trailing slots.
pub fn resize_records(existing: &[ScreenshotRecord], count: usize) -> Vec<ScreenshotRecord> {
    (0..DEFAULT_POOL_SIZE)
        .map(|i| {
            existing
                .get(i)
                .cloned()
                .unwrap_or_else(|| default_record(i))
        })
        .take(count)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_has_five_defaults() {
        let session = EditorSession::new();
        assert_eq!(session.screen_count(), 5);
        assert_eq!(session.records()[0].title, "Welcome to Your App");
        assert_eq!(session.records()[4], default_record(4));
        assert_eq!(session.settings(), &ThemeSettings::default());
    }

    #[test]
    fn test_screen_count_is_clamped() {
        let mut session = EditorSession::new();
        assert_eq!(session.set_screen_count(0), 1);
        assert_eq!(session.screen_count(), 1);
        assert_eq!(session.set_screen_count(42), 10);
        assert_eq!(session.screen_count(), 10);
    }

    #[test]
    fn test_grow_keeps_edits_and_fills_defaults() {
        let mut session = EditorSession::new();
        session
            .update_screenshot(1, ScreenshotPatch::title("Edited"))
            .unwrap();
        session.set_screen_count(7);
        assert_eq!(session.records()[1].title, "Edited");
        assert_eq!(session.records()[6], default_record(6));
    }

    #[test]
    fn test_shrink_then_grow_restores_defaults() {
        let mut session = EditorSession::new();
        session
            .update_screenshot(2, ScreenshotPatch::title("Lost"))
            .unwrap();
        session.set_screen_count(2);
        session.set_screen_count(3);
        assert_eq!(session.records()[2], default_record(2));
    }

    #[test]
    fn test_update_out_of_range() {
        let mut session = EditorSession::new();
        let err = session
            .update_screenshot(5, ScreenshotPatch::title("x"))
            .unwrap_err();
        assert!(matches!(
            err,
            VantageError::ScreenIndexOutOfRange { index: 5, len: 5 }
        ));
    }

    #[test]
    fn test_settings_updates() {
        let mut session = EditorSession::new();
        session
            .apply(SettingsUpdate::SetTemplate(TemplateStyle::Bento))
            .unwrap();
        session.apply(SettingsUpdate::SetGradientAngle(-45.0)).unwrap();
        session
            .apply(SettingsUpdate::ApplyPreset("Sunset Glow".into()))
            .unwrap();
        let s = session.settings();
        assert_eq!(s.template, TemplateStyle::Bento);
        assert_eq!(s.gradient_angle.degrees(), 315.0);
        assert_eq!(s.primary_color.to_hex(), "#f43f5e");
        assert_eq!(s.secondary_color.to_hex(), "#fb923c");
    }

    #[test]
    fn test_unknown_preset_leaves_settings() {
        let mut session = EditorSession::new();
        let before = session.settings().clone();
        assert!(session
            .apply(SettingsUpdate::ApplyPreset("Plaid".into()))
            .is_err());
        assert_eq!(session.settings(), &before);
    }

    #[test]
    fn test_swatch_policy_rejects_other_colors() {
        let mut session =
            EditorSession::new().with_text_color_policy(TextColorPolicy::standard_swatches());
        assert!(session
            .apply(SettingsUpdate::SetTextColor(Color::rgb(0xfa, 0xcc, 0x15)))
            .is_ok());
        assert!(session
            .apply(SettingsUpdate::SetTextColor(Color::rgb(1, 2, 3)))
            .is_err());
        assert_eq!(session.settings().text_color, Color::rgb(0xfa, 0xcc, 0x15));
    }

    #[test]
    fn test_generated_copy_skips_empty_fields() {
        let mut session = EditorSession::new();
        let touched = session.apply_generated_copy(&[
            GeneratedCopy::new("Fast", ""),
            GeneratedCopy::new("", ""),
            GeneratedCopy::new("", "Sub"),
            GeneratedCopy::new("Extra", "Ignored"),
        ]);
        assert_eq!(touched, 2);
        let records = session.records();
        assert_eq!(records[0].title, "Fast");
        assert_eq!(records[0].subtitle, default_record(0).subtitle);
        assert_eq!(records[1], default_record(1));
        assert_eq!(records[2].subtitle, "Sub");
    }

    #[test]
    fn test_snapshot_is_detached() {
        let mut session = EditorSession::new();
        let snapshot = session.snapshot();
        session
            .update_screenshot(0, ScreenshotPatch::title("Changed"))
            .unwrap();
        assert_eq!(snapshot.records[0].title, "Welcome to Your App");
    }
}
