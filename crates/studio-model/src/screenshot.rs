//! Per-asset screenshot records.

use crate::image_source::ImageSource;

/// Size of the default record pool. Sessions never hold more screens.
pub const DEFAULT_POOL_SIZE: usize = 10;

/// Copy and image for one exported screenshot.
#[derive(Debug, Clone, PartialEq)]
pub struct ScreenshotRecord {
    /// Stable identifier, unique within a session.
    pub id: String,

    /// Headline copy. May be empty.
    pub title: String,

    /// Supporting copy. May be empty.
    pub subtitle: String,

    /// The screen content.
    pub image: ImageSource,
}

impl ScreenshotRecord {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        subtitle: impl Into<String>,
        image: ImageSource,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            subtitle: subtitle.into(),
            image,
        }
    }

    /// Apply a partial edit in place.
    pub fn apply(&mut self, patch: ScreenshotPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(subtitle) = patch.subtitle {
            self.subtitle = subtitle;
        }
        if let Some(image) = patch.image {
            self.image = image;
        }
    }
}

/// Default record occupying slot `index` of the pool.
pub fn default_record(index: usize) -> ScreenshotRecord {
    let title = if index == 0 {
        "Welcome to Your App".to_string()
    } else {
        format!("Feature Highlight {}", index + 1)
    };
    ScreenshotRecord {
        id: format!("screen-{index}"),
        title,
        subtitle: "Describe your amazing features in a few words here.".to_string(),
        image: ImageSource::Placeholder {
            seed: index as u32 + 10,
        },
    }
}

/// Partial update for one record. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScreenshotPatch {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub image: Option<ImageSource>,
}

impl ScreenshotPatch {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    pub fn subtitle(subtitle: impl Into<String>) -> Self {
        Self {
            subtitle: Some(subtitle.into()),
            ..Self::default()
        }
    }

    pub fn image(image: ImageSource) -> Self {
        Self {
            image: Some(image),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.subtitle.is_none() && self.image.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_records() {
        let first = default_record(0);
        assert_eq!(first.id, "screen-0");
        assert_eq!(first.title, "Welcome to Your App");
        assert_eq!(first.image, ImageSource::Placeholder { seed: 10 });

        let third = default_record(2);
        assert_eq!(third.id, "screen-2");
        assert_eq!(third.title, "Feature Highlight 3");
    }

    #[test]
    fn test_default_ids_are_unique() {
        let ids: std::collections::HashSet<_> =
            (0..DEFAULT_POOL_SIZE).map(|i| default_record(i).id).collect();
        assert_eq!(ids.len(), DEFAULT_POOL_SIZE);
    }

    #[test]
    fn test_patch_only_touches_given_fields() {
        let mut record = default_record(1);
        record.apply(ScreenshotPatch::title(""));
        assert_eq!(record.title, "");
        assert_eq!(record.subtitle, default_record(1).subtitle);
        assert!(ScreenshotPatch::default().is_empty());
    }
}
