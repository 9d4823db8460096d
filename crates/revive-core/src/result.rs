//! Gallery entries produced by uploads, generation and committed edits.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::consts::{EDITED_PROMPT, ORIGINAL_PROMPT};
use crate::payload::ImagePayload;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultType {
    #[default]
    Image,
    Video,
}

/// One immutable gallery entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultItem {
    pub id: String,
    /// Image reference (data URL or path); the thumbnail for videos.
    pub image_url: String,
    pub mime_type: String,
    pub prompt: String,
    /// Image this result was derived from, shown as "before".
    pub source_image_url: Option<String>,
    pub result_type: ResultType,
    pub video_url: Option<String>,
}

static NEXT_ID: AtomicU64 = AtomicU64::new(0);

fn unique_id(prefix: &str) -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    let seq = NEXT_ID.fetch_add(1, Ordering::Relaxed);
    format!("{prefix}-{millis}-{seq}")
}

impl ResultItem {
    /// Wrap an uploaded image.
    pub fn original(image_url: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            id: unique_id("original"),
            image_url: image_url.into(),
            mime_type: mime_type.into(),
            prompt: ORIGINAL_PROMPT.to_string(),
            source_image_url: None,
            result_type: ResultType::Image,
            video_url: None,
        }
    }

    /// Wrap the output of a committed edit of `source_image_url`.
    pub fn edited(payload: &ImagePayload, source_image_url: impl Into<String>) -> Self {
        Self {
            id: unique_id("edit"),
            image_url: payload.to_data_url(),
            mime_type: payload.mime_type.clone(),
            prompt: EDITED_PROMPT.to_string(),
            source_image_url: Some(source_image_url.into()),
            result_type: ResultType::Image,
            video_url: None,
        }
    }

    /// A video result with its thumbnail.
    pub fn video(thumbnail_url: impl Into<String>, video_url: impl Into<String>) -> Self {
        Self {
            id: unique_id("vid"),
            image_url: thumbnail_url.into(),
            mime_type: "video/mp4".to_string(),
            prompt: String::new(),
            source_image_url: None,
            result_type: ResultType::Video,
            video_url: Some(video_url.into()),
        }
    }

    pub fn is_edited(&self) -> bool {
        self.prompt == EDITED_PROMPT
    }

    pub fn is_video(&self) -> bool {
        self.result_type == ResultType::Video
    }

    /// Edited and video results cannot be compared.
    pub fn forces_single(&self) -> bool {
        self.is_edited() || self.is_video()
    }

    /// Reference of the "before" image: the recorded source, else the
    /// uploaded original (unless this item is the original).
    pub fn before_url<'a>(&'a self, original: Option<&'a str>) -> Option<&'a str> {
        self.source_image_url
            .as_deref()
            .or(original)
            .filter(|url| *url != self.image_url)
    }
}
