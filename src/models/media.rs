use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumCount, EnumIter, EnumString, IntoEnumIterator};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, AsRefStr, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub(crate) enum MediaType {
    #[default]
    Image,
    Video,
}

impl MediaType {
    pub fn from_mime(mime: &str) -> Option<Self> {
        if mime.starts_with("image/") {
            Some(Self::Image)
        } else if mime.starts_with("video/") {
            Some(Self::Video)
        } else {
            None
        }
    }
}

/// The fixed set of secondary media positions on a project. Together with the
/// primary `image_url` these make up the eight media columns of a project row.
///
/// Each slot is stored as a `<slot>_url` column plus an optional `<slot>_type` column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, AsRefStr, Display, EnumIter, EnumCount)]
pub(crate) enum MediaSlotId {
    #[strum(serialize = "screenshot_1")]
    Screenshot1,
    #[strum(serialize = "screenshot_2")]
    Screenshot2,
    #[strum(serialize = "screenshot_3")]
    Screenshot3,
    #[strum(serialize = "thumbnail_1")]
    Thumbnail1,
    #[strum(serialize = "thumbnail_2")]
    Thumbnail2,
    #[strum(serialize = "thumbnail_3")]
    Thumbnail3,
    #[strum(serialize = "thumbnail_4")]
    Thumbnail4,
}

impl MediaSlotId {
    pub fn url_column(self) -> String {
        format!("{}_url", self.as_ref())
    }

    pub fn type_column(self) -> String {
        format!("{}_type", self.as_ref())
    }

    pub fn is_screenshot(self) -> bool {
        matches!(self, Self::Screenshot1 | Self::Screenshot2 | Self::Screenshot3)
    }

    fn index(self) -> usize {
        self as usize
    }

    pub fn label(self) -> String {
        let (kind, n) = self.as_ref().split_once('_').unwrap_or((self.as_ref(), ""));
        let mut chars = kind.chars();
        match chars.next() {
            Some(first) => format!("{}{} {}", first.to_ascii_uppercase(), chars.as_str(), n),
            None => String::new(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct MediaSlot {
    pub url: String,
    pub media_type: MediaType,
}

/// Fixed-capacity, slot-ordered media collection.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct MediaSlots {
    slots: [Option<MediaSlot>; MediaSlotId::COUNT],
}

impl MediaSlots {
    pub fn get(&self, id: MediaSlotId) -> Option<&MediaSlot> {
        self.slots[id.index()].as_ref()
    }

    pub fn set(&mut self, id: MediaSlotId, url: impl Into<String>, media_type: MediaType) {
        let url = url.into();
        if url.trim().is_empty() {
            self.clear(id);
            return;
        }
        self.slots[id.index()] = Some(MediaSlot { url, media_type });
    }

    pub fn clear(&mut self, id: MediaSlotId) {
        self.slots[id.index()] = None;
    }

    /// Filled slots in slot order.
    pub fn iter_filled(&self) -> impl Iterator<Item = (MediaSlotId, &MediaSlot)> + '_ {
        MediaSlotId::iter().filter_map(move |id| self.get(id).map(|s| (id, s)))
    }

    pub fn screenshots(&self) -> impl Iterator<Item = (MediaSlotId, &MediaSlot)> + '_ {
        self.iter_filled().filter(|(id, _)| id.is_screenshot())
    }

    pub fn thumbnails(&self) -> impl Iterator<Item = (MediaSlotId, &MediaSlot)> + '_ {
        self.iter_filled().filter(|(id, _)| !id.is_screenshot())
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }
}
