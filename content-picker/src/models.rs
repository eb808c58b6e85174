use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// `Activity.RESULT_OK`
pub const RESULT_OK: i32 = -1;
/// `Activity.RESULT_CANCELED`
pub const RESULT_CANCELED: i32 = 0;

/// Opaque reference to a selectable resource (a `content://` URI on Android)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemReference(String);

impl ItemReference {
    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    /// Appends a numeric row id to a collection URI, like `ContentUris.withAppendedId`
    pub fn with_appended_id(collection: &str, id: i64) -> Self {
        Self(format!("{}/{}", collection.trim_end_matches('/'), id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemReference {
    fn from(uri: &str) -> Self {
        Self::new(uri)
    }
}

impl From<String> for ItemReference {
    fn from(uri: String) -> Self {
        Self(uri)
    }
}

/// Ordered, duplicate-free outcome of one selection round-trip.
///
/// An empty result covers both "the user cancelled" and "nothing was there".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<ItemReference>", into = "Vec<ItemReference>")]
pub struct SelectionResult(Vec<ItemReference>);

impl SelectionResult {
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ItemReference> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[ItemReference] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<ItemReference> {
        self.0
    }
}

/// Collects references keeping only the first occurrence of each one
impl FromIterator<ItemReference> for SelectionResult {
    fn from_iter<I: IntoIterator<Item = ItemReference>>(iter: I) -> Self {
        let mut seen = HashSet::new();
        let items = iter
            .into_iter()
            .filter(|item| seen.insert(item.clone()))
            .collect();
        Self(items)
    }
}

impl From<Vec<ItemReference>> for SelectionResult {
    fn from(items: Vec<ItemReference>) -> Self {
        items.into_iter().collect()
    }
}

impl From<SelectionResult> for Vec<ItemReference> {
    fn from(result: SelectionResult) -> Self {
        result.0
    }
}

impl IntoIterator for SelectionResult {
    type Item = ItemReference;
    type IntoIter = std::vec::IntoIter<ItemReference>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a SelectionResult {
    type Item = &'a ItemReference;
    type IntoIter = std::slice::Iter<'a, ItemReference>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Coarse type filter offered by every selection surface
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeFilter {
    #[default]
    All,
    Image,
    Video,
    Audio,
    ImageAndVideo,
    Pdf,
    Zip,
    Text,
}

impl TypeFilter {
    pub const ALL: [TypeFilter; 8] = [
        TypeFilter::All,
        TypeFilter::Image,
        TypeFilter::Video,
        TypeFilter::Audio,
        TypeFilter::ImageAndVideo,
        TypeFilter::Pdf,
        TypeFilter::Zip,
        TypeFilter::Text,
    ];

    /// MIME types handed to the document UI via `EXTRA_MIME_TYPES`
    pub fn mime_types(&self) -> &'static [&'static str] {
        match self {
            TypeFilter::All => &["*/*"],
            TypeFilter::Image => &["image/*"],
            TypeFilter::Video => &["video/*"],
            TypeFilter::Audio => &["audio/*"],
            TypeFilter::ImageAndVideo => &["image/*", "video/*"],
            TypeFilter::Pdf => &["application/pdf"],
            TypeFilter::Zip => &["application/zip"],
            TypeFilter::Text => &["text/*"],
        }
    }

    /// Visual media counterpart, if the filter only covers images and/or videos
    pub fn visual_media(&self) -> Option<VisualMediaType> {
        match self {
            TypeFilter::Image => Some(VisualMediaType::Image),
            TypeFilter::Video => Some(VisualMediaType::Video),
            TypeFilter::ImageAndVideo => Some(VisualMediaType::ImageAndVideo),
            _ => None,
        }
    }
}

impl fmt::Display for TypeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TypeFilter::All => "All",
            TypeFilter::Image => "Image",
            TypeFilter::Video => "Video",
            TypeFilter::Audio => "Audio",
            TypeFilter::ImageAndVideo => "Image & Video",
            TypeFilter::Pdf => "PDF",
            TypeFilter::Zip => "ZIP",
            TypeFilter::Text => "Text",
        };
        f.write_str(label)
    }
}

/// Filter understood by the photo picker and the local media index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisualMediaType {
    Image,
    Video,
    ImageAndVideo,
}

impl VisualMediaType {
    /// Single MIME type for the photo picker; `None` means "images and videos"
    pub fn mime_type(&self) -> Option<&'static str> {
        match self {
            VisualMediaType::Image => Some("image/*"),
            VisualMediaType::Video => Some("video/*"),
            VisualMediaType::ImageAndVideo => None,
        }
    }

    pub fn mime_types(&self) -> &'static [&'static str] {
        match self {
            VisualMediaType::Image => &["image/*"],
            VisualMediaType::Video => &["video/*"],
            VisualMediaType::ImageAndVideo => &["image/*", "video/*"],
        }
    }

    pub fn media_kinds(&self) -> &'static [MediaKind] {
        match self {
            VisualMediaType::Image => &[MediaKind::Image],
            VisualMediaType::Video => &[MediaKind::Video],
            VisualMediaType::ImageAndVideo => &[MediaKind::Image, MediaKind::Video],
        }
    }
}

/// MediaStore `media_type` column values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Image,
    Video,
}

pub const IMAGES_COLLECTION_URI: &str = "content://media/external/images/media";
pub const VIDEO_COLLECTION_URI: &str = "content://media/external/video/media";

impl MediaKind {
    pub fn code(&self) -> i64 {
        match self {
            MediaKind::Image => 1,
            MediaKind::Video => 3,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(MediaKind::Image),
            3 => Some(MediaKind::Video),
            _ => None,
        }
    }

    pub fn collection_uri(&self) -> &'static str {
        match self {
            MediaKind::Image => IMAGES_COLLECTION_URI,
            MediaKind::Video => VIDEO_COLLECTION_URI,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Multiplicity {
    Single,
    #[default]
    Multiple,
}

/// Which document UI intent the legacy strategies use
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocsUiIntent {
    #[default]
    GetContent,
    OpenDocument,
}

/// Selection surface the caller wants to exercise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Surface {
    DocsUi(DocsUiIntent),
    PhotoPicker,
    LocalMedia,
}

/// Caller-owned parameters for one selection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionConfig {
    pub type_filter: TypeFilter,
    pub multiplicity: Multiplicity,
    /// Only meaningful for multi-select against a capped strategy
    pub chosen_max: Option<u32>,
}

impl SelectionConfig {
    pub fn new(type_filter: TypeFilter, multiplicity: Multiplicity) -> Self {
        Self {
            type_filter,
            multiplicity,
            chosen_max: None,
        }
    }

    pub fn with_chosen_max(mut self, chosen_max: u32) -> Self {
        self.chosen_max = Some(chosen_max);
        self
    }
}

/// Result delivered by the host activity for one launched intent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityResult {
    pub result_code: i32,
    #[serde(default)]
    pub data: Option<ItemReference>,
    /// Clip data items; an item may carry no URI
    #[serde(default)]
    pub clip_data: Option<Vec<Option<ItemReference>>>,
}

impl ActivityResult {
    pub fn ok(data: Option<ItemReference>, clip_data: Option<Vec<Option<ItemReference>>>) -> Self {
        Self {
            result_code: RESULT_OK,
            data,
            clip_data,
        }
    }

    pub fn cancelled() -> Self {
        Self {
            result_code: RESULT_CANCELED,
            data: None,
            clip_data: None,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.result_code == RESULT_OK
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_appended_id() {
        let uri = ItemReference::with_appended_id(IMAGES_COLLECTION_URI, 42);
        assert_eq!(uri.as_str(), "content://media/external/images/media/42");
    }

    #[test]
    fn test_selection_result_keeps_first_occurrence() {
        let result: SelectionResult = ["b", "a", "b", "c", "a"]
            .into_iter()
            .map(ItemReference::from)
            .collect();
        let uris: Vec<&str> = result.iter().map(|r| r.as_str()).collect();
        assert_eq!(uris, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_selection_result_json_drops_duplicates() {
        let result: SelectionResult =
            serde_json::from_str(r#"["content://a", "content://b", "content://a"]"#).unwrap();
        assert_eq!(
            result.into_vec(),
            vec![ItemReference::from("content://a"), ItemReference::from("content://b")]
        );

        let result = SelectionResult::from(vec![ItemReference::from("x")]);
        assert_eq!(serde_json::to_string(&result).unwrap(), r#"["x"]"#);
    }

    #[test]
    fn test_visual_media_mapping() {
        assert_eq!(TypeFilter::Image.visual_media(), Some(VisualMediaType::Image));
        assert_eq!(
            TypeFilter::ImageAndVideo.visual_media(),
            Some(VisualMediaType::ImageAndVideo)
        );
        assert_eq!(TypeFilter::Pdf.visual_media(), None);
        assert_eq!(TypeFilter::All.visual_media(), None);
    }

    #[test]
    fn test_media_kind_codes() {
        assert_eq!(MediaKind::from_code(1), Some(MediaKind::Image));
        assert_eq!(MediaKind::from_code(3), Some(MediaKind::Video));
        assert_eq!(MediaKind::from_code(2), None);
    }

    #[test]
    fn test_activity_result_from_json() {
        let json = r#"{"resultCode":-1,"data":"content://a","clipData":["content://a",null]}"#;
        let result: ActivityResult = serde_json::from_str(json).unwrap();
        assert!(result.is_ok());
        assert_eq!(result.data, Some(ItemReference::from("content://a")));
        assert_eq!(result.clip_data.unwrap().len(), 2);
    }

    #[test]
    fn test_cancelled_result_json_without_fields() {
        let result: ActivityResult = serde_json::from_str(r#"{"resultCode":0}"#).unwrap();
        assert_eq!(result, ActivityResult::cancelled());
    }
}
