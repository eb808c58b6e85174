use crate::capability::CapabilityInfo;
use crate::limits::{reconcile, MULTI_SELECT_MINIMUM, NO_LIMIT};
use crate::models::{
    ActivityResult, DocsUiIntent, ItemReference, Multiplicity, SelectionConfig, SelectionResult,
    Surface, VisualMediaType,
};
use crate::normalize::normalize;
use crate::picker::PickerError;
use serde::{Deserialize, Serialize};

pub const ACTION_GET_CONTENT: &str = "android.intent.action.GET_CONTENT";
pub const ACTION_OPEN_DOCUMENT: &str = "android.intent.action.OPEN_DOCUMENT";
pub const ACTION_PICK_IMAGES: &str = "android.provider.action.PICK_IMAGES";
pub const CATEGORY_OPENABLE: &str = "android.intent.category.OPENABLE";

/// Serializable description of the intent the host activity should launch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PickerIntent {
    pub action: String,
    pub categories: Vec<String>,
    /// `Intent.setType`
    pub mime_type: Option<String>,
    /// `Intent.EXTRA_MIME_TYPES`
    pub extra_mime_types: Vec<String>,
    /// `Intent.EXTRA_ALLOW_MULTIPLE`
    pub allow_multiple: bool,
    /// `MediaStore.EXTRA_PICK_IMAGES_MAX`
    pub pick_images_max: Option<u32>,
}

impl PickerIntent {
    fn document_ui(action: &str, mime_types: &[&str], allow_multiple: bool) -> Self {
        Self {
            action: action.to_string(),
            categories: vec![CATEGORY_OPENABLE.to_string()],
            mime_type: Some("*/*".to_string()),
            extra_mime_types: mime_types.iter().map(|m| m.to_string()).collect(),
            allow_multiple,
            pick_images_max: None,
        }
    }

    pub fn get_content(mime_types: &[&str], allow_multiple: bool) -> Self {
        Self::document_ui(ACTION_GET_CONTENT, mime_types, allow_multiple)
    }

    pub fn open_document(mime_types: &[&str], allow_multiple: bool) -> Self {
        Self::document_ui(ACTION_OPEN_DOCUMENT, mime_types, allow_multiple)
    }

    /// Photo picker intent. A multi-select request without `max_items` is
    /// launched by the host with the platform's own maximum.
    pub fn pick_images(
        media: VisualMediaType,
        allow_multiple: bool,
        max_items: Option<u32>,
    ) -> Self {
        Self {
            action: ACTION_PICK_IMAGES.to_string(),
            categories: Vec::new(),
            mime_type: media.mime_type().map(str::to_string),
            extra_mime_types: Vec::new(),
            allow_multiple,
            pick_images_max: max_items.filter(|_| allow_multiple),
        }
    }
}

/// Request produced by a strategy for the platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformRequest {
    /// Launch an interactive picker
    Intent(PickerIntent),
    /// Query the local media index directly
    LocalQuery(VisualMediaType),
}

/// What the platform handed back for a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformResult {
    Activity(ActivityResult),
    Enumerated(Vec<ItemReference>),
}

/// Closed set of ways to obtain item references
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionStrategy {
    LegacySingle(DocsUiIntent),
    LegacyMultiple(DocsUiIntent),
    EnhancedSingle,
    EnhancedMultiple,
    DirectQuery,
}

impl SelectionStrategy {
    /// Picks the strategy for a surface. The multiplicity toggle decides
    /// single vs. multiple; the chosen maximum never does.
    pub fn choose(surface: Surface, config: &SelectionConfig) -> Self {
        let multiple = config.multiplicity == Multiplicity::Multiple;
        match surface {
            Surface::DocsUi(intent) if multiple => SelectionStrategy::LegacyMultiple(intent),
            Surface::DocsUi(intent) => SelectionStrategy::LegacySingle(intent),
            Surface::PhotoPicker if multiple => SelectionStrategy::EnhancedMultiple,
            Surface::PhotoPicker => SelectionStrategy::EnhancedSingle,
            Surface::LocalMedia => SelectionStrategy::DirectQuery,
        }
    }

    pub fn is_interactive(&self) -> bool {
        !matches!(self, SelectionStrategy::DirectQuery)
    }

    pub fn build_request(
        &self,
        config: &SelectionConfig,
        capabilities: &CapabilityInfo,
    ) -> Result<PlatformRequest, PickerError> {
        let request = match self {
            SelectionStrategy::LegacySingle(intent) => {
                PlatformRequest::Intent(docs_ui_intent(*intent, config, false))
            }
            SelectionStrategy::LegacyMultiple(intent) => {
                PlatformRequest::Intent(docs_ui_intent(*intent, config, true))
            }
            SelectionStrategy::EnhancedSingle => {
                let media = visual_filter(config)?;
                PlatformRequest::Intent(enhanced_intent(media, capabilities, EnhancedMode::Single))
            }
            SelectionStrategy::EnhancedMultiple => {
                let media = visual_filter(config)?;
                let limit = reconcile(
                    capabilities.enhanced_max,
                    config.chosen_max,
                    MULTI_SELECT_MINIMUM,
                );
                let mode = if limit == NO_LIMIT {
                    EnhancedMode::Multiple(None)
                } else if limit < MULTI_SELECT_MINIMUM {
                    // The picker rejects a maximum below 2
                    log::warn!("Photo picker cap {} is too low for multi-select", limit);
                    EnhancedMode::Single
                } else {
                    EnhancedMode::Multiple(Some(limit))
                };
                PlatformRequest::Intent(enhanced_intent(media, capabilities, mode))
            }
            SelectionStrategy::DirectQuery => PlatformRequest::LocalQuery(visual_filter(config)?),
        };
        log::debug!("{:?} built request {:?}", self, request);
        Ok(request)
    }

    /// Converts the platform's answer into a selection; cancellation and
    /// "nothing picked" both come back empty.
    pub fn interpret_result(&self, result: PlatformResult) -> SelectionResult {
        match (self, result) {
            (SelectionStrategy::DirectQuery, PlatformResult::Enumerated(items)) => {
                items.into_iter().collect()
            }
            (_, PlatformResult::Activity(activity)) if self.is_interactive() => {
                if !activity.is_ok() {
                    log::debug!("{:?} cancelled (result code {})", self, activity.result_code);
                    return SelectionResult::empty();
                }
                match self {
                    SelectionStrategy::LegacyMultiple(_) | SelectionStrategy::EnhancedMultiple => {
                        normalize(activity.data.as_ref(), activity.clip_data.as_deref())
                    }
                    _ => normalize(activity.data.as_ref(), None),
                }
            }
            (strategy, other) => {
                log::warn!("{:?} cannot interpret {:?}, treating as empty", strategy, other);
                SelectionResult::empty()
            }
        }
    }
}

fn docs_ui_intent(intent: DocsUiIntent, config: &SelectionConfig, multiple: bool) -> PickerIntent {
    let mime_types = config.type_filter.mime_types();
    match intent {
        DocsUiIntent::GetContent => PickerIntent::get_content(mime_types, multiple),
        DocsUiIntent::OpenDocument => PickerIntent::open_document(mime_types, multiple),
    }
}

fn visual_filter(config: &SelectionConfig) -> Result<VisualMediaType, PickerError> {
    config
        .type_filter
        .visual_media()
        .ok_or(PickerError::UnsupportedFilter(config.type_filter))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EnhancedMode {
    Single,
    /// Multi-select with an explicit maximum, or the platform's own
    Multiple(Option<u32>),
}

/// Photo picker intent, or the document UI fallback when the photo picker is
/// missing
fn enhanced_intent(
    media: VisualMediaType,
    capabilities: &CapabilityInfo,
    mode: EnhancedMode,
) -> PickerIntent {
    let (multiple, max_items) = match mode {
        EnhancedMode::Single => (false, None),
        EnhancedMode::Multiple(max) => (true, max),
    };

    if !capabilities.enhanced_available {
        log::info!("Photo picker unavailable, falling back to OPEN_DOCUMENT");
        let mut intent = PickerIntent::open_document(media.mime_types(), multiple);
        intent.mime_type = Some(media.mime_type().unwrap_or("*/*").to_string());
        return intent;
    }

    PickerIntent::pick_images(media, multiple, max_items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TypeFilter;

    fn with_picker(max: Option<u32>) -> CapabilityInfo {
        CapabilityInfo {
            platform_version: 34,
            extension_version: Some(7),
            enhanced_available: true,
            enhanced_max: max,
            ..CapabilityInfo::default()
        }
    }

    fn without_picker() -> CapabilityInfo {
        CapabilityInfo {
            platform_version: 29,
            ..CapabilityInfo::default()
        }
    }

    fn intent_of(request: PlatformRequest) -> PickerIntent {
        match request {
            PlatformRequest::Intent(intent) => intent,
            other => panic!("expected intent, got {:?}", other),
        }
    }

    fn uri(s: &str) -> ItemReference {
        ItemReference::from(s)
    }

    #[test]
    fn test_choose_follows_toggle() {
        let multi = SelectionConfig::new(TypeFilter::Image, Multiplicity::Multiple);
        let single = SelectionConfig::new(TypeFilter::Image, Multiplicity::Single);

        assert_eq!(
            SelectionStrategy::choose(Surface::PhotoPicker, &multi),
            SelectionStrategy::EnhancedMultiple
        );
        assert_eq!(
            SelectionStrategy::choose(Surface::PhotoPicker, &single),
            SelectionStrategy::EnhancedSingle
        );
        assert_eq!(
            SelectionStrategy::choose(Surface::DocsUi(DocsUiIntent::OpenDocument), &multi),
            SelectionStrategy::LegacyMultiple(DocsUiIntent::OpenDocument)
        );
        assert_eq!(
            SelectionStrategy::choose(Surface::LocalMedia, &single),
            SelectionStrategy::DirectQuery
        );
    }

    #[test]
    fn test_chosen_max_of_one_stays_multiple() {
        let config =
            SelectionConfig::new(TypeFilter::Image, Multiplicity::Multiple).with_chosen_max(1);
        let strategy = SelectionStrategy::choose(Surface::PhotoPicker, &config);
        assert_eq!(strategy, SelectionStrategy::EnhancedMultiple);

        let intent = intent_of(strategy.build_request(&config, &with_picker(Some(100))).unwrap());
        assert_eq!(intent.pick_images_max, Some(2));
    }

    #[test]
    fn test_get_content_request() {
        let config = SelectionConfig::new(TypeFilter::ImageAndVideo, Multiplicity::Multiple);
        let strategy = SelectionStrategy::LegacyMultiple(DocsUiIntent::GetContent);
        let intent = intent_of(strategy.build_request(&config, &without_picker()).unwrap());

        assert_eq!(intent.action, ACTION_GET_CONTENT);
        assert_eq!(intent.categories, vec![CATEGORY_OPENABLE.to_string()]);
        assert_eq!(intent.mime_type.as_deref(), Some("*/*"));
        assert_eq!(intent.extra_mime_types, vec!["image/*", "video/*"]);
        assert!(intent.allow_multiple);
        assert_eq!(intent.pick_images_max, None);
    }

    #[test]
    fn test_open_document_single_request() {
        let config = SelectionConfig::new(TypeFilter::Pdf, Multiplicity::Single);
        let strategy = SelectionStrategy::LegacySingle(DocsUiIntent::OpenDocument);
        let intent = intent_of(strategy.build_request(&config, &without_picker()).unwrap());

        assert_eq!(intent.action, ACTION_OPEN_DOCUMENT);
        assert_eq!(intent.extra_mime_types, vec!["application/pdf"]);
        assert!(!intent.allow_multiple);
    }

    #[test]
    fn test_enhanced_multiple_clamps_chosen_max() {
        let config =
            SelectionConfig::new(TypeFilter::Video, Multiplicity::Multiple).with_chosen_max(500);
        let intent = intent_of(
            SelectionStrategy::EnhancedMultiple
                .build_request(&config, &with_picker(Some(100)))
                .unwrap(),
        );

        assert_eq!(intent.action, ACTION_PICK_IMAGES);
        assert_eq!(intent.mime_type.as_deref(), Some("video/*"));
        assert_eq!(intent.pick_images_max, Some(100));
    }

    #[test]
    fn test_enhanced_multiple_without_cap_stays_multi_select() {
        let config = SelectionConfig::new(TypeFilter::ImageAndVideo, Multiplicity::Multiple)
            .with_chosen_max(10);
        let intent = intent_of(
            SelectionStrategy::EnhancedMultiple
                .build_request(&config, &with_picker(None))
                .unwrap(),
        );

        assert_eq!(intent.mime_type, None);
        assert!(intent.allow_multiple);
        assert_eq!(intent.pick_images_max, None);
    }

    #[test]
    fn test_enhanced_multiple_differs_from_single_without_cap() {
        let multi = SelectionConfig::new(TypeFilter::Image, Multiplicity::Multiple);
        let single = SelectionConfig::new(TypeFilter::Image, Multiplicity::Single);
        let caps = with_picker(None);

        let multi_request = SelectionStrategy::EnhancedMultiple
            .build_request(&multi, &caps)
            .unwrap();
        let single_request = SelectionStrategy::EnhancedSingle
            .build_request(&single, &caps)
            .unwrap();
        assert_ne!(multi_request, single_request);
    }

    #[test]
    fn test_enhanced_multiple_cap_below_two_degrades_to_single() {
        let config =
            SelectionConfig::new(TypeFilter::Image, Multiplicity::Multiple).with_chosen_max(5);
        let intent = intent_of(
            SelectionStrategy::EnhancedMultiple
                .build_request(&config, &with_picker(Some(1)))
                .unwrap(),
        );

        assert_eq!(intent.action, ACTION_PICK_IMAGES);
        assert!(!intent.allow_multiple);
        assert_eq!(intent.pick_images_max, None);
    }

    #[test]
    fn test_enhanced_single_has_no_max() {
        let config = SelectionConfig::new(TypeFilter::Image, Multiplicity::Single);
        let intent = intent_of(
            SelectionStrategy::EnhancedSingle
                .build_request(&config, &with_picker(Some(100)))
                .unwrap(),
        );
        assert_eq!(intent.action, ACTION_PICK_IMAGES);
        assert_eq!(intent.pick_images_max, None);
    }

    #[test]
    fn test_enhanced_falls_back_to_open_document() {
        let config = SelectionConfig::new(TypeFilter::ImageAndVideo, Multiplicity::Multiple);
        let intent = intent_of(
            SelectionStrategy::EnhancedMultiple
                .build_request(&config, &without_picker())
                .unwrap(),
        );

        assert_eq!(intent.action, ACTION_OPEN_DOCUMENT);
        assert_eq!(intent.mime_type.as_deref(), Some("*/*"));
        assert_eq!(intent.extra_mime_types, vec!["image/*", "video/*"]);
        assert!(intent.allow_multiple);
        assert_eq!(intent.pick_images_max, None);
    }

    #[test]
    fn test_enhanced_rejects_non_visual_filter() {
        let config = SelectionConfig::new(TypeFilter::Audio, Multiplicity::Single);
        let err = SelectionStrategy::EnhancedSingle
            .build_request(&config, &with_picker(Some(100)))
            .unwrap_err();
        assert!(matches!(err, PickerError::UnsupportedFilter(TypeFilter::Audio)));
    }

    #[test]
    fn test_direct_query_request() {
        let config = SelectionConfig::new(TypeFilter::Image, Multiplicity::Multiple);
        let request = SelectionStrategy::DirectQuery
            .build_request(&config, &without_picker())
            .unwrap();
        assert_eq!(request, PlatformRequest::LocalQuery(VisualMediaType::Image));
    }

    #[test]
    fn test_legacy_multiple_cancelled_is_empty() {
        let strategy = SelectionStrategy::LegacyMultiple(DocsUiIntent::GetContent);
        let result = strategy.interpret_result(PlatformResult::Activity(ActivityResult::cancelled()));
        assert!(result.is_empty());
    }

    #[test]
    fn test_legacy_multiple_ok_without_payload_is_empty() {
        let strategy = SelectionStrategy::LegacyMultiple(DocsUiIntent::GetContent);
        let result = strategy.interpret_result(PlatformResult::Activity(ActivityResult::ok(None, None)));
        assert!(result.is_empty());
    }

    #[test]
    fn test_legacy_multiple_merges_clip_data() {
        let strategy = SelectionStrategy::LegacyMultiple(DocsUiIntent::OpenDocument);
        let activity = ActivityResult::ok(
            Some(uri("content://a")),
            Some(vec![Some(uri("content://a")), Some(uri("content://b"))]),
        );
        let result = strategy.interpret_result(PlatformResult::Activity(activity));
        assert_eq!(result.into_vec(), vec![uri("content://a"), uri("content://b")]);
    }

    #[test]
    fn test_single_ignores_clip_data() {
        let strategy = SelectionStrategy::EnhancedSingle;
        let activity = ActivityResult::ok(
            Some(uri("content://x")),
            Some(vec![Some(uri("content://y"))]),
        );
        let result = strategy.interpret_result(PlatformResult::Activity(activity));
        assert_eq!(result.into_vec(), vec![uri("content://x")]);
    }

    #[test]
    fn test_direct_query_returns_full_output() {
        let items: Vec<ItemReference> = (0..150).map(|i| uri(&format!("content://m/{}", i))).collect();
        let result = SelectionStrategy::DirectQuery.interpret_result(PlatformResult::Enumerated(items));
        assert_eq!(result.len(), 150);
    }

    #[test]
    fn test_mismatched_result_is_empty() {
        let result = SelectionStrategy::EnhancedMultiple
            .interpret_result(PlatformResult::Enumerated(vec![uri("content://a")]));
        assert!(result.is_empty());

        let result = SelectionStrategy::DirectQuery
            .interpret_result(PlatformResult::Activity(ActivityResult::ok(Some(uri("a")), None)));
        assert!(result.is_empty());
    }

    #[test]
    fn test_intent_json_shape() {
        let intent = PickerIntent::pick_images(VisualMediaType::Image, true, Some(5));
        let json = serde_json::to_value(&intent).unwrap();
        assert_eq!(json["action"], ACTION_PICK_IMAGES);
        assert_eq!(json["mimeType"], "image/*");
        assert_eq!(json["pickImagesMax"], 5);
        assert_eq!(json["allowMultiple"], true);
    }
}
