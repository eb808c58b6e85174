// Wires content-picker's platform backends for the running target and maps
// its errors into AppError.

use crate::config::PlaygroundConfig;
use crate::error::AppError;
use content_picker::{
    ActivityPickerLauncher, CapabilityInfo, ContentPicker, SelectionResult, Surface,
};
use serde::Serialize;
use std::sync::Arc;

/// Everything one playground run produced
#[derive(Debug, Serialize)]
pub struct SelectionReport {
    pub capabilities: CapabilityInfo,
    pub surface: Surface,
    pub selection: SelectionResult,
}

#[cfg(target_os = "android")]
pub fn build_content_picker(config: &PlaygroundConfig) -> Result<ContentPicker, AppError> {
    Ok(ContentPicker::new(
        Arc::new(content_picker::AndroidCapabilitySource),
        Arc::new(ActivityPickerLauncher::new(config.picker_config())),
        Arc::new(content_picker::AndroidMediaIndex),
    ))
}

#[cfg(not(target_os = "android"))]
pub fn build_content_picker(config: &PlaygroundConfig) -> Result<ContentPicker, AppError> {
    use crate::database::{get_media_index_path, init_media_index, media_count};

    let index_path = get_media_index_path(config.media_index_path.as_deref());
    let conn = init_media_index(&index_path)?;
    log::info!(
        "Using media index {} ({} rows)",
        index_path.display(),
        media_count(&conn)?
    );

    Ok(ContentPicker::new(
        Arc::new(content_picker::StaticCapabilitySource::default()),
        Arc::new(ActivityPickerLauncher::new(config.picker_config())),
        Arc::new(content_picker::SqliteMediaIndex::with_connection(conn)),
    ))
}

/// Runs the configured selection once
pub async fn run_selection(
    picker: &ContentPicker,
    config: &PlaygroundConfig,
) -> Result<SelectionReport, AppError> {
    let surface = Surface::from(config.surface);
    let capabilities = picker.capabilities();
    let selection = picker
        .select_async(surface, config.selection_config())
        .await?;

    Ok(SelectionReport {
        capabilities,
        surface,
        selection,
    })
}
