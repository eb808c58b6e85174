use crate::capability::{probe, CapabilityInfo, CapabilitySource};
use crate::local_media::{LocalEnumerator, MediaIndex};
use crate::models::{SelectionConfig, SelectionResult, Surface};
use crate::picker::{PickerError, PickerLauncher};
use crate::strategy::{PlatformRequest, PlatformResult, SelectionStrategy};
use std::sync::Arc;

/// Content Picker Service
///
/// Runs one selection round-trip: fresh capability snapshot, strategy choice,
/// request, platform answer, interpretation.
#[derive(Clone)]
pub struct ContentPicker {
    capability_source: Arc<dyn CapabilitySource>,
    launcher: Arc<dyn PickerLauncher>,
    enumerator: LocalEnumerator,
}

impl ContentPicker {
    pub fn new(
        capability_source: Arc<dyn CapabilitySource>,
        launcher: Arc<dyn PickerLauncher>,
        media_index: Arc<dyn MediaIndex>,
    ) -> Self {
        Self {
            capability_source,
            launcher,
            enumerator: LocalEnumerator::new(media_index),
        }
    }

    /// Probes the device again; snapshots are never reused between calls
    pub fn capabilities(&self) -> CapabilityInfo {
        probe(self.capability_source.as_ref())
    }

    pub fn local_enumerator(&self) -> &LocalEnumerator {
        &self.enumerator
    }

    /// Blocking selection. Cancellation yields an empty result; launcher and
    /// index failures are returned as errors and not retried.
    pub fn select(
        &self,
        surface: Surface,
        config: &SelectionConfig,
    ) -> Result<SelectionResult, PickerError> {
        let capabilities = self.capabilities();
        let strategy = SelectionStrategy::choose(surface, config);

        let result = match strategy.build_request(config, &capabilities)? {
            PlatformRequest::Intent(intent) => {
                PlatformResult::Activity(self.launcher.launch(&intent)?)
            }
            PlatformRequest::LocalQuery(filter) => {
                PlatformResult::Enumerated(self.enumerator.enumerate(filter)?.collect())
            }
        };

        let selection = strategy.interpret_result(result);
        log::info!("{:?} selected {} item(s)", strategy, selection.len());
        Ok(selection)
    }

    /// [`ContentPicker::select`] on the blocking thread pool
    pub async fn select_async(
        &self,
        surface: Surface,
        config: SelectionConfig,
    ) -> Result<SelectionResult, PickerError> {
        let this = self.clone();
        tokio::task::spawn_blocking(move || this.select(surface, &config))
            .await
            .map_err(|e| PickerError::Other(format!("Selection task failed: {}", e)))?
    }
}
