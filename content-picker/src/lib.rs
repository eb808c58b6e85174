//! # Content Picker
//!
//! Content selection across Android's selection surfaces.
//!
//! This crate turns heterogeneous pickers into one ordered, duplicate-free
//! list of item references:
//! - Document UI intents (`GET_CONTENT` / `OPEN_DOCUMENT`), single or multiple
//! - The system photo picker, with per-device item limits and a document UI
//!   fallback on devices without it
//! - Direct MediaStore enumeration of local images and videos, newest first
//!
//! ## Platform Separation
//!
//! Strategy, normalization and limit logic are plain Rust. Everything that
//! touches the device sits behind three traits: [`CapabilitySource`],
//! [`PickerLauncher`] and [`MediaIndex`]. On Android they are implemented over
//! JNI; elsewhere a static capability source and a SQLite media index stand in.
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use content_picker::{ContentPicker, SelectionConfig, Surface, TypeFilter, Multiplicity};
//!
//! let config = SelectionConfig::new(TypeFilter::Image, Multiplicity::Multiple).with_chosen_max(10);
//! let selection = picker.select(Surface::PhotoPicker, &config)?;
//! ```

pub mod capability;
pub mod limits;
pub mod local_media;
pub mod models;
pub mod normalize;
pub mod picker;
pub mod schema;
pub mod selection;
pub mod service;
pub mod strategy;

pub use capability::{probe, CapabilityInfo, CapabilitySource, StaticCapabilitySource};
pub use limits::{reconcile, NO_LIMIT};
pub use local_media::{LocalEnumerator, LocalMedia, MediaIndex, SqliteMediaIndex};
pub use models::{
    ActivityResult, DocsUiIntent, ItemReference, Multiplicity, SelectionConfig, SelectionResult,
    Surface, TypeFilter, VisualMediaType,
};
pub use normalize::normalize;
pub use picker::{ActivityPickerLauncher, AndroidPickerConfig, PickerError, PickerLauncher};
pub use schema::init_media_schema;
pub use selection::LocalSelection;
pub use service::ContentPicker;
pub use strategy::{PickerIntent, PlatformRequest, PlatformResult, SelectionStrategy};

#[cfg(target_os = "android")]
pub use capability::AndroidCapabilitySource;
#[cfg(target_os = "android")]
pub use local_media::AndroidMediaIndex;
