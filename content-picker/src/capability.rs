use crate::picker::PickerError;
use serde::{Deserialize, Serialize};

/// Android R, the first release with SDK extensions
pub const SDK_R: u32 = 30;
/// Android 13, where the photo picker ships with the platform
pub const SDK_TIRAMISU: u32 = 33;
/// R extension level that backports the photo picker
pub const PHOTO_PICKER_MIN_EXTENSION: u32 = 2;

pub const MEDIA_PROVIDER_PACKAGE: &str = "com.android.providers.media";

/// Snapshot of what the running device can do for content selection.
///
/// Computed per query and never cached; absent values stay `None` rather than
/// being folded into zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityInfo {
    /// `Build.VERSION.SDK_INT`, 0 when it could not be read
    pub platform_version: u32,
    /// `Build.VERSION.RELEASE`
    pub release: Option<String>,
    /// R extension version; absent below Android R
    pub extension_version: Option<u32>,
    pub enhanced_available: bool,
    /// Photo picker item cap; absent when unavailable or not reported
    pub enhanced_max: Option<u32>,
    pub media_provider_version: Option<String>,
}

/// Raw platform queries the probe is built on. Each may fail; the probe
/// decides what a failure means.
pub trait CapabilitySource: Send + Sync {
    fn sdk_int(&self) -> Result<u32, PickerError>;
    fn release(&self) -> Result<String, PickerError>;
    /// `SdkExtensions.getExtensionVersion(sdk)`
    fn extension_version(&self, sdk: u32) -> Result<u32, PickerError>;
    /// `MediaStore.getPickImagesMaxLimit()`
    fn pick_images_max_limit(&self) -> Result<u32, PickerError>;
    fn media_provider_version(&self) -> Result<String, PickerError>;
}

/// Whether the system photo picker is present for a platform/extension pair
pub fn is_photo_picker_available(platform_version: u32, extension_version: Option<u32>) -> bool {
    platform_version >= SDK_TIRAMISU
        || (platform_version >= SDK_R
            && extension_version.is_some_and(|ext| ext >= PHOTO_PICKER_MIN_EXTENSION))
}

/// Takes a fresh capability snapshot. Never fails: anything the platform
/// refuses to answer is reported as absent or unavailable.
pub fn probe<S: CapabilitySource + ?Sized>(source: &S) -> CapabilityInfo {
    let platform_version = source.sdk_int().unwrap_or_else(|e| {
        log::warn!("Could not read SDK version: {}", e);
        0
    });

    let extension_version = if platform_version >= SDK_R {
        absent_on_error("extension version", source.extension_version(SDK_R))
    } else {
        None
    };

    let enhanced_available = is_photo_picker_available(platform_version, extension_version);
    let enhanced_max = if enhanced_available {
        absent_on_error("photo picker max limit", source.pick_images_max_limit())
    } else {
        None
    };

    let info = CapabilityInfo {
        platform_version,
        release: absent_on_error("release name", source.release()),
        extension_version,
        enhanced_available,
        enhanced_max,
        media_provider_version: absent_on_error(
            "media provider version",
            source.media_provider_version(),
        ),
    };
    log::debug!("Probed capabilities: {:?}", info);
    info
}

fn absent_on_error<T>(what: &str, value: Result<T, PickerError>) -> Option<T> {
    value
        .map_err(|e| log::debug!("{} unavailable: {}", what, e))
        .ok()
}

/// Fixed answers, for hosts without an Android runtime and for tests.
/// `None` fields answer with `PlatformNotSupported`.
#[derive(Debug, Clone, Default)]
pub struct StaticCapabilitySource {
    pub sdk_int: Option<u32>,
    pub release: Option<String>,
    pub extension_version: Option<u32>,
    pub pick_images_max_limit: Option<u32>,
    pub media_provider_version: Option<String>,
}

impl StaticCapabilitySource {
    fn answer<T: Clone>(value: &Option<T>, what: &str) -> Result<T, PickerError> {
        value
            .clone()
            .ok_or_else(|| PickerError::PlatformNotSupported(format!("{} not available", what)))
    }
}

impl CapabilitySource for StaticCapabilitySource {
    fn sdk_int(&self) -> Result<u32, PickerError> {
        Self::answer(&self.sdk_int, "SDK_INT")
    }

    fn release(&self) -> Result<String, PickerError> {
        Self::answer(&self.release, "RELEASE")
    }

    fn extension_version(&self, _sdk: u32) -> Result<u32, PickerError> {
        Self::answer(&self.extension_version, "SdkExtensions")
    }

    fn pick_images_max_limit(&self) -> Result<u32, PickerError> {
        Self::answer(&self.pick_images_max_limit, "getPickImagesMaxLimit")
    }

    fn media_provider_version(&self) -> Result<String, PickerError> {
        Self::answer(&self.media_provider_version, MEDIA_PROVIDER_PACKAGE)
    }
}

/// Capability source reading the running Android device over JNI
#[cfg(target_os = "android")]
#[derive(Debug, Clone, Copy, Default)]
pub struct AndroidCapabilitySource;

#[cfg(target_os = "android")]
impl CapabilitySource for AndroidCapabilitySource {
    fn sdk_int(&self) -> Result<u32, PickerError> {
        crate::picker::android::with_env(|env| {
            let sdk = env
                .get_static_field("android/os/Build$VERSION", "SDK_INT", "I")
                .and_then(|v| v.i())
                .map_err(|e| {
                    crate::picker::android::clear_exception(env);
                    PickerError::Other(format!("SDK_INT failed: {}", e))
                })?;
            Ok(sdk.max(0) as u32)
        })
    }

    fn release(&self) -> Result<String, PickerError> {
        crate::picker::android::with_env(|env| {
            let obj = env
                .get_static_field("android/os/Build$VERSION", "RELEASE", "Ljava/lang/String;")
                .and_then(|v| v.l())
                .map_err(|e| {
                    crate::picker::android::clear_exception(env);
                    PickerError::Other(format!("RELEASE failed: {}", e))
                })?;
            crate::picker::android::java_string(env, obj)
        })
    }

    fn extension_version(&self, sdk: u32) -> Result<u32, PickerError> {
        crate::picker::android::with_env(|env| {
            let version = env
                .call_static_method(
                    "android/os/ext/SdkExtensions",
                    "getExtensionVersion",
                    "(I)I",
                    &[jni::objects::JValue::Int(sdk as i32)],
                )
                .and_then(|v| v.i())
                .map_err(|e| {
                    crate::picker::android::clear_exception(env);
                    PickerError::PlatformNotSupported(format!("getExtensionVersion failed: {}", e))
                })?;
            Ok(version.max(0) as u32)
        })
    }

    fn pick_images_max_limit(&self) -> Result<u32, PickerError> {
        crate::picker::android::with_env(|env| {
            let limit = env
                .call_static_method("android/provider/MediaStore", "getPickImagesMaxLimit", "()I", &[])
                .and_then(|v| v.i())
                .map_err(|e| {
                    crate::picker::android::clear_exception(env);
                    PickerError::PlatformNotSupported(format!("getPickImagesMaxLimit failed: {}", e))
                })?;
            Ok(limit.max(0) as u32)
        })
    }

    fn media_provider_version(&self) -> Result<String, PickerError> {
        crate::picker::android::with_env(|env| {
            let context = crate::picker::android::app_context();
            let package = jni::objects::JObject::from(
                env.new_string(MEDIA_PROVIDER_PACKAGE).map_err(|e| {
                    crate::picker::android::clear_exception(env);
                    PickerError::Other(format!("new_string failed: {}", e))
                })?,
            );
            let info = env
                .call_method(
                    &context,
                    "getPackageManager",
                    "()Landroid/content/pm/PackageManager;",
                    &[],
                )
                .and_then(|v| v.l())
                .and_then(|pm| {
                    env.call_method(
                        &pm,
                        "getPackageInfo",
                        "(Ljava/lang/String;I)Landroid/content/pm/PackageInfo;",
                        &[
                            jni::objects::JValue::Object(&package),
                            jni::objects::JValue::Int(0),
                        ],
                    )
                })
                .and_then(|v| v.l())
                .and_then(|info| env.get_field(&info, "versionName", "Ljava/lang/String;"))
                .and_then(|v| v.l())
                .map_err(|e| {
                    crate::picker::android::clear_exception(env);
                    PickerError::Other(format!("getPackageInfo failed: {}", e))
                })?;
            if info.is_null() {
                return Err(PickerError::Other("versionName is null".to_string()));
            }
            crate::picker::android::java_string(env, info)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_below_r_has_no_extension_version() {
        let source = StaticCapabilitySource {
            sdk_int: Some(29),
            // Must not be consulted below R
            extension_version: Some(5),
            ..Default::default()
        };
        let info = probe(&source);
        assert_eq!(info.platform_version, 29);
        assert_eq!(info.extension_version, None);
        assert!(!info.enhanced_available);
        assert_eq!(info.enhanced_max, None);
    }

    #[test]
    fn test_extension_zero_is_not_absent() {
        let source = StaticCapabilitySource {
            sdk_int: Some(30),
            extension_version: Some(0),
            pick_images_max_limit: Some(100),
            ..Default::default()
        };
        let info = probe(&source);
        assert_eq!(info.extension_version, Some(0));
        assert!(!info.enhanced_available);
        assert_eq!(info.enhanced_max, None);
    }

    #[test]
    fn test_backported_picker_via_extension() {
        let source = StaticCapabilitySource {
            sdk_int: Some(31),
            extension_version: Some(2),
            pick_images_max_limit: Some(100),
            ..Default::default()
        };
        let info = probe(&source);
        assert!(info.enhanced_available);
        assert_eq!(info.enhanced_max, Some(100));
    }

    #[test]
    fn test_tiramisu_has_picker() {
        let source = StaticCapabilitySource {
            sdk_int: Some(33),
            release: Some("13".to_string()),
            extension_version: Some(3),
            pick_images_max_limit: Some(50),
            media_provider_version: Some("1.2.3".to_string()),
        };
        let info = probe(&source);
        assert!(info.enhanced_available);
        assert_eq!(info.enhanced_max, Some(50));
        assert_eq!(info.release.as_deref(), Some("13"));
        assert_eq!(info.media_provider_version.as_deref(), Some("1.2.3"));
    }

    #[test]
    fn test_picker_without_reported_cap() {
        let source = StaticCapabilitySource {
            sdk_int: Some(34),
            extension_version: Some(7),
            ..Default::default()
        };
        let info = probe(&source);
        assert!(info.enhanced_available);
        assert_eq!(info.enhanced_max, None);
    }

    #[test]
    fn test_failing_queries_degrade_silently() {
        let info = probe(&StaticCapabilitySource::default());
        assert_eq!(info.platform_version, 0);
        assert_eq!(info.extension_version, None);
        assert!(!info.enhanced_available);
        assert_eq!(info.enhanced_max, None);
        assert_eq!(info.release, None);
    }

    #[test]
    fn test_extension_failure_on_r_is_absent() {
        let source = StaticCapabilitySource {
            sdk_int: Some(30),
            pick_images_max_limit: Some(100),
            ..Default::default()
        };
        let info = probe(&source);
        assert_eq!(info.extension_version, None);
        assert!(!info.enhanced_available);
    }
}
