// Platform picker bridge
//
// This module launches picker intents through the host activity. On Android it
// uses JNI to call MainActivity methods and exchanges requests and results as
// JSON. On other platforms launching returns a platform error.

use crate::models::{ActivityResult, TypeFilter};
use crate::strategy::PickerIntent;
use std::time::Duration;

#[derive(Debug)]
pub enum PickerError {
    PermissionDenied(String),
    Timeout(String),
    PlatformNotSupported(String),
    /// The local media index could not be opened or enumerated
    QueryFailure(String),
    UnsupportedFilter(TypeFilter),
    Other(String),
}

impl std::fmt::Display for PickerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PickerError::PermissionDenied(msg) => write!(f, "Permission denied: {}", msg),
            PickerError::Timeout(msg) => write!(f, "Timeout: {}", msg),
            PickerError::PlatformNotSupported(msg) => write!(f, "Platform not supported: {}", msg),
            PickerError::QueryFailure(msg) => write!(f, "Query failed: {}", msg),
            PickerError::UnsupportedFilter(filter) => {
                write!(f, "Filter '{}' is not supported by this picker", filter)
            }
            PickerError::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for PickerError {}

impl From<rusqlite::Error> for PickerError {
    fn from(err: rusqlite::Error) -> Self {
        PickerError::QueryFailure(err.to_string())
    }
}

impl From<serde_json::Error> for PickerError {
    fn from(err: serde_json::Error) -> Self {
        PickerError::Other(format!("Invalid picker payload: {}", err))
    }
}

const DEFAULT_MAIN_ACTIVITY_CLASS: &str = "com/samples/storage/playground/MainActivity";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
#[cfg(target_os = "android")]
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Configuration for the picker on Android
///
/// This allows customization of the MainActivity class name for different apps.
#[derive(Debug, Clone)]
pub struct AndroidPickerConfig {
    /// Fully qualified class name in slash format (e.g., "com/example/myapp/MainActivity")
    pub main_activity_class: String,
    /// How long to wait for the activity to deliver a result
    pub timeout: Duration,
}

impl Default for AndroidPickerConfig {
    fn default() -> Self {
        Self {
            main_activity_class: DEFAULT_MAIN_ACTIVITY_CLASS.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Launches one picker intent and waits for its single result.
///
/// A user dismissing the picker is a successful launch with a non-OK result
/// code, not an error.
pub trait PickerLauncher: Send + Sync {
    fn launch(&self, intent: &PickerIntent) -> Result<ActivityResult, PickerError>;
}

/// Launcher backed by the host activity
#[derive(Debug, Clone, Default)]
pub struct ActivityPickerLauncher {
    config: AndroidPickerConfig,
}

impl ActivityPickerLauncher {
    pub fn new(config: AndroidPickerConfig) -> Self {
        Self { config }
    }
}

#[cfg(not(target_os = "android"))]
impl PickerLauncher for ActivityPickerLauncher {
    fn launch(&self, intent: &PickerIntent) -> Result<ActivityResult, PickerError> {
        log::debug!(
            "Cannot launch {} for {}: no host activity",
            intent.action,
            self.config.main_activity_class
        );
        Err(PickerError::PlatformNotSupported(
            "Content picker not available on this platform".to_string(),
        ))
    }
}

#[cfg(target_os = "android")]
impl PickerLauncher for ActivityPickerLauncher {
    fn launch(&self, intent: &PickerIntent) -> Result<ActivityResult, PickerError> {
        let request = serde_json::to_string(intent)?;
        let config = &self.config;

        android::with_env(|env| {
            let (activity, main_cls) = android::get_activity_instance(env, config)?;

            // Clear previous result and error
            env.call_static_method(&main_cls, "clearLastPickerResult", "()V", &[])
                .map_err(|e| android::denied(env, "clearLastPickerResult", e))?;
            env.call_static_method(&main_cls, "clearLastError", "()V", &[])
                .map_err(|e| android::denied(env, "clearLastError", e))?;

            let request = jni::objects::JObject::from(env.new_string(&request).map_err(|e| {
                android::clear_exception(env);
                PickerError::Other(format!("new_string failed: {}", e))
            })?);
            env.call_method(
                &activity,
                "launchContentPicker",
                "(Ljava/lang/String;)V",
                &[jni::objects::JValue::Object(&request)],
            )
            .map_err(|e| android::denied(env, "launchContentPicker", e))?;
            log::debug!("Launched {} and waiting for result", intent.action);

            let attempts = (config.timeout.as_millis() / POLL_INTERVAL.as_millis()).max(1);
            for _ in 0..attempts {
                std::thread::sleep(POLL_INTERVAL);

                if let Some(json) =
                    android::static_string(env, &main_cls, "getLastPickerResult")?
                {
                    let result: ActivityResult = serde_json::from_str(&json)?;
                    return Ok(result);
                }

                if let Some(err) = android::static_string(env, &main_cls, "getLastError")? {
                    return Err(PickerError::PermissionDenied(err));
                }
            }

            Err(PickerError::Timeout(format!(
                "{} - no result within {}s",
                intent.action,
                config.timeout.as_secs()
            )))
        })
    }
}

/// JNI helpers shared by the Android picker, capability and media index code
#[cfg(target_os = "android")]
pub(crate) mod android {
    use super::{AndroidPickerConfig, PickerError};
    use jni::objects::{JClass, JObject, JString, JValue};
    use jni::JNIEnv;
    use ndk_context::android_context;

    /// Attaches the current thread to the VM and runs `f` with its environment
    pub(crate) fn with_env<T>(
        f: impl FnOnce(&mut JNIEnv) -> Result<T, PickerError>,
    ) -> Result<T, PickerError> {
        let vm_ptr = android_context().vm() as *mut *const jni::sys::JNIInvokeInterface_;
        let vm = unsafe { jni::JavaVM::from_raw(vm_ptr) }
            .map_err(|e| PickerError::PermissionDenied(format!("JavaVM failed: {}", e)))?;
        let mut env = vm
            .attach_current_thread()
            .map_err(|e| PickerError::PermissionDenied(format!("JNI attach failed: {}", e)))?;
        f(&mut env)
    }

    /// The application context handed to the native activity
    pub(crate) fn app_context<'a>() -> JObject<'a> {
        let context_ptr = android_context().context();
        unsafe { JObject::from_raw(context_ptr as jni::sys::jobject) }
    }

    /// Clears a pending Java exception so later JNI calls stay valid
    pub(crate) fn clear_exception(env: &mut JNIEnv) {
        if env.exception_check().unwrap_or(false) {
            let _ = env.exception_clear();
        }
    }

    /// Clears the pending exception of a failed call into the activity
    pub(crate) fn denied(env: &mut JNIEnv, what: &str, e: jni::errors::Error) -> PickerError {
        clear_exception(env);
        PickerError::PermissionDenied(format!("{} failed: {}", what, e))
    }

    pub(crate) fn java_string(env: &mut JNIEnv, obj: JObject) -> Result<String, PickerError> {
        let jstr = JString::from(obj);
        let value: String = env
            .get_string(&jstr)
            .map_err(|e| {
                clear_exception(env);
                PickerError::Other(format!("String conversion failed: {}", e))
            })?
            .into();
        Ok(value)
    }

    /// Calls a static `()String` method; `None` when it returned null or failed
    pub(crate) fn static_string(
        env: &mut JNIEnv,
        cls: &JClass,
        method: &str,
    ) -> Result<Option<String>, PickerError> {
        let obj = match env
            .call_static_method(cls, method, "()Ljava/lang/String;", &[])
            .and_then(|v| v.l())
        {
            Ok(obj) => obj,
            Err(_) => {
                clear_exception(env);
                return Ok(None);
            }
        };
        if obj.is_null() {
            return Ok(None);
        }
        java_string(env, obj).map(Some)
    }

    fn get_app_class_loader<'a>(env: &mut JNIEnv<'a>) -> Result<JObject<'a>, PickerError> {
        // ActivityThread.currentActivityThread()
        let at_cls = env
            .find_class("android/app/ActivityThread")
            .map_err(|e| denied(env, "find_class(ActivityThread)", e))?;
        let at = env
            .call_static_method(
                &at_cls,
                "currentActivityThread",
                "()Landroid/app/ActivityThread;",
                &[],
            )
            .and_then(|v| v.l())
            .map_err(|e| denied(env, "currentActivityThread", e))?;

        // Prefer application class loader
        let app = env
            .call_method(&at, "getApplication", "()Landroid/app/Application;", &[])
            .and_then(|v| v.l())
            .map_err(|e| denied(env, "getApplication", e))?;

        let owner = if app.is_null() {
            // Fallback: system context
            env.call_method(&at, "getSystemContext", "()Landroid/app/ContextImpl;", &[])
                .and_then(|v| v.l())
                .map_err(|e| denied(env, "getSystemContext", e))?
        } else {
            app
        };

        env.call_method(&owner, "getClassLoader", "()Ljava/lang/ClassLoader;", &[])
            .and_then(|v| v.l())
            .map_err(|e| denied(env, "getClassLoader", e))
    }

    fn load_class<'a>(
        env: &mut JNIEnv<'a>,
        loader: &JObject<'a>,
        fq_slash: &str,
    ) -> Result<JClass<'a>, PickerError> {
        // com/example/MainActivity -> com.example.MainActivity for ClassLoader.loadClass
        let fq_dot = fq_slash.replace('/', ".");
        let name: JString = env
            .new_string(fq_dot)
            .map_err(|e| denied(env, "new_string", e))?;
        let cls_obj = env
            .call_method(
                loader,
                "loadClass",
                "(Ljava/lang/String;)Ljava/lang/Class;",
                &[JValue::Object(&JObject::from(name))],
            )
            .and_then(|v| v.l())
            .map_err(|e| denied(env, "ClassLoader.loadClass", e))?;
        Ok(JClass::from(cls_obj))
    }

    fn companion_instance<'a>(
        env: &mut JNIEnv<'a>,
        cls: &JClass<'a>,
        config: &AndroidPickerConfig,
        signature: &str,
    ) -> Result<JObject<'a>, PickerError> {
        let comp_signature = format!("L{}$Companion;", config.main_activity_class);
        let comp_obj = env
            .get_static_field(cls, "Companion", &comp_signature)
            .and_then(|v| v.l())
            .map_err(|e| denied(env, "Companion field", e))?;

        if comp_obj.is_null() {
            return Err(PickerError::PermissionDenied(
                "MainActivity.Companion is null - activity not initialized?".to_string(),
            ));
        }

        env.call_method(&comp_obj, "getInstance", signature, &[])
            .and_then(|v| v.l())
            .map_err(|e| denied(env, "Companion.getInstance()", e))
    }

    pub(crate) fn get_activity_instance<'a>(
        env: &mut JNIEnv<'a>,
        config: &AndroidPickerConfig,
    ) -> Result<(JObject<'a>, JClass<'a>), PickerError> {
        let loader = get_app_class_loader(env)?;
        let cls = load_class(env, &loader, &config.main_activity_class)?;

        let signature = format!("()L{};", config.main_activity_class);

        // Primary attempt: the static helper generated by `@JvmStatic`
        let instance = match env
            .call_static_method(&cls, "getInstance", &signature, &[])
            .and_then(|v| v.l())
        {
            Ok(inst) => inst,
            Err(_) => {
                clear_exception(env);
                let field_signature = format!("L{};", config.main_activity_class);
                match env
                    .get_static_field(&cls, "instance", &field_signature)
                    .and_then(|v| v.l())
                {
                    Ok(inst) if !inst.is_null() => inst,
                    _ => {
                        clear_exception(env);
                        companion_instance(env, &cls, config, &signature)?
                    }
                }
            }
        };

        if instance.is_null() {
            return Err(PickerError::PermissionDenied(
                "MainActivity instance is null - Activity not initialized?".to_string(),
            ));
        }

        Ok((instance, cls))
    }
}
