/// Effective limit when the platform reports no cap
pub const NO_LIMIT: u32 = u32::MAX;

/// Minimum for contexts where a single item is an acceptable selection
pub const SINGLE_CAPABLE_MINIMUM: u32 = 1;

/// Minimum for multi-select actions; choosing 1 would contradict the action
pub const MULTI_SELECT_MINIMUM: u32 = 2;

/// Default maximum for a local media multi-select session
pub const LOCAL_PICKER_MAX_ITEMS: u32 = 100;

/// Derives the effective maximum selection count.
///
/// Without a platform cap the result is [`NO_LIMIT`] whatever was chosen.
/// With a cap the chosen value (defaulting to the cap) is clamped to
/// `[strategy_minimum, platform_max]`. Out-of-range choices are clamped, never
/// reported. A cap below the strategy minimum wins over the minimum.
pub fn reconcile(platform_max: Option<u32>, chosen: Option<u32>, strategy_minimum: u32) -> u32 {
    let Some(platform_max) = platform_max else {
        return NO_LIMIT;
    };

    let lower = strategy_minimum.min(platform_max);
    chosen.unwrap_or(platform_max).clamp(lower, platform_max)
}
