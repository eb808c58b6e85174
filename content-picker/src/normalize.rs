use crate::models::{ItemReference, SelectionResult};

/// Merges a primary reference and an optional clip data payload into one
/// ordered, duplicate-free result.
///
/// The primary reference (intent data) comes first. Clip data follows in its
/// given order; items without a reference and repeats of anything already
/// collected are skipped, so the first occurrence decides the position.
/// With neither a primary nor clip data the result is empty.
pub fn normalize(
    primary: Option<&ItemReference>,
    secondary: Option<&[Option<ItemReference>]>,
) -> SelectionResult {
    let primary = primary.cloned();

    let Some(clip_items) = secondary else {
        // No clip data: either nothing at all or exactly the primary
        return primary.into_iter().collect();
    };

    primary
        .into_iter()
        .chain(clip_items.iter().flatten().cloned())
        .collect()
}
