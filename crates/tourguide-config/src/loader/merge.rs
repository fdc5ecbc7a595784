//! Overlaying one `tourguide.json5` layer on the layers below it.

use serde_json::Value;

/// Apply `overlay` on top of `base`.
///
/// Sections such as `storage` or `chat` merge key by key, so a cwd layer can
/// change `backend.base_url` without restating `chat_path`. Anything that is
/// not an object, including the `campus.buildings` list, is replaced outright.
pub(super) fn merge_json_values(base: &mut Value, overlay: &Value) {
    if let (Value::Object(base_map), Value::Object(overlay_map)) = (&mut *base, overlay) {
        for (key, value) in overlay_map {
            if let Some(existing) = base_map.get_mut(key) {
                merge_json_values(existing, value);
            } else {
                base_map.insert(key.clone(), value.clone());
            }
        }
        return;
    }
    *base = overlay.clone();
}
