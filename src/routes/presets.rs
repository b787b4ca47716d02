use axum::Json;

use crate::models::preset::{Preset, PRESETS};

/// GET /api/v1/presets — The remix shortcuts, in display order.
pub async fn list_presets() -> Json<&'static [Preset]> {
    Json(PRESETS)
}
