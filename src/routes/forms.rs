use axum::{extract::State, Json};
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::{
    error::{AppError, AppResult},
    state::AppState,
    webhooks::FormType,
};

use super::extract::JsonBody;

const INVALID_FORM_TYPE: &str = "Invalid form type";

pub async fn relay_form(
    State(state): State<AppState>,
    JsonBody(body): JsonBody,
) -> AppResult<Json<Value>> {
    let Value::Object(mut payload) = body else {
        return Err(AppError::bad_request("request body must be a JSON object"));
    };

    let form_type = match payload.remove("formType") {
        Some(Value::String(raw)) => FormType::parse(&raw),
        _ => None,
    }
    .ok_or_else(|| AppError::bad_request(INVALID_FORM_TYPE))?;

    let Some(url) = state.config.webhooks.for_form(form_type) else {
        warn!(form_type = %form_type, "no webhook configured for form type");
        return Err(AppError::bad_request(INVALID_FORM_TYPE));
    };

    state
        .webhooks
        .post_json(url, &Value::Object(payload))
        .await
        .map_err(|err| AppError::downstream("Failed to submit form", err))?;

    info!(form_type = %form_type, "relayed form submission");
    Ok(Json(json!({ "success": true })))
}
