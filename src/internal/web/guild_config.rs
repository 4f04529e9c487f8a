//! Guild configuration API used by the custom commands editor.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
};
use serde::Deserialize;

use super::{AppState, error::AppError, require_login};
use crate::internal::{
    custom_command::{SAVE_TYPE, client::PartialGuildConfiguration, editor::SaveRequest},
    db,
};

#[derive(Debug, Default, Deserialize)]
pub struct SectionsQuery {
    /// Comma separated sections to include; everything when absent.
    pub sections: Option<String>,
}

impl SectionsQuery {
    fn includes(&self, section: &str) -> bool {
        match &self.sections {
            None => true,
            Some(sections) => sections.split(',').any(|s| s.trim() == section),
        }
    }
}

pub async fn retrieve(
    State(state): State<AppState>,
    Path(guild_id): Path<u64>,
    Query(query): Query<SectionsQuery>,
    headers: HeaderMap,
) -> Result<Json<PartialGuildConfiguration>, AppError> {
    require_login(&state, &headers).await?;

    let mut config = PartialGuildConfiguration::default();
    if query.includes(SAVE_TYPE) {
        config.custom_commands = db::custom_commands_for_guild(&state.db, guild_id).await?;
    }
    Ok(Json(config))
}

pub async fn save(
    State(state): State<AppState>,
    Path(guild_id): Path<u64>,
    headers: HeaderMap,
    Json(payload): Json<serde_json::Value>,
) -> Result<StatusCode, AppError> {
    let user = require_login(&state, &headers).await?;

    let save_type = payload
        .get("type")
        .and_then(|value| value.as_str())
        .ok_or_else(|| AppError::MalformedPayload("missing `type`".to_string()))?;
    if save_type != SAVE_TYPE {
        return Err(AppError::UnknownSaveType(save_type.to_string()));
    }

    let request: SaveRequest = serde_json::from_value(payload)
        .map_err(|e| AppError::MalformedPayload(e.to_string()))?;
    if let Some(command) = request
        .entries
        .iter()
        .find(|command| command.label.trim().is_empty())
    {
        return Err(AppError::MalformedPayload(format!(
            "custom command with an empty label: {:?}",
            command.code
        )));
    }

    db::replace_custom_commands(&state.db, guild_id, &request.entries).await?;
    tracing::info!(
        guild_id,
        user_id = %user.id,
        count = request.entries.len(),
        "Saved custom commands"
    );
    Ok(StatusCode::NO_CONTENT)
}
