//! Email templates: listing, creation and `{{variable}}` rendering.

use std::collections::HashMap;

use axum::{extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::candidates::queries::require_candidate;
use crate::db::non_blank;
use crate::errors::{require_non_empty, AppError};
use crate::extract::{Json, Path, Query};
use crate::jobs::queries::find_job;
use crate::models::communication::EmailTemplateRow;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateFilters {
    #[serde(rename = "type")]
    pub template_type: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct CreateTemplateRequest {
    pub name: String,
    pub subject: String,
    pub body: String,
    #[serde(rename = "type")]
    pub template_type: String,
    pub variables: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderRequest {
    #[serde(default)]
    pub variables: HashMap<String, Value>,
    /// Prefills `firstName`, `lastName` and `position` from this candidate.
    pub candidate_id: Option<Uuid>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct RenderedTemplate {
    pub subject: String,
    pub body: String,
}

/// GET /api/communications/templates
pub async fn handle_list_templates(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(filters): Query<TemplateFilters>,
) -> Result<Json<Vec<EmailTemplateRow>>, AppError> {
    let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM email_templates WHERE TRUE");
    if let Some(kind) = non_blank(&filters.template_type) {
        qb.push(" AND template_type = ").push_bind(kind.to_string());
    }
    if let Some(active) = filters.is_active {
        qb.push(" AND is_active = ").push_bind(active);
    }
    qb.push(" ORDER BY created_at DESC");

    let templates = qb
        .build_query_as::<EmailTemplateRow>()
        .fetch_all(&state.db)
        .await?;
    Ok(Json(templates))
}

/// POST /api/communications/templates
pub async fn handle_create_template(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(req): Json<CreateTemplateRequest>,
) -> Result<(StatusCode, Json<EmailTemplateRow>), AppError> {
    require_non_empty("name", &req.name)?;
    require_non_empty("subject", &req.subject)?;
    require_non_empty("body", &req.body)?;
    require_non_empty("type", &req.template_type)?;

    // Declared variables default to the placeholders actually used.
    let variables = req.variables.unwrap_or_else(|| {
        let mut names = placeholders(&req.subject);
        for name in placeholders(&req.body) {
            if !names.contains(&name) {
                names.push(name);
            }
        }
        names
    });
    let variables = serde_json::to_value(variables).map_err(|e| AppError::Internal(e.into()))?;

    let template = sqlx::query_as::<_, EmailTemplateRow>(
        r#"
        INSERT INTO email_templates (name, subject, body, template_type, variables)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(req.name.trim())
    .bind(&req.subject)
    .bind(&req.body)
    .bind(req.template_type.trim())
    .bind(variables)
    .fetch_one(&state.db)
    .await?;

    tracing::info!("Email template {} ({}) created", template.id, template.template_type);
    Ok((StatusCode::CREATED, Json(template)))
}

/// POST /api/communications/templates/:id/render
pub async fn handle_render_template(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<RenderRequest>,
) -> Result<Json<RenderedTemplate>, AppError> {
    let template = sqlx::query_as::<_, EmailTemplateRow>("SELECT * FROM email_templates WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Template {id} not found")))?;

    let mut values: HashMap<String, String> = HashMap::new();
    if let Some(candidate_id) = req.candidate_id {
        let candidate = require_candidate(&state.db, candidate_id).await?;
        if let Some(job) = find_job(&state.db, candidate.job_posting_id).await? {
            values.insert("position".to_string(), job.title);
        }
        values.insert("firstName".to_string(), candidate.first_name);
        values.insert("lastName".to_string(), candidate.last_name);
    }
    // Explicit values win over candidate prefill.
    for (name, value) in req.variables {
        values.insert(name, value_text(&value));
    }

    Ok(Json(RenderedTemplate {
        subject: render_template(&template.subject, &values),
        body: render_template(&template.body, &values),
    }))
}

/// Replaces every `{{name}}` (inner whitespace allowed) with its value.
/// Unknown names are left verbatim; substituted text is not rescanned.
pub fn render_template(template: &str, values: &HashMap<String, String>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find("{{") {
        out.push_str(&rest[..open]);
        let after_open = &rest[open + 2..];
        let Some(close) = after_open.find("}}") else {
            out.push_str(&rest[open..]);
            return out;
        };
        let name = after_open[..close].trim();
        match values.get(name) {
            Some(value) if !name.is_empty() => out.push_str(value),
            _ => out.push_str(&rest[open..open + 2 + close + 2]),
        }
        rest = &after_open[close + 2..];
    }
    out.push_str(rest);
    out
}

/// Placeholder names in order of first appearance.
pub fn placeholders(template: &str) -> Vec<String> {
    let mut names = Vec::new();
    let mut rest = template;
    while let Some(open) = rest.find("{{") {
        let after_open = &rest[open + 2..];
        let Some(close) = after_open.find("}}") else {
            break;
        };
        let name = after_open[..close].trim();
        if !name.is_empty() && !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
        rest = &after_open[close + 2..];
    }
    names
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_render_substitutes_known_names() {
        let out = render_template(
            "Hi {{firstName}}, re: {{ position }}",
            &vars(&[("firstName", "Ada"), ("position", "Engineer")]),
        );
        assert_eq!(out, "Hi Ada, re: Engineer");
    }

    #[test]
    fn test_render_leaves_unknown_and_unclosed_verbatim() {
        let values = vars(&[("firstName", "Ada")]);
        assert_eq!(
            render_template("{{firstName}} starts {{startDate}}", &values),
            "Ada starts {{startDate}}"
        );
        assert_eq!(render_template("Dear {{firstName", &values), "Dear {{firstName");
        assert_eq!(render_template("{{}}", &values), "{{}}");
    }

    #[test]
    fn test_render_does_not_rescan_values() {
        let values = vars(&[("a", "{{b}}"), ("b", "boom")]);
        assert_eq!(render_template("{{a}}", &values), "{{b}}");
    }

    #[test]
    fn test_placeholders_in_first_appearance_order() {
        assert_eq!(
            placeholders("{{position}} for {{firstName}}, {{position}} {{ salary }}"),
            vec!["position", "firstName", "salary"]
        );
        assert!(placeholders("no variables {{").is_empty());
    }

    #[test]
    fn test_value_text() {
        assert_eq!(value_text(&json!("x")), "x");
        assert_eq!(value_text(&json!(120000)), "120000");
        assert_eq!(value_text(&Value::Null), "");
    }
}
