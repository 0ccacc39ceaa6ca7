use std::collections::HashMap;

use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use crate::database::models::CreateAuditInput;
use crate::database::repositories::audit as audit_repo;
use crate::middleware::request_info::RequestInfo;
use crate::services::team_membership::MembershipPlan;

/// Record a team action in the audit log, inside the caller's transaction
pub async fn log_team_activity(
    tx: &mut Transaction<'_, Postgres>,
    team_id: Uuid,
    user_id: Option<Uuid>,
    action: &str,
    description: String,
    metadata: Option<HashMap<String, serde_json::Value>>,
    req_info: &RequestInfo,
) -> Result<(), sqlx::Error> {
    let mut details = metadata.unwrap_or_default();
    details.insert(
        "description".to_string(),
        serde_json::Value::String(description),
    );

    let request = CreateAuditInput {
        team_id,
        user_id,
        action: action.to_string(),
        details: Some(details),
        ip_address: Some(req_info.ip_address.clone()),
        user_agent: Some(req_info.user_agent.clone()),
    };

    audit_repo::log_team_action(tx, request).await?;
    Ok(())
}

/// Record the audit entry that accompanies a membership plan
pub async fn log_plan(
    tx: &mut Transaction<'_, Postgres>,
    team_id: Uuid,
    user_id: Uuid,
    plan: &MembershipPlan,
    req_info: &RequestInfo,
) -> Result<(), sqlx::Error> {
    let metadata = metadata(
        plan.details
            .iter()
            .map(|(key, value)| (*key, value.clone()))
            .collect(),
    );

    log_team_activity(
        tx,
        team_id,
        Some(user_id),
        plan.action,
        plan.description.clone(),
        Some(metadata),
        req_info,
    )
    .await
}

pub fn metadata(pairs: Vec<(&str, String)>) -> HashMap<String, serde_json::Value> {
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), serde_json::Value::String(v)))
        .collect()
}
