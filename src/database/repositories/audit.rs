use std::collections::HashMap;

use sqlx::{Postgres, Transaction};

use crate::database::{
    models::{CreateAuditInput, TeamAuditLog},
    utils::sql,
};

/// Append an entry to the team audit log
pub async fn log_team_action(
    tx: &mut Transaction<'_, Postgres>,
    request: CreateAuditInput,
) -> Result<TeamAuditLog, sqlx::Error> {
    let details_json = encode_details(request.details.as_ref())?;

    let entry = sqlx::query_as::<_, TeamAuditLog>(&sql(r#"
        INSERT INTO
            team_audit_logs (
                team_id,
                user_id,
                action,
                details,
                ip_address,
                user_agent
            )
        VALUES (?, ?, ?, ?, ?, ?)
        RETURNING
            id,
            team_id,
            user_id,
            action,
            details,
            ip_address,
            user_agent,
            created_at
    "#))
    .bind(request.team_id)
    .bind(request.user_id)
    .bind(request.action)
    .bind(details_json)
    .bind(request.ip_address)
    .bind(request.user_agent)
    .fetch_one(&mut **tx)
    .await?;

    Ok(entry)
}

/// Serialize audit details for the text column
fn encode_details(
    details: Option<&HashMap<String, serde_json::Value>>,
) -> Result<Option<String>, sqlx::Error> {
    details
        .map(|d| serde_json::to_string(d).map_err(|e| sqlx::Error::Encode(Box::new(e))))
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_encode_details_writes_a_json_object() {
        let mut details = HashMap::new();
        details.insert(
            "team_name".to_string(),
            serde_json::Value::String("Night Owls".to_string()),
        );

        let encoded = encode_details(Some(&details)).unwrap().unwrap();
        let decoded: serde_json::Value = serde_json::from_str(&encoded).unwrap();

        assert_eq!(decoded["team_name"], "Night Owls");
    }

    #[test]
    fn test_encode_details_keeps_missing_details_null() {
        assert_eq!(encode_details(None).unwrap(), None);
    }
}
