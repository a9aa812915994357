//! GET /api/alerts - NPS alerts proxy.
//!
//! Forwards alert requests to the NPS API, keeping the API key
//! server-side. `parkCode` accepts a comma-separated list.

use axum::Json;
use axum::extract::{Query, State};
use serde::{Deserialize, Serialize};

use super::{AppState, fetched_at};
use crate::error::ProxyError;
use crate::nps::NpsAlert;

#[derive(Debug, Deserialize)]
pub struct AlertsQuery {
    #[serde(rename = "parkCode")]
    pub park_code: Option<String>,
}

/// An alert with only the fields the client renders.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertSummary {
    pub id: String,
    pub park_code: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub url: String,
    pub last_indexed_date: String,
}

impl From<NpsAlert> for AlertSummary {
    fn from(alert: NpsAlert) -> Self {
        Self {
            id: alert.id,
            park_code: alert.park_code,
            title: alert.title,
            description: alert.description,
            category: alert.category,
            url: alert.url,
            last_indexed_date: alert.last_indexed_date,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertsResponse {
    pub total: usize,
    pub alerts: Vec<AlertSummary>,
    pub fetched_at: String,
}

pub async fn handle(
    State(state): State<AppState>, Query(query): Query<AlertsQuery>,
) -> Result<Json<AlertsResponse>, ProxyError> {
    let park_code = query
        .park_code
        .filter(|code| !code.is_empty())
        .ok_or(ProxyError::MissingParkCode(
            "parkCode query parameter required (comma-separated, e.g. yose,acad)",
        ))?;

    let api_key = state
        .config
        .require_nps_api_key()
        .map_err(|_| ProxyError::MissingApiKey)?;

    let alerts = state
        .nps
        .alerts(api_key, &park_code, 100)
        .await
        .map_err(|e| ProxyError::Upstream { detail: e.to_string() })?;

    let alerts: Vec<AlertSummary> = alerts.into_iter().map(AlertSummary::from).collect();

    Ok(Json(AlertsResponse { total: alerts.len(), alerts, fetched_at: fetched_at() }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_alert() -> NpsAlert {
        serde_json::from_str(
            r#"{
                "id": "A1",
                "parkCode": "yose",
                "title": "Road closed",
                "description": "Snow",
                "category": "Danger",
                "url": "https://nps.gov/alert/A1",
                "lastIndexedDate": "2024-01-02",
                "relatedRoadEvents": []
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_summary_keeps_relevant_fields_only() {
        let summary = AlertSummary::from(sample_alert());
        let json = serde_json::to_value(&summary).unwrap();

        assert_eq!(json["parkCode"], "yose");
        assert_eq!(json["lastIndexedDate"], "2024-01-02");
        assert!(json.get("relatedRoadEvents").is_none());
    }

    #[test]
    fn test_response_shape() {
        let response =
            AlertsResponse { total: 1, alerts: vec![AlertSummary::from(sample_alert())], fetched_at: fetched_at() };
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["total"], 1);
        assert!(json["alerts"].is_array());
        assert!(json["fetchedAt"].is_string());
    }

    #[test]
    fn test_query_park_code_rename() {
        let query: AlertsQuery = serde_json::from_str(r#"{"parkCode":"yose,acad"}"#).unwrap();
        assert_eq!(query.park_code.as_deref(), Some("yose,acad"));
    }
}
