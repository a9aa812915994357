//! GET /api/park-info - park details proxy.
//!
//! Fetches park details and alerts for a single park in parallel and
//! returns a trimmed payload: operating hours (with up to five upcoming
//! exceptions each), current alerts, entrance fees, and primary contacts.

use axum::Json;
use axum::extract::{Query, State};
use serde::{Deserialize, Serialize};

use super::{AppState, fetched_at};
use crate::error::ProxyError;
use crate::nps::{NpsAlert, NpsPark};

/// Exceptions shown per operating-hours block.
const MAX_EXCEPTIONS: usize = 5;

#[derive(Debug, Deserialize)]
pub struct ParkInfoQuery {
    #[serde(rename = "parkCode")]
    pub park_code: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HoursException {
    pub name: String,
    pub start_date: String,
    pub end_date: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperatingHours {
    pub name: String,
    pub description: String,
    pub standard_hours: Option<serde_json::Value>,
    pub exceptions: Vec<HoursException>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParkAlert {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntranceFee {
    pub cost: String,
    pub description: String,
    pub title: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Contacts {
    pub phone: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParkInfoResponse {
    pub park_code: String,
    pub name: String,
    pub url: String,
    pub hours: Vec<OperatingHours>,
    pub alerts: Vec<ParkAlert>,
    pub entrance_fees: Vec<EntranceFee>,
    pub contacts: Contacts,
    pub fetched_at: String,
}

fn map_park(park_code: String, park: NpsPark, alerts: Vec<NpsAlert>) -> ParkInfoResponse {
    let hours = park
        .operating_hours
        .into_iter()
        .map(|oh| OperatingHours {
            name: oh.name,
            description: oh.description,
            standard_hours: oh.standard_hours,
            exceptions: oh
                .exceptions
                .into_iter()
                .take(MAX_EXCEPTIONS)
                .map(|ex| HoursException { name: ex.name, start_date: ex.start_date, end_date: ex.end_date })
                .collect(),
        })
        .collect();

    let alerts = alerts
        .into_iter()
        .map(|a| ParkAlert { id: a.id, title: a.title, description: a.description, category: a.category, url: a.url })
        .collect();

    let entrance_fees = park
        .entrance_fees
        .into_iter()
        .map(|f| EntranceFee { cost: f.cost, description: f.description, title: f.title })
        .collect();

    let contacts = Contacts {
        phone: park
            .contacts
            .phone_numbers
            .iter()
            .find(|p| p.kind == "Voice")
            .map(|p| p.phone_number.clone()),
        email: park
            .contacts
            .email_addresses
            .first()
            .map(|e| e.email_address.clone()),
    };

    ParkInfoResponse {
        park_code,
        name: park.full_name,
        url: park.url,
        hours,
        alerts,
        entrance_fees,
        contacts,
        fetched_at: fetched_at(),
    }
}

pub async fn handle(
    State(state): State<AppState>, Query(query): Query<ParkInfoQuery>,
) -> Result<Json<ParkInfoResponse>, ProxyError> {
    let park_code = query
        .park_code
        .filter(|code| !code.is_empty())
        .ok_or(ProxyError::MissingParkCode("parkCode query parameter required"))?;

    let api_key = state
        .config
        .require_nps_api_key()
        .map_err(|_| ProxyError::MissingApiKey)?;

    let (parks, alerts) = tokio::try_join!(
        state.nps.parks(api_key, &park_code),
        state.nps.alerts(api_key, &park_code, 20)
    )
    .map_err(|e| ProxyError::Upstream { detail: e.to_string() })?;

    let park = parks
        .into_iter()
        .next()
        .ok_or_else(|| ProxyError::ParkNotFound(park_code.clone()))?;

    Ok(Json(map_park(park_code, park, alerts)))
}
