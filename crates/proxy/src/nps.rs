//! NPS API upstream client.
//!
//! Thin client for the National Park Service data API. The API key is
//! passed per call so its presence can be validated lazily, when a proxy
//! request actually needs it.

use reqwest::Client;
use serde::Deserialize;

use trailguide_core::{AppConfig, Error};

/// Default base URL for the NPS API.
const DEFAULT_BASE_URL: &str = "https://developer.nps.gov/api/v1";

/// Standard NPS response envelope; every endpoint wraps its payload in
/// a `data` array.
#[derive(Debug, Deserialize)]
pub struct NpsEnvelope<T> {
    #[serde(default)]
    pub data: Vec<T>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NpsAlert {
    pub id: String,
    pub park_code: String,
    pub title: String,
    pub description: String,
    /// "Danger", "Caution", "Information", or "Park Closure".
    pub category: String,
    pub url: String,
    pub last_indexed_date: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NpsPark {
    pub full_name: String,
    pub url: String,
    pub operating_hours: Vec<NpsOperatingHours>,
    pub entrance_fees: Vec<NpsEntranceFee>,
    pub contacts: NpsContacts,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NpsOperatingHours {
    pub name: String,
    pub description: String,
    pub standard_hours: Option<serde_json::Value>,
    pub exceptions: Vec<NpsException>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NpsException {
    pub name: String,
    pub start_date: String,
    pub end_date: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NpsEntranceFee {
    pub cost: String,
    pub description: String,
    pub title: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NpsContacts {
    pub phone_numbers: Vec<NpsPhone>,
    pub email_addresses: Vec<NpsEmail>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NpsPhone {
    pub phone_number: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NpsEmail {
    pub email_address: String,
}

/// NPS API client.
#[derive(Debug, Clone)]
pub struct NpsClient {
    http: Client,
    base_url: String,
}

impl NpsClient {
    /// Create a new client from the application configuration.
    pub fn new(config: &AppConfig) -> Result<Self, Error> {
        let http = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout())
            .use_rustls_tls()
            .build()
            .map_err(|e| Error::FetchFailed(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { http, base_url: DEFAULT_BASE_URL.to_string() })
    }

    async fn get<T: serde::de::DeserializeOwned + Default>(
        &self, path: &str, api_key: &str, query: &[(&str, &str)],
    ) -> Result<Vec<T>, Error> {
        let url = format!("{}/{}", self.base_url, path);

        let response = self
            .http
            .get(&url)
            .query(query)
            .query(&[("api_key", api_key)])
            .send()
            .await
            .map_err(|e| Error::FetchFailed(format!("network error: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::HttpError(format!("NPS API returned {}", status.as_u16())));
        }

        let envelope: NpsEnvelope<T> = response
            .json()
            .await
            .map_err(|e| Error::HttpError(format!("failed to parse NPS response: {}", e)))?;

        Ok(envelope.data)
    }

    /// Fetch alerts for one or more parks (comma-separated codes).
    pub async fn alerts(&self, api_key: &str, park_code: &str, limit: u32) -> Result<Vec<NpsAlert>, Error> {
        tracing::debug!(park_code, limit, "fetching NPS alerts");
        self.get("alerts", api_key, &[("parkCode", park_code), ("limit", &limit.to_string())])
            .await
    }

    /// Fetch park details for a single park code.
    pub async fn parks(&self, api_key: &str, park_code: &str) -> Result<Vec<NpsPark>, Error> {
        tracing::debug!(park_code, "fetching NPS park details");
        self.get("parks", api_key, &[("parkCode", park_code)]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_tolerates_missing_data() {
        let envelope: NpsEnvelope<NpsAlert> = serde_json::from_str(r#"{"total":"0"}"#).unwrap();
        assert!(envelope.data.is_empty());
    }

    #[test]
    fn test_alert_deserializes_nps_fields() {
        let json = r#"{
            "id": "A1",
            "parkCode": "yose",
            "title": "Road closed",
            "description": "Snow",
            "category": "Park Closure",
            "url": "https://nps.gov/alert/A1",
            "lastIndexedDate": "2024-01-02 03:04:05.0"
        }"#;
        let alert: NpsAlert = serde_json::from_str(json).unwrap();
        assert_eq!(alert.park_code, "yose");
        assert_eq!(alert.category, "Park Closure");
        assert_eq!(alert.last_indexed_date, "2024-01-02 03:04:05.0");
    }

    #[test]
    fn test_park_tolerates_sparse_payload() {
        let park: NpsPark = serde_json::from_str(r#"{"fullName":"Yosemite National Park"}"#).unwrap();
        assert_eq!(park.full_name, "Yosemite National Park");
        assert!(park.operating_hours.is_empty());
        assert!(park.contacts.phone_numbers.is_empty());
    }

    #[test]
    fn test_phone_type_field() {
        let phone: NpsPhone = serde_json::from_str(r#"{"phoneNumber":"209/372-0200","type":"Voice"}"#).unwrap();
        assert_eq!(phone.kind, "Voice");
    }
}
