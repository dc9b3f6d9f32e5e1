use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use crate::domain::address::AddressComponents;
use crate::domain::errors::CommerceError;
use crate::domain::ports::{AddressSuggester, AddressSuggestion};

pub const HERE_AUTOSUGGEST_URL: &str = "https://autosuggest.search.hereapi.com/v1/autosuggest";

/// Upstream HERE autosuggest call made by the `/api/here` proxy. Country,
/// result type, limit and language are fixed; the caller picks the bias
/// center.
pub struct HereClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    radius_m: u32,
}

impl HereClient {
    pub fn new(api_key: Option<String>, radius_m: u32) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: HERE_AUTOSUGGEST_URL.to_string(),
            api_key,
            radius_m,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Returns the upstream JSON unmodified.
    pub async fn autosuggest(&self, query: &str, lat: f64, lng: f64) -> Result<Value, CommerceError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| CommerceError::Validation("HERE API key is not configured".to_string()))?;

        let at = format!("{lat},{lng}");
        let radius = self.radius_m.to_string();
        let response = self
            .http
            .get(&self.base_url)
            .query(&[
                ("q", query),
                ("apiKey", api_key),
                ("in", "countryCode:VNM"),
                ("resultType", "address"),
                ("limit", "5"),
                ("lang", "vi"),
                ("at", at.as_str()),
                ("radius", radius.as_str()),
            ])
            .send()
            .await?;

        Ok(response.json().await?)
    }
}

#[derive(Debug, Default, Deserialize)]
struct SuggestResponse {
    #[serde(default)]
    items: Vec<SuggestItem>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct SuggestItem {
    id: String,
    title: String,
    address: SuggestAddress,
    position: SuggestPosition,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct SuggestAddress {
    label: String,
    city: String,
    district: String,
    street: String,
    house_number: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SuggestPosition {
    lat: f64,
    lng: f64,
}

impl From<SuggestItem> for AddressSuggestion {
    fn from(item: SuggestItem) -> Self {
        AddressSuggestion {
            id: item.id,
            title: item.title,
            label: item.address.label,
            components: AddressComponents {
                house_number: item.address.house_number,
                street: item.address.street,
                district: item.address.district,
                city: item.address.city,
            },
            position: (item.position.lat, item.position.lng),
        }
    }
}

/// Parses an autosuggest payload (as relayed by `/api/here`) into suggestions.
pub fn parse_suggestions(body: Value) -> Result<Vec<AddressSuggestion>, CommerceError> {
    let response: SuggestResponse = serde_json::from_value(body)?;
    Ok(response
        .items
        .into_iter()
        .map(AddressSuggestion::from)
        .collect())
}

/// [`AddressSuggester`] going through the storefront's `/api/here` proxy.
pub struct HereSuggester {
    http: reqwest::Client,
    proxy_url: String,
}

impl HereSuggester {
    pub fn new(proxy_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            proxy_url: proxy_url.into(),
        }
    }
}

#[async_trait]
impl AddressSuggester for HereSuggester {
    async fn suggest(&self, query: &str) -> Result<Vec<AddressSuggestion>, CommerceError> {
        let response = self
            .http
            .get(&self.proxy_url)
            .query(&[("q", query)])
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(CommerceError::Transport {
                status: status.as_u16(),
            });
        }
        parse_suggestions(response.json().await?)
    }
}
