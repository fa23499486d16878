use pinmap_shared::models::MapData;
use pinmap_shared::ConfigLoadError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct GraphQLRequest {
    pub query: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphQLResponse<T> {
    pub data: Option<T>,
    pub errors: Option<Vec<GraphQLError>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphQLError {
    pub message: String,
}

impl<T> GraphQLResponse<T> {
    /// First reported error wins; a response with neither data nor errors is malformed.
    pub fn into_result(self) -> Result<T, ConfigLoadError> {
        if let Some(errors) = self.errors {
            if let Some(first) = errors.into_iter().next() {
                return Err(ConfigLoadError::Server(first.message));
            }
        }
        self.data
            .ok_or_else(|| ConfigLoadError::Malformed("no data returned".to_string()))
    }
}

fn api_url() -> Result<String, ConfigLoadError> {
    // Same origin as the page; the backend serves both.
    let origin = web_sys::window()
        .and_then(|w| w.location().origin().ok())
        .ok_or_else(|| ConfigLoadError::Network("no window location".to_string()))?;
    Ok(format!("{}/graphql", origin))
}

async fn query<T: for<'de> Deserialize<'de>>(query_str: &str) -> Result<T, ConfigLoadError> {
    let req = GraphQLRequest {
        query: query_str.to_string(),
    };

    let resp = reqwest::Client::new()
        .post(api_url()?)
        .json(&req)
        .send()
        .await
        .map_err(|e| ConfigLoadError::Network(e.to_string()))?;

    let status = resp.status();
    if !status.is_success() {
        return Err(ConfigLoadError::Status(status.as_u16()));
    }

    let gql_resp: GraphQLResponse<T> = resp
        .json()
        .await
        .map_err(|e| ConfigLoadError::Malformed(e.to_string()))?;
    gql_resp.into_result()
}

#[derive(Deserialize)]
pub struct MapDataResponse {
    #[serde(rename = "mapData")]
    pub map_data: serde_json::Value,
}

/// Fetch and validate the configuration document.
pub async fn fetch_map_data() -> Result<MapData, ConfigLoadError> {
    let resp: MapDataResponse = query("query { mapData }").await?;
    let data = MapData::from_value(resp.map_data)?;
    tracing::info!(pins = data.pins.len(), "map data loaded");
    Ok(data)
}
