//! `WardrobeApi` over HTTP using reqwest

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

use wardrobe_domain::{FilterCriteria, Item, ItemId, ItemPatch, NewItem};
use wardrobe_sync::{ApiError, WardrobeApi};

use crate::config::{ClientConfig, ConfigError};

/// Path of the clothing item collection, relative to the server root.
pub const ITEMS_PATH: &str = "/wardrobe/clothing-items";

pub struct HttpWardrobeApi {
    client: Client,
    root: String,
    user_agent: String,
    auth_token: Option<String>,
}

impl HttpWardrobeApi {
    pub fn new(config: ClientConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ConfigError::Client(e.to_string()))?;

        Ok(Self {
            client,
            root: config.base_url.trim_end_matches('/').to_string(),
            user_agent: config.user_agent,
            auth_token: config.auth_token,
        })
    }

    /// URL of the item collection.
    pub fn items_url(&self) -> String {
        format!("{}{}", self.root, ITEMS_PATH)
    }

    /// URL of one item, or of an action on it when `action` is given.
    pub fn item_url(&self, id: ItemId, action: Option<&str>) -> String {
        match action {
            Some(action) => format!("{}{}/{}/{}", self.root, ITEMS_PATH, id, action),
            None => format!("{}{}/{}", self.root, ITEMS_PATH, id),
        }
    }

    /// URL of a list request with its query string.
    pub fn list_url(
        &self,
        filters: &FilterCriteria,
        limit: usize,
        offset: usize,
    ) -> Result<reqwest::Url, ApiError> {
        let url = self.items_url();
        reqwest::Url::parse_with_params(&url, list_params(filters, limit, offset))
            .map_err(|e| ApiError::Network(format!("invalid url {url}: {e}")))
    }

    fn request(&self, builder: RequestBuilder) -> RequestBuilder {
        let builder = builder.header(reqwest::header::USER_AGENT, &self.user_agent);
        match &self.auth_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response, ApiError> {
        self.request(builder)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))
    }

    /// Decode a successful response body, or turn an error status into an
    /// `ApiError`. A 404 on a single-item call becomes `NotFound(id)`.
    async fn decode<T: DeserializeOwned>(
        response: Response,
        id: Option<ItemId>,
    ) -> Result<T, ApiError> {
        let response = check_status(response, id).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[async_trait]
impl WardrobeApi for HttpWardrobeApi {
    async fn fetch_items(
        &self,
        filters: &FilterCriteria,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Item>, ApiError> {
        let url = self.list_url(filters, limit, offset)?;
        debug!(%url, "Fetching clothing items");
        let response = self.send(self.client.get(url)).await?;
        Self::decode(response, None).await
    }

    async fn update_item(&self, id: ItemId, patch: &ItemPatch) -> Result<Item, ApiError> {
        let response = self
            .send(self.client.put(self.item_url(id, None)).json(patch))
            .await?;
        Self::decode(response, Some(id)).await
    }

    async fn delete_item(&self, id: ItemId) -> Result<(), ApiError> {
        let response = self.send(self.client.delete(self.item_url(id, None))).await?;
        check_status(response, Some(id)).await?;
        Ok(())
    }

    async fn record_wear(&self, id: ItemId) -> Result<Item, ApiError> {
        let response = self
            .send(self.client.post(self.item_url(id, Some("wear"))))
            .await?;
        Self::decode(response, Some(id)).await
    }

    async fn create_item(&self, item: &NewItem) -> Result<Item, ApiError> {
        let response = self
            .send(self.client.post(self.items_url()).json(item))
            .await?;
        Self::decode(response, None).await
    }

    async fn get_item(&self, id: ItemId) -> Result<Item, ApiError> {
        let response = self.send(self.client.get(self.item_url(id, None))).await?;
        Self::decode(response, Some(id)).await
    }

    async fn add_images(&self, id: ItemId, urls: &[String]) -> Result<Item, ApiError> {
        let body = serde_json::json!({ "image_urls": urls });
        let response = self
            .send(self.client.post(self.item_url(id, Some("images"))).json(&body))
            .await?;
        Self::decode(response, Some(id)).await
    }

    async fn remove_images(&self, id: ItemId, urls: &[String]) -> Result<Item, ApiError> {
        let body = serde_json::json!({ "image_urls": urls });
        let response = self
            .send(self.client.delete(self.item_url(id, Some("images"))).json(&body))
            .await?;
        Self::decode(response, Some(id)).await
    }
}

/// Query parameters for a list request.
pub fn list_params(
    filters: &FilterCriteria,
    limit: usize,
    offset: usize,
) -> Vec<(&'static str, String)> {
    let mut params = Vec::new();
    if let Some(category) = filters.category {
        params.push(("category", category.as_str().to_string()));
    }
    if let Some(size) = filters.size {
        params.push(("size", size.as_str().to_string()));
    }
    if let Some(brand) = filters.brand.as_deref().map(str::trim) {
        if !brand.is_empty() {
            params.push(("brand", brand.to_string()));
        }
    }
    if let Some(fav) = filters.is_favorite {
        params.push(("is_favorite", fav.to_string()));
    }
    if let Some(tags) = filters.tags_param() {
        params.push(("tags", tags));
    }
    params.push(("limit", limit.to_string()));
    params.push(("offset", offset.to_string()));
    params
}

#[derive(Deserialize)]
struct ErrorBody {
    detail: serde_json::Value,
}

async fn check_status(response: Response, id: Option<ItemId>) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = error_message(&body, status);
    warn!(status = status.as_u16(), %message, "Wardrobe API returned an error");

    match (status, id) {
        (StatusCode::NOT_FOUND, Some(id)) => Err(ApiError::NotFound(id)),
        (StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY, _) => {
            Err(ApiError::Validation(message))
        }
        _ => Err(ApiError::Status {
            status: status.as_u16(),
            message,
        }),
    }
}

/// The server's `detail` message if the body carries one, else the status text.
fn error_message(body: &str, status: StatusCode) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody {
            detail: serde_json::Value::String(detail),
        }) => detail,
        Ok(ErrorBody { detail }) => detail.to_string(),
        Err(_) => status
            .canonical_reason()
            .unwrap_or("Unknown error")
            .to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wardrobe_domain::{Category, Size};

    fn api(base: &str) -> HttpWardrobeApi {
        HttpWardrobeApi::new(ClientConfig::new(base)).unwrap()
    }

    #[test]
    fn test_urls() {
        let api = api("http://localhost:8000/");
        let id = uuid::Uuid::nil();
        assert_eq!(api.items_url(), "http://localhost:8000/wardrobe/clothing-items");
        assert_eq!(
            api.item_url(id, Some("wear")),
            format!("http://localhost:8000/wardrobe/clothing-items/{id}/wear")
        );
    }

    #[test]
    fn test_base_path_is_kept() {
        let api = api("https://example.com/api/v1");
        assert_eq!(api.items_url(), "https://example.com/api/v1/wardrobe/clothing-items");
    }

    #[test]
    fn test_list_params_only_window_when_unfiltered() {
        let params = list_params(&FilterCriteria::new(), 20, 40);
        assert_eq!(
            params,
            vec![("limit", "20".to_string()), ("offset", "40".to_string())]
        );
    }

    #[test]
    fn test_list_url_encodes_filters() {
        let filters = FilterCriteria::new()
            .category(Category::Outerwear)
            .size(Size::Xl)
            .brand(" North Face ")
            .favorites_only()
            .tag("winter")
            .tag("hiking");
        let url = api("http://localhost:8000")
            .list_url(&filters, 20, 0)
            .unwrap();
        assert_eq!(
            url.query(),
            Some(
                "category=outerwear&size=XL&brand=North+Face&is_favorite=true\
                 &tags=winter%2Chiking&limit=20&offset=0"
            )
        );
    }

    #[test]
    fn test_error_message_prefers_detail() {
        assert_eq!(
            error_message(r#"{"detail": "Clothing item not found"}"#, StatusCode::NOT_FOUND),
            "Clothing item not found"
        );
        assert_eq!(
            error_message("<html>oops</html>", StatusCode::BAD_GATEWAY),
            "Bad Gateway"
        );
        assert!(error_message(r#"{"detail": [{"loc": ["limit"]}]}"#, StatusCode::UNPROCESSABLE_ENTITY)
            .contains("limit"));
    }

    #[test]
    fn test_rejects_invalid_config() {
        assert!(HttpWardrobeApi::new(ClientConfig::new("nope")).is_err());
    }
}
