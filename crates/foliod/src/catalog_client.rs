use foliocore_config::CatalogSettings;
use foliocore_index::{CatalogResponse, CatalogSource, IndexError, ListRequest};
use reqwest::Client;
use tracing::debug;

/// `GET {base_url}/products?page=..&pageSize=..` against the listing service.
///
/// No request timeout is configured: a hung request only keeps the index in its
/// loading state.
#[derive(Debug, Clone)]
pub struct HttpCatalogClient {
    client: Client,
    base_url: String,
}

impl HttpCatalogClient {
    pub fn new(settings: &CatalogSettings) -> Result<Self, IndexError> {
        let client = Client::builder()
            .build()
            .map_err(|err| IndexError::Transport(err.to_string()))?;

        Ok(Self::with_client(client, &settings.base_url))
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn listing_url(&self) -> String {
        format!("{}/products", self.base_url)
    }
}

impl CatalogSource for HttpCatalogClient {
    async fn list_products(&self, request: ListRequest) -> Result<CatalogResponse, IndexError> {
        let url = self.listing_url();
        debug!(%url, page = request.page, page_size = request.page_size, "requesting catalog page");

        let response = self
            .client
            .get(&url)
            .query(&[("page", request.page), ("pageSize", request.page_size)])
            .send()
            .await
            .map_err(|err| IndexError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(IndexError::Status {
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|err| IndexError::Transport(err.to_string()))?;
        CatalogResponse::from_slice(&body)
    }
}
