use crate::{
    config::Config,
    domain::ToyRepository,
    errors::StoreError,
    models::{LikesUpdate, NewToy, Toy, ToyId},
};
use async_trait::async_trait;
use reqwest::{header, Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use tracing::{self, info};

/// `ToyRepository` backed by a json-server style REST collection.
#[derive(Debug, Clone)]
pub struct HttpToyRepository {
    client: Client,
    collection_url: Url, // e.g. http://localhost:3000/toys
}

impl HttpToyRepository {
    /// Creates a repository instance for a specific collection URL.
    pub fn new(client: Client, collection_url: Url) -> Self {
        info!(%collection_url, "Initializing HttpToyRepository");
        Self { client, collection_url }
    }

    /// Builds the HTTP client from application config.
    pub fn from_config(config: &Config) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(StoreError::Client)?;
        Ok(Self::new(client, config.toys_api_url.clone()))
    }

    fn member_url(&self, id: &ToyId) -> Result<Url, StoreError> {
        let mut url = self.collection_url.clone();
        url.path_segments_mut()
            .map_err(|_| StoreError::InvalidUrl(self.collection_url.to_string()))?
            .pop_if_empty()
            .push(id.as_str());
        Ok(url)
    }

    // Sends the request and decodes a JSON body, mapping each failure stage.
    async fn send_json<T: DeserializeOwned>(
        &self,
        method: &'static str,
        url: &Url,
        request: RequestBuilder,
    ) -> Result<T, StoreError> {
        let response = request
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|source| StoreError::Transport {
                method,
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%method, %url, status = status.as_u16(), "Backing store rejected request");
            return Err(StoreError::Status {
                method,
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.json::<T>().await.map_err(|source| StoreError::Decode {
            method,
            url: url.to_string(),
            source,
        })
    }
}

#[async_trait]
impl ToyRepository for HttpToyRepository {
    /// Fetches the whole collection with GET.
    async fn list_all(&self) -> Result<Vec<Toy>, StoreError> {
        tracing::debug!(url = %self.collection_url, "Store: Fetching all toys");
        let request = self.client.get(self.collection_url.clone());
        let toys: Vec<Toy> = self.send_json("GET", &self.collection_url, request).await?;
        tracing::info!("Store: Listed {} toys", toys.len());
        Ok(toys)
    }

    /// Creates a toy with POST. `.json()` sets the JSON content type.
    async fn create(&self, toy: &NewToy) -> Result<Toy, StoreError> {
        tracing::debug!(name = %toy.name, "Store: Creating toy");
        let request = self.client.post(self.collection_url.clone()).json(toy);
        let created: Toy = self.send_json("POST", &self.collection_url, request).await?;
        tracing::info!(toy_id = %created.id, "Store: Toy created");
        Ok(created)
    }

    /// Sends `{ "likes": n }` with PATCH to the member URL.
    async fn update_likes(&self, id: &ToyId, likes: u64) -> Result<Toy, StoreError> {
        let url = self.member_url(id)?;
        tracing::debug!(toy_id = %id, likes, "Store: Updating likes");
        let request = self.client.patch(url.clone()).json(&LikesUpdate { likes });
        let updated: Toy = self.send_json("PATCH", &url, request).await?;
        tracing::debug!(toy_id = %id, likes = updated.likes, "Store: Likes updated");
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repository(base: &str) -> HttpToyRepository {
        HttpToyRepository::new(Client::new(), Url::parse(base).unwrap())
    }

    #[test]
    fn member_url_appends_the_id() {
        let repo = repository("http://localhost:3000/toys");
        let url = repo.member_url(&ToyId::from("42")).unwrap();
        assert_eq!(url.as_str(), "http://localhost:3000/toys/42");
    }

    #[test]
    fn member_url_handles_trailing_slash_and_encodes() {
        let repo = repository("http://localhost:3000/toys/");
        let url = repo.member_url(&ToyId::from("a b/c")).unwrap();
        assert_eq!(url.as_str(), "http://localhost:3000/toys/a%20b%2Fc");
    }
}
