use crate::api::error::ApiError;
use crate::api::traits::SchoolApi;
use crate::api::types::{ListSchoolsQuery, NewSchool};
use crate::config::Settings;
use crate::models::{School, UserLocation};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Response};
use tracing::{debug, warn};

/// School API over HTTP
pub struct HttpSchoolApi {
    client: Client,
    base_url: String,
}

impl HttpSchoolApi {
    pub fn new(settings: &Settings) -> Result<Self> {
        let client = Client::builder()
            .timeout(settings.request_timeout)
            .user_agent(concat!("school-locator/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: settings.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, name: &str) -> String {
        format!("{}/{}", self.base_url, name)
    }

    async fn fetch_schools(&self, location: &UserLocation) -> Result<Vec<School>> {
        let url = self.endpoint("listSchools");
        let query = ListSchoolsQuery {
            latitude: &location.latitude,
            longitude: &location.longitude,
        };

        debug!("Fetching schools from {} with {:?}", url, query);

        let response = self
            .client
            .get(&url)
            .query(&query)
            .send()
            .await
            .context("Failed to reach school API")?;

        let schools: Vec<School> = ensure_success(response)
            .await?
            .json()
            .await
            .context("Failed to decode school list")?;

        debug!("Received {} schools", schools.len());
        Ok(schools)
    }

    async fn post_school(&self, school: &NewSchool) -> Result<School> {
        let url = self.endpoint("addSchool");

        debug!("Submitting school to {}: {:?}", url, school);

        let response = self
            .client
            .post(&url)
            .json(school)
            .send()
            .await
            .context("Failed to reach school API")?;

        let created: School = ensure_success(response)
            .await?
            .json()
            .await
            .context("Failed to decode created school")?;

        debug!("School stored with id {}", created.id);
        Ok(created)
    }
}

async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    warn!("School API returned status: {}", status);
    anyhow::bail!("School API returned {}: {}", status, body.trim());
}

#[async_trait]
impl SchoolApi for HttpSchoolApi {
    async fn list_schools(&self, location: &UserLocation) -> Result<Vec<School>, ApiError> {
        self.fetch_schools(location)
            .await
            .map_err(ApiError::FetchFailed)
    }

    async fn add_school(&self, school: &NewSchool) -> Result<School, ApiError> {
        self.post_school(school).await.map_err(ApiError::SubmitFailed)
    }
}
