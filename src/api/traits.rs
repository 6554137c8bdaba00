use crate::api::error::ApiError;
use crate::api::types::NewSchool;
use crate::models::{School, UserLocation};
use async_trait::async_trait;

/// Backend that stores schools and computes their distances
#[async_trait]
pub trait SchoolApi: Send + Sync {
    /// List schools with their distance from `location`, nearest first
    async fn list_schools(&self, location: &UserLocation) -> Result<Vec<School>, ApiError>;

    /// Persist a new school and return the stored record
    async fn add_school(&self, school: &NewSchool) -> Result<School, ApiError>;
}
