use serde::{Deserialize, Serialize};

/// Body of `POST /addSchool`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewSchool {
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Query of `GET /listSchools`, values passed through as entered
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ListSchoolsQuery<'a> {
    pub latitude: &'a str,
    pub longitude: &'a str,
}
