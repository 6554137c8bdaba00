use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use thiserror::Error;

use crate::api::types::NewSchool;

/// Backend identifier of a school, numeric or textual depending on the store
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(untagged)]
pub enum SchoolId {
    Number(i64),
    Text(String),
}

impl fmt::Display for SchoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchoolId::Number(n) => write!(f, "{}", n),
            SchoolId::Text(s) => f.write_str(s),
        }
    }
}

/// A school as returned by the backend
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct School {
    pub id: SchoolId,
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default, deserialize_with = "number_or_text")]
    pub latitude: f64,
    #[serde(default, deserialize_with = "number_or_text")]
    pub longitude: f64,
    /// Distance in km from the requested location, computed by the backend.
    /// Missing on the `addSchool` response.
    #[serde(default, deserialize_with = "optional_number_or_text")]
    pub distance: Option<f64>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(f64),
    Text(String),
}

impl NumberOrText {
    fn into_f64<E: serde::de::Error>(self) -> Result<f64, E> {
        match self {
            NumberOrText::Number(n) => Ok(n),
            NumberOrText::Text(s) => s
                .trim()
                .parse()
                .map_err(|_| E::custom(format!("expected a number, got {:?}", s))),
        }
    }
}

// DECIMAL columns come back as strings from some SQL drivers.
fn number_or_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    NumberOrText::deserialize(deserializer)?.into_f64()
}

fn optional_number_or_text<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<f64>, D::Error> {
    Option::<NumberOrText>::deserialize(deserializer)?
        .map(NumberOrText::into_f64)
        .transpose()
}

/// Field of the new-school form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    Name,
    Address,
    Latitude,
    Longitude,
}

impl fmt::Display for DraftField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DraftField::Name => "name",
            DraftField::Address => "address",
            DraftField::Latitude => "latitude",
            DraftField::Longitude => "longitude",
        })
    }
}

/// Rejection of a draft before anything is sent to the backend
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DraftError {
    #[error("{0} is required")]
    Missing(DraftField),
    #[error("{field} must be a number, got {value:?}")]
    NotANumber { field: DraftField, value: String },
}

/// In-progress school record, exactly as typed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    pub name: String,
    pub address: String,
    pub latitude: String,
    pub longitude: String,
}

impl Draft {
    pub fn with_field(mut self, field: DraftField, value: String) -> Self {
        match field {
            DraftField::Name => self.name = value,
            DraftField::Address => self.address = value,
            DraftField::Latitude => self.latitude = value,
            DraftField::Longitude => self.longitude = value,
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Draft::default()
    }

    /// Check required fields and numeric coordinates, producing the request body
    pub fn to_new_school(&self) -> Result<NewSchool, DraftError> {
        let name = required(DraftField::Name, &self.name)?;
        let address = required(DraftField::Address, &self.address)?;
        let latitude = coordinate(DraftField::Latitude, &self.latitude)?;
        let longitude = coordinate(DraftField::Longitude, &self.longitude)?;

        Ok(NewSchool {
            name: name.to_string(),
            address: address.to_string(),
            latitude,
            longitude,
        })
    }
}

fn required(field: DraftField, value: &str) -> Result<&str, DraftError> {
    if value.trim().is_empty() {
        Err(DraftError::Missing(field))
    } else {
        Ok(value)
    }
}

fn coordinate(field: DraftField, value: &str) -> Result<f64, DraftError> {
    let value = required(field, value)?;
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| DraftError::NotANumber {
            field,
            value: value.to_string(),
        })
}

/// Field of the user location form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationField {
    Latitude,
    Longitude,
}

/// Reference point for distances, kept as entered and sent verbatim
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserLocation {
    pub latitude: String,
    pub longitude: String,
}

impl UserLocation {
    pub fn new(latitude: impl Into<String>, longitude: impl Into<String>) -> Self {
        Self {
            latitude: latitude.into(),
            longitude: longitude.into(),
        }
    }

    pub fn with_field(mut self, field: LocationField, value: String) -> Self {
        match field {
            LocationField::Latitude => self.latitude = value,
            LocationField::Longitude => self.longitude = value,
        }
        self
    }

    /// Both coordinates entered; only then can distances be listed
    pub fn is_complete(&self) -> bool {
        !self.latitude.is_empty() && !self.longitude.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusKind {
    #[default]
    None,
    Success,
    Error,
}

/// Transient notification shown above the form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub kind: StatusKind,
}

impl StatusMessage {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: StatusKind::Success,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: StatusKind::Error,
        }
    }

    pub fn is_none(&self) -> bool {
        self.kind == StatusKind::None
    }
}
