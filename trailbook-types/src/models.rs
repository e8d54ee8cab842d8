use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::enums::Popularity;

// Custom serde module for DateTime to ensure RFC3339 string format
mod datetime_format {
    use chrono::{DateTime, Utc};
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let s = date.to_rfc3339();
        serializer.serialize_str(&s)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<DateTime<Utc>>().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    /// Stored as a digest, never plaintext and never empty.
    pub password: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trip {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub description: String,
    #[serde(with = "datetime_format")]
    pub creation_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stage {
    pub id: i64,
    pub trip_id: i64,
    pub user_id: i64,
    pub title: String,
    pub description: String,
    #[serde(with = "datetime_format")]
    pub creation_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub stage_id: i64,
    pub trip_id: i64,
    pub user_id: i64,
    pub story: String,
    #[serde(with = "datetime_format")]
    pub creation_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attraction {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub popularity: Popularity,
    pub score: i32,
}

/// Many-to-many relation between attractions and stages. Duplicate pairs
/// are allowed; the relation behaves as a multiset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttractionStage {
    pub attraction_id: i64,
    pub stage_id: i64,
}

/// A blob in the image container as seen by listings and downloads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageDto {
    pub uri: String,
    pub name: String,
    pub content_type: String,
}

/// Structured outcome of an image mutation. Absence and name collisions are
/// expected traffic, so they are reported here rather than raised.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageResponse {
    pub error: bool,
    pub status: String,
    pub image: Option<ImageDto>,
}

// Request/Response types for API

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateUserRequest {
    pub id: i64,
    pub username: Option<String>,
    pub password: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateTripRequest {
    pub user_id: i64,
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateTripRequest {
    pub id: i64,
    pub user_id: i64,
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateStageRequest {
    pub trip_id: i64,
    pub user_id: i64,
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateStageRequest {
    pub id: i64,
    pub trip_id: i64,
    pub user_id: i64,
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreatePostRequest {
    pub stage_id: i64,
    pub trip_id: i64,
    pub user_id: i64,
    pub story: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdatePostRequest {
    pub id: i64,
    pub stage_id: i64,
    pub trip_id: i64,
    pub user_id: i64,
    pub story: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateAttractionRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    /// Ignored unless supplied; new attractions default to LOW either way.
    #[serde(default)]
    pub popularity: Option<Popularity>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateAttractionRequest {
    pub id: i64,
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub details: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::Popularity;

    #[test]
    fn trips_serialize_creation_date_as_rfc3339() {
        let trip = Trip {
            id: 1,
            user_id: 2,
            title: "Dolomites loop".to_string(),
            description: "Hut to hut".to_string(),
            creation_date: "2024-06-01T09:00:00Z".parse().unwrap(),
        };

        let json = serde_json::to_value(&trip).unwrap();
        assert_eq!(json["creation_date"], "2024-06-01T09:00:00+00:00");

        let back: Trip = serde_json::from_value(json).unwrap();
        assert_eq!(back.creation_date, trip.creation_date);
    }

    #[test]
    fn popularity_serializes_uppercase() {
        let attraction = Attraction {
            id: 1,
            name: "Miradouro".to_string(),
            description: "Viewpoint".to_string(),
            popularity: Popularity::High,
            score: 14,
        };

        let json = serde_json::to_value(&attraction).unwrap();
        assert_eq!(json["popularity"], "HIGH");
    }

    #[test]
    fn create_requests_tolerate_missing_fields() {
        let request: CreateUserRequest = serde_json::from_str(r#"{"username": "ana"}"#).unwrap();
        assert_eq!(request.username.as_deref(), Some("ana"));
        assert!(request.password.is_none());
        assert!(request.email.is_none());
    }
}
