use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use sqlx::{Error, Row, postgres::PgRow, types::Json};
use thiserror::Error;
use time::OffsetDateTime;

use crate::{
    database::traits::DatabaseResource,
    utils::time::{deserialize_offset_date_time, serialize_offset_date_time},
};

#[derive(Debug, Error, PartialEq)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

/// The fixed set of resource categories accepted on submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Libraries")]
    Libraries,
    #[serde(rename = "Study Centers")]
    StudyCenters,
    #[serde(rename = "Free Tuition NGOs")]
    FreeTuitionNgos,
    #[serde(rename = "Public Wi-Fi")]
    PublicWifi,
    #[serde(rename = "Book Banks")]
    BookBanks,
    #[serde(rename = "Community Classrooms")]
    CommunityClassrooms,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Libraries,
        Category::StudyCenters,
        Category::FreeTuitionNgos,
        Category::PublicWifi,
        Category::BookBanks,
        Category::CommunityClassrooms,
    ];

    /// Listing filter value meaning "no category filter".
    pub const ANY: &'static str = "All";

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Libraries => "Libraries",
            Category::StudyCenters => "Study Centers",
            Category::FreeTuitionNgos => "Free Tuition NGOs",
            Category::PublicWifi => "Public Wi-Fi",
            Category::BookBanks => "Book Banks",
            Category::CommunityClassrooms => "Community Classrooms",
        }
    }
}

impl FromStr for Category {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| UnknownVariant {
                kind: "category",
                value: s.to_string(),
            })
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Cost {
    #[default]
    Free,
    #[serde(rename = "Low-cost")]
    LowCost,
}

impl Cost {
    pub const ALL: [Cost; 2] = [Cost::Free, Cost::LowCost];

    pub fn as_str(&self) -> &'static str {
        match self {
            Cost::Free => "Free",
            Cost::LowCost => "Low-cost",
        }
    }
}

impl FromStr for Cost {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Cost::ALL
            .into_iter()
            .find(|cost| cost.as_str() == s)
            .ok_or_else(|| UnknownVariant {
                kind: "cost",
                value: s.to_string(),
            })
    }
}

/// Moderation state. `Pending` is the only state a resource can leave.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ResourceStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl ResourceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceStatus::Pending => "Pending",
            ResourceStatus::Approved => "Approved",
            ResourceStatus::Rejected => "Rejected",
        }
    }
}

impl FromStr for ResourceStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(ResourceStatus::Pending),
            "Approved" => Ok(ResourceStatus::Approved),
            "Rejected" => Ok(ResourceStatus::Rejected),
            _ => Err(UnknownVariant {
                kind: "status",
                value: s.to_string(),
            }),
        }
    }
}

/// `[latitude, longitude]`, serialized as a two element array.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates(pub f64, pub f64);

impl Coordinates {
    pub fn latitude(&self) -> f64 {
        self.0
    }

    pub fn longitude(&self) -> f64 {
        self.1
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub id: String,
    pub name: String,
    pub category: Category,
    pub address: String,
    pub pincode: Option<String>,
    pub coordinates: Coordinates,
    pub hours: Option<String>,
    pub facilities: Vec<String>,
    pub cost: Cost,
    pub contact: Option<String>,
    pub description: Option<String>,
    pub status: ResourceStatus,
    pub user_id: String,
    pub submitted_by: String,

    #[serde(
        serialize_with = "serialize_offset_date_time",
        deserialize_with = "deserialize_offset_date_time"
    )]
    pub created_at: OffsetDateTime,

    #[serde(
        serialize_with = "serialize_offset_date_time",
        deserialize_with = "deserialize_offset_date_time"
    )]
    pub updated_at: OffsetDateTime,
}

/// A validated submission. Status is not part of it: every new resource
/// starts out `Pending`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewResource {
    pub name: String,
    pub category: Category,
    pub address: String,
    pub pincode: Option<String>,
    pub coordinates: Coordinates,
    pub hours: Option<String>,
    pub facilities: Vec<String>,
    pub cost: Cost,
    pub contact: Option<String>,
    pub description: Option<String>,
    pub user_id: String,
    pub submitted_by: String,
}

impl NewResource {
    pub fn into_resource(self, id: String, created_at: OffsetDateTime) -> Resource {
        Resource {
            id,
            name: self.name,
            category: self.category,
            address: self.address,
            pincode: self.pincode,
            coordinates: self.coordinates,
            hours: self.hours,
            facilities: self.facilities,
            cost: self.cost,
            contact: self.contact,
            description: self.description,
            status: ResourceStatus::Pending,
            user_id: self.user_id,
            submitted_by: self.submitted_by,
            created_at,
            updated_at: created_at,
        }
    }
}

fn parse_column<T>(row: &PgRow, column: &str) -> Result<T, Error>
where
    T: FromStr<Err = UnknownVariant>,
{
    let raw: String = row.try_get(column)?;
    raw.parse().map_err(|e: UnknownVariant| Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}

impl DatabaseResource for Resource {
    fn from_row(row: &PgRow) -> Result<Self, Error> {
        let Json(coordinates): Json<Coordinates> = row.try_get("coordinates")?;
        let Json(facilities): Json<Vec<String>> = row.try_get("facilities")?;

        Ok(Resource {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            category: parse_column(row, "category")?,
            address: row.try_get("address")?,
            pincode: row.try_get("pincode")?,
            coordinates,
            hours: row.try_get("hours")?,
            facilities,
            cost: parse_column(row, "cost")?,
            contact: row.try_get("contact")?,
            description: row.try_get("description")?,
            status: parse_column(row, "status")?,
            user_id: row.try_get("user_id")?,
            submitted_by: row.try_get("submitted_by")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn has_id() -> bool {
        true
    }

    fn is_creatable() -> bool {
        true
    }

    fn is_updatable() -> bool {
        true
    }

    fn is_expirable() -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use time::macros::datetime;

    #[test]
    fn categories_round_trip_through_their_labels() {
        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>(), Ok(category));
            assert_eq!(
                serde_json::to_value(category).unwrap(),
                json!(category.as_str())
            );
        }
        assert!("Museums".parse::<Category>().is_err());
        assert!("libraries".parse::<Category>().is_err());
    }

    #[test]
    fn cost_defaults_to_free() {
        assert_eq!(Cost::default(), Cost::Free);
        assert_eq!("Low-cost".parse::<Cost>(), Ok(Cost::LowCost));
        assert_eq!(serde_json::to_value(Cost::LowCost).unwrap(), json!("Low-cost"));
    }

    #[test]
    fn new_resource_always_starts_pending() {
        let created_at = datetime!(2025-06-01 9:00 UTC);
        let resource = NewResource {
            name: "Ward 12 Reading Room".into(),
            category: Category::Libraries,
            address: "MG Road".into(),
            pincode: Some("560001".into()),
            coordinates: Coordinates(12.97, 77.59),
            hours: None,
            facilities: vec!["wifi".into()],
            cost: Cost::Free,
            contact: None,
            description: None,
            user_id: "u-1".into(),
            submitted_by: "reader@example.com".into(),
        }
        .into_resource("r-1".into(), created_at);

        assert_eq!(resource.status, ResourceStatus::Pending);
        assert_eq!(resource.updated_at, created_at);

        let value = serde_json::to_value(&resource).unwrap();
        assert_eq!(value["coordinates"], json!([12.97, 77.59]));
        assert_eq!(value["status"], json!("Pending"));
        assert_eq!(value["created_at"], json!("2025-06-01T09:00:00Z"));
    }
}
