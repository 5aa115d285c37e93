//! Submission payload checks. Every violated constraint is reported, not just
//! the first one.

use serde::Deserialize;
use serde_json::Value;

use crate::models::{
    resource::{Category, Coordinates, Cost, NewResource},
    user::Identity,
};

/// The body of `POST /api/resources`. Fields are kept as raw JSON so that
/// missing or wrongly typed values become validation messages instead of a
/// parse failure. Unknown keys, including `status`, are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct SubmitResourceRequest {
    pub name: Option<Value>,
    pub category: Option<Value>,
    pub address: Option<Value>,
    pub pincode: Option<Value>,
    pub coordinates: Option<Value>,
    pub hours: Option<Value>,
    pub facilities: Option<Value>,
    pub cost: Option<Value>,
    pub contact: Option<Value>,
    pub description: Option<Value>,
}

/// Trimmed text, `None` when absent or blank. Numbers are accepted when
/// `numeric` is set (pincodes and phone numbers are often sent unquoted).
fn text(value: Option<Value>, field: &str, numeric: bool, errors: &mut Vec<String>) -> Option<String> {
    let raw = match value? {
        Value::String(raw) => raw,
        Value::Number(number) if numeric => number.to_string(),
        _ => {
            errors.push(format!("{} must be a string", field));
            return None;
        }
    };
    let raw = raw.trim();
    (!raw.is_empty()).then(|| raw.to_string())
}

fn required(value: Option<Value>, field: &str, errors: &mut Vec<String>) -> Option<String> {
    let malformed = errors.len();
    match text(value, field, false, errors) {
        Some(value) => Some(value),
        None => {
            if errors.len() == malformed {
                errors.push(format!("{} is required", field));
            }
            None
        }
    }
}

fn parse_coordinates(value: &Value) -> Result<Coordinates, String> {
    let shape = "coordinates must be a [latitude, longitude] pair of numbers".to_string();
    let pair = match value.as_array() {
        Some(items) if items.len() == 2 => items,
        _ => return Err(shape),
    };
    let (Some(latitude), Some(longitude)) = (pair[0].as_f64(), pair[1].as_f64()) else {
        return Err(shape);
    };
    if !(-90.0..=90.0).contains(&latitude) {
        return Err("latitude must be between -90 and 90".to_string());
    }
    if !(-180.0..=180.0).contains(&longitude) {
        return Err("longitude must be between -180 and 180".to_string());
    }
    Ok(Coordinates(latitude, longitude))
}

fn parse_facilities(value: Option<Value>) -> Result<Vec<String>, String> {
    let items = match value {
        None => return Ok(Vec::new()),
        Some(Value::Array(items)) => items,
        Some(_) => return Err("facilities must be a list of strings".to_string()),
    };

    let mut facilities: Vec<String> = Vec::with_capacity(items.len());
    for item in items {
        let Value::String(tag) = item else {
            return Err("facilities must be a list of strings".to_string());
        };
        let tag = tag.trim();
        if !tag.is_empty() && !facilities.iter().any(|seen| seen == tag) {
            facilities.push(tag.to_string());
        }
    }
    Ok(facilities)
}

impl SubmitResourceRequest {
    /// Checks the payload and attributes it to `submitter`.
    pub fn validate(self, submitter: &Identity) -> Result<NewResource, Vec<String>> {
        let mut errors = Vec::new();

        let name = required(self.name, "name", &mut errors);
        let category = required(self.category, "category", &mut errors).and_then(|raw| {
            match raw.parse::<Category>() {
                Ok(category) => Some(category),
                Err(_) => {
                    let allowed: Vec<&str> = Category::ALL.iter().map(Category::as_str).collect();
                    errors.push(format!("category must be one of: {}", allowed.join(", ")));
                    None
                }
            }
        });
        let address = required(self.address, "address", &mut errors);
        let coordinates = match &self.coordinates {
            None => {
                errors.push("coordinates is required".to_string());
                None
            }
            Some(value) => parse_coordinates(value)
                .map_err(|e| errors.push(e))
                .ok(),
        };
        let cost = match text(self.cost, "cost", false, &mut errors) {
            None => Some(Cost::default()),
            Some(raw) => match raw.parse::<Cost>() {
                Ok(cost) => Some(cost),
                Err(_) => {
                    errors.push("cost must be one of: Free, Low-cost".to_string());
                    None
                }
            },
        };
        let facilities = parse_facilities(self.facilities)
            .map_err(|e| errors.push(e))
            .ok();
        let pincode = text(self.pincode, "pincode", true, &mut errors);
        let hours = text(self.hours, "hours", false, &mut errors);
        let contact = text(self.contact, "contact", true, &mut errors);
        let description = text(self.description, "description", false, &mut errors);

        match (name, category, address, coordinates, cost, facilities) {
            (Some(name), Some(category), Some(address), Some(coordinates), Some(cost), Some(facilities))
                if errors.is_empty() =>
            {
                Ok(NewResource {
                    name,
                    category,
                    address,
                    pincode,
                    coordinates,
                    hours,
                    facilities,
                    cost,
                    contact,
                    description,
                    user_id: submitter.id.clone(),
                    submitted_by: submitter.submitter_label(),
                })
            }
            _ => Err(errors),
        }
    }
}
