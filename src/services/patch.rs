//! Partial-update payloads. Each lists the fields a caller may change; anything else in the
//! body is rejected during deserialization.
//!
//! `Option<Option<T>>` fields tell "absent" (`None`, keep the stored value) from an explicit
//! `null` (`Some(None)`, clear it).

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::{
    db::entities::{CareLevel, Level},
    error::AppError,
};

pub(crate) fn nullable<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn require_text(value: &Option<String>, field: &str) -> Result<(), AppError> {
    match value {
        Some(text) if text.trim().is_empty() => {
            Err(AppError::bad_request(format!("{field} cannot be empty")))
        }
        _ => Ok(()),
    }
}

fn require_positive(value: Option<i32>, field: &str) -> Result<(), AppError> {
    match value {
        Some(days) if days <= 0 => Err(AppError::bad_request(format!(
            "{field} must be a positive number of days"
        ))),
        _ => Ok(()),
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TemperatureRange {
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
}

impl TemperatureRange {
    pub fn validate(&self) -> Result<(), AppError> {
        if let (Some(min), Some(max)) = (self.min, self.max) {
            if min > max {
                return Err(AppError::bad_request(
                    "temperatureRange.min cannot exceed temperatureRange.max",
                ));
            }
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct HousePatch {
    pub name: Option<String>,
    pub location: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub description: Option<Option<String>>,
}

impl HousePatch {
    pub fn validate(&self) -> Result<(), AppError> {
        require_text(&self.name, "name")?;
        require_text(&self.location, "location")
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RoomPatch {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub room_type: Option<String>,
    pub humidity: Option<Level>,
    pub light: Option<Level>,
    pub air_conditioner: Option<bool>,
    pub radiator: Option<bool>,
}

impl RoomPatch {
    pub fn validate(&self) -> Result<(), AppError> {
        require_text(&self.name, "name")?;
        require_text(&self.room_type, "type")
    }
}

/// Setting `room` moves the plant.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PlantPatch {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub scientific_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub species: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub image_url: Option<Option<String>>,
    pub water_frequency: Option<i32>,
    pub sunlight: Option<CareLevel>,
    #[serde(default, deserialize_with = "nullable")]
    pub temperature_range: Option<Option<TemperatureRange>>,
    #[serde(default, deserialize_with = "nullable")]
    pub humidity: Option<Option<CareLevel>>,
    #[serde(default, deserialize_with = "nullable")]
    pub fertilizing_frequency: Option<Option<i32>>,
    #[serde(default, deserialize_with = "nullable")]
    pub last_watered: Option<Option<DateTime<FixedOffset>>>,
    #[serde(default, deserialize_with = "nullable")]
    pub last_fertilized: Option<Option<DateTime<FixedOffset>>>,
    #[serde(default, deserialize_with = "nullable")]
    pub last_repotted: Option<Option<DateTime<FixedOffset>>>,
    #[serde(default, deserialize_with = "nullable")]
    pub date_acquired: Option<Option<DateTime<FixedOffset>>>,
    #[serde(default, deserialize_with = "nullable")]
    pub notes: Option<Option<String>>,
    pub room: Option<Uuid>,
    pub is_alive: Option<bool>,
}

impl PlantPatch {
    pub fn validate(&self) -> Result<(), AppError> {
        require_text(&self.name, "name")?;
        require_positive(self.water_frequency, "waterFrequency")?;
        require_positive(self.fertilizing_frequency.flatten(), "fertilizingFrequency")?;
        if let Some(Some(range)) = &self.temperature_range {
            range.validate()?;
        }
        Ok(())
    }
}

/// Profile fields a user may change on their own account.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UserPatch {
    #[serde(default, deserialize_with = "nullable")]
    pub username: Option<Option<String>>,
    pub email: Option<String>,
    pub password: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub first_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub last_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub bio: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub phone_number: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub profile_picture: Option<Option<String>>,
}

impl UserPatch {
    pub fn validate(&self) -> Result<(), AppError> {
        require_text(&self.email, "email")?;
        match &self.password {
            Some(password) if password.is_empty() => {
                Err(AppError::bad_request("password cannot be empty"))
            }
            _ => Ok(()),
        }
    }
}
