// src/iss.rs
//! ISS position from the satellite-location service.

use serde::{Deserialize, Serialize};

use crate::error::{FetchError, Result};
use crate::fetch::{decode, JsonFetcher};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SatellitePosition {
    pub latitude: f64,
    pub longitude: f64,
    /// km
    pub altitude: f64,
    /// km/h
    pub velocity: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

impl SatellitePosition {
    pub async fn fetch(fetcher: &dyn JsonFetcher, url: &str) -> Result<Self> {
        let value = fetcher.fetch_json(url).await?;
        let pos: SatellitePosition = decode("satellite position", value)?;
        pos.validate()
    }

    fn validate(self) -> Result<Self> {
        let in_range = (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
            && self.altitude.is_finite()
            && self.velocity.is_finite();
        if !in_range {
            return Err(FetchError::Malformed(format!(
                "satellite position out of range: lat={} lon={}",
                self.latitude, self.longitude
            )));
        }
        Ok(self)
    }
}
