// src/neo/mod.rs
//! Near-Earth-object feed: decoding and threat ranking.

pub mod threat;

use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::Result;
use crate::fetch::{decode, JsonFetcher};

pub use threat::{rank_threats, DegeneratePolicy, ScoredNeo, ThreatTier};

/// One predicted pass of an object near Earth.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CloseApproach {
    pub date: String,
    pub miss_distance_km: Option<f64>,
    pub relative_velocity_kmh: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(try_from = "RawNeo")]
pub struct NearEarthObject {
    pub id: String,
    pub name: String,
    pub diameter_min_km: f64,
    pub diameter_max_km: f64,
    pub close_approaches: Vec<CloseApproach>,
    pub potentially_hazardous: bool,
    pub jpl_url: Option<String>,
}

impl NearEarthObject {
    pub fn mean_diameter_km(&self) -> f64 {
        (self.diameter_min_km + self.diameter_max_km) / 2.0
    }

    pub fn first_approach(&self) -> Option<&CloseApproach> {
        self.close_approaches.first()
    }
}

/// `near_earth_objects` of the feed: date key → objects, in payload order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DateGroups(pub Vec<(String, Vec<NearEarthObject>)>);

impl DateGroups {
    pub fn len_objects(&self) -> usize {
        self.0.iter().map(|(_, v)| v.len()).sum()
    }

    pub fn dates(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(d, _)| d.as_str())
    }
}

impl<'de> Deserialize<'de> for DateGroups {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct GroupsVisitor;

        impl<'de> Visitor<'de> for GroupsVisitor {
            type Value = DateGroups;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object keyed by date with lists of near-earth objects")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<DateGroups, A::Error> {
                let mut out = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((date, objects)) = map.next_entry::<String, Vec<NearEarthObject>>()? {
                    out.push((date, objects));
                }
                Ok(DateGroups(out))
            }
        }

        deserializer.deserialize_map(GroupsVisitor)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NeoFeed {
    #[serde(default)]
    pub element_count: Option<u64>,
    pub near_earth_objects: DateGroups,
}

impl NeoFeed {
    pub async fn fetch(fetcher: &dyn JsonFetcher, url: &str) -> Result<Self> {
        let value = fetcher.fetch_json(url).await?;
        decode("near-earth-object feed", value)
    }
}

// --- wire shapes ---

#[derive(Debug, Deserialize)]
struct RawNeo {
    #[serde(default)]
    id: String,
    name: String,
    estimated_diameter: RawDiameter,
    #[serde(default)]
    close_approach_data: Vec<RawApproach>,
    #[serde(default)]
    is_potentially_hazardous_asteroid: bool,
    #[serde(default)]
    nasa_jpl_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawDiameter {
    kilometers: RawRange,
}

#[derive(Debug, Deserialize)]
struct RawRange {
    #[serde(deserialize_with = "lenient_f64")]
    estimated_diameter_min: f64,
    #[serde(deserialize_with = "lenient_f64")]
    estimated_diameter_max: f64,
}

#[derive(Debug, Deserialize)]
struct RawApproach {
    #[serde(default)]
    close_approach_date_full: Option<String>,
    #[serde(default)]
    close_approach_date: Option<String>,
    #[serde(default)]
    miss_distance: Option<RawMiss>,
    #[serde(default)]
    relative_velocity: Option<RawVelocity>,
}

#[derive(Debug, Deserialize)]
struct RawMiss {
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    kilometers: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawVelocity {
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    kilometers_per_hour: Option<f64>,
}

impl TryFrom<RawNeo> for NearEarthObject {
    type Error = String;

    fn try_from(raw: RawNeo) -> std::result::Result<Self, Self::Error> {
        let RawRange {
            estimated_diameter_min: min,
            estimated_diameter_max: max,
        } = raw.estimated_diameter.kilometers;
        if !min.is_finite() || !max.is_finite() || min < 0.0 || max < 0.0 {
            return Err(format!("{}: diameter out of range ({min}, {max})", raw.name));
        }

        let close_approaches = raw
            .close_approach_data
            .into_iter()
            .map(|a| CloseApproach {
                date: a
                    .close_approach_date_full
                    .or(a.close_approach_date)
                    .unwrap_or_default(),
                miss_distance_km: a.miss_distance.and_then(|m| m.kilometers),
                relative_velocity_kmh: a.relative_velocity.and_then(|v| v.kilometers_per_hour),
            })
            .collect();

        Ok(NearEarthObject {
            id: raw.id,
            name: raw.name,
            diameter_min_km: min,
            diameter_max_km: max,
            close_approaches,
            potentially_hazardous: raw.is_potentially_hazardous_asteroid,
            jpl_url: raw.nasa_jpl_url,
        })
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumOrStr {
    Num(f64),
    Str(String),
}

fn parse_num(v: NumOrStr) -> std::result::Result<f64, String> {
    match v {
        NumOrStr::Num(n) => Ok(n),
        NumOrStr::Str(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|e| format!("not a number {s:?}: {e}")),
    }
}

// NASA sends distances and velocities as decimal strings.
fn lenient_f64<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<f64, D::Error> {
    parse_num(NumOrStr::deserialize(d)?).map_err(de::Error::custom)
}

fn lenient_opt_f64<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<Option<f64>, D::Error> {
    match Option::<NumOrStr>::deserialize(d)? {
        None => Ok(None),
        Some(v) => parse_num(v).map(Some).map_err(de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn neo_json(name: &str, miss: &str) -> serde_json::Value {
        json!({
            "id": name,
            "name": name,
            "estimated_diameter": { "kilometers": {
                "estimated_diameter_min": 0.1, "estimated_diameter_max": "0.3"
            }},
            "is_potentially_hazardous_asteroid": false,
            "close_approach_data": [{
                "close_approach_date_full": "2024-Jan-02 10:15",
                "miss_distance": { "kilometers": miss },
                "relative_velocity": { "kilometers_per_hour": "45000.5" }
            }]
        })
    }

    #[test]
    fn decodes_string_encoded_numbers() {
        let neo: NearEarthObject = serde_json::from_value(neo_json("A", "123456.7")).unwrap();
        assert_eq!(neo.diameter_max_km, 0.3);
        assert!((neo.mean_diameter_km() - 0.2).abs() < 1e-12);
        let ap = neo.first_approach().unwrap();
        assert_eq!(ap.date, "2024-Jan-02 10:15");
        assert_eq!(ap.miss_distance_km, Some(123456.7));
        assert_eq!(ap.relative_velocity_kmh, Some(45000.5));
    }

    #[test]
    fn date_keys_keep_payload_order() {
        // Keys deliberately not in lexical order.
        let raw = r#"{
            "element_count": 3,
            "near_earth_objects": {
                "2024-01-09": [],
                "2024-01-02": [],
                "2024-01-05": []
            }
        }"#;
        let v: serde_json::Value = serde_json::from_str(raw).unwrap();
        let feed: NeoFeed = serde_json::from_value(v).unwrap();
        let dates: Vec<&str> = feed.near_earth_objects.dates().collect();
        assert_eq!(dates, vec!["2024-01-09", "2024-01-02", "2024-01-05"]);
    }

    #[test]
    fn missing_approach_list_is_not_a_decode_error() {
        let mut v = neo_json("B", "1");
        v.as_object_mut().unwrap().remove("close_approach_data");
        let neo: NearEarthObject = serde_json::from_value(v).unwrap();
        assert!(neo.first_approach().is_none());
    }

    #[test]
    fn garbage_number_is_malformed() {
        let v = neo_json("C", "far away");
        assert!(serde_json::from_value::<NearEarthObject>(v).is_err());
    }
}
