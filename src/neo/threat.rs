// src/neo/threat.rs
//! Threat ranking.
//!
//! score = (mean diameter km / first miss distance km) * 1e9
//!
//! Pipeline: flatten date groups in payload order → score → stable sort
//! descending → keep the top N.

use metrics::counter;
use serde::{Deserialize, Serialize};

use super::{DateGroups, NearEarthObject};
use crate::error::{FetchError, Result};

pub const THREAT_SCALE: f64 = 1e9;
pub const DEFAULT_TOP_N: usize = 5;

/// What to do with a record whose score cannot be computed
/// (no close approach, missing/zero/negative miss distance).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DegeneratePolicy {
    /// Drop the record from the ranking.
    #[default]
    Exclude,
    /// Rank it as an infinite threat.
    MaxThreat,
    /// Fail the whole ranking.
    Reject,
}

/// Display tier; selects decorative assets only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThreatTier {
    Low,
    Elevated,
    Severe,
}

impl ThreatTier {
    pub fn from_score(score: f64) -> Self {
        if score <= 30.0 {
            ThreatTier::Low
        } else if score <= 75.0 {
            ThreatTier::Elevated
        } else {
            ThreatTier::Severe
        }
    }

    pub fn level(self) -> u8 {
        match self {
            ThreatTier::Low => 1,
            ThreatTier::Elevated => 2,
            ThreatTier::Severe => 3,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ScoredNeo {
    #[serde(flatten)]
    pub neo: NearEarthObject,
    /// Non-finite only under `DegeneratePolicy::MaxThreat` (serialized as null).
    pub threat_score: f64,
    pub tier: ThreatTier,
}

/// Score from the first close approach only.
pub fn threat_score(neo: &NearEarthObject) -> Result<f64> {
    let approach = neo.first_approach().ok_or_else(|| {
        FetchError::Degenerate(format!("{}: no close-approach data", neo.name))
    })?;
    let miss = approach.miss_distance_km.ok_or_else(|| {
        FetchError::Degenerate(format!("{}: missing miss distance", neo.name))
    })?;
    if !miss.is_finite() || miss <= 0.0 {
        return Err(FetchError::Degenerate(format!(
            "{}: miss distance {miss} km",
            neo.name
        )));
    }

    let score = neo.mean_diameter_km() / miss * THREAT_SCALE;
    if !score.is_finite() {
        return Err(FetchError::Degenerate(format!(
            "{}: score overflow",
            neo.name
        )));
    }
    Ok(score)
}

/// Concatenate per-date lists in payload key order.
pub fn flatten(groups: DateGroups) -> Vec<NearEarthObject> {
    let mut out = Vec::with_capacity(groups.len_objects());
    for (_, mut objects) in groups.0 {
        out.append(&mut objects);
    }
    out
}

/// Score, sort (stable, descending) and truncate an already flattened list.
pub fn rank_flat(
    objects: Vec<NearEarthObject>,
    policy: DegeneratePolicy,
    top_n: usize,
) -> Result<Vec<ScoredNeo>> {
    let mut scored = Vec::with_capacity(objects.len());
    for neo in objects {
        let threat_score = match threat_score(&neo) {
            Ok(s) => s,
            Err(e) => match policy {
                DegeneratePolicy::Exclude => {
                    tracing::warn!(error = %e, id = %neo.id, "excluding degenerate object");
                    counter!("neo_degenerate_total").increment(1);
                    continue;
                }
                DegeneratePolicy::MaxThreat => {
                    tracing::warn!(error = %e, id = %neo.id, "degenerate object ranked as max threat");
                    counter!("neo_degenerate_total").increment(1);
                    f64::INFINITY
                }
                DegeneratePolicy::Reject => return Err(e),
            },
        };
        scored.push(ScoredNeo {
            tier: ThreatTier::from_score(threat_score),
            threat_score,
            neo,
        });
    }

    // Vec::sort_by is stable: equal scores keep input order.
    scored.sort_by(|a, b| b.threat_score.total_cmp(&a.threat_score));
    scored.truncate(top_n);
    Ok(scored)
}

/// Full pipeline over the feed's `near_earth_objects`.
pub fn rank_threats(
    groups: DateGroups,
    policy: DegeneratePolicy,
    top_n: usize,
) -> Result<Vec<ScoredNeo>> {
    crate::telemetry::ensure_described();
    rank_flat(flatten(groups), policy, top_n)
}
