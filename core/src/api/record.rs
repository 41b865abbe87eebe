use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Disaster class tag used to route a record to a layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    Flood,
    Fire,
    /// Any tag the dashboard has no dedicated layer for.
    Other(String),
}

impl Category {
    pub fn as_str(&self) -> &str {
        match self {
            Category::Flood => "flood",
            Category::Fire => "fire",
            Category::Other(tag) => tag,
        }
    }
}

impl From<String> for Category {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "flood" => Category::Flood,
            "fire" => Category::Fire,
            _ => Category::Other(tag),
        }
    }
}

impl From<&str> for Category {
    fn from(tag: &str) -> Self {
        Category::from(tag.to_string())
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        category.as_str().to_string()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// WGS84 coordinate, longitude first as on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GeoJsonPoint", into = "GeoJsonPoint")]
pub struct GeoPoint {
    pub longitude: f64,
    pub latitude: f64,
}

impl GeoPoint {
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }
}

/// GeoJSON-style `{ "type": "Point", "coordinates": [lon, lat] }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct GeoJsonPoint {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    kind: Option<String>,
    coordinates: Vec<f64>,
}

impl TryFrom<GeoJsonPoint> for GeoPoint {
    type Error = String;

    fn try_from(point: GeoJsonPoint) -> Result<Self, Self::Error> {
        match point.coordinates.as_slice() {
            [longitude, latitude, ..] => Ok(GeoPoint::new(*longitude, *latitude)),
            other => Err(format!(
                "expected [longitude, latitude], got {} value(s)",
                other.len()
            )),
        }
    }
}

impl From<GeoPoint> for GeoJsonPoint {
    fn from(point: GeoPoint) -> Self {
        Self {
            kind: Some("Point".into()),
            coordinates: vec![point.longitude, point.latitude],
        }
    }
}

/// Observation time as delivered by the backend.
///
/// The listing endpoint dumps database documents as extended JSON, so the
/// same field shows up as a plain string, epoch milliseconds, or a `$date`
/// wrapper depending on how the record was written. Any other shape is kept
/// as-is so one odd document cannot reject the whole listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawTimestamp {
    Text(String),
    Millis(i64),
    Extended {
        #[serde(rename = "$date")]
        date: ExtendedDate,
    },
    Other(serde_json::Value),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExtendedDate {
    Text(String),
    Millis(i64),
    NumberLong {
        #[serde(rename = "$numberLong")]
        number_long: String,
    },
}

impl RawTimestamp {
    /// Resolves the wire value to an instant, if it is one.
    pub fn instant(&self) -> Option<DateTime<Utc>> {
        match self {
            RawTimestamp::Text(text) => parse_text(text),
            RawTimestamp::Millis(ms) => DateTime::from_timestamp_millis(*ms),
            RawTimestamp::Extended { date } => match date {
                ExtendedDate::Text(text) => parse_text(text),
                ExtendedDate::Millis(ms) => DateTime::from_timestamp_millis(*ms),
                ExtendedDate::NumberLong { number_long } => number_long
                    .parse()
                    .ok()
                    .and_then(DateTime::from_timestamp_millis),
            },
            RawTimestamp::Other(_) => None,
        }
    }

    /// Text shown when the value cannot be resolved to an instant.
    pub fn raw_text(&self) -> String {
        match self {
            RawTimestamp::Text(text) => text.clone(),
            RawTimestamp::Millis(ms) => ms.to_string(),
            RawTimestamp::Extended { date } => match date {
                ExtendedDate::Text(text) => text.clone(),
                ExtendedDate::Millis(ms) => ms.to_string(),
                ExtendedDate::NumberLong { number_long } => number_long.clone(),
            },
            RawTimestamp::Other(value) => value.to_string(),
        }
    }
}

fn parse_text(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.with_timezone(&Utc));
    }
    // naive ISO-8601 from the backend's utcnow()
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .map(|naive| naive.and_utc())
}

/// One disaster observation as returned by `GET /api/disasters`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisasterRecord {
    #[serde(rename = "type")]
    pub category: Category,
    #[serde(rename = "location")]
    pub position: GeoPoint,
    pub confidence: f64,
    #[serde(rename = "timestamp", default, skip_serializing_if = "Option::is_none")]
    pub observed_at: Option<RawTimestamp>,
    #[serde(rename = "image_url", default, skip_serializing_if = "Option::is_none")]
    pub image_ref: Option<String>,
}

impl DisasterRecord {
    pub fn new(
        category: impl Into<Category>,
        position: GeoPoint,
        confidence: f64,
        observed_at: Option<RawTimestamp>,
        image_ref: Option<String>,
    ) -> Self {
        Self {
            category: category.into(),
            position,
            confidence,
            observed_at,
            image_ref,
        }
    }

    /// Image link, treating an empty string like a missing one.
    pub fn image(&self) -> Option<&str> {
        self.image_ref
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}
