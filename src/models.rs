use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

/// Kilometers to statute miles. Also converts km/h to mph.
pub const KM_TO_MILES: f64 = 0.621371;

/// Scales by 100, rounds that product half away from zero and scales back.
///
/// The product is a binary float, so a value like `1.005` (stored just below
/// the midpoint) rounds down to `1.0`.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Raw body of the wheretheiss.at satellite endpoint.
///
/// Every known field is optional so that a missing key surfaces as a
/// validation failure in [`UpstreamPosition::validate`] instead of a
/// deserialization error. Coordinates stay as JSON numbers so they are
/// emitted exactly as received, and `visibility` is whatever JSON value
/// upstream sent. Unknown fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpstreamPosition {
    pub latitude: Option<Number>,
    pub longitude: Option<Number>,
    pub altitude: Option<f64>, // km
    pub velocity: Option<f64>, // km/h
    pub visibility: Option<Value>,
}

/// An upstream fix that is known to carry coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct SatellitePosition {
    pub latitude: Number,
    pub longitude: Number,
    pub altitude: Option<f64>,
    pub velocity: Option<f64>,
    pub visibility: Option<Value>,
}

/// Outward payload of `GET /iss-location`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedResponse {
    pub latitude: Number,
    pub longitude: Number,
    pub altitude_km: f64,
    pub altitude_mi: f64,
    pub velocity_kmh: f64,
    pub velocity_mph: f64,
    pub visibility: Option<Value>,
}

/// Field that was needed for a conversion but absent upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("upstream position is missing '{0}'")]
pub struct MissingField(pub &'static str);

impl UpstreamPosition {
    /// Checks that both coordinates are present, returning the name of the
    /// first missing one otherwise.
    pub fn validate(self) -> Result<SatellitePosition, MissingField> {
        let latitude = self.latitude.ok_or(MissingField("latitude"))?;
        let longitude = self.longitude.ok_or(MissingField("longitude"))?;

        Ok(SatellitePosition {
            latitude,
            longitude,
            altitude: self.altitude,
            velocity: self.velocity,
            visibility: self.visibility,
        })
    }
}

impl SatellitePosition {
    /// Builds the display payload. Coordinates are copied as-is; altitude and
    /// velocity are rounded and converted to imperial units.
    pub fn normalize(&self) -> Result<NormalizedResponse, MissingField> {
        let altitude = self.altitude.ok_or(MissingField("altitude"))?;
        let velocity = self.velocity.ok_or(MissingField("velocity"))?;

        Ok(NormalizedResponse {
            latitude: self.latitude.clone(),
            longitude: self.longitude.clone(),
            altitude_km: round2(altitude),
            altitude_mi: round2(altitude * KM_TO_MILES),
            velocity_kmh: round2(velocity),
            velocity_mph: round2(velocity * KM_TO_MILES),
            visibility: self.visibility.clone(),
        })
    }
}
