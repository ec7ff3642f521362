//! Wire types for the travel API.
//!
//! Every nested field is optional: the API omits structure freely and pages
//! render whatever is present.

use serde::{Deserialize, Serialize};

/// The `{"data": [...]}` envelope wrapping every list response.
#[derive(Debug, Deserialize)]
pub struct DataEnvelope<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}

/// A city returned by destination search.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iata_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geo_code: Option<GeoCode>,
}

impl Location {
    pub fn city_name(&self) -> Option<&str> {
        self.address.as_ref()?.city_name.as_deref()
    }

    pub fn city_code(&self) -> Option<&str> {
        self.address.as_ref()?.city_code.as_deref()
    }

    pub fn country_name(&self) -> Option<&str> {
        self.address.as_ref()?.country_name.as_deref()
    }

    pub fn country_code(&self) -> Option<&str> {
        self.address.as_ref()?.country_code.as_deref()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoCode {
    pub latitude: f64,
    pub longitude: f64,
}

/// One priced flight offer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightOffer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub itineraries: Vec<FlightItinerary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Price>,
    #[serde(default)]
    pub validating_airline_codes: Vec<String>,
}

impl FlightOffer {
    /// First segment of the outbound itinerary
    pub fn first_segment(&self) -> Option<&Segment> {
        self.itineraries.first()?.segments.first()
    }

    pub fn departure_code(&self) -> Option<&str> {
        self.first_segment()?.departure.as_ref()?.iata_code.as_deref()
    }

    pub fn arrival_code(&self) -> Option<&str> {
        self.first_segment()?.arrival.as_ref()?.iata_code.as_deref()
    }

    pub fn departure_at(&self) -> Option<&str> {
        self.first_segment()?.departure.as_ref()?.at.as_deref()
    }

    /// ISO-8601 duration of the outbound itinerary
    pub fn duration(&self) -> Option<&str> {
        self.itineraries.first()?.duration.as_deref()
    }

    pub fn airline(&self) -> Option<&str> {
        self.validating_airline_codes.first().map(String::as_str)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlightItinerary {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default)]
    pub segments: Vec<Segment>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub departure: Option<FlightEndpoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arrival: Option<FlightEndpoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carrier_code: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightEndpoint {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iata_code: Option<String>,
    /// Local departure/arrival time, e.g. `2025-06-01T10:30:00`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Price {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

/// A hotel listed for a city.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hotel {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hotel_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iata_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<HotelAddress>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Price>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotelAddress {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
}

/// Token endpoint response
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub token_type: Option<String>,
}
