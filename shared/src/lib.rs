use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Geographic center of India, where the map opens before any route is drawn.
pub const DEFAULT_CENTER: LatLng = LatLng {
    lat: 20.5937,
    lng: 78.9629,
};
pub const DEFAULT_ZOOM: u8 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

/// A geocoded place as returned by the autocomplete widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub name: String,
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn location(&self) -> LatLng {
        LatLng {
            lat: self.lat,
            lng: self.lng,
        }
    }

    /// Text before the first comma of the display address ("Mumbai" for
    /// "Mumbai, Maharashtra, India").
    pub fn short_name(&self) -> &str {
        self.name.split(',').next().unwrap_or_default().trim()
    }
}

/// A confirmed intermediate stop; `id` is the provider's place identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    pub id: String,
    #[serde(flatten)]
    pub point: GeoPoint,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TravelMode {
    #[default]
    Driving,
    Walking,
    Bicycling,
    Transit,
}

impl fmt::Display for TravelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TravelMode::Driving => "driving",
            TravelMode::Walking => "walking",
            TravelMode::Bicycling => "bicycling",
            TravelMode::Transit => "transit",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown travel mode `{0}` (expected driving, walking, bicycling or transit)")]
pub struct UnknownTravelMode(pub String);

impl FromStr for TravelMode {
    type Err = UnknownTravelMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "driving" => Ok(TravelMode::Driving),
            "walking" => Ok(TravelMode::Walking),
            "bicycling" => Ok(TravelMode::Bicycling),
            "transit" => Ok(TravelMode::Transit),
            _ => Err(UnknownTravelMode(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectionsRequest {
    pub origin: GeoPoint,
    pub destination: GeoPoint,
    pub waypoints: Vec<GeoPoint>,
    #[serde(default)]
    pub travel_mode: TravelMode,
    #[serde(default)]
    pub optimize_waypoints: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Distance {
    /// Provider formatted text, e.g. "1,411 km".
    pub text: String,
    pub meters: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteLeg {
    #[serde(default)]
    pub start_address: String,
    #[serde(default)]
    pub end_address: String,
    pub distance: Distance,
}

/// Settings the backend hands to the browser before the map widget loads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    pub maps_api_key: String,
    #[serde(default = "default_center")]
    pub default_center: LatLng,
    #[serde(default = "default_zoom")]
    pub default_zoom: u8,
    #[serde(default)]
    pub travel_mode: TravelMode,
    #[serde(default)]
    pub optimize_waypoints: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub message: String,
}

pub fn default_center() -> LatLng {
    DEFAULT_CENTER
}

pub fn default_zoom() -> u8 {
    DEFAULT_ZOOM
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(name: &str) -> GeoPoint {
        GeoPoint {
            name: name.to_string(),
            lat: 19.076,
            lng: 72.8777,
        }
    }

    #[test]
    fn test_short_name_takes_text_before_first_comma() {
        assert_eq!(point("Mumbai, Maharashtra, India").short_name(), "Mumbai");
        assert_eq!(point("  New Delhi , Delhi").short_name(), "New Delhi");
        assert_eq!(point("Ajmer").short_name(), "Ajmer");
        assert_eq!(point("").short_name(), "");
    }

    #[test]
    fn test_travel_mode_uses_provider_names() {
        let json = serde_json::to_string(&TravelMode::Driving).unwrap();
        assert_eq!(json, "\"DRIVING\"");
        let parsed: TravelMode = serde_json::from_str("\"TRANSIT\"").unwrap();
        assert_eq!(parsed, TravelMode::Transit);
    }

    #[test]
    fn test_travel_mode_from_str_is_case_insensitive() {
        assert_eq!("Walking".parse::<TravelMode>(), Ok(TravelMode::Walking));
        assert_eq!(" bicycling ".parse::<TravelMode>(), Ok(TravelMode::Bicycling));
        assert!("flying".parse::<TravelMode>().is_err());
    }

    #[test]
    fn test_unknown_travel_mode_message_lists_choices() {
        let err = "flying".parse::<TravelMode>().unwrap_err();
        assert_eq!(err, UnknownTravelMode("flying".into()));
        assert_eq!(
            err.to_string(),
            "unknown travel mode `flying` (expected driving, walking, bicycling or transit)"
        );
        let boxed: Box<dyn std::error::Error> = Box::new(err);
        assert!(boxed.source().is_none());
    }

    #[test]
    fn test_stop_flattens_point_fields() {
        let stop = Stop {
            id: "ChIJ-ajmer".into(),
            point: point("Ajmer, Rajasthan, India"),
        };
        let value = serde_json::to_value(&stop).unwrap();
        assert_eq!(value["id"], "ChIJ-ajmer");
        assert_eq!(value["name"], "Ajmer, Rajasthan, India");
        assert!(value.get("point").is_none());
    }

    #[test]
    fn test_client_config_defaults_map_view() {
        let config: ClientConfig = serde_json::from_str(r#"{"maps_api_key":"k"}"#).unwrap();
        assert_eq!(config.default_center, DEFAULT_CENTER);
        assert_eq!(config.default_zoom, DEFAULT_ZOOM);
        assert_eq!(config.travel_mode, TravelMode::Driving);
        assert!(!config.optimize_waypoints);
    }
}
