use std::{net::SocketAddr, path::PathBuf};

use clap::Parser;
use shared::{ClientConfig, DEFAULT_CENTER, DEFAULT_ZOOM, LatLng, TravelMode};

use crate::error::ConfigError;

const MAX_ZOOM: u8 = 22;

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Serve the trip distance planner and its map provider settings"
)]
pub struct Args {
    /// Address the HTTP server listens on
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:8080")]
    pub bind: String,

    /// Credential for the Google Maps JS API, handed to the browser
    #[arg(long, env = "MAPS_API_KEY")]
    pub maps_api_key: Option<String>,

    /// Directory holding the built frontend (index.html, pkg/)
    #[arg(long, env = "STATIC_DIR")]
    pub static_dir: Option<PathBuf>,

    /// driving, walking, bicycling or transit
    #[arg(long, env = "TRAVEL_MODE", default_value = "driving")]
    pub travel_mode: TravelMode,

    /// Let the provider reorder stops for a shorter route
    #[arg(long, env = "OPTIMIZE_WAYPOINTS", default_value_t = false)]
    pub optimize_waypoints: bool,

    #[arg(long, env = "DEFAULT_ZOOM", default_value_t = DEFAULT_ZOOM)]
    pub default_zoom: u8,
    #[arg(long, env = "CENTER_LAT", default_value_t = DEFAULT_CENTER.lat)]
    pub center_lat: f64,
    #[arg(long, env = "CENTER_LNG", default_value_t = DEFAULT_CENTER.lng)]
    pub center_lng: f64,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    pub maps_api_key: Option<String>,
    pub static_dir: Option<PathBuf>,
    pub travel_mode: TravelMode,
    pub optimize_waypoints: bool,
    pub default_center: LatLng,
    pub default_zoom: u8,
}

impl Args {
    pub fn into_config(self) -> Result<ServerConfig, ConfigError> {
        let bind = self
            .bind
            .parse::<SocketAddr>()
            .map_err(|source| ConfigError::InvalidBind {
                addr: self.bind.clone(),
                source,
            })?;

        if self.default_zoom > MAX_ZOOM {
            return Err(ConfigError::InvalidZoom(self.default_zoom));
        }
        let center_ok = (-90.0..=90.0).contains(&self.center_lat)
            && (-180.0..=180.0).contains(&self.center_lng);
        if !center_ok {
            return Err(ConfigError::InvalidCenter {
                lat: self.center_lat,
                lng: self.center_lng,
            });
        }
        if let Some(dir) = self.static_dir.as_ref().filter(|dir| !dir.is_dir()) {
            return Err(ConfigError::MissingStaticDir(dir.clone()));
        }

        Ok(ServerConfig {
            bind,
            maps_api_key: self
                .maps_api_key
                .map(|key| key.trim().to_string())
                .filter(|key| !key.is_empty()),
            static_dir: self.static_dir,
            travel_mode: self.travel_mode,
            optimize_waypoints: self.optimize_waypoints,
            default_center: LatLng {
                lat: self.center_lat,
                lng: self.center_lng,
            },
            default_zoom: self.default_zoom,
        })
    }
}

impl ServerConfig {
    /// Settings for the browser. Fails when no credential is configured so the
    /// UI can show its provider error instead of a map that never loads.
    pub fn client_config(&self) -> Result<ClientConfig, ConfigError> {
        let maps_api_key = self
            .maps_api_key
            .clone()
            .ok_or(ConfigError::MissingApiKey)?;
        Ok(ClientConfig {
            maps_api_key,
            default_center: self.default_center,
            default_zoom: self.default_zoom,
            travel_mode: self.travel_mode,
            optimize_waypoints: self.optimize_waypoints,
        })
    }
}
