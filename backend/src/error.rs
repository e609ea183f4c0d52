use std::{io, net::AddrParseError, path::PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid bind address `{addr}`: {source}")]
    InvalidBind {
        addr: String,
        #[source]
        source: AddrParseError,
    },
    #[error("zoom level {0} is outside 0..=22")]
    InvalidZoom(u8),
    #[error("map center ({lat}, {lng}) is not a valid coordinate")]
    InvalidCenter { lat: f64, lng: f64 },
    #[error("static directory {0:?} does not exist")]
    MissingStaticDir(PathBuf),
    #[error("no maps API key configured (set MAPS_API_KEY)")]
    MissingApiKey,
}

#[derive(Debug, Error)]
pub enum ServeError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to bind listener: {0}")]
    Bind(#[source] io::Error),
    #[error("server error: {0}")]
    Serve(#[source] io::Error),
}
