use std::{fmt, future::Future, pin::Pin, str::FromStr};

use serde::Deserialize;
use shared::{DirectionsRequest, LatLng, RouteLeg};
use wasm_bindgen::{JsCast, prelude::*};
use wasm_bindgen_futures::JsFuture;

#[wasm_bindgen(module = "/google_maps.js")]
extern "C" {
    #[wasm_bindgen(js_name = getPlace)]
    fn get_place(picker: &str) -> JsValue;
    #[wasm_bindgen(js_name = requestDirections, catch)]
    fn request_directions(request: JsValue) -> Result<js_sys::Promise, JsValue>;
}

/// Identifies one autocomplete widget on the page. Stop widgets are keyed by
/// their slot key so they survive reordering of the slot list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PickerId {
    Origin,
    Destination,
    Stop(String),
}

impl fmt::Display for PickerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PickerId::Origin => f.write_str("origin"),
            PickerId::Destination => f.write_str("destination"),
            PickerId::Stop(key) => write!(f, "stop:{key}"),
        }
    }
}

impl FromStr for PickerId {
    type Err = ResolutionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "origin" => Ok(PickerId::Origin),
            "destination" => Ok(PickerId::Destination),
            _ => s
                .strip_prefix("stop:")
                .filter(|key| !key.is_empty())
                .map(|key| PickerId::Stop(key.to_string()))
                .ok_or_else(|| ResolutionError::UnknownPicker(s.to_string())),
        }
    }
}

/// Raw place handed back by the autocomplete widget. Every field may be
/// missing when the user confirms free text without picking a suggestion.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PlaceResult {
    #[serde(default)]
    pub place_id: Option<String>,
    #[serde(default)]
    pub formatted_address: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub location: Option<LatLng>,
}

/// Route computed by the directions service. `handle` refers to the full
/// provider result kept on the JS side for rendering.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RouteResult {
    pub handle: u32,
    pub legs: Vec<RouteLeg>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolutionError {
    #[error("unknown place picker `{0}`")]
    UnknownPicker(String),
    #[error("no suggestion selected for {0}")]
    NoSelection(PickerId),
    #[error("unreadable place payload: {0}")]
    MalformedPlace(String),
    #[error("selected place has no geometry")]
    MissingGeometry,
    #[error("selected place has no address")]
    MissingAddress,
    #[error("selected stop has no place id")]
    MissingPlaceId,
    #[error("stop input is no longer on the page")]
    StaleSlot,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
    #[error("no route found ({0})")]
    NoRoute(String),
    #[error("directions provider error: {0}")]
    Provider(String),
    #[error("route has no legs")]
    Empty,
    #[error("malformed directions response: {0}")]
    Malformed(String),
}

impl RouteError {
    /// Rejections carry a provider status string (`ZERO_RESULTS`,
    /// `NOT_FOUND`, ...) or a JS `Error`.
    fn from_js(value: JsValue) -> Self {
        if let Some(status) = value.as_string() {
            return match status.as_str() {
                "ZERO_RESULTS" | "NOT_FOUND" => RouteError::NoRoute(status),
                _ => RouteError::Provider(status),
            };
        }
        match value.dyn_into::<js_sys::Error>() {
            Ok(err) => RouteError::Provider(String::from(err.message())),
            Err(other) => RouteError::Provider(format!("{other:?}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderInitError {
    #[error("could not fetch map configuration: {0}")]
    Config(String),
    #[error("no map provider credential configured")]
    MissingApiKey,
    #[error("map provider script failed to load: {0}")]
    ScriptLoad(String),
}

/// Directions answer; owns everything it needs so it can outlive the update
/// that started it.
pub type RouteFuture = Pin<Box<dyn Future<Output = Result<RouteResult, RouteError>>>>;

/// Capabilities the application needs from the external mapping service.
pub trait MapsProvider {
    /// Place last selected in the autocomplete widget bound to `picker`.
    fn resolve_place(&self, picker: &PickerId) -> Result<PlaceResult, ResolutionError>;

    fn compute_route(&self, request: &DirectionsRequest) -> RouteFuture;
}

/// Google Maps JS API reached through `google_maps.js`.
#[derive(Debug, Clone, Copy, Default)]
pub struct GoogleMaps;

impl MapsProvider for GoogleMaps {
    fn resolve_place(&self, picker: &PickerId) -> Result<PlaceResult, ResolutionError> {
        let value = get_place(&picker.to_string());
        if value.is_null() || value.is_undefined() {
            return Err(ResolutionError::NoSelection(picker.clone()));
        }
        serde_wasm_bindgen::from_value(value)
            .map_err(|err| ResolutionError::MalformedPlace(err.to_string()))
    }

    fn compute_route(&self, request: &DirectionsRequest) -> RouteFuture {
        let promise = serde_wasm_bindgen::to_value(request)
            .map_err(|err| RouteError::Malformed(err.to_string()))
            .and_then(|value| request_directions(value).map_err(RouteError::from_js));

        Box::pin(async move {
            let value = JsFuture::from(promise?)
                .await
                .map_err(RouteError::from_js)?;
            let route: RouteResult = serde_wasm_bindgen::from_value(value)
                .map_err(|err| RouteError::Malformed(err.to_string()))?;
            if route.legs.is_empty() {
                return Err(RouteError::Empty);
            }
            Ok(route)
        })
    }
}

#[cfg(test)]
pub(crate) mod fake {
    use std::{cell::RefCell, collections::HashMap, rc::Rc};

    use super::*;

    /// In-memory provider: canned places per picker and a queue of route
    /// answers. Records every directions request it receives.
    #[derive(Default, Clone)]
    pub struct FakeMaps {
        pub places: HashMap<String, Result<PlaceResult, ResolutionError>>,
        pub routes: Rc<RefCell<Vec<Result<RouteResult, RouteError>>>>,
        pub requests: Rc<RefCell<Vec<DirectionsRequest>>>,
    }

    impl FakeMaps {
        pub fn with_place(mut self, picker: &PickerId, place: PlaceResult) -> Self {
            self.places.insert(picker.to_string(), Ok(place));
            self
        }

        pub fn with_unreadable_place(mut self, picker: &PickerId, reason: &str) -> Self {
            self.places.insert(
                picker.to_string(),
                Err(ResolutionError::MalformedPlace(reason.to_string())),
            );
            self
        }

        pub fn answer(&self, result: Result<RouteResult, RouteError>) {
            self.routes.borrow_mut().push(result);
        }
    }

    impl MapsProvider for FakeMaps {
        fn resolve_place(&self, picker: &PickerId) -> Result<PlaceResult, ResolutionError> {
            self.places
                .get(&picker.to_string())
                .cloned()
                .unwrap_or_else(|| Err(ResolutionError::NoSelection(picker.clone())))
        }

        fn compute_route(&self, request: &DirectionsRequest) -> RouteFuture {
            self.requests.borrow_mut().push(request.clone());
            let answer = if self.routes.borrow().is_empty() {
                Err(RouteError::Provider("no answer queued".into()))
            } else {
                self.routes.borrow_mut().remove(0)
            };
            Box::pin(std::future::ready(answer))
        }
    }
}
