pub mod picker;
pub mod provider;
pub mod route_view;
pub mod summary;
pub mod trip;

use std::collections::HashMap;

use seed::{prelude::*, virtual_dom::AtValue, *};
use serde::Deserialize;
use serde_wasm_bindgen::to_value;
use shared::ClientConfig;
use wasm_bindgen::{
    JsCast,
    prelude::{JsValue, wasm_bindgen},
};
use wasm_bindgen_futures::JsFuture;

use crate::{
    picker::{Selection, resolve_selection},
    provider::{GoogleMaps, MapsProvider, PickerId, ProviderInitError, RouteError, RouteResult},
    route_view::{RouteOptions, RouteOutcome, RoutePhase},
    trip::{StopSlot, TripSession},
};

#[wasm_bindgen(module = "/google_maps.js")]
extern "C" {
    #[wasm_bindgen(js_name = loadMaps, catch)]
    fn load_maps(api_key: &str) -> Result<js_sys::Promise, JsValue>;
    #[wasm_bindgen(js_name = initMap)]
    fn init_map(center: JsValue, zoom: u8);
    #[wasm_bindgen(js_name = bindAutocompletes)]
    fn bind_autocompletes();
    #[wasm_bindgen(js_name = renderRoute)]
    fn render_route(handle: u32);
    #[wasm_bindgen(js_name = clearRoute)]
    fn clear_route();
    #[wasm_bindgen(js_name = discardRoute)]
    fn discard_route(handle: u32);
}

fn api_root() -> String {
    if let Some(url) = option_env!("FRONTEND_API_ROOT") {
        return url.trim_end_matches('/').to_string();
    }
    "http://localhost:8080/api".to_string()
}

pub struct Model {
    maps: GoogleMaps,
    status: ProviderStatus,
    config: Option<ClientConfig>,
    trip: TripSession,
    form: PlaceForm,
}

#[derive(Clone, PartialEq, Debug)]
pub enum ProviderStatus {
    Loading,
    Ready,
    Failed(ProviderInitError),
}

/// Text currently typed into each place input. Stop drafts are keyed by slot
/// key; a slot without a draft shows its bound stop's address.
#[derive(Default, Clone, Debug)]
struct PlaceForm {
    origin: String,
    destination: String,
    stops: HashMap<String, String>,
}

impl PlaceForm {
    fn stop_text(&self, slot: &StopSlot) -> String {
        self.stops
            .get(slot.key())
            .cloned()
            .or_else(|| slot.stop().map(|stop| stop.point.name.clone()))
            .unwrap_or_default()
    }

    fn prune(&mut self, trip: &TripSession) {
        self.stops.retain(|key, _| trip.slot_index(key).is_some());
    }
}

pub enum Msg {
    ConfigFetched(Result<ClientConfig, ProviderInitError>),
    MapsLoaded(Result<(), ProviderInitError>),
    RetryProvider,
    OriginTextChanged(String),
    DestinationTextChanged(String),
    StopTextChanged { key: String, value: String },
    PlaceChanged(String),
    AddStopSlot,
    RemoveStopSlot(String),
    Calculate,
    RouteComputed {
        revision: u64,
        result: Result<RouteResult, RouteError>,
    },
}

pub fn init(_: Url, orders: &mut impl Orders<Msg>) -> Model {
    orders.stream(streams::window_event(Ev::from("place-changed"), |event| {
        let event = event.dyn_into::<web_sys::CustomEvent>().ok()?;
        let payload: PlaceChangedPayload = serde_wasm_bindgen::from_value(event.detail()).ok()?;
        Some(Msg::PlaceChanged(payload.picker))
    }));
    orders.perform_cmd(fetch_client_config());

    Model {
        maps: GoogleMaps,
        status: ProviderStatus::Loading,
        config: None,
        trip: TripSession::new(),
        form: PlaceForm::default(),
    }
}

pub fn update(msg: Msg, model: &mut Model, orders: &mut impl Orders<Msg>) {
    match msg {
        Msg::ConfigFetched(Ok(config)) => {
            if config.maps_api_key.trim().is_empty() {
                model.status = ProviderStatus::Failed(ProviderInitError::MissingApiKey);
                return;
            }
            let api_key = config.maps_api_key.clone();
            model.config = Some(config);
            orders.perform_cmd(load_provider_script(api_key));
        }
        Msg::ConfigFetched(Err(err)) | Msg::MapsLoaded(Err(err)) => {
            warn(&format!("map provider unavailable: {err}"));
            model.status = ProviderStatus::Failed(err);
        }
        Msg::MapsLoaded(Ok(())) => {
            model.status = ProviderStatus::Ready;
            let config = model.config.clone();
            orders.after_next_render(move |_| {
                let (center, zoom) = config
                    .map(|config| (config.default_center, config.default_zoom))
                    .unwrap_or((shared::DEFAULT_CENTER, shared::DEFAULT_ZOOM));
                if let Ok(center) = to_value(&center) {
                    init_map(center, zoom);
                }
            });
        }
        Msg::RetryProvider => {
            model.status = ProviderStatus::Loading;
            orders.perform_cmd(fetch_client_config());
        }
        Msg::OriginTextChanged(value) => model.form.origin = value,
        Msg::DestinationTextChanged(value) => model.form.destination = value,
        Msg::StopTextChanged { key, value } => {
            let Some(index) = model.trip.slot_index(&key) else {
                return;
            };
            if value.is_empty() {
                model.form.stops.remove(&key);
                model.trip.clear_slot_text(index);
            } else {
                model.form.stops.insert(key, value);
            }
        }
        Msg::PlaceChanged(raw_picker) => {
            let selection = raw_picker
                .parse::<PickerId>()
                .and_then(|picker| resolve_selection(&model.maps, &picker));
            match selection {
                Ok(selection) => {
                    match &selection {
                        Selection::Origin(point) => model.form.origin = point.name.clone(),
                        Selection::Destination(point) => {
                            model.form.destination = point.name.clone()
                        }
                        Selection::Stop { slot_key, .. } => {
                            model.form.stops.remove(slot_key);
                        }
                    }
                    if let Err(err) = model.trip.apply(selection) {
                        warn(&format!("ignoring selection from {raw_picker}: {err}"));
                    }
                }
                Err(err) => warn(&format!("ignoring selection from {raw_picker}: {err}")),
            }
        }
        Msg::AddStopSlot => model.trip.request_append_slot(),
        Msg::RemoveStopSlot(key) => {
            if let Some(index) = model.trip.slot_index(&key) {
                model.trip.delete_slot(index);
            }
        }
        Msg::Calculate => {
            let options = model
                .config
                .as_ref()
                .map(RouteOptions::from)
                .unwrap_or_default();
            match model.trip.calculate(options) {
                Some(pending) => {
                    debug(&format!(
                        "requesting route revision={} waypoints={}",
                        pending.revision,
                        pending.request.waypoints.len()
                    ));
                    let revision = pending.revision;
                    let route = model.maps.compute_route(&pending.request);
                    orders.perform_cmd(async move {
                        Msg::RouteComputed {
                            revision,
                            result: route.await,
                        }
                    });
                }
                None => debug("calculate ignored: origin/destination missing or already requested"),
            }
        }
        Msg::RouteComputed { revision, result } => {
            match model.trip.complete_route(revision, result) {
                RouteOutcome::Shown => debug(&format!("route shown for revision {revision}")),
                RouteOutcome::Failed(err) => warn(&format!("route request failed: {err}")),
                RouteOutcome::Stale { handle } => {
                    debug(&format!("dropping stale route for revision {revision}"));
                    if let Some(handle) = handle {
                        discard_route(handle);
                    }
                }
            }
        }
    }

    model.form.prune(&model.trip);
    if model.status == ProviderStatus::Ready {
        sync_route_overlay(&model.trip);
        orders.after_next_render(|_| bind_autocompletes());
    }
}

async fn fetch_client_config() -> Msg {
    let config = match Request::new(format!("{}/config", api_root())).fetch().await {
        Err(err) => Err(ProviderInitError::Config(format!("{err:?}"))),
        Ok(raw) => match raw.check_status() {
            Err(status_err) => Err(ProviderInitError::Config(format!("{status_err:?}"))),
            Ok(resp) => resp
                .json::<ClientConfig>()
                .await
                .map_err(|err| ProviderInitError::Config(format!("{err:?}"))),
        },
    };

    Msg::ConfigFetched(config)
}

async fn load_provider_script(api_key: String) -> Msg {
    let loaded = match load_maps(&api_key) {
        Err(err) => Err(ProviderInitError::ScriptLoad(format!("{err:?}"))),
        Ok(promise) => JsFuture::from(promise)
            .await
            .map(|_| ())
            .map_err(|err| ProviderInitError::ScriptLoad(format!("{err:?}"))),
    };

    Msg::MapsLoaded(loaded)
}

fn sync_route_overlay(trip: &TripSession) {
    match trip.route_view().phase() {
        RoutePhase::Shown { route, .. } => render_route(route.handle),
        RoutePhase::Hidden | RoutePhase::Requesting { .. } => clear_route(),
    }
}

pub fn view(model: &Model) -> Node<Msg> {
    let header = header![C!["navbar"], h1!["Trip distance"]];
    let body = match &model.status {
        ProviderStatus::Loading => div![C!["spinner"], "Loading map…"],
        ProviderStatus::Failed(err) => div![
            C!["provider-error"],
            p![err.to_string()],
            button![
                "Retry",
                ev(Ev::Click, |event| {
                    event.prevent_default();
                    Msg::RetryProvider
                }),
            ],
        ],
        ProviderStatus::Ready => div![
            C!["planner"],
            p![
                C!["tagline"],
                "Let's calculate ",
                span![C!["strong"], "distance"],
                " from Google maps"
            ],
            view_form(model),
            view_distance(&model.trip),
        ],
    };

    div![
        C!["app-container"],
        header,
        body,
        div![C!["map"], attrs! { At::Id => "map" }],
    ]
}

fn view_form(model: &Model) -> Node<Msg> {
    let place_input = |label: &str,
                       picker: PickerId,
                       value: &str,
                       placeholder: &str,
                       msg: fn(String) -> Msg| {
        let picker_key = picker.to_string();
        div![
            C!["input-field"],
            label![label, attrs! { At::For => &picker_key }],
            input![
                attrs! {
                    At::Id => &picker_key,
                    At::Type => "text",
                    At::Placeholder => placeholder,
                    At::Value => value,
                    At::from("data-picker") => &picker_key,
                },
                input_ev(Ev::Input, msg),
            ],
        ]
    };

    let stop_inputs = model.trip.slots().iter().enumerate().map(|(index, slot)| {
        let key = slot.key().to_string();
        let picker_key = PickerId::Stop(key.clone()).to_string();
        let text_key = key.clone();
        div![
            el_key(&key),
            C!["input-field", "stop"],
            label!["Stop"],
            input![
                attrs! {
                    At::Type => "text",
                    At::Placeholder => "Ajmer",
                    At::Value => model.form.stop_text(slot),
                    At::from("data-picker") => picker_key,
                },
                input_ev(Ev::Input, move |value| Msg::StopTextChanged {
                    key: text_key,
                    value,
                }),
            ],
            IF!(index > 0 => button![
                C!["remove-stop"],
                "✕",
                ev(Ev::Click, move |event| {
                    event.prevent_default();
                    Msg::RemoveStopSlot(key)
                }),
            ]),
        ]
    });

    let ready = model.trip.origin().is_some() && model.trip.destination().is_some();

    div![
        C!["controls"],
        place_input(
            "Origin",
            PickerId::Origin,
            &model.form.origin,
            "Mumbai",
            Msg::OriginTextChanged
        ),
        div![C!["stops"], stop_inputs],
        button![
            C!["add-stop"],
            "+ Add another stop",
            ev(Ev::Click, |event| {
                event.prevent_default();
                Msg::AddStopSlot
            }),
        ],
        place_input(
            "Destination",
            PickerId::Destination,
            &model.form.destination,
            "Delhi",
            Msg::DestinationTextChanged
        ),
        button![
            C!["calculate"],
            "Calculate",
            ev(Ev::Click, |event| {
                event.prevent_default();
                Msg::Calculate
            }),
            attrs! { At::Disabled => bool_attr(!ready) },
        ],
    ]
}

fn view_distance(trip: &TripSession) -> Node<Msg> {
    div![
        C!["distance-card"],
        div![
            C!["readout"],
            h3!["Distance"],
            p![C!["distance"], trip.distance_readout()],
        ],
        match trip.summary() {
            Some(sentence) => p![C!["summary"], sentence],
            None => empty![],
        },
        match trip.route_view().last_error() {
            Some(err) => p![C!["error"], err.to_string()],
            None => empty![],
        },
    ]
}

#[wasm_bindgen(start)]
pub fn start() {
    App::start("app", init, update, view);
}

fn bool_attr(value: bool) -> AtValue {
    if value {
        AtValue::Some("true".into())
    } else {
        AtValue::Ignored
    }
}

fn debug(message: &str) {
    web_sys::console::debug_1(&format!("[frontend] {message}").into());
}

fn warn(message: &str) {
    web_sys::console::warn_1(&format!("[frontend] {message}").into());
}

#[derive(Deserialize)]
struct PlaceChangedPayload {
    picker: String,
}
