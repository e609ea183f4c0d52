//! Trip state: origin, destination, ordered stops and the stop input slots
//! shown on the form.
//!
//! Slots are derived from the stop sequence by [`TripSession::reconcile_slots`],
//! which every stop mutator calls explicitly. Every mutation of origin,
//! destination or stops bumps the session revision and hides the route, so an
//! answer computed for older inputs can never be displayed.

use shared::{DirectionsRequest, GeoPoint, Stop};
use uuid::Uuid;

use crate::{
    picker::Selection,
    provider::{ResolutionError, RouteError, RouteResult},
    route_view::{PendingRoute, RouteOptions, RouteOutcome, RouteView},
    summary,
};

/// One visible stop input box.
#[derive(Debug, Clone, PartialEq)]
pub enum StopSlot {
    Empty { key: String },
    Bound(Stop),
}

impl StopSlot {
    fn empty() -> Self {
        StopSlot::Empty {
            key: Uuid::new_v4().to_string(),
        }
    }

    /// Stable key for the input element: the stop id once bound.
    pub fn key(&self) -> &str {
        match self {
            StopSlot::Empty { key } => key,
            StopSlot::Bound(stop) => &stop.id,
        }
    }

    pub fn stop(&self) -> Option<&Stop> {
        match self {
            StopSlot::Empty { .. } => None,
            StopSlot::Bound(stop) => Some(stop),
        }
    }

    pub fn is_bound(&self) -> bool {
        matches!(self, StopSlot::Bound(_))
    }
}

#[derive(Debug, Clone)]
pub struct TripSession {
    origin: Option<GeoPoint>,
    destination: Option<GeoPoint>,
    stops: Vec<Stop>,
    slots: Vec<StopSlot>,
    /// Skips the next reconciliation so a just-emptied input stays on screen.
    clearing: bool,
    revision: u64,
    route: RouteView,
}

impl Default for TripSession {
    fn default() -> Self {
        Self::new()
    }
}

impl TripSession {
    pub fn new() -> Self {
        Self {
            origin: None,
            destination: None,
            stops: Vec::new(),
            slots: vec![StopSlot::empty()],
            clearing: false,
            revision: 0,
            route: RouteView::default(),
        }
    }

    pub fn origin(&self) -> Option<&GeoPoint> {
        self.origin.as_ref()
    }

    pub fn destination(&self) -> Option<&GeoPoint> {
        self.destination.as_ref()
    }

    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    pub fn slots(&self) -> &[StopSlot] {
        &self.slots
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn route_view(&self) -> &RouteView {
        &self.route
    }

    pub fn is_map_visible(&self) -> bool {
        self.route.is_visible()
    }

    pub fn slot_index(&self, key: &str) -> Option<usize> {
        self.slots.iter().position(|slot| slot.key() == key)
    }

    pub fn set_origin(&mut self, point: GeoPoint) {
        self.origin = Some(point);
        self.invalidate();
    }

    pub fn set_destination(&mut self, point: GeoPoint) {
        self.destination = Some(point);
        self.invalidate();
    }

    /// Appends a stop. A stop whose id is already present is ignored.
    pub fn add_stop(&mut self, stop: Stop) {
        let position = self.stops.len();
        self.insert_stop(position, stop);
    }

    pub fn remove_stop(&mut self, id: &str) {
        let before = self.stops.len();
        self.stops.retain(|stop| stop.id != id);
        if self.stops.len() != before {
            self.invalidate();
            self.reconcile_slots();
        }
    }

    /// Adds one empty input, but only when every existing input already holds
    /// a confirmed stop.
    pub fn request_append_slot(&mut self) {
        if self.slots.iter().all(StopSlot::is_bound) {
            self.slots.push(StopSlot::empty());
        }
    }

    pub fn reconcile_slots(&mut self) {
        if self.stops.is_empty() {
            self.clearing = false;
            if !matches!(self.slots.as_slice(), [StopSlot::Empty { .. }]) {
                self.slots = vec![StopSlot::empty()];
            }
            return;
        }
        if self.clearing {
            self.clearing = false;
            return;
        }
        self.slots = self.stops.iter().cloned().map(StopSlot::Bound).collect();
    }

    /// Binds a resolved stop to the input at `index`. An empty input gets the
    /// stop inserted at its position in the sequence; a bound input has its
    /// stop replaced in place.
    pub fn bind_slot(&mut self, index: usize, stop: Stop) {
        let Some(slot) = self.slots.get(index) else {
            return;
        };
        self.clearing = false;
        match slot {
            StopSlot::Empty { .. } => {
                let position = self.slots[..index]
                    .iter()
                    .filter(|slot| slot.is_bound())
                    .count();
                self.insert_stop(position, stop);
            }
            StopSlot::Bound(current) => {
                let current_id = current.id.clone();
                self.replace_stop(&current_id, stop);
            }
        }
    }

    /// The user emptied the text of the input at `index`.
    pub fn clear_slot_text(&mut self, index: usize) {
        match index {
            0 => self.clear_stops(),
            _ => {
                let Some(StopSlot::Bound(stop)) = self.slots.get(index) else {
                    return;
                };
                let id = stop.id.clone();
                // keep the element key so the input the user is typing in survives
                self.slots[index] = StopSlot::Empty { key: id.clone() };
                self.slots = std::mem::take(&mut self.slots)
                    .into_iter()
                    .enumerate()
                    .filter(|(idx, slot)| *idx == index || slot.is_bound())
                    .map(|(_, slot)| slot)
                    .collect();
                self.clearing = true;
                self.remove_stop(&id);
            }
        }
    }

    /// Close button next to an input. The first input has no close button.
    pub fn delete_slot(&mut self, index: usize) {
        if index == 0 || index >= self.slots.len() {
            return;
        }
        match self.slots.remove(index) {
            StopSlot::Empty { .. } => {}
            StopSlot::Bound(stop) => self.remove_stop(&stop.id),
        }
    }

    pub fn apply(&mut self, selection: Selection) -> Result<(), ResolutionError> {
        match selection {
            Selection::Origin(point) => self.set_origin(point),
            Selection::Destination(point) => self.set_destination(point),
            Selection::Stop { slot_key, stop } => {
                let index = self
                    .slot_index(&slot_key)
                    .ok_or(ResolutionError::StaleSlot)?;
                self.bind_slot(index, stop);
            }
        }
        Ok(())
    }

    /// The Calculate action. Returns the request to send, if any.
    pub fn calculate(&mut self, options: RouteOptions) -> Option<PendingRoute> {
        let (origin, destination) = (self.origin.as_ref()?, self.destination.as_ref()?);
        let request = DirectionsRequest {
            origin: origin.clone(),
            destination: destination.clone(),
            waypoints: self.stops.iter().map(|stop| stop.point.clone()).collect(),
            travel_mode: options.travel_mode,
            optimize_waypoints: options.optimize_waypoints,
        };
        self.route.begin(self.revision).then(|| PendingRoute {
            revision: self.revision,
            request,
        })
    }

    pub fn complete_route(
        &mut self,
        revision: u64,
        result: Result<RouteResult, RouteError>,
    ) -> RouteOutcome {
        if revision != self.revision {
            return RouteOutcome::stale(&result);
        }
        self.route.complete(revision, result)
    }

    pub fn distance_readout(&self) -> String {
        summary::distance_readout(self.route.route())
    }

    pub fn summary(&self) -> Option<String> {
        let route = self.route.route()?;
        Some(summary::summary_sentence(
            self.origin.as_ref()?,
            self.destination.as_ref()?,
            &route.distance_text(),
        ))
    }

    fn insert_stop(&mut self, position: usize, stop: Stop) {
        if self.stops.iter().any(|existing| existing.id == stop.id) {
            return;
        }
        self.stops.insert(position.min(self.stops.len()), stop);
        self.invalidate();
        self.reconcile_slots();
    }

    fn replace_stop(&mut self, id: &str, stop: Stop) {
        if stop.id == id || self.stops.iter().any(|existing| existing.id == stop.id) {
            return;
        }
        let Some(position) = self.stops.iter().position(|existing| existing.id == id) else {
            return;
        };
        self.stops[position] = stop;
        self.invalidate();
        self.reconcile_slots();
    }

    fn clear_stops(&mut self) {
        if self.stops.is_empty() {
            return;
        }
        self.stops.clear();
        self.invalidate();
        self.reconcile_slots();
    }

    fn invalidate(&mut self) {
        self.revision += 1;
        self.route.reset();
    }
}
