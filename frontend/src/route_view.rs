use shared::{ClientConfig, DirectionsRequest, TravelMode};

use crate::provider::{RouteError, RouteResult};

/// Visibility of the route overlay. `Requesting` and `Shown` both count as
/// "map visible".
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RoutePhase {
    #[default]
    Hidden,
    Requesting { revision: u64 },
    Shown { revision: u64, route: RouteResult },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RouteOptions {
    pub travel_mode: TravelMode,
    pub optimize_waypoints: bool,
}

impl From<&ClientConfig> for RouteOptions {
    fn from(config: &ClientConfig) -> Self {
        Self {
            travel_mode: config.travel_mode,
            optimize_waypoints: config.optimize_waypoints,
        }
    }
}

/// A directions request tagged with the trip revision it was built from.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingRoute {
    pub revision: u64,
    pub request: DirectionsRequest,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteOutcome {
    Shown,
    Failed(RouteError),
    /// The trip changed after the request left; the answer was dropped.
    /// Carries the provider handle of a dropped route so it can be released.
    Stale { handle: Option<u32> },
}

impl RouteOutcome {
    pub(crate) fn stale(result: &Result<RouteResult, RouteError>) -> Self {
        RouteOutcome::Stale {
            handle: result.as_ref().ok().map(|route| route.handle),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RouteView {
    phase: RoutePhase,
    last_error: Option<RouteError>,
}

impl RouteView {
    pub fn phase(&self) -> &RoutePhase {
        &self.phase
    }

    pub fn is_visible(&self) -> bool {
        !matches!(self.phase, RoutePhase::Hidden)
    }

    pub fn route(&self) -> Option<&RouteResult> {
        match &self.phase {
            RoutePhase::Shown { route, .. } => Some(route),
            _ => None,
        }
    }

    pub fn last_error(&self) -> Option<&RouteError> {
        self.last_error.as_ref()
    }

    pub(crate) fn reset(&mut self) {
        self.phase = RoutePhase::Hidden;
        self.last_error = None;
    }

    /// Moves to `Requesting` unless a request or result for this revision
    /// already exists.
    pub(crate) fn begin(&mut self, revision: u64) -> bool {
        match self.phase {
            RoutePhase::Requesting { revision: current }
            | RoutePhase::Shown {
                revision: current, ..
            } if current == revision => false,
            _ => {
                self.phase = RoutePhase::Requesting { revision };
                self.last_error = None;
                true
            }
        }
    }

    pub(crate) fn complete(
        &mut self,
        revision: u64,
        result: Result<RouteResult, RouteError>,
    ) -> RouteOutcome {
        if self.phase != (RoutePhase::Requesting { revision }) {
            return RouteOutcome::stale(&result);
        }
        match result {
            Ok(route) => {
                self.phase = RoutePhase::Shown { revision, route };
                RouteOutcome::Shown
            }
            Err(err) => {
                self.phase = RoutePhase::Hidden;
                self.last_error = Some(err.clone());
                RouteOutcome::Failed(err)
            }
        }
    }
}
