use shared::{GeoPoint, Stop};

use crate::provider::{MapsProvider, PickerId, PlaceResult, ResolutionError};

/// A complete, geocoded selection tagged with the widget it came from.
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    Origin(GeoPoint),
    Destination(GeoPoint),
    Stop { slot_key: String, stop: Stop },
}

impl PlaceResult {
    pub fn into_geo_point(self) -> Result<GeoPoint, ResolutionError> {
        let location = self.location.ok_or(ResolutionError::MissingGeometry)?;
        let present = |text: &String| !text.trim().is_empty();
        let name = self
            .formatted_address
            .filter(present)
            .or(self.name.filter(present))
            .ok_or(ResolutionError::MissingAddress)?;
        Ok(GeoPoint {
            name,
            lat: location.lat,
            lng: location.lng,
        })
    }

    pub fn into_stop(mut self) -> Result<Stop, ResolutionError> {
        let id = self
            .place_id
            .take()
            .filter(|id| !id.is_empty())
            .ok_or(ResolutionError::MissingPlaceId)?;
        Ok(Stop {
            id,
            point: self.into_geo_point()?,
        })
    }
}

/// Turns the widget's current selection into a complete point, or nothing.
pub fn resolve_selection<P: MapsProvider>(
    provider: &P,
    picker: &PickerId,
) -> Result<Selection, ResolutionError> {
    let place = provider.resolve_place(picker)?;

    match picker {
        PickerId::Origin => place.into_geo_point().map(Selection::Origin),
        PickerId::Destination => place.into_geo_point().map(Selection::Destination),
        PickerId::Stop(key) => place.into_stop().map(|stop| Selection::Stop {
            slot_key: key.clone(),
            stop,
        }),
    }
}
