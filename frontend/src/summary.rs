use shared::GeoPoint;

use crate::provider::RouteResult;

/// Shown in the distance readout while no route is displayed.
pub const DEFAULT_READOUT: &str = "0 Km";

impl RouteResult {
    /// Single-leg routes keep the provider's own text when it is metric;
    /// anything else is formatted from the summed meters so adding a stop
    /// never switches units.
    pub fn distance_text(&self) -> String {
        match self.legs.as_slice() {
            [leg] if is_metric_text(&leg.distance.text) => leg.distance.text.clone(),
            legs => format_metric_distance(legs.iter().map(|leg| leg.distance.meters).sum()),
        }
    }
}

pub fn distance_readout(route: Option<&RouteResult>) -> String {
    route
        .map(RouteResult::distance_text)
        .unwrap_or_else(|| DEFAULT_READOUT.to_string())
}

pub fn summary_sentence(origin: &GeoPoint, destination: &GeoPoint, distance: &str) -> String {
    format!(
        "The distance between {} and {} via the selected route is {distance}.",
        origin.short_name(),
        destination.short_name()
    )
}

/// Formats meters the way the directions provider renders metric distances:
/// "850 m", "12.4 km", "1,411 km".
pub fn format_metric_distance(meters: u64) -> String {
    if meters < 1_000 {
        return format!("{meters} m");
    }
    if meters < 100_000 {
        let tenths = (meters + 50) / 100;
        return match tenths % 10 {
            0 => format!("{} km", tenths / 10),
            frac => format!("{}.{frac} km", tenths / 10),
        };
    }
    format!("{} km", group_thousands((meters + 500) / 1_000))
}

fn is_metric_text(text: &str) -> bool {
    text.ends_with(" km") || text.ends_with(" m")
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
