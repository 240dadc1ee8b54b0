//! Askama templates for the web frontend.

use askama::Template;

use crate::domain::{Coordinates, FuelKind};
use crate::ranker::RankedResult;

use super::dto::{MapView, NO_RESULTS_MESSAGE};
use super::maps::{directions_url, format_distance, format_price};

// ============================================================================
// Page Templates (extend base.html)
// ============================================================================

/// Home page with search form.
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub fuels: Vec<FuelOption>,
    pub default_radius: f64,
    pub max_radius: f64,
    pub updated: Option<String>,
}

/// Search results page.
#[derive(Template)]
#[template(path = "results.html")]
pub struct ResultsTemplate {
    pub fuel_label: String,
    pub radius_display: String,
    pub updated: String,
    /// "Found N stations", noting when only the top few are shown
    pub summary: Option<String>,
    pub map: MapView,
    pub stations: Vec<StationView>,
    pub message: Option<String>,
}

/// Error page.
#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub title: String,
    pub message: String,
}

// ============================================================================
// View Models (for templates)
// ============================================================================

/// One entry in the fuel selector.
#[derive(Debug, Clone)]
pub struct FuelOption {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

impl FuelOption {
    /// Options for every fuel kind, with `selected` preselected.
    pub fn all(selected: FuelKind) -> Vec<Self> {
        FuelKind::ALL
            .iter()
            .map(|&kind| Self {
                value: kind.as_str(),
                label: kind.label(),
                selected: kind == selected,
            })
            .collect()
    }
}

/// Station view model for templates.
#[derive(Debug, Clone)]
pub struct StationView {
    /// 1-based position in the ranking
    pub position: usize,
    pub name: String,
    pub locality: String,
    pub hours: String,
    pub price_display: String,
    pub distance_display: String,
    pub directions_url: String,
}

impl StationView {
    /// Create from a ranked result at `position` (1-based).
    pub fn from_ranked(position: usize, result: &RankedResult<'_>) -> Self {
        Self {
            position,
            name: result.station.name.clone(),
            locality: result.station.locality.clone(),
            hours: result.station.hours.clone(),
            price_display: format_price(result.price),
            distance_display: format_distance(result.distance_km),
            directions_url: directions_url(result.station.coordinates),
        }
    }

    /// Whether the station publishes opening hours.
    pub fn has_hours(&self) -> bool {
        !self.hours.trim().is_empty()
    }
}

impl ResultsTemplate {
    /// Create the results page for ranked results.
    pub fn from_ranked(
        fuel: FuelKind,
        origin: Coordinates,
        radius_km: f64,
        updated: String,
        total_matches: usize,
        results: &[RankedResult<'_>],
    ) -> Self {
        let stations: Vec<StationView> = results
            .iter()
            .enumerate()
            .map(|(i, r)| StationView::from_ranked(i + 1, r))
            .collect();

        Self {
            fuel_label: fuel.label().to_string(),
            radius_display: format_distance(radius_km),
            updated,
            summary: match_summary(total_matches, stations.len()),
            map: MapView::from_ranked(origin, results),
            message: stations.is_empty().then(|| NO_RESULTS_MESSAGE.to_string()),
            stations,
        }
    }
}

/// Summary line for a search that matched `total` stations of which
/// `shown` are listed. `None` when nothing matched.
fn match_summary(total: usize, shown: usize) -> Option<String> {
    let noun = if total == 1 { "station" } else { "stations" };
    match total {
        0 => None,
        _ if shown < total => Some(format!("Found {total} {noun}, showing top {shown}")),
        _ => Some(format!("Found {total} {noun}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FuelPrices, StationRecord};

    fn make_station(name: &str, hours: &str) -> StationRecord {
        StationRecord::new(
            name,
            "Albacete",
            FuelPrices::new(Some(1.459), None),
            Coordinates::new(38.99, -1.85).unwrap(),
            hours,
        )
    }

    fn origin() -> Coordinates {
        Coordinates::new(39.0, -1.86).unwrap()
    }

    fn ranked(station: &StationRecord, distance_km: f64) -> RankedResult<'_> {
        RankedResult {
            station,
            distance_km,
            price: 1.459,
        }
    }

    #[test]
    fn fuel_options_mark_selection() {
        let options = FuelOption::all(FuelKind::Diesel);

        assert_eq!(options.len(), 2);
        assert_eq!(options[0].value, "gasoline95");
        assert!(!options[0].selected);
        assert_eq!(options[1].label, "Diesel");
        assert!(options[1].selected);
    }

    #[test]
    fn station_view_positions_are_one_based() {
        let a = make_station("A", "24H");
        let b = make_station("B", "");
        let ranked = vec![ranked(&a, 1.0), ranked(&b, 2.0)];

        let page = ResultsTemplate::from_ranked(
            FuelKind::Gasoline95,
            origin(),
            30.0,
            "2026-03-15 10:30 UTC".into(),
            ranked.len(),
            &ranked,
        );

        assert_eq!(page.stations[0].position, 1);
        assert_eq!(page.stations[1].position, 2);
        assert!(page.stations[0].has_hours());
        assert!(!page.stations[1].has_hours());
        assert_eq!(page.radius_display, "30.0 km");
        assert!(page.message.is_none());
    }

    #[test]
    fn results_page_renders() {
        let a = make_station("Repsol Centro", "24H");
        let ranked = vec![ranked(&a, 1.24)];
        let page = ResultsTemplate::from_ranked(
            FuelKind::Gasoline95,
            origin(),
            30.0,
            "2026-03-15 10:30 UTC".into(),
            ranked.len(),
            &ranked,
        );

        let html = page.render().unwrap();

        assert!(html.contains("Repsol Centro"));
        assert!(html.contains("1.459 €"));
        assert!(html.contains("1.2 km"));
        assert!(html.contains("https://www.google.com/maps/dir/?api=1&destination=38.99,-1.85"));
        assert!(html.contains("Updated: 2026-03-15 10:30 UTC"));
        assert!(html.contains("Found 1 station"));
        assert_eq!(html.matches(r#"class="map-pin""#).count(), 1);
    }

    #[test]
    fn empty_results_page_shows_message() {
        let page = ResultsTemplate::from_ranked(
            FuelKind::Diesel,
            origin(),
            5.0,
            "2026-03-15 10:30 UTC".into(),
            0,
            &[],
        );

        let html = page.render().unwrap();

        assert!(html.contains(NO_RESULTS_MESSAGE));
        assert!(!html.contains("Found"));
        assert!(html.contains(r#"data-label="You""#));
        assert!(!html.contains(r#"class="map-pin""#));
    }

    #[test]
    fn results_page_draws_origin_and_pin_per_result() {
        let stations: Vec<StationRecord> = (0..7)
            .map(|i| make_station(&format!("Station {i}"), "24H"))
            .collect();
        let ranked: Vec<RankedResult<'_>> = stations
            .iter()
            .take(5)
            .enumerate()
            .map(|(i, s)| ranked(s, 1.0 + i as f64))
            .collect();

        let page = ResultsTemplate::from_ranked(
            FuelKind::Gasoline95,
            origin(),
            30.0,
            "2026-03-15 10:30 UTC".into(),
            stations.len(),
            &ranked,
        );
        let html = page.render().unwrap();

        assert!(html.contains("Found 7 stations, showing top 5"));
        assert!(html.contains("leaflet.js"));
        assert!(html.contains(r#"data-lat="39" data-lng="-1.86" data-label="You""#));
        assert_eq!(html.matches(r#"class="map-pin""#).count(), 5);
        assert!(html.contains(r#"data-label="Station 0 (1.459 €)""#));
        assert!(!html.contains("Station 5"));
    }

    #[test]
    fn summary_wording() {
        assert_eq!(match_summary(0, 0), None);
        assert_eq!(match_summary(1, 1).as_deref(), Some("Found 1 station"));
        assert_eq!(match_summary(3, 3).as_deref(), Some("Found 3 stations"));
        assert_eq!(
            match_summary(12, 5).as_deref(),
            Some("Found 12 stations, showing top 5")
        );
    }

    #[test]
    fn error_page_renders_title_and_message() {
        let page = ErrorTemplate {
            title: "Not Found".into(),
            message: "Could not find place Atlantis".into(),
        };

        let html = page.render().unwrap();

        assert!(html.contains("<h2>Not Found</h2>"));
        assert!(html.contains("<p>Could not find place Atlantis</p>"));
        assert!(!html.contains(r#"class="muted""#));
    }

    #[test]
    fn index_page_renders_fuel_selector() {
        let page = IndexTemplate {
            fuels: FuelOption::all(FuelKind::Gasoline95),
            default_radius: 30.0,
            max_radius: 100.0,
            updated: None,
        };

        let html = page.render().unwrap();

        assert!(html.contains(r#"value="gasoline95" selected"#));
        assert!(html.contains("Diesel"));
    }
}
