use guardian_lib::{
    config::{FIX_ZOOM, ROUTE_BOUNDS_PADDING},
    navigation::{ControlState, NavigationOutput, TripStats},
    position::{LatLon, Position},
    route::{RouteGeometry, RouteStep},
};
use leaflet::{Marker, Polyline, PolylineOptions};
use web_sys::js_sys::Array;

use crate::{
    components::map_component::{location_marker, to_lat_lng, MapView},
    speech::Speaker,
    util,
};

/// Text shown around the map, read by the location page when it renders.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PanelState {
    pub stats: Option<TripStats>,
    pub instruction: Option<String>,
    pub step: Option<(usize, usize)>,
    pub route_busy: bool,
}

pub struct LeafletOutput {
    pub map: MapView,
    marker: Marker,
    path: Polyline,
    route_line: Polyline,
    speaker: Speaker,
    pub panel: PanelState,
}

impl LeafletOutput {
    pub fn new() -> Self {
        let map = MapView::new();
        let marker = location_marker(map.map());

        let path_opts = PolylineOptions::new();
        path_opts.set_color("#4A90E2".into());
        path_opts.set_weight(5.);
        let path = Polyline::new_with_options(&Array::new(), &path_opts);
        path.add_to(map.map());

        let route_opts = PolylineOptions::new();
        route_opts.set_color("#E35050".into());
        route_opts.set_weight(6.);
        route_opts.set_dash_array("5, 10".into());
        let route_line = Polyline::new_with_options(&Array::new(), &route_opts);
        route_line.add_to(map.map());

        Self {
            map,
            marker,
            path,
            route_line,
            speaker: Speaker::new(),
            panel: PanelState::default(),
        }
    }
}

impl Default for LeafletOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl NavigationOutput for LeafletOutput {
    fn show_position(&mut self, position: &Position, first_fix: bool) {
        let lat_lng = to_lat_lng(position.lat_lon());

        self.marker.set_lat_lng(&lat_lng);
        if first_fix {
            self.map.set_view(position.lat_lon(), FIX_ZOOM);
            self.marker.open_popup();
        }

        self.path.add_lat_lng(&lat_lng);
    }

    fn show_stats(&mut self, stats: &TripStats) {
        self.panel.stats = Some(*stats);
    }

    fn show_route(&mut self, geometry: &RouteGeometry) {
        let points = geometry.coordinates.iter().map(|point| to_lat_lng(*point));
        self.route_line.set_lat_lngs(&Array::from_iter(points));

        if !geometry.coordinates.is_empty() {
            let bounds = self.route_line.get_bounds().pad(ROUTE_BOUNDS_PADDING);
            self.map.map().fit_bounds(&bounds);
        }
    }

    fn show_instruction(&mut self, step: &RouteStep, index: usize, total: usize) {
        self.panel.instruction = Some(step.instruction.clone());
        self.panel.step = Some((index, total));
    }

    fn speak(&mut self, text: &str) {
        self.speaker.speak(text);
    }

    fn center_on(&mut self, location: LatLon) {
        self.map.pan_to(location);
    }

    fn notify(&mut self, notice: &str) {
        util::alert(notice);
    }

    fn set_route_control(&mut self, state: ControlState) {
        self.panel.route_busy = state == ControlState::Busy;
    }
}
