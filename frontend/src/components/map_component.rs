use gloo_utils::document;
use guardian_lib::{
    config::{DEFAULT_CENTER, DEFAULT_ZOOM, TILE_ATTRIBUTION, TILE_URL},
    position::LatLon,
};
use leaflet::{LatLng, Map, MapOptions, Marker, Popup, PopupOptions, TileLayer, TileLayerOptions};
use wasm_bindgen::JsCast;
use web_sys::{HtmlElement, Node};
use yew::prelude::*;

/// A leaflet map living in its own detached `div`, so yew re-renders never
/// replace the element leaflet draws into.
pub struct MapView {
    map: Map,
    container: HtmlElement,
    initialized: bool,
}

impl MapView {
    pub fn new() -> Self {
        let container: HtmlElement = document()
            .create_element("div")
            .ok()
            .and_then(|element| element.dyn_into().ok())
            .expect("document can create div elements");
        container.set_class_name("map");

        let map = Map::new_with_element(&container, &MapOptions::default());

        Self {
            map,
            container,
            initialized: false,
        }
    }

    pub fn map(&self) -> &Map {
        &self.map
    }

    /// Call from the owning component's `rendered`, once the container is in the page.
    pub fn init(&mut self) {
        if self.initialized {
            self.map.invalidate_size(false);
            return;
        }

        let (lat, lon) = DEFAULT_CENTER;
        self.map.set_view(&LatLng::new(lat, lon), DEFAULT_ZOOM);
        add_tile_layer(&self.map);
        self.initialized = true;
    }

    pub fn set_view(&self, location: LatLon, zoom: f64) {
        self.map.set_view(&to_lat_lng(location), zoom);
    }

    pub fn pan_to(&self, location: LatLon) {
        self.map.pan_to(&to_lat_lng(location));
    }

    pub fn render(&self) -> Html {
        let node: &Node = &self.container.clone().into();
        Html::VRef(node.clone())
    }
}

impl Default for MapView {
    fn default() -> Self {
        Self::new()
    }
}

pub fn to_lat_lng(location: LatLon) -> LatLng {
    LatLng::new(location.lat, location.lon)
}

/// The "Your Location" marker, parked at the default center until the first fix.
pub fn location_marker(map: &Map) -> Marker {
    let (lat, lon) = DEFAULT_CENTER;
    let marker = Marker::new(&LatLng::new(lat, lon));

    let popup = Popup::new(&PopupOptions::default(), None);
    popup.set_content(&"Your Location".into());
    marker.bind_popup(&popup);

    marker.add_to(map);
    marker
}

fn add_tile_layer(map: &Map) {
    let opts = TileLayerOptions::new();
    opts.set_attribution(TILE_ATTRIBUTION.into());
    opts.set_update_when_idle(true);
    TileLayer::new_options(TILE_URL, &opts).add_to(map);
}
