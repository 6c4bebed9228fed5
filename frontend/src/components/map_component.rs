use gloo_console::info;
use gloo_utils::document;
use leaflet::{
    LatLng, Map, MapOptions, Marker, MouseEvent, Popup, PopupOptions, TileLayer, TileLayerOptions,
};
use wasm_bindgen::{JsCast, JsValue, UnwrapThrowExt, prelude::Closure};
use web_sys::{
    HtmlElement, Node,
    js_sys::{Object, Reflect},
};
use workout_lib::{Coordinates, MapClickHandler, MapSurface, MarkerPopup, PanOptions};
use yew::Html;

/// Leaflet map living in a container element that yew mounts by reference.
pub struct LeafletMap {
    container: HtmlElement,
    map: Option<Map>,
    markers: Vec<Marker>,
    on_click: Option<Closure<dyn Fn(MouseEvent)>>,
}

impl LeafletMap {
    pub fn new() -> Self {
        let container: HtmlElement = document()
            .create_element("div")
            .unwrap_throw()
            .dyn_into()
            .unwrap_throw();
        container.set_class_name("map");

        Self {
            container,
            map: None,
            markers: Vec::new(),
            on_click: None,
        }
    }

    pub fn render(&self) -> Html {
        let node: &Node = &self.container.clone().into();
        Html::VRef(node.clone())
    }
}

impl Default for LeafletMap {
    fn default() -> Self {
        Self::new()
    }
}

fn lat_lng(coords: Coordinates) -> LatLng {
    LatLng::new(coords.lat, coords.lng)
}

impl MapSurface for LeafletMap {
    fn create_map(&mut self, container_id: &str, center: Coordinates, zoom: f64) {
        self.container.set_id(container_id);
        let map = Map::new_with_element(&self.container, &MapOptions::default());
        map.set_view(&lat_lng(center), zoom);
        self.map = Some(map);
    }

    fn add_tile_layer(&mut self, url_template: &str, attribution: &str) {
        let Some(map) = &self.map else {
            return;
        };
        let opts = TileLayerOptions::new();
        opts.set_attribution(attribution.to_string());
        opts.set_update_when_idle(true);
        TileLayer::new_options(url_template, &opts).add_to(map);
    }

    fn on_click(&mut self, handler: MapClickHandler) {
        let Some(map) = &self.map else {
            return;
        };
        let closure = Closure::<dyn Fn(MouseEvent)>::new(move |event: MouseEvent| {
            let at = event.lat_lng();
            handler(Coordinates::new(at.lat(), at.lng()));
        });
        map.on("click", closure.as_ref());
        self.on_click = Some(closure);
    }

    fn add_marker(&mut self, at: Coordinates, popup: &MarkerPopup) {
        let Some(map) = &self.map else {
            return;
        };

        let popup_opts = PopupOptions::default();
        popup_opts.set_max_width(popup.max_width);
        popup_opts.set_min_width(popup.min_width);
        popup_opts.set_auto_close(popup.auto_close);
        popup_opts.set_close_on_click(popup.close_on_click);
        popup_opts.set_class_name(popup.class_name.clone());
        let content = Popup::new(&popup_opts, None);
        content.set_content(&popup.content.clone().into());

        let marker = Marker::new(&lat_lng(at));
        marker.add_to(map);
        marker.bind_popup(&content);
        marker.open_popup();
        self.markers.push(marker);
    }

    fn clear_markers(&mut self) {
        info!(format!("Removing {} markers", self.markers.len()));
        for marker in self.markers.drain(..) {
            marker.remove();
        }
    }

    fn set_view(&mut self, center: Coordinates, zoom: f64, pan: PanOptions) {
        let Some(map) = &self.map else {
            return;
        };
        // setView hands a top-level `duration` on to its pan options.
        let opts = Object::new();
        Reflect::set(&opts, &"animate".into(), &JsValue::from_bool(pan.animate)).unwrap_throw();
        Reflect::set(&opts, &"duration".into(), &JsValue::from_f64(pan.duration_secs)).unwrap_throw();
        map.set_view_with_options(&lat_lng(center), zoom, &opts.into());
    }
}
