use crate::{coords::Coordinates, render::MarkerPopup};

pub type MapClickHandler = Box<dyn Fn(Coordinates)>;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PanOptions {
    pub animate: bool,
    pub duration_secs: f64,
}

/// The slice of an interactive map widget the session drives.
pub trait MapSurface {
    fn create_map(&mut self, container_id: &str, center: Coordinates, zoom: f64);
    fn add_tile_layer(&mut self, url_template: &str, attribution: &str);
    fn on_click(&mut self, handler: MapClickHandler);
    fn add_marker(&mut self, at: Coordinates, popup: &MarkerPopup);
    fn clear_markers(&mut self);
    fn set_view(&mut self, center: Coordinates, zoom: f64, pan: PanOptions);
}
