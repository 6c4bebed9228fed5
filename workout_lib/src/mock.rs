use std::{
    cell::RefCell,
    collections::{HashMap, VecDeque},
    rc::Rc,
};

use crate::{
    coords::Coordinates,
    error::{LocationError, StorageError},
    geolocation::{Geolocator, LocateCallback, LocateOptions},
    map::{MapClickHandler, MapSurface, PanOptions},
    notify::Notifier,
    render::MarkerPopup,
    session::{Dispatch, SessionEvent},
    storage::KeyValueStorage,
};

#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    items: HashMap<String, String>,
    reject_writes: bool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_item(key: &str, value: &str) -> Self {
        let mut storage = Self::new();
        storage.items.insert(key.to_string(), value.to_string());
        storage
    }

    /// Makes every following write fail, as a full quota would.
    pub fn reject_writes(&mut self, reject: bool) {
        self.reject_writes = reject;
    }

    pub fn raw(&self, key: &str) -> Option<&str> {
        self.items.get(key).map(String::as_str)
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.reject_writes {
            return Err(StorageError("quota exceeded".to_string()));
        }
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        self.items.remove(key);
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum MapCall {
    CreateMap {
        container_id: String,
        center: Coordinates,
        zoom: f64,
    },
    AddTileLayer {
        url_template: String,
    },
    OnClick,
    AddMarker {
        at: Coordinates,
        popup: MarkerPopup,
    },
    ClearMarkers,
    SetView {
        center: Coordinates,
        zoom: f64,
        pan: PanOptions,
    },
}

/// Records every call; `click` plays the part of the user.
#[derive(Default)]
pub struct RecordingMap {
    pub calls: Vec<MapCall>,
    click_handler: Option<MapClickHandler>,
}

impl RecordingMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn click(&self, at: Coordinates) {
        if let Some(handler) = &self.click_handler {
            handler(at);
        }
    }

    pub fn markers(&self) -> Vec<&MarkerPopup> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                MapCall::AddMarker { popup, .. } => Some(popup),
                _ => None,
            })
            .collect()
    }
}

impl MapSurface for RecordingMap {
    fn create_map(&mut self, container_id: &str, center: Coordinates, zoom: f64) {
        self.calls.push(MapCall::CreateMap {
            container_id: container_id.to_string(),
            center,
            zoom,
        });
    }

    fn add_tile_layer(&mut self, url_template: &str, _attribution: &str) {
        self.calls.push(MapCall::AddTileLayer {
            url_template: url_template.to_string(),
        });
    }

    fn on_click(&mut self, handler: MapClickHandler) {
        self.click_handler = Some(handler);
        self.calls.push(MapCall::OnClick);
    }

    fn add_marker(&mut self, at: Coordinates, popup: &MarkerPopup) {
        self.calls.push(MapCall::AddMarker {
            at,
            popup: popup.clone(),
        });
    }

    fn clear_markers(&mut self) {
        self.calls.push(MapCall::ClearMarkers);
    }

    fn set_view(&mut self, center: Coordinates, zoom: f64, pan: PanOptions) {
        self.calls.push(MapCall::SetView { center, zoom, pan });
    }
}

/// Parks the position request until the test answers it. Clones share the
/// pending request.
#[derive(Clone, Default)]
pub struct ManualGeolocator {
    pending: Rc<RefCell<Option<(LocateOptions, LocateCallback)>>>,
}

impl ManualGeolocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn requested_options(&self) -> Option<LocateOptions> {
        self.pending.borrow().as_ref().map(|(options, _)| *options)
    }

    /// Answers the pending request. Returns false if nothing was waiting.
    pub fn resolve(&self, result: Result<Coordinates, LocationError>) -> bool {
        let pending = self.pending.borrow_mut().take();
        match pending {
            Some((_, done)) => {
                done(result);
                true
            }
            None => false,
        }
    }

    pub fn time_out(&self) -> bool {
        self.resolve(Err(LocationError::Timeout))
    }
}

impl Geolocator for ManualGeolocator {
    fn locate(&self, options: &LocateOptions, done: LocateCallback) {
        *self.pending.borrow_mut() = Some((*options, done));
    }
}

#[derive(Clone, Debug, Default)]
pub struct RecordingNotifier {
    pub messages: Vec<String>,
}

impl Notifier for RecordingNotifier {
    fn notify(&mut self, message: &str) {
        self.messages.push(message.to_string());
    }
}

/// Collects dispatched events for the test to feed back in.
#[derive(Clone, Default)]
pub struct EventQueue {
    events: Rc<RefCell<VecDeque<SessionEvent>>>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dispatch(&self) -> Dispatch {
        let events = self.events.clone();
        Rc::new(move |event| events.borrow_mut().push_back(event))
    }

    pub fn drain(&self) -> Vec<SessionEvent> {
        self.events.borrow_mut().drain(..).collect()
    }
}
