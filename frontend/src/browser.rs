use gloo_console::{error, info};
use gloo_utils::window;
use wasm_bindgen::{JsCast, JsValue, prelude::Closure};
use web_sys::{
    GeolocationPosition, GeolocationPositionError, PositionOptions, Storage, js_sys::Function,
};
use workout_lib::{
    Coordinates, Geolocator, KeyValueStorage, LocateCallback, LocateOptions, LocationError,
    Notifier, StorageError,
};

fn js_error(value: JsValue) -> StorageError {
    StorageError(value.as_string().unwrap_or_else(|| format!("{value:?}")))
}

/// `window.localStorage`, when the browser grants it.
pub struct BrowserStorage {
    storage: Option<Storage>,
}

impl BrowserStorage {
    pub fn local() -> Self {
        let storage = window().local_storage().ok().flatten();
        if storage.is_none() {
            error!("localStorage unavailable, workouts will not be saved");
        }
        Self { storage }
    }

    fn storage(&self) -> Result<&Storage, StorageError> {
        self.storage
            .as_ref()
            .ok_or_else(|| StorageError("localStorage unavailable".to_string()))
    }
}

impl KeyValueStorage for BrowserStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        match &self.storage {
            Some(storage) => storage.get_item(key).map_err(js_error),
            None => Ok(None),
        }
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage()?.set_item(key, value).map_err(js_error)
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        self.storage()?.remove_item(key).map_err(js_error)
    }
}

pub struct BrowserGeolocator;

impl Geolocator for BrowserGeolocator {
    fn locate(&self, options: &LocateOptions, done: LocateCallback) {
        let geolocation = match window().navigator().geolocation() {
            Ok(geolocation) => geolocation,
            Err(_) => {
                done(Err(LocationError::Unsupported));
                return;
            }
        };

        // The browser calls exactly one of the two callbacks; the other one
        // stays allocated for the page's lifetime, which is one request.
        let done = std::rc::Rc::new(std::cell::RefCell::new(Some(done)));
        let on_success = {
            let done = done.clone();
            Closure::once_into_js(move |position: GeolocationPosition| {
                let coords = position.coords();
                info!(format!("Located at {}, {}", coords.latitude(), coords.longitude()));
                if let Some(done) = done.borrow_mut().take() {
                    done(Ok(Coordinates::new(coords.latitude(), coords.longitude())));
                }
            })
        };
        let on_error = {
            let done = done.clone();
            Closure::once_into_js(move |err: GeolocationPositionError| {
                let reason = match err.code() {
                    GeolocationPositionError::PERMISSION_DENIED => LocationError::PermissionDenied,
                    GeolocationPositionError::TIMEOUT => LocationError::Timeout,
                    _ => LocationError::PositionUnavailable,
                };
                error!(format!("Geolocation failed: {}", err.message()));
                if let Some(done) = done.borrow_mut().take() {
                    done(Err(reason));
                }
            })
        };

        let position_options = PositionOptions::new();
        position_options.set_enable_high_accuracy(options.high_accuracy);
        position_options.set_timeout(options.timeout_ms);

        let requested = geolocation.get_current_position_with_error_callback_and_options(
            on_success.unchecked_ref::<Function>(),
            Some(on_error.unchecked_ref::<Function>()),
            &position_options,
        );
        if requested.is_err() {
            if let Some(done) = done.borrow_mut().take() {
                done(Err(LocationError::Unsupported));
            }
        }
    }
}

/// `window.alert`.
pub struct AlertNotifier;

impl Notifier for AlertNotifier {
    fn notify(&mut self, message: &str) {
        if window().alert_with_message(message).is_err() {
            error!(format!("Could not show alert: {}", message));
        }
    }
}
