pub mod clock;
pub mod config;
pub mod coords;
pub mod error;
pub mod form;
pub mod geolocation;
pub mod map;
pub mod mock;
pub mod notify;
pub mod render;
pub mod session;
pub mod storage;
pub mod store;
pub mod workout;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::SessionConfig;
pub use coords::Coordinates;
pub use error::{ConfigError, LocationError, StorageError, WorkoutError};
pub use form::{FormField, WorkoutForm};
pub use geolocation::{Geolocator, LocateCallback, LocateOptions};
pub use map::{MapClickHandler, MapSurface, PanOptions};
pub use notify::Notifier;
pub use render::{Detail, ListEntry, MarkerPopup};
pub use session::{Collaborators, Dispatch, SessionController, SessionEvent, SessionState};
pub use storage::KeyValueStorage;
pub use store::{WorkoutStore, DEFAULT_STORAGE_KEY};
pub use workout::{DerivedMetric, Metric, Workout, WorkoutDetails, WorkoutId, WorkoutInput, WorkoutKind};
