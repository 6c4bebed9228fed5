use std::rc::Rc;

use tracing::{debug, info, warn};

use crate::{
    clock::Clock,
    config::SessionConfig,
    coords::Coordinates,
    error::{LocationError, WorkoutError},
    form::WorkoutForm,
    geolocation::Geolocator,
    map::{MapSurface, PanOptions},
    notify::Notifier,
    render::{ListEntry, MarkerPopup},
    storage::KeyValueStorage,
    store::WorkoutStore,
    workout::{Workout, WorkoutId, WorkoutKind},
};

/// Results from the asynchronous collaborators, fed back through [`SessionController::handle`].
#[derive(Clone, Debug, PartialEq)]
pub enum SessionEvent {
    Located(Result<Coordinates, LocationError>),
    MapClicked(Coordinates),
}

/// Hands an event back to whoever owns the controller (a yew callback, a test queue).
pub type Dispatch = Rc<dyn Fn(SessionEvent)>;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SessionState {
    AwaitingLocation,
    LocationUnavailable,
    MapReady,
    FormOpen { at: Coordinates },
}

impl SessionState {
    pub fn has_map(&self) -> bool {
        matches!(self, SessionState::MapReady | SessionState::FormOpen { .. })
    }
}

pub struct Collaborators<M, S, G, N, C> {
    pub map: M,
    pub storage: S,
    pub geolocator: G,
    pub notifier: N,
    pub clock: C,
}

pub struct SessionController<M, S, G, N, C> {
    config: SessionConfig,
    map: M,
    storage: S,
    geolocator: G,
    notifier: N,
    clock: C,
    dispatch: Dispatch,
    store: WorkoutStore,
    state: SessionState,
    form: WorkoutForm,
    location_requested: bool,
}

impl<M, S, G, N, C> SessionController<M, S, G, N, C>
where
    M: MapSurface,
    S: KeyValueStorage,
    G: Geolocator,
    N: Notifier,
    C: Clock,
{
    pub fn new(config: SessionConfig, collaborators: Collaborators<M, S, G, N, C>, dispatch: Dispatch) -> Self {
        let Collaborators {
            map,
            storage,
            geolocator,
            notifier,
            clock,
        } = collaborators;

        Self {
            store: WorkoutStore::new(config.storage_key.clone()),
            config,
            map,
            storage,
            geolocator,
            notifier,
            clock,
            dispatch,
            state: SessionState::AwaitingLocation,
            form: WorkoutForm::default(),
            location_requested: false,
        }
    }

    /// Restores saved workouts and asks for the current position. Markers for
    /// the restored workouts are placed once the map exists.
    pub fn start(&mut self) {
        if self.location_requested {
            return;
        }

        if let Err(err) = self.store.load_from(&self.storage) {
            self.report(err);
        }

        self.location_requested = true;
        let dispatch = self.dispatch.clone();
        self.geolocator.locate(
            &self.config.locate,
            Box::new(move |result| dispatch(SessionEvent::Located(result))),
        );
    }

    pub fn handle(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::Located(Ok(coords)) => self.location_acquired(coords),
            SessionEvent::Located(Err(err)) => self.location_failed(err),
            SessionEvent::MapClicked(coords) => self.map_clicked(coords),
        }
    }

    fn location_acquired(&mut self, coords: Coordinates) {
        if self.state != SessionState::AwaitingLocation {
            debug!(state = ?self.state, "ignoring late location");
            return;
        }
        info!(%coords, "location acquired");

        self.map.create_map(&self.config.map_container_id, coords, self.config.map_zoom);
        self.map.add_tile_layer(&self.config.tile_url, &self.config.tile_attribution);
        let dispatch = self.dispatch.clone();
        self.map.on_click(Box::new(move |at| dispatch(SessionEvent::MapClicked(at))));

        for workout in self.store.all() {
            self.map.add_marker(workout.coords(), &MarkerPopup::for_workout(workout));
        }

        self.state = SessionState::MapReady;
    }

    fn location_failed(&mut self, err: LocationError) {
        if self.state != SessionState::AwaitingLocation {
            return;
        }
        self.state = SessionState::LocationUnavailable;
        self.report(WorkoutError::LocationUnavailable(err));
    }

    fn map_clicked(&mut self, at: Coordinates) {
        if !self.state.has_map() {
            debug!(state = ?self.state, "map click without a map");
            return;
        }
        debug!(%at, "opening form");
        self.state = SessionState::FormOpen { at };
    }

    pub fn select_kind(&mut self, kind: WorkoutKind) {
        self.form.kind = kind;
    }

    /// Creates a workout at the clicked position from the current form.
    /// Invalid input keeps the form open; a failed save is reported but the
    /// workout is kept.
    pub fn submit(&mut self) -> Result<WorkoutId, WorkoutError> {
        let SessionState::FormOpen { at } = self.state else {
            return Err(WorkoutError::NoPendingLocation);
        };

        let workout = match self.build_workout(at) {
            Ok(workout) => workout,
            Err(err) => {
                self.report(err.clone());
                return Err(err);
            }
        };
        let id = workout.id().clone();
        info!(%id, kind = %workout.kind(), "workout created");

        self.map.add_marker(at, &MarkerPopup::for_workout(&workout));
        self.store.add(workout);

        if let Err(err) = self.store.save_to(&mut self.storage) {
            self.report(err);
        }

        self.form.clear();
        self.state = SessionState::MapReady;
        Ok(id)
    }

    fn build_workout(&self, at: Coordinates) -> Result<Workout, WorkoutError> {
        let input = self.form.parse()?;
        let now = self.clock.now();
        Workout::new(self.store.next_id(&now), now, at, input)
    }

    /// Pans to the workout behind a clicked list entry. Returns whether the map moved.
    pub fn list_entry_clicked(&mut self, id: Option<&str>) -> bool {
        let Some(id) = id else {
            return false;
        };
        if !self.state.has_map() {
            return false;
        }
        let Some(workout) = self.store.find_by_id(id) else {
            debug!(id, "no workout for list entry");
            return false;
        };

        let pan = PanOptions {
            animate: true,
            duration_secs: self.config.pan_duration_secs,
        };
        self.map.set_view(workout.coords(), self.config.map_zoom, pan);
        true
    }

    /// Forgets every workout, in memory and in storage.
    pub fn reset(&mut self) {
        info!(count = self.store.len(), "resetting workouts");
        self.store.clear();
        self.map.clear_markers();
        self.form.clear();
        if let SessionState::FormOpen { .. } = self.state {
            self.state = SessionState::MapReady;
        }
        if let Err(err) = self.storage.remove_item(self.store.key()) {
            self.report(WorkoutError::Persistence(err));
        }
    }

    fn report(&mut self, err: WorkoutError) {
        warn!(%err, "reporting error");
        self.notifier.notify(&err.user_message());
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn workouts(&self) -> &[Workout] {
        self.store.all()
    }

    pub fn list_entries(&self) -> Vec<ListEntry> {
        self.store.all().iter().map(ListEntry::for_workout).collect()
    }

    pub fn form(&self) -> &WorkoutForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut WorkoutForm {
        &mut self.form
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn map(&self) -> &M {
        &self.map
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }
}
