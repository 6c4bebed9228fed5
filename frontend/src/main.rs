use std::rc::Rc;

use browser::{AlertNotifier, BrowserGeolocator, BrowserStorage};
use components::{
    map_component::LeafletMap, workout_form::WorkoutFormView, workout_list::WorkoutList,
};
use gloo_console::{error, info};
use workout_lib::{
    Collaborators, Dispatch, FormField, SessionConfig, SessionController, SessionEvent,
    SessionState, SystemClock, WorkoutKind,
};
use yew::prelude::*;

mod browser;
mod components;

type Session =
    SessionController<LeafletMap, BrowserStorage, BrowserGeolocator, AlertNotifier, SystemClock>;

fn load_config() -> SessionConfig {
    match SessionConfig::from_json(include_str!("../config.json")) {
        Ok(config) => config,
        Err(err) => {
            error!(format!("{}, using defaults", err));
            SessionConfig::default()
        }
    }
}

enum MainMsg {
    Session(SessionEvent),
    SelectKind(WorkoutKind),
    Input(FormField, String),
    Submit,
    SelectEntry(Option<String>),
}

struct Model {
    session: Session,
}

impl Component for Model {
    type Message = MainMsg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        let callback = ctx.link().callback(MainMsg::Session);
        let dispatch: Dispatch = Rc::new(move |event| callback.emit(event));

        let session = SessionController::new(
            load_config(),
            Collaborators {
                map: LeafletMap::new(),
                storage: BrowserStorage::local(),
                geolocator: BrowserGeolocator,
                notifier: AlertNotifier,
                clock: SystemClock,
            },
            dispatch,
        );

        Self { session }
    }

    fn rendered(&mut self, _ctx: &Context<Self>, first_render: bool) {
        // The map container has to be in the document before leaflet gets it.
        if first_render {
            self.session.start();
        }
    }

    fn update(&mut self, _ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            MainMsg::Session(event) => {
                info!(format!("Session event: {:?}", event));
                self.session.handle(event);
            }
            MainMsg::SelectKind(kind) => self.session.select_kind(kind),
            MainMsg::Input(field, value) => self.session.form_mut().set(field, value),
            MainMsg::Submit => {
                if let Ok(id) = self.session.submit() {
                    info!(format!("Added workout {}", id));
                }
            }
            MainMsg::SelectEntry(id) => {
                // Panning happens inside leaflet, nothing to re-render.
                self.session.list_entry_clicked(id.as_deref());
                return false;
            }
        }
        true
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        let open = matches!(self.session.state(), SessionState::FormOpen { .. });

        html! { <>
            <div class="sidebar">
                <WorkoutFormView
                    form={self.session.form().clone()}
                    {open}
                    on_input={link.callback(|(field, value): (FormField, String)| MainMsg::Input(field, value))}
                    on_kind={link.callback(MainMsg::SelectKind)}
                    on_submit={link.callback(|()| MainMsg::Submit)}
                />
                <WorkoutList
                    entries={self.session.list_entries()}
                    on_select={link.callback(MainMsg::SelectEntry)}
                />
            </div>
            { self.session.map().render() }
        </> }
    }
}

fn main() {
    yew::Renderer::<Model>::new().render();
}
