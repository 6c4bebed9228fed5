use workout_lib::ListEntry;
use yew::prelude::*;

#[derive(PartialEq, Properties, Clone)]
pub struct WorkoutListProps {
    pub entries: Vec<ListEntry>,
    pub on_select: Callback<Option<String>>,
}

#[function_component]
pub fn WorkoutList(props: &WorkoutListProps) -> Html {
    html! {
        <ul class="workouts">
            { for props.entries.iter().map(|entry| {
                let id = entry.id.to_string();
                let on_select = props.on_select.clone();
                let onclick = Callback::from(move |_: MouseEvent| on_select.emit(Some(id.clone())));
                html! {
                    <li key={entry.id.to_string()} class={format!("workout workout--{}", entry.kind)} data-id={entry.id.to_string()} {onclick}>
                        <h2 class="workout__title">{entry.title.clone()}</h2>
                        { for entry.details.iter().map(|detail| html! {
                            <div class="workout__details">
                                <span class="workout__icon">{detail.icon}</span>
                                <span class="workout__value">{detail.value.clone()}</span>
                                <span class="workout__unit">{detail.unit}</span>
                            </div>
                        }) }
                    </li>
                }
            }) }
        </ul>
    }
}
