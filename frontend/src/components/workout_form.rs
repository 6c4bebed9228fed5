use web_sys::{HtmlInputElement, HtmlSelectElement};
use workout_lib::{FormField, WorkoutForm, WorkoutKind};
use yew::prelude::*;

#[derive(PartialEq, Properties, Clone)]
pub struct WorkoutFormProps {
    pub form: WorkoutForm,
    pub open: bool,
    pub on_input: Callback<(FormField, String)>,
    pub on_kind: Callback<WorkoutKind>,
    pub on_submit: Callback<()>,
}

#[function_component]
pub fn WorkoutFormView(props: &WorkoutFormProps) -> Html {
    let input = |field: FormField| {
        let on_input = props.on_input.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            on_input.emit((field, input.value()));
        })
    };

    let on_change_kind = {
        let on_kind = props.on_kind.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            if let Ok(kind) = select.value().parse() {
                on_kind.emit(kind);
            }
        })
    };

    let on_submit = {
        let on_submit = props.on_submit.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            on_submit.emit(());
        })
    };

    let form = &props.form;
    let row_class = |field: FormField| {
        let hidden = matches!(field, FormField::Cadence | FormField::Elevation)
            && form.visible_field() != field;
        classes!("form__row", hidden.then_some("form__row--hidden"))
    };

    html! {
        <form class={classes!("form", (!props.open).then_some("hidden"))} onsubmit={on_submit}>
            <div class="form__row">
                <label class="form__label">{"Type"}</label>
                <select class="form__input form__input--type" onchange={on_change_kind}>
                    <option value="running" selected={form.kind == WorkoutKind::Running}>{"Running"}</option>
                    <option value="cycling" selected={form.kind == WorkoutKind::Cycling}>{"Cycling"}</option>
                </select>
            </div>
            <div class="form__row">
                <label class="form__label">{"Distance"}</label>
                <input type="number" step="any" class="form__input form__input--distance" placeholder="km"
                    value={form.distance.clone()} oninput={input(FormField::Distance)} />
            </div>
            <div class="form__row">
                <label class="form__label">{"Duration"}</label>
                <input type="number" step="any" class="form__input form__input--duration" placeholder="min"
                    value={form.duration.clone()} oninput={input(FormField::Duration)} />
            </div>
            <div class={row_class(FormField::Cadence)}>
                <label class="form__label">{"Cadence"}</label>
                <input type="number" step="any" class="form__input form__input--cadence" placeholder="step/min"
                    value={form.cadence.clone()} oninput={input(FormField::Cadence)} />
            </div>
            <div class={row_class(FormField::Elevation)}>
                <label class="form__label">{"Elev Gain"}</label>
                <input type="number" step="any" class="form__input form__input--elevation" placeholder="meters"
                    value={form.elevation.clone()} oninput={input(FormField::Elevation)} />
            </div>
            <button class="form__btn">{"OK"}</button>
        </form>
    }
}
