use dioxus::prelude::*;

use crate::{
    app::Services,
    domain::{
        submit, FieldPath, FormHandle, FormStore, LocationField, ShipmentType, SubmitError,
    },
    infra::{
        cache::{CacheStatus, QueryState},
        reference_data::{ReferenceDataLoader, ReferenceQuery},
    },
    ui::components::{
        price_summary::PriceSummary,
        toast::{push_toast, ToastKind, ToastMessage},
    },
};

impl FormHandle for Signal<FormStore> {
    fn update<R>(&mut self, f: impl FnOnce(&mut FormStore) -> R) -> R {
        self.with_mut(f)
    }
}

#[component]
pub fn PriceCalculatorPage(services: Services) -> Element {
    let form = use_context::<Signal<FormStore>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();

    let mut shipment_types = use_resource({
        let loader = services.reference.clone();
        move || load_options(loader.clone(), ReferenceQuery::ShipmentTypes, toasts)
    });
    let mut container_sizes = use_resource({
        let loader = services.reference.clone();
        move || load_options(loader.clone(), ReferenceQuery::ContainerSizes, toasts)
    });

    let types_state = shipment_types
        .read()
        .as_ref()
        .cloned()
        .unwrap_or(QueryState::Loading);
    let sizes_state = container_sizes
        .read()
        .as_ref()
        .cloned()
        .unwrap_or(QueryState::Loading);

    let (selected_type, selected_size, submittable, pending, price) = form.with(|store| {
        (
            ShipmentType::from_label(&store.request().shipment_type),
            store.request().size.clone(),
            store.is_submittable(),
            store.is_pending(),
            store.price().cloned(),
        )
    });

    let type_tabs = if let Some(options) = types_state.data() {
        rsx! {
            div { class: "flex", role: "tablist",
                for kind in ShipmentType::ALL {
                    ShipmentTypeTab {
                        kind,
                        active: selected_type == Some(kind),
                        options: options.clone(),
                    }
                }
            }
        }
    } else if let Some(message) = types_state.error() {
        rsx! {
            p { class: "text-rose-400", "Could not load shipment types: {message}" }
            button {
                r#type: "button",
                class: "text-xs underline",
                onclick: move |_| shipment_types.restart(),
                "Retry"
            }
        }
    } else {
        rsx! { div { "Loading..." } }
    };

    let size_options = if let Some(sizes) = sizes_state.data() {
        let choices: Vec<(String, bool)> = sizes
            .iter()
            .map(|size| (size.clone(), *size == selected_size))
            .collect();
        rsx! {
            div { class: "grid grid-cols-2 gap-4",
                for (size, selected) in choices {
                    SizeOption { size, selected }
                }
            }
        }
    } else if let Some(message) = sizes_state.error() {
        rsx! {
            p { class: "text-rose-400", "Could not load container sizes: {message}" }
            button {
                r#type: "button",
                class: "text-xs underline",
                onclick: move |_| container_sizes.restart(),
                "Retry"
            }
        }
    } else {
        rsx! { div { "Loading..." } }
    };

    let on_submit = {
        let client = services.client.clone();
        move |evt: FormEvent| {
            evt.prevent_default();
            let client = client.clone();
            let mut form = form;
            spawn(async move {
                match submit(&mut form, &client).await {
                    Ok(_) => push_toast(toasts, ToastKind::Success, "Price received."),
                    Err(SubmitError::Request(error)) => {
                        tracing::warn!(status = ?error.status(), "price request rejected");
                        push_toast(
                            toasts,
                            ToastKind::Error,
                            format!("Error fetching price: {error}"),
                        );
                    }
                    Err(blocked) => {
                        tracing::debug!(%blocked, "submit ignored");
                        return;
                    }
                }
                // Revisit the option lists; the cache decides whether this
                // reaches the network.
                shipment_types.restart();
                container_sizes.restart();
            });
        }
    };

    rsx! {
        div { class: "price-calculator",
            h3 { class: "mb-5", "Price Calculator" }
            p { class: "mb-5",
                "Market price insight with the price calculator. Provide your shipment details and get objective data-based insights in price."
            }

            form { onsubmit: on_submit,
                div { class: "flex flex-wrap gap-6 mb-6",
                    div { class: "flex-1",
                        h5 { class: "mb-4", "Type of transport" }
                        {type_tabs}

                        fieldset { class: "mt-4",
                            legend { class: "mb-5", "Container size" }
                            {size_options}
                        }
                    }

                    div { class: "flex-1",
                        h5 { class: "mb-4", "Trip" }
                        LocationInput { field: LocationField::Start, label: "Start location".to_string() }
                        LocationInput { field: LocationField::Delivery, label: "Delivery location".to_string() }
                        LocationInput { field: LocationField::End, label: "End location".to_string() }
                    }
                }

                div { class: "text-right",
                    button {
                        r#type: "submit",
                        disabled: !submittable || pending,
                        if pending {
                            span { class: "spinner" }
                        }
                        "Request price"
                    }
                }
            }

            if let Some(price) = price {
                PriceSummary { price }
            }
        }
    }
}

#[component]
fn ShipmentTypeTab(kind: ShipmentType, active: bool, options: Vec<String>) -> Element {
    let mut form = use_context::<Signal<FormStore>>();
    let class = if active { "tab tab-active" } else { "tab" };
    let label = kind.resolve(&options).unwrap_or(kind.label()).to_string();

    rsx! {
        button {
            r#type: "button",
            role: "tab",
            class: class,
            aria_selected: active,
            onclick: move |_| form.with_mut(|store| store.select_shipment_type(kind, &options)),
            "{label}"
        }
    }
}

#[component]
fn SizeOption(size: String, selected: bool) -> Element {
    let mut form = use_context::<Signal<FormStore>>();
    // Short codes like "40ft" are upper-cased; longer names are capitalized.
    let caption = if size.chars().count() > 4 {
        capitalize(&size)
    } else {
        size.to_uppercase()
    };

    let choice = size.clone();

    rsx! {
        label { class: "flex items-center gap-2",
            input {
                r#type: "radio",
                name: "size",
                value: "{size}",
                checked: selected,
                onchange: move |_| form.with_mut(|store| store.set(FieldPath::Size, choice.clone())),
            }
            span { "{caption}" }
        }
    }
}

#[component]
fn LocationInput(field: LocationField, label: String) -> Element {
    let mut form = use_context::<Signal<FormStore>>();
    let path = FieldPath::Location(field).as_str();
    let value = form.with(|store| store.request().locations.field(field).to_string());

    rsx! {
        div { class: "mb-4",
            label { class: "block text-sm", "{label}" }
            input {
                name: path,
                value: "{value}",
                oninput: move |evt: FormEvent| {
                    if let Err(error) = form.with_mut(|store| store.set_field(path, evt.value())) {
                        tracing::error!(%error, "ignored input for unknown field");
                    }
                },
            }
        }
    }
}

/// Loads one option list through the cache and reports what the cache now
/// holds for it.
async fn load_options(
    loader: ReferenceDataLoader,
    query: ReferenceQuery,
    toasts: Signal<Vec<ToastMessage>>,
) -> QueryState<Vec<String>> {
    let result = match query {
        ReferenceQuery::ContainerSizes => loader.load_container_sizes().await,
        ReferenceQuery::ShipmentTypes => loader.load_shipment_types().await,
    };
    match result {
        Ok(payload) if payload.status == CacheStatus::Stale => push_toast(
            toasts,
            ToastKind::Warning,
            "Showing previously loaded options; they might be out of date.",
        ),
        Ok(_) => {}
        Err(error) => tracing::warn!(?query, %error, "option list unavailable"),
    }

    let state = loader.state(query).await;
    if state.is_loading() {
        tracing::debug!(?query, "option list still loading elsewhere");
    }
    state
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
