use dioxus::prelude::*;

use crate::{
    domain::FormStore,
    infra::{
        api_client::{ApiClient, RequestError},
        reference_data::ReferenceDataLoader,
    },
    ui::{
        components::toast::{Toast, ToastMessage},
        pages::PriceCalculatorPage,
    },
    util::config::ApiConfig,
};

/// Network-facing handles shared by the calculator.
#[derive(Clone)]
pub struct Services {
    pub client: ApiClient,
    pub reference: ReferenceDataLoader,
}

impl Services {
    pub fn new(config: &ApiConfig) -> Result<Self, RequestError> {
        let client = ApiClient::new(config)?;
        Ok(Self {
            reference: ReferenceDataLoader::new(client.clone()),
            client,
        })
    }
}

impl PartialEq for Services {
    fn eq(&self, other: &Self) -> bool {
        self.client.base_url() == other.client.base_url()
    }
}

fn init_services() -> Result<Services, String> {
    let config = ApiConfig::from_env().map_err(|err| err.to_string())?;
    tracing::info!(base_url = %config.base_url, "using pricing API");
    Services::new(&config).map_err(|err| err.to_string())
}

#[component]
pub fn App() -> Element {
    let services = use_hook(|| {
        init_services().inspect_err(|message| {
            tracing::error!(%message, "price calculator is not configured");
        })
    });

    let form = use_signal(FormStore::default);
    use_context_provider(|| form);

    let toasts = use_signal(Vec::<ToastMessage>::new);
    use_context_provider(|| toasts);

    let body = match services {
        Ok(services) => rsx! { PriceCalculatorPage { services } },
        Err(message) => rsx! { ConfigNotice { message } },
    };

    rsx! {
        main { class: "mx-auto max-w-3xl p-6",
            {body}
        }
        Toast {}
    }
}

#[component]
fn ConfigNotice(message: String) -> Element {
    rsx! {
        section { class: "rounded-xl border border-amber-500/40 p-6",
            h2 { "Price Calculator unavailable" }
            p { "{message}" }
        }
    }
}
