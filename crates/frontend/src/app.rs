use crate::routes::routes::AppRoutes;
use crate::shared::config::DashboardConfig;
use leptos::prelude::*;

#[component]
pub fn App() -> impl IntoView {
    // Settings shared by the dashboard and the report page
    provide_context(DashboardConfig::from_window());

    view! {
        <AppRoutes />
    }
}
