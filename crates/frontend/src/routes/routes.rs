use crate::dashboards::{MatchStatsDashboard, MatchStatsReport};
use leptos::prelude::*;
use leptos_router::components::{Route, Router, Routes};
use leptos_router::path;

#[component]
pub fn AppRoutes() -> impl IntoView {
    view! {
        <Router>
            <Routes fallback=|| view! { <MatchStatsDashboard /> }>
                <Route path=path!("/") view=MatchStatsDashboard />
                <Route path=path!("/report") view=MatchStatsReport />
            </Routes>
        </Router>
    }
}
