use crate::dashboards::d400_match_stats::api::HttpMatchStatsApi;
use crate::dashboards::d400_match_stats::chart::ChartSlot;
use crate::dashboards::d400_match_stats::chart_canvas::CanvasChartBackend;
use crate::dashboards::d400_match_stats::controller::{
    BackendStatus, DashboardController, DashboardView, SummaryPanel,
};
use crate::dashboards::d400_match_stats::filters::{FilterController, FilterForm, WindowNavigator};
use crate::dashboards::d400_match_stats::upload::UploadView;
use crate::shared::config::DashboardConfig;
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::rc::Rc;
use thaw::*;

/// `DashboardView` backed by Leptos signals
#[derive(Clone, Copy)]
pub struct SignalDashboardView {
    summary: RwSignal<SummaryPanel>,
    backend_status: RwSignal<BackendStatus>,
    upload: RwSignal<UploadView>,
}

impl DashboardView for SignalDashboardView {
    fn show_summary(&self, panel: SummaryPanel) {
        self.summary.set(panel);
    }

    fn show_backend_status(&self, status: BackendStatus) {
        self.backend_status.set(status);
    }

    fn show_upload(&self, upload: UploadView) {
        self.upload.set(upload);
    }
}

type WebDashboard = DashboardController<HttpMatchStatsApi, CanvasChartBackend, SignalDashboardView>;

/// Match statistics dashboard: filters, summary, charts and CSV upload
#[component]
pub fn MatchStatsDashboard() -> impl IntoView {
    let config = use_context::<DashboardConfig>().unwrap_or_default();

    let summary = RwSignal::new(SummaryPanel::Loading);
    let backend_status = RwSignal::new(BackendStatus::Checking);
    let upload = RwSignal::new(UploadView::default());
    let sink = SignalDashboardView {
        summary,
        backend_status,
        upload,
    };

    // Controller holds JS handles (charts, files), store locally
    let controller: WebDashboard = DashboardController::new(
        HttpMatchStatsApi::new(&config),
        CanvasChartBackend::new(),
        sink,
        &config,
    );
    let dashboard = StoredValue::new_local(Rc::new(controller));
    let filter_controller =
        StoredValue::new_local(FilterController::new(WindowNavigator::new(&config), config));

    let team = RwSignal::new(String::new());
    let start = RwSignal::new(String::new());
    let end = RwSignal::new(String::new());
    let file_input = NodeRef::<leptos::html::Input>::new();

    // Initial load, after the canvases are mounted
    Effect::new(move |_| {
        let dashboard = dashboard.get_value();
        spawn_local(async move { dashboard.init().await });
    });

    let on_apply = move |_| {
        let form = FilterForm {
            team: team.get_untracked(),
            start: start.get_untracked(),
            end: end.get_untracked(),
        };
        let refresh = filter_controller.with_value(|controller| {
            let filters = controller.read_filters(&form);
            controller.apply(dashboard.get_value(), filters)
        });
        spawn_local(refresh);
    };

    let on_preview = move |_| {
        let file = file_input
            .get_untracked()
            .and_then(|input| input.files())
            .and_then(|files| files.get(0));
        let dashboard = dashboard.get_value();
        spawn_local(async move { dashboard.submit_preview(file).await });
    };

    let on_confirm = move |_| {
        let dashboard = dashboard.get_value();
        spawn_local(async move { dashboard.confirm_upload().await });
    };

    view! {
        <div id="d400_match_stats--dashboard" class="d400-dashboard">
            <div class="d400-backend-status">
                <span id="backendStatus" class=move || backend_status.get().css_class()></span>
                <span id="backendMessage">{move || backend_status.get().label()}</span>
            </div>

            <Card>
                <Space>
                    <Input value=team placeholder="Team" />
                    <Input value=start input_type=InputType::Date />
                    <Input value=end input_type=InputType::Date />
                    <Button appearance=ButtonAppearance::Primary on_click=on_apply>
                        "Apply filters"
                    </Button>
                </Space>
            </Card>

            <div id="summary" class="d400-summary">
                {move || match summary.get() {
                    SummaryPanel::Loading => view! {
                        <Space>
                            <Spinner />
                            <span>"Loading..."</span>
                        </Space>
                    }.into_any(),
                    panel => view! { <pre>{panel.text().to_string()}</pre> }.into_any(),
                }}
            </div>

            <div class="d400-charts">
                <canvas id={ChartSlot::Wins.canvas_id()}></canvas>
                <canvas id={ChartSlot::Runs.canvas_id()}></canvas>
            </div>

            <Card>
                <Space>
                    <input
                        type="file"
                        accept=".csv,text/csv"
                        node_ref=file_input
                        on:change=move |_| dashboard.get_value().discard_upload()
                    />
                    <Button
                        on_click=on_preview
                        disabled={Signal::derive(move || upload.get().busy)}
                    >
                        "Upload for preview"
                    </Button>
                </Space>
                <div id="uploadStatus" class="d400-upload-status">
                    <span>{move || upload.get().status}</span>
                    {move || upload.get().details.map(|details| view! { <pre>{details}</pre> })}
                    {move || {
                        upload.get().can_commit.then(|| view! {
                            <Button appearance=ButtonAppearance::Primary on_click=on_confirm>
                                "Confirm Upload"
                            </Button>
                        })
                    }}
                </div>
            </Card>
        </div>
    }
}
