use super::api::{ApiError, MatchStatsApi};
use super::chart::{ChartBackend, ChartError, ChartPresenter, ChartSlot};
use super::upload::{ResponseEffect, UploadSession, UploadView};
use crate::shared::config::DashboardConfig;
use contracts::dashboards::d400_match_stats::{FilterSet, SummaryAggregate};
use std::cell::{Cell, Ref, RefCell};

pub const SUMMARY_FAILED_MESSAGE: &str = "Failed to load summary";

/// Содержимое панели сводки
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SummaryPanel {
    #[default]
    Loading,
    /// Отформатированный JSON сводки
    Loaded(String),
    Failed,
}

impl SummaryPanel {
    pub fn text(&self) -> &str {
        match self {
            SummaryPanel::Loading => "Loading...",
            SummaryPanel::Loaded(json) => json,
            SummaryPanel::Failed => SUMMARY_FAILED_MESSAGE,
        }
    }
}

/// Индикатор состояния backend
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BackendStatus {
    #[default]
    Checking,
    Ok,
    Unreachable,
    /// Запрос сводки завершился ошибкой
    Error,
}

impl BackendStatus {
    pub fn label(self) -> &'static str {
        match self {
            BackendStatus::Checking => "Checking backend...",
            BackendStatus::Ok => "Backend OK",
            BackendStatus::Unreachable => "Backend unreachable",
            BackendStatus::Error => "Backend error",
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            BackendStatus::Checking => "status-dot",
            BackendStatus::Ok => "status-dot ok",
            BackendStatus::Unreachable | BackendStatus::Error => "status-dot fail",
        }
    }
}

/// Куда контроллер публикует то, что показывает страница
pub trait DashboardView {
    fn show_summary(&self, panel: SummaryPanel);
    fn show_backend_status(&self, status: BackendStatus);
    fn show_upload(&self, upload: UploadView);
}

#[derive(Debug, thiserror::Error)]
enum RefreshError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Chart(#[from] ChartError),
    #[error("failed to format summary: {0}")]
    Format(#[from] serde_json::Error),
}

/// Цикл обновления страницы дашборда
///
/// Однопоточный: методы принимают `&self` и не держат заимствование
/// `RefCell` через `.await`.
pub struct DashboardController<A: MatchStatsApi, B: ChartBackend, V: DashboardView> {
    api: A,
    charts: RefCell<ChartPresenter<B>>,
    view: V,
    upload: RefCell<UploadSession<A::File>>,
    /// Номер последнего запущенного обновления
    refresh_seq: Cell<u64>,
}

impl<A: MatchStatsApi, B: ChartBackend, V: DashboardView> DashboardController<A, B, V> {
    pub fn new(api: A, charts: B, view: V, config: &DashboardConfig) -> Self {
        Self {
            api,
            charts: RefCell::new(ChartPresenter::new(charts)),
            view,
            upload: RefCell::new(UploadSession::new(config.display_cap)),
            refresh_seq: Cell::new(0),
        }
    }

    /// Проверить backend, затем загрузить сводку без фильтров.
    ///
    /// Пинг завершается первым, поэтому ошибка обновления всегда
    /// остаётся последним состоянием индикатора.
    pub async fn init(&self) {
        self.ping().await;
        self.refresh(&FilterSet::default()).await;
    }

    /// Любой HTTP-ответ, включая 4xx/5xx, считается доступностью
    pub async fn ping(&self) -> BackendStatus {
        let status = match self.api.ping().await {
            Ok(code) => {
                log::debug!("Backend answered ping with HTTP {}", code);
                BackendStatus::Ok
            }
            Err(e) => {
                log::error!("Backend ping failed: {}", e);
                BackendStatus::Unreachable
            }
        };
        self.view.show_backend_status(status);
        status
    }

    pub async fn refresh(&self, filters: &FilterSet) {
        let seq = self.refresh_seq.get() + 1;
        self.refresh_seq.set(seq);
        self.view.show_summary(SummaryPanel::Loading);

        let result = self.api.summary(filters).await;
        if seq != self.refresh_seq.get() {
            log::debug!("Discarding stale summary response #{}", seq);
            return;
        }

        match result
            .map_err(RefreshError::from)
            .and_then(|summary| self.render_summary(&summary))
        {
            Ok(text) => self.view.show_summary(SummaryPanel::Loaded(text)),
            Err(e) => {
                log::error!("Failed to load summary for {:?}: {}", filters, e);
                self.view.show_summary(SummaryPanel::Failed);
                self.view.show_backend_status(BackendStatus::Error);
            }
        }
    }

    fn render_summary(&self, summary: &SummaryAggregate) -> Result<String, RefreshError> {
        let text = serde_json::to_string_pretty(summary)?;
        let teams = summary.team_names();
        let wins = summary.wins_series().into_iter().map(|v| v as f64).collect();
        let runs = summary.runs_series().into_iter().map(|v| v as f64).collect();

        let mut charts = self.charts.borrow_mut();
        charts.render(
            ChartSlot::Wins,
            teams.clone(),
            wins,
            ChartSlot::Wins.series_label(),
        )?;
        charts.render(ChartSlot::Runs, teams, runs, ChartSlot::Runs.series_label())?;
        Ok(text)
    }

    /// Сбросить текущую загрузку (выбран другой файл)
    pub fn discard_upload(&self) {
        self.upload.borrow_mut().discard();
        self.publish_upload();
    }

    /// Начать сессию для `file` и отправить его на preview
    pub async fn submit_preview(&self, file: Option<A::File>) {
        let request = self.upload.borrow_mut().start_preview(file);
        self.publish_upload();
        let Some(request) = request else {
            return;
        };

        let result = self.api.upload_preview(&request.file).await;
        let effect = self.upload.borrow_mut().apply_preview(request.generation, result);
        if effect != ResponseEffect::Stale {
            self.publish_upload();
        }
    }

    /// Повторно отправить проверенный файл с `confirm=1`; при успехе перезагружает сводку
    pub async fn confirm_upload(&self) {
        let request = self.upload.borrow_mut().start_commit();
        let Some(request) = request else {
            log::debug!("Confirm ignored: nothing previewed to commit");
            return;
        };
        self.publish_upload();

        let result = self.api.upload_commit(&request.file).await;
        let effect = self.upload.borrow_mut().apply_commit(request.generation, result);
        match effect {
            ResponseEffect::Stale => {}
            ResponseEffect::Updated => self.publish_upload(),
            ResponseEffect::Committed => {
                self.publish_upload();
                self.refresh(&FilterSet::default()).await;
            }
            ResponseEffect::CommittedElsewhere => {
                self.refresh(&FilterSet::default()).await;
            }
        }
    }

    fn publish_upload(&self) {
        let view = self.upload.borrow().view();
        self.view.show_upload(view);
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn charts(&self) -> Ref<'_, ChartPresenter<B>> {
        self.charts.borrow()
    }

    pub fn upload(&self) -> Ref<'_, UploadSession<A::File>> {
        self.upload.borrow()
    }
}
