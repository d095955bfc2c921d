//! Заглушки в памяти для браузерных зависимостей

use super::api::{ApiError, MatchStatsApi};
use super::chart::{BarChartSpec, ChartBackend, ChartError, ChartSlot};
use super::controller::{BackendStatus, DashboardView, SummaryPanel};
use super::filters::{NavigationError, ReportNavigator};
use super::upload::UploadView;
use contracts::dashboards::d400_match_stats::{
    FilterSet, SummaryAggregate, TeamStats, UploadCommitResponse, UploadPreviewResponse,
};
use futures::channel::oneshot;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FakeFile(pub &'static str);

pub fn sample_summary() -> SummaryAggregate {
    let mut summary = SummaryAggregate {
        total_matches: 4,
        total_runs: 1210,
        ..Default::default()
    };
    summary.teams.insert(
        "Lions".to_string(),
        TeamStats {
            matches: 3,
            wins: 2,
            runs: 480,
        },
    );
    summary.teams.insert(
        "Eagles".to_string(),
        TeamStats {
            matches: 3,
            wins: 1,
            runs: 430,
        },
    );
    summary.teams.insert(
        "Tigers".to_string(),
        TeamStats {
            matches: 2,
            wins: 1,
            runs: 300,
        },
    );
    summary
}

type SummaryResult = Result<SummaryAggregate, ApiError>;
type CommitResult = Result<UploadCommitResponse, ApiError>;

/// Backend по сценарию; записывает каждый вызов
pub struct FakeApi {
    summary: SummaryResult,
    ping_ok: Cell<bool>,
    pending: RefCell<VecDeque<oneshot::Receiver<SummaryResult>>>,
    previews: RefCell<VecDeque<Result<UploadPreviewResponse, ApiError>>>,
    commits: RefCell<VecDeque<Result<UploadCommitResponse, ApiError>>>,
    pending_commits: RefCell<VecDeque<oneshot::Receiver<CommitResult>>>,
    summary_calls: RefCell<Vec<FilterSet>>,
    uploads: RefCell<Vec<(FakeFile, bool)>>,
}

impl FakeApi {
    fn new(summary: SummaryResult) -> Self {
        Self {
            summary,
            ping_ok: Cell::new(true),
            pending: RefCell::new(VecDeque::new()),
            previews: RefCell::new(VecDeque::new()),
            commits: RefCell::new(VecDeque::new()),
            pending_commits: RefCell::new(VecDeque::new()),
            summary_calls: RefCell::new(Vec::new()),
            uploads: RefCell::new(Vec::new()),
        }
    }

    pub fn with_summary(summary: SummaryAggregate) -> Self {
        Self::new(Ok(summary))
    }

    pub fn with_summary_error(error: ApiError) -> Self {
        Self::new(Err(error))
    }

    pub fn fail_ping(&self) {
        self.ping_ok.set(false);
    }

    /// Следующий запрос сводки ждёт `rx` вместо немедленного ответа
    pub fn queue_pending(&self, rx: oneshot::Receiver<SummaryResult>) {
        self.pending.borrow_mut().push_back(rx);
    }

    pub fn queue_preview(&self, result: Result<UploadPreviewResponse, ApiError>) {
        self.previews.borrow_mut().push_back(result);
    }

    pub fn queue_commit(&self, result: Result<UploadCommitResponse, ApiError>) {
        self.commits.borrow_mut().push_back(result);
    }

    /// Следующий commit ждёт `rx`; имеет приоритет над `queue_commit`
    pub fn queue_pending_commit(&self, rx: oneshot::Receiver<CommitResult>) {
        self.pending_commits.borrow_mut().push_back(rx);
    }

    pub fn summary_calls(&self) -> Vec<FilterSet> {
        self.summary_calls.borrow().clone()
    }

    pub fn uploads(&self) -> Vec<(FakeFile, bool)> {
        self.uploads.borrow().clone()
    }
}

impl MatchStatsApi for FakeApi {
    type File = FakeFile;

    async fn ping(&self) -> Result<u16, ApiError> {
        if self.ping_ok.get() {
            Ok(200)
        } else {
            Err(ApiError::Network("connection refused".to_string()))
        }
    }

    async fn summary(&self, filters: &FilterSet) -> SummaryResult {
        self.summary_calls.borrow_mut().push(filters.clone());
        let pending = self.pending.borrow_mut().pop_front();
        match pending {
            Some(rx) => rx
                .await
                .unwrap_or_else(|_| Err(ApiError::Network("request dropped".to_string()))),
            None => self.summary.clone(),
        }
    }

    async fn upload_preview(&self, file: &FakeFile) -> Result<UploadPreviewResponse, ApiError> {
        self.uploads.borrow_mut().push((*file, false));
        let next = self.previews.borrow_mut().pop_front();
        next.unwrap_or_else(|| Err(ApiError::Network("no preview scripted".to_string())))
    }

    async fn upload_commit(&self, file: &FakeFile) -> Result<UploadCommitResponse, ApiError> {
        self.uploads.borrow_mut().push((*file, true));
        let pending = self.pending_commits.borrow_mut().pop_front();
        if let Some(rx) = pending {
            return rx
                .await
                .unwrap_or_else(|_| Err(ApiError::Network("request dropped".to_string())));
        }
        let next = self.commits.borrow_mut().pop_front();
        next.unwrap_or_else(|| Err(ApiError::Network("no commit scripted".to_string())))
    }
}

/// Backend графиков, отслеживающий живые дескрипторы по слотам
#[derive(Debug, Default)]
pub struct FakeCharts {
    next_id: u32,
    live: Vec<(ChartSlot, u32)>,
    events: Vec<String>,
    fail_next: Cell<bool>,
}

impl FakeCharts {
    pub fn live_count(&self, slot: ChartSlot) -> usize {
        self.live.iter().filter(|(s, _)| *s == slot).count()
    }

    pub fn events(&self) -> Vec<String> {
        self.events.clone()
    }

    pub fn fail_next_attach(&self) {
        self.fail_next.set(true);
    }
}

impl ChartBackend for FakeCharts {
    type Handle = u32;

    fn attach(&mut self, slot: ChartSlot, _spec: &BarChartSpec) -> Result<u32, ChartError> {
        if self.fail_next.replace(false) {
            return Err(ChartError::Surface("canvas missing".to_string()));
        }
        assert_eq!(self.live_count(slot), 0, "attach over a live chart in {:?}", slot);
        self.next_id += 1;
        self.live.push((slot, self.next_id));
        self.events.push(format!("attach {:?} #{}", slot, self.next_id));
        Ok(self.next_id)
    }

    fn release(&mut self, slot: ChartSlot, handle: u32) {
        self.live.retain(|&(s, id)| !(s == slot && id == handle));
        self.events.push(format!("release {:?} #{}", slot, handle));
    }
}

/// Записывает всё, что публикуется на страницу
#[derive(Debug, Default)]
pub struct RecordingView {
    summaries: RefCell<Vec<SummaryPanel>>,
    statuses: RefCell<Vec<BackendStatus>>,
    uploads: RefCell<Vec<UploadView>>,
}

impl RecordingView {
    pub fn summaries(&self) -> Vec<SummaryPanel> {
        self.summaries.borrow().clone()
    }

    pub fn summary_text(&self) -> String {
        self.summaries
            .borrow()
            .last()
            .map(|panel| panel.text().to_string())
            .unwrap_or_default()
    }

    pub fn statuses(&self) -> Vec<BackendStatus> {
        self.statuses.borrow().clone()
    }

    pub fn last_upload(&self) -> UploadView {
        self.uploads.borrow().last().cloned().unwrap_or_default()
    }
}

impl DashboardView for RecordingView {
    fn show_summary(&self, panel: SummaryPanel) {
        self.summaries.borrow_mut().push(panel);
    }

    fn show_backend_status(&self, status: BackendStatus) {
        self.statuses.borrow_mut().push(status);
    }

    fn show_upload(&self, upload: UploadView) {
        self.uploads.borrow_mut().push(upload);
    }
}

/// Навигатор, запоминающий открытые URL; может вести себя как блокировщик окон
#[derive(Debug, Default)]
pub struct FakeNavigator {
    pub blocked: bool,
    opened: RefCell<Vec<String>>,
}

impl FakeNavigator {
    /// Ведёт себя как браузер с блокировщиком окон
    pub fn blocking() -> Self {
        Self {
            blocked: true,
            ..Default::default()
        }
    }

    pub fn opened(&self) -> Vec<String> {
        self.opened.borrow().clone()
    }
}

impl ReportNavigator for FakeNavigator {
    fn open_report(&self, url: &str) -> Result<(), NavigationError> {
        if self.blocked {
            return Err(NavigationError::Blocked);
        }
        self.opened.borrow_mut().push(url.to_string());
        Ok(())
    }
}
