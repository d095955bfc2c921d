use super::api::MatchStatsApi;
use super::chart::ChartBackend;
use super::controller::{DashboardController, DashboardView};
use crate::shared::api_utils::with_filters;
use crate::shared::config::DashboardConfig;
use contracts::dashboards::d400_match_stats::FilterSet;
use std::future::Future;
use std::rc::Rc;

/// Сырые значения полей формы фильтра
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterForm {
    pub team: String,
    pub start: String,
    pub end: String,
}

impl FilterForm {
    /// Пустые поля становятся незаданными
    pub fn read(&self) -> FilterSet {
        FilterSet::from_raw(&self.team, &self.start, &self.end)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum NavigationError {
    #[error("window is not available")]
    NoWindow,
    #[error("report window was blocked")]
    Blocked,
    #[error("window.open failed: {0}")]
    Failed(String),
}

/// Открывает детальный отчёт в отдельном окне
pub trait ReportNavigator {
    fn open_report(&self, url: &str) -> Result<(), NavigationError>;
}

/// `window.open(url, target)`
#[derive(Debug, Clone)]
pub struct WindowNavigator {
    target: String,
}

impl WindowNavigator {
    pub fn new(config: &DashboardConfig) -> Self {
        Self {
            target: config.report_target.clone(),
        }
    }
}

impl ReportNavigator for WindowNavigator {
    fn open_report(&self, url: &str) -> Result<(), NavigationError> {
        let window = web_sys::window().ok_or(NavigationError::NoWindow)?;
        match window.open_with_url_and_target(url, &self.target) {
            Ok(Some(_)) => Ok(()),
            Ok(None) => Err(NavigationError::Blocked),
            Err(e) => Err(NavigationError::Failed(format!("{:?}", e))),
        }
    }
}

/// URL отчёта для `filters`
pub fn report_url(config: &DashboardConfig, filters: &FilterSet) -> String {
    with_filters(&config.report_path, filters)
}

pub struct FilterController<N: ReportNavigator> {
    navigator: N,
    config: DashboardConfig,
}

impl<N: ReportNavigator> FilterController<N> {
    pub fn new(navigator: N, config: DashboardConfig) -> Self {
        Self { navigator, config }
    }

    pub fn read_filters(&self, form: &FilterForm) -> FilterSet {
        form.read()
    }

    /// Открыть отчёт для `filters` и вернуть обновление страницы.
    ///
    /// Отчёт открывается синхронно, пока обрабатывается клик; заблокированное
    /// окно только логируется и на обновление не влияет.
    pub fn apply<A, B, V>(
        &self,
        dashboard: Rc<DashboardController<A, B, V>>,
        filters: FilterSet,
    ) -> impl Future<Output = ()>
    where
        A: MatchStatsApi,
        B: ChartBackend,
        V: DashboardView,
    {
        let url = report_url(&self.config, &filters);
        if let Err(e) = self.navigator.open_report(&url) {
            log::warn!("Report view not opened ({}): {}", url, e);
        }
        async move { dashboard.refresh(&filters).await }
    }

    pub fn navigator(&self) -> &N {
        &self.navigator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboards::d400_match_stats::controller::SUMMARY_FAILED_MESSAGE;
    use crate::dashboards::d400_match_stats::fakes::{
        sample_summary, FakeApi, FakeCharts, FakeNavigator, RecordingView,
    };
    use futures::executor::block_on;

    fn dashboard(api: FakeApi) -> Rc<DashboardController<FakeApi, FakeCharts, RecordingView>> {
        Rc::new(DashboardController::new(
            api,
            FakeCharts::default(),
            RecordingView::default(),
            &DashboardConfig::default(),
        ))
    }

    #[test]
    fn test_read_filters_maps_empty_to_unset() {
        let form = FilterForm {
            team: String::new(),
            start: "2024-03-01".to_string(),
            end: String::new(),
        };
        assert_eq!(form.read(), FilterSet::from_raw("", "2024-03-01", ""));
    }

    #[test]
    fn test_read_filters_keeps_team_as_typed() {
        let form = FilterForm {
            team: " Lions".to_string(),
            ..Default::default()
        };
        assert_eq!(form.read().team.as_deref(), Some(" Lions"));

        let blank = FilterForm {
            team: "  ".to_string(),
            ..Default::default()
        };
        assert_eq!(blank.read().team.as_deref(), Some("  "));
    }

    #[test]
    fn test_report_url() {
        let config = DashboardConfig::default();
        assert_eq!(report_url(&config, &FilterSet::default()), "report");
        assert_eq!(
            report_url(&config, &FilterSet::from_raw("Lions", "2024-01-01", "")),
            "report?team=Lions&start=2024-01-01"
        );
    }

    #[test]
    fn test_apply_refreshes_and_opens_report_with_same_filters() {
        let dashboard = dashboard(FakeApi::with_summary(sample_summary()));
        let controller = FilterController::new(FakeNavigator::default(), DashboardConfig::default());
        let form = FilterForm {
            team: "Lions".to_string(),
            start: String::new(),
            end: "2024-06-30".to_string(),
        };

        let filters = controller.read_filters(&form);
        block_on(controller.apply(dashboard.clone(), filters.clone()));

        assert_eq!(
            controller.navigator().opened(),
            vec!["report?team=Lions&end=2024-06-30".to_string()]
        );
        assert_eq!(dashboard.api().summary_calls(), vec![filters]);
    }

    #[test]
    fn test_blocked_report_does_not_block_refresh() {
        let dashboard = dashboard(FakeApi::with_summary(sample_summary()));
        let controller = FilterController::new(FakeNavigator::blocking(), DashboardConfig::default());

        block_on(controller.apply(dashboard.clone(), FilterSet::from_raw("Eagles", "", "")));

        assert!(controller.navigator().opened().is_empty());
        assert_eq!(dashboard.api().summary_calls().len(), 1);
        assert_ne!(dashboard.view().summary_text(), SUMMARY_FAILED_MESSAGE);
    }
}
