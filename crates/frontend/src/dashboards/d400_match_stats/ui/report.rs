use crate::dashboards::d400_match_stats::api::{HttpMatchStatsApi, MatchStatsApi};
use crate::shared::config::DashboardConfig;
use contracts::dashboards::d400_match_stats::{FilterSet, SummaryAggregate};
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_query_map;

/// One line of the team table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub team: String,
    pub matches: u64,
    pub wins: u64,
    pub runs: u64,
}

/// Team rows sorted by team name
pub fn report_rows(summary: &SummaryAggregate) -> Vec<ReportRow> {
    let mut rows: Vec<ReportRow> = summary
        .teams
        .iter()
        .map(|(team, stats)| ReportRow {
            team: team.clone(),
            matches: stats.matches,
            wins: stats.wins,
            runs: stats.runs,
        })
        .collect();
    rows.sort_by(|a, b| a.team.cmp(&b.team));
    rows
}

#[derive(Debug, Clone, PartialEq)]
enum ReportState {
    Loading,
    Loaded(SummaryAggregate),
    Failed,
}

/// Standalone team report, opened from the dashboard with the same filters
#[component]
pub fn MatchStatsReport() -> impl IntoView {
    let config = use_context::<DashboardConfig>().unwrap_or_default();
    let query = use_query_map();
    let filters = query.with_untracked(|params| {
        FilterSet::from_raw(
            &params.get("team").unwrap_or_default(),
            &params.get("start").unwrap_or_default(),
            &params.get("end").unwrap_or_default(),
        )
    });

    let (state, set_state) = signal(ReportState::Loading);

    Effect::new(move |_| {
        let api = HttpMatchStatsApi::new(&config);
        let filters = filters.clone();
        spawn_local(async move {
            match api.summary(&filters).await {
                Ok(summary) => set_state.set(ReportState::Loaded(summary)),
                Err(e) => {
                    log::error!("Failed to load report summary: {}", e);
                    set_state.set(ReportState::Failed);
                }
            }
        });
    });

    view! {
        <div id="d400_match_stats--report" class="d400-report">
            {move || match state.get() {
                ReportState::Loading => view! {
                    <div class="d400-loading">"Loading..."</div>
                }.into_any(),
                ReportState::Failed => view! {
                    <div class="d400-error">"Failed to load summary"</div>
                }.into_any(),
                ReportState::Loaded(summary) => {
                    let rows = report_rows(&summary);
                    view! {
                        <div id="summary">
                            <h2 class="small">"Total matches: " {summary.total_matches}</h2>
                            <p class="small">"Total runs: " {summary.total_runs}</p>
                        </div>
                        <div id="teams" class="table">
                            {rows.into_iter().map(|row| view! {
                                <div class="row">
                                    <div>
                                        <strong>{row.team}</strong>
                                        <div class="small">"matches: " {row.matches}</div>
                                    </div>
                                    <div>
                                        <div class="small">"wins: " {row.wins}</div>
                                        <div class="small">"runs: " {row.runs}</div>
                                    </div>
                                </div>
                            }).collect_view()}
                        </div>
                    }.into_any()
                }
            }}
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboards::d400_match_stats::fakes::sample_summary;

    #[test]
    fn test_report_rows_sorted_by_team() {
        let rows = report_rows(&sample_summary());
        let teams: Vec<&str> = rows.iter().map(|r| r.team.as_str()).collect();
        assert_eq!(teams, vec!["Eagles", "Lions", "Tigers"]);
        assert_eq!(
            rows[1],
            ReportRow {
                team: "Lions".to_string(),
                matches: 3,
                wins: 2,
                runs: 480,
            }
        );
    }

    #[test]
    fn test_report_rows_empty() {
        assert!(report_rows(&SummaryAggregate::default()).is_empty());
    }
}
