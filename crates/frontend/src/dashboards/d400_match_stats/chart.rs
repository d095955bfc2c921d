//! Слоты графиков и их жизненный цикл
//!
//! В слоте живёт не больше одного графика. Перед созданием нового графика
//! предыдущий всегда освобождается: библиотека графиков хранит состояние,
//! привязанное к поверхности отрисовки.

use serde::Serialize;

/// Два графика дашборда
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ChartSlot {
    Wins,
    Runs,
}

impl ChartSlot {
    pub const ALL: [ChartSlot; 2] = [ChartSlot::Wins, ChartSlot::Runs];

    /// DOM id элемента `<canvas>` слота
    pub fn canvas_id(self) -> &'static str {
        match self {
            ChartSlot::Wins => "winsChart",
            ChartSlot::Runs => "runsChart",
        }
    }

    pub fn series_label(self) -> &'static str {
        match self {
            ChartSlot::Wins => "Wins",
            ChartSlot::Runs => "Runs",
        }
    }
}

/// Данные столбчатого графика с одной серией
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarChartSpec {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub series_label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChartError {
    #[error("{labels} labels for {values} values")]
    LengthMismatch { labels: usize, values: usize },
    /// Нет canvas, контекста или библиотеки графиков
    #[error("chart surface error: {0}")]
    Surface(String),
}

/// Библиотека отрисовки за презентером
pub trait ChartBackend {
    type Handle;

    /// Создать график на чистой поверхности слота
    fn attach(&mut self, slot: ChartSlot, spec: &BarChartSpec) -> Result<Self::Handle, ChartError>;

    /// Уничтожить `handle` и оставить на его месте чистую поверхность
    fn release(&mut self, slot: ChartSlot, handle: Self::Handle);
}

struct LiveChart<H> {
    handle: H,
    spec: BarChartSpec,
}

/// Владеет живым графиком каждого слота
pub struct ChartPresenter<B: ChartBackend> {
    backend: B,
    wins: Option<LiveChart<B::Handle>>,
    runs: Option<LiveChart<B::Handle>>,
}

impl<B: ChartBackend> ChartPresenter<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            wins: None,
            runs: None,
        }
    }

    /// Нарисовать столбчатый график в слоте, заменив прежний
    ///
    /// Пустые `labels`/`values` дают пустой график.
    pub fn render(
        &mut self,
        slot: ChartSlot,
        labels: Vec<String>,
        values: Vec<f64>,
        series_label: &str,
    ) -> Result<(), ChartError> {
        if labels.len() != values.len() {
            return Err(ChartError::LengthMismatch {
                labels: labels.len(),
                values: values.len(),
            });
        }
        self.replace(
            slot,
            BarChartSpec {
                labels,
                values,
                series_label: series_label.to_string(),
            },
        )
    }

    /// Освободить текущий график слота, затем создать новый из `spec`
    ///
    /// Если создать не удалось, слот остаётся пустым.
    pub fn replace(&mut self, slot: ChartSlot, spec: BarChartSpec) -> Result<(), ChartError> {
        if let Some(old) = self.slot_mut(slot).take() {
            self.backend.release(slot, old.handle);
        }
        let handle = self.backend.attach(slot, &spec)?;
        *self.slot_mut(slot) = Some(LiveChart { handle, spec });
        Ok(())
    }

    /// Данные, нарисованные в слоте сейчас
    pub fn rendered(&self, slot: ChartSlot) -> Option<&BarChartSpec> {
        self.slot(slot).as_ref().map(|live| &live.spec)
    }

    pub fn is_live(&self, slot: ChartSlot) -> bool {
        self.slot(slot).is_some()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn slot(&self, slot: ChartSlot) -> &Option<LiveChart<B::Handle>> {
        match slot {
            ChartSlot::Wins => &self.wins,
            ChartSlot::Runs => &self.runs,
        }
    }

    fn slot_mut(&mut self, slot: ChartSlot) -> &mut Option<LiveChart<B::Handle>> {
        match slot {
            ChartSlot::Wins => &mut self.wins,
            ChartSlot::Runs => &mut self.runs,
        }
    }
}
