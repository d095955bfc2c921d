//! Двухфазная загрузка CSV: preview, затем commit того же файла
//!
//! Сессия не заглядывает внутрь файла. Проверку делает backend на этапе
//! preview; сессия только решает, разрешает ли результат commit.

use super::api::ApiError;
use contracts::dashboards::d400_match_stats::{UploadCommitResponse, UploadPreviewResponse};
use serde_json::Value;

/// Результат успешного preview-запроса
#[derive(Debug, Clone, PartialEq)]
pub enum PreviewOutcome {
    /// Backend нашёл ошибки в строках; commit не предлагается
    Invalid { errors: Vec<Value> },
    Ready { rows: u64, preview: Vec<Value> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadStage {
    Preview,
    Commit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadFailure {
    NoFileSelected,
    /// Запрос не вернул пригодного ответа
    Transport(UploadStage),
    /// Backend ответил полем `error`
    Rejected(String),
    /// Ответ commit без `status: "ok"` и без `error`; сохраняется сырой JSON
    Unexpected(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum UploadPhase {
    Idle,
    PreviewPending,
    Previewed(PreviewOutcome),
    CommitPending { rows: u64 },
    Committed { rows: u64 },
    Failed(UploadFailure),
}

/// Запрос, который вызывающий должен отправить для сессии
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest<F> {
    pub file: F,
    pub confirm: bool,
    /// Поколение сессии, к которому относится ответ
    pub generation: u64,
}

/// Результат применения ответа
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseEffect {
    /// Ответ относится к сброшенной сессии или неожиданной фазе
    Stale,
    Updated,
    /// Commit успешен; нужно перезагрузить сводку
    Committed,
    /// Commit сброшенной сессии успешен: сессия не меняется,
    /// но сводку всё равно нужно перезагрузить
    CommittedElsewhere,
}

/// Снимок сессии для отображения
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadView {
    pub status: String,
    /// Отформатированный список ошибок или строк preview
    pub details: Option<String>,
    pub can_commit: bool,
    pub busy: bool,
}

/// Одна попытка загрузки одного выбранного файла
#[derive(Debug, Clone)]
pub struct UploadSession<F> {
    file: Option<F>,
    phase: UploadPhase,
    generation: u64,
    display_cap: usize,
}

impl<F: Clone> UploadSession<F> {
    pub fn new(display_cap: usize) -> Self {
        Self {
            file: None,
            phase: UploadPhase::Idle,
            generation: 0,
            display_cap,
        }
    }

    pub fn phase(&self) -> &UploadPhase {
        &self.phase
    }

    pub fn file(&self) -> Option<&F> {
        self.file.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Сбросить текущую сессию, например при выборе другого файла.
    /// Ответы, ещё не пришедшие для неё, будут проигнорированы.
    pub fn discard(&mut self) {
        self.generation += 1;
        self.file = None;
        self.phase = UploadPhase::Idle;
    }

    /// Начать новую сессию для `file` и вернуть preview-запрос
    pub fn start_preview(&mut self, file: Option<F>) -> Option<UploadRequest<F>> {
        self.discard();
        let Some(file) = file else {
            self.phase = UploadPhase::Failed(UploadFailure::NoFileSelected);
            return None;
        };
        self.file = Some(file.clone());
        self.phase = UploadPhase::PreviewPending;
        Some(UploadRequest {
            file,
            confirm: false,
            generation: self.generation,
        })
    }

    pub fn apply_preview(
        &mut self,
        generation: u64,
        result: Result<UploadPreviewResponse, ApiError>,
    ) -> ResponseEffect {
        if generation != self.generation || self.phase != UploadPhase::PreviewPending {
            log::debug!("Ignoring preview response for upload session #{}", generation);
            return ResponseEffect::Stale;
        }

        self.phase = match result {
            Err(e) => {
                log::error!("Upload preview failed: {}", e);
                UploadPhase::Failed(UploadFailure::Transport(UploadStage::Preview))
            }
            Ok(UploadPreviewResponse {
                error: Some(message),
                ..
            }) => UploadPhase::Failed(UploadFailure::Rejected(message)),
            Ok(response) if !response.errors.is_empty() => {
                log::warn!("Upload errors preview: {:?}", response.errors);
                UploadPhase::Previewed(PreviewOutcome::Invalid {
                    errors: response.errors,
                })
            }
            Ok(response) => {
                let rows = response.rows.unwrap_or(response.preview.len() as u64);
                UploadPhase::Previewed(PreviewOutcome::Ready {
                    rows,
                    preview: response.preview,
                })
            }
        };
        ResponseEffect::Updated
    }

    pub fn can_commit(&self) -> bool {
        self.file.is_some()
            && matches!(
                self.phase,
                UploadPhase::Previewed(PreviewOutcome::Ready { .. })
            )
    }

    /// Перейти в `CommitPending` и вернуть запрос с тем же файлом
    pub fn start_commit(&mut self) -> Option<UploadRequest<F>> {
        let rows = match &self.phase {
            UploadPhase::Previewed(PreviewOutcome::Ready { rows, .. }) => *rows,
            _ => return None,
        };
        let file = self.file.clone()?;
        self.phase = UploadPhase::CommitPending { rows };
        Some(UploadRequest {
            file,
            confirm: true,
            generation: self.generation,
        })
    }

    pub fn apply_commit(
        &mut self,
        generation: u64,
        result: Result<UploadCommitResponse, ApiError>,
    ) -> ResponseEffect {
        let pending_rows = match self.phase {
            UploadPhase::CommitPending { rows } if generation == self.generation => rows,
            _ => {
                if matches!(&result, Ok(response) if response.is_ok()) {
                    log::debug!("Upload session #{} was discarded after its commit was stored", generation);
                    return ResponseEffect::CommittedElsewhere;
                }
                log::debug!("Ignoring commit response for upload session #{}", generation);
                return ResponseEffect::Stale;
            }
        };

        match result {
            Ok(response) if response.is_ok() => {
                self.file = None;
                self.phase = UploadPhase::Committed {
                    rows: response.rows.unwrap_or(pending_rows),
                };
                ResponseEffect::Committed
            }
            Ok(UploadCommitResponse {
                error: Some(message),
                ..
            }) => {
                self.phase = UploadPhase::Failed(UploadFailure::Rejected(message));
                ResponseEffect::Updated
            }
            Ok(response) => {
                let raw = serde_json::to_string(&response).unwrap_or_default();
                self.phase = UploadPhase::Failed(UploadFailure::Unexpected(raw));
                ResponseEffect::Updated
            }
            Err(e) => {
                log::error!("Upload commit failed: {}", e);
                self.phase = UploadPhase::Failed(UploadFailure::Transport(UploadStage::Commit));
                ResponseEffect::Updated
            }
        }
    }

    pub fn status_text(&self) -> String {
        match &self.phase {
            UploadPhase::Idle => String::new(),
            UploadPhase::PreviewPending => "Uploading for preview...".to_string(),
            UploadPhase::Previewed(PreviewOutcome::Invalid { errors }) => {
                format!("Validation errors ({})", errors.len())
            }
            UploadPhase::Previewed(PreviewOutcome::Ready { rows, .. }) => {
                format!("Preview OK — {} rows. Click Confirm to commit.", rows)
            }
            UploadPhase::CommitPending { .. } => "Committing upload...".to_string(),
            UploadPhase::Committed { rows } => format!("Upload committed — {} rows", rows),
            UploadPhase::Failed(failure) => match failure {
                UploadFailure::NoFileSelected => "Select a file first.".to_string(),
                UploadFailure::Transport(UploadStage::Preview) => "Upload failed".to_string(),
                UploadFailure::Transport(UploadStage::Commit) => "Commit failed".to_string(),
                UploadFailure::Rejected(message) => format!("Error: {}", message),
                UploadFailure::Unexpected(raw) => raw.clone(),
            },
        }
    }

    /// Ошибки или строки preview, обрезанные для показа
    pub fn displayed_items(&self) -> &[Value] {
        let items = match &self.phase {
            UploadPhase::Previewed(PreviewOutcome::Invalid { errors }) => errors.as_slice(),
            UploadPhase::Previewed(PreviewOutcome::Ready { preview, .. }) => preview.as_slice(),
            _ => &[],
        };
        &items[..items.len().min(self.display_cap)]
    }

    pub fn view(&self) -> UploadView {
        let details = match &self.phase {
            UploadPhase::Previewed(_) => {
                serde_json::to_string_pretty(self.displayed_items()).ok()
            }
            _ => None,
        };
        UploadView {
            status: self.status_text(),
            details,
            can_commit: self.can_commit(),
            busy: matches!(
                self.phase,
                UploadPhase::PreviewPending | UploadPhase::CommitPending { .. }
            ),
        }
    }
}
