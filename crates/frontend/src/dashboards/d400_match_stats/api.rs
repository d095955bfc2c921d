use crate::shared::api_utils::{api_url, with_filters};
use crate::shared::config::DashboardConfig;
use contracts::dashboards::d400_match_stats::{
    FilterSet, SummaryAggregate, UploadCommitResponse, UploadPreviewResponse,
};
use gloo_net::http::{Request, Response};
use serde::de::DeserializeOwned;
use web_sys::FormData;

const SUMMARY_PATH: &str = "/api/summary";
const UPLOAD_PATH: &str = "/api/upload";

/// Ошибка обращения к backend
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// Запрос не получил HTTP-ответа (нет сети, DNS, соединение отклонено)
    #[error("Request failed: {0}")]
    Network(String),
    /// Ответ получен, но тело не соответствует ожидаемой структуре
    #[error("Failed to parse response: {0}")]
    Decode(String),
}

/// Операции backend, нужные дашборду
///
/// Каждый вызов выполняется один раз, без повторов.
#[allow(async_fn_in_trait)]
pub trait MatchStatsApi {
    /// Непрозрачный дескриптор выбранного пользователем файла
    type File: Clone;

    /// Проверка доступности, возвращает HTTP-статус любого ответа
    async fn ping(&self) -> Result<u16, ApiError>;

    async fn summary(&self, filters: &FilterSet) -> Result<SummaryAggregate, ApiError>;

    /// Загрузить `file` только для проверки (preview)
    async fn upload_preview(&self, file: &Self::File) -> Result<UploadPreviewResponse, ApiError>;

    /// Повторно загрузить `file` с `confirm=1`, чтобы backend сохранил данные
    async fn upload_commit(&self, file: &Self::File) -> Result<UploadCommitResponse, ApiError>;
}

/// API клиент дашборда d400 поверх `fetch`
#[derive(Debug, Clone, Default)]
pub struct HttpMatchStatsApi {
    api_base: String,
}

impl HttpMatchStatsApi {
    pub fn new(config: &DashboardConfig) -> Self {
        Self {
            api_base: config.api_base.clone(),
        }
    }

    pub fn summary_url(&self, filters: &FilterSet) -> String {
        with_filters(&api_url(&self.api_base, SUMMARY_PATH), filters)
    }

    async fn post_upload(&self, file: &web_sys::File, confirm: bool) -> Result<Response, ApiError> {
        let form = FormData::new().map_err(|e| ApiError::Network(format!("{:?}", e)))?;
        form.append_with_blob("file", file)
            .map_err(|e| ApiError::Network(format!("{:?}", e)))?;
        if confirm {
            form.append_with_str("confirm", "1")
                .map_err(|e| ApiError::Network(format!("{:?}", e)))?;
        }

        let url = api_url(&self.api_base, UPLOAD_PATH);
        Request::post(&url)
            .body(form)
            .map_err(|e| ApiError::Network(e.to_string()))?
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))
    }
}

/// Разбирает JSON-тело при любом HTTP-статусе: ошибки загрузки
/// backend отдаёт как JSON с кодами 4xx/5xx.
async fn decode_body<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();
    response
        .json::<T>()
        .await
        .map_err(|e| ApiError::Decode(format!("HTTP {}: {}", status, e)))
}

impl MatchStatsApi for HttpMatchStatsApi {
    type File = web_sys::File;

    async fn ping(&self) -> Result<u16, ApiError> {
        let url = api_url(&self.api_base, SUMMARY_PATH);
        let response = Request::get(&url)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Ok(response.status())
    }

    async fn summary(&self, filters: &FilterSet) -> Result<SummaryAggregate, ApiError> {
        let url = self.summary_url(filters);
        let response = Request::get(&url)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let summary: SummaryAggregate = decode_body(response).await?;
        summary.validate().map_err(ApiError::Decode)?;
        Ok(summary)
    }

    async fn upload_preview(&self, file: &web_sys::File) -> Result<UploadPreviewResponse, ApiError> {
        let response = self.post_upload(file, false).await?;
        decode_body(response).await
    }

    async fn upload_commit(&self, file: &web_sys::File) -> Result<UploadCommitResponse, ApiError> {
        let response = self.post_upload(file, true).await?;
        decode_body(response).await
    }
}
