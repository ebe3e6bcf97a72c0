use api_types::{
    Health, Message,
    category::{CategoryPayload, CategoryView},
    error::{ErrorBody, FieldErrorView, ValidationErrorBody},
    expense::{ExpenseListResponse, ExpensePayload, ExpenseQuery, ExpenseView},
    stats::{BudgetStatusView, RangeQuery, SummaryResponse},
};
use reqwest::{Method, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::error::{AppError, Result};

#[derive(Debug)]
pub enum ClientError {
    NotFound(String),
    /// 400 with per-field messages.
    Validation(Vec<FieldErrorView>),
    /// 400 with a single message, e.g. a duplicate category.
    Rejected(String),
    Server(String),
    Transport(reqwest::Error),
}

impl ClientError {
    /// One-line text for the message box.
    pub fn describe(&self) -> String {
        match self {
            Self::NotFound(message) => format!("Not found: {message}"),
            Self::Validation(errors) => {
                let parts: Vec<String> = errors
                    .iter()
                    .map(|err| format!("{}: {}", err.field, err.message))
                    .collect();
                format!("Invalid input: {}", parts.join("; "))
            }
            Self::Rejected(message) => message.clone(),
            Self::Server(message) => format!("Server error: {message}"),
            Self::Transport(err) => format!("Server unreachable: {err}"),
        }
    }
}

/// Maps a failed response to a [`ClientError`] from its status and body.
fn classify(status: StatusCode, body: &str) -> ClientError {
    if status == StatusCode::BAD_REQUEST
        && let Ok(validation) = serde_json::from_str::<ValidationErrorBody>(body)
    {
        return ClientError::Validation(validation.errors);
    }

    let message = serde_json::from_str::<ErrorBody>(body)
        .map(|err| err.error)
        .unwrap_or_else(|_| "unknown error".to_string());
    match status {
        StatusCode::NOT_FOUND => ClientError::NotFound(message),
        StatusCode::BAD_REQUEST => ClientError::Rejected(message),
        _ => ClientError::Server(message),
    }
}

type ClientResult<T> = std::result::Result<T, ClientError>;

#[derive(Debug, Clone)]
pub struct Client {
    base_url: Url,
    http: reqwest::Client,
}

impl Client {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url =
            Url::parse(base_url).map_err(|err| AppError::BaseUrl(format!("{base_url}: {err}")))?;
        if base_url.cannot_be_a_base() {
            return Err(AppError::BaseUrl(format!("{base_url} cannot be a base")));
        }
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()?;
        Ok(Self { base_url, http })
    }

    /// Appends percent-encoded path segments to the base URL.
    fn endpoint(&self, segments: &[&str]) -> ClientResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ClientError::Server("invalid base_url".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, segments: &[&str]) -> ClientResult<RequestBuilder> {
        Ok(self.http.request(method, self.endpoint(segments)?))
    }

    async fn send(request: RequestBuilder) -> ClientResult<Response> {
        let res = request.send().await.map_err(ClientError::Transport)?;
        if res.status().is_success() {
            return Ok(res);
        }
        let status = res.status();
        let body = res.text().await.unwrap_or_default();
        Err(classify(status, &body))
    }

    async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> ClientResult<T> {
        Self::send(request)
            .await?
            .json::<T>()
            .await
            .map_err(ClientError::Transport)
    }

    pub async fn health(&self) -> ClientResult<Health> {
        Self::send_json(self.request(Method::GET, &["health"])?).await
    }

    pub async fn list_expenses(&self, query: &ExpenseQuery) -> ClientResult<ExpenseListResponse> {
        Self::send_json(self.request(Method::GET, &["expenses"])?.query(query)).await
    }

    pub async fn create_expense(&self, payload: &ExpensePayload) -> ClientResult<ExpenseView> {
        Self::send_json(self.request(Method::POST, &["expenses"])?.json(payload)).await
    }

    pub async fn update_expense(
        &self,
        id: Uuid,
        payload: &ExpensePayload,
    ) -> ClientResult<ExpenseView> {
        let id = id.to_string();
        Self::send_json(self.request(Method::PUT, &["expenses", &id])?.json(payload)).await
    }

    pub async fn delete_expense(&self, id: Uuid) -> ClientResult<Message> {
        let id = id.to_string();
        Self::send_json(self.request(Method::DELETE, &["expenses", &id])?).await
    }

    pub async fn summary(&self, query: &RangeQuery) -> ClientResult<SummaryResponse> {
        Self::send_json(
            self.request(Method::GET, &["expenses", "stats", "summary"])?
                .query(query),
        )
        .await
    }

    /// Raw CSV document for the listing filters of `query`.
    pub async fn export_csv(&self, query: &ExpenseQuery) -> ClientResult<String> {
        Self::send(
            self.request(Method::GET, &["expenses", "export", "csv"])?
                .query(query),
        )
        .await?
        .text()
        .await
        .map_err(ClientError::Transport)
    }

    pub async fn list_categories(&self) -> ClientResult<Vec<CategoryView>> {
        Self::send_json(self.request(Method::GET, &["categories"])?).await
    }

    pub async fn create_category(&self, payload: &CategoryPayload) -> ClientResult<CategoryView> {
        Self::send_json(self.request(Method::POST, &["categories"])?.json(payload)).await
    }

    pub async fn update_category(
        &self,
        name: &str,
        payload: &CategoryPayload,
    ) -> ClientResult<CategoryView> {
        Self::send_json(
            self.request(Method::PUT, &["categories", name])?
                .json(payload),
        )
        .await
    }

    pub async fn delete_category(&self, name: &str) -> ClientResult<Message> {
        Self::send_json(self.request(Method::DELETE, &["categories", name])?).await
    }

    pub async fn budget_status(
        &self,
        name: &str,
        query: &RangeQuery,
    ) -> ClientResult<BudgetStatusView> {
        Self::send_json(
            self.request(Method::GET, &["categories", name, "budget-status"])?
                .query(query),
        )
        .await
    }
}
