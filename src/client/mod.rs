//! FORMATR server API client.
//!
//! `FormatrClient` is the only place that builds HTTP requests. Upper
//! layers (dispatcher, tools, CLI) call through it and never touch reqwest
//! directly.
//!
//! There is no retry and no request timeout anywhere: one user action is
//! one request, and large media conversions can legitimately take minutes.

pub mod response;

use crate::actions::AnalyzeReport;
use crate::error::{FormatrError, Result};
use crate::session::DroppedFile;
use serde::{Deserialize, Serialize};

const USER_AGENT: &str = concat!("formatr-client/", env!("CARGO_PKG_VERSION"));

/// A successful binary response.
#[derive(Debug, Clone)]
pub struct Payload {
    /// Name from `Content-Disposition`, already sanitized. `None` if absent.
    pub suggested_name: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TranslateRequest {
    pub source_lang: String,
    pub target_lang: String,
    pub code: String,
    pub api_key: String,
}

#[derive(Debug, Deserialize)]
struct TranslateReply {
    result: Option<String>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StatusReply {
    status: String,
}

#[derive(Clone)]
pub struct FormatrClient {
    client: reqwest::Client,
    base_url: String,
}

impl FormatrClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| FormatrError::Config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for an `/api/...` endpoint.
    pub fn url(&self, endpoint: &str) -> String {
        if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            return endpoint.to_string();
        }
        format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'))
    }

    /// Ask the server which actions apply to a file name.
    pub async fn analyze(&self, filename: &str) -> Result<AnalyzeReport> {
        let start = std::time::Instant::now();
        let response = self
            .client
            .post(self.url("/api/analyze"))
            .json(&serde_json::json!({ "filename": filename }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.bytes().await.unwrap_or_default();
            let message = response::error_message(&body)
                .unwrap_or_else(|| format!("Analyzer returned {}", status));
            return Err(FormatrError::Server {
                status: status.as_u16(),
                message,
            });
        }

        let report: AnalyzeReport = response.json().await?;
        log::info!(
            "[ANALYZE] {} → {} actions in {}ms",
            filename,
            report.actions.len(),
            start.elapsed().as_millis()
        );
        Ok(report)
    }

    /// POST a file plus form fields as multipart and collect the binary reply.
    ///
    /// `fallback_error` is used when a failed response carries no readable
    /// message.
    pub async fn post_file(
        &self,
        endpoint: &str,
        file: &DroppedFile,
        fields: &[(String, String)],
        fallback_error: &str,
    ) -> Result<Payload> {
        let part = reqwest::multipart::Part::stream_with_length(file.content.clone(), file.size)
            .file_name(file.name.clone())
            .mime_str("application/octet-stream")?;
        let mut form = reqwest::multipart::Form::new().part("file", part);
        for (name, value) in fields {
            form = form.text(name.clone(), value.clone());
        }

        let url = self.url(endpoint);
        log::info!(
            "[EXECUTE] POST {} ({}, {} bytes, {} fields)",
            url,
            file.name,
            file.size,
            fields.len()
        );
        let start = std::time::Instant::now();
        let response = self.client.post(&url).multipart(form).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.bytes().await.unwrap_or_default();
            let message =
                response::error_message(&body).unwrap_or_else(|| fallback_error.to_string());
            log::warn!("[EXECUTE] {} returned {}: {}", endpoint, status, message);
            return Err(FormatrError::Server {
                status: status.as_u16(),
                message,
            });
        }

        let suggested_name = response
            .headers()
            .get(reqwest::header::CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .and_then(response::filename_from_disposition);
        let bytes = response.bytes().await?.to_vec();
        log::info!(
            "[EXECUTE] {} → {} bytes in {}ms",
            endpoint,
            bytes.len(),
            start.elapsed().as_millis()
        );
        Ok(Payload {
            suggested_name,
            bytes,
        })
    }

    /// `true` when the server answers `{"status": "running"}`.
    pub async fn check_health(&self) -> bool {
        let response = match self.client.get(self.url("/api/status")).send().await {
            Ok(r) => r,
            Err(e) => {
                log::debug!("[HEALTH] Server unreachable: {}", e);
                return false;
            }
        };
        match response.json::<StatusReply>().await {
            Ok(reply) => reply.status == "running",
            Err(_) => false,
        }
    }

    /// Ask the server to open its output folder on the host.
    pub async fn open_output_folder(&self) -> Result<()> {
        self.client
            .post(self.url("/api/open-output-folder"))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    /// Translate source code between languages via the server.
    pub async fn translate(&self, request: &TranslateRequest) -> Result<String> {
        let response = self
            .client
            .post(self.url("/api/dev/translate"))
            .json(request)
            .send()
            .await?;
        let status = response.status();
        let reply: TranslateReply = response.json().await?;

        match (status.is_success(), reply.result, reply.error) {
            (true, Some(result), _) => Ok(result),
            (_, _, error) => Err(FormatrError::Server {
                status: status.as_u16(),
                message: error.unwrap_or_else(|| "Failed".to_string()),
            }),
        }
    }
}
