//! Single-purpose tools outside the smart-action flow.
//!
//! - convert: any endpoint + file + fields, result saved as a download
//! - format_code: JS / CSS / HTML beautify, minify, HTML to PDF
//! - translate: source code translation through the server
//! - check_health / open_output_folder: server housekeeping

pub mod code_format;

use crate::client::TranslateRequest;
use crate::context::Context;
use crate::download;
use crate::error::{FormatrError, Result};
use crate::feedback::{error_hint, ServerStatus};
use crate::session::DroppedFile;
use code_format::{format_endpoint, CodeKind, FormatOp};
use std::path::PathBuf;

/// Generic convert form: POST `file` and `fields` to `endpoint`, save the
/// reply. Errors get install hints for missing LibreOffice / FFmpeg.
pub async fn convert(
    ctx: &Context,
    endpoint: &str,
    file: Option<&DroppedFile>,
    fields: &[(String, String)],
) -> Result<PathBuf> {
    let Some(file) = file else {
        ctx.feedback.toast(&FormatrError::NoFile.to_string());
        return Err(FormatrError::NoFile);
    };

    ctx.feedback.log(&format!("INITIATING: {}...", endpoint));

    let result = match ctx
        .client
        .post_file(endpoint, file, fields, "Unknown Error")
        .await
    {
        Ok(payload) => {
            download::save(
                &ctx.output_dir,
                payload.suggested_name.as_deref(),
                download::DEFAULT_CONVERT_NAME,
                &payload.bytes,
            )
            .await
        }
        Err(e) => Err(e),
    };

    match result {
        Ok(path) => {
            let name = display_name(&path);
            ctx.feedback.log(&format!("SUCCESS: Downloaded {}", name));
            ctx.feedback.toast(&format!("CONVERTED: {}", name));
            Ok(path)
        }
        Err(e) => {
            ctx.feedback.log(&format!("ERROR: {}", e));
            ctx.feedback.toast(&format!("ERROR: {}", error_hint(&e.to_string())));
            Err(e)
        }
    }
}

/// Run a code formatter on `file`.
pub async fn format_code(
    ctx: &Context,
    kind: CodeKind,
    op: FormatOp,
    file: &DroppedFile,
) -> Result<PathBuf> {
    let endpoint = match format_endpoint(kind, op) {
        Ok(e) => e,
        Err(e) => {
            ctx.feedback.toast("INVALID ACTION");
            return Err(e);
        }
    };

    ctx.feedback.toast("PROCESSING...");
    let action = match op {
        FormatOp::Beautify => "beautify",
        FormatOp::Minify => "minify",
        FormatOp::ToPdf => "to-pdf",
    };
    let fields = vec![("action".to_string(), action.to_string())];

    let result = match ctx.client.post_file(endpoint, file, &fields, "Failed").await {
        Ok(payload) => {
            download::save(
                &ctx.output_dir,
                payload.suggested_name.as_deref(),
                download::DEFAULT_FORMAT_NAME,
                &payload.bytes,
            )
            .await
        }
        Err(e) => Err(e),
    };

    match result {
        Ok(path) => {
            ctx.feedback.toast("SUCCESS");
            Ok(path)
        }
        Err(e) => {
            ctx.feedback.toast(&format!("ERROR: {}", e));
            Err(e)
        }
    }
}

/// Translate `code` from `source` to `target`. Empty code is rejected
/// without a request.
pub async fn translate(
    ctx: &Context,
    source: &str,
    target: &str,
    code: &str,
    api_key: &str,
) -> Result<String> {
    if code.trim().is_empty() {
        let e = FormatrError::EmptyCode;
        ctx.feedback.toast(&e.to_string());
        return Err(e);
    }

    let request = TranslateRequest {
        source_lang: source.to_string(),
        target_lang: target.to_string(),
        code: code.to_string(),
        api_key: api_key.to_string(),
    };
    match ctx.client.translate(&request).await {
        Ok(result) => {
            ctx.feedback.toast("TRANSLATION COMPLETE");
            Ok(result)
        }
        Err(e @ FormatrError::Server { .. }) => {
            ctx.feedback.toast("FAILED");
            Err(e)
        }
        Err(e) => {
            ctx.feedback.toast(&format!("ERROR: {}", e));
            Err(e)
        }
    }
}

/// Probe the server and update the status line.
pub async fn check_health(ctx: &Context) -> ServerStatus {
    let status = if ctx.client.check_health().await {
        ServerStatus::Online
    } else {
        ServerStatus::Offline
    };
    ctx.feedback.set_status(status);
    status
}

pub async fn open_output_folder(ctx: &Context) -> Result<()> {
    ctx.client.open_output_folder().await.inspect_err(|e| {
        log::warn!("[TOOLS] open-output-folder failed: {}", e);
        ctx.feedback.log("ERROR: COULD NOT OPEN FOLDER");
    })
}

fn display_name(path: &std::path::Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}
