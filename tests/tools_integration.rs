//! Standalone tools against a scripted server: generic convert, code
//! formatting, translation and health checks.

mod common;

use common::{FakeServer, Recorded, Reply};
use formatr_lib::config::ClientConfig;
use formatr_lib::context::Context;
use formatr_lib::error::FormatrError;
use formatr_lib::feedback::{Feedback, ServerStatus};
use formatr_lib::session::DroppedFile;
use formatr_lib::tools::{self, code_format::CodeKind, code_format::FormatOp};
use serde_json::json;
use std::sync::Arc;

async fn context<F>(handler: F) -> (FakeServer, Context, tempfile::TempDir)
where
    F: Fn(&Recorded) -> Reply + Send + Sync + 'static,
{
    let server = FakeServer::start(handler).await;
    let out = tempfile::tempdir().unwrap();
    let config = ClientConfig {
        server_url: server.url.clone(),
        output_dir: out.path().join("FORMATR_Output"),
    };
    let ctx = Context::new(&config, Arc::new(Feedback::default())).unwrap();
    (server, ctx, out)
}

fn toasts(ctx: &Context) -> String {
    ctx.feedback.toast_history().join("\n")
}

#[tokio::test]
async fn convert_posts_fields_and_saves_with_default_name() {
    let (server, ctx, _out) = context(|_| Reply::bytes(b"converted")).await;
    let file = DroppedFile::from_bytes("report.docx", b"docx bytes".to_vec());
    let fields = vec![("target_format".to_string(), "pdf".to_string())];

    let path = tools::convert(&ctx, "/api/convert/doc", Some(&file), &fields)
        .await
        .unwrap();

    assert_eq!(path.file_name().unwrap(), "output_file");
    assert!(path.parent().unwrap().ends_with("FORMATR_Output"));
    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].path, "/api/convert/doc");
    assert!(requests[0].body_text().contains("\r\n\r\npdf\r\n"));
    assert!(toasts(&ctx).contains("// CONVERTED: output_file"));
}

#[tokio::test]
async fn convert_without_file_sends_nothing() {
    let (server, ctx, _out) = context(|_| Reply::bytes(b"never")).await;

    let err = tools::convert(&ctx, "/api/convert/doc", None, &[]).await.unwrap_err();

    assert!(matches!(err, FormatrError::NoFile));
    assert!(server.requests().is_empty());
    assert!(toasts(&ctx).contains("PLEASE SELECT A FILE FIRST."));
}

#[tokio::test]
async fn convert_error_gets_libreoffice_hint() {
    let (_server, ctx, _out) =
        context(|_| Reply::json(500, json!({"detail": "soffice: not found"}))).await;
    let file = DroppedFile::from_bytes("a.doc", b"x".to_vec());

    let _ = tools::convert(&ctx, "/api/convert/doc", Some(&file), &[]).await;

    assert!(toasts(&ctx).contains("// ERROR: LIBREOFFICE NOT FOUND. PLEASE INSTALL IT."));
}

#[tokio::test]
async fn format_code_routes_by_kind_and_op() {
    let (server, ctx, _out) = context(|_| {
        Reply::bytes(b"body{}").header("Content-Disposition", "attachment; filename=style.min.css")
    })
    .await;
    let file = DroppedFile::from_bytes("style.css", b"body { }".to_vec());

    let path = tools::format_code(&ctx, CodeKind::Css, FormatOp::Minify, &file)
        .await
        .unwrap();

    assert_eq!(path.file_name().unwrap(), "style.min.css");
    let requests = server.requests();
    assert_eq!(requests[0].path, "/api/format/minify-css");
    assert!(requests[0].body_text().contains("\r\n\r\nminify\r\n"));
}

#[tokio::test]
async fn format_pdf_is_html_only() {
    let (server, ctx, _out) = context(|_| Reply::bytes(b"never")).await;
    let file = DroppedFile::from_bytes("app.js", b"let a".to_vec());

    let err = tools::format_code(&ctx, CodeKind::Js, FormatOp::ToPdf, &file)
        .await
        .unwrap_err();

    assert!(matches!(err, FormatrError::Usage(_)));
    assert!(server.requests().is_empty());
    assert!(toasts(&ctx).contains("// INVALID ACTION"));
}

#[tokio::test]
async fn translate_returns_result_text() {
    let (server, ctx, _out) =
        context(|_| Reply::json(200, json!({"result": "fn main() {}"}))).await;

    let out = tools::translate(&ctx, "python", "rust", "print()", "key-1")
        .await
        .unwrap();

    assert_eq!(out, "fn main() {}");
    let body: serde_json::Value = serde_json::from_slice(&server.requests()[0].body).unwrap();
    assert_eq!(body["source_lang"], "python");
    assert_eq!(body["target_lang"], "rust");
    assert_eq!(body["api_key"], "key-1");
    assert!(toasts(&ctx).contains("// TRANSLATION COMPLETE"));
}

#[tokio::test]
async fn translate_rejects_blank_code() {
    let (server, ctx, _out) = context(|_| Reply::json(200, json!({"result": "x"}))).await;

    let err = tools::translate(&ctx, "python", "rust", "   ", "").await.unwrap_err();
    assert!(matches!(err, FormatrError::EmptyCode));
    assert_eq!(err.to_string(), "PLEASE ENTER CODE");
    assert!(server.requests().is_empty());
    assert!(toasts(&ctx).contains("// PLEASE ENTER CODE"));
}

#[tokio::test]
async fn health_reflects_server_status() {
    let (_server, ctx, _out) = context(|r| match r.path.as_str() {
        "/api/status" => Reply::json(200, json!({"status": "running"})),
        _ => Reply::json(404, json!({})),
    })
    .await;
    assert_eq!(tools::check_health(&ctx).await, ServerStatus::Online);
    assert_eq!(ctx.feedback.status(), ServerStatus::Online);

    let (_server, ctx, _out) =
        context(|_| Reply::json(200, json!({"status": "starting"}))).await;
    assert_eq!(tools::check_health(&ctx).await, ServerStatus::Offline);
}

#[tokio::test]
async fn unreachable_server_is_offline() {
    let config = ClientConfig {
        server_url: "http://127.0.0.1:1".into(),
        output_dir: std::env::temp_dir(),
    };
    let ctx = Context::new(&config, Arc::new(Feedback::default())).unwrap();
    assert_eq!(tools::check_health(&ctx).await, ServerStatus::Offline);
    assert_eq!(ServerStatus::Offline.label(), "OFFLINE");
}
