//! Code formatter routing for the JS / CSS / HTML tools.

use crate::error::{FormatrError, Result};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeKind {
    Js,
    Css,
    Html,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatOp {
    Beautify,
    Minify,
    /// Only meaningful for HTML.
    ToPdf,
}

impl FromStr for CodeKind {
    type Err = FormatrError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "js" | "javascript" => Ok(Self::Js),
            "css" => Ok(Self::Css),
            "html" | "htm" => Ok(Self::Html),
            other => Err(FormatrError::usage(format!("unknown code kind '{}'", other))),
        }
    }
}

impl FromStr for FormatOp {
    type Err = FormatrError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "beautify" => Ok(Self::Beautify),
            "minify" => Ok(Self::Minify),
            "to-pdf" => Ok(Self::ToPdf),
            _ => Err(FormatrError::usage("INVALID ACTION")),
        }
    }
}

/// Endpoint for a formatter request. `ToPdf` is only routed for HTML.
pub fn format_endpoint(kind: CodeKind, op: FormatOp) -> Result<&'static str> {
    let url = match (kind, op) {
        (CodeKind::Js, FormatOp::Beautify) => "/api/format/beautify-js",
        (CodeKind::Js, FormatOp::Minify) => "/api/format/minify-js",
        (CodeKind::Css, FormatOp::Beautify) => "/api/format/beautify-css",
        (CodeKind::Css, FormatOp::Minify) => "/api/format/minify-css",
        (CodeKind::Html, FormatOp::Beautify) => "/api/format/beautify-html",
        (CodeKind::Html, FormatOp::Minify) => "/api/format/minify-html",
        (CodeKind::Html, FormatOp::ToPdf) => "/api/convert/html-to-pdf",
        (_, FormatOp::ToPdf) => return Err(FormatrError::usage("INVALID ACTION")),
    };
    Ok(url)
}
