//! Action registry: maps analyzer action ids to server endpoints.
//!
//! The table is fixed at build time. Each route names its endpoint, the
//! form fields that are always sent, and the fields the user may supply.
//! Ids that are not in the table but start with `extract` go to the
//! generic image extraction endpoint; anything else is not linked.

use super::fields::{FieldInputs, FieldSpec, Rule};
use crate::error::{FormatrError, Result};

/// Endpoint for unregistered `extract*` actions.
pub const EXTRACT_FALLBACK_ENDPOINT: &str = "/api/extract/images";
const EXTRACT_PREFIX: &str = "extract";

/// One registered action.
#[derive(Debug, Clone, Copy)]
pub struct ActionRoute {
    pub id: &'static str,
    pub endpoint: &'static str,
    /// Form fields sent verbatim with every request.
    pub fixed: &'static [(&'static str, &'static str)],
    /// Form fields the user may fill in.
    pub fields: &'static [FieldSpec],
}

/// The outcome of resolving an action: where to POST and what to send
/// alongside the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAction {
    pub action_id: String,
    pub endpoint: String,
    pub fields: Vec<(String, String)>,
}

const fn route(id: &'static str, endpoint: &'static str) -> ActionRoute {
    ActionRoute {
        id,
        endpoint,
        fixed: &[],
        fields: &[],
    }
}

const IMAGE_FORMAT: FieldSpec = FieldSpec {
    name: "target_format",
    label: "Format",
    default: "png",
    rule: Rule::Choice(&["png", "jpg", "webp", "pdf"]),
};

const RESIZE_PERCENT: FieldSpec = FieldSpec {
    name: "percentage",
    label: "Scale (%)",
    default: "50",
    rule: Rule::Range { min: 1, max: 100 },
};

const TARGET_SIZE_KB: FieldSpec = FieldSpec {
    name: "size_kb",
    label: "Target Size (KB)",
    default: "500",
    rule: Rule::Range { min: 1, max: 1_048_576 },
};

const VIDEO_FORMAT: FieldSpec = FieldSpec {
    name: "target_format",
    label: "Target format",
    default: "mp4",
    rule: Rule::Choice(&["mp4", "mkv", "avi"]),
};

const AUDIO_FORMAT: FieldSpec = FieldSpec {
    name: "target_format",
    label: "Target format",
    default: "mp3",
    rule: Rule::Choice(&["mp3", "wav"]),
};

const ARCHIVE_FORMAT: FieldSpec = FieldSpec {
    name: "target_format",
    label: "Target format",
    default: "zip",
    rule: Rule::Choice(&["zip", "tar", "gztar"]),
};

const CONFIG_FORMAT: FieldSpec = FieldSpec {
    name: "target_format",
    label: "Target format",
    default: "json",
    rule: Rule::Choice(&["json", "yaml", "xml"]),
};

const GIF_FPS: FieldSpec = FieldSpec {
    name: "fps",
    label: "FPS (5-15 recommended)",
    default: "10",
    rule: Rule::Range { min: 1, max: 60 },
};

const GIF_WIDTH: FieldSpec = FieldSpec {
    name: "width",
    label: "Width in pixels (480-720 recommended)",
    default: "480",
    rule: Rule::Range { min: 16, max: 4096 },
};

static BUILTIN_ROUTES: &[ActionRoute] = &[
    // Images
    ActionRoute {
        fields: &[IMAGE_FORMAT],
        ..route("convert_image", "/api/convert/image")
    },
    route("image_to_pdf", "/api/convert/image-to-pdf"),
    route("image_to_docx", "/api/convert/image-to-docx"),
    ActionRoute {
        fields: &[RESIZE_PERCENT],
        ..route("resize_image", "/api/resize/image")
    },
    ActionRoute {
        fields: &[TARGET_SIZE_KB],
        ..route("compress_image", "/api/compress/image")
    },
    // Documents
    ActionRoute {
        fixed: &[("level", "medium")],
        ..route("compress_pdf", "/api/compress/pdf")
    },
    ActionRoute {
        fixed: &[("format", "png")],
        ..route("pdf_to_image", "/api/convert/pdf-to-image")
    },
    ActionRoute {
        fixed: &[("target_format", "pdf")],
        ..route("doc_to_pdf", "/api/convert/doc")
    },
    // Audio / video
    ActionRoute {
        fixed: &[("format", "mp3")],
        ..route("extract_audio", "/api/extract/audio")
    },
    ActionRoute {
        fields: &[VIDEO_FORMAT],
        ..route("convert_video", "/api/convert/media")
    },
    ActionRoute {
        fields: &[AUDIO_FORMAT],
        ..route("convert_audio", "/api/convert/media")
    },
    ActionRoute {
        fields: &[GIF_FPS, GIF_WIDTH],
        ..route("video_to_gif", "/api/convert/video-to-gif")
    },
    // Archives
    ActionRoute {
        fields: &[ARCHIVE_FORMAT],
        ..route("convert_archive", "/api/convert/archive")
    },
    route("7z_to_zip", "/api/convert/7z-to-zip"),
    // Developer
    route("md_to_pdf", "/api/dev/md-to-pdf"),
    ActionRoute {
        fields: &[CONFIG_FORMAT],
        ..route("convert_config", "/api/dev/convert-config")
    },
    ActionRoute {
        fixed: &[("action", "encode")],
        ..route("base64_encode", "/api/dev/base64")
    },
    ActionRoute {
        fixed: &[("action", "decode")],
        ..route("base64_decode", "/api/dev/base64")
    },
    // Data
    route("csv_to_json", "/api/convert/csv-to-json"),
    route("json_to_csv", "/api/convert/json-to-csv"),
    route("csv_to_excel", "/api/convert/csv-to-excel"),
    route("excel_to_csv", "/api/convert/excel-to-csv"),
    route("excel_to_json", "/api/convert/excel-to-json"),
    route("xls_to_xlsx", "/api/convert/xls-to-xlsx"),
    // Office
    route("extract_pptx_images", "/api/extract/pptx-images"),
    route("extract_pptx_text", "/api/extract/pptx-text"),
    route("pptx_info", "/api/info/pptx"),
    // Config files
    route("toml_to_json", "/api/convert/toml-to-json"),
    route("toml_to_yaml", "/api/convert/toml-to-yaml"),
    route("env_to_json", "/api/convert/env-to-json"),
    route("validate_env", "/api/validate/env"),
    // Web / code
    route("beautify_js", "/api/format/beautify-js"),
    route("minify_js", "/api/format/minify-js"),
    route("beautify_css", "/api/format/beautify-css"),
    route("minify_css", "/api/format/minify-css"),
    route("beautify_html", "/api/format/beautify-html"),
    route("minify_html", "/api/format/minify-html"),
    route("html_to_pdf", "/api/convert/html-to-pdf"),
];

/// Static lookup table from action id to route.
#[derive(Debug, Clone, Copy)]
pub struct ActionRegistry {
    routes: &'static [ActionRoute],
}

impl Default for ActionRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ActionRegistry {
    /// The registry shipped with the client.
    pub fn builtin() -> Self {
        Self {
            routes: BUILTIN_ROUTES,
        }
    }

    pub fn get(&self, action_id: &str) -> Option<&'static ActionRoute> {
        self.routes.iter().find(|r| r.id == action_id)
    }

    pub fn routes(&self) -> &'static [ActionRoute] {
        self.routes
    }

    /// User-supplied fields for an action (empty for fallback or unknown ids).
    pub fn fields_for(&self, action_id: &str) -> &'static [FieldSpec] {
        self.get(action_id).map(|r| r.fields).unwrap_or(&[])
    }

    /// Resolve an action id and validate the user's inputs.
    ///
    /// Fails with `NotLinked` for unknown ids outside the `extract` family,
    /// and with `InvalidField` when a supplied value breaks its rule.
    /// Neither failure sends anything.
    pub fn resolve(&self, action_id: &str, inputs: &FieldInputs) -> Result<ResolvedAction> {
        let Some(route) = self.get(action_id) else {
            if action_id.starts_with(EXTRACT_PREFIX) {
                log::info!("[RESOLVE] '{}' → extraction fallback", action_id);
                return Ok(ResolvedAction {
                    action_id: action_id.to_string(),
                    endpoint: EXTRACT_FALLBACK_ENDPOINT.to_string(),
                    fields: Vec::new(),
                });
            }
            log::warn!("[RESOLVE] '{}' is not linked to an endpoint", action_id);
            return Err(FormatrError::NotLinked(action_id.to_string()));
        };

        for key in inputs.keys() {
            if !route.fields.iter().any(|f| f.name == key) {
                log::warn!("[RESOLVE] Ignoring unknown field '{}' for {}", key, action_id);
            }
        }

        let mut fields: Vec<(String, String)> = route
            .fixed
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        for spec in route.fields {
            let value = spec.validate(inputs.get(spec.name).map(String::as_str))?;
            fields.push((spec.name.to_string(), value));
        }

        Ok(ResolvedAction {
            action_id: action_id.to_string(),
            endpoint: route.endpoint.to_string(),
            fields,
        })
    }
}
