//! Shared handles passed to every handler: the HTTP client, the feedback
//! surface and the output directory.

use crate::client::FormatrClient;
use crate::config::ClientConfig;
use crate::error::Result;
use crate::feedback::Feedback;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Clone)]
pub struct Context {
    pub client: FormatrClient,
    pub feedback: Arc<Feedback>,
    pub output_dir: PathBuf,
}

impl Context {
    pub fn new(config: &ClientConfig, feedback: Arc<Feedback>) -> Result<Self> {
        Ok(Self {
            client: FormatrClient::new(&config.server_url)?,
            feedback,
            output_dir: config.output_dir.clone(),
        })
    }
}
