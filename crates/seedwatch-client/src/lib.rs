#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![allow(clippy::module_name_repetitions)]

//! Typed HTTP client for the job-control backend.
//!
//! One method per boundary operation: job snapshot refresh, capability
//! probe, install attempt, submission (magnet or uploaded file), and
//! per-job control commands. Each call issues exactly one request; retry
//! policy belongs to the caller.

pub mod error;

use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, Url};
use serde::{Deserialize, Serialize};

use seedwatch_core::{CapabilityReport, JobAction, JobSet};

pub use error::{ClientError, ClientResult};

/// Acknowledgement returned by mutating endpoints.
#[derive(Debug, Clone)]
pub struct Ack {
    /// Backend-provided human-readable outcome.
    pub message: String,
    /// Identifier of the job created by a submission, when the backend
    /// returns one.
    pub download_id: Option<String>,
}

#[derive(Debug, Serialize)]
struct MagnetSubmission<'a> {
    magnet_link: &'a str,
}

#[derive(Debug, Deserialize)]
struct AckPayload {
    success: bool,
    #[serde(default)]
    message: String,
    #[serde(default)]
    download_id: Option<String>,
}

/// HTTP client bound to one backend instance.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
}

impl ApiClient {
    /// Build a client with the given per-request timeout.
    ///
    /// The timeout bounds how long a hung request can hold the refresh gate;
    /// there is no retry and no request cancellation beyond it.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be constructed.
    pub fn new(base_url: Url, timeout: Duration) -> ClientResult<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| ClientError::Transport {
                operation: "client_build",
                source,
            })?;
        Ok(Self::from_parts(http, base_url))
    }

    /// Wrap an existing reqwest client.
    #[must_use]
    pub const fn from_parts(http: Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    /// Base URL this client is bound to.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Fetch the full job snapshot (`GET /get_downloads`).
    ///
    /// # Errors
    ///
    /// `Transport` on network/HTTP failure, `MalformedResponse` when the
    /// body is not a job map.
    pub async fn fetch_jobs(&self) -> ClientResult<JobSet> {
        const OPERATION: &str = "refresh";
        let url = self.endpoint("/get_downloads", OPERATION)?;
        let response = self.send_get(url, OPERATION).await?;
        let jobs = response
            .json::<JobSet>()
            .await
            .map_err(|source| ClientError::MalformedResponse {
                operation: OPERATION,
                source,
            })?;
        tracing::debug!(jobs = jobs.len(), "job snapshot fetched");
        Ok(jobs)
    }

    /// Probe backend capability (`GET /system_check`).
    ///
    /// # Errors
    ///
    /// `Transport` on network/HTTP failure, `MalformedResponse` on an
    /// undecodable report.
    pub async fn probe(&self) -> ClientResult<CapabilityReport> {
        const OPERATION: &str = "probe";
        let url = self.endpoint("/system_check", OPERATION)?;
        let response = self.send_get(url, OPERATION).await?;
        response
            .json::<CapabilityReport>()
            .await
            .map_err(|source| ClientError::MalformedResponse {
                operation: OPERATION,
                source,
            })
    }

    /// Ask the backend to install its recommended download engine
    /// (`GET /install_aria2c`).
    ///
    /// # Errors
    ///
    /// `Application` when the backend reports the attempt failed, plus the
    /// usual transport/decode failures.
    pub async fn install_downloader(&self) -> ClientResult<Ack> {
        const OPERATION: &str = "install";
        let url = self.endpoint("/install_aria2c", OPERATION)?;
        let response = self.send_get(url, OPERATION).await?;
        Self::ack(response, OPERATION).await
    }

    /// Submit a magnet link (`POST /add_torrent`).
    ///
    /// # Errors
    ///
    /// `Application` when the backend rejects the link, plus the usual
    /// transport/decode failures.
    pub async fn add_magnet(&self, magnet: &str) -> ClientResult<Ack> {
        const OPERATION: &str = "submit";
        let url = self.endpoint("/add_torrent", OPERATION)?;
        let response = self
            .http
            .post(url)
            .json(&MagnetSubmission { magnet_link: magnet })
            .send()
            .await
            .map_err(|source| ClientError::Transport {
                operation: OPERATION,
                source,
            })?;
        Self::ack(response, OPERATION).await
    }

    /// Upload a `.torrent` file (`POST /upload_torrent`, multipart field
    /// `torrent_file`).
    ///
    /// # Errors
    ///
    /// `Application` when the backend rejects the file, plus the usual
    /// transport/decode failures.
    pub async fn upload_torrent(&self, file_name: &str, bytes: Vec<u8>) -> ClientResult<Ack> {
        const OPERATION: &str = "submit";
        let url = self.endpoint("/upload_torrent", OPERATION)?;
        let part = Part::bytes(bytes).file_name(file_name.to_string());
        let form = Form::new().part("torrent_file", part);
        let response = self
            .http
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(|source| ClientError::Transport {
                operation: OPERATION,
                source,
            })?;
        Self::ack(response, OPERATION).await
    }

    /// Send one control command for one job
    /// (`GET /control_download/{id}/{action}`).
    ///
    /// # Errors
    ///
    /// `Application` when the backend refuses the command, plus the usual
    /// transport/decode failures.
    pub async fn control(&self, id: &str, action: JobAction) -> ClientResult<Ack> {
        const OPERATION: &str = "dispatch";
        let path = format!("/control_download/{id}/{}", action.as_str());
        let url = self.endpoint(&path, OPERATION)?;
        let response = self.send_get(url, OPERATION).await?;
        Self::ack(response, OPERATION).await
    }

    fn endpoint(&self, path: &str, operation: &'static str) -> ClientResult<Url> {
        self.base_url
            .join(path)
            .map_err(|source| ClientError::InvalidUrl { operation, source })
    }

    async fn send_get(&self, url: Url, operation: &'static str) -> ClientResult<Response> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|source| ClientError::Transport { operation, source })?;
        response
            .error_for_status()
            .map_err(|source| ClientError::Transport { operation, source })
    }

    async fn ack(response: Response, operation: &'static str) -> ClientResult<Ack> {
        let response = response
            .error_for_status()
            .map_err(|source| ClientError::Transport { operation, source })?;
        let payload =
            response
                .json::<AckPayload>()
                .await
                .map_err(|source| ClientError::MalformedResponse { operation, source })?;
        if payload.success {
            Ok(Ack {
                message: payload.message,
                download_id: payload.download_id,
            })
        } else {
            Err(ClientError::Application {
                operation,
                message: payload.message,
            })
        }
    }
}
