use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use hookpack_core::{InstallerConfig, InstallerError};
use reqwest::blocking::Client;
use reqwest::header::LOCATION;
use reqwest::redirect::Policy;
use reqwest::Url;
use tracing::{debug, info, warn};

use crate::fs_utils::{make_executable, remove_file_if_exists, staging_path_for};

pub const DEFAULT_MAX_REDIRECTS: u32 = 5;
const READ_BUFFER_SIZE: usize = 64 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadPolicy {
    pub max_attempts: u32,
    pub retry_delay: Duration,
    pub max_redirects: u32,
    /// Bound on the whole fetch: every attempt, hop and retry sleep.
    pub timeout: Option<Duration>,
}

impl Default for DownloadPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            retry_delay: Duration::from_millis(50),
            max_redirects: DEFAULT_MAX_REDIRECTS,
            timeout: None,
        }
    }
}

impl DownloadPolicy {
    pub fn from_config(config: &InstallerConfig) -> Self {
        Self {
            max_attempts: config.download_attempts,
            retry_delay: config.retry_delay,
            max_redirects: DEFAULT_MAX_REDIRECTS,
            timeout: config.download_timeout,
        }
    }
}

/// State of one `fetch` call. Dropped on success or terminal failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadJob {
    pub source_url: String,
    pub destination_path: PathBuf,
    pub attempts_remaining: u32,
    pub redirect_hops_followed: u32,
}

enum AttemptError {
    Retry(String),
    Fatal(InstallerError),
}

#[derive(Debug, Clone, Copy)]
struct Deadline {
    at: Instant,
    limit: Duration,
}

/// Fetches one remote artifact to a local path.
///
/// No caching: callers check whether the destination already exists.
pub struct Downloader {
    client: Client,
    policy: DownloadPolicy,
}

impl Downloader {
    /// At least one attempt is always made.
    pub fn new(mut policy: DownloadPolicy) -> Result<Self> {
        policy.max_attempts = policy.max_attempts.max(1);
        let client = Client::builder()
            .redirect(Policy::none())
            .user_agent(concat!("hookpack/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self { client, policy })
    }

    pub fn fetch<F>(
        &self,
        url: &str,
        destination: &Path,
        mut on_progress: F,
    ) -> Result<PathBuf, InstallerError>
    where
        F: FnMut(u64, Option<u64>),
    {
        let deadline = self.policy.timeout.map(|limit| Deadline {
            at: Instant::now() + limit,
            limit,
        });
        let mut job = DownloadJob {
            source_url: url.to_string(),
            destination_path: destination.to_path_buf(),
            attempts_remaining: self.policy.max_attempts,
            redirect_hops_followed: 0,
        };

        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent).map_err(|err| InstallerError::DownloadFailed {
                url: url.to_string(),
                attempts: 0,
                cause: format!("failed to create {}: {err}", parent.display()),
            })?;
        }
        let staging_path = staging_path_for(destination);

        loop {
            job.attempts_remaining -= 1;
            let attempt = self.policy.max_attempts - job.attempts_remaining;
            info!(url = %job.source_url, attempt, "downloading");

            let cause = match self.attempt(&mut job, &staging_path, deadline, &mut on_progress) {
                Ok(()) => return self.commit(&job, &staging_path, attempt),
                Err(AttemptError::Fatal(err)) => {
                    let _ = remove_file_if_exists(&staging_path);
                    return Err(err);
                }
                Err(AttemptError::Retry(cause)) => {
                    let _ = remove_file_if_exists(&staging_path);
                    cause
                }
            };

            if job.attempts_remaining == 0 {
                return Err(InstallerError::DownloadFailed {
                    url: job.source_url,
                    attempts: attempt,
                    cause,
                });
            }

            warn!(url = %job.source_url, attempt, %cause, "download attempt failed; retrying");
            let delay = match remaining(deadline) {
                Some(left) => self.policy.retry_delay.min(left),
                None => self.policy.retry_delay,
            };
            thread::sleep(delay);
            if let Err(AttemptError::Fatal(err)) = check_deadline(deadline, &job.source_url) {
                return Err(err);
            }
        }
    }

    fn attempt<F>(
        &self,
        job: &mut DownloadJob,
        staging_path: &Path,
        deadline: Option<Deadline>,
        on_progress: &mut F,
    ) -> Result<(), AttemptError>
    where
        F: FnMut(u64, Option<u64>),
    {
        job.redirect_hops_followed = 0;
        let mut current = Url::parse(&job.source_url).map_err(|err| {
            AttemptError::Fatal(InstallerError::DownloadFailed {
                url: job.source_url.clone(),
                attempts: 0,
                cause: format!("invalid URL: {err}"),
            })
        })?;

        loop {
            let mut request = self.client.get(current.clone());
            if let Some(left) = check_deadline(deadline, &job.source_url)? {
                request = request.timeout(left);
            }

            let mut response = request
                .send()
                .map_err(|err| classify_request_error(err, deadline, &job.source_url))?;
            let status = response.status();

            if status.is_redirection() {
                let location = response
                    .headers()
                    .get(LOCATION)
                    .ok_or_else(|| {
                        AttemptError::Retry(format!("HTTP {status} from {current} without Location"))
                    })?
                    .to_str()
                    .map_err(|err| {
                        AttemptError::Retry(format!(
                            "HTTP {status} from {current} with invalid Location header: {err}"
                        ))
                    })?;
                if job.redirect_hops_followed >= self.policy.max_redirects {
                    return Err(AttemptError::Fatal(InstallerError::TooManyRedirects {
                        url: job.source_url.clone(),
                        limit: self.policy.max_redirects,
                    }));
                }
                let next = current.join(location).map_err(|err| {
                    AttemptError::Retry(format!("invalid redirect location '{location}': {err}"))
                })?;
                job.redirect_hops_followed += 1;
                debug!(from = %current, to = %next, hop = job.redirect_hops_followed, "following redirect");
                current = next;
                continue;
            }

            if !status.is_success() {
                return Err(AttemptError::Retry(format!(
                    "unexpected HTTP status {status} from {current}"
                )));
            }

            let total = response.content_length();
            let mut file = File::create(staging_path).map_err(|err| {
                AttemptError::Retry(format!(
                    "failed to create {}: {err}",
                    staging_path.display()
                ))
            })?;

            let mut buffer = vec![0_u8; READ_BUFFER_SIZE];
            let mut downloaded = 0_u64;
            on_progress(0, total);
            loop {
                let read = response
                    .read(&mut buffer)
                    .map_err(|err| classify_stream_error(err, deadline, &job.source_url))?;
                if read == 0 {
                    break;
                }
                file.write_all(&buffer[..read]).map_err(|err| {
                    AttemptError::Retry(format!(
                        "failed to write {}: {err}",
                        staging_path.display()
                    ))
                })?;
                downloaded += read as u64;
                on_progress(downloaded, total);
            }

            if let Some(expected) = total {
                if downloaded != expected {
                    return Err(AttemptError::Retry(format!(
                        "truncated body: received {downloaded} of {expected} bytes"
                    )));
                }
            }
            file.sync_all().map_err(|err| {
                AttemptError::Retry(format!(
                    "failed to flush {}: {err}",
                    staging_path.display()
                ))
            })?;
            return Ok(());
        }
    }

    fn commit(
        &self,
        job: &DownloadJob,
        staging_path: &Path,
        attempts: u32,
    ) -> Result<PathBuf, InstallerError> {
        let failed = |cause: String| InstallerError::DownloadFailed {
            url: job.source_url.clone(),
            attempts,
            cause,
        };

        if let Err(err) = fs::rename(staging_path, &job.destination_path) {
            let _ = remove_file_if_exists(staging_path);
            return Err(failed(format!(
                "failed to move download into place at {}: {err}",
                job.destination_path.display()
            )));
        }
        make_executable(&job.destination_path).map_err(|err| {
            failed(format!(
                "failed to mark {} executable: {err}",
                job.destination_path.display()
            ))
        })?;

        info!(
            url = %job.source_url,
            path = %job.destination_path.display(),
            attempts,
            hops = job.redirect_hops_followed,
            "download committed"
        );
        Ok(job.destination_path.clone())
    }
}

fn remaining(deadline: Option<Deadline>) -> Option<Duration> {
    deadline.map(|deadline| deadline.at.saturating_duration_since(Instant::now()))
}

fn check_deadline(deadline: Option<Deadline>, url: &str) -> Result<Option<Duration>, AttemptError> {
    match (deadline, remaining(deadline)) {
        (Some(deadline), Some(left)) if left.is_zero() => {
            Err(AttemptError::Fatal(InstallerError::DeadlineExceeded {
                url: url.to_string(),
                limit: deadline.limit,
            }))
        }
        (_, left) => Ok(left),
    }
}

fn classify_request_error(
    err: reqwest::Error,
    deadline: Option<Deadline>,
    url: &str,
) -> AttemptError {
    if err.is_timeout() {
        if let Err(fatal) = check_deadline(deadline, url) {
            return fatal;
        }
    }
    AttemptError::Retry(format!("request failed: {err}"))
}

fn classify_stream_error(err: std::io::Error, deadline: Option<Deadline>, url: &str) -> AttemptError {
    if let Err(fatal) = check_deadline(deadline, url) {
        return fatal;
    }
    AttemptError::Retry(format!("connection interrupted: {err}"))
}
