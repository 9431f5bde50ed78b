//! The entry sequence: link up → authenticate → post → link down.
//!
//! Each stage is a hard prerequisite for the next, so the sequence fails
//! fast: a link failure stops before any HTTP traffic, and an
//! authentication failure stops before posting. Nothing is retried here;
//! the only retries are the link manager's reconnects.

use std::time::Duration;

use skypost_link::{LinkManager, RadioDriver};
use skypost_session::{ClientResponse, Session, SessionClient};
use skypost_transport::HttpTransport;

use crate::SkypostError;

/// Settings for a [`Sequencer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequencerConfig {
    /// How long to keep the link up after a successful post before tearing
    /// it down.
    pub linger: Duration,
}

impl Default for SequencerConfig {
    fn default() -> Self {
        Self {
            linger: Duration::from_secs(1),
        }
    }
}

/// Builder for a [`Sequencer`].
///
/// # Example
///
/// ```rust,no_run
/// use skypost::prelude::*;
///
/// # fn build() -> Result<(), SkypostError> {
/// let transport = ReqwestTransport::new(TransportConfig::default())?;
/// let sequencer = Sequencer::builder()
///     .link(LinkManager::new(HostDriver::new(), LinkConfig::default()))
///     .client(SessionClient::new(transport, SessionConfig::default()))
///     .build()?;
/// # let _ = sequencer;
/// # Ok(())
/// # }
/// ```
pub struct SequencerBuilder<D: RadioDriver, T: HttpTransport> {
    link: Option<LinkManager<D>>,
    client: Option<SessionClient<T>>,
    config: SequencerConfig,
}

impl<D: RadioDriver, T: HttpTransport> SequencerBuilder<D, T> {
    /// Creates a builder with default settings and no components.
    pub fn new() -> Self {
        Self {
            link: None,
            client: None,
            config: SequencerConfig::default(),
        }
    }

    /// Sets the link manager.
    pub fn link(mut self, link: LinkManager<D>) -> Self {
        self.link = Some(link);
        self
    }

    /// Sets the session client.
    pub fn client(mut self, client: SessionClient<T>) -> Self {
        self.client = Some(client);
        self
    }

    /// Replaces the whole configuration.
    pub fn config(mut self, config: SequencerConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the delay between posting and teardown.
    pub fn linger(mut self, linger: Duration) -> Self {
        self.config.linger = linger;
        self
    }

    /// Builds the sequencer.
    ///
    /// # Errors
    /// [`SkypostError::Config`] if the link or client is missing.
    pub fn build(self) -> Result<Sequencer<D, T>, SkypostError> {
        let link = self
            .link
            .ok_or_else(|| SkypostError::Config("no link manager set".into()))?;
        let client = self
            .client
            .ok_or_else(|| SkypostError::Config("no session client set".into()))?;
        Ok(Sequencer {
            link,
            client,
            config: self.config,
        })
    }
}

impl<D: RadioDriver, T: HttpTransport> Default for SequencerBuilder<D, T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs one authenticate-then-post sequence over a fresh link.
pub struct Sequencer<D: RadioDriver, T: HttpTransport> {
    link: LinkManager<D>,
    client: SessionClient<T>,
    config: SequencerConfig,
}

impl<D: RadioDriver, T: HttpTransport> Sequencer<D, T> {
    /// Returns a new builder.
    pub fn builder() -> SequencerBuilder<D, T> {
        SequencerBuilder::new()
    }

    pub fn link(&self) -> &LinkManager<D> {
        &self.link
    }

    pub fn client(&self) -> &SessionClient<T> {
        &self.client
    }

    pub fn config(&self) -> &SequencerConfig {
        &self.config
    }

    /// Brings the link up, authenticates `session`, and posts
    /// `record_json`.
    ///
    /// Returns the post response, which is always 2xx: a non-success
    /// status is turned into [`ClientError::HttpStatus`](skypost_session::ClientError::HttpStatus).
    ///
    /// Once the link is up it is torn down again whatever the outcome,
    /// after lingering for [`SequencerConfig::linger`] if the post
    /// succeeded. A teardown failure is logged and does not change the
    /// result.
    ///
    /// If posting fails after authentication succeeded, `session` keeps
    /// its credentials so the caller may retry.
    pub async fn run(
        &self,
        session: &mut Session,
        handle: &str,
        password: &str,
        record_json: &str,
    ) -> Result<ClientResponse, SkypostError> {
        self.link.bring_up().await?;
        tracing::info!("link up, authenticating");

        let result = self
            .exchange(session, handle, password, record_json)
            .await;

        if result.is_ok() && !self.config.linger.is_zero() {
            tokio::time::sleep(self.config.linger).await;
        }
        if let Err(e) = self.link.tear_down() {
            tracing::error!(error = %e, "link teardown failed");
        }

        result
    }

    async fn exchange(
        &self,
        session: &mut Session,
        handle: &str,
        password: &str,
        record_json: &str,
    ) -> Result<ClientResponse, SkypostError> {
        self.client
            .authenticate(session, handle, password)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "login failed"))?;

        tracing::info!("posting");
        let response = self
            .client
            .post(session, record_json)
            .await
            .and_then(ClientResponse::error_for_status)
            .inspect_err(|e| {
                tracing::error!(error = %e, status = e.status(), "post failed");
            })?;
        Ok(response)
    }
}
