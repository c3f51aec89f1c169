use reqwest::{Client, Method, Response};
use shared::VoteHistory;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    #[error("remote responded with status {0}")]
    Status(u16),
    #[error("transport error: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for RemoteError {
    fn from(e: reqwest::Error) -> Self {
        RemoteError::Transport(e.to_string())
    }
}

/// The voter and poll services as seen from the votes service.
#[rocket::async_trait]
pub trait ResourceService: Send + Sync {
    /// Succeeds when the resource at `addr` answers with a success status.
    async fn exists(&self, addr: &str) -> Result<(), RemoteError>;
    async fn append_history(&self, addr: &str, record: &VoteHistory) -> Result<(), RemoteError>;
    async fn replace_history(&self, addr: &str, record: &VoteHistory) -> Result<(), RemoteError>;
    async fn remove_history(&self, addr: &str, record: &VoteHistory) -> Result<(), RemoteError>;
}

#[derive(Debug, Clone, Default)]
pub struct HttpResourceService {
    client: Client,
}

impl HttpResourceService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    async fn send_history(&self, method: Method, addr: &str, record: &VoteHistory) -> Result<(), RemoteError> {
        debug!("{} {}", method, addr);
        let response = self.client.request(method, addr).json(record).send().await?;
        check_status(response)
    }
}

fn check_status(response: Response) -> Result<(), RemoteError> {
    let status = response.status();
    if status.is_success() {
        Ok(())
    } else {
        Err(RemoteError::Status(status.as_u16()))
    }
}

#[rocket::async_trait]
impl ResourceService for HttpResourceService {
    async fn exists(&self, addr: &str) -> Result<(), RemoteError> {
        debug!("GET {}", addr);
        let response = self.client.get(addr).send().await?;
        check_status(response)
    }

    async fn append_history(&self, addr: &str, record: &VoteHistory) -> Result<(), RemoteError> {
        self.send_history(Method::POST, addr, record).await
    }

    async fn replace_history(&self, addr: &str, record: &VoteHistory) -> Result<(), RemoteError> {
        self.send_history(Method::PUT, addr, record).await
    }

    async fn remove_history(&self, addr: &str, record: &VoteHistory) -> Result<(), RemoteError> {
        self.send_history(Method::DELETE, addr, record).await
    }
}
