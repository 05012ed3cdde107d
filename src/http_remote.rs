use std::time::Duration;

use crate::{
    error::LandsatError,
    remote::{ArtifactStream, RemoteSource},
};
use reqwest::blocking::Client;

/// Plain HTTP GET access to the scene archive.
#[derive(Debug, Clone)]
pub struct HttpRemote {
    client: Client,
}

impl HttpRemote {
    /// Build a client whose requests give up after `timeout`, body transfer included.
    pub fn with_timeout(timeout: Duration) -> Result<Self, LandsatError> {
        let client = Client::builder().timeout(timeout).build()?;
        log::debug!("HTTP client ready, request timeout {:?}", timeout);

        Ok(Self { client })
    }

    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

impl RemoteSource for HttpRemote {
    fn open(&self, url: &str) -> Result<ArtifactStream, LandsatError> {
        let response = self.client.get(url).send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(LandsatError::HttpStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }

        Ok(Box::new(response))
    }
}
