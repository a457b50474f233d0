use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{blocking::Client, redirect::Policy, Proxy};
use tracing::debug;

use crate::config::HttpConfig;

/// Blocking HTTP session used to fetch remote archives.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let mut builder = Client::builder()
            .user_agent(config.user_agent.as_str())
            .redirect(Policy::limited(config.max_redirects))
            .timeout(Duration::from_secs(config.timeout_secs));

        if !config.use_env_proxies {
            builder = builder.no_proxy();
        }
        if let Some(proxy) = &config.proxy {
            builder = builder.proxy(Proxy::all(proxy)
                .with_context(|| format!("[download] Invalid proxy URL: {proxy}"))?);
        }

        let client = builder.build().context("[download] Failed to build HTTP client")?;
        Ok(Self { client })
    }

    /// GET `url` and return the whole body. Non-2xx statuses are errors.
    pub fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>> {
        debug!("GET {}", url);
        let resp = self.client.get(url)
            .send()
            .with_context(|| format!("GET {url}"))?
            .error_for_status()
            .with_context(|| format!("GET {url} returned error status"))?;

        let bytes = resp.bytes().with_context(|| format!("read body of {url}"))?;
        debug!("GET {} -> {} bytes", url, bytes.len());
        Ok(bytes.to_vec())
    }
}
