use crate::error::Result;

/// Sends a serialized capture body to the collector
pub trait Transport: Send + Sync {
    /// POST `body` as JSON to `url`, returning the HTTP status on success
    fn post_json(&self, url: &str, body: &[u8]) -> Result<u16>;
}

/// Blocking transport backed by ureq
#[derive(Debug, Clone, Copy, Default)]
pub struct UreqTransport;

impl Transport for UreqTransport {
    fn post_json(&self, url: &str, body: &[u8]) -> Result<u16> {
        let response = ureq::post(url)
            .header("Content-Type", "application/json")
            .send(body)?;

        Ok(response.status().as_u16())
    }
}
