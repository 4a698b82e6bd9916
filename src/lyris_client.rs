use reqwest::Client;
use secrecy::Secret;
use std::time;

use crate::error::LyrisResult;
use crate::xml::{DatasetRequest, Reply};

const REQUEST_TIMEOUT: time::Duration = time::Duration::from_secs(10);
const API_PATH: &str = "/API/mailing_list.html";

/// HTTP transport of the mailing list API, holding the site credentials.
#[derive(Clone)]
pub struct LyrisClient {
    http_client: Client,
    base_url: String,
    site_id: u32,
    password: Secret<String>,
}

impl LyrisClient {
    pub fn new(
        base_url: String,
        site_id: u32,
        password: Secret<String>,
        timeout: Option<time::Duration>,
        accept_invalid_certs: bool,
    ) -> LyrisResult<LyrisClient> {
        let http_client = Client::builder()
            .timeout(timeout.unwrap_or(REQUEST_TIMEOUT))
            .danger_accept_invalid_certs(accept_invalid_certs)
            .build()?;

        Ok(LyrisClient {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            site_id,
            password,
        })
    }

    /// Posts a request document and returns the reply once it is marked successful.
    #[tracing::instrument(
        name = "Posting a request to the mailing list API",
        skip(self, request),
        fields(site_id = %self.site_id)
    )]
    pub async fn post(
        &self,
        request_type: &str,
        activity: &str,
        request: &DatasetRequest,
    ) -> LyrisResult<Reply> {
        let url = format!("{}{}", self.base_url, API_PATH);
        let input = request.to_xml(self.site_id, &self.password)?;

        let body = self
            .http_client
            .post(&url)
            .form(&[
                ("type", request_type),
                ("activity", activity),
                ("input", input.as_str()),
            ])
            .send()
            .await?
            .error_for_status()? // return an error when server response status code is 4xx or 5xx
            .text()
            .await?;

        Reply::parse(&body)?.into_success().map_err(|err| {
            tracing::error!("Mailing list API replied with an error: {:?}", err);
            err
        })
    }
}

impl std::fmt::Debug for LyrisClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LyrisClient")
            .field("base_url", &self.base_url)
            .field("site_id", &self.site_id)
            .finish()
    }
}
