use log::trace;
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;
use url::Url;
use xiangqi::error::DecisionError;
use xiangqi::protocol::DecisionService;

/// Posts decision requests with a blocking client on smol's thread pool.
#[derive(Clone, Debug)]
pub struct HttpDecisionService {
    client: Client,
}

impl HttpDecisionService {
    pub fn new(timeout: Duration) -> Result<Self, DecisionError> {
        let client = Client::builder().timeout(timeout).build().map_err(transport)?;
        Ok(Self { client })
    }
}

impl DecisionService for HttpDecisionService {
    async fn post(&self, endpoint: &Url, body: String) -> Result<String, DecisionError> {
        let client = self.client.clone();
        let endpoint = endpoint.clone();

        smol::unblock(move || {
            trace!("POST {endpoint} {body}");
            let response = client
                .post(endpoint)
                .header(CONTENT_TYPE, "application/json")
                .body(body)
                .send()
                .map_err(transport)?;

            let status = response.status();
            if !status.is_success() {
                return Err(DecisionError::Status(status.as_u16()));
            }

            response.text().map_err(transport)
        })
        .await
    }
}

fn transport(err: reqwest::Error) -> DecisionError {
    DecisionError::Transport(err.to_string())
}
