//! gloo-net transport for the CryptoHub REST API.
//!
//! Every request races a timer; when the timer wins the fetch is aborted
//! through its `AbortController` and the caller sees `TransportError::Timeout`.

use cryptohub_session::transport::{ApiRequest, ApiResponse, HttpTransport, Method};
use cryptohub_session::{ApiClient, ClientConfig, TransportError};
use futures::future::{select, Either};
use gloo_net::http::Request;
use gloo_timers::future::TimeoutFuture;
use web_sys::AbortController;

use crate::storage::BrowserStore;

/// REST client wired to the browser.
pub type Client = ApiClient<GlooTransport, BrowserStore>;

#[derive(Debug, Clone)]
pub struct GlooTransport {
    config: ClientConfig,
}

impl GlooTransport {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    async fn exchange(
        &self,
        request: ApiRequest,
        controller: &AbortController,
    ) -> Result<ApiResponse, TransportError> {
        let url = self.config.url(&request.path);
        let signal = controller.signal();

        let mut builder = match request.method {
            Method::Get => Request::get(&url),
            Method::Post => Request::post(&url),
        }
        .abort_signal(Some(&signal));
        if let Some(auth) = request.authorization() {
            builder = builder.header("Authorization", &auth);
        }

        let resp = match request.body {
            Some(body) => builder
                .json(&body)
                .map_err(|e| TransportError::Network(e.to_string()))?
                .send()
                .await,
            None => builder.send().await,
        }
        .map_err(|e| TransportError::Network(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;
        Ok(ApiResponse { status, body })
    }
}

impl HttpTransport for GlooTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let controller = AbortController::new()
            .map_err(|e| TransportError::Network(format!("AbortController: {e:?}")))?;
        let millis = u32::try_from(self.config.request_timeout.as_millis()).unwrap_or(u32::MAX);

        let exchange = Box::pin(self.exchange(request, &controller));
        let timer = Box::pin(TimeoutFuture::new(millis));

        let outcome = match select(exchange, timer).await {
            Either::Left((result, _)) => result,
            Either::Right(((), _)) => {
                controller.abort();
                Err(TransportError::Timeout)
            }
        };
        outcome
    }
}
