//! JSON request/response exchange shared by every provider call.
//!
//! One call is one POST: the payload is encoded as JSON, the response
//! status must be exactly `200 OK`, and the body is then either decoded
//! into the caller's type or drained and discarded. Every await point
//! races the caller's [`Context`].

use crate::context::Context;
use crate::error::{DdnsError, Result};
use reqwest::header::{ACCEPT, CONTENT_TYPE, USER_AGENT};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

const USER_AGENT_VALUE: &str = concat!("porkbun-ddns/", env!("CARGO_PKG_VERSION"));

/// Error body returned by the provider on failure.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// POST `payload` to `url` and decode the response body as `T`.
pub async fn post_json<T, B>(ctx: &Context, client: &Client, url: &str, payload: &B) -> Result<T>
where
    T: DeserializeOwned,
    B: Serialize + ?Sized,
{
    let response = exchange(ctx, client, url, payload).await?;
    let body = ctx
        .run(response.bytes())
        .await?
        .map_err(DdnsError::Transport)?;
    serde_json::from_slice(&body).map_err(DdnsError::Decode)
}

/// POST `payload` to `url`, expecting no meaningful response body.
pub async fn post_no_body<B>(ctx: &Context, client: &Client, url: &str, payload: &B) -> Result<()>
where
    B: Serialize + ?Sized,
{
    let response = exchange(ctx, client, url, payload).await?;
    ctx.run(response.bytes())
        .await?
        .map_err(DdnsError::ReleaseBody)?;
    Ok(())
}

/// Encode, send and status-check one request.
async fn exchange<B>(ctx: &Context, client: &Client, url: &str, payload: &B) -> Result<Response>
where
    B: Serialize + ?Sized,
{
    let body = serde_json::to_vec(payload).map_err(DdnsError::Encode)?;

    tracing::debug!("POST {}", url);
    let request = client
        .post(url)
        .header(CONTENT_TYPE, "application/json")
        .header(ACCEPT, "application/json")
        .header(USER_AGENT, USER_AGENT_VALUE)
        .body(body);

    let response = ctx
        .run(request.send())
        .await?
        .map_err(DdnsError::Transport)?;

    let status = response.status();
    if status != StatusCode::OK {
        let message = error_message(ctx, response).await?;
        tracing::debug!("POST {} answered {}: {}", url, status, message);
        return Err(DdnsError::HttpStatus { status, message });
    }

    Ok(response)
}

/// Best-effort provider error detail.
///
/// An unreadable body yields an empty message; only the context ending
/// while reading is reported as an error.
async fn error_message(ctx: &Context, response: Response) -> Result<String> {
    match ctx.run(response.text()).await? {
        Ok(text) => Ok(extract_message(&text)),
        Err(e) => {
            tracing::debug!("reading error body: {}", e);
            Ok(String::new())
        }
    }
}

fn extract_message(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody {
            message: Some(message),
        }) if !message.is_empty() => message,
        _ => body.trim().to_string(),
    }
}
