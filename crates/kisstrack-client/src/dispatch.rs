//! Sending one call as a signed GET request.

use kisstrack_types::{call_info, CallInfo, CallType, QueryArg, SimpleText};
use url::form_urlencoded::byte_serialize;
use url::Url;

use crate::config::{ApiKey, Endpoint};
use crate::error::DispatchError;

/// Renders the query string for a call: `_k=<api key>` first, then `args`
/// in order. Keys and values are form-urlencoded from their raw bytes.
pub fn render_query(api_key: &ApiKey, args: &[QueryArg]) -> String {
    let mut query = String::new();
    append_pair(&mut query, b"_k", api_key.as_str().as_bytes());
    for (key, value) in args {
        query.push('&');
        append_pair(&mut query, key, value);
    }
    query
}

fn append_pair(query: &mut String, key: &[u8], value: &[u8]) {
    query.extend(byte_serialize(key));
    query.push('=');
    query.extend(byte_serialize(value));
}

/// Builds the full request URL for a call against `endpoint`.
pub fn request_url(
    endpoint: &Endpoint,
    api_key: &ApiKey,
    info: &CallInfo,
) -> Result<Url, DispatchError> {
    let base = format!("{}{}", endpoint.base_url(), info.path.as_str());
    let mut url =
        Url::parse(&base).map_err(|e| DispatchError::InvalidEndpoint(format!("{base}: {e}")))?;
    url.set_query(Some(&render_query(api_key, &info.args)));
    Ok(url)
}

/// Sends `call` to the tracking service.
///
/// Performs exactly one GET request over `client`, then reads and discards
/// the whole response body so the connection can go back to the pool. The
/// status code and body are never inspected. Transport faults are returned
/// as-is; nothing is retried.
///
/// `client` should not follow redirects; see
/// [`build_client`](crate::build_client).
pub async fn call(
    client: &reqwest::Client,
    api_key: &ApiKey,
    call: &CallType,
) -> Result<(), DispatchError> {
    call_at(client, &Endpoint::default(), api_key, call).await
}

/// Like [`call`], against an explicit endpoint.
pub async fn call_at(
    client: &reqwest::Client,
    endpoint: &Endpoint,
    api_key: &ApiKey,
    call: &CallType,
) -> Result<(), DispatchError> {
    let info = call_info(call);
    inspect(call, &info);
    let url = request_url(endpoint, api_key, &info)?;

    tracing::debug!(
        path = %info.path,
        arg_count = info.args.len(),
        host = %endpoint.host,
        "sending tracking call"
    );

    let mut response = client.get(url.clone()).send().await?;

    if was_redirected(&url, response.url()) {
        tracing::warn!(
            final_host = response.url().host_str().unwrap_or("<none>"),
            "tracking request was redirected; the HTTP client should not follow redirects"
        );
    }

    let status = response.status();
    let mut drained = 0usize;
    while let Some(chunk) = response.chunk().await? {
        drained += chunk.len();
    }

    tracing::trace!(%status, drained, "drained tracking response");
    Ok(())
}

/// True when the response came from a different URL than the one requested,
/// i.e. the client followed a redirect.
fn was_redirected(requested: &Url, answered: &Url) -> bool {
    requested != answered
}

/// Logs documented-but-unenforced input problems. Never rejects the call.
fn inspect(call: &CallType, info: &CallInfo) {
    for (key, value) in &info.args {
        if key.as_slice() == b"_n" || key.as_slice() == b"_p" {
            let text = SimpleText::from(value.as_slice());
            if !text.is_well_formed() {
                tracing::warn!(
                    key = %String::from_utf8_lossy(key),
                    len = text.len(),
                    "name or identity exceeds 255 bytes or contains ',' or ':'; the server will alter it"
                );
            }
        }
    }

    for property in call.properties() {
        if property.uses_reserved_name() {
            tracing::warn!(
                name = %property.name,
                "property name collides with a reserved query key"
            );
        }
        if !property.name.is_well_formed() {
            tracing::warn!(
                name = %property.name,
                "property name exceeds 255 bytes or contains ',' or ':'; the server will alter it"
            );
        }
        if property.value_is_oversized() {
            tracing::warn!(
                name = %property.name,
                len = property.value.len(),
                "property value exceeds 8 KiB"
            );
        }
    }
}
