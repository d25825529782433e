use crate::error::BankError;
use std::time::Duration;
use url::Url;

/// Build the HTTP client shared by every outbound Google call.
///
/// Calls are single-attempt; the timeouts here are the only bound on a stuck upstream.
pub fn build_client(proxy: Option<&Url>) -> Result<reqwest::Client, BankError> {
    let mut builder = reqwest::Client::builder()
        .user_agent("tws-question-bank/0.1".to_string())
        .connect_timeout(Duration::from_secs(5))
        .timeout(Duration::from_secs(15));
    if let Some(proxy_url) = proxy {
        builder = builder.proxy(reqwest::Proxy::all(proxy_url.as_str())?);
    }
    Ok(builder.build()?)
}
