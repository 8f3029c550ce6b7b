pub mod football_client;
pub mod news_client;

use anyhow::Context;
use reqwest::Url;

// Appends `segments` to the base URL's path, percent-encoding each one.
pub(crate) fn endpoint(base_url: &str, segments: &[&str]) -> Result<Url, anyhow::Error> {
    let mut url = Url::parse(base_url).context("Invalid upstream base url.")?;
    url.path_segments_mut()
        .map_err(|_| anyhow::anyhow!("Upstream base url cannot be a base."))?
        .pop_if_empty()
        .extend(segments);

    Ok(url)
}
