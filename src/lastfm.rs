use std::thread;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use ureq::Agent;

use crate::config::LastfmConfig;
use crate::genre::{rules, title_case};

const API_URL: &str = "https://ws.audioscrobbler.com/2.0/";

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("gave up on {artist} after {attempts} attempts: {last_error}")]
    Exhausted {
        artist: String,
        attempts: u32,
        last_error: String,
    },
}

/// Anything that can rank community tags for an artist.
pub trait ArtistTagSource {
    /// Top tags for `artist`, best first. Empty when nothing was found.
    fn top_tags(&self, artist: &str) -> Vec<String>;
}

/// `artist.gettoptags` response (partial).
#[derive(Debug, Deserialize)]
struct TopTagsResponse {
    toptags: Option<TopTags>,
}

#[derive(Debug, Deserialize)]
struct TopTags {
    #[serde(default)]
    tag: Option<OneOrMany<LastfmTag>>,
}

/// Last.fm collapses single-element arrays into a bare object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            Self::Many(v) => v,
            Self::One(t) => vec![t],
        }
    }
}

#[derive(Debug, Deserialize)]
struct LastfmTag {
    #[serde(default)]
    name: String,
    #[serde(default)]
    count: Option<Count>,
}

/// Counts arrive as numbers or numeric strings depending on the endpoint.
/// Anything unusable ranks as 0 instead of failing the whole response.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Count {
    Number(u64),
    Float(f64),
    Text(String),
    Other(serde::de::IgnoredAny),
}

impl Count {
    fn value(&self) -> u64 {
        match self {
            Self::Number(n) => *n,
            Self::Float(f) => float_count(*f),
            Self::Text(s) => {
                let s = s.trim();
                s.parse()
                    .ok()
                    .or_else(|| s.parse().ok().map(float_count))
                    .unwrap_or(0)
            }
            Self::Other(_) => 0,
        }
    }
}

/// Negative and non-finite counts rank as 0; fractions are truncated.
fn float_count(f: f64) -> u64 {
    if f.is_finite() && f > 0.0 { f as u64 } else { 0 }
}

/// What to do after one request.
enum Attempt {
    Done(Vec<String>),
    Retry(String),
}

/// Blocking Last.fm client with a politeness delay and exponential backoff.
pub struct LastfmClient {
    agent: Agent,
    api_key: String,
    max_tags: usize,
    rate_limit: Duration,
    max_attempts: u32,
    backoff: Duration,
}

impl LastfmClient {
    pub fn new(api_key: impl Into<String>, config: &LastfmConfig) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(config.timeout_secs)))
            .build()
            .into();
        Self {
            agent,
            api_key: api_key.into(),
            max_tags: config.max_tags,
            rate_limit: Duration::from_millis(config.rate_limit_ms),
            max_attempts: config.max_attempts.max(1),
            backoff: Duration::from_millis(config.backoff_ms),
        }
    }

    /// Fetch the top tags for an artist, retrying on 429, 5xx and transport
    /// failures. Any other HTTP error means the artist has no usable tags.
    pub fn fetch_top_tags(&self, artist: &str) -> Result<Vec<String>, FetchError> {
        let mut delay = self.backoff;
        let mut last_error = String::new();

        for attempt in 1..=self.max_attempts {
            thread::sleep(self.rate_limit);

            match self.request(artist) {
                Attempt::Done(tags) => return Ok(tags),
                Attempt::Retry(reason) => {
                    log::debug!("Last.fm attempt {attempt} for {artist} failed: {reason}");
                    last_error = reason;
                }
            }

            if attempt < self.max_attempts {
                thread::sleep(delay);
                delay *= 2;
            }
        }

        Err(FetchError::Exhausted {
            artist: artist.to_string(),
            attempts: self.max_attempts,
            last_error,
        })
    }

    fn request(&self, artist: &str) -> Attempt {
        let response = self
            .agent
            .get(API_URL)
            .query("method", "artist.gettoptags")
            .query("artist", artist)
            .query("api_key", &self.api_key)
            .query("format", "json")
            .call();

        match response {
            Ok(mut resp) => match resp.body_mut().read_json::<TopTagsResponse>() {
                Ok(body) => Attempt::Done(clean_top_tags(body, self.max_tags)),
                Err(e) => Attempt::Retry(format!("bad response body: {e}")),
            },
            Err(ureq::Error::StatusCode(code)) if is_retryable(code) => {
                Attempt::Retry(format!("HTTP {code}"))
            }
            Err(ureq::Error::StatusCode(code)) => {
                log::debug!("Last.fm returned HTTP {code} for {artist}, treating as no tags");
                Attempt::Done(Vec::new())
            }
            Err(e) => Attempt::Retry(e.to_string()),
        }
    }
}

impl ArtistTagSource for LastfmClient {
    fn top_tags(&self, artist: &str) -> Vec<String> {
        match self.fetch_top_tags(artist) {
            Ok(tags) => tags,
            Err(e) => {
                log::warn!("Error fetching tags: {e}");
                Vec::new()
            }
        }
    }
}

fn is_retryable(status: u16) -> bool {
    status == 429 || (500..600).contains(&status)
}

/// Drop empty and blocked names, rank by count (stable), keep the top
/// `max_tags`, title-case what remains.
fn clean_top_tags(response: TopTagsResponse, max_tags: usize) -> Vec<String> {
    let Some(tags) = response.toptags.and_then(|t| t.tag) else {
        return Vec::new();
    };

    let mut ranked: Vec<(String, u64)> = tags
        .into_vec()
        .into_iter()
        .filter(|t| !t.name.is_empty() && !rules::is_blocked(&t.name))
        .map(|t| {
            let count = t.count.as_ref().map(Count::value).unwrap_or(0);
            (t.name, count)
        })
        .collect();

    ranked.sort_by(|a, b| b.1.cmp(&a.1));

    ranked
        .into_iter()
        .take(max_tags)
        .map(|(name, _)| title_case(&name))
        .collect()
}
