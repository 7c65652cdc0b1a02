use chrono::{DateTime, NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

use crate::domain::{Episode, MetadataError, Show};
use crate::workflows::{EpisodeFetch, ShowSearch};

pub const TVDB_API_BASE: &str = "https://api4.thetvdb.com/v4";

/// Blocking TheTVDB v4 client. Log in once, then share it across threads.
#[derive(Debug, Clone)]
pub struct TvdbClient {
    http: reqwest::blocking::Client,
    base_url: String,
    api_key: String,
    token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    data: LoginData,
}

#[derive(Debug, Deserialize)]
struct LoginData {
    token: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    data: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    tvdb_id: String,
    name: Option<String>,
    translations: Option<HashMap<String, String>>,
}

#[derive(Debug, Deserialize)]
struct EpisodesResponse {
    data: EpisodesData,
    links: Option<Links>,
}

#[derive(Debug, Deserialize)]
struct EpisodesData {
    episodes: Vec<EpisodeRecord>,
}

#[derive(Debug, Deserialize)]
struct Links {
    next: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct EpisodeRecord {
    #[serde(rename = "seasonNumber")]
    season_number: u32,
    number: Option<u32>,
    name: Option<String>,
    overview: Option<String>,
    aired: Option<String>,
}

impl TvdbClient {
    pub fn new(api_key: String, timeout: Duration) -> Result<Self, MetadataError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Self {
            http,
            base_url: TVDB_API_BASE.to_string(),
            api_key,
            token: None,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn login(&mut self) -> Result<(), MetadataError> {
        let body = serde_json::json!({
            "apikey": self.api_key
        });
        let response = self
            .http
            .post(format!("{}/login", self.base_url))
            .header("Content-Type", "application/json")
            .body(body.to_string())
            .send()?;

        if !response.status().is_success() {
            return Err(MetadataError::Status {
                endpoint: "login".to_string(),
                status: response.status(),
            });
        }

        let login_resp: LoginResponse = serde_json::from_str(&response.text()?)?;
        self.token = Some(login_resp.data.token);
        Ok(())
    }

    fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> Result<Option<T>, MetadataError> {
        let token = self.token.as_ref().ok_or(MetadataError::NotAuthenticated)?;
        let response = self
            .http
            .get(format!("{}{}", self.base_url, endpoint))
            .bearer_auth(token)
            .query(query)
            .send()?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(MetadataError::Status {
                endpoint: endpoint.to_string(),
                status,
            });
        }

        Ok(Some(serde_json::from_str(&response.text()?)?))
    }
}

impl ShowSearch for TvdbClient {
    fn search_shows(&self, query: &str) -> Result<Vec<Show>, MetadataError> {
        let params = [("query", query.to_string()), ("type", "series".to_string())];
        let search_resp: Option<SearchResponse> = self.get_json("/search", &params)?;

        let shows: Vec<Show> = search_resp
            .map(|resp| resp.data.into_iter().map(show_from_result).collect())
            .unwrap_or_default();
        debug!(query, results = shows.len(), "searched TVDB");
        Ok(shows)
    }
}

impl EpisodeFetch for TvdbClient {
    fn fetch_episodes(&self, show_id: &str, season: u32) -> Result<Vec<Episode>, MetadataError> {
        let endpoint = format!("/series/{show_id}/episodes/default");
        let mut page = 0;
        let mut episodes = Vec::new();

        loop {
            let params = [("season", season.to_string()), ("page", page.to_string())];
            let Some(episodes_resp) = self.get_json::<EpisodesResponse>(&endpoint, &params)? else {
                break;
            };

            let records = episodes_resp.data.episodes;
            if records.is_empty() {
                break;
            }
            episodes.extend(
                records
                    .into_iter()
                    .filter(|record| record.season_number == season)
                    .filter_map(episode_from_record),
            );

            let has_next = episodes_resp
                .links
                .and_then(|links| links.next)
                .is_some_and(|next| !next.is_null());
            if !has_next {
                break;
            }
            page += 1;
        }

        debug!(show_id, season, episodes = episodes.len(), "fetched season");
        Ok(episodes)
    }
}

fn show_from_result(result: SearchResult) -> Show {
    let translations = result.translations.unwrap_or_default();
    let title = translations
        .get("eng")
        .cloned()
        .or(result.name)
        .or_else(|| translations.values().next().cloned())
        .unwrap_or_default();
    Show::new(title, result.tvdb_id)
}

fn episode_from_record(record: EpisodeRecord) -> Option<Episode> {
    Some(Episode {
        number: record.number?,
        aired_at: record.aired.as_deref().and_then(parse_aired),
        title: record.name.unwrap_or_default(),
        overview: record.overview.unwrap_or_default(),
    })
}

fn parse_aired(aired: &str) -> Option<DateTime<Utc>> {
    NaiveDate::parse_from_str(aired.trim(), "%Y-%m-%d")
        .ok()?
        .and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc())
}
