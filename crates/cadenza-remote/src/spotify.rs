//! Spotify Web API client and album track-order resolver.
//!
//! Album order is resolved in three steps, each a separate request:
//!
//! 1. Client-credentials token exchange (skipped when a usable token is
//!    already cached or supplied by the caller).
//! 2. Track lookup, to find the album the seed track belongs to.
//! 3. Album track listing, following pagination to the end.
//!
//! [`SpotifyTrackOrder`] runs the steps and turns any failure into an empty
//! [`TrackOrderMap`], so callers only ever see "order available" or not.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use reqwest::{Client, Response, StatusCode, Url};
use serde::Deserialize;
use tokio::sync::RwLock;
use tokio::time::Instant;

use cadenza_core::{TrackOrderMap, TrackOrderSource};

use crate::catalog::USER_AGENT;
use crate::config::Config;
use crate::error::{RemoteError, RemoteResult};

const SOURCE_NAME: &str = "Spotify";

/// Token exchange endpoint.
pub const SPOTIFY_ACCOUNTS_URL: &str = "https://accounts.spotify.com/api/token";

/// Web API root.
pub const SPOTIFY_API_BASE: &str = "https://api.spotify.com/v1";

/// Largest page size the album tracks endpoint accepts.
const ALBUM_PAGE_LIMIT: u32 = 50;

/// Upper bound on album pages followed (2,500 tracks).
const MAX_ALBUM_PAGES: usize = 50;

/// Tokens are treated as expired this long before the provider says so.
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

// ---------------------------------------------------------------------------
// Credentials and tokens
// ---------------------------------------------------------------------------

/// Client ID and secret for the client-credentials flow.
#[derive(Clone)]
pub struct SpotifyCredentials {
    client_id: String,
    client_secret: String,
}

impl SpotifyCredentials {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    /// `Authorization` header value for the token exchange.
    pub fn basic_auth_header(&self) -> String {
        let pair = format!("{}:{}", self.client_id, self.client_secret);
        format!(
            "Basic {}",
            base64::engine::general_purpose::STANDARD.encode(pair)
        )
    }
}

impl fmt::Debug for SpotifyCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpotifyCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// A bearer token, optionally with a known expiry.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken {
    value: String,
    expires_at: Option<Instant>,
}

impl BearerToken {
    /// A token with no known expiry.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            expires_at: None,
        }
    }

    /// A token valid for `lifetime` from now, minus a safety margin.
    pub fn expiring_in(value: impl Into<String>, lifetime: Duration) -> Self {
        Self {
            value: value.into(),
            expires_at: Some(Instant::now() + lifetime.saturating_sub(EXPIRY_MARGIN)),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|at| Instant::now() >= at)
    }

    fn header(&self) -> String {
        format!("Bearer {}", self.value)
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BearerToken")
            .field("value", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Response types (private)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct TrackResponse {
    #[serde(default)]
    album: Option<AlbumRef>,
}

#[derive(Debug, Deserialize)]
struct AlbumRef {
    #[serde(default)]
    id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AlbumTracksPage {
    #[serde(default)]
    items: Vec<AlbumTrack>,
    #[serde(default)]
    next: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AlbumTrack {
    /// `null` for local files.
    #[serde(default)]
    id: Option<String>,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Spotify Web API client.
///
/// Wraps a [`reqwest::Client`] and the client credentials. Endpoints
/// default to the public Spotify hosts and can be pointed elsewhere.
#[derive(Debug, Clone)]
pub struct SpotifyClient {
    http: Client,
    credentials: SpotifyCredentials,
    accounts_url: String,
    api_base: String,
}

impl SpotifyClient {
    /// Create a new Spotify client.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(credentials: SpotifyCredentials, timeout: Duration) -> RemoteResult<Self> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http,
            credentials,
            accounts_url: SPOTIFY_ACCOUNTS_URL.to_string(),
            api_base: SPOTIFY_API_BASE.to_string(),
        })
    }

    /// Point the client at different token and API endpoints.
    #[must_use]
    pub fn with_endpoints(
        mut self,
        accounts_url: impl Into<String>,
        api_base: impl Into<String>,
    ) -> Self {
        self.accounts_url = accounts_url.into();
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    /// Exchange the client credentials for a bearer token.
    pub async fn request_token(&self) -> RemoteResult<BearerToken> {
        let response = self
            .http
            .post(&self.accounts_url)
            .header(reqwest::header::AUTHORIZATION, self.credentials.basic_auth_header())
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        let token: TokenResponse = parse(check_status(response)?).await?;

        Ok(match token.expires_in {
            Some(secs) => BearerToken::expiring_in(token.access_token, Duration::from_secs(secs)),
            None => BearerToken::new(token.access_token),
        })
    }

    /// Look up the album a track belongs to.
    pub async fn album_id_for_track(
        &self,
        token: &BearerToken,
        track_id: &str,
    ) -> RemoteResult<String> {
        let response = self
            .http
            .get(self.endpoint(&["tracks", track_id])?)
            .header(reqwest::header::AUTHORIZATION, token.header())
            .send()
            .await?;

        let track: TrackResponse = parse(check_status(response)?).await?;

        track
            .album
            .and_then(|album| album.id)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| RemoteError::MissingField {
                source_name: SOURCE_NAME.to_string(),
                field: "album.id",
            })
    }

    /// List an album's track IDs in album order.
    ///
    /// Tracks without an ID are kept as empty strings so later positions
    /// stay correct.
    pub async fn album_track_ids(
        &self,
        token: &BearerToken,
        album_id: &str,
    ) -> RemoteResult<Vec<String>> {
        let mut ids = Vec::new();
        let mut request = self
            .http
            .get(self.endpoint(&["albums", album_id, "tracks"])?)
            .query(&[("limit", ALBUM_PAGE_LIMIT)]);

        for _ in 0..MAX_ALBUM_PAGES {
            let response = request
                .header(reqwest::header::AUTHORIZATION, token.header())
                .send()
                .await?;
            let page: AlbumTracksPage = parse(check_status(response)?).await?;

            ids.extend(page.items.into_iter().map(|t| t.id.unwrap_or_default()));

            match page.next {
                Some(next) if !next.is_empty() => request = self.http.get(next),
                _ => return Ok(ids),
            }
        }

        log::warn!(
            "Album {} has more than {} pages of tracks; order truncated",
            album_id,
            MAX_ALBUM_PAGES
        );
        Ok(ids)
    }

    /// Build an API URL from path segments, escaping each one.
    fn endpoint(&self, segments: &[&str]) -> RemoteResult<Url> {
        let invalid = |message: String| RemoteError::Parse {
            source_name: SOURCE_NAME.to_string(),
            message,
        };
        let mut url = Url::parse(&self.api_base)
            .map_err(|e| invalid(format!("invalid API base {}: {e}", self.api_base)))?;
        url.path_segments_mut()
            .map_err(|()| invalid(format!("API base {} cannot take a path", self.api_base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

fn check_status(response: Response) -> RemoteResult<Response> {
    let status = response.status();
    if status == StatusCode::UNAUTHORIZED {
        return Err(RemoteError::Unauthorized {
            source_name: SOURCE_NAME.to_string(),
        });
    }
    response.error_for_status().map_err(|e| RemoteError::Http {
        source_name: SOURCE_NAME.to_string(),
        message: e.to_string(),
    })
}

async fn parse<T: serde::de::DeserializeOwned>(response: Response) -> RemoteResult<T> {
    response.json().await.map_err(|e| RemoteError::Parse {
        source_name: SOURCE_NAME.to_string(),
        message: e.to_string(),
    })
}

// ---------------------------------------------------------------------------
// Resolver
// ---------------------------------------------------------------------------

/// Best-effort bearer token cache.
///
/// Concurrent callers may each fetch a token; the last one stored wins.
#[derive(Debug, Default)]
pub struct TokenCache {
    token: RwLock<Option<BearerToken>>,
}

impl TokenCache {
    /// The cached token, unless it has expired.
    pub async fn get(&self) -> Option<BearerToken> {
        self.token
            .read()
            .await
            .as_ref()
            .filter(|t| !t.is_expired())
            .cloned()
    }

    pub async fn store(&self, token: BearerToken) {
        *self.token.write().await = Some(token);
    }

    pub async fn invalidate(&self) {
        *self.token.write().await = None;
    }
}

/// Resolves album track order through Spotify.
#[derive(Debug)]
pub struct SpotifyTrackOrder {
    client: SpotifyClient,
    cache: TokenCache,
}

impl SpotifyTrackOrder {
    pub fn new(client: SpotifyClient) -> Self {
        Self {
            client,
            cache: TokenCache::default(),
        }
    }

    /// Build a resolver from `config`, or `None` without credentials.
    pub fn from_config(config: &Config) -> RemoteResult<Option<Self>> {
        let Some(credentials) = config.spotify_credentials() else {
            log::debug!("Spotify credentials not configured; album order disabled");
            return Ok(None);
        };
        let client = SpotifyClient::new(credentials, config.request_timeout())?;
        Ok(Some(Self::new(client)))
    }

    pub fn token_cache(&self) -> &TokenCache {
        &self.cache
    }

    /// Resolve the track order of the album containing `seed_track_id`.
    ///
    /// `token` skips the token exchange when it is still valid. A freshly
    /// acquired token is cached. Any failed step yields an empty map.
    pub async fn resolve_album_order(
        &self,
        seed_track_id: &str,
        token: Option<BearerToken>,
    ) -> TrackOrderMap {
        let token = match token.filter(|t| !t.is_expired()) {
            Some(token) => token,
            None => match self.client.request_token().await {
                Ok(token) => {
                    self.cache.store(token.clone()).await;
                    token
                }
                Err(e) => {
                    log::warn!("Spotify token request failed: {}", e);
                    return TrackOrderMap::default();
                }
            },
        };

        let album_id = match self.client.album_id_for_track(&token, seed_track_id).await {
            Ok(album_id) => album_id,
            Err(e) => {
                self.step_failed("track lookup", &e).await;
                return TrackOrderMap::default();
            }
        };

        match self.client.album_track_ids(&token, &album_id).await {
            Ok(track_ids) => {
                log::debug!(
                    "Album {} for seed {}: {} tracks",
                    album_id,
                    seed_track_id,
                    track_ids.len()
                );
                TrackOrderMap::from_listing(track_ids)
            }
            Err(e) => {
                self.step_failed("album tracks", &e).await;
                TrackOrderMap::default()
            }
        }
    }

    async fn step_failed(&self, step: &str, error: &RemoteError) {
        log::warn!("Spotify {} failed: {}", step, error);
        if error.is_unauthorized() {
            self.cache.invalidate().await;
        }
    }
}

#[async_trait]
impl TrackOrderSource for SpotifyTrackOrder {
    async fn album_order(&self, seed_track_id: &str) -> TrackOrderMap {
        let cached = self.cache.get().await;
        self.resolve_album_order(seed_track_id, cached).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials() -> SpotifyCredentials {
        SpotifyCredentials::new("my-id", "my-secret")
    }

    #[test]
    fn test_basic_auth_header() {
        // base64("my-id:my-secret")
        assert_eq!(
            credentials().basic_auth_header(),
            "Basic bXktaWQ6bXktc2VjcmV0"
        );
    }

    #[test]
    fn test_credentials_debug_hides_secret() {
        let debug = format!("{:?}", credentials());
        assert!(debug.contains("my-id"));
        assert!(!debug.contains("my-secret"));
    }

    #[test]
    fn test_token_debug_hides_value() {
        let debug = format!("{:?}", BearerToken::new("very-secret-token"));
        assert!(!debug.contains("very-secret-token"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_token_expiry_honours_margin() {
        let token = BearerToken::expiring_in("t", Duration::from_secs(3600));
        assert!(!token.is_expired());
        tokio::time::advance(Duration::from_secs(3600) - EXPIRY_MARGIN).await;
        assert!(token.is_expired());
        assert!(!BearerToken::new("t").is_expired());
    }

    #[tokio::test(start_paused = true)]
    async fn test_token_cache_skips_expired() {
        let cache = TokenCache::default();
        assert!(cache.get().await.is_none());
        cache
            .store(BearerToken::expiring_in("t", Duration::from_secs(120)))
            .await;
        assert_eq!(cache.get().await.map(|t| t.as_str().to_string()), Some("t".to_string()));
        tokio::time::advance(Duration::from_secs(61)).await;
        assert!(cache.get().await.is_none());
    }

    #[tokio::test]
    async fn test_token_cache_invalidate() {
        let cache = TokenCache::default();
        cache.store(BearerToken::new("t")).await;
        cache.invalidate().await;
        assert!(cache.get().await.is_none());
    }

    #[test]
    fn test_token_response_deserialize() {
        let json = r#"{"access_token": "abc", "token_type": "Bearer", "expires_in": 3600}"#;
        let token: TokenResponse = serde_json::from_str(json).unwrap();
        assert_eq!(token.access_token, "abc");
        assert_eq!(token.expires_in, Some(3600));
    }

    #[test]
    fn test_track_response_deserialize() {
        let json = r#"{"id": "t1", "name": "Song", "album": {"id": "alb1", "name": "Album"}}"#;
        let track: TrackResponse = serde_json::from_str(json).unwrap();
        assert_eq!(track.album.and_then(|a| a.id), Some("alb1".to_string()));
    }

    #[test]
    fn test_album_tracks_page_deserialize() {
        let json = r#"{
            "items": [{"id": "t1"}, {"id": null}, {"id": "t3"}],
            "next": null
        }"#;
        let page: AlbumTracksPage = serde_json::from_str(json).unwrap();
        assert_eq!(page.items.len(), 3);
        assert!(page.items[1].id.is_none());
        assert!(page.next.is_none());
    }

    #[test]
    fn test_endpoint_escapes_path_segments() {
        let client = SpotifyClient::new(credentials(), Duration::from_secs(5))
            .unwrap()
            .with_endpoints("http://localhost/api/token", "http://localhost/v1/");

        let url = client.endpoint(&["tracks", "a/b?c#d"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost/v1/tracks/a%2Fb%3Fc%23d");
        assert!(url.query().is_none());

        let url = client.endpoint(&["albums", "alb1", "tracks"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost/v1/albums/alb1/tracks");
    }

    #[test]
    fn test_endpoint_rejects_invalid_base() {
        let client = SpotifyClient::new(credentials(), Duration::from_secs(5))
            .unwrap()
            .with_endpoints("http://localhost/api/token", "not a url");

        let err = client.endpoint(&["tracks", "x"]).unwrap_err();
        assert!(matches!(err, RemoteError::Parse { .. }));
    }

    #[test]
    fn test_resolver_disabled_without_credentials() {
        let resolver = SpotifyTrackOrder::from_config(&Config::default()).unwrap();
        assert!(resolver.is_none());
    }

    #[tokio::test]
    async fn test_unreachable_provider_yields_empty_order() {
        let client = SpotifyClient::new(credentials(), Duration::from_secs(2))
            .unwrap()
            .with_endpoints("http://127.0.0.1:9/api/token", "http://127.0.0.1:9/v1");
        let resolver = SpotifyTrackOrder::new(client);

        let order = resolver.album_order("seed").await;
        assert!(order.is_empty());
        assert!(resolver.token_cache().get().await.is_none());

        let order = resolver
            .resolve_album_order("seed", Some(BearerToken::new("supplied")))
            .await;
        assert!(order.is_empty());
    }
}
