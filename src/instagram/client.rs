// src/instagram/client.rs
// =============================================================================
// A small client for the parts of Instagram's web API we need:
//
// - web_profile_info: profile metadata plus the first page of posts
// - the GraphQL profile-posts query: every following page of posts
// - the browser login flow, so private profiles we follow can be read
// - current_user: to confirm a login actually worked
//
// All requests share one reqwest Client with a cookie jar, so a successful
// login carries over to every later request. Endpoints are resolved against
// a base URL, which is www.instagram.com outside of tests.
//
// Rust concepts:
// - Streams: the timeline is an async stream of posts, fetched page by page
// - Arc: the cookie jar is shared between us and reqwest
// =============================================================================

use chrono::Utc;
use futures::stream::{self, Stream, TryStreamExt};
use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::{HeaderMap, HeaderValue, REFERER, USER_AGENT};
use reqwest::{Client, Response, StatusCode};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use super::error::{InstagramError, Result};
use super::models::{
    CurrentUserResponse, LoginResponse, PostNode, Profile, ProfileSummary, TimelineMedia,
    TimelineResponse, WebProfileResponse,
};

const BASE_URL: &str = "https://www.instagram.com";

// Public app id the Instagram web frontend sends with every API call
const WEB_APP_ID: &str = "936619743392459";

// GraphQL query returning a page of a user's timeline
const PROFILE_POSTS_QUERY_HASH: &str = "69cba40317214236af40e7efa697781d";
const POSTS_PER_PAGE: u32 = 50;

// Pause between timeline pages so we don't hammer the API
const PAGE_DELAY: Duration = Duration::from_millis(300);

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

// Where the timeline stream is between pages
enum Cursor {
    Page(TimelineMedia),
    After(String),
    Done,
}

pub struct InstagramClient {
    http: Client,
    jar: Arc<Jar>,
    base: Url,
    logged_in_as: Option<String>,
}

impl InstagramClient {
    pub fn new(timeout: Duration) -> Result<Self> {
        Self::with_base(timeout, Url::parse(BASE_URL)?)
    }

    // Same client, but every endpoint is resolved against `base`
    pub fn with_base(timeout: Duration, base: Url) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
        headers.insert("x-ig-app-id", HeaderValue::from_static(WEB_APP_ID));

        let jar = Arc::new(Jar::default());
        let http = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .cookie_provider(Arc::clone(&jar))
            .build()?;

        Ok(Self {
            http,
            jar,
            base,
            logged_in_as: None,
        })
    }

    pub fn is_logged_in(&self) -> bool {
        self.logged_in_as.is_some()
    }

    // Logs in with the same flow the web frontend uses
    //
    // 1. GET the front page, which sets the csrftoken cookie
    // 2. POST the credentials with that token in the X-CSRFToken header
    pub async fn login(&mut self, username: &str, password: &str) -> Result<()> {
        info!(%username, "logging in to Instagram");

        self.http.get(self.base.clone()).send().await?;
        let csrf = self.cookie("csrftoken").unwrap_or_default();
        if csrf.is_empty() {
            warn!("no csrftoken cookie after visiting the front page");
        }

        let enc_password = format!(
            "#PWD_INSTAGRAM_BROWSER:0:{}:{}",
            Utc::now().timestamp(),
            password
        );
        let form = [
            ("username", username),
            ("enc_password", enc_password.as_str()),
            ("queryParams", "{}"),
            ("optIntoOneTap", "false"),
        ];

        let response = self
            .http
            .post(self.endpoint("/accounts/login/ajax/")?)
            .header("x-csrftoken", csrf)
            .header("x-requested-with", "XMLHttpRequest")
            .header(REFERER, self.endpoint("/accounts/login/")?.as_str())
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        let login: LoginResponse = serde_json::from_str(&body).unwrap_or_default();

        if login.two_factor_required {
            return Err(InstagramError::TwoFactorRequired);
        }
        if let Some(url) = login.checkpoint_url {
            return Err(InstagramError::Checkpoint(url));
        }
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(InstagramError::RateLimited);
        }
        if !login.authenticated {
            let reason = match (login.user, login.message) {
                (_, Some(message)) if !message.is_empty() => message,
                (false, _) => format!("unknown user '{username}'"),
                (true, _) => "wrong password".to_string(),
            };
            return Err(InstagramError::LoginFailed(reason));
        }

        info!(%username, "logged in");
        self.logged_in_as = Some(username.to_string());
        Ok(())
    }

    // Asks Instagram who the current session belongs to
    pub async fn check_login(&self) -> Result<String> {
        let response = self
            .http
            .get(self.endpoint("/api/v1/accounts/current_user/?edit=true")?)
            .send()
            .await?;

        if !response.status().is_success() || is_login_redirect(&response) {
            return Err(InstagramError::NotLoggedIn);
        }

        let current: CurrentUserResponse = response.json().await?;
        Ok(current.user.username)
    }

    // Fetches a profile and counts its reels
    //
    // Reel counting walks the whole timeline. If that fails for any reason,
    // the profile is still returned with `reels: None`.
    pub async fn fetch_profile(&self, username: &str) -> Result<Profile> {
        let mut profile = self.fetch_profile_info(username).await?;

        profile.summary.reels = match self.count_reels(&profile).await {
            Ok(count) => Some(count),
            Err(e) => {
                warn!(username, error = %e, "could not count reels");
                None
            }
        };

        Ok(profile)
    }

    // Profile metadata without the reel count
    pub async fn fetch_profile_info(&self, username: &str) -> Result<Profile> {
        let mut url = self.endpoint("/api/v1/users/web_profile_info/")?;
        url.query_pairs_mut().append_pair("username", username);

        debug!(%url, "fetching profile");
        let response = self.http.get(url.clone()).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(InstagramError::ProfileNotFound(username.to_string()));
        }
        let response = check_status(response)?;

        let body: WebProfileResponse = serde_json::from_str(&response.text().await?)?;
        let user = body
            .data
            .user
            .ok_or_else(|| InstagramError::ProfileNotFound(username.to_string()))?;

        let profile_id = user
            .id
            .parse::<u64>()
            .map_err(|_| InstagramError::InvalidProfileId(user.id.clone()))?;
        let summary = ProfileSummary {
            username: user.username,
            profile_id,
            is_private: user.is_private,
            is_verified: user.is_verified,
            followers: user.edge_followed_by.count,
            following: user.edge_follow.count,
            total_posts: user.edge_owner_to_timeline_media.count,
            reels: None,
            biography: user.biography.unwrap_or_default(),
            profile_pic_url: user.profile_pic_url.clone(),
        };

        Ok(Profile {
            summary,
            user_id: user.id,
            profile_pic_url_hd: user.profile_pic_url_hd.unwrap_or(user.profile_pic_url),
            first_page: user.edge_owner_to_timeline_media,
        })
    }

    // Counts "GraphVideo" posts over the whole timeline
    pub async fn count_reels(&self, profile: &Profile) -> Result<u64> {
        if profile.is_private() && !self.is_logged_in() {
            return Err(InstagramError::PrivateProfile(profile.username().to_string()));
        }

        self.timeline(profile)
            .try_fold(0u64, |count, post| async move {
                Ok::<_, InstagramError>(if post.is_reel() { count + 1 } else { count })
            })
            .await
    }

    // Every post on the profile's timeline, newest first
    //
    // The first page comes from the profile fetch. Later pages are requested
    // only when the stream is polled that far.
    pub fn timeline<'a>(&'a self, profile: &'a Profile) -> impl Stream<Item = Result<PostNode>> + 'a {
        let user_id = profile.user_id.as_str();

        stream::try_unfold(
            Cursor::Page(profile.first_page.clone()),
            move |cursor| async move {
                let page = match cursor {
                    Cursor::Done => return Ok(None),
                    Cursor::Page(page) => page,
                    Cursor::After(after) => {
                        tokio::time::sleep(PAGE_DELAY).await;
                        self.timeline_page(user_id, &after).await?
                    }
                };

                let next = match (page.page_info.has_next_page, page.page_info.end_cursor) {
                    (true, Some(after)) => Cursor::After(after),
                    _ => Cursor::Done,
                };
                let posts: Vec<Result<PostNode>> =
                    page.edges.into_iter().map(|edge| Ok(edge.node)).collect();

                Ok::<_, InstagramError>(Some((stream::iter(posts), next)))
            },
        )
        .try_flatten()
    }

    async fn timeline_page(&self, user_id: &str, after: &str) -> Result<TimelineMedia> {
        let variables = serde_json::json!({
            "id": user_id,
            "first": POSTS_PER_PAGE,
            "after": after,
        });
        let mut url = self.endpoint("/graphql/query/")?;
        url.query_pairs_mut()
            .append_pair("query_hash", PROFILE_POSTS_QUERY_HASH)
            .append_pair("variables", &variables.to_string());

        debug!(user_id, after, "fetching timeline page");
        let response = check_status(self.http.get(url).send().await?)?;
        let body: TimelineResponse = serde_json::from_str(&response.text().await?)?;

        body.data
            .user
            .map(|user| user.edge_owner_to_timeline_media)
            .ok_or(InstagramError::LoginRequired)
    }

    // Downloads a media file, returning its bytes and Last-Modified header
    pub async fn fetch_media(&self, url: &str) -> Result<(Vec<u8>, Option<String>)> {
        let response = check_status(self.http.get(url).send().await?)?;
        let last_modified = response
            .headers()
            .get(reqwest::header::LAST_MODIFIED)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = response.bytes().await?;
        Ok((bytes.to_vec(), last_modified))
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base.join(path)?)
    }

    fn cookie(&self, name: &str) -> Option<String> {
        let header = self.jar.cookies(&self.base)?;
        let header = header.to_str().ok()?;
        cookie_value(header, name)
    }
}

// Maps the status codes Instagram uses for "go away" to our errors
fn check_status(response: Response) -> Result<Response> {
    let status = response.status();

    if is_login_redirect(&response) {
        return Err(InstagramError::LoginRequired);
    }

    match status {
        s if s.is_success() => Ok(response),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(InstagramError::LoginRequired),
        StatusCode::TOO_MANY_REQUESTS => Err(InstagramError::RateLimited),
        s => Err(InstagramError::Status {
            status: s.as_u16(),
            url: response.url().to_string(),
        }),
    }
}

// reqwest follows redirects, so a login wall shows up as the final URL
fn is_login_redirect(response: &Response) -> bool {
    response.url().path().starts_with("/accounts/login")
}

// Picks one cookie out of a "a=1; b=2" Cookie header
fn cookie_value(header: &str, name: &str) -> Option<String> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instagram::models::tests::{sample_profile, WEB_PROFILE_JSON};
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    // Second timeline page for the sample profile: one more video, one image
    const SECOND_PAGE_JSON: &str = r#"{
        "data": {"user": {"edge_owner_to_timeline_media": {
            "count": 4,
            "page_info": {"has_next_page": false, "end_cursor": null},
            "edges": [
                {"node": {"__typename": "GraphVideo", "shortcode": "Cghi",
                          "display_url": "https://cdn.example/3.jpg", "is_video": true,
                          "video_url": "https://cdn.example/3.mp4",
                          "taken_at_timestamp": 1680000000}},
                {"node": {"__typename": "GraphImage", "shortcode": "Cjkl",
                          "display_url": "https://cdn.example/4.jpg",
                          "taken_at_timestamp": 1670000000}}
            ]
        }}}
    }"#;

    fn mock_client(server: &MockServer) -> InstagramClient {
        let base = Url::parse(&server.uri()).unwrap();
        InstagramClient::with_base(Duration::from_secs(5), base).unwrap()
    }

    async fn mount_profile(server: &MockServer, template: ResponseTemplate) {
        Mock::given(method("GET"))
            .and(path("/api/v1/users/web_profile_info/"))
            .and(query_param("username", "natgeo"))
            .respond_with(template)
            .mount(server)
            .await;
    }

    async fn fetch_with_status(status: u16) -> InstagramError {
        let server = MockServer::start().await;
        mount_profile(&server, ResponseTemplate::new(status)).await;
        mock_client(&server).fetch_profile("natgeo").await.unwrap_err()
    }

    // Runs the login flow against a server answering `body` to the POST
    async fn login_with(body: serde_json::Value) -> (InstagramClient, Result<()>) {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(
                ResponseTemplate::new(200).insert_header("set-cookie", "csrftoken=tok123; Path=/"),
            )
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/accounts/login/ajax/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        let mut client = mock_client(&server);
        let result = client.login("someone", "hunter2").await;
        (client, result)
    }

    #[test]
    fn test_cookie_value() {
        let header = "mid=ZZZ; csrftoken=abc123; ig_did=XYZ";
        assert_eq!(cookie_value(header, "csrftoken"), Some("abc123".to_string()));
        assert_eq!(cookie_value(header, "mid"), Some("ZZZ".to_string()));
        assert_eq!(cookie_value(header, "sessionid"), None);
    }

    #[test]
    fn test_new_client_starts_logged_out() {
        let client = InstagramClient::new(Duration::from_secs(5)).unwrap();
        assert!(!client.is_logged_in());
        assert_eq!(client.cookie("csrftoken"), None);
    }

    #[tokio::test]
    async fn test_timeline_single_page_needs_no_network() {
        let profile = sample_profile("natgeo", false);

        let client = InstagramClient::new(Duration::from_secs(5)).unwrap();
        let posts: Vec<PostNode> = client.timeline(&profile).try_collect().await.unwrap();
        assert_eq!(posts.len(), 2);
        assert_eq!(client.count_reels(&profile).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_fetch_profile_follows_end_cursor() {
        let server = MockServer::start().await;
        mount_profile(&server, ResponseTemplate::new(200).set_body_string(WEB_PROFILE_JSON)).await;
        Mock::given(method("GET"))
            .and(path("/graphql/query/"))
            .and(query_param("query_hash", PROFILE_POSTS_QUERY_HASH))
            .respond_with(ResponseTemplate::new(200).set_body_string(SECOND_PAGE_JSON))
            .expect(1)
            .mount(&server)
            .await;

        let client = mock_client(&server);
        let profile = client.fetch_profile("natgeo").await.unwrap();

        assert_eq!(profile.summary.username, "natgeo");
        assert_eq!(profile.summary.profile_id, 787132);
        assert_eq!(profile.summary.followers, 280_000_000);
        assert_eq!(profile.summary.reels, Some(2));
        assert_eq!(profile.profile_pic_url_hd, "https://cdn.example/pic_hd.jpg");

        let requests = server.received_requests().await.unwrap();
        let page_request = requests
            .iter()
            .find(|r| r.url.path() == "/graphql/query/")
            .unwrap();
        let variables = page_request
            .url
            .query_pairs()
            .find(|(key, _)| key == "variables")
            .map(|(_, value)| value.into_owned())
            .unwrap();
        assert!(variables.contains(r#""after":"QVFE""#));
        assert!(variables.contains(r#""id":"787132""#));
    }

    #[tokio::test]
    async fn test_failed_paging_leaves_reels_unknown() {
        let server = MockServer::start().await;
        mount_profile(&server, ResponseTemplate::new(200).set_body_string(WEB_PROFILE_JSON)).await;
        Mock::given(method("GET"))
            .and(path("/graphql/query/"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let profile = mock_client(&server).fetch_profile("natgeo").await.unwrap();
        assert_eq!(profile.summary.reels, None);
        assert_eq!(profile.summary.total_posts, 3);
    }

    #[tokio::test]
    async fn test_fetch_profile_status_mapping() {
        assert!(matches!(
            fetch_with_status(404).await,
            InstagramError::ProfileNotFound(name) if name == "natgeo"
        ));
        assert!(matches!(fetch_with_status(401).await, InstagramError::LoginRequired));
        assert!(matches!(fetch_with_status(403).await, InstagramError::LoginRequired));
        assert!(matches!(fetch_with_status(429).await, InstagramError::RateLimited));
        assert!(matches!(
            fetch_with_status(500).await,
            InstagramError::Status { status: 500, .. }
        ));
    }

    #[tokio::test]
    async fn test_login_redirect_means_login_required() {
        let server = MockServer::start().await;
        mount_profile(
            &server,
            ResponseTemplate::new(302).insert_header("location", "/accounts/login/?next=/natgeo/"),
        )
        .await;
        Mock::given(method("GET"))
            .and(path("/accounts/login/"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
            .mount(&server)
            .await;

        let err = mock_client(&server).fetch_profile("natgeo").await.unwrap_err();
        assert!(matches!(err, InstagramError::LoginRequired));
    }

    #[tokio::test]
    async fn test_missing_user_is_not_found() {
        let server = MockServer::start().await;
        mount_profile(
            &server,
            ResponseTemplate::new(200).set_body_json(json!({"data": {"user": null}})),
        )
        .await;

        let err = mock_client(&server).fetch_profile("natgeo").await.unwrap_err();
        assert!(matches!(err, InstagramError::ProfileNotFound(_)));
    }

    #[tokio::test]
    async fn test_malformed_profile_id_is_an_error() {
        let server = MockServer::start().await;
        let body = WEB_PROFILE_JSON.replace(r#""id": "787132""#, r#""id": "not-a-number""#);
        mount_profile(&server, ResponseTemplate::new(200).set_body_string(body)).await;

        let err = mock_client(&server).fetch_profile("natgeo").await.unwrap_err();
        assert!(matches!(err, InstagramError::InvalidProfileId(id) if id == "not-a-number"));
    }

    #[tokio::test]
    async fn test_login_authenticated() {
        let (client, result) =
            login_with(json!({"user": true, "authenticated": true, "status": "ok"})).await;
        result.unwrap();
        assert!(client.is_logged_in());
    }

    #[tokio::test]
    async fn test_login_two_factor() {
        let (client, result) =
            login_with(json!({"two_factor_required": true, "status": "fail"})).await;
        assert!(matches!(result, Err(InstagramError::TwoFactorRequired)));
        assert!(!client.is_logged_in());
    }

    #[tokio::test]
    async fn test_login_checkpoint() {
        let (client, result) = login_with(json!({
            "message": "checkpoint_required",
            "checkpoint_url": "/challenge/123/",
            "status": "fail"
        }))
        .await;
        assert!(matches!(result, Err(InstagramError::Checkpoint(url)) if url == "/challenge/123/"));
        assert!(!client.is_logged_in());
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let (client, result) =
            login_with(json!({"user": true, "authenticated": false, "status": "ok"})).await;
        assert!(matches!(result, Err(InstagramError::LoginFailed(reason)) if reason == "wrong password"));
        assert!(!client.is_logged_in());
    }
}
