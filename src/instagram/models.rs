// src/instagram/models.rs
// =============================================================================
// Data types for the Instagram web API, plus the profile summary that the
// rest of the application works with.
//
// The raw types mirror the JSON Instagram sends back. Fields we never read
// are simply left out; serde ignores unknown fields by default.
// =============================================================================

use serde::{Deserialize, Serialize};

// Response of /api/v1/users/web_profile_info/?username=...
#[derive(Debug, Deserialize)]
pub struct WebProfileResponse {
    pub data: WebProfileData,
}

#[derive(Debug, Deserialize)]
pub struct WebProfileData {
    pub user: Option<RawUser>,
}

// A user as returned by web_profile_info
#[derive(Debug, Clone, Deserialize)]
pub struct RawUser {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub biography: Option<String>,
    #[serde(default)]
    pub is_private: bool,
    #[serde(default)]
    pub is_verified: bool,
    pub edge_followed_by: Count,
    pub edge_follow: Count,
    pub profile_pic_url: String,
    #[serde(default)]
    pub profile_pic_url_hd: Option<String>,
    pub edge_owner_to_timeline_media: TimelineMedia,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Count {
    pub count: u64,
}

// One page of a user's timeline
#[derive(Debug, Clone, Deserialize)]
pub struct TimelineMedia {
    pub count: u64,
    pub page_info: PageInfo,
    #[serde(default)]
    pub edges: Vec<Edge<PostNode>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageInfo {
    pub has_next_page: bool,
    pub end_cursor: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Edge<T> {
    pub node: T,
}

// The bound stops serde from asking for `T: Default` because of `edges`
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Connection<T> {
    #[serde(default)]
    pub edges: Vec<Edge<T>>,
}

// A timeline post. "GraphImage", "GraphVideo" or "GraphSidecar".
#[derive(Debug, Clone, Deserialize)]
pub struct PostNode {
    #[serde(rename = "__typename")]
    pub typename: String,
    pub shortcode: String,
    pub display_url: String,
    #[serde(default)]
    pub is_video: bool,
    #[serde(default)]
    pub video_url: Option<String>,
    pub taken_at_timestamp: i64,
    #[serde(default)]
    pub edge_sidecar_to_children: Option<Connection<MediaNode>>,
}

impl PostNode {
    pub fn is_reel(&self) -> bool {
        self.typename == "GraphVideo"
    }
}

// One item inside a sidecar post
#[derive(Debug, Clone, Deserialize)]
pub struct MediaNode {
    pub display_url: String,
    #[serde(default)]
    pub is_video: bool,
    #[serde(default)]
    pub video_url: Option<String>,
}

// Response of the GraphQL profile-posts query
#[derive(Debug, Deserialize)]
pub struct TimelineResponse {
    pub data: TimelineData,
}

#[derive(Debug, Deserialize)]
pub struct TimelineData {
    pub user: Option<TimelineUser>,
}

#[derive(Debug, Deserialize)]
pub struct TimelineUser {
    pub edge_owner_to_timeline_media: TimelineMedia,
}

// Response of the web login endpoint
#[derive(Debug, Default, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub authenticated: bool,
    #[serde(default)]
    pub user: bool,
    #[serde(default)]
    pub two_factor_required: bool,
    #[serde(default)]
    pub checkpoint_url: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

// Response of /api/v1/accounts/current_user/
#[derive(Debug, Deserialize)]
pub struct CurrentUserResponse {
    pub user: CurrentUser,
}

#[derive(Debug, Deserialize)]
pub struct CurrentUser {
    pub username: String,
}

// The profile fields shown in tables and written to the JSON report
//
// Field order is the key order of the JSON report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileSummary {
    pub username: String,
    pub profile_id: u64,
    pub is_private: bool,
    pub is_verified: bool,
    pub followers: u64,
    pub following: u64,
    pub total_posts: u64,
    /// Number of video posts, or None when they could not be counted
    pub reels: Option<u64>,
    pub biography: String,
    pub profile_pic_url: String,
}

impl ProfileSummary {
    // Reel count as shown to humans
    pub fn reels_display(&self) -> String {
        match self.reels {
            Some(count) => count.to_string(),
            None => "Unknown".to_string(),
        }
    }
}

// A fetched profile: the summary plus what a later media download needs
#[derive(Debug, Clone)]
pub struct Profile {
    pub summary: ProfileSummary,
    pub user_id: String,
    pub profile_pic_url_hd: String,
    pub first_page: TimelineMedia,
}

impl Profile {
    pub fn username(&self) -> &str {
        &self.summary.username
    }

    pub fn is_private(&self) -> bool {
        self.summary.is_private
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    // A trimmed-down web_profile_info payload
    pub(crate) const WEB_PROFILE_JSON: &str = r#"{
        "data": {
            "user": {
                "id": "787132",
                "username": "natgeo",
                "full_name": "National Geographic",
                "biography": "Taking our understanding of the world further.",
                "is_private": false,
                "is_verified": true,
                "edge_followed_by": {"count": 280000000},
                "edge_follow": {"count": 150},
                "profile_pic_url": "https://cdn.example/pic_s.jpg",
                "profile_pic_url_hd": "https://cdn.example/pic_hd.jpg",
                "edge_owner_to_timeline_media": {
                    "count": 3,
                    "page_info": {"has_next_page": true, "end_cursor": "QVFE"},
                    "edges": [
                        {"node": {
                            "__typename": "GraphVideo",
                            "shortcode": "Cabc",
                            "display_url": "https://cdn.example/1.jpg",
                            "is_video": true,
                            "video_url": "https://cdn.example/1.mp4",
                            "taken_at_timestamp": 1700000000
                        }},
                        {"node": {
                            "__typename": "GraphSidecar",
                            "shortcode": "Cdef",
                            "display_url": "https://cdn.example/2.jpg",
                            "is_video": false,
                            "taken_at_timestamp": 1690000000,
                            "edge_sidecar_to_children": {"edges": [
                                {"node": {"display_url": "https://cdn.example/2a.jpg", "is_video": false}},
                                {"node": {"display_url": "https://cdn.example/2b.jpg", "is_video": true,
                                          "video_url": "https://cdn.example/2b.mp4"}}
                            ]}
                        }}
                    ]
                }
            }
        },
        "status": "ok"
    }"#;

    // The sample payload with its CDN URLs pointed at `base`, first page only
    pub(crate) fn web_profile_json_at(base: &str) -> String {
        WEB_PROFILE_JSON
            .replace("https://cdn.example", base)
            .replace(r#""has_next_page": true"#, r#""has_next_page": false"#)
    }

    // A Profile built from the sample payload, without the second page
    pub(crate) fn sample_profile(username: &str, is_private: bool) -> Profile {
        let response: WebProfileResponse = serde_json::from_str(WEB_PROFILE_JSON).unwrap();
        let user = response.data.user.unwrap();

        let mut first_page = user.edge_owner_to_timeline_media;
        first_page.page_info.has_next_page = false;

        Profile {
            summary: ProfileSummary {
                username: username.to_string(),
                profile_id: 787132,
                is_private,
                is_verified: user.is_verified,
                followers: user.edge_followed_by.count,
                following: user.edge_follow.count,
                total_posts: first_page.count,
                reels: Some(1),
                biography: user.biography.unwrap_or_default(),
                profile_pic_url: user.profile_pic_url.clone(),
            },
            user_id: user.id,
            profile_pic_url_hd: user.profile_pic_url_hd.unwrap_or(user.profile_pic_url),
            first_page,
        }
    }

    #[test]
    fn test_deserialize_web_profile() {
        let response: WebProfileResponse = serde_json::from_str(WEB_PROFILE_JSON).unwrap();
        let user = response.data.user.unwrap();

        assert_eq!(user.id, "787132");
        assert_eq!(user.edge_followed_by.count, 280_000_000);
        assert_eq!(user.edge_follow.count, 150);
        assert!(user.is_verified);

        let media = user.edge_owner_to_timeline_media;
        assert_eq!(media.count, 3);
        assert_eq!(media.page_info.end_cursor.as_deref(), Some("QVFE"));
        assert!(media.edges[0].node.is_reel());
        assert!(!media.edges[1].node.is_reel());

        let children = media.edges[1].node.edge_sidecar_to_children.as_ref().unwrap();
        assert_eq!(children.edges.len(), 2);
        assert!(children.edges[1].node.is_video);
    }

    #[test]
    fn test_deserialize_missing_user() {
        let response: WebProfileResponse =
            serde_json::from_str(r#"{"data": {"user": null}, "status": "ok"}"#).unwrap();
        assert!(response.data.user.is_none());
    }

    #[test]
    fn test_deserialize_login_response() {
        let ok: LoginResponse =
            serde_json::from_str(r#"{"user": true, "authenticated": true, "status": "ok"}"#).unwrap();
        assert!(ok.authenticated);

        let two_factor: LoginResponse = serde_json::from_str(
            r#"{"message": "", "two_factor_required": true, "status": "fail"}"#,
        )
        .unwrap();
        assert!(two_factor.two_factor_required);
        assert!(!two_factor.authenticated);
    }

    #[test]
    fn test_reels_display() {
        let mut summary = ProfileSummary {
            username: "someone".to_string(),
            profile_id: 1,
            is_private: false,
            is_verified: false,
            followers: 0,
            following: 0,
            total_posts: 0,
            reels: None,
            biography: String::new(),
            profile_pic_url: String::new(),
        };
        assert_eq!(summary.reels_display(), "Unknown");

        summary.reels = Some(4);
        assert_eq!(summary.reels_display(), "4");
    }
}
