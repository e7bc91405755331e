// src/instagram/download.rs
// =============================================================================
// Saves a profile's picture and every post's media into one folder.
//
// File names follow the "<UTC timestamp>_UTC" scheme:
//   2023-11-14_22-13-20_UTC.jpg          single image post
//   2023-11-14_22-13-20_UTC.mp4          video post
//   2023-11-14_22-13-20_UTC_2.jpg        second item of a sidecar post
//   2023-11-14_22-13-20_UTC_profile_pic.jpg
//
// Files that already exist are skipped, so running a download twice only
// fetches what is new.
// =============================================================================

use chrono::{DateTime, TimeZone, Utc};
use futures::TryStreamExt;
use indicatif::ProgressBar;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::client::InstagramClient;
use super::error::{InstagramError, Result};
use super::models::{PostNode, Profile};

// What a download run did
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DownloadReport {
    pub folder: PathBuf,
    pub saved: usize,
    pub skipped: usize,
}

// One file to fetch: where it lives and what to call it locally
#[derive(Debug, Clone, PartialEq, Eq)]
struct MediaItem {
    url: String,
    file_name: String,
}

// Downloads the profile picture and all posts into `target`
pub async fn download_media(
    client: &InstagramClient,
    profile: &Profile,
    target: &Path,
    progress: &ProgressBar,
) -> Result<DownloadReport> {
    if profile.is_private() && !client.is_logged_in() {
        return Err(InstagramError::PrivateProfile(profile.username().to_string()));
    }

    tokio::fs::create_dir_all(target).await?;
    let mut report = DownloadReport {
        folder: target.to_path_buf(),
        ..Default::default()
    };

    progress.set_message("profile picture");
    save_profile_pic(client, profile, target, &mut report).await?;
    progress.inc(1);

    let mut posts = Box::pin(client.timeline(profile));
    while let Some(post) = posts.try_next().await? {
        progress.set_message(post.shortcode.clone());
        for item in post_media(&post) {
            let path = target.join(&item.file_name);
            if path.exists() {
                debug!(path = %path.display(), "already downloaded");
                report.skipped += 1;
                continue;
            }

            let (bytes, _) = client.fetch_media(&item.url).await?;
            tokio::fs::write(&path, bytes).await?;
            report.saved += 1;
        }
        progress.inc(1);
    }

    info!(
        username = profile.username(),
        saved = report.saved,
        skipped = report.skipped,
        "media download finished"
    );
    Ok(report)
}

// The picture's name comes from its Last-Modified header, so the same
// picture maps to the same file on every run
async fn save_profile_pic(
    client: &InstagramClient,
    profile: &Profile,
    target: &Path,
    report: &mut DownloadReport,
) -> Result<()> {
    let (bytes, last_modified) = client.fetch_media(&profile.profile_pic_url_hd).await?;

    let taken_at = last_modified
        .as_deref()
        .and_then(|value| DateTime::parse_from_rfc2822(value).ok())
        .map(|date| date.with_timezone(&Utc))
        .unwrap_or_else(Utc::now);

    let path = target.join(format!("{}_profile_pic.jpg", file_stem(taken_at)));
    if path.exists() {
        report.skipped += 1;
    } else {
        tokio::fs::write(&path, bytes).await?;
        report.saved += 1;
    }
    Ok(())
}

// Lists the files that make up a post
fn post_media(post: &PostNode) -> Vec<MediaItem> {
    let stem = Utc
        .timestamp_opt(post.taken_at_timestamp, 0)
        .single()
        .map(file_stem)
        .unwrap_or_else(|| post.shortcode.clone());

    let children = post
        .edge_sidecar_to_children
        .as_ref()
        .map(|c| c.edges.as_slice())
        .unwrap_or_default();

    if children.is_empty() {
        return vec![media_item(
            &stem,
            None,
            post.is_video,
            &post.display_url,
            post.video_url.as_deref(),
        )];
    }

    children
        .iter()
        .enumerate()
        .map(|(i, edge)| {
            let node = &edge.node;
            media_item(
                &stem,
                Some(i + 1),
                node.is_video,
                &node.display_url,
                node.video_url.as_deref(),
            )
        })
        .collect()
}

fn media_item(
    stem: &str,
    index: Option<usize>,
    is_video: bool,
    display_url: &str,
    video_url: Option<&str>,
) -> MediaItem {
    // Video listings sometimes come without video_url; fall back to the still
    let (url, ext) = match (is_video, video_url) {
        (true, Some(video)) => (video, "mp4"),
        _ => (display_url, "jpg"),
    };
    let file_name = match index {
        Some(n) => format!("{stem}_{n}.{ext}"),
        None => format!("{stem}.{ext}"),
    };
    MediaItem {
        url: url.to_string(),
        file_name,
    }
}

fn file_stem(date: DateTime<Utc>) -> String {
    format!("{}_UTC", date.format("%Y-%m-%d_%H-%M-%S"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instagram::models::tests::{sample_profile, web_profile_json_at, WEB_PROFILE_JSON};
    use crate::instagram::models::WebProfileResponse;
    use std::time::Duration;
    use url::Url;
    use wiremock::matchers::{method, path, path_regex};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn sample_posts() -> Vec<PostNode> {
        let response: WebProfileResponse = serde_json::from_str(WEB_PROFILE_JSON).unwrap();
        response
            .data
            .user
            .unwrap()
            .edge_owner_to_timeline_media
            .edges
            .into_iter()
            .map(|edge| edge.node)
            .collect()
    }

    #[test]
    fn test_file_stem() {
        let date = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        assert_eq!(file_stem(date), "2023-11-14_22-13-20_UTC");
    }

    #[test]
    fn test_video_post_uses_video_url() {
        let posts = sample_posts();
        let items = post_media(&posts[0]);
        assert_eq!(
            items,
            vec![MediaItem {
                url: "https://cdn.example/1.mp4".to_string(),
                file_name: "2023-11-14_22-13-20_UTC.mp4".to_string(),
            }]
        );
    }

    #[test]
    fn test_sidecar_post_numbers_children() {
        let posts = sample_posts();
        let items = post_media(&posts[1]);
        let names: Vec<_> = items.iter().map(|i| i.file_name.as_str()).collect();
        assert_eq!(
            names,
            vec!["2023-07-22_04-26-40_UTC_1.jpg", "2023-07-22_04-26-40_UTC_2.mp4"]
        );
        assert_eq!(items[1].url, "https://cdn.example/2b.mp4");
    }

    #[test]
    fn test_video_without_url_falls_back_to_still() {
        let item = media_item("stem", None, true, "https://cdn.example/still.jpg", None);
        assert_eq!(item.file_name, "stem.jpg");
        assert_eq!(item.url, "https://cdn.example/still.jpg");
    }

    #[tokio::test]
    async fn test_private_profile_without_login_fails() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("natgeo");
        let client = InstagramClient::new(Duration::from_secs(5)).unwrap();
        let profile = sample_profile("natgeo", true);

        let err = download_media(&client, &profile, &target, &ProgressBar::hidden())
            .await
            .unwrap_err();

        assert!(matches!(err, InstagramError::PrivateProfile(name) if name == "natgeo"));
        assert!(!target.exists());
    }

    #[tokio::test]
    async fn test_existing_files_are_skipped() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/users/web_profile_info/"))
            .respond_with(ResponseTemplate::new(200).set_body_string(web_profile_json_at(&server.uri())))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path_regex(r"\.(jpg|mp4)$"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("last-modified", "Tue, 14 Nov 2023 22:13:20 GMT")
                    .set_body_bytes(b"media".to_vec()),
            )
            .mount(&server)
            .await;

        let client = InstagramClient::with_base(
            Duration::from_secs(5),
            Url::parse(&server.uri()).unwrap(),
        )
        .unwrap();
        let profile = client.fetch_profile_info("natgeo").await.unwrap();

        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("natgeo");
        std::fs::create_dir_all(&target).unwrap();
        let existing = target.join("2023-11-14_22-13-20_UTC.mp4");
        std::fs::write(&existing, b"old").unwrap();

        let first = download_media(&client, &profile, &target, &ProgressBar::hidden())
            .await
            .unwrap();
        // Profile picture and both sidecar items are new, the video was there
        assert_eq!(first.saved, 3);
        assert_eq!(first.skipped, 1);
        assert_eq!(std::fs::read(&existing).unwrap(), b"old");
        assert!(target.join("2023-11-14_22-13-20_UTC_profile_pic.jpg").is_file());
        assert!(target.join("2023-07-22_04-26-40_UTC_2.mp4").is_file());

        let second = download_media(&client, &profile, &target, &ProgressBar::hidden())
            .await
            .unwrap();
        assert_eq!(second.saved, 0);
        assert_eq!(second.skipped, 4);
    }
}
