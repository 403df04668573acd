use std::path::Path;

use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use scfetch::config::Settings;
use scfetch::downloader::Downloader;
use scfetch::error::Error;
use scfetch::soundcloud::{ClientId, SoundCloud};

const CLIENT_ID: &str = "AbCdEfGhIjKlMnOpQrStUvWxYz012345";

fn test_downloader(server: &MockServer, output: &Path) -> Downloader {
    let settings = Settings {
        platform_url: server.uri(),
        api_url: server.uri(),
        asset_host: server.uri(),
        output_dir: output.to_path_buf(),
        concurrency: 2,
        ..Settings::default()
    };
    Downloader::new(SoundCloud::new(settings, ClientId::new(CLIENT_ID)).unwrap())
}

// Helper function to build a fully populated track payload
fn track_json(server: &MockServer, id: i64) -> serde_json::Value {
    json!({
        "id": id,
        "kind": "track",
        "permalink": format!("track-{}", id),
        "title": format!("Track {}", id),
        "genre": "Techno",
        "created_at": "2021-03-04T05:06:07Z",
        "track_authorization": format!("auth-{}", id),
        "user": { "id": 9, "kind": "user", "username": "Artist", "permalink": "artist" },
        "media": {
            "transcodings": [
                {
                    "url": format!("{}/media/{}/progressive", server.uri(), id),
                    "preset": "mp3_0_0",
                    "format": { "protocol": "progressive", "mime_type": "audio/mpeg" }
                },
                {
                    "url": format!("{}/media/{}/hls", server.uri(), id),
                    "preset": "mp3_0_0",
                    "format": { "protocol": "hls", "mime_type": "audio/mpeg" }
                }
            ]
        }
    })
}

fn segment_bytes(id: i64) -> Vec<u8> {
    format!("seg-{}-a|seg-{}-b", id, id).into_bytes()
}

// Mounts the stream exchange, manifest and segments for one track
async fn mount_stream(server: &MockServer, id: i64) {
    Mock::given(method("GET"))
        .and(path(format!("/media/{}/hls", id)))
        .and(query_param("client_id", CLIENT_ID))
        .and(query_param("track_authorization", format!("auth-{}", id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "url": format!("{}/cdn/{}/playlist.m3u8", server.uri(), id)
        })))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/cdn/{}/playlist.m3u8", id)))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "#EXTM3U\n#EXTINF:10.0,\na.mp3\n#EXTINF:10.0,\nb.mp3\n#EXT-X-ENDLIST\n",
        ))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/cdn/{}/a.mp3", id)))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(format!("seg-{}-a|", id)))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/cdn/{}/b.mp3", id)))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(format!("seg-{}-b", id)))
        .mount(server)
        .await;
}

async fn mount_resolve(server: &MockServer, link_path: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/resolve"))
        .and(query_param("url", format!("{}/{}", server.uri(), link_path)))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

fn assert_track_file(file: &Path, id: i64) {
    let written = std::fs::read(file).unwrap();
    assert!(written.starts_with(b"ID3"), "{} is not tagged", file.display());
    assert!(written.ends_with(&segment_bytes(id)));
}

#[tokio::test]
async fn test_download_playlist_backfills_partial_entries() {
    let server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    mount_resolve(
        &server,
        "artist/sets/mix",
        json!({
            "kind": "playlist",
            "permalink": "mix",
            "tracks": [track_json(&server, 1), { "id": 2, "kind": "track" }]
        }),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/tracks"))
        .and(query_param("ids", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([track_json(&server, 2)])))
        .expect(1)
        .mount(&server)
        .await;
    mount_stream(&server, 1).await;
    mount_stream(&server, 2).await;

    let downloader = test_downloader(&server, output.path());
    let report = downloader.download_playlist("artist/sets/mix").await.unwrap();

    let dir = output.path().join("mix");
    assert_eq!(report.directory.as_deref(), Some(dir.as_path()));
    assert_eq!(report.outcomes.len(), 2);
    assert_eq!(report.succeeded(), 2);

    // Populated entries come first, backfilled ones after
    assert_eq!(report.outcomes[0].id, 1);
    assert_eq!(report.outcomes[1].id, 2);

    assert_track_file(&dir.join("track-1.mp3"), 1);
    assert_track_file(&dir.join("track-2.mp3"), 2);

    let written = report.get(1).unwrap().result.as_ref().unwrap();
    let on_disk = std::fs::metadata(dir.join("track-1.mp3")).unwrap().len();
    assert_eq!(written.0, on_disk);
}

#[tokio::test]
async fn test_download_playlist_embeds_artwork() {
    let server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    let mut track = track_json(&server, 1);
    track["artwork_url"] = json!(format!("{}/art/cover-large.jpg", server.uri()));

    mount_resolve(
        &server,
        "artist/sets/covers",
        json!({ "kind": "playlist", "permalink": "covers", "tracks": [track] }),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/art/cover-t500x500.jpg"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "image/jpeg")
                .set_body_bytes(b"JPEGDATA".to_vec()),
        )
        .expect(1)
        .mount(&server)
        .await;
    mount_stream(&server, 1).await;

    let downloader = test_downloader(&server, output.path());
    let report = downloader.download_playlist("artist/sets/covers").await.unwrap();
    assert_eq!(report.succeeded(), 1);

    let written = std::fs::read(output.path().join("covers").join("track-1.mp3")).unwrap();
    assert!(written.windows(8).any(|w| w == b"JPEGDATA"));
}

#[tokio::test]
async fn test_download_playlist_into_existing_directory_fails() {
    let server = MockServer::start().await;
    let output = TempDir::new().unwrap();
    std::fs::create_dir(output.path().join("mix")).unwrap();

    mount_resolve(
        &server,
        "artist/sets/mix",
        json!({ "kind": "playlist", "permalink": "mix", "tracks": [track_json(&server, 1)] }),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/media/1/hls"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let downloader = test_downloader(&server, output.path());
    let result = downloader.download_playlist("artist/sets/mix").await;
    assert!(matches!(result, Err(Error::Io(_))));
}

#[tokio::test]
async fn test_incompatible_track_does_not_stop_siblings() {
    let server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    let mut progressive_only = track_json(&server, 2);
    progressive_only["media"]["transcodings"]
        .as_array_mut()
        .unwrap()
        .truncate(1);

    mount_resolve(
        &server,
        "artist/sets/mixed",
        json!({
            "kind": "playlist",
            "permalink": "mixed",
            "tracks": [track_json(&server, 1), progressive_only]
        }),
    )
    .await;
    mount_stream(&server, 1).await;

    let downloader = test_downloader(&server, output.path());
    let report = downloader.download_playlist("artist/sets/mixed").await.unwrap();

    assert_eq!(report.outcomes.len(), 2);
    assert_eq!(report.succeeded(), 1);
    assert!(report.get(1).unwrap().is_success());
    assert!(matches!(
        report.get(2).unwrap().result,
        Err(Error::IncompatibleStream)
    ));

    let failed: Vec<i64> = report.failed().map(|(o, _)| o.id).collect();
    assert_eq!(failed, vec![2]);

    assert_track_file(&output.path().join("mixed").join("track-1.mp3"), 1);
    assert!(!output.path().join("mixed").join("track-2.mp3").exists());
}

#[tokio::test]
async fn test_download_playlist_rejects_track_link() {
    let server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    mount_resolve(&server, "artist/track-1", track_json(&server, 1)).await;

    let downloader = test_downloader(&server, output.path());
    let result = downloader.download_playlist("artist/track-1").await;

    assert!(matches!(result, Err(Error::KindNotCorrect { .. })));
    assert_eq!(std::fs::read_dir(output.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_download_empty_playlist() {
    let server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    mount_resolve(
        &server,
        "artist/sets/empty",
        json!({ "kind": "playlist", "permalink": "empty", "tracks": [] }),
    )
    .await;

    let downloader = test_downloader(&server, output.path());
    let report = downloader.download_playlist("artist/sets/empty").await.unwrap();

    assert!(report.is_empty());
    assert!(report.directory.is_none());
    assert!(!output.path().join("empty").exists());
}

#[tokio::test]
async fn test_download_user_walks_all_pages() {
    let server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    mount_resolve(
        &server,
        "artist",
        json!({ "kind": "user", "id": 9, "permalink": "artist", "username": "Artist", "track_count": 2 }),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/users/9/tracks"))
        .and(query_param("limit", "80000"))
        .and(query_param("client_id", CLIENT_ID))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "collection": [track_json(&server, 1)],
            "next_href": format!("{}/users/9/tracks/next", server.uri()),
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users/9/tracks/next"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "collection": [track_json(&server, 2)],
            "next_href": null,
        })))
        .expect(1)
        .mount(&server)
        .await;
    mount_stream(&server, 1).await;
    mount_stream(&server, 2).await;

    let downloader = test_downloader(&server, output.path());
    let report = downloader.download_user("artist").await.unwrap();

    assert_eq!(report.succeeded(), 2);
    let dir = output.path().join("artist");
    assert_track_file(&dir.join("track-1.mp3"), 1);
    assert_track_file(&dir.join("track-2.mp3"), 2);
}

#[tokio::test]
async fn test_download_retries_whole_pipeline() {
    let server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    mount_resolve(&server, "artist/track-1", track_json(&server, 1)).await;

    // Manifest fails twice, the third attempt goes through
    Mock::given(method("GET"))
        .and(path("/cdn/1/playlist.m3u8"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(2)
        .with_priority(1)
        .mount(&server)
        .await;
    mount_stream(&server, 1).await;

    let downloader = test_downloader(&server, output.path());
    let outcome = downloader.download_by_path("artist/track-1").await.unwrap();

    assert!(outcome.is_success());
    assert_eq!(outcome.file_name(), "track-1.mp3");
    assert_track_file(&output.path().join("track-1.mp3"), 1);

    // A fresh manifest URL is requested on every attempt
    let exchanges = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| r.url.path() == "/media/1/hls")
        .count();
    assert_eq!(exchanges, 3);
}

#[tokio::test]
async fn test_download_gives_up_after_five_attempts() {
    let server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    mount_resolve(&server, "artist/track-1", track_json(&server, 1)).await;
    Mock::given(method("GET"))
        .and(path("/media/1/hls"))
        .respond_with(ResponseTemplate::new(403))
        .expect(5)
        .mount(&server)
        .await;

    let downloader = test_downloader(&server, output.path());
    let outcome = downloader.download_by_path("artist/track-1").await.unwrap();

    assert!(matches!(
        outcome.result,
        Err(Error::Status { status, .. }) if status.as_u16() == 403
    ));
}

#[tokio::test]
async fn test_download_by_path_writes_into_output_dir() {
    let server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    mount_resolve(&server, "artist/track-7", track_json(&server, 7)).await;
    mount_stream(&server, 7).await;

    let downloader = test_downloader(&server, output.path());
    let outcome = downloader.download_by_path("artist/track-7").await.unwrap();

    assert_eq!(outcome.id, 7);
    assert_eq!(outcome.permalink, "track-7");
    assert_track_file(&output.path().join("track-7.mp3"), 7);
}

#[tokio::test]
async fn test_same_permalink_is_not_overwritten() {
    let server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    let mut first = track_json(&server, 1);
    first["permalink"] = json!("intro");
    let mut second = track_json(&server, 2);
    second["permalink"] = json!("intro");

    mount_resolve(
        &server,
        "artist/sets/mix",
        json!({ "kind": "playlist", "permalink": "mix", "tracks": [first, second] }),
    )
    .await;
    mount_stream(&server, 1).await;
    mount_stream(&server, 2).await;

    let downloader = test_downloader(&server, output.path());
    let report = downloader.download_playlist("artist/sets/mix").await.unwrap();

    assert_eq!(report.outcomes.len(), 2);
    assert_eq!(report.succeeded(), 1);

    let failed: Vec<_> = report.failed().collect();
    assert_eq!(failed.len(), 1);
    assert!(matches!(
        failed[0].1,
        Error::Io(e) if e.kind() == std::io::ErrorKind::AlreadyExists
    ));

    // The file on disk belongs to the track reported as written
    let winner = report.outcomes.iter().find(|o| o.is_success()).unwrap();
    let dir = output.path().join("mix");
    assert_track_file(&dir.join("intro.mp3"), winner.id);
    assert_eq!(std::fs::read_dir(&dir).unwrap().count(), 1);
}

#[tokio::test]
async fn test_failed_attempt_removes_its_file() {
    let server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    let mut track = track_json(&server, 1);
    track["artwork_url"] = json!(format!("{}/art/missing-large.jpg", server.uri()));

    mount_resolve(&server, "artist/track-1", track).await;
    Mock::given(method("GET"))
        .and(path("/art/missing-t500x500.jpg"))
        .respond_with(ResponseTemplate::new(404))
        .expect(5)
        .mount(&server)
        .await;
    mount_stream(&server, 1).await;

    let downloader = test_downloader(&server, output.path());
    let outcome = downloader.download_by_path("artist/track-1").await.unwrap();

    // Every attempt got past file creation, so none was blocked by a leftover
    assert!(matches!(outcome.result, Err(Error::Metadata { .. })));
    assert!(!output.path().join("track-1.mp3").exists());
}
