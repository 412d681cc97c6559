use std::fs;
use std::time::Duration;

use streamwall_engine::{
    Decoder, DecoderSet, FailureKind, FetchSettings, FileDecoder, HttpDecoder, Playlist,
};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const LIVE: &str = "#EXTM3U\n#EXT-X-TARGETDURATION:4\n#EXT-X-MEDIA-SEQUENCE:7\n#EXTINF:4.0,\na.ts\n";

#[tokio::test]
async fn http_decoder_loads_media_playlist() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/live/index.m3u8"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(LIVE, "application/vnd.apple.mpegurl"),
        )
        .mount(&server)
        .await;

    let decoder = HttpDecoder::new(FetchSettings::default());
    let url = format!("{}/live/index.m3u8", server.uri());

    assert!(decoder.can_play(&url));
    let Playlist::Media(media) = decoder.load(&url).await.expect("load ok") else {
        panic!("expected media playlist");
    };
    assert_eq!(media.media_sequence, 7);
    assert_eq!(media.segments.len(), 1);
}

#[tokio::test]
async fn http_decoder_fails_on_http_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing.m3u8"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let decoder = HttpDecoder::new(FetchSettings::default());
    let url = format!("{}/missing.m3u8", server.uri());

    let err = decoder.load(&url).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(404));
}

#[tokio::test]
async fn http_decoder_rejects_html_pages() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/page.m3u8"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<html></html>", "text/html"))
        .mount(&server)
        .await;

    let decoder = HttpDecoder::new(FetchSettings::default());
    let url = format!("{}/page.m3u8", server.uri());

    let err = decoder.load(&url).await.unwrap_err();
    assert_eq!(
        err.kind,
        FailureKind::UnsupportedContentType {
            content_type: "text/html".to_string()
        }
    );
}

#[tokio::test]
async fn http_decoder_rejects_body_without_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/bad.m3u8"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("hello", "text/plain"))
        .mount(&server)
        .await;

    let decoder = HttpDecoder::new(FetchSettings::default());
    let url = format!("{}/bad.m3u8", server.uri());

    let err = decoder.load(&url).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Playlist);
}

#[tokio::test]
async fn http_decoder_times_out_on_slow_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow.m3u8"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_raw(LIVE, "application/vnd.apple.mpegurl"),
        )
        .mount(&server)
        .await;

    let settings = FetchSettings {
        request_timeout: Duration::from_millis(50),
        ..FetchSettings::default()
    };
    let decoder = HttpDecoder::new(settings);
    let url = format!("{}/slow.m3u8", server.uri());

    let err = decoder.load(&url).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Timeout);
}

#[test]
fn http_decoder_resolves_relative_variants() {
    let decoder = HttpDecoder::new(FetchSettings::default());
    assert_eq!(
        decoder
            .resolve("https://cdn.example.com/live/master.m3u8", "hd/index.m3u8")
            .unwrap(),
        "https://cdn.example.com/live/hd/index.m3u8"
    );
    assert_eq!(
        decoder
            .resolve("https://cdn.example.com/live/master.m3u8", "https://other.example.com/x.m3u8")
            .unwrap(),
        "https://other.example.com/x.m3u8"
    );
}

#[tokio::test]
async fn file_decoder_reads_local_playlists() {
    let temp = TempDir::new().unwrap();
    let playlist_path = temp.path().join("local.m3u8");
    fs::write(&playlist_path, LIVE).unwrap();

    let decoder = FileDecoder::new(1024);
    let address = playlist_path.to_string_lossy().into_owned();

    assert!(decoder.can_play(&address));
    assert!(matches!(decoder.load(&address).await, Ok(Playlist::Media(_))));

    let missing = temp.path().join("missing.m3u8");
    let err = decoder
        .load(&missing.to_string_lossy())
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::Io);
}

#[tokio::test]
async fn file_decoder_enforces_size_limit() {
    let temp = TempDir::new().unwrap();
    let playlist_path = temp.path().join("big.m3u8");
    fs::write(&playlist_path, LIVE).unwrap();

    let decoder = FileDecoder::new(8);
    let err = decoder
        .load(&playlist_path.to_string_lossy())
        .await
        .unwrap_err();
    assert!(matches!(err.kind, FailureKind::TooLarge { max_bytes: 8, .. }));
}

#[test]
fn decoder_set_prefers_network_then_files() {
    let decoders = DecoderSet::standard(FetchSettings::default());

    let http = decoders.select("https://x/y.m3u8").expect("http decoder");
    assert_eq!(http.name(), "http");

    let file = decoders.select("streams/local.m3u8").expect("file decoder");
    assert_eq!(file.name(), "file");

    assert!(decoders.select("rtmp://x/y.m3u8").is_none());
    assert!(DecoderSet::default().select("https://x/y.m3u8").is_none());
}
