use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use kilde::{
    AssetKind, Format, FormatHints, HttpManifestFetcher, HttpProber, ManifestError,
    ManifestFetcher, Prober, Transport,
};

async fn serve(mock_path: &str, body: &str) -> (String, MockServer) {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(mock_path))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(&server)
        .await;

    (format!("{}{mock_path}", server.uri()), server)
}

fn hints(format_id: &str) -> FormatHints {
    FormatHints {
        format_id: format_id.to_string(),
        preference: Some(1),
    }
}

#[tokio::test]
async fn master_playlist_expands_to_bitrate_ladder() -> anyhow::Result<()> {
    let body = "#EXTM3U
#EXT-X-STREAM-INF:BANDWIDTH=1280000,RESOLUTION=640x360
low/playlist.m3u8
#EXT-X-STREAM-INF:BANDWIDTH=2560000,RESOLUTION=1280x720
high/playlist.m3u8
";
    let (url, server) = serve("/master.m3u8", body).await;

    let fetcher = HttpManifestFetcher::default();
    let formats = fetcher
        .fetch_formats(&url, Transport::HLS, AssetKind::VideoResource, &hints("HLS"))
        .await?;

    assert_eq!(formats.len(), 2);
    assert_eq!(formats[0].format_id, "HLS-1280");
    assert_eq!(formats[0].bitrate, Some(1280));
    assert_eq!(formats[0].url, format!("{}/low/playlist.m3u8", server.uri()));
    assert_eq!(formats[0].preference, Some(1));
    assert_eq!(formats[1].format_id, "HLS-2560");
    assert_eq!(formats[1].url, format!("{}/high/playlist.m3u8", server.uri()));
    Ok(())
}

#[tokio::test]
async fn media_playlist_is_a_single_rendition() -> anyhow::Result<()> {
    let body = "#EXTM3U
#EXT-X-TARGETDURATION:10
#EXT-X-VERSION:3
#EXTINF:9.009,
first.ts
#EXT-X-ENDLIST
";
    let (url, _server) = serve("/media.m3u8", body).await;

    let fetcher = HttpManifestFetcher::default();
    let formats = fetcher
        .fetch_formats(
            &url,
            Transport::HLS,
            AssetKind::VideoResource,
            &hints("HLS-SignLanguage"),
        )
        .await?;

    assert_eq!(formats.len(), 1);
    assert_eq!(formats[0].format_id, "HLS-SignLanguage");
    assert_eq!(formats[0].url, url);
    Ok(())
}

#[tokio::test]
async fn mpd_lists_one_format_per_representation() -> anyhow::Result<()> {
    let body = r#"<?xml version="1.0" encoding="utf-8"?>
<MPD xmlns="urn:mpeg:dash:schema:mpd:2011" type="static" mediaPresentationDuration="PT30S">
  <Period>
    <AdaptationSet contentType="video" mimeType="video/mp4">
      <Representation id="video-900" bandwidth="900000"/>
      <Representation id="video-1800" bandwidth="1800000"/>
    </AdaptationSet>
    <AdaptationSet contentType="audio" mimeType="audio/mp4">
      <Representation id="audio-128" bandwidth="128000"/>
    </AdaptationSet>
  </Period>
</MPD>
"#;
    let (url, _server) = serve("/manifest.mpd", body).await;

    let fetcher = HttpManifestFetcher::default();
    let formats = fetcher
        .fetch_formats(&url, Transport::DASH, AssetKind::VideoResource, &hints("DASH"))
        .await?;

    let ids: Vec<_> = formats.iter().map(|f| f.format_id.as_str()).collect();
    assert_eq!(ids, ["DASH-video-900", "DASH-video-1800", "DASH-audio-128"]);
    assert_eq!(formats[0].bitrate, Some(900));
    // Representations resolve through the manifest itself.
    assert!(formats.iter().all(|f| f.url == url));
    Ok(())
}

#[tokio::test]
async fn hds_is_declined_by_the_default_fetcher() {
    let fetcher = HttpManifestFetcher::default();
    let result = fetcher
        .fetch_formats(
            "https://cdn.example/manifest.f4m",
            Transport::HDS,
            AssetKind::VideoResource,
            &hints("HDS"),
        )
        .await;

    assert!(matches!(
        result,
        Err(ManifestError::Unsupported(Transport::HDS))
    ));
}

#[tokio::test]
async fn http_error_status_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/gone.m3u8"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let fetcher = HttpManifestFetcher::default();
    let result = fetcher
        .fetch_formats(
            &format!("{}/gone.m3u8", server.uri()),
            Transport::HLS,
            AssetKind::VideoResource,
            &hints("HLS"),
        )
        .await;

    match result {
        Err(error) => assert!(error.is_forbidden()),
        Ok(_) => panic!("expected an HTTP error"),
    }
}

#[tokio::test]
async fn prober_distinguishes_live_and_dead_formats() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ok.mp4"))
        .and(header("Range", "bytes=0-0"))
        .respond_with(ResponseTemplate::new(206))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/gone.mp4"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let prober = HttpProber::default();
    let format = |p: &str| Format {
        url: format!("{}{p}", server.uri()),
        format_id: "HDS-500".to_string(),
        ..Default::default()
    };

    assert!(prober.is_reachable(&format("/ok.mp4")).await);
    assert!(!prober.is_reachable(&format("/gone.mp4")).await);
}
