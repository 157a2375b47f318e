use std::time::Duration;

use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use heatclip::adapters::YoutubeHeatmapAdapter;
use heatclip::ports::HeatmapPort;
use heatclip::VideoId;

const VIDEO_URL: &str = "https://youtu.be/abc123def45";

fn watch_page() -> String {
    let markers = r#"[
        {"heatMarkerRenderer": {"startMillis": 1000, "durationMillis": 5000, "intensityScoreNormalized": 0.35}},
        {"startMillis": "120000", "durationMillis": "90000", "intensityScoreNormalized": 1.0},
        {"startMillis": "30000", "durationMillis": "8000", "intensityScoreNormalized": 0.72}
    ]"#;
    format!(
        r#"<!DOCTYPE html><html><body><script>var ytInitialData = {{"frameworkUpdates":{{"entityBatchUpdate":{{"mutations":[{{"payload":{{"macroMarkersListEntity":{{"markersList":{{"markers": {} , "markersMetadata": {{}}}}}}}}}}]}}}}}};</script></body></html>"#,
        markers
    )
}

async fn serve(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/watch"))
        .and(query_param("v", "abc123def45"))
        .respond_with(response)
        .mount(server)
        .await;
}

fn adapter(server: &MockServer) -> YoutubeHeatmapAdapter {
    YoutubeHeatmapAdapter::new(60.0, Duration::from_secs(5))
        .unwrap()
        .with_base_url(server.uri())
}

#[tokio::test]
async fn test_segments_extracted_from_watch_page() {
    let server = MockServer::start().await;
    serve(&server, ResponseTemplate::new(200).set_body_string(watch_page())).await;
    let video = VideoId::from_url(VIDEO_URL).unwrap();

    let segments = adapter(&server).fetch_engagement_segments(&video).await;

    assert_eq!(segments.len(), 3);
    assert_eq!(segments[0].start(), 120.0);
    assert_eq!(segments[0].duration(), 60.0);
    assert_eq!(segments[1].start(), 30.0);
    assert_eq!(segments[1].score(), 0.72);
    assert_eq!(segments[2].start(), 1.0);
}

#[tokio::test]
async fn test_page_without_markers_yields_nothing() {
    let server = MockServer::start().await;
    serve(
        &server,
        ResponseTemplate::new(200).set_body_string("<html><body>No heatmap here</body></html>"),
    )
    .await;
    let video = VideoId::from_url(VIDEO_URL).unwrap();

    assert!(adapter(&server).fetch_engagement_segments(&video).await.is_empty());
}

#[tokio::test]
async fn test_http_error_yields_nothing() {
    let server = MockServer::start().await;
    serve(&server, ResponseTemplate::new(500)).await;
    let video = VideoId::from_url(VIDEO_URL).unwrap();

    assert!(adapter(&server).fetch_engagement_segments(&video).await.is_empty());
}
