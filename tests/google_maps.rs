//! Integration tests for `GoogleMapsClient` against mocked Google endpoints.

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use tripwise::{Coordinate, GoogleMapsClient, MapProvider, PlaceCategory, TripwiseError};

fn client(server: &MockServer) -> GoogleMapsClient {
    GoogleMapsClient::with_base_url(&server.uri(), "test-key").expect("failed to build client")
}

#[tokio::test]
async fn test_geocode_returns_first_result_location() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/geocode/json"))
        .and(query_param("address", "Paris"))
        .and(query_param("key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "OK",
            "results": [
                {"geometry": {"location": {"lat": 48.8566, "lng": 2.3522}}},
                {"geometry": {"location": {"lat": 33.6609, "lng": -95.5555}}}
            ]
        })))
        .mount(&server)
        .await;

    let center = client(&server).geocode("Paris").await.unwrap();

    assert_eq!(center, Coordinate::new(48.8566, 2.3522));
}

#[tokio::test]
async fn test_geocode_zero_results_is_a_geocoding_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/geocode/json"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"status": "ZERO_RESULTS", "results": []})),
        )
        .mount(&server)
        .await;

    let err = client(&server).geocode("Atlantis").await.unwrap_err();

    match err {
        TripwiseError::Geocoding { address, status } => {
            assert_eq!(address, "Atlantis");
            assert_eq!(status, "ZERO_RESULTS");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_nearby_search_sends_radius_and_type() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/place/nearbysearch/json"))
        .and(query_param("location", "48.8566,2.3522"))
        .and(query_param("radius", "1500"))
        .and(query_param("type", "lodging"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "OK",
            "results": [{
                "name": "Hôtel Lutetia",
                "vicinity": "45 Boulevard Raspail, Paris",
                "geometry": {"location": {"lat": 48.851, "lng": 2.327}}
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let places = client(&server)
        .search_nearby(Coordinate::new(48.8566, 2.3522), 1500, PlaceCategory::Hotel)
        .await
        .unwrap();

    assert_eq!(places.len(), 1);
    assert_eq!(places[0].name, "Hôtel Lutetia");
    assert_eq!(places[0].vicinity.as_deref(), Some("45 Boulevard Raspail, Paris"));
}

#[tokio::test]
async fn test_nearby_zero_results_is_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/place/nearbysearch/json"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"status": "ZERO_RESULTS", "results": []})),
        )
        .mount(&server)
        .await;

    let places = client(&server)
        .search_nearby(Coordinate::new(0.0, 0.0), 1500, PlaceCategory::Parking)
        .await
        .unwrap();

    assert!(places.is_empty());
}

#[tokio::test]
async fn test_nearby_denied_request_is_an_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/place/nearbysearch/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "REQUEST_DENIED",
            "error_message": "The provided API key is invalid."
        })))
        .mount(&server)
        .await;

    let err = client(&server)
        .search_nearby(Coordinate::new(0.0, 0.0), 1500, PlaceCategory::Restaurant)
        .await
        .unwrap_err();

    assert!(matches!(err, TripwiseError::Api { .. }));
}
