//! HTTP API routes
//!
//! Defines all REST API endpoints for the server.

use crate::constants::nav::{FIND_RIDE_PATH, PERMISSION_DENIED_NOTICE};
use crate::engine::{Deliver, LocateOutcome, LocationRecord, ResolutionSource};
use crate::error::Error;
use crate::geo::device::DeviceLocation;
use crate::geo::{Coordinates, Geocoder};
use crate::places::{Candidate, PlacesBackend};
use crate::ride::{Endpoint, FindRide, RideState};
use crate::server::state::AppState;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Create the API router
pub fn create_router<P, G, D>(state: Arc<AppState<P, G, D>>) -> Router
where
    P: PlacesBackend + 'static,
    G: Geocoder + 'static,
    D: DeviceLocation + 'static,
{
    Router::new()
        .route("/api/status", get(status_handler::<P, G, D>))
        .route("/api/suggest", get(suggest_handler::<P, G, D>))
        .route("/api/resolve", post(resolve_handler::<P, G, D>))
        .route("/api/locate", post(locate_handler::<P, G, D>))
        .route(
            "/api/ride",
            get(ride_handler::<P, G, D>).delete(ride_clear_handler::<P, G, D>),
        )
        .route(FIND_RIDE_PATH, get(find_ride_handler::<P, G, D>))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// API error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
    pub code: String,
}

impl ApiError {
    fn new(code: &str, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: code.to_string(),
        }
    }

    fn with_status(self, status: StatusCode) -> (StatusCode, Json<ApiError>) {
        (status, Json(self))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (StatusCode::BAD_REQUEST, Json(self)).into_response()
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let code = match &err {
            Error::InvalidCoordinates(_) => "INVALID_COORDINATES",
            Error::InvalidParams(_) => "INVALID_PARAMS",
            Error::Config(_) => "CONFIG_ERROR",
            Error::PermissionDenied(_) => "PERMISSION_DENIED",
            _ => "INTERNAL_ERROR",
        };
        ApiError::new(code, err.to_string())
    }
}

/// Status response
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    /// Server is running
    pub running: bool,
    /// Server version
    pub version: String,
    /// Whether a Places API key is configured
    pub places_configured: bool,
    /// Uptime in seconds
    pub uptime_secs: u64,
}

/// Server status endpoint
///
/// GET /api/status
async fn status_handler<P, G, D>(State(state): State<Arc<AppState<P, G, D>>>) -> Json<StatusResponse>
where
    P: PlacesBackend + 'static,
    G: Geocoder + 'static,
    D: DeviceLocation + 'static,
{
    Json(StatusResponse {
        running: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
        places_configured: state.places_configured(),
        uptime_secs: state.uptime_secs(),
    })
}

#[derive(Debug, Deserialize)]
pub struct SuggestQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SuggestResponse {
    pub suggestions: Vec<Candidate>,
}

/// Autocomplete suggestions; clients debounce their own keystrokes
///
/// GET /api/suggest?q=
async fn suggest_handler<P, G, D>(
    State(state): State<Arc<AppState<P, G, D>>>,
    Query(query): Query<SuggestQuery>,
) -> Json<SuggestResponse>
where
    P: PlacesBackend + 'static,
    G: Geocoder + 'static,
    D: DeviceLocation + 'static,
{
    let suggestions = state
        .engine
        .suggestion_provider()
        .fetch_suggestions(&query.q, None)
        .await;
    Json(SuggestResponse { suggestions })
}

/// Resolve request body
#[derive(Debug, Deserialize)]
pub struct ResolveRequest {
    pub description: String,
    pub place_id: String,
    /// Ride end to fill; omitted means navigate to find-ride
    pub field: Option<Endpoint>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ResolveResponse {
    pub record: LocationRecord,
    pub source: ResolutionSource,
    /// Handoff URL when delivered by navigation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,
}

/// Resolve a selected candidate and deliver it
///
/// POST /api/resolve
async fn resolve_handler<P, G, D>(
    State(state): State<Arc<AppState<P, G, D>>>,
    Json(req): Json<ResolveRequest>,
) -> Result<Json<ResolveResponse>, ApiError>
where
    P: PlacesBackend + 'static,
    G: Geocoder + 'static,
    D: DeviceLocation + 'static,
{
    if req.description.trim().is_empty() || req.place_id.trim().is_empty() {
        return Err(ApiError::new(
            "INVALID_CANDIDATE",
            "description and place_id are required",
        ));
    }

    let candidate = Candidate::new(req.description, req.place_id);
    let mut field = state.engine.mount(state.sink_for(req.field));
    let resolution = field.select(&candidate).await.ok_or_else(|| {
        ApiError::new("INVALID_CANDIDATE", "description and place_id are required")
    })?;

    let route = req
        .field
        .is_none()
        .then(|| state.find_ride_sink().route_for(&resolution.record).to_url());

    Ok(Json(ResolveResponse {
        record: resolution.record,
        source: resolution.source,
        route,
    }))
}

/// Locate request body
#[derive(Debug, Default, Deserialize)]
pub struct LocateRequest {
    pub field: Option<Endpoint>,
    /// Position fix supplied by the client
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LocateResponse {
    pub record: LocationRecord,
}

/// Resolve the current location and deliver it
///
/// POST /api/locate
async fn locate_handler<P, G, D>(
    State(state): State<Arc<AppState<P, G, D>>>,
    Json(req): Json<LocateRequest>,
) -> Result<Json<LocateResponse>, (StatusCode, Json<ApiError>)>
where
    P: PlacesBackend + 'static,
    G: Geocoder + 'static,
    D: DeviceLocation + 'static,
{
    let outcome = match (req.lat, req.lng) {
        (Some(lat), Some(lng)) => {
            let at = Coordinates::new(lat, lng);
            at.validate()
                .map_err(|e| ApiError::from(e).with_status(StatusCode::BAD_REQUEST))?;
            state.engine.current_location_at(at).locate().await
        }
        (None, None) => state.engine.current_location().locate().await,
        _ => {
            return Err(ApiError::new("INVALID_COORDINATES", "lat and lng go together")
                .with_status(StatusCode::BAD_REQUEST))
        }
    };

    match outcome {
        LocateOutcome::Located(record) => {
            state.sink_for(req.field).deliver(record.clone());
            Ok(Json(LocateResponse { record }))
        }
        LocateOutcome::Denied => {
            let notices = state.notices.take();
            let message = notices
                .last()
                .cloned()
                .unwrap_or_else(|| PERMISSION_DENIED_NOTICE.to_string());
            Err(ApiError::new("PERMISSION_DENIED", message).with_status(StatusCode::FORBIDDEN))
        }
        LocateOutcome::Unavailable => Err(ApiError::new(
            "LOCATION_UNAVAILABLE",
            "Current location could not be determined",
        )
        .with_status(StatusCode::BAD_GATEWAY)),
    }
}

/// Current ride state
///
/// GET /api/ride
async fn ride_handler<P, G, D>(State(state): State<Arc<AppState<P, G, D>>>) -> Json<RideState>
where
    P: PlacesBackend + 'static,
    G: Geocoder + 'static,
    D: DeviceLocation + 'static,
{
    Json(state.ride.snapshot())
}

/// Forget both ride ends
///
/// DELETE /api/ride
async fn ride_clear_handler<P, G, D>(State(state): State<Arc<AppState<P, G, D>>>) -> StatusCode
where
    P: PlacesBackend + 'static,
    G: Geocoder + 'static,
    D: DeviceLocation + 'static,
{
    state.ride.clear();
    StatusCode::NO_CONTENT
}

/// Navigation handoff target
///
/// GET /find-ride?latitude=..&longitude=..&address=..
async fn find_ride_handler<P, G, D>(
    State(state): State<Arc<AppState<P, G, D>>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<RideState>, ApiError>
where
    P: PlacesBackend + 'static,
    G: Geocoder + 'static,
    D: DeviceLocation + 'static,
{
    match FindRide::new(Arc::clone(&state.ride)).apply(&params)? {
        Some(record) => {
            info!(address = record.address(), "destination set by handoff");
            Ok(Json(state.ride.snapshot()))
        }
        None => Err(ApiError::new(
            "MISSING_PARAMS",
            "latitude, longitude and address are required",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Settings;
    use crate::geo::PlaceAddress;
    use crate::testing::{FakeDevice, FakeGeocoder, FakePlaces};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::json;
    use tower::ServiceExt;

    type TestState = AppState<FakePlaces, FakeGeocoder, FakeDevice>;

    fn eiffel_places() -> FakePlaces {
        FakePlaces::new()
            .with_autocomplete(
                "Eiffel",
                json!({"status": "OK", "predictions": [{"description": "Eiffel Tower, Paris, France", "place_id": "p1"}]}),
            )
            .with_details(
                "p1",
                json!({"status": "OK", "result": {"geometry": {"location": {"lat": 48.8584, "lng": 2.2945}}}}),
            )
    }

    fn parliament() -> PlaceAddress {
        PlaceAddress {
            name: Some("Palace of Westminster".to_string()),
            street: Some("Bridge Street".to_string()),
            city: Some("London".to_string()),
        }
    }

    fn create_test_state(device: FakeDevice) -> Arc<TestState> {
        Arc::new(AppState::new(
            eiffel_places(),
            FakeGeocoder::new().with_reverse(parliament()),
            device,
            Settings::default(),
            true,
        ))
    }

    fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
        let body = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_status_endpoint() {
        let app = create_router(create_test_state(FakeDevice::at(0.0, 0.0)));

        let response = app.oneshot(get_request("/api/status")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let status: StatusResponse = body_json(response).await;
        assert!(status.running);
        assert!(status.places_configured);
        assert_eq!(status.version, env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn test_suggest_endpoint() {
        let state = create_test_state(FakeDevice::at(0.0, 0.0));
        let app = create_router(Arc::clone(&state));

        let response = app.oneshot(get_request("/api/suggest?q=Eiffel")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body: SuggestResponse = body_json(response).await;
        assert_eq!(
            body.suggestions,
            vec![Candidate::new("Eiffel Tower, Paris, France", "p1")]
        );
    }

    #[tokio::test]
    async fn test_suggest_short_query_skips_lookup() {
        let state = create_test_state(FakeDevice::at(0.0, 0.0));
        let app = create_router(Arc::clone(&state));

        let response = app.oneshot(get_request("/api/suggest?q=E")).await.unwrap();
        let body: SuggestResponse = body_json(response).await;

        assert!(body.suggestions.is_empty());
        assert!(state.engine.places().queries().is_empty());
    }

    #[tokio::test]
    async fn test_resolve_navigates_to_find_ride() {
        let state = create_test_state(FakeDevice::at(0.0, 0.0));
        let app = create_router(Arc::clone(&state));

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/resolve",
                json!({"description": "Eiffel Tower, Paris, France", "place_id": "p1"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body: ResolveResponse = body_json(response).await;
        let expected = LocationRecord::new(48.8584, 2.2945, "Eiffel Tower, Paris, France");
        assert_eq!(body.record, expected);
        assert_eq!(body.source, ResolutionSource::PlaceDetails);
        assert!(body.route.unwrap().starts_with("/find-ride?latitude=48.8584"));
        assert_eq!(state.ride.snapshot().destination, Some(expected));
    }

    #[tokio::test]
    async fn test_resolve_into_pickup_field() {
        let state = create_test_state(FakeDevice::at(0.0, 0.0));
        let app = create_router(Arc::clone(&state));

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/resolve",
                json!({"description": "Eiffel Tower, Paris, France", "place_id": "p1", "field": "from"}),
            ))
            .await
            .unwrap();

        let body: ResolveResponse = body_json(response).await;
        assert!(body.route.is_none());
        let ride = state.ride.snapshot();
        assert_eq!(ride.user, Some(body.record));
        assert!(ride.destination.is_none());
    }

    #[tokio::test]
    async fn test_resolve_unknown_place_is_degraded_not_an_error() {
        let state = create_test_state(FakeDevice::at(0.0, 0.0));
        let app = create_router(state);

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/resolve",
                json!({"description": "Atlantis", "place_id": "nope", "field": "to"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body: ResolveResponse = body_json(response).await;
        assert_eq!(body.record, LocationRecord::new(0.0, 0.0, "Atlantis"));
        assert_eq!(body.source, ResolutionSource::Unresolved);
    }

    #[tokio::test]
    async fn test_resolve_rejects_empty_candidate() {
        let app = create_router(create_test_state(FakeDevice::at(0.0, 0.0)));

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/resolve",
                json!({"description": " ", "place_id": "p1"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let err: ApiError = body_json(response).await;
        assert_eq!(err.code, "INVALID_CANDIDATE");
    }

    #[tokio::test]
    async fn test_locate_fills_pickup() {
        let state = create_test_state(FakeDevice::at(51.4995, -0.1248));
        let app = create_router(Arc::clone(&state));

        let response = app
            .oneshot(json_request("POST", "/api/locate", json!({"field": "from"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body: LocateResponse = body_json(response).await;
        assert_eq!(body.record.address(), "Palace of Westminster Bridge Street London");
        assert_eq!(state.ride.snapshot().user, Some(body.record));
    }

    #[tokio::test]
    async fn test_locate_with_client_fix() {
        let state = create_test_state(FakeDevice::without_fix());
        let app = create_router(Arc::clone(&state));

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/locate",
                json!({"field": "from", "lat": 51.5007, "lng": -0.1246}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body: LocateResponse = body_json(response).await;
        assert_eq!(body.record.latitude(), 51.5007);
        assert_eq!(body.record.longitude(), -0.1246);
    }

    #[tokio::test]
    async fn test_locate_denied() {
        let state = create_test_state(FakeDevice::denied());
        let app = create_router(Arc::clone(&state));

        let response = app
            .oneshot(json_request("POST", "/api/locate", json!({})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let err: ApiError = body_json(response).await;
        assert_eq!(err.code, "PERMISSION_DENIED");
        assert_eq!(err.error, "Permission denied");
        assert_eq!(state.ride.snapshot(), RideState::default());
    }

    #[tokio::test]
    async fn test_locate_unavailable() {
        let app = create_router(create_test_state(FakeDevice::without_fix()));

        let response = app
            .oneshot(json_request("POST", "/api/locate", json!({})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let err: ApiError = body_json(response).await;
        assert_eq!(err.code, "LOCATION_UNAVAILABLE");
    }

    #[tokio::test]
    async fn test_locate_invalid_coordinates() {
        let app = create_router(create_test_state(FakeDevice::at(0.0, 0.0)));

        let response = app
            .oneshot(json_request("POST", "/api/locate", json!({"lat": 91.0, "lng": 0.0})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let err: ApiError = body_json(response).await;
        assert_eq!(err.code, "INVALID_COORDINATES");
    }

    #[tokio::test]
    async fn test_find_ride_sets_destination() {
        let state = create_test_state(FakeDevice::at(0.0, 0.0));
        let app = create_router(Arc::clone(&state));

        let response = app
            .oneshot(get_request(
                "/find-ride?latitude=48.8584&longitude=2.2945&address=Eiffel%20Tower%2C%20Paris",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let ride: RideState = body_json(response).await;
        assert_eq!(
            ride.destination,
            Some(LocationRecord::new(48.8584, 2.2945, "Eiffel Tower, Paris"))
        );
    }

    #[tokio::test]
    async fn test_find_ride_bad_params() {
        let state = create_test_state(FakeDevice::at(0.0, 0.0));

        let response = create_router(Arc::clone(&state))
            .oneshot(get_request("/find-ride?address=Paris"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let err: ApiError = body_json(response).await;
        assert_eq!(err.code, "MISSING_PARAMS");

        let response = create_router(Arc::clone(&state))
            .oneshot(get_request("/find-ride?latitude=north&longitude=2.29&address=Paris"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let err: ApiError = body_json(response).await;
        assert_eq!(err.code, "INVALID_PARAMS");
    }

    #[tokio::test]
    async fn test_find_ride_rejects_non_finite_coordinates() {
        let state = create_test_state(FakeDevice::at(0.0, 0.0));

        for uri in [
            "/find-ride?latitude=NaN&longitude=999&address=Paris",
            "/find-ride?latitude=48.85&longitude=inf&address=Paris",
        ] {
            let response = create_router(Arc::clone(&state))
                .oneshot(get_request(uri))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", uri);
            let err: ApiError = body_json(response).await;
            assert_eq!(err.code, "INVALID_PARAMS");
        }

        let response = create_router(state)
            .oneshot(get_request("/api/ride"))
            .await
            .unwrap();
        let ride: RideState = body_json(response).await;
        assert!(ride.destination.is_none());
    }

    #[tokio::test]
    async fn test_ride_clear() {
        let state = create_test_state(FakeDevice::at(0.0, 0.0));
        state
            .ride
            .set(Endpoint::To, LocationRecord::new(1.0, 2.0, "Somewhere"));

        let response = create_router(Arc::clone(&state))
            .oneshot(json_request("DELETE", "/api/ride", json!({})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = create_router(state)
            .oneshot(get_request("/api/ride"))
            .await
            .unwrap();
        let ride: RideState = body_json(response).await;
        assert_eq!(ride, RideState::default());
    }
}
