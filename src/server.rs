//! The HTTP API.

use actix_cors::Cors;
use actix_web::{App, HttpResponse, HttpServer, ResponseError, http::StatusCode, web};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::Validate;

use crate::{
    auth::{self, LoginForm, SignupForm},
    currency::{Conversion, ConversionRequest, CurrencyClient, CurrencyError},
    gateway::{
        GatewayError,
        chatbot::{Chatbot, ChatbotReply, ChatbotRequest},
        planner::{Itinerary, TripPlanner, TripPreferences},
    },
    geo::GeoLocation,
    nearby::{NearbySearch, Place},
    prelude::*,
};

/// Everything the route handlers need.
#[must_use]
#[derive(Clone)]
pub struct Services {
    pub nearby: NearbySearch,
    pub currency: CurrencyClient,
    pub chatbot: Chatbot,
    pub planner: TripPlanner,
}

/// Run the HTTP API until interrupted.
pub async fn run(bind: &str, services: Services) -> Result {
    info!(bind, "🚀 Starting the server…");
    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .app_data(web::Data::new(services.clone()))
            .service(convert_currency)
            .service(chat)
            .service(plan_trip)
            .service(search_nearby)
            .service(validate_login)
            .service(validate_signup)
    })
    .bind(bind)
    .with_context(|| format!("failed to bind to `{bind}`"))?
    .run()
    .await
    .context("the server failed")
}

/// A route-boundary failure, rendered as `{"error": "<message>"}`.
///
/// Nothing here is retried and nothing is fatal: the client may always
/// re-trigger the same action.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: String) -> Self {
        Self { status, message }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        self.status
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status).json(ErrorEnvelope { error: &self.message })
    }
}

#[derive(Serialize)]
struct ErrorEnvelope<'a> {
    error: &'a str,
}

impl From<CurrencyError> for ApiError {
    fn from(error: CurrencyError) -> Self {
        Self::new(StatusCode::BAD_REQUEST, format!("{error:#}"))
    }
}

impl From<GatewayError> for ApiError {
    fn from(error: GatewayError) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, format!("{error:#}"))
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, auth::messages(&errors).join("; "))
    }
}

#[actix_web::post("/api/currency-converter")]
async fn convert_currency(
    services: web::Data<Services>,
    request: web::Json<ConversionRequest>,
) -> Result<web::Json<Conversion>, ApiError> {
    Ok(web::Json(services.currency.convert(request.into_inner()).await?))
}

#[actix_web::post("/api/ai-chatbot")]
async fn chat(
    services: web::Data<Services>,
    request: web::Json<ChatbotRequest>,
) -> Result<web::Json<ChatbotReply>, ApiError> {
    Ok(web::Json(services.chatbot.reply(request.into_inner()).await?))
}

#[actix_web::post("/api/ai-trip-planner")]
async fn plan_trip(
    services: web::Data<Services>,
    request: web::Json<TripPreferences>,
) -> Result<web::Json<Itinerary>, ApiError> {
    Ok(web::Json(services.planner.plan(&request).await?))
}

#[derive(Deserialize)]
struct NearbyRequest {
    latitude: f64,

    longitude: f64,

    #[serde(default = "default_radius_km")]
    radius_km: f64,
}

const fn default_radius_km() -> f64 {
    3.0
}

#[derive(Serialize)]
struct NearbyResponse {
    places: Vec<Place>,
}

#[actix_web::post("/api/nearby")]
async fn search_nearby(
    services: web::Data<Services>,
    request: web::Json<NearbyRequest>,
) -> Result<web::Json<NearbyResponse>, ApiError> {
    let center =
        GeoLocation { latitude: request.latitude, longitude: request.longitude };
    let places = services.nearby.search(center, request.radius_km).await.map_err(|error| {
        ApiError::new(StatusCode::BAD_GATEWAY, format!("{error:#}"))
    })?;
    Ok(web::Json(NearbyResponse { places }))
}

#[derive(Serialize)]
struct Validated {
    valid: bool,
}

#[actix_web::post("/api/auth/validate-login")]
async fn validate_login(form: web::Json<LoginForm>) -> Result<web::Json<Validated>, ApiError> {
    form.into_inner().normalized().validate()?;
    Ok(web::Json(Validated { valid: true }))
}

#[actix_web::post("/api/auth/validate-signup")]
async fn validate_signup(form: web::Json<SignupForm>) -> Result<web::Json<Validated>, ApiError> {
    form.into_inner().normalized().validate()?;
    Ok(web::Json(Validated { valid: true }))
}
