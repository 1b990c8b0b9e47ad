mod print;

use warp::filters::body::BodyDeserializeError;
use warp::http::{Method, StatusCode};
use warp::reject::PayloadTooLarge;
use warp::reply::{json, with_status};
use warp::{Filter, Rejection, Reply};

use crate::handlers::PrintContext;
use crate::models::PrintResponse;

pub fn cors() -> warp::cors::Cors {
    warp::cors()
        .allow_any_origin()
        .allow_methods(vec![Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(vec!["Content-Type", "Authorization", "Accept", "Origin"])
        .build()
}

pub fn routes(
    ctx: PrintContext,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    print::print_routes(ctx)
        .recover(handle_rejection)
        .with(cors())
}

/// Unreadable bodies are answered in the same JSON shape as every other error.
async fn handle_rejection(err: Rejection) -> Result<warp::reply::Response, Rejection> {
    if let Some(e) = err.find::<BodyDeserializeError>() {
        let reply = with_status(
            json(&PrintResponse::error(format!("Invalid input: {}", e))),
            StatusCode::BAD_REQUEST,
        );
        return Ok(reply.into_response());
    }
    if err.find::<PayloadTooLarge>().is_some() {
        let reply = with_status(
            json(&PrintResponse::error("Payload too large")),
            StatusCode::PAYLOAD_TOO_LARGE,
        );
        return Ok(reply.into_response());
    }
    Err(err)
}
