use sortyx::config::Config;
use sortyx::error::InferenceError;
use sortyx::frame::Frame;
use sortyx::image_classifier::adapter::ClassifierAdapter;
use sortyx::image_classifier::impl_fake::ImageClassifierFake;
use sortyx::library::logger::impl_console::LoggerConsole;
use sortyx::library::logger::interface::Logger;
use std::io::{Cursor, Read};
use std::sync::Arc;
use tiny_http::{Header, Method, Request, Response, Server};

const LISTEN_ADDR: &str = "0.0.0.0:5000";

/// Thin synchronous variant of the classifier: one image in, one
/// `{prediction, confidence}` out, through the same single-flight adapter
/// the station uses. Requests are handled serially.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::default();
    let logger: Arc<dyn Logger + Send + Sync> =
        LoggerConsole::new(config.logger_timezone).with_namespace("api");

    // Startup aborts if the classifier cannot be acquired; everything else
    // recovers per-request.
    let classifier = ClassifierAdapter::new(Box::new(ImageClassifierFake::new(logger.clone())));

    let server = Server::http(LISTEN_ADDR).map_err(|e| e.to_string())?;
    let _ = logger.info(&format!("waste classifier API listening on {}", LISTEN_ADDR));

    for mut request in server.incoming_requests() {
        let (status, body) = handle(&classifier, &mut request);
        let response = json_response(status, body);
        if let Err(error) = request.respond(response) {
            let _ = logger.warn(&format!("response failed: {}", error));
        }
    }

    Ok(())
}

fn handle(classifier: &ClassifierAdapter, request: &mut Request) -> (u16, serde_json::Value) {
    match (request.method(), request.url()) {
        (&Method::Get, "/") => (
            200,
            serde_json::json!({
                "status": "online",
                "message": "Waste classifier API is running.",
            }),
        ),
        (&Method::Post, "/predict") => predict(classifier, request),
        _ => (404, error_body("not found")),
    }
}

fn predict(classifier: &ClassifierAdapter, request: &mut Request) -> (u16, serde_json::Value) {
    let mut body = Vec::new();
    if request.as_reader().read_to_end(&mut body).is_err() {
        return (500, error_body("could not read request body"));
    }
    if body.is_empty() {
        return (400, error_body("no file provided"));
    }

    let decoded = match image::load_from_memory(&body) {
        Ok(decoded) => decoded,
        Err(_) => {
            return (
                400,
                error_body("could not decode image; the file may be corrupt or unsupported"),
            )
        }
    };
    let frame = Frame::new(decoded.to_rgb8(), "api-upload");

    match classifier.classify(&frame) {
        Ok(result) => (
            200,
            serde_json::json!({
                "prediction": result.raw_label,
                "confidence": format!("{:.2}", result.confidence),
            }),
        ),
        Err(InferenceError::NotAClassifier) => (
            500,
            error_body("the loaded model does not produce classifications"),
        ),
        Err(InferenceError::ModelFailure(_)) => (500, error_body("internal error")),
    }
}

fn error_body(message: &str) -> serde_json::Value {
    serde_json::json!({ "error": message })
}

fn json_response(status: u16, body: serde_json::Value) -> Response<Cursor<Vec<u8>>> {
    let mut response = Response::from_string(body.to_string()).with_status_code(status);
    if let Ok(header) = Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]) {
        response.add_header(header);
    }
    response
}
