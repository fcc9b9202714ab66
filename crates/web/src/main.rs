mod api;

use api::{apply_action, build_response, parse_action, poll, ApiResponse, AppState};
use std::io::Read;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tiny_http::{Header, Method, Response, Server, StatusCode};
use wicketspin_core::{SessionConfig, DEFAULT_SEED};

const DEFAULT_ADDR: &str = "0.0.0.0:7878";

struct ServerOptions {
    addr: String,
    config: SessionConfig,
}

fn parse_options(args: &[String]) -> ServerOptions {
    let mut addr = std::env::var("WICKETSPIN_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());
    let mut seed = std::env::var("WICKETSPIN_SEED")
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .unwrap_or(DEFAULT_SEED);
    let mut idx = 0usize;
    while idx < args.len() {
        match args[idx].as_str() {
            "--addr" => {
                if let Some(value) = args.get(idx + 1) {
                    addr = value.clone();
                    idx += 1;
                }
            }
            "--seed" => {
                if let Some(value) = args.get(idx + 1).and_then(|v| v.parse::<u64>().ok()) {
                    seed = value;
                    idx += 1;
                }
            }
            _ => {}
        }
        idx += 1;
    }
    ServerOptions {
        addr,
        config: SessionConfig::with_seed(seed),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();
    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = parse_options(&args);
    let server = Server::http(&options.addr)?;
    tracing::info!(addr = %options.addr, seed = options.config.seed, "wicket spin web server listening");
    let state = Arc::new(Mutex::new(AppState::new(&options.config)));
    let started = Instant::now();
    for request in server.incoming_requests() {
        let state = state.clone();
        if let Err(err) = handle_request(request, state, started) {
            tracing::warn!("request error: {err}");
        }
    }
    Ok(())
}

fn handle_request(
    mut request: tiny_http::Request,
    state: Arc<Mutex<AppState>>,
    started: Instant,
) -> Result<(), Box<dyn std::error::Error>> {
    let url = request.url().to_string();
    let method = request.method().clone();
    let now = started.elapsed();
    match (&method, url.as_str()) {
        (&Method::Get, "/") => {
            respond_with_file(request, web_path("index.html"), "text/html; charset=utf-8")?;
        }
        (&Method::Get, "/app.js") => {
            respond_with_file(request, web_path("app.js"), "application/javascript")?;
        }
        (&Method::Get, "/styles.css") => {
            respond_with_file(request, web_path("styles.css"), "text/css; charset=utf-8")?;
        }
        (&Method::Get, "/api/state") => {
            let mut guard = state.lock().map_err(|_| "state lock poisoned")?;
            poll(&mut guard, now);
            let response = build_response(&mut guard, None, now);
            respond_json(request, response)?;
        }
        (&Method::Post, "/api/action") => {
            let mut body = String::new();
            request.as_reader().read_to_string(&mut body)?;
            let mut guard = state.lock().map_err(|_| "state lock poisoned")?;
            poll(&mut guard, now);
            let err = match parse_action(&body) {
                Ok(action) => apply_action(&mut guard, action, now),
                Err(err) => Some(err),
            };
            let response = build_response(&mut guard, err, now);
            respond_json(request, response)?;
        }
        _ => {
            let response = Response::empty(StatusCode(404));
            request.respond(response)?;
        }
    }
    Ok(())
}

fn web_path(file: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("web")
        .join(file)
}

fn respond_with_file(
    request: tiny_http::Request,
    path: PathBuf,
    content_type: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut file = std::fs::File::open(path)?;
    let mut content = Vec::new();
    file.read_to_end(&mut content)?;
    let header = Header::from_bytes(&b"Content-Type"[..], content_type)
        .map_err(|_| "invalid content type header")?;
    let response = Response::from_data(content).with_header(header);
    request.respond(response)?;
    Ok(())
}

fn respond_json(
    request: tiny_http::Request,
    response: ApiResponse,
) -> Result<(), Box<dyn std::error::Error>> {
    let body = serde_json::to_vec_pretty(&response)?;
    let header = Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..])
        .map_err(|_| "invalid content type header")?;
    request.respond(Response::from_data(body).with_header(header))?;
    Ok(())
}
