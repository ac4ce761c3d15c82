use failure::{format_err, Error};
use colored::Colorize;
use crate::config::{AxleConfigInput, AxleLimitExceeded, LayoutConfig, ServiceSettings};
use crate::layout::{Axle, LayoutError};
use crate::layout::diagram::Diagram;
use crate::layout::generator::{count_total_tires, generate_layout};
use crate::layout::resize::resize_axle_list;
use rocket::fairing::AdHoc;
use rocket::serde::json::Json;
use rocket::{catch, catchers, get, post, routes, Build, Request, Responder, Rocket, State};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io;
use std::{env, process};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod layout;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RejectionBody {
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    axle_index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<i64>,
    message: String,
}

#[derive(Debug, Responder)]
#[response(status = 422)]
struct Rejection(Json<RejectionBody>);

impl From<LayoutError> for Rejection {
    fn from(error: LayoutError) -> Rejection {
        let value = match error {
            LayoutError::InvalidTiresPerSide { value, .. } => Some(value),
            _ => None,
        };

        Rejection(Json(RejectionBody {
            kind: error.kind(),
            axle_index: error.axle_index(),
            value,
            message: error.to_string(),
        }))
    }
}

impl From<AxleLimitExceeded> for Rejection {
    fn from(error: AxleLimitExceeded) -> Rejection {
        Rejection(Json(RejectionBody {
            kind: "AxleLimitExceeded",
            axle_index: None,
            value: Some(error.count as i64),
            message: error.to_string(),
        }))
    }
}

fn reject<E: Into<Rejection> + fmt::Display>(error: E) -> Rejection {
    warn!(error = %error, "rejected tire layout request");

    error.into()
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LayoutResponse {
    axles: Vec<Axle>,
    total_tires: usize,
}

#[derive(Deserialize)]
struct ResizeRequest {
    #[serde(default)]
    axles: Vec<AxleConfigInput>,
    count: usize,
}

#[post("/layout", format = "application/json", data = "<config>")]
fn server_generate_layout(
    config: Json<LayoutConfig>,
    settings: &State<ServiceSettings>,
) -> Result<Json<LayoutResponse>, Rejection> {
    let config = config.into_inner();

    settings.check_axle_count(config.axles.len()).map_err(reject)?;

    let axles = generate_layout(&config.axles).map_err(reject)?;
    let total_tires = count_total_tires(&axles);

    info!(axles = axles.len(), tires = total_tires, "generated tire layout");

    Ok(Json(LayoutResponse { axles, total_tires }))
}

#[post("/layout/resize", format = "application/json", data = "<request>")]
fn server_resize_axles(
    request: Json<ResizeRequest>,
    settings: &State<ServiceSettings>,
) -> Result<Json<Vec<AxleConfigInput>>, Rejection> {
    let request = request.into_inner();

    settings.check_axle_count(request.count).map_err(reject)?;

    info!(from = request.axles.len(), to = request.count, "resized axle list");

    Ok(Json(resize_axle_list(&request.axles, request.count)))
}

#[catch(422)]
fn malformed_request(request: &Request) -> Rejection {
    warn!(uri = %request.uri(), "rejected undecodable tire layout request");

    Rejection(Json(RejectionBody {
        kind: "MalformedRequest",
        axle_index: None,
        value: None,
        message: format!("request body for {} could not be decoded", request.uri()),
    }))
}

#[get("/health")]
fn health() -> &'static str {
    "ok"
}

fn mount_server(rocket: Rocket<Build>) -> Result<Rocket<Build>, Error> {
    let cors = rocket_cors::CorsOptions::default().to_cors()?;

    Ok(rocket
        .attach(cors)
        .attach(AdHoc::config::<ServiceSettings>())
        .mount("/", routes![server_generate_layout, server_resize_axles, health])
        .register("/", catchers![malformed_request]))
}

fn run_server() -> Result<(), Error> {
    let server = mount_server(rocket::build())?;

    rocket::execute(server.launch()).map_err(|error| format_err!("server failed: {}", error))?;

    Ok(())
}

/// Reads the console layout, `None` when the file does not exist.
fn get_config(path: &str) -> Result<Option<LayoutConfig>, Error> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(error) => return Err(error.into()),
    };

    let config = serde_json::from_reader(file)?;

    Ok(Some(config))
}

fn run_local(path: &str) -> Result<(), Error> {
    let config = match get_config(path)? {
        Some(config) => config,
        None => {
            warn!(path, "layout config not found, using default");

            LayoutConfig::default()
        }
    };

    let axles = generate_layout(&config.axles)?;

    info!(axles = axles.len(), tires = count_total_tires(&axles), "generated tire layout");

    println!("{}", Diagram(&axles));

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() {
    init_tracing();

    let args: Vec<String> = env::args().collect();

    let result = if args.len() >= 2 && args[1] == "-console" {
        let path = args
            .get(2)
            .cloned()
            .unwrap_or_else(|| format!("{}/layout.json", env!("CARGO_MANIFEST_DIR")));

        run_local(&path)
    } else {
        run_server()
    };

    if let Err(error) = result {
        eprintln!("{}", error.to_string().red());

        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rocket::http::{ContentType, Status};
    use rocket::local::blocking::Client;
    use serde_json::{json, Value};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn client_with_max_axles(max_axles: usize) -> Client {
        let figment = rocket::Config::figment().merge(("max_axles", max_axles));

        let server = mount_server(rocket::custom(figment)).expect("cors options are valid");

        Client::tracked(server).expect("valid rocket instance")
    }

    fn post(client: &Client, uri: &str, body: Value) -> (Status, Value) {
        let response = client
            .post(uri)
            .header(ContentType::JSON)
            .body(body.to_string())
            .dispatch();

        let status = response.status();

        (status, response.into_json().expect("json body"))
    }

    #[test]
    fn layout_numbers_tires_across_axles() {
        let client = client_with_max_axles(6);

        let (status, body) = post(
            &client,
            "/layout",
            json!({"axles": [
                {"name": "Dirección", "tiresPerSide": 1, "order": 2},
                {"name": "Tracción", "tiresPerSide": 2, "order": 1}
            ]}),
        );

        assert_eq!(status, Status::Ok);
        assert_eq!(body["totalTires"], 6);
        assert_eq!(body["axles"][0]["name"], "Dirección");
        assert_eq!(body["axles"][0]["number"], 1);
        assert_eq!(body["axles"][1]["tires"][0], json!({
            "globalPosition": 3,
            "axleNumber": 2,
            "side": "left",
            "positionInSide": 1
        }));
    }

    #[test]
    fn layout_rejection_points_at_axle_row() {
        let client = client_with_max_axles(6);

        let (status, body) = post(&client, "/layout", json!({"axles": [{"name": "X", "tiresPerSide": 4}]}));

        assert_eq!(status, Status::UnprocessableEntity);
        assert_eq!(body["kind"], "InvalidTiresPerSide");
        assert_eq!(body["axleIndex"], 0);
        assert_eq!(body["value"], 4);
    }

    #[test]
    fn empty_layout_is_rejected_without_row() {
        let client = client_with_max_axles(6);

        let (status, body) = post(&client, "/layout", json!({"axles": []}));

        assert_eq!(status, Status::UnprocessableEntity);
        assert_eq!(body["kind"], "EmptyConfiguration");
        assert!(body.get("axleIndex").is_none());
    }

    #[test]
    fn layout_respects_configured_axle_limit() {
        let client = client_with_max_axles(1);

        let (status, body) = post(
            &client,
            "/layout",
            json!({"axles": [{"name": "A", "tiresPerSide": 1}, {"name": "B", "tiresPerSide": 1}]}),
        );

        assert_eq!(status, Status::UnprocessableEntity);
        assert_eq!(body["kind"], "AxleLimitExceeded");
        assert_eq!(body["value"], 2);
    }

    #[test]
    fn resize_appends_default_axles() {
        let client = client_with_max_axles(6);

        let (status, body) = post(
            &client,
            "/layout/resize",
            json!({"axles": [{"name": "A", "tiresPerSide": 1}], "count": 3}),
        );

        assert_eq!(status, Status::Ok);
        assert_eq!(body, json!([
            {"name": "A", "tiresPerSide": 1},
            {"name": "Eje 2", "tiresPerSide": 2},
            {"name": "Eje 3", "tiresPerSide": 2}
        ]));
    }

    #[test]
    fn oversized_tire_count_points_at_axle_row() {
        let client = client_with_max_axles(6);

        let (status, body) = post(&client, "/layout", json!({"axles": [{"name": "X", "tiresPerSide": 3000000000i64}]}));

        assert_eq!(status, Status::UnprocessableEntity);
        assert_eq!(body["kind"], "InvalidTiresPerSide");
        assert_eq!(body["axleIndex"], 0);
        assert_eq!(body["value"], 3000000000i64);
    }

    #[test]
    fn undecodable_bodies_get_structured_rejection() {
        let client = client_with_max_axles(6);

        let cases = vec![
            ("/layout", json!({"axles": [{"tiresPerSide": 2}]})),
            ("/layout", json!({"axles": [{"name": "A", "tiresPerSide": 1.5}]})),
            ("/layout/resize", json!({"axles": [], "count": -1})),
        ];

        for (uri, request) in cases {
            let (status, body) = post(&client, uri, request);

            assert_eq!(status, Status::UnprocessableEntity);
            assert_eq!(body["kind"], "MalformedRequest");
            assert!(body["message"].as_str().map_or(false, |m| m.contains(uri)));
        }
    }

    #[test]
    fn resize_above_limit_is_rejected() {
        let client = client_with_max_axles(6);

        let (status, body) = post(&client, "/layout/resize", json!({"count": 7}));

        assert_eq!(status, Status::UnprocessableEntity);
        assert_eq!(body["kind"], "AxleLimitExceeded");
    }

    #[test]
    fn health_check() {
        let client = client_with_max_axles(6);

        let response = client.get("/health").dispatch();

        assert_eq!(response.status(), Status::Ok);
        assert_eq!(response.into_string().as_deref(), Some("ok"));
    }

    #[test]
    fn console_falls_back_to_default_config() {
        assert!(run_local("/nonexistent/layout.json").is_ok());
    }

    fn config_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("temp file");

        file.write_all(contents.as_bytes()).expect("write config");

        file
    }

    #[test]
    fn console_fails_on_invalid_layout() {
        let file = config_file(r#"{"axles": [{"name": "X", "tiresPerSide": 4}]}"#);

        let error = run_local(file.path().to_str().unwrap()).unwrap_err();

        assert_eq!(
            error.downcast::<LayoutError>().ok(),
            Some(LayoutError::InvalidTiresPerSide { axle_index: 0, value: 4 })
        );
    }

    #[test]
    fn console_fails_on_malformed_config() {
        let file = config_file(r#"{"axles": [{"name": "X", "tiresPerSide": 2},]}"#);

        let error = run_local(file.path().to_str().unwrap()).unwrap_err();

        assert!(error.downcast::<serde_json::Error>().is_ok());
    }
}
