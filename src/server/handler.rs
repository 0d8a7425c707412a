// src/server/handler.rs
use hyper::header::CONTENT_TYPE;
use hyper::{Body, Request, Response, StatusCode};
use std::sync::Arc;
use tower::Service;
use tracing::error;

use crate::bootstrap::{Bootstrap, ServiceContainer};
use crate::environment::{ExecutionEnvironment, HealthcheckEnvironment};
use crate::health::{CheckRegistry, HealthChecker};

static INDEX_HTML: &str = include_str!("../../assets/index.html");
static MAIN_JS: &str = include_str!("../../assets/main.js");
static MAIN_CSS: &str = include_str!("../../assets/main.css");

/// The endpoints the dashboard serves. Everything else is a 404, so the
/// handler can sit in front of (or instead of) the host application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Dashboard,
    CompiletimeJson,
    RuntimeJson,
    MainJs,
    MainCss,
}

impl Endpoint {
    pub fn try_from_path(path: &str) -> Option<Self> {
        match path {
            "/setup" | "/setup/" | "/setup/index" | "/setup/index.html" => Some(Self::Dashboard),
            "/setup/compiletime.json" => Some(Self::CompiletimeJson),
            "/setup/runtime.json" => Some(Self::RuntimeJson),
            "/setup/main.js" => Some(Self::MainJs),
            "/setup/main.css" => Some(Self::MainCss),
            _ => None,
        }
    }
}

/// The two phase-keyed check lists an endpoint can ask for.
#[derive(Debug, Clone, Copy)]
enum Phase {
    Compiletime,
    Runtime,
}

/// Everything a request needs, shared across connections. The web server
/// process is fully booted, so both phases run with the container attached.
pub struct AppState {
    pub bootstrap: Bootstrap,
    pub container: ServiceContainer,
    pub registry: CheckRegistry,
}

#[derive(Clone)]
pub struct RequestHandler {
    state: Arc<AppState>,
}

impl RequestHandler {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }
}

impl Service<Request<Body>> for RequestHandler {
    type Response = Response<Body>;
    type Error = Box<dyn std::error::Error + Send + Sync>;
    type Future = futures::future::BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &mut self,
        _cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        std::task::Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let state = self.state.clone();
        Box::pin(async move { Ok(handle(state, req).await) })
    }
}

async fn handle(state: Arc<AppState>, req: Request<Body>) -> Response<Body> {
    let Some(endpoint) = Endpoint::try_from_path(req.uri().path()) else {
        return plain_response(StatusCode::NOT_FOUND, "Not Found");
    };

    match endpoint {
        Endpoint::Dashboard => asset_response(INDEX_HTML, "text/html; charset=utf-8"),
        Endpoint::MainJs => asset_response(MAIN_JS, "application/javascript; charset=utf-8"),
        Endpoint::MainCss => asset_response(MAIN_CSS, "text/css; charset=utf-8"),
        Endpoint::CompiletimeJson => checks_response(&state, &req, Phase::Compiletime).await,
        Endpoint::RuntimeJson => checks_response(&state, &req, Phase::Runtime).await,
    }
}

async fn checks_response(state: &AppState, req: &Request<Body>, phase: Phase) -> Response<Body> {
    let environment = HealthcheckEnvironment::new(
        state.bootstrap.context,
        ExecutionEnvironment::web(req.uri().to_string()),
    );
    let configured = match phase {
        Phase::Compiletime => &state.bootstrap.settings.healthchecks.compiletime,
        Phase::Runtime => &state.bootstrap.settings.healthchecks.runtime,
    };

    let checker = HealthChecker::new(&state.registry, &state.bootstrap, environment)
        .with_container(&state.container);

    let collection = match checker.execute(configured).await {
        Ok(collection) => collection,
        Err(err) => {
            error!(%err, "invalid health check configuration");
            return plain_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Invalid health check configuration. See the server log.",
            );
        }
    };

    let status = if collection.has_error() {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::OK
    };
    let body = match collection.to_json() {
        Ok(json) => json,
        Err(err) => {
            error!(%err, "could not serialize health collection");
            return plain_response(StatusCode::INTERNAL_SERVER_ERROR, "Serialization failed");
        }
    };

    Response::builder()
        .status(status)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .expect("static response parts are valid")
}

fn asset_response(contents: &'static str, content_type: &'static str) -> Response<Body> {
    Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, content_type)
        .body(Body::from(contents))
        .expect("static response parts are valid")
}

fn plain_response(status: StatusCode, body: &'static str) -> Response<Body> {
    Response::builder()
        .status(status)
        .header(CONTENT_TYPE, "text/plain; charset=utf-8")
        .body(Body::from(body))
        .expect("static response parts are valid")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::builtin_registry;
    use crate::config::{CheckConfig, Settings};
    use crate::health::HealthCollection;

    #[test]
    fn endpoint_mapping_covers_all_dashboard_paths() {
        assert_eq!(Endpoint::try_from_path("/setup"), Some(Endpoint::Dashboard));
        assert_eq!(Endpoint::try_from_path("/setup/"), Some(Endpoint::Dashboard));
        assert_eq!(
            Endpoint::try_from_path("/setup/index.html"),
            Some(Endpoint::Dashboard)
        );
        assert_eq!(
            Endpoint::try_from_path("/setup/compiletime.json"),
            Some(Endpoint::CompiletimeJson)
        );
        assert_eq!(
            Endpoint::try_from_path("/setup/runtime.json"),
            Some(Endpoint::RuntimeJson)
        );
        assert_eq!(Endpoint::try_from_path("/setup/main.js"), Some(Endpoint::MainJs));
        assert_eq!(Endpoint::try_from_path("/setup/main.css"), Some(Endpoint::MainCss));
        assert_eq!(Endpoint::try_from_path("/"), None);
        assert_eq!(Endpoint::try_from_path("/setup/other"), None);
    }

    async fn state_for(settings: Settings, root: &std::path::Path) -> Arc<AppState> {
        let bootstrap = Bootstrap::new(root, settings);
        let container = bootstrap.boot().await.unwrap();
        Arc::new(AppState {
            bootstrap,
            container,
            registry: builtin_registry(),
        })
    }

    fn settings_with_compiletime(checks: Vec<CheckConfig>) -> Settings {
        Settings {
            healthchecks: crate::config::HealthchecksSettings {
                compiletime: checks,
                runtime: Vec::new(),
            },
            ..Settings::default()
        }
    }

    fn get(path: &str) -> Request<Body> {
        Request::builder()
            .uri(format!("http://localhost{path}"))
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn healthy_compiletime_endpoint_returns_200_json() {
        let root = tempfile::tempdir().unwrap();
        let settings = settings_with_compiletime(vec![CheckConfig {
            identifier: "basic".to_string(),
            check: Some("basicRequirements".to_string()),
            position: 10,
        }]);
        let state = state_for(settings, root.path()).await;

        let response = handle(state, get("/setup/compiletime.json")).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[CONTENT_TYPE].to_str().unwrap(),
            "application/json"
        );

        let body = hyper::body::to_bytes(response.into_body()).await.unwrap();
        let collection =
            HealthCollection::from_json_str(std::str::from_utf8(&body).unwrap()).unwrap();
        assert_eq!(collection.len(), 1);
        assert!(!collection.has_error());
    }

    #[tokio::test]
    async fn failing_check_turns_the_endpoint_503() {
        let root = tempfile::tempdir().unwrap();
        // No database configured, so the database check errors.
        let settings = settings_with_compiletime(vec![CheckConfig {
            identifier: "db".to_string(),
            check: Some("database".to_string()),
            position: 10,
        }]);
        let state = state_for(settings, root.path()).await;

        let response = handle(state, get("/setup/compiletime.json")).await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn empty_configuration_is_healthy() {
        let root = tempfile::tempdir().unwrap();
        let state = state_for(settings_with_compiletime(Vec::new()), root.path()).await;

        let response = handle(state, get("/setup/compiletime.json")).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = hyper::body::to_bytes(response.into_body()).await.unwrap();
        assert_eq!(std::str::from_utf8(&body).unwrap(), "[]");
    }

    #[tokio::test]
    async fn unknown_check_reference_is_a_server_error() {
        let root = tempfile::tempdir().unwrap();
        let settings = settings_with_compiletime(vec![CheckConfig {
            identifier: "nope".to_string(),
            check: Some("doesNotExist".to_string()),
            position: 10,
        }]);
        let state = state_for(settings, root.path()).await;

        let response = handle(state, get("/setup/compiletime.json")).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn dashboard_and_assets_are_served() {
        let root = tempfile::tempdir().unwrap();
        let state = state_for(Settings::default(), root.path()).await;

        for (path, content_type) in [
            ("/setup", "text/html; charset=utf-8"),
            ("/setup/main.js", "application/javascript; charset=utf-8"),
            ("/setup/main.css", "text/css; charset=utf-8"),
        ] {
            let response = handle(state.clone(), get(path)).await;
            assert_eq!(response.status(), StatusCode::OK, "{path}");
            assert_eq!(
                response.headers()[CONTENT_TYPE].to_str().unwrap(),
                content_type
            );
        }

        let response = handle(state, get("/somewhere/else")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
