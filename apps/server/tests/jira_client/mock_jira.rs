//! Mock Jira REST v2 server.
//!
//! Every request is recorded; answers are canned per route.

use std::net::TcpListener;
use std::sync::{Arc, Mutex};

use actix_web::{App, HttpRequest, HttpResponse, HttpServer, web};
use serde_json::{Value, json};

use store_qa_lib::config::TrackerSettings;

pub const PROJECT_KEY: &str = "SCRUM";
pub const CREATED_KEY: &str = "SCRUM-42";

/// One request as the mock saw it.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub query: String,
    pub authorization: Option<String>,
    pub body: Value,
}

type RequestLog = Arc<Mutex<Vec<Recorded>>>;

pub struct MockJira {
    pub base_url: String,
    log: RequestLog,
}

impl MockJira {
    pub async fn start() -> Self {
        let log: RequestLog = Arc::new(Mutex::new(Vec::new()));
        let listener = TcpListener::bind("127.0.0.1:0").expect("failed to bind");
        let port = listener.local_addr().unwrap().port();

        let server_log = log.clone();
        let server = HttpServer::new(move || {
            App::new()
                .app_data(web::Data::new(server_log.clone()))
                .default_service(web::to(handle))
        })
        .workers(1)
        .listen(listener)
        .expect("failed to listen")
        .disable_signals()
        .run();

        tokio::spawn(server);

        Self {
            base_url: format!("http://127.0.0.1:{}", port),
            log,
        }
    }

    pub fn settings(&self) -> TrackerSettings {
        TrackerSettings {
            server: format!("{}/", self.base_url),
            username: "qa@example.com".to_string(),
            api_token: "jira-token".to_string().into(),
            project_key: PROJECT_KEY.to_string(),
            issue_prefix: PROJECT_KEY.to_string(),
        }
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.log.lock().unwrap().clone()
    }

    pub fn last(&self) -> Recorded {
        self.requests().pop().expect("no request recorded")
    }
}

async fn handle(req: HttpRequest, body: web::Bytes, log: web::Data<RequestLog>) -> HttpResponse {
    let recorded = Recorded {
        method: req.method().to_string(),
        path: req.path().to_string(),
        query: req.query_string().to_string(),
        authorization: req
            .headers()
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body: serde_json::from_slice(&body).unwrap_or(Value::Null),
    };
    let method = recorded.method.clone();
    let path = recorded.path.clone();
    log.lock().unwrap().push(recorded);

    let Some(route) = path.strip_prefix("/rest/api/2") else {
        return HttpResponse::NotFound().finish();
    };

    match (method.as_str(), route) {
        ("GET", "/search") => HttpResponse::Ok().json(json!({
            "total": 3,
            "issues": [
                {"key": "SCRUM-9", "fields": {"summary": "Defect for TC_001: List all products"}},
                {"key": "SCRUM-4", "fields": {"summary": "Defect for TC_001: older"}},
            ],
        })),
        ("POST", "/issue") => HttpResponse::Created().json(json!({
            "id": "10042",
            "key": CREATED_KEY,
        })),
        ("POST", "/issueLink") => HttpResponse::Created().finish(),
        ("GET", "/project/SCRUM") => HttpResponse::Ok().json(json!({
            "key": PROJECT_KEY,
            "name": "Store QA",
        })),
        ("GET", r) if r.starts_with("/project/") => HttpResponse::NotFound().json(json!({
            "errorMessages": ["No project could be found"],
        })),
        ("POST", r) if r.starts_with("/issue/") && r.ends_with("/comment") => {
            HttpResponse::Created().json(json!({"id": "1"}))
        }
        ("PUT", r) if r.starts_with("/issue/") => HttpResponse::NoContent().finish(),
        _ => HttpResponse::NotFound().finish(),
    }
}
