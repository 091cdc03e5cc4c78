//! Background task that owns the HTTP client.
//!
//! The worker loops over incoming `ApiRequest` messages until the channel is
//! closed (sender dropped). Each request is served in its own spawned task so
//! a slow analyze never delays a dashboard or rules fetch; settlements are
//! sent back via `event_tx` as `AppEvent::Api`.
//!
//! Failure policy lives here: analyze/upload failures settle with a generic
//! user-facing message, dashboard and rules-load failures are logged and
//! swallowed entirely (the panels keep their loading placeholder), and save
//! failures settle so the store can return to its dirty state.

use std::path::PathBuf;

use revu_client::ReviewClient;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tracing::warn;

use crate::event::AppEvent;
use crate::net::types::{ApiRequest, ApiResponse};

/// Generic analyze failure text, shown in the status bar.
const ANALYZE_FAILED: &str = "Something went wrong while analyzing.";

/// Generic upload failure text, shown in the status bar.
const UPLOAD_FAILED: &str = "File upload failed.";

/// Spawns the network worker task.
///
/// Runs until `rx` is closed. Each request gets its own task with a clone of
/// the client, so request lifetimes are independent and responses arrive in
/// whatever order the network produces them; the session's sequence guard
/// handles the rest.
pub fn spawn_api_worker(
    client: ReviewClient,
    mut rx: UnboundedReceiver<ApiRequest>,
    event_tx: UnboundedSender<AppEvent>,
) {
    tokio::spawn(async move {
        while let Some(request) = rx.recv().await {
            let client = client.clone();
            let event_tx = event_tx.clone();
            tokio::spawn(async move {
                if let Some(response) = handle_request(&client, request).await {
                    let _ = event_tx.send(AppEvent::Api(Box::new(response)));
                }
            });
        }
    });
}

/// Serves one request. `None` means the failure was swallowed by policy.
async fn handle_request(client: &ReviewClient, request: ApiRequest) -> Option<ApiResponse> {
    match request {
        ApiRequest::AnalyzeText { seq, code, filename } => {
            match client.analyze(&code, &filename).await {
                Ok(result) => Some(ApiResponse::AnalyzeOk { seq, result }),
                Err(err) => {
                    warn!("analyze failed: {err:#}");
                    Some(ApiResponse::AnalyzeFailed {
                        seq,
                        message: ANALYZE_FAILED.to_owned(),
                    })
                }
            }
        }
        ApiRequest::AnalyzeUpload { seq, path } => Some(handle_upload(client, seq, path).await),
        ApiRequest::FetchDashboard => match client.dashboard_summary().await {
            Ok(summary) => Some(ApiResponse::Dashboard(summary)),
            Err(err) => {
                // Best-effort: never surfaces, the previous snapshot (or the
                // loading placeholder) stays on screen.
                warn!("dashboard refresh failed: {err:#}");
                None
            }
        },
        ApiRequest::FetchRules => match client.fetch_rules().await {
            Ok(rules) => Some(ApiResponse::Rules(rules)),
            Err(err) => {
                warn!("rules load failed: {err:#}");
                None
            }
        },
        ApiRequest::SaveRules(rules) => match client.update_rules(&rules).await {
            Ok(()) => Some(ApiResponse::RulesSaved),
            Err(err) => {
                warn!("rules save failed: {err:#}");
                Some(ApiResponse::RulesSaveFailed)
            }
        },
    }
}

/// Reads the file and submits it as a multipart upload.
///
/// Read errors and transport errors settle identically: the session only
/// ever sees the generic upload message either way.
async fn handle_upload(client: &ReviewClient, seq: u64, path: PathBuf) -> ApiResponse {
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload.java".to_owned());

    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(err) => {
            warn!("could not read {}: {err}", path.display());
            return ApiResponse::AnalyzeFailed {
                seq,
                message: UPLOAD_FAILED.to_owned(),
            };
        }
    };
    // The editor shows exactly what was sent, so decode the same bytes.
    let contents = String::from_utf8_lossy(&bytes).into_owned();

    match client.analyze_upload(&filename, bytes).await {
        Ok(result) => ApiResponse::UploadOk {
            seq,
            result,
            filename,
            contents,
        },
        Err(err) => {
            warn!("upload failed: {err:#}");
            ApiResponse::AnalyzeFailed {
                seq,
                message: UPLOAD_FAILED.to_owned(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc::unbounded_channel;

    fn analysis_body() -> String {
        serde_json::json!({
            "reviewId": 5,
            "filename": "A.java",
            "issues": [],
            "errorCount": 0,
            "warningCount": 0,
            "optimizationCount": 0,
            "securityCount": 0
        })
        .to_string()
    }

    async fn recv_api(rx: &mut tokio::sync::mpsc::UnboundedReceiver<AppEvent>) -> ApiResponse {
        match rx.recv().await.expect("worker settlement") {
            AppEvent::Api(response) => *response,
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn upload_reads_the_file_and_settles_atomically() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/analyze/upload")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(analysis_body())
            .create_async()
            .await;

        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("A.java");
        std::fs::write(&path, "class A {}\n").unwrap();

        let client = ReviewClient::new(&format!("{}/api", server.url())).unwrap();
        let (req_tx, req_rx) = unbounded_channel();
        let (event_tx, mut event_rx) = unbounded_channel();
        spawn_api_worker(client, req_rx, event_tx);

        req_tx.send(ApiRequest::AnalyzeUpload { seq: 1, path }).unwrap();
        match recv_api(&mut event_rx).await {
            ApiResponse::UploadOk { seq, filename, contents, result } => {
                assert_eq!(seq, 1);
                assert_eq!(filename, "A.java");
                assert_eq!(contents, "class A {}\n");
                assert_eq!(result.review_id, 5);
            }
            other => panic!("unexpected settlement: {other:?}"),
        }
    }

    #[tokio::test]
    async fn unreadable_upload_settles_with_the_generic_message() {
        let server = mockito::Server::new_async().await;
        let client = ReviewClient::new(&format!("{}/api", server.url())).unwrap();
        let (req_tx, req_rx) = unbounded_channel();
        let (event_tx, mut event_rx) = unbounded_channel();
        spawn_api_worker(client, req_rx, event_tx);

        req_tx
            .send(ApiRequest::AnalyzeUpload {
                seq: 3,
                path: PathBuf::from("/no/such/file.java"),
            })
            .unwrap();
        match recv_api(&mut event_rx).await {
            ApiResponse::AnalyzeFailed { seq, message } => {
                assert_eq!(seq, 3);
                assert_eq!(message, UPLOAD_FAILED);
            }
            other => panic!("unexpected settlement: {other:?}"),
        }
    }

    #[tokio::test]
    async fn dashboard_failure_produces_no_settlement_at_all() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/dashboard/summary")
            .with_status(500)
            .create_async()
            .await;
        server
            .mock("GET", "/api/rules")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"long-line": true}"#)
            .create_async()
            .await;

        let client = ReviewClient::new(&format!("{}/api", server.url())).unwrap();
        let (req_tx, req_rx) = unbounded_channel();
        let (event_tx, mut event_rx) = unbounded_channel();
        spawn_api_worker(client, req_rx, event_tx);

        req_tx.send(ApiRequest::FetchDashboard).unwrap();
        req_tx.send(ApiRequest::FetchRules).unwrap();

        // Only the rules settlement arrives; the dashboard failure was
        // swallowed by policy.
        match recv_api(&mut event_rx).await {
            ApiResponse::Rules(rules) => assert_eq!(rules["long-line"], true),
            other => panic!("unexpected settlement: {other:?}"),
        }
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        assert!(event_rx.try_recv().is_err());
    }
}
