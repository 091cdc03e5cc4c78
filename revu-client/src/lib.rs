//! HTTP client for the review service.
//!
//! A thin, concrete wrapper around `reqwest` covering the service's whole
//! contract: analyze (JSON and multipart upload), dashboard summary, rule
//! fetch/save, and report-export URL derivation. Responses deserialize
//! directly into `revu-core` wire types.
//!
//! Error policy: any non-success status or transport failure becomes an
//! `anyhow` error carrying the status for the log; response bodies of failed
//! calls are logged here and never propagated, so callers can only ever
//! surface their own generic message to the user.

use std::time::Duration;

use anyhow::Context;
use reqwest::multipart::{Form, Part};
use serde::Serialize;
use tracing::{debug, error};
use url::Url;

use revu_core::types::{AnalysisResult, DashboardSummary, RuleSet};

/// Default service base URL, matching the development server.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Report export formats offered by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Html,
    Txt,
}

impl ReportFormat {
    /// The `format` query-parameter value.
    pub fn as_str(self) -> &'static str {
        match self {
            ReportFormat::Html => "html",
            ReportFormat::Txt => "txt",
        }
    }
}

/// Body of `POST /analyze`.
#[derive(Debug, Serialize)]
struct AnalyzeRequest<'a> {
    code: &'a str,
    filename: &'a str,
}

/// Client for the review service's HTTP API.
#[derive(Debug, Clone)]
pub struct ReviewClient {
    base_url: Url,
    http: reqwest::Client,
}

impl ReviewClient {
    /// Creates a client for `base_url` (e.g. `http://localhost:8080/api`).
    ///
    /// The base URL is normalized to end with `/` at construction so that
    /// `Url::join` appends endpoint segments instead of replacing the last
    /// path segment of the base.
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        let mut normalized = base_url.trim_end_matches('/').to_owned();
        normalized.push('/');
        let base_url = Url::parse(&normalized)
            .with_context(|| format!("invalid service base URL: {base_url}"))?;
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { base_url, http })
    }

    fn endpoint(&self, path: &str) -> anyhow::Result<Url> {
        self.base_url
            .join(path)
            .with_context(|| format!("invalid endpoint path: {path}"))
    }

    /// `POST /analyze` — submits pasted/edited source for analysis.
    pub async fn analyze(&self, code: &str, filename: &str) -> anyhow::Result<AnalysisResult> {
        let url = self.endpoint("analyze")?;
        debug!("POST {url} ({filename}, {} bytes)", code.len());
        let response = self
            .http
            .post(url)
            .json(&AnalyzeRequest { code, filename })
            .send()
            .await?;
        Self::read_json(response, "analyze").await
    }

    /// `POST /analyze/upload` — submits a file as a multipart form.
    ///
    /// The service reads the part's bytes as UTF-8 source and its file name
    /// as the review filename.
    pub async fn analyze_upload(
        &self,
        filename: &str,
        contents: Vec<u8>,
    ) -> anyhow::Result<AnalysisResult> {
        let url = self.endpoint("analyze/upload")?;
        debug!("POST {url} (multipart {filename}, {} bytes)", contents.len());
        let part = Part::bytes(contents)
            .file_name(filename.to_owned())
            .mime_str("text/x-java-source")?;
        let form = Form::new().part("file", part);
        let response = self.http.post(url).multipart(form).send().await?;
        Self::read_json(response, "analyze/upload").await
    }

    /// `GET /dashboard/summary` — aggregate counters across all reviews.
    pub async fn dashboard_summary(&self) -> anyhow::Result<DashboardSummary> {
        let url = self.endpoint("dashboard/summary")?;
        debug!("GET {url}");
        let response = self.http.get(url).send().await?;
        Self::read_json(response, "dashboard/summary").await
    }

    /// `GET /rules` — the authoritative rule-name → enabled mapping.
    pub async fn fetch_rules(&self) -> anyhow::Result<RuleSet> {
        let url = self.endpoint("rules")?;
        debug!("GET {url}");
        let response = self.http.get(url).send().await?;
        Self::read_json(response, "rules").await
    }

    /// `PUT /rules` — pushes the full working rule set.
    ///
    /// The service echoes the saved mapping; only success matters here, so
    /// the body is discarded.
    pub async fn update_rules(&self, rules: &RuleSet) -> anyhow::Result<()> {
        let url = self.endpoint("rules")?;
        debug!("PUT {url} ({} rules)", rules.len());
        let response = self.http.put(url).json(rules).send().await?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            error!("rules save failed ({status}): {body}");
            anyhow::bail!("rules save failed with status {status}")
        }
    }

    /// Derives the report-export locator for a completed review.
    ///
    /// Pure string derivation; the report is never fetched or parsed here.
    pub fn export_report_url(&self, review_id: i64, format: ReportFormat) -> String {
        format!(
            "{}/reviews/{review_id}/export?format={}",
            self.base_url.as_str().trim_end_matches('/'),
            format.as_str(),
        )
    }

    /// Deserializes a success body, or maps a failure status to an error.
    ///
    /// The body of a failed call is logged in full and deliberately absent
    /// from the returned error.
    async fn read_json<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
        what: &str,
    ) -> anyhow::Result<T> {
        let status = response.status();
        if status.is_success() {
            response
                .json::<T>()
                .await
                .with_context(|| format!("malformed {what} response"))
        } else {
            let body = response.text().await.unwrap_or_default();
            error!("{what} failed ({status}): {body}");
            anyhow::bail!("{what} failed with status {status}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    fn analysis_body() -> serde_json::Value {
        json!({
            "reviewId": 42,
            "filename": "MyClass.java",
            "issues": [{
                "id": 1,
                "lineNumber": 3,
                "category": "ERROR",
                "severity": "HIGH",
                "title": "Unmatched braces",
                "description": "Brace count is uneven.",
                "suggestion": "Balance the braces."
            }],
            "errorCount": 1,
            "warningCount": 0,
            "optimizationCount": 0,
            "securityCount": 0
        })
    }

    #[tokio::test]
    async fn analyze_posts_code_and_filename() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/analyze")
            .match_body(Matcher::Json(json!({
                "code": "class A {}",
                "filename": "A.java"
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(analysis_body().to_string())
            .create_async()
            .await;

        let client = ReviewClient::new(&format!("{}/api", server.url())).unwrap();
        let result = client.analyze("class A {}", "A.java").await.unwrap();

        mock.assert_async().await;
        assert_eq!(result.review_id, 42);
        assert_eq!(result.issues.len(), 1);
        assert_eq!(result.issues[0].line_number, Some(3));
    }

    #[tokio::test]
    async fn analyze_failure_is_generic() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/analyze")
            .with_status(500)
            .with_body("stack trace with internals")
            .create_async()
            .await;

        let client = ReviewClient::new(&format!("{}/api", server.url())).unwrap();
        let err = client.analyze("class A {}", "A.java").await.unwrap_err();

        // The server's body must not leak into the error chain.
        let chain = format!("{err:#}");
        assert!(chain.contains("500"), "unexpected error: {chain}");
        assert!(!chain.contains("stack trace"), "leaked body: {chain}");
    }

    #[tokio::test]
    async fn upload_sends_a_multipart_file_part() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/analyze/upload")
            .match_header(
                "content-type",
                Matcher::Regex("^multipart/form-data.*".to_owned()),
            )
            .match_body(Matcher::Regex("name=\"file\"".to_owned()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(analysis_body().to_string())
            .create_async()
            .await;

        let client = ReviewClient::new(&format!("{}/api", server.url())).unwrap();
        let result = client
            .analyze_upload("MyClass.java", b"class A {}".to_vec())
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(result.filename, "MyClass.java");
    }

    #[tokio::test]
    async fn dashboard_summary_deserializes() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/dashboard/summary")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "totalReviews": 3,
                    "totalIssues": 12,
                    "totalErrors": 4,
                    "totalWarnings": 5,
                    "totalOptimizations": 2,
                    "totalSecurityIssues": 1
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client = ReviewClient::new(&format!("{}/api", server.url())).unwrap();
        let summary = client.dashboard_summary().await.unwrap();
        assert_eq!(summary.total_reviews, 3);
        assert_eq!(summary.total_security_issues, 1);
    }

    #[tokio::test]
    async fn rules_round_trip() {
        let mut server = mockito::Server::new_async().await;
        let rules_json = json!({"long-line": true, "unused-import": false});
        server
            .mock("GET", "/api/rules")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(rules_json.to_string())
            .create_async()
            .await;
        let put = server
            .mock("PUT", "/api/rules")
            .match_body(Matcher::Json(rules_json.clone()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(rules_json.to_string())
            .create_async()
            .await;

        let client = ReviewClient::new(&format!("{}/api", server.url())).unwrap();
        let rules = client.fetch_rules().await.unwrap();
        assert_eq!(rules.len(), 2);
        assert_eq!(rules["long-line"], true);

        client.update_rules(&rules).await.unwrap();
        put.assert_async().await;
    }

    #[tokio::test]
    async fn update_rules_failure_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("PUT", "/api/rules")
            .with_status(503)
            .create_async()
            .await;

        let client = ReviewClient::new(&format!("{}/api", server.url())).unwrap();
        let rules = RuleSet::from([("long-line".to_owned(), true)]);
        assert!(client.update_rules(&rules).await.is_err());
    }

    #[test]
    fn export_url_is_deterministic() {
        let client = ReviewClient::new("http://localhost:8080/api").unwrap();
        assert_eq!(
            client.export_report_url(42, ReportFormat::Txt),
            "http://localhost:8080/api/reviews/42/export?format=txt"
        );
        assert_eq!(
            client.export_report_url(7, ReportFormat::Html),
            "http://localhost:8080/api/reviews/7/export?format=html"
        );

        // A trailing slash on the configured base changes nothing.
        let slashed = ReviewClient::new("http://localhost:8080/api/").unwrap();
        assert_eq!(
            slashed.export_report_url(42, ReportFormat::Txt),
            "http://localhost:8080/api/reviews/42/export?format=txt"
        );
    }
}
