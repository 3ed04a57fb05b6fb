//! Integration tests for Crawler.
//!
//! Uses wiremock to serve the manifest and its `.well-known` lists. Tests
//! cover the end-to-end pipeline, provenance ordering and short-circuiting,
//! and how decode and schema failures surface.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use fundcrawl_core::{
    AcceptAll, CrawlConfig, CrawlError, Crawler, Fetcher, Manifest, ProvenanceError, SchemaError,
    SchemaValidator, UrlRef, V1Schema,
};
use serde_json::json;
use wiremock::matchers::{any, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ENTITY_LIST: &str = "/.well-known/funding-manifest-urls";
const P0_WEB_LIST: &str = "/p0/web/.well-known/funding-manifest-urls";
const P0_REPO_LIST: &str = "/p0/repo/.well-known/funding-manifest-urls";
const P1_WEB_LIST: &str = "/p1/web/.well-known/funding-manifest-urls";
const P1_REPO_LIST: &str = "/p1/repo/.well-known/funding-manifest-urls";

fn test_config() -> CrawlConfig {
    CrawlConfig::default()
        .with_req_timeout(Duration::from_secs(2))
        .with_attempts(2)
}

fn crawler(schema: impl SchemaValidator + 'static) -> Crawler {
    Crawler::new(test_config(), schema).expect("failed to create crawler")
}

fn manifest_url(server: &MockServer) -> String {
    format!("{}/funding.json", server.uri())
}

/// A two-project manifest. `lists` gives the well-known path for the entity
/// webpage, then each project's webpage and repository; `None` leaves it empty.
fn manifest_body(server: &MockServer, lists: [Option<&str>; 5]) -> String {
    let base = server.uri();
    let url_ref = |url: &str, list: Option<&str>| match list {
        Some(p) => json!({ "url": url, "wellKnown": format!("{}{}", base, p) }),
        None => json!({ "url": url }),
    };

    json!({
        "version": "v1.0.0",
        "entity": {
            "type": "organisation",
            "role": "owner",
            "name": "Example Org",
            "email": "funding@a.example",
            "description": "We build things.",
            "webpageUrl": url_ref(&format!("{}/", base), lists[0])
        },
        "projects": [
            {
                "guid": "widget",
                "name": "Widget",
                "description": "A widget.",
                "webpageUrl": url_ref(&format!("{}/p0/web", base), lists[1]),
                "repositoryUrl": url_ref(&format!("{}/p0/repo", base), lists[2]),
                "licenses": ["spdx:MIT"],
                "tags": ["Tools"]
            },
            {
                "guid": "gadget",
                "name": "Gadget",
                "description": "A gadget.",
                "webpageUrl": url_ref(&format!("{}/p1/web", base), lists[3]),
                "repositoryUrl": url_ref(&format!("{}/p1/repo", base), lists[4]),
                "licenses": ["spdx:Apache-2.0"],
                "tags": []
            }
        ]
    })
    .to_string()
}

async fn mount_manifest(server: &MockServer, body: &str) {
    Mock::given(method("GET"))
        .and(path("/funding.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_list(server: &MockServer, list_path: &str, body: String, times: u64) {
    Mock::given(method("GET"))
        .and(path(list_path))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(times)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_fetch_manifest_end_to_end() {
    let server = MockServer::start().await;
    let url = manifest_url(&server);
    let body = manifest_body(
        &server,
        [Some(ENTITY_LIST), None, Some(P0_REPO_LIST), None, Some(P1_REPO_LIST)],
    );

    mount_manifest(&server, &body).await;
    mount_list(&server, ENTITY_LIST, format!("https://elsewhere.example/funding.json\n{}\n", url), 1).await;
    mount_list(&server, P0_REPO_LIST, url.clone(), 1).await;
    mount_list(&server, P1_REPO_LIST, format!("{}\n", url), 1).await;

    let manifest = crawler(AcceptAll)
        .fetch_manifest(&url)
        .await
        .expect("pipeline failed");

    assert_eq!(manifest.url, url);
    assert_eq!(manifest.body, body);
    assert_eq!(manifest.entity.name, "Example Org");
    assert_eq!(manifest.projects.len(), 2);
    assert_eq!(manifest.projects[1].guid, "gadget");
}

#[tokio::test]
async fn test_entity_failure_skips_projects() {
    let server = MockServer::start().await;
    let url = manifest_url(&server);
    let body = manifest_body(
        &server,
        [
            Some(ENTITY_LIST),
            Some(P0_WEB_LIST),
            Some(P0_REPO_LIST),
            Some(P1_WEB_LIST),
            Some(P1_REPO_LIST),
        ],
    );

    mount_manifest(&server, &body).await;
    mount_list(&server, ENTITY_LIST, "https://someone-else.example/funding.json".into(), 1).await;
    for list in [P0_WEB_LIST, P0_REPO_LIST, P1_WEB_LIST, P1_REPO_LIST] {
        mount_list(&server, list, url.clone(), 0).await;
    }

    let result = crawler(AcceptAll).fetch_manifest(&url).await;

    match result {
        Err(CrawlError::Provenance { target, source }) => {
            assert_eq!(target, "entity.webpageUrl");
            assert_eq!(source, ProvenanceError::NotListed { manifest_url: url });
        }
        other => panic!("expected Provenance error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_first_project_failure_stops_the_scan() {
    let server = MockServer::start().await;
    let url = manifest_url(&server);
    let body = manifest_body(
        &server,
        [
            Some(ENTITY_LIST),
            Some(P0_WEB_LIST),
            Some(P0_REPO_LIST),
            Some(P1_WEB_LIST),
            Some(P1_REPO_LIST),
        ],
    );

    mount_manifest(&server, &body).await;
    mount_list(&server, ENTITY_LIST, url.clone(), 1).await;
    mount_list(&server, P0_WEB_LIST, format!("{} ", url), 1).await;
    mount_list(&server, P0_REPO_LIST, url.clone(), 0).await;
    mount_list(&server, P1_WEB_LIST, url.clone(), 0).await;
    mount_list(&server, P1_REPO_LIST, url.clone(), 0).await;

    let result = crawler(AcceptAll).fetch_manifest(&url).await;

    match result {
        Err(CrawlError::Provenance { target, .. }) => {
            assert_eq!(target, "projects[0].webpageUrl")
        }
        other => panic!("expected Provenance error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unreachable_list_propagates_fetch_error() {
    let server = MockServer::start().await;
    let url = manifest_url(&server);
    let body = manifest_body(&server, [None, None, Some(P0_REPO_LIST), None, Some(P1_REPO_LIST)]);

    mount_manifest(&server, &body).await;
    Mock::given(method("GET"))
        .and(path(P0_REPO_LIST))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;
    mount_list(&server, P1_REPO_LIST, url.clone(), 0).await;

    let result = crawler(AcceptAll).fetch_manifest(&url).await;

    match result {
        Err(CrawlError::Status { url: list_url, status }) => {
            assert_eq!(status, 404);
            assert!(list_url.ends_with(P0_REPO_LIST));
        }
        other => panic!("expected Status error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_oversized_list_fails_as_too_large() {
    let server = MockServer::start().await;
    let url = manifest_url(&server);
    let body = manifest_body(&server, [Some(ENTITY_LIST), None, None, None, None]);

    let list: Vec<String> = (0..102)
        .map(|i| format!("https://other.example/{}.json", i))
        .collect();

    mount_manifest(&server, &body).await;
    mount_list(&server, ENTITY_LIST, list.join("\n"), 1).await;

    let result = crawler(AcceptAll).fetch_manifest(&url).await;

    assert!(matches!(
        result,
        Err(CrawlError::Provenance {
            source: ProvenanceError::ListTooLarge,
            ..
        })
    ));
}

#[tokio::test]
async fn test_manifest_status_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/funding.json"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let result = crawler(AcceptAll).fetch_manifest(&manifest_url(&server)).await;
    assert!(matches!(result, Err(CrawlError::Status { status: 500, .. })));
}

#[tokio::test]
async fn test_decode_failure_skips_validation() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counted = Arc::clone(&calls);
    let validator = move |m: Manifest| -> Result<Manifest, SchemaError> {
        counted.fetch_add(1, Ordering::SeqCst);
        Ok(m)
    };

    let result = crawler(validator)
        .parse_manifest(b"{\"version\": ", "https://a.example/funding.json", true)
        .await;

    match result {
        Err(e @ CrawlError::Decode { .. }) => {
            assert!(e.to_string().starts_with("error parsing JSON body: "));
            assert!(e.manifest().is_none());
        }
        other => panic!("expected Decode error, got {:?}", other),
    }
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_schema_failure_returns_validator_manifest() {
    let server = MockServer::start().await;
    let body = manifest_body(&server, [Some(ENTITY_LIST), None, None, None, None]);
    mount_list(&server, ENTITY_LIST, manifest_url(&server), 0).await;

    let validator = |mut m: Manifest| -> Result<Manifest, SchemaError> {
        m.entity.name = "normalised".into();
        Err(SchemaError::new(m, vec!["entity.role: unknown".into()]))
    };

    let result = crawler(validator)
        .parse_manifest(body.as_bytes(), &manifest_url(&server), true)
        .await;

    let err = result.expect_err("schema should fail");
    let returned = err.manifest().expect("schema errors carry the manifest");
    assert_eq!(returned.entity.name, "normalised");
    assert_eq!(returned.url, manifest_url(&server));
    assert_eq!(returned.body, body);
    assert_eq!(
        err.to_string(),
        "manifest failed schema validation: entity.role: unknown"
    );
}

#[tokio::test]
async fn test_parse_without_provenance_makes_no_requests() {
    let server = MockServer::start().await;
    let body = manifest_body(
        &server,
        [
            Some(ENTITY_LIST),
            Some(P0_WEB_LIST),
            Some(P0_REPO_LIST),
            Some(P1_WEB_LIST),
            Some(P1_REPO_LIST),
        ],
    );

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let manifest = crawler(AcceptAll)
        .parse_manifest(body.as_bytes(), "https://replay.example/funding.json", false)
        .await
        .expect("parse failed");

    assert_eq!(manifest.url, "https://replay.example/funding.json");
    assert_eq!(manifest.projects.len(), 2);
}

#[tokio::test]
async fn test_v1_schema_end_to_end_without_lists() {
    let server = MockServer::start().await;
    let url = manifest_url(&server);
    let body = manifest_body(&server, [None, None, None, None, None]);
    mount_manifest(&server, &body).await;

    let manifest = crawler(V1Schema)
        .fetch_manifest(&url)
        .await
        .expect("pipeline failed");

    assert_eq!(manifest.projects[0].tags, vec!["tools"]);
    assert_eq!(manifest.url, url);
}

#[tokio::test]
async fn test_check_provenance_exempt_without_network() {
    let server = MockServer::start().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let url_ref = UrlRef::new(format!("{}/p0/web", server.uri()));
    crawler(AcceptAll)
        .check_provenance(&url_ref, "https://a.example/funding.json")
        .await
        .expect("exempt references pass");
}

#[tokio::test]
async fn test_check_provenance_exact_match() {
    let server = MockServer::start().await;
    mount_list(
        &server,
        ENTITY_LIST,
        "https://a.example/funding.json\nhttps://other".into(),
        2,
    )
    .await;

    let url_ref = UrlRef::new("https://a.example")
        .with_well_known(format!("{}{}", server.uri(), ENTITY_LIST));
    let crawler = crawler(AcceptAll);

    crawler
        .check_provenance(&url_ref, "https://a.example/funding.json")
        .await
        .expect("listed URL should pass");

    let result = crawler
        .check_provenance(&url_ref, "https://a.example/funding.json ")
        .await;
    match result {
        Err(CrawlError::Provenance { target, source }) => {
            assert_eq!(target, "https://a.example");
            assert!(matches!(source, ProvenanceError::NotListed { .. }));
        }
        other => panic!("expected Provenance error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_shared_fetcher() {
    let server = MockServer::start().await;
    let url = manifest_url(&server);
    mount_manifest(&server, &manifest_body(&server, [None; 5])).await;

    let fetcher = Fetcher::new(test_config()).unwrap();
    let crawler = Crawler::with_fetcher(fetcher.clone(), Arc::new(AcceptAll));

    assert_eq!(crawler.fetcher().config(), fetcher.config());
    assert!(crawler.fetch_manifest(&url).await.is_ok());
}
