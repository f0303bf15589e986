//! Integration tests for a full build cycle through [`BuildContext`]
//!
//! Covers the path a site build takes: open, query, fetch, teardown, and a
//! second build that runs from the cache and leaves stale entries behind.

use sparql_cache::cache::{CacheKind, CacheManager, CacheStrategy};
use sparql_cache::sparql::QueryArg;
use sparql_cache::{BuildContext, SiteConfig};
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const COUNTRIES: &str = r#"{"results":{"bindings":[
  {"country":{"type":"uri","value":"http://www.wikidata.org/entity/Q16"}}
]}}"#;

const LABEL: &str = r#"{"results":{"bindings":[
  {"label":{"type":"literal","value":"Canada","xml:lang":"en"}}
]}}"#;

fn write_site(dir: &Path, endpoint: &str) -> SiteConfig {
    let queries = dir.join("queries");
    fs::create_dir_all(queries.join("country")).unwrap();
    fs::write(
        queries.join("countries.rq"),
        "SELECT ?country WHERE { ?country wdt:P31 wd:Q6256 }",
    )
    .unwrap();
    fs::write(
        queries.join("country").join("label.rq"),
        "SELECT ?label WHERE { <{{.}}> rdfs:label ?label }",
    )
    .unwrap();

    let config = format!(
        "sparql_client:\n  endpoint: {}\n  http_headers:\n    User-Agent: snowman-test\n",
        endpoint
    );
    fs::write(dir.join("snowman.yaml"), config).unwrap();
    SiteConfig::load(dir.join("snowman.yaml")).unwrap()
}

/// Test: A second build is served from the cache and sees the first
/// build's ledger when looking for unused entries
#[tokio::test(flavor = "multi_thread")]
async fn test_two_builds_share_the_cache() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/sparql"))
        .and(body_string_contains("Q6256"))
        .respond_with(ResponseTemplate::new(200).set_body_string(COUNTRIES))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/sparql"))
        .and(body_string_contains("rdfs%3Alabel"))
        .respond_with(ResponseTemplate::new(200).set_body_string(LABEL))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/flags/ca.svg"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<svg/>"))
        .expect(1)
        .mount(&server)
        .await;

    let endpoint = format!("{}/sparql", server.uri());
    let flag = format!("{}/flags/ca.svg", server.uri());
    let temp = TempDir::new().unwrap();
    let site = temp.path().to_path_buf();

    let (label, unused_after_second) = tokio::task::spawn_blocking(move || {
        let config = write_site(&site, &endpoint);
        let root = site.join(".snowman");
        let queries = site.join("queries");

        // First build: everything comes from the network
        let mut ctx =
            BuildContext::open(&config, &root, &queries, CacheStrategy::Available).unwrap();
        let countries = ctx.query("countries.rq", &[]).unwrap();
        let country = QueryArg::from(&countries[0]["country"]);
        let labels = ctx.query("country/label.rq", &[country]).unwrap();
        ctx.get_remote(&flag).unwrap();
        ctx.teardown().unwrap();

        // Second build: only the country list, served from the cache
        let mut ctx =
            BuildContext::open(&config, &root, &queries, CacheStrategy::Available).unwrap();
        assert_eq!(ctx.query("countries.rq", &[]).unwrap(), countries);
        ctx.teardown().unwrap();

        let sparql = CacheManager::new(CacheKind::Sparql, CacheStrategy::Available, &root).unwrap();
        let unused = sparql.unused_cache_paths().unwrap();

        (labels[0]["label"].to_string(), unused)
    })
    .await
    .unwrap();

    assert_eq!(label, "Canada");
    // The label query's directory and its single entry
    assert_eq!(unused_after_second.len(), 2);
    assert!(unused_after_second[0].is_dir());
    assert!(unused_after_second[1].is_file());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_unknown_query_fails_without_network() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string(COUNTRIES))
        .expect(0)
        .mount(&server)
        .await;

    let endpoint = format!("{}/sparql", server.uri());
    let temp = TempDir::new().unwrap();
    let site = temp.path().to_path_buf();

    let message = tokio::task::spawn_blocking(move || {
        let config = write_site(&site, &endpoint);
        let mut ctx = BuildContext::open(
            &config,
            site.join(".snowman"),
            site.join("queries"),
            CacheStrategy::Available,
        )
        .unwrap();
        ctx.query("missing.rq", &[]).unwrap_err().to_string()
    })
    .await
    .unwrap();

    assert_eq!(message, "The given query could not be found: missing.rq");
}
