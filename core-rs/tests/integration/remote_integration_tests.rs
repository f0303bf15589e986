//! Integration tests for the remote resource fetcher

use sparql_cache::cache::{hash, CacheKind, CacheManager, CacheStrategy};
use sparql_cache::{RemoteResources, SparqlCacheError};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CSV: &str = "code,name\nCA,Canada\nUS,United States\n";

#[tokio::test(flavor = "multi_thread")]
async fn test_get_remote_caches_by_host_and_url() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data/countries.csv"))
        .respond_with(ResponseTemplate::new(200).set_body_string(CSV))
        .expect(1)
        .mount(&server)
        .await;

    let url = format!("{}/data/countries.csv", server.uri());
    let temp = TempDir::new().unwrap();
    let root = temp.path().join(".snowman");

    let (first, second, stored_at) = tokio::task::spawn_blocking({
        let url = url.clone();
        let root = root.clone();
        move || {
            let cache =
                CacheManager::new(CacheKind::Resources, CacheStrategy::Available, &root).unwrap();
            let mut remote = RemoteResources::new(cache).unwrap();
            let first = remote.get_remote(&url).unwrap();
            let second = remote.get_remote(&url).unwrap();
            remote.teardown().unwrap();

            let stored_at = root
                .join("cache")
                .join("resources")
                .join(hash("127.0.0.1"))
                .join(format!("{}.txt", hash(&url)));
            (first, second, stored_at)
        }
    })
    .await
    .unwrap();

    assert_eq!(first, CSV);
    assert_eq!(second, CSV);
    assert_eq!(std::fs::read_to_string(stored_at).unwrap(), CSV);

    let ledger = std::fs::read_to_string(root.join("last_build_resources.txt")).unwrap();
    let expected = format!("{}/{}", hash("127.0.0.1"), hash(&url));
    assert_eq!(ledger, format!("{}\n{}\n", expected, expected));
}

/// Test: Anything but 200 is an error and leaves the cache untouched
#[tokio::test(flavor = "multi_thread")]
async fn test_get_remote_rejects_bad_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not here"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/empty"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let base = server.uri();
    let temp = TempDir::new().unwrap();
    let root = temp.path().join(".snowman");

    let (gone, empty, stored) = tokio::task::spawn_blocking(move || {
        let cache =
            CacheManager::new(CacheKind::Resources, CacheStrategy::Available, &root).unwrap();
        let mut remote = RemoteResources::new(cache).unwrap();
        let gone = remote.get_remote(&format!("{}/gone", base));
        let empty = remote.get_remote(&format!("{}/empty", base));
        (gone, empty, remote.cache().count_items().unwrap())
    })
    .await
    .unwrap();

    match gone {
        Err(SparqlCacheError::Endpoint { status, body, .. }) => {
            assert_eq!(status, 404);
            assert_eq!(body, "not here");
        }
        other => panic!("expected endpoint error, got {:?}", other),
    }
    assert!(matches!(
        empty,
        Err(SparqlCacheError::Endpoint { status: 204, .. })
    ));
    assert_eq!(stored, 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_never_strategy_refetches() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/logo.svg"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<svg/>"))
        .expect(2)
        .mount(&server)
        .await;

    let url = format!("{}/logo.svg", server.uri());
    let temp = TempDir::new().unwrap();
    let root = temp.path().join(".snowman");

    let stored = tokio::task::spawn_blocking(move || {
        let cache = CacheManager::new(CacheKind::Resources, CacheStrategy::Never, &root).unwrap();
        let mut remote = RemoteResources::new(cache).unwrap();
        remote.get_remote(&url).unwrap();
        remote.get_remote(&url).unwrap();
        remote.cache().count_items().unwrap()
    })
    .await
    .unwrap();

    assert_eq!(stored, 0);
}
