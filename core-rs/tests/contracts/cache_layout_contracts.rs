// Cache Layout Contract Tests
//
// The cache directory is read by later builds and by the `spc cache`
// commands. Its layout is a file format: changing it silently turns every
// existing cache into unused entries.

use sparql_cache::cache::{hash, CacheKey, CacheKind, CacheManager, CacheStrategy};
use std::fs;
use tempfile::TempDir;

/// WHY: Entry paths are derived, never stored
/// FORMAT: <root>/cache/sparql/<sha256(location)>/<sha256(query)>.json
/// BREAKS: Every cached response if hashing or nesting changes
#[test]
fn sparql_entry_path_is_protocol_constant() {
    let temp = TempDir::new().unwrap();
    let mut cache =
        CacheManager::new(CacheKind::Sparql, CacheStrategy::Available, temp.path()).unwrap();

    cache.set_cache("countries.rq", "SELECT 1", "{}").unwrap();

    let expected = temp
        .path()
        .join("cache")
        .join("sparql")
        .join(hash("countries.rq"))
        .join(format!("{}.json", hash("SELECT 1")));
    assert!(expected.is_file());
    assert_eq!(cache.entry_path(&CacheKey::new("countries.rq", "SELECT 1")), expected);
}

/// WHY: Resources are grouped by host so a site's assets share a directory
/// FORMAT: <root>/cache/resources/<sha256(hostname)>/<sha256(url)>.txt
/// BREAKS: Resource cache reuse across builds
#[test]
fn resource_entry_path_is_protocol_constant() {
    let temp = TempDir::new().unwrap();
    let mut cache =
        CacheManager::new(CacheKind::Resources, CacheStrategy::Available, temp.path()).unwrap();

    let a = "https://example.org/a.csv";
    let b = "https://example.org/b.csv?v=2";
    cache.set_cache_by_key(&CacheKey::for_url(a).unwrap(), "a").unwrap();
    cache.set_cache_by_key(&CacheKey::for_url(b).unwrap(), "b").unwrap();

    let host_dir = temp
        .path()
        .join("cache")
        .join("resources")
        .join(hash("example.org"));
    assert!(host_dir.join(format!("{}.txt", hash(a))).is_file());
    assert!(host_dir.join(format!("{}.txt", hash(b))).is_file());
    assert_eq!(cache.entries_for_resource("example.org").unwrap().len(), 2);
}

/// WHY: Hashes are lowercase hex SHA-256, 64 characters
/// BREAKS: Lookup of entries written by earlier builds
#[test]
fn hash_is_lowercase_hex_sha256() {
    let h = hash("countries.rq");
    assert_eq!(h.len(), 64);
    assert!(h.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    assert_eq!(
        hash("abc"),
        "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
    );
}

/// WHY: Cached bodies are the raw endpoint response
/// BREAKS: Decoding, if anything is added around the stored body
#[test]
fn stored_content_is_verbatim() {
    let temp = TempDir::new().unwrap();
    let body = "{\"results\": {\"bindings\": []}}\n\n  ";
    {
        let mut cache =
            CacheManager::new(CacheKind::Sparql, CacheStrategy::Available, temp.path()).unwrap();
        cache.set_cache("q.rq", "SELECT 1", body).unwrap();
    }

    let mut cache =
        CacheManager::new(CacheKind::Sparql, CacheStrategy::Available, temp.path()).unwrap();
    assert_eq!(cache.get_cache("q.rq", "SELECT 1").unwrap().as_deref(), Some(body));

    let path = cache.entry_path(&CacheKey::new("q.rq", "SELECT 1"));
    assert_eq!(fs::read_to_string(path).unwrap(), body);
}

/// WHY: Never mode must not read entries written by earlier builds
/// BREAKS: Forced-refresh builds if stale responses leak through
#[test]
fn never_strategy_ignores_existing_entries() {
    let temp = TempDir::new().unwrap();
    {
        let mut warm =
            CacheManager::new(CacheKind::Sparql, CacheStrategy::Available, temp.path()).unwrap();
        warm.set_cache("q.rq", "SELECT 1", "{}").unwrap();
    }

    let mut cache =
        CacheManager::new(CacheKind::Sparql, CacheStrategy::Never, temp.path()).unwrap();
    assert_eq!(cache.get_cache("q.rq", "SELECT 1").unwrap(), None);

    cache.set_cache("q.rq", "SELECT 2", "{}").unwrap();
    assert!(!cache.entry_path(&CacheKey::new("q.rq", "SELECT 2")).exists());
}
