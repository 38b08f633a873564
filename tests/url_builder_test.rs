use eurobase::url::{build_url, QueryParams};
use eurobase::Error;

#[test]
fn test_empty_params_returns_domain_unchanged() {
    let url = build_url("example.org", &QueryParams::new()).unwrap();
    assert_eq!(url, "example.org");
}

#[test]
fn test_default_sort_injected_and_lang_moved_to_suffix() {
    let mut params = QueryParams::new();
    params.set("lang", "en").set("dir", "data");

    let url = build_url("example.org", &params).unwrap();
    assert_eq!(url, "example.org?sort=1&dir=data/en");
}

#[test]
fn test_sort_always_serialized_first() {
    let mut params = QueryParams::new();
    params.set("dir", "dic").set("start", "a").set("sort", 2);

    let url = build_url("example.org", &params).unwrap();
    assert_eq!(url, "example.org?sort=2&dir=dic&start=a");
}

#[test]
fn test_caller_order_preserved_after_sort() {
    let mut params = QueryParams::new();
    params.set("b", "2").set("a", "1").set("c", "3");

    let url = build_url("example.org", &params).unwrap();
    assert_eq!(url, "example.org?sort=1&b=2&a=1&c=3");
}

#[test]
fn test_lang_never_appears_in_query_string() {
    let mut params = QueryParams::new();
    params.set("file", "metabase.txt.gz").set("lang", "de");

    let url = build_url("example.org", &params).unwrap();
    assert!(!url.contains("lang="));
    assert!(url.ends_with("/de"));
}

#[test]
fn test_unsupported_language_is_rejected() {
    let mut params = QueryParams::new();
    params.set("lang", "xx").set("dir", "data");

    let err = build_url("example.org", &params).unwrap_err();
    assert!(matches!(err, Error::UnsupportedLanguage(lang) if lang == "xx"));
}

#[test]
fn test_invalid_sort_is_rejected() {
    let mut params = QueryParams::new();
    params.set("sort", "first").set("dir", "data");
    assert!(matches!(
        build_url("example.org", &params),
        Err(Error::InvalidParameter(_))
    ));

    let mut params = QueryParams::new();
    params.set("sort", 0i64).set("dir", "data");
    assert!(matches!(
        build_url("example.org", &params),
        Err(Error::InvalidParameter(_))
    ));
}

#[test]
fn test_string_sort_is_accepted_when_positive() {
    let mut params = QueryParams::new();
    params.set("sort", "3").set("dir", "data");

    let url = build_url("example.org", &params).unwrap();
    assert_eq!(url, "example.org?sort=3&dir=data");
}

#[test]
fn test_values_are_url_encoded() {
    let mut params = QueryParams::new();
    params.set("file", "data/aact_ali01.tsv.gz");

    let url = build_url("example.org", &params).unwrap();
    assert_eq!(url, "example.org?sort=1&file=data%2Faact_ali01.tsv.gz");
}

#[test]
fn test_builder_is_deterministic() {
    let mut params = QueryParams::new();
    params.set("lang", "fr").set("dir", "dic").set("start", "b");

    let first = build_url("example.org", &params).unwrap();
    for _ in 0..10 {
        assert_eq!(build_url("example.org", &params).unwrap(), first);
    }
}

#[test]
fn test_empty_domain_is_rejected() {
    let mut params = QueryParams::new();
    params.set("dir", "data");
    assert!(matches!(
        build_url("", &params),
        Err(Error::InvalidParameter(_))
    ));
}

#[test]
fn test_only_lang_still_gets_sort() {
    let mut params = QueryParams::new();
    params.set("lang", "en");

    let url = build_url("example.org", &params).unwrap();
    assert_eq!(url, "example.org?sort=1/en");
}
