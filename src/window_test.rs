use super::*;

// =============================================================================
// location_suffix
// =============================================================================

#[test]
fn suffix_includes_query_and_fragment() {
    let url = Url::parse("http://localhost:8080/dashboard/index.html?tab=2#top").unwrap();
    assert_eq!(location_suffix(&url), "/dashboard/index.html?tab=2#top");
}

#[test]
fn suffix_omits_empty_query_and_fragment() {
    let url = Url::parse("http://localhost:8080/reports?#").unwrap();
    assert_eq!(location_suffix(&url), "/reports");
}

// =============================================================================
// login_redirect_url
// =============================================================================

#[test]
fn redirect_url_carries_current_location_as_next() {
    let url = login_redirect_url("http://localhost:8080/dashboard/index.html?tab=2#top", "/index.html", true).unwrap();
    assert_eq!(url, "http://localhost:8080/index.html?next=%2Fdashboard%2Findex.html%3Ftab%3D2%23top");
}

#[test]
fn redirect_url_without_next() {
    let url = login_redirect_url("http://localhost:8080/dashboard/index.html", "/index.html", false).unwrap();
    assert_eq!(url, "http://localhost:8080/index.html");
}

#[test]
fn redirect_url_skips_next_on_login_page() {
    let url = login_redirect_url("http://localhost:8080/index.html", "/index.html", true).unwrap();
    assert_eq!(url, "http://localhost:8080/index.html");
}

#[test]
fn redirect_url_uses_origin_not_current_directory() {
    let url = login_redirect_url("https://app.example.test:9443/a/b/c.html", "/index.html", false).unwrap();
    assert_eq!(url, "https://app.example.test:9443/index.html");
}

#[test]
fn redirect_url_rejects_relative_href() {
    let err = login_redirect_url("/dashboard", "/index.html", true).unwrap_err();
    assert!(matches!(err, SessionError::InvalidUrl(_)));
}

// =============================================================================
// next_destination
// =============================================================================

#[test]
fn next_destination_decodes_query_value() {
    let dest = next_destination("http://h/index.html?next=%2Freports%3Fid%3D1", "/dashboard/index.html");
    assert_eq!(dest, "/reports?id=1");
}

#[test]
fn next_destination_falls_back_when_absent() {
    assert_eq!(next_destination("http://h/index.html", "/dashboard/index.html"), "/dashboard/index.html");
}

#[test]
fn next_destination_falls_back_when_empty() {
    assert_eq!(next_destination("http://h/index.html?next=", "/dashboard/index.html"), "/dashboard/index.html");
}

#[test]
fn next_destination_takes_first_value() {
    assert_eq!(next_destination("http://h/?next=/a&next=/b", "/d"), "/a");
}

#[test]
fn next_destination_falls_back_on_unparsable_href() {
    assert_eq!(next_destination("not a url", "/d"), "/d");
}

// =============================================================================
// resolve_url
// =============================================================================

#[test]
fn resolve_url_joins_relative_targets_onto_page() {
    let href = "http://localhost:8080/dashboard/index.html?tab=2";
    assert_eq!(resolve_url(href, "/api/devices"), "http://localhost:8080/api/devices");
    assert_eq!(resolve_url(href, "report.csv"), "http://localhost:8080/dashboard/report.csv");
}

#[test]
fn resolve_url_leaves_absolute_targets_alone() {
    let target = "https://api.example.com/v1/items?q=a%20b";
    assert_eq!(resolve_url("http://localhost:8080/", target), target);
}

#[test]
fn resolve_url_returns_target_when_base_is_unusable() {
    assert_eq!(resolve_url("not a url", "/api/devices"), "/api/devices");
}

// =============================================================================
// MemoryWindow
// =============================================================================

#[test]
fn memory_window_resolves_relative_navigation() {
    let window = MemoryWindow::new("http://localhost:8080/index.html?next=%2Fx");
    window.replace("/dashboard/index.html");
    assert_eq!(window.href(), "http://localhost:8080/dashboard/index.html");
    assert_eq!(window.navigations(), vec!["/dashboard/index.html".to_owned()]);
}

#[test]
fn memory_window_records_alerts() {
    let window = MemoryWindow::new("http://localhost/");
    window.alert("boom");
    assert_eq!(window.alerts(), vec!["boom".to_owned()]);
    assert_eq!(window.last_navigation(), None);
}
