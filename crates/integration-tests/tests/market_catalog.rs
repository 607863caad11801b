//! Integration tests for the public catalog.
//!
//! These tests require a running market server; see the crate docs.

use reqwest::StatusCode;
use serde_json::Value;

use farmstand_integration_tests::{client, market_base_url};

#[tokio::test]
#[ignore = "Requires running market server"]
async fn test_home_page_shape() {
    let client = client();
    let base_url = market_base_url();

    let resp = client
        .get(format!("{base_url}/"))
        .send()
        .await
        .expect("Failed to request home page");

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("home should be JSON");

    assert_eq!(body["layout"], "public");
    assert!(body["featured"].is_array());
    assert!(body["categories"].is_array());
}

#[tokio::test]
#[ignore = "Requires running market server"]
async fn test_category_join_only_surfaces_matching_products() {
    let client = client();
    let base_url = market_base_url();

    let resp = client
        .get(format!("{base_url}/categories"))
        .send()
        .await
        .expect("Failed to request categories");

    assert_eq!(resp.status(), StatusCode::OK);
    let listings: Vec<Value> = resp.json().await.expect("categories should be JSON");

    // Every product surfaced under a category must match it by trimmed,
    // case-folded name.
    for listing in &listings {
        let name = listing["category"]["name"]
            .as_str()
            .expect("category has a name")
            .trim()
            .to_lowercase();
        for product in listing["products"].as_array().expect("products array") {
            let category = product["category"]
                .as_str()
                .expect("product has a category")
                .trim()
                .to_lowercase();
            assert_eq!(category, name);
        }
    }
}

#[tokio::test]
#[ignore = "Requires running market server"]
async fn test_unknown_category_is_404() {
    let client = client();
    let base_url = market_base_url();

    let resp = client
        .get(format!("{base_url}/categories/no-such-category"))
        .send()
        .await
        .expect("Failed to request category");

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running market server"]
async fn test_search_results_contain_query() {
    let client = client();
    let base_url = market_base_url();

    let resp = client
        .get(format!("{base_url}/search?q=mango"))
        .send()
        .await
        .expect("Failed to search");

    assert_eq!(resp.status(), StatusCode::OK);
    let products: Vec<Value> = resp.json().await.expect("search should be JSON");

    for product in &products {
        let title = product["title"].as_str().expect("product has a title");
        assert!(title.to_lowercase().contains("mango"));
    }
}
