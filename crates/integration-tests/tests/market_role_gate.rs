//! Integration tests for the route guards.
//!
//! These tests require a running market server; see the crate docs.

use reqwest::StatusCode;

use farmstand_integration_tests::{client, login, market_base_url, seeded_account};

#[tokio::test]
#[ignore = "Requires running market server"]
async fn test_anonymous_dashboard_request_redirects_to_login() {
    let client = client();
    let base_url = market_base_url();

    for path in ["/farmer", "/customer", "/admin"] {
        let resp = client
            .get(format!("{base_url}{path}"))
            .send()
            .await
            .expect("Failed to request dashboard");

        assert!(resp.status().is_redirection(), "{path} should redirect");
        let location = resp
            .headers()
            .get("location")
            .and_then(|v| v.to_str().ok())
            .expect("redirect should carry a location");
        assert_eq!(location, "/login");
    }
}

#[tokio::test]
#[ignore = "Requires running market server"]
async fn test_anonymous_api_request_gets_401_not_redirect() {
    let client = client();
    let base_url = market_base_url();

    let resp = client
        .get(format!("{base_url}/api/me"))
        .send()
        .await
        .expect("Failed to request /api/me");

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running market server and seeded farmer account"]
async fn test_farmer_on_admin_route_redirects_home_not_login() {
    let Some((email, password)) = seeded_account("farmer") else {
        eprintln!("TEST_FARMER_EMAIL/TEST_FARMER_PASSWORD not set, skipping");
        return;
    };

    let client = client();
    let base_url = market_base_url();

    let resp = login(&client, &email, &password).await;
    assert!(resp.status().is_redirection(), "login should redirect");

    let resp = client
        .get(format!("{base_url}/admin"))
        .send()
        .await
        .expect("Failed to request admin dashboard");

    assert!(resp.status().is_redirection());
    let location = resp
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .expect("redirect should carry a location");
    assert_eq!(location, "/", "role mismatch goes home, not to login");
}

#[tokio::test]
#[ignore = "Requires running market server and hosted-backend credentials"]
async fn test_register_redirects_to_login() {
    let client = client();
    let base_url = market_base_url();

    let email = format!("it-{}@example.com", uuid::Uuid::new_v4().simple());
    let resp = client
        .post(format!("{base_url}/register"))
        .form(&[
            ("name", "Integration Customer"),
            ("email", email.as_str()),
            ("password", "s3cure-Pa55-for-tests"),
            ("register_type", "customer"),
            ("phone", "9876543210"),
            ("address", "12 Lake Road"),
            ("aadhaar", "1234-5678-9012"),
        ])
        .send()
        .await
        .expect("Failed to send register request");

    assert!(resp.status().is_redirection(), "register should redirect");
    let location = resp
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .expect("redirect should carry a location");
    assert_eq!(location, "/login");
}

#[tokio::test]
#[ignore = "Requires running market server and seeded farmer account"]
async fn test_login_lands_on_role_dashboard() {
    let Some((email, password)) = seeded_account("farmer") else {
        eprintln!("TEST_FARMER_EMAIL/TEST_FARMER_PASSWORD not set, skipping");
        return;
    };

    let client = client();
    let resp = login(&client, &email, &password).await;

    assert!(resp.status().is_redirection());
    let location = resp
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .expect("redirect should carry a location");
    assert_eq!(location, "/farmer");
}
