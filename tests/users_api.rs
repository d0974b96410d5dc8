mod common;

use chrono::{Duration, Utc};
use common::{removes_cookie, user, FakeGraph, TestApp, ACCOUNT_ID};
use rocket::http::{ContentType, Status};
use serde_json::{json, Value};
use travelbook::auth::CachedAccount;
use travelbook::error::MANDATORY_FIELDS_MESSAGE;
use travelbook::graph::GraphUser;
use travelbook::tokens::UserJWTTokenClaims;

#[rocket::async_test]
async fn lookup_by_id_returns_the_user() {
	let app = TestApp::start(FakeGraph::with_users(vec![user("42", "jdoe@contoso.com")])).await;
	app.seed_account();

	let response =
		app.client.post("/api/users/GetUserById").header(ContentType::JSON).cookie(app.session_cookie()).body(r#"{"userId":"42"}"#).dispatch().await;

	assert_eq!(response.status(), Status::Ok);
	let body: Value = response.into_json().await.unwrap();
	assert_eq!(
		body,
		json!({
			"message": "User found",
			"userId": "42",
			"userPrincipalName": "jdoe@contoso.com",
			"displayName": "John Doe",
			"mailNickName": "jdoe",
		})
	);
	assert_eq!(app.graph.queries.lock().unwrap()[0].filter, "id eq '42'");
	assert_eq!(app.graph.tokens.lock().unwrap()[0], "graph-token");
}

#[rocket::async_test]
async fn lookup_by_principal_name_filters_on_upn() {
	let app = TestApp::start(FakeGraph::with_users(vec![user("42", "o'brien@contoso.com")])).await;
	app.seed_account();

	let response = app
		.client
		.post("/api/users/GetUserByPrincipalName")
		.header(ContentType::JSON)
		.cookie(app.session_cookie())
		.body(r#"{"userPrincipalName":"o'brien@contoso.com"}"#)
		.dispatch()
		.await;

	assert_eq!(response.status(), Status::Ok);
	assert_eq!(app.graph.queries.lock().unwrap()[0].filter, "userPrincipalName eq 'o''brien@contoso.com'");
}

#[rocket::async_test]
async fn empty_graph_result_is_a_graph_api_error() {
	let app = TestApp::start(FakeGraph::default()).await;
	app.seed_account();

	let response =
		app.client.post("/api/users/GetUserById").header(ContentType::JSON).cookie(app.session_cookie()).body(r#"{"userId":"missing"}"#).dispatch().await;

	assert_eq!(response.status(), Status::InternalServerError);
	assert!(response.into_string().await.unwrap().contains("Graph API error"));
}

#[rocket::async_test]
async fn graph_failure_carries_graph_message() {
	let graph = FakeGraph::default();
	*graph.list_error.lock().unwrap() = Some((403, "Insufficient privileges to complete the operation.".to_string()));
	let app = TestApp::start(graph).await;
	app.seed_account();

	let response =
		app.client.post("/api/users/GetUserById").header(ContentType::JSON).cookie(app.session_cookie()).body(r#"{"userId":"42"}"#).dispatch().await;

	assert_eq!(response.status(), Status::InternalServerError);
	assert_eq!(response.into_string().await.unwrap(), "Graph API error: Insufficient privileges to complete the operation.");
}

#[rocket::async_test]
async fn create_requires_display_name_and_nickname() {
	let app = TestApp::start(FakeGraph::default()).await;
	app.seed_account();

	for body in [r#"{"displayName":"","mailNickName":"jdoe"}"#, r#"{"displayName":"John Doe","mailNickName":"  "}"#, r#"{"displayName":"John Doe"}"#] {
		let response = app.client.post("/api/users/CreateUser").header(ContentType::JSON).cookie(app.session_cookie()).body(body).dispatch().await;

		assert_eq!(response.status(), Status::BadRequest, "{body}");
		assert_eq!(response.into_string().await.unwrap(), MANDATORY_FIELDS_MESSAGE);
	}
	assert!(app.graph.new_users.lock().unwrap().is_empty());
}

#[rocket::async_test]
async fn create_builds_principal_name_from_nickname_and_domain() {
	let app = TestApp::start(FakeGraph::default()).await;
	app.seed_account();

	let response = app
		.client
		.post("/api/users/CreateUser")
		.header(ContentType::JSON)
		.cookie(app.session_cookie())
		.body(r#"{"userPrincipalName":"ignored@elsewhere.com","displayName":"John Doe","mailNickName":"jdoe"}"#)
		.dispatch()
		.await;

	assert_eq!(response.status(), Status::Ok);
	let body: Value = response.into_json().await.unwrap();
	assert_eq!(body["message"], "User created successfully");
	assert_eq!(body["userPrincipalName"], "jdoe@contoso.com");
	assert_eq!(body["userMailNickname"], "jdoe");

	let new_users = app.graph.new_users.lock().unwrap();
	assert_eq!(new_users[0].user_principal_name, "jdoe@contoso.com");
	assert!(new_users[0].account_enabled);
	assert!(new_users[0].password_profile.force_change_password_next_sign_in);
}

#[rocket::async_test]
async fn create_mirrors_graph_status() {
	let graph = FakeGraph::default();
	*graph.created.lock().unwrap() = Some(Err((409, "Another object with the same value for property userPrincipalName already exists.".to_string())));
	let app = TestApp::start(graph).await;
	app.seed_account();

	let response = app
		.client
		.post("/api/users/CreateUser")
		.header(ContentType::JSON)
		.cookie(app.session_cookie())
		.body(r#"{"displayName":"John Doe","mailNickName":"jdoe"}"#)
		.dispatch()
		.await;

	assert_eq!(response.status(), Status::Conflict);
	let body: Value = response.into_json().await.unwrap();
	assert_eq!(body, json!({ "error": "Another object with the same value for property userPrincipalName already exists." }));
}

#[rocket::async_test]
async fn create_without_returned_user_is_a_failed_registration() {
	let graph = FakeGraph::default();
	*graph.created.lock().unwrap() = Some(Ok(None::<GraphUser>));
	let app = TestApp::start(graph).await;
	app.seed_account();

	let response = app
		.client
		.post("/api/users/CreateUser")
		.header(ContentType::JSON)
		.cookie(app.session_cookie())
		.body(r#"{"displayName":"John Doe","mailNickName":"jdoe"}"#)
		.dispatch()
		.await;

	assert_eq!(response.status(), Status::InternalServerError);
	assert_eq!(response.into_string().await.unwrap(), "The user registration failed.");
}

#[rocket::async_test]
async fn anonymous_requests_are_unauthorized() {
	let app = TestApp::start(FakeGraph::default()).await;

	let response = app.client.post("/api/users/GetUserById").header(ContentType::JSON).body(r#"{"userId":"42"}"#).dispatch().await;

	assert_eq!(response.status(), Status::Unauthorized);
	assert_eq!(response.into_string().await.unwrap(), "Authentication required.");
}

#[rocket::async_test]
async fn session_without_cached_account_is_rejected() {
	let app = TestApp::start(FakeGraph::with_users(vec![user("42", "jdoe@contoso.com")])).await;

	let response =
		app.client.post("/api/users/GetUserById").header(ContentType::JSON).cookie(app.session_cookie()).body(r#"{"userId":"42"}"#).dispatch().await;

	assert_eq!(response.status(), Status::Unauthorized);
	assert!(removes_cookie(&response, ".TravelBook.Auth"));
	assert!(app.graph.queries.lock().unwrap().is_empty());
}

#[rocket::async_test]
async fn refused_refresh_forgets_the_account() {
	let app = TestApp::start(FakeGraph::default()).await;
	app.token_cache.store(CachedAccount {
		account_id: ACCOUNT_ID.to_string(),
		username: None,
		access_token: "stale".to_string(),
		refresh_token: Some("revoked".to_string()),
		scopes: vec!["user.read".to_string()],
		expires_at: Utc::now() - Duration::minutes(1),
	});

	let response =
		app.client.post("/api/users/GetUserById").header(ContentType::JSON).cookie(app.session_cookie()).body(r#"{"userId":"42"}"#).dispatch().await;

	assert_eq!(response.status(), Status::Unauthorized);
	assert!(removes_cookie(&response, ".TravelBook.Auth"));
	assert!(app.token_cache.account(ACCOUNT_ID).is_none());
}

#[rocket::async_test]
async fn forged_session_cookie_is_unauthorized() {
	let app = TestApp::start(FakeGraph::default()).await;
	app.seed_account();

	let response = app
		.client
		.post("/api/users/GetUserById")
		.header(ContentType::JSON)
		.cookie(rocket::http::Cookie::new(".TravelBook.Auth", "not-a-jwt"))
		.body(r#"{"userId":"42"}"#)
		.dispatch()
		.await;

	assert_eq!(response.status(), Status::Unauthorized);
	assert!(removes_cookie(&response, ".TravelBook.Auth"));
	assert!(app.graph.queries.lock().unwrap().is_empty());
}

#[rocket::async_test]
async fn session_past_half_life_is_reissued() {
	let app = TestApp::start(FakeGraph::with_users(vec![user("42", "jdoe@contoso.com")])).await;
	app.seed_account();
	let five_hours_ago = jsonwebtoken::get_current_timestamp() - 5 * 3600;
	let stale = app.session_cookie_issued_at(five_hours_ago);

	let response = app.client.post("/api/users/GetUserById").header(ContentType::JSON).cookie(stale.clone()).body(r#"{"userId":"42"}"#).dispatch().await;

	assert_eq!(response.status(), Status::Ok);
	let renewed = response.cookies().get(".TravelBook.Auth").map(|cookie| cookie.value().to_string()).unwrap();
	assert_ne!(renewed, stale.value());
	let claims = UserJWTTokenClaims::decode(&renewed, &app.session_key).unwrap();
	assert!(claims.iat > five_hours_ago);
	assert_eq!(claims.exp, claims.iat + 8 * 3600);
}

#[rocket::async_test]
async fn fresh_session_is_not_reissued() {
	let app = TestApp::start(FakeGraph::with_users(vec![user("42", "jdoe@contoso.com")])).await;
	app.seed_account();

	let response =
		app.client.post("/api/users/GetUserById").header(ContentType::JSON).cookie(app.session_cookie()).body(r#"{"userId":"42"}"#).dispatch().await;

	assert_eq!(response.status(), Status::Ok);
	assert!(response.cookies().get(".TravelBook.Auth").is_none());
}
