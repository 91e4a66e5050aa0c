mod common;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use common::{JWT_SECRET, Outcome, create_user, setup};
use hotel_booking_api::{
    dto::users::UserRequest,
    error::AppError,
    middleware::auth::Claims,
    routes::{create_api_router, params::Pagination},
    services::{payment_service, user_service},
};
use jsonwebtoken::{EncodingKey, Header, encode};
use tower::ServiceExt;

#[tokio::test]
async fn preauthorization_uses_the_configured_amount() -> anyhow::Result<()> {
    let app = setup(Outcome::Succeed).await?;

    let intent = payment_service::create_payment_intent(&app.state)
        .await?
        .data
        .expect("intent");

    assert_eq!(intent.amount, 1000);
    assert_eq!(intent.currency, "usd");
    assert_eq!(intent.client_secret.as_deref(), Some("pi_preauth_secret"));
    assert!(app.gateway.charges().is_empty());
    Ok(())
}

#[tokio::test]
async fn user_profiles_are_validated() -> anyhow::Result<()> {
    let app = setup(Outcome::Succeed).await?;
    let user = create_user(&app.state, "ada@guest.com").await?;

    let invalid = user_service::update_user(
        &app.state,
        user.id,
        UserRequest {
            first_name: "".into(),
            last_name: "Guest".into(),
            email_address: "not-an-email".into(),
            image_url: None,
        },
    )
    .await;
    let Err(AppError::ValidationFailed(errors)) = invalid else {
        panic!("expected validation failure");
    };
    let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
    assert_eq!(fields, vec!["first_name", "email_address"]);

    let listed = user_service::list_users(&app.state, Pagination::default()).await?;
    assert_eq!(listed.meta.expect("meta").total, Some(1));

    user_service::delete_user(&app.state, user.id).await?;
    assert!(matches!(
        user_service::get_user(&app.state, user.id).await,
        Err(AppError::NotFound("User"))
    ));
    Ok(())
}

#[tokio::test]
async fn reconcile_endpoint_requires_admin_role() -> anyhow::Result<()> {
    let app = setup(Outcome::Succeed).await?;
    let router = Router::new()
        .nest("/api", create_api_router())
        .with_state(app.state.clone());

    let token = |role: &str| {
        encode(
            &Header::default(),
            &Claims {
                sub: "ops@example.com".into(),
                role: role.into(),
                exp: 4_102_444_800,
            },
            &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
        )
    };

    let response = router
        .clone()
        .oneshot(
            Request::post("/api/admin/inventory/reconcile")
                .header(header::AUTHORIZATION, format!("Bearer {}", token("user")?))
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = router
        .oneshot(
            Request::post("/api/admin/inventory/reconcile")
                .header(header::AUTHORIZATION, format!("Bearer {}", token("admin")?))
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    Ok(())
}
