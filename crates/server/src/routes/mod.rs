//! HTTP route handlers.

pub mod admin;
pub mod check;
pub mod health;

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use advent_client::{AjaxReply, Cache, Fetcher, Origin};
    use advent_core::{AppConfig, CacheDb, Error};
    use async_trait::async_trait;
    use axum::{
        Router,
        body::{Body, to_bytes},
        http::{Request, StatusCode, header},
    };
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::{AppState, router};

    const SECRET: &str = "s3cret";

    const LANDING: &str = r#"
        <div class="unlocked-window window-1">
            <p class="single-number">1</p>
            <p class="numbers">123</p>
            <p class="numbers">456</p>
        </div>
        <div class="unlocked-window window-2">
            <p class="single-number">2</p>
            <p class="numbers">789</p>
        </div>
    "#;

    struct FakeOrigin {
        online: bool,
    }

    #[async_trait]
    impl Origin for FakeOrigin {
        async fn landing_page(&self) -> Result<String, Error> {
            if self.online { Ok(LANDING.to_string()) } else { Err(Error::OriginUnavailable("refused".into())) }
        }

        async fn check_access(&self, target: &str) -> Result<AjaxReply, Error> {
            let body = match target {
                "window-1" => serde_json::to_string(
                    "<tr><td>123</td><td>Gutschein</td><td>25 €</td><td>Buchladen</td></tr>",
                )
                .unwrap_or_default(),
                _ => "false".to_string(),
            };
            Ok(AjaxReply { status: StatusCode::OK, body })
        }
    }

    async fn app(online: bool, secret: Option<&str>) -> Router {
        let cache = Cache::with_store(Arc::new(CacheDb::open_in_memory().await.unwrap()));
        let fetcher = Fetcher::new(Arc::new(FakeOrigin { online }), Arc::new(cache));
        let config = AppConfig { admin_secret: secret.map(String::from), ..Default::default() };
        router(AppState { fetcher, config: Arc::new(config) })
    }

    async fn get(app: &Router, uri: &str) -> (StatusCode, axum::http::HeaderMap, Value) {
        let response = app
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, headers, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let (status, _, body) = get(&app(true, None).await, "/api/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["service"], "advent-server");
    }

    #[tokio::test]
    async fn test_check_winner() {
        let (status, headers, body) = get(&app(true, None).await, "/api/check?number=0123").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers[header::CACHE_CONTROL], "public, s-maxage=60, stale-while-revalidate=300");
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");

        assert_eq!(body["number"], "123");
        assert_eq!(body["isWinner"], true);
        assert_eq!(body["winningDays"], serde_json::json!(["1"]));
        assert_eq!(body["prizeDetails"][0]["prize"], "Gutschein");
        assert_eq!(body["totalDaysDrawn"], 2);
        assert_eq!(body["totalWinners"], 3);
        assert_eq!(body["allResults"]["1"]["window_class"], "window-1");
    }

    #[tokio::test]
    async fn test_check_loser() {
        let (status, _, body) = get(&app(true, None).await, "/api/check?number=999").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["isWinner"], false);
        assert_eq!(body["winningDays"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_check_invalid_number() {
        let app = app(true, None).await;
        for uri in ["/api/check", "/api/check?number=", "/api/check?number=12a"] {
            let (status, headers, body) = get(&app, uri).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
            assert_eq!(body, serde_json::json!({"error": "Invalid number"}));
            assert!(headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
        }
    }

    #[tokio::test]
    async fn test_check_padded_number_is_invalid() {
        let app = app(false, None).await;
        for uri in ["/api/check?number=%2042", "/api/check?number=42%20", "/api/check?number=%2042%20"] {
            let (status, _, body) = get(&app, uri).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
            assert_eq!(body, serde_json::json!({"error": "Invalid number"}));
        }
    }

    #[tokio::test]
    async fn test_check_repeated_number_is_invalid() {
        let (status, headers, body) = get(&app(true, None).await, "/api/check?number=1&number=2").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(headers[header::CONTENT_TYPE], "application/json");
        assert_eq!(body, serde_json::json!({"error": "Invalid number"}));
    }

    #[tokio::test]
    async fn test_admin_repeated_token_is_unauthorized() {
        let app = app(true, Some(SECRET)).await;
        let (status, _, body) = get(&app, "/api/cache-status?token=s3cret&token=s3cret").await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, serde_json::json!({"error": "Unauthorized"}));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/cache-status?token=a&token=b")
                    .header("x-admin-token", SECRET)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_check_origin_down() {
        let (status, _, body) = get(&app(false, None).await, "/api/check?number=123").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, serde_json::json!({"error": "Could not fetch data"}));
    }

    #[tokio::test]
    async fn test_admin_requires_configured_secret() {
        let (status, _, body) = get(&app(true, None).await, "/api/cache-status?token=anything").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, serde_json::json!({"error": "Admin secret not configured"}));
    }

    #[tokio::test]
    async fn test_admin_rejects_wrong_token() {
        let app = app(true, Some(SECRET)).await;
        for uri in ["/api/cache-status", "/api/cache-status?token=guess", "/api/init-cache?token=guess"] {
            let (status, _, body) = get(&app, uri).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
            assert_eq!(body, serde_json::json!({"error": "Unauthorized"}));
        }
    }

    #[tokio::test]
    async fn test_admin_bearer_header() {
        let app = app(true, Some(SECRET)).await;
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/cache-status")
                    .header(header::AUTHORIZATION, format!("Bearer {SECRET}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_cache_status_lifecycle() {
        let app = app(true, Some(SECRET)).await;

        let (status, _, body) = get(&app, "/api/cache-status?token=s3cret").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!({"status": "Cache empty - will fetch on next request"}));

        let (status, _, init) = get(&app, "/api/init-cache?token=s3cret").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(init["daysCached"], 2);
        assert_eq!(init["winnersCached"], 3);

        let (_, _, body) = get(&app, "/api/cache-status?token=s3cret").await;
        assert_eq!(body["status"], "Cache active");
        assert_eq!(body["cachedAt"], init["cachedAt"]);
        assert_eq!(body["daysInCache"], 2);
        assert_eq!(body["winnersInCache"], 3);
    }

    #[tokio::test]
    async fn test_init_cache_origin_down() {
        let (status, _, body) = get(&app(false, Some(SECRET)).await, "/api/init-cache?token=s3cret").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Could not fetch data");
    }

    #[tokio::test]
    async fn test_init_prize_cache() {
        let (status, _, body) = get(&app(true, Some(SECRET)).await, "/api/init-prize-cache?token=s3cret").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["results"],
            serde_json::json!([
                {"day": "1", "windowClass": "window-1", "prizes": 1, "cached": true},
                {"day": "2", "windowClass": "window-2", "prizes": 0, "cached": false},
            ])
        );
    }
}
