//! Tests for the preview server
//!
//! - HTTP endpoint tests against the full router with an in-memory posts table
//! - Property tests for title fallbacks and page escaping

#[cfg(test)]
mod http_tests {
    //! HTTP endpoint integration tests using axum-test

    use axum::http::StatusCode;
    use axum_test::TestServer;
    use og_render::renderer::decode_data_uri;
    use og_render::{FontRegistry, PreviewRenderer};
    use pretty_assertions::assert_eq;
    use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

    use crate::state::{build_router, AppState, DEFAULT_TITLE};
    use crate::store::PostStore;

    /// Run `test` on a runtime whose single blocking thread is held until the
    /// test finishes, so every render it starts stays queued and times out.
    fn with_render_pool_held<F, Fut>(test: F)
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = ()>,
    {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .max_blocking_threads(1)
            .build()
            .unwrap();

        runtime.block_on(async {
            let (release, held) = std::sync::mpsc::channel::<()>();
            let gate = tokio::task::spawn_blocking(move || held.recv().ok());

            test().await;

            release.send(()).unwrap();
            gate.await.unwrap();
        });
    }

    /// One connection keeps the `:memory:` database alive and shared
    async fn memory_pool() -> SqlitePool {
        SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap()
    }

    async fn seeded_pool() -> SqlitePool {
        let pool = memory_pool().await;
        sqlx::query("CREATE TABLE posts (slug TEXT PRIMARY KEY, title TEXT, bangla_title TEXT)")
            .execute(&pool)
            .await
            .unwrap();

        for (slug, title, bangla) in [
            ("hello-world", Some("Hello World"), Some("হ্যালো বিশ্ব")),
            ("untitled-post", None, None),
            ("empty-title", Some(""), None),
        ] {
            sqlx::query("INSERT INTO posts (slug, title, bangla_title) VALUES (?, ?, ?)")
                .bind(slug)
                .bind(title)
                .bind(bangla)
                .execute(&pool)
                .await
                .unwrap();
        }

        pool
    }

    fn create_test_server_with(pool: SqlitePool, timeout_ms: u64) -> TestServer {
        let state = AppState {
            renderer: PreviewRenderer::new(FontRegistry::register(None).unwrap()),
            posts: PostStore::from_pool(pool),
            default_title: DEFAULT_TITLE.into(),
            timeout_ms,
        };

        TestServer::new(build_router(state)).unwrap()
    }

    /// Create a test server with the full router and seeded posts
    async fn create_test_server() -> TestServer {
        create_test_server_with(seeded_pool().await, 10_000)
    }

    fn image_src(page: &str) -> &str {
        let start = page.find("src=\"").unwrap() + "src=\"".len();
        let end = start + page[start..].find('"').unwrap();
        &page[start..end]
    }

    fn decode_png(bytes: &[u8]) -> tiny_skia::Pixmap {
        tiny_skia::Pixmap::decode_png(bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_returns_200() {
        let server = create_test_server().await;
        let response = server.get("/health").await;
        response.assert_status_ok();

        let json = response.json::<serde_json::Value>();
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["service"], "og-server");
        assert_eq!(json["secondary_font"], "fallback");
        assert!(json["secondary_family"].is_null());
    }

    #[tokio::test]
    async fn test_preview_page_embeds_png_data_uri() {
        let server = create_test_server().await;
        let response = server
            .get("/ai")
            .add_query_param("primaryTitle", "Hello World")
            .add_query_param("backgroundColor", "#3357FF")
            .await;
        response.assert_status_ok();

        let page = response.text();
        assert!(page.contains("<title>Hello World</title>"));

        let png = decode_data_uri(image_src(&page)).unwrap();
        let pixmap = decode_png(&png);
        assert_eq!((pixmap.width(), pixmap.height()), (800, 430));

        // Bottom-right corner: #3357FF under the 0.8 black overlay
        let corner = pixmap.pixel(799, 429).unwrap();
        assert!((corner.red() as i32 - 10).abs() <= 2);
        assert!((corner.green() as i32 - 17).abs() <= 2);
        assert!((corner.blue() as i32 - 51).abs() <= 2);
    }

    #[tokio::test]
    async fn test_preview_page_accepts_legacy_aliases() {
        let server = create_test_server().await;
        let response = server
            .get("/ai")
            .add_query_param("title", "Legacy Title")
            .add_query_param("banglaTitle", "বাংলা")
            .add_query_param("bgColor", "33FF57")
            .await;
        response.assert_status_ok();

        let page = response.text();
        assert!(page.contains("<title>Legacy Title</title>"));

        let pixmap = decode_png(&decode_data_uri(image_src(&page)).unwrap());
        let corner = pixmap.pixel(0, 429).unwrap();
        assert!((corner.green() as i32 - 51).abs() <= 2);
    }

    #[tokio::test]
    async fn test_preview_page_uses_default_title() {
        let server = create_test_server().await;

        let response = server.get("/ai").await;
        response.assert_status_ok();
        let page = response.text();
        assert!(page.contains("<title>Arafat's Tech</title>"));
        assert!(page.contains(r#"alt="Arafat's Tech""#));

        let response = server.get("/ai").add_query_param("primaryTitle", "").await;
        response.assert_status_ok();
        assert!(response.text().contains(&format!("<title>{}</title>", DEFAULT_TITLE)));
    }

    #[tokio::test]
    async fn test_preview_page_ignores_invalid_color() {
        let server = create_test_server().await;
        let response = server
            .get("/ai")
            .add_query_param("primaryTitle", "Colors")
            .add_query_param("backgroundColor", "not-a-color")
            .await;
        response.assert_status_ok();
    }

    #[tokio::test]
    async fn test_preview_page_escapes_title() {
        let server = create_test_server().await;
        let response = server
            .get("/ai")
            .add_query_param("primaryTitle", "<script>alert(1)</script>")
            .await;
        response.assert_status_ok();

        let page = response.text();
        assert!(!page.contains("<script>"));
        assert!(page.contains("&lt;script&gt;"));
    }

    #[tokio::test]
    async fn test_preview_page_accepts_css_color_names() {
        let server = create_test_server().await;
        let response = server
            .get("/ai")
            .add_query_param("title", "Red")
            .add_query_param("bgColor", "red")
            .await;
        response.assert_status_ok();

        let pixmap = decode_png(&decode_data_uri(image_src(&response.text())).unwrap());
        let corner = pixmap.pixel(799, 429).unwrap();
        assert!((corner.red() as i32 - 51).abs() <= 2);
        assert!(corner.green() <= 2);
        assert!(corner.blue() <= 2);
    }

    #[test]
    fn test_preview_page_failure_is_generic_html() {
        with_render_pool_held(|| async {
            let server = create_test_server_with(seeded_pool().await, 50);
            let response = server
                .get("/ai")
                .add_query_param("primaryTitle", "Hello World")
                .await;

            response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
            let page = response.text();
            assert!(page.contains("Error generating image"));
            assert!(!page.contains("timeout"));
        });
    }

    #[tokio::test]
    async fn test_post_image_returns_png() {
        let server = create_test_server().await;
        let response = server.get("/og/app/hello-world.png").await;
        response.assert_status_ok();
        assert_eq!(response.header("content-type"), "image/png");

        let pixmap = decode_png(response.as_bytes());
        assert_eq!((pixmap.width(), pixmap.height()), (800, 430));
    }

    #[tokio::test]
    async fn test_post_image_without_title_renders() {
        let server = create_test_server().await;

        server.get("/og/app/untitled-post.png").await.assert_status_ok();
        server.get("/og/app/empty-title.png").await.assert_status_ok();
    }

    #[tokio::test]
    async fn test_post_image_unknown_slug_is_404() {
        let server = create_test_server().await;
        let response = server.get("/og/app/no-such-post.png").await;
        response.assert_status_not_found();
        assert_eq!(response.text(), "Not found");
    }

    #[tokio::test]
    async fn test_post_image_requires_png_suffix() {
        let server = create_test_server().await;
        server
            .get("/og/app/hello-world.jpg")
            .await
            .assert_status_not_found();
        server.get("/og/app/hello-world").await.assert_status_not_found();
    }

    #[tokio::test]
    async fn test_post_image_database_failure_is_500() {
        // No posts table
        let server = create_test_server_with(memory_pool().await, 10_000);
        let response = server.get("/og/app/hello-world.png").await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.text(), "Error generating image");
    }

    #[test]
    fn test_post_image_timeout_is_500() {
        with_render_pool_held(|| async {
            let server = create_test_server_with(seeded_pool().await, 50);
            let response = server.get("/og/app/hello-world.png").await;

            response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(response.text(), "Error generating image");
        });
    }
}

#[cfg(test)]
mod property_tests {
    use proptest::prelude::*;

    use crate::burst_size;
    use crate::pages::preview_page;
    use crate::store::PostTitles;

    #[test]
    fn burst_size_saturates() {
        assert_eq!(burst_size(10), 20);
        assert_eq!(burst_size(u32::MAX), u32::MAX);
    }

    proptest! {
        /// Property: a slug-derived title never keeps a dash
        #[test]
        fn slug_fallback_has_no_dashes(slug in "[a-z0-9]{1,8}(-[a-z0-9]{1,8}){0,5}") {
            let title = PostTitles::default().display_title(&slug);
            prop_assert!(!title.contains('-'));
            prop_assert_eq!(title.split(' ').count(), slug.split('-').count());
        }

        /// Property: a stored non-empty title always wins over the slug
        #[test]
        fn stored_title_wins(title in ".{1,40}", slug in "[a-z-]{1,20}") {
            let post = PostTitles { title: Some(title.clone()), bangla_title: None };
            prop_assert_eq!(post.display_title(&slug), title);
        }

        /// Property: user titles never inject markup into the page
        #[test]
        fn preview_page_never_injects_markup(title in "[<>&\"a-z ]{0,40}") {
            let page = preview_page(&title, "data:image/png;base64,");
            let head_start = page.find("<title>").unwrap() + "<title>".len();
            let head_end = page.find("</title>").unwrap();
            let escaped = &page[head_start..head_end];
            prop_assert!(!escaped.contains('<'));
            prop_assert!(!escaped.contains('>'));
        }
    }
}
