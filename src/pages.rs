//! Page table for the single-page front end.
//!
//! Every navigation resolves to exactly one page (unknown paths land on
//! the catch-all) and sets the document title from its metadata. No page
//! is gated on the session.

use axum::{
    extract::OriginalUri,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tracing::debug;

use crate::{error::ApiError, state::AppState};

pub const APP_TITLE: &str = "Vue 3 Demo";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Page {
    pub path: &'static str,
    pub name: &'static str,
    pub title: &'static str,
    pub icon: &'static str,
    pub description: &'static str,
}

pub const PAGES: &[Page] = &[
    Page {
        path: "/",
        name: "Home",
        title: "Home",
        icon: "🏠",
        description: "Welcome to Vue 3 Demo",
    },
    Page {
        path: "/scroll-demo",
        name: "ScrollNavDemo",
        title: "Scroll Nav",
        icon: "🧭",
        description: "Sticky navbar with smooth scroll",
    },
    Page {
        path: "/hello",
        name: "HelloWorld",
        title: "Hello World",
        icon: "👋",
        description: "Props, Events & Slots",
    },
    Page {
        path: "/counter",
        name: "Counter",
        title: "Counter",
        icon: "🔢",
        description: "Reactive State & Computed",
    },
    Page {
        path: "/profile",
        name: "UserProfile",
        title: "User Profile",
        icon: "👤",
        description: "Watchers & Lifecycle",
    },
    Page {
        path: "/login",
        name: "Login",
        title: "Login",
        icon: "🔐",
        description: "User Authentication",
    },
];

pub const NOT_FOUND: Page = Page {
    path: "/:pathMatch(.*)*",
    name: "NotFound",
    title: "404 - Not Found",
    icon: "❌",
    description: "Page not found",
};

/// Result of navigating to a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub page: &'static Page,
    pub document_title: String,
}

fn normalize(path: &str) -> &str {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/"
    } else {
        trimmed
    }
}

pub fn resolve(path: &str) -> &'static Page {
    let path = normalize(path);
    PAGES
        .iter()
        .find(|p| p.path == path)
        .unwrap_or(&NOT_FOUND)
}

pub fn document_title(page: &Page) -> String {
    if page.title.is_empty() {
        APP_TITLE.to_string()
    } else {
        format!("{} | {APP_TITLE}", page.title)
    }
}

pub fn navigate(path: &str) -> Navigation {
    let page = resolve(path);
    let document_title = document_title(page);
    debug!(path, page = page.name, "navigate");
    Navigation {
        page,
        document_title,
    }
}

pub fn page_routes() -> Router<AppState> {
    Router::new().route("/pages", get(list_pages))
}

pub async fn list_pages() -> Json<&'static [Page]> {
    Json(PAGES)
}

fn render_shell(nav: &Navigation) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{}</title>\n</head>\n<body>\n<div id=\"app\" data-page=\"{}\"></div>\n</body>\n</html>\n",
        nav.document_title, nav.page.name
    )
}

/// Fallback for every unmatched request. Unknown API paths get a JSON 404;
/// everything else is a page navigation.
pub async fn render_page(OriginalUri(uri): OriginalUri) -> Response {
    if uri.path() == "/api" || uri.path().starts_with("/api/") {
        return ApiError::NotFound("Not found").into_response();
    }

    let nav = navigate(uri.path());
    let status = if nav.page == &NOT_FOUND {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::OK
    };
    (status, Html(render_shell(&nav))).into_response()
}
