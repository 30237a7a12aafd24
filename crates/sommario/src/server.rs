use axum::body::Body;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use notify_debouncer_mini::{new_debouncer, notify::RecursiveMode, DebounceEventResult};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::content;
use crate::host::{CourseSnapshot, HostError, SectionRepository};
use crate::html;
use crate::toc;
use crate::types::{PageRequest, SectionId, Viewer};
use crate::urls;
use crate::view::PageAction;

/// Application state shared across requests
pub struct AppState {
    pub snapshot: RwLock<CourseSnapshot>,
    pub viewer: Viewer,
    pub sesskey: String,
    pub course_path: PathBuf,
}

/// Start the web server with snapshot hot-reload
pub async fn serve(port: u16, course_path: PathBuf, viewer: Viewer) -> anyhow::Result<()> {
    let snapshot = CourseSnapshot::from_path(&course_path)?;
    info!(
        course = %snapshot.course.shortname,
        sections = snapshot.sections.len(),
        "Course snapshot loaded"
    );

    let state = Arc::new(AppState {
        snapshot: RwLock::new(snapshot),
        viewer,
        sesskey: uuid::Uuid::new_v4().simple().to_string(),
        course_path: course_path.clone(),
    });

    start_file_watcher(state.clone())?;

    let app = router(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    info!(%addr, "Server running");
    info!(path = %course_path.display(), "Watching course snapshot for changes");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the application router. Routes mirror the host paths the generated
/// URLs point at, so rendered links resolve during local preview.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/course/view.php", get(course_view_handler))
        .route("/course/section.php", get(section_view_handler))
        .route("/course/inplace_editable", post(inplace_editable_handler))
        .with_state(state)
}

/// Watch the course snapshot file and reload state when it changes
fn start_file_watcher(state: Arc<AppState>) -> anyhow::Result<()> {
    let watch_dir = state
        .course_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    let file_name = state.course_path.file_name().map(|n| n.to_os_string());

    // Create a channel to receive events
    let (tx, mut rx) = tokio::sync::mpsc::channel(10);

    // Spawn a blocking task for the file watcher
    std::thread::spawn(move || {
        let tx_clone = tx.clone();
        let mut debouncer = new_debouncer(
            Duration::from_secs(2),
            move |result: DebounceEventResult| {
                if let Ok(events) = result {
                    let matches = events
                        .iter()
                        .any(|e| e.path.file_name() == file_name.as_deref());
                    if matches {
                        let _ = tx_clone.blocking_send(());
                    }
                }
            },
        )
        .expect("Failed to create debouncer");

        debouncer
            .watcher()
            .watch(&watch_dir, RecursiveMode::NonRecursive)
            .expect("Failed to watch directory");

        // Keep the watcher alive
        loop {
            std::thread::sleep(Duration::from_secs(60));
        }
    });

    // Spawn a task to handle file change notifications
    tokio::spawn(async move {
        while rx.recv().await.is_some() {
            match CourseSnapshot::from_path(&state.course_path) {
                Ok(new_snapshot) => {
                    let mut snapshot = state.snapshot.write().await;
                    *snapshot = new_snapshot;
                    info!(sections = snapshot.sections.len(), "Course snapshot reloaded");
                }
                Err(e) => {
                    warn!(error = %e, "Failed to reload snapshot, keeping previous");
                }
            }
        }
    });

    Ok(())
}

fn respond(action: PageAction) -> Response {
    match action {
        PageAction::Redirect(url) => Redirect::to(&url).into_response(),
        PageAction::ClientRedirect(url) => {
            Html(html::render_redirect(&url).into_string()).into_response()
        }
        PageAction::Render(page) => Html(html::render_page(&page).into_string()).into_response(),
    }
}

/// Redirect the root to the course page
async fn root_handler(State(state): State<Arc<AppState>>) -> Redirect {
    let snapshot = state.snapshot.read().await;
    Redirect::to(&urls::course_view(snapshot.course.id))
}

#[derive(Debug, Deserialize)]
struct ViewParams {
    id: Option<u64>,
    section: Option<u32>,
    topic: Option<u32>,
    expandsection: Option<u32>,
    newsectionredirect: Option<bool>,
}

/// Serve the course page
async fn course_view_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ViewParams>,
) -> Response {
    let snapshot = state.snapshot.read().await;

    if let Some(id) = params.id {
        if id != snapshot.course.id.0 {
            return (StatusCode::NOT_FOUND, "Unknown course").into_response();
        }
    }

    let request = PageRequest {
        active_section: None,
        single_section: params.section,
        legacy_topic: params.topic,
        expand_section: params.expandsection,
        new_section_redirect: params.newsectionredirect.unwrap_or(false),
    };

    respond(content::build_page(
        &*snapshot,
        &state.viewer,
        &request,
        &state.sesskey,
    ))
}

#[derive(Debug, Deserialize)]
struct SectionParams {
    id: u64,
}

/// Serve the dedicated page for one section
async fn section_view_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SectionParams>,
) -> Response {
    let snapshot = state.snapshot.read().await;

    let Some(section) = snapshot.section_by_id(SectionId(params.id)) else {
        return (StatusCode::NOT_FOUND, "Unknown section").into_response();
    };

    let request = PageRequest {
        active_section: Some(section.id),
        single_section: Some(section.number),
        ..Default::default()
    };

    respond(content::build_page(
        &*snapshot,
        &state.viewer,
        &request,
        &state.sesskey,
    ))
}

#[derive(Debug, Deserialize)]
pub struct InplaceEdit {
    pub itemtype: String,
    pub itemid: u64,
    pub newvalue: String,
}

/// Updated editable-field descriptor returned after a rename
#[derive(Debug, Serialize)]
pub struct EditableField {
    pub itemid: u64,
    pub value: String,
    pub displayvalue: String,
}

/// Rename a section in place
async fn inplace_editable_handler(
    State(state): State<Arc<AppState>>,
    Json(edit): Json<InplaceEdit>,
) -> Response {
    if edit.itemtype != "sectionname" && edit.itemtype != "sectionnamenl" {
        let err = HostError::UnknownItemType(edit.itemtype);
        return (StatusCode::BAD_REQUEST, err.to_string()).into_response();
    }

    let mut snapshot = state.snapshot.write().await;
    match snapshot.rename_section(SectionId(edit.itemid), &edit.newvalue) {
        Ok(section) => Json(EditableField {
            itemid: edit.itemid,
            value: edit.newvalue,
            displayvalue: toc::section_name(&section),
        })
        .into_response(),
        Err(e @ (HostError::SectionNotFound(_) | HostError::ForeignFormat(_))) => {
            (StatusCode::NOT_FOUND, e.to_string()).into_response()
        }
        Err(e) => (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
    }
}
