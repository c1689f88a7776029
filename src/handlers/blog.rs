use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use chrono::Utc;
use serde::Deserialize;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{BlogPost, PostStatus};
use crate::state::AppState;

use super::require_admin;

// GET /api/blog
pub async fn list_posts(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<BlogPost>>, AppError> {
    let posts = {
        let db = state.db.lock().unwrap();
        queries::list_posts(&db, true)?
    };
    Ok(Json(posts))
}

// GET /api/blog/:slug — published posts only.
pub async fn get_post(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<Json<BlogPost>, AppError> {
    let post = {
        let db = state.db.lock().unwrap();
        queries::get_published_post_by_slug(&db, &slug)?
    };

    post.map(Json)
        .ok_or_else(|| AppError::NotFound(format!("post {slug}")))
}

// GET /api/blog/all (admin) — drafts included.
pub async fn list_all_posts(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<BlogPost>>, AppError> {
    require_admin(&state, &headers)?;

    let posts = {
        let db = state.db.lock().unwrap();
        queries::list_posts(&db, false)?
    };
    Ok(Json(posts))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    #[serde(default)]
    pub title: String,
    pub slug: Option<String>,
    #[serde(default)]
    pub excerpt: String,
    #[serde(default)]
    pub content: String,
    pub status: Option<String>,
}

// POST /api/blog (admin)
pub async fn create_post(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<CreatePostRequest>,
) -> Result<(StatusCode, Json<BlogPost>), AppError> {
    require_admin(&state, &headers)?;

    if req.title.trim().is_empty() {
        return Err(AppError::Validation("missing required field: title".to_string()));
    }

    let status = match req.status.as_deref() {
        None | Some("") => PostStatus::Draft,
        Some(raw) => PostStatus::parse(raw)
            .ok_or_else(|| AppError::Validation(format!("invalid status: {raw}")))?,
    };

    let slug = match req.slug.as_deref().map(str::trim) {
        Some(s) if !s.is_empty() => slugify(s),
        _ => slugify(&req.title),
    };
    if slug.is_empty() {
        return Err(AppError::Validation("title does not produce a usable slug".to_string()));
    }

    let now = Utc::now().naive_utc();
    let post = BlogPost {
        id: uuid::Uuid::new_v4().to_string(),
        title: req.title.trim().to_string(),
        slug,
        excerpt: req.excerpt,
        content: req.content,
        status,
        published_at: (status == PostStatus::Published).then_some(now),
        created_at: now,
        updated_at: now,
    };

    {
        let db = state.db.lock().unwrap();
        if queries::slug_exists(&db, &post.slug)? {
            return Err(AppError::Conflict(format!("slug {} already in use", post.slug)));
        }
        queries::create_post(&db, &post)?;
    }

    Ok((StatusCode::CREATED, Json(post)))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePostRequest {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub excerpt: Option<String>,
    pub content: Option<String>,
    pub status: Option<String>,
}

// PUT /api/blog/id/:id (admin) — partial update; the first transition to
// published stamps publishedAt.
pub async fn update_post(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(req): Json<UpdatePostRequest>,
) -> Result<Json<BlogPost>, AppError> {
    require_admin(&state, &headers)?;

    let post = {
        let db = state.db.lock().unwrap();
        let mut post = queries::get_post_by_id(&db, &id)?
            .ok_or_else(|| AppError::NotFound(format!("post {id}")))?;

        if let Some(title) = req.title {
            if title.trim().is_empty() {
                return Err(AppError::Validation("title must not be empty".to_string()));
            }
            post.title = title.trim().to_string();
        }
        if let Some(raw_slug) = req.slug {
            let slug = slugify(&raw_slug);
            if slug.is_empty() {
                return Err(AppError::Validation("slug must not be empty".to_string()));
            }
            if slug != post.slug {
                if queries::slug_exists(&db, &slug)? {
                    return Err(AppError::Conflict(format!("slug {slug} already in use")));
                }
                post.slug = slug;
            }
        }
        if let Some(excerpt) = req.excerpt {
            post.excerpt = excerpt;
        }
        if let Some(content) = req.content {
            post.content = content;
        }
        if let Some(raw) = req.status.as_deref() {
            let status = PostStatus::parse(raw)
                .ok_or_else(|| AppError::Validation(format!("invalid status: {raw}")))?;
            if status == PostStatus::Published && post.published_at.is_none() {
                post.published_at = Some(Utc::now().naive_utc());
            }
            post.status = status;
        }

        queries::update_post(&db, &post)?;
        post
    };

    Ok(Json(post))
}

// DELETE /api/blog/id/:id (admin)
pub async fn delete_post(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    require_admin(&state, &headers)?;

    let deleted = {
        let db = state.db.lock().unwrap();
        queries::delete_post(&db, &id)?
    };
    if !deleted {
        return Err(AppError::NotFound(format!("post {id}")));
    }

    Ok(Json(serde_json::json!({ "ok": true })))
}

fn slugify(raw: &str) -> String {
    let mut slug = String::with_capacity(raw.len());
    let mut last_dash = true;
    for c in raw.trim().chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_dash = false;
        } else if !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }
    slug.trim_end_matches('-').to_string()
}
