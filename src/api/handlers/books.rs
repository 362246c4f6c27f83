//! Book CRUD handlers.
//!
//! Every handler reloads the collection from disk, applies at most one
//! mutation, and saves the whole collection back. A book's identifier
//! is its position in the collection, so deleting renumbers everything
//! after it; links on a rendered page are only valid until the next
//! mutation.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, Redirect},
    Form,
};
use serde::Deserialize;

use crate::api::ApiState;
use crate::book::Book;

/// Form payload shared by the create and edit paths.
///
/// `title` and `author` are required; a form that omits either is
/// rejected before the handler runs. `genre` and `status` default to
/// the empty string.
#[derive(Deserialize)]
pub struct BookForm {
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub genre: String,
    #[serde(default)]
    pub status: String,
}

impl From<BookForm> for Book {
    fn from(form: BookForm) -> Self {
        Book {
            title: form.title,
            author: form.author,
            genre: form.genre,
            status: form.status,
        }
        .trimmed()
    }
}

/// Resolve a path identifier against the collection. Negative and
/// past-the-end identifiers are both out of range.
fn locate(books: &[Book], id: i64) -> Option<usize> {
    usize::try_from(id).ok().filter(|&i| i < books.len())
}

fn not_found() -> (StatusCode, String) {
    (StatusCode::NOT_FOUND, "Book not found".to_string())
}

/// List all books with the add form.
pub async fn list(
    State(state): State<Arc<ApiState>>,
) -> Result<Html<String>, (StatusCode, String)> {
    let store = state.store.read().await;

    let books = store.load().map_err(|e| {
        tracing::error!(error = %e, "Failed to load books");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;

    Ok(render_list(&books))
}

/// Create a book from the add form and redirect to the list.
pub async fn create(
    State(state): State<Arc<ApiState>>,
    Form(form): Form<BookForm>,
) -> Result<Redirect, (StatusCode, String)> {
    let store = state.store.write().await;

    let mut books = store.load().map_err(|e| {
        tracing::error!(error = %e, "Failed to load books");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;

    books.push(form.into());

    store.save(&books).map_err(|e| {
        tracing::error!(error = %e, "Failed to save books");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;

    tracing::info!(count = books.len(), "book created");
    Ok(Redirect::to("/"))
}

/// Render the edit form prefilled with the book at `id`.
pub async fn edit_form(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<i64>,
) -> Result<Html<String>, (StatusCode, String)> {
    let store = state.store.read().await;

    let books = store.load().map_err(|e| {
        tracing::error!(error = %e, "Failed to load books");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;

    let index = locate(&books, id).ok_or_else(not_found)?;

    Ok(render_edit(id, &books[index]))
}

/// Overwrite the book at `id` with the submitted form and redirect.
pub async fn update(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<i64>,
    Form(form): Form<BookForm>,
) -> Result<Redirect, (StatusCode, String)> {
    let store = state.store.write().await;

    let mut books = store.load().map_err(|e| {
        tracing::error!(error = %e, "Failed to load books");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;

    let index = locate(&books, id).ok_or_else(not_found)?;
    books[index] = form.into();

    store.save(&books).map_err(|e| {
        tracing::error!(error = %e, "Failed to save books");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;

    tracing::info!(id, "book updated");
    Ok(Redirect::to("/"))
}

/// Remove the book at `id` and redirect to the list.
pub async fn delete(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<i64>,
) -> Result<Redirect, (StatusCode, String)> {
    let store = state.store.write().await;

    let mut books = store.load().map_err(|e| {
        tracing::error!(error = %e, "Failed to load books");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;

    let index = locate(&books, id).ok_or_else(not_found)?;
    books.remove(index);

    store.save(&books).map_err(|e| {
        tracing::error!(error = %e, "Failed to save books");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;

    tracing::info!(id, remaining = books.len(), "book deleted");
    Ok(Redirect::to("/"))
}

/// Escape a value for interpolation into HTML text or an attribute.
fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn render_list(books: &[Book]) -> Html<String> {
    let mut rows = String::new();
    for (id, book) in books.iter().enumerate() {
        rows.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td>\
             <td><a href=\"/edit/{id}\">edit</a> <a href=\"/delete/{id}\">delete</a></td></tr>\n",
            escape(&book.title),
            escape(&book.author),
            escape(&book.genre),
            escape(&book.status),
        ));
    }

    Html(format!(
        "<!doctype html>\n<html><head><title>Bookshelf</title></head><body>\n\
         <h1>Bookshelf</h1>\n\
         <table>\n\
         <tr><th>Title</th><th>Author</th><th>Genre</th><th>Status</th><th></th></tr>\n\
         {rows}\
         </table>\n\
         <h2>Add a book</h2>\n\
         <form method=\"post\" action=\"/\">\n\
         <input name=\"title\" placeholder=\"Title\" required>\n\
         <input name=\"author\" placeholder=\"Author\" required>\n\
         <input name=\"genre\" placeholder=\"Genre\">\n\
         <input name=\"status\" placeholder=\"Status\">\n\
         <button type=\"submit\">Add</button>\n\
         </form>\n\
         <p><a href=\"/export\">Export CSV</a></p>\n\
         </body></html>\n"
    ))
}

fn render_edit(id: i64, book: &Book) -> Html<String> {
    Html(format!(
        "<!doctype html>\n<html><head><title>Edit book</title></head><body>\n\
         <h1>Edit book</h1>\n\
         <form method=\"post\" action=\"/edit/{id}\">\n\
         <input name=\"title\" value=\"{}\" required>\n\
         <input name=\"author\" value=\"{}\" required>\n\
         <input name=\"genre\" value=\"{}\">\n\
         <input name=\"status\" value=\"{}\">\n\
         <button type=\"submit\">Save</button>\n\
         </form>\n\
         <p><a href=\"/\">Back</a></p>\n\
         </body></html>\n",
        escape(&book.title),
        escape(&book.author),
        escape(&book.genre),
        escape(&book.status),
    ))
}
