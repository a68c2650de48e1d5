//! Browser localStorage mirror for session and dashboard snapshots.
//!
//! SYSTEM CONTEXT
//! ==============
//! The server is the source of truth; localStorage is a read-through cache so
//! a reload paints the last known lists before the refetch lands, and so the
//! session token and entered API keys survive the reload. Writes happen after
//! each successful fetch or mutation, never speculatively.

#[cfg(test)]
#[path = "persistence_test.rs"]
mod tests;

use serde::Serialize;
use serde::de::DeserializeOwned;

use shared::{EvaluationEntry, EvaluationJob, Project, User};

// Storage keys, shared with earlier deployments of the dashboard.
pub const KEY_TOKEN: &str = "token";
pub const KEY_USER: &str = "user";
pub const KEY_PROJECTS: &str = "projects";
pub const KEY_JOBS: &str = "evaluation_jobs";
pub const KEY_EVALUATIONS: &str = "evaluations";
pub const KEY_API_KEYS: &str = "llm_api_keys";
pub const KEY_SELECTED_PROJECT: &str = "selectedProjectId";

/// Provider API keys entered on the settings page.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, serde::Deserialize)]
pub struct ApiKeys {
    #[serde(default)]
    pub openai_key: String,
    #[serde(default)]
    pub deepseek_key: String,
    #[serde(default)]
    pub anthropic_key: String,
}

/// Load a JSON value from `localStorage` for `key`.
#[must_use]
pub fn load_json<T: DeserializeOwned>(key: &str) -> Option<T> {
    let raw = load_string(key)?;
    serde_json::from_str(&raw).ok()
}

/// Save a JSON value to `localStorage` for `key`.
pub fn save_json<T: Serialize>(key: &str, value: &T) {
    let Ok(raw) = serde_json::to_string(value) else {
        return;
    };
    save_string(key, &raw);
}

/// Load a raw string from `localStorage`.
#[must_use]
pub fn load_string(key: &str) -> Option<String> {
    #[cfg(feature = "csr")]
    {
        let storage = web_sys::window().and_then(|w| w.local_storage().ok().flatten())?;
        storage.get_item(key).ok().flatten()
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = key;
        None
    }
}

/// Save a raw string to `localStorage`.
pub fn save_string(key: &str, value: &str) {
    #[cfg(feature = "csr")]
    {
        if let Some(storage) = web_sys::window().and_then(|w| w.local_storage().ok().flatten()) {
            let _ = storage.set_item(key, value);
        }
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = (key, value);
    }
}

/// Remove a key from `localStorage`.
pub fn remove(key: &str) {
    #[cfg(feature = "csr")]
    {
        if let Some(storage) = web_sys::window().and_then(|w| w.local_storage().ok().flatten()) {
            let _ = storage.remove_item(key);
        }
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = key;
    }
}

// =============================================================================
// TYPED SNAPSHOTS
// =============================================================================

#[must_use]
pub fn load_token() -> Option<String> {
    load_string(KEY_TOKEN)
}

pub fn save_session(token: &str, user: &User) {
    save_string(KEY_TOKEN, token);
    save_json(KEY_USER, user);
}

/// Drop every session-scoped key, including cached lists.
pub fn clear_session() {
    for key in [KEY_TOKEN, KEY_USER, KEY_PROJECTS, KEY_JOBS, KEY_EVALUATIONS, KEY_SELECTED_PROJECT] {
        remove(key);
    }
}

#[must_use]
pub fn load_projects() -> Option<Vec<Project>> {
    load_json(KEY_PROJECTS)
}

pub fn save_projects(projects: &[Project]) {
    save_json(KEY_PROJECTS, &projects);
}

#[must_use]
pub fn load_jobs() -> Option<Vec<EvaluationJob>> {
    load_json(KEY_JOBS)
}

pub fn save_jobs(jobs: &[EvaluationJob]) {
    save_json(KEY_JOBS, &jobs);
}

#[must_use]
pub fn load_evaluations() -> Option<Vec<EvaluationEntry>> {
    load_json(KEY_EVALUATIONS)
}

pub fn save_evaluations(entries: &[EvaluationEntry]) {
    save_json(KEY_EVALUATIONS, &entries);
}

#[must_use]
pub fn load_api_keys() -> ApiKeys {
    load_json(KEY_API_KEYS).unwrap_or_default()
}

pub fn save_api_keys(keys: &ApiKeys) {
    save_json(KEY_API_KEYS, keys);
}

#[must_use]
pub fn load_selected_project() -> Option<uuid::Uuid> {
    load_string(KEY_SELECTED_PROJECT).and_then(|raw| raw.parse().ok())
}

pub fn save_selected_project(id: Option<uuid::Uuid>) {
    match id {
        Some(id) => save_string(KEY_SELECTED_PROJECT, &id.to_string()),
        None => remove(KEY_SELECTED_PROJECT),
    }
}
