use super::*;
use shared::Project;

fn project(name: &str) -> Project {
    Project {
        id: Uuid::new_v4(),
        name: name.to_owned(),
        description: String::new(),
        owner_id: Uuid::new_v4(),
        created_at: 0,
        updated_at: 0,
    }
}

#[test]
fn loaded_page_settles_loading_and_clears_error() {
    let mut state = CrudState::<Project>::default();
    state.failed("boom".to_owned());
    state.begin_loading();
    state.loaded_page(Paginated { items: vec![project("a")], total: 1, page: 1, limit: 10 });
    assert!(!state.loading);
    assert!(state.error.is_none());
    assert_eq!(state.items.len(), 1);
    assert_eq!(state.total, 1);
}

#[test]
fn upsert_inserts_new_items_first() {
    let mut state = CrudState::<Project>::default();
    state.loaded(vec![project("old")]);
    state.upsert(project("new"));
    assert_eq!(state.items[0].name, "new");
    assert_eq!(state.total, 2);
}

#[test]
fn upsert_replaces_existing_item_in_place() {
    let mut state = CrudState::<Project>::default();
    let mut p = project("before");
    state.loaded(vec![project("other"), p.clone()]);

    p.name = "after".to_owned();
    state.upsert(p.clone());

    assert_eq!(state.items.len(), 2);
    assert_eq!(state.items[1].name, "after");
    assert_eq!(state.total, 2);
}

#[test]
fn remove_clears_matching_selection() {
    let mut state = CrudState::<Project>::default();
    let p = project("selected");
    state.loaded(vec![p.clone(), project("other")]);
    state.select(Some(p.id));
    assert_eq!(state.selected().map(|s| s.name.as_str()), Some("selected"));

    state.remove(p.id);
    assert!(state.selected_id.is_none());
    assert_eq!(state.items.len(), 1);
    assert_eq!(state.total, 1);
}

#[test]
fn remove_keeps_unrelated_selection() {
    let mut state = CrudState::<Project>::default();
    let keep = project("keep");
    let drop = project("drop");
    state.loaded(vec![keep.clone(), drop.clone()]);
    state.select(Some(keep.id));

    state.remove(drop.id);
    assert_eq!(state.selected_id, Some(keep.id));
}

#[test]
fn loaded_page_drops_stale_selection() {
    let mut state = CrudState::<Project>::default();
    let p = project("transient");
    state.loaded(vec![p.clone()]);
    state.select(Some(p.id));

    state.loaded_page(Paginated { items: vec![project("fresh")], total: 1, page: 1, limit: 10 });
    assert!(state.selected_id.is_none());
}

#[test]
fn failed_keeps_existing_items_visible() {
    let mut state = CrudState::<Project>::default();
    state.loaded(vec![project("a")]);
    state.begin_loading();
    state.failed("network down".to_owned());
    assert_eq!(state.items.len(), 1);
    assert_eq!(state.error.as_deref(), Some("network down"));
}
