use tracing::{debug, warn};

use crate::api::types::EntityId;
use crate::prefs::{COLLECTION_ID_KEY, SIDEBAR_OPEN_KEY, SORT_MODE_KEY};

use super::nav::children_of;
use super::state::{
    Action, ActionOutcome, DashboardState, GridState, LinksAtCurrent, LoadRequest, OpenTarget,
    RowAction, SidebarStatus,
};
use super::view::sidebar_view;

pub(super) fn handle_action(state: &mut DashboardState, action: Action) -> ActionOutcome {
    match action {
        Action::Descend(id) => descend(state, id),
        Action::Ascend => ascend(state),
        Action::Search(query) => {
            state.sidebar.query = query;
            ActionOutcome::default()
        }
        Action::ActivateRow(index) => activate_row(state, index),
        Action::ToggleSidebar => toggle_sidebar(state),
        Action::CloseSidebar => {
            if !state.sidebar.open {
                return ActionOutcome::default();
            }
            state.sidebar.open = false;
            state.prefs.sidebar_open = false;
            ActionOutcome {
                changed_prefs: vec![SIDEBAR_OPEN_KEY],
                ..Default::default()
            }
        }
        Action::SetSortMode(mode) => {
            state.prefs.sort_mode = mode;
            ActionOutcome {
                changed_prefs: vec![SORT_MODE_KEY],
                ..Default::default()
            }
        }
        Action::SelectCollection(id) => {
            state.prefs.selected_collection_id = id;
            ActionOutcome {
                load: start_grid_load(state),
                changed_prefs: vec![COLLECTION_ID_KEY],
                ..Default::default()
            }
        }
    }
}

/// Starts a fresh main grid load for the selected collection. Any load
/// still in flight becomes stale.
pub(super) fn start_grid_load(state: &mut DashboardState) -> Option<LoadRequest> {
    state.grid_generation += 1;
    match state.prefs.selected_collection_id.clone() {
        Some(collection_id) => {
            state.grid = GridState::Loading;
            Some(LoadRequest::GridLinks {
                collection_id,
                generation: state.grid_generation,
            })
        }
        None => {
            state.grid = GridState::NoCollection;
            None
        }
    }
}

fn descend(state: &mut DashboardState, id: EntityId) -> ActionOutcome {
    if state.sidebar.status != SidebarStatus::Ready {
        return ActionOutcome::default();
    }
    if !is_descendable(state, &id) {
        warn!(collection = %id, "ignoring descend into a non-child collection");
        return ActionOutcome::default();
    }
    let sidebar = &mut state.sidebar;
    let generation = sidebar.navigator.descend(id.clone(), &sidebar.collections);
    sidebar.links = LinksAtCurrent::Pending;
    ActionOutcome {
        load: Some(LoadRequest::SidebarLinks {
            collection_id: id,
            generation,
        }),
        ..Default::default()
    }
}

fn ascend(state: &mut DashboardState) -> ActionOutcome {
    let sidebar = &mut state.sidebar;
    if sidebar.status != SidebarStatus::Ready {
        return ActionOutcome::default();
    }
    let generation = sidebar.navigator.ascend();
    let load = match sidebar.navigator.current().cloned() {
        Some(collection_id) => {
            sidebar.links = LinksAtCurrent::Pending;
            Some(LoadRequest::SidebarLinks {
                collection_id,
                generation,
            })
        }
        None => {
            sidebar.links = LinksAtCurrent::Root;
            None
        }
    };
    ActionOutcome {
        load,
        ..Default::default()
    }
}

fn activate_row(state: &mut DashboardState, index: usize) -> ActionOutcome {
    let Some(row) = sidebar_view(state).rows.into_iter().nth(index) else {
        debug!(index, "no sidebar row to activate");
        return ActionOutcome::default();
    };
    match row.action {
        RowAction::Descend(id) => descend(state, id),
        RowAction::Open(url) if url.is_empty() => ActionOutcome::default(),
        RowAction::Open(url) => ActionOutcome {
            open: Some(OpenTarget {
                url,
                new_tab: state.prefs.open_new_tab,
            }),
            ..Default::default()
        },
    }
}

fn toggle_sidebar(state: &mut DashboardState) -> ActionOutcome {
    if !state.prefs.show_sidebar {
        return ActionOutcome::default();
    }
    let sidebar = &mut state.sidebar;
    sidebar.open = !sidebar.open;
    state.prefs.sidebar_open = sidebar.open;
    if sidebar.open {
        sidebar.reset_navigation();
    }
    ActionOutcome {
        changed_prefs: vec![SIDEBAR_OPEN_KEY],
        ..Default::default()
    }
}

/// Whether `id` can be descended into from the current position.
pub(super) fn is_descendable(state: &DashboardState, id: &EntityId) -> bool {
    let sidebar = &state.sidebar;
    children_of(&sidebar.collections, sidebar.navigator.current())
        .iter()
        .any(|c| &c.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::test_helpers::{make_link, test_state};
    use crate::sort::SortMode;
    use std::sync::Arc;

    #[test]
    fn descend_requests_links_with_new_generation() {
        let mut state = test_state();
        let outcome = handle_action(&mut state, Action::Descend(EntityId::from(1)));
        assert_eq!(
            outcome.load,
            Some(LoadRequest::SidebarLinks {
                collection_id: EntityId::from(1),
                generation: state.sidebar.navigator.generation(),
            })
        );
        assert_eq!(state.sidebar.links, LinksAtCurrent::Pending);
    }

    #[test]
    fn ascend_to_root_needs_no_load() {
        let mut state = test_state();
        handle_action(&mut state, Action::Descend(EntityId::from(1)));
        let outcome = handle_action(&mut state, Action::Ascend);
        assert_eq!(outcome.load, None);
        assert_eq!(state.sidebar.links, LinksAtCurrent::Root);
        assert!(state.sidebar.navigator.is_at_root());
    }

    #[test]
    fn ascend_to_parent_reloads_its_links() {
        let mut state = test_state();
        handle_action(&mut state, Action::Descend(EntityId::from(1)));
        handle_action(&mut state, Action::Descend(EntityId::from(2)));
        let outcome = handle_action(&mut state, Action::Ascend);
        assert!(matches!(
            outcome.load,
            Some(LoadRequest::SidebarLinks { ref collection_id, .. }) if *collection_id == EntityId::from(1)
        ));
    }

    #[test]
    fn navigation_is_ignored_until_collections_load() {
        let mut state = test_state();
        state.sidebar.status = SidebarStatus::Unavailable;
        let outcome = handle_action(&mut state, Action::Descend(EntityId::from(1)));
        assert_eq!(outcome, ActionOutcome::default());
        assert!(state.sidebar.navigator.is_at_root());
    }

    #[test]
    fn search_does_not_move_navigator() {
        let mut state = test_state();
        handle_action(&mut state, Action::Descend(EntityId::from(1)));
        let before = state.sidebar.navigator.clone();

        handle_action(&mut state, Action::Search("pro".into()));
        assert_eq!(sidebar_view(&state).rows.len(), 1);
        handle_action(&mut state, Action::Search(String::new()));
        assert_eq!(sidebar_view(&state).rows.len(), 2);
        assert_eq!(state.sidebar.navigator, before);
    }

    #[test]
    fn activating_collection_row_descends() {
        let mut state = test_state();
        let outcome = handle_action(&mut state, Action::ActivateRow(1));
        assert_eq!(state.sidebar.navigator.current(), Some(&EntityId::from(4)));
        assert!(outcome.load.is_some());
    }

    #[test]
    fn activating_link_row_opens_it() {
        let mut state = test_state();
        handle_action(&mut state, Action::Descend(EntityId::from(4)));
        state.sidebar.links = LinksAtCurrent::Loaded(Arc::new(vec![
            make_link("Blog", "https://blog", ""),
            make_link("Nowhere", "", ""),
        ]));

        let outcome = handle_action(&mut state, Action::ActivateRow(0));
        assert_eq!(
            outcome.open,
            Some(OpenTarget {
                url: "https://blog".into(),
                new_tab: true,
            })
        );
        let outcome = handle_action(&mut state, Action::ActivateRow(1));
        assert_eq!(outcome, ActionOutcome::default());
        let outcome = handle_action(&mut state, Action::ActivateRow(9));
        assert_eq!(outcome, ActionOutcome::default());
    }

    #[test]
    fn reopening_sidebar_resets_navigation() {
        let mut state = test_state();
        handle_action(&mut state, Action::Descend(EntityId::from(1)));
        handle_action(&mut state, Action::Search("x".into()));

        let outcome = handle_action(&mut state, Action::ToggleSidebar);
        assert_eq!(outcome.changed_prefs, [SIDEBAR_OPEN_KEY]);
        assert!(state.sidebar.open);
        assert!(state.prefs.sidebar_open);
        assert!(state.sidebar.navigator.is_at_root());
        assert_eq!(state.sidebar.query, "");

        handle_action(&mut state, Action::CloseSidebar);
        assert!(!state.sidebar.open);
        assert!(!state.prefs.sidebar_open);
    }

    #[test]
    fn toggle_is_ignored_when_sidebar_disabled() {
        let mut state = test_state();
        state.prefs.show_sidebar = false;
        let outcome = handle_action(&mut state, Action::ToggleSidebar);
        assert_eq!(outcome, ActionOutcome::default());
        assert!(!state.sidebar.open);
    }

    #[test]
    fn sort_mode_change_is_persisted() {
        let mut state = test_state();
        let outcome = handle_action(&mut state, Action::SetSortMode(SortMode::NameAsc));
        assert_eq!(outcome.changed_prefs, [SORT_MODE_KEY]);
        assert_eq!(state.prefs.sort_mode, SortMode::NameAsc);
    }

    #[test]
    fn selecting_collection_starts_grid_load() {
        let mut state = test_state();
        let generation = state.grid_generation;
        let outcome = handle_action(
            &mut state,
            Action::SelectCollection(Some(EntityId::from(4))),
        );
        assert_eq!(
            outcome.load,
            Some(LoadRequest::GridLinks {
                collection_id: EntityId::from(4),
                generation: generation + 1,
            })
        );
        assert_eq!(state.grid, GridState::Loading);

        let outcome = handle_action(&mut state, Action::SelectCollection(None));
        assert_eq!(outcome.load, None);
        assert_eq!(state.grid, GridState::NoCollection);
    }

    #[test]
    fn descend_into_non_child_is_ignored() {
        let mut state = test_state();
        let outcome = handle_action(&mut state, Action::Descend(EntityId::from(3)));
        assert_eq!(outcome, ActionOutcome::default());
        assert!(state.sidebar.navigator.is_at_root());
    }

    #[test]
    fn descendable_only_for_direct_children() {
        let state = test_state();
        assert!(is_descendable(&state, &EntityId::from(1)));
        assert!(!is_descendable(&state, &EntityId::from(2)));
    }
}
