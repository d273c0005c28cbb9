use crate::api::endpoints;
use crate::api::types::Link;
use crate::sort::sort_links;

use super::nav::children_of;
use super::search::filter_rows;
use super::state::{
    DashboardState, GridState, GridView, LinksAtCurrent, RowAction, SidebarRow, SidebarView, Tile,
};

/// One tile per link, in the given order.
pub fn tiles(links: &[Link], favicon_base: &str, open_new_tab: bool) -> Vec<Tile> {
    links
        .iter()
        .map(|link| Tile {
            title: link.display_title().to_string(),
            url: if link.url.is_empty() {
                "#".into()
            } else {
                link.url.clone()
            },
            icon_url: endpoints::favicon_url(favicon_base, &link.url),
            open_in_new_tab: open_new_tab,
        })
        .collect()
}

pub fn grid_view(state: &DashboardState) -> GridView {
    match &state.grid {
        GridState::NoCollection => GridView::NoCollection,
        GridState::Loading => GridView::Loading,
        GridState::Failed(notice) => GridView::Error(notice.clone()),
        GridState::Loaded(links) => GridView::Tiles(tiles(
            &sort_links(links, state.prefs.sort_mode),
            &state.favicon_base,
            state.prefs.open_new_tab,
        )),
    }
}

/// Child collections first, then the links of the current collection, all
/// narrowed by the search query.
pub fn sidebar_view(state: &DashboardState) -> SidebarView {
    let sidebar = &state.sidebar;
    let nav = &sidebar.navigator;

    let mut rows: Vec<SidebarRow> = children_of(&sidebar.collections, nav.current())
        .into_iter()
        .map(|c| SidebarRow {
            label: c.display_name().to_string(),
            right_badge: c.link_count.map(|n| n.to_string()).unwrap_or_default(),
            action: RowAction::Descend(c.id.clone()),
        })
        .collect();

    let mut show_links_separator = false;
    if let LinksAtCurrent::Loaded(links) = &sidebar.links {
        show_links_separator = !links.is_empty();
        rows.extend(
            sort_links(links, state.prefs.sort_mode)
                .iter()
                .map(|link| SidebarRow {
                    label: link.display_title().to_string(),
                    right_badge: String::new(),
                    action: RowAction::Open(link.url.clone()),
                }),
        );
    }

    SidebarView {
        status: sidebar.status,
        open: sidebar.open,
        back_row_visible: !nav.is_at_root(),
        show_links_separator,
        rows: filter_rows(rows, &sidebar.query),
    }
}
