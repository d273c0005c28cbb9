use super::state::SidebarRow;

pub fn matches_query(label: &str, query: &str) -> bool {
    let query = query.trim().to_lowercase();
    query.is_empty() || label.to_lowercase().contains(&query)
}

/// Keeps rows whose label contains `query`, ignoring case. An empty query
/// keeps every row.
pub fn filter_rows(rows: Vec<SidebarRow>, query: &str) -> Vec<SidebarRow> {
    if query.trim().is_empty() {
        return rows;
    }
    rows.into_iter()
        .filter(|row| matches_query(&row.label, query))
        .collect()
}
