use std::cmp::Ordering;

use feruca::Collator;

use crate::api::types::Link;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortMode {
    NameAsc,
    NameDesc,
    DateAsc,
    #[default]
    DateDesc,
}

impl SortMode {
    /// Unrecognized values fall back to [`SortMode::DateDesc`].
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "name_asc" => Self::NameAsc,
            "name_desc" => Self::NameDesc,
            "date_asc" => Self::DateAsc,
            _ => Self::DateDesc,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::NameAsc => "name_asc",
            Self::NameDesc => "name_desc",
            Self::DateAsc => "date_asc",
            Self::DateDesc => "date_desc",
        }
    }
}

/// Unicode collation on case-folded titles, so accented letters sort next
/// to their base letter and case never decides the order.
fn by_name(collator: &mut Collator, a: &Link, b: &Link) -> Ordering {
    collator.collate(
        &a.display_title().to_lowercase(),
        &b.display_title().to_lowercase(),
    )
}

fn by_created(a: &Link, b: &Link) -> Ordering {
    a.created_millis().cmp(&b.created_millis())
}

/// Returns a sorted copy of `links`. Descending modes negate the ascending
/// comparator, and the sort is stable, so links with equal keys keep their
/// input order in every mode.
pub fn sort_links(links: &[Link], mode: SortMode) -> Vec<Link> {
    let mut out = links.to_vec();
    let mut collator = Collator::default();
    match mode {
        SortMode::NameAsc => out.sort_by(|a, b| by_name(&mut collator, a, b)),
        SortMode::NameDesc => out.sort_by(|a, b| by_name(&mut collator, a, b).reverse()),
        SortMode::DateAsc => out.sort_by(by_created),
        SortMode::DateDesc => out.sort_by(|a, b| by_created(a, b).reverse()),
    }
    out
}
