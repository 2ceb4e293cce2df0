use scraper::{Html, Node};

/// Text that sits next to the offer grid's bootstrap payload.
pub const BOOTSTRAP_MARKER: &str = "REFURB_GRID_BOOTSTRAP";

/// Yields every text node containing `marker`, in pre-order (parent before
/// children, siblings left to right).
pub fn marker_candidates<'a>(
    document: &'a Html,
    marker: &'a str,
) -> impl Iterator<Item = &'a str> + 'a {
    document
        .tree
        .root()
        .descendants()
        .filter_map(|node| match node.value() {
            Node::Text(text) => Some(&**text),
            _ => None,
        })
        .filter(move |text| text.contains(marker))
}

/// Tie-break between several marker-bearing nodes: the last one in
/// traversal order wins.
pub fn last_candidate<'a, I>(candidates: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    candidates.into_iter().last()
}
