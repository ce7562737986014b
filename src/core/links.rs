use super::category::Category;

/// Render a `:doc:` cross-reference to `target` in `category`.
///
/// `same_level` links are relative to the referring document's own
/// directory; otherwise the category subdirectory is prepended.
pub fn link(target: &str, category: Category, same_level: bool) -> String {
    let info = category.info();
    let label = info.link_label.apply(target);
    if same_level {
        format!(":doc:`{} <{}>`", label, target)
    } else {
        format!(":doc:`{} <{}/{}>`", label, info.subdirectory, target)
    }
}
