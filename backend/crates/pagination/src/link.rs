//! Next-page link construction.

use url::Url;

/// Build the URL of the following page by replacing `param` in `base`.
///
/// Other query parameters are preserved in their original order.
///
/// # Example
///
/// ```
/// use pagination::next_page_link;
/// use url::Url;
///
/// let base = Url::parse("http://localhost:3333/api/webhooks?cursor=old&x=1").expect("url");
/// let next = next_page_link(&base, "cursor", "new");
/// assert_eq!(next.as_str(), "http://localhost:3333/api/webhooks?x=1&cursor=new");
/// ```
#[must_use]
pub fn next_page_link(base: &Url, param: &str, cursor: &str) -> Url {
    let retained: Vec<(String, String)> = base
        .query_pairs()
        .filter(|(key, _)| key != param)
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    let mut next = base.clone();
    next.query_pairs_mut()
        .clear()
        .extend_pairs(retained)
        .append_pair(param, cursor);
    next
}
