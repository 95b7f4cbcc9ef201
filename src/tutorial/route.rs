//! The navigation parameter
//!
//! The open document is carried in a single `id` query parameter. Its
//! presence selects the document; absence means nothing is open.

use url::form_urlencoded;

use crate::domain::DocumentId;

/// Name of the query parameter selecting the open document
pub const ID_PARAM: &str = "id";

/// Reads the document ID from a query string (`?id=x`, `id=x` or empty).
///
/// The first `id` pair wins. An empty or malformed value is treated as
/// absent.
pub fn parse_query(query: &str) -> Option<DocumentId> {
    let query = query.trim().trim_start_matches('?');
    let value = form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == ID_PARAM)
        .map(|(_, value)| value.into_owned())?;

    match value.parse() {
        Ok(id) => Some(id),
        Err(e) => {
            tracing::debug!("ignoring navigation parameter: {}", e);
            None
        }
    }
}

/// Builds the query string for a navigation state
pub fn to_query(id: Option<&DocumentId>) -> String {
    match id {
        Some(id) => {
            let encoded: String = form_urlencoded::Serializer::new(String::new())
                .append_pair(ID_PARAM, id.as_str())
                .finish();
            format!("?{}", encoded)
        }
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> DocumentId {
        s.parse().unwrap()
    }

    #[test]
    fn parse_with_and_without_question_mark() {
        assert_eq!(parse_query("?id=stripe-account"), Some(id("stripe-account")));
        assert_eq!(parse_query("id=stripe-account"), Some(id("stripe-account")));
    }

    #[test]
    fn absent_or_empty_is_none() {
        assert_eq!(parse_query(""), None);
        assert_eq!(parse_query("?"), None);
        assert_eq!(parse_query("?id="), None);
        assert_eq!(parse_query("?other=1"), None);
    }

    #[test]
    fn decodes_and_takes_first() {
        assert_eq!(parse_query("?x=1&id=caf%C3%A9&id=second"), Some(id("café")));
    }

    #[test]
    fn malformed_value_is_none() {
        assert_eq!(parse_query("?id=two+words"), None);
    }

    #[test]
    fn builds_query() {
        assert_eq!(to_query(Some(&id("next-checkout"))), "?id=next-checkout");
        assert_eq!(to_query(Some(&id("café"))), "?id=caf%C3%A9");
        assert_eq!(to_query(None), "");
    }
}
