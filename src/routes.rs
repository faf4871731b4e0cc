// file: src/routes.rs
// description: client-visible locations and the shareable archive query state
// reference: https://docs.rs/url/latest/url/form_urlencoded/index.html

use crate::models::DocumentId;
use std::fmt;
use url::form_urlencoded;

pub const ARCHIVE_PATH: &str = "/";
pub const CREATE_PATH: &str = "/documents/create";
pub const EDIT_PATH_PREFIX: &str = "/documents/edit/";

const FILTER_KEY: &str = "filter";
const SEARCH_KEY: &str = "search";

/// `filter` and `search` as they appear in the archive URL. Empty values are
/// never stored, so they never reach the query string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArchiveQuery {
    filter: Option<String>,
    search: Option<String>,
}

impl ArchiveQuery {
    pub fn new(filter: Option<&str>, search: Option<&str>) -> Self {
        Self {
            filter: non_empty(filter),
            search: non_empty(search),
        }
    }

    pub fn filter(&self) -> Option<&str> {
        self.filter.as_deref()
    }

    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.filter.is_none() && self.search.is_none()
    }

    /// Parses `filter=..&search=..` (leading `?` optional). Unknown keys are
    /// ignored; for repeated keys the first occurrence wins.
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut filter = None;
        let mut search = None;

        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            match &*key {
                FILTER_KEY if filter.is_none() => filter = Some(value.into_owned()),
                SEARCH_KEY if search.is_none() => search = Some(value.into_owned()),
                _ => {}
            }
        }

        Self::new(filter.as_deref(), search.as_deref())
    }

    pub fn to_query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        if let Some(filter) = &self.filter {
            serializer.append_pair(FILTER_KEY, filter);
        }
        if let Some(search) = &self.search {
            serializer.append_pair(SEARCH_KEY, search);
        }
        serializer.finish()
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_string)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Archive(ArchiveQuery),
    CreateDocument,
    EditDocument(DocumentId),
}

impl Route {
    pub fn archive() -> Self {
        Self::Archive(ArchiveQuery::default())
    }

    pub fn parse(location: &str) -> Option<Self> {
        let (path, query) = location.split_once('?').unwrap_or((location, ""));
        let path = match path.trim_end_matches('/') {
            "" => ARCHIVE_PATH,
            trimmed => trimmed,
        };

        if path == ARCHIVE_PATH {
            return Some(Self::Archive(ArchiveQuery::parse(query)));
        }
        if path == CREATE_PATH {
            return Some(Self::CreateDocument);
        }

        path.strip_prefix(EDIT_PATH_PREFIX)
            .filter(|segment| !segment.is_empty() && !segment.contains('/'))
            .map(decode_segment)
            .filter(|id| !id.is_empty())
            .map(|id| Self::EditDocument(DocumentId::from(id)))
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Archive(query) if query.is_empty() => f.write_str(ARCHIVE_PATH),
            Self::Archive(query) => write!(f, "{}?{}", ARCHIVE_PATH, query.to_query_string()),
            Self::CreateDocument => f.write_str(CREATE_PATH),
            Self::EditDocument(id) => {
                write!(f, "{}{}", EDIT_PATH_PREFIX, encode_segment(id.as_str()))
            }
        }
    }
}

/// Percent-encodes one path segment; spaces become `%20`, not `+`.
fn encode_segment(segment: &str) -> String {
    form_urlencoded::byte_serialize(segment.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

/// Inverse of `encode_segment`. A literal `+` in a path stays a `+`.
fn decode_segment(segment: &str) -> String {
    let escaped = segment
        .replace('+', "%2B")
        .replace('&', "%26")
        .replace('=', "%3D");
    form_urlencoded::parse(escaped.as_bytes())
        .next()
        .map(|(decoded, _)| decoded.into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_values_are_omitted_from_query() {
        let query = ArchiveQuery::new(None, Some(""));
        assert_eq!(query.to_query_string(), "");
        assert!(query.is_empty());
        assert_eq!(Route::Archive(query).to_string(), "/");
    }

    #[test]
    fn test_query_string_encodes_values() {
        let query = ArchiveQuery::new(Some("legal docs"), Some("a&b"));
        assert_eq!(query.to_query_string(), "filter=legal+docs&search=a%26b");
        assert_eq!(ArchiveQuery::parse(&query.to_query_string()), query);
    }

    #[test]
    fn test_parse_ignores_unknown_and_repeated_keys() {
        let query = ArchiveQuery::parse("?page=2&filter=hr&filter=it&search=");
        assert_eq!(query.filter(), Some("hr"));
        assert_eq!(query.search(), None);
    }

    #[test]
    fn test_route_parse() {
        assert_eq!(Route::parse("/"), Some(Route::archive()));
        assert_eq!(Route::parse(""), Some(Route::archive()));
        assert_eq!(
            Route::parse("/?search=lease"),
            Some(Route::Archive(ArchiveQuery::new(None, Some("lease"))))
        );
        assert_eq!(Route::parse("/documents/create"), Some(Route::CreateDocument));
        assert_eq!(
            Route::parse("/documents/edit/665f1c2e9b1d/"),
            Some(Route::EditDocument(DocumentId::from("665f1c2e9b1d")))
        );
        assert_eq!(Route::parse("/documents/edit/"), None);
        assert_eq!(Route::parse("/documents/edit/a/b"), None);
        assert_eq!(Route::parse("/settings"), None);
    }

    #[test]
    fn test_route_display() {
        assert_eq!(Route::CreateDocument.to_string(), "/documents/create");
        assert_eq!(
            Route::EditDocument(DocumentId::from("42")).to_string(),
            "/documents/edit/42"
        );
        assert_eq!(
            Route::Archive(ArchiveQuery::new(Some("hr"), None)).to_string(),
            "/?filter=hr"
        );
    }

    #[test]
    fn test_edit_route_id_is_percent_encoded() {
        assert_eq!(
            Route::parse("/documents/edit/a%20b"),
            Some(Route::EditDocument(DocumentId::from("a b")))
        );
        assert_eq!(
            Route::EditDocument(DocumentId::from("a b")).to_string(),
            "/documents/edit/a%20b"
        );

        let awkward = Route::EditDocument(DocumentId::from("x+y&z=1 é"));
        assert_eq!(Route::parse(&awkward.to_string()), Some(awkward));
        assert_eq!(
            Route::parse("/documents/edit/x+y"),
            Some(Route::EditDocument(DocumentId::from("x+y")))
        );
    }
}
