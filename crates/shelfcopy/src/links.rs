//! Cross-site links built from a catalog page.
//!
//! - Storygraph book page → Goodreads search for the same book.
//! - Letterboxd film page → Radarr "add movie" search by TMDB id.

use crate::document::Document;
use crate::error::LinkError;
use crate::store::KeyValueStore;
use regex::Regex;
use std::sync::OnceLock;
use url::Url;

const STORYGRAPH_TITLE_SELECTOR: &str = "h3.font-serif";
const STORYGRAPH_AUTHOR_BLOCK_SELECTOR: &str = ".book-title-author-and-series p.font-body";
const STORYGRAPH_AUTHOR_LINK_SELECTOR: &str = ".book-title-author-and-series p.font-body a";

const GOODREADS_SEARCH_URL: &str = "https://www.goodreads.com/search";

const TMDB_LINK_SELECTOR: &str = r#"a[data-track-action="TMDB"]"#;

/// Store key holding the Radarr base URL.
pub const RADARR_URL_KEY: &str = "radarr_url";
/// Radarr's out-of-the-box address.
pub const DEFAULT_RADARR_URL: &str = "http://localhost:7878";

/// Title and credited authors scraped from a Storygraph book page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorygraphBook {
    pub title: String,
    pub authors: String,
}

/// Read title and authors, skipping translator and narrator credits.
pub fn storygraph_book(doc: &dyn Document) -> Result<StorygraphBook, LinkError> {
    let title = doc.leading_text(STORYGRAPH_TITLE_SELECTOR)?;
    let has_author_block = doc.text(STORYGRAPH_AUTHOR_BLOCK_SELECTOR)?.is_some();
    let Some(title) = title.filter(|_| has_author_block) else {
        return Err(LinkError::MissingBookInfo);
    };

    let authors = doc
        .texts(STORYGRAPH_AUTHOR_LINK_SELECTOR)?
        .into_iter()
        .filter(|a| !a.contains("Translator") && !a.contains("Narrator"))
        .collect::<Vec<_>>()
        .join(" ");

    Ok(StorygraphBook { title, authors })
}

/// Goodreads search URL for a Storygraph book page.
pub fn goodreads_search_url(doc: &dyn Document) -> Result<Url, LinkError> {
    let book = storygraph_book(doc)?;
    let query = format!("{} {}", book.title, book.authors);
    Url::parse_with_params(GOODREADS_SEARCH_URL, &[("q", query.trim())]).map_err(|source| {
        LinkError::BaseUrl {
            url: GOODREADS_SEARCH_URL.to_string(),
            source,
        }
    })
}

/// TMDB movie id linked from a Letterboxd film page.
pub fn tmdb_id(doc: &dyn Document) -> Result<String, LinkError> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"movie/(\d+)").expect("tmdb regex is valid"));

    let href = doc
        .attr(TMDB_LINK_SELECTOR, "href")?
        .ok_or(LinkError::MissingTmdbId)?;
    re.captures(&href)
        .map(|caps| caps[1].to_string())
        .ok_or(LinkError::MissingTmdbId)
}

/// Configured Radarr base URL, without a trailing slash.
pub fn radarr_base_url(store: &dyn KeyValueStore) -> String {
    let base = store.get_or(RADARR_URL_KEY, DEFAULT_RADARR_URL);
    base.trim_end_matches('/').to_string()
}

/// Validate and store a new Radarr base URL. Returns the stored form.
pub fn set_radarr_base_url(store: &mut dyn KeyValueStore, url: &str) -> Result<String, LinkError> {
    let sanitized = url.trim().trim_end_matches('/').to_string();
    Url::parse(&sanitized).map_err(|source| LinkError::BaseUrl {
        url: sanitized.clone(),
        source,
    })?;
    store.set(RADARR_URL_KEY, &sanitized)?;
    Ok(sanitized)
}

/// Radarr search URL for the film on a Letterboxd page.
pub fn radarr_search_url(doc: &dyn Document, radarr_base: &str) -> Result<String, LinkError> {
    let id = tmdb_id(doc)?;
    let base = radarr_base.trim_end_matches('/');
    Url::parse(base).map_err(|source| LinkError::BaseUrl {
        url: base.to_string(),
        source,
    })?;
    Ok(format!("{base}/add/new?term=tmdb:{id}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::HtmlDocument;
    use crate::store::MemoryStore;

    const STORYGRAPH: &str = r#"
        <div class="book-title-author-and-series">
          <h3 class="font-serif">Piranesi<span class="font-sans">Standalone</span></h3>
          <p class="font-body">
            <a href="/authors/1">Susanna Clarke</a>
            <a href="/authors/2">Chiwetel Ejiofor (Narrator)</a>
          </p>
        </div>
    "#;

    const LETTERBOXD: &str = r#"
        <p class="text-link">
          <a href="https://www.imdb.com/title/tt0133093/" data-track-action="IMDb">IMDb</a>
          <a href="https://www.themoviedb.org/movie/603/" data-track-action="TMDB">TMDB</a>
        </p>
    "#;

    #[test]
    fn test_storygraph_book_skips_narrators() {
        let doc = HtmlDocument::parse(STORYGRAPH, "https://app.thestorygraph.com/books/x");
        let book = storygraph_book(&doc).unwrap();
        assert_eq!(book.title, "Piranesi");
        assert_eq!(book.authors, "Susanna Clarke");
    }

    #[test]
    fn test_goodreads_search_url() {
        let doc = HtmlDocument::parse(STORYGRAPH, "https://app.thestorygraph.com/books/x");
        let url = goodreads_search_url(&doc).unwrap();
        assert_eq!(url.host_str(), Some("www.goodreads.com"));
        let (_, q) = url.query_pairs().next().unwrap();
        assert_eq!(q, "Piranesi Susanna Clarke");
    }

    #[test]
    fn test_storygraph_missing_info() {
        let doc = HtmlDocument::parse("<h3 class=\"font-serif\">Only</h3>", "https://x/");
        assert!(matches!(
            storygraph_book(&doc),
            Err(LinkError::MissingBookInfo)
        ));
    }

    #[test]
    fn test_radarr_search_url() {
        let doc = HtmlDocument::parse(LETTERBOXD, "https://letterboxd.com/film/the-matrix/");
        assert_eq!(tmdb_id(&doc).unwrap(), "603");
        assert_eq!(
            radarr_search_url(&doc, "http://nas:7878/").unwrap(),
            "http://nas:7878/add/new?term=tmdb:603"
        );
    }

    #[test]
    fn test_radarr_without_tmdb_link() {
        let doc = HtmlDocument::parse("<p>no links</p>", "https://letterboxd.com/film/x/");
        assert!(matches!(
            radarr_search_url(&doc, DEFAULT_RADARR_URL),
            Err(LinkError::MissingTmdbId)
        ));
    }

    #[test]
    fn test_radarr_base_url_setting() {
        let mut store = MemoryStore::new();
        assert_eq!(radarr_base_url(&store), DEFAULT_RADARR_URL);
        let stored = set_radarr_base_url(&mut store, "http://nas:7878/").unwrap();
        assert_eq!(stored, "http://nas:7878");
        assert_eq!(radarr_base_url(&store), "http://nas:7878");
        assert!(matches!(
            set_radarr_base_url(&mut store, "not a url"),
            Err(LinkError::BaseUrl { .. })
        ));
    }
}
