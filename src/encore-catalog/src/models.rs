//! Response types for the song-search API

use serde::Deserialize;
use tracing::{debug, warn};

use crate::{CATALOG_SUCCESS_CODE, CatalogError, CatalogResult};

/// One candidate from a listing response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    /// Ordinal parsed from the listing line, 1-based.
    pub ordinal: u32,
    /// Song title.
    pub title: String,
    /// Performing artist.
    pub singer: String,
}

/// Validated metadata for a single track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackDetail {
    /// Song title.
    pub title: String,
    /// Performing artist.
    pub singer: String,
    /// Direct audio stream URL, possibly carrying a signed query string.
    pub stream_url: String,
    /// Web page for the track.
    pub page_url: String,
    /// Cover image URL.
    pub cover_url: String,
    /// Full lyric text.
    pub lyrics: String,
}

/// Raw detail response as returned by the API.
///
/// Only `code` is guaranteed; `title` and `singer` are required once the code
/// signals success, the URL fields default to empty.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TrackDetailResponse {
    pub code: i64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub singer: Option<String>,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub music_url: String,
    #[serde(default)]
    pub cover: String,
    #[serde(default)]
    pub lyrics: String,
}

impl TrackDetailResponse {
    /// Validate the raw response into a [`TrackDetail`].
    pub(crate) fn into_detail(self) -> CatalogResult<TrackDetail> {
        if self.code != CATALOG_SUCCESS_CODE {
            return Err(CatalogError::Status { code: self.code });
        }
        let title = self.title.ok_or_else(|| {
            CatalogError::MalformedResponse("detail response missing 'title'".to_string())
        })?;
        let singer = self.singer.ok_or_else(|| {
            CatalogError::MalformedResponse("detail response missing 'singer'".to_string())
        })?;
        Ok(TrackDetail {
            title,
            singer,
            stream_url: self.music_url,
            page_url: self.link,
            cover_url: self.cover,
            lyrics: self.lyrics,
        })
    }
}

/// Separators between the numbered title and the singer, longest first so
/// `--` is never misread as a bare `-`.
const FIELD_SEPARATORS: [&str; 3] = ["--", "|", "-"];

/// Separators between the ordinal and the title.
const ORDINAL_SEPARATORS: [char; 2] = ['、', '.'];

/// Parse a line-oriented listing body into search results.
///
/// Expected line shape: `1、Song Title -- Artist`. Lines that do not split
/// cleanly are skipped with a warning and never abort the parse.
pub(crate) fn parse_listing(text: &str) -> Vec<SearchResult> {
    let lines: Vec<&str> = text.lines().collect();
    debug!("parsing song listing | lines: {}", lines.len());

    let mut results = Vec::new();
    for line in lines {
        if line.trim().is_empty() {
            continue;
        }
        match parse_line(line) {
            Some(result) => results.push(result),
            None => warn!("skipping unparseable listing line: {line:?}"),
        }
    }

    debug!("song listing parsed | valid entries: {}", results.len());
    results
}

fn parse_line(line: &str) -> Option<SearchResult> {
    let (numbered_title, singer) = FIELD_SEPARATORS
        .iter()
        .find_map(|sep| line.split_once(*sep))?;
    let (ordinal, title) = numbered_title.split_once(ORDINAL_SEPARATORS)?;
    let ordinal: u32 = ordinal.trim().parse().ok()?;
    Some(SearchResult {
        ordinal,
        title: title.trim().to_string(),
        singer: singer.trim().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn result(ordinal: u32, title: &str, singer: &str) -> SearchResult {
        SearchResult {
            ordinal,
            title: title.to_string(),
            singer: singer.to_string(),
        }
    }

    #[test]
    fn test_parses_listing_lines_in_order() {
        let body = "1、Song A -- Artist A\n2、Song B -- Artist B";
        assert_eq!(
            parse_listing(body),
            vec![result(1, "Song A", "Artist A"), result(2, "Song B", "Artist B")]
        );
    }

    #[test]
    fn test_parses_alternate_separators() {
        assert_eq!(
            parse_listing("1. Halcyon | OceanLab"),
            vec![result(1, "Halcyon", "OceanLab")]
        );
        assert_eq!(
            parse_listing("3、Nightcall - Kavinsky"),
            vec![result(3, "Nightcall", "Kavinsky")]
        );
    }

    #[test]
    fn test_double_dash_wins_over_single_dash() {
        // The title keeps its inner dash when a wider separator follows.
        assert_eq!(
            parse_listing("1、T-ara Day -- Artist"),
            vec![result(1, "T-ara Day", "Artist")]
        );
    }

    #[test]
    fn test_malformed_lines_are_dropped_without_affecting_siblings() {
        let body = "1、Song A -- Artist A\nnot a listing line\nabc、Song B -- Artist B\n2、Song C -- Artist C";
        assert_eq!(
            parse_listing(body),
            vec![result(1, "Song A", "Artist A"), result(2, "Song C", "Artist C")]
        );
    }

    #[test]
    fn test_blank_lines_are_ignored() {
        let body = "\n1、Song A -- Artist A\n\n   \n2、Song B -- Artist B\n";
        assert_eq!(parse_listing(body).len(), 2);
    }

    #[test]
    fn test_empty_body_yields_no_results() {
        assert_eq!(parse_listing(""), Vec::new());
    }

    #[test]
    fn test_detail_response_success_maps_all_fields() {
        let raw = TrackDetailResponse {
            code: 200,
            title: Some("X".to_string()),
            singer: Some("Y".to_string()),
            link: "http://h/page".to_string(),
            music_url: "http://h/f.mp3?sig=abc".to_string(),
            cover: "http://h/c.jpg".to_string(),
            lyrics: "la la".to_string(),
        };
        let detail = raw.into_detail().expect("valid detail");
        assert_eq!(detail.title, "X");
        assert_eq!(detail.singer, "Y");
        assert_eq!(detail.stream_url, "http://h/f.mp3?sig=abc");
        assert_eq!(detail.page_url, "http://h/page");
        assert_eq!(detail.cover_url, "http://h/c.jpg");
        assert_eq!(detail.lyrics, "la la");
    }

    #[test]
    fn test_detail_response_with_error_code_is_rejected() {
        let raw = TrackDetailResponse {
            code: 403,
            title: Some("X".to_string()),
            singer: Some("Y".to_string()),
            link: String::new(),
            music_url: String::new(),
            cover: String::new(),
            lyrics: String::new(),
        };
        assert!(matches!(
            raw.into_detail(),
            Err(CatalogError::Status { code: 403 })
        ));
    }

    #[test]
    fn test_detail_response_missing_title_is_malformed() {
        let raw = TrackDetailResponse {
            code: 200,
            title: None,
            singer: Some("Y".to_string()),
            link: String::new(),
            music_url: String::new(),
            cover: String::new(),
            lyrics: String::new(),
        };
        assert!(matches!(
            raw.into_detail(),
            Err(CatalogError::MalformedResponse(_))
        ));
    }
}
