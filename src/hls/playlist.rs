//! Minimal M3U8 media playlist decoding.
//!
//! Only what a segment downloader needs: the ordered list of segment URIs,
//! resolved against the playlist location. Tags are skipped.

use crate::error::{Error, Result};

use reqwest::Url;
use reqwest_middleware::ClientWithMiddleware;
use tokio::fs;
use tracing::debug;

const HEADER: &str = "#EXTM3U";
const VARIANT_TAG: &str = "#EXT-X-STREAM-INF";

/// Fetches (or reads from disk) a playlist and returns its segment URIs.
///
/// `source` is an `http(s)` URL or a local path. Relative segment URIs are
/// only allowed for remote playlists.
pub async fn decode_playlist(client: &ClientWithMiddleware, source: &str) -> Result<Vec<Url>> {
    if source.starts_with("http://") || source.starts_with("https://") {
        let url = Url::parse(source).map_err(|e| Error::InvalidUrl(format!("{source}: {e}")))?;
        debug!("Fetching playlist {}", url);
        let text = client
            .get(url.as_str())
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        parse_playlist(&text, Some(&url))
    } else {
        debug!("Reading playlist {}", source);
        let text = fs::read_to_string(source).await?;
        parse_playlist(&text, None)
    }
}

/// Parses playlist text into segment URIs, in playlist order.
pub fn parse_playlist(text: &str, base: Option<&Url>) -> Result<Vec<Url>> {
    let text = text.trim_start_matches('\u{feff}');
    if !text.trim_start().starts_with(HEADER) {
        return Err(Error::Playlist(format!("missing {HEADER} header")));
    }
    if text.lines().any(|line| line.trim().starts_with(VARIANT_TAG)) {
        return Err(Error::Playlist(
            "master playlists are not supported, pass a variant playlist".into(),
        ));
    }

    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| resolve(line, base))
        .collect()
}

fn resolve(uri: &str, base: Option<&Url>) -> Result<Url> {
    match Url::parse(uri) {
        Ok(url) => Ok(url),
        Err(url::ParseError::RelativeUrlWithoutBase) => match base {
            Some(base) => base
                .join(uri)
                .map_err(|e| Error::InvalidUrl(format!("{uri}: {e}"))),
            None => Err(Error::Playlist(format!(
                "relative segment '{uri}' needs a remote playlist"
            ))),
        },
        Err(e) => Err(Error::InvalidUrl(format!("{uri}: {e}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MEDIA: &str = "#EXTM3U
#EXT-X-VERSION:3
#EXT-X-TARGETDURATION:10

#EXTINF:9.009,
seg0.ts
#EXTINF:9.009,
/abs/seg1.ts
#EXTINF:3.003,
https://cdn.example.com/seg2.ts
#EXT-X-ENDLIST
";

    #[test]
    fn test_relative_segments_resolve_against_base() {
        let base = Url::parse("https://example.com/video/index.m3u8").unwrap();
        let segments = parse_playlist(MEDIA, Some(&base)).unwrap();
        let segments: Vec<&str> = segments.iter().map(Url::as_str).collect();
        assert_eq!(
            segments,
            [
                "https://example.com/video/seg0.ts",
                "https://example.com/abs/seg1.ts",
                "https://cdn.example.com/seg2.ts",
            ]
        );
    }

    #[test]
    fn test_relative_segments_need_base() {
        assert!(matches!(parse_playlist(MEDIA, None), Err(Error::Playlist(_))));
    }

    #[test]
    fn test_rejects_non_playlist() {
        assert!(matches!(
            parse_playlist("<html></html>", None),
            Err(Error::Playlist(_))
        ));
    }

    #[test]
    fn test_rejects_master_playlist() {
        let master = "#EXTM3U\n#EXT-X-STREAM-INF:BANDWIDTH=1280000\nlow.m3u8\n";
        assert!(matches!(parse_playlist(master, None), Err(Error::Playlist(_))));
    }

    #[test]
    fn test_empty_media_playlist() {
        assert!(parse_playlist("#EXTM3U\n#EXT-X-ENDLIST\n", None)
            .unwrap()
            .is_empty());
    }
}
