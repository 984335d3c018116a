use url::Url;

use crate::ast::MediaKind;

use super::types::{ContentClassification, ContentKind, Metadata, UrlTarget};

const ALLOWED_SCHEMES: &[&str] = &["http", "https", "ftp"];
const VIDEO_HOSTS: &[&str] = &["youtube.com", "youtu.be", "vimeo.com", "loom.com"];

const IMAGE_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "webp", "svg", "bmp", "ico", "avif", "tif", "tiff", "heic",
];
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "webm", "avi", "mkv", "m4v", "mpeg", "ogv"];
const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "ogg", "oga", "m4a", "flac", "aac", "opus"];
const FILE_EXTENSIONS: &[&str] = &[
    "pdf", "doc", "docx", "xls", "xlsx", "ppt", "pptx", "odt", "ods", "zip", "tar", "gz", "rar",
    "7z", "csv", "txt", "epub", "json", "xml",
];

pub const URL_CONFIDENCE: f64 = 0.95;
pub const BARE_WWW_CONFIDENCE: f64 = 0.92;

/// A single absolute web URL, or a `www.` host without a scheme.
///
/// Script and data URIs are rejected outright.
pub fn detect(text: &str) -> Option<ContentClassification> {
    if text.contains(char::is_whitespace) {
        return None;
    }
    let (url, confidence) = match parse_web_url(text) {
        Some(url) => (url, URL_CONFIDENCE),
        None if text.len() > 4 && text.get(..4).is_some_and(|p| p.eq_ignore_ascii_case("www.")) => {
            (parse_web_url(&format!("https://{text}"))?, BARE_WWW_CONFIDENCE)
        }
        None => return None,
    };
    let metadata = Metadata {
        media: Some(target(&url)),
        ..Metadata::default()
    };
    Some(ContentClassification::new(ContentKind::Url, confidence).with_metadata(metadata))
}

/// Parses an absolute http(s)/ftp URL that names a host.
pub fn parse_web_url(text: &str) -> Option<Url> {
    let url = Url::parse(text).ok()?;
    let has_host = url.host_str().is_some_and(|h| !h.is_empty());
    (ALLOWED_SCHEMES.contains(&url.scheme()) && has_host).then_some(url)
}

fn target(url: &Url) -> UrlTarget {
    match media_kind_of(url) {
        Some(MediaKind::Image) => UrlTarget::Image,
        Some(MediaKind::Video) => UrlTarget::Video,
        Some(MediaKind::Audio) => UrlTarget::Audio,
        Some(MediaKind::File) => UrlTarget::File,
        None => UrlTarget::Page,
    }
}

/// Media kind of a URL string, `None` for ordinary pages.
pub fn media_kind(text: &str) -> Option<MediaKind> {
    media_kind_of(&parse_web_url(text)?)
}

fn media_kind_of(url: &Url) -> Option<MediaKind> {
    let host = url.host_str()?.trim_start_matches("www.");
    if VIDEO_HOSTS
        .iter()
        .any(|h| host == *h || host.ends_with(&format!(".{h}")))
    {
        return Some(MediaKind::Video);
    }

    let last = url.path_segments()?.next_back()?;
    let (_, ext) = last.rsplit_once('.')?;
    let ext = ext.to_ascii_lowercase();
    let ext = ext.as_str();
    if IMAGE_EXTENSIONS.contains(&ext) {
        Some(MediaKind::Image)
    } else if VIDEO_EXTENSIONS.contains(&ext) {
        Some(MediaKind::Video)
    } else if AUDIO_EXTENSIONS.contains(&ext) {
        Some(MediaKind::Audio)
    } else if FILE_EXTENSIONS.contains(&ext) {
        Some(MediaKind::File)
    } else {
        None
    }
}
