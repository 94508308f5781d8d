//! Scene-style release title parser.
//!
//! Handles names like:
//! - "Inception.2010.1080p.BluRay.x264-SPARKS"
//! - "Le Fabuleux Destin d'Amelie Poulain (2001) [MULTi] 720p WEB-DL"
//! - "Blade_Runner_2049_2017_2160p_UHD_HDR_x265"

use super::types::{ParserDefaults, ReleaseMeta};

/// File extensions stripped from the end of a title before tokenizing.
const EXTENSIONS: &[&str] = &[".torrent", ".mkv", ".avi", ".mp4", ".m4v", ".nzb"];

/// Token (uppercase) -> canonical resolution.
const RESOLUTIONS: &[(&str, &str)] = &[
    ("480P", "SD"),
    ("576P", "SD"),
    ("720P", "720P"),
    ("1080P", "1080P"),
    ("1080I", "1080P"),
    ("2160P", "2160P"),
    ("4K", "2160P"),
    ("UHD", "2160P"),
];

/// Token (uppercase) -> canonical language.
const LANGUAGES: &[(&str, &str)] = &[
    ("ENGLISH", "ENGLISH"),
    ("ENG", "ENGLISH"),
    ("FRENCH", "FRENCH"),
    ("TRUEFRENCH", "FRENCH"),
    ("VFF", "FRENCH"),
    ("VFQ", "FRENCH"),
    ("VFI", "FRENCH"),
    ("VF", "FRENCH"),
    ("VF2", "FRENCH"),
    ("VOSTFR", "VOSTFR"),
    ("SUBFRENCH", "VOSTFR"),
    ("MULTI", "MULTI"),
    ("MULTILANG", "MULTI"),
    ("GERMAN", "GERMAN"),
    ("DEUTSCH", "GERMAN"),
    ("SPANISH", "SPANISH"),
    ("ESPANOL", "SPANISH"),
    ("CASTELLANO", "SPANISH"),
    ("ITALIAN", "ITALIAN"),
    ("ITA", "ITALIAN"),
    ("DUTCH", "DUTCH"),
    ("RUSSIAN", "RUSSIAN"),
    ("RUS", "RUSSIAN"),
    ("PORTUGUESE", "PORTUGUESE"),
    ("JAPANESE", "JAPANESE"),
    ("KOREAN", "KOREAN"),
    ("CHINESE", "CHINESE"),
    ("HINDI", "HINDI"),
    ("SWEDISH", "SWEDISH"),
    ("DANISH", "DANISH"),
    ("NORWEGIAN", "NORWEGIAN"),
    ("FINNISH", "FINNISH"),
    ("POLISH", "POLISH"),
];

/// Token (uppercase) -> canonical source.
const SOURCES: &[(&str, &str)] = &[
    ("BLURAY", "BLURAY"),
    ("BLU-RAY", "BLURAY"),
    ("BDREMUX", "BLURAY"),
    ("BDRIP", "BDRIP"),
    ("BRRIP", "BDRIP"),
    ("WEB-DL", "WEB-DL"),
    ("WEBDL", "WEB-DL"),
    ("WEB", "WEB-DL"),
    ("WEBRIP", "WEBRIP"),
    ("WEB-RIP", "WEBRIP"),
    ("HDTV", "HDTV"),
    ("DVDRIP", "DVDRIP"),
    ("DVDR", "DVD-R"),
    ("DVD-R", "DVD-R"),
    ("DVD5", "DVD-R"),
    ("DVD9", "DVD-R"),
    ("HDRIP", "HDRIP"),
    ("CAM", "CAM"),
    ("HDCAM", "CAM"),
    ("TS", "TS"),
    ("HDTS", "TS"),
    ("TELESYNC", "TS"),
    ("TC", "TC"),
    ("TELECINE", "TC"),
    ("SCREENER", "SCREENER"),
    ("SCR", "SCREENER"),
    ("DVDSCR", "SCREENER"),
    ("R5", "R5"),
];

/// Token (uppercase) -> canonical encoding.
const ENCODINGS: &[(&str, &str)] = &[
    ("X264", "x264"),
    ("H264", "x264"),
    ("AVC", "x264"),
    ("X265", "x265"),
    ("H265", "x265"),
    ("HEVC", "x265"),
    ("XVID", "XviD"),
    ("DIVX", "DivX"),
    ("AV1", "AV1"),
];

/// Token (uppercase) -> canonical dub marker.
const DUBS: &[(&str, &str)] = &[
    ("DUBBED", "DUBBED"),
    ("AC3-DUB", "AC3-DUB"),
    ("AC3DUB", "AC3-DUB"),
    ("MD", "MD"),
    ("LD", "LD"),
];

/// Edition and scene flags, already canonical.
const FLAGS: &[&str] = &[
    "PROPER",
    "REPACK",
    "EXTENDED",
    "REMASTERED",
    "UNRATED",
    "UNCUT",
    "DC",
    "LIMITED",
    "INTERNAL",
    "READNFO",
    "3D",
    "HDR",
    "HDR10",
    "IMAX",
    "REMUX",
    "COMPLETE",
];

/// What a single token was recognised as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tag {
    Resolution(&'static str),
    Language(&'static str),
    Source(&'static str),
    Encoding(&'static str),
    Dub(&'static str),
    Flag(&'static str),
}

impl Tag {
    /// Technical tags close the title even when no year precedes them.
    fn is_technical(self) -> bool {
        matches!(
            self,
            Tag::Resolution(_) | Tag::Source(_) | Tag::Encoding(_)
        )
    }
}

fn lookup(table: &[(&str, &'static str)], token: &str) -> Option<&'static str> {
    table
        .iter()
        .find(|(alias, _)| *alias == token)
        .map(|(_, canonical)| *canonical)
}

fn classify(token: &str) -> Option<Tag> {
    let upper = token.to_uppercase();
    let upper = upper.as_str();

    lookup(RESOLUTIONS, upper)
        .map(Tag::Resolution)
        .or_else(|| lookup(LANGUAGES, upper).map(Tag::Language))
        .or_else(|| lookup(SOURCES, upper).map(Tag::Source))
        .or_else(|| lookup(ENCODINGS, upper).map(Tag::Encoding))
        .or_else(|| lookup(DUBS, upper).map(Tag::Dub))
        .or_else(|| FLAGS.iter().copied().find(|f| *f == upper).map(Tag::Flag))
}

fn year_of(token: &str) -> Option<i32> {
    let looks_like_year = token.len() == 4
        && token.chars().all(|c| c.is_ascii_digit())
        && (token.starts_with("19") || token.starts_with("20"));
    if looks_like_year {
        token.parse().ok()
    } else {
        None
    }
}

/// Parser for release titles with configurable fallbacks.
#[derive(Debug, Clone, Default)]
pub struct ReleaseParser {
    defaults: ParserDefaults,
}

impl ReleaseParser {
    pub fn new(defaults: ParserDefaults) -> Self {
        Self { defaults }
    }

    pub fn defaults(&self) -> &ParserDefaults {
        &self.defaults
    }

    /// Parse a release title. Never fails: anything unrecognised falls back
    /// to the configured defaults.
    pub fn parse(&self, title: &str) -> ReleaseMeta {
        let trimmed = strip_extension(title.trim());
        let cleaned: String = trimmed
            .chars()
            .map(|c| match c {
                '.' | '_' | '(' | ')' | '[' | ']' | '{' | '}' | '+' => ' ',
                c => c,
            })
            .collect();

        let mut tokens: Vec<String> = cleaned.split_whitespace().map(str::to_string).collect();
        let group = split_group(&mut tokens);

        let tags: Vec<Option<Tag>> = tokens.iter().map(|t| classify(t)).collect();

        // The title never starts with a tag or year: "1917.2019.1080p" is
        // titled "1917", so index 0 is skipped.
        let first_technical = tags
            .iter()
            .enumerate()
            .skip(1)
            .find(|(_, tag)| tag.is_some_and(Tag::is_technical))
            .map(|(i, _)| i)
            .unwrap_or(tokens.len());

        // Prefer a year before the technical tags ("Blade Runner 2049 2017
        // 2160p"); otherwise take one trailing them ("The Matrix 1080p 1999").
        let year_index = (1..first_technical)
            .rev()
            .find(|&i| year_of(&tokens[i]).is_some())
            .or_else(|| {
                (first_technical..tokens.len())
                    .rev()
                    .find(|&i| year_of(&tokens[i]).is_some())
            });

        let title_end = match year_index {
            // Tags running up to the year belong to the release, not the
            // title: "Inception.FRENCH.EXTENDED.2010".
            Some(i) => {
                let mut end = i;
                while end > 1 && tags[end - 1].is_some() {
                    end -= 1;
                }
                end.min(first_technical)
            }
            None => tags
                .iter()
                .enumerate()
                .skip(1)
                .find(|(_, tag)| tag.is_some())
                .map(|(i, _)| i)
                .unwrap_or(tokens.len()),
        };

        let movie_title = if title_end == 0 {
            tokens.join(" ")
        } else {
            tokens[..title_end].join(" ")
        };

        let mut resolution = None;
        let mut languages: Vec<&'static str> = Vec::new();
        let mut source = None;
        let mut encoding = None;
        let mut dub = None;
        let mut flags: Vec<String> = Vec::new();

        for tag in tags.iter().skip(title_end.max(1)).flatten() {
            match *tag {
                Tag::Resolution(r) => {
                    resolution.get_or_insert(r);
                }
                Tag::Language(l) => languages.push(l),
                Tag::Source(s) => {
                    source.get_or_insert(s);
                }
                Tag::Encoding(e) => {
                    encoding.get_or_insert(e);
                }
                Tag::Dub(d) => {
                    dub.get_or_insert(d);
                }
                Tag::Flag(f) => {
                    if !flags.iter().any(|existing| existing == f) {
                        flags.push(f.to_string());
                    }
                }
            }
        }

        let language = if languages.contains(&"MULTI") {
            "MULTI".to_string()
        } else {
            languages
                .first()
                .map(|l| l.to_string())
                .unwrap_or_else(|| self.defaults.language.clone())
        };

        let year = year_index
            .and_then(|i| year_of(&tokens[i]))
            .unwrap_or(self.defaults.year);

        let resolution = resolution
            .map(str::to_string)
            .unwrap_or_else(|| self.defaults.resolution.clone());
        let source = source.map(str::to_string);
        let encoding = encoding.map(str::to_string);

        let generated = generate_name(
            &movie_title,
            year,
            &language,
            &resolution,
            source.as_deref(),
            encoding.as_deref(),
        );

        ReleaseMeta {
            original: title.to_string(),
            title: movie_title,
            year,
            resolution,
            language,
            source,
            encoding,
            dub: dub.map(str::to_string),
            flags,
            group,
            generated,
        }
    }
}

/// Parse a release title with the default fallbacks.
pub fn parse(title: &str) -> ReleaseMeta {
    ReleaseParser::default().parse(title)
}

fn strip_extension(title: &str) -> &str {
    for ext in EXTENSIONS {
        if title.len() <= ext.len() {
            continue;
        }
        let cut = title.len() - ext.len();
        if title.is_char_boundary(cut) && title[cut..].eq_ignore_ascii_case(ext) {
            return &title[..cut];
        }
    }
    title
}

/// Detach a trailing `-GROUP` suffix from the last token.
///
/// Tokens that are themselves hyphenated tags (`WEB-DL`, `AC3-DUB`) are
/// left alone.
fn split_group(tokens: &mut Vec<String>) -> Option<String> {
    let last = tokens.last()?.clone();

    if tokens.len() < 2 || classify(&last).is_some() {
        return None;
    }

    let (head, group) = last.rsplit_once('-')?;
    if group.is_empty() || !group.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }

    let group = group.to_string();
    let head = head.to_string();
    tokens.pop();
    if !head.is_empty() {
        tokens.push(head);
    }
    Some(group)
}

fn generate_name(
    title: &str,
    year: i32,
    language: &str,
    resolution: &str,
    source: Option<&str>,
    encoding: Option<&str>,
) -> String {
    let mut parts: Vec<String> = vec![title.to_string()];
    if year != 0 {
        parts.push(year.to_string());
    }
    parts.push(language.to_string());
    parts.push(resolution.to_string());
    parts.extend(source.map(str::to_string));
    parts.extend(encoding.map(str::to_string));
    parts.retain(|p| !p.is_empty());
    parts.join(" ")
}
