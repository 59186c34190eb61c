//! Matroska tags XML as consumed by `mkvpropedit --tags` and produced by
//! `mkvextract tags`.
//!
//! Levels are addressed by TargetTypeValue: 70 is the collection (show), 60
//! the season, 50 the episode.

use crate::{Error, Result};
use episodist_common::{parse_year, MediaMetadata, TagSnapshot};
use quick_xml::escape::escape;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::fmt::Write as _;

pub const COLLECTION: u32 = 70;
pub const SEASON: u32 = 60;
pub const EPISODE: u32 = 50;

/// Default level when a `<Tag>` carries no `<TargetTypeValue>`.
const DEFAULT_TARGET: u32 = EPISODE;

/// Render the tags document for `metadata`.
pub fn render(metadata: &MediaMetadata) -> String {
    render_merged(metadata, &[])
}

/// Render the tags document for `metadata`, carrying over `foreign` entries
/// at their original levels.
pub fn render_merged(metadata: &MediaMetadata, foreign: &[SimpleTag]) -> String {
    let genre = metadata.genre.label();
    let season = metadata.season.to_string();
    let episode = metadata.episode.to_string();
    let year = metadata.year.to_string();

    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <!DOCTYPE Tags SYSTEM \"matroskatags.dtd\">\n\
         <Tags>\n",
    );
    push_tag(
        &mut xml,
        COLLECTION,
        Some("COLLECTION"),
        &level_simples(
            COLLECTION,
            &[("TITLE", metadata.title.as_str()), ("GENRE", genre)],
            foreign,
        ),
    );
    push_tag(
        &mut xml,
        SEASON,
        Some("SEASON"),
        &level_simples(SEASON, &[("PART_NUMBER", season.as_str())], foreign),
    );
    push_tag(
        &mut xml,
        EPISODE,
        Some("EPISODE"),
        &level_simples(
            EPISODE,
            &[
                ("TITLE", metadata.episode_title.as_str()),
                ("PART_NUMBER", episode.as_str()),
                ("GENRE", genre),
                ("DATE_RELEASED", year.as_str()),
            ],
            foreign,
        ),
    );

    let mut other_levels: Vec<u32> = foreign
        .iter()
        .map(|s| s.target)
        .filter(|t| ![COLLECTION, SEASON, EPISODE].contains(t))
        .collect();
    other_levels.sort_unstable();
    other_levels.dedup();
    for level in other_levels {
        push_tag(&mut xml, level, None, &level_simples(level, &[], foreign));
    }

    xml.push_str("</Tags>\n");
    xml
}

fn level_simples(
    target: u32,
    own: &[(&str, &str)],
    foreign: &[SimpleTag],
) -> Vec<(String, String)> {
    own.iter()
        .map(|(n, v)| (n.to_string(), v.to_string()))
        .chain(
            foreign
                .iter()
                .filter(|s| s.target == target)
                .map(|s| (s.name.clone(), s.value.clone())),
        )
        .collect()
}

fn push_tag(xml: &mut String, value: u32, target_type: Option<&str>, simples: &[(String, String)]) {
    // Writing into a String cannot fail.
    let _ = write!(
        xml,
        "  <Tag>\n    <Targets>\n      <TargetTypeValue>{value}</TargetTypeValue>\n"
    );
    if let Some(target_type) = target_type {
        let _ = writeln!(xml, "      <TargetType>{target_type}</TargetType>");
    }
    xml.push_str("    </Targets>\n");
    for (name, text) in simples {
        let _ = write!(
            xml,
            "    <Simple>\n      <Name>{}</Name>\n      <String>{}</String>\n    </Simple>\n",
            escape(name.as_str()),
            escape(text.as_str())
        );
    }
    xml.push_str("  </Tag>\n");
}

/// One `<Simple>` entry with the level it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleTag {
    pub target: u32,
    pub name: String,
    pub value: String,
}

/// Names [`render`] writes at each level.
const OWNED: &[(u32, &str)] = &[
    (COLLECTION, "TITLE"),
    (COLLECTION, "GENRE"),
    (SEASON, "PART_NUMBER"),
    (EPISODE, "TITLE"),
    (EPISODE, "PART_NUMBER"),
    (EPISODE, "GENRE"),
    (EPISODE, "DATE_RELEASED"),
];

/// Global `<Simple>` entries in `xml` that [`render`] does not own.
///
/// Nested children and UID-bound tags are not returned.
pub fn foreign_simples(xml: &str) -> Result<Vec<SimpleTag>> {
    let xml = xml.trim();
    let xml = xml.strip_prefix('\u{feff}').unwrap_or(xml);
    if xml.is_empty() {
        return Ok(Vec::new());
    }

    Ok(parse_simples(xml)?
        .into_iter()
        .filter(|s| {
            !OWNED
                .iter()
                .any(|(target, name)| s.target == *target && s.name.eq_ignore_ascii_case(name))
        })
        .collect())
}

/// Parse `mkvextract tags` output into a snapshot.
///
/// Empty input (a file without tags) yields an empty snapshot. Unknown tags
/// and nested `<Simple>` children are ignored, as are tags whose `<Targets>`
/// name a track, edition, chapter or attachment UID.
pub fn parse(xml: &str) -> Result<TagSnapshot> {
    let xml = xml.trim();
    let xml = xml.strip_prefix('\u{feff}').unwrap_or(xml);
    if xml.is_empty() {
        return Ok(TagSnapshot::default());
    }

    let simples = parse_simples(xml)?;

    let lookup = |target: u32, name: &str| -> Option<String> {
        simples
            .iter()
            .find(|s| s.target == target && s.name.eq_ignore_ascii_case(name))
            .map(|s| s.value.clone())
    };

    Ok(TagSnapshot {
        title: lookup(EPISODE, "TITLE"),
        show: lookup(COLLECTION, "TITLE"),
        genre: lookup(EPISODE, "GENRE").or_else(|| lookup(COLLECTION, "GENRE")),
        year: lookup(EPISODE, "DATE_RELEASED")
            .or_else(|| lookup(COLLECTION, "DATE_RELEASED"))
            .and_then(|v| parse_year(&v)),
        season: lookup(SEASON, "PART_NUMBER").and_then(|v| v.trim().parse().ok()),
        episode: lookup(EPISODE, "PART_NUMBER").and_then(|v| v.trim().parse().ok()),
    })
}

fn parse_simples(xml: &str) -> Result<Vec<SimpleTag>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut simples = Vec::new();
    let mut target = DEFAULT_TARGET;
    let mut in_targets = false;
    // Set once the current tag is bound to a specific UID; 0 means "all".
    let mut scoped = false;
    let mut simple_depth = 0usize;
    let mut name: Option<String> = None;
    let mut value: Option<String> = None;
    let mut current_element = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let element = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
                match element.as_str() {
                    "Tag" => {
                        target = DEFAULT_TARGET;
                        scoped = false;
                    }
                    "Targets" => in_targets = true,
                    "Simple" => {
                        simple_depth += 1;
                        if simple_depth == 1 {
                            name = None;
                            value = None;
                        }
                    }
                    _ => {}
                }
                current_element = element;
            }
            Ok(Event::End(e)) => {
                let element = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
                if element == "Targets" {
                    in_targets = false;
                }
                if element == "Simple" {
                    if simple_depth == 1 && !scoped {
                        if let (Some(n), Some(v)) = (name.take(), value.take()) {
                            simples.push(SimpleTag {
                                target,
                                name: n,
                                value: v,
                            });
                        }
                    }
                    simple_depth = simple_depth.saturating_sub(1);
                }
                current_element.clear();
            }
            Ok(Event::Text(e)) => {
                let text = e.unescape().unwrap_or_default().to_string();
                match current_element.as_str() {
                    "TargetTypeValue" => {
                        if let Ok(parsed) = text.trim().parse() {
                            target = parsed;
                        }
                    }
                    uid if in_targets && uid.ends_with("UID") => {
                        if !matches!(text.trim().parse::<u64>(), Ok(0)) {
                            scoped = true;
                        }
                    }
                    "Name" if simple_depth == 1 => name = Some(text),
                    "String" if simple_depth == 1 => value = Some(text),
                    _ => {}
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::parse_error(
                    "mkvextract",
                    format!(
                        "XML parse error at position {}: {}",
                        reader.buffer_position(),
                        e
                    ),
                ));
            }
            _ => {}
        }
    }

    Ok(simples)
}
