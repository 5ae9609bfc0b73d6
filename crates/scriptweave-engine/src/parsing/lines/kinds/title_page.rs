use std::sync::LazyLock;

use regex::Regex;

use crate::models::LineType;

static KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z][A-Za-z0-9 _-]*):").expect("valid regex"));

pub struct TitlePage;

impl TitlePage {
    /// Field type of a `Key: value` line, or `None` when the line has no key.
    pub fn key_type(raw: &str) -> Option<LineType> {
        let caps = KEY.captures(raw)?;
        let key = caps.get(1)?.as_str().trim();
        let kind = match key.to_ascii_lowercase().as_str() {
            "title" => LineType::TitlePageTitle,
            "credit" => LineType::TitlePageCredit,
            "author" | "authors" => LineType::TitlePageAuthor,
            "source" => LineType::TitlePageSource,
            "draft date" => LineType::TitlePageDraftDate,
            "contact" => LineType::TitlePageContact,
            _ => LineType::TitlePageUnknown,
        };
        // `FADE IN:` and friends are not fields.
        if kind == LineType::TitlePageUnknown {
            let value = raw.get(caps.get(0)?.end()..).unwrap_or_default();
            let shouting = !key.chars().any(|c| c.is_ascii_lowercase());
            if value.trim().is_empty() || shouting {
                return None;
            }
        }
        Some(kind)
    }

    /// Byte length of the `Key:` prefix, hidden from display.
    pub fn key_len(raw: &str) -> Option<usize> {
        KEY.find(raw).map(|m| m.end())
    }

    /// Indented lines continue the previous field.
    pub fn is_continuation(raw: &str) -> bool {
        raw.starts_with("   ") || raw.starts_with('\t')
    }
}
