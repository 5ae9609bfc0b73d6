use std::{ops::Range, sync::LazyLock};

use regex::Regex;

static PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:int\./ext|int/ext|i/e|int|ext|est)(?:\.|\s)").expect("valid regex")
});

static SCENE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#([^#\s]+)#\s*$").expect("valid regex"));

pub struct SceneHeading;

impl SceneHeading {
    /// `INT`, `EXT`, `EST`, `INT./EXT`, `INT/EXT` or `I/E` followed by `.` or
    /// whitespace, case-insensitive.
    pub fn has_prefix(text: &str) -> bool {
        PREFIX.is_match(text)
    }

    /// A trailing `#12A#` forced scene number: marker range and the number.
    pub fn forced_number(raw: &str) -> Option<(Range<usize>, String)> {
        let caps = SCENE_NUMBER.captures(raw)?;
        let whole = caps.get(0)?;
        let number = caps.get(1)?;
        let end = whole.start() + whole.as_str().trim_end().len();
        Some((whole.start()..end, number.as_str().to_string()))
    }
}
