/// Notes on headings and sections that carry metadata instead of prose:
/// `[[color red]]`, `[[red]]`, `[[storyline A, B]]`.
pub struct HeadingNote;

impl HeadingNote {
    pub const COLORS: [&'static str; 15] = [
        "red", "blue", "green", "pink", "magenta", "gray", "grey", "purple", "yellow", "orange",
        "cyan", "brown", "black", "white", "teal",
    ];
    pub const COLOR_KEY: &'static str = "color ";
    pub const STORYLINE_KEY: &'static str = "storyline ";

    /// Color and storylines found in `notes`. The last color note wins.
    pub fn parse(notes: &[String]) -> (Option<String>, Vec<String>) {
        let mut color = None;
        let mut storylines = Vec::new();
        for note in notes {
            let note = note.trim();
            let lower = note.to_lowercase();
            if let Some(rest) = lower.strip_prefix(Self::COLOR_KEY) {
                let value = rest.trim();
                if !value.is_empty() {
                    color = Some(value.to_string());
                }
            } else if lower.starts_with(Self::STORYLINE_KEY) {
                let rest = note.get(Self::STORYLINE_KEY.len()..).unwrap_or_default();
                storylines.extend(
                    rest.split(',')
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(str::to_string),
                );
            } else if Self::COLORS.contains(&lower.as_str()) {
                color = Some(lower);
            }
        }
        (color, storylines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notes(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn color_key_and_bare_color() {
        assert_eq!(HeadingNote::parse(&notes(&["color Red"])).0.as_deref(), Some("red"));
        assert_eq!(HeadingNote::parse(&notes(&["teal"])).0.as_deref(), Some("teal"));
        assert_eq!(HeadingNote::parse(&notes(&["just a note"])).0, None);
    }

    #[test]
    fn storylines_keep_case() {
        let (_, storylines) = HeadingNote::parse(&notes(&["Storyline A, Love story"]));
        assert_eq!(storylines, vec!["A".to_string(), "Love story".to_string()]);
    }
}
