use crate::models::{Line, LineType};

/// Recomputes auto scene numbers from line `from` to the end.
///
/// Numbering continues from the last auto-numbered heading before `from`
/// (or `origin` when there is none). Forced numbers are kept and do not
/// advance the counter; omitted headings get no number. Returns the indices
/// whose number changed.
pub fn number_scenes(lines: &mut [Line], from: usize, origin: u32) -> Vec<usize> {
    let from = from.min(lines.len());
    let mut next = lines[..from]
        .iter()
        .rev()
        .filter(|l| l.kind == LineType::Heading && !l.forced_scene_number && !l.omitted)
        .find_map(|l| l.scene_number.as_deref()?.parse::<u32>().ok())
        .map_or(origin, |n| n + 1);

    let mut changed = Vec::new();
    for (index, line) in lines.iter_mut().enumerate().skip(from) {
        if line.forced_scene_number {
            continue;
        }
        let number = if line.kind == LineType::Heading && !line.omitted {
            let n = next;
            next += 1;
            Some(n.to_string())
        } else {
            None
        };
        if line.scene_number != number {
            line.scene_number = number;
            changed.push(index);
        }
    }
    changed
}
