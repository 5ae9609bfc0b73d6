// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
#[allow(dead_code)]
pub fn generate_screenplay(scenes: usize) -> String {
    let mut content = String::from("Title: Benchmark\nAuthor: Nobody\n\n");
    for scene in 0..scenes {
        if scene % 10 == 0 {
            content.push_str(&format!("# Act {}\n\n= Things happen.\n\n", scene / 10 + 1));
        }
        content.push_str(&format!("INT. ROOM {scene} - DAY [[color blue]]\n\n"));
        content.push_str(
            "Sunlight cuts through the blinds. *Dust* hangs in the air while the radiator \
             knocks twice and falls silent.\n\n",
        );
        content.push_str("ALICE\n(whispering)\nDid you hear that? It came from the hall.\n\n");
        content.push_str("BOB ^\nIt's the pipes. It's always the pipes.\n\n");
        content.push_str("CUT TO:\n\n");
    }
    content
}

/// Offset of the middle action line, a typical place to type.
#[allow(dead_code)]
pub fn middle_action(content: &str) -> usize {
    let half = content.len() / 2;
    content[half..]
        .find("Sunlight")
        .map_or(half, |at| half + at + 8)
}
