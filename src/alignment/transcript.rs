//! Plain-text transcript preparation for the forced aligner.
//!
//! The aligner only understands spoken words, so annotation markup is removed before the script
//! is submitted. The annotated original is still what the schedule builder scans.

const DROPPED_CHARS: [char; 3] = ['[', ']', '/'];

/// Strip emotion tags and markup from an annotated script.
///
/// Hyphens become spaces, `[`, `]` and `/` are dropped, `<...>` tags are removed, runs of spaces
/// collapse, and spaces around newlines and at the very start are trimmed. An unclosed `<` is left
/// in place.
pub fn aligner_transcript(script: &str) -> String {
    let mut out: String = script
        .chars()
        .filter(|c| !DROPPED_CHARS.contains(c))
        .map(|c| if c == '-' { ' ' } else { c })
        .collect();

    while let Some(start) = out.find('<') {
        let Some(len) = out[start..].find('>') else {
            break;
        };
        out.replace_range(start..start + len + 1, "");
    }

    while out.contains("  ") {
        out = out.replace("  ", " ");
    }
    while out.contains("\n ") {
        out = out.replace("\n ", "\n");
    }
    while out.contains(" \n") {
        out = out.replace(" \n", "\n");
    }
    out.trim_start_matches(' ').to_string()
}

#[cfg(test)]
#[path = "../../tests/unit/alignment/transcript.rs"]
mod tests;
