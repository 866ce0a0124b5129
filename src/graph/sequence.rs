//! Rendering of peptide sequences with their modifications, and optionally
//! the quantified site, in bold.

const BOLD_OPEN: &str = "<b>";
const BOLD_CLOSE: &str = "</b>";

fn opens_modification(c: char) -> bool {
    c == '(' || c == '['
}

fn closes_modification(c: char) -> bool {
    c == ')' || c == ']'
}

/// Mark up `sequence`, emphasizing every bracketed modification.
///
/// When `highlight_sites` is set and `positions` is non-empty, residues whose
/// 1-based position (not counting the characters inside brackets) is listed
/// in `positions` are emphasized too.
pub fn annotate(sequence: &str, positions: Option<&[usize]>, highlight_sites: bool) -> String {
    let positions = match positions {
        Some(p) if highlight_sites && !p.is_empty() => p,
        _ => &[],
    };
    let mut acc = String::with_capacity(sequence.len() + 8);
    let mut in_modification = false;
    let mut position = 0;
    for c in sequence.chars() {
        if opens_modification(c) {
            in_modification = true;
            acc.push_str(BOLD_OPEN);
            acc.push(c);
        } else if closes_modification(c) {
            in_modification = false;
            acc.push(c);
            acc.push_str(BOLD_CLOSE);
        } else if in_modification {
            acc.push(c);
        } else {
            position += 1;
            if positions.contains(&position) {
                acc.push_str(BOLD_OPEN);
                acc.push(c);
                acc.push_str(BOLD_CLOSE);
            } else {
                acc.push(c);
            }
        }
    }
    acc
}

/// Annotate each `(sequence, positions)` pair and join them with `-`, as used
/// for nodes collapsed by site
pub fn annotate_all<'a, I>(sequences: I, highlight_sites: bool) -> String
where
    I: IntoIterator<Item = (&'a str, Option<&'a [usize]>)>,
{
    sequences
        .into_iter()
        .map(|(seq, positions)| annotate(seq, positions, highlight_sites))
        .collect::<Vec<_>>()
        .join("-")
}
