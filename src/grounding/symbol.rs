//! Propositional-symbol spelling: `predicate_arg1_arg2`, lowercased, with a
//! reversible encoding for hyphens so that every symbol stays a single
//! identifier under the LTLf toolchain's lexer.

/// The two-letter marker standing in for the ASCII hyphen.
pub const HYPHEN_MARKER: &str = "hh";

/// Replaces each hyphen with the marker: `block-1` becomes `blockhh1`.
pub fn encode_hyphens(text: &str) -> String {
    text.replace('-', HYPHEN_MARKER)
}

/// Restores hyphens from the marker: `blockhh1` becomes `block-1`.
pub fn decode_hyphens(text: &str) -> String {
    text.replace(HYPHEN_MARKER, "-")
}

/// Builds the propositional symbol of a grounded atom.
///
/// ```
/// # use liftedbdi::grounding::propositional_symbol;
/// assert_eq!(propositional_symbol("on", &["a", "b"]), "on_a_b");
/// assert_eq!(propositional_symbol("handempty", &[]), "handempty");
/// assert_eq!(
///     propositional_symbol("on", &["block-1", "table"]),
///     "on_blockhh1_table"
/// );
/// ```
pub fn propositional_symbol(predicate: &str, args: &[&str]) -> String {
    let mut symbol = encode_hyphens(predicate).to_lowercase();
    for arg in args {
        symbol.push('_');
        symbol.push_str(&encode_hyphens(arg).to_lowercase());
    }
    symbol
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hyphen_encoding_round_trips() {
        for name in ["block-1", "rover-a-b", "plain"] {
            assert_eq!(decode_hyphens(&encode_hyphens(name)), name);
        }
    }

    #[test]
    fn encoded_symbols_are_identifiers() {
        let symbol = propositional_symbol("can-move", &["way-point1", "way-point2"]);
        assert!(symbol
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_'));
    }
}
