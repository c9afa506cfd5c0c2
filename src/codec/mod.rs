//! Name codec for error variants
//!
//! Pure string transforms between user-supplied error names, canonical
//! variant names (`HttpNotFoundError`), machine codes
//! (`HTTP_NOT_FOUND_ERROR`), and throw-helper keys (`throwHttpNotFound`).
//! Stateless; every function is deterministic and total.

/// Code returned for names that do not carry the canonical `Error` suffix.
pub const INTERNAL_CODE: &str = "INTERNAL_ERROR";

/// Variant name used when the input normalizes to nothing.
pub const ROOT_VARIANT_NAME: &str = "RootError";

/// Split an arbitrary name into lowercase tokens.
///
/// Tokens break on any non-alphanumeric character and on lower-to-upper
/// camel-case boundaries, so `"HTTP_NOT_FOUND"`, `"http not found"` and
/// `"HttpNotFound"` all yield `["http", "not", "found"]`. An uppercase run
/// that flows into a lowercase word splits into one token per letter
/// (`"ABCError"` is `["a", "b", "c", "error"]`), which keeps every name
/// this codec produces a fixed point of [`to_variant_name`].
fn tokenize(input: &str) -> Vec<String> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut current = String::new();

    for (i, &ch) in chars.iter().enumerate() {
        if !ch.is_ascii_alphanumeric() {
            if !current.is_empty() {
                tokens.push(std::mem::take(&mut current));
            }
            continue;
        }
        if ch.is_ascii_uppercase() && !current.is_empty() {
            let prev = chars[i - 1];
            let breaks = if prev.is_ascii_uppercase() {
                // Inside an uppercase run: single-letter tokens when the
                // run heads a lowercase word, one whole token otherwise.
                run_flows_into_lowercase(&chars, i)
            } else {
                prev.is_ascii_lowercase() || prev.is_ascii_digit()
            };
            if breaks {
                tokens.push(std::mem::take(&mut current));
            }
        }
        current.push(ch.to_ascii_lowercase());
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

/// Whether the uppercase run starting at or before `index` ends in a
/// lowercase continuation rather than a separator or the end of input.
fn run_flows_into_lowercase(chars: &[char], index: usize) -> bool {
    let mut i = index;
    while i < chars.len() && chars[i].is_ascii_uppercase() {
        i += 1;
    }
    i < chars.len() && chars[i].is_ascii_lowercase()
}

fn capitalize(token: &str) -> String {
    let mut chars = token.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

/// Normalize an arbitrary name into a canonical variant name.
///
/// The input is tokenized, an `error` token is appended unless already
/// present, and the tokens are joined in capitalized camel case:
/// `"http not found"` becomes `HttpNotFoundError`. Idempotent for any
/// output of this function.
pub fn to_variant_name(input: &str) -> String {
    let mut tokens = tokenize(input);
    if tokens.is_empty() {
        return ROOT_VARIANT_NAME.to_string();
    }
    if tokens.last().map(String::as_str) != Some("error") {
        tokens.push("error".to_string());
    }
    tokens.iter().map(|t| capitalize(t)).collect()
}

/// Derive the machine code for a canonical variant name.
///
/// `HttpNotFoundError` becomes `HTTP_NOT_FOUND_ERROR`. Names without the
/// trailing `Error` suffix fall back to [`INTERNAL_CODE`].
pub fn to_code(variant_name: &str) -> String {
    match variant_name.strip_suffix("Error") {
        Some(prefix) if !prefix.is_empty() => tokenize(variant_name)
            .iter()
            .map(|t| t.to_ascii_uppercase())
            .collect::<Vec<_>>()
            .join("_"),
        _ => INTERNAL_CODE.to_string(),
    }
}

/// Derive the throw-helper key for a canonical variant name.
///
/// `HttpNotFoundError` becomes `throwHttpNotFound`.
pub fn to_throw_helper_name(variant_name: &str) -> String {
    let prefix = variant_name.strip_suffix("Error").unwrap_or(variant_name);
    format!("throw{}", prefix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_name_from_spaced_words() {
        assert_eq!(to_variant_name("http not found"), "HttpNotFoundError");
        assert_eq!(to_variant_name("custom"), "CustomError");
        assert_eq!(to_variant_name("root"), "RootError");
    }

    #[test]
    fn test_variant_name_from_codes() {
        assert_eq!(to_variant_name("HTTP_INTERNAL"), "HttpInternalError");
        assert_eq!(to_variant_name("NOT_FOUND"), "NotFoundError");
        assert_eq!(to_variant_name("BAD_FORMAT"), "BadFormatError");
    }

    #[test]
    fn test_variant_name_preserves_error_suffix() {
        assert_eq!(to_variant_name("HttpNotFoundError"), "HttpNotFoundError");
        assert_eq!(to_variant_name("custom error"), "CustomError");
    }

    #[test]
    fn test_variant_name_idempotent() {
        for input in [
            "http not found",
            "HTTP_INTERNAL",
            "custom",
            "a-b-c",
            "x9y",
            "ABCError",
            "XMLHttpRequest",
        ] {
            let once = to_variant_name(input);
            assert_eq!(to_variant_name(&once), once, "input: {}", input);
        }
    }

    #[test]
    fn test_initialism_names_survive_the_codec() {
        assert_eq!(to_variant_name("a-b-c"), "ABCError");
        assert_eq!(to_variant_name("ABCError"), "ABCError");
        assert_eq!(to_code("ABCError"), "A_B_C_ERROR");
        assert_eq!(to_variant_name("A_B_C_ERROR"), "ABCError");
    }

    #[test]
    fn test_variant_name_empty_input() {
        assert_eq!(to_variant_name(""), ROOT_VARIANT_NAME);
        assert_eq!(to_variant_name("---"), ROOT_VARIANT_NAME);
    }

    #[test]
    fn test_code_derivation() {
        assert_eq!(to_code("HttpNotFoundError"), "HTTP_NOT_FOUND_ERROR");
        assert_eq!(to_code("RootError"), "ROOT_ERROR");
        assert_eq!(to_code("CustomError"), "CUSTOM_ERROR");
    }

    #[test]
    fn test_code_fallback_without_suffix() {
        assert_eq!(to_code("Whatever"), INTERNAL_CODE);
        assert_eq!(to_code("Error"), INTERNAL_CODE);
        assert_eq!(to_code(""), INTERNAL_CODE);
    }

    #[test]
    fn test_throw_helper_name() {
        assert_eq!(to_throw_helper_name("HttpNotFoundError"), "throwHttpNotFound");
        assert_eq!(to_throw_helper_name("CustomError"), "throwCustom");
        assert_eq!(to_throw_helper_name("RootError"), "throwRoot");
    }

    #[test]
    fn test_round_trip_through_code() {
        // to_variant_name(to_code(name)) must reproduce any canonical name.
        for input in ["http payment required", "conflict", "HTTP_GATEWAY_TIMEOUT"] {
            let name = to_variant_name(input);
            let code = to_code(&name);
            assert_eq!(to_variant_name(&code), name);
        }
    }
}
