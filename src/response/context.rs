//! Localization seam

use serde_json::{Map, Value};

/// Per-request localization contract.
///
/// Passing no context to `send` disables localization silently; a
/// context only ever rewrites the single-object body's message.
pub trait RequestContext {
    /// Translate a message. `params` carries caller-supplied values plus
    /// the context's locale under the `locale` key when one is known.
    fn translate(&self, message: &str, params: &Map<String, Value>) -> String;

    fn locale(&self) -> Option<&str> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Shouting;

    impl RequestContext for Shouting {
        fn translate(&self, message: &str, _params: &Map<String, Value>) -> String {
            message.to_uppercase()
        }
    }

    #[test]
    fn test_default_locale_is_none() {
        let ctx = Shouting;
        assert_eq!(ctx.locale(), None);
        assert_eq!(ctx.translate("not found", &Map::new()), "NOT FOUND");
    }
}
