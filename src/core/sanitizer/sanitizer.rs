// Message text cleanup shared by every consumer of stored or live text.
//
// The corpus keeps raw Discord text. Anything that feeds the Markov model
// (bulk load, live ingestion, reply seeding) runs it through `sanitize` first,
// so the stored rows and the model never drift apart.

use regex::Regex;
use std::sync::OnceLock;

/// Substring that marks a message as carrying a link.
const LINK_MARKER: &str = "http";

// <@123> <@!123> (users), <@&123> (roles), <#123> (channels), <:name:123> <a:name:123> (emoji)
fn markup_regex() -> &'static Regex {
    static MARKUP: OnceLock<Regex> = OnceLock::new();
    MARKUP.get_or_init(|| {
        Regex::new(r"<(?:@[!&]?|#)\d+>|<a?:\w+:\d+>").expect("markup pattern is valid")
    })
}

/// Strip user, channel, role and custom emoji markup from message text.
///
/// Each match is replaced by nothing; surrounding whitespace is left alone.
/// Removal repeats until the text stops changing, so `sanitize` is idempotent
/// even for nested input like `<<@1>@2>`.
pub fn sanitize(text: &str) -> String {
    let re = markup_regex();
    let mut current = text.to_string();
    while re.is_match(&current) {
        current = re.replace_all(&current, "").into_owned();
    }
    current
}

/// Whether the text contains a link. Such messages never enter the corpus or model.
pub fn contains_link(text: &str) -> bool {
    text.contains(LINK_MARKER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_all_markup_kinds_and_keeps_spacing() {
        assert_eq!(
            sanitize("hello <@123> <#456> <@&789> <a:x:1> world"),
            "hello     world"
        );
    }

    #[test]
    fn strips_nickname_mentions_and_static_emoji() {
        assert_eq!(sanitize("<@!42>hey<:pog:99>!"), "hey!");
    }

    #[test]
    fn leaves_plain_text_untouched() {
        let text = "  Well, <this> isn't markup: @everyone #general :smile:  ";
        assert_eq!(sanitize(text), text);
    }

    #[test]
    fn is_idempotent_on_nested_markup() {
        let once = sanitize("a <<@1>@2> b");
        assert_eq!(once, "a  b");
        assert_eq!(sanitize(&once), once);
    }

    #[test]
    fn empty_input_is_empty_output() {
        assert_eq!(sanitize(""), "");
    }

    #[test]
    fn detects_links() {
        assert!(contains_link("see https://example.com"));
        assert!(contains_link("http is a protocol"));
        assert!(!contains_link("no links here"));
    }
}
