//! Shorthand tag normalisation.
//!
//! Runs before parsing so the parser only ever sees canonical tag names and
//! matched divider pairs.

/// Shorthand alias to canonical tag name.
const ALIASES: [(&str, &str); 5] = [
    ("h", "header"),
    ("hdr", "header"),
    ("s", "section"),
    ("sect", "section"),
    ("d", "divider"),
];

/// Rewrite alias tags to their canonical names and normalise dividers.
///
/// Unrecognised tokens are left untouched; they fail validation when the
/// format is installed, not here.
pub fn resolve_aliases(template: &str) -> String {
    let mut out = template.to_owned();
    for (alias, canonical) in ALIASES {
        out = out.replace(&format!("<{alias}>"), &format!("<{canonical}>"));
        out = out.replace(&format!("</{alias}>"), &format!("</{canonical}>"));
    }
    normalise_dividers(&out)
}

/// Rewrite unmatched divider tags as matched empty pairs.
///
/// A `<divider>` not immediately followed by `</divider>`, and a
/// `</divider>` not immediately preceded by `<divider>`, each become a
/// `<divider></divider>` pair, so the parser can treat every tag as a
/// matched pair.
fn normalise_dividers(template: &str) -> String {
    const OPEN: &str = "<divider>";
    const CLOSE: &str = "</divider>";
    const PAIR: &str = "<divider></divider>";

    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    loop {
        let next_open = rest.find(OPEN);
        let next_close = rest.find(CLOSE);
        let Some(pos) = [next_open, next_close].into_iter().flatten().min() else {
            out.push_str(rest);
            return out;
        };
        out.push_str(&rest[..pos]);
        out.push_str(PAIR);
        if next_open == Some(pos) {
            let after = &rest[pos + OPEN.len()..];
            // An already matched pair passes through unchanged.
            rest = after.strip_prefix(CLOSE).unwrap_or(after);
        } else {
            rest = &rest[pos + CLOSE.len()..];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("<h>x</h>", "<header>x</header>")]
    #[case("<hdr>x</hdr>", "<header>x</header>")]
    #[case("<s>x</s>", "<section>x</section>")]
    #[case("<sect>x</sect>", "<section>x</section>")]
    fn rewrites_aliases(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(resolve_aliases(input), expected);
    }

    #[rstest]
    #[case("<d>", "<divider></divider>")]
    #[case("</d>", "<divider></divider>")]
    #[case("<divider>", "<divider></divider>")]
    #[case("</divider>", "<divider></divider>")]
    #[case("<divider></divider>", "<divider></divider>")]
    fn normalises_lone_dividers(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(resolve_aliases(input), expected);
    }

    #[test]
    fn divider_between_sections_keeps_its_position() {
        assert_eq!(
            resolve_aliases("<s>a</s><d><s>b</s>"),
            "<section>a</section><divider></divider><section>b</section>"
        );
    }

    #[test]
    fn unknown_tokens_pass_through() {
        assert_eq!(resolve_aliases("<footer>x</footer>"), "<footer>x</footer>");
    }

    #[test]
    fn alias_text_outside_tags_is_untouched() {
        assert_eq!(resolve_aliases("h and s and d"), "h and s and d");
    }
}
