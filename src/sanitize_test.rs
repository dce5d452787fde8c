use super::*;

// ── Passthrough ─────────────────────────────────────────────────

#[test]
fn plain_text_is_unchanged() {
    assert_eq!(clean_fragment("hello chat"), "hello chat");
}

#[test]
fn entities_are_preserved() {
    assert_eq!(clean_fragment("fish &amp; chips &gt; rest"), "fish &amp; chips &gt; rest");
}

#[test]
fn simple_formatting_survives() {
    assert_eq!(
        clean_fragment("<b>go</b> <i>team</i> <span>now</span>"),
        "<b>go</b> <i>team</i> <span>now</span>"
    );
}

#[test]
fn emoji_image_keeps_src_and_alt() {
    let fragment = r#"welcome <img class="emoji" src="https://cdn.example/emoji/fire.png" alt="fire" id="e7">"#;
    assert_eq!(
        clean_fragment(fragment),
        r#"welcome <img src="https://cdn.example/emoji/fire.png" alt="fire">"#
    );
}

#[test]
fn link_keeps_href_only() {
    let fragment = r#"<a href="https://example.com/clip" target="_blank" rel="nofollow">clip</a>"#;
    assert_eq!(clean_fragment(fragment), r#"<a href="https://example.com/clip">clip</a>"#);
}

#[test]
fn relative_url_is_allowed() {
    assert_eq!(
        clean_fragment(r#"<a href="/watch?v=abc">here</a>"#),
        r#"<a href="/watch?v=abc">here</a>"#
    );
}

#[test]
fn tag_names_are_lowercased() {
    assert_eq!(clean_fragment("<B>loud</B>"), "<b>loud</b>");
}

// ── Dropped subtrees ────────────────────────────────────────────

#[test]
fn script_content_is_removed_whole() {
    assert_eq!(clean_fragment("before<script>alert(1)</script>after"), "beforeafter");
}

#[test]
fn style_content_is_removed_whole() {
    assert_eq!(clean_fragment("a<style>body{display:none}</style>b"), "ab");
}

#[test]
fn unterminated_script_swallows_the_rest() {
    assert_eq!(clean_fragment("safe<script>alert(1)"), "safe");
}

#[test]
fn svg_subtree_is_removed() {
    assert_eq!(clean_fragment("x<svg><circle onload=alert(1)></svg>y"), "xy");
}

#[test]
fn closer_case_does_not_matter() {
    assert_eq!(clean_fragment("a<SCRIPT>b</ScRiPt>c"), "ac");
}

// ── Unwrapping ──────────────────────────────────────────────────

#[test]
fn unknown_tags_are_unwrapped_keeping_text() {
    assert_eq!(clean_fragment("<div><p>kept text</p></div>"), "kept text");
}

#[test]
fn nested_allowed_markup_survives_unwrapping() {
    assert_eq!(clean_fragment("<div>a <b>bold</b> word</div>"), "a <b>bold</b> word");
}

// ── Attribute filtering ─────────────────────────────────────────

#[test]
fn event_handler_attributes_are_dropped() {
    assert_eq!(
        clean_fragment(r#"<span onclick="steal()" onmouseover=x>hi</span>"#),
        "<span>hi</span>"
    );
}

#[test]
fn javascript_url_is_dropped() {
    assert_eq!(
        clean_fragment(r#"<a href="javascript:alert(1)">x</a>"#),
        "<a>x</a>"
    );
}

#[test]
fn smuggled_scheme_is_still_dropped() {
    assert_eq!(
        clean_fragment("<a href=\"java\tscript:alert(1)\">x</a>"),
        "<a>x</a>"
    );
}

#[test]
fn entity_encoded_scheme_is_dropped() {
    assert_eq!(
        clean_fragment(r#"<a href="javascript&#58;alert(1)">x</a>"#),
        "<a>x</a>"
    );
}

#[test]
fn entity_split_scheme_is_dropped() {
    assert_eq!(
        clean_fragment(r#"<a href="jav&#x09;ascript:alert(1)">x</a>"#),
        "<a>x</a>"
    );
}

#[test]
fn named_entity_scheme_is_dropped() {
    assert_eq!(
        clean_fragment(r#"<a href="javascript&colon;alert(1)">x</a>"#),
        "<a>x</a>"
    );
}

#[test]
fn entity_without_semicolon_is_still_decoded() {
    assert_eq!(
        clean_fragment(r#"<a href="javascript&#58alert(1)">x</a>"#),
        "<a>x</a>"
    );
}

#[test]
fn query_ampersand_is_encoded_once() {
    assert_eq!(
        clean_fragment(r#"<a href="/watch?v=abc&amp;t=5">x</a>"#),
        r#"<a href="/watch?v=abc&amp;t=5">x</a>"#
    );
}

#[test]
fn alt_ampersand_is_not_double_encoded() {
    assert_eq!(
        clean_fragment(r#"<img src="https://cdn.example/a.png" alt="fish &amp; chips">"#),
        r#"<img src="https://cdn.example/a.png" alt="fish &amp; chips">"#
    );
}

#[test]
fn data_image_src_is_allowed() {
    assert_eq!(
        clean_fragment(r#"<img src="data:image/png;base64,AAAA">"#),
        r#"<img src="data:image/png;base64,AAAA">"#
    );
}

#[test]
fn data_html_src_is_dropped() {
    assert_eq!(clean_fragment(r#"<img src="data:text/html,<script>x</script>">"#), "<img>");
}

#[test]
fn unquoted_and_single_quoted_values_are_normalized() {
    assert_eq!(
        clean_fragment("<img src=https://cdn.example/a.png alt='up up'>"),
        r#"<img src="https://cdn.example/a.png" alt="up up">"#
    );
}

#[test]
fn quotes_in_values_are_escaped() {
    assert_eq!(
        clean_fragment(r#"<img alt='say "hi"' src="https://cdn.example/a.png">"#),
        r#"<img alt="say &quot;hi&quot;" src="https://cdn.example/a.png">"#
    );
}

// ── Structure ───────────────────────────────────────────────────

#[test]
fn comments_are_removed() {
    assert_eq!(clean_fragment("a<!-- hidden -->b"), "ab");
}

#[test]
fn stray_lt_is_escaped() {
    assert_eq!(clean_fragment("1 < 2"), "1 &lt; 2");
}

#[test]
fn unclosed_allowed_tag_is_closed_at_the_end() {
    assert_eq!(clean_fragment("<span>drifting"), "<span>drifting</span>");
}

#[test]
fn stray_closer_is_dropped() {
    assert_eq!(clean_fragment("text</span>more"), "textmore");
}

#[test]
fn misnested_tags_are_rebalanced() {
    assert_eq!(clean_fragment("<b><i>x</b></i>"), "<b><i>x</i></b>");
}

#[test]
fn cleaning_is_idempotent() {
    let dirty = r#"<div onclick=x><b>hi</b><script>bad()</script><img src="https://c/e.png"></div>"#;
    let once = clean_fragment(dirty);
    assert_eq!(clean_fragment(&once), once);
}
