use std::sync::LazyLock;

use regex::Regex;

static SCRIPT_OR_STYLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<(script|style)\b[^>]*>.*?</(script|style)\s*>")
        .expect("valid script/style regex")
});

static TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<[^>]+>").expect("valid tags regex"));

/// Strips markup from user text.
///
/// `<script>` and `<style>` elements are removed with their contents, then
/// every remaining tag (and so every attribute). Entities are left encoded so
/// that `&lt;script&gt;` cannot turn back into markup.
#[must_use]
pub fn sanitize_text(input: &str) -> String {
    let without_blocks = SCRIPT_OR_STYLE.replace_all(input, "");
    TAG.replace_all(&without_blocks, "").trim().to_owned()
}
