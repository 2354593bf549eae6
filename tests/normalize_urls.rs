// tests/normalize_urls.rs
//
// URL/title canonicalisation as seen through the public API.

use newsrank::normalize::{clean_text, normalize_title, normalize_url};

#[test]
fn tracking_params_www_and_slash_collapse_to_one_form() {
    let variants = [
        "https://openai.com/blog/gpt-5",
        "https://www.openai.com/blog/gpt-5/",
        "https://openai.com/blog/gpt-5?utm_source=x",
        "https://openai.com/blog/gpt-5?utm_medium=social&utm_campaign=launch",
        "HTTPS://OpenAI.com/blog/gpt-5#comments",
        "https://openai.com/blog/gpt-5/?fbclid=abc&ref=hn",
    ];
    for v in variants {
        assert_eq!(normalize_url(v), "https://openai.com/blog/gpt-5", "variant {v}");
    }
}

#[test]
fn meaningful_query_survives() {
    assert_eq!(
        normalize_url("https://example.com/search?q=gpt&utm_source=x&page=2"),
        "https://example.com/search?q=gpt&page=2"
    );
}

#[test]
fn path_case_is_preserved() {
    assert_ne!(
        normalize_url("https://example.com/Article"),
        normalize_url("https://example.com/article")
    );
}

#[test]
fn root_path_keeps_its_slash() {
    assert_eq!(normalize_url("https://www.example.com/"), "https://example.com/");
}

#[test]
fn is_idempotent() {
    for raw in [
        "https://www.example.com/a/b/?utm_source=x&z=1#frag",
        "not a url",
        "https://example.com/",
    ] {
        let once = normalize_url(raw);
        assert_eq!(normalize_url(&once), once, "raw {raw}");
    }
}

#[test]
fn titles_compare_case_and_space_insensitively() {
    assert_eq!(
        normalize_title("OpenAI   Releases GPT-5"),
        normalize_title("openai releases gpt-5.")
    );
}

#[test]
fn clean_text_handles_entities_and_tags() {
    assert_eq!(
        clean_text("AT&amp;T <em>partners</em>\n\nwith   OpenAI"),
        "AT&T partners with OpenAI"
    );
}

#[test]
fn removing_tracking_params_keeps_neighbour_encoding() {
    assert_eq!(
        normalize_url("https://example.com/s?path=/a/b&utm_source=x"),
        normalize_url("https://example.com/s?path=/a/b")
    );
    assert_eq!(
        normalize_url("https://example.com/s?q=a%20b&ref=hn"),
        normalize_url("https://example.com/s?q=a%20b")
    );
    assert_eq!(
        normalize_url("https://example.com/s?utm_campaign=z&q=a%20b&x=c+d"),
        "https://example.com/s?q=a%20b&x=c+d"
    );
}

#[test]
fn encoded_tracking_key_is_still_removed() {
    assert_eq!(
        normalize_url("https://example.com/p?utm%5Fsource=x&id=7"),
        "https://example.com/p?id=7"
    );
}
