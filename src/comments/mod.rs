//! Utterances comment widget embed
//!
//! The widget is a client-side script keyed by the page's pathname. Pages
//! include the snippet once; nothing from the content model flows into it
//! beyond that key.

use anyhow::{bail, Result};

use crate::config::CommentsConfig;

const CLIENT_SCRIPT: &str = "https://utteranc.es/client.js";
const SCRIPT_ID: &str = "utterances-script";

/// Render the container and `<script>` tag for one page
pub fn render_embed(config: &CommentsConfig, pathname: &str) -> Result<String> {
    let Some(repo) = config.repo.as_deref().filter(|r| !r.trim().is_empty()) else {
        bail!("comments.repo is not set in _config.yml");
    };
    if !repo.contains('/') {
        bail!("comments.repo must be owner/name, got {:?}", repo);
    }

    let issue_term = match config.issue_term.as_str() {
        "pathname" => pathname,
        term => term,
    };

    let mut attrs = vec![
        ("src", CLIENT_SCRIPT),
        ("repo", repo),
        ("issue-term", issue_term),
    ];
    if let Some(label) = config.label.as_deref() {
        attrs.push(("label", label));
    }
    attrs.push(("theme", config.theme.as_str()));
    attrs.push(("crossorigin", "anonymous"));

    let mut script = String::from("<script");
    for (name, value) in attrs {
        script.push_str(&format!(" {}=\"{}\"", name, html_escape(value)));
    }
    script.push_str(&format!(" id=\"{}\" async></script>", SCRIPT_ID));

    Ok(format!("<div class=\"mt-20\">{}</div>", script))
}

/// Escape HTML special characters
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
