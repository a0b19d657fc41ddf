//! Assemble the widget document from the bundle assets and the caller's data.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use serde::Deserialize;
use serde_json::Value;

use crate::assets::AssetProvider;
use crate::error::{Error, Result};
use crate::params::LayoutParams;

/// Name of the DOM event the bundle listens for.
pub const DATA_EVENT: &str = "novaGraphData";

/// Shell token flipped to switch the bundle into notebook mode.
pub const NOTEBOOK_MODE_TOKEN: &str = "notebookMode:!1";
/// Shell token replaced with the options object.
pub const OPTIONS_TOKEN: &str = "options:null";

const HTML_TOP: &str = concat!(
    r#"<!DOCTYPE html><html lang="en"><head><meta charset="UTF-8" />"#,
    r#"<meta name="viewport" content="width=device-width, initial-scale=1.0" />"#,
    "<title>Nova Graph</title>"
);
const HTML_BOTTOM: &str = "</head><body></body></html>";

/// How the caller's data reaches the bundle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Injection {
    /// Deferred scripts: the bundle, then a messenger that dispatches
    /// [`DATA_EVENT`] carrying the data and parameters.
    #[default]
    Event,
    /// Rewrite known tokens inside a self-contained HTML shell.
    Placeholder,
}

impl Injection {
    /// Iframe height used when the caller does not pick one.
    pub fn default_height(self) -> u32 {
        match self {
            Injection::Event => 520,
            Injection::Placeholder => 700,
        }
    }
}

/// A fully assembled widget document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    html: String,
}

impl Document {
    pub fn as_str(&self) -> &str {
        &self.html
    }

    pub fn into_string(self) -> String {
        self.html
    }

    /// The document escaped for use as an attribute value (`srcdoc`).
    pub fn escaped(&self) -> String {
        escape_html(&self.html)
    }
}

/// Builds widget documents from an [`AssetProvider`].
///
/// Inputs are expected to have passed [`crate::params::validate`].
#[derive(Debug, Clone)]
pub struct HtmlBuilder<A> {
    assets: A,
    injection: Injection,
}

impl<A: AssetProvider> HtmlBuilder<A> {
    pub fn new(assets: A) -> Self {
        Self {
            assets,
            injection: Injection::default(),
        }
    }

    pub fn with_injection(mut self, injection: Injection) -> Self {
        self.injection = injection;
        self
    }

    pub fn injection(&self) -> Injection {
        self.injection
    }

    pub fn build(&self, data: &Value, params: &LayoutParams) -> Result<Document> {
        let data_json = serde_json::to_string(data)?;

        let html = match self.injection {
            Injection::Event => self.build_event(&data_json, params)?,
            Injection::Placeholder => self.build_placeholder(&data_json, params)?,
        };
        tracing::debug!(
            injection = ?self.injection,
            bytes = html.len(),
            "assembled widget document"
        );

        Ok(Document { html })
    }

    fn build_event(&self, data_json: &str, params: &LayoutParams) -> Result<String> {
        let css = self.assets.stylesheet()?;
        let bundle = self.assets.script_bundle()?;
        let messenger = messenger_script(data_json, params);

        let mut html = String::with_capacity(HTML_TOP.len() + css.len() + bundle.len() * 2);
        html.push_str(HTML_TOP);
        html.push_str("<style>");
        html.push_str(&css);
        html.push_str("</style>");
        // Deferred scripts run in document order, so the bundle registers its
        // listener before the messenger dispatches.
        html.push_str(&deferred_script(&bundle));
        html.push_str(&deferred_script(&messenger));
        html.push_str(HTML_BOTTOM);
        Ok(html)
    }

    fn build_placeholder(&self, data_json: &str, params: &LayoutParams) -> Result<String> {
        let shell = self.assets.html_shell()?;
        for token in [NOTEBOOK_MODE_TOKEN, OPTIONS_TOKEN] {
            if !shell.contains(token) {
                return Err(Error::Placeholder { token });
            }
        }

        let data_json = inline_script_json(data_json);
        let options = format!(
            "options:{{data:{data_json},width:{},node_strength:{},link_strength:{},link_distance:{},collide_strength:{}}}",
            params.width,
            params.node_strength,
            params.link_strength,
            params.link_distance,
            params.collide_strength,
        );

        Ok(shell
            .replace(NOTEBOOK_MODE_TOKEN, "notebookMode:1")
            .replace(OPTIONS_TOKEN, &options))
    }
}

/// Script that hands the data to the bundle by dispatching [`DATA_EVENT`].
pub fn messenger_script(data_json: &str, params: &LayoutParams) -> String {
    format!(
        "(function() {{
    const event = new Event('{DATA_EVENT}');
    event.data = {data_json};
    event.width = {};
    event.nodeStrength = {};
    event.linkStrength = {};
    event.linkDistance = {};
    event.collideStrength = {};
    document.dispatchEvent(event);
}}())
",
        params.width,
        params.node_strength,
        params.link_strength,
        params.link_distance,
        params.collide_strength,
    )
}

/// Make serialized JSON safe to embed in an inline `<script>`.
///
/// `<` only occurs inside JSON strings, where `\u003c` decodes to the same
/// character, so `</script>` and `<!--` can no longer change the tokenizer
/// state of the surrounding script.
pub fn inline_script_json(data_json: &str) -> String {
    data_json.replace('<', "\\u003c")
}

fn deferred_script(source: &str) -> String {
    let encoded = BASE64_STANDARD.encode(source.as_bytes());
    format!("<script defer src='data:text/javascript;base64,{encoded}'></script>")
}

/// Escape `&`, `<`, `>`, `"` and `'` for use inside an HTML attribute.
pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::BundledAssets;
    use serde_json::json;

    /// Pull the base64 payloads back out of the deferred script tags.
    fn decoded_scripts(html: &str) -> Vec<String> {
        html.split("base64,")
            .skip(1)
            .map(|rest| {
                let payload = &rest[..rest.find('\'').unwrap()];
                String::from_utf8(BASE64_STANDARD.decode(payload).unwrap()).unwrap()
            })
            .collect()
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#x27;Jerry&#x27;&lt;/a&gt;"
        );
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn test_event_document_orders_bundle_first() {
        let doc = HtmlBuilder::new(BundledAssets)
            .build(&json!({"nodes": [], "links": []}), &LayoutParams::default())
            .unwrap();

        let scripts = decoded_scripts(doc.as_str());
        assert_eq!(scripts.len(), 2);
        assert!(scripts[0].contains("addEventListener('novaGraphData'"));
        assert!(scripts[1].contains("document.dispatchEvent(event)"));
        assert!(doc.as_str().starts_with("<!DOCTYPE html>"));
        assert!(doc.as_str().ends_with("<body></body></html>"));
    }

    #[test]
    fn test_event_document_inlines_stylesheet() {
        let doc = HtmlBuilder::new(BundledAssets)
            .build(&json!({"nodes": [], "links": []}), &LayoutParams::default())
            .unwrap();
        assert!(doc.as_str().contains("<style>html,"));
        assert!(doc.as_str().contains(".nova-graph {"));
    }

    #[test]
    fn test_messenger_carries_parameters() {
        let params = LayoutParams {
            link_distance: 12.5,
            ..LayoutParams::default()
        };
        let script = messenger_script(r#"{"nodes":[],"links":[]}"#, &params);

        assert!(script.contains(r#"event.data = {"nodes":[],"links":[]};"#));
        assert!(script.contains("event.width = 500;"));
        assert!(script.contains("event.nodeStrength = -30;"));
        assert!(script.contains("event.linkDistance = 12.5;"));
    }

    #[test]
    fn test_placeholder_tokens_replaced() {
        let doc = HtmlBuilder::new(BundledAssets)
            .with_injection(Injection::Placeholder)
            .build(
                &json!({"nodes": [{"id": "a", "group": "1"}], "links": []}),
                &LayoutParams::for_injection(Injection::Placeholder),
            )
            .unwrap();
        let html = doc.as_str();

        assert!(!html.contains(NOTEBOOK_MODE_TOKEN));
        assert!(!html.contains(OPTIONS_TOKEN));
        assert!(html.contains("notebookMode:1"));
        assert!(html.contains(
            r#"options:{data:{"nodes":[{"id":"a","group":"1"}],"links":[]},width:500,node_strength:-30,link_strength:1,link_distance:30,collide_strength:1}"#
        ));
    }

    #[test]
    fn test_placeholder_escapes_script_close() {
        let doc = HtmlBuilder::new(BundledAssets)
            .with_injection(Injection::Placeholder)
            .build(
                &json!({"nodes": [{"id": "</script>", "group": "1"}], "links": []}),
                &LayoutParams::default(),
            )
            .unwrap();
        assert!(doc.as_str().contains(r#""id":"\u003c/script>""#));
    }

    #[test]
    fn test_placeholder_escapes_comment_open() {
        let doc = HtmlBuilder::new(BundledAssets)
            .with_injection(Injection::Placeholder)
            .build(
                &json!({"nodes": [{"id": "<!--<script>", "group": "1"}], "links": []}),
                &LayoutParams::default(),
            )
            .unwrap();
        let html = doc.as_str();

        assert!(!html.contains("<!--<script>"));
        assert!(html.contains(r#""id":"\u003c!--\u003cscript>""#));
        // The shell's own closing tag is the only one left in the script.
        let script = &html[html.find("<script>").unwrap()..];
        assert_eq!(script.matches("</script>").count(), 1);
        assert!(!script.contains("<!--"));
    }

    #[test]
    fn test_inline_script_json_round_trips() {
        let raw = serde_json::to_string(&json!({"id": "</script><!--x"})).unwrap();
        let safe = inline_script_json(&raw);

        assert!(!safe.contains('<'));
        let back: Value = serde_json::from_str(&safe).unwrap();
        assert_eq!(back["id"], "</script><!--x");
    }

    #[test]
    fn test_document_escaped() {
        let doc = Document {
            html: "<p class='x'>\"hi\"</p>".to_string(),
        };
        assert_eq!(
            doc.escaped(),
            "&lt;p class=&#x27;x&#x27;&gt;&quot;hi&quot;&lt;/p&gt;"
        );
    }
}
