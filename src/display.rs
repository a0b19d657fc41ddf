//! Iframe synthesis and the notebook display channel.

use std::io::{self, Write};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::Result;

pub const IFRAME_ID_PREFIX: &str = "nova-graph-iframe-";

/// Iframe ids are drawn from `0..ID_SPACE`.
pub const ID_SPACE: u32 = 100_000_000;

/// Source of iframe id suffixes.
pub trait IdSource {
    fn next_id(&mut self) -> u32;
}

impl<T: IdSource + ?Sized> IdSource for Box<T> {
    fn next_id(&mut self) -> u32 {
        (**self).next_id()
    }
}

/// Ids from the thread-local RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIds;

impl IdSource for RandomIds {
    fn next_id(&mut self) -> u32 {
        rand::thread_rng().gen_range(0..ID_SPACE)
    }
}

/// Reproducible ids from a seeded RNG.
#[derive(Debug, Clone)]
pub struct SeededIds {
    rng: StdRng,
}

impl SeededIds {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl IdSource for SeededIds {
    fn next_id(&mut self) -> u32 {
        self.rng.gen_range(0..ID_SPACE)
    }
}

/// Always the same id.
#[derive(Debug, Clone, Copy)]
pub struct FixedId(pub u32);

impl IdSource for FixedId {
    fn next_id(&mut self) -> u32 {
        self.0
    }
}

/// Rich-display channel that accepts raw HTML.
pub trait DisplaySink {
    fn display_html(&mut self, html: &str) -> Result<()>;
}

/// Writes HTML using the evcxr Jupyter kernel's content protocol.
#[derive(Debug)]
pub struct EvcxrSink<W = io::Stdout> {
    out: W,
}

impl EvcxrSink {
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write> EvcxrSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> DisplaySink for EvcxrSink<W> {
    fn display_html(&mut self, html: &str) -> Result<()> {
        writeln!(self.out, "EVCXR_BEGIN_CONTENT text/html")?;
        writeln!(self.out, "{html}")?;
        writeln!(self.out, "EVCXR_END_CONTENT")?;
        self.out.flush()?;
        Ok(())
    }
}

/// Keeps every emitted fragment in memory.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    pub items: Vec<String>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<&str> {
        self.items.last().map(String::as_str)
    }
}

impl DisplaySink for RecordingSink {
    fn display_html(&mut self, html: &str) -> Result<()> {
        self.items.push(html.to_string());
        Ok(())
    }
}

impl<S: DisplaySink + ?Sized> DisplaySink for &mut S {
    fn display_html(&mut self, html: &str) -> Result<()> {
        (**self).display_html(html)
    }
}

pub fn iframe_id(suffix: u32) -> String {
    format!("{IFRAME_ID_PREFIX}{suffix}")
}

/// Iframe markup around an already escaped document.
pub fn iframe_markup(escaped_doc: &str, height: u32, id: &str) -> String {
    format!(
        "<iframe
    srcdoc=\"{escaped_doc}\"
    frameBorder=\"0\"
    width=\"100%\"
    height=\"{height}px\"
    id=\"{id}\">
</iframe>"
    )
}

/// Wrap `escaped_doc` in an iframe and write it to `sink`.
pub fn emit<I, S>(escaped_doc: &str, height: u32, ids: &mut I, sink: &mut S) -> Result<()>
where
    I: IdSource + ?Sized,
    S: DisplaySink + ?Sized,
{
    let id = iframe_id(ids.next_id());
    tracing::debug!(%id, height, "displaying widget iframe");
    sink.display_html(&iframe_markup(escaped_doc, height, &id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iframe_markup() {
        let markup = iframe_markup("&lt;p&gt;", 520, &iframe_id(42));
        insta::assert_snapshot!(markup, @r#"
        <iframe
            srcdoc="&lt;p&gt;"
            frameBorder="0"
            width="100%"
            height="520px"
            id="nova-graph-iframe-42">
        </iframe>
        "#);
    }

    #[test]
    fn test_seeded_ids_are_reproducible() {
        let mut a = SeededIds::new(7);
        let mut b = SeededIds::new(7);
        let first: Vec<u32> = (0..5).map(|_| a.next_id()).collect();
        let second: Vec<u32> = (0..5).map(|_| b.next_id()).collect();

        assert_eq!(first, second);
        assert!(first.iter().all(|&id| id < ID_SPACE));
    }

    #[test]
    fn test_random_ids_in_range() {
        let mut ids = RandomIds;
        for _ in 0..100 {
            assert!(ids.next_id() < ID_SPACE);
        }
    }

    #[test]
    fn test_evcxr_sink_protocol() {
        let mut sink = EvcxrSink::new(Vec::new());
        sink.display_html("<b>hi</b>").unwrap();

        let out = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(
            out,
            "EVCXR_BEGIN_CONTENT text/html\n<b>hi</b>\nEVCXR_END_CONTENT\n"
        );
    }

    #[test]
    fn test_emit_uses_id_source() {
        let mut sink = RecordingSink::new();
        emit("doc", 300, &mut FixedId(5), &mut sink).unwrap();

        let markup = sink.last().unwrap();
        assert!(markup.contains(r#"id="nova-graph-iframe-5""#));
        assert!(markup.contains(r#"height="300px""#));
        assert!(markup.contains(r#"srcdoc="doc""#));
    }
}
