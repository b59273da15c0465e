//! Example: walk a page with the virtual screen reader
//!
//! Reads HTML from the file given as first argument (or a built-in page)
//! and prints every phrase a forward walk speaks.

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::Context;
use fos_html::HtmlParser;
use fos_reader::{ReaderConfig, VirtualScreenReader};
use tracing_subscriber::EnvFilter;

const SAMPLE: &str = r#"
<nav aria-label="Primary"><a href="/">Home</a> <a href="/docs">Docs</a></nav>
<main>
  <h1>Welcome</h1>
  <p>Pick an option.</p>
  <ul><li>First</li><li>Second</li></ul>
  <label><input type="checkbox" checked> Remember me</label>
</main>
<footer>Contact</footer>
"#;

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let html = match std::env::args().nth(1) {
        Some(path) => std::fs::read_to_string(&path).with_context(|| format!("reading {path}"))?,
        None => SAMPLE.to_string(),
    };
    let document = HtmlParser::new().parse(&html)?;
    let body = document.body();
    let document = Rc::new(RefCell::new(document));

    let mut reader = VirtualScreenReader::new(document);
    smol::block_on(async {
        reader.start(ReaderConfig::new(body)).await?;
        // The cursor stays on the last entry once the walk is done
        loop {
            let before = reader.position();
            reader.next().await?;
            if reader.position() == before {
                break;
            }
        }
        anyhow::Ok(())
    })?;

    let log = reader.spoken_phrase_log();
    for phrase in &log[..log.len().saturating_sub(1)] {
        println!("{phrase}");
    }
    smol::block_on(reader.stop());
    Ok(())
}
