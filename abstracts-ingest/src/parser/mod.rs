//! Streaming parser for the abstracts dump.
//!
//! The dump is a single `<feed>` of repeated `<doc>` elements:
//!
//! ```xml
//! <doc>
//!   <title>Wikipedia: Anarchism</title>
//!   <url>https://en.wikipedia.org/wiki/Anarchism</url>
//!   <abstract>Anarchism is a political philosophy ...</abstract>
//!   <links>...</links>
//! </doc>
//! ```
//!
//! The parser walks the document as a stream of XML events and yields one
//! [`Article`] per valid `<doc>`. Memory use is bounded by the largest single
//! element, not by the size of the dump.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::{debug, trace};

use crate::errors::IngestError;
use abstracts_shared::Article;

/// Read buffer used when opening a dump from disk.
const FILE_BUFFER_SIZE: usize = 64 * 1024;

/// Elements the parser reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tag {
    Doc,
    Title,
    Url,
    Abstract,
    Other,
}

impl Tag {
    fn from_name(name: &[u8]) -> Self {
        match name {
            b"doc" => Self::Doc,
            b"title" => Self::Title,
            b"url" => Self::Url,
            b"abstract" => Self::Abstract,
            _ => Self::Other,
        }
    }
}

/// Fields collected for the `<doc>` currently being read.
#[derive(Debug, Default)]
struct PartialDoc {
    title: String,
    link: String,
    text: String,
}

/// Counters for what the parser has seen so far.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParserStats {
    /// `<doc>` elements closed.
    pub docs: usize,
    /// Articles yielded.
    pub accepted: usize,
    /// Docs dropped for missing fields or a short abstract.
    pub skipped: usize,
}

/// Pull-based iterator over the valid articles of an abstracts dump.
///
/// Single pass: once the underlying reader is exhausted, or after the first
/// error, the iterator only returns `None`.
pub struct AbstractParser<R: BufRead> {
    reader: Reader<R>,
    buf: Vec<u8>,
    min_summary_size: usize,
    current: Option<PartialDoc>,
    text: String,
    stats: ParserStats,
    finished: bool,
}

impl AbstractParser<BufReader<File>> {
    /// Open a dump on disk.
    pub fn from_path(path: impl AsRef<Path>, min_summary_size: usize) -> Result<Self, IngestError> {
        let file = File::open(path.as_ref())?;
        debug!(path = %path.as_ref().display(), "Opened abstracts dump");
        Ok(Self::new(
            BufReader::with_capacity(FILE_BUFFER_SIZE, file),
            min_summary_size,
        ))
    }
}

impl<R: BufRead> AbstractParser<R> {
    /// Create a parser over any buffered reader.
    pub fn new(reader: R, min_summary_size: usize) -> Self {
        Self {
            reader: Reader::from_reader(reader),
            buf: Vec::new(),
            min_summary_size,
            current: None,
            text: String::new(),
            stats: ParserStats::default(),
            finished: false,
        }
    }

    /// Counters for the docs seen so far.
    pub fn stats(&self) -> ParserStats {
        self.stats
    }

    /// Handle the end of an element. Returns an article when a valid `<doc>`
    /// closes.
    fn close_element(&mut self, tag: Tag) -> Option<Article> {
        if tag == Tag::Doc {
            let doc = self.current.take()?;
            self.text.clear();
            return self.finish_doc(doc);
        }

        let doc = self.current.as_mut()?;
        let text = std::mem::take(&mut self.text);
        match tag {
            Tag::Title => doc.title = Article::clean_title(&text).to_string(),
            Tag::Url => doc.link = text,
            Tag::Abstract => doc.text = text,
            Tag::Doc | Tag::Other => {}
        }
        None
    }

    fn finish_doc(&mut self, doc: PartialDoc) -> Option<Article> {
        self.stats.docs += 1;

        let article = Article::new(doc.title, doc.link, doc.text);
        if article.is_valid(self.min_summary_size) {
            self.stats.accepted += 1;
            Some(article)
        } else {
            self.stats.skipped += 1;
            trace!(title = %article.title, "Skipping incomplete doc");
            None
        }
    }
}

impl<R: BufRead> Iterator for AbstractParser<R> {
    type Item = Result<Article, IngestError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        loop {
            self.buf.clear();
            let tag = match self.reader.read_event_into(&mut self.buf) {
                Err(e) => {
                    self.finished = true;
                    self.current = None;
                    return Some(Err(IngestError::parse(format!(
                        "XML error at byte {}: {}",
                        self.reader.buffer_position(),
                        e
                    ))));
                }
                Ok(Event::Eof) => {
                    self.finished = true;
                    debug!(
                        docs = self.stats.docs,
                        accepted = self.stats.accepted,
                        skipped = self.stats.skipped,
                        "Reached end of abstracts dump"
                    );
                    return None;
                }
                Ok(Event::Start(e)) => {
                    self.text.clear();
                    if Tag::from_name(e.name().as_ref()) == Tag::Doc {
                        self.current = Some(PartialDoc::default());
                    }
                    continue;
                }
                Ok(Event::Text(t)) => {
                    if self.current.is_some() {
                        match t.unescape() {
                            Ok(text) => self.text.push_str(&text),
                            Err(e) => {
                                self.finished = true;
                                self.current = None;
                                return Some(Err(IngestError::parse(format!(
                                    "Invalid text content: {}",
                                    e
                                ))));
                            }
                        }
                    }
                    continue;
                }
                Ok(Event::CData(c)) => {
                    if self.current.is_some() {
                        self.text.push_str(&String::from_utf8_lossy(&c));
                    }
                    continue;
                }
                // `<abstract/>` closes with no content
                Ok(Event::Empty(e)) => {
                    self.text.clear();
                    Tag::from_name(e.name().as_ref())
                }
                Ok(Event::End(e)) => Tag::from_name(e.name().as_ref()),
                Ok(_) => continue,
            };

            if let Some(article) = self.close_element(tag) {
                return Some(Ok(article));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn doc(title: &str, url: &str, abstract_text: &str) -> String {
        format!(
            "<doc><title>{}</title><url>{}</url><abstract>{}</abstract>\
             <links><sublink linktype=\"nav\"><anchor>History</anchor>\
             <link>https://en.wikipedia.org/wiki/X#History</link></sublink></links></doc>",
            title, url, abstract_text
        )
    }

    fn feed(docs: &[String]) -> String {
        format!("<feed>{}</feed>", docs.concat())
    }

    fn parse(xml: &str, min: usize) -> Vec<Result<Article, IngestError>> {
        AbstractParser::new(xml.as_bytes(), min).collect()
    }

    fn parse_ok(xml: &str, min: usize) -> Vec<Article> {
        parse(xml, min)
            .into_iter()
            .collect::<Result<Vec<_>, _>>()
            .unwrap()
    }

    #[test]
    fn test_valid_and_short_docs() {
        let xml = feed(&[
            doc("Wikipedia: Foo", "http://x/Foo", &"a".repeat(101)),
            doc("Wikipedia: Bar", "http://x/Bar", &"b".repeat(50)),
        ]);

        let articles = parse_ok(&xml, 100);

        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].title, "Foo");
        assert_eq!(articles[0].link, "http://x/Foo");
        assert_eq!(articles[0].text, "a".repeat(101));
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let xml = feed(&[doc("Foo", "http://x/Foo", &"a".repeat(100))]);
        assert_eq!(parse_ok(&xml, 100).len(), 1);
        assert_eq!(parse_ok(&xml, 101).len(), 0);
    }

    #[test]
    fn test_title_without_prefix_is_kept() {
        let xml = feed(&[doc("Foo", "http://x/Foo", &"a".repeat(120))]);
        assert_eq!(parse_ok(&xml, 100)[0].title, "Foo");
    }

    #[test]
    fn test_missing_fields_are_skipped() {
        let long = "a".repeat(150);
        let xml = format!(
            "<feed>\
             <doc><url>http://x/NoTitle</url><abstract>{long}</abstract></doc>\
             <doc><title>NoUrl</title><abstract>{long}</abstract></doc>\
             <doc><title>NoAbstract</title><url>http://x/NoAbstract</url></doc>\
             <doc><title>EmptyAbstract</title><url>http://x/E</url><abstract/></doc>\
             <doc><title>Kept</title><url>http://x/Kept</url><abstract>{long}</abstract></doc>\
             </feed>"
        );

        let mut parser = AbstractParser::new(xml.as_bytes(), 100);
        let articles: Vec<Article> = parser.by_ref().map(Result::unwrap).collect();

        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].title, "Kept");
        assert_eq!(
            parser.stats(),
            ParserStats {
                docs: 5,
                accepted: 1,
                skipped: 4
            }
        );
    }

    #[test]
    fn test_fields_do_not_leak_between_docs() {
        let long = "a".repeat(150);
        let xml = format!(
            "<feed>\
             <doc><title>First</title><url>http://x/First</url><abstract>{long}</abstract></doc>\
             <doc><title>Second</title><abstract>{long}</abstract></doc>\
             </feed>"
        );

        let articles = parse_ok(&xml, 100);
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].title, "First");
    }

    #[test]
    fn test_elements_outside_doc_are_ignored() {
        let long = "a".repeat(150);
        let xml = format!(
            "<feed><title>Feed title</title><url>http://x/feed</url><abstract>{long}</abstract>\
             {}</feed>",
            doc("Inside", "http://x/Inside", &long)
        );

        let articles = parse_ok(&xml, 100);
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].title, "Inside");
    }

    #[test]
    fn test_nested_link_elements_do_not_override_url() {
        let xml = feed(&[doc("Foo", "http://x/Foo", &"a".repeat(120))]);
        assert_eq!(parse_ok(&xml, 100)[0].link, "http://x/Foo");
    }

    #[test]
    fn test_entities_and_cdata() {
        let text = format!("Rock &amp; roll {}", "a".repeat(120));
        let xml = format!(
            "<feed><doc><title>Wikipedia: AT&amp;T</title><url>http://x/ATT</url>\
             <abstract><![CDATA[<b>]]>{}</abstract></doc></feed>",
            text
        );

        let articles = parse_ok(&xml, 100);

        assert_eq!(articles[0].title, "AT&T");
        assert!(articles[0].text.starts_with("<b>Rock & roll "));
    }

    #[test]
    fn test_preserves_order() {
        let long = "a".repeat(120);
        let docs: Vec<String> = (0..20)
            .map(|i| doc(&format!("Doc {}", i), &format!("http://x/{}", i), &long))
            .collect();

        let titles: Vec<String> = parse_ok(&feed(&docs), 100)
            .into_iter()
            .map(|a| a.title)
            .collect();
        let expected: Vec<String> = (0..20).map(|i| format!("Doc {}", i)).collect();

        assert_eq!(titles, expected);
    }

    #[test]
    fn test_malformed_xml_is_an_error() {
        let long = "a".repeat(150);
        let xml = format!(
            "<feed>{}<doc><title>Broken</title></url></doc></feed>",
            doc("Good", "http://x/Good", &long)
        );

        let results = parse(&xml, 100);

        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());
        assert!(matches!(results[1], Err(IngestError::ParseError(_))));
    }

    #[test]
    fn test_iterator_is_fused_after_error() {
        let mut parser = AbstractParser::new("<feed><doc></feed>".as_bytes(), 100);
        assert!(matches!(parser.next(), Some(Err(IngestError::ParseError(_)))));
        assert!(parser.next().is_none());
        assert!(parser.next().is_none());
    }

    #[test]
    fn test_empty_feed() {
        assert!(parse_ok("<feed></feed>", 100).is_empty());
        assert!(parse_ok("", 100).is_empty());
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let xml = feed(&[doc("Wikipedia: Foo", "http://x/Foo", &"a".repeat(101))]);
        file.write_all(xml.as_bytes()).unwrap();

        let parser = AbstractParser::from_path(file.path(), 100).unwrap();
        let articles: Vec<Article> = parser.map(Result::unwrap).collect();

        assert_eq!(articles, vec![Article::new("Foo", "http://x/Foo", "a".repeat(101))]);
    }

    #[test]
    fn test_from_missing_path() {
        let result = AbstractParser::from_path("/nonexistent/abstracts.xml", 100);
        assert!(matches!(result, Err(IngestError::IoError(_))));
    }
}
