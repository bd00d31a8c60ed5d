//! The block list document that commits uploaded blocks.
//!
//! Every entry is wrapped in `<Latest>`, telling the store to use the most
//! recently uploaded block with that id, whether or not an older committed
//! block shares it.

use quick_xml::Reader;
use quick_xml::events::Event;

use crate::ProtocolError;
use crate::block_id::BlockId;
use crate::constants::XML_DECLARATION;

const OPEN_LIST: &str = "<BlockList>";
const CLOSE_LIST: &str = "</BlockList>";
const OPEN_LATEST: &str = "<Latest>";
const CLOSE_LATEST: &str = "</Latest>";
const LIST_TAG: &[u8] = b"BlockList";
const LATEST_TAG: &[u8] = b"Latest";

/// Ordered list of encoded block ids to commit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockList {
    entries: Vec<String>,
}

impl BlockList {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a list from ids, keeping their order.
    pub fn from_ids<'a>(ids: impl IntoIterator<Item = &'a BlockId>) -> Self {
        Self {
            entries: ids.into_iter().map(|id| id.encoded().to_string()).collect(),
        }
    }

    /// Appends one encoded id.
    pub fn push(&mut self, id: &BlockId) {
        self.entries.push(id.encoded().to_string());
    }

    /// Encoded ids in commit order.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Renders the request body for the put-block-list call.
    ///
    /// Output is a single line with no whitespace between elements; the
    /// store accepts it and fixtures compare it byte for byte.
    pub fn to_xml(&self) -> String {
        let per_entry = OPEN_LATEST.len() + CLOSE_LATEST.len();
        let mut body = String::with_capacity(
            XML_DECLARATION.len()
                + OPEN_LIST.len()
                + CLOSE_LIST.len()
                + self.entries.iter().map(|e| e.len() + per_entry).sum::<usize>(),
        );
        body.push_str(XML_DECLARATION);
        body.push_str(OPEN_LIST);
        for entry in &self.entries {
            body.push_str(OPEN_LATEST);
            body.push_str(entry);
            body.push_str(CLOSE_LATEST);
        }
        body.push_str(CLOSE_LIST);
        body
    }

    /// Parses a block list document, e.g. one produced by
    /// [`BlockList::to_xml`].
    ///
    /// Only `<Latest>` entries are understood; any other element is an
    /// error. Declarations, comments and whitespace between elements are
    /// ignored.
    pub fn parse(xml: &str) -> Result<Self, ProtocolError> {
        let mut reader = Reader::from_str(xml);
        reader.trim_text(true);

        let mut entries = Vec::new();
        let mut seen_root = false;
        let mut in_list = false;
        let mut current: Option<String> = None;

        loop {
            match reader.read_event().map_err(malformed)? {
                Event::Start(e) => match e.name().as_ref() {
                    LIST_TAG if !seen_root => {
                        seen_root = true;
                        in_list = true;
                    }
                    LATEST_TAG if in_list && current.is_none() => current = Some(String::new()),
                    other => return Err(unexpected(other)),
                },
                Event::Empty(e) => match e.name().as_ref() {
                    LIST_TAG if !seen_root => seen_root = true,
                    other => return Err(unexpected(other)),
                },
                Event::Text(t) => {
                    let text = t.unescape().map_err(malformed)?;
                    match current.as_mut() {
                        Some(entry) => entry.push_str(&text),
                        None => {
                            return Err(ProtocolError::MalformedBlockList(format!(
                                "unexpected text: {text}"
                            )));
                        }
                    }
                }
                Event::End(e) => match e.name().as_ref() {
                    LATEST_TAG => {
                        let entry = current.take().unwrap_or_default();
                        if entry.is_empty() {
                            return Err(ProtocolError::MalformedBlockList(
                                "empty <Latest>".into(),
                            ));
                        }
                        entries.push(entry);
                    }
                    _ => in_list = false,
                },
                Event::Eof => break,
                _ => {}
            }
        }

        if !seen_root || in_list {
            return Err(ProtocolError::MalformedBlockList(
                "missing or unterminated <BlockList>".into(),
            ));
        }
        Ok(Self { entries })
    }
}

fn malformed(e: quick_xml::Error) -> ProtocolError {
    ProtocolError::MalformedBlockList(e.to_string())
}

fn unexpected(name: &[u8]) -> ProtocolError {
    ProtocolError::MalformedBlockList(format!(
        "unexpected element <{}>",
        String::from_utf8_lossy(name)
    ))
}
