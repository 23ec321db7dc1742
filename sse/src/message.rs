use axum::response::sse::Event;
use std::fmt;
use std::sync::Arc;

/// A text payload fanned out to every subscriber.
///
/// The text is shared, so cloning a message for each subscriber never copies it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message(Arc<str>);

impl Message {
    pub fn new(text: impl AsRef<str>) -> Self {
        Self(Arc::from(text.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Unnamed SSE event carrying the text as its `data` field, which goes out
    /// on the wire as `data: <text>\n\n`.
    pub fn into_event(self) -> Event {
        Event::default().data(self.as_str())
    }
}

impl From<&str> for Message {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for Message {
    fn from(text: String) -> Self {
        Self(Arc::from(text))
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
