//! Agent response parsing

/// Prefix the agent puts on every error reply.
pub const AGENT_WARNING: &str = "##AGENT-WARNING##";

/// A single reply from the agent, with the prompt stripped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response(String);

impl Response {
    /// Wrap a response body
    pub fn new(body: impl Into<String>) -> Self {
        Self(body.into())
    }

    /// Raw response body
    pub fn body(&self) -> &str {
        &self.0
    }

    /// Consume the response and return its body
    pub fn into_body(self) -> String {
        self.0
    }

    /// The agent's error text, without the warning prefix
    pub fn warning(&self) -> Option<&str> {
        self.0.strip_prefix(AGENT_WARNING).map(str::trim)
    }

    /// Parse a `TRUE`/`FALSE` reply
    pub fn as_bool(&self) -> Option<bool> {
        match self.0.trim() {
            "TRUE" => Some(true),
            "FALSE" => Some(false),
            _ => None,
        }
    }

    /// Split an `ls` reply into entry names
    pub fn entries(&self) -> impl Iterator<Item = &str> {
        self.0.lines().map(str::trim).filter(|l| !l.is_empty())
    }

    /// Value lines of an `info <topic>` reply
    ///
    /// The agent echoes the topic name on the first line.
    pub fn info_values<'a>(&'a self, topic: &'a str) -> impl Iterator<Item = &'a str> {
        self.entries().filter(move |l| *l != topic)
    }
}
