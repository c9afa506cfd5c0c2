//! Transport seam for serialized error responses

use serde_json::Value;

/// Minimal contract for whatever carries the response to the client.
///
/// `headers_sent` guards the write-once rule: once a response has gone
/// out, `send` becomes a no-op.
pub trait ResponseSink {
    fn status(&mut self, code: u16);
    fn json(&mut self, body: &Value);
    fn headers_sent(&self) -> bool;
}

/// In-memory sink for tests.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub status_code: Option<u16>,
    pub body: Option<Value>,
    pub sent: bool,
    pub write_count: usize,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink that claims a response already went out.
    pub fn already_sent() -> Self {
        Self {
            sent: true,
            ..Self::default()
        }
    }
}

impl ResponseSink for RecordingSink {
    fn status(&mut self, code: u16) {
        self.status_code = Some(code);
    }

    fn json(&mut self, body: &Value) {
        self.body = Some(body.clone());
        self.sent = true;
        self.write_count += 1;
    }

    fn headers_sent(&self) -> bool {
        self.sent
    }
}
