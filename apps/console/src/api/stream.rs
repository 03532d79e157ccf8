use serde::Deserialize;

use crate::models::{ExtractedCase, Suggestion};

/// One `data: <json>` event from the workflow stream. Field presence
/// varies by step; only the terminal `complete` event is required to
/// carry the extraction payload.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct WorkflowProgress {
    pub step: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub progress: Option<f64>,
    #[serde(default)]
    pub current: Option<u64>,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub cases: Option<Vec<ExtractedCase>>,
    #[serde(default)]
    pub suggestions: Option<Vec<Suggestion>>,
    #[serde(default)]
    pub error: Option<String>,
}

impl WorkflowProgress {
    pub fn is_complete(&self) -> bool {
        self.step == "complete"
    }

    pub fn is_error(&self) -> bool {
        self.step == "error"
    }

    pub fn error_message(&self) -> String {
        self.error
            .clone()
            .or_else(|| self.message.clone())
            .unwrap_or_else(|| "document workflow failed".to_string())
    }
}

/// Line buffer for SSE-style chunked responses. Chunk boundaries are not
/// aligned with event boundaries — or even with UTF-8 character
/// boundaries — so raw bytes are held until the closing newline and only
/// complete lines are decoded. Malformed lines are logged and skipped;
/// they never abort the stream.
#[derive(Debug, Default)]
pub struct SseLineBuffer {
    pending: Vec<u8>,
}

impl SseLineBuffer {
    pub fn push(&mut self, chunk: &[u8]) -> Vec<WorkflowProgress> {
        self.pending.extend_from_slice(chunk);

        let mut events = Vec::new();
        while let Some(newline) = self.pending.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=newline).collect();
            let text = String::from_utf8_lossy(&line);
            if let Some(event) = parse_line(text.trim_end_matches(['\n', '\r'])) {
                events.push(event);
            }
        }
        events
    }

    /// Called once the transport reports end-of-stream; a final event
    /// without a trailing newline is still honored.
    pub fn finish(&mut self) -> Option<WorkflowProgress> {
        let rest = std::mem::take(&mut self.pending);
        let text = String::from_utf8_lossy(&rest);
        parse_line(text.trim_end_matches('\r'))
    }
}

fn parse_line(line: &str) -> Option<WorkflowProgress> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let payload = line.strip_prefix("data:").unwrap_or(line).trim_start();
    match serde_json::from_str::<WorkflowProgress>(payload) {
        Ok(event) => Some(event),
        Err(err) => {
            tracing::warn!("skipping malformed progress chunk: {err}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_complete_lines() {
        let mut buffer = SseLineBuffer::default();
        let events =
            buffer.push(b"data: {\"step\":\"parsing\",\"message\":\"reading pdf\",\"progress\":0.2}\n");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].step, "parsing");
        assert_eq!(events[0].message.as_deref(), Some("reading pdf"));
    }

    #[test]
    fn buffers_partial_lines_across_chunks() {
        let mut buffer = SseLineBuffer::default();
        assert!(buffer.push(b"data: {\"step\":\"sugg").is_empty());
        assert!(buffer.push(b"esting\",\"current\":1,").is_empty());
        let events = buffer.push(b"\"total\":3}\ndata: {\"step\":\"par");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].step, "suggesting");
        assert_eq!(events[0].current, Some(1));
        assert_eq!(events[0].total, Some(3));

        let events = buffer.push(b"sing\"}\n");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].step, "parsing");
    }

    #[test]
    fn multibyte_text_split_mid_character_survives() {
        let line = "data: {\"step\":\"parsing\",\"message\":\"Επεξεργασία\"}\n".as_bytes();
        // Split inside the two-byte encoding of the first Greek letter.
        let split = line.iter().position(|&b| b >= 0x80).unwrap() + 1;

        let mut buffer = SseLineBuffer::default();
        assert!(buffer.push(&line[..split]).is_empty());
        let events = buffer.push(&line[split..]);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].message.as_deref(), Some("Επεξεργασία"));
    }

    #[test]
    fn multiple_events_in_one_chunk() {
        let mut buffer = SseLineBuffer::default();
        let events = buffer.push(
            b"data: {\"step\":\"parsing\"}\ndata: {\"step\":\"complete\",\"cases\":[]}\n",
        );
        assert_eq!(events.len(), 2);
        assert!(events[1].is_complete());
    }

    #[test]
    fn malformed_lines_are_skipped_not_fatal() {
        let mut buffer = SseLineBuffer::default();
        let events = buffer.push(b"data: {not json}\ndata: {\"step\":\"parsing\"}\n");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].step, "parsing");
    }

    #[test]
    fn blank_keepalive_lines_are_ignored() {
        let mut buffer = SseLineBuffer::default();
        assert!(buffer.push(b"\n\r\n").is_empty());
    }

    #[test]
    fn finish_flushes_unterminated_terminal_event() {
        let mut buffer = SseLineBuffer::default();
        assert!(buffer.push(b"data: {\"step\":\"complete\"}").is_empty());
        let event = buffer.finish().expect("trailing event");
        assert!(event.is_complete());
        assert!(buffer.finish().is_none());
    }

    #[test]
    fn terminal_error_carries_message() {
        let mut buffer = SseLineBuffer::default();
        let events = buffer.push(b"data: {\"step\":\"error\",\"error\":\"parse failed\"}\n");
        assert!(events[0].is_error());
        assert_eq!(events[0].error_message(), "parse failed");
    }

    #[test]
    fn complete_event_payload_deserializes() {
        let mut buffer = SseLineBuffer::default();
        let events = buffer.push(concat!(
            "data: {\"step\":\"complete\",\"cases\":[{\"room\":\"101\",\"title\":\"Cold breakfast\"}],",
            "\"suggestions\":[{\"suggestion_text\":\"Offer complimentary breakfast\"}]}\n"
        ).as_bytes());
        let cases = events[0].cases.as_ref().unwrap();
        assert_eq!(cases.len(), 1);
        assert_eq!(cases[0].room.as_deref(), Some("101"));
        let suggestions = events[0].suggestions.as_ref().unwrap();
        assert_eq!(
            suggestions[0].suggestion_text.as_deref(),
            Some("Offer complimentary breakfast")
        );
    }
}
