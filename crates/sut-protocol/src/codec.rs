//! Tokio codec for the agent's prompt-delimited replies

use bytes::{Buf, BufMut, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use crate::command::SutCommand;
use crate::error::ProtocolError;
use crate::response::Response;

/// Prompt that terminates every agent reply
pub const PROMPT: &[u8] = b"$>\0";

/// Maximum reply body size (16MB)
pub const MAX_RESPONSE_SIZE: usize = 16 * 1024 * 1024;

/// Codec for encoding commands and decoding prompt-terminated replies
#[derive(Debug, Default)]
pub struct SutCodec {
    /// Bytes of the buffer already searched for a prompt
    scanned: usize,
}

impl SutCodec {
    /// Create a new codec
    pub fn new() -> Self {
        Self { scanned: 0 }
    }

    fn find_prompt(&self, src: &[u8]) -> Option<usize> {
        // A prompt may straddle the previous read boundary
        let start = self
            .scanned
            .saturating_sub(PROMPT.len() - 1)
            .min(src.len());
        src[start..]
            .windows(PROMPT.len())
            .position(|w| w == PROMPT)
            .map(|pos| start + pos)
    }
}

impl Decoder for SutCodec {
    type Item = Response;
    type Error = ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        let Some(end) = self.find_prompt(src) else {
            if src.len() > MAX_RESPONSE_SIZE + PROMPT.len() {
                return Err(ProtocolError::ResponseTooLarge {
                    size: src.len(),
                    max: MAX_RESPONSE_SIZE,
                });
            }
            self.scanned = src.len();
            return Ok(None); // Need more data
        };

        self.scanned = 0;

        if end > MAX_RESPONSE_SIZE {
            return Err(ProtocolError::ResponseTooLarge {
                size: end,
                max: MAX_RESPONSE_SIZE,
            });
        }

        let body = src.split_to(end);
        src.advance(PROMPT.len());

        let text = String::from_utf8(body.to_vec())?;
        Ok(Some(Response::new(text.trim())))
    }
}

impl Encoder<SutCommand> for SutCodec {
    type Error = ProtocolError;

    fn encode(&mut self, command: SutCommand, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let line = command.line()?;
        tracing::trace!("-> {}", line);

        let payload_len = command.payload().map_or(0, |p| p.len());
        dst.reserve(line.len() + 2 + payload_len);
        dst.put_slice(line.as_bytes());
        dst.put_slice(b"\r\n");

        if let Some(payload) = command.payload() {
            dst.extend_from_slice(payload);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use futures::StreamExt;
    use tokio::io::AsyncWriteExt;
    use tokio_util::codec::FramedRead;

    #[test]
    fn test_decode_single_response() {
        let mut codec = SutCodec::new();
        let mut buf = BytesMut::from(&b"SUTAgentAndroid Version 1.13\n$>\0"[..]);

        let resp = codec.decode(&mut buf).unwrap().unwrap();
        assert_eq!(resp.body(), "SUTAgentAndroid Version 1.13");
        assert!(buf.is_empty());
    }

    #[test]
    fn test_decode_greeting_is_empty_response() {
        let mut codec = SutCodec::new();
        let mut buf = BytesMut::from(&b"$>\0"[..]);

        let resp = codec.decode(&mut buf).unwrap().unwrap();
        assert_eq!(resp.body(), "");
    }

    #[test]
    fn test_decode_multiple_responses() {
        let mut codec = SutCodec::new();
        let mut buf = BytesMut::from(&b"TRUE\n$>\0writetest\n$>\0"[..]);

        assert_eq!(codec.decode(&mut buf).unwrap().unwrap().body(), "TRUE");
        assert_eq!(codec.decode(&mut buf).unwrap().unwrap().body(), "writetest");
        assert!(codec.decode(&mut buf).unwrap().is_none());
    }

    #[test]
    fn test_decode_partial_read() {
        let mut codec = SutCodec::new();

        // Prompt split across reads
        let mut buf = BytesMut::from(&b"1320951845123\n$"[..]);
        assert!(codec.decode(&mut buf).unwrap().is_none());

        buf.extend_from_slice(b">\0");
        let resp = codec.decode(&mut buf).unwrap().unwrap();
        assert_eq!(resp.body(), "1320951845123");
    }

    #[test]
    fn test_decode_oversized_response() {
        let mut codec = SutCodec::new();
        let mut buf = BytesMut::zeroed(MAX_RESPONSE_SIZE + PROMPT.len() + 1);

        assert!(matches!(
            codec.decode(&mut buf),
            Err(ProtocolError::ResponseTooLarge { .. })
        ));
    }

    #[test]
    fn test_decode_invalid_utf8() {
        let mut codec = SutCodec::new();
        let mut buf = BytesMut::from(&b"\xff\xfe$>\0"[..]);

        assert!(matches!(
            codec.decode(&mut buf),
            Err(ProtocolError::InvalidUtf8(_))
        ));
    }

    #[test]
    fn test_encode_push_appends_payload() {
        let mut codec = SutCodec::new();
        let mut buf = BytesMut::new();

        codec
            .encode(
                SutCommand::Push {
                    path: "/mnt/sdcard/writetest".into(),
                    data: Bytes::from_static(b"abc"),
                },
                &mut buf,
            )
            .unwrap();

        assert_eq!(&buf[..], b"push /mnt/sdcard/writetest 3\r\nabc");
    }

    #[test]
    fn test_encode_rejects_bad_argument() {
        let mut codec = SutCodec::new();
        let mut buf = BytesMut::new();

        let result = codec.encode(SutCommand::IsDir("a\r\nrebt".into()), &mut buf);
        assert!(result.is_err());
        assert!(buf.is_empty());
    }

    #[tokio::test]
    async fn test_framed_read_across_chunks() {
        let (mut agent, device_side) = tokio::io::duplex(64);
        let mut frames = FramedRead::new(device_side, SutCodec::new());

        let writer = tokio::spawn(async move {
            agent.write_all(b"$>\0SUTAgentAndroid Ver").await.unwrap();
            agent.flush().await.unwrap();
            tokio::task::yield_now().await;
            agent.write_all(b"sion 1.13\n$").await.unwrap();
            agent.write_all(b">\0").await.unwrap();
        });

        let greeting = frames.next().await.unwrap().unwrap();
        assert_eq!(greeting.body(), "");

        let reply = frames.next().await.unwrap().unwrap();
        assert_eq!(reply.body(), "SUTAgentAndroid Version 1.13");

        writer.await.unwrap();
        // Writer dropped its end, so the stream is finished
        assert!(frames.next().await.is_none());
    }
}
