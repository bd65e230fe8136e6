use bytes::{BufMut, Bytes, BytesMut};
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::http::response::Response;

/// Encodes status line, headers (sorted by name) and body into one buffer.
pub fn serialize_response(resp: &Response) -> Bytes {
    let mut headers: Vec<(&String, &String)> = resp.headers.iter().collect();
    headers.sort_unstable_by(|a, b| a.0.cmp(b.0));

    let head: String = std::iter::once(format!(
        "HTTP/1.1 {} {}\r\n",
        resp.status.as_u16(),
        resp.status.reason_phrase()
    ))
    .chain(headers.into_iter().map(|(name, value)| format!("{name}: {value}\r\n")))
    .collect();

    let mut out = BytesMut::with_capacity(head.len() + 2 + resp.body.len());
    out.put_slice(head.as_bytes());
    out.put_slice(b"\r\n");
    out.put_slice(&resp.body);
    out.freeze()
}

/// A serialized response waiting to go out. Nothing is sent until
/// [`write_to_stream`](Self::write_to_stream), so a failure while building
/// the response never leaves a partial one on the wire.
pub struct ResponseWriter {
    pending: Bytes,
}

impl ResponseWriter {
    pub fn new(response: &Response) -> Self {
        Self {
            pending: serialize_response(response),
        }
    }

    pub async fn write_to_stream<W>(&mut self, stream: &mut W) -> anyhow::Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        stream.write_all_buf(&mut self.pending).await?;
        stream.flush().await?;
        Ok(())
    }
}
