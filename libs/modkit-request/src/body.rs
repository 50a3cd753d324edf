use crate::error::{BoxError, HttpError};
use crate::transport::RequestBody;
use bytes::Bytes;
use futures_util::TryStreamExt;
use http_body::Frame;
use http_body_util::{BodyExt, Full, StreamBody};
use serde::Serialize;
use std::fmt;
use tokio::io::AsyncRead;
use tokio_util::io::ReaderStream;

/// Request body accepted by [`RequestBuilder::request`].
///
/// Dispatch follows the variant: text and bytes are sent verbatim, a stream
/// is forwarded as the request body source, and a structured value is sent
/// as its JSON serialization.
///
/// Most callers never name a variant: `&str`, `String`, `Vec<u8>`, `Bytes`
/// and `serde_json::Value` convert with `Into`, and [`Body::json`] wraps any
/// `Serialize` value.
///
/// [`RequestBuilder::request`]: crate::RequestBuilder::request
pub enum Body {
    /// UTF-8 text, sent as-is
    Text(String),
    /// Raw bytes, sent as-is
    Bytes(Bytes),
    /// Readable byte stream used directly as the request body
    Stream(RequestBody),
    /// Value sent as JSON
    Structured(JsonBody),
}

/// JSON serialization of a value, captured when the [`Body`] was created.
///
/// A serialization failure is kept and reported as `HttpError::Encode`
/// when the request runs, before any I/O.
pub struct JsonBody(Result<Vec<u8>, serde_json::Error>);

impl Body {
    /// Empty body
    #[must_use]
    pub fn empty() -> Self {
        Self::Bytes(Bytes::new())
    }

    /// Serialize `value` as JSON
    #[must_use]
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Self {
        Self::Structured(JsonBody(serde_json::to_vec(value)))
    }

    /// Stream the contents of an async reader
    #[must_use]
    pub fn reader<R>(reader: R) -> Self
    where
        R: AsyncRead + Send + Sync + 'static,
    {
        let stream = ReaderStream::new(reader).map_ok(Frame::data);
        Self::Stream(BodyExt::map_err(StreamBody::new(stream), Into::into).boxed())
    }

    /// Forward any `http_body::Body` as the request body
    #[must_use]
    pub fn stream<B>(body: B) -> Self
    where
        B: http_body::Body<Data = Bytes> + Send + Sync + 'static,
        B::Error: Into<BoxError>,
    {
        Self::Stream(body.map_err(Into::into).boxed())
    }

    /// Turn the body into the stream handed to the transport.
    ///
    /// # Errors
    /// Returns `HttpError::Encode` if a structured value failed to serialize.
    pub(crate) fn encode(self) -> Result<RequestBody, HttpError> {
        let bytes = match self {
            Self::Text(text) => Bytes::from(text),
            Self::Bytes(bytes) => bytes,
            Self::Stream(stream) => return Ok(stream),
            Self::Structured(JsonBody(encoded)) => Bytes::from(encoded.map_err(HttpError::Encode)?),
        };
        Ok(Full::new(bytes).map_err(Into::into).boxed())
    }
}

impl Default for Body {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<()> for Body {
    fn from((): ()) -> Self {
        Self::empty()
    }
}

impl From<String> for Body {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for Body {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<Vec<u8>> for Body {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(Bytes::from(bytes))
    }
}

impl From<&[u8]> for Body {
    fn from(bytes: &[u8]) -> Self {
        Self::Bytes(Bytes::copy_from_slice(bytes))
    }
}

impl From<Bytes> for Body {
    fn from(bytes: Bytes) -> Self {
        Self::Bytes(bytes)
    }
}

impl From<serde_json::Value> for Body {
    fn from(value: serde_json::Value) -> Self {
        Self::json(&value)
    }
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.debug_tuple("Text").field(&text.len()).finish(),
            Self::Bytes(bytes) => f.debug_tuple("Bytes").field(&bytes.len()).finish(),
            Self::Stream(_) => f.write_str("Stream"),
            Self::Structured(JsonBody(Ok(encoded))) => {
                f.debug_tuple("Structured").field(&encoded.len()).finish()
            }
            Self::Structured(JsonBody(Err(err))) => {
                f.debug_tuple("Structured").field(&err.to_string()).finish()
            }
        }
    }
}
