//! Heterogeneous decoder input and its coercion to a canonical byte view
//!
//! The decoder accepts borrowed slices, owned vectors, and base64-encoded
//! text. Coercion happens exactly once, when a block is attached; afterwards
//! the decoder holds a single canonical view and never re-examines the
//! original input shape.

use std::borrow::Cow;

use tracing::debug;

use crate::error::{CodecError, CodecResult};

/// Input accepted by [`Decoder::set_block`](crate::Decoder::set_block)
///
/// Plain byte containers are viewed in place (borrowed) or adopted
/// (owned); text is treated as standard base64 and decoded into an owned
/// buffer. Conversions from `&[u8]`, `&[u8; N]`, `Vec<u8>`, `&Vec<u8>` and
/// `&str` are provided, so call sites normally pass their data directly.
#[derive(Debug, Clone)]
pub enum ByteSource<'a> {
    /// Borrowed contiguous bytes, viewed in place
    Borrowed(&'a [u8]),
    /// Owned bytes, adopted without copying
    Owned(Vec<u8>),
    /// Base64-encoded text, decoded on coercion
    Base64(&'a str),
}

impl<'a> ByteSource<'a> {
    /// Coerce into the canonical byte view
    ///
    /// `recycled` supplies backing storage for the base64 case; pooled
    /// decoders hand their previous owned buffer back through it so repeated
    /// decode cycles reuse one allocation.
    ///
    /// # Errors
    ///
    /// `InvalidEncoding` when base64 text does not decode.
    pub(crate) fn coerce(self, mut recycled: Vec<u8>) -> CodecResult<Cow<'a, [u8]>> {
        match self {
            ByteSource::Borrowed(bytes) => Ok(Cow::Borrowed(bytes)),
            ByteSource::Owned(bytes) => Ok(Cow::Owned(bytes)),
            ByteSource::Base64(text) => {
                recycled.clear();
                if let Err(err) = base64::decode_config_buf(text, base64::STANDARD, &mut recycled)
                {
                    debug!("base64 block rejected: {err}");
                    return Err(CodecError::InvalidEncoding("malformed base64 block"));
                }
                Ok(Cow::Owned(recycled))
            }
        }
    }
}

impl<'a> From<&'a [u8]> for ByteSource<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        ByteSource::Borrowed(bytes)
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for ByteSource<'a> {
    fn from(bytes: &'a [u8; N]) -> Self {
        ByteSource::Borrowed(bytes)
    }
}

impl From<Vec<u8>> for ByteSource<'_> {
    fn from(bytes: Vec<u8>) -> Self {
        ByteSource::Owned(bytes)
    }
}

impl<'a> From<&'a Vec<u8>> for ByteSource<'a> {
    fn from(bytes: &'a Vec<u8>) -> Self {
        ByteSource::Borrowed(bytes)
    }
}

impl<'a> From<&'a str> for ByteSource<'a> {
    fn from(text: &'a str) -> Self {
        ByteSource::Base64(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coerced(src: ByteSource<'_>) -> CodecResult<Vec<u8>> {
        src.coerce(Vec::new()).map(|view| view.into_owned())
    }

    #[test]
    fn test_slice_and_vec_coerce_in_place() {
        let data = [1u8, 2, 3];
        assert_eq!(coerced(ByteSource::from(&data[..])).unwrap(), vec![1, 2, 3]);
        assert_eq!(coerced(ByteSource::from(&data)).unwrap(), vec![1, 2, 3]);
        assert_eq!(
            coerced(ByteSource::from(vec![4u8, 5])).unwrap(),
            vec![4, 5]
        );
    }

    #[test]
    fn test_borrowed_stays_borrowed() {
        let data = vec![9u8, 8, 7];
        let view = ByteSource::from(&data).coerce(Vec::new()).unwrap();
        assert!(matches!(view, Cow::Borrowed(_)));
    }

    #[test]
    fn test_base64_decodes() {
        assert_eq!(coerced(ByteSource::from("AAEC")).unwrap(), vec![0, 1, 2]);
        assert_eq!(coerced(ByteSource::from("")).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_base64_rejects_garbage() {
        assert_eq!(
            coerced(ByteSource::from("not base64!")),
            Err(CodecError::InvalidEncoding("malformed base64 block"))
        );
    }
}
