use crate::config::ClientConfig;
use crate::deserializer::{DeserializeError, Deserializer, DeserializerFactory};
use crate::net::Body;
use futures::future::BoxFuture;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Decodes the body into a `String`.
///
/// The charset comes from the body's `Content-Type` when present, else from
/// the configured default. UTF-8 and Latin-1 are decoded; anything else falls
/// back to lossy UTF-8.
pub struct TextDeserializer {
    limit: usize,
    default_charset: String,
}

impl TextDeserializer {
    pub fn new(limit: usize, default_charset: impl Into<String>) -> Self {
        Self {
            limit,
            default_charset: default_charset.into(),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.max_body_size, config.default_charset.clone())
    }

    pub fn factory(config: &ClientConfig) -> DeserializerFactory<String> {
        let (limit, charset) = (config.max_body_size, config.default_charset.clone());
        Arc::new(move || Some(Box::new(Self::new(limit, charset.clone())) as Box<dyn Deserializer<String>>))
    }
}

impl Deserializer<String> for TextDeserializer {
    fn deserialize(&self, body: Body, cancel: CancellationToken) -> BoxFuture<'_, Result<String, DeserializeError>> {
        Box::pin(async move {
            let charset = body
                .content_type()
                .and_then(charset_from_content_type)
                .unwrap_or_else(|| self.default_charset.clone());

            let bytes = body.collect(self.limit, &cancel).await?;
            Ok(decode(&charset, &bytes))
        })
    }
}

/// Permissive parse of the `charset=...` parameter of a `Content-Type` value.
fn charset_from_content_type(ct: &str) -> Option<String> {
    let idx = ct.to_ascii_lowercase().find("charset=")?;
    let after = &ct[idx + "charset=".len()..];
    // charset value may be quoted or end at ; or end of string
    let end = after.find([';', ' ', '\t']).unwrap_or(after.len());
    let cs = after[..end].trim_matches('"');
    (!cs.is_empty()).then(|| cs.to_string())
}

fn decode(charset: &str, body: &[u8]) -> String {
    match charset.to_ascii_lowercase().as_str() {
        "utf-8" | "utf8" => String::from_utf8_lossy(body).into_owned(),
        // Latin-1 maps bytes one-to-one onto the first 256 code points
        "iso-8859-1" | "latin1" | "latin-1" => body.iter().map(|&b| b as char).collect(),
        cs => {
            log::trace!("unsupported charset {cs:?}, decoding as UTF-8");
            String::from_utf8_lossy(body).into_owned()
        }
    }
}
