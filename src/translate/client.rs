use std::time::Duration;

use base64::{engine::general_purpose, Engine as _};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TranslateError {
    #[error("translation request failed: {0}")]
    Http(#[from] Box<ureq::Error>),

    #[error("translation service returned a malformed response: {0}")]
    MalformedResponse(#[from] std::io::Error),

    #[error("pronunciation audio is not valid base64: {0}")]
    BadAudio(#[from] base64::DecodeError),
}

/// Wire request. Field names are fixed by the service.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationRequest {
    pub word: String,
    pub target_language: String,
}

/// Wire response as the service sends it, audio still base64.
#[derive(Debug, Clone, Deserialize)]
pub struct TranslationResponse {
    pub translated_word: String,
    #[serde(default)]
    pub pronunciation_audio_base64: Option<String>,
}

/// A translation with its pronunciation decoded and ready to play.
#[derive(Debug, Clone, PartialEq)]
pub struct Translation {
    pub translated_word: String,
    pub pronunciation: Option<Vec<u8>>,
}

/// Seam in front of the translation backend so sessions can run against a
/// scripted translator. Calls block; the session keeps them off its owner
/// thread.
pub trait Translator: Send + Sync {
    fn translate(&self, word: &str, target_language: &str) -> Result<Translation, TranslateError>;
}

/// Blocking client for the translation service. Holds one agent so
/// connections are reused; the generous timeouts absorb the service's
/// cold starts.
#[derive(Clone)]
pub struct TranslationClient {
    agent: ureq::Agent,
    base_url: String,
}

impl TranslationClient {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

    pub fn new(base_url: &str) -> Self {
        Self::with_timeout(base_url, Self::DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(timeout)
            .timeout_read(timeout)
            .timeout_write(timeout)
            .build();
        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Translates one word into the target language, decoding any attached
    /// pronunciation audio.
    pub fn translate(
        &self,
        word: &str,
        target_language: &str,
    ) -> Result<Translation, TranslateError> {
        let request = TranslationRequest {
            word: word.to_string(),
            target_language: target_language.to_string(),
        };

        log::info!("Translating '{word}' to '{target_language}'");
        let response: TranslationResponse = self
            .agent
            .post(&format!("{}/translate", self.base_url))
            .send_json(&request)
            .map_err(Box::new)?
            .into_json()?;

        decode_response(response)
    }
}

impl Translator for TranslationClient {
    fn translate(&self, word: &str, target_language: &str) -> Result<Translation, TranslateError> {
        TranslationClient::translate(self, word, target_language)
    }
}

fn decode_response(response: TranslationResponse) -> Result<Translation, TranslateError> {
    let pronunciation = match response.pronunciation_audio_base64 {
        Some(audio) if !audio.is_empty() => Some(general_purpose::STANDARD.decode(audio)?),
        _ => None,
    };

    Ok(Translation {
        translated_word: response.translated_word,
        pronunciation,
    })
}
