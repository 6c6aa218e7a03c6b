use thiserror::Error;

#[derive(Error, Debug)]
pub enum SpeechError {
    #[error("nothing to speak")]
    Empty,

    #[error("text too long for TTS: {len} characters (limit: {limit})")]
    TooLong { len: usize, limit: usize },

    #[error("invalid TTS endpoint: {0}")]
    Endpoint(#[from] url::ParseError),
}
