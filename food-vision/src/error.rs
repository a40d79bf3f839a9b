use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("uploaded image could not be decoded")]
    Decode(#[source] image::ImageError),
    #[error("model inference failed")]
    Inference(#[source] anyhow::Error),
}

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("nutrition service request failed")]
    Transport(#[from] reqwest::Error),
    #[error("nutrition service returned status {status}")]
    Upstream { status: u16, body: String },
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Classify(#[from] ClassifyError),
    #[error(transparent)]
    Lookup(#[from] LookupError),
}
