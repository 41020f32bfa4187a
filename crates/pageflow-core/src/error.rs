use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Unknown template: {0}")]
    UnknownTemplate(String),

    #[error("Duplicate template: {0}")]
    DuplicateTemplate(String),

    #[error("Page {template} is missing required element: {element}")]
    MissingElement { template: String, element: String },

    #[error("URL does not belong to site origin: {0}")]
    ForeignOrigin(String),

    #[error("Missing collaborator: {0}")]
    MissingCollaborator(&'static str),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
