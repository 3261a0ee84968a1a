use thiserror::Error;

/// Pipeline errors.
///
/// These cover host-surface validation only. Mid-pass precondition
/// violations mean the front end broke its contract and fail hard instead.
#[derive(Error, Debug)]
pub enum Error {
    #[error("duplicate function `{0}`")]
    DuplicateFunction(String),
    #[error("unknown struct or union `{name}` referenced by `{referrer}`")]
    UnknownComposite { name: String, referrer: String },
}

pub type Result<T> = std::result::Result<T, Error>;
