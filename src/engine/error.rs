use ulid::Ulid;

#[derive(Debug)]
pub enum EngineError {
    NotFound(Ulid),
    UnknownItem(String),
    DuplicateKey(String),
    InvariantWouldBreak(&'static str),
    InvalidItem(&'static str),
    Incomplete(&'static str),
    MissingCredentials,
    InvalidCredentials,
    Unauthorized,
    LimitExceeded(&'static str),
    StoreError(String),
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::NotFound(id) => write!(f, "not found: {id}"),
            EngineError::UnknownItem(id) => write!(f, "unknown item: {id}"),
            EngineError::DuplicateKey(key) => write!(f, "already exists: {key}"),
            EngineError::InvariantWouldBreak(msg) => write!(f, "rejected: {msg}"),
            EngineError::InvalidItem(msg) => write!(f, "invalid item: {msg}"),
            EngineError::Incomplete(field) => {
                write!(f, "reservation incomplete: {field} is required")
            }
            EngineError::MissingCredentials => write!(f, "email and password are required"),
            EngineError::InvalidCredentials => write!(f, "invalid credentials"),
            EngineError::Unauthorized => write!(f, "administrator login required"),
            EngineError::LimitExceeded(msg) => write!(f, "limit exceeded: {msg}"),
            EngineError::StoreError(e) => write!(f, "store error: {e}"),
        }
    }
}

impl std::error::Error for EngineError {}

impl From<crate::store::StoreError> for EngineError {
    fn from(e: crate::store::StoreError) -> Self {
        EngineError::StoreError(e.to_string())
    }
}
