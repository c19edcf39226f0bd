pub mod error;
pub mod mask;
pub mod protocol;
pub mod scanner;

pub use error::{ParseErrorKind, Result, ScanError};
pub use mask::Mask;
pub use protocol::{
    Header, Headers, NptRange, NptTime, ParseConfig, RequestUri, RtspRequest, RtspResponse,
};
pub use scanner::{Scanner, strip_quotes};
