//! Core functionalities: serial line capture, sample parsing, session files.

pub mod encoding;
pub mod error;
pub mod line;
pub mod sample;
pub mod sampler;
pub mod serial;
pub mod session;

pub use encoding::{TextEncoding, UnknownEncoding};
pub use error::{CollectError, SessionError};
pub use line::{LineReader, LineSource};
pub use sample::{MalformedLine, Sample};
pub use sampler::{run, Sampler, SamplerConfig, DEFAULT_DURATION};
pub use serial::{list_ports, PortInfo, SerialConfig, SerialConnection, BAUD_RATE, READ_TIMEOUT};
pub use session::{load_session, session_path, SessionData, SessionSummary, SessionWriter};
