//! Speech segmentation and attribution for plenary protocols
//!
//! Raw protocol text is normalized, split at speaker lines into spans, and
//! each span is attributed to a speaker and a canonical party and classified
//! by the text in front of it. Editorial annotations in the raw bodies feed
//! interruption, applause and heckle tallies.
//!
//! ```no_run
//! use plenar_parser::ProtocolParser;
//!
//! let parser = ProtocolParser::with_defaults()?;
//! let parsed = parser.parse("...\nAnna Müller (SPD):\n...");
//! for speech in &parsed.speeches {
//!     println!("{} ({}): {} words", speech.speaker, speech.party, speech.word_count);
//! }
//! # Ok::<(), plenar_parser::ParserError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::cast_precision_loss
)]

pub mod boundary;
pub mod classify;
pub mod corpus;
pub mod drama;
pub mod error;
pub mod names;
pub mod normalize;
pub mod parser;
pub mod party;
pub mod segment;

pub use boundary::{Boundary, BoundaryKind, BoundaryScanner};
pub use classify::SpeechClassifier;
pub use corpus::{AcademicShare, Corpus, SpeakerAverage};
pub use drama::{DramaEvent, DramaExtractor};
pub use error::{ParserError, ParserResult};
pub use names::NameDecomposer;
pub use normalize::{NormalizedText, normalize};
pub use parser::{ParsedProtocol, ProtocolParser};
pub use party::PartyResolver;
pub use segment::{Candidate, Segmentation, Segmenter, SpeechSpan};
