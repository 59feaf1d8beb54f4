//! Response body parsing.

mod error;
mod response;
mod tree;

pub use error::{ParseError, ParseResult};
pub use response::{
    Filter, MappableResponse, ParseOptions, Parsed, RawResponse, ResponseData, decode_href,
    error_message, is_xml, parse_many, parse_multistatus, parse_one, parse_response,
};
pub use tree::{XmlElement, parse_document};
