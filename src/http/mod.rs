//! HTTP protocol layer module
//!
//! Range resolution, content-type lookup and response builders, decoupled from
//! request routing.

pub mod mime;
pub mod range;
pub mod response;

// Re-export commonly used types
pub use range::{resolve_range, ByteRange, RangeResolution};
pub use response::{
    build_404_response, build_405_response, build_416_response, build_500_response,
    build_full_response, build_html_response, build_options_response, build_partial_response,
};
