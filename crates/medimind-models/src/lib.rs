// Models module - data structures for API communication
pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{ChatRequest, ContentPart, ImageUrl, VisionMessage, VisionRequest};
pub use responses::{
    ChatResponse, Choice, ResponseMessage, Usage,
    StreamChunk, StreamChoice, StreamDelta,
};
