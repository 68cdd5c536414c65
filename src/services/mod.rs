pub mod extractor;
pub mod openai_client;
pub mod pipeline;
pub mod retry;
pub mod search_client;
pub mod sheets_client;

pub use extractor::*;
pub use openai_client::*;
pub use pipeline::*;
pub use retry::*;
pub use search_client::*;
pub use sheets_client::*;
