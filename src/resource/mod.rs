mod format;
mod table;
mod uri;

pub use format::{SourceFormat, WriteDisposition};
pub use table::TableId;
pub use uri::GcsUri;
