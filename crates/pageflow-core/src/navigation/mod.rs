mod history;
mod links;

pub use history::{History, MemoryHistory};
pub use links::{classify_link, template_for, LinkAction};
