pub mod format;
pub mod page;

pub use format::{format_brl, normalize_unit, ProductView};
pub use page::{render_page, PageState};
