pub mod icons;
pub mod output;
pub mod table;
pub mod theme;

pub use icons::Icons;
pub use output::{dim, empty, entry_details, error, header, info, section, success, warn};
pub use table::{entries_table, refsets_table, stats_table, TableBuilder};
pub use theme::{theme, Theme};
