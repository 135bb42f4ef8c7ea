pub mod formatter;

pub use formatter::{
    format_progress, format_result, format_score, format_session_list, format_settings,
    format_trend, should_use_colors,
};
