pub mod storage;
pub mod types;

pub use storage::{
    append_session, delete_session, export_sessions, load_sessions, save_sessions, SESSIONS_KEY,
};
pub use types::{chart_points, format_run_time, progress, ChartPoint, Progress, Session};
