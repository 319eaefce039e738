pub mod dashboard_handler;

pub use dashboard_handler::{
    __path_export_data, __path_get_cleanup, __path_get_storage, __path_get_summary, export_data,
    get_cleanup, get_storage, get_summary,
};
