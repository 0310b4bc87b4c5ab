pub mod frame;
pub mod ndjson;
pub mod view;

pub use frame::rows_to_frame;
pub use ndjson::read_ndjson_resources;
pub use view::{
    CommandViewRunner, ViewRow, ViewRunner, bundle_entry_count, bundle_resources,
    load_json_document, load_view_definition, read_view_rows,
};
