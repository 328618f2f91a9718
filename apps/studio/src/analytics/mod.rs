pub mod completeness;
