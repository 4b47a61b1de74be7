mod persistence;
mod registry;

pub use persistence::{
    load_catalog, load_catalog_csv, load_catalog_path, parse_catalog_json, read_catalog_csv,
};
pub use registry::FoodCatalog;
