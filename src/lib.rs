#![doc = "Load and store tabular and geospatial dataframes in object storage"]
mod client;
mod config;
#[cfg(feature = "download")]
mod download;
mod error;
mod format;
mod frame;
mod fs;
mod io;
mod load;
mod remote;
mod store;
mod write;

#[doc(inline)]
pub use client::DataClient;

#[doc(inline)]
pub use config::{Config, CsvOptions, HttpConfig, XlsxOptions};

#[cfg(feature = "download")]
#[doc(inline)]
pub use download::HttpClient;

#[doc(inline)]
pub use error::Error;

#[doc(inline)]
pub use format::FileFormat;

#[doc(inline)]
pub use frame::{Dataset, GeoFrame};

#[doc(inline)]
pub use load::load_data;

#[cfg(feature = "download")]
#[doc(inline)]
pub use remote::read_shapefile_from_url;

#[doc(inline)]
pub use remote::read_zipped_shapefile;

#[doc(inline)]
pub use store::{DiskStore, MemStore, ObjectRef, ObjectStore};

#[cfg(feature = "s3")]
#[doc(inline)]
pub use store::S3Store;

#[doc(inline)]
pub use write::write_data;

pub use polars::frame::DataFrame;
