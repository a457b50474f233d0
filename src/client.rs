use std::sync::Arc;

use anyhow::Result;

use crate::{config::Config, frame::{Dataset, GeoFrame}, load, remote, store::ObjectStore, write};

#[cfg(feature = "download")]
use crate::download::HttpClient;

/// Shared handle bundling an object store, an HTTP session and configuration.
#[derive(Clone)]
pub struct DataClient {
    store: Arc<dyn ObjectStore>,
    config: Config,
    #[cfg(feature = "download")]
    http: HttpClient,
}

impl DataClient {
    pub fn new(store: Arc<dyn ObjectStore>) -> Result<Self> {
        Self::with_config(store, Config::default())
    }

    pub fn with_config(store: Arc<dyn ObjectStore>, config: Config) -> Result<Self> {
        Ok(Self {
            #[cfg(feature = "download")]
            http: HttpClient::new(&config.http)?,
            store,
            config,
        })
    }

    pub fn store(&self) -> &dyn ObjectStore { self.store.as_ref() }

    pub fn config(&self) -> &Config { &self.config }

    /// See [`load_data`](crate::load_data).
    pub fn load(&self, bucket: &str, path: &str) -> Result<Dataset> {
        load::load_data(self.store.as_ref(), bucket, path, &self.config)
    }

    /// See [`write_data`](crate::write_data).
    pub fn write(&self, dataset: &Dataset, bucket: &str, path: &str) -> Result<()> {
        write::write_data(dataset, self.store.as_ref(), bucket, path, &self.config)
    }

    /// See [`read_shapefile_from_url`](crate::read_shapefile_from_url).
    #[cfg(feature = "download")]
    pub fn read_shapefile_from_url(&self, url: &str) -> Result<GeoFrame> {
        remote::read_shapefile_from_url(&self.http, url, &self.config)
    }

    /// See [`read_zipped_shapefile`](crate::read_zipped_shapefile).
    pub fn read_zipped_shapefile(&self, bytes: &[u8], source_name: &str) -> Result<GeoFrame> {
        remote::read_zipped_shapefile(bytes, source_name, &self.config)
    }
}
