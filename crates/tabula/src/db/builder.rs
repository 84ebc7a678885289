use super::{connect, Db};
use crate::Result;

use tabula_core::{driver::Driver, schema::db::TableSpec};

use indexmap::IndexMap;
use std::sync::Arc;

#[derive(Debug, Default)]
pub struct Builder {
    hosts: IndexMap<String, Host>,
}

#[derive(Debug)]
enum Host {
    Url(String),
    Driver(Arc<dyn Driver>),
}

impl Builder {
    /// Register a host by connection URL. The scheme selects the driver.
    pub fn host(&mut self, name: impl Into<String>, url: impl Into<String>) -> &mut Self {
        self.hosts.insert(name.into(), Host::Url(url.into()));
        self
    }

    /// Register the default host, `_`.
    pub fn default_host(&mut self, url: impl Into<String>) -> &mut Self {
        self.host(TableSpec::DEFAULT_HOST, url)
    }

    /// Register a host served by an existing driver.
    pub fn driver(&mut self, name: impl Into<String>, driver: impl Driver) -> &mut Self {
        self.hosts
            .insert(name.into(), Host::Driver(Arc::new(driver)));
        self
    }

    pub fn build(&mut self) -> Result<Db> {
        let mut hosts = IndexMap::with_capacity(self.hosts.len());

        for (name, host) in self.hosts.drain(..) {
            let driver = match host {
                Host::Url(url) => connect::connect(&url)?,
                Host::Driver(driver) => driver,
            };
            tracing::debug!(host = %name, flavor = driver.flavor().name(), "registered host");
            hosts.insert(name, driver);
        }

        Ok(Db {
            hosts: Arc::new(hosts),
        })
    }
}
