use crate::Result;

use tabula_core::{driver::Driver, Error};

use std::sync::Arc;
use url::Url;

/// Build the driver a connection URL names.
pub(super) fn connect(url: &str) -> Result<Arc<dyn Driver>> {
    let parsed = Url::parse(url).map_err(Error::driver)?;

    match parsed.scheme() {
        "mysql" => connect_mysql(url),
        "sqlite" => connect_sqlite(url),
        scheme => Err(Error::from_args(format_args!(
            "unsupported database; scheme={scheme}; url={url}"
        ))),
    }
}

#[cfg(feature = "mysql")]
fn connect_mysql(url: &str) -> Result<Arc<dyn Driver>> {
    Ok(Arc::new(tabula_driver_mysql::MySQL::new(url)?))
}

#[cfg(not(feature = "mysql"))]
fn connect_mysql(_url: &str) -> Result<Arc<dyn Driver>> {
    Err(anyhow::anyhow!("`mysql` feature not enabled").into())
}

#[cfg(feature = "sqlite")]
fn connect_sqlite(url: &str) -> Result<Arc<dyn Driver>> {
    Ok(Arc::new(tabula_driver_sqlite::Sqlite::new(url)?))
}

#[cfg(not(feature = "sqlite"))]
fn connect_sqlite(_url: &str) -> Result<Arc<dyn Driver>> {
    Err(anyhow::anyhow!("`sqlite` feature not enabled").into())
}
