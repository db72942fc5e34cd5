use crate::Result;

use quarry_core::{bail, Connection};

use url::Url;

/// Creates a closed connection for the database at `url`.
///
/// The driver is chosen by the URL scheme. Drivers are compiled in through
/// cargo features; a scheme whose feature is disabled is an error.
pub fn connect(url: &str) -> Result<Box<dyn Connection>> {
    let parsed = match Url::parse(url) {
        Ok(parsed) => parsed,
        Err(err) => bail!("invalid database url `{url}`: {err}"),
    };

    match parsed.scheme() {
        "sqlite" => connect_sqlite(url),
        scheme => bail!("unsupported database; scheme={scheme}; url={url}"),
    }
}

#[cfg(feature = "sqlite")]
fn connect_sqlite(url: &str) -> Result<Box<dyn Connection>> {
    let driver = quarry_driver_sqlite::Sqlite::new(url)?;
    Ok(Box::new(driver))
}

#[cfg(not(feature = "sqlite"))]
fn connect_sqlite(_url: &str) -> Result<Box<dyn Connection>> {
    bail!("`sqlite` feature not enabled")
}
