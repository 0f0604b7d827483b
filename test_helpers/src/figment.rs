//! Helpers for loading collection options inside a `figment::Jail`.
//!
//! Options tests write a TOML file and export environment variables, both of
//! which must stay confined to the jail's temporary directory and restored
//! environment.

use anyhow::{Result, anyhow};
use mapped_collection::CollectionOptions;

/// Name of the TOML file written by [`load_options`].
pub const OPTIONS_FILE: &str = "collection.toml";

/// Environment prefix read by [`load_options`].
pub const ENV_PREFIX: &str = "MAPPED_";

/// Executes `f` inside a [`figment::Jail`], returning the closure's output.
///
/// # Errors
///
/// Returns an error if the jail initialisation fails or the closure returns a
/// [`figment::error::Error`].
pub fn with_jail<F, T>(f: F) -> Result<T>
where
    F: FnOnce(&mut figment::Jail) -> figment::error::Result<T>,
{
    let mut output = None;
    figment::Jail::try_with(|j| {
        output = Some(f(j)?);
        Ok(())
    })
    .map_err(|err| anyhow!(err.to_string()))?;
    output.ok_or_else(|| anyhow!("jail closure did not return a value"))
}

/// Converts any error implementing [`ToString`] into a [`figment::Error`].
#[expect(
    clippy::needless_pass_by_value,
    reason = "collection errors are owned at the call site"
)]
pub fn figment_error<E: ToString>(err: E) -> figment::Error {
    figment::Error::from(err.to_string())
}

/// Load [`CollectionOptions`] from `toml` and `env` inside a jail.
///
/// `toml` is written to [`OPTIONS_FILE`] and each `(key, value)` pair is
/// exported as `MAPPED_<key>`.
///
/// # Errors
///
/// Returns an error when the jail cannot be set up or the options fail to
/// load.
pub fn load_options(toml: &str, env: &[(&str, &str)]) -> Result<CollectionOptions> {
    with_jail(|jail| {
        jail.create_file(OPTIONS_FILE, toml)?;
        for (key, value) in env {
            jail.set_env(format!("{ENV_PREFIX}{key}"), value);
        }
        let figment = CollectionOptions::figment(OPTIONS_FILE, ENV_PREFIX);
        CollectionOptions::from_figment(&figment).map_err(figment_error)
    })
}
