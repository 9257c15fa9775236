//! Process-wide store defaults, keyed by environment.
//!
//! This is read-only data, not behavior: the table is built once at first
//! use and has no runtime mutation path. The schema builder seeds its
//! reserved column names from here.

use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, str::FromStr, sync::LazyLock};
use thiserror::Error as ThisError;

///
/// Environment
///

#[derive(
    Clone, Copy, Debug, Default, Deserialize, Eq, Ord, PartialEq, PartialOrd, Serialize,
)]
pub enum Environment {
    #[default]
    Development,
    Production,
    Test,
}

impl FromStr for Environment {
    type Err = UnknownEnvironment;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            "test" => Ok(Self::Test),
            _ => Err(UnknownEnvironment {
                name: input.to_string(),
            }),
        }
    }
}

///
/// UnknownEnvironment
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
#[error("unknown environment '{name}'")]
pub struct UnknownEnvironment {
    pub name: String,
}

///
/// StoreDefaults
///
/// Per-environment collection defaults. Column names are the physical names
/// of the reserved columns every collection row carries.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct StoreDefaults {
    pub database_file: &'static str,
    pub identity_column: &'static str,
    pub payload_column: &'static str,
    pub created_column: &'static str,
    pub updated_column: &'static str,
    pub timestamps: bool,
}

impl StoreDefaults {
    /// Look up the defaults for an environment.
    #[must_use]
    pub fn for_env(env: Environment) -> &'static Self {
        DEFAULTS
            .get(&env)
            .expect("defaults table covers every environment")
    }
}

const COMMON: StoreDefaults = StoreDefaults {
    database_file: "development.sqlite",
    identity_column: "_id",
    payload_column: "_data",
    created_column: "createdAt",
    updated_column: "updatedAt",
    timestamps: true,
};

static DEFAULTS: LazyLock<BTreeMap<Environment, StoreDefaults>> = LazyLock::new(|| {
    BTreeMap::from([
        (Environment::Development, COMMON),
        (
            Environment::Production,
            StoreDefaults {
                database_file: "production.sqlite",
                ..COMMON
            },
        ),
        (
            Environment::Test,
            StoreDefaults {
                database_file: ":memory:",
                ..COMMON
            },
        ),
    ])
});
