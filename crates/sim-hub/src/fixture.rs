//! RON description of a simulated installation: which modules exist and
//! which functions they carry. Used by examples and tests to set up a hub
//! without a wall of install calls.

use driver_api::FunctionKind;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Fixture {
    pub modules: Vec<ModuleFixture>,
}

#[derive(Debug, Deserialize)]
pub struct ModuleFixture {
    pub serial: String,
    pub functions: Vec<FunctionFixture>,
}

#[derive(Debug, Deserialize)]
pub struct FunctionFixture {
    pub kind: FunctionKind,
    pub id: String,
    #[serde(default)]
    pub logical_name: String,
}

#[derive(Debug, thiserror::Error)]
pub enum FixtureError {
    #[error("malformed fixture: {0}")]
    Ron(#[from] ron::error::SpannedError),
}
