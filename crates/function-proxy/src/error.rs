use driver_api::DriverError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A direct accessor was used while no driver object is bound. Not
    /// recovered here; the proxy starts working once the hardware appears.
    #[error("function {function:?} is not connected to any hardware")]
    NotConnected { function: String },
    /// Failure reported by the wrapped driver, passed through unchanged.
    #[error(transparent)]
    Driver(#[from] DriverError),
}
