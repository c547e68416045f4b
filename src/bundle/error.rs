use thiserror::Error;

use super::BundleKey;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BundleError {
    #[error("bundle {0} has already been registered")]
    AlreadyRegistered(BundleKey),

    #[error("bundle {bundle} requires {dependency}, which has not been registered yet")]
    MissingDependency {
        bundle: BundleKey,
        dependency: BundleKey,
    },

    #[error("no dependency of type {0} was provided")]
    DependencyUnavailable(&'static str),

    #[error("bundle {0} has not been registered")]
    NotRegistered(BundleKey),
}
