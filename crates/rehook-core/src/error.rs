use thiserror::Error;

/// Misuse conditions for the hook entry points.
///
/// Hooks and `remember` slots are render-bound: they only make sense while a
/// [`Host::render`](crate::Host::render) call is in flight, because that is
/// what provides the slot store they read from. Calling them anywhere else is
/// a programmer error and is raised as a panic carrying the `Display` text of
/// the matching variant.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HookError {
    /// A hook was invoked while no host render was active on this thread.
    #[error("no active host: hooks and remember slots may only be used inside Host::render")]
    NoActiveHost,
}
