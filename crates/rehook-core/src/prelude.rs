pub use crate::effects::{Dispose, effect, key_effect, on_unmount};
pub use crate::error::HookError;
pub use crate::hook::{MemoCell, StateHandle, use_dynamic, use_dynamic_keyed, use_dynamic_once};
pub use crate::runtime::{Host, after_commit, remember, remember_state, remember_with_key};
pub use crate::scope::{Scope, current_scope, scoped_effect};
pub use crate::signal::{Signal, signal};
