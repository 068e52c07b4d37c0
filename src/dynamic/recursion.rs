use std::cell::Cell;

use prost::DecodeError;

/// Default bound on the nesting depth of embedded messages during decode, matching the
/// proto3 canonical default. Configurable per call via [`crate::DecodeOptions`].
pub(crate) const DEFAULT_RECURSION_LIMIT: u32 = 100;

thread_local! {
    static STATE: Cell<(u32, u32)> = const { Cell::new((0, DEFAULT_RECURSION_LIMIT)) };
}

/// Overrides the recursion limit used by [`Guard::enter`] for the duration of `f`, restoring the
/// previous limit (and resetting the depth counter) afterwards.
///
/// This is how [`DynamicMessage::decode_with_options`][crate::DynamicMessage::decode_with_options]
/// threads a configurable limit through `prost`'s `Message::merge_field`, whose signature has no
/// room for extra per-call state.
pub(crate) fn with_limit<R>(limit: u32, f: impl FnOnce() -> R) -> R {
    let previous = STATE.with(|cell| cell.replace((0, limit)));
    let result = f();
    STATE.with(|cell| cell.set(previous));
    result
}

/// RAII guard incrementing the current decode depth on construction and decrementing it on drop.
/// Construction fails once the configured limit has been reached.
pub(crate) struct Guard(());

impl Guard {
    pub(crate) fn enter() -> Result<Guard, DecodeError> {
        STATE.with(|cell| {
            let (depth, limit) = cell.get();
            if depth >= limit {
                return Err(DecodeError::new("recursion limit exceeded while decoding"));
            }
            cell.set((depth + 1, limit));
            Ok(Guard(()))
        })
    }
}

impl Drop for Guard {
    fn drop(&mut self) {
        STATE.with(|cell| {
            let (depth, limit) = cell.get();
            cell.set((depth.saturating_sub(1), limit));
        });
    }
}
