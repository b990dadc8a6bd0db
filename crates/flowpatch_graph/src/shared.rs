// SPDX-License-Identifier: MIT OR Apache-2.0
//! Patch handle for use from several threads.
//!
//! The patch itself has no internal locking; this wraps the whole patch in a
//! single exclusive lock.

use crate::patch::Patch;
use parking_lot::{Mutex, MutexGuard};
use std::sync::Arc;

/// Cloneable, thread-safe handle to one [`Patch`]
#[derive(Debug, Clone, Default)]
pub struct SharedPatch {
    inner: Arc<Mutex<Patch>>,
}

impl SharedPatch {
    /// Share a patch
    pub fn new(patch: Patch) -> Self {
        Self {
            inner: Arc::new(Mutex::new(patch)),
        }
    }

    /// Lock the patch for exclusive access
    pub fn lock(&self) -> MutexGuard<'_, Patch> {
        self.inner.lock()
    }

    /// Run `f` with exclusive access to the patch
    pub fn with<R>(&self, f: impl FnOnce(&mut Patch) -> R) -> R {
        f(&mut self.inner.lock())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinds::IntNode;
    use crate::port::PortValue;
    use crate::wire::{InputId, OutputId, Wire};
    use std::thread;

    #[test]
    fn test_concurrent_mutation() {
        let shared = SharedPatch::new(Patch::new());
        let handles: Vec<_> = (0..4)
            .map(|n| {
                let shared = shared.clone();
                thread::spawn(move || {
                    shared.with(|patch| patch.insert_node(IntNode::new(format!("n{n}"))))
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap().unwrap();
        }
        assert_eq!(shared.lock().node_count(), 4);
    }

    #[test]
    fn test_propagation_through_handle() {
        let shared = SharedPatch::default();
        let (a, b) = shared.with(|patch| {
            let a = patch.insert_node(IntNode::new("a")).unwrap();
            let b = patch.insert_node(IntNode::new("b")).unwrap();
            patch
                .insert_wire(Wire::new(OutputId::new(a, 0), InputId::new(b, 0)))
                .unwrap();
            (a, b)
        });

        let writer = shared.clone();
        thread::spawn(move || {
            writer
                .lock()
                .set_output_value(OutputId::new(a, 0), Some(PortValue::Int(42)))
                .unwrap();
        })
        .join()
        .unwrap();

        assert_eq!(
            shared.lock().input_value(InputId::new(b, 0)).unwrap(),
            Some(&PortValue::Int(42))
        );
    }
}
