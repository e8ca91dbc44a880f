//! One-time payload decoding shared by every opener of an entry
//!
//! ```text
//! Unloaded ──first open──▶ Decoding ──ok──▶ Ready(bytes)
//!                              │
//!                              └──err/panic──▶ Failed(reason)
//! ```
//!
//! Callers arriving while another thread decodes block on the condvar and
//! observe the same outcome. `Ready` and `Failed` are terminal.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use log::{debug, trace, warn};
use parking_lot::{Condvar, Mutex};

/// Decode failure recorded once and replayed to every caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeFailure(pub String);

#[derive(Debug)]
enum DecodeState {
    Unloaded,
    Decoding,
    Ready(Arc<[u8]>),
    Failed(DecodeFailure),
}

/// Lazily decoded, permanently cached entry contents
#[derive(Debug)]
pub struct DecodeCell {
    state: Mutex<DecodeState>,
    settled: Condvar,
    runs: AtomicU32,
}

impl Default for DecodeCell {
    fn default() -> Self {
        Self::new()
    }
}

impl DecodeCell {
    pub fn new() -> Self {
        DecodeCell {
            state: Mutex::new(DecodeState::Unloaded),
            settled: Condvar::new(),
            runs: AtomicU32::new(0),
        }
    }

    /// Number of times the decoder actually ran
    pub fn decode_runs(&self) -> u32 {
        self.runs.load(Ordering::SeqCst)
    }

    /// True once the cell reached `Ready` or `Failed`
    pub fn is_settled(&self) -> bool {
        matches!(
            *self.state.lock(),
            DecodeState::Ready(_) | DecodeState::Failed(_)
        )
    }

    /// Return the decoded bytes, running `decode` only if nobody has yet
    ///
    /// `size == 0` resolves to an empty buffer without calling `decode`.
    pub fn get_or_decode<F>(&self, size: u64, decode: F) -> Result<Arc<[u8]>, DecodeFailure>
    where
        F: FnOnce() -> Result<Vec<u8>, String>,
    {
        let mut state = self.state.lock();
        loop {
            match &*state {
                DecodeState::Ready(bytes) => return Ok(Arc::clone(bytes)),
                DecodeState::Failed(failure) => return Err(failure.clone()),
                DecodeState::Unloaded => break,
                DecodeState::Decoding => {}
            }
            trace!("⏳ Waiting for concurrent decode");
            self.settled.wait(&mut state);
        }

        if size == 0 {
            let empty: Arc<[u8]> = Arc::from(Vec::new());
            *state = DecodeState::Ready(Arc::clone(&empty));
            return Ok(empty);
        }

        *state = DecodeState::Decoding;
        drop(state);

        let mut guard = SettleGuard {
            cell: self,
            armed: true,
        };
        self.runs.fetch_add(1, Ordering::SeqCst);
        let outcome = decode();
        guard.armed = false;

        let result = match outcome {
            Ok(bytes) => {
                debug!("✅ Decoded {} bytes", bytes.len());
                Ok(Arc::<[u8]>::from(bytes))
            }
            Err(reason) => {
                warn!("❌ Decode failed: {}", reason);
                Err(DecodeFailure(reason))
            }
        };
        self.settle(match &result {
            Ok(bytes) => DecodeState::Ready(Arc::clone(bytes)),
            Err(failure) => DecodeState::Failed(failure.clone()),
        });
        result
    }

    fn settle(&self, outcome: DecodeState) {
        *self.state.lock() = outcome;
        self.settled.notify_all();
    }
}

/// Records a failure if the decoder unwinds, so waiters are released
struct SettleGuard<'a> {
    cell: &'a DecodeCell,
    armed: bool,
}

impl Drop for SettleGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.cell.settle(DecodeState::Failed(DecodeFailure(
                "decoder panicked".to_string(),
            )));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Barrier;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_decodes_once() {
        let cell = DecodeCell::new();
        let first = cell.get_or_decode(3, || Ok(b"abc".to_vec())).unwrap();
        let second = cell
            .get_or_decode(3, || panic!("decoder must not run twice"))
            .unwrap();
        assert_eq!(&*first, b"abc");
        assert!(Arc::ptr_eq(&first, &second));
        assert!(cell.is_settled());
        assert_eq!(cell.decode_runs(), 1);
    }

    #[test]
    fn test_zero_size_skips_decoder() {
        let cell = DecodeCell::new();
        let bytes = cell
            .get_or_decode(0, || Err("must not run".to_string()))
            .unwrap();
        assert!(bytes.is_empty());
        assert_eq!(cell.decode_runs(), 0);
        assert!(cell.is_settled());
    }

    #[test]
    fn test_failure_is_replayed() {
        let cell = DecodeCell::new();
        let first = cell
            .get_or_decode(4, || Err("corrupt".to_string()))
            .unwrap_err();
        assert!(cell.is_settled());
        let second = cell.get_or_decode(4, || Ok(b"okay".to_vec())).unwrap_err();
        assert_eq!(first, second);
        assert_eq!(first, DecodeFailure("corrupt".to_string()));
        assert_eq!(cell.decode_runs(), 1);
    }

    #[test]
    fn test_concurrent_callers_share_one_decode() {
        let cell = Arc::new(DecodeCell::new());
        let barrier = Arc::new(Barrier::new(16));

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let cell = Arc::clone(&cell);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    cell.get_or_decode(5, || {
                        thread::sleep(Duration::from_millis(20));
                        Ok(b"bytes".to_vec())
                    })
                    .unwrap()
                })
            })
            .collect();

        let results: Vec<Arc<[u8]>> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(cell.decode_runs(), 1);
        for bytes in &results {
            assert!(Arc::ptr_eq(bytes, &results[0]));
            assert_eq!(&**bytes, b"bytes");
        }
    }

    #[test]
    fn test_panicking_decoder_fails_durably() {
        let cell = Arc::new(DecodeCell::new());
        let worker = Arc::clone(&cell);
        let joined = thread::spawn(move || {
            let _ = worker.get_or_decode(1, || panic!("boom"));
        })
        .join();
        assert!(joined.is_err());

        let err = cell.get_or_decode(1, || Ok(vec![1])).unwrap_err();
        assert_eq!(err, DecodeFailure("decoder panicked".to_string()));
        assert_eq!(cell.decode_runs(), 1);
    }
}
