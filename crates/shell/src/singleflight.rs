/*
 * SPDX-FileCopyrightText: Copyright (c) 2025 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
 * SPDX-License-Identifier: LicenseRef-NvidiaProprietary
 *
 * NVIDIA CORPORATION, its affiliates and licensors retain all intellectual
 * property and proprietary rights in and to this material, related
 * documentation and any modifications thereto. Any use, reproduction,
 * disclosure or distribution of this material and related documentation
 * without an express license agreement from NVIDIA CORPORATION or
 * its affiliates is strictly prohibited.
 */

use std::sync::Mutex;

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};

/// Coalesces concurrent invocations of one expensive operation: whoever
/// arrives while a run is in flight awaits the same shared future instead of
/// starting another. The lock only guards installing and cloning the shared
/// future, never any I/O.
pub struct Singleflight<T: Clone + Send + Sync + 'static> {
    inflight: Mutex<State<T>>,
}

struct State<T: Clone> {
    generation: u64,
    current: Option<(u64, Shared<BoxFuture<'static, T>>)>,
}

impl<T: Clone + Send + Sync + 'static> Default for Singleflight<T> {
    fn default() -> Self {
        Self {
            inflight: Mutex::new(State {
                generation: 0,
                current: None,
            }),
        }
    }
}

impl<T: Clone + Send + Sync + 'static> Singleflight<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `make()`'s future, or join the run already in flight.
    pub async fn run<F>(&self, make: F) -> T
    where
        F: FnOnce() -> BoxFuture<'static, T>,
    {
        let (generation, future, leader) = {
            let mut state = self
                .inflight
                .lock()
                .expect("BUG: singleflight mutex poisoned");
            match &state.current {
                Some((generation, future)) => (*generation, future.clone(), false),
                None => {
                    state.generation += 1;
                    let generation = state.generation;
                    let future = make().shared();
                    state.current = Some((generation, future.clone()));
                    (generation, future, true)
                }
            }
        };

        let output = future.await;

        if leader {
            let mut state = self
                .inflight
                .lock()
                .expect("BUG: singleflight mutex poisoned");
            if state
                .current
                .as_ref()
                .is_some_and(|(current, _)| *current == generation)
            {
                state.current = None;
            }
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use futures::FutureExt;

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn concurrent_callers_share_one_run() {
        let sf = Arc::new(Singleflight::<usize>::new());
        let runs = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..5 {
            let sf = sf.clone();
            let runs = runs.clone();
            handles.push(tokio::spawn(async move {
                sf.run(|| {
                    let runs = runs.clone();
                    async move {
                        tokio::time::sleep(Duration::from_millis(50)).await;
                        runs.fetch_add(1, Ordering::SeqCst) + 1
                    }
                    .boxed()
                })
                .await
            }));
        }

        for handle in handles {
            assert_eq!(handle.await.unwrap(), 1);
        }
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn sequential_callers_run_again() {
        let sf = Singleflight::<usize>::new();
        let runs = Arc::new(AtomicUsize::new(0));

        for expected in 1..=3 {
            let runs = runs.clone();
            let got = sf
                .run(|| async move { runs.fetch_add(1, Ordering::SeqCst) + 1 }.boxed())
                .await;
            assert_eq!(got, expected);
        }
    }
}
