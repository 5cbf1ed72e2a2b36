/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 *
 * This source code is licensed under both the MIT license found in the
 * LICENSE-MIT file in the root directory of this source tree and the Apache
 * License, Version 2.0 found in the LICENSE-APACHE file in the root directory
 * of this source tree.
 */

//! The bounded emission pool.
//!
//! Each unit of work is a pure function from a resolved target to its
//! manifest fragment, so units run on blocking threads with no
//! coordination. A failed unit trips a process-wide flag: queued units
//! are discarded instead of dispatched, in-flight units run to completion
//! and their output is dropped. Whatever the completion order, the result
//! list comes back label-sorted and the reported error is the one from the
//! label-least target.

use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::sync::Mutex;

use futures::stream::StreamExt;
use gazebo::dupe::Dupe;
use genja_core::label::Label;

#[derive(Default)]
struct ErrorSlot {
    failed: AtomicBool,
    first: Mutex<Option<(Label, anyhow::Error)>>,
}

impl ErrorSlot {
    fn failed(&self) -> bool {
        self.failed.load(Ordering::Acquire)
    }

    fn set(&self, label: Label, err: anyhow::Error) {
        self.failed.store(true, Ordering::Release);
        if let Ok(mut first) = self.first.lock() {
            match &*first {
                Some((existing, _)) if *existing <= label => {}
                _ => *first = Some((label, err)),
            }
        }
    }

    fn take(&self) -> Option<(Label, anyhow::Error)> {
        self.first.lock().ok()?.take()
    }
}

pub struct EmitPool {
    concurrency: usize,
}

impl EmitPool {
    pub fn new(concurrency: usize) -> Self {
        EmitPool {
            concurrency: concurrency.max(1),
        }
    }

    /// Runs every unit, at most `concurrency` at a time. Returns the
    /// successful outputs sorted by label, or the first error by label
    /// order.
    pub async fn run<F>(&self, units: Vec<(Label, F)>) -> anyhow::Result<Vec<(Label, String)>>
    where
        F: FnOnce() -> anyhow::Result<String> + Send + 'static,
    {
        let slot = Arc::new(ErrorSlot::default());

        let mut stream = futures::stream::iter(units.into_iter().map(|(label, work)| {
            let slot = slot.dupe();
            async move {
                if slot.failed() {
                    return None;
                }
                match tokio::task::spawn_blocking(work).await {
                    Ok(Ok(fragment)) => Some((label, fragment)),
                    Ok(Err(err)) => {
                        slot.set(label, err);
                        None
                    }
                    Err(join_err) => {
                        slot.set(label, anyhow::Error::new(join_err));
                        None
                    }
                }
            }
        }))
        .buffer_unordered(self.concurrency);

        let mut results = Vec::new();
        while let Some(item) = stream.next().await {
            if let Some(pair) = item {
                results.push(pair);
            }
        }

        if let Some((_, err)) = slot.take() {
            return Err(err);
        }
        results.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use genja_core::paths::SourceDir;

    use super::*;

    fn label(s: &str) -> Label {
        Label::resolve(s, &SourceDir::new("//"), None).unwrap()
    }

    #[tokio::test]
    async fn results_come_back_label_sorted() -> anyhow::Result<()> {
        let pool = EmitPool::new(4);
        let units: Vec<(Label, Box<dyn FnOnce() -> anyhow::Result<String> + Send>)> = vec![
            (label("//b:b"), Box::new(|| Ok("b".to_owned()))),
            (label("//a:a"), Box::new(|| Ok("a".to_owned()))),
            (label("//c:c"), Box::new(|| Ok("c".to_owned()))),
        ];
        let results = pool.run(units).await?;
        let order: Vec<String> = results.into_iter().map(|(_, s)| s).collect();
        assert_eq!(order, vec!["a", "b", "c"]);
        Ok(())
    }

    #[tokio::test]
    async fn first_error_by_label_wins() {
        let pool = EmitPool::new(2);
        let units: Vec<(Label, Box<dyn FnOnce() -> anyhow::Result<String> + Send>)> = vec![
            (
                label("//z:z"),
                Box::new(|| Err(anyhow::anyhow!("z failed"))),
            ),
            (
                label("//a:a"),
                Box::new(|| Err(anyhow::anyhow!("a failed"))),
            ),
        ];
        let err = pool.run(units).await.unwrap_err();
        assert_eq!(err.to_string(), "a failed");
    }
}
