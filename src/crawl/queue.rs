// src/crawl/queue.rs
// =============================================================================
// The Frontier: the breadth-first work queue of (url, depth) tasks.
//
// How it works:
// 1. The seed goes in at depth 0
// 2. Tasks come out in FIFO order, so every task at depth d comes out before
//    any task at depth d+1 (links found at depth d are pushed at d+1, behind
//    everything already queued)
// 3. A URL is only ever pushed once: the `seen` set remembers every URL that
//    was queued, including ones that have since been processed
// 4. Nothing deeper than max_depth is pushed, and anything deeper that
//    somehow got in is dropped silently when popped
//
// Rust concepts:
// - VecDeque: push_back / pop_front make a FIFO queue
// - HashSet::insert returns false when the value was already there
// =============================================================================

use std::collections::{HashSet, VecDeque};

use crate::canonical::NormalizedUrl;

/// One unit of crawl work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlTask {
    pub url: NormalizedUrl,
    /// Link hops from the seed (the seed itself is depth 0)
    pub depth: u32,
}

#[derive(Debug)]
pub struct Frontier {
    queue: VecDeque<CrawlTask>,
    seen: HashSet<NormalizedUrl>,
    max_depth: u32,
}

impl Frontier {
    pub fn new(max_depth: u32) -> Self {
        Self {
            queue: VecDeque::new(),
            seen: HashSet::new(),
            max_depth,
        }
    }

    /// Queues `url` at `depth` unless it was queued before or is too deep.
    ///
    /// Returns true when the task was actually queued.
    pub fn push(&mut self, url: NormalizedUrl, depth: u32) -> bool {
        if depth > self.max_depth || self.seen.contains(&url) {
            return false;
        }

        self.seen.insert(url.clone());
        self.queue.push_back(CrawlTask { url, depth });
        true
    }

    /// Next task in breadth-first order.
    pub fn pop(&mut self) -> Option<CrawlTask> {
        while let Some(task) = self.queue.pop_front() {
            if task.depth <= self.max_depth {
                return Some(task);
            }
        }
        None
    }

    /// Pops up to `limit` tasks that all share the depth of the next task.
    ///
    /// Used to dispatch one depth level at a time; an empty Vec means the
    /// frontier is exhausted.
    pub fn pop_level(&mut self, limit: usize) -> Vec<CrawlTask> {
        let mut level: Vec<CrawlTask> = Vec::new();

        while level.len() < limit {
            let same_level = match (self.queue.front(), level.first()) {
                (None, _) => false,
                (Some(_), None) => true,
                (Some(next), Some(first)) => next.depth == first.depth,
            };
            if !same_level {
                break;
            }
            match self.pop() {
                Some(task) => level.push(task),
                None => break,
            }
        }

        level
    }

    /// Marks `url` as seen without queuing it.
    ///
    /// Used for URLs handled outside the queue (embedded images), so they are
    /// never queued as tasks afterwards. Returns false if it was already seen.
    pub fn mark_seen(&mut self, url: &NormalizedUrl) -> bool {
        if self.seen.contains(url) {
            return false;
        }
        self.seen.insert(url.clone());
        true
    }

    pub fn has_seen(&self, url: &NormalizedUrl) -> bool {
        self.seen.contains(url)
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why a separate `seen` set?
//    - A page can be linked from many pages at the same depth
//    - Without `seen`, each of those links would queue it again
//    - The visited map only knows about pages already fetched, not ones
//      still waiting in the queue
//
// 2. Why does breadth-first give the shortest depth?
//    - The first time a URL is pushed, it comes from the shallowest page that
//      links to it (all shallower pages were processed first)
//    - Later pushes are ignored, so the recorded depth is never worse
//
// 3. What is `while let`?
//    - Loop while pattern matching succeeds
//    - `while let Some(task) = self.queue.pop_front()` stops on an empty queue
// -----------------------------------------------------------------------------
