//! Sort-merge join over two key-grouped streams.
//!
//! Both inputs must be grouped contiguously by the join keys and ordered
//! ascending by them (an [`ExternalSort`](super::ExternalSort) on each side
//! guarantees both). Two [`GroupCursor`]s advance in lockstep:
//!
//! - equal keys: the joiner gets both groups, both cursors advance;
//! - left key orders first, or right is exhausted: the joiner gets the left
//!   group and an empty right group, only left advances;
//! - right key orders first, or left is exhausted: the mirror case;
//! - both exhausted: done.
//!
//! Groups are handed to the joiner as lazy streams and its output is drained
//! row by row before either cursor moves, so nothing beyond what the joiner
//! itself buffers is held in memory.

use super::describe_keys;
use crate::joiners::Joiner;
use crate::node::Operation;
use crate::row::{GroupKey, Row};
use crate::stream::{GroupCursor, RowStream};
use anyhow::{bail, Result};
use std::cmp::Ordering;
use std::iter;
use std::sync::Arc;
use tracing::trace;

pub struct Join {
    joiner: Arc<dyn Joiner>,
    keys: Vec<String>,
}

impl Join {
    pub fn new(joiner: Arc<dyn Joiner>, keys: Vec<String>) -> Self {
        Self { joiner, keys }
    }
}

impl Operation for Join {
    fn apply(&self, inputs: Vec<RowStream>) -> Result<RowStream> {
        let mut inputs = inputs.into_iter();
        let (Some(left), Some(right), None) = (inputs.next(), inputs.next(), inputs.next()) else {
            bail!("join expects exactly two input streams");
        };
        Ok(Box::new(MergeJoin {
            left: GroupCursor::new(left, self.keys.clone()),
            right: GroupCursor::new(right, self.keys.clone()),
            left_key: None,
            right_key: None,
            joiner: Arc::clone(&self.joiner),
            keys: self.keys.clone(),
            current: None,
            started: false,
            done: false,
        }))
    }

    fn arity(&self) -> usize {
        2
    }

    fn kind(&self) -> &'static str {
        "Join"
    }

    fn describe(&self) -> String {
        format!("join {} on {}", self.joiner.name(), describe_keys(&self.keys))
    }
}

#[derive(Clone, Copy, Debug)]
enum Side {
    Both,
    Left,
    Right,
}

struct MergeJoin {
    left: GroupCursor,
    right: GroupCursor,
    left_key: Option<GroupKey>,
    right_key: Option<GroupKey>,
    joiner: Arc<dyn Joiner>,
    keys: Vec<String>,
    /// Joiner output for the current group(s) and the side(s) it consumes.
    current: Option<(RowStream, Side)>,
    started: bool,
    done: bool,
}

impl MergeJoin {
    fn next_side(&self) -> Option<Side> {
        match (&self.left_key, &self.right_key) {
            (None, None) => None,
            (Some(_), None) => Some(Side::Left),
            (None, Some(_)) => Some(Side::Right),
            (Some(l), Some(r)) => Some(match l.cmp(r) {
                Ordering::Equal => Side::Both,
                Ordering::Less => Side::Left,
                Ordering::Greater => Side::Right,
            }),
        }
    }

    /// Hand the current group(s) for `side` to the joiner.
    fn open(&mut self, side: Side) {
        trace!(?side, left = ?self.left_key, right = ?self.right_key, "joining groups");
        let left: RowStream = match side {
            Side::Both | Side::Left => self.left.group(),
            Side::Right => Box::new(iter::empty()),
        };
        let right: RowStream = match side {
            Side::Both | Side::Right => self.right.group(),
            Side::Left => Box::new(iter::empty()),
        };
        self.current = Some((self.joiner.join(&self.keys, left, right), side));
    }

    /// Move the cursor(s) whose group was just joined.
    fn advance(&mut self, side: Side) -> Result<()> {
        if matches!(side, Side::Both | Side::Left) {
            self.left_key = self.left.advance()?;
        }
        if matches!(side, Side::Both | Side::Right) {
            self.right_key = self.right.advance()?;
        }
        Ok(())
    }

    fn start(&mut self) -> Result<()> {
        self.started = true;
        self.left_key = self.left.advance()?;
        self.right_key = self.right.advance()?;
        Ok(())
    }

    fn fail(&mut self, e: anyhow::Error) -> Option<Result<Row>> {
        self.done = true;
        Some(Err(e))
    }
}

impl Iterator for MergeJoin {
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.done {
                return None;
            }
            if let Some((out, side)) = self.current.as_mut() {
                let side = *side;
                match out.next() {
                    Some(Ok(row)) => return Some(Ok(row)),
                    Some(Err(e)) => return self.fail(e),
                    None => {}
                }
                self.current = None;
                if let Err(e) = self.advance(side) {
                    return self.fail(e);
                }
            }
            if !self.started
                && let Err(e) = self.start()
            {
                return self.fail(e);
            }
            let Some(side) = self.next_side() else {
                self.done = true;
                return None;
            };
            self.open(side);
        }
    }
}
