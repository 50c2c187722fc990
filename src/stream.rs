//! Lazy row streams and the contiguous-group cursor shared by reduce and join.
//!
//! A [`RowStream`] is a boxed, single-pass iterator of `Result<Row>`. Errors
//! travel as items, so a failure deep inside the graph surfaces at the pull
//! that triggered it.
//!
//! [`GroupCursor`] splits a stream into maximal runs of rows sharing a
//! [`GroupKey`]. Groups are never buffered: [`GroupCursor::group`] hands out a
//! stream that pulls from the underlying input, and [`GroupCursor::advance`]
//! discards whatever the consumer left unread.

use crate::row::{GroupKey, Row, RowExt};
use anyhow::Result;
use std::cell::RefCell;
use std::rc::Rc;

/// A lazy, single-pass sequence of rows.
pub type RowStream = Box<dyn Iterator<Item = Result<Row>>>;

/// Wrap owned rows as a stream.
pub fn stream_of(rows: Vec<Row>) -> RowStream {
    Box::new(rows.into_iter().map(Ok))
}

/// Defers building a stream until its first pull.
///
/// Used for source leaves (lookup happens on first pull) and for the sort
/// barrier (input is drained on first pull, not when the graph is run).
pub struct Deferred<F> {
    init: Option<F>,
    inner: Option<RowStream>,
}

impl<F> Deferred<F>
where
    F: FnOnce() -> Result<RowStream>,
{
    pub fn new(init: F) -> Self {
        Self {
            init: Some(init),
            inner: None,
        }
    }
}

impl<F> Iterator for Deferred<F>
where
    F: FnOnce() -> Result<RowStream>,
{
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(init) = self.init.take() {
            match init() {
                Ok(s) => self.inner = Some(s),
                Err(e) => return Some(Err(e)),
            }
        }
        self.inner.as_mut()?.next()
    }
}

/// Run `finish` on first pull and yield the rows it returns.
///
/// For reducers and joiners that must see a whole group before emitting.
pub fn rows_when_pulled<F>(finish: F) -> RowStream
where
    F: FnOnce() -> Result<Vec<Row>> + 'static,
{
    Box::new(Deferred::new(move || Ok(stream_of(finish()?))))
}

/// Cursor over the contiguous key groups of a stream.
struct Grouped {
    input: RowStream,
    keys: Vec<String>,
    lookahead: Option<(GroupKey, Row)>,
    current: Option<GroupKey>,
    exhausted: bool,
    /// Bumped on every advance; group streams of older groups go dry.
    generation: u64,
}

impl Grouped {
    /// Pull one row into the lookahead slot if it is empty.
    fn fill(&mut self) -> Result<()> {
        if self.lookahead.is_some() || self.exhausted {
            return Ok(());
        }
        match self.input.next() {
            Some(row) => {
                let row = row?;
                self.lookahead = Some((row.group_key(&self.keys), row));
            }
            None => self.exhausted = true,
        }
        Ok(())
    }

    fn lookahead_in_current(&self) -> bool {
        matches!(
            (&self.lookahead, &self.current),
            (Some((k, _)), Some(cur)) if k == cur
        )
    }

    fn advance(&mut self) -> Result<Option<GroupKey>> {
        self.generation += 1;
        loop {
            self.fill()?;
            if !self.lookahead_in_current() {
                break;
            }
            self.lookahead = None;
        }
        self.current = self.lookahead.as_ref().map(|(k, _)| k.clone());
        Ok(self.current.clone())
    }

    fn next_in_group(&mut self, generation: u64) -> Option<Result<Row>> {
        if generation != self.generation {
            return None;
        }
        if let Err(e) = self.fill() {
            return Some(Err(e));
        }
        if self.lookahead_in_current() {
            self.lookahead.take().map(|(_, row)| Ok(row))
        } else {
            None
        }
    }
}

/// Shared handle to a cursor splitting a stream into maximal runs of rows
/// with equal [`GroupKey`]s.
///
/// [`group`](Self::group) hands out a stream over the current group that
/// pulls from the input on demand, so a group is never buffered here.
/// [`advance`](Self::advance) discards whatever of the current group was left
/// unread; streams handed out for earlier groups then yield nothing.
#[derive(Clone)]
pub struct GroupCursor {
    inner: Rc<RefCell<Grouped>>,
}

impl GroupCursor {
    pub fn new(input: RowStream, keys: Vec<String>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Grouped {
                input,
                keys,
                lookahead: None,
                current: None,
                exhausted: false,
                generation: 0,
            })),
        }
    }

    /// Move to the next group, skipping unread rows of the current one.
    ///
    /// Returns the new group's key, or `None` once the input is exhausted.
    pub fn advance(&self) -> Result<Option<GroupKey>> {
        self.inner.borrow_mut().advance()
    }

    /// Lazy stream over the rows of the current group.
    pub fn group(&self) -> RowStream {
        let generation = self.inner.borrow().generation;
        Box::new(GroupRows {
            cursor: Rc::clone(&self.inner),
            generation,
        })
    }
}

struct GroupRows {
    cursor: Rc<RefCell<Grouped>>,
    generation: u64,
}

impl Iterator for GroupRows {
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        self.cursor.borrow_mut().next_in_group(self.generation)
    }
}
